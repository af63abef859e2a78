//! Error types
//!
//! Missing keys are never an error: the map creates a field on first touch.
//! What remains are arithmetic faults on a field, per-line decode failures,
//! I/O failures while persisting, and malformed store configuration.

use crate::value::ValueKind;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Fault raised by field arithmetic
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VarError {
    /// A numeric field was combined with a value that is not a number
    IncompatibleOperand {
        op: &'static str,
        left: ValueKind,
        right: ValueKind,
    },
    /// Integer division by zero
    DivisionByZero,
}

impl fmt::Display for VarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarError::IncompatibleOperand { op, left, right } => {
                write!(f, "{}: cannot apply {} operand to {} value", op, right, left)
            }
            VarError::DivisionByZero => write!(f, "divide: integer division by zero"),
        }
    }
}

impl std::error::Error for VarError {}

/// Failure decoding a single persisted line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Nothing is left of the key once its sigil is stripped
    EmptyKey { line: String },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::EmptyKey { line } => write!(f, "empty key in line '{}'", line),
        }
    }
}

impl std::error::Error for CodecError {}

/// Failure reading or writing a persisted file
#[derive(Debug)]
pub enum StoreError {
    /// The file does not exist (nothing to load)
    NotFound(PathBuf),
    /// Any other I/O failure, including corrupt gzip framing
    Io { path: PathBuf, source: io::Error },
}

impl StoreError {
    pub(crate) fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            StoreError::NotFound(path)
        } else {
            StoreError::Io { path, source }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(path) => write!(f, "{}: file not found", path.display()),
            StoreError::Io { path, source } => write!(f, "{}: {}", path.display(), source),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io { source, .. } => Some(source),
            StoreError::NotFound(_) => None,
        }
    }
}

/// Failure loading a store configuration
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: io::Error },
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read config {}: {}", path.display(), source)
            }
            ConfigError::Parse(e) => write!(f, "invalid config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse(e) => Some(e),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var_error_display() {
        let err = VarError::IncompatibleOperand {
            op: "add",
            left: ValueKind::Int,
            right: ValueKind::String,
        };
        assert_eq!(err.to_string(), "add: cannot apply string operand to int value");
    }

    #[test]
    fn test_store_error_classifies_not_found() {
        let err = StoreError::from_io("x.ini", io::Error::from(io::ErrorKind::NotFound));
        assert!(err.is_not_found());

        let err = StoreError::from_io("x.ini", io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(!err.is_not_found());
        assert!(std::error::Error::source(&err).is_some());
    }
}
