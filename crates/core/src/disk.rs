//! Whole-file reads and writes, plain or gzip-framed
//!
//! Reads pull the entire file into memory before splitting it into lines;
//! writes build the complete payload first and hand it to the filesystem in
//! one call. There is no streaming and no partial-write recovery.

use crate::error::StoreError;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

/// Default gzip level
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Framing of the bytes on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    Plain,
    /// Gzip with the given level (clamped to 1-9)
    Gzip(u32),
}

impl Framing {
    pub fn gzip() -> Self {
        Framing::Gzip(DEFAULT_COMPRESSION_LEVEL)
    }

    pub fn is_gzip(self) -> bool {
        matches!(self, Framing::Gzip(_))
    }
}

/// Read `path` as UTF-8 text and split it into lines
///
/// `\r\n` line endings are normalized. A missing file is
/// [`StoreError::NotFound`].
pub fn read_lines(path: &Path, framing: Framing) -> Result<Vec<String>, StoreError> {
    let text = read_text(path, framing)?;
    Ok(text.lines().map(str::to_string).collect())
}

pub fn read_text(path: &Path, framing: Framing) -> Result<String, StoreError> {
    let bytes = fs::read(path).map_err(|e| StoreError::from_io(path, e))?;
    let text = match framing {
        Framing::Plain => String::from_utf8(bytes)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
        Framing::Gzip(_) => gunzip(&bytes),
    };
    text.map_err(|e| StoreError::from_io(path, e))
}

/// Write `content` to `path`, replacing any existing file
pub fn write_text(path: &Path, content: &str, framing: Framing) -> Result<(), StoreError> {
    let bytes = match framing {
        Framing::Plain => content.as_bytes().to_vec(),
        Framing::Gzip(level) => {
            gzip(content.as_bytes(), level).map_err(|e| StoreError::from_io(path, e))?
        }
    };
    fs::write(path, bytes).map_err(|e| StoreError::from_io(path, e))
}

fn gzip(data: &[u8], level: u32) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::new(level.clamp(1, 9)));
    encoder.write_all(data)?;
    encoder.finish()
}

fn gunzip(data: &[u8]) -> io::Result<String> {
    let mut decoder = GzDecoder::new(data);
    let mut text = String::new();
    decoder.read_to_string(&mut text)?;
    Ok(text)
}
