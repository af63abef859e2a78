//! Sigil-tagged text format
//!
//! One field per line, `<sigil><key>=<value>`, lines joined by `\n` with no
//! trailing newline. The sigil names the field's variant:
//!
//! | sigil | variant          |
//! |-------|------------------|
//! | `^`   | boolean          |
//! | `>>`  | float            |
//! | `>`   | double           |
//! | `$$`  | long (and time)  |
//! | `$`   | int              |
//! | `&`   | string           |
//! | none  | inferred on load |
//!
//! # Decoding
//!
//! Blank lines, lines starting with `//` or `#`, and lines without `=` are
//! skipped. The line splits on its first `=`; an empty key or value skips the
//! line. A sigil is honoured only when the literal spells a value of its type
//! (`&` accepts anything); otherwise the whole key, sigil included, goes
//! through literal sniffing: boolean, int, double, float, short, then string.
//! Decoded values are stored with [`VarMap::put`].
//!
//! A line that fails to decode is logged and dropped; the rest of the input
//! still loads.

use crate::coerce::Variant;
use crate::error::CodecError;
use crate::literal;
use crate::map::VarMap;
use crate::value::Value;
use tracing::{debug, warn};

pub const SIGIL_BOOLEAN: &str = "^";
pub const SIGIL_FLOAT: &str = ">>";
pub const SIGIL_DOUBLE: &str = ">";
pub const SIGIL_LONG: &str = "$$";
pub const SIGIL_INT: &str = "$";
pub const SIGIL_STRING: &str = "&";

type LiteralParser = fn(&str) -> Option<Value>;

// Two-character sigils precede their one-character prefixes.
const SIGILS: [(&str, LiteralParser); 6] = [
    (SIGIL_BOOLEAN, parse_boolean),
    (SIGIL_FLOAT, parse_float),
    (SIGIL_DOUBLE, parse_double),
    (SIGIL_LONG, parse_long),
    (SIGIL_INT, parse_int),
    (SIGIL_STRING, parse_string),
];

// Order in which an untagged literal is tried.
const SNIFFERS: [LiteralParser; 5] = [
    parse_boolean,
    parse_int,
    parse_double,
    parse_float,
    parse_short,
];

/// Sigil written for a field of `variant` (empty for untagged variants)
pub fn sigil(variant: Variant) -> &'static str {
    match variant {
        Variant::Boolean => SIGIL_BOOLEAN,
        Variant::Float => SIGIL_FLOAT,
        Variant::Double => SIGIL_DOUBLE,
        Variant::Long | Variant::Time => SIGIL_LONG,
        Variant::Int => SIGIL_INT,
        Variant::String => SIGIL_STRING,
        Variant::Untyped | Variant::Byte | Variant::Short => "",
    }
}

/// Outcome of decoding a batch of lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Entries stored into the map
    pub loaded: usize,
    /// Blank, comment, and incomplete lines
    pub skipped: usize,
    /// Lines dropped because they failed to decode
    pub malformed: usize,
}

/// Encode every field of `map` in insertion order
pub fn encode(map: &VarMap) -> String {
    let mut out = String::new();
    for (i, (key, var)) in map.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let field = var.borrow();
        if !round_trips(key) {
            warn!("key '{}' will not reload as written", key);
        }
        out.push_str(sigil(field.variant()));
        out.push_str(key);
        out.push('=');
        out.push_str(&field.get().to_string());
    }
    out
}

/// Decode one line into a key and value
///
/// `Ok(None)` means the line carries no entry (blank, comment, incomplete).
pub fn decode_line(line: &str) -> Result<Option<(String, Value)>, CodecError> {
    if line.is_empty() || line.starts_with("//") || line.starts_with('#') {
        return Ok(None);
    }
    let Some((key, literal)) = literal::split_first(line, "=") else {
        return Ok(None);
    };
    if key.is_empty() || literal.is_empty() {
        return Ok(None);
    }

    for (sigil, parse) in SIGILS {
        if let Some(name) = key.strip_prefix(sigil)
            && let Some(value) = parse(literal)
        {
            if name.is_empty() {
                return Err(CodecError::EmptyKey {
                    line: line.to_string(),
                });
            }
            return Ok(Some((name.to_string(), value)));
        }
    }

    Ok(Some((key.to_string(), sniff(literal))))
}

/// Infer a value from an untagged literal
///
/// Tries boolean, int, double, float and short in turn; anything else is a
/// string.
pub fn sniff(literal: &str) -> Value {
    SNIFFERS
        .iter()
        .find_map(|parse| parse(literal))
        .unwrap_or_else(|| Value::from(literal))
}

/// Decode `lines` into `map`
pub fn decode<I, S>(map: &mut VarMap, lines: I) -> LoadReport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut report = LoadReport::default();
    for (number, line) in lines.into_iter().enumerate() {
        match decode_line(line.as_ref()) {
            Ok(Some((key, value))) => {
                map.put(&key, value);
                report.loaded += 1;
            }
            Ok(None) => report.skipped += 1,
            Err(e) => {
                warn!("line {}: {}", number + 1, e);
                report.malformed += 1;
            }
        }
    }
    debug!(
        "decoded {} entries ({} skipped, {} malformed)",
        report.loaded, report.skipped, report.malformed
    );
    report
}

// Keys that would be re-read as comments, split early, or lose a sigil.
fn round_trips(key: &str) -> bool {
    !key.is_empty()
        && !key.contains(['=', '\n', '\r'])
        && !key.starts_with('#')
        && !key.starts_with("//")
        && !SIGILS.iter().any(|(sigil, _)| key.starts_with(sigil))
}

fn parse_boolean(text: &str) -> Option<Value> {
    literal::parse_boolean(text).map(Value::Bool)
}

fn parse_float(text: &str) -> Option<Value> {
    literal::parse_float(text).map(Value::Float)
}

fn parse_double(text: &str) -> Option<Value> {
    literal::parse_double(text).map(Value::Double)
}

fn parse_long(text: &str) -> Option<Value> {
    literal::parse_long(text).map(Value::Long)
}

fn parse_int(text: &str) -> Option<Value> {
    literal::parse_int(text).map(Value::Int)
}

fn parse_short(text: &str) -> Option<Value> {
    literal::parse_short(text).map(Value::Short)
}

fn parse_string(text: &str) -> Option<Value> {
    Some(Value::from(text))
}
