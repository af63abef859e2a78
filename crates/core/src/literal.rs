//! Literal classification for persisted values
//!
//! Decides which primitive a piece of text spells and parses it. The
//! accepted syntax is the one the codec writes:
//!
//! - booleans: `true` / `false`, any ASCII case
//! - integers: optional sign followed by decimal digits, range-checked per width
//! - floats: decimal or exponent notation, plus `NaN`, `Infinity`, `-Infinity`
//!
//! Words such as `inf` or `nan` that Rust's float parser would accept are
//! rejected so that hand-written strings are not mistaken for numbers.

pub fn parse_boolean(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

pub fn is_boolean(text: &str) -> bool {
    parse_boolean(text).is_some()
}

pub fn parse_byte(text: &str) -> Option<i8> {
    text.parse().ok()
}

pub fn parse_short(text: &str) -> Option<i16> {
    text.parse().ok()
}

pub fn parse_int(text: &str) -> Option<i32> {
    text.parse().ok()
}

pub fn parse_long(text: &str) -> Option<i64> {
    text.parse().ok()
}

pub fn is_byte(text: &str) -> bool {
    parse_byte(text).is_some()
}

pub fn is_short(text: &str) -> bool {
    parse_short(text).is_some()
}

pub fn is_integer(text: &str) -> bool {
    parse_int(text).is_some()
}

pub fn is_long(text: &str) -> bool {
    parse_long(text).is_some()
}

pub fn parse_double(text: &str) -> Option<f64> {
    match text {
        "NaN" => return Some(f64::NAN),
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }
    if !looks_numeric(text) {
        return None;
    }
    text.parse::<f64>().ok()
}

pub fn parse_float(text: &str) -> Option<f32> {
    match text {
        "NaN" => return Some(f32::NAN),
        "Infinity" | "+Infinity" => return Some(f32::INFINITY),
        "-Infinity" => return Some(f32::NEG_INFINITY),
        _ => {}
    }
    if !looks_numeric(text) {
        return None;
    }
    text.parse::<f32>().ok()
}

pub fn is_double(text: &str) -> bool {
    parse_double(text).is_some()
}

pub fn is_float(text: &str) -> bool {
    parse_float(text).is_some()
}

/// Split on the first occurrence of `delimiter`
///
/// Returns None when the delimiter does not occur. Either side may be empty.
pub fn split_first<'a>(text: &'a str, delimiter: &str) -> Option<(&'a str, &'a str)> {
    text.split_once(delimiter)
}

fn looks_numeric(text: &str) -> bool {
    text.bytes().any(|b| b.is_ascii_digit())
        && text
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
}
