use regex_lite::Regex;
use std::sync::LazyLock;

static INT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("integer pattern is valid"));
static FLOAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?$").expect("float pattern is valid")
});

/// Shape of a scanned run of digits, decimal points and exponent.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum NumberClass {
    Int,
    Float,
    TooManyDecimalPoints,
    IllFormed,
}

pub fn classify_number(text: &str) -> NumberClass {
    if INT_RE.is_match(text) {
        NumberClass::Int
    } else if FLOAT_RE.is_match(text) {
        NumberClass::Float
    } else if text.matches('.').count() > 1 {
        NumberClass::TooManyDecimalPoints
    } else {
        NumberClass::IllFormed
    }
}

/// Parse a decimal integer constant
pub fn parse_int_constant(text: &str) -> Result<i64, String> {
    text.parse::<i64>()
        .map_err(|_| format!("integer constant '{}' is out of range", text))
}

pub fn parse_float_literal(text: &str) -> Result<f64, String> {
    text.parse::<f64>()
        .map_err(|_| format!("failed to parse float literal '{}'", text))
}

/// Value for a float lexeme that may be malformed: everything from the
/// second decimal point on is ignored, as is a dangling point or exponent.
pub fn float_value_lossy(text: &str) -> f64 {
    if let Ok(value) = parse_float_literal(text) {
        return value;
    }
    let mut end = text.len();
    if let Some((first, _)) = text.match_indices('.').nth(1) {
        end = first;
    }
    let head = text[..end].trim_end_matches(|c: char| !c.is_ascii_digit());
    head.parse::<f64>().unwrap_or(0.0)
}
