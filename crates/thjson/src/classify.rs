//! The primitive-type discriminator.
//!
//! `classify` is a pure function over a byte span: it never allocates, never
//! performs numeric conversion, and is deterministic across equal inputs.
//! Numeric conversion (to a 32-bit signed integer or single-precision float)
//! and the associated overflow-driven demotion to `STRING` both happen one
//! layer up, in the parser's event-emission step.

pub use crate::event::{IntegerKind, StringKind};

/// The result of classifying a bare lexeme span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrimitiveKind {
    Null,
    Boolean(bool),
    Integer(IntegerKind),
    Float,
    Str,
}

/// Classifies a non-empty (or empty, which maps to `Null`) bareword-safe byte
/// span by the grammar below: literal keywords, then `0x`/`%`-prefixed
/// integers, then a general number, falling back to `Str`.
#[must_use]
pub fn classify(span: &str) -> PrimitiveKind {
    if span.is_empty() {
        return PrimitiveKind::Null;
    }
    match span {
        "null" => return PrimitiveKind::Null,
        "true" => return PrimitiveKind::Boolean(true),
        "false" => return PrimitiveKind::Boolean(false),
        _ => {}
    }

    if let Some(hex) = span.strip_prefix("0x") {
        return if !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            PrimitiveKind::Integer(IntegerKind::Hex)
        } else {
            PrimitiveKind::Str
        };
    }

    if let Some(bin) = span.strip_prefix('%') {
        return if !bin.is_empty() && bin.bytes().all(|b| b == b'0' || b == b'1') {
            PrimitiveKind::Integer(IntegerKind::Binary)
        } else {
            PrimitiveKind::Str
        };
    }

    classify_number(span)
}

/// The general number grammar: `[+-]? digits ('.' digits)? ([eE][+-]? digits)?`.
fn classify_number(span: &str) -> PrimitiveKind {
    let bytes = span.as_bytes();
    let mut i = 0;
    let mut signed = false;

    match bytes.first() {
        Some(b'+') => {
            signed = true;
            i += 1;
        }
        Some(b'-') => {
            i += 1;
        }
        _ => {}
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let has_int_digits = i > int_start;

    let mut is_float = false;
    let mut has_frac_digits = false;
    if i < bytes.len() && bytes[i] == b'.' {
        is_float = true;
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        has_frac_digits = i > frac_start;
    }

    // Need at least one digit somewhere before an optional exponent: either
    // in the integer part, or (for a leading-dot float) in the fraction.
    if !has_int_digits && !has_frac_digits {
        return PrimitiveKind::Str;
    }

    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        is_float = true;
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            // "at least one digit after e" was violated.
            return PrimitiveKind::Str;
        }
    }

    if i != bytes.len() {
        return PrimitiveKind::Str;
    }

    if is_float {
        PrimitiveKind::Float
    } else if signed {
        PrimitiveKind::Integer(IntegerKind::Signed)
    } else {
        PrimitiveKind::Integer(IntegerKind::Plain)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("", PrimitiveKind::Null)]
    #[case("null", PrimitiveKind::Null)]
    #[case("true", PrimitiveKind::Boolean(true))]
    #[case("false", PrimitiveKind::Boolean(false))]
    #[case("0x1F", PrimitiveKind::Integer(IntegerKind::Hex))]
    #[case("0xZZ", PrimitiveKind::Str)]
    #[case("0x", PrimitiveKind::Str)]
    #[case("%1010", PrimitiveKind::Integer(IntegerKind::Binary))]
    #[case("%1012", PrimitiveKind::Str)]
    #[case("%", PrimitiveKind::Str)]
    #[case("5", PrimitiveKind::Integer(IntegerKind::Plain))]
    #[case("+5", PrimitiveKind::Integer(IntegerKind::Signed))]
    #[case("-5", PrimitiveKind::Integer(IntegerKind::Plain))]
    #[case("1.5", PrimitiveKind::Float)]
    #[case(".5", PrimitiveKind::Float)]
    #[case("1.", PrimitiveKind::Float)]
    #[case("1.5e2", PrimitiveKind::Float)]
    #[case("1e2", PrimitiveKind::Float)]
    #[case("1e", PrimitiveKind::Str)]
    #[case("1e+", PrimitiveKind::Str)]
    #[case("1kg", PrimitiveKind::Str)]
    #[case("sword", PrimitiveKind::Str)]
    #[case("-", PrimitiveKind::Str)]
    #[case(".", PrimitiveKind::Str)]
    fn classifies(#[case] input: &str, #[case] expected: PrimitiveKind) {
        assert_eq!(classify(input), expected);
    }
}
