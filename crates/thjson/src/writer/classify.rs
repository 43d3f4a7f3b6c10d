//! String/key output classification: deciding between the bareword, quoted,
//! and triple-quoted forms when writing text back out.

use crate::classify::{classify, PrimitiveKind};

const KEY_DISALLOWED: &[char] = &['{', '}', '[', ']', ',', ':', '#', '\\', '"'];
const VALUE_DISALLOWED: &[char] = &['"', '\'', ',', '{', '}', '[', ']', '(', ')', '<', '>', ':', '#', '\\'];

fn has_whitespace(s: &str) -> bool {
    s.chars().any(char::is_whitespace)
}

fn is_bareword_key(s: &str) -> bool {
    !s.is_empty() && !has_whitespace(s) && !s.contains(KEY_DISALLOWED)
}

fn is_bareword_value(s: &str) -> bool {
    if s.is_empty() || has_whitespace(s) || s.contains(VALUE_DISALLOWED) {
        return false;
    }
    // A bareword that would be reparsed as null/true/false or a number must
    // be quoted instead, or it would silently change primitive kind on
    // round-trip.
    matches!(classify(s), PrimitiveKind::Str)
}

/// `true` when `s` is dense enough to prefer the triple-quoted form over an
/// escaped quoted string.
fn prefers_triple_quote(s: &str) -> bool {
    let newlines = s.matches('\n').count();
    if newlines <= 1 {
        return false;
    }
    let any_long_line = s.lines().any(|line| line.len() > 10);
    any_long_line || (newlines > 4 && s.len() > 80)
}

fn escape_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn triple_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    out.push_str("'''\n");
    out.push_str(s);
    if !s.ends_with('\n') {
        out.push('\n');
    }
    out.push_str("'''");
    out
}

/// Renders a map/array key.
#[must_use]
pub(super) fn classify_key(s: &str) -> String {
    if is_bareword_key(s) {
        s.to_string()
    } else {
        escape_quoted(s)
    }
}

/// Renders a class tag name, or any other single-line string-like token —
/// never triple-quoted, since a class tag must fit on the line before its
/// container's opening brace.
#[must_use]
pub(super) fn classify_single_line(s: &str) -> String {
    if is_bareword_value(s) {
        s.to_string()
    } else {
        escape_quoted(s)
    }
}

/// Renders a `STRING` primitive's payload, choosing among bareword, quoted,
/// and triple-quoted forms.
#[must_use]
pub(super) fn classify_string_value(s: &str) -> String {
    if is_bareword_value(s) {
        s.to_string()
    } else if prefers_triple_quote(s) {
        triple_quoted(s)
    } else {
        escape_quoted(s)
    }
}
