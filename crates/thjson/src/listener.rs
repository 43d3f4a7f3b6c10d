//! The event listener contract.
//!
//! Every method has a no-op default so an adapter only overrides what it
//! cares about, the same way every `ParserOptions` field defaults to a
//! conservative value, just applied to a trait instead of a struct. There is
//! no reflection-driven serialization anywhere in this crate: an explicit
//! visitor trait that the adapter author implements by hand is the whole
//! contract.

use crate::event::{CommentKind, Primitive};

/// Consumes the structural event stream produced by [`crate::Parser`].
///
/// A `Listener` owns no parser state; it is driven synchronously, once per
/// event, in source order. Implementations that need to build a tree
/// typically keep a stack of in-progress containers.
#[allow(unused_variables)]
pub trait Listener {
    /// Called exactly once, before the first event of the top-level stream.
    fn begin(&mut self) {}
    /// Called exactly once, after the last event of the top-level stream.
    fn end(&mut self) {}

    fn begin_object(&mut self, key: &str, class: &str) {}
    fn begin_object_value(&mut self, class: &str) {}
    fn begin_map(&mut self, key: &str) {}
    fn begin_map_value(&mut self) {}

    fn begin_list(&mut self, key: &str, class: &str) {}
    fn begin_list_value(&mut self, class: &str) {}
    fn begin_array(&mut self, key: &str) {}
    fn begin_array_value(&mut self) {}

    fn end_object(&mut self) {}
    fn end_map(&mut self) {}
    fn end_list(&mut self) {}
    fn end_array(&mut self) {}

    fn property(&mut self, key: &str, value: &Primitive<'_>) {}
    fn value(&mut self, value: &Primitive<'_>) {}
    fn null_property(&mut self, key: &str) {}
    fn null_value(&mut self) {}

    fn comment(&mut self, text: &str, kind: CommentKind) {}

    /// A root-level directive. Implementations may mutate their own state for
    /// side effects but must not reenter the driving parser.
    fn directive(&mut self, text: &str) {}

    /// A function call in value position (`@text`). The returned string is
    /// parsed inline by the caller, as if it had occurred literally at this
    /// position, bounded by `ParserOptions::max_recursion`.
    ///
    /// The default pass-through quotes the text verbatim, prefixed with `@`,
    /// so unknown functions round-trip through the stream as opaque strings
    /// rather than failing the parse.
    fn function(&mut self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() + 3);
        out.push('"');
        out.push('@');
        for ch in text.chars() {
            match ch {
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                _ => out.push(ch),
            }
        }
        out.push('"');
        out
    }
}
