//! THJSON ("Tagged Human JSON") — a streaming parser and writer for a
//! human-authored, JSON-compatible text format that adds class tags, binary
//! literals, and host-expandable directives/function calls on top of HJSON.
//!
//! The crate has no notion of a persistent document tree: parsing drives a
//! [`Listener`] with a linear sequence of structural [`Event`]s, and writing
//! is the dual operation — a caller drives a [`writer::Writer`] with the same
//! event shapes to produce THJSON text. Building an in-memory DOM, a typed
//! object graph, or anything else is the job of a `Listener` implementation
//! outside this crate (see `demos/dom_adapter.rs` for a minimal example).

mod classify;
mod error;
mod event;
mod listener;
mod options;
mod source;

pub mod parser;
pub mod writer;

pub use classify::{classify, IntegerKind, PrimitiveKind, StringKind};
pub use error::{Error, Result, StructureErrorKind, SyntaxErrorKind};
pub use event::{Bytes, CommentKind, Event, Primitive, Text};
pub use listener::Listener;
pub use options::ParserOptions;
pub use parser::Parser;
pub use source::ByteSource;

/// Parses `input` in one shot, delivering every event to `listener`.
///
/// This is the convenience entry point for a byte buffer source; for a
/// `Read`-backed source use [`parse_reader`].
pub fn parse_str(input: &str, listener: &mut impl Listener, options: ParserOptions) -> Result<()> {
    let source = ByteSource::from_slice(input.as_bytes(), options.tab_size);
    Parser::new(source, options).run(listener)
}

/// Parses from a sequential [`std::io::Read`] source in one shot.
pub fn parse_reader<R: std::io::Read>(
    reader: R,
    listener: &mut impl Listener,
    options: ParserOptions,
) -> Result<()> {
    let source = ByteSource::from_reader(reader, options.tab_size);
    Parser::new(source, options).run(listener)
}
