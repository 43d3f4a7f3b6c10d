//! Error taxonomy for the parser and writer.
//!
//! Splits I/O failure, lexical/grammatical syntax errors (with position), and
//! structural misuse of the writer's `begin_*`/`end_*` call protocol into
//! distinct variants rather than one flat string, so callers can match on
//! what actually went wrong instead of parsing a message.

use thiserror::Error;

/// The crate's result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error produced by parsing or writing THJSON.
#[derive(Debug, Error)]
pub enum Error {
    /// The underlying byte source (a `Read` impl) failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A lexical or grammatical error at a specific position.
    #[error("{kind} at {line}:{column}")]
    Syntax {
        kind: SyntaxErrorKind,
        line: usize,
        column: usize,
    },

    /// Function-call (`@text`) expansion nested more than `MAX_RECURSION`
    /// levels deep.
    #[error("function-call recursion limit exceeded at {line}:{column}")]
    RecursionLimit { line: usize, column: usize },

    /// The writer was driven out of order (e.g. `end_array` closing an
    /// object frame, or closing with nothing open).
    #[error("writer structure error: {0}")]
    Structure(#[from] StructureErrorKind),
}

/// Lexical/grammatical failure kinds, reported with the position of the
/// offending byte (or of the still-open delimiter, for unterminated
/// constructs).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("unexpected byte '{0}'")]
    UnexpectedByte(char),

    #[error("invalid unicode escape character '{0}'")]
    InvalidUnicodeEscapeChar(char),

    #[error("invalid unicode escape sequence \\u{0:04x}")]
    InvalidUnicodeEscapeSequence(u32),

    #[error("invalid base64 content")]
    InvalidBase64,

    #[error("newline inside quoted string")]
    NewlineInQuotedString,

    #[error("empty class tag")]
    EmptyClassTag,

    #[error("expected '{{' or '[' after class tag")]
    ExpectedContainerAfterClassTag,

    #[error("mismatched closing delimiter")]
    MismatchedClose,

    #[error("{0}")]
    Other(&'static str),
}

/// Structural misuse of the [`crate::writer::Writer`] event-sink API.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StructureErrorKind {
    #[error("end_* called with no open container")]
    NoOpenContainer,

    #[error("end_* kind does not match the innermost open container")]
    MismatchedEnd,

    #[error("a property/value may only be written inside an open container")]
    NotInContainer,

    #[error("begin()/end() may only be called once, at the top level")]
    AlreadyStarted,
}
