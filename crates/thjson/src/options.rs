#![allow(clippy::struct_excessive_bools)]

/// Configuration options for the THJSON streaming parser.
///
/// These options control whitespace handling, tab expansion for column
/// accounting, and the recursion bound applied to function-call (`@text`)
/// expansion.
///
/// # Default
///
/// `tab_size` defaults to `4`; `max_recursion` defaults to `16`; every other
/// field defaults to `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Column width a tab character (`\t`) advances to, for line/column
    /// accounting only. Never rewrites input. Must be non-zero.
    ///
    /// # Default
    ///
    /// `4`
    pub tab_size: usize,

    /// Maximum nesting depth for function-call (`@text`) expansion before
    /// [`crate::Error::RecursionLimit`] is raised.
    ///
    /// # Default
    ///
    /// `16`
    pub max_recursion: usize,

    #[cfg(any(test, feature = "panic_on_error"))]
    /// Panic on syntax errors instead of returning them.
    ///
    /// Enabled only in test builds to produce backtraces on parse failures.
    pub panic_on_error: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            tab_size: 4,
            max_recursion: 16,
            #[cfg(any(test, feature = "panic_on_error"))]
            panic_on_error: false,
        }
    }
}
