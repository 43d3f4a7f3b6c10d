#![allow(clippy::struct_excessive_bools)]

/// Configuration for [`crate::writer::Writer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterOptions {
    /// Indent with tab characters instead of `tab_size` spaces.
    ///
    /// # Default
    ///
    /// `false`
    pub use_tabs: bool,

    /// Column width of one indentation level (ignored when `use_tabs`).
    ///
    /// # Default
    ///
    /// `2`
    pub tab_size: usize,

    /// Wrap the root document's members in `{ }`.
    ///
    /// # Default
    ///
    /// `false`
    pub root_braces: bool,

    /// Prepend a `#thjson` header line.
    ///
    /// # Default
    ///
    /// `false`
    pub output_header: bool,

    /// Number of trailing blank lines after the last root member.
    ///
    /// # Default
    ///
    /// `0`
    pub root_gap: usize,

    /// Initial `setCompact` state for every newly opened container, absent
    /// an explicit call.
    ///
    /// # Default
    ///
    /// `false`
    pub default_compact: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            use_tabs: false,
            tab_size: 2,
            root_braces: false,
            output_header: false,
            root_gap: 0,
            default_compact: false,
        }
    }
}
