//! The THJSON parser: drives a [`ByteSource`] to completion, emitting
//! structural events to a [`Listener`].
//!
//! This parser consumes a fully available byte buffer or a sequential reader
//! and never suspends, so a single `run()` call that walks the source to
//! completion is all that's needed — there is no incremental `feed()`/resume
//! machinery to maintain. Container recursion (objects/maps/arrays/lists
//! nesting inside one another) is ordinary Rust call recursion — only
//! function-call (`@text`) expansion carries an explicit, bounded depth
//! counter (`MAX_RECURSION`), since that is the one place user input controls
//! how deep the stack can go irrespective of the document's own literal
//! nesting.

mod escape;

use crate::classify::{classify, PrimitiveKind};
use crate::error::{Error, Result, SyntaxErrorKind};
use crate::event::{Bytes, CommentKind, IntegerKind, Primitive, StringKind, Text};
use crate::listener::Listener;
use crate::options::ParserOptions;
use crate::source::ByteSource;
use escape::UnicodeEscapeBuffer;

/// Whether the value about to be parsed belongs to a key (`Property`-style
/// events) or stands alone (`Value`-style events).
enum Slot {
    Keyed(String),
    Anon,
}

/// How a quoteless scan ended, decided by the single byte it stopped on.
enum QuotelessEnd {
    /// Stopped at `:` — the scanned text is a key, not a value.
    Colon,
    /// Stopped at `{` (`false`) or `[` (`true`) — the scanned text is a
    /// bareword class tag for the container that follows.
    Open(bool),
    /// Stopped at anything else (`,`, `#`, `//`, `/*`, a closing delimiter,
    /// a newline, or EOF) without consuming it.
    Other,
}

/// Whether `:` ends a quoteless scan (member position) or is a syntax error
/// (a value can never itself contain an unescaped `:`).
#[derive(Clone, Copy, PartialEq, Eq)]
enum TokenMode {
    MemberOrValue,
    ValueOnly,
}

/// The streaming THJSON parser.
///
/// `Parser` holds no listener; one is passed to [`Parser::run`] so a single
/// parser can be reused (notably, nested parsers created for function-call
/// expansion share the caller's listener without taking ownership of it).
pub struct Parser<'a> {
    source: ByteSource<'a>,
    options: ParserOptions,
    depth: usize,
}

impl<'a> Parser<'a> {
    #[must_use]
    pub fn new(source: ByteSource<'a>, options: ParserOptions) -> Self {
        Self {
            source,
            options,
            depth: 0,
        }
    }

    /// Drives `listener` with every event of the document, in source order.
    pub fn run(&mut self, listener: &mut impl Listener) -> Result<()> {
        self.run_dyn(listener)
    }

    fn run_dyn(&mut self, listener: &mut dyn Listener) -> Result<()> {
        listener.begin();
        self.skip_ws_and_comments(listener, true)?;
        if self.peek0()? == Some(b'{') {
            self.advance_byte()?;
            self.parse_map_body(listener, true, true)?;
        } else {
            self.parse_map_body(listener, false, true)?;
        }
        listener.end();
        Ok(())
    }

    // ---- position/error helpers -----------------------------------------

    fn err(&self, kind: SyntaxErrorKind) -> Error {
        Error::Syntax {
            kind,
            line: self.source.line(),
            column: self.source.col(),
        }
    }

    fn peek0(&mut self) -> Result<Option<u8>> {
        self.source.peek(0)
    }

    fn peek(&mut self, n: usize) -> Result<Option<u8>> {
        self.source.peek(n)
    }

    fn advance_byte(&mut self) -> Result<u8> {
        self.source
            .read()?
            .ok_or_else(|| self.err(SyntaxErrorKind::UnexpectedEof))
    }

    /// Reads one full UTF-8 scalar value, trusting the source is valid UTF-8
    /// (the grammar admits no other encoding).
    fn read_char(&mut self) -> Result<char> {
        let b0 = self.advance_byte()?;
        if b0 < 0x80 {
            return Ok(b0 as char);
        }
        let len = if b0 >= 0xF0 {
            4
        } else if b0 >= 0xE0 {
            3
        } else {
            2
        };
        let mut buf = [0u8; 4];
        buf[0] = b0;
        for slot in buf.iter_mut().take(len).skip(1) {
            *slot = self.advance_byte()?;
        }
        std::str::from_utf8(&buf[..len])
            .ok()
            .and_then(|s| s.chars().next())
            .ok_or_else(|| self.err(SyntaxErrorKind::Other("invalid utf-8 sequence")))
    }

    // ---- whitespace / comments / directives -----------------------------

    fn skip_ws(&mut self) -> Result<()> {
        loop {
            match self.peek0()? {
                Some(b' ' | b'\t' | b'\n') => {
                    self.advance_byte()?;
                }
                _ => return Ok(()),
            }
        }
    }

    fn skip_inline_ws(&mut self) -> Result<()> {
        self.skip_ws()
    }

    /// Skips whitespace, comments, and (only at root member position)
    /// directives, dispatching each comment/directive to the listener.
    fn skip_ws_and_comments(&mut self, listener: &mut dyn Listener, root: bool) -> Result<()> {
        loop {
            self.skip_ws()?;
            match self.peek0()? {
                Some(b'#') if root => {
                    self.advance_byte()?;
                    let text = self.read_to_eol_or_comment()?;
                    listener.directive(&text);
                }
                Some(b'#') => {
                    let text = self.read_line_comment(1)?;
                    listener.comment(&text, CommentKind::Hash);
                }
                Some(b'/') if self.peek(1)? == Some(b'/') => {
                    let text = self.read_line_comment(2)?;
                    listener.comment(&text, CommentKind::SlashSlash);
                }
                Some(b'/') if self.peek(1)? == Some(b'*') => {
                    let text = self.read_block_comment()?;
                    listener.comment(&text, CommentKind::Block);
                }
                _ => return Ok(()),
            }
        }
    }

    fn read_line_comment(&mut self, marker_len: usize) -> Result<String> {
        for _ in 0..marker_len {
            self.advance_byte()?;
        }
        let mut s = String::new();
        loop {
            match self.peek0()? {
                None | Some(b'\n') => return Ok(s),
                Some(_) => s.push(self.read_char()?),
            }
        }
    }

    fn read_block_comment(&mut self) -> Result<String> {
        self.advance_byte()?;
        self.advance_byte()?;
        let mut s = String::new();
        loop {
            if self.peek0()? == Some(b'*') && self.peek(1)? == Some(b'/') {
                self.advance_byte()?;
                self.advance_byte()?;
                return Ok(s);
            }
            if self.peek0()?.is_none() {
                return Err(self.err(SyntaxErrorKind::UnexpectedEof));
            }
            s.push(self.read_char()?);
        }
    }

    /// Text up to a newline, EOF, or a comment marker, trimmed. Shared by
    /// directives and function calls.
    fn read_to_eol_or_comment(&mut self) -> Result<String> {
        let mut s = String::new();
        loop {
            match self.peek0()? {
                None | Some(b'\n') => break,
                Some(b'/') if matches!(self.peek(1)?, Some(b'/' | b'*')) => break,
                Some(_) => s.push(self.read_char()?),
            }
        }
        Ok(s.trim().to_string())
    }

    // ---- container bodies ------------------------------------------------

    /// Parses `members*` either up to a matching `}` (`braced`) or to EOF
    /// (root without braces). `root` controls whether a leading `#` is a
    /// directive, which is only recognized at root level between members, or
    /// an ordinary hash comment.
    fn parse_map_body(
        &mut self,
        listener: &mut dyn Listener,
        braced: bool,
        root: bool,
    ) -> Result<()> {
        loop {
            self.skip_ws_and_comments(listener, root)?;
            match self.peek0()? {
                None if braced => return Err(self.err(SyntaxErrorKind::UnexpectedEof)),
                None => return Ok(()),
                Some(b'}') if braced => {
                    self.advance_byte()?;
                    return Ok(());
                }
                Some(b',') => {
                    self.advance_byte()?;
                }
                _ => self.parse_member_or_anon(listener, root)?,
            }
        }
    }

    fn parse_array_body(&mut self, listener: &mut dyn Listener) -> Result<()> {
        loop {
            self.skip_ws_and_comments(listener, false)?;
            match self.peek0()? {
                None => return Err(self.err(SyntaxErrorKind::UnexpectedEof)),
                Some(b']') => {
                    self.advance_byte()?;
                    return Ok(());
                }
                Some(b',') => {
                    self.advance_byte()?;
                }
                _ => {
                    self.parse_value_body(listener, Slot::Anon, true)?;
                    self.skip_ws_and_comments(listener, false)?;
                    if self.peek0()? == Some(b',') {
                        self.advance_byte()?;
                    }
                }
            }
        }
    }

    /// Reads one member (`key ':' value`) or, lacking a `:`, one anonymous
    /// value directly at object/root position. Keys and anonymous values
    /// share the same leading scan; which one this is gets decided from the
    /// terminating byte rather than guessed up front.
    fn parse_member_or_anon(&mut self, listener: &mut dyn Listener, root: bool) -> Result<()> {
        match self.peek0()? {
            Some(b'#') if root => {
                self.advance_byte()?;
                let text = self.read_to_eol_or_comment()?;
                listener.directive(&text);
                return Ok(());
            }
            Some(b'"') => {
                let text = self.read_quoted_string()?;
                self.skip_inline_ws()?;
                if self.peek0()? == Some(b':') {
                    self.advance_byte()?;
                    self.skip_ws_and_comments(listener, false)?;
                    self.parse_value_body(listener, Slot::Keyed(text), false)?;
                } else {
                    listener.value(&Primitive::Str(Text::Owned(text), StringKind::SingleLine));
                }
            }
            Some(_) => {
                let (text, end) = self.scan_quoteless(TokenMode::MemberOrValue, false)?;
                match end {
                    QuotelessEnd::Colon => {
                        self.advance_byte()?;
                        self.skip_ws_and_comments(listener, false)?;
                        self.parse_value_body(listener, Slot::Keyed(text), false)?;
                    }
                    QuotelessEnd::Open(is_list) => {
                        if text.is_empty() {
                            self.open_untyped_container(listener, &Slot::Anon, is_list)?;
                        } else {
                            self.open_tagged_container(listener, &Slot::Anon, text, is_list)?;
                        }
                    }
                    QuotelessEnd::Other => {
                        self.emit_classified(listener, &Slot::Anon, text);
                    }
                }
            }
            None => return Err(self.err(SyntaxErrorKind::UnexpectedEof)),
        }
        self.skip_ws_and_comments(listener, false)?;
        if self.peek0()? == Some(b',') {
            self.advance_byte()?;
        }
        Ok(())
    }

    /// Parses one value (after `key ':'`, as an array element, or as an
    /// already-dispatched anonymous value) and emits the matching
    /// `property`/`value`-family events for `slot`. `in_array` is `true` only
    /// when this value is one element of an enclosing `[...]`/list body,
    /// which changes how a bare (unquoted) comma inside it is read — see
    /// `scan_quoteless`.
    fn parse_value_body(&mut self, listener: &mut dyn Listener, slot: Slot, in_array: bool) -> Result<()> {
        match self.peek0()? {
            None => Err(self.err(SyntaxErrorKind::UnexpectedEof)),
            Some(b'"') => {
                let text = self.read_quoted_string()?;
                self.emit_primitive(
                    listener,
                    &slot,
                    Primitive::Str(Text::Owned(text), StringKind::SingleLine),
                );
                Ok(())
            }
            Some(b'\'') if self.peek(1)? == Some(b'\'') && self.peek(2)? == Some(b'\'') => {
                let text = self.read_triple_quoted_string()?;
                self.emit_primitive(
                    listener,
                    &slot,
                    Primitive::Str(Text::Owned(text), StringKind::MultiLine),
                );
                Ok(())
            }
            Some(b'`') => {
                let bytes = self.read_quoted_bytes()?;
                self.emit_primitive(
                    listener,
                    &slot,
                    Primitive::Bytes(Bytes::Owned(bytes), StringKind::SingleLine),
                );
                Ok(())
            }
            Some(b'<') if self.peek(1)? == Some(b'<') && self.peek(2)? == Some(b'<') => {
                let bytes = self.read_triple_bytes()?;
                self.emit_primitive(
                    listener,
                    &slot,
                    Primitive::Bytes(Bytes::Owned(bytes), StringKind::MultiLine),
                );
                Ok(())
            }
            Some(b'{') => {
                self.advance_byte()?;
                self.begin_map_for(listener, &slot);
                self.parse_map_body(listener, true, false)?;
                listener.end_map();
                Ok(())
            }
            Some(b'[') => {
                self.advance_byte()?;
                self.begin_array_for(listener, &slot);
                self.parse_array_body(listener)?;
                listener.end_array();
                Ok(())
            }
            Some(b'(') => {
                let class = self.read_paren_class_name()?;
                self.skip_inline_ws()?;
                match self.peek0()? {
                    Some(b'{') => self.open_tagged_container(listener, &slot, class, false),
                    Some(b'[') => self.open_tagged_container(listener, &slot, class, true),
                    _ => Err(self.err(SyntaxErrorKind::ExpectedContainerAfterClassTag)),
                }
            }
            Some(b'@') => self.handle_function_call(listener, slot, in_array),
            Some(_) => {
                let (text, end) = self.scan_quoteless(TokenMode::ValueOnly, in_array)?;
                match end {
                    QuotelessEnd::Colon => unreachable!("ValueOnly mode never yields Colon"),
                    QuotelessEnd::Open(is_list) => {
                        if text.is_empty() {
                            self.open_untyped_container(listener, &slot, is_list)
                        } else {
                            self.open_tagged_container(listener, &slot, text, is_list)
                        }
                    }
                    QuotelessEnd::Other => {
                        self.emit_classified(listener, &slot, text);
                        Ok(())
                    }
                }
            }
        }
    }

    fn handle_function_call(&mut self, listener: &mut dyn Listener, slot: Slot, in_array: bool) -> Result<()> {
        self.advance_byte()?; // '@'
        let text = self.read_to_eol_or_comment()?;
        if self.depth + 1 > self.options.max_recursion {
            return Err(Error::RecursionLimit {
                line: self.source.line(),
                column: self.source.col(),
            });
        }
        let expanded = listener.function(&text);
        let mut nested = Parser {
            source: ByteSource::from_slice(expanded.as_bytes(), self.options.tab_size),
            options: self.options,
            depth: self.depth + 1,
        };
        nested.parse_value_body(listener, slot, in_array)
    }

    // ---- class tags --------------------------------------------------------

    fn read_paren_class_name(&mut self) -> Result<String> {
        self.advance_byte()?; // '('
        self.skip_inline_ws()?;
        let name = if self.peek0()? == Some(b'"') {
            self.read_quoted_string()?
        } else {
            let mut s = String::new();
            loop {
                match self.peek0()? {
                    Some(b')') | None => break,
                    Some(b' ' | b'\t' | b'\n') => break,
                    Some(_) => s.push(self.read_char()?),
                }
            }
            s
        };
        self.skip_inline_ws()?;
        if self.peek0()? != Some(b')') {
            return Err(self.err(SyntaxErrorKind::Other("expected ')' closing class tag")));
        }
        self.advance_byte()?;
        if name.is_empty() {
            return Err(self.err(SyntaxErrorKind::EmptyClassTag));
        }
        Ok(name)
    }

    fn open_tagged_container(
        &mut self,
        listener: &mut dyn Listener,
        slot: &Slot,
        class: String,
        is_list: bool,
    ) -> Result<()> {
        if class.is_empty() {
            return Err(self.err(SyntaxErrorKind::EmptyClassTag));
        }
        if is_list {
            self.advance_byte()?; // '['
            match slot {
                Slot::Keyed(key) => listener.begin_list(key, &class),
                Slot::Anon => listener.begin_list_value(&class),
            }
            self.parse_array_body(listener)?;
            listener.end_list();
        } else {
            self.advance_byte()?; // '{'
            match slot {
                Slot::Keyed(key) => listener.begin_object(key, &class),
                Slot::Anon => listener.begin_object_value(&class),
            }
            self.parse_map_body(listener, true, false)?;
            listener.end_object();
        }
        Ok(())
    }

    /// Opens an anonymous, untyped `{...}`/`[...]` reached via the quoteless
    /// scanner with no class-tag text before it (an empty class tag is only
    /// an error when a tag was actually attempted, e.g. `() {`/`(): {`).
    fn open_untyped_container(&mut self, listener: &mut dyn Listener, slot: &Slot, is_list: bool) -> Result<()> {
        if is_list {
            self.advance_byte()?; // '['
            self.begin_array_for(listener, slot);
            self.parse_array_body(listener)?;
            listener.end_array();
        } else {
            self.advance_byte()?; // '{'
            self.begin_map_for(listener, slot);
            self.parse_map_body(listener, true, false)?;
            listener.end_map();
        }
        Ok(())
    }

    fn begin_map_for(&self, listener: &mut dyn Listener, slot: &Slot) {
        match slot {
            Slot::Keyed(key) => listener.begin_map(key),
            Slot::Anon => listener.begin_map_value(),
        }
    }

    fn begin_array_for(&self, listener: &mut dyn Listener, slot: &Slot) {
        match slot {
            Slot::Keyed(key) => listener.begin_array(key),
            Slot::Anon => listener.begin_array_value(),
        }
    }

    fn emit_primitive(&self, listener: &mut dyn Listener, slot: &Slot, value: Primitive<'_>) {
        match slot {
            Slot::Keyed(key) => listener.property(key, &value),
            Slot::Anon => listener.value(&value),
        }
    }

    fn emit_classified(&self, listener: &mut dyn Listener, slot: &Slot, text: String) {
        let kind = classify(&text);
        if matches!(kind, PrimitiveKind::Null) {
            match slot {
                Slot::Keyed(key) => listener.null_property(key),
                Slot::Anon => listener.null_value(),
            }
            return;
        }
        let value = primitive_from_classified(kind, text);
        self.emit_primitive(listener, slot, value);
    }

    // ---- quoteless scanning ------------------------------------------------

    /// The shared scanner behind both key and quoteless-value reading:
    /// structural terminators `{ } [ ] : #`, a comment start, a newline, or
    /// EOF all stop the scan without being consumed.
    ///
    /// A comma's handling depends on `in_array`: as an array/list element
    /// (`in_array`), a comma always separates elements — `[sword, axe]` is
    /// two values, never one string containing a literal comma. Outside an
    /// array (a member's own value, or a root-level anonymous value), a
    /// comma only stops the scan once the text collected so far already
    /// classifies as a literal (`a, b c` stays one string; `1, 2` is two
    /// values only because each side of the comma sits inside its own
    /// `[...]`); otherwise the comma is ordinary content.
    fn scan_quoteless(&mut self, mode: TokenMode, in_array: bool) -> Result<(String, QuotelessEnd)> {
        let mut text = String::new();
        loop {
            match self.peek0()? {
                None | Some(b'\n') => return Ok((text.trim_end().to_string(), QuotelessEnd::Other)),
                Some(b'{') => return Ok((text.trim_end().to_string(), QuotelessEnd::Open(false))),
                Some(b'[') => return Ok((text.trim_end().to_string(), QuotelessEnd::Open(true))),
                Some(b'}' | b']') => {
                    return Ok((text.trim_end().to_string(), QuotelessEnd::Other))
                }
                Some(b'#') => return Ok((text.trim_end().to_string(), QuotelessEnd::Other)),
                Some(b':') => {
                    if mode == TokenMode::ValueOnly {
                        return Err(self.err(SyntaxErrorKind::UnexpectedByte(':')));
                    }
                    return Ok((text.trim_end().to_string(), QuotelessEnd::Colon));
                }
                Some(b'/') if matches!(self.peek(1)?, Some(b'/' | b'*')) => {
                    return Ok((text.trim_end().to_string(), QuotelessEnd::Other))
                }
                Some(b',') if in_array => {
                    return Ok((text.trim_end().to_string(), QuotelessEnd::Other))
                }
                Some(b',') => {
                    let trimmed = text.trim_end();
                    let is_literal = matches!(
                        classify(trimmed),
                        PrimitiveKind::Null
                            | PrimitiveKind::Boolean(_)
                            | PrimitiveKind::Integer(_)
                            | PrimitiveKind::Float
                    );
                    if is_literal {
                        return Ok((trimmed.to_string(), QuotelessEnd::Other));
                    }
                    self.advance_byte()?;
                    text.push(',');
                }
                Some(_) => text.push(self.read_char()?),
            }
        }
    }

    // ---- quoted / triple-quoted strings ------------------------------------

    fn read_quoted_string(&mut self) -> Result<String> {
        self.advance_byte()?; // opening '"'
        let mut out = String::new();
        loop {
            match self.peek0()? {
                None => return Err(self.err(SyntaxErrorKind::UnexpectedEof)),
                Some(b'"') => {
                    self.advance_byte()?;
                    return Ok(out);
                }
                Some(b'\n') => return Err(self.err(SyntaxErrorKind::NewlineInQuotedString)),
                Some(b'\\') => {
                    self.advance_byte()?;
                    self.read_escape(&mut out, b'"')?;
                }
                Some(_) => out.push(self.read_char()?),
            }
        }
    }

    /// `quote_char` is the delimiter-specific escape (`\"` inside quoted
    /// strings, `\'` inside triple-quoted strings); every other escape is
    /// shared.
    fn read_escape(&mut self, out: &mut String, quote_char: u8) -> Result<()> {
        let b = self.advance_byte()?;
        match b {
            b'n' => out.push('\n'),
            b'r' => out.push('\r'),
            b't' => out.push('\t'),
            b'b' => out.push('\u{8}'),
            b'f' => out.push('\u{c}'),
            b'\\' => out.push('\\'),
            b'u' => out.push(self.read_unicode_escape()?),
            other if other == quote_char => out.push(other as char),
            other if other.is_ascii() => {
                return Err(self.err(SyntaxErrorKind::InvalidUnicodeEscapeChar(other as char)))
            }
            _ => return Err(self.err(SyntaxErrorKind::Other("invalid escape sequence"))),
        }
        Ok(())
    }

    fn read_unicode_escape(&mut self) -> Result<char> {
        let mut buf = UnicodeEscapeBuffer::new();
        for _ in 0..4 {
            let b = self.advance_byte()?;
            if let Some(ch) = buf.feed(b as char).map_err(|kind| self.err(kind))? {
                return Ok(ch);
            }
        }
        unreachable!("UnicodeEscapeBuffer yields a char on the fourth digit")
    }

    fn discard_align_ws(&mut self, align: usize) -> Result<()> {
        loop {
            match self.peek0()? {
                Some(b' ' | b'\t') if self.source.col() <= align => {
                    self.advance_byte()?;
                }
                _ => return Ok(()),
            }
        }
    }

    fn at_triple_quote_close(&mut self) -> Result<bool> {
        Ok(self.peek0()? == Some(b'\'') && self.peek(1)? == Some(b'\'') && self.peek(2)? == Some(b'\''))
    }

    /// Reads a `''' ... '''` string, applying column-aligned de-indentation:
    /// a whitespace-only first line is discarded entirely;
    /// otherwise only its leading run is trimmed. Every subsequent line has
    /// leading whitespace discarded up to (and including) the column the
    /// opening delimiter started on. The final newline immediately before
    /// the closing delimiter is stripped.
    fn read_triple_quoted_string(&mut self) -> Result<String> {
        let align = self.source.col();
        for _ in 0..3 {
            self.advance_byte()?;
        }
        let mut out = String::new();
        loop {
            match self.peek0()? {
                Some(b' ' | b'\t') => {
                    self.advance_byte()?;
                }
                _ => break,
            }
        }
        if self.peek0()? == Some(b'\n') {
            self.advance_byte()?;
            self.discard_align_ws(align)?;
        }
        loop {
            if self.at_triple_quote_close()? {
                for _ in 0..3 {
                    self.advance_byte()?;
                }
                if out.ends_with('\n') {
                    out.pop();
                }
                return Ok(out);
            }
            match self.peek0()? {
                None => return Err(self.err(SyntaxErrorKind::UnexpectedEof)),
                Some(b'\n') => {
                    self.advance_byte()?;
                    out.push('\n');
                    self.discard_align_ws(align)?;
                }
                Some(b'\\') => {
                    self.advance_byte()?;
                    self.read_escape(&mut out, b'\'')?;
                }
                Some(_) => out.push(self.read_char()?),
            }
        }
    }

    // ---- byte literals ------------------------------------------------------

    fn read_quoted_bytes(&mut self) -> Result<Vec<u8>> {
        self.advance_byte()?; // opening '`'
        let mut body = String::new();
        loop {
            match self.peek0()? {
                None => return Err(self.err(SyntaxErrorKind::UnexpectedEof)),
                Some(b'`') => {
                    self.advance_byte()?;
                    break;
                }
                Some(b) if b.is_ascii_whitespace() => {
                    self.advance_byte()?;
                }
                Some(b) if is_base64_byte(b) => {
                    self.advance_byte()?;
                    body.push(b as char);
                }
                Some(_) => return Err(self.err(SyntaxErrorKind::InvalidBase64)),
            }
        }
        decode_base64(&body).map_err(|()| self.err(SyntaxErrorKind::InvalidBase64))
    }

    fn read_triple_bytes(&mut self) -> Result<Vec<u8>> {
        for _ in 0..3 {
            self.advance_byte()?; // '<<<'
        }
        let mut body = String::new();
        loop {
            if self.peek0()? == Some(b'>') && self.peek(1)? == Some(b'>') && self.peek(2)? == Some(b'>')
            {
                for _ in 0..3 {
                    self.advance_byte()?;
                }
                break;
            }
            match self.peek0()? {
                None => return Err(self.err(SyntaxErrorKind::UnexpectedEof)),
                Some(b) if b.is_ascii_whitespace() => {
                    self.advance_byte()?;
                }
                Some(b) if is_base64_byte(b) => {
                    self.advance_byte()?;
                    body.push(b as char);
                }
                Some(_) => return Err(self.err(SyntaxErrorKind::InvalidBase64)),
            }
        }
        decode_base64(&body).map_err(|()| self.err(SyntaxErrorKind::InvalidBase64))
    }
}

fn is_base64_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'+' || b == b'/' || b == b'='
}

fn decode_base64(body: &str) -> std::result::Result<Vec<u8>, ()> {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    STANDARD.decode(body).map_err(|_| ())
}

/// Converts a classified quoteless span into a [`Primitive`], applying
/// numeric conversion and overflow-driven demotion to `STRING` — not an
/// error, just a less specific primitive kind.
fn primitive_from_classified(kind: PrimitiveKind, text: String) -> Primitive<'static> {
    match kind {
        PrimitiveKind::Null => Primitive::Null,
        PrimitiveKind::Boolean(b) => Primitive::Boolean(b),
        PrimitiveKind::Float => match text.parse::<f32>() {
            Ok(f) => Primitive::Float(f),
            Err(_) => Primitive::Str(Text::Owned(text), StringKind::SingleLine),
        },
        PrimitiveKind::Integer(ik) => match integer_bits(ik, &text) {
            Some(v) => Primitive::Integer(v, ik),
            None => Primitive::Str(Text::Owned(text), StringKind::SingleLine),
        },
        PrimitiveKind::Str => Primitive::Str(Text::Owned(text), StringKind::SingleLine),
    }
}

/// Parses the magnitude for each integer sub-kind and narrows it to a
/// 32-bit word, demoting to `None` (→ `STRING`) on overflow. Hex and binary
/// literals are reinterpreted as the bit pattern of a 32-bit word (so
/// `0xFFFFFFFF` decodes to `-1`); plain/signed decimal is range-checked.
fn integer_bits(kind: IntegerKind, text: &str) -> Option<i32> {
    match kind {
        IntegerKind::Plain | IntegerKind::Signed => {
            let v: i64 = text.parse().ok()?;
            i32::try_from(v).ok()
        }
        IntegerKind::Hex => {
            let v = u64::from_str_radix(text.strip_prefix("0x")?, 16).ok()?;
            u32::try_from(v).ok().map(|v| v as i32)
        }
        IntegerKind::Binary => {
            let v = u64::from_str_radix(text.strip_prefix('%')?, 2).ok()?;
            u32::try_from(v).ok().map(|v| v as i32)
        }
    }
}

#[cfg(test)]
mod tests;
