//! Writes a THJSON document from the same event shapes the parser emits to a
//! [`crate::Listener`].
//!
//! There is no intermediate tree here either: a caller drives [`Writer`] with
//! one call per structural event, in the exact nesting order it wants on the
//! page, and each container's rendered text is assembled bottom-up as its
//! `end_*` call closes it — the dual of the incremental parser rather than a
//! generic pretty-printer over an arbitrary value type.

mod base64;
mod classify;
mod options;

use std::io::Write as IoWrite;

use crate::error::{Result, StructureErrorKind};
use crate::event::{CommentKind, IntegerKind, Primitive};

pub use options::WriterOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Object,
    Map,
    List,
    Array,
}

impl FrameKind {
    fn delimiters(self) -> (&'static str, &'static str) {
        match self {
            FrameKind::Object | FrameKind::Map => ("{", "}"),
            FrameKind::List | FrameKind::Array => ("[", "]"),
        }
    }
}

struct Frame {
    kind: FrameKind,
    key: Option<String>,
    class: Option<String>,
    compact: bool,
    members: Vec<String>,
}

impl Frame {
    fn root(compact: bool) -> Self {
        Self {
            kind: FrameKind::Map,
            key: None,
            class: None,
            compact,
            members: Vec::new(),
        }
    }
}

/// Drives a THJSON document out to `W`, event call by event call.
///
/// Every `begin_*`/`end_*` pair must nest correctly and match in kind (a
/// `begin_list` closes with `end_list`, never `end_array`) — violations are
/// reported as [`crate::Error::Structure`] rather than panicking, since a
/// caller-driven API has no way to statically enforce call order.
pub struct Writer<W: IoWrite> {
    out: W,
    options: WriterOptions,
    stack: Vec<Frame>,
    started: bool,
    ended: bool,
}

impl<W: IoWrite> Writer<W> {
    pub fn new(out: W, options: WriterOptions) -> Self {
        Self {
            out,
            options,
            stack: Vec::new(),
            started: false,
            ended: false,
        }
    }

    /// Consumes the writer, returning the underlying sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn begin(&mut self) -> Result<()> {
        if self.started {
            return Err(StructureErrorKind::AlreadyStarted.into());
        }
        self.started = true;
        self.stack.push(Frame::root(self.options.default_compact));
        Ok(())
    }

    pub fn end(&mut self) -> Result<()> {
        if !self.started || self.ended {
            return Err(StructureErrorKind::AlreadyStarted.into());
        }
        if self.stack.len() != 1 {
            return Err(StructureErrorKind::NoOpenContainer.into());
        }
        self.ended = true;
        let root = self.stack.pop().expect("checked len == 1 above");
        let mut rendered = if self.options.root_braces {
            self.render_frame(&root)
        } else {
            root.members.join("\n")
        };
        if self.options.output_header {
            rendered = format!("#thjson\n{rendered}");
        }
        for _ in 0..self.options.root_gap {
            rendered.push('\n');
        }
        if !rendered.is_empty() {
            writeln!(self.out, "{rendered}")?;
        }
        Ok(())
    }

    pub fn begin_object(&mut self, key: &str, class: &str) -> Result<()> {
        self.push_frame(FrameKind::Object, Some(key), Some(class))
    }

    pub fn begin_object_value(&mut self, class: &str) -> Result<()> {
        self.push_frame(FrameKind::Object, None, Some(class))
    }

    pub fn begin_map(&mut self, key: &str) -> Result<()> {
        self.push_frame(FrameKind::Map, Some(key), None)
    }

    pub fn begin_map_value(&mut self) -> Result<()> {
        self.push_frame(FrameKind::Map, None, None)
    }

    pub fn begin_list(&mut self, key: &str, class: &str) -> Result<()> {
        self.push_frame(FrameKind::List, Some(key), Some(class))
    }

    pub fn begin_list_value(&mut self, class: &str) -> Result<()> {
        self.push_frame(FrameKind::List, None, Some(class))
    }

    pub fn begin_array(&mut self, key: &str) -> Result<()> {
        self.push_frame(FrameKind::Array, Some(key), None)
    }

    pub fn begin_array_value(&mut self) -> Result<()> {
        self.push_frame(FrameKind::Array, None, None)
    }

    pub fn end_object(&mut self) -> Result<()> {
        self.pop_frame(FrameKind::Object)
    }

    pub fn end_map(&mut self) -> Result<()> {
        self.pop_frame(FrameKind::Map)
    }

    pub fn end_list(&mut self) -> Result<()> {
        self.pop_frame(FrameKind::List)
    }

    pub fn end_array(&mut self) -> Result<()> {
        self.pop_frame(FrameKind::Array)
    }

    pub fn property(&mut self, key: &str, value: &Primitive<'_>) -> Result<()> {
        let line = format!("{}: {}", classify::classify_key(key), self.render_primitive(value));
        self.push_member(line)
    }

    pub fn value(&mut self, value: &Primitive<'_>) -> Result<()> {
        let line = self.render_primitive(value);
        self.push_member(line)
    }

    pub fn null_property(&mut self, key: &str) -> Result<()> {
        self.push_member(format!("{}: null", classify::classify_key(key)))
    }

    pub fn null_value(&mut self) -> Result<()> {
        self.push_member("null".to_string())
    }

    pub fn comment(&mut self, text: &str, kind: CommentKind) -> Result<()> {
        let compact = self.top_frame()?.compact;
        if compact {
            // Compact containers suppress interleaved comments entirely;
            // there is no single-line position left for them.
            return Ok(());
        }
        let line = match kind {
            CommentKind::SlashSlash => format!("// {text}"),
            CommentKind::Hash => format!("# {text}"),
            CommentKind::Block => format!("/* {text} */"),
        };
        self.push_member(line)
    }

    pub fn directive(&mut self, text: &str) -> Result<()> {
        self.push_member(format!("#{text}"))
    }

    /// Sets the compact flag of the innermost open container. Must be called
    /// before any member of that container is written, since layout is
    /// decided once, when the container closes.
    pub fn set_compact(&mut self, compact: bool) -> Result<()> {
        self.top_frame_mut()?.compact = compact;
        Ok(())
    }

    fn top_frame(&self) -> Result<&Frame> {
        self.stack.last().ok_or(StructureErrorKind::NotInContainer.into())
    }

    fn top_frame_mut(&mut self) -> Result<&mut Frame> {
        self.stack
            .last_mut()
            .ok_or(StructureErrorKind::NotInContainer.into())
    }

    fn push_member(&mut self, line: String) -> Result<()> {
        self.top_frame_mut()?.members.push(line);
        Ok(())
    }

    fn push_frame(&mut self, kind: FrameKind, key: Option<&str>, class: Option<&str>) -> Result<()> {
        if self.stack.is_empty() {
            return Err(StructureErrorKind::NotInContainer.into());
        }
        self.stack.push(Frame {
            kind,
            key: key.map(str::to_string),
            class: class.map(str::to_string),
            compact: self.options.default_compact,
            members: Vec::new(),
        });
        Ok(())
    }

    fn pop_frame(&mut self, want: FrameKind) -> Result<()> {
        if self.stack.len() <= 1 {
            return Err(StructureErrorKind::NoOpenContainer.into());
        }
        if self.stack.last().expect("checked non-empty above").kind != want {
            return Err(StructureErrorKind::MismatchedEnd.into());
        }
        let frame = self.stack.pop().expect("checked non-empty above");
        let rendered = self.render_frame(&frame);
        self.push_member(rendered)
    }

    fn indent_unit(&self) -> String {
        if self.options.use_tabs {
            "\t".to_string()
        } else {
            " ".repeat(self.options.tab_size)
        }
    }

    fn render_frame(&self, frame: &Frame) -> String {
        let (open, close) = frame.kind.delimiters();
        let mut prefix = String::new();
        if let Some(key) = &frame.key {
            prefix.push_str(&classify::classify_key(key));
            prefix.push_str(": ");
        }
        if let Some(class) = &frame.class {
            prefix.push('(');
            prefix.push_str(&classify::classify_single_line(class));
            prefix.push_str(") ");
        }

        if frame.members.is_empty() {
            return format!("{prefix}{open}{close}");
        }
        if frame.compact {
            return format!("{prefix}{open} {} {close}", frame.members.join(", "));
        }

        let unit = self.indent_unit();
        let mut body = String::new();
        for member in &frame.members {
            for line in member.split('\n') {
                body.push_str(&unit);
                body.push_str(line);
                body.push('\n');
            }
        }
        format!("{prefix}{open}\n{body}{close}")
    }

    fn render_primitive(&self, value: &Primitive<'_>) -> String {
        match value {
            Primitive::Null => "null".to_string(),
            Primitive::Boolean(b) => b.to_string(),
            Primitive::Integer(v, kind) => render_integer(*v, *kind),
            Primitive::Float(f) => render_float(*f),
            Primitive::Str(text, _kind) => classify::classify_string_value(text.as_str()),
            Primitive::Bytes(bytes, _kind) => base64::render_bytes(bytes.as_slice()),
        }
    }
}

/// Collapses `SIGNED` to plain decimal: the writer never emits a leading
/// `+`, so re-parsing a written document always yields `PLAIN` integers
/// except where `HEX`/`BINARY` was explicit.
fn render_integer(v: i32, kind: IntegerKind) -> String {
    match kind {
        IntegerKind::Hex => format!("0x{:X}", v as u32),
        IntegerKind::Binary => format!("%{:b}", v as u32),
        IntegerKind::Plain | IntegerKind::Signed => v.to_string(),
    }
}

/// `f32`'s `Display` is already shortest-round-trip, but a value like `5.0`
/// formats as `5`, which would reparse as `INTEGER`. Force a decimal point
/// or exponent marker to keep the primitive kind stable across a round trip.
fn render_float(f: f32) -> String {
    let s = f.to_string();
    if s.contains('.') || s.contains('e') || s.contains('E') || s.contains("inf") || s.contains("NaN") {
        s
    } else {
        format!("{s}.0")
    }
}
