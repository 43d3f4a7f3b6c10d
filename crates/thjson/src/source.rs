//! The byte source: normalizes line endings, tracks 1-based line/column with
//! configurable tab expansion, and supports up to 3 bytes of look-ahead.
//!
//! A small ring buffers look-ahead for the `Read`-backed case, while the
//! in-memory slice case indexes directly with no ring at all.

use std::collections::VecDeque;
use std::io::Read;

use crate::Result;

const LOOKAHEAD: usize = 3;

enum Input<'a> {
    Slice { data: &'a [u8], pos: usize },
    Reader { reader: Box<dyn Read + 'a> },
}

/// Normalizes `\r\n`/`\r`/`\n` to `\n` and tracks 1-based `line`/`col` of the
/// next unread byte, over either an in-memory slice or a `Read` source.
pub struct ByteSource<'a> {
    input: Input<'a>,
    /// Look-ahead ring of already-normalized, not-yet-consumed bytes.
    ring: VecDeque<u8>,
    /// True if the byte just before the ring's front was `\r`, so a `\n`
    /// immediately following it collapses rather than producing a second
    /// line break.
    pending_cr: bool,
    eof: bool,
    line: usize,
    col: usize,
    tab_size: usize,
}

impl<'a> ByteSource<'a> {
    /// Builds a source over an in-memory byte slice.
    #[must_use]
    pub fn from_slice(data: &'a [u8], tab_size: usize) -> Self {
        assert!(tab_size > 0, "tab_size must be non-zero");
        Self {
            input: Input::Slice { data, pos: 0 },
            ring: VecDeque::new(),
            pending_cr: false,
            eof: false,
            line: 1,
            col: 1,
            tab_size,
        }
    }

    /// Builds a source over a sequential reader.
    pub fn from_reader<R: Read + 'a>(reader: R, tab_size: usize) -> Self {
        assert!(tab_size > 0, "tab_size must be non-zero");
        Self {
            input: Input::Reader {
                reader: Box::new(reader),
            },
            ring: VecDeque::new(),
            pending_cr: false,
            eof: false,
            line: 1,
            col: 1,
            tab_size,
        }
    }

    /// The 1-based line of the next unread byte.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// The 1-based column of the next unread byte.
    #[must_use]
    pub fn col(&self) -> usize {
        self.col
    }

    fn raw_next(&mut self) -> Result<Option<u8>> {
        match &mut self.input {
            Input::Slice { data, pos } => {
                if *pos >= data.len() {
                    Ok(None)
                } else {
                    let b = data[*pos];
                    *pos += 1;
                    Ok(Some(b))
                }
            }
            Input::Reader { reader } => {
                let mut buf = [0u8; 1];
                loop {
                    return match reader.read(&mut buf) {
                        Ok(0) => Ok(None),
                        Ok(_) => Ok(Some(buf[0])),
                        Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                        Err(e) => Err(e.into()),
                    };
                }
            }
        }
    }

    /// Pulls one more normalized byte into the ring, or marks EOF.
    fn fill_one(&mut self) -> Result<()> {
        if self.eof {
            return Ok(());
        }
        loop {
            match self.raw_next()? {
                None => {
                    self.eof = true;
                    return Ok(());
                }
                Some(b'\r') => {
                    self.ring.push_back(b'\n');
                    self.pending_cr = true;
                    return Ok(());
                }
                Some(b'\n') => {
                    if self.pending_cr {
                        // `\r\n` already emitted a single `\n`; swallow this
                        // one and keep looking for real content.
                        self.pending_cr = false;
                        continue;
                    }
                    self.ring.push_back(b'\n');
                    return Ok(());
                }
                Some(b) => {
                    self.pending_cr = false;
                    self.ring.push_back(b);
                    return Ok(());
                }
            }
        }
    }

    fn ensure(&mut self, n: usize) -> Result<()> {
        while self.ring.len() <= n && !self.eof {
            self.fill_one()?;
        }
        Ok(())
    }

    /// Peeks `n` bytes ahead (`n` in `0..=3`) without consuming.
    pub fn peek(&mut self, n: usize) -> Result<Option<u8>> {
        debug_assert!(n <= LOOKAHEAD);
        self.ensure(n)?;
        Ok(self.ring.get(n).copied())
    }

    /// Consumes and returns the next byte, updating `line`/`col`.
    pub fn read(&mut self) -> Result<Option<u8>> {
        self.ensure(0)?;
        let Some(b) = self.ring.pop_front() else {
            return Ok(None);
        };
        match b {
            b'\n' => {
                self.line += 1;
                self.col = 1;
            }
            b'\t' => {
                // Conventional 1-based tab stops: a tab at column 1 advances
                // to column tab_size + 1, not column tab_size. Column
                // accounting here is informational only (error reporting),
                // never grammar-affecting, so this reads naturally rather
                // than matching a 0-based tab-stop formula.
                let step = self.tab_size - ((self.col - 1) % self.tab_size);
                self.col += step;
            }
            _ => self.col += 1,
        }
        Ok(Some(b))
    }
}
