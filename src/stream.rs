//! Line-oriented input.
//!
//! Matching works on borrowed text and never performs I/O. A [`LineSource`]
//! supplies that text one line at a time from wherever it lives.

use std::io::{self, BufRead};

/// Supplies successive lines of text.
pub trait LineSource {
    /// Read the next line, without its terminator.
    /// \return Ok(None) at the end of input.
    fn read_line(&mut self) -> io::Result<Option<&str>>;
}

/// A [`LineSource`] over any [`BufRead`]. Buffering and refill are left to
/// the wrapped reader. Both "\n" and "\r\n" terminate a line.
#[derive(Debug)]
pub struct LineReader<R> {
    inner: R,
    line: String,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        LineReader {
            inner,
            line: String::new(),
        }
    }

    /// Consume the adapter, returning the wrapped reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: BufRead> LineSource for LineReader<R> {
    fn read_line(&mut self) -> io::Result<Option<&str>> {
        self.line.clear();
        if self.inner.read_line(&mut self.line)? == 0 {
            return Ok(None);
        }
        if self.line.ends_with('\n') {
            self.line.pop();
            if self.line.ends_with('\r') {
                self.line.pop();
            }
        }
        Ok(Some(&self.line))
    }
}
