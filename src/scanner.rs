//! A text-processing front end: a reader with a current position.

use crate::api::{Match, Pattern};
use crate::encoding::Encoding;
use crate::position::Cursor;
use crate::reader::Reader;

/// Applies patterns to a text one after another.
///
/// A Scanner holds a [`Reader`] and a cursor into it. `parse` and `search`
/// move the cursor past what they match; `validate` never moves it.
#[derive(Debug, Clone)]
pub struct Scanner<'t, E: Encoding> {
    input: Reader<'t, E>,
    cursor: Cursor,
    last: Option<Reader<'t, E>>,
}

impl<'t, E: Encoding> Scanner<'t, E> {
    /// Construct a scanner positioned at the start of \p input.
    pub fn new(input: Reader<'t, E>) -> Self {
        Scanner {
            input,
            cursor: input.begin(),
            last: None,
        }
    }

    pub fn input(&self) -> Reader<'t, E> {
        self.input
    }

    #[inline]
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Move the cursor to \p cursor, clamped to the input.
    pub fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor
            .furthest(self.input.begin())
            .nearest(self.input.end());
    }

    /// Return to the start of the input, forgetting the last match.
    pub fn reset(&mut self) {
        self.cursor = self.input.begin();
        self.last = None;
    }

    /// \return true if the cursor is at the end of the input.
    #[inline]
    pub fn is_eot(&self) -> bool {
        !self.input.valid(self.cursor)
    }

    /// The text matched by the most recent successful `parse` or `search`.
    pub fn last(&self) -> Option<Reader<'t, E>> {
        self.last
    }

    /// The text from the cursor to the end of the input.
    pub fn rest(&self) -> Reader<'t, E> {
        self.input.select(self.cursor, self.input.end())
    }

    /// Match \p pattern at the cursor, advancing past it on success.
    pub fn parse<P: Pattern>(&mut self, pattern: &P) -> bool {
        self.capture(pattern).is_some()
    }

    /// Like `parse`, also returning the extracted values.
    pub fn capture<P: Pattern>(&mut self, pattern: &P) -> Option<Match<'t, E>> {
        let m = pattern.capture(&self.input, &mut self.cursor)?;
        self.last = Some(m.text());
        Some(m)
    }

    /// \return true if \p pattern matches everything from the cursor to the
    /// end of the input. The cursor does not move.
    pub fn validate<P: Pattern>(&self, pattern: &P) -> bool {
        let mut probe = self.cursor;
        pattern.check(&self.input, &mut probe) && !self.input.valid(probe)
    }

    /// Find the first position at or after the cursor where \p pattern
    /// matches. On success the cursor moves past the match.
    pub fn search<P: Pattern>(&mut self, pattern: &P) -> Option<Match<'t, E>> {
        let mut start = self.cursor;
        loop {
            let mut probe = start;
            if let Some(m) = pattern.capture(&self.input, &mut probe) {
                self.cursor = probe;
                self.last = Some(m.text());
                return Some(m);
            }
            if !self.input.valid(start) {
                return None;
            }
            self.input.skip(&mut start);
        }
    }

    /// Iterate over successive non-overlapping matches of \p pattern, from
    /// the cursor onwards.
    pub fn matches<'s, P: Pattern>(&'s mut self, pattern: &'s P) -> Matches<'s, 't, P, E> {
        Matches {
            scanner: self,
            pattern,
            done: false,
        }
    }
}

impl<'t> From<&'t str> for Scanner<'t, crate::Utf8> {
    fn from(text: &'t str) -> Self {
        Scanner::new(Reader::from(text))
    }
}

/// An iterator over the matches of a pattern, produced by
/// [`Scanner::matches`].
#[derive(Debug)]
pub struct Matches<'s, 't, P: Pattern, E: Encoding> {
    scanner: &'s mut Scanner<'t, E>,
    pattern: &'s P,
    done: bool,
}

impl<'s, 't, P: Pattern, E: Encoding> Iterator for Matches<'s, 't, P, E> {
    type Item = Match<'t, E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let Some(m) = self.scanner.search(self.pattern) else {
            self.done = true;
            return None;
        };
        if m.start() == m.end() {
            // Step over an empty match so the next search makes progress.
            if self.scanner.is_eot() {
                self.done = true;
            } else {
                let mut cursor = self.scanner.cursor;
                self.scanner.input.skip(&mut cursor);
                self.scanner.cursor = cursor;
            }
        }
        Some(m)
    }
}
