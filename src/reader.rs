use crate::encoding::{Ascii, Encoding, Probe, Utf16, Utf32, Utf8};
use crate::position::Cursor;
use crate::util::to_char_lossy;
use core::fmt;
use core::marker::PhantomData;

/// A read-only view of the half-open range `[begin, end)` of a text buffer.
///
/// A Reader borrows its buffer and never modifies it. Cursors obtained from a
/// Reader are only meaningful for readers over the same buffer; `select`
/// derives narrower readers which share the buffer and so share cursors.
pub struct Reader<'t, E: Encoding> {
    units: &'t [E::Unit],
    begin: Cursor,
    end: Cursor,
    encoding: PhantomData<E>,
}

impl<'t, E: Encoding> Clone for Reader<'t, E> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<'t, E: Encoding> Copy for Reader<'t, E> {}

impl<'t, E: Encoding> Reader<'t, E> {
    /// Construct a reader over the entirety of \p units.
    #[inline]
    pub fn from_units(units: &'t [E::Unit]) -> Self {
        Reader {
            units,
            begin: Cursor::new(0),
            end: Cursor::new(units.len()),
            encoding: PhantomData,
        }
    }

    /// The first position of this reader.
    #[inline(always)]
    pub fn begin(&self) -> Cursor {
        self.begin
    }

    /// The position one past the last unit of this reader.
    #[inline(always)]
    pub fn end(&self) -> Cursor {
        self.end
    }

    /// \return true if \p cursor lies within `[begin, end)`.
    #[inline(always)]
    pub fn valid(&self, cursor: Cursor) -> bool {
        self.begin <= cursor && cursor < self.end
    }

    /// \return the code point and its length in units at \p cursor, which must
    /// be valid.
    #[inline(always)]
    fn decode(&self, cursor: Cursor) -> (u32, usize) {
        debug_assert!(self.valid(cursor), "Cursor out of range");
        E::decode(&self.units[cursor.offset()..self.end.offset()])
    }

    /// \return the code point at \p cursor without advancing, or NUL if the
    /// cursor is not valid.
    #[inline]
    pub fn peek(&self, cursor: Cursor) -> u32 {
        if self.valid(cursor) {
            self.decode(cursor).0
        } else {
            0
        }
    }

    /// Advance \p cursor by one code point. Does nothing if it is not valid.
    #[inline]
    pub fn skip(&self, cursor: &mut Cursor) {
        if self.valid(*cursor) {
            *cursor += self.decode(*cursor).1;
        }
    }

    /// Peek then skip. \return NUL if the cursor is not valid.
    #[inline]
    pub fn read(&self, cursor: &mut Cursor) -> u32 {
        self.next(cursor).unwrap_or(0)
    }

    /// Like `read`, but distinguishes the end of text from an embedded NUL.
    #[inline]
    pub fn next(&self, cursor: &mut Cursor) -> Option<u32> {
        if !self.valid(*cursor) {
            return None;
        }
        let (cp, len) = self.decode(*cursor);
        *cursor += len;
        Some(cp)
    }

    /// Derive a reader over `[from, to)` sharing this reader's buffer.
    /// Positions outside this reader are clamped to its bounds, and \p to is
    /// clamped to be no earlier than \p from.
    #[inline]
    pub fn select(&self, from: Cursor, to: Cursor) -> Self {
        let from = from.furthest(self.begin).nearest(self.end);
        let to = to.furthest(from).nearest(self.end);
        Reader {
            units: self.units,
            begin: from,
            end: to,
            encoding: PhantomData,
        }
    }

    /// The number of code units in this reader.
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.end - self.begin
    }

    /// The number of code units from \p cursor to the end of this reader.
    #[inline]
    pub fn remaining(&self, cursor: Cursor) -> usize {
        self.end - cursor.furthest(self.begin).nearest(self.end)
    }

    /// \return true if this reader contains no text.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// The code units of this reader.
    #[inline]
    pub fn units(&self) -> &'t [E::Unit] {
        &self.units[self.begin.offset()..self.end.offset()]
    }

    /// Iterate over the code points of this reader.
    pub fn code_points(&self) -> CodePoints<'t, E> {
        CodePoints {
            reader: *self,
            cursor: self.begin,
        }
    }

    /// \return true if \p other views the same buffer as this reader, so
    /// that cursors may be exchanged between them.
    #[inline]
    pub fn same_buffer(&self, other: &Self) -> bool {
        core::ptr::eq(self.units.as_ptr(), other.units.as_ptr())
            && self.units.len() == other.units.len()
    }

    /// Locate the literal \p needle at or after \p from, if this encoding
    /// supports a fast search. Offsets in the result are absolute.
    pub(crate) fn find_literal(&self, from: Cursor, needle: &[u32]) -> Probe {
        if !self.valid(from) && from != self.end {
            return Probe::Nowhere;
        }
        let haystack = &self.units[from.offset()..self.end.offset()];
        match E::find(haystack, needle) {
            Probe::At(idx) => Probe::At(from.offset() + idx),
            other => other,
        }
    }
}

impl<'t, E: Encoding> PartialEq for Reader<'t, E> {
    fn eq(&self, other: &Self) -> bool {
        self.same_buffer(other) && self.begin == other.begin && self.end == other.end
    }
}

impl<'t, E: Encoding> Eq for Reader<'t, E> {}

impl<'t, E: Encoding> fmt::Display for Reader<'t, E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use fmt::Write;
        for cp in self.code_points() {
            f.write_char(to_char_lossy(cp))?;
        }
        Ok(())
    }
}

impl<'t, E: Encoding> fmt::Debug for Reader<'t, E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Reader<{}>[{:?}..{:?}] {:?}",
            E::NAME,
            self.begin,
            self.end,
            self.to_string()
        )
    }
}

impl<'t> From<&'t str> for Reader<'t, Utf8> {
    fn from(text: &'t str) -> Self {
        Reader::from_units(text.as_bytes())
    }
}

impl<'t> From<&'t [u8]> for Reader<'t, Ascii> {
    fn from(bytes: &'t [u8]) -> Self {
        Reader::from_units(bytes)
    }
}

impl<'t> From<&'t [u16]> for Reader<'t, Utf16> {
    fn from(units: &'t [u16]) -> Self {
        Reader::from_units(units)
    }
}

impl<'t> From<&'t [u32]> for Reader<'t, Utf32> {
    fn from(units: &'t [u32]) -> Self {
        Reader::from_units(units)
    }
}

/// An iterator over the code points of a Reader.
#[derive(Debug, Clone)]
pub struct CodePoints<'t, E: Encoding> {
    reader: Reader<'t, E>,
    cursor: Cursor,
}

impl<'t, E: Encoding> Iterator for CodePoints<'t, E> {
    type Item = u32;

    #[inline]
    fn next(&mut self) -> Option<u32> {
        self.reader.next(&mut self.cursor)
    }
}
