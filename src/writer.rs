use crate::encoding::Encoding;
use crate::reader::Reader;
use core::fmt;
use core::marker::PhantomData;

/// An output cursor over a caller-owned buffer of code units.
///
/// Each successful write advances the cursor and stores a NUL unit at the new
/// position, if there is room for one. A write which does not fit changes
/// nothing. [`written`](Writer::written) is authoritative; the terminator is
/// a convenience for consumers of the raw buffer.
pub struct Writer<'b, E: Encoding> {
    units: &'b mut [E::Unit],
    cursor: usize,
    encoding: PhantomData<E>,
}

impl<'b, E: Encoding> Writer<'b, E> {
    pub fn new(units: &'b mut [E::Unit]) -> Self {
        let mut writer = Writer {
            units,
            cursor: 0,
            encoding: PhantomData,
        };
        writer.terminate();
        writer
    }

    #[inline]
    fn terminate(&mut self) {
        if let Some(unit) = self.units.get_mut(self.cursor) {
            *unit = E::Unit::default();
        }
    }

    /// \return true if at least one more unit fits.
    #[inline]
    pub fn valid(&self) -> bool {
        self.cursor < self.units.len()
    }

    /// Append the code point \p cp. \return false if it does not fit or
    /// cannot be encoded.
    pub fn write(&mut self, cp: u32) -> bool {
        match E::encode(cp, &mut self.units[self.cursor..]) {
            Some(len) => {
                self.cursor += len;
                self.terminate();
                true
            }
            None => false,
        }
    }

    /// Append all of the text of \p reader, transcoding as needed.
    /// \return false if the text was truncated.
    pub fn write_reader<F: Encoding>(&mut self, reader: &Reader<'_, F>) -> bool {
        reader.code_points().all(|cp| self.write(cp))
    }

    /// The units written so far.
    pub fn written(&self) -> &[E::Unit] {
        &self.units[..self.cursor]
    }

    /// The number of units written so far.
    pub fn len(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.cursor == 0
    }

    /// The number of units still free.
    pub fn remaining(&self) -> usize {
        self.units.len() - self.cursor
    }

    /// Discard everything written.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.terminate();
    }
}

impl<'b, E: Encoding> fmt::Write for Writer<'b, E> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if !self.write(c as u32) {
                return Err(fmt::Error);
            }
        }
        Ok(())
    }
}

impl<'b, E: Encoding> fmt::Debug for Writer<'b, E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Writer")
            .field("encoding", &E::NAME)
            .field("written", &self.written())
            .field("capacity", &self.units.len())
            .finish()
    }
}
