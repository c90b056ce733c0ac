//! Text encodings understood by [`Reader`](crate::Reader) and
//! [`Writer`](crate::Writer).
//!
//! An encoding describes how code points are laid out as code units. All
//! width-specific stepping lives here; filters and combinators only ever see
//! whole code points.

use crate::util::{is_high_surrogate, is_low_surrogate, utf16_pair, utf8_decode, REPLACEMENT};
use core::fmt;

/// The outcome of searching for a literal in a run of code units.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Probe {
    /// The literal begins at this many units from the start of the haystack.
    At(usize),

    /// The literal does not occur.
    Nowhere,

    /// This encoding has no fast search for this literal; scan instead.
    Unsupported,
}

/// A mapping between code points and code units.
pub trait Encoding: fmt::Debug + Copy + Clone + Default + Send + Sync + 'static {
    /// The code unit type. The default value is the NUL terminator.
    type Unit: Copy + Eq + Default + fmt::Debug + Send + Sync + 'static;

    /// A short name for the encoding.
    const NAME: &'static str;

    /// Decode the code point at the start of \p units, which is non-empty.
    /// \return the code point and the number of units it occupies, which is
    /// at least one. Undecodable input yields some code point and always
    /// makes progress.
    fn decode(units: &[Self::Unit]) -> (u32, usize);

    /// Encode \p cp into the front of \p out.
    /// \return the number of units written, or None if \p cp is not
    /// representable or \p out is too small.
    fn encode(cp: u32, out: &mut [Self::Unit]) -> Option<usize>;

    /// Find the first occurrence of the code points \p needle in \p haystack,
    /// where the haystack begins at a code point boundary.
    #[inline]
    fn find(haystack: &[Self::Unit], needle: &[u32]) -> Probe {
        let _ = (haystack, needle);
        Probe::Unsupported
    }
}

/// Search bytes for bytes, via memchr.
fn find_bytes(haystack: &[u8], needle: &[u8]) -> Probe {
    let found = match needle {
        [b] => memchr::memchr(*b, haystack),
        _ => memchr::memmem::find(haystack, needle),
    };
    match found {
        Some(idx) => Probe::At(idx),
        None => Probe::Nowhere,
    }
}

/// Single byte text. Each byte is one code point in 0..=255.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Ascii;

impl Encoding for Ascii {
    type Unit = u8;
    const NAME: &'static str = "ascii";

    #[inline(always)]
    fn decode(units: &[u8]) -> (u32, usize) {
        (units[0] as u32, 1)
    }

    #[inline]
    fn encode(cp: u32, out: &mut [u8]) -> Option<usize> {
        let byte = u8::try_from(cp).ok()?;
        *out.first_mut()? = byte;
        Some(1)
    }

    fn find(haystack: &[u8], needle: &[u32]) -> Probe {
        let mut bytes = Vec::with_capacity(needle.len());
        for &cp in needle {
            match u8::try_from(cp) {
                Ok(b) => bytes.push(b),
                // No byte can hold it.
                Err(_) => return Probe::Nowhere,
            }
        }
        find_bytes(haystack, &bytes)
    }
}

/// UTF-8 text. Malformed sequences decode one byte at a time as U+FFFD.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Utf8;

impl Encoding for Utf8 {
    type Unit = u8;
    const NAME: &'static str = "utf8";

    #[inline(always)]
    fn decode(units: &[u8]) -> (u32, usize) {
        utf8_decode(units)
    }

    #[inline]
    fn encode(cp: u32, out: &mut [u8]) -> Option<usize> {
        let c = char::from_u32(cp)?;
        let len = c.len_utf8();
        if out.len() < len {
            return None;
        }
        c.encode_utf8(&mut out[..len]);
        Some(len)
    }

    fn find(haystack: &[u8], needle: &[u32]) -> Probe {
        // The replacement character may stand for malformed bytes, which a
        // byte search cannot see.
        let mut bytes = Vec::with_capacity(needle.len());
        for &cp in needle {
            match char::from_u32(cp) {
                Some(c) if cp != REPLACEMENT => {
                    let mut buff = [0; 4];
                    bytes.extend_from_slice(c.encode_utf8(&mut buff).as_bytes());
                }
                _ => return Probe::Unsupported,
            }
        }
        find_bytes(haystack, &bytes)
    }
}

/// UTF-16 text. Unpaired surrogates decode as themselves.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Utf16;

impl Encoding for Utf16 {
    type Unit = u16;
    const NAME: &'static str = "utf16";

    #[inline(always)]
    fn decode(units: &[u16]) -> (u32, usize) {
        let u0 = units[0];
        match units.get(1) {
            Some(&u1) if is_high_surrogate(u0) && is_low_surrogate(u1) => (utf16_pair(u0, u1), 2),
            _ => (u0 as u32, 1),
        }
    }

    #[inline]
    fn encode(cp: u32, out: &mut [u16]) -> Option<usize> {
        if cp < 0x10000 {
            *out.first_mut()? = cp as u16;
            Some(1)
        } else if cp <= 0x10FFFF {
            if out.len() < 2 {
                return None;
            }
            let v = cp - 0x10000;
            out[0] = 0xD800 | (v >> 10) as u16;
            out[1] = 0xDC00 | (v & 0x3FF) as u16;
            Some(2)
        } else {
            None
        }
    }
}

/// UTF-32 text, one unit per code point. Values are not validated.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Utf32;

impl Encoding for Utf32 {
    type Unit = u32;
    const NAME: &'static str = "utf32";

    #[inline(always)]
    fn decode(units: &[u32]) -> (u32, usize) {
        (units[0], 1)
    }

    #[inline]
    fn encode(cp: u32, out: &mut [u32]) -> Option<usize> {
        *out.first_mut()? = cp;
        Some(1)
    }

    fn find(haystack: &[u32], needle: &[u32]) -> Probe {
        if needle.is_empty() {
            return Probe::At(0);
        }
        match haystack.windows(needle.len()).position(|w| w == needle) {
            Some(idx) => Probe::At(idx),
            None => Probe::Nowhere,
        }
    }
}
