use core::ops::Index;
use core::slice::SliceIndex;

// A macro which expresses either checked or unchecked reachability, depending on prohibit-unsafe.
macro_rules! rs_unreachable {
    () => {{
        if cfg!(feature = "prohibit-unsafe") {
            unreachable!();
        } else {
            unsafe { core::hint::unreachable_unchecked() }
        }
    }};
    ($msg:expr) => {
        if cfg!(feature = "prohibit-unsafe") {
            unreachable!($msg);
        } else {
            unsafe { core::hint::unreachable_unchecked() }
        }
    };
}

/// A trait which performs bounds checking only in debug mode.
/// Only used on data which has already been validated, i.e. the words of a
/// Program.
pub trait DebugCheckIndex<Idx>: Index<Idx> {
    fn iat(&self, index: Idx) -> &Self::Output;
}

impl<Idx, T> DebugCheckIndex<Idx> for [T]
where
    Idx: SliceIndex<[T]> + Clone,
{
    #[inline(always)]
    fn iat(&self, idx: Idx) -> &Self::Output {
        debug_assert!(self.get(idx.clone()).is_some(), "Index out of bounds");
        if cfg!(feature = "prohibit-unsafe") {
            self.index(idx)
        } else {
            unsafe { self.get_unchecked(idx) }
        }
    }
}

/// The code point substituted for undecodable input.
pub const REPLACEMENT: u32 = 0xFFFD;

// Given a byte \p b, keep its low \p mask bits, and then shift left by \p shift.
const fn mask_shift(b: u8, mask: u8, shift: u8) -> u32 {
    let masked = b & ((1 << mask) - 1);
    (masked as u32) << (shift as u32)
}

// Number of significant bits in a utf8 continuation byte.
const UTF8_CONT_SIGBITS: u8 = 6;

/// \return true if \p b is a UTF8 continutation byte.
#[inline(always)]
pub fn is_utf8_continuation(b: u8) -> bool {
    (b & 0b1100_0000) == 0b1000_0000
}

// Construct a code point from a list of bytes.
#[inline(always)]
pub fn utf8_w2(b0: u8, b1: u8) -> u32 {
    debug_assert!(!is_utf8_continuation(b0) && is_utf8_continuation(b1));
    debug_assert!(b0 >> 5 == 0b110);
    mask_shift(b0, 5, UTF8_CONT_SIGBITS) | mask_shift(b1, UTF8_CONT_SIGBITS, 0)
}

#[inline(always)]
pub fn utf8_w3(b0: u8, b1: u8, b2: u8) -> u32 {
    debug_assert!(
        !is_utf8_continuation(b0) && is_utf8_continuation(b1) && is_utf8_continuation(b2)
    );
    debug_assert!(b0 >> 4 == 0b1110);
    mask_shift(b0, 4, 2 * UTF8_CONT_SIGBITS)
        | mask_shift(b1, UTF8_CONT_SIGBITS, UTF8_CONT_SIGBITS)
        | mask_shift(b2, UTF8_CONT_SIGBITS, 0)
}

#[inline(always)]
pub fn utf8_w4(b0: u8, b1: u8, b2: u8, b3: u8) -> u32 {
    debug_assert!(
        !is_utf8_continuation(b0)
            && is_utf8_continuation(b1)
            && is_utf8_continuation(b2)
            && is_utf8_continuation(b3)
    );
    debug_assert!(b0 >> 3 == 0b11110);
    mask_shift(b0, 3, 3 * UTF8_CONT_SIGBITS)
        | mask_shift(b1, UTF8_CONT_SIGBITS, 2 * UTF8_CONT_SIGBITS)
        | mask_shift(b2, UTF8_CONT_SIGBITS, UTF8_CONT_SIGBITS)
        | mask_shift(b3, UTF8_CONT_SIGBITS, 0)
}

/// Decode the code point at the start of \p bytes, which must be non-empty.
/// \return the code point and the number of bytes it occupies.
/// Malformed, overlong and surrogate sequences decode as a single
/// REPLACEMENT byte, so every decoded code point other than REPLACEMENT
/// came from its shortest encoding.
#[inline]
pub fn utf8_decode(bytes: &[u8]) -> (u32, usize) {
    let b0 = bytes[0];
    let cont = |idx: usize| bytes.get(idx).copied().filter(|&b| is_utf8_continuation(b));
    match b0 {
        0x00..=0x7F => (b0 as u32, 1),
        0xC2..=0xDF => match cont(1) {
            Some(b1) => (utf8_w2(b0, b1), 2),
            None => (REPLACEMENT, 1),
        },
        0xE0..=0xEF => match (cont(1), cont(2)) {
            (Some(b1), Some(b2)) => {
                let cp = utf8_w3(b0, b1, b2);
                if cp < 0x800 || is_surrogate(cp) {
                    (REPLACEMENT, 1)
                } else {
                    (cp, 3)
                }
            }
            _ => (REPLACEMENT, 1),
        },
        0xF0..=0xF4 => match (cont(1), cont(2), cont(3)) {
            (Some(b1), Some(b2), Some(b3)) => {
                let cp = utf8_w4(b0, b1, b2, b3);
                if (0x10000..=0x10FFFF).contains(&cp) {
                    (cp, 4)
                } else {
                    (REPLACEMENT, 1)
                }
            }
            _ => (REPLACEMENT, 1),
        },
        _ => (REPLACEMENT, 1),
    }
}

/// \return true if \p cp lies in the UTF-16 surrogate range.
#[inline(always)]
pub fn is_surrogate(cp: u32) -> bool {
    (0xD800..=0xDFFF).contains(&cp)
}

#[inline(always)]
pub fn is_high_surrogate(u: u16) -> bool {
    (0xD800..=0xDBFF).contains(&u)
}

#[inline(always)]
pub fn is_low_surrogate(u: u16) -> bool {
    (0xDC00..=0xDFFF).contains(&u)
}

/// Combine a surrogate pair into a code point.
#[inline(always)]
pub fn utf16_pair(hi: u16, lo: u16) -> u32 {
    debug_assert!(is_high_surrogate(hi) && is_low_surrogate(lo));
    0x10000 + (((hi as u32) - 0xD800) << 10) + ((lo as u32) - 0xDC00)
}

/// Convert a code point to a char for display, substituting the replacement
/// character for values which are not chars.
pub fn to_char_lossy(cp: u32) -> char {
    char::from_u32(cp).unwrap_or(char::REPLACEMENT_CHARACTER)
}
