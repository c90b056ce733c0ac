//! The primitive filters.
//!
//! Each filter tests the text at a position, advancing the position past what
//! it matched. On a false return, the position is unspecified; the matcher
//! restores it.

use crate::encoding::Encoding;
use crate::position::Cursor;
use crate::reader::Reader;
use crate::types::Digest;

#[inline(always)]
pub fn is_lowercase(c: u32) -> bool {
    'a' as u32 <= c && c <= 'z' as u32
}

#[inline(always)]
pub fn is_uppercase(c: u32) -> bool {
    'A' as u32 <= c && c <= 'Z' as u32
}

#[inline(always)]
pub fn is_alphabet(c: u32) -> bool {
    is_lowercase(c) || is_uppercase(c)
}

#[inline(always)]
pub fn is_digit(c: u32) -> bool {
    '0' as u32 <= c && c <= '9' as u32
}

#[inline(always)]
pub fn is_hex(c: u32) -> bool {
    is_digit(c) || 'a' as u32 <= c && c <= 'f' as u32 || 'A' as u32 <= c && c <= 'F' as u32
}

#[inline(always)]
pub fn is_alpha_numeric(c: u32) -> bool {
    is_alphabet(c) || is_digit(c)
}

/// Space, tab and carriage return. Line feed is deliberately absent.
#[inline(always)]
pub fn is_white_space(c: u32) -> bool {
    c == ' ' as u32 || c == '\t' as u32 || c == '\r' as u32
}

#[inline]
pub fn is_digest(classes: Digest, c: u32) -> bool {
    (classes.whitespace && is_white_space(c))
        || (classes.alphabet && is_alphabet(c))
        || (classes.numeric && is_digit(c))
        || (classes.lowercase && is_lowercase(c))
        || (classes.uppercase && is_uppercase(c))
}

/// Simple case fold: map a code point to its lowercase form when that form is
/// a single code point.
#[inline]
pub fn fold(c: u32) -> u32 {
    if c < 0x80 {
        return (c as u8).to_ascii_lowercase() as u32;
    }
    let Some(ch) = char::from_u32(c) else {
        return c;
    };
    let mut lower = ch.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l as u32,
        _ => c,
    }
}

/// Match one code point satisfying \p pred.
#[inline(always)]
pub fn class<E: Encoding, F: Fn(u32) -> bool>(
    input: &Reader<'_, E>,
    pos: &mut Cursor,
    pred: F,
) -> bool {
    match input.next(pos) {
        Some(c) => pred(c),
        None => false,
    }
}

/// Match as many code points satisfying \p pred as possible.
/// \return how many were matched. Always leaves the position after the last.
#[inline]
pub fn span<E: Encoding, F: FnMut(u32) -> bool>(
    input: &Reader<'_, E>,
    pos: &mut Cursor,
    mut pred: F,
) -> usize {
    let mut count = 0;
    loop {
        let mut probe = *pos;
        match input.next(&mut probe) {
            Some(c) if pred(c) => {
                *pos = probe;
                count += 1;
            }
            _ => return count,
        }
    }
}

/// Match the code points \p text, exactly or ignoring case.
#[inline]
pub fn literal<E: Encoding>(input: &Reader<'_, E>, pos: &mut Cursor, text: &[u32], icase: bool) -> bool {
    text.iter().all(|&want| match input.next(pos) {
        Some(got) => got == want || (icase && fold(got) == fold(want)),
        None => false,
    })
}

/// Match "\n" or "\r\n".
#[inline]
pub fn end_of_line<E: Encoding>(input: &Reader<'_, E>, pos: &mut Cursor) -> bool {
    match input.next(pos) {
        Some(0x0A) => true,
        Some(0x0D) => input.next(pos) == Some(0x0A),
        _ => false,
    }
}

/// Scan one or more digits as an unsigned number.
/// \return None if there are no digits or the value overflows. All digits
/// are consumed either way.
pub fn scan_unsigned<E: Encoding>(input: &Reader<'_, E>, pos: &mut Cursor) -> Option<u64> {
    let mut value: Option<u64> = Some(0);
    let mut digits = 0;
    loop {
        let mut probe = *pos;
        match input.next(&mut probe) {
            Some(c) if is_digit(c) => {
                *pos = probe;
                digits += 1;
                let digit = (c - '0' as u32) as u64;
                value = value
                    .and_then(|v| v.checked_mul(10))
                    .and_then(|v| v.checked_add(digit));
            }
            _ => break,
        }
    }
    if digits == 0 {
        None
    } else {
        value
    }
}

/// Consume a leading '-', if present. \return whether it was.
fn scan_sign<E: Encoding>(input: &Reader<'_, E>, pos: &mut Cursor) -> bool {
    let mut probe = *pos;
    if input.next(&mut probe) == Some('-' as u32) {
        *pos = probe;
        true
    } else {
        false
    }
}

/// Scan an optionally negative run of digits as a signed number.
pub fn scan_integer<E: Encoding>(input: &Reader<'_, E>, pos: &mut Cursor) -> Option<i64> {
    let negative = scan_sign(input, pos);
    let magnitude = scan_unsigned(input, pos)?;
    if negative {
        // The magnitude of i64::MIN is one past i64::MAX.
        if magnitude > i64::MAX as u64 + 1 {
            None
        } else {
            Some((magnitude as i64).wrapping_neg())
        }
    } else {
        i64::try_from(magnitude).ok()
    }
}

/// Scan an optionally negative decimal number with an optional fraction.
/// The '.' is only consumed when a digit follows it. At least one digit is
/// required, before or after the point.
pub fn scan_float<E: Encoding>(input: &Reader<'_, E>, pos: &mut Cursor) -> Option<f64> {
    let negative = scan_sign(input, pos);
    let mut value = 0.0f64;
    let whole = span(input, pos, |c| {
        let is = is_digit(c);
        if is {
            value = value * 10.0 + (c - '0' as u32) as f64;
        }
        is
    });
    let mut fraction = 0;
    let mut probe = *pos;
    if input.next(&mut probe) == Some('.' as u32) && is_digit(input.peek(probe)) {
        *pos = probe;
        // Fixed point: the fraction is accumulated as an integer over a
        // decreasing decimal weight.
        let mut digits = 0.0f64;
        let mut scale = 1.0f64;
        fraction = span(input, pos, |c| {
            let is = is_digit(c);
            if is {
                digits = digits * 10.0 + (c - '0' as u32) as f64;
                scale *= 10.0;
            }
            is
        });
        value += digits / scale;
    }
    if whole + fraction == 0 {
        return None;
    }
    Some(if negative { -value } else { value })
}

/// Parse the entirety of \p input with \p scan.
/// \return None unless the scanner consumed all of it.
pub fn parse_whole<'t, E: Encoding, T>(
    input: &Reader<'t, E>,
    scan: fn(&Reader<'t, E>, &mut Cursor) -> Option<T>,
) -> Option<T> {
    let mut pos = input.begin();
    let value = scan(input, &mut pos)?;
    if input.valid(pos) {
        None
    } else {
        Some(value)
    }
}
