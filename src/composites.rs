//! Composite rules for common kinds of token, assembled from the primitive
//! filters and combinators. These work with any [`Builder`].

use crate::builder::Builder;

/// Punctuation permitted in the local part of an email address, besides '.'.
pub const EMAIL_CHARS: &str = "!#$%&'*+/=?^_`{|}~-";

/// One to three digits whose value is at most 255.
pub fn octet<B: Builder + ?Sized>(b: &mut B) -> B::Handle {
    let digit = b.digit();
    let digits = b.within(digit, 1, 3);
    let value = b.integer(0, 255);
    b.and(&[digits, value])
}

/// Four octets separated by dots.
pub fn ipv4<B: Builder + ?Sized>(b: &mut B) -> B::Handle {
    let octet = octet(b);
    let dot = b.is('.');
    let head = b.sequence(&[octet, dot]);
    let heads = b.times(head, 3);
    b.sequence(&[heads, octet])
}

/// Alphanumeric runs joined by single hyphens, as in `my-host-01`.
pub fn label<B: Builder + ?Sized>(b: &mut B) -> B::Handle {
    let alnum = b.alpha_numeric();
    let run = b.one_or_more(alnum);
    let hyphen = b.is('-');
    let joined = b.sequence(&[hyphen, run]);
    let tail = b.zero_or_more(joined);
    b.sequence(&[run, tail])
}

/// An IPv4 address, or dot separated labels.
pub fn host<B: Builder + ?Sized>(b: &mut B) -> B::Handle {
    let address = ipv4(b);
    let label = label(b);
    let dot = b.is('.');
    let dotted = b.sequence(&[dot, label]);
    let tail = b.zero_or_more(dotted);
    let name = b.sequence(&[label, tail]);
    b.or(&[address, name])
}

/// The part of an email address before the '@'.
pub fn email_local<B: Builder + ?Sized>(b: &mut B) -> B::Handle {
    let alnum = b.alpha_numeric();
    let punct = b.one_of(EMAIL_CHARS);
    let allowed = b.or(&[alnum, punct]);
    let run = b.one_or_more(allowed);
    let dot = b.is('.');
    let dotted = b.sequence(&[dot, run]);
    let tail = b.zero_or_more(dotted);
    b.sequence(&[run, tail])
}

pub fn email<B: Builder + ?Sized>(b: &mut B) -> B::Handle {
    let local = email_local(b);
    let at = b.is('@');
    let domain = host(b);
    b.sequence(&[local, at, domain])
}

/// A telephone number like `+44 20 7946 0958` or `(555) 123-4567`.
pub fn phone<B: Builder + ?Sized>(b: &mut B) -> B::Handle {
    let plus = b.is('+');
    let pluses = b.zero_or_more(plus);

    let digit = b.digit();
    let digits = b.one_or_more(digit);
    let open = b.is('(');
    let close = b.is(')');
    let area = b.sequence(&[open, digits, close]);
    let area = b.zero_or_one(area);
    let space = b.white_space();
    let spaces = b.zero_or_more(space);

    let blank = b.is(' ');
    let dash = b.is('-');
    let separator = b.or(&[blank, dash]);
    let group = b.sequence(&[separator, digits]);
    let groups = b.zero_or_more(group);

    b.sequence(&[pluses, area, spaces, digits, groups])
}
