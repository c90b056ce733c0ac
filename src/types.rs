use core::fmt;

/// The repetition bound meaning "no upper limit".
pub const UNBOUNDED: usize = usize::MAX;

/// The deepest permitted nesting of rules. A filter has depth 1, and a
/// combinator is one deeper than its deepest operand. Matching recurses once
/// per level, so deeper rules are rejected when built or loaded.
pub const MAX_DEPTH: usize = 256;

/// A handle to a node of a [`Grammar`](crate::Grammar).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleId(pub(crate) u32);

impl RuleId {
    #[inline(always)]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A handle to an instruction of a [`Program`](crate::Program): the offset of
/// its opcode word.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pc(pub(crate) u32);

impl Pc {
    /// The word offset of this instruction.
    #[inline(always)]
    pub fn offset(self) -> u32 {
        self.0
    }
}

/// An extraction variable, declared with
/// [`Builder::variable`](crate::Builder::variable).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Var(pub(crate) u32);

impl Var {
    /// The index of this variable in declaration order.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The kind of value an extraction variable receives.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Kind {
    /// The matched sub-range of the input.
    Text,

    /// The matched text, read as a signed integer.
    Integer,

    /// The matched text, read as an unsigned integer.
    Unsigned,

    /// The matched text, read as a fixed-point decimal.
    Float,

    /// Every matched sub-range, in the order matched. Extracting into such a
    /// variable under a repetition collects each token.
    TextList,
}

impl Kind {
    pub(crate) fn to_word(self) -> u32 {
        match self {
            Kind::Text => 0,
            Kind::Integer => 1,
            Kind::Unsigned => 2,
            Kind::Float => 3,
            Kind::TextList => 4,
        }
    }

    pub(crate) fn from_word(w: u32) -> Option<Kind> {
        match w {
            0 => Some(Kind::Text),
            1 => Some(Kind::Integer),
            2 => Some(Kind::Unsigned),
            3 => Some(Kind::Float),
            4 => Some(Kind::TextList),
            _ => None,
        }
    }
}

/// Character classes consumed by the Digest filter.
/// The default is empty, which consumes nothing.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Digest {
    /// Space, tab and carriage return.
    pub whitespace: bool,

    /// ASCII letters of either case.
    pub alphabet: bool,

    /// ASCII digits.
    pub numeric: bool,

    /// ASCII lowercase letters.
    pub lowercase: bool,

    /// ASCII uppercase letters.
    pub uppercase: bool,
}

impl Digest {
    const WHITESPACE: u32 = 1;
    const ALPHABET: u32 = 2;
    const NUMERIC: u32 = 4;
    const LOWERCASE: u32 = 16;
    const UPPERCASE: u32 = 32;

    /// Construct a Digest from a Unicode codepoints iterator.
    /// 's' means whitespace, 'a' alphabet, 'd' numeric, 'l' lowercase and
    /// 'u' uppercase. Other characters are ignored.
    pub fn new<T: Iterator<Item = u32>>(chars: T) -> Self {
        let mut result = Self::default();
        for c in chars {
            match char::from_u32(c) {
                Some('s') => result.whitespace = true,
                Some('a') => result.alphabet = true,
                Some('d') => result.numeric = true,
                Some('l') => result.lowercase = true,
                Some('u') => result.uppercase = true,
                _ => {
                    // Silently skip unsupported flags.
                }
            }
        }
        result
    }

    pub(crate) fn bits(self) -> u32 {
        let mut bits = 0;
        if self.whitespace {
            bits |= Self::WHITESPACE;
        }
        if self.alphabet {
            bits |= Self::ALPHABET;
        }
        if self.numeric {
            bits |= Self::NUMERIC;
        }
        if self.lowercase {
            bits |= Self::LOWERCASE;
        }
        if self.uppercase {
            bits |= Self::UPPERCASE;
        }
        bits
    }

    pub(crate) fn from_bits(bits: u32) -> Self {
        Digest {
            whitespace: bits & Self::WHITESPACE != 0,
            alphabet: bits & Self::ALPHABET != 0,
            numeric: bits & Self::NUMERIC != 0,
            lowercase: bits & Self::LOWERCASE != 0,
            uppercase: bits & Self::UPPERCASE != 0,
        }
    }
}

impl From<&str> for Digest {
    /// Construct a Digest from a string of flag characters.
    ///
    /// See also: [`Digest::new`].
    fn from(s: &str) -> Self {
        Self::new(s.chars().map(u32::from))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.whitespace {
            f.write_str("s")?;
        }
        if self.alphabet {
            f.write_str("a")?;
        }
        if self.numeric {
            f.write_str("d")?;
        }
        if self.lowercase {
            f.write_str("l")?;
        }
        if self.uppercase {
            f.write_str("u")?;
        }
        Ok(())
    }
}
