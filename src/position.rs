use core::fmt;
use core::ops;

/// A position in a text buffer, measured in code units of the buffer's
/// encoding from the start of the buffer.
///
/// A Cursor only has meaning relative to the buffer it came from. Cursors are
/// produced by a [`Reader`](crate::Reader) and moved by its `skip`/`read`
/// operations; they are never constructed from raw offsets by callers.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Cursor(usize);

impl Cursor {
    #[inline(always)]
    pub(crate) const fn new(offset: usize) -> Self {
        Cursor(offset)
    }

    /// The offset of this cursor, in code units, from the start of the
    /// underlying buffer.
    #[inline(always)]
    pub fn offset(self) -> usize {
        self.0
    }

    /// \return whichever of self and \p other is positionally later.
    #[inline(always)]
    pub fn furthest(self, other: Cursor) -> Cursor {
        self.max(other)
    }

    /// \return whichever of self and \p other is positionally earlier.
    #[inline(always)]
    pub fn nearest(self, other: Cursor) -> Cursor {
        self.min(other)
    }
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

impl ops::Add<usize> for Cursor {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: usize) -> Self::Output {
        debug_assert!(self.0 + rhs >= self.0, "Overflow");
        Cursor(self.0 + rhs)
    }
}

impl ops::AddAssign<usize> for Cursor {
    #[inline(always)]
    fn add_assign(&mut self, rhs: usize) {
        *self = *self + rhs;
    }
}

impl ops::Sub<Cursor> for Cursor {
    type Output = usize;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self::Output {
        debug_assert!(self.0 >= rhs.0, "Underflow");
        self.0 - rhs.0
    }
}
