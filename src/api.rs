use crate::encoding::{Encoding, Utf8};
use crate::exec;
use crate::insn::Program;
use crate::ir::Rule;
use crate::position::Cursor;
use crate::reader::Reader;
use crate::types::Var;
use crate::writer::Writer;
use core::ops::Range;

pub use crate::error::Error;

/// A value bound to an extraction variable.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Value<'t, E: Encoding> {
    /// The matched text.
    Text(Reader<'t, E>),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
}

impl<'t, E: Encoding> Value<'t, E> {
    pub fn as_text(&self) -> Option<Reader<'t, E>> {
        match self {
            Value::Text(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_unsigned(&self) -> Option<u64> {
        match self {
            Value::Unsigned(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Write this value into \p writer: text is copied, numbers are
    /// formatted in decimal. \return false if it did not fit.
    pub fn write_to<F: Encoding>(&self, writer: &mut Writer<'_, F>) -> bool {
        use core::fmt::Write;
        match self {
            Value::Text(r) => writer.write_reader(r),
            Value::Integer(v) => write!(writer, "{}", v).is_ok(),
            Value::Unsigned(v) => write!(writer, "{}", v).is_ok(),
            Value::Float(v) => write!(writer, "{}", v).is_ok(),
        }
    }
}

/// The result of a successful match: the range it covered, and the values
/// bound to extraction variables.
#[derive(Debug, Clone)]
pub struct Match<'t, E: Encoding> {
    input: Reader<'t, E>,

    /// The range of the match, in code units of the input.
    pub range: Range<Cursor>,

    values: Vec<Option<Value<'t, E>>>,
    lists: Vec<Vec<Reader<'t, E>>>,
}

impl<'t, E: Encoding> Match<'t, E> {
    pub(crate) fn new(
        input: Reader<'t, E>,
        range: Range<Cursor>,
        values: Vec<Option<Value<'t, E>>>,
        lists: Vec<Vec<Reader<'t, E>>>,
    ) -> Self {
        Match {
            input,
            range,
            values,
            lists,
        }
    }

    #[inline]
    pub fn start(&self) -> Cursor {
        self.range.start
    }

    #[inline]
    pub fn end(&self) -> Cursor {
        self.range.end
    }

    /// The matched text.
    pub fn text(&self) -> Reader<'t, E> {
        self.input.select(self.range.start, self.range.end)
    }

    /// The value bound to \p var, or None if it was not bound.
    pub fn get(&self, var: Var) -> Option<&Value<'t, E>> {
        self.values.get(var.index())?.as_ref()
    }

    /// The text bound to \p var.
    pub fn reader(&self, var: Var) -> Option<Reader<'t, E>> {
        self.get(var)?.as_text()
    }

    pub fn integer(&self, var: Var) -> Option<i64> {
        self.get(var)?.as_integer()
    }

    pub fn unsigned(&self, var: Var) -> Option<u64> {
        self.get(var)?.as_unsigned()
    }

    pub fn float(&self, var: Var) -> Option<f64> {
        self.get(var)?.as_float()
    }

    /// The texts collected by the list variable \p var, in match order.
    /// Empty for variables of other kinds.
    pub fn texts(&self, var: Var) -> &[Reader<'t, E>] {
        match self.lists.get(var.index()) {
            Some(list) => list,
            None => &[],
        }
    }

    /// Write the value bound to \p var into \p writer.
    /// \return false if it is unbound or did not fit.
    pub fn write_to<F: Encoding>(&self, var: Var, writer: &mut Writer<'_, F>) -> bool {
        match self.get(var) {
            Some(value) => value.write_to(writer),
            None => false,
        }
    }

    /// Iterate over the bound variables and their values.
    pub fn bindings(&self) -> impl Iterator<Item = (Var, &Value<'t, E>)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(idx, v)| Some((Var(idx as u32), v.as_ref()?)))
    }

    /// Iterate over the list variables which collected any text.
    pub fn collected(&self) -> impl Iterator<Item = (Var, &[Reader<'t, E>])> + '_ {
        self.lists
            .iter()
            .enumerate()
            .filter(|(_, list)| !list.is_empty())
            .map(|(idx, list)| (Var(idx as u32), &list[..]))
    }
}

/// Something which matches text: a [`Rule`] or a compiled [`Program`].
///
/// Both backends share one set of semantics. A match attempt either succeeds,
/// advancing the cursor past the matched text, or fails leaving the cursor
/// exactly where it was.
pub trait Pattern {
    /// Match at \p cursor in \p input, advancing the cursor on success.
    fn check<E: Encoding>(&self, input: &Reader<'_, E>, cursor: &mut Cursor) -> bool;

    /// Like `check`, also returning the matched range and the values bound to
    /// extraction variables.
    fn capture<'t, E: Encoding>(
        &self,
        input: &Reader<'t, E>,
        cursor: &mut Cursor,
    ) -> Option<Match<'t, E>>;

    /// Match at the start of \p text.
    fn capture_str<'t>(&self, text: &'t str) -> Option<Match<'t, Utf8>> {
        let input = Reader::from(text);
        let mut cursor = input.begin();
        self.capture(&input, &mut cursor)
    }

    /// \return true if this matches all of \p text.
    fn is_full_match(&self, text: &str) -> bool {
        let input = Reader::from(text);
        let mut cursor = input.begin();
        self.check(&input, &mut cursor) && !input.valid(cursor)
    }
}

impl Pattern for Rule {
    fn check<E: Encoding>(&self, input: &Reader<'_, E>, cursor: &mut Cursor) -> bool {
        exec::check(self, input, cursor)
    }

    fn capture<'t, E: Encoding>(
        &self,
        input: &Reader<'t, E>,
        cursor: &mut Cursor,
    ) -> Option<Match<'t, E>> {
        exec::capture(self, input, cursor)
    }
}

impl Pattern for Program {
    fn check<E: Encoding>(&self, input: &Reader<'_, E>, cursor: &mut Cursor) -> bool {
        exec::check(self, input, cursor)
    }

    fn capture<'t, E: Encoding>(
        &self,
        input: &Reader<'t, E>,
        cursor: &mut Cursor,
    ) -> Option<Match<'t, E>> {
        exec::capture(self, input, cursor)
    }
}

impl<P: Pattern> Pattern for &P {
    fn check<E: Encoding>(&self, input: &Reader<'_, E>, cursor: &mut Cursor) -> bool {
        (**self).check(input, cursor)
    }

    fn capture<'t, E: Encoding>(
        &self,
        input: &Reader<'t, E>,
        cursor: &mut Cursor,
    ) -> Option<Match<'t, E>> {
        (**self).capture(input, cursor)
    }
}
