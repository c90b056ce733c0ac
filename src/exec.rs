//! The matcher: one recursive evaluator shared by the rule graph and the
//! bytecode program.

use crate::api::{Match, Value};
use crate::encoding::{Encoding, Probe};
use crate::matchers;
use crate::position::Cursor;
use crate::reader::Reader;
use crate::types::{Digest, Kind, Var};

/// A decoded operation. Operands are references `R` to other operations of
/// the same code; literal text is a slice of code points.
#[derive(Debug, Copy, Clone)]
pub(crate) enum Op<'c, R> {
    Any,
    Between(u32, u32),
    Alphabet,
    Digit,
    Hex,
    AlphaNumeric,
    In(&'c [u32]),
    Exact(&'c [u32]),
    Like(&'c [u32]),
    WhiteSpace,
    Is(u32),
    Decimal,
    Word,
    EndOfText,
    EndOfLine,
    Unsigned { min: u64, max: u64 },
    Integer { min: i64, max: i64 },
    Float { min: f64, max: f64 },
    Digest(Digest),
    Not(R),
    Or(&'c [R]),
    And(&'c [R]),
    Sequence(&'c [R]),
    Within { rule: R, min: usize, max: usize },
    Until(R),
    Extract { var: Var, rule: R },
    Enclosed {
        open: &'c [u32],
        close: &'c [u32],
        rule: R,
    },
}

/// Something which can be decoded into operations: a Rule or a Program.
pub(crate) trait Code {
    type Ref: Copy;

    /// Decode the operation referenced by \p r.
    fn op(&self, r: Self::Ref) -> Op<'_, Self::Ref>;

    /// The operation matched first.
    fn root(&self) -> Self::Ref;

    /// The kinds of the extraction variables.
    fn variables(&self) -> &[Kind];
}

/// A change to the bindings which may have to be undone.
enum Undo<'t, E: Encoding> {
    /// A variable was bound, replacing this previous value.
    Bind(usize, Option<Value<'t, E>>),

    /// A text was appended to a list variable.
    Push(usize),
}

/// Matching state for one invocation.
struct Matcher<'c, 't, C: Code, E: Encoding> {
    code: &'c C,
    input: Reader<'t, E>,

    /// Current binding of each variable.
    values: Vec<Option<Value<'t, E>>>,

    /// Texts collected by each list variable. Empty for other kinds.
    lists: Vec<Vec<Reader<'t, E>>>,

    /// Changes to the bindings, most recent last, for undoing the bindings
    /// made by a rule which later fails.
    journal: Vec<Undo<'t, E>>,
}

impl<'c, 't, C: Code, E: Encoding> Matcher<'c, 't, C, E> {
    fn new(code: &'c C, input: Reader<'t, E>) -> Self {
        let count = code.variables().len();
        Matcher {
            code,
            input,
            values: vec![None; count],
            lists: vec![Vec::new(); count],
            journal: Vec::new(),
        }
    }

    /// Match \p r at \p pos, advancing it on success.
    /// On failure \p pos and all variable bindings are as they were on entry.
    fn check(&mut self, r: C::Ref, pos: &mut Cursor) -> bool {
        let entry = *pos;
        let mark = self.journal.len();
        let matched = self.step(r, pos);
        if !matched {
            *pos = entry;
            self.rollback(mark);
        }
        matched
    }

    /// Match \p r at \p pos. On failure the position and bindings are
    /// unspecified.
    fn step(&mut self, r: C::Ref, pos: &mut Cursor) -> bool {
        let code = self.code;
        let input = &self.input;
        match code.op(r) {
            Op::Any => input.next(pos).is_some(),
            Op::Between(lo, hi) => matchers::class(input, pos, |c| lo <= c && c <= hi),
            Op::Alphabet => matchers::class(input, pos, matchers::is_alphabet),
            Op::Digit => matchers::class(input, pos, matchers::is_digit),
            Op::Hex => matchers::class(input, pos, matchers::is_hex),
            Op::AlphaNumeric => matchers::class(input, pos, matchers::is_alpha_numeric),
            Op::In(set) => matchers::class(input, pos, |c| set.contains(&c)),
            Op::Exact(text) => matchers::literal(input, pos, text, false),
            Op::Like(text) => matchers::literal(input, pos, text, true),
            Op::WhiteSpace => matchers::class(input, pos, matchers::is_white_space),
            Op::Is(want) => input.next(pos) == Some(want),
            Op::Decimal => matchers::span(input, pos, matchers::is_digit) > 0,
            Op::Word => matchers::span(input, pos, matchers::is_alphabet) > 0,
            Op::EndOfText => !input.valid(*pos),
            Op::EndOfLine => matchers::end_of_line(input, pos),
            Op::Unsigned { min, max } => {
                matches!(matchers::scan_unsigned(input, pos), Some(v) if min <= v && v <= max)
            }
            Op::Integer { min, max } => {
                matches!(matchers::scan_integer(input, pos), Some(v) if min <= v && v <= max)
            }
            Op::Float { min, max } => {
                matches!(matchers::scan_float(input, pos), Some(v) if min <= v && v <= max)
            }
            Op::Digest(classes) => {
                matchers::span(input, pos, |c| matchers::is_digest(classes, c));
                true
            }

            Op::Not(rule) => {
                let mut probe = *pos;
                !self.check(rule, &mut probe)
            }

            Op::Or(rules) => rules.iter().any(|&rule| self.check(rule, pos)),

            Op::And(rules) => {
                let entry = *pos;
                let mut nearest: Option<Cursor> = None;
                for &rule in rules {
                    let mut end = entry;
                    if !self.check(rule, &mut end) {
                        return false;
                    }
                    nearest = Some(nearest.map_or(end, |n| n.nearest(end)));
                }
                *pos = nearest.unwrap_or(entry);
                true
            }

            Op::Sequence(rules) => rules.iter().all(|&rule| self.check(rule, pos)),

            Op::Within { rule, min, max } => self.run_loop(rule, min, max, pos),

            Op::Until(rule) => self.run_until(rule, pos),

            Op::Extract { var, rule } => {
                let start = *pos;
                if !self.check(rule, pos) {
                    return false;
                }
                let span = self.input.select(start, *pos);
                self.bind(var, span);
                true
            }

            Op::Enclosed { open, close, rule } => {
                matchers::literal(&self.input, pos, open, false)
                    && self.check(rule, pos)
                    && matchers::literal(&self.input, pos, close, false)
            }
        }
    }

    /// Greedily repeat \p rule at most \p max times, succeeding if it matched
    /// at least \p min times. An iteration which matches without consuming
    /// anything would match forever, so it ends the loop, and counts for
    /// every iteration still required.
    fn run_loop(&mut self, rule: C::Ref, min: usize, max: usize, pos: &mut Cursor) -> bool {
        let mut iters = 0;
        while iters < max {
            let before = *pos;
            if !self.check(rule, pos) {
                break;
            }
            if *pos == before {
                iters = iters.max(min);
                break;
            }
            iters += 1;
        }
        iters >= min
    }

    /// Advance one code point at a time until \p rule matches, leaving the
    /// position where it matched.
    fn run_until(&mut self, rule: C::Ref, pos: &mut Cursor) -> bool {
        let code = self.code;
        let single;
        let literal: Option<&[u32]> = match code.op(rule) {
            Op::Is(c) => {
                single = [c];
                Some(&single)
            }
            Op::Exact(text) => Some(text),
            _ => None,
        };
        if let Some(text) = literal {
            match self.input.find_literal(*pos, text) {
                Probe::At(offset) => {
                    *pos = Cursor::new(offset);
                    return true;
                }
                Probe::Nowhere => return false,
                Probe::Unsupported => {}
            }
        }
        loop {
            let mut probe = *pos;
            if self.check(rule, &mut probe) {
                return true;
            }
            if !self.input.valid(*pos) {
                return false;
            }
            self.input.skip(pos);
        }
    }

    /// Bind \p var to the text \p span, converted to the variable's kind.
    /// A span which does not convert leaves the variable unbound.
    fn bind(&mut self, var: Var, span: Reader<'t, E>) {
        let kind = self.code.variables().get(var.index()).copied();
        let value = match kind {
            Some(Kind::Text) => Some(Value::Text(span)),
            Some(Kind::Integer) => {
                matchers::parse_whole(&span, matchers::scan_integer).map(Value::Integer)
            }
            Some(Kind::Unsigned) => {
                matchers::parse_whole(&span, matchers::scan_unsigned).map(Value::Unsigned)
            }
            Some(Kind::Float) => {
                matchers::parse_whole(&span, matchers::scan_float).map(Value::Float)
            }
            Some(Kind::TextList) => {
                if let Some(list) = self.lists.get_mut(var.index()) {
                    list.push(span);
                    self.journal.push(Undo::Push(var.index()));
                }
                None
            }
            None => None,
        };
        if let (Some(value), Some(slot)) = (value, self.values.get_mut(var.index())) {
            let previous = slot.replace(value);
            self.journal.push(Undo::Bind(var.index(), previous));
        }
    }

    /// Undo all bindings made since the journal had length \p mark.
    fn rollback(&mut self, mark: usize) {
        while self.journal.len() > mark {
            match self.journal.pop() {
                Some(Undo::Bind(idx, previous)) => self.values[idx] = previous,
                Some(Undo::Push(idx)) => {
                    self.lists[idx].pop();
                }
                None => break,
            }
        }
    }
}

/// Match \p code against \p input at \p pos, advancing it on success.
pub(crate) fn check<C: Code, E: Encoding>(code: &C, input: &Reader<'_, E>, pos: &mut Cursor) -> bool {
    let mut matcher = Matcher::new(code, *input);
    matcher.check(code.root(), pos)
}

/// Match \p code against \p input at \p pos, advancing it on success and
/// returning the matched range and extracted values.
pub(crate) fn capture<'t, C: Code, E: Encoding>(
    code: &C,
    input: &Reader<'t, E>,
    pos: &mut Cursor,
) -> Option<Match<'t, E>> {
    let start = *pos;
    let mut matcher = Matcher::new(code, *input);
    if matcher.check(code.root(), pos) {
        Some(Match::new(*input, start..*pos, matcher.values, matcher.lists))
    } else {
        None
    }
}
