//! Bytecode instructions for a compiled rule.
//!
//! A program is a flat array of 32-bit words. Each instruction is an opcode
//! word, a fixed number of operand words determined by the opcode, then for
//! combinators a call list: a count word followed by that many instruction
//! offsets. Calls always refer to earlier instructions, so a program, like a
//! rule graph, is acyclic. Literal text lives in a separate pool of code
//! points and is referenced by (offset, length) spans.

use crate::error::Error;
use crate::exec::{Code, Op};
use crate::ir::fmt_op;
use crate::ir::Node;
use crate::types::{Digest, Kind, Pc, Var, MAX_DEPTH, UNBOUNDED};
use crate::util::DebugCheckIndex;
use core::fmt;

/// The list of bytecode opcodes. Zero is never an opcode.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Opcode {
    Any = 1,
    Between,
    Alphabet,
    Digit,
    Hex,
    AlphaNumeric,
    In,
    Exact,
    Like,
    WhiteSpace,
    Is,
    Decimal,
    Word,
    EndOfText,
    EndOfLine,
    Unsigned,
    Integer,
    Float,
    Digest,
    Not,
    Or,
    And,
    Sequence,
    Within,
    Until,
    Extract,
    Enclosed,
}

/// The shape of an instruction's call list.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Calls {
    None,
    One,
    Many,
}

impl Opcode {
    const ALL: [Opcode; 27] = [
        Opcode::Any,
        Opcode::Between,
        Opcode::Alphabet,
        Opcode::Digit,
        Opcode::Hex,
        Opcode::AlphaNumeric,
        Opcode::In,
        Opcode::Exact,
        Opcode::Like,
        Opcode::WhiteSpace,
        Opcode::Is,
        Opcode::Decimal,
        Opcode::Word,
        Opcode::EndOfText,
        Opcode::EndOfLine,
        Opcode::Unsigned,
        Opcode::Integer,
        Opcode::Float,
        Opcode::Digest,
        Opcode::Not,
        Opcode::Or,
        Opcode::And,
        Opcode::Sequence,
        Opcode::Within,
        Opcode::Until,
        Opcode::Extract,
        Opcode::Enclosed,
    ];

    /// Decode an opcode word.
    pub fn from_word(word: u32) -> Option<Opcode> {
        let idx = (word as usize).checked_sub(1)?;
        Self::ALL.get(idx).copied()
    }

    /// The opcode which encodes \p node.
    pub fn of<H>(node: &Node<H>) -> Opcode {
        match node {
            Node::Any => Opcode::Any,
            Node::Between(..) => Opcode::Between,
            Node::Alphabet => Opcode::Alphabet,
            Node::Digit => Opcode::Digit,
            Node::Hex => Opcode::Hex,
            Node::AlphaNumeric => Opcode::AlphaNumeric,
            Node::In(..) => Opcode::In,
            Node::Exact(..) => Opcode::Exact,
            Node::Like(..) => Opcode::Like,
            Node::WhiteSpace => Opcode::WhiteSpace,
            Node::Is(..) => Opcode::Is,
            Node::Decimal => Opcode::Decimal,
            Node::Word => Opcode::Word,
            Node::EndOfText => Opcode::EndOfText,
            Node::EndOfLine => Opcode::EndOfLine,
            Node::Unsigned { .. } => Opcode::Unsigned,
            Node::Integer { .. } => Opcode::Integer,
            Node::Float { .. } => Opcode::Float,
            Node::Digest(..) => Opcode::Digest,
            Node::Not(..) => Opcode::Not,
            Node::Or(..) => Opcode::Or,
            Node::And(..) => Opcode::And,
            Node::Sequence(..) => Opcode::Sequence,
            Node::Within { .. } => Opcode::Within,
            Node::Until(..) => Opcode::Until,
            Node::Extract { .. } => Opcode::Extract,
            Node::Enclosed { .. } => Opcode::Enclosed,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Opcode::Any => "any",
            Opcode::Between => "between",
            Opcode::Alphabet => "alphabet",
            Opcode::Digit => "digit",
            Opcode::Hex => "hex",
            Opcode::AlphaNumeric => "alphanumeric",
            Opcode::In => "in",
            Opcode::Exact => "exact",
            Opcode::Like => "like",
            Opcode::WhiteSpace => "whitespace",
            Opcode::Is => "is",
            Opcode::Decimal => "decimal",
            Opcode::Word => "word",
            Opcode::EndOfText => "endoftext",
            Opcode::EndOfLine => "endofline",
            Opcode::Unsigned => "unsigned",
            Opcode::Integer => "integer",
            Opcode::Float => "float",
            Opcode::Digest => "digest",
            Opcode::Not => "not",
            Opcode::Or => "or",
            Opcode::And => "and",
            Opcode::Sequence => "sequence",
            Opcode::Within => "within",
            Opcode::Until => "until",
            Opcode::Extract => "extract",
            Opcode::Enclosed => "enclosed",
        }
    }

    /// The number of fixed operand words following the opcode.
    /// Text spans take two words, 64-bit values take two words, low first.
    fn operands(self) -> usize {
        match self {
            Opcode::Between | Opcode::In | Opcode::Exact | Opcode::Like => 2,
            Opcode::Is | Opcode::Digest | Opcode::Extract => 1,
            Opcode::Unsigned | Opcode::Integer | Opcode::Float => 4,
            Opcode::Within | Opcode::Enclosed => 4,
            _ => 0,
        }
    }

    fn calls(self) -> Calls {
        match self {
            Opcode::Not | Opcode::Until | Opcode::Within | Opcode::Extract | Opcode::Enclosed => {
                Calls::One
            }
            Opcode::Or | Opcode::And | Opcode::Sequence => Calls::Many,
            _ => Calls::None,
        }
    }
}

/// Reads the words of one instruction.
struct Decoder<'p> {
    words: &'p [u32],
    pc: usize,
}

impl<'p> Decoder<'p> {
    #[inline(always)]
    fn word(&mut self) -> u32 {
        let w = *self.words.iat(self.pc);
        self.pc += 1;
        w
    }

    #[inline(always)]
    fn wide(&mut self) -> u64 {
        let lo = self.word() as u64;
        let hi = self.word() as u64;
        lo | hi << 32
    }

    /// A repetition bound, stored as 64 bits.
    #[inline(always)]
    fn bound(&mut self) -> usize {
        usize::try_from(self.wide()).unwrap_or(UNBOUNDED)
    }

    #[inline(always)]
    fn text(&mut self, texts: &'p [u32]) -> &'p [u32] {
        let offset = self.word() as usize;
        let len = self.word() as usize;
        &texts[offset..offset + len]
    }

    #[inline(always)]
    fn calls(&mut self) -> &'p [u32] {
        let count = self.word() as usize;
        let words = self.words;
        let calls = &words[self.pc..self.pc + count];
        self.pc += count;
        calls
    }

    #[inline(always)]
    fn call(&mut self) -> u32 {
        // The count word is always 1 here.
        self.pc += 1;
        self.word()
    }
}

/// Encode a repetition bound so that UNBOUNDED is the same on every target.
pub(crate) fn bound_to_wide(bound: usize) -> u64 {
    if bound == UNBOUNDED {
        u64::MAX
    } else {
        bound as u64
    }
}

/// Check the operand words \p ops of the instruction \p opcode at \p pc.
fn check_operands(
    opcode: Opcode,
    pc: u32,
    ops: &[u32],
    texts: usize,
    variables: usize,
) -> Result<(), Error> {
    let wide = |i: usize| ops[i] as u64 | (ops[i + 1] as u64) << 32;
    let span_ok = |i: usize| {
        (ops[i] as usize)
            .checked_add(ops[i + 1] as usize)
            .map_or(false, |end| end <= texts)
    };
    let inverted = match opcode {
        Opcode::Between => ops[0] > ops[1],
        Opcode::In | Opcode::Exact | Opcode::Like => {
            if !span_ok(0) {
                return Err(Error::BadText { pc });
            }
            false
        }
        Opcode::Enclosed => {
            if !span_ok(0) || !span_ok(2) {
                return Err(Error::BadText { pc });
            }
            false
        }
        Opcode::Unsigned | Opcode::Within => wide(0) > wide(2),
        Opcode::Integer => (wide(0) as i64) > (wide(2) as i64),
        Opcode::Float => {
            let (min, max) = (f64::from_bits(wide(0)), f64::from_bits(wide(2)));
            min.is_nan() || max.is_nan() || min > max
        }
        Opcode::Extract => {
            if ops[0] as usize >= variables {
                return Err(Error::UnknownVariable(ops[0]));
            }
            false
        }
        _ => false,
    };
    if inverted {
        return Err(Error::InvalidBounds {
            rule: opcode.name(),
        });
    }
    Ok(())
}

/// Check that \p words form a well-formed program.
fn validate(words: &[u32], texts: &[u32], variables: &[Kind], entry: u32) -> Result<(), Error> {
    // Offsets of the instructions seen so far, ascending, and the nesting
    // depth of each.
    let mut starts: Vec<u32> = Vec::new();
    let mut depths: Vec<u32> = Vec::new();
    let mut pc = 0usize;
    while pc < words.len() {
        let at = pc as u32;
        let opcode = Opcode::from_word(words[pc]).ok_or(Error::InvalidOpcode {
            pc: at,
            opcode: words[pc],
        })?;
        let truncated = Error::Truncated { pc: at };
        let ops_end = pc + 1 + opcode.operands();
        let ops = words.get(pc + 1..ops_end).ok_or(truncated.clone())?;
        check_operands(opcode, at, ops, texts.len(), variables.len())?;
        pc = ops_end;

        let mut depth = 1;
        if opcode.calls() != Calls::None {
            let count = *words.get(pc).ok_or(truncated.clone())?;
            match (opcode.calls(), count) {
                (Calls::One, 1) => {}
                (Calls::One, _) => return Err(Error::BadArity { pc: at, count }),
                (_, 0) => {
                    return Err(Error::EmptyOperands {
                        rule: opcode.name(),
                    })
                }
                _ => {}
            }
            let calls_end = (pc + 1)
                .checked_add(count as usize)
                .ok_or(truncated.clone())?;
            let calls = words.get(pc + 1..calls_end).ok_or(truncated)?;
            for &target in calls {
                match starts.binary_search(&target) {
                    Ok(idx) => depth = depth.max(depths[idx] + 1),
                    Err(_) => return Err(Error::BadCall { pc: at, target }),
                }
            }
            pc = calls_end;
        }
        if depth as usize > MAX_DEPTH {
            return Err(Error::TooDeep);
        }
        starts.push(at);
        depths.push(depth);
    }
    if starts.binary_search(&entry).is_err() {
        return Err(Error::BadEntry(entry));
    }
    Ok(())
}

/// Marks the start of a flattened program.
const MAGIC: u32 = 0x5250_4731;

/// Takes words from the front of a flattened program.
struct Words<'a> {
    rest: &'a [u32],
}

impl<'a> Words<'a> {
    fn take(&mut self, count: usize) -> Result<&'a [u32], Error> {
        if self.rest.len() < count {
            return Err(Error::BadHeader);
        }
        let (head, tail) = self.rest.split_at(count);
        self.rest = tail;
        Ok(head)
    }

    fn one(&mut self) -> Result<u32, Error> {
        Ok(self.take(1)?[0])
    }
}

/// A compiled rule: a validated, position-independent bytecode program.
///
/// A Program is plain data. It may be flattened to words with
/// [`Program::to_words`], stored, and rebuilt with [`Program::from_words`],
/// which validates it again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    words: Box<[u32]>,
    texts: Box<[u32]>,
    variables: Box<[Kind]>,
    entry: u32,
}

impl Program {
    /// Construct a program from its parts, validating it.
    ///
    /// \p words is the instruction stream, \p texts the literal pool,
    /// \p variables the kinds of the extraction variables, and \p entry the
    /// offset of the instruction matched first.
    pub fn from_parts(
        words: Vec<u32>,
        texts: Vec<u32>,
        variables: Vec<Kind>,
        entry: u32,
    ) -> Result<Program, Error> {
        validate(&words, &texts, &variables, entry)?;
        Ok(Self::from_validated(words, texts, variables, entry))
    }

    /// Construct a program from parts known to be valid.
    pub(crate) fn from_validated(
        words: Vec<u32>,
        texts: Vec<u32>,
        variables: Vec<Kind>,
        entry: u32,
    ) -> Program {
        debug_assert!(
            validate(&words, &texts, &variables, entry).is_ok(),
            "Program should be valid"
        );
        Program {
            words: words.into_boxed_slice(),
            texts: texts.into_boxed_slice(),
            variables: variables.into_boxed_slice(),
            entry,
        }
    }

    /// The instruction stream.
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// The literal pool.
    pub fn texts(&self) -> &[u32] {
        &self.texts
    }

    pub fn variables(&self) -> &[Kind] {
        &self.variables
    }

    /// The instruction matched first.
    pub fn entry(&self) -> Pc {
        Pc(self.entry)
    }

    /// Flatten this program into a single word array.
    pub fn to_words(&self) -> Vec<u32> {
        let mut out = Vec::with_capacity(
            5 + self.variables.len() + self.texts.len() + self.words.len(),
        );
        out.push(MAGIC);
        out.push(self.variables.len() as u32);
        out.extend(self.variables.iter().map(|k| k.to_word()));
        out.push(self.texts.len() as u32);
        out.extend_from_slice(&self.texts);
        out.push(self.entry);
        out.extend_from_slice(&self.words);
        out
    }

    /// Rebuild a program flattened by [`Program::to_words`].
    pub fn from_words(raw: &[u32]) -> Result<Program, Error> {
        let mut input = Words { rest: raw };
        if input.one()? != MAGIC {
            return Err(Error::BadHeader);
        }
        let nvars = input.one()? as usize;
        let variables = input
            .take(nvars)?
            .iter()
            .enumerate()
            .map(|(idx, &w)| Kind::from_word(w).ok_or(Error::BadKind(idx as u32)))
            .collect::<Result<Vec<_>, _>>()?;
        let ntexts = input.one()? as usize;
        let texts = input.take(ntexts)?.to_vec();
        let entry = input.one()?;
        Self::from_parts(input.rest.to_vec(), texts, variables, entry)
    }

    /// Decode the instruction at \p pc.
    /// \return the operation and the offset of the next instruction.
    pub(crate) fn decode(&self, pc: u32) -> (Op<'_, u32>, usize) {
        let texts = &self.texts[..];
        let mut d = Decoder {
            words: &self.words,
            pc: pc as usize,
        };
        let opcode = match Opcode::from_word(d.word()) {
            Some(opcode) => opcode,
            None => rs_unreachable!("Invalid opcode in validated program"),
        };
        let op = match opcode {
            Opcode::Any => Op::Any,
            Opcode::Between => {
                let lo = d.word();
                let hi = d.word();
                Op::Between(lo, hi)
            }
            Opcode::Alphabet => Op::Alphabet,
            Opcode::Digit => Op::Digit,
            Opcode::Hex => Op::Hex,
            Opcode::AlphaNumeric => Op::AlphaNumeric,
            Opcode::In => Op::In(d.text(texts)),
            Opcode::Exact => Op::Exact(d.text(texts)),
            Opcode::Like => Op::Like(d.text(texts)),
            Opcode::WhiteSpace => Op::WhiteSpace,
            Opcode::Is => Op::Is(d.word()),
            Opcode::Decimal => Op::Decimal,
            Opcode::Word => Op::Word,
            Opcode::EndOfText => Op::EndOfText,
            Opcode::EndOfLine => Op::EndOfLine,
            Opcode::Unsigned => {
                let min = d.wide();
                let max = d.wide();
                Op::Unsigned { min, max }
            }
            Opcode::Integer => {
                let min = d.wide() as i64;
                let max = d.wide() as i64;
                Op::Integer { min, max }
            }
            Opcode::Float => {
                let min = f64::from_bits(d.wide());
                let max = f64::from_bits(d.wide());
                Op::Float { min, max }
            }
            Opcode::Digest => Op::Digest(Digest::from_bits(d.word())),
            Opcode::Not => Op::Not(d.call()),
            Opcode::Or => Op::Or(d.calls()),
            Opcode::And => Op::And(d.calls()),
            Opcode::Sequence => Op::Sequence(d.calls()),
            Opcode::Within => {
                let min = d.bound();
                let max = d.bound();
                Op::Within {
                    rule: d.call(),
                    min,
                    max,
                }
            }
            Opcode::Until => Op::Until(d.call()),
            Opcode::Extract => {
                let var = Var(d.word());
                Op::Extract {
                    var,
                    rule: d.call(),
                }
            }
            Opcode::Enclosed => {
                let open = d.text(texts);
                let close = d.text(texts);
                Op::Enclosed {
                    open,
                    close,
                    rule: d.call(),
                }
            }
        };
        (op, d.pc)
    }
}

impl Code for Program {
    type Ref = u32;

    #[inline(always)]
    fn op(&self, r: u32) -> Op<'_, u32> {
        self.decode(r).0
    }

    fn root(&self) -> u32 {
        self.entry
    }

    fn variables(&self) -> &[Kind] {
        &self.variables
    }
}

/// Disassembly, one instruction per line, the entry marked with '*'.
impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut pc = 0;
        while pc < self.words.len() {
            let name = Opcode::from_word(self.words[pc]).map_or("?", Opcode::name);
            let (op, next) = self.decode(pc as u32);
            fmt_op(f, pc as u32 == self.entry, pc, name, op, |t: u32| t as usize)?;
            pc = next;
        }
        Ok(())
    }
}
