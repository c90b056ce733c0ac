//! The combinator graph: an arena of rule nodes.

use crate::builder::Builder;
use crate::error::Error;
use crate::exec::{Code, Op};
use crate::insn::Opcode;
use crate::types::{Digest, Kind, RuleId, Var, MAX_DEPTH, UNBOUNDED};
use crate::util::{to_char_lossy, DebugCheckIndex};
use core::fmt;

/// The node types of a rule graph.
///
/// A node is parameterized by the handle type `H` which names its operands:
/// [`RuleId`] within a [`Grammar`], [`Pc`](crate::Pc) within an
/// [`Assembler`](crate::Assembler). Literal text is stored as code points.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<H> {
    /// Any single code point, including NUL.
    Any,

    /// A code point in the inclusive range.
    Between(u32, u32),

    /// An ASCII letter.
    Alphabet,

    /// An ASCII digit.
    Digit,

    /// An ASCII hex digit of either case.
    Hex,

    /// An ASCII letter or digit.
    AlphaNumeric,

    /// A code point which is a member of the set.
    In(Box<[u32]>),

    /// A case-sensitive literal.
    Exact(Box<[u32]>),

    /// A case-insensitive literal.
    Like(Box<[u32]>),

    /// Space, tab or carriage return. Line feed is not whitespace.
    WhiteSpace,

    /// One specific code point.
    Is(u32),

    /// One or more digits.
    Decimal,

    /// One or more letters.
    Word,

    /// Zero-width; matches only at the end of the text.
    EndOfText,

    /// A line feed, optionally preceded by a carriage return.
    EndOfLine,

    /// A run of digits whose value lies in the inclusive range.
    Unsigned { min: u64, max: u64 },

    /// An optionally negative run of digits whose value lies in the inclusive
    /// range.
    Integer { min: i64, max: i64 },

    /// An optionally negative decimal with optional fraction, whose value
    /// lies in the inclusive range.
    Float { min: f64, max: f64 },

    /// Zero or more code points of the given classes. Always matches.
    Digest(Digest),

    /// Zero-width; matches iff the operand does not.
    Not(H),

    /// The first operand which matches.
    Or(Box<[H]>),

    /// All operands match from the same position; consumes the shortest.
    And(Box<[H]>),

    /// All operands match one after another.
    Sequence(Box<[H]>),

    /// The operand, greedily repeated between min and max times inclusive.
    Within { rule: H, min: usize, max: usize },

    /// Any text up to the first position where the operand matches.
    Until(H),

    /// The operand, binding the matched text to a variable.
    Extract { var: Var, rule: H },

    /// The operand, surrounded by two literals.
    Enclosed {
        open: Box<[u32]>,
        close: Box<[u32]>,
        rule: H,
    },
}

impl<H: Copy> Node<H> {
    /// The operands of this node, in order.
    pub fn children(&self) -> &[H] {
        match self {
            Node::Or(rules) | Node::And(rules) | Node::Sequence(rules) => rules,
            Node::Not(rule)
            | Node::Until(rule)
            | Node::Within { rule, .. }
            | Node::Extract { rule, .. }
            | Node::Enclosed { rule, .. } => core::slice::from_ref(rule),
            _ => &[],
        }
    }

    /// Convert the operand handles of this node with \p f.
    pub fn map<G, F: FnMut(H) -> G>(&self, mut f: F) -> Node<G> {
        match self {
            Node::Any => Node::Any,
            Node::Between(lo, hi) => Node::Between(*lo, *hi),
            Node::Alphabet => Node::Alphabet,
            Node::Digit => Node::Digit,
            Node::Hex => Node::Hex,
            Node::AlphaNumeric => Node::AlphaNumeric,
            Node::In(set) => Node::In(set.clone()),
            Node::Exact(text) => Node::Exact(text.clone()),
            Node::Like(text) => Node::Like(text.clone()),
            Node::WhiteSpace => Node::WhiteSpace,
            Node::Is(c) => Node::Is(*c),
            Node::Decimal => Node::Decimal,
            Node::Word => Node::Word,
            Node::EndOfText => Node::EndOfText,
            Node::EndOfLine => Node::EndOfLine,
            Node::Unsigned { min, max } => Node::Unsigned {
                min: *min,
                max: *max,
            },
            Node::Integer { min, max } => Node::Integer {
                min: *min,
                max: *max,
            },
            Node::Float { min, max } => Node::Float {
                min: *min,
                max: *max,
            },
            Node::Digest(classes) => Node::Digest(*classes),
            Node::Not(rule) => Node::Not(f(*rule)),
            Node::Or(rules) => Node::Or(rules.iter().map(|&r| f(r)).collect()),
            Node::And(rules) => Node::And(rules.iter().map(|&r| f(r)).collect()),
            Node::Sequence(rules) => Node::Sequence(rules.iter().map(|&r| f(r)).collect()),
            Node::Within { rule, min, max } => Node::Within {
                rule: f(*rule),
                min: *min,
                max: *max,
            },
            Node::Until(rule) => Node::Until(f(*rule)),
            Node::Extract { var, rule } => Node::Extract {
                var: *var,
                rule: f(*rule),
            },
            Node::Enclosed { open, close, rule } => Node::Enclosed {
                open: open.clone(),
                close: close.clone(),
                rule: f(*rule),
            },
        }
    }

    /// Check the configuration of this node, independent of its operands.
    pub(crate) fn check(&self) -> Result<(), Error> {
        let inverted = match self {
            Node::Or(rules) | Node::And(rules) | Node::Sequence(rules) if rules.is_empty() => {
                return Err(Error::EmptyOperands { rule: self.name() })
            }
            Node::Between(lo, hi) => lo > hi,
            Node::Unsigned { min, max } => min > max,
            Node::Integer { min, max } => min > max,
            Node::Float { min, max } => min.is_nan() || max.is_nan() || min > max,
            Node::Within { min, max, .. } => min > max,
            _ => false,
        };
        if inverted {
            return Err(Error::InvalidBounds { rule: self.name() });
        }
        Ok(())
    }

    /// The lowercase name of this node's kind.
    pub fn name(&self) -> &'static str {
        Opcode::of(self).name()
    }

    /// View this node as an operation for the matcher.
    pub(crate) fn op(&self) -> Op<'_, H> {
        match self {
            Node::Any => Op::Any,
            Node::Between(lo, hi) => Op::Between(*lo, *hi),
            Node::Alphabet => Op::Alphabet,
            Node::Digit => Op::Digit,
            Node::Hex => Op::Hex,
            Node::AlphaNumeric => Op::AlphaNumeric,
            Node::In(set) => Op::In(set),
            Node::Exact(text) => Op::Exact(text),
            Node::Like(text) => Op::Like(text),
            Node::WhiteSpace => Op::WhiteSpace,
            Node::Is(c) => Op::Is(*c),
            Node::Decimal => Op::Decimal,
            Node::Word => Op::Word,
            Node::EndOfText => Op::EndOfText,
            Node::EndOfLine => Op::EndOfLine,
            Node::Unsigned { min, max } => Op::Unsigned {
                min: *min,
                max: *max,
            },
            Node::Integer { min, max } => Op::Integer {
                min: *min,
                max: *max,
            },
            Node::Float { min, max } => Op::Float {
                min: *min,
                max: *max,
            },
            Node::Digest(classes) => Op::Digest(*classes),
            Node::Not(rule) => Op::Not(*rule),
            Node::Or(rules) => Op::Or(rules),
            Node::And(rules) => Op::And(rules),
            Node::Sequence(rules) => Op::Sequence(rules),
            Node::Within { rule, min, max } => Op::Within {
                rule: *rule,
                min: *min,
                max: *max,
            },
            Node::Until(rule) => Op::Until(*rule),
            Node::Extract { var, rule } => Op::Extract {
                var: *var,
                rule: *rule,
            },
            Node::Enclosed { open, close, rule } => Op::Enclosed {
                open,
                close,
                rule: *rule,
            },
        }
    }
}

/// An arena in which a rule graph is built.
///
/// Every builder call appends one node and returns its handle. Operands must
/// already exist, so the graph is acyclic and nodes only refer backwards.
/// Construction errors are remembered and reported by [`Grammar::finish`].
#[derive(Debug, Clone, Default)]
pub struct Grammar {
    nodes: Vec<Node<RuleId>>,

    /// Nesting depth of each node, parallel to `nodes`.
    depths: Vec<u32>,

    variables: Vec<Kind>,
    error: Option<Error>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of nodes added so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The first construction error, if any.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    fn validate(&self, node: &Node<RuleId>, depth: u32) -> Result<(), Error> {
        node.check()?;
        if let Some(bad) = node.children().iter().find(|r| r.index() >= self.nodes.len()) {
            return Err(Error::UnknownRule(bad.0));
        }
        if depth as usize > MAX_DEPTH {
            return Err(Error::TooDeep);
        }
        if let Node::Extract { var, .. } = node {
            if var.index() >= self.variables.len() {
                return Err(Error::UnknownVariable(var.0));
            }
        }
        Ok(())
    }

    /// Finish building, producing a Rule which matches \p root.
    pub fn finish(self, root: RuleId) -> Result<Rule, Error> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if root.index() >= self.nodes.len() {
            return Err(Error::UnknownRule(root.0));
        }
        Ok(Rule {
            nodes: self.nodes.into_boxed_slice(),
            variables: self.variables.into_boxed_slice(),
            root,
        })
    }
}

impl Builder for Grammar {
    type Handle = RuleId;

    fn variable(&mut self, kind: Kind) -> Var {
        self.variables.push(kind);
        Var((self.variables.len() - 1) as u32)
    }

    fn add(&mut self, node: Node<RuleId>) -> RuleId {
        let deepest = node
            .children()
            .iter()
            .filter_map(|r| self.depths.get(r.index()))
            .max();
        let depth = 1 + deepest.copied().unwrap_or(0);
        if let Err(error) = self.validate(&node, depth) {
            self.error.get_or_insert(error);
        }
        self.depths.push(depth);
        self.nodes.push(node);
        RuleId((self.nodes.len() - 1) as u32)
    }
}

/// A finished rule graph, matched by walking its nodes directly.
#[derive(Debug, Clone)]
pub struct Rule {
    nodes: Box<[Node<RuleId>]>,
    variables: Box<[Kind]>,
    root: RuleId,
}

impl Rule {
    /// The node this rule matches.
    pub fn root(&self) -> RuleId {
        self.root
    }

    /// Look up a node by handle.
    pub fn node(&self, id: RuleId) -> Option<&Node<RuleId>> {
        self.nodes.get(id.index())
    }

    /// All nodes, in the order they were added.
    pub fn nodes(&self) -> &[Node<RuleId>] {
        &self.nodes
    }

    /// The kinds of the declared extraction variables.
    pub fn variables(&self) -> &[Kind] {
        &self.variables
    }

    /// \return a vector indexed by node, true for every node reachable from
    /// the root.
    pub(crate) fn reachable(&self) -> Vec<bool> {
        let mut live = vec![false; self.nodes.len()];
        live[self.root.index()] = true;
        // Operands always precede the nodes using them.
        for idx in (0..=self.root.index()).rev() {
            if live[idx] {
                for child in self.nodes[idx].children() {
                    live[child.index()] = true;
                }
            }
        }
        live
    }
}

/// Write \p text as a quoted literal.
fn fmt_text(f: &mut fmt::Formatter, text: &[u32]) -> fmt::Result {
    let s: String = text.iter().map(|&c| to_char_lossy(c)).collect();
    write!(f, " {:?}", s)
}

/// Write one line of a listing: the operation \p op at \p at, named
/// \p name, with its operands named by \p index.
pub(crate) fn fmt_op<R: Copy, F: Fn(R) -> usize>(
    f: &mut fmt::Formatter,
    is_root: bool,
    at: usize,
    name: &str,
    op: Op<'_, R>,
    index: F,
) -> fmt::Result {
    let marker = if is_root { '*' } else { ' ' };
    write!(f, "{}{:04}: {}", marker, at, name)?;
    let children: &[R] = match op {
        Op::Between(lo, hi) => {
            write!(f, " {:?}..={:?}", to_char_lossy(lo), to_char_lossy(hi))?;
            &[]
        }
        Op::In(text) | Op::Exact(text) | Op::Like(text) => {
            fmt_text(f, text)?;
            &[]
        }
        Op::Is(c) => {
            write!(f, " {:?}", to_char_lossy(c))?;
            &[]
        }
        Op::Unsigned { min, max } => {
            write!(f, " {}..={}", min, max)?;
            &[]
        }
        Op::Integer { min, max } => {
            write!(f, " {}..={}", min, max)?;
            &[]
        }
        Op::Float { min, max } => {
            write!(f, " {}..={}", min, max)?;
            &[]
        }
        Op::Digest(classes) => {
            write!(f, " [{}]", classes)?;
            &[]
        }
        Op::Or(rules) | Op::And(rules) | Op::Sequence(rules) => rules,
        Op::Within { min, max, .. } => {
            write!(f, " {}..=", min)?;
            if max == UNBOUNDED {
                f.write_str("inf")?;
            } else {
                write!(f, "{}", max)?;
            }
            &[]
        }
        Op::Extract { var, .. } => {
            write!(f, " ${}", var.index())?;
            &[]
        }
        Op::Enclosed { open, close, .. } => {
            fmt_text(f, open)?;
            fmt_text(f, close)?;
            &[]
        }
        _ => &[],
    };
    let single = match op {
        Op::Not(rule)
        | Op::Until(rule)
        | Op::Within { rule, .. }
        | Op::Extract { rule, .. }
        | Op::Enclosed { rule, .. } => Some(rule),
        _ => None,
    };
    if !children.is_empty() || single.is_some() {
        f.write_str(" ->")?;
        for &child in children.iter().chain(single.as_ref()) {
            write!(f, " {:04}", index(child))?;
        }
    }
    writeln!(f)
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let live = self.reachable();
        for (idx, node) in self.nodes.iter().enumerate() {
            if live[idx] {
                let is_root = idx == self.root.index();
                fmt_op(f, is_root, idx, node.name(), node.op(), RuleId::index)?;
            }
        }
        Ok(())
    }
}

impl Code for Rule {
    type Ref = RuleId;

    #[inline(always)]
    fn op(&self, r: RuleId) -> Op<'_, RuleId> {
        self.nodes.iat(r.index()).op()
    }

    fn root(&self) -> RuleId {
        self.root
    }

    fn variables(&self) -> &[Kind] {
        &self.variables
    }
}
