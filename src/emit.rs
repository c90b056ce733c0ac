//! Compiler back-end: encodes nodes as bytecode, either directly through the
//! Assembler or by compiling a finished Rule.

use crate::builder::Builder;
use crate::error::Error;
use crate::insn::{bound_to_wide, Opcode, Program};
use crate::ir::{Node, Rule};
use crate::types::{Kind, Pc, Var};

/// A [`Builder`] which emits bytecode directly.
///
/// Each builder call appends one instruction and returns its offset. As with
/// a [`Grammar`](crate::Grammar), operands must be built before the rules
/// which use them. Malformed instructions are reported by
/// [`Assembler::finish`].
#[derive(Debug, Clone, Default)]
pub struct Assembler {
    words: Vec<u32>,
    texts: Vec<u32>,
    variables: Vec<Kind>,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of words emitted so far.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Finish assembling, producing a Program which matches \p entry.
    pub fn finish(self, entry: Pc) -> Result<Program, Error> {
        Program::from_parts(self.words, self.texts, self.variables, entry.0)
    }

    /// Emit a span of the literal pool holding \p text.
    fn emit_text(&mut self, text: &[u32]) {
        self.words.push(self.texts.len() as u32);
        self.words.push(text.len() as u32);
        self.texts.extend_from_slice(text);
    }

    fn emit_wide(&mut self, value: u64) {
        self.words.push(value as u32);
        self.words.push((value >> 32) as u32);
    }

    fn emit_calls(&mut self, calls: &[Pc]) {
        self.words.push(calls.len() as u32);
        self.words.extend(calls.iter().map(|pc| pc.0));
    }
}

impl Builder for Assembler {
    type Handle = Pc;

    fn variable(&mut self, kind: Kind) -> Var {
        self.variables.push(kind);
        Var((self.variables.len() - 1) as u32)
    }

    fn add(&mut self, node: Node<Pc>) -> Pc {
        let pc = Pc(self.words.len() as u32);
        self.words.push(Opcode::of(&node) as u32);
        match &node {
            Node::Between(lo, hi) => {
                self.words.push(*lo);
                self.words.push(*hi);
            }
            Node::In(text) | Node::Exact(text) | Node::Like(text) => self.emit_text(text),
            Node::Is(c) => self.words.push(*c),
            Node::Unsigned { min, max } => {
                self.emit_wide(*min);
                self.emit_wide(*max);
            }
            Node::Integer { min, max } => {
                self.emit_wide(*min as u64);
                self.emit_wide(*max as u64);
            }
            Node::Float { min, max } => {
                self.emit_wide(min.to_bits());
                self.emit_wide(max.to_bits());
            }
            Node::Digest(classes) => self.words.push(classes.bits()),
            Node::Within { min, max, .. } => {
                self.emit_wide(bound_to_wide(*min));
                self.emit_wide(bound_to_wide(*max));
            }
            Node::Extract { var, .. } => self.words.push(var.0),
            Node::Enclosed { open, close, .. } => {
                self.emit_text(open);
                self.emit_text(close);
            }
            _ => {}
        }
        let calls = node.children();
        if !calls.is_empty() || matches!(node, Node::Or(_) | Node::And(_) | Node::Sequence(_)) {
            self.emit_calls(calls);
        }
        pc
    }
}

impl Rule {
    /// Compile this rule to bytecode. Nodes unreachable from the root are
    /// not emitted.
    pub fn compile(&self) -> Program {
        let live = self.reachable();
        let mut asm = Assembler::new();
        for &kind in self.variables() {
            asm.variable(kind);
        }
        // Offset of each emitted node. Operands precede their users, so every
        // lookup finds an emitted node.
        let mut pcs: Vec<Pc> = Vec::with_capacity(self.nodes().len());
        for (idx, node) in self.nodes().iter().enumerate() {
            let pc = if live[idx] {
                asm.add(node.map(|r| pcs[r.index()]))
            } else {
                Pc(u32::MAX)
            };
            pcs.push(pc);
        }
        let entry = pcs[self.root().index()];
        Program::from_validated(asm.words, asm.texts, asm.variables, entry.0)
    }
}
