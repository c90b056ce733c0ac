use thiserror::Error;

/// Represents an error encountered while building a rule or program.
///
/// Matching never produces an Error: failure to match is an ordinary
/// outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A combinator which needs operands was given none.
    #[error("{rule} requires at least one operand")]
    EmptyOperands { rule: &'static str },

    /// A lower bound exceeds its upper bound.
    #[error("{rule} has a minimum greater than its maximum")]
    InvalidBounds { rule: &'static str },

    /// A rule handle that was not produced by this grammar.
    #[error("rule {0} does not belong to this grammar")]
    UnknownRule(u32),

    /// An extraction into a variable that was never declared.
    #[error("variable {0} is not declared")]
    UnknownVariable(u32),

    /// A call entry which does not name the start of an earlier instruction.
    #[error("instruction at {pc} calls {target}, which is not an earlier instruction")]
    BadCall { pc: u32, target: u32 },

    /// A single-operand instruction with some other operand count.
    #[error("instruction at {pc} expects one operand but has {count}")]
    BadArity { pc: u32, count: u32 },

    /// The program entry point is not an instruction.
    #[error("entry point {0} is not an instruction")]
    BadEntry(u32),

    /// A word which is not an opcode, where an opcode was expected.
    #[error("invalid opcode {opcode:#x} at {pc}")]
    InvalidOpcode { pc: u32, opcode: u32 },

    /// An instruction whose operands run past the end of the program.
    #[error("instruction at {pc} is truncated")]
    Truncated { pc: u32 },

    /// A literal span outside the program's text pool.
    #[error("instruction at {pc} refers to text outside the literal pool")]
    BadText { pc: u32 },

    /// An unrecognized variable kind in a program's variable table.
    #[error("variable {0} has an invalid kind")]
    BadKind(u32),

    /// A flattened program whose header is missing or inconsistent.
    #[error("malformed program header")]
    BadHeader,

    /// Rules nested more than [`MAX_DEPTH`](crate::MAX_DEPTH) deep.
    #[error("rules may be nested at most {} deep", crate::MAX_DEPTH)]
    TooDeep,
}
