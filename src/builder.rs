use crate::composites;
use crate::ir::Node;
use crate::types::{Digest, Kind, Var, UNBOUNDED};

fn code_points(text: &str) -> Box<[u32]> {
    text.chars().map(u32::from).collect()
}

/// The build-time interface shared by [`Grammar`](crate::Grammar) and
/// [`Assembler`](crate::Assembler).
///
/// Each method appends one rule and returns a handle usable as an operand of
/// later rules. Methods never fail; a malformed rule is remembered and
/// reported when the builder is finished.
pub trait Builder {
    /// A reference to a rule built by this builder.
    type Handle: Copy;

    /// Declare an extraction variable receiving values of \p kind.
    fn variable(&mut self, kind: Kind) -> Var;

    /// Append \p node.
    fn add(&mut self, node: Node<Self::Handle>) -> Self::Handle;

    fn any(&mut self) -> Self::Handle {
        self.add(Node::Any)
    }

    /// A code point in `lo..=hi`.
    fn between(&mut self, lo: char, hi: char) -> Self::Handle {
        self.add(Node::Between(lo.into(), hi.into()))
    }

    fn alphabet(&mut self) -> Self::Handle {
        self.add(Node::Alphabet)
    }

    fn digit(&mut self) -> Self::Handle {
        self.add(Node::Digit)
    }

    fn hex(&mut self) -> Self::Handle {
        self.add(Node::Hex)
    }

    fn alpha_numeric(&mut self) -> Self::Handle {
        self.add(Node::AlphaNumeric)
    }

    /// A code point appearing anywhere in \p set.
    #[doc(alias = "in")]
    fn one_of(&mut self, set: &str) -> Self::Handle {
        self.add(Node::In(code_points(set)))
    }

    fn exact(&mut self, text: &str) -> Self::Handle {
        self.add(Node::Exact(code_points(text)))
    }

    /// \p text, ignoring case.
    fn like(&mut self, text: &str) -> Self::Handle {
        self.add(Node::Like(code_points(text)))
    }

    /// Space, tab or carriage return.
    fn white_space(&mut self) -> Self::Handle {
        self.add(Node::WhiteSpace)
    }

    fn is(&mut self, c: char) -> Self::Handle {
        self.add(Node::Is(c.into()))
    }

    fn decimal(&mut self) -> Self::Handle {
        self.add(Node::Decimal)
    }

    fn word(&mut self) -> Self::Handle {
        self.add(Node::Word)
    }

    fn end_of_text(&mut self) -> Self::Handle {
        self.add(Node::EndOfText)
    }

    fn end_of_line(&mut self) -> Self::Handle {
        self.add(Node::EndOfLine)
    }

    fn unsigned(&mut self, min: u64, max: u64) -> Self::Handle {
        self.add(Node::Unsigned { min, max })
    }

    fn integer(&mut self, min: i64, max: i64) -> Self::Handle {
        self.add(Node::Integer { min, max })
    }

    fn float(&mut self, min: f64, max: f64) -> Self::Handle {
        self.add(Node::Float { min, max })
    }

    fn digest(&mut self, classes: Digest) -> Self::Handle {
        self.add(Node::Digest(classes))
    }

    fn not(&mut self, rule: Self::Handle) -> Self::Handle {
        self.add(Node::Not(rule))
    }

    fn or(&mut self, rules: &[Self::Handle]) -> Self::Handle {
        self.add(Node::Or(rules.into()))
    }

    fn and(&mut self, rules: &[Self::Handle]) -> Self::Handle {
        self.add(Node::And(rules.into()))
    }

    fn sequence(&mut self, rules: &[Self::Handle]) -> Self::Handle {
        self.add(Node::Sequence(rules.into()))
    }

    /// \p rule repeated at least \p min and at most \p max times. Use
    /// [`UNBOUNDED`] for no upper limit.
    fn within(&mut self, rule: Self::Handle, min: usize, max: usize) -> Self::Handle {
        self.add(Node::Within { rule, min, max })
    }

    fn until(&mut self, rule: Self::Handle) -> Self::Handle {
        self.add(Node::Until(rule))
    }

    fn extract(&mut self, var: Var, rule: Self::Handle) -> Self::Handle {
        self.add(Node::Extract { var, rule })
    }

    fn enclosed(&mut self, open: &str, close: &str, rule: Self::Handle) -> Self::Handle {
        self.add(Node::Enclosed {
            open: code_points(open),
            close: code_points(close),
            rule,
        })
    }

    fn times(&mut self, rule: Self::Handle, count: usize) -> Self::Handle {
        self.within(rule, count, count)
    }

    fn one_or_more(&mut self, rule: Self::Handle) -> Self::Handle {
        self.within(rule, 1, UNBOUNDED)
    }

    #[doc(alias = "while")]
    fn zero_or_more(&mut self, rule: Self::Handle) -> Self::Handle {
        self.within(rule, 0, UNBOUNDED)
    }

    #[doc(alias = "optional")]
    fn zero_or_one(&mut self, rule: Self::Handle) -> Self::Handle {
        self.within(rule, 0, 1)
    }

    /// A dotted-quad IPv4 address.
    fn ipv4(&mut self) -> Self::Handle {
        composites::ipv4(self)
    }

    /// An IPv4 address or a DNS name.
    fn host(&mut self) -> Self::Handle {
        composites::host(self)
    }

    fn email(&mut self) -> Self::Handle {
        composites::email(self)
    }

    fn phone(&mut self) -> Self::Handle {
        composites::phone(self)
    }
}
