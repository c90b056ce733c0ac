/*!

# ruleparse - parser combinators compiled to bytecode

This crate provides a matching engine for text rules built from combinators rather than written in a pattern syntax. Rules are assembled from primitive filters (digits, letters, literals, bounded numbers) and combinators (sequence, alternation, repetition, negation), and are matched without backtracking into completed sub-rules: each rule either matches and advances, or fails and leaves the position where it was.

# Example: validate an address

```rust
use ruleparse::{Builder, Grammar, Pattern};
let mut g = Grammar::new();
let ip = g.ipv4();
let rule = g.finish(ip).unwrap();
assert!(rule.is_full_match("192.168.0.1"));
assert!(!rule.is_full_match("192.168.0.256"));
```

# Example: extracting values

Extraction variables are declared with a [`Kind`]. Text variables receive the matched range; numeric variables receive the parsed number. A [`Kind::TextList`] variable collects every range matched by its extraction, which is how the tokens of a repeated rule are gathered.

```rust
use ruleparse::{Builder, Grammar, Kind, Pattern};
let mut g = Grammar::new();
let key = g.variable(Kind::Text);
let value = g.variable(Kind::Integer);

let word = g.word();
let k = g.extract(key, word);
let eq = g.is('=');
let num = g.integer(i64::MIN, i64::MAX);
let v = g.extract(value, num);
let pair = g.sequence(&[k, eq, v]);
let rule = g.finish(pair).unwrap();

let m = rule.capture_str("width=-40").unwrap();
assert_eq!(m.reader(key).unwrap().to_string(), "width");
assert_eq!(m.integer(value), Some(-40));
```

# Example: compiled programs

A [`Rule`] can be compiled to a [`Program`], a flat array of bytecode words. Programs may be stored and rebuilt; rebuilding validates them.

```rust
use ruleparse::{Builder, Grammar, Pattern, Program};
let mut g = Grammar::new();
let host = g.host();
let program = g.finish(host).unwrap().compile();

let restored = Program::from_words(&program.to_words()).unwrap();
assert!(restored.is_full_match("example.com"));
println!("{}", restored);
```

A Program can also be built directly with an [`Assembler`], which implements the same [`Builder`] interface as [`Grammar`].

# Example: scanning text

```rust
use ruleparse::{Builder, Grammar, Scanner};
let mut g = Grammar::new();
let email = g.email();
let rule = g.finish(email).unwrap();

let mut scanner = Scanner::from("mail john.doe@hotmail.com or ann@example.org");
let found: Vec<String> = scanner.matches(&rule).map(|m| m.text().to_string()).collect();
assert_eq!(found, ["john.doe@hotmail.com", "ann@example.org"]);
```

# Encodings

Input is read through a [`Reader`] parameterized by an [`Encoding`]: [`Ascii`] for byte strings, [`Utf8`], [`Utf16`] and [`Utf32`]. Positions are [`Cursor`]s measured in code units of the encoding. Malformed input decodes as U+FFFD and never causes a failure other than a non-match.

# Crate features

- **prohibit-unsafe**. Replaces unchecked indexing of validated bytecode with checked indexing.

*/

#![warn(clippy::all)]
// Clippy's manual_range_contains suggestion produces worse codegen.
#![allow(clippy::manual_range_contains)]

pub use crate::api::*;
pub use crate::builder::Builder;
pub use crate::emit::Assembler;
pub use crate::encoding::{Ascii, Encoding, Probe, Utf16, Utf32, Utf8};
pub use crate::insn::{Opcode, Program};
pub use crate::ir::{Grammar, Node, Rule};
pub use crate::position::Cursor;
pub use crate::reader::{CodePoints, Reader};
pub use crate::scanner::{Matches, Scanner};
pub use crate::stream::{LineReader, LineSource};
pub use crate::types::{Digest, Kind, Pc, RuleId, Var, MAX_DEPTH, UNBOUNDED};
pub use crate::writer::Writer;

#[macro_use]
mod util;

mod api;
mod builder;
pub mod composites;
mod emit;
mod encoding;
mod error;
mod exec;
mod insn;
mod ir;
mod matchers;
mod position;
mod reader;
mod scanner;
mod stream;
mod types;
mod writer;
