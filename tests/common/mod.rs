#![allow(clippy::uninlined_format_args, dead_code)]

use ruleparse::{
    Ascii, Grammar, Pattern, Program, Reader, Rule, RuleId, Scanner, Utf16, Utf32, Utf8, Value,
};

/// Build a rule in a fresh grammar. \p build returns the root.
#[track_caller]
pub fn rule<F: FnOnce(&mut Grammar) -> RuleId>(build: F) -> Rule {
    let mut g = Grammar::new();
    let root = build(&mut g);
    match g.finish(root) {
        Ok(rule) => rule,
        Err(err) => panic!("Failed to build rule: {}", err),
    }
}

/// Format a bound value the way tests compare it.
fn format_value<E: ruleparse::Encoding>(value: &Value<'_, E>) -> String {
    match value {
        Value::Text(r) => r.to_string(),
        Value::Integer(v) => v.to_string(),
        Value::Unsigned(v) => v.to_string(),
        Value::Float(v) => v.to_string(),
    }
}

/// The outcome of an anchored match, independent of encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct TestMatch {
    /// The matched text.
    pub text: String,

    /// The number of code points consumed.
    pub consumed: usize,

    /// Whether the match reached the end of the input.
    pub at_end: bool,

    /// The value of each variable, in declaration order.
    pub values: Vec<Option<String>>,

    /// The texts collected by each list variable, in declaration order.
    pub lists: Vec<Vec<String>>,
}

/// The patterns under test.
#[derive(Debug, Clone)]
enum Compiled {
    Rule(Rule),
    Program(Program),
}

/// A rule prepared for one TestConfig.
#[derive(Debug, Clone)]
pub struct TestPattern {
    compiled: Compiled,
    variables: usize,
    tc: TestConfig,
}

impl TestPattern {
    /// Match at the start of \p units, checking that the two match entry
    /// points agree and that failure leaves the cursor alone.
    #[track_caller]
    fn run<E: ruleparse::Encoding>(&self, units: &[E::Unit]) -> Option<TestMatch> {
        let input = Reader::<E>::from_units(units);
        let mut checked = input.begin();
        let mut captured = input.begin();
        let (ok, m) = match &self.compiled {
            Compiled::Rule(r) => (r.check(&input, &mut checked), r.capture(&input, &mut captured)),
            Compiled::Program(p) => (p.check(&input, &mut checked), p.capture(&input, &mut captured)),
        };
        assert_eq!(ok, m.is_some(), "check and capture disagree ({:?})", self.tc);
        assert_eq!(checked, captured, "check and capture moved differently ({:?})", self.tc);
        let m = match m {
            Some(m) => m,
            None => {
                assert_eq!(captured, input.begin(), "Failed match moved the cursor");
                return None;
            }
        };
        assert_eq!(m.end(), captured);
        let mut values = vec![None; self.variables];
        for (var, value) in m.bindings() {
            values[var.index()] = Some(format_value(value));
        }
        let mut lists = vec![Vec::new(); self.variables];
        for (var, texts) in m.collected() {
            lists[var.index()] = texts.iter().map(|r| r.to_string()).collect();
        }
        Some(TestMatch {
            text: m.text().to_string(),
            consumed: m.text().code_points().count(),
            at_end: !input.valid(captured),
            values,
            lists,
        })
    }

    /// Collect every match found by scanning \p units.
    fn scan<E: ruleparse::Encoding>(&self, units: &[E::Unit]) -> Vec<String> {
        let mut scanner = Scanner::new(Reader::<E>::from_units(units));
        match &self.compiled {
            Compiled::Rule(r) => scanner.matches(r).map(|m| m.text().to_string()).collect(),
            Compiled::Program(p) => scanner.matches(p).map(|m| m.text().to_string()).collect(),
        }
    }

    /// Match at the start of \p input, in this config's encoding.
    #[track_caller]
    pub fn find(&self, input: &str) -> Option<TestMatch> {
        match self.tc.encoding {
            Encoding::Ascii if input.is_ascii() => self.run::<Ascii>(input.as_bytes()),
            Encoding::Ascii | Encoding::Utf8 => self.run::<Utf8>(input.as_bytes()),
            Encoding::Utf16 => self.run::<Utf16>(&input.encode_utf16().collect::<Vec<_>>()),
            Encoding::Utf32 => self.run::<Utf32>(&input.chars().map(u32::from).collect::<Vec<_>>()),
        }
    }

    /// Return a list of all non-overlapping matches in \p input.
    pub fn match_all(&self, input: &str) -> Vec<String> {
        match self.tc.encoding {
            Encoding::Ascii if input.is_ascii() => self.scan::<Ascii>(input.as_bytes()),
            Encoding::Ascii | Encoding::Utf8 => self.scan::<Utf8>(input.as_bytes()),
            Encoding::Utf16 => self.scan::<Utf16>(&input.encode_utf16().collect::<Vec<_>>()),
            Encoding::Utf32 => self.scan::<Utf32>(&input.chars().map(u32::from).collect::<Vec<_>>()),
        }
    }

    /// Match against \p input, returning the matched text.
    #[track_caller]
    pub fn match1(&self, input: &str) -> String {
        match self.find(input) {
            Some(m) => m.text,
            None => panic!("Failed to match {:?} ({:?})", input, self.tc),
        }
    }

    /// Match against \p input, returning the variable values.
    #[track_caller]
    pub fn values(&self, input: &str) -> Vec<Option<String>> {
        match self.find(input) {
            Some(m) => m.values,
            None => panic!("Failed to match {:?} ({:?})", input, self.tc),
        }
    }

    /// Match against \p input, returning the texts collected by list
    /// variables.
    #[track_caller]
    pub fn lists(&self, input: &str) -> Vec<Vec<String>> {
        match self.find(input) {
            Some(m) => m.lists,
            None => panic!("Failed to match {:?} ({:?})", input, self.tc),
        }
    }

    /// Test that matching against \p input fails.
    #[track_caller]
    pub fn test_fails(&self, input: &str) {
        assert!(
            self.find(input).is_none(),
            "Should not have matched {:?} ({:?})",
            input,
            self.tc
        )
    }

    /// Test that matching against \p input succeeds.
    #[track_caller]
    pub fn test_succeeds(&self, input: &str) {
        assert!(
            self.find(input).is_some(),
            "Should have matched {:?} ({:?})",
            input,
            self.tc
        )
    }

    /// Test that \p input matches in its entirety.
    #[track_caller]
    pub fn test_full(&self, input: &str) {
        match self.find(input) {
            Some(m) => assert!(m.at_end, "Matched only {:?} of {:?} ({:?})", m.text, input, self.tc),
            None => panic!("Failed to match {:?} ({:?})", input, self.tc),
        }
    }

    /// Test that \p input does not match in its entirety.
    #[track_caller]
    pub fn test_not_full(&self, input: &str) {
        if let Some(m) = self.find(input) {
            assert!(!m.at_end, "Should not have fully matched {:?} ({:?})", input, self.tc)
        }
    }
}

/// Our backend types.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Backend {
    /// Walk the rule graph.
    Rule,

    /// Compile to bytecode.
    Program,

    /// Compile to bytecode, flatten to words and rebuild.
    Restored,
}

/// Our encoding types.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Encoding {
    Ascii,
    Utf8,
    Utf16,
    Utf32,
}

/// Description of how to test a rule.
#[derive(Debug, Copy, Clone)]
pub struct TestConfig {
    backend: Backend,
    encoding: Encoding,
}

impl TestConfig {
    /// Prepare \p rule for this config.
    #[track_caller]
    pub fn compile(&self, rule: &Rule) -> TestPattern {
        let compiled = match self.backend {
            Backend::Rule => Compiled::Rule(rule.clone()),
            Backend::Program => Compiled::Program(rule.compile()),
            Backend::Restored => {
                let words = rule.compile().to_words();
                match Program::from_words(&words) {
                    Ok(p) => Compiled::Program(p),
                    Err(err) => panic!("Failed to restore program: {}", err),
                }
            }
        };
        TestPattern {
            compiled,
            variables: rule.variables().len(),
            tc: *self,
        }
    }

    /// Build a rule with \p build and prepare it for this config.
    #[track_caller]
    pub fn build<F: FnOnce(&mut Grammar) -> RuleId>(&self, build: F) -> TestPattern {
        self.compile(&rule(build))
    }
}

/// Invoke \p F with each test config, in turn.
pub fn test_with_configs<F>(func: F)
where
    F: Fn(TestConfig),
{
    for backend in [Backend::Rule, Backend::Program, Backend::Restored] {
        for encoding in [Encoding::Ascii, Encoding::Utf8, Encoding::Utf16, Encoding::Utf32] {
            func(TestConfig { backend, encoding });
        }
    }
}
