// Work around dead code warnings: rust-lang issue #46379
pub mod common;

// Work around dead code warnings: rust-lang issue #46379
use common::*;
use ruleparse::{composites, Builder, Digest, Error, Grammar, Kind, MAX_DEPTH, UNBOUNDED};

fn character_filters_tc(tc: TestConfig) {
    let any = tc.build(|g| g.any());
    assert_eq!(any.match1("\u{e9}t\u{e9}"), "\u{e9}");
    assert_eq!(any.match1("\u{1F600}"), "\u{1F600}");
    any.test_succeeds("\0");
    any.test_fails("");

    let lower = tc.build(|g| g.between('a', 'f'));
    lower.test_succeeds("c");
    lower.test_fails("g");

    tc.build(|g| g.alphabet()).test_succeeds("Z");
    tc.build(|g| g.alphabet()).test_fails("\u{e9}");
    tc.build(|g| g.digit()).test_succeeds("7");
    tc.build(|g| g.digit()).test_fails("x");
    tc.build(|g| g.hex()).test_succeeds("F");
    tc.build(|g| g.hex()).test_fails("G");
    tc.build(|g| g.alpha_numeric()).test_fails("_");

    let set = tc.build(|g| g.one_of("xyz"));
    set.test_succeeds("y");
    set.test_fails("a");

    let x = tc.build(|g| g.is('x'));
    assert_eq!(x.match1("xx"), "x");
    x.test_fails("X");
}

#[test]
fn character_filters() {
    test_with_configs(character_filters_tc)
}

fn white_space_tc(tc: TestConfig) {
    let ws = tc.build(|g| g.white_space());
    ws.test_succeeds(" ");
    ws.test_succeeds("\t");
    ws.test_succeeds("\r");
    // Line feed is not whitespace.
    ws.test_fails("\n");
    ws.test_fails("\u{a0}");
}

#[test]
fn white_space() {
    test_with_configs(white_space_tc)
}

fn literals_tc(tc: TestConfig) {
    let exact = tc.build(|g| g.exact("abc"));
    assert_eq!(exact.match1("abcd"), "abc");
    exact.test_fails("abx");
    exact.test_fails("ab");
    exact.test_fails("ABC");

    let like = tc.build(|g| g.like("HeLLo"));
    assert_eq!(like.match1("hello world"), "hello");
    like.test_fails("help");

    let accented = tc.build(|g| g.like("\u{e9}cole"));
    assert_eq!(accented.match1("\u{c9}COLE!"), "\u{c9}COLE");

    let empty = tc.build(|g| g.exact(""));
    assert_eq!(empty.find("abc").unwrap().consumed, 0);
}

#[test]
fn literals() {
    test_with_configs(literals_tc)
}

fn runs_tc(tc: TestConfig) {
    let decimal = tc.build(|g| g.decimal());
    assert_eq!(decimal.match1("0123a"), "0123");
    decimal.test_fails("");
    decimal.test_fails("a1");

    let word = tc.build(|g| g.word());
    assert_eq!(word.match1("abc1"), "abc");
    word.test_fails("1abc");

    let digest = tc.build(|g| g.digest(Digest::from("ld")));
    assert_eq!(digest.match1("ab12Cd"), "ab12");
    assert_eq!(digest.match1("Xab"), "");
    assert_eq!(digest.match1(""), "");

    let upper = tc.build(|g| g.digest(Digest::from("us")));
    assert_eq!(upper.match1("AB C\td"), "AB C\t");
}

#[test]
fn runs() {
    test_with_configs(runs_tc)
}

fn ends_tc(tc: TestConfig) {
    let eot = tc.build(|g| g.end_of_text());
    eot.test_succeeds("");
    eot.test_fails("a");

    let eol = tc.build(|g| g.end_of_line());
    eol.test_full("\n");
    eol.test_full("\r\n");
    eol.test_fails("\r");
    eol.test_fails("\rx");
    eol.test_fails("x\n");
}

#[test]
fn ends() {
    test_with_configs(ends_tc)
}

fn numbers_tc(tc: TestConfig) {
    let unsigned = tc.build(|g| g.unsigned(10, 20));
    assert_eq!(unsigned.match1("15x"), "15");
    unsigned.test_full("20");
    unsigned.test_fails("9");
    unsigned.test_fails("21");
    unsigned.test_fails("-15");
    unsigned.test_fails("99999999999999999999999");

    let integer = tc.build(|g| g.integer(-10, 10));
    integer.test_full("-10");
    integer.test_full("7");
    integer.test_fails("-11");
    integer.test_fails("-");
    integer.test_fails("+5");

    let full = tc.build(|g| g.integer(i64::MIN, i64::MAX));
    full.test_full("-9223372036854775808");
    full.test_fails("9223372036854775808");

    let float = tc.build(|g| g.float(-1.5, 2.25));
    float.test_full("2.25");
    float.test_full("-1.5");
    float.test_full("0.75");
    float.test_fails("2.5");
    assert_eq!(float.match1("1."), "1");
    assert_eq!(float.match1(".5."), ".5");
    float.test_fails(".");
}

#[test]
fn numbers() {
    test_with_configs(numbers_tc)
}

fn not_tc(tc: TestConfig) {
    let not_a = tc.build(|g| {
        let a = g.is('a');
        g.not(a)
    });
    assert_eq!(not_a.find("b").unwrap().consumed, 0);
    not_a.test_fails("a");
    assert_eq!(not_a.find("").unwrap().consumed, 0);

    // Double negation is a zero-width lookahead.
    let ahead = tc.build(|g| {
        let a = g.exact("ab");
        let n = g.not(a);
        g.not(n)
    });
    assert_eq!(ahead.find("abc").unwrap().consumed, 0);
    ahead.test_fails("ac");
}

#[test]
fn not() {
    test_with_configs(not_tc)
}

fn or_tc(tc: TestConfig) {
    // The first alternative which matches wins.
    let first = tc.build(|g| {
        let short = g.exact("ab");
        let long = g.exact("abc");
        g.or(&[short, long])
    });
    assert_eq!(first.match1("abc"), "ab");

    let second = tc.build(|g| {
        let long = g.exact("abc");
        let short = g.exact("ab");
        g.or(&[long, short])
    });
    assert_eq!(second.match1("abc"), "abc");
    assert_eq!(second.match1("abd"), "ab");
    second.test_fails("a");
}

#[test]
fn or() {
    test_with_configs(or_tc)
}

fn and_tc(tc: TestConfig) {
    let shorter = tc.build(|g| {
        let word = g.word();
        let any = g.any();
        let two = g.within(any, 1, 2);
        g.and(&[word, two])
    });
    assert_eq!(shorter.match1("abcd"), "ab");
    assert_eq!(shorter.match1("a1"), "a");
    shorter.test_fails("1a");

    let octet = tc.build(composites::octet::<Grammar>);
    octet.test_fails("999");
    let m = octet.find("25x").unwrap();
    assert_eq!((m.text.as_str(), m.consumed), ("25", 2));
    octet.test_full("0");
    octet.test_full("255");
    octet.test_fails("256");
    // The integer reads all four digits, so the intersection fails.
    octet.test_fails("1234");
}

#[test]
fn and() {
    test_with_configs(and_tc)
}

fn sequence_tc(tc: TestConfig) {
    let ab = tc.build(|g| {
        let a = g.is('a');
        let b = g.is('b');
        g.sequence(&[a, b])
    });
    ab.test_full("ab");
    ab.test_fails("ac");
    ab.test_fails("a");

    let single = tc.build(|g| {
        let a = g.is('a');
        g.sequence(&[a])
    });
    single.test_full("a");
}

#[test]
fn sequence() {
    test_with_configs(sequence_tc)
}

fn repetition_tc(tc: TestConfig) {
    let within = tc.build(|g| {
        let a = g.is('A');
        g.within(a, 2, 4)
    });
    within.test_full("AA");
    within.test_full("AAA");
    within.test_full("AAAA");
    within.test_fails("");
    within.test_fails("A");
    within.test_not_full("AAAAA");
    assert_eq!(within.match1("AAAAA"), "AAAA");

    let anchored = tc.build(|g| {
        let a = g.is('A');
        let w = g.within(a, 2, 4);
        let eot = g.end_of_text();
        g.sequence(&[w, eot])
    });
    anchored.test_full("AAAA");
    anchored.test_fails("AAAAA");

    let times = tc.build(|g| {
        let d = g.digit();
        g.times(d, 3)
    });
    assert_eq!(times.match1("1234"), "123");
    times.test_fails("12");

    let optional = tc.build(|g| {
        let x = g.is('x');
        g.zero_or_one(x)
    });
    assert_eq!(optional.match1("xx"), "x");
    assert_eq!(optional.match1("y"), "");

    let some = tc.build(|g| {
        let x = g.is('x');
        g.one_or_more(x)
    });
    assert_eq!(some.match1("xxxy"), "xxx");
    some.test_fails("y");

    let zero = tc.build(|g| {
        let x = g.is('x');
        g.within(x, 0, 0)
    });
    assert_eq!(zero.match1("xx"), "");
}

#[test]
fn repetition() {
    test_with_configs(repetition_tc)
}

fn zero_progress_tc(tc: TestConfig) {
    // A body which can match without consuming ends the repetition.
    let nested = tc.build(|g| {
        let x = g.is('x');
        let opt = g.zero_or_one(x);
        g.zero_or_more(opt)
    });
    assert_eq!(nested.match1("xxy"), "xx");
    assert_eq!(nested.match1("y"), "");

    let lookahead = tc.build(|g| {
        let x = g.is('x');
        let n = g.not(x);
        g.within(n, 3, UNBOUNDED)
    });
    assert_eq!(lookahead.match1("abc"), "");
    lookahead.test_fails("x");
}

#[test]
fn zero_progress() {
    test_with_configs(zero_progress_tc)
}

fn until_tc(tc: TestConfig) {
    let quote = tc.build(|g| {
        let q = g.is('"');
        g.until(q)
    });
    let m = quote.find("abc\"def").unwrap();
    assert_eq!((m.text.as_str(), m.consumed), ("abc", 3));
    quote.test_fails("abcdef");
    assert_eq!(quote.match1("\"x"), "");

    let dashes = tc.build(|g| {
        let d = g.exact("--");
        g.until(d)
    });
    assert_eq!(dashes.match1("a-b--c"), "a-b");
    dashes.test_fails("a-b-c");

    let accent = tc.build(|g| {
        let e = g.is('\u{e9}');
        g.until(e)
    });
    assert_eq!(accent.match1("na\u{ef}ve \u{e9}t\u{e9}"), "na\u{ef}ve ");

    let digit = tc.build(|g| {
        let d = g.digit();
        g.until(d)
    });
    assert_eq!(digit.match1("ab3"), "ab");
    digit.test_fails("abc");

    // The end of text is a position where the terminator may match.
    let end = tc.build(|g| {
        let eot = g.end_of_text();
        g.until(eot)
    });
    end.test_full("abc");
}

#[test]
fn until() {
    test_with_configs(until_tc)
}

fn enclosed_tc(tc: TestConfig) {
    let parens = tc.build(|g| {
        let d = g.decimal();
        g.enclosed("(", ")", d)
    });
    parens.test_full("(42)");
    parens.test_fails("(42");
    parens.test_fails("(x)");
    parens.test_fails("42)");

    let comment = tc.build(|g| {
        let end = g.exact("*/");
        let body = g.until(end);
        g.enclosed("/*", "*/", body)
    });
    assert_eq!(comment.match1("/* a * b */ c"), "/* a * b */");
}

#[test]
fn enclosed() {
    test_with_configs(enclosed_tc)
}

fn email_extraction_tc(tc: TestConfig) {
    let mut g = Grammar::new();
    let name = g.variable(Kind::Text);
    let domain = g.variable(Kind::Text);
    let local = composites::email_local(&mut g);
    let l = g.extract(name, local);
    let at = g.is('@');
    let host = g.host();
    let h = g.extract(domain, host);
    let root = g.sequence(&[l, at, h]);
    let email = tc.compile(&g.finish(root).unwrap());

    email.test_full("john.doe@hotmail.com");
    assert_eq!(
        email.values("john.doe@hotmail.com"),
        [Some("john.doe".to_string()), Some("hotmail.com".to_string())]
    );
    email.test_fails("john.doe@");
}

#[test]
fn email_extraction() {
    test_with_configs(email_extraction_tc)
}

fn typed_extraction_tc(tc: TestConfig) {
    let numbers = |kind: Kind| {
        let mut g = Grammar::new();
        let v = g.variable(kind);
        let sign = g.is('-');
        let sign = g.zero_or_one(sign);
        let digits = g.decimal();
        let dot = g.is('.');
        let fraction = g.sequence(&[dot, digits]);
        let fraction = g.zero_or_one(fraction);
        let num = g.sequence(&[sign, digits, fraction]);
        let x = g.extract(v, num);
        tc.compile(&g.finish(x).unwrap())
    };

    let integer = numbers(Kind::Integer);
    assert_eq!(integer.values("-42"), [Some("-42".to_string())]);
    // The match succeeds but the text is not an integer.
    assert_eq!(integer.values("4.5"), [None]);

    let unsigned = numbers(Kind::Unsigned);
    assert_eq!(unsigned.values("007"), [Some("7".to_string())]);
    assert_eq!(unsigned.values("-7"), [None]);
    assert_eq!(unsigned.values("18446744073709551616"), [None]);

    let float = numbers(Kind::Float);
    assert_eq!(float.values("-2.5"), [Some("-2.5".to_string())]);
    assert_eq!(float.values("3"), [Some("3".to_string())]);

    let text = numbers(Kind::Text);
    assert_eq!(text.values("-2.5x"), [Some("-2.5".to_string())]);

    // An empty match still binds, to an empty range.
    let mut g = Grammar::new();
    let v = g.variable(Kind::Text);
    let d = g.digit();
    let digits = g.zero_or_more(d);
    let x = g.extract(v, digits);
    let rule = tc.compile(&g.finish(x).unwrap());
    assert_eq!(rule.values("x"), [Some(String::new())]);
}

#[test]
fn typed_extraction() {
    test_with_configs(typed_extraction_tc)
}

fn extraction_rollback_tc(tc: TestConfig) {
    // A binding made by a branch which later fails is undone.
    let mut g = Grammar::new();
    let v = g.variable(Kind::Text);
    let word = g.word();
    let x = g.extract(v, word);
    let bang = g.is('!');
    let shout = g.sequence(&[x, bang]);
    let root = g.or(&[shout, word]);
    let rule = tc.compile(&g.finish(root).unwrap());
    assert_eq!(rule.values("hello?"), [None]);
    assert_eq!(rule.values("hello!"), [Some("hello".to_string())]);

    // Repetition keeps the last binding.
    let mut g = Grammar::new();
    let v = g.variable(Kind::Text);
    let d = g.digit();
    let x = g.extract(v, d);
    let root = g.zero_or_more(x);
    let rule = tc.compile(&g.finish(root).unwrap());
    assert_eq!(rule.values("123a"), [Some("3".to_string())]);
    assert_eq!(rule.values("a"), [None]);

    // A lookahead does not bind.
    let mut g = Grammar::new();
    let v = g.variable(Kind::Text);
    let word = g.word();
    let x = g.extract(v, word);
    let n = g.not(x);
    let root = g.not(n);
    let rule = tc.compile(&g.finish(root).unwrap());
    assert_eq!(rule.values("abc"), [None]);

    // The terminator of Until keeps its bindings.
    let mut g = Grammar::new();
    let v = g.variable(Kind::Text);
    let q = g.is('"');
    let x = g.extract(v, q);
    let root = g.until(x);
    let rule = tc.compile(&g.finish(root).unwrap());
    let m = rule.find("abc\"").unwrap();
    assert_eq!(m.consumed, 3);
    assert_eq!(m.values, [Some("\"".to_string())]);
}

#[test]
fn extraction_rollback() {
    test_with_configs(extraction_rollback_tc)
}

fn collection_tc(tc: TestConfig) {
    // A list variable keeps every token of a repetition.
    let mut g = Grammar::new();
    let v = g.variable(Kind::TextList);
    let d = g.digit();
    let x = g.extract(v, d);
    let root = g.zero_or_more(x);
    let rule = tc.compile(&g.finish(root).unwrap());
    assert_eq!(rule.lists("123a"), [vec!["1", "2", "3"]]);
    assert_eq!(rule.values("123a"), [None]);
    assert_eq!(rule.lists("a"), [Vec::<String>::new()]);

    // Tokens of a failed iteration are dropped.
    let mut g = Grammar::new();
    let v = g.variable(Kind::TextList);
    let num = g.decimal();
    let x = g.extract(v, num);
    let comma = g.is(',');
    let tail = g.sequence(&[comma, x]);
    let tails = g.zero_or_more(tail);
    let root = g.sequence(&[x, tails]);
    let rule = tc.compile(&g.finish(root).unwrap());
    let m = rule.find("1,22,333;").unwrap();
    assert_eq!(m.text, "1,22,333");
    assert_eq!(m.lists, [vec!["1", "22", "333"]]);
    let m = rule.find("1,22,x").unwrap();
    assert_eq!(m.text, "1,22");
    assert_eq!(m.lists, [vec!["1", "22"]]);

    // So are those of a failed alternative.
    let mut g = Grammar::new();
    let v = g.variable(Kind::TextList);
    let letter = g.alphabet();
    let x = g.extract(v, letter);
    let letters = g.one_or_more(x);
    let bang = g.is('!');
    let shout = g.sequence(&[letters, bang]);
    let word = g.word();
    let root = g.or(&[shout, word]);
    let rule = tc.compile(&g.finish(root).unwrap());
    assert_eq!(rule.lists("hi!"), [vec!["h", "i"]]);
    assert_eq!(rule.lists("hi?"), [Vec::<String>::new()]);
    assert_eq!(rule.match1("hi?"), "hi");
}

#[test]
fn collection() {
    test_with_configs(collection_tc)
}

fn nesting_tc(tc: TestConfig) {
    let nested = |depth: usize| {
        let mut g = Grammar::new();
        let mut r = g.is('a');
        for _ in 1..depth {
            r = g.sequence(&[r]);
        }
        g.finish(r)
    };
    let deepest = tc.compile(&nested(MAX_DEPTH).unwrap());
    deepest.test_full("a");
    deepest.test_fails("b");
    assert_eq!(nested(MAX_DEPTH + 1).unwrap_err(), Error::TooDeep);
}

#[test]
fn nesting() {
    test_with_configs(nesting_tc)
}

fn scanning_tc(tc: TestConfig) {
    let decimal = tc.build(|g| g.decimal());
    assert_eq!(decimal.match_all("a1 b22 c333"), ["1", "22", "333"]);
    assert_eq!(decimal.match_all("\u{e9}1\u{fc}22"), ["1", "22"]);
    assert!(decimal.match_all("none").is_empty());

    let optional = tc.build(|g| {
        let d = g.digit();
        g.zero_or_more(d)
    });
    assert_eq!(optional.match_all("a1"), ["", "1", ""]);
}

#[test]
fn scanning() {
    test_with_configs(scanning_tc)
}
