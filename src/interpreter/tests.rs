use super::*;
use crate::bnf::{load_grammar, BnfParser};
use crate::grammar::{Actual, Grammar, GrammarExpr, Overload};

fn expr(text: &str) -> Rc<GrammarExpr> {
    BnfParser::parse_fragment(text).unwrap()
}

/// spec.md §8 scenario 1: `"y" "a" "m" "l"` parses `"yaml"` to `"yaml"`.
#[test]
fn concat_of_literals() {
    let mut engine = Engine::new("yaml");
    let value = engine.parse(&expr("\"y\" \"a\" \"m\" \"l\"")).unwrap();
    assert_eq!(value, ParseValue::Str("yaml".to_string()));
}

/// spec.md §8 scenario 2: `[x30-x39]` accepts `"2"`, rejects `"a"`.
#[test]
fn range_accepts_and_rejects() {
    let digit = expr("[x30-x39]");
    assert_eq!(
        Engine::new("2").parse(&digit).unwrap(),
        ParseValue::Str("2".to_string())
    );
    assert!(Engine::new("a").parse(&digit).is_err());
}

fn digit_grammar() -> Grammar {
    let mut g = Grammar::new();
    g.define("dig", Overload::new(vec![], expr("[x30-x39]")));
    g.define(
        "letter",
        Overload::new(vec![], expr("dig - x30 - x31")),
    );
    g
}

/// spec.md §8 scenario 3: `dig - x30 - x31` rejects "0"/"1", accepts "2".
#[test]
fn diff_excludes_listed_alternatives() {
    let grammar = digit_grammar();
    let mut engine = Engine::new("1").with_grammar(&grammar);
    assert!(engine.parse_rule("letter").is_err());

    let mut engine = Engine::new("2").with_grammar(&grammar);
    assert_eq!(
        engine.parse_rule("letter").unwrap(),
        ParseValue::Str("2".to_string())
    );
}

#[test]
fn empty_concat_matches_only_empty_string() {
    let empty = Rc::new(GrammarExpr::Concat(Vec::new()));
    assert_eq!(Engine::new("").parse(&empty).unwrap(), ParseValue::None);
    assert!(Engine::new("x").parse(&empty).is_err());
}

#[test]
fn alt_accepts_iff_some_member_accepts() {
    let alt = expr("\"cat\" | \"dog\"");
    assert!(Engine::new("cat").parse(&alt).is_ok());
    assert!(Engine::new("dog").parse(&alt).is_ok());
    assert!(Engine::new("cow").parse(&alt).is_err());
}

#[test]
fn repeat_zero_zero_matches_only_empty_and_advances_nothing() {
    let r = Rc::new(GrammarExpr::Repeat(
        crate::grammar::Bound::Lit(0),
        crate::grammar::Bound::Lit(0),
        expr("'a'"),
    ));
    assert_eq!(Engine::new("").parse(&r).unwrap(), ParseValue::None);
    assert!(Engine::new("a").parse(&r).is_err());
}

#[test]
fn start_of_line_only_at_start_or_after_newline() {
    let rule = Rc::new(GrammarExpr::Concat(vec![
        Rc::new(GrammarExpr::StartOfLine),
        expr("'b'"),
    ]));
    assert!(Engine::new("b").parse(&rule).is_ok());

    let mut g = Grammar::new();
    g.define(
        "line",
        Overload::new(
            vec![],
            Rc::new(GrammarExpr::Concat(vec![expr("'a'"), expr("<end-of-input>")])),
        ),
    );
    let grammar = g;
    let mut engine = Engine::new("a").with_grammar(&grammar);
    assert!(engine.parse_rule("line").is_ok());
}

/// spec.md §8 scenario 5's shape: a parameterized indent production called
/// with a plain digit actual, matching exactly `n` leading spaces.
#[test]
fn parameterized_rule_matches_exact_indent() {
    let text = "\
s-item(n) ::= s-indent(n) \"-\" \" \" x61
s-indent(n) ::= \" \" × n
top ::= s-item(0)
";
    let grammar = load_grammar(text).unwrap();
    let mut engine = Engine::new("- a").with_grammar(&grammar);
    assert_eq!(
        engine.parse_rule("top").unwrap(),
        ParseValue::Str("- a".to_string())
    );
}

/// spec.md §4.3: a free binding variable from the auto-enumerated `{m, t}`
/// table is tried across its whole domain; only the value that makes the
/// repeat count match the input contributes a derivation, so the ambiguity
/// across the other five `m` values in `M_VAR_MAX`'s domain dedups away.
#[test]
fn m_variable_auto_enumeration_picks_the_unique_successful_indent() {
    let text = "
indent(m) ::= \" \" × m
top ::= indent(m) \"x\"
";
    let grammar = load_grammar(text).unwrap();
    let mut engine = Engine::new("  x").with_grammar(&grammar);
    assert_eq!(
        engine.parse_rule("top").unwrap(),
        ParseValue::Str("  x".to_string())
    );
}

#[test]
fn determinism_same_input_same_output() {
    let grammar = digit_grammar();
    let mut e1 = Engine::new("2").with_grammar(&grammar);
    let mut e2 = Engine::new("2").with_grammar(&grammar);
    assert_eq!(e1.parse_rule("letter"), e2.parse_rule("letter"));
}

#[test]
fn no_match_reports_input_head() {
    let grammar = digit_grammar();
    let mut engine = Engine::new("0").with_grammar(&grammar);
    let err = engine.parse_rule("letter").unwrap_err();
    assert_eq!(err.head, "0");
}

#[test]
fn lookahead_is_zero_width() {
    let rule = Rc::new(GrammarExpr::Concat(vec![
        Rc::new(GrammarExpr::Lookahead(true, expr("'a'"))),
        expr("'a'"),
    ]));
    assert_eq!(
        Engine::new("a").parse(&rule).unwrap(),
        ParseValue::Str("a".to_string())
    );
    let negative = Rc::new(GrammarExpr::Concat(vec![
        Rc::new(GrammarExpr::Lookahead(false, expr("'a'"))),
        expr("'b'"),
    ]));
    assert_eq!(
        Engine::new("b").parse(&negative).unwrap(),
        ParseValue::Str("b".to_string())
    );
    assert!(Engine::new("a").parse(&negative).is_err());
}

#[test]
fn lookbehind_succeeds_only_right_after_a_match() {
    let rule = Rc::new(GrammarExpr::Concat(vec![
        expr("'a'"),
        Rc::new(GrammarExpr::Lookbehind(expr("'a'"))),
    ]));
    assert!(Engine::new("a").parse(&rule).is_ok());
}

#[test]
fn genuine_ambiguity_dedups_to_a_set_of_distinct_values() {
    // Two overloads of the same rule both match "a", producing the same
    // scalar text twice: finish() must dedup to a single value rather than
    // a Set of identical strings.
    let mut g = Grammar::new();
    g.define("x", Overload::new(vec![], expr("'a'")));
    g.define("x", Overload::new(vec![], expr("'a'")));
    let mut engine = Engine::new("a").with_grammar(&g);
    assert_eq!(
        engine.parse_rule("x").unwrap(),
        ParseValue::Str("a".to_string())
    );
}

#[test]
fn memoization_cache_is_populated_after_a_parse() {
    let grammar = digit_grammar();
    let mut engine = Engine::new("2").with_grammar(&grammar);
    engine.parse_rule("letter").unwrap();
    assert!(engine.cache_len() > 0);
}

#[test]
fn tree_mode_and_flat_mode_agree_on_success() {
    let grammar = digit_grammar();
    let mut flat = Engine::new("2").with_grammar(&grammar);
    let mut tree = Engine::new("2").with_grammar(&grammar).with_tree_mode(true);
    assert_eq!(flat.parse_rule("letter").is_ok(), tree.parse_rule("letter").is_ok());

    let mut flat = Engine::new("0").with_grammar(&grammar);
    let mut tree = Engine::new("0").with_grammar(&grammar).with_tree_mode(true);
    assert_eq!(flat.parse_rule("letter").is_ok(), tree.parse_rule("letter").is_ok());
}

#[test]
fn tree_mode_wraps_rule_invocation_in_a_parse_node() {
    let grammar = digit_grammar();
    let mut engine = Engine::new("2").with_grammar(&grammar).with_tree_mode(true);
    match engine.parse_rule("letter").unwrap() {
        ParseValue::Node(node) => {
            assert_eq!(node.rule, "letter");
            assert_eq!((node.start, node.end), (0, 1));
        }
        other => panic!("expected a ParseNode, got {:?}", other),
    }
}

#[test]
fn rule_ref_with_actuals_resolves_against_caller_frame() {
    let mut g = Grammar::new();
    g.define(
        "digit-seq",
        Overload::new(
            vec![],
            Rc::new(GrammarExpr::RuleRef(
                "rep".to_string(),
                vec![Actual::Raw("3".to_string())],
            )),
        ),
    );
    g.define(
        "rep",
        Overload::new(
            vec![crate::grammar::Formal::Var('n')],
            Rc::new(GrammarExpr::Repeat(
                crate::grammar::Bound::Var('n'),
                crate::grammar::Bound::Var('n'),
                expr("[x30-x39]"),
            )),
        ),
    );
    let mut engine = Engine::new("123").with_grammar(&g);
    assert_eq!(
        engine.parse_rule("digit-seq").unwrap(),
        ParseValue::Str("123".to_string())
    );
}
