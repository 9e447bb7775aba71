use super::*;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashSet};

fn set(tags: &[&str]) -> HashSet<String> {
    tags.iter().map(|s| s.to_string()).collect()
}

#[test]
fn basic_scenarios() {
    assert!(evaluate("a", &set(&["a"])));
    assert!(evaluate("NOT a", &set(&[])));
    assert!(!evaluate("a AND b", &set(&["a"])));
    assert!(evaluate("a OR b", &set(&["b"])));
}

#[test]
fn blank_matches_everything() {
    assert!(evaluate("", &set(&[])));
    assert!(evaluate("   ", &set(&["x"])));
    assert!(TagExpr::compile(" \t ").is_trivially_true());
}

#[test]
fn or_binds_looser_than_and() {
    // a OR (b AND c)
    assert!(evaluate("a OR b AND c", &set(&["a"])));
    assert!(!evaluate("a OR b AND c", &set(&["b"])));
    // (NOT a) AND b
    assert!(evaluate("NOT a AND b", &set(&["b"])));
    assert!(!evaluate("NOT a AND b", &set(&["a", "b"])));
}

#[test]
fn parentheses_group() {
    assert!(evaluate("(a OR b) AND c", &set(&["b", "c"])));
    assert!(!evaluate("(a OR b) AND c", &set(&["b"])));
    assert!(evaluate("NOT (a OR b)", &set(&[])));
    assert!(!evaluate("NOT (a OR b)", &set(&["a"])));
    assert!(evaluate("((a))", &set(&["a"])));
    assert!(evaluate("NOT(a)AND(b)", &set(&["b"])));
}

#[test]
fn keywords_match_whole_words() {
    assert!(evaluate("ANDROID", &set(&["ANDROID"])));
    assert!(evaluate("ORBIT AND NOTE", &set(&["ORBIT", "NOTE"])));
    // lower-case operators are identifiers
    assert!(!evaluate("and", &set(&["a"])));
}

#[test]
fn literals() {
    assert!(evaluate("TRUE", &set(&[])));
    assert!(!evaluate("FALSE", &set(&[])));
    assert!(evaluate("NOT FALSE", &set(&[])));
    assert!(!evaluate("NOT", &set(&["NOT"])));
}

#[test]
fn malformed_operator_sequences_are_soft() {
    // empty operands read as TRUE
    assert!(evaluate("a AND AND b", &set(&["a", "b"])));
    assert!(!evaluate("a AND AND b", &set(&["a"])));
    assert!(evaluate("a OR", &set(&[])));
    assert!(evaluate("AND", &set(&[])));
    // unbalanced input still evaluates
    assert!(evaluate("(a OR b", &set(&["b"])));
    assert!(evaluate("a) OR b", &set(&["b"])));
    // operator-free word runs form one identifier
    assert!(evaluate("a b", &set(&["a b"])));
    assert!(!evaluate("a b", &set(&["a", "b"])));
    // a group glued to a word matches nothing
    assert!(!evaluate("(a) b", &set(&["a", "b"])));
}

#[test]
fn lookup_impls_agree() {
    let owned = set(&["h_moved"]);
    let sorted: BTreeSet<&str> = ["h_moved"].into_iter().collect();
    let slice: &[&str] = &["h_moved"];
    for e in ["h_moved", "NOT h_static", "h_moved AND NOT h_static"] {
        let expected = evaluate(e, &owned);
        assert_eq!(evaluate(e, &sorted), expected);
        assert_eq!(evaluate(e, slice), expected);
    }
}

#[test]
fn validate_reports_parentheses() {
    assert_eq!(
        validate("(tag1 AND tag2"),
        Err(ExprError::UnbalancedParentheses)
    );
    assert_eq!(
        validate_report("(tag1 AND tag2"),
        (false, "Unbalanced parentheses".to_string())
    );
    assert_eq!(validate("a)("), Err(ExprError::UnbalancedParentheses));
    assert_eq!(validate_report("(a) AND b"), (true, String::new()));
    assert!(validate("").is_ok());
}

#[test]
fn validate_reports_characters() {
    assert_eq!(
        validate("a-b"),
        Err(ExprError::InvalidCharacter { ch: '-', pos: 1 })
    );
    assert!(validate("fold_1_moved OR x2").is_ok());
    // ASCII only, and space is the only separator
    assert_eq!(
        validate("a\tb"),
        Err(ExprError::InvalidCharacter { ch: '\t', pos: 1 })
    );
    assert_eq!(
        validate("a AND\nb"),
        Err(ExprError::InvalidCharacter { ch: '\n', pos: 5 })
    );
    assert_eq!(
        validate("pli\u{e9}"),
        Err(ExprError::InvalidCharacter { ch: '\u{e9}', pos: 3 })
    );
    // structural mistakes pass the character check
    assert!(validate("tag1 AND AND tag2").is_ok());
}

#[test]
fn extract_names() {
    let names = extract_tag_names("(a AND NOT b) OR TRUE OR c_1 OR FALSE");
    let expected: BTreeSet<String> = ["a", "b", "c_1"].iter().map(|s| s.to_string()).collect();
    assert_eq!(names, expected);
    assert!(extract_tag_names("  ").is_empty());
}

#[test]
fn cache_compiles_once_per_string() {
    let mut cache = ExprCache::new();
    let tags = set(&["a"]);
    assert!(cache.get("a OR b").eval(&tags));
    assert!(cache.get("a OR b").eval(&tags));
    assert!(!cache.get("NOT a").eval(&tags));
    assert_eq!(cache.len(), 2);
    cache.clear();
    assert!(cache.is_empty());
}

const POOL: &[&str] = &["a", "b", "c", "h_moved", "fold_2_static"];

fn arb_expr() -> impl Strategy<Value = TagExpr> {
    let leaf = prop_oneof![
        Just(TagExpr::Const(true)),
        Just(TagExpr::Const(false)),
        prop::sample::select(POOL.to_vec()).prop_map(|s| TagExpr::Tag(s.to_string())),
    ];
    leaf.prop_recursive(4, 32, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(|e| TagExpr::Not(Box::new(e))),
            (inner.clone(), inner.clone())
                .prop_map(|(a, b)| TagExpr::And(Box::new(a), Box::new(b))),
            (inner.clone(), inner).prop_map(|(a, b)| TagExpr::Or(Box::new(a), Box::new(b))),
        ]
    })
}

fn arb_tags() -> impl Strategy<Value = BTreeSet<&'static str>> {
    prop::collection::btree_set(prop::sample::select(POOL.to_vec()), 0..=POOL.len())
}

fn arb_soup() -> impl Strategy<Value = String> {
    let pieces = vec!["a", "b", "(", ")", "AND", "OR", "NOT", "TRUE", " "];
    prop::collection::vec(prop::sample::select(pieces), 0..12).prop_map(|v| v.join(" "))
}

proptest! {
    #[test]
    fn printed_tree_compiles_back(e in arb_expr()) {
        prop_assert_eq!(TagExpr::compile(&e.to_string()), e);
    }

    #[test]
    fn wrapping_in_parens_is_neutral(e in arb_expr(), tags in arb_tags()) {
        let src = e.to_string();
        prop_assert_eq!(evaluate(&format!("({src})"), &tags), evaluate(&src, &tags));
        prop_assert_eq!(evaluate(&src, &tags), e.eval(&tags));
    }

    #[test]
    fn evaluation_is_pure_and_total(src in arb_soup(), tags in arb_tags()) {
        let first = evaluate(&src, &tags);
        prop_assert_eq!(evaluate(&src, &tags), first);
        prop_assert_eq!(TagExpr::compile(&src).eval(&tags), first);
    }

    #[test]
    fn blank_is_universal(ws in "[ \t]{0,6}", tags in arb_tags()) {
        prop_assert!(evaluate(&ws, &tags));
    }
}
