use hygram::prelude::*;
use hygram::tree::build::*;

fn sum_of_terminals() -> Grammar {
    Grammar::binary(Op::Plus, Grammar::terminal(), Grammar::terminal())
}

#[test]
fn wildcard_accepts_terminals_and_composites() {
    let g: Grammar = Grammar::wildcard();
    assert!(g.matches(&lit(1)).unwrap());
    assert!(g.matches(&plus(lit(1), sym("x"))).unwrap());
    assert!(g.matches(&user("call", vec![lit(1), lit(2), lit(3)]).unwrap()).unwrap());
}

#[test]
fn structural_checks_tag_arity_and_children() {
    let g = sum_of_terminals();
    assert!(g.matches(&plus(lit(3), lit(4))).unwrap());
    assert!(!g.matches(&minus(lit(3), lit(4))).unwrap());
    assert!(!g.matches(&plus(lit(3), plus(lit(1), lit(2)))).unwrap());
    assert!(!g.matches(&lit(5)).unwrap());

    let any_binary: Grammar = Grammar::any_node([Grammar::wildcard(), Grammar::wildcard()]);
    assert!(any_binary.matches(&minus(lit(3), lit(4))).unwrap());
    assert!(!any_binary.matches(&negate(lit(3))).unwrap());
}

#[test]
fn exact_compares_signatures() {
    let g: Grammar = Grammar::exact_of(&plus(lit(0), lit(0)));
    assert!(g.matches(&plus(lit(3), lit(4))).unwrap());
    assert!(!g.matches(&plus(lit(3), lit(4.0))).unwrap());
    assert!(!g.matches(&plus(lit(3), sym("x"))).unwrap());

    let sig = Signature::node(
        Op::Negate,
        vec![Signature::terminal(LiteralKind::Bool)],
    );
    assert_eq!(sig.to_string(), "(negate Bool)");
    assert!(Grammar::<Expr>::exact(sig).matches(&negate(lit(true))).unwrap());
}

#[test]
fn terminal_and_literal_patterns() {
    let ints: Grammar = Grammar::terminal_of(LiteralKind::Int);
    assert!(ints.matches(&lit(7)).unwrap());
    assert!(!ints.matches(&lit("7")).unwrap());
    assert!(!ints.matches(&negate(lit(7))).unwrap());

    let seven: Grammar = Grammar::literal(7);
    assert!(seven.matches(&lit(7)).unwrap());
    assert!(!seven.matches(&lit(8)).unwrap());
    assert!(!seven.matches(&lit(7.0)).unwrap());
}

#[test]
fn vararg_matches_prefix_then_rest() {
    let call: Grammar = Grammar::vararg(
        Some(Op::Function.into()),
        [Grammar::terminal_of(LiteralKind::Sym)],
        Grammar::terminal_of(LiteralKind::Int),
    );
    assert!(call.matches(&function(sym("f"), [])).unwrap());
    assert!(call.matches(&function(sym("f"), [lit(1), lit(2), lit(3)])).unwrap());
    assert!(!call.matches(&function(sym("f"), [lit(1), lit("x")])).unwrap());
    assert!(!call.matches(&function(lit(1), [lit(1)])).unwrap());
    assert!(!call.matches(&sym("f")).unwrap());
}

#[test]
fn combinators_follow_boolean_logic() {
    let t: Grammar = Grammar::terminal();
    let one: Grammar = Grammar::literal(1);
    let e = lit(2);

    assert!((t.clone() | one.clone()).matches(&e).unwrap());
    assert!(!(t.clone() & one.clone()).matches(&e).unwrap());
    assert!((t.clone() & !one.clone()).matches(&e).unwrap());
    assert!(!Grammar::<Expr>::or([]).matches(&e).unwrap());
    assert!(Grammar::<Expr>::and([]).matches(&e).unwrap());
}

#[test]
fn if_selects_branch_with_condition() {
    // Terminals must be ints, composites must be additions.
    let g: Grammar = Grammar::if_(
        Action::leaf("is_terminal", |e: &Expr, _, _| Ok(Value::from(e.is_terminal()))),
        Grammar::terminal_of(LiteralKind::Int),
        Grammar::node(Op::Plus, [Grammar::wildcard(), Grammar::wildcard()]),
    );
    assert!(g.matches(&lit(1)).unwrap());
    assert!(!g.matches(&lit(true)).unwrap());
    assert!(g.matches(&plus(lit(true), lit(2))).unwrap());
    assert!(!g.matches(&minus(lit(1), lit(2))).unwrap());
}

#[test]
fn if_condition_must_be_boolean() {
    let g: Grammar = Grammar::if_(Action::constant(1), Grammar::wildcard(), Grammar::wildcard());
    let err = g.matches(&lit(1)).unwrap_err();
    assert!(err.is_type_mismatch());
}

#[test]
fn switch_selects_first_matching_case() {
    let g: Grammar = Grammar::switch([
        Grammar::literal(0).case(Action::constant("zero")),
        Grammar::terminal().case(Action::constant("terminal")),
        Grammar::wildcard().case(Action::constant("other")),
    ]);
    assert_eq!(g.select(&lit(0)).unwrap(), Some(0));
    assert_eq!(g.select(&lit(3)).unwrap(), Some(1));
    assert_eq!(g.select(&negate(lit(3))).unwrap(), Some(2));

    let g: Grammar = Grammar::switch([Grammar::literal(0).case_self()]);
    assert!(g.matches(&lit(0)).unwrap());
    assert_eq!(g.select(&lit(1)).unwrap(), None);
}

#[test]
fn or_selects_first_matching_alternative() {
    let g: Grammar = Grammar::or([
        Grammar::literal(1),
        Grammar::terminal(),
        Grammar::wildcard(),
    ]);
    assert_eq!(g.select(&lit(1)).unwrap(), Some(0));
    assert_eq!(g.select(&lit(2)).unwrap(), Some(1));
    assert_eq!(g.select(&negate(lit(2))).unwrap(), Some(2));
    assert_eq!(sum_of_terminals().select(&lit(2)).unwrap(), None);
}

#[test]
fn recurse_matches_nested_shapes() {
    // Additions of integer terminals, nested to any depth.
    let sums: Grammar = Grammar::or([
        Grammar::terminal_of(LiteralKind::Int),
        Grammar::binary(Op::Plus, Grammar::recurse(), Grammar::recurse()),
    ]);
    assert!(sums.matches(&plus(lit(1), plus(lit(2), plus(lit(3), lit(4))))).unwrap());
    assert!(!sums.matches(&plus(lit(1), plus(lit(2), minus(lit(3), lit(4))))).unwrap());
}

#[test]
fn user_tags_match_by_name() {
    let g: Grammar = Grammar::node(Tag::user("pair"), [Grammar::wildcard(), Grammar::wildcard()]);
    assert!(g.matches(&user("pair", vec![lit(1), lit(2)]).unwrap()).unwrap());
    assert!(!g.matches(&user("tuple", vec![lit(1), lit(2)]).unwrap()).unwrap());
}

#[test]
fn depth_limit_is_reported() {
    let mut e = lit(0);
    for i in 0..64 {
        e = plus(e, lit(i));
    }
    let sums: Grammar = Grammar::or([
        Grammar::terminal(),
        Grammar::binary(Op::Plus, Grammar::recurse(), Grammar::terminal()),
    ]);
    assert!(sums.matches(&e).unwrap());

    let engine = Engine::new(EngineConfig::default().with_max_depth(16));
    let err = engine.matches(&e, &sums).unwrap_err();
    assert_eq!(err, TransformError::DepthExceeded { limit: 16 });
}
