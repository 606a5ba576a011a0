use hygram::prelude::*;
use hygram::tree::build::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

const SEED: u64 = 0x5eed;
const TREES: usize = 200;

/// Floats whose shortest form needs an exponent, plus the infinities.
const AWKWARD_FLOATS: [f64; 6] = [1e20, -1e20, 2.5e-7, 1e300, f64::INFINITY, f64::NEG_INFINITY];

/// Symbols that are not plain identifiers or collide with literal keywords.
const AWKWARD_SYMBOLS: [&str; 7] = ["a b", "true", "nan", "", "pipe|bar", "back\\slash", "9lives"];

fn random_leaf(rng: &mut impl Rng) -> Expr {
    match rng.random_range(0..=5) {
        0 => lit(rng.random_range(-5i64..=5)),
        1 => lit(rng.random_bool(0.5)),
        2 => sym(["x", "y", "z"][rng.random_range(0..3)]),
        3 => lit(AWKWARD_FLOATS[rng.random_range(0..AWKWARD_FLOATS.len())]),
        4 => sym(AWKWARD_SYMBOLS[rng.random_range(0..AWKWARD_SYMBOLS.len())]),
        _ => lit(f64::from(rng.random_range(-8i32..=8)) / 4.0),
    }
}

fn random_tree(budget: usize, rng: &mut impl Rng) -> Expr {
    if budget == 0 || rng.random_bool(0.3) {
        return random_leaf(rng);
    }
    match rng.random_range(0..=5) {
        0 => negate(random_tree(budget - 1, rng)),
        1 => plus(random_tree(budget - 1, rng), random_tree(budget - 1, rng)),
        2 => multiplies(random_tree(budget - 1, rng), random_tree(budget - 1, rng)),
        3 => less(random_tree(budget - 1, rng), random_tree(budget - 1, rng)),
        4 => if_else(
            random_tree(budget - 1, rng),
            random_tree(budget - 1, rng),
            random_tree(budget - 1, rng),
        ),
        _ => {
            let args = (0..rng.random_range(0..3))
                .map(|_| random_tree(budget - 1, rng))
                .collect::<Vec<_>>();
            function(sym("f"), args)
        }
    }
}

fn random_trees() -> Vec<Expr> {
    let mut rng = ChaCha20Rng::seed_from_u64(SEED);
    (0..TREES).map(|_| random_tree(5, &mut rng)).collect()
}

/// A pool of patterns without actions; the last one accepts everything.
fn patterns() -> Vec<Grammar> {
    vec![
        Grammar::terminal(),
        Grammar::terminal_of(LiteralKind::Int),
        Grammar::literal(true),
        Grammar::binary(Op::Plus, Grammar::wildcard(), Grammar::terminal()),
        Grammar::unary(Op::Negate, Grammar::terminal_of(LiteralKind::Float)),
        Grammar::any_node([Grammar::wildcard(), Grammar::wildcard()]),
        Grammar::vararg(
            Some(Op::Function.into()),
            [Grammar::wildcard()],
            Grammar::terminal(),
        ),
        Grammar::exact_of(&less(lit(0), lit(0))),
        Grammar::or([
            Grammar::literal(0),
            Grammar::binary(Op::Multiplies, Grammar::terminal(), Grammar::wildcard()),
        ]),
        Grammar::wildcard(),
    ]
}

#[test]
fn wildcard_matches_everything() {
    for e in random_trees() {
        assert!(Grammar::<Expr>::wildcard().matches(&e).unwrap(), "{e}");
    }
}

#[test]
fn de_morgan_duality() {
    let patterns = patterns();
    let mut rng = ChaCha20Rng::seed_from_u64(SEED ^ 1);

    for e in random_trees() {
        let picked: Vec<Grammar> = (0..rng.random_range(1..4))
            .map(|_| patterns[rng.random_range(0..patterns.len())].clone())
            .collect();
        let negated = || picked.iter().cloned().map(|g| !g);

        let not_or = !Grammar::or(picked.iter().cloned());
        let and_not = Grammar::and(negated());
        assert_eq!(not_or.matches(&e), and_not.matches(&e), "{e}");

        let not_and = !Grammar::and(picked.iter().cloned());
        let or_not = Grammar::or(negated());
        assert_eq!(not_and.matches(&e), or_not.matches(&e), "{e}");
    }
}

#[test]
fn pass_through_is_idempotent() {
    let action = Action::pass_through();
    for e in random_trees() {
        let once = action.eval(&e).unwrap().into_node().unwrap();
        assert_eq!(once, e);
        let twice = action.eval(&once).unwrap().into_node().unwrap();
        assert_eq!(twice, once);
    }
}

#[test]
fn first_matching_case_wins() {
    let patterns = patterns();
    let switch = Grammar::switch(
        patterns
            .iter()
            .enumerate()
            .map(|(i, p)| p.clone().case(Action::constant(i as i64))),
    );

    for e in random_trees() {
        let expected = patterns.iter().position(|p| p.matches(&e).unwrap());
        assert_eq!(switch.select(&e).unwrap(), expected, "{e}");
        let value = switch.eval(&e).unwrap();
        assert_eq!(value.as_int().map(|i| i as usize), expected, "{e}");
        // Reordering the cases after the winner does not change the outcome.
        if let Some(winner) = expected {
            let mut reordered: Vec<Case> = switch_cases(&switch);
            reordered[winner + 1..].reverse();
            let reordered = Grammar::switch(reordered);
            assert_eq!(reordered.eval(&e).unwrap(), value, "{e}");
        }
    }
}

fn switch_cases(grammar: &Grammar) -> Vec<Case> {
    match grammar {
        Grammar::Switch(cases) => cases.clone(),
        _ => Vec::new(),
    }
}

#[test]
fn call_composes_function_with_arguments() {
    let funcs = [Op::Plus, Op::Minus, Op::Multiplies, Op::Less, Op::EqualTo];
    let mut rng = ChaCha20Rng::seed_from_u64(SEED ^ 2);

    for _ in 0..TREES {
        let a = rng.random_range(-100i64..100);
        let b = rng.random_range(-100i64..100);
        let op = funcs[rng.random_range(0..funcs.len())];
        let e = Expr::binary(op, lit(a), lit(b));

        let call = Action::call(Action::op(op), [Action::left(), Action::right()]);
        let direct = hygram::action::builtin::apply_op(op, &[Value::from(a), Value::from(b)]);
        assert_eq!(call.eval(&e), direct, "{e}");
        assert_eq!(Action::evaluate().eval(&e), direct, "{e}");
    }
}

#[test]
fn printing_then_parsing_round_trips() {
    for e in random_trees() {
        let printed = e.to_string();
        let parsed = parse(&printed).unwrap_or_else(|errs| panic!("{printed}: {errs:?}"));
        assert_eq!(parsed, e, "{printed}");
    }
}

#[test]
fn printing_then_parsing_round_trips_awkward_leaves() {
    for x in AWKWARD_FLOATS {
        let e = negate(lit(x));
        assert_eq!(parse(&e.to_string()).unwrap(), e, "{e}");
    }
    for name in AWKWARD_SYMBOLS {
        let e = plus(sym(name), lit(1));
        assert_eq!(parse(&e.to_string()).unwrap(), e, "{e}");
    }
    assert_eq!(lit(1e20).to_string(), "1e20");
    assert_eq!(sym("a b").to_string(), "|a b|");
    assert_eq!(sym("true").to_string(), "|true|");

    // NaN never compares equal, so check the kind instead.
    let parsed = parse(&lit(f64::NAN).to_string()).unwrap();
    assert!(parsed.value().and_then(Literal::as_float).is_some_and(f64::is_nan));
}
