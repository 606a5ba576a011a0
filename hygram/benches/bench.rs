use criterion::{Criterion, black_box, criterion_group, criterion_main};

use hygram::prelude::*;
use hygram::tree::build::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

fn build_arith_expr(budget: usize, rng: &mut impl Rng) -> Expr {
    if budget == 0 || rng.random_bool(0.15) {
        return lit(rng.random_range(1i64..=9));
    }
    let lhs = build_arith_expr(budget - 1, rng);
    let rhs = build_arith_expr(budget - 1, rng);
    match rng.random_range(0..=2) {
        0 => plus(lhs, rhs),
        1 => minus(lhs, rhs),
        _ => negate(plus(lhs, rhs)),
    }
}

fn calculator() -> Algorithm {
    let arith = |op: Op| {
        Grammar::binary(op, Grammar::recurse(), Grammar::recurse()).case_call(
            Action::op(op),
            [
                Action::invoke(Action::recurse(), Action::left()),
                Action::invoke(Action::recurse(), Action::right()),
            ],
        )
    };
    Algorithm::new(Grammar::switch([
        Grammar::terminal_of(LiteralKind::Int).case(Action::value()),
        arith(Op::Plus),
        arith(Op::Minus),
        Grammar::unary(Op::Negate, Grammar::recurse())
            .case(Action::evaluate_with(Action::recurse())),
    ]))
}

fn bench_matching(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::seed_from_u64(0x42);
    let e = build_arith_expr(10, &mut rng);
    let calc = calculator();

    c.bench_function("match_calculator", |b| {
        b.iter(|| black_box(calc.matches(black_box(&e))))
    });

    let wildcard_sum: Grammar = Grammar::binary(Op::Plus, Grammar::wildcard(), Grammar::wildcard());
    c.bench_function("match_shallow", |b| {
        b.iter(|| black_box(wildcard_sum.matches(black_box(&e))))
    });
}

fn bench_evaluation(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::seed_from_u64(0x42);
    let e = build_arith_expr(10, &mut rng);
    let calc = calculator();

    c.bench_function("apply_calculator", |b| b.iter(|| black_box(calc.call(black_box(&e)))));

    let evaluate = Action::evaluate();
    c.bench_function("apply_builtin_evaluate", |b| {
        b.iter(|| black_box(evaluate.eval(black_box(&e))))
    });

    let pass = Action::pass_through();
    c.bench_function("apply_pass_through", |b| b.iter(|| black_box(pass.eval(black_box(&e)))));
}

fn bench_text(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::seed_from_u64(0x42);
    let e = build_arith_expr(10, &mut rng);
    let printed = e.to_string();

    c.bench_function("print", |b| b.iter(|| black_box(black_box(&e).to_string())));
    c.bench_function("parse", |b| b.iter(|| black_box(parse(black_box(&printed)))));
}

criterion_group!(benches, bench_matching, bench_evaluation, bench_text);
criterion_main!(benches);
