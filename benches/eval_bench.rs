use criterion::{black_box, criterion_group, criterion_main, Criterion};
use skim::{eval, parse, Runtime};

// ============================================================================
// Parsing Benchmarks
// ============================================================================

fn bench_parse_small(c: &mut Criterion) {
    c.bench_function("parse small expr", |b| {
        b.iter(|| black_box(parse("(+ 1 2)").unwrap()))
    });
}

fn bench_parse_large_list(c: &mut Criterion) {
    let mut elements = vec!["(+".to_string()];
    for i in 0..1000 {
        elements.push(i.to_string());
    }
    elements.push(")".to_string());
    let expr = elements.join(" ");

    c.bench_function("parse large list (1000 elements)", |b| {
        b.iter(|| black_box(parse(&expr).unwrap()))
    });
}

fn bench_parse_deep_nesting(c: &mut Criterion) {
    let mut expr = String::from("1");
    for _ in 0..100 {
        expr = format!("(+ {expr} 1)");
    }

    c.bench_function("parse deep nesting (100 levels)", |b| {
        b.iter(|| black_box(parse(&expr).unwrap()))
    });
}

// ============================================================================
// Evaluation Benchmarks
// ============================================================================

fn bench_eval_arithmetic(c: &mut Criterion) {
    let expr = parse("(+ 1 2 3 4 5 6 7 8 9 10 (* 11 12) (- 13 14))").unwrap();
    c.bench_function("eval arithmetic", |b| {
        let mut rt = Runtime::default();
        b.iter(|| black_box(eval(&expr, &mut rt).unwrap()))
    });
}

fn bench_eval_lambda_calls(c: &mut Criterion) {
    let mut rt = Runtime::default();
    let define = parse("(define add (lambda (a b) (+ a b)))").unwrap();
    eval(&define, &mut rt).unwrap();
    let call = parse("(add 20 22)").unwrap();

    c.bench_function("eval lambda call", |b| {
        b.iter(|| black_box(eval(&call, &mut rt).unwrap()))
    });
}

fn bench_eval_relational_chain(c: &mut Criterion) {
    let expr = parse("(< 1 2 3 4 5 6 7 8 9 10)").unwrap();
    c.bench_function("eval relational chain", |b| {
        let mut rt = Runtime::default();
        b.iter(|| black_box(eval(&expr, &mut rt).unwrap()))
    });
}

criterion_group!(
    benches,
    bench_parse_small,
    bench_parse_large_list,
    bench_parse_deep_nesting,
    bench_eval_arithmetic,
    bench_eval_lambda_calls,
    bench_eval_relational_chain,
);
criterion_main!(benches);
