//! Planner benchmarks: a deep dependency chain and a wide fan-out.
//!
//! Both shapes stress a different part of the traversal - the chain is all
//! stack depth, the fan-out is all adjacency width.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use indexmap::IndexSet;
use sheetgraph_core::{CellRef, Edge, RecalcPlanner};

/// C0 <- C1 <- ... <- Cn: every cell depends on the previous one.
fn chain(n: usize) -> (Vec<Edge>, IndexSet<CellRef>) {
    let mut edges = Vec::with_capacity(n);
    let mut formulas = IndexSet::with_capacity(n);
    for i in 1..n {
        edges.push(Edge::new(format!("C{i}"), format!("C{}", i - 1)));
        formulas.insert(CellRef::new(format!("C{i}")));
    }
    (edges, formulas)
}

/// A1 feeds n dependents directly.
fn fanout(n: usize) -> (Vec<Edge>, IndexSet<CellRef>) {
    let mut edges = Vec::with_capacity(n);
    let mut formulas = IndexSet::with_capacity(n);
    for i in 0..n {
        edges.push(Edge::new(format!("B{i}"), "A1"));
        formulas.insert(CellRef::new(format!("B{i}")));
    }
    (edges, formulas)
}

fn bench_deep_chain(c: &mut Criterion) {
    let (edges, formulas) = chain(10_000);
    let changed = CellRef::new("C0");

    c.bench_function("plan_deep_chain_10k", |b| {
        b.iter(|| {
            let planner = RecalcPlanner::build(black_box(&edges));
            planner.plan(black_box(&changed), &formulas).unwrap()
        })
    });
}

fn bench_wide_fanout(c: &mut Criterion) {
    let (edges, formulas) = fanout(10_000);
    let changed = CellRef::new("A1");

    c.bench_function("plan_wide_fanout_10k", |b| {
        b.iter(|| {
            let planner = RecalcPlanner::build(black_box(&edges));
            planner.plan(black_box(&changed), &formulas).unwrap()
        })
    });
}

criterion_group!(benches, bench_deep_chain, bench_wide_fanout);
criterion_main!(benches);
