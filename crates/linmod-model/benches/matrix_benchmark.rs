// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use linmod_model::array::LabeledArray;
use linmod_model::coords::Index;
use linmod_model::grid::Grid;
use linmod_model::model::Model;
use linmod_model::variable::VariableDeclaration;
use std::hint::black_box;

/// A transport-style model: `n x n` flows, supply rows and demand rows.
fn build_model(n: usize) -> Model {
    let mut m = Model::new();
    let grid = Grid::new([Index::range("src", n), Index::range("dst", n)])
        .unwrap_or_else(|e| panic!("invalid grid: {e}"));
    let flow = m
        .add_variables(
            VariableDeclaration::new()
                .name("flow")
                .lower(0.0)
                .coords(grid.clone()),
        )
        .unwrap_or_else(|e| panic!("failed to add variables: {e}"));

    let cost = LabeledArray::new(grid, (0..n * n).map(|i| (i % 7) as f64 + 1.0).collect())
        .unwrap_or_else(|e| panic!("invalid cost array: {e}"));

    let supply = flow
        .sum(&["dst"])
        .and_then(|e| e.le(10.0))
        .unwrap_or_else(|e| panic!("failed to build supply rows: {e}"));
    let demand = flow
        .sum(&["src"])
        .and_then(|e| e.ge(1.0))
        .unwrap_or_else(|e| panic!("failed to build demand rows: {e}"));
    m.add_constraints(supply.named("supply"))
        .unwrap_or_else(|e| panic!("failed to add supply: {e}"));
    m.add_constraints(demand.named("demand"))
        .unwrap_or_else(|e| panic!("failed to add demand: {e}"));

    let objective = flow
        .scale(cost)
        .unwrap_or_else(|e| panic!("failed to build objective: {e}"));
    m.add_objective(objective, false)
        .unwrap_or_else(|e| panic!("failed to set objective: {e}"));
    m
}

fn bench_matrix_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("matrix_benchmark");

    for n in [10usize, 50, 100] {
        let model = build_model(n);
        group.throughput(Throughput::Elements((2 * n * n) as u64));

        for filter in [true, false] {
            let label = if filter { "filtered" } else { "full" };
            group.bench_with_input(BenchmarkId::new(label, n), &model, |b, model| {
                b.iter(|| black_box(model.matrices(black_box(filter))))
            });
        }
    }
    group.finish();
}

fn bench_expression_sum(c: &mut Criterion) {
    let mut group = c.benchmark_group("expression_benchmark");

    for n in [50usize, 200] {
        let model = build_model(n);
        let flow = &model.variables()["flow"];
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_with_input(BenchmarkId::new("sum_dst", n), flow, |b, flow| {
            b.iter(|| black_box(flow.sum(black_box(&["dst"]))))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_matrix_assembly, bench_expression_sum);
criterion_main!(benches);
