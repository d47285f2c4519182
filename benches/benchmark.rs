// Benchmarks for the bipartite approximation and search based edit distance
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gedx::prelude::*;
use gedx::CostMatrix;
use rand::prelude::*;
use rand::rngs::StdRng;

fn random_graph(rng: &mut StdRng, id: &str, n: usize, density: f64) -> Graph {
    let labels = ["a", "b", "c", "d"];
    let predicates = ["p", "q", "r"];
    let mut builder = Graph::builder(id, true);
    for i in 0..n {
        builder.add_node(format!("v{i}"), [("symbol", labels[rng.random_range(0..labels.len())])]);
    }
    for i in 0..n {
        for j in 0..n {
            if i != j && rng.random_bool(density) {
                let label = predicates[rng.random_range(0..predicates.len())];
                builder.add_edge(format!("v{i}"), format!("v{j}"), [("symbol", label)]);
            }
        }
    }
    builder.build().unwrap()
}

fn random_matrix(rng: &mut StdRng, n: usize) -> CostMatrix {
    let rows: Vec<Vec<f64>> = (0..n)
        .map(|_| (0..n).map(|_| rng.random_range(0.0..100.0)).collect())
        .collect();
    CostMatrix::from_rows(&rows).unwrap()
}

fn benchmark_solvers(c: &mut Criterion) {
    let mut group = c.benchmark_group("assignment");
    let mut rng = StdRng::seed_from_u64(42);

    for size in [10, 50, 200].iter() {
        let matrix = random_matrix(&mut rng, *size);
        for solver in [Solver::Hungarian, Solver::VolgenantJonker] {
            group.bench_with_input(BenchmarkId::new(solver.to_string(), size), &matrix, |b, m| {
                b.iter(|| solve_assignment(black_box(m), solver).unwrap());
            });
        }
    }

    group.finish();
}

fn benchmark_bipartite(c: &mut Criterion) {
    let mut group = c.benchmark_group("bipartite");
    let mut rng = StdRng::seed_from_u64(7);
    let costs = CostFunction::rdf_default();

    for size in [10, 30, 60].iter() {
        let g1 = random_graph(&mut rng, "g1", *size, 0.1);
        let g2 = random_graph(&mut rng, "g2", *size, 0.1);
        group.bench_with_input(BenchmarkId::new("hungarian", size), size, |b, _| {
            b.iter(|| {
                let matrix = compute_cost_matrix(&g1, &g2, &costs).unwrap();
                let assignment = solve_assignment(&matrix, Solver::Hungarian).unwrap();
                black_box(distance_from_assignment(&g1, &g2, &assignment, &costs).unwrap())
            });
        });
    }

    group.finish();
}

fn benchmark_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    let mut rng = StdRng::seed_from_u64(13);
    let costs = CostFunction::rdf_default();

    let small1 = random_graph(&mut rng, "s1", 6, 0.2);
    let small2 = random_graph(&mut rng, "s2", 6, 0.2);
    group.bench_function("astar_6", |b| {
        b.iter(|| distance_by_search(black_box(&small1), black_box(&small2), &costs, BeamWidth::Unbounded).unwrap());
    });

    let g1 = random_graph(&mut rng, "g1", 15, 0.15);
    let g2 = random_graph(&mut rng, "g2", 15, 0.15);
    for width in [1u32, 10, 100].iter() {
        let beam = BeamWidth::bounded(*width).unwrap();
        group.bench_with_input(BenchmarkId::new("beam_15", width), width, |b, _| {
            b.iter(|| distance_by_search(&g1, &g2, &costs, beam).unwrap());
        });
    }

    group.finish();
}

fn benchmark_pairwise(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(3);
    let graphs: Vec<Graph> = (0..16)
        .map(|i| random_graph(&mut rng, &format!("g{i}"), 12, 0.15))
        .collect();
    let matcher = GraphMatcher::rdf();

    c.bench_function("pairwise_16x12", |b| {
        b.iter(|| matcher.pairwise(black_box(&graphs)).unwrap());
    });
}

criterion_group!(
    benches,
    benchmark_solvers,
    benchmark_bipartite,
    benchmark_search,
    benchmark_pairwise
);
criterion_main!(benches);
