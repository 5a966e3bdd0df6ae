use criterion::{black_box, criterion_group, criterion_main, Criterion};
use slabfit::space::{CACHE_LINE, GIGANTIC_PAGE_1G, HUGE_PAGE_2M, PAGE_4K};
use slabfit::{reconcile, select, simulate, worst_case, SpaceFamily};

fn bench_simulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("Packing Simulation");

    group.bench_function("simulate 21 in 64", |b| {
        b.iter(|| simulate(black_box(21), black_box(CACHE_LINE)).unwrap());
    });

    group.bench_function("simulate 4093 in 4096", |b| {
        b.iter(|| simulate(black_box(4093), black_box(PAGE_4K)).unwrap());
    });

    group.bench_function("worst_case 699051 in 2MiB", |b| {
        b.iter(|| worst_case(black_box(699_051), black_box(HUGE_PAGE_2M)).unwrap());
    });

    group.finish();
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("Size-Class Selection");
    group.sample_size(10);

    for space in [CACHE_LINE, PAGE_4K, HUGE_PAGE_2M, GIGANTIC_PAGE_1G] {
        group.bench_function(format!("select {space}"), |b| {
            b.iter(|| select(black_box(space)).unwrap());
        });
    }

    group.finish();
}

fn bench_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("Reconcile");
    group.sample_size(10);

    for family in SpaceFamily::ALL {
        let spaces = family.spaces();
        group.bench_function(family.name(), |b| {
            b.iter(|| reconcile(black_box(&spaces)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_simulate, bench_select, bench_reconcile);
criterion_main!(benches);
