use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use std::time::Duration;
use wayfinder_core::{Direction, Wall};
use wayfinder_graph::{rooms, BuildingMap, PromptGenerator};

/// A comb-shaped floor: an East-running corridor from the entrance with a
/// T intersection every `spacing` doors, each opening a northern wing of
/// `wing` doors. Intersection names are single-digit, so at most nine teeth.
fn create_comb(teeth: usize, spacing: usize, wing: usize) -> BuildingMap {
    let mut map = BuildingMap::new();
    map.add_vertex("maindoor", Wall::South).unwrap();
    let mut previous = "maindoor".to_string();

    for t in 1..=teeth {
        for d in 0..spacing {
            let name = format!("{}.{:03}", t, d);
            let wall = if d % 2 == 0 { Wall::North } else { Wall::South };
            map.add_vertex(name.as_str(), wall).unwrap();
            map.connect(&previous, &name, Direction::East).unwrap();
            previous = name;
        }

        let fork = format!("intersection{}", t);
        map.add_vertex(fork.as_str(), Wall::Intersection).unwrap();
        map.connect(&previous, &fork, Direction::East).unwrap();

        let mut wing_previous = fork.clone();
        for w in 0..wing {
            let name = format!("{}.{:03}w", t, w);
            map.add_vertex(name.as_str(), Wall::East).unwrap();
            map.connect(&wing_previous, &name, Direction::North).unwrap();
            wing_previous = name;
        }
        previous = fork;
    }

    map
}

fn bench_hallway_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("hallway_walk");
    group.measurement_time(Duration::from_secs(5));

    for spacing in [10, 100, 1000].iter() {
        let map = create_comb(1, *spacing, 0);
        let start = map.id_of("maindoor").unwrap();
        group.bench_with_input(BenchmarkId::new("rooms", spacing), spacing, |b, _| {
            b.iter(|| black_box(rooms(&map, start, Direction::East).unwrap()));
        });
    }

    group.finish();
}

fn bench_prompt_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("prompt_generation");
    group.measurement_time(Duration::from_secs(5));

    for wing in [5, 50, 500].iter() {
        let map = create_comb(9, 20, *wing);
        let generator = PromptGenerator::new(&map);
        group.bench_with_input(BenchmarkId::new("comb_9_teeth", wing), wing, |b, _| {
            b.iter(|| black_box(generator.generate("maindoor", Direction::North).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(prompt_benches, bench_hallway_walk, bench_prompt_generation);

criterion_main!(prompt_benches);
