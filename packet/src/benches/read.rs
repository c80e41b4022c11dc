use criterion::{criterion_group, BatchSize, Criterion};
use galileo_packet::{Network, Standard};

/// Number of (number, string) pairs in the packet being read.
const ITEMS: usize = 10_000;

fn bench_read(c: &mut Criterion) {
    let standard = super::populated::<Standard>(ITEMS);
    c.bench_function(&format!("{}/native", module_path!()), |b| {
        b.iter_batched(
            || standard.clone(),
            |mut packet| {
                for _ in 0..ITEMS {
                    packet.read_number::<u64>().unwrap();
                    packet.read_string().unwrap();
                }
            },
            BatchSize::SmallInput,
        );
    });

    let network = super::populated::<Network>(ITEMS);
    c.bench_function(&format!("{}/swapped", module_path!()), |b| {
        b.iter_batched(
            || network.clone(),
            |mut packet| {
                for _ in 0..ITEMS {
                    packet.read_number::<u64>().unwrap();
                    packet.read_string().unwrap();
                }
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = bench_read
}
