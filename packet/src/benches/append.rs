use criterion::{criterion_group, BatchSize, Criterion};
use galileo_packet::{Network, Packet, Standard};
use std::hint::black_box;

/// Number of fields appended in each benchmark iteration.
const ITEMS: usize = 10_000;

fn bench_append(c: &mut Criterion) {
    c.bench_function(&format!("{}/numbers/native", module_path!()), |b| {
        b.iter_batched(
            Packet::<Standard>::new,
            |mut packet| {
                for i in 0..ITEMS as u64 {
                    packet.append_number(black_box(i)).unwrap();
                }
                packet
            },
            BatchSize::SmallInput,
        );
    });

    c.bench_function(&format!("{}/numbers/swapped", module_path!()), |b| {
        b.iter_batched(
            Packet::<Network>::new,
            |mut packet| {
                for i in 0..ITEMS as u64 {
                    packet.append_number(black_box(i)).unwrap();
                }
                packet
            },
            BatchSize::SmallInput,
        );
    });

    let chunk = [0xABu8; 1024];
    for chunks in [1usize, 64, 1024] {
        c.bench_function(
            &format!("{}/bytes/chunks={chunks}", module_path!()),
            |b| {
                b.iter_batched(
                    Packet::<Standard>::new,
                    |mut packet| {
                        for _ in 0..chunks {
                            packet.append_bytes(black_box(&chunk)).unwrap();
                        }
                        packet
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = bench_append
}
