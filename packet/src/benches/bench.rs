use criterion::criterion_main;
use galileo_packet::{Layout, Packet};
use rand::{rngs::StdRng, Rng, SeedableRng};

mod append;
mod read;

criterion_main!(append::benches, read::benches);

/// Build a packet holding `items` little strings interleaved with numbers.
fn populated<L: Layout>(items: usize) -> Packet<L> {
    let mut rng = StdRng::seed_from_u64(0);
    let mut packet = Packet::<L>::new();
    for i in 0..items {
        packet
            .append_number(rng.gen::<u64>())
            .expect("failed to append number");
        packet
            .append_string(&format!("item-{i}"))
            .expect("failed to append string");
    }
    packet
}
