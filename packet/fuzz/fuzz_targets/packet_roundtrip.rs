#![no_main]

use arbitrary::Arbitrary;
use galileo_packet::{Counted, Layout, Network, Packet, Standard};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug, Clone)]
enum Field {
    Bytes(Vec<u8>),
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
    F32(f32),
    F64(f64),
    String(String),
    WideString(Vec<u16>),
    Blob(Vec<u8>),
}

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    fields: Vec<Field>,
    // Read a prefix of the fields before appending the rest
    split: u8,
}

fn append<L: Layout>(packet: &mut Packet<L>, field: &Field) -> bool {
    let result = match field {
        Field::Bytes(v) => packet.append_bytes(v),
        Field::Bool(v) => packet.append_bool(*v),
        Field::U8(v) => packet.append_number(*v),
        Field::U16(v) => packet.append_number(*v),
        Field::U32(v) => packet.append_number(*v),
        Field::U64(v) => packet.append_number(*v),
        Field::U128(v) => packet.append_number(*v),
        Field::I8(v) => packet.append_number(*v),
        Field::I16(v) => packet.append_number(*v),
        Field::I32(v) => packet.append_number(*v),
        Field::I64(v) => packet.append_number(*v),
        Field::I128(v) => packet.append_number(*v),
        Field::F32(v) => packet.append_number(*v),
        Field::F64(v) => packet.append_number(*v),
        Field::String(v) => packet.append_string(v),
        Field::WideString(v) => packet.append_wide_string(v),
        Field::Blob(v) => packet.append_blob(v),
    };
    result.is_ok()
}

fn check<L: Layout>(packet: &mut Packet<L>, field: &Field) {
    match field {
        Field::Bytes(v) => {
            let mut dst = vec![0u8; v.len()];
            packet.read_bytes(&mut dst).expect("Failed to read bytes!");
            assert_eq!(&dst, v);
        }
        Field::Bool(v) => assert_eq!(packet.read_bool().unwrap(), *v),
        Field::U8(v) => assert_eq!(packet.read_number::<u8>().unwrap(), *v),
        Field::U16(v) => assert_eq!(packet.read_number::<u16>().unwrap(), *v),
        Field::U32(v) => assert_eq!(packet.read_number::<u32>().unwrap(), *v),
        Field::U64(v) => assert_eq!(packet.read_number::<u64>().unwrap(), *v),
        Field::U128(v) => assert_eq!(packet.read_number::<u128>().unwrap(), *v),
        Field::I8(v) => assert_eq!(packet.read_number::<i8>().unwrap(), *v),
        Field::I16(v) => assert_eq!(packet.read_number::<i16>().unwrap(), *v),
        Field::I32(v) => assert_eq!(packet.read_number::<i32>().unwrap(), *v),
        Field::I64(v) => assert_eq!(packet.read_number::<i64>().unwrap(), *v),
        Field::I128(v) => assert_eq!(packet.read_number::<i128>().unwrap(), *v),
        // NOTE: Compare bits so NaN payloads round-trip too
        Field::F32(v) => assert_eq!(packet.read_number::<f32>().unwrap().to_bits(), v.to_bits()),
        Field::F64(v) => assert_eq!(packet.read_number::<f64>().unwrap().to_bits(), v.to_bits()),
        Field::String(v) => assert_eq!(&packet.read_string().unwrap(), v),
        Field::WideString(v) => assert_eq!(&packet.read_wide_string().unwrap(), v),
        Field::Blob(v) => assert_eq!(&packet.read_blob().unwrap(), v),
    }
}

fn check_invariants<L: Layout>(packet: &Packet<L>) {
    assert_eq!(packet.capacity() % L::ALLOC_UNIT, 0);
    assert!(packet.capacity() >= packet.raw_size());
    assert!(packet.cursor() <= packet.raw_size());
    assert_eq!(packet.as_bytes().len(), packet.raw_size());
}

fn roundtrip<L: Layout>(input: &FuzzInput) {
    let mut packet = Packet::<L>::new();
    let mut appended = Vec::new();
    for field in &input.fields {
        let before = packet.as_bytes().to_vec();
        if append(&mut packet, field) {
            appended.push(field.clone());
        } else {
            // Failed appends leave the contents untouched
            assert_eq!(packet.as_bytes(), &before[..]);
        }
        check_invariants(&packet);
    }

    // Reading in order recovers every appended field, and a copy reads the same
    let split = (input.split as usize).min(appended.len());
    for field in &appended[..split] {
        check(&mut packet, field);
    }
    let mut copy = packet.clone();
    for field in &appended[split..] {
        check(&mut packet, field);
        check(&mut copy, field);
    }
    assert_eq!(packet.remaining(), 0);
    assert!(packet.read_number::<u8>().is_err());

    // The framed bytes decode back into the same packet
    let mut decoded = Packet::<L>::from_frame(packet.as_bytes()).expect("Failed to decode frame!");
    for field in &appended {
        check(&mut decoded, field);
    }
    check_invariants(&decoded);
}

fn fuzz(input: FuzzInput) {
    roundtrip::<Standard>(&input);
    roundtrip::<Network>(&input);
    roundtrip::<Counted>(&input);
}

fuzz_target!(|input: FuzzInput| {
    fuzz(input);
});
