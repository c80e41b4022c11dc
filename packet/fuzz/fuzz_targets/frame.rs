#![no_main]

use arbitrary::Arbitrary;
use bytes::Bytes;
use galileo_packet::{frame::frame_len, Counted, Layout, Network, Packet, RangeCfg, Standard};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum Read {
    Bytes(u8),
    Bool,
    U16,
    U32,
    U64,
    String,
    WideString,
    Blob { max: u16 },
    Skip(u8),
}

#[derive(Arbitrary, Debug)]
struct FuzzInput<'a> {
    frame: &'a [u8],
    reads: Vec<Read>,
}

fn decode<L: Layout>(input: &FuzzInput) {
    // Arbitrary input never panics, and only well-sized frames decode
    let result = Packet::<L>::from_frame(Bytes::copy_from_slice(input.frame));
    let Ok(mut packet) = result else {
        return;
    };
    assert_eq!(frame_len::<L>(input.frame), Ok(input.frame.len()));
    assert_eq!(packet.as_bytes(), input.frame);

    for read in &input.reads {
        let cursor = packet.cursor();
        let result = match read {
            Read::Bytes(len) => packet.read_bytes(&mut vec![0u8; *len as usize]),
            Read::Bool => packet.read_bool().map(|_| ()),
            Read::U16 => packet.read_number::<u16>().map(|_| ()),
            Read::U32 => packet.read_number::<u32>().map(|_| ()),
            Read::U64 => packet.read_number::<u64>().map(|_| ()),
            Read::String => packet.read_string().map(|_| ()),
            Read::WideString => packet.read_wide_string().map(|_| ()),
            Read::Blob { max } => packet
                .read_blob_cfg(&RangeCfg::new(..=*max as usize))
                .map(|_| ()),
            Read::Skip(len) => packet.skip(*len as usize),
        };

        // Failed reads never move the cursor
        if result.is_err() {
            assert_eq!(packet.cursor(), cursor);
        }
        assert!(packet.cursor() <= packet.raw_size());
    }
}

fuzz_target!(|input: FuzzInput| {
    decode::<Standard>(&input);
    decode::<Network>(&input);
    decode::<Counted>(&input);
});
