//! Types for configuring packets.
//!
//! A [`Layout`] fixes, at compile time, everything a reader must know to parse
//! a packet: the byte order, the width of the size field, whether the header
//! counts itself, and (for the writer only) the allocation granularity. None
//! of these are self-describing in the byte stream, so both sides of a
//! protocol must agree on the same layout out of band.
//!
//! [`RangeCfg`] bounds lengths read from untrusted input.

use crate::{
    endian::{BigEndian, ByteOrder, LittleEndian},
    number::SizeField,
    Error, Number,
};
use core::ops::{self, Bound, RangeBounds};

/// Compile-time parameters of a packet.
pub trait Layout: 'static {
    /// Byte order of the header and every numeric field.
    type Order: ByteOrder;

    /// Integer type of the header and of every length prefix.
    type Size: SizeField;

    /// Allocation granularity in bytes. Must be a power of two.
    const ALLOC_UNIT: usize;

    /// Whether the logical size stored in the header includes the header's own width.
    const HEADER_COUNTED: bool;

    /// Width of the header (and of every length prefix) in bytes.
    const HEADER_SIZE: usize = <Self::Size as Number>::SIZE;

    /// Logical size of a packet with no payload.
    const INITIAL_SIZE: usize = if Self::HEADER_COUNTED {
        Self::HEADER_SIZE
    } else {
        0
    };
}

/// Rounds `bytes` up to the next multiple of `L::ALLOC_UNIT`.
///
/// Returns `None` if the result does not fit in `usize`.
pub fn align_up<L: Layout>(bytes: usize) -> Option<usize> {
    const {
        assert!(
            L::ALLOC_UNIT.is_power_of_two(),
            "allocation unit must be a power of two"
        )
    };
    let mask = L::ALLOC_UNIT - 1;
    bytes.checked_add(mask).map(|padded| padded & !mask)
}

/// Little-endian, 4-byte size field, 64-byte allocation unit, header not counted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Standard;

impl Layout for Standard {
    type Order = LittleEndian;
    type Size = u32;
    const ALLOC_UNIT: usize = 64;
    const HEADER_COUNTED: bool = false;
}

/// [`Standard`] with every multi-byte field stored big-endian.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Network;

impl Layout for Network {
    type Order = BigEndian;
    type Size = u32;
    const ALLOC_UNIT: usize = 64;
    const HEADER_COUNTED: bool = false;
}

/// Little-endian, 2-byte size field, header counted in the logical size.
///
/// Suits protocols whose length field describes the whole message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Counted;

impl Layout for Counted {
    type Order = LittleEndian;
    type Size = u16;
    const ALLOC_UNIT: usize = 32;
    const HEADER_COUNTED: bool = true;
}

/// Layout of an HTTP response body accumulator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct HttpBody;

impl Layout for HttpBody {
    type Order = LittleEndian;
    type Size = u32;
    const ALLOC_UNIT: usize = 64;
    const HEADER_COUNTED: bool = false;
}

/// Accepted values of a length prefix.
///
/// Prefixes come from the wire, so a reader that knows what it expects (a
/// fixed-size digest, a bounded name) should say so before the body is copied
/// out. Any standard range converts into a `RangeCfg`, and `..` accepts every
/// length.
///
/// # Examples
///
/// ```
/// use galileo_packet::{Packet, RangeCfg, Standard};
///
/// let mut packet = Packet::<Standard>::new();
/// packet.append_string("a name that is far too long").unwrap();
///
/// // The prefix is rejected and the cursor stays before it.
/// assert!(packet.read_string_cfg(&RangeCfg::new(1..=16)).is_err());
/// assert_eq!(packet.cursor(), 4);
/// assert!(packet.read_string_cfg(&RangeCfg::from(..)).is_ok());
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct RangeCfg {
    bounds: (Bound<usize>, Bound<usize>),
}

impl RangeCfg {
    /// Accepts the lengths in `range`.
    pub fn new(range: impl RangeBounds<usize>) -> Self {
        Self {
            bounds: (range.start_bound().cloned(), range.end_bound().cloned()),
        }
    }

    /// Accepts only a length of exactly `len`.
    pub fn exact(len: usize) -> Self {
        Self::new(len..=len)
    }

    /// Returns true if a prefix of `len` is accepted.
    pub fn contains(&self, len: usize) -> bool {
        self.bounds.contains(&len)
    }

    /// Returns `len` if it is accepted, [`Error::InvalidLength`] otherwise.
    pub fn check(&self, len: usize) -> Result<usize, Error> {
        if self.contains(len) {
            Ok(len)
        } else {
            Err(Error::InvalidLength(len))
        }
    }
}

macro_rules! impl_range_from {
    ($($range:ty),*) => {
        $(impl From<$range> for RangeCfg {
            fn from(range: $range) -> Self {
                Self::new(range)
            }
        })*
    };
}

impl_range_from!(
    ops::Range<usize>,
    ops::RangeInclusive<usize>,
    ops::RangeFrom<usize>,
    ops::RangeTo<usize>,
    ops::RangeToInclusive<usize>,
    ops::RangeFull
);
