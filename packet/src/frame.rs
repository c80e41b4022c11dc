//! Decode framed packets received from elsewhere.
//!
//! A receiver reading a stream of packets first waits for
//! [`Layout::HEADER_SIZE`] bytes, asks [`frame_len`] how many bytes the whole
//! frame occupies, waits for those, and then hands them to
//! [`Packet::from_frame`].

use crate::{
    config::{align_up, Layout},
    number::SizeField,
    packet::decode,
    Error, Number, Packet,
};
use bytes::Buf;
use tracing::{debug, trace};

/// Returns the total framed length (header included) announced by the header
/// at the start of `prefix`.
///
/// Fails with [`Error::TruncatedRead`] if `prefix` is shorter than the header,
/// and with [`Error::InvalidHeader`] if a counted header is smaller than itself.
pub fn frame_len<L: Layout>(prefix: &[u8]) -> Result<usize, Error> {
    if prefix.len() < L::HEADER_SIZE {
        return Err(Error::TruncatedRead {
            needed: L::HEADER_SIZE,
            remaining: prefix.len(),
        });
    }
    raw_size::<L>(decode::<L, L::Size>(prefix))
}

/// Converts a decoded header into the total framed length.
fn raw_size<L: Layout>(header: L::Size) -> Result<usize, Error> {
    let size = header
        .to_usize()
        .ok_or(Error::InvalidHeader(usize::MAX))?;
    if L::HEADER_COUNTED {
        if size < L::HEADER_SIZE {
            return Err(Error::InvalidHeader(size));
        }
        Ok(size)
    } else {
        size.checked_add(L::HEADER_SIZE)
            .ok_or(Error::InvalidHeader(size))
    }
}

impl<L: Layout> Packet<L> {
    /// Builds a packet from exactly one frame (header and payload).
    ///
    /// The returned packet's cursor is positioned after the header, ready for
    /// typed reads. `buf` must contain the whole frame and nothing else.
    pub fn from_frame(mut buf: impl Buf) -> Result<Self, Error> {
        let available = buf.remaining();
        if available < L::HEADER_SIZE {
            return Err(Error::TruncatedRead {
                needed: L::HEADER_SIZE,
                remaining: available,
            });
        }

        let mut header = <L::Size as Number>::Bytes::default();
        buf.copy_to_slice(header.as_mut());
        let raw = raw_size::<L>(decode::<L, L::Size>(header.as_ref()))?;
        if available < raw {
            debug!(needed = raw, available, "frame is incomplete");
            return Err(Error::TruncatedRead {
                needed: raw,
                remaining: available,
            });
        }
        if available > raw {
            return Err(Error::ExtraData(available - raw));
        }

        let capacity =
            align_up::<L>(raw.max(L::ALLOC_UNIT)).ok_or(Error::AllocationFailure(raw))?;
        let mut storage = Vec::new();
        if storage.try_reserve_exact(capacity).is_err() {
            return Err(Error::AllocationFailure(capacity));
        }
        storage.extend_from_slice(header.as_ref());
        storage.resize(raw, 0);
        buf.copy_to_slice(&mut storage[L::HEADER_SIZE..]);
        storage.resize(capacity, 0);
        trace!(size = raw, capacity, "decoded frame");

        Ok(Self::from_storage(storage))
    }
}
