//! A growable, length-framed binary packet.
//!
//! # Format
//!
//! ```text
//! +--------------------+-----------------------------------------+
//! | size (Layout::Size)|  payload (fields in append order)       |
//! +--------------------+-----------------------------------------+
//! ```
//!
//! The size field holds the number of payload bytes appended so far (plus the
//! width of the size field itself when [`Layout::HEADER_COUNTED`] is set). It
//! is stored in the layout's byte order, like every other multi-byte field.
//!
//! # Growth
//!
//! Capacity is always a multiple of [`Layout::ALLOC_UNIT`]. When an append does
//! not fit, the packet grows to `max(capacity * 2, required)` rounded up to the
//! allocation unit, which keeps a sequence of small appends amortized `O(1)`.
//!
//! # Reads
//!
//! Reads consume fields from a single cursor that starts right after the
//! header. A read that needs more bytes than remain fails with
//! [`Error::TruncatedRead`] and leaves the cursor where it was, so the same
//! read can be retried once more data has been appended.

use crate::{
    config::{align_up, Layout, RangeCfg, Standard},
    endian::ByteOrder,
    number::SizeField,
    Error, Number,
};
use bytes::Bytes;
use std::{fmt, marker::PhantomData};
use tracing::{trace, warn};

/// A growable buffer of length-framed fields.
pub struct Packet<L: Layout = Standard> {
    /// Allocated bytes. `storage.len()` is the capacity; bytes past
    /// `raw_size()` are zeroed slack.
    storage: Vec<u8>,

    /// Offset of the next unread byte.
    cursor: usize,

    _layout: PhantomData<fn() -> L>,
}

impl<L: Layout> Packet<L> {
    /// Capacity of a freshly constructed packet: one allocation unit, or as
    /// many as the header needs.
    ///
    /// A layout whose allocation unit is not a power of two is rejected at
    /// compile time:
    ///
    /// ```compile_fail
    /// use galileo_packet::{Layout, LittleEndian, Packet};
    ///
    /// struct Uneven;
    ///
    /// impl Layout for Uneven {
    ///     type Order = LittleEndian;
    ///     type Size = u32;
    ///     const ALLOC_UNIT: usize = 48;
    ///     const HEADER_COUNTED: bool = false;
    /// }
    ///
    /// let packet = Packet::<Uneven>::new();
    /// ```
    pub const INITIAL_CAPACITY: usize = {
        let unit = L::ALLOC_UNIT;
        assert!(unit.is_power_of_two(), "allocation unit must be a power of two");
        let needed = if L::HEADER_SIZE > unit {
            L::HEADER_SIZE
        } else {
            unit
        };
        (needed + unit - 1) & !(unit - 1)
    };

    /// Creates an empty packet with one allocation unit of capacity.
    ///
    /// Aborts on allocation failure, like the standard collections. Use
    /// [`Packet::try_new`] to observe the failure instead.
    pub fn new() -> Self {
        let mut packet = Self {
            storage: vec![0; Self::INITIAL_CAPACITY],
            cursor: L::HEADER_SIZE,
            _layout: PhantomData,
        };
        packet.reset_header();
        packet
    }

    /// Creates an empty packet, returning [`Error::AllocationFailure`] if the
    /// initial allocation cannot be obtained.
    pub fn try_new() -> Result<Self, Error> {
        let mut packet = Self::detached();
        packet.resize(Self::INITIAL_CAPACITY)?;
        Ok(packet)
    }

    /// A packet without storage. Reads fail and the first append allocates.
    fn detached() -> Self {
        Self {
            storage: Vec::new(),
            cursor: L::HEADER_SIZE,
            _layout: PhantomData,
        }
    }

    /// Wraps storage that already begins with a valid frame.
    pub(crate) fn from_storage(storage: Vec<u8>) -> Self {
        Self {
            storage,
            cursor: L::HEADER_SIZE,
            _layout: PhantomData,
        }
    }

    /// Moves the contents out, leaving `self` without storage (capacity 0).
    ///
    /// The detached packet behaves as an empty one whose first append
    /// allocates.
    pub fn take(&mut self) -> Self {
        std::mem::replace(self, Self::detached())
    }

    /// Deep-copies the packet, returning [`Error::AllocationFailure`] instead
    /// of aborting if memory is unavailable.
    pub fn try_clone(&self) -> Result<Self, Error> {
        let mut storage = Vec::new();
        if let Err(err) = storage.try_reserve_exact(self.storage.len()) {
            warn!(capacity = self.storage.len(), ?err, "failed to clone packet");
            return Err(Error::AllocationFailure(self.storage.len()));
        }
        storage.extend_from_slice(&self.storage);
        Ok(Self {
            storage,
            cursor: self.cursor,
            _layout: PhantomData,
        })
    }

    /// Discards every field and rewinds the cursor. Capacity is retained.
    pub fn clear(&mut self) {
        self.cursor = L::HEADER_SIZE;
        if !self.storage.is_empty() {
            self.reset_header();
        }
    }

    /// Returns the logical size recorded in the header.
    ///
    /// This counts payload bytes, plus the header width if the layout counts it.
    pub fn size(&self) -> usize {
        match self.storage.get(..L::HEADER_SIZE) {
            Some(header) => decode::<L, L::Size>(header)
                .to_usize()
                .unwrap_or(usize::MAX),
            None => L::INITIAL_SIZE,
        }
    }

    /// Returns the total number of framed bytes, header included.
    pub fn raw_size(&self) -> usize {
        if L::HEADER_COUNTED {
            self.size()
        } else {
            self.size().saturating_add(L::HEADER_SIZE)
        }
    }

    /// Returns the number of allocated bytes.
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Returns the offset of the next unread byte.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the number of framed bytes not yet read.
    pub fn remaining(&self) -> usize {
        self.raw_size().saturating_sub(self.cursor)
    }

    /// Returns the framed bytes: header followed by payload.
    pub fn as_bytes(&self) -> &[u8] {
        self.storage.get(..self.raw_size()).unwrap_or(&[])
    }

    /// Returns the payload (framed bytes without the header).
    pub fn payload(&self) -> &[u8] {
        self.as_bytes().get(L::HEADER_SIZE..).unwrap_or(&[])
    }

    /// Returns the framed bytes that have not been read yet.
    pub fn unread(&self) -> &[u8] {
        self.as_bytes().get(self.cursor..).unwrap_or(&[])
    }

    /// Copies the framed bytes into a [`Bytes`].
    pub fn to_bytes(&self) -> Bytes {
        Bytes::copy_from_slice(self.as_bytes())
    }

    /// Consumes the packet, returning its framed bytes.
    pub fn into_vec(mut self) -> Vec<u8> {
        let len = self.as_bytes().len();
        self.storage.truncate(len);
        self.storage
    }

    /// Appends raw bytes at the end of the payload.
    ///
    /// On failure the packet's contents are unchanged.
    pub fn append_bytes(&mut self, data: &[u8]) -> Result<(), Error> {
        let size = self
            .size()
            .checked_add(data.len())
            .ok_or(Error::LengthOverflow(usize::MAX))?;
        let header = L::Size::from_usize(size).ok_or(Error::LengthOverflow(size))?;
        self.reserve(data.len())?;

        let start = self.raw_size();
        self.storage[start..start + data.len()].copy_from_slice(data);
        self.write_header(header);
        Ok(())
    }

    /// Appends a number in the layout's byte order.
    pub fn append_number<T: Number>(&mut self, value: T) -> Result<(), Error> {
        self.append_bytes(L::Order::to_wire(value).as_ref())
    }

    /// Appends a boolean as a size-field integer (`0` or `1`).
    pub fn append_bool(&mut self, value: bool) -> Result<(), Error> {
        let value = L::Size::from_usize(usize::from(value)).ok_or(Error::LengthOverflow(1))?;
        self.append_number(value)
    }

    /// Appends a length-prefixed UTF-8 string.
    pub fn append_string(&mut self, text: &str) -> Result<(), Error> {
        self.append_blob(text.as_bytes())
    }

    /// Appends a length-prefixed block of raw bytes.
    pub fn append_blob(&mut self, data: &[u8]) -> Result<(), Error> {
        self.append_prefixed(data)
    }

    /// Appends a length-prefixed UTF-16 string.
    ///
    /// The prefix holds the byte count (two bytes per unit) and each unit is
    /// stored in the layout's byte order.
    pub fn append_wide_string(&mut self, text: &[u16]) -> Result<(), Error> {
        let bytes: Vec<u8> = text
            .iter()
            .flat_map(|unit| L::Order::to_wire(*unit))
            .collect();
        self.append_prefixed(&bytes)
    }

    /// Encodes `text` as UTF-16 and appends it like [`Packet::append_wide_string`].
    pub fn append_wide_str(&mut self, text: &str) -> Result<(), Error> {
        let units: Vec<u16> = text.encode_utf16().collect();
        self.append_wide_string(&units)
    }

    /// Appends the length of `body` as a size field, then `body` itself.
    ///
    /// Each part grows the packet on its own. If the body cannot be appended
    /// the logical size is rolled back past the prefix.
    fn append_prefixed(&mut self, body: &[u8]) -> Result<(), Error> {
        let prefix = L::Size::from_usize(body.len()).ok_or(Error::LengthOverflow(body.len()))?;
        let mark = self.size();
        self.append_number(prefix)?;
        if let Err(err) = self.append_bytes(body) {
            self.truncate(mark);
            return Err(err);
        }
        Ok(())
    }

    /// Copies `dst.len()` bytes from the cursor into `dst`.
    pub fn read_bytes(&mut self, dst: &mut [u8]) -> Result<(), Error> {
        let src = self.consume(dst.len())?;
        dst.copy_from_slice(src);
        Ok(())
    }

    /// Reads a number stored in the layout's byte order.
    pub fn read_number<T: Number>(&mut self) -> Result<T, Error> {
        let mut raw = T::Bytes::default();
        self.read_bytes(raw.as_mut())?;
        Ok(L::Order::from_wire(raw))
    }

    /// Reads a boolean stored as a size-field integer. Any non-zero value is `true`.
    pub fn read_bool(&mut self) -> Result<bool, Error> {
        let value: L::Size = self.read_number()?;
        Ok(value.to_usize() != Some(0))
    }

    /// Reads a length-prefixed UTF-8 string.
    ///
    /// On failure the cursor is left where it was before the call.
    pub fn read_string(&mut self) -> Result<String, Error> {
        self.read_string_cfg(&RangeCfg::from(..))
    }

    /// Reads a length-prefixed UTF-8 string whose byte length must lie in `range`.
    pub fn read_string_cfg(&mut self, range: &RangeCfg) -> Result<String, Error> {
        self.restoring(|packet| {
            let bytes = packet.read_blob_cfg(range)?;
            String::from_utf8(bytes).map_err(|_| Error::InvalidUtf8)
        })
    }

    /// Reads a length-prefixed block of raw bytes.
    pub fn read_blob(&mut self) -> Result<Vec<u8>, Error> {
        self.read_blob_cfg(&RangeCfg::from(..))
    }

    /// Reads a length-prefixed block of raw bytes whose length must lie in `range`.
    ///
    /// The length is checked before any memory is reserved for the block.
    pub fn read_blob_cfg(&mut self, range: &RangeCfg) -> Result<Vec<u8>, Error> {
        self.restoring(|packet| {
            let len = range.check(packet.read_len()?)?;
            Ok(packet.consume(len)?.to_vec())
        })
    }

    /// Reads a length-prefixed UTF-16 string as raw units.
    pub fn read_wide_string(&mut self) -> Result<Vec<u16>, Error> {
        self.restoring(|packet| {
            let len = packet.read_len()?;
            if len % 2 != 0 {
                return Err(Error::InvalidWideLength(len));
            }
            let units: Vec<u16> = packet
                .consume(len)?
                .chunks_exact(2)
                .map(|unit| L::Order::from_wire::<u16>([unit[0], unit[1]]))
                .collect();
            Ok(units)
        })
    }

    /// Reads a length-prefixed UTF-16 string and decodes it.
    pub fn read_wide_str(&mut self) -> Result<String, Error> {
        self.restoring(|packet| {
            let units = packet.read_wide_string()?;
            String::from_utf16(&units).map_err(|_| Error::InvalidUtf16)
        })
    }

    /// Advances the cursor by `len` bytes without copying them.
    pub fn skip(&mut self, len: usize) -> Result<(), Error> {
        self.consume(len).map(|_| ())
    }

    /// Reads a size-field length prefix.
    fn read_len(&mut self) -> Result<usize, Error> {
        let len: L::Size = self.read_number()?;
        len.to_usize().ok_or(Error::InvalidLength(usize::MAX))
    }

    /// Advances the cursor by `len` bytes and returns them.
    fn consume(&mut self, len: usize) -> Result<&[u8], Error> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(Error::TruncatedRead {
                needed: len,
                remaining,
            });
        }
        if len == 0 {
            return Ok(&[]);
        }
        let start = self.cursor;
        self.cursor += len;
        Ok(&self.storage[start..self.cursor])
    }

    /// Runs `f`, rewinding the cursor if it fails.
    fn restoring<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let mark = self.cursor;
        let result = f(self);
        if result.is_err() {
            self.cursor = mark;
        }
        result
    }

    /// Ensures `additional` bytes fit after the current framed bytes.
    fn reserve(&mut self, additional: usize) -> Result<(), Error> {
        let required = self
            .raw_size()
            .checked_add(additional)
            .ok_or(Error::AllocationFailure(usize::MAX))?;
        let capacity = self.capacity();
        if required <= capacity {
            return Ok(());
        }
        let target = capacity.saturating_mul(2).max(required);
        let new_capacity = align_up::<L>(target).ok_or(Error::AllocationFailure(target))?;
        self.resize(new_capacity)
    }

    /// Grows storage to exactly `new_capacity` bytes, preserving contents.
    fn resize(&mut self, new_capacity: usize) -> Result<(), Error> {
        let old_capacity = self.capacity();
        let additional = new_capacity.saturating_sub(old_capacity);
        if let Err(err) = self.storage.try_reserve_exact(additional) {
            warn!(
                from = old_capacity,
                to = new_capacity,
                ?err,
                "failed to grow packet"
            );
            return Err(Error::AllocationFailure(new_capacity));
        }
        self.storage.resize(new_capacity, 0);
        trace!(from = old_capacity, to = new_capacity, "grew packet");

        // A detached packet gets its header on first allocation.
        if old_capacity == 0 {
            self.cursor = L::HEADER_SIZE;
            self.reset_header();
        }
        Ok(())
    }

    /// Rolls the logical size back to `size`.
    fn truncate(&mut self, size: usize) {
        if self.storage.is_empty() {
            return;
        }
        if let Some(header) = L::Size::from_usize(size) {
            self.write_header(header);
        }
    }

    /// Writes the initial logical size into the header.
    fn reset_header(&mut self) {
        self.truncate(L::INITIAL_SIZE);
    }

    fn write_header(&mut self, size: L::Size) {
        let wire = L::Order::to_wire(size);
        self.storage[..L::HEADER_SIZE].copy_from_slice(wire.as_ref());
    }
}

/// Decodes a `T` from the first `T::SIZE` bytes of `src` in `L`'s byte order.
pub(crate) fn decode<L: Layout, T: Number>(src: &[u8]) -> T {
    let mut raw = T::Bytes::default();
    raw.as_mut().copy_from_slice(&src[..T::SIZE]);
    L::Order::from_wire(raw)
}

impl<L: Layout> Default for Packet<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Layout> Clone for Packet<L> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            cursor: self.cursor,
            _layout: PhantomData,
        }
    }
}

impl<L: Layout> fmt::Debug for Packet<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Packet")
            .field("size", &self.size())
            .field("capacity", &self.capacity())
            .field("cursor", &self.cursor)
            .finish()
    }
}
