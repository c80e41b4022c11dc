//! Byte order of encoded fields.
//!
//! Every multi-byte field in a packet (the header included) is stored in the
//! packet's configured [`ByteOrder`]. Values are converted with [`swap_bytes`]
//! only when that order differs from the target's native order, so a packet
//! holding the same logical values is bit-identical on every platform.

use crate::Number;

/// Returns `value` with its bytes in reverse order.
///
/// Byte `0` swaps with byte `N - 1`, byte `1` with byte `N - 2`, and so on,
/// where `N` is the encoded width of `T`. Single-byte values are returned
/// unchanged.
#[inline]
pub fn swap_bytes<T: Number>(value: T) -> T {
    let mut bytes = value.to_ne_bytes();
    bytes.as_mut().reverse();
    T::from_ne_bytes(bytes)
}

/// Whether the target stores multi-byte values least significant byte first.
pub const NATIVE_LITTLE_ENDIAN: bool = cfg!(target_endian = "little");

/// Byte order used for every multi-byte field of a packet.
pub trait ByteOrder: 'static {
    /// True for little-endian.
    const LITTLE_ENDIAN: bool;

    /// True if this order matches the target's native order.
    const IS_NATIVE: bool = Self::LITTLE_ENDIAN == NATIVE_LITTLE_ENDIAN;

    /// Converts a native value into its wire representation.
    #[inline]
    fn to_wire<T: Number>(value: T) -> T::Bytes {
        if Self::IS_NATIVE {
            value.to_ne_bytes()
        } else {
            swap_bytes(value).to_ne_bytes()
        }
    }

    /// Converts a wire representation back into a native value.
    #[inline]
    fn from_wire<T: Number>(bytes: T::Bytes) -> T {
        let value = T::from_ne_bytes(bytes);
        if Self::IS_NATIVE {
            value
        } else {
            swap_bytes(value)
        }
    }
}

/// Least significant byte first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LittleEndian;

impl ByteOrder for LittleEndian {
    const LITTLE_ENDIAN: bool = true;
}

/// Most significant byte first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BigEndian;

impl ByteOrder for BigEndian {
    const LITTLE_ENDIAN: bool = false;
}

/// The target's native byte order.
#[cfg(target_endian = "little")]
pub type NativeEndian = LittleEndian;

/// The target's native byte order.
#[cfg(target_endian = "big")]
pub type NativeEndian = BigEndian;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_bytes() {
        assert_eq!(swap_bytes(0x12u8), 0x12);
        assert_eq!(swap_bytes(0x1234u16), 0x3412);
        assert_eq!(swap_bytes(0x1234_5678u32), 0x7856_3412);
        assert_eq!(
            swap_bytes(0x0102_0304_0506_0708u64),
            0x0807_0605_0403_0201
        );
        assert_eq!(swap_bytes(-2i16), i16::from_be_bytes((-2i16).to_le_bytes()));
        assert_eq!(
            swap_bytes(1.0f64).to_bits(),
            1.0f64.to_bits().swap_bytes()
        );
    }

    #[test]
    fn test_swap_bytes_involution() {
        for value in [0u32, 1, 0xDEAD_BEEF, u32::MAX] {
            assert_eq!(swap_bytes(swap_bytes(value)), value);
        }
        let wide = 0x0123_4567_89AB_CDEF_0123_4567_89AB_CDEFu128;
        assert_eq!(swap_bytes(swap_bytes(wide)), wide);
    }

    #[test]
    fn test_wire_order() {
        let le = LittleEndian::to_wire(0x0102_0304u32);
        let be = BigEndian::to_wire(0x0102_0304u32);
        assert_eq!(le, [0x04, 0x03, 0x02, 0x01]);
        assert_eq!(be, [0x01, 0x02, 0x03, 0x04]);
        assert_eq!(LittleEndian::from_wire::<u32>(le), 0x0102_0304);
        assert_eq!(BigEndian::from_wire::<u32>(be), 0x0102_0304);

        // Single bytes are unaffected by order.
        assert_eq!(LittleEndian::to_wire(0xABu8), BigEndian::to_wire(0xABu8));
    }

    #[test]
    fn test_native() {
        assert!(NativeEndian::IS_NATIVE);
        assert_ne!(LittleEndian::IS_NATIVE, BigEndian::IS_NATIVE);
    }
}
