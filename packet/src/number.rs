//! Fixed-width numeric fields.
//!
//! # Numbers vs size fields
//!
//! Any [`Number`] can be appended to or read from a packet. Its encoded width
//! is always `size_of::<T>()`: there is no variable-length encoding, so a
//! reader that knows the sequence of types can always locate the next field.
//!
//! A [`SizeField`] is an unsigned [`Number`] that can also carry a length.
//! The packet header, string and blob prefixes, and encoded booleans all use
//! the layout's size field.

/// A fixed-width value that can be converted to and from its native-order bytes.
pub trait Number: Copy + Sized {
    /// Encoded width in bytes.
    const SIZE: usize;

    /// Byte array holding exactly [`Self::SIZE`] bytes.
    type Bytes: AsRef<[u8]> + AsMut<[u8]> + Default;

    /// Returns the in-memory (native order) bytes of the value.
    fn to_ne_bytes(self) -> Self::Bytes;

    /// Builds a value from its in-memory (native order) bytes.
    fn from_ne_bytes(bytes: Self::Bytes) -> Self;
}

/// An unsigned [`Number`] used for the header and length prefixes.
pub trait SizeField: Number {
    /// Converts a length into the field type, if it fits.
    fn from_usize(value: usize) -> Option<Self>;

    /// Converts the field into a length, if it fits in `usize`.
    fn to_usize(self) -> Option<usize>;
}

macro_rules! impl_number {
    ($type:ty) => {
        impl Number for $type {
            const SIZE: usize = std::mem::size_of::<$type>();
            type Bytes = [u8; std::mem::size_of::<$type>()];

            #[inline]
            fn to_ne_bytes(self) -> Self::Bytes {
                <$type>::to_ne_bytes(self)
            }

            #[inline]
            fn from_ne_bytes(bytes: Self::Bytes) -> Self {
                <$type>::from_ne_bytes(bytes)
            }
        }
    };
}

impl_number!(u8);
impl_number!(u16);
impl_number!(u32);
impl_number!(u64);
impl_number!(u128);
impl_number!(i8);
impl_number!(i16);
impl_number!(i32);
impl_number!(i64);
impl_number!(i128);
impl_number!(f32);
impl_number!(f64);

macro_rules! impl_size_field {
    ($type:ty) => {
        impl SizeField for $type {
            #[inline]
            fn from_usize(value: usize) -> Option<Self> {
                <$type>::try_from(value).ok()
            }

            #[inline]
            fn to_usize(self) -> Option<usize> {
                usize::try_from(self).ok()
            }
        }
    };
}

impl_size_field!(u8);
impl_size_field!(u16);
impl_size_field!(u32);
impl_size_field!(u64);

#[cfg(test)]
mod tests {
    use super::*;
    use paste::paste;

    macro_rules! impl_num_test {
        ($type:ty) => {
            paste! {
                #[test]
                fn [<test_ $type>]() {
                    assert_eq!(<$type as Number>::SIZE, std::mem::size_of::<$type>());
                    let values: [$type; 5] =
                        [0 as $type, 1 as $type, 42 as $type, <$type>::MAX, <$type>::MIN];
                    for value in values {
                        let bytes = Number::to_ne_bytes(value);
                        assert_eq!(bytes.as_ref().len(), <$type as Number>::SIZE);
                        let decoded: $type = Number::from_ne_bytes(bytes);
                        assert_eq!(value.to_bits_or_self(), decoded.to_bits_or_self());
                    }
                }
            }
        };
    }

    // Compares floats bitwise so NaN payloads would still be caught.
    trait BitsOrSelf {
        type Out: PartialEq + std::fmt::Debug;
        fn to_bits_or_self(self) -> Self::Out;
    }

    macro_rules! impl_bits_self {
        ($($type:ty),*) => {
            $(impl BitsOrSelf for $type {
                type Out = $type;
                fn to_bits_or_self(self) -> $type {
                    self
                }
            })*
        };
    }
    impl_bits_self!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128);

    impl BitsOrSelf for f32 {
        type Out = u32;
        fn to_bits_or_self(self) -> u32 {
            self.to_bits()
        }
    }

    impl BitsOrSelf for f64 {
        type Out = u64;
        fn to_bits_or_self(self) -> u64 {
            self.to_bits()
        }
    }

    impl_num_test!(u8);
    impl_num_test!(u16);
    impl_num_test!(u32);
    impl_num_test!(u64);
    impl_num_test!(u128);
    impl_num_test!(i8);
    impl_num_test!(i16);
    impl_num_test!(i32);
    impl_num_test!(i64);
    impl_num_test!(i128);
    impl_num_test!(f32);
    impl_num_test!(f64);

    #[test]
    fn test_size_field_limits() {
        assert_eq!(u8::from_usize(255), Some(255u8));
        assert_eq!(u8::from_usize(256), None);
        assert_eq!(u16::from_usize(65_535), Some(u16::MAX));
        assert_eq!(u16::from_usize(65_536), None);
        assert_eq!(u32::from_usize(7), Some(7u32));
        assert_eq!(7u64.to_usize(), Some(7));
        assert_eq!(u32::MAX.to_usize(), usize::try_from(u32::MAX).ok());
    }
}
