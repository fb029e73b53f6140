//! Single bit operations on integer flag fields
//!
//! Font tables store many boolean properties as bits inside `uint16` or
//! `uint32` fields (for instance [`Head::flags`]). These helpers test, set
//! and clear one such bit, counting from the least significant bit.
//!
//! All three functions panic if the bit index is not smaller than the width
//! of the integer type.
//!
//! [`Head::flags`]: crate::tables::head::Head::flags

use std::ops::{BitAnd, BitOr, Not, Shl};

mod sealed {
    pub trait Sealed {}
}

/// An unsigned integer type that can be used as a bitfield.
pub trait FlagBits:
    Copy
    + PartialEq
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + Not<Output = Self>
    + Shl<u32, Output = Self>
    + sealed::Sealed
{
    /// The number of bits in this type.
    const BITS: u32;
    #[doc(hidden)]
    const ZERO: Self;
    #[doc(hidden)]
    const ONE: Self;
}

macro_rules! flag_bits {
    ($($ty:ty),*) => {
        $(
            impl sealed::Sealed for $ty {}
            impl FlagBits for $ty {
                const BITS: u32 = <$ty>::BITS;
                const ZERO: Self = 0;
                const ONE: Self = 1;
            }
        )*
    };
}

flag_bits!(u8, u16, u32, u64);

fn mask<T: FlagBits>(k: u32) -> T {
    assert!(
        k < T::BITS,
        "bit index {k} out of range for a {}-bit value",
        T::BITS
    );
    T::ONE << k
}

/// Returns `true` if bit `k` of `value` is set.
///
/// # Panics
///
/// Panics if `k` is not less than the bit width of `T`.
pub fn is_bit_set<T: FlagBits>(value: T, k: u32) -> bool {
    value & mask::<T>(k) != T::ZERO
}

/// Returns `value` with bit `k` cleared.
///
/// # Panics
///
/// Panics if `k` is not less than the bit width of `T`.
pub fn clear_bit<T: FlagBits>(value: T, k: u32) -> T {
    value & !mask::<T>(k)
}

/// Returns `value` with bit `k` set.
///
/// # Panics
///
/// Panics if `k` is not less than the bit width of `T`.
pub fn set_bit<T: FlagBits>(value: T, k: u32) -> T {
    value | mask::<T>(k)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits() {
        assert!(is_bit_set(15u16, 1));
        assert!(!is_bit_set(13u16, 1));
        assert!(is_bit_set(0x8000_0000u32, 31));
        assert!(!is_bit_set(0u8, 7));
    }

    #[test]
    fn clear_and_set() {
        // 0b1111 -> 0b1101
        assert_eq!(clear_bit(15u16, 1), 13);
        assert_eq!(set_bit(13u16, 1), 15);
        // no-ops
        assert_eq!(clear_bit(13u16, 1), 13);
        assert_eq!(set_bit(15u16, 1), 15);
        assert_eq!(set_bit(0u64, 63), 1 << 63);
    }

    #[test]
    fn clear_every_width() {
        assert_eq!(clear_bit(0xFFu8, 7), 0x7F);
        assert_eq!(clear_bit(u32::MAX, 31), 0x7FFF_FFFF);
        assert_eq!(clear_bit(u64::MAX, 0), u64::MAX - 1);
    }

    #[test]
    fn head_flag_bit_four() {
        let flags = 0b0001_1011u16;
        assert!(is_bit_set(flags, 4));
        let cleared = clear_bit(flags, 4);
        assert_eq!(cleared, 0b0000_1011);
        assert!(!is_bit_set(cleared, 4));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn out_of_range() {
        is_bit_set(1u16, 16);
    }
}
