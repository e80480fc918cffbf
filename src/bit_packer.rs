//! Byte packing of code bits.
//!
//! Bits are packed most-significant first. The final byte is filled with zero
//! bits whose count (0..=7) travels alongside the bytes so that unpacking can
//! drop them again.

use bitvec::prelude::*;

use crate::error::PayloadError;

/// Packed code bits plus the number of zero bits appended to fill the last
/// byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packed {
    pub bytes: Vec<u8>,
    pub padding: u8,
}

/// Number of zero bits needed to bring `bit_len` to a byte boundary.
pub fn padding_for(bit_len: usize) -> u8 {
    ((8 - bit_len % 8) % 8) as u8
}

pub fn pack(mut bits: BitVec<u8, Msb0>) -> Packed {
    let padding = padding_for(bits.len());
    bits.resize(bits.len() + padding as usize, false);
    Packed {
        bytes: bits.into_vec(),
        padding,
    }
}

pub fn unpack(bytes: &[u8], padding: u8) -> Result<BitVec<u8, Msb0>, PayloadError> {
    let mut bits = BitVec::<u8, Msb0>::from_slice(bytes);
    let available = bits.len();
    if padding as usize > available {
        return Err(PayloadError::PaddingExceedsPayload { padding, available });
    }
    bits.truncate(available - padding as usize);
    Ok(bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_lengths() {
        assert_eq!(padding_for(0), 0);
        assert_eq!(padding_for(1), 7);
        assert_eq!(padding_for(8), 0);
        assert_eq!(padding_for(13), 3);
    }

    #[test]
    fn packs_msb_first() {
        let packed = pack(bitvec![u8, Msb0; 0, 1]);
        assert_eq!(packed.bytes, vec![0b0100_0000]);
        assert_eq!(packed.padding, 6);

        let packed = pack(bitvec![u8, Msb0; 1, 0, 1, 1, 0, 0, 0, 1, 1]);
        assert_eq!(packed.bytes, vec![0b1011_0001, 0b1000_0000]);
        assert_eq!(packed.padding, 7);
    }

    #[test]
    fn byte_aligned_needs_no_padding() {
        let packed = pack(bitvec![u8, Msb0; 1; 16]);
        assert_eq!(packed.bytes, vec![0xff, 0xff]);
        assert_eq!(packed.padding, 0);
        assert_eq!(unpack(&packed.bytes, 0).unwrap().len(), 16);
    }

    #[test]
    fn unpack_strips_padding() {
        let bits = unpack(&[0b1110_0000], 5).unwrap();
        assert_eq!(bits, bitvec![u8, Msb0; 1, 1, 1]);
    }

    #[test]
    fn unpack_rejects_excess_padding() {
        assert_eq!(
            unpack(&[], 3),
            Err(PayloadError::PaddingExceedsPayload {
                padding: 3,
                available: 0
            })
        );
    }
}
