//! Helpers over raw SSZ bitlist bytes.
//!
//! SSZ bitlists store bits little-endian within each byte and terminate with
//! a sentinel bit one past the data. The state transition works on a scratch
//! `Vec<bool>` and converts back to a `BitList` when the new state is built.

use crate::HistoricalRootsLimit;
use ssz::Encode;
use ssz_types::BitList;

/// Number of data bits in a raw bitlist encoding.
///
/// The sentinel must live in the last byte; a trailing zero byte carries no
/// sentinel, so such an encoding is malformed and reports a length of zero.
pub fn bitlist_len(bytes: &[u8]) -> usize {
    match bytes.last() {
        None | Some(0) => 0,
        Some(last) => (bytes.len() - 1) * 8 + (7 - last.leading_zeros() as usize),
    }
}

/// The data bit at `index`, or `false` when out of bounds.
pub fn get_bit(bytes: &[u8], index: usize) -> bool {
    if index >= bitlist_len(bytes) {
        return false;
    }
    bytes[index / 8] & (1 << (index % 8)) != 0
}

/// Expand a bitlist into a scratch vector, dropping the sentinel.
pub fn to_bools(bits: &BitList<HistoricalRootsLimit>) -> Vec<bool> {
    let bytes = bits.as_ssz_bytes();
    let len = bitlist_len(&bytes);
    (0..len).map(|index| get_bit(&bytes, index)).collect()
}

/// Rebuild a bitlist from a scratch vector.
pub fn from_bools(bits: &[bool]) -> Result<BitList<HistoricalRootsLimit>, ssz_types::Error> {
    let mut list = BitList::with_capacity(bits.len())?;
    for (index, bit) in bits.iter().enumerate() {
        if *bit {
            list.set(index, true)?;
        }
    }
    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_of_empty_and_sentinel_only() {
        assert_eq!(bitlist_len(&[]), 0);
        assert_eq!(bitlist_len(&[0x01]), 0);
    }

    #[test]
    fn len_counts_bits_below_the_sentinel() {
        assert_eq!(bitlist_len(&[0x02]), 1);
        assert_eq!(bitlist_len(&[0x03]), 1);
        assert_eq!(bitlist_len(&[0x04]), 2);
        assert_eq!(bitlist_len(&[0x08]), 3);
        assert_eq!(bitlist_len(&[0x80]), 7);
        assert_eq!(bitlist_len(&[0x00, 0x01]), 8);
        assert_eq!(bitlist_len(&[0x00, 0x02]), 9);
        assert_eq!(bitlist_len(&[0x00, 0x00, 0x01]), 16);
    }

    #[test]
    fn len_of_malformed_trailing_zero_byte() {
        assert_eq!(bitlist_len(&[0xff, 0x00]), 0);
    }

    #[test]
    fn get_bit_reads_data_bits_only() {
        // 0x05 = data bit 0 set, bit 1 clear, sentinel at index 2.
        assert!(get_bit(&[0x05], 0));
        assert!(!get_bit(&[0x05], 1));
        assert!(!get_bit(&[0x05], 2));
        assert!(!get_bit(&[0x03], 100));
    }

    #[test]
    fn bools_round_trip() {
        let values = [true, false, true, true, false, false, true, false, true];
        let list = from_bools(&values).unwrap();
        assert_eq!(list.len(), values.len());
        assert_eq!(to_bools(&list), values);
    }

    #[test]
    fn empty_round_trip() {
        let list = from_bools(&[]).unwrap();
        assert_eq!(list.len(), 0);
        assert!(to_bools(&list).is_empty());
    }

    #[test]
    fn round_trip_crosses_byte_boundary() {
        let values: Vec<bool> = (0..64).map(|i| i % 2 == 0).collect();
        let list = from_bools(&values).unwrap();
        assert_eq!(to_bools(&list), values);
    }
}
