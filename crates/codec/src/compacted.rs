use ruint::aliases::U256;

use crate::{Error, Result};

const WORD_BITS: usize = 256;
const MAX_FIELD_BITS: usize = 128;

/// Layout of a compacted array: field width and the number of fields per word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    bit_length: usize,
    values_per_word: usize,
    label: &'static str,
}

impl Layout {
    /// Block numbers: 64 bits, 4 per word.
    pub const BLOCK_NUMBER: Self = Self::standard(64, "blockNumber");

    /// Timestamps: 64 bits, 4 per word.
    pub const TIMESTAMP: Self = Self::standard(64, "timestamp");

    /// Decimals: 8 bits, 32 per word.
    pub const DECIMAL: Self = Self::standard(8, "decimal");

    /// Prices: 32 bits, 8 per word.
    pub const PRICE: Self = Self::standard(32, "price");

    /// Price indexes: 8 bits, 32 per word.
    pub const PRICE_INDEX: Self = Self::standard(8, "priceIndex");

    const fn standard(bit_length: usize, label: &'static str) -> Self {
        Self {
            bit_length,
            values_per_word: WORD_BITS / bit_length,
            label,
        }
    }

    /// Create a custom layout.
    ///
    /// Fields are at most 128 bits wide and must fit in one word together.
    pub fn new(bit_length: usize, values_per_word: usize, label: &'static str) -> Result<Self> {
        let fits = bit_length
            .checked_mul(values_per_word)
            .is_some_and(|bits| bits <= WORD_BITS);
        if bit_length == 0 || bit_length > MAX_FIELD_BITS || values_per_word == 0 || !fits {
            return Err(Error::InvalidLayout {
                bit_length,
                values_per_word,
            });
        }
        Ok(Self {
            bit_length,
            values_per_word,
            label,
        })
    }

    /// Field width in bits.
    pub fn bit_length(&self) -> usize {
        self.bit_length
    }

    /// Number of fields per word.
    pub fn values_per_word(&self) -> usize {
        self.values_per_word
    }

    /// Label used in errors.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Returns a copy of this layout with another label.
    pub fn with_label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    /// Largest value a field can hold.
    pub fn max_value(&self) -> u128 {
        u128::MAX >> (MAX_FIELD_BITS - self.bit_length)
    }

    fn mask(&self) -> U256 {
        U256::MAX >> (WORD_BITS - self.bit_length)
    }

    /// Returns `(slot_index, bit_offset)` of the field at `index`.
    fn position(&self, index: usize) -> (usize, usize) {
        (
            index / self.values_per_word,
            (index % self.values_per_word) * self.bit_length,
        )
    }
}

/// Read the field at `index`.
///
/// Fails with [`Error::CompactedArrayOutOfBounds`] if the word holding `index`
/// was not supplied. A zero is returned as is.
pub fn unpack(words: &[U256], index: usize, layout: &Layout) -> Result<u128> {
    let (slot_index, offset) = layout.position(index);
    let word = words
        .get(slot_index)
        .ok_or(Error::CompactedArrayOutOfBounds {
            index,
            slot_index,
            len: words.len(),
            label: layout.label,
        })?;
    let field = (*word >> offset) & layout.mask();
    Ok(low_u128(&field))
}

/// Pack `values` into words.
pub fn pack(values: &[u128], layout: &Layout) -> Result<Vec<U256>> {
    let max = layout.max_value();
    let mut words = vec![U256::ZERO; values.len().div_ceil(layout.values_per_word)];
    for (index, value) in values.iter().enumerate() {
        if *value > max {
            return Err(Error::ValueTooLarge {
                value: *value,
                bit_length: layout.bit_length,
            });
        }
        let (slot_index, offset) = layout.position(index);
        words[slot_index] |= U256::from(*value) << offset;
    }
    Ok(words)
}

fn low_u128(word: &U256) -> u128 {
    let limbs = word.as_limbs();
    (u128::from(limbs[1]) << 64) | u128::from(limbs[0])
}

/// A borrowed compacted array.
#[derive(Debug, Clone, Copy)]
pub struct CompactedArray<'a> {
    words: &'a [U256],
    layout: Layout,
}

impl<'a> CompactedArray<'a> {
    /// Wrap `words` with the given layout.
    pub fn new(words: &'a [U256], layout: Layout) -> Self {
        Self { words, layout }
    }

    /// Get the field at `index`.
    pub fn get(&self, index: usize) -> Result<u128> {
        unpack(self.words, index, &self.layout)
    }

    /// Get the field at `index` as `u64`.
    pub fn get_u64(&self, index: usize) -> Result<u64> {
        let value = self.get(index)?;
        u64::try_from(value).map_err(|_| Error::ValueTooLarge {
            value,
            bit_length: 64,
        })
    }

    /// Number of fields the supplied words can hold.
    pub fn capacity(&self) -> usize {
        self.words.len() * self.layout.values_per_word
    }

    /// Layout.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Raw words.
    pub fn words(&self) -> &'a [U256] {
        self.words
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prices_are_packed_low_field_first() -> Result<()> {
        let words = pack(&[0x11223344, 0x55667788], &Layout::PRICE)?;
        assert_eq!(words, vec![U256::from(0x5566_7788_1122_3344_u64)]);
        assert_eq!(unpack(&words, 0, &Layout::PRICE)?, 0x11223344);
        assert_eq!(unpack(&words, 1, &Layout::PRICE)?, 0x55667788);
        // Unpopulated fields of an existing word decode to zero.
        assert_eq!(unpack(&words, 7, &Layout::PRICE)?, 0);
        Ok(())
    }

    #[test]
    fn test_decode_hex_word() -> Result<()> {
        let bytes: [u8; 32] = hex::decode(
            "0000000000000004000000000000000300000000000000020000000000000001",
        )
        .unwrap()
        .try_into()
        .unwrap();
        let words = [U256::from_be_bytes(bytes)];
        let blocks = CompactedArray::new(&words, Layout::BLOCK_NUMBER);
        for index in 0..4 {
            assert_eq!(blocks.get_u64(index)?, index as u64 + 1);
        }
        assert_eq!(blocks.capacity(), 4);
        Ok(())
    }

    #[test]
    fn test_values_spanning_several_words() -> Result<()> {
        let values = (1..=40).map(|v| v * 3).collect::<Vec<u128>>();
        let words = pack(&values, &Layout::DECIMAL)?;
        assert_eq!(words.len(), 2);
        for (index, value) in values.iter().enumerate() {
            assert_eq!(unpack(&words, index, &Layout::DECIMAL)?, *value);
        }
        Ok(())
    }

    #[test]
    fn test_out_of_bounds() {
        let words = [U256::from(1)];
        let err = unpack(&words, 8, &Layout::PRICE).unwrap_err();
        assert_eq!(
            err,
            Error::CompactedArrayOutOfBounds {
                index: 8,
                slot_index: 1,
                len: 1,
                label: "price",
            }
        );
        let err = unpack(&[], 0, &Layout::TIMESTAMP).unwrap_err();
        assert!(matches!(
            err,
            Error::CompactedArrayOutOfBounds {
                label: "timestamp",
                ..
            }
        ));
    }

    #[test]
    fn test_value_too_large() {
        let err = pack(&[1 << 32], &Layout::PRICE).unwrap_err();
        assert_eq!(
            err,
            Error::ValueTooLarge {
                value: 1 << 32,
                bit_length: 32
            }
        );
        assert!(pack(&[u128::from(u32::MAX)], &Layout::PRICE).is_ok());
    }

    #[test]
    fn test_custom_layout() -> Result<()> {
        assert!(Layout::new(0, 1, "zero").is_err());
        assert!(Layout::new(64, 5, "overflow").is_err());
        assert!(Layout::new(129, 1, "wide").is_err());

        let layout = Layout::new(128, 2, "wide")?;
        assert_eq!(layout.max_value(), u128::MAX);
        let words = pack(&[u128::MAX, 7], &layout)?;
        assert_eq!(unpack(&words, 0, &layout)?, u128::MAX);
        assert_eq!(unpack(&words, 1, &layout)?, 7);

        let layout = Layout::new(16, 3, "sparse")?;
        let words = pack(&[1, 2, 3, 4], &layout)?;
        assert_eq!(words.len(), 2);
        assert_eq!(unpack(&words, 3, &layout)?, 4);
        Ok(())
    }
}
