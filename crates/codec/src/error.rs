/// Codec Error.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// The word holding the requested index is missing.
    #[error("compacted array out of bounds: index = {index}, slot = {slot_index}, words = {len}, label = {label}")]
    CompactedArrayOutOfBounds {
        /// Requested index.
        index: usize,
        /// Index of the word that should hold the value.
        slot_index: usize,
        /// Number of words supplied.
        len: usize,
        /// Label of the array.
        label: &'static str,
    },
    /// Value does not fit in the field.
    #[error("value {value} does not fit in {bit_length} bits")]
    ValueTooLarge {
        /// The value.
        value: u128,
        /// Field width.
        bit_length: usize,
    },
    /// Invalid layout.
    #[error("invalid layout: {bit_length} bits x {values_per_word} values")]
    InvalidLayout {
        /// Field width.
        bit_length: usize,
        /// Fields per word.
        values_per_word: usize,
    },
    /// Too many signers for the signer info bitfield.
    #[error("too many signers: {0}")]
    TooManySigners(usize),
}
