#![deny(missing_docs)]
#![deny(unreachable_pub)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Bit-packed encoding of oracle batches.
//!
//! Block numbers, timestamps, decimals, prices and price indexes are packed
//! into 256-bit words, least significant field first.

/// Compacted arrays.
pub mod compacted;

/// Signer info bitfield.
pub mod signer_info;

/// Error type.
pub mod error;

pub use self::{
    compacted::{pack, unpack, CompactedArray, Layout},
    error::Error,
};

/// 256-bit word.
pub use ruint::aliases::U256;

/// Result type.
pub type Result<T> = std::result::Result<T, Error>;
