//! Data store keys.
//!
//! A global key is `keccak256(abi.encode(name))`; a per-token key is
//! `keccak256(abi.encode(keccak256(abi.encode(name)), token))`.

use std::fmt;

use alloy_primitives::Address;

use crate::abi;

/// Data store key.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key([u8; 32]);

impl Key {
    /// Global key.
    pub fn new(name: &str) -> Self {
        Self(abi::hash_string(name))
    }

    /// Per-token key.
    pub fn with_token(name: &str, token: &Address) -> Self {
        Self(abi::hash_with_address(abi::hash_string(name), token))
    }

    /// Get the bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key(0x{})", hex::encode(self.0))
    }
}

/// Min number of oracle signers.
pub const MIN_ORACLE_SIGNERS: &str = "MIN_ORACLE_SIGNERS";
/// Strict price feed mode.
pub const IN_STRICT_PRICE_FEED_MODE: &str = "IN_STRICT_PRICE_FEED_MODE";
/// Max deviation factor from the reference price.
pub const MAX_ORACLE_REF_PRICE_DEVIATION_FACTOR: &str = "MAX_ORACLE_REF_PRICE_DEVIATION_FACTOR";
/// Max price age in seconds.
pub const MAX_ORACLE_PRICE_AGE: &str = "MAX_ORACLE_PRICE_AGE";
/// Price feed address.
pub const PRICE_FEED: &str = "PRICE_FEED";
/// Price feed multiplier.
pub const PRICE_FEED_MULTIPLIER: &str = "PRICE_FEED_MULTIPLIER";
/// Price feed heartbeat duration.
pub const PRICE_FEED_HEARTBEAT_DURATION: &str = "PRICE_FEED_HEARTBEAT_DURATION";
/// Realtime feed id.
pub const REALTIME_FEED_ID: &str = "REALTIME_FEED_ID";
/// Realtime feed multiplier.
pub const REALTIME_FEED_MULTIPLIER: &str = "REALTIME_FEED_MULTIPLIER";
/// Oracle type.
pub const ORACLE_TYPE: &str = "ORACLE_TYPE";

/// Key of [`MIN_ORACLE_SIGNERS`].
pub fn min_oracle_signers_key() -> Key {
    Key::new(MIN_ORACLE_SIGNERS)
}

/// Key of [`IN_STRICT_PRICE_FEED_MODE`].
pub fn in_strict_price_feed_mode_key() -> Key {
    Key::new(IN_STRICT_PRICE_FEED_MODE)
}

/// Key of [`MAX_ORACLE_REF_PRICE_DEVIATION_FACTOR`].
pub fn max_oracle_ref_price_deviation_factor_key() -> Key {
    Key::new(MAX_ORACLE_REF_PRICE_DEVIATION_FACTOR)
}

/// Key of [`MAX_ORACLE_PRICE_AGE`].
pub fn max_oracle_price_age_key() -> Key {
    Key::new(MAX_ORACLE_PRICE_AGE)
}

/// Key of the [`PRICE_FEED`] of `token`.
pub fn price_feed_key(token: &Address) -> Key {
    Key::with_token(PRICE_FEED, token)
}

/// Key of the [`PRICE_FEED_MULTIPLIER`] of `token`.
pub fn price_feed_multiplier_key(token: &Address) -> Key {
    Key::with_token(PRICE_FEED_MULTIPLIER, token)
}

/// Key of the [`PRICE_FEED_HEARTBEAT_DURATION`] of `token`.
pub fn price_feed_heartbeat_duration_key(token: &Address) -> Key {
    Key::with_token(PRICE_FEED_HEARTBEAT_DURATION, token)
}

/// Key of the [`REALTIME_FEED_ID`] of `token`.
pub fn realtime_feed_id_key(token: &Address) -> Key {
    Key::with_token(REALTIME_FEED_ID, token)
}

/// Key of the [`REALTIME_FEED_MULTIPLIER`] of `token`.
pub fn realtime_feed_multiplier_key(token: &Address) -> Key {
    Key::with_token(REALTIME_FEED_MULTIPLIER, token)
}

/// Key of the [`ORACLE_TYPE`] of `token`.
pub fn oracle_type_key(token: &Address) -> Key {
    Key::with_token(ORACLE_TYPE, token)
}
