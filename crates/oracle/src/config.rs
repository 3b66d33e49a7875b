use std::collections::HashMap;

use alloy_primitives::Address;

use crate::{
    abi,
    keys::{self, Key},
};

/// Realtime feed id.
pub type FeedId = [u8; 32];

/// Fixed-point precision of factors and feed multipliers.
pub const FLOAT_PRECISION: u128 = 10u128.pow(30);

/// Read-only key-value store holding the oracle configuration.
///
/// Unset keys read as zero.
pub trait DataStore {
    /// Get an unsigned integer.
    fn get_uint(&self, key: &Key) -> u128;

    /// Get a flag.
    fn get_bool(&self, key: &Key) -> bool;

    /// Get a 32-byte value.
    fn get_bytes32(&self, key: &Key) -> [u8; 32];

    /// Get an address.
    fn get_address(&self, key: &Key) -> Address;
}

/// Data store kept in memory.
#[derive(Debug, Default, Clone)]
pub struct InMemoryDataStore {
    uints: HashMap<Key, u128>,
    bools: HashMap<Key, bool>,
    bytes32s: HashMap<Key, [u8; 32]>,
    addresses: HashMap<Key, Address>,
}

impl InMemoryDataStore {
    /// Set an unsigned integer, returning the previous value.
    pub fn set_uint(&mut self, key: Key, value: u128) -> Option<u128> {
        self.uints.insert(key, value)
    }

    /// Set a flag, returning the previous value.
    pub fn set_bool(&mut self, key: Key, value: bool) -> Option<bool> {
        self.bools.insert(key, value)
    }

    /// Set a 32-byte value, returning the previous value.
    pub fn set_bytes32(&mut self, key: Key, value: [u8; 32]) -> Option<[u8; 32]> {
        self.bytes32s.insert(key, value)
    }

    /// Set an address, returning the previous value.
    pub fn set_address(&mut self, key: Key, value: Address) -> Option<Address> {
        self.addresses.insert(key, value)
    }
}

impl DataStore for InMemoryDataStore {
    fn get_uint(&self, key: &Key) -> u128 {
        self.uints.get(key).copied().unwrap_or_default()
    }

    fn get_bool(&self, key: &Key) -> bool {
        self.bools.get(key).copied().unwrap_or_default()
    }

    fn get_bytes32(&self, key: &Key) -> [u8; 32] {
        self.bytes32s.get(key).copied().unwrap_or_default()
    }

    fn get_address(&self, key: &Key) -> Address {
        self.addresses.get(key).copied().unwrap_or_default()
    }
}

/// Oracle type tag, part of the signed message.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct OracleType([u8; 32]);

impl OracleType {
    /// Name of the default oracle type.
    pub const DEFAULT_NAME: &'static str = "one-percent-per-minute";

    /// Oracle type of the given name.
    pub fn from_name(name: &str) -> Self {
        Self(abi::hash_string(name))
    }

    /// Get the bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for OracleType {
    fn from(value: [u8; 32]) -> Self {
        Self(value)
    }
}

impl Default for OracleType {
    fn default() -> Self {
        Self::from_name(Self::DEFAULT_NAME)
    }
}

impl std::fmt::Debug for OracleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OracleType(0x{})", hex::encode(self.0))
    }
}

/// Global oracle config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OracleConfig {
    /// Min number of signers per batch.
    pub min_oracle_signers: u64,
    /// Reject signer prices for tokens with a realtime feed.
    pub in_strict_price_feed_mode: bool,
    /// Max deviation from the reference price, in [`FLOAT_PRECISION`].
    pub max_ref_price_deviation_factor: u128,
    /// Max age of a price in seconds; unchecked if `None`.
    pub max_price_age: Option<u64>,
}

impl OracleConfig {
    /// Load from the data store.
    pub fn load<S: DataStore + ?Sized>(store: &S) -> Self {
        let max_price_age = store.get_uint(&keys::max_oracle_price_age_key());
        Self {
            min_oracle_signers: saturating_u64(store.get_uint(&keys::min_oracle_signers_key())),
            in_strict_price_feed_mode: store.get_bool(&keys::in_strict_price_feed_mode_key()),
            max_ref_price_deviation_factor: store
                .get_uint(&keys::max_oracle_ref_price_deviation_factor_key()),
            max_price_age: (max_price_age != 0).then(|| saturating_u64(max_price_age)),
        }
    }
}

/// Feed config of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenFeedConfig {
    /// Oracle type.
    pub oracle_type: OracleType,
    /// Price feed address.
    pub price_feed: Option<Address>,
    /// Price feed multiplier, in [`FLOAT_PRECISION`].
    pub price_feed_multiplier: u128,
    /// Price feed heartbeat duration in seconds.
    pub price_feed_heartbeat_duration: u64,
    /// Realtime feed id.
    pub realtime_feed_id: Option<FeedId>,
    /// Realtime feed multiplier, in [`FLOAT_PRECISION`].
    pub realtime_feed_multiplier: u128,
}

impl TokenFeedConfig {
    /// Load the config of `token` from the data store.
    pub fn load<S: DataStore + ?Sized>(store: &S, token: &Address) -> Self {
        let oracle_type = store.get_bytes32(&keys::oracle_type_key(token));
        let price_feed = store.get_address(&keys::price_feed_key(token));
        let realtime_feed_id = store.get_bytes32(&keys::realtime_feed_id_key(token));
        Self {
            oracle_type: if oracle_type == [0; 32] {
                OracleType::default()
            } else {
                OracleType(oracle_type)
            },
            price_feed: (!price_feed.is_zero()).then_some(price_feed),
            price_feed_multiplier: store.get_uint(&keys::price_feed_multiplier_key(token)),
            price_feed_heartbeat_duration: saturating_u64(
                store.get_uint(&keys::price_feed_heartbeat_duration_key(token)),
            ),
            realtime_feed_id: (realtime_feed_id != [0; 32]).then_some(realtime_feed_id),
            realtime_feed_multiplier: store.get_uint(&keys::realtime_feed_multiplier_key(token)),
        }
    }
}

fn saturating_u64(value: u128) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

#[cfg(feature = "serde")]
pub use self::settings::{OracleSettings, SettingsError, TokenSettings};

#[cfg(feature = "serde")]
mod settings {
    use serde::{Deserialize, Serialize};

    use super::{FeedId, InMemoryDataStore, OracleType};
    use alloy_primitives::Address;

    use crate::keys;

    /// Settings Error.
    #[derive(Debug, thiserror::Error)]
    pub enum SettingsError {
        /// Toml error.
        #[error(transparent)]
        Toml(#[from] toml::de::Error),
        /// Invalid feed id.
        #[error("invalid feed id: {0}")]
        InvalidFeedId(String),
    }

    /// Oracle settings, the human-readable form of the oracle entries of a
    /// data store.
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    #[serde(default)]
    pub struct OracleSettings {
        /// Min number of signers.
        pub min_oracle_signers: u64,
        /// Strict price feed mode.
        pub in_strict_price_feed_mode: bool,
        /// Max deviation factor from the reference price.
        #[serde(with = "u128_str")]
        pub max_ref_price_deviation_factor: u128,
        /// Max price age in seconds.
        pub max_oracle_price_age: Option<u64>,
        /// Token settings.
        pub tokens: Vec<TokenSettings>,
    }

    /// Feed settings of a token.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct TokenSettings {
        /// Token.
        pub token: Address,
        /// Oracle type name.
        #[serde(default)]
        pub oracle_type: Option<String>,
        /// Price feed.
        #[serde(default)]
        pub price_feed: Option<Address>,
        /// Price feed multiplier.
        #[serde(default, with = "u128_str")]
        pub price_feed_multiplier: u128,
        /// Price feed heartbeat duration in seconds.
        #[serde(default)]
        pub price_feed_heartbeat_duration: u64,
        /// Realtime feed id, hex encoded.
        #[serde(default)]
        pub realtime_feed_id: Option<String>,
        /// Realtime feed multiplier.
        #[serde(default, with = "u128_str")]
        pub realtime_feed_multiplier: u128,
    }

    impl OracleSettings {
        /// Parse from TOML.
        pub fn from_toml(s: &str) -> Result<Self, SettingsError> {
            Ok(toml::from_str(s)?)
        }

        /// Write the settings into `store`.
        pub fn apply(&self, store: &mut InMemoryDataStore) -> Result<(), SettingsError> {
            store.set_uint(
                keys::min_oracle_signers_key(),
                self.min_oracle_signers.into(),
            );
            store.set_bool(
                keys::in_strict_price_feed_mode_key(),
                self.in_strict_price_feed_mode,
            );
            store.set_uint(
                keys::max_oracle_ref_price_deviation_factor_key(),
                self.max_ref_price_deviation_factor,
            );
            if let Some(age) = self.max_oracle_price_age {
                store.set_uint(keys::max_oracle_price_age_key(), age.into());
            }
            for token in &self.tokens {
                token.apply(store)?;
            }
            Ok(())
        }
    }

    impl TokenSettings {
        fn apply(&self, store: &mut InMemoryDataStore) -> Result<(), SettingsError> {
            let token = &self.token;
            if let Some(name) = &self.oracle_type {
                store.set_bytes32(
                    keys::oracle_type_key(token),
                    *OracleType::from_name(name).as_bytes(),
                );
            }
            if let Some(feed) = &self.price_feed {
                store.set_address(keys::price_feed_key(token), *feed);
                store.set_uint(
                    keys::price_feed_multiplier_key(token),
                    self.price_feed_multiplier,
                );
                store.set_uint(
                    keys::price_feed_heartbeat_duration_key(token),
                    self.price_feed_heartbeat_duration.into(),
                );
            }
            if let Some(feed_id) = &self.realtime_feed_id {
                store.set_bytes32(keys::realtime_feed_id_key(token), parse_feed_id(feed_id)?);
                store.set_uint(
                    keys::realtime_feed_multiplier_key(token),
                    self.realtime_feed_multiplier,
                );
            }
            Ok(())
        }
    }

    fn parse_feed_id(s: &str) -> Result<FeedId, SettingsError> {
        let bytes = hex::decode(s.strip_prefix("0x").unwrap_or(s))
            .map_err(|_| SettingsError::InvalidFeedId(s.to_owned()))?;
        bytes
            .try_into()
            .map_err(|_| SettingsError::InvalidFeedId(s.to_owned()))
    }

    /// `u128` as a decimal string or a TOML integer.
    mod u128_str {
        use serde::{Deserialize, Deserializer, Serializer};

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Int(u64),
            Str(String),
        }

        pub(super) fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_str(value)
        }

        pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
            match Repr::deserialize(deserializer)? {
                Repr::Int(value) => Ok(value.into()),
                Repr::Str(s) => s.parse().map_err(serde::de::Error::custom),
            }
        }
    }
}
