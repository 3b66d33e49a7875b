#![deny(missing_docs)]
#![deny(unreachable_pub)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Price oracle of a GMX-style perpetual exchange.
//!
//! Signers attest to per-token price observations off-chain. A keeper
//! submits them in a bit-packed batch, the [`Oracle`] verifies the signatures,
//! aggregates the prices by median, cross-checks them against the secondary
//! feeds and records them for the duration of one transaction.

/// Chain state.
pub mod chain;

/// Configuration.
pub mod config;

/// Data store keys.
pub mod keys;

/// Oracle environment.
pub mod env;

/// Error type.
pub mod error;

/// Events.
pub mod events;

/// Push-style price feeds.
pub mod feed;

/// Realtime feeds.
pub mod realtime;

/// Price.
pub mod price;

/// Batch parameters.
pub mod params;

/// Roles.
pub mod roles;

/// Signers and signatures.
pub mod signer;

/// Price store.
pub mod store;

/// Oracle.
pub mod oracle;

mod abi;
mod fallback;
mod utils;
mod validator;


pub use self::{
    chain::Chain,
    config::{DataStore, InMemoryDataStore, OracleConfig, OracleType, TokenFeedConfig},
    env::OracleEnv,
    error::{OracleError, OracleResult},
    events::{EventEmitter, EventLog, OracleEvent},
    feed::{InMemoryPriceFeeds, PriceFeedProvider, PriceFeedRound},
    oracle::Oracle,
    params::SetPricesParams,
    price::{Price, PriceSource, ValidatedPrice},
    realtime::{RealtimeFeedReport, RealtimeFeedVerifier},
    roles::{Controller, InMemoryRoleStore, RoleKey, RoleStore},
    signer::{PriceMessage, PriceSigner, Salt, SignerSet},
    store::PriceStore,
};

pub use alloy_primitives::Address;
pub use gmx_oracle_codec as codec;
