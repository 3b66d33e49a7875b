use alloy_primitives::Address;

use crate::config::FeedId;

/// Oracle Error.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OracleError {
    /// Codec error.
    #[error(transparent)]
    Codec(#[from] gmx_oracle_codec::Error),
    /// The caller does not hold the required role.
    #[error("unauthorized: {0} does not hold `{1}`")]
    Unauthorized(Address, &'static str),
    /// Duplicated index.
    #[error("duplicated index {0} in `{1}`")]
    DuplicatedIndex(u64, &'static str),
    /// Signer index is not in the roster.
    #[error("signer index {0} is out of bounds, roster size = {1}")]
    SignerIndexOutOfBounds(u64, usize),
    /// Too many signers.
    #[error("too many oracle signers: {0} > {1}")]
    MaxOracleSigners(usize, usize),
    /// Not enough signers.
    #[error("not enough oracle signers: {0} < {1}")]
    MinOracleSigners(usize, u64),
    /// The price store already holds prices.
    #[error("price store is not empty: {0} tokens with prices")]
    NonEmptyTokensWithPrices(usize),
    /// Expected price is zero.
    #[error("empty compacted price at {0}")]
    EmptyCompactedPrice(usize),
    /// Expected block number is zero.
    #[error("empty compacted block number at {0}")]
    EmptyCompactedBlockNumber(usize),
    /// Expected timestamp is zero.
    #[error("empty compacted timestamp at {0}")]
    EmptyCompactedTimestamp(usize),
    /// Min block number is greater than the max block number.
    #[error("invalid block range: min = {0}, max = {1}")]
    InvalidMinMaxBlockNumber(u64, u64),
    /// Price index does not refer to a signer of the batch.
    #[error("invalid price index {0} for {1} signers")]
    InvalidPriceIndex(u64, usize),
    /// Min prices are not sorted.
    #[error("min prices of {0} are not sorted: {1} < {2}")]
    MinPricesNotSorted(Address, u128, u128),
    /// Max prices are not sorted.
    #[error("max prices of {0} are not sorted: {1} < {2}")]
    MaxPricesNotSorted(Address, u128, u128),
    /// A signer submitted a min price above its max price.
    #[error("invalid signer prices of {0}: min = {1}, max = {2}")]
    InvalidSignerMinMaxPrice(Address, u128, u128),
    /// Signature not provided.
    #[error("missing signature at {0}")]
    MissingSignature(usize),
    /// Signature has the wrong length.
    #[error("invalid signature length: {0}")]
    InvalidSignatureLength(usize),
    /// Signature verification failed.
    #[error("invalid signature")]
    InvalidSignature,
    /// Block number too recent.
    #[error("invalid block number: {0} > {1}")]
    InvalidBlockNumber(u64, u64),
    /// Price is too old.
    #[error("max price age exceeded: timestamp = {0}, now = {1}")]
    MaxPriceAgeExceeded(u64, u64),
    /// Token must be priced by its realtime feed.
    #[error("{0} has realtime feed id {}", hex::encode(.1))]
    HasRealtimeFeedId(Address, FeedId),
    /// No signer prices for the token.
    #[error("invalid oracle price for {0}")]
    InvalidOraclePrice(Address),
    /// Median min price is greater than the median max price.
    #[error("invalid median prices of {0}: min = {1}, max = {2}")]
    InvalidMedianMinMaxPrice(Address, u128, u128),
    /// Price overflow.
    #[error("price overflow for {0}")]
    PriceOverflow(Address),
    /// Price has already been set.
    #[error("price of {0} is already set: min = {1}, max = {2}")]
    PriceAlreadySet(Address, u128, u128),
    /// Price not found in the store.
    #[error("missing oracle price for {0}")]
    MissingOraclePrice(Address),
    /// No price available for a feed-only token.
    #[error("empty price feed for {0}")]
    EmptyPriceFeed(Address),
    /// Price feed is configured but not provided.
    #[error("price feed {1} of {0} not found")]
    PriceFeedNotFound(Address, Address),
    /// Price feed answer is stale.
    #[error("price feed of {0} not updated: updated at {1}, heartbeat = {2}")]
    PriceFeedNotUpdated(Address, u64, u64),
    /// Price deviates too much from the reference price.
    #[error("max ref price deviation exceeded for {token}: price = {price}, ref price = {ref_price}, max factor = {max_factor}")]
    MaxRefPriceDeviationExceeded {
        /// Token.
        token: Address,
        /// Price.
        price: u128,
        /// Reference price.
        ref_price: u128,
        /// Max deviation factor.
        max_factor: u128,
    },
    /// Realtime feed tokens and data do not match.
    #[error("realtime feed lengths mismatched: {0} tokens, {1} reports")]
    InvalidRealtimeFeedLengths(usize, usize),
    /// Realtime feed verifier not provided.
    #[error("realtime feed verifier is not provided")]
    RealtimeFeedVerifierNotProvided,
    /// Realtime report could not be decoded or verified.
    #[error("invalid realtime report: {0}")]
    InvalidRealtimeReport(&'static str),
    /// No realtime feed id is configured for the token.
    #[error("empty realtime feed id for {0}")]
    EmptyRealtimeFeedId(Address),
    /// Realtime report is for another feed.
    #[error("invalid realtime feed id for {0}: {} != {}", hex::encode(.1), hex::encode(.2))]
    InvalidRealtimeFeedId(Address, FeedId, FeedId),
    /// Realtime report block hash mismatched.
    #[error("invalid realtime block hash for {0} at block {1}")]
    InvalidRealtimeBlockHash(Address, u64),
    /// Realtime report bid is above its ask.
    #[error("invalid realtime prices for {0}: bid = {1}, ask = {2}")]
    InvalidRealtimePrices(Address, i128, i128),
    /// Signer is already in the roster.
    #[error("signer {0} already exists")]
    SignerAlreadyExists(Address),
    /// Signer is not in the roster.
    #[error("signer {0} not found")]
    SignerNotFound(Address),
    /// Signer roster is full.
    #[error("signer roster is full: max = {0}")]
    SignerRosterFull(usize),
    /// Invalid signing key.
    #[error("invalid signing key")]
    InvalidSigningKey,
}

/// Result type for oracle operations.
pub type OracleResult<T> = std::result::Result<T, OracleError>;
