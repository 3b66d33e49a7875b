use alloy_primitives::Address;
use gmx_oracle_codec::U256;

/// A batch of prices submitted by a keeper.
///
/// For token `i` and signer `j` of `n` signers, the per-signer entries
/// (prices, price indexes and signatures) live at `i * n + j`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetPricesParams {
    /// Participating signers, see [`signer_info`](gmx_oracle_codec::signer_info).
    pub signer_info: U256,
    /// Tokens priced by the signers.
    pub tokens: Vec<Address>,
    /// Min block number of each token.
    pub compacted_min_oracle_block_numbers: Vec<U256>,
    /// Max block number of each token.
    pub compacted_max_oracle_block_numbers: Vec<U256>,
    /// Observation timestamp of each token.
    pub compacted_oracle_timestamps: Vec<U256>,
    /// Decimals of each token's prices.
    pub compacted_decimals: Vec<U256>,
    /// Sorted min prices.
    pub compacted_min_prices: Vec<U256>,
    /// For each sorted min price, the position of the signer that submitted it.
    pub compacted_min_prices_indexes: Vec<U256>,
    /// Sorted max prices.
    pub compacted_max_prices: Vec<U256>,
    /// For each sorted max price, the position of the signer that submitted it.
    pub compacted_max_prices_indexes: Vec<U256>,
    /// `r || s || v` signatures.
    pub signatures: Vec<Vec<u8>>,
    /// Tokens priced by their price feed.
    pub price_feed_tokens: Vec<Address>,
    /// Tokens priced by a realtime feed report.
    pub realtime_feed_tokens: Vec<Address>,
    /// Realtime feed reports, one per realtime feed token.
    pub realtime_feed_data: Vec<Vec<u8>>,
}
