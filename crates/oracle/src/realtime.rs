use alloy_primitives::Address;

use crate::{
    chain::Chain,
    config::{FeedId, TokenFeedConfig, FLOAT_PRECISION},
    price::{Price, PriceSource, ValidatedPrice},
    utils::mul_div,
    OracleError, OracleResult,
};

type Word = [u8; 32];

const WORD_LEN: usize = 32;

/// A realtime feed report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealtimeFeedReport {
    /// Feed id.
    pub feed_id: FeedId,
    /// Timestamp of the observations.
    pub observations_timestamp: u64,
    /// Median price.
    pub median: i128,
    /// Bid price.
    pub bid: i128,
    /// Ask price.
    pub ask: i128,
    /// Upper bound of the block range.
    pub block_number_upper_bound: u64,
    /// Hash of the upper bound block.
    pub upper_block_hash: [u8; 32],
    /// Lower bound of the block range.
    pub block_number_lower_bound: u64,
    /// Timestamp of the upper bound block.
    pub current_block_timestamp: u64,
}

impl RealtimeFeedReport {
    /// Length of an encoded report.
    pub const ENCODED_LEN: usize = 9 * WORD_LEN;

    /// Decode a report from its ABI encoding.
    pub fn decode(data: &[u8]) -> OracleResult<Self> {
        if data.len() != Self::ENCODED_LEN {
            return Err(OracleError::InvalidRealtimeReport("invalid length"));
        }
        let word = |index: usize| peek_32_bytes(data, index * WORD_LEN);
        Ok(Self {
            feed_id: word(0)?,
            observations_timestamp: as_u64(&word(1)?)?,
            median: as_i128(&word(2)?)?,
            bid: as_i128(&word(3)?)?,
            ask: as_i128(&word(4)?)?,
            block_number_upper_bound: as_u64(&word(5)?)?,
            upper_block_hash: word(6)?,
            block_number_lower_bound: as_u64(&word(7)?)?,
            current_block_timestamp: as_u64(&word(8)?)?,
        })
    }

    /// ABI-encode the report.
    pub fn encode(&self) -> Vec<u8> {
        let words = [
            self.feed_id,
            u64_word(self.observations_timestamp),
            i128_word(self.median),
            i128_word(self.bid),
            i128_word(self.ask),
            u64_word(self.block_number_upper_bound),
            self.upper_block_hash,
            u64_word(self.block_number_lower_bound),
            u64_word(self.current_block_timestamp),
        ];
        words.concat()
    }
}

/// Verifies realtime feed data and extracts its report.
pub trait RealtimeFeedVerifier {
    /// Verify `data`.
    fn verify(&self, data: &[u8]) -> OracleResult<RealtimeFeedReport>;
}

/// Price of `token` from a verified report.
///
/// Returns `None` if the report carries a non-positive bid or ask, or the
/// scaled prices are zero.
pub(crate) fn realtime_feed_price(
    token: &Address,
    config: &TokenFeedConfig,
    report: &RealtimeFeedReport,
    chain: &dyn Chain,
) -> OracleResult<Option<ValidatedPrice>> {
    let expected = config
        .realtime_feed_id
        .ok_or(OracleError::EmptyRealtimeFeedId(*token))?;
    if report.feed_id != expected {
        return Err(OracleError::InvalidRealtimeFeedId(
            *token,
            report.feed_id,
            expected,
        ));
    }

    let lower = report.block_number_lower_bound;
    let upper = report.block_number_upper_bound;
    if lower > upper {
        return Err(OracleError::InvalidMinMaxBlockNumber(lower, upper));
    }
    let current = chain.block_number();
    if upper >= current {
        return Err(OracleError::InvalidBlockNumber(upper, current));
    }
    if chain.block_hash(upper) != Some(report.upper_block_hash) {
        return Err(OracleError::InvalidRealtimeBlockHash(*token, upper));
    }

    if report.bid <= 0 || report.ask <= 0 {
        tracing::warn!(%token, bid = report.bid, ask = report.ask, "realtime feed unavailable");
        return Ok(None);
    }
    if report.bid > report.ask {
        return Err(OracleError::InvalidRealtimePrices(
            *token, report.bid, report.ask,
        ));
    }

    let scale = |value: i128| {
        mul_div(
            value.unsigned_abs(),
            config.realtime_feed_multiplier,
            FLOAT_PRECISION,
        )
        .ok_or(OracleError::PriceOverflow(*token))
    };
    let price = Price {
        min: scale(report.bid)?,
        max: scale(report.ask)?,
    };
    if price.min == 0 {
        tracing::warn!(%token, "realtime feed multiplier yields a zero price");
        return Ok(None);
    }

    Ok(Some(ValidatedPrice {
        token: *token,
        price,
        timestamp: report.observations_timestamp,
        min_block_number: lower,
        max_block_number: upper,
        source: PriceSource::RealtimeFeed,
    }))
}

fn peek_32_bytes(data: &[u8], offset: usize) -> OracleResult<Word> {
    data.get(offset..(offset + WORD_LEN))
        .and_then(|slice| slice.try_into().ok())
        .ok_or(OracleError::InvalidRealtimeReport("truncated data"))
}

fn as_u64(word: &Word) -> OracleResult<u64> {
    if !word[..24].iter().all(|b| *b == 0) {
        return Err(OracleError::InvalidRealtimeReport("integer out of range"));
    }
    let mut bytes = [0; 8];
    bytes.copy_from_slice(&word[24..]);
    Ok(u64::from_be_bytes(bytes))
}

fn as_i128(word: &Word) -> OracleResult<i128> {
    let mut bytes = [0; 16];
    bytes.copy_from_slice(&word[16..]);
    let value = i128::from_be_bytes(bytes);
    let extension = if value < 0 { 0xff } else { 0 };
    if !word[..16].iter().all(|b| *b == extension) {
        return Err(OracleError::InvalidRealtimeReport("integer out of range"));
    }
    Ok(value)
}

fn u64_word(value: u64) -> Word {
    let mut word = [0; WORD_LEN];
    word[24..].copy_from_slice(&value.to_be_bytes());
    word
}

fn i128_word(value: i128) -> Word {
    let mut word = if value < 0 { [0xff; WORD_LEN] } else { [0; WORD_LEN] };
    word[16..].copy_from_slice(&value.to_be_bytes());
    word
}
