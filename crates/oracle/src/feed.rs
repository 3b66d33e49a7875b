use std::collections::HashMap;

use alloy_primitives::Address;

use crate::{
    chain::Chain,
    config::{TokenFeedConfig, FLOAT_PRECISION},
    price::{Price, PriceSource, ValidatedPrice},
    utils::mul_div,
    OracleError, OracleResult,
};

/// Latest round of a push-style price feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceFeedRound {
    /// Answer in feed units.
    pub answer: i128,
    /// Unix timestamp of the answer.
    pub updated_at: u64,
}

/// Access to push-style price feeds by address.
pub trait PriceFeedProvider {
    /// Latest round of `feed`, `None` if the feed does not exist.
    fn latest_round(&self, feed: &Address) -> Option<PriceFeedRound>;
}

/// Price feeds kept in memory.
#[derive(Debug, Default, Clone)]
pub struct InMemoryPriceFeeds {
    rounds: HashMap<Address, PriceFeedRound>,
}

impl InMemoryPriceFeeds {
    /// Set the latest answer of `feed`.
    pub fn set_answer(&mut self, feed: Address, answer: i128, updated_at: u64) {
        self.rounds.insert(feed, PriceFeedRound { answer, updated_at });
    }

    /// Remove `feed`.
    pub fn remove(&mut self, feed: &Address) -> Option<PriceFeedRound> {
        self.rounds.remove(feed)
    }
}

impl PriceFeedProvider for InMemoryPriceFeeds {
    fn latest_round(&self, feed: &Address) -> Option<PriceFeedRound> {
        self.rounds.get(feed).copied()
    }
}

/// Price of `token` from its configured price feed.
///
/// Returns `None` if no feed is configured or the feed is unavailable
/// (a non-positive answer or a zero scaled price).
pub(crate) fn price_feed_price(
    token: &Address,
    config: &TokenFeedConfig,
    provider: Option<&dyn PriceFeedProvider>,
    chain: &dyn Chain,
) -> OracleResult<Option<ValidatedPrice>> {
    let Some(feed) = config.price_feed else {
        return Ok(None);
    };
    let round = provider
        .and_then(|provider| provider.latest_round(&feed))
        .ok_or(OracleError::PriceFeedNotFound(*token, feed))?;

    if round.answer <= 0 {
        tracing::warn!(%token, %feed, answer = round.answer, "price feed unavailable");
        return Ok(None);
    }

    let now = chain.timestamp();
    let heartbeat = config.price_feed_heartbeat_duration;
    if now > round.updated_at && now - round.updated_at > heartbeat {
        return Err(OracleError::PriceFeedNotUpdated(
            *token,
            round.updated_at,
            heartbeat,
        ));
    }

    let price = mul_div(
        round.answer.unsigned_abs(),
        config.price_feed_multiplier,
        FLOAT_PRECISION,
    )
    .ok_or(OracleError::PriceOverflow(*token))?;
    if price == 0 {
        tracing::warn!(%token, %feed, "price feed multiplier yields a zero price");
        return Ok(None);
    }

    let block_number = chain.block_number();
    Ok(Some(ValidatedPrice {
        token: *token,
        price: Price {
            min: price,
            max: price,
        },
        timestamp: round.updated_at,
        min_block_number: block_number,
        max_block_number: block_number,
        source: PriceSource::PriceFeed,
    }))
}
