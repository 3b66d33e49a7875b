use alloy_primitives::Address;
use bitmaps::Bitmap;
use gmx_oracle_codec::{signer_info::MAX_SIGNERS, CompactedArray, Layout, U256};

use crate::{
    config::{OracleConfig, TokenFeedConfig},
    env::OracleEnv,
    fallback::reconcile,
    feed::price_feed_price,
    params::SetPricesParams,
    price::{self, Price, PriceSource, ValidatedPrice},
    realtime::realtime_feed_price,
    signer::{verify_signer, PriceMessage, Salt, SignerSet},
    store::PriceStore,
    OracleError, OracleResult,
};

/// Price Validator.
///
/// Validates a batch against the configuration loaded at creation.
pub(crate) struct PriceValidator<'a> {
    env: &'a OracleEnv<'a>,
    salt: &'a Salt,
    config: OracleConfig,
}

impl<'a> PriceValidator<'a> {
    pub(crate) fn new(env: &'a OracleEnv<'a>, salt: &'a Salt) -> Self {
        Self {
            env,
            salt,
            config: OracleConfig::load(env.data_store()),
        }
    }

    /// Resolve the participating signers and check the quorum.
    pub(crate) fn signers(&self, roster: &SignerSet, info: &U256) -> OracleResult<Vec<Address>> {
        let signers = roster.resolve(info)?;
        let required = self.config.min_oracle_signers;
        if (signers.len() as u64) < required {
            return Err(OracleError::MinOracleSigners(signers.len(), required));
        }
        Ok(signers)
    }

    /// Validate every token of the batch into a staged store.
    pub(crate) fn validate(
        &self,
        signers: &[Address],
        params: &SetPricesParams,
    ) -> OracleResult<PriceStore> {
        let mut prices = PriceStore::default();
        let max_factor = self.config.max_ref_price_deviation_factor;

        for (index, token) in params.tokens.iter().enumerate() {
            let feed_config = TokenFeedConfig::load(self.env.data_store(), token);
            let price = self.validate_signed(index, token, &feed_config, signers, params)?;
            let ref_price = self.price_feed_price(token, &feed_config)?;
            let price = reconcile(token, Some(price), ref_price, max_factor)?;
            tracing::debug!(%token, min = price.price.min, max = price.price.max, "validated signer price");
            prices.insert(price)?;
        }

        for token in &params.price_feed_tokens {
            let feed_config = TokenFeedConfig::load(self.env.data_store(), token);
            let price = self.price_feed_price(token, &feed_config)?;
            prices.insert(reconcile(token, None, price, max_factor)?)?;
        }

        self.validate_realtime_feeds(params, &mut prices)?;
        Ok(prices)
    }

    fn validate_signed(
        &self,
        index: usize,
        token: &Address,
        feed_config: &TokenFeedConfig,
        signers: &[Address],
        params: &SetPricesParams,
    ) -> OracleResult<ValidatedPrice> {
        let count = signers.len();

        let min_block_number = non_zero(
            CompactedArray::new(&params.compacted_min_oracle_block_numbers, Layout::BLOCK_NUMBER)
                .get_u64(index)?,
            OracleError::EmptyCompactedBlockNumber(index),
        )?;
        let max_block_number = non_zero(
            CompactedArray::new(&params.compacted_max_oracle_block_numbers, Layout::BLOCK_NUMBER)
                .get_u64(index)?,
            OracleError::EmptyCompactedBlockNumber(index),
        )?;
        let timestamp = non_zero(
            CompactedArray::new(&params.compacted_oracle_timestamps, Layout::TIMESTAMP)
                .get_u64(index)?,
            OracleError::EmptyCompactedTimestamp(index),
        )?;
        if min_block_number > max_block_number {
            return Err(OracleError::InvalidMinMaxBlockNumber(
                min_block_number,
                max_block_number,
            ));
        }

        let min_prices = sorted_prices(&params.compacted_min_prices, index, count)?;
        let max_prices = sorted_prices(&params.compacted_max_prices, index, count)?;
        if let Some((current, previous)) = first_inversion(&min_prices) {
            return Err(OracleError::MinPricesNotSorted(*token, current, previous));
        }
        if let Some((current, previous)) = first_inversion(&max_prices) {
            return Err(OracleError::MaxPricesNotSorted(*token, current, previous));
        }

        let min_by_signer = by_signer(
            &min_prices,
            &params.compacted_min_prices_indexes,
            index,
            "minPriceIndex",
        )?;
        let max_by_signer = by_signer(
            &max_prices,
            &params.compacted_max_prices_indexes,
            index,
            "maxPriceIndex",
        )?;
        for (min, max) in min_by_signer.iter().zip(&max_by_signer) {
            if min > max {
                return Err(OracleError::InvalidSignerMinMaxPrice(*token, *min, *max));
            }
        }

        let mut precision = 1;
        if count != 0 {
            let decimals = CompactedArray::new(&params.compacted_decimals, Layout::DECIMAL).get(index)?;
            precision = u8::try_from(decimals)
                .ok()
                .and_then(price::precision)
                .ok_or(OracleError::PriceOverflow(*token))?;
            let message = PriceMessage {
                min_block_number,
                max_block_number,
                timestamp,
                block_hash: self
                    .env
                    .chain()
                    .block_hash(max_block_number)
                    .unwrap_or_default(),
                token: *token,
                oracle_type: feed_config.oracle_type,
                precision,
                min_prices: &min_prices,
                max_prices: &max_prices,
            };
            let hash = message.signing_hash(self.salt);
            for (position, signer) in signers.iter().enumerate() {
                let flat = index * count + position;
                let signature = params
                    .signatures
                    .get(flat)
                    .ok_or(OracleError::MissingSignature(flat))?;
                verify_signer(&hash, signature, signer)?;
            }
        }

        self.validate_block_number(max_block_number)?;
        self.validate_price_age(timestamp)?;

        if self.config.in_strict_price_feed_mode {
            if let Some(feed_id) = feed_config.realtime_feed_id {
                return Err(OracleError::HasRealtimeFeedId(*token, feed_id));
            }
        }

        let (Some(min), Some(max)) = (price::median(&min_prices), price::median(&max_prices))
        else {
            return Err(OracleError::InvalidOraclePrice(*token));
        };
        if min > max {
            return Err(OracleError::InvalidMedianMinMaxPrice(*token, min, max));
        }
        let scale = |value: u128| {
            value
                .checked_mul(precision)
                .ok_or(OracleError::PriceOverflow(*token))
        };

        Ok(ValidatedPrice {
            token: *token,
            price: Price {
                min: scale(min)?,
                max: scale(max)?,
            },
            timestamp,
            min_block_number,
            max_block_number,
            source: PriceSource::Signers,
        })
    }

    fn price_feed_price(
        &self,
        token: &Address,
        feed_config: &TokenFeedConfig,
    ) -> OracleResult<Option<ValidatedPrice>> {
        price_feed_price(token, feed_config, self.env.price_feeds(), self.env.chain())
    }

    fn validate_realtime_feeds(
        &self,
        params: &SetPricesParams,
        prices: &mut PriceStore,
    ) -> OracleResult<()> {
        let tokens = &params.realtime_feed_tokens;
        let data = &params.realtime_feed_data;
        if tokens.len() != data.len() {
            return Err(OracleError::InvalidRealtimeFeedLengths(
                tokens.len(),
                data.len(),
            ));
        }
        if tokens.is_empty() {
            return Ok(());
        }
        let verifier = self
            .env
            .realtime_verifier()
            .ok_or(OracleError::RealtimeFeedVerifierNotProvided)?;

        for (token, data) in tokens.iter().zip(data) {
            let feed_config = TokenFeedConfig::load(self.env.data_store(), token);
            let report = verifier.verify(data)?;
            let price = realtime_feed_price(token, &feed_config, &report, self.env.chain())?;
            if let Some(price) = &price {
                self.validate_price_age(price.timestamp)?;
            }
            let price = reconcile(
                token,
                None,
                price,
                self.config.max_ref_price_deviation_factor,
            )?;
            prices.insert(price)?;
        }
        Ok(())
    }

    fn validate_block_number(&self, max_block_number: u64) -> OracleResult<()> {
        let current = self.env.chain().block_number();
        if max_block_number >= current {
            return Err(OracleError::InvalidBlockNumber(max_block_number, current));
        }
        Ok(())
    }

    fn validate_price_age(&self, timestamp: u64) -> OracleResult<()> {
        let Some(max_age) = self.config.max_price_age else {
            return Ok(());
        };
        let now = self.env.chain().timestamp();
        if timestamp.saturating_add(max_age) < now {
            return Err(OracleError::MaxPriceAgeExceeded(timestamp, now));
        }
        Ok(())
    }
}

fn non_zero(value: u64, err: OracleError) -> OracleResult<u64> {
    if value == 0 {
        Err(err)
    } else {
        Ok(value)
    }
}

/// Prices of the token at `index`, as submitted (sorted if valid).
fn sorted_prices(words: &[U256], index: usize, count: usize) -> OracleResult<Vec<u128>> {
    let prices = CompactedArray::new(words, Layout::PRICE);
    (0..count)
        .map(|position| {
            let flat = index * count + position;
            match prices.get(flat)? {
                0 => Err(OracleError::EmptyCompactedPrice(flat)),
                price => Ok(price),
            }
        })
        .collect()
}

/// Returns `(current, previous)` of the first decreasing pair.
fn first_inversion(prices: &[u128]) -> Option<(u128, u128)> {
    prices
        .windows(2)
        .find(|pair| pair[1] < pair[0])
        .map(|pair| (pair[1], pair[0]))
}

/// Reorder sorted prices by signer position using the price indexes.
fn by_signer(
    sorted: &[u128],
    words: &[U256],
    index: usize,
    label: &'static str,
) -> OracleResult<Vec<u128>> {
    let count = sorted.len();
    let indexes = CompactedArray::new(words, Layout::PRICE_INDEX.with_label(label));
    let mut seen = Bitmap::<MAX_SIGNERS>::new();
    let mut prices = vec![0; count];
    for (offset, price) in sorted.iter().enumerate() {
        let raw = indexes.get(index * count + offset)?;
        let position = usize::try_from(raw).unwrap_or(usize::MAX);
        if position >= count {
            return Err(OracleError::InvalidPriceIndex(
                u64::try_from(raw).unwrap_or(u64::MAX),
                count,
            ));
        }
        if seen.set(position, true) {
            return Err(OracleError::DuplicatedIndex(position as u64, label));
        }
        prices[position] = *price;
    }
    Ok(prices)
}
