use alloy_primitives::Address;
use indexmap::IndexMap;

use crate::{
    price::{Price, ValidatedPrice},
    OracleError, OracleResult,
};

/// Validated prices of the current transaction, in insertion order.
#[derive(Debug, Default, Clone)]
pub struct PriceStore {
    prices: IndexMap<Address, ValidatedPrice>,
}

impl PriceStore {
    /// Insert a price. Fails if the token already has one.
    pub fn insert(&mut self, price: ValidatedPrice) -> OracleResult<()> {
        if let Some(existing) = self.prices.get(&price.token) {
            return Err(OracleError::PriceAlreadySet(
                price.token,
                existing.price.min,
                existing.price.max,
            ));
        }
        self.prices.insert(price.token, price);
        Ok(())
    }

    /// Get the validated price of `token`.
    pub fn get(&self, token: &Address) -> OracleResult<&ValidatedPrice> {
        self.prices
            .get(token)
            .ok_or(OracleError::MissingOraclePrice(*token))
    }

    /// Get the min/max price of `token`.
    pub fn get_price(&self, token: &Address) -> OracleResult<Price> {
        self.get(token).map(|price| price.price)
    }

    /// Returns whether `token` has a price.
    pub fn contains(&self, token: &Address) -> bool {
        self.prices.contains_key(token)
    }

    /// Tokens with prices, starting at `offset`, at most `count` of them.
    pub fn list(&self, offset: usize, count: usize) -> Vec<Address> {
        self.prices.keys().skip(offset).take(count).copied().collect()
    }

    /// Iterate over the validated prices.
    pub fn iter(&self) -> impl Iterator<Item = &ValidatedPrice> {
        self.prices.values()
    }

    /// Number of tokens with prices.
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Returns whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Remove all prices.
    pub fn clear(&mut self) {
        self.prices.clear();
    }
}
