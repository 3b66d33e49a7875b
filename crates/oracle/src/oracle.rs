use alloy_primitives::Address;

use crate::{
    env::OracleEnv,
    events::{EventEmitter, OracleEvent},
    params::SetPricesParams,
    price::{Price, ValidatedPrice},
    roles::Controller,
    signer::{Salt, SignerSet},
    store::PriceStore,
    validator::PriceValidator,
    OracleError, OracleResult,
};

/// Oracle.
///
/// Holds the signer roster and the prices validated for the current
/// transaction.
#[derive(Debug, Clone)]
pub struct Oracle {
    salt: Salt,
    signers: SignerSet,
    primary: PriceStore,
}

impl Oracle {
    /// Create an oracle with an empty price store.
    pub fn new(salt: Salt, signers: SignerSet) -> Self {
        Self {
            salt,
            signers,
            primary: PriceStore::default(),
        }
    }

    /// Salt of the signed messages.
    pub fn salt(&self) -> &Salt {
        &self.salt
    }

    /// Signer roster.
    pub fn signers(&self) -> &SignerSet {
        &self.signers
    }

    /// Add a signer at the end of the roster.
    pub fn add_signer(&mut self, controller: &Controller, signer: Address) -> OracleResult<()> {
        self.signers.add(controller, signer)
    }

    /// Remove a signer from the roster.
    pub fn remove_signer(&mut self, controller: &Controller, signer: &Address) -> OracleResult<()> {
        self.signers.remove(controller, signer)
    }

    /// Validate a batch without touching the price store.
    pub fn validate_prices(
        &self,
        env: &OracleEnv<'_>,
        params: &SetPricesParams,
    ) -> OracleResult<Vec<ValidatedPrice>> {
        let staged = self.stage(env, params, false)?;
        Ok(staged.iter().copied().collect())
    }

    /// Validate a batch and record its prices.
    ///
    /// Fails if the store still holds prices. Nothing is recorded on failure.
    pub fn set_prices(
        &mut self,
        controller: &Controller,
        env: &OracleEnv<'_>,
        events: &mut dyn EventEmitter,
        params: &SetPricesParams,
    ) -> OracleResult<()> {
        let staged = self.stage(env, params, true).inspect_err(|err| {
            tracing::warn!(%err, by = %controller.account(), "rejected price batch");
        })?;
        for price in staged.iter() {
            events.emit(OracleEvent::from(price));
        }
        tracing::info!(
            tokens = staged.len(),
            by = %controller.account(),
            "prices set"
        );
        self.primary = staged;
        Ok(())
    }

    fn stage(
        &self,
        env: &OracleEnv<'_>,
        params: &SetPricesParams,
        require_empty: bool,
    ) -> OracleResult<PriceStore> {
        let validator = PriceValidator::new(env, &self.salt);
        let signers = validator.signers(&self.signers, &params.signer_info)?;
        if require_empty && !self.primary.is_empty() {
            return Err(OracleError::NonEmptyTokensWithPrices(self.primary.len()));
        }
        validator.validate(&signers, params)
    }

    /// Set prices, run `f`, then clear the prices whatever `f` returns.
    ///
    /// A batch that cannot be set leaves the store untouched.
    pub fn with_oracle_prices<T, E>(
        &mut self,
        controller: &Controller,
        env: &OracleEnv<'_>,
        events: &mut dyn EventEmitter,
        params: &SetPricesParams,
        f: impl FnOnce(&Self) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<OracleError>,
    {
        self.set_prices(controller, env, events, params)?;
        let output = f(&*self);
        self.clear_all_prices(controller);
        output
    }

    /// Clear all prices.
    pub fn clear_all_prices(&mut self, controller: &Controller) {
        self.primary.clear();
        tracing::info!(by = %controller.account(), "prices cleared");
    }

    /// Get the primary price of `token`.
    pub fn get_primary_price(&self, token: &Address) -> OracleResult<Price> {
        self.primary.get_price(token)
    }

    /// Get the validated price of `token`.
    pub fn get_validated_price(&self, token: &Address) -> OracleResult<&ValidatedPrice> {
        self.primary.get(token)
    }

    /// Number of tokens with prices.
    pub fn tokens_with_prices_count(&self) -> usize {
        self.primary.len()
    }

    /// Tokens with prices in insertion order, starting at `offset`, at most
    /// `count` of them.
    pub fn tokens_with_prices(&self, offset: usize, count: usize) -> Vec<Address> {
        self.primary.list(offset, count)
    }

    /// Recorded prices.
    pub fn prices(&self) -> &PriceStore {
        &self.primary
    }
}
