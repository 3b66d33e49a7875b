#![allow(dead_code)]

use gmx_oracle::{
    keys,
    test::{TestChain, TestSigners, TokenObservation, TrustedRealtimeFeedVerifier},
    Address, Chain, Controller, EventLog, InMemoryDataStore, InMemoryPriceFeeds, InMemoryRoleStore,
    Oracle, OracleEnv, OracleError, OracleResult, RoleKey, Salt, SetPricesParams,
    ValidatedPrice,
};

pub const WNT: Address = Address::new([0x11; 20]);
pub const WBTC: Address = Address::new([0x22; 20]);
pub const USDC: Address = Address::new([0x33; 20]);

pub const CHAIN_ID: u64 = 42161;
pub const TIMESTAMP: u64 = 1_700_000_000;

pub const SLOTS: [u16; 7] = [0, 1, 2, 3, 4, 7, 9];

pub const WNT_MIN_PRICES: [u128; 7] = [4990, 4991, 4995, 5000, 5001, 5005, 5007];
pub const WNT_MAX_PRICES: [u128; 7] = [4990, 4991, 4995, 5010, 5011, 5015, 5017];
pub const WBTC_MIN_PRICES: [u128; 7] = [60100, 60101, 60102, 60110, 60200, 60300, 60500];
pub const WBTC_MAX_PRICES: [u128; 7] = [60100, 60101, 60102, 60510, 60700, 60800, 60900];

/// An oracle with a roster of 10 signers, on a chain at block 100.
pub struct Fixture {
    pub signers: TestSigners,
    pub roles: InMemoryRoleStore,
    pub store: InMemoryDataStore,
    pub chain: TestChain,
    pub feeds: InMemoryPriceFeeds,
    pub events: EventLog,
    pub oracle: Oracle,
    pub keeper: Address,
}

impl Fixture {
    pub fn new() -> OracleResult<Self> {
        let signers = TestSigners::new(10)?;
        let keeper = Address::new([0xee; 20]);
        let mut roles = InMemoryRoleStore::default();
        roles.grant_role(&keeper, RoleKey::CONTROLLER);
        let oracle = Oracle::new(Salt::new(CHAIN_ID), signers.roster()?);
        Ok(Self {
            signers,
            roles,
            store: InMemoryDataStore::default(),
            chain: TestChain::new(100, TIMESTAMP + 12),
            feeds: InMemoryPriceFeeds::default(),
            events: EventLog::default(),
            oracle,
            keeper,
        })
    }

    pub fn controller(&self) -> OracleResult<Controller> {
        Controller::authorize(&self.roles, &self.keeper)
    }

    /// The previous block, the latest one a batch can refer to.
    pub fn latest_block(&self) -> u64 {
        self.chain.block_number() - 1
    }

    pub fn observation(
        &self,
        token: Address,
        decimals: u8,
        min_prices: &[u128],
        max_prices: &[u128],
    ) -> TokenObservation {
        let block = self.latest_block();
        TokenObservation::builder()
            .token(token)
            .min_block_number(block)
            .max_block_number(block)
            .timestamp(TIMESTAMP)
            .decimals(decimals)
            .min_prices(min_prices)
            .max_prices(max_prices)
            .build()
    }

    pub fn batch(
        &self,
        slots: &[u16],
        observations: &[TokenObservation],
    ) -> OracleResult<SetPricesParams> {
        self.signers.batch(
            self.oracle.salt(),
            &self.store,
            &self.chain,
            slots,
            observations,
        )
    }

    pub fn wnt_and_wbtc(&self) -> OracleResult<SetPricesParams> {
        self.batch(
            &SLOTS,
            &[
                self.observation(WNT, 1, &WNT_MIN_PRICES, &WNT_MAX_PRICES),
                self.observation(WBTC, 2, &WBTC_MIN_PRICES, &WBTC_MAX_PRICES),
            ],
        )
    }

    pub fn set_prices(&mut self, params: &SetPricesParams) -> OracleResult<()> {
        let controller = self.controller()?;
        let env = OracleEnv::builder()
            .data_store(&self.store)
            .chain(&self.chain)
            .price_feeds(&self.feeds)
            .realtime_verifier(&TrustedRealtimeFeedVerifier)
            .build();
        self.oracle
            .set_prices(&controller, &env, &mut self.events, params)
    }

    pub fn validate_prices(&self, params: &SetPricesParams) -> OracleResult<Vec<ValidatedPrice>> {
        let env = OracleEnv::builder()
            .data_store(&self.store)
            .chain(&self.chain)
            .price_feeds(&self.feeds)
            .realtime_verifier(&TrustedRealtimeFeedVerifier)
            .build();
        self.oracle.validate_prices(&env, params)
    }

    pub fn with_oracle_prices<T>(
        &mut self,
        params: &SetPricesParams,
        f: impl FnOnce(&Oracle) -> OracleResult<T>,
    ) -> OracleResult<T> {
        let controller = self.controller()?;
        let env = OracleEnv::builder()
            .data_store(&self.store)
            .chain(&self.chain)
            .price_feeds(&self.feeds)
            .realtime_verifier(&TrustedRealtimeFeedVerifier)
            .build();
        self.oracle
            .with_oracle_prices(&controller, &env, &mut self.events, params, f)
    }

    pub fn clear_all_prices(&mut self) -> OracleResult<()> {
        let controller = self.controller()?;
        self.oracle.clear_all_prices(&controller);
        Ok(())
    }

    /// Configure a push feed for `token`, with a multiplier of `10^31` and a
    /// heartbeat of one hour.
    pub fn set_price_feed(&mut self, token: &Address, feed: Address) {
        self.store.set_address(keys::price_feed_key(token), feed);
        self.store
            .set_uint(keys::price_feed_multiplier_key(token), 10u128.pow(31));
        self.store
            .set_uint(keys::price_feed_heartbeat_duration_key(token), 3600);
    }

    pub fn set_min_oracle_signers(&mut self, count: u128) {
        self.store.set_uint(keys::min_oracle_signers_key(), count);
    }

    pub fn set_max_ref_price_deviation_factor(&mut self, factor: u128) {
        self.store
            .set_uint(keys::max_oracle_ref_price_deviation_factor_key(), factor);
    }
}

pub fn is_deviation_error(err: &OracleError) -> bool {
    matches!(err, OracleError::MaxRefPriceDeviationExceeded { .. })
}
