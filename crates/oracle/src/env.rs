use typed_builder::TypedBuilder;

use crate::{
    chain::Chain, config::DataStore, feed::PriceFeedProvider, realtime::RealtimeFeedVerifier,
};

/// External collaborators of the oracle.
#[derive(TypedBuilder)]
pub struct OracleEnv<'a> {
    data_store: &'a dyn DataStore,
    chain: &'a dyn Chain,
    #[builder(default, setter(strip_option))]
    price_feeds: Option<&'a dyn PriceFeedProvider>,
    #[builder(default, setter(strip_option))]
    realtime_verifier: Option<&'a dyn RealtimeFeedVerifier>,
}

impl<'a> OracleEnv<'a> {
    /// Data store.
    pub fn data_store(&self) -> &'a dyn DataStore {
        self.data_store
    }

    /// Chain.
    pub fn chain(&self) -> &'a dyn Chain {
        self.chain
    }

    /// Price feeds.
    pub fn price_feeds(&self) -> Option<&'a dyn PriceFeedProvider> {
        self.price_feeds
    }

    /// Realtime feed verifier.
    pub fn realtime_verifier(&self) -> Option<&'a dyn RealtimeFeedVerifier> {
        self.realtime_verifier
    }
}
