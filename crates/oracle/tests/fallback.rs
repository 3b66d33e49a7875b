mod common;

use common::*;
use gmx_oracle::{
    keys, test::setup_fmt_tracing, Address, Chain, OracleError, OracleResult, Price,
    PriceSource, RealtimeFeedReport, SetPricesParams,
};

const USDC_FEED: Address = Address::new([0xf3; 20]);
const WBTC_FEED_ID: [u8; 32] = [0x42; 32];
const WNT_FEED_ID: [u8; 32] = [0x43; 32];

const WNT_PRICES: [u128; 7] = [5990, 5991, 5995, 6010, 6011, 6015, 6017];

fn realtime_report(fixture: &Fixture, bid: i128, ask: i128) -> RealtimeFeedReport {
    let upper = fixture.latest_block();
    RealtimeFeedReport {
        feed_id: WBTC_FEED_ID,
        observations_timestamp: TIMESTAMP,
        median: (bid + ask) / 2,
        bid,
        ask,
        block_number_upper_bound: upper,
        upper_block_hash: fixture.chain.block_hash(upper).unwrap_or_default(),
        block_number_lower_bound: upper - 1,
        current_block_timestamp: TIMESTAMP,
    }
}

fn with_realtime_feed(fixture: &mut Fixture) {
    fixture
        .store
        .set_bytes32(keys::realtime_feed_id_key(&WBTC), WBTC_FEED_ID);
    fixture
        .store
        .set_uint(keys::realtime_feed_multiplier_key(&WBTC), 10u128.pow(31));
}

#[test]
fn test_with_oracle_prices() -> OracleResult<()> {
    let _tracing = setup_fmt_tracing("info");
    let mut fixture = Fixture::new()?;
    fixture.set_price_feed(&USDC, USDC_FEED);
    fixture.feeds.set_answer(USDC_FEED, 1, TIMESTAMP);

    let wnt = fixture.observation(WNT, 1, &WNT_PRICES, &WNT_PRICES);
    let mut params = fixture.batch(&SLOTS, &[wnt.clone()])?;
    params.price_feed_tokens = vec![USDC];
    let prices = fixture.with_oracle_prices(&params, |oracle| {
        assert_eq!(oracle.tokens_with_prices(0, 10), vec![WNT, USDC]);
        let usdc = oracle.get_validated_price(&USDC)?;
        assert_eq!(usdc.price, Price { min: 10, max: 10 });
        assert_eq!(usdc.source, PriceSource::PriceFeed);
        oracle.get_primary_price(&WNT)
    })?;
    assert_eq!(prices, Price { min: 60100, max: 60100 });
    assert_eq!(fixture.oracle.tokens_with_prices_count(), 0);

    // Without a price feed, USDC must be signed.
    fixture
        .store
        .set_address(keys::price_feed_key(&USDC), Address::ZERO);
    let usdc = fixture.observation(USDC, 6, &[1; 7], &[1; 7]);
    let params = fixture.batch(&SLOTS, &[wnt.clone(), usdc.clone()])?;
    let count = fixture.with_oracle_prices(&params, |oracle| {
        assert_eq!(
            oracle.get_primary_price(&USDC)?,
            Price {
                min: 1_000_000,
                max: 1_000_000
            }
        );
        Ok(oracle.tokens_with_prices_count())
    })?;
    assert_eq!(count, 2);

    let params = fixture.batch(&SLOTS, &[wnt.clone(), wnt, usdc])?;
    assert_eq!(
        fixture.with_oracle_prices(&params, |_| Ok(())),
        Err(OracleError::PriceAlreadySet(WNT, 60100, 60100))
    );
    assert_eq!(fixture.oracle.tokens_with_prices_count(), 0);
    Ok(())
}

#[test]
fn test_with_oracle_prices_clears_after_failure() -> OracleResult<()> {
    let mut fixture = Fixture::new()?;
    let params = fixture.wnt_and_wbtc()?;
    let err = fixture
        .with_oracle_prices(&params, |oracle| {
            oracle.get_primary_price(&USDC)?;
            Ok(())
        })
        .unwrap_err();
    assert_eq!(err, OracleError::MissingOraclePrice(USDC));
    assert_eq!(fixture.oracle.tokens_with_prices_count(), 0);

    // The oracle can be used again.
    fixture.set_prices(&params)?;
    assert_eq!(fixture.oracle.tokens_with_prices_count(), 2);
    Ok(())
}

#[test]
fn test_with_oracle_prices_keeps_prices_on_rejected_batch() -> OracleResult<()> {
    let mut fixture = Fixture::new()?;
    let params = fixture.wnt_and_wbtc()?;
    fixture.set_prices(&params)?;

    assert_eq!(
        fixture.with_oracle_prices(&params, |_| Ok(())),
        Err(OracleError::NonEmptyTokensWithPrices(2))
    );
    assert_eq!(fixture.oracle.tokens_with_prices(0, 10), vec![WNT, WBTC]);
    assert_eq!(
        fixture.oracle.get_primary_price(&WNT)?,
        Price { min: 50000, max: 50100 }
    );
    Ok(())
}

#[test]
fn test_price_feed_tokens() -> OracleResult<()> {
    let mut fixture = Fixture::new()?;
    fixture.set_price_feed(&USDC, USDC_FEED);
    let params = SetPricesParams {
        price_feed_tokens: vec![USDC],
        ..Default::default()
    };

    assert_eq!(
        fixture.set_prices(&params),
        Err(OracleError::PriceFeedNotFound(USDC, USDC_FEED))
    );

    fixture.feeds.set_answer(USDC_FEED, 0, TIMESTAMP);
    assert_eq!(
        fixture.set_prices(&params),
        Err(OracleError::EmptyPriceFeed(USDC))
    );

    fixture.feeds.set_answer(USDC_FEED, 1, TIMESTAMP - 3600);
    assert_eq!(
        fixture.set_prices(&params),
        Err(OracleError::PriceFeedNotUpdated(USDC, TIMESTAMP - 3600, 3600))
    );

    // A token without a feed has no price at all.
    let unconfigured = SetPricesParams {
        price_feed_tokens: vec![WNT],
        ..Default::default()
    };
    assert_eq!(
        fixture.set_prices(&unconfigured),
        Err(OracleError::EmptyPriceFeed(WNT))
    );

    fixture.feeds.set_answer(USDC_FEED, 1, TIMESTAMP);
    fixture.set_prices(&params)?;
    let usdc = fixture.oracle.get_validated_price(&USDC)?;
    assert_eq!(usdc.price, Price { min: 10, max: 10 });
    assert_eq!(usdc.max_block_number, fixture.chain.block_number());
    Ok(())
}

#[test]
fn test_signed_token_listed_as_price_feed_token() -> OracleResult<()> {
    let mut fixture = Fixture::new()?;
    let feed = Address::new([0xf1; 20]);
    fixture.set_price_feed(&WNT, feed);
    fixture.set_max_ref_price_deviation_factor(10u128.pow(30) / 2);
    fixture.feeds.set_answer(feed, 5000, TIMESTAMP);

    let mut params = fixture.batch(
        &SLOTS,
        &[fixture.observation(WNT, 1, &WNT_MIN_PRICES, &WNT_MAX_PRICES)],
    )?;
    params.price_feed_tokens = vec![WNT];
    assert_eq!(
        fixture.set_prices(&params),
        Err(OracleError::PriceAlreadySet(WNT, 50000, 50100))
    );
    Ok(())
}

#[test]
fn test_realtime_feed_tokens() -> OracleResult<()> {
    let _tracing = setup_fmt_tracing("info");
    let mut fixture = Fixture::new()?;
    with_realtime_feed(&mut fixture);

    let report = realtime_report(&fixture, 60_000, 60_100);
    let params = SetPricesParams {
        realtime_feed_tokens: vec![WBTC],
        realtime_feed_data: vec![report.encode()],
        ..Default::default()
    };
    fixture.set_prices(&params)?;
    let price = fixture.oracle.get_validated_price(&WBTC)?;
    assert_eq!(price.price, Price { min: 600_000, max: 601_000 });
    assert_eq!(price.source, PriceSource::RealtimeFeed);
    assert_eq!(price.min_block_number, report.block_number_lower_bound);
    assert_eq!(price.max_block_number, report.block_number_upper_bound);
    fixture.clear_all_prices()?;

    let mismatched = SetPricesParams {
        realtime_feed_tokens: vec![WBTC, WNT],
        realtime_feed_data: vec![report.encode()],
        ..Default::default()
    };
    assert_eq!(
        fixture.set_prices(&mismatched),
        Err(OracleError::InvalidRealtimeFeedLengths(2, 1))
    );

    // A token without a realtime feed id accepts no report, not even one
    // with a zero feed id.
    fixture
        .store
        .set_uint(keys::realtime_feed_multiplier_key(&WNT), 10u128.pow(31));
    let mut zero_feed_id = report.clone();
    zero_feed_id.feed_id = [0; 32];
    let unconfigured = SetPricesParams {
        realtime_feed_tokens: vec![WNT],
        realtime_feed_data: vec![zero_feed_id.encode()],
        ..Default::default()
    };
    assert_eq!(
        fixture.set_prices(&unconfigured),
        Err(OracleError::EmptyRealtimeFeedId(WNT))
    );
    assert_eq!(fixture.oracle.tokens_with_prices_count(), 0);

    // Reports are bound to the feed id of the token.
    fixture
        .store
        .set_bytes32(keys::realtime_feed_id_key(&WNT), WNT_FEED_ID);
    let other_token = SetPricesParams {
        realtime_feed_tokens: vec![WNT],
        realtime_feed_data: vec![report.encode()],
        ..Default::default()
    };
    assert_eq!(
        fixture.set_prices(&other_token),
        Err(OracleError::InvalidRealtimeFeedId(WNT, WBTC_FEED_ID, WNT_FEED_ID))
    );

    let unavailable = SetPricesParams {
        realtime_feed_tokens: vec![WBTC],
        realtime_feed_data: vec![realtime_report(&fixture, 0, 60_100).encode()],
        ..Default::default()
    };
    assert_eq!(
        fixture.set_prices(&unavailable),
        Err(OracleError::EmptyPriceFeed(WBTC))
    );

    let mut stale = realtime_report(&fixture, 60_000, 60_100);
    stale.upper_block_hash = [0xaa; 32];
    let params = SetPricesParams {
        realtime_feed_tokens: vec![WBTC],
        realtime_feed_data: vec![stale.encode()],
        ..Default::default()
    };
    assert_eq!(
        fixture.set_prices(&params),
        Err(OracleError::InvalidRealtimeBlockHash(WBTC, fixture.latest_block()))
    );
    Ok(())
}

#[test]
fn test_realtime_feed_and_signed_tokens() -> OracleResult<()> {
    let mut fixture = Fixture::new()?;
    with_realtime_feed(&mut fixture);

    let mut params = fixture.batch(
        &SLOTS,
        &[fixture.observation(WNT, 1, &WNT_MIN_PRICES, &WNT_MAX_PRICES)],
    )?;
    params.realtime_feed_tokens = vec![WBTC];
    params.realtime_feed_data = vec![realtime_report(&fixture, 60_000, 60_100).encode()];

    fixture.set_prices(&params)?;
    assert_eq!(fixture.oracle.tokens_with_prices(0, 10), vec![WNT, WBTC]);
    let sources = fixture
        .oracle
        .prices()
        .iter()
        .map(|price| price.source)
        .collect::<Vec<_>>();
    assert_eq!(sources, vec![PriceSource::Signers, PriceSource::RealtimeFeed]);
    Ok(())
}
