use alloy_primitives::Address;

use crate::{
    config::FLOAT_PRECISION,
    price::{Price, ValidatedPrice},
    utils::mul_div,
    OracleError, OracleResult,
};

/// Check that `price` stays within `max_factor` of `ref_price`, comparing
/// mid prices.
pub(crate) fn validate_ref_price(
    token: &Address,
    price: &Price,
    ref_price: &Price,
    max_factor: u128,
) -> OracleResult<()> {
    let mid = price.mid();
    let ref_mid = ref_price.mid();
    let diff = mid.abs_diff(ref_mid);
    let exceeded = match mul_div(diff, FLOAT_PRECISION, ref_mid) {
        Some(factor) => factor > max_factor,
        None => true,
    };
    if exceeded {
        return Err(OracleError::MaxRefPriceDeviationExceeded {
            token: *token,
            price: mid,
            ref_price: ref_mid,
            max_factor,
        });
    }
    Ok(())
}

/// Combine the quorum price of `token` with its secondary price.
///
/// The secondary price only bounds the quorum price when both are present.
pub(crate) fn reconcile(
    token: &Address,
    primary: Option<ValidatedPrice>,
    secondary: Option<ValidatedPrice>,
    max_factor: u128,
) -> OracleResult<ValidatedPrice> {
    match (primary, secondary) {
        (Some(primary), Some(secondary)) => {
            validate_ref_price(token, &primary.price, &secondary.price, max_factor)?;
            Ok(primary)
        }
        (Some(primary), None) => Ok(primary),
        (None, Some(secondary)) => {
            tracing::debug!(%token, source = ?secondary.source, "using secondary price");
            Ok(secondary)
        }
        (None, None) => {
            tracing::warn!(%token, "no price available");
            Err(OracleError::EmptyPriceFeed(*token))
        }
    }
}
