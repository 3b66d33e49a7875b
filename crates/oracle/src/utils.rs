use ruint::aliases::U256;

/// `value * multiplier / divisor` without intermediate overflow.
/// `None` if `divisor` is zero or the result does not fit in `u128`.
pub(crate) fn mul_div(value: u128, multiplier: u128, divisor: u128) -> Option<u128> {
    if divisor == 0 {
        return None;
    }
    let product = U256::from(value).checked_mul(U256::from(multiplier))?;
    u128::try_from(product / U256::from(divisor)).ok()
}
