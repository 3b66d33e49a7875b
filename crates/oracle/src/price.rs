use alloy_primitives::Address;

/// Min and max prices of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Price {
    /// Min price.
    pub min: u128,
    /// Max price.
    pub max: u128,
}

impl Price {
    /// Mid price, rounded down.
    pub fn mid(&self) -> u128 {
        // `min / 2 + max / 2` plus the carry of both halves.
        self.min / 2 + self.max / 2 + (self.min % 2 + self.max % 2) / 2
    }
}

/// Where a validated price comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "strum", derive(strum::EnumString, strum::Display))]
#[cfg_attr(feature = "strum", strum(serialize_all = "snake_case"))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PriceSource {
    /// Signed by the oracle signers.
    Signers,
    /// Push-style price feed.
    PriceFeed,
    /// Realtime feed report.
    RealtimeFeed,
}

/// A validated token price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidatedPrice {
    /// Token.
    pub token: Address,
    /// Prices, scaled by the token precision.
    pub price: Price,
    /// Observation timestamp.
    pub timestamp: u64,
    /// Min block number of the observation window.
    pub min_block_number: u64,
    /// Max block number of the observation window.
    pub max_block_number: u64,
    /// Source.
    pub source: PriceSource,
}

/// Median of a sorted list: the middle element, or the average of the two
/// middle elements rounded down. `None` if the list is empty.
pub fn median(sorted: &[u128]) -> Option<u128> {
    let len = sorted.len();
    if len == 0 {
        return None;
    }
    let mid = len / 2;
    if len % 2 == 1 {
        Some(sorted[mid])
    } else {
        let price = Price {
            min: sorted[mid - 1],
            max: sorted[mid],
        };
        Some(price.mid())
    }
}

/// `10^decimals`, `None` on overflow.
pub fn precision(decimals: u8) -> Option<u128> {
    10u128.checked_pow(decimals.into())
}
