//! The lowest 16 bits hold the number of participating signers, followed by
//! one 16-bit roster index per signer.

use ruint::aliases::U256;

use crate::{Error, Result};

const FIELD_BITS: usize = 16;

/// Max number of signers a signer info word can describe.
pub const MAX_SIGNERS: usize = 256 / FIELD_BITS - 1;

fn field(info: &U256, position: usize) -> u16 {
    let limbs = (*info >> (position * FIELD_BITS)).into_limbs();
    (limbs[0] & 0xffff) as u16
}

/// Encode roster indexes into a signer info word.
pub fn encode(indexes: &[u16]) -> Result<U256> {
    if indexes.len() > MAX_SIGNERS {
        return Err(Error::TooManySigners(indexes.len()));
    }
    let mut info = U256::from(indexes.len());
    for (position, index) in indexes.iter().enumerate() {
        info |= U256::from(*index) << ((position + 1) * FIELD_BITS);
    }
    Ok(info)
}

/// Decode the roster indexes of a signer info word, in signer order.
///
/// No validation of the indexes is performed here.
pub fn decode(info: &U256) -> Result<Vec<u16>> {
    let count = usize::from(field(info, 0));
    if count > MAX_SIGNERS {
        return Err(Error::TooManySigners(count));
    }
    Ok((1..=count).map(|position| field(info, position)).collect())
}
