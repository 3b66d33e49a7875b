use std::fmt;

use alloy_primitives::{eip191_hash_message, Address, B256};
use bitmaps::Bitmap;
use gmx_oracle_codec::{signer_info, U256};
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};

use crate::{
    abi::{self, SignedPriceFields},
    config::OracleType,
    roles::Controller,
    OracleError, OracleResult,
};

/// Length of a `r || s || v` signature.
pub const SIGNATURE_LEN: usize = 65;

/// Max number of signers in a roster.
pub const MAX_ROSTER_SIZE: usize = 256;

/// Label hashed with the chain id into the [`Salt`].
pub const SALT_LABEL: &str = "xget-oracle-v1";

// Half of the secp256k1 group order.
const HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B, 0x20, 0xA0,
];

/// Salt binding signatures to one oracle deployment.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Salt([u8; 32]);

impl Salt {
    /// `keccak256(abi.encode(chain_id, SALT_LABEL))`.
    pub fn new(chain_id: u64) -> Self {
        Self(abi::hash_uint_with_label(chain_id, SALT_LABEL))
    }

    /// Get the bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for Salt {
    fn from(value: [u8; 32]) -> Self {
        Self(value)
    }
}

impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Salt(0x{})", hex::encode(self.0))
    }
}

/// Ordered roster of authorized signers.
///
/// Batches refer to signers by their position in the roster. Removing a
/// signer shifts the positions of the signers after it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SignerSet {
    signers: Vec<Address>,
}

impl SignerSet {
    /// Create a roster. Fails on duplicated signers.
    pub fn new(signers: impl IntoIterator<Item = Address>) -> OracleResult<Self> {
        let mut set = Self::default();
        for signer in signers {
            set.push(signer)?;
        }
        Ok(set)
    }

    fn push(&mut self, signer: Address) -> OracleResult<()> {
        if self.signers.contains(&signer) {
            return Err(OracleError::SignerAlreadyExists(signer));
        }
        if self.signers.len() >= MAX_ROSTER_SIZE {
            return Err(OracleError::SignerRosterFull(MAX_ROSTER_SIZE));
        }
        self.signers.push(signer);
        Ok(())
    }

    /// Add a signer at the end of the roster.
    pub fn add(&mut self, controller: &Controller, signer: Address) -> OracleResult<()> {
        self.push(signer)?;
        tracing::info!(%signer, by = %controller.account(), "oracle signer added");
        Ok(())
    }

    /// Remove a signer.
    pub fn remove(&mut self, controller: &Controller, signer: &Address) -> OracleResult<()> {
        let position = self
            .signers
            .iter()
            .position(|s| s == signer)
            .ok_or(OracleError::SignerNotFound(*signer))?;
        self.signers.remove(position);
        tracing::info!(%signer, by = %controller.account(), "oracle signer removed");
        Ok(())
    }

    /// Signer at `index`.
    pub fn get(&self, index: usize) -> Option<&Address> {
        self.signers.get(index)
    }

    /// Returns whether `signer` is in the roster.
    pub fn contains(&self, signer: &Address) -> bool {
        self.signers.contains(signer)
    }

    /// Number of signers.
    pub fn len(&self) -> usize {
        self.signers.len()
    }

    /// Returns whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.signers.is_empty()
    }

    /// All signers in order.
    pub fn as_slice(&self) -> &[Address] {
        &self.signers
    }

    /// Resolve the signers selected by a signer info word, in signer order.
    pub fn resolve(&self, info: &U256) -> OracleResult<Vec<Address>> {
        let indexes = signer_info::decode(info).map_err(|err| match err {
            gmx_oracle_codec::Error::TooManySigners(count) => {
                OracleError::MaxOracleSigners(count, signer_info::MAX_SIGNERS)
            }
            err => err.into(),
        })?;
        let mut seen = Bitmap::<MAX_ROSTER_SIZE>::new();
        indexes
            .into_iter()
            .map(|index| {
                let position = usize::from(index);
                let signer = self.signers.get(position).ok_or(
                    OracleError::SignerIndexOutOfBounds(index.into(), self.signers.len()),
                )?;
                if seen.set(position, true) {
                    return Err(OracleError::DuplicatedIndex(index.into(), "signerIndex"));
                }
                Ok(*signer)
            })
            .collect()
    }
}

/// The message a signer signs for one token.
#[derive(Debug, Clone, Copy)]
pub struct PriceMessage<'a> {
    /// Min block number.
    pub min_block_number: u64,
    /// Max block number.
    pub max_block_number: u64,
    /// Observation timestamp.
    pub timestamp: u64,
    /// Hash of the max block.
    pub block_hash: [u8; 32],
    /// Token.
    pub token: Address,
    /// Oracle type.
    pub oracle_type: OracleType,
    /// `10^decimals`.
    pub precision: u128,
    /// Sorted min prices of all signers.
    pub min_prices: &'a [u128],
    /// Sorted max prices of all signers.
    pub max_prices: &'a [u128],
}

impl PriceMessage<'_> {
    /// Hash of the ABI-encoded message.
    pub fn digest(&self, salt: &Salt) -> [u8; 32] {
        SignedPriceFields {
            salt: B256::from(salt.0),
            min_block_number: alloy_primitives::U256::from(self.min_block_number),
            max_block_number: alloy_primitives::U256::from(self.max_block_number),
            timestamp: alloy_primitives::U256::from(self.timestamp),
            block_hash: B256::from(self.block_hash),
            token: self.token,
            oracle_type: B256::from(*self.oracle_type.as_bytes()),
            precision: alloy_primitives::U256::from(self.precision),
            min_prices: abi::uint_array(self.min_prices),
            max_prices: abi::uint_array(self.max_prices),
        }
        .digest()
    }

    /// The hash that is actually signed: [`digest`](Self::digest) with the
    /// signed-message prefix.
    pub fn signing_hash(&self, salt: &Salt) -> [u8; 32] {
        eth_signed_message_hash(&self.digest(salt))
    }
}

/// `keccak256("\x19Ethereum Signed Message:\n32" || digest)`.
pub fn eth_signed_message_hash(digest: &[u8; 32]) -> [u8; 32] {
    eip191_hash_message(digest).0
}

/// Recover the address that signed `hash`.
///
/// Only canonical `r || s || v` signatures are accepted: `v` is 27 or 28 and
/// `s` is in the lower half of the curve order.
pub fn recover_signer(hash: &[u8; 32], signature: &[u8]) -> OracleResult<Address> {
    if signature.len() != SIGNATURE_LEN {
        return Err(OracleError::InvalidSignatureLength(signature.len()));
    }
    let (rs, v) = signature.split_at(64);
    let recovery_id = match v[0] {
        27 => 0,
        28 => 1,
        _ => return Err(OracleError::InvalidSignature),
    };
    if rs[32..] > HALF_ORDER[..] {
        return Err(OracleError::InvalidSignature);
    }
    let signature = Signature::from_slice(rs).map_err(|_| OracleError::InvalidSignature)?;
    let recovery_id = RecoveryId::from_byte(recovery_id).ok_or(OracleError::InvalidSignature)?;
    let key = VerifyingKey::recover_from_prehash(hash, &signature, recovery_id)
        .map_err(|_| OracleError::InvalidSignature)?;
    Ok(Address::from_public_key(&key))
}

/// Check that `signature` over `hash` was produced by `expected`.
pub fn verify_signer(hash: &[u8; 32], signature: &[u8], expected: &Address) -> OracleResult<()> {
    let signer = recover_signer(hash, signature)?;
    if signer != *expected {
        tracing::debug!(%signer, %expected, "signer mismatched");
        return Err(OracleError::InvalidSignature);
    }
    Ok(())
}

/// Signing side of a price signer.
#[derive(Clone)]
pub struct PriceSigner {
    key: SigningKey,
    address: Address,
}

impl PriceSigner {
    /// Create from a 32-byte secret key.
    pub fn from_slice(secret: &[u8]) -> OracleResult<Self> {
        let key = SigningKey::from_slice(secret).map_err(|_| OracleError::InvalidSigningKey)?;
        let address = Address::from_public_key(key.verifying_key());
        Ok(Self { key, address })
    }

    /// Address of the signer.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Sign a 32-byte hash.
    pub fn sign_hash(&self, hash: &[u8; 32]) -> OracleResult<[u8; SIGNATURE_LEN]> {
        let (signature, recovery_id) = self
            .key
            .sign_prehash_recoverable(hash)
            .map_err(|_| OracleError::InvalidSigningKey)?;
        let mut out = [0; SIGNATURE_LEN];
        out[..64].copy_from_slice(&signature.to_bytes());
        out[64] = 27 + recovery_id.to_byte();
        Ok(out)
    }

    /// Sign a price message.
    pub fn sign(&self, salt: &Salt, message: &PriceMessage<'_>) -> OracleResult<[u8; SIGNATURE_LEN]> {
        self.sign_hash(&message.signing_hash(salt))
    }
}

impl fmt::Debug for PriceSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriceSigner")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
