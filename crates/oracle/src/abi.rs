#![allow(unreachable_pub)]

use alloy_primitives::{keccak256, Address, B256, U256};
use alloy_sol_types::{sol, sol_data, SolType, SolValue};

sol! {
    /// Fields of a signed price message, in encoding order.
    struct SignedPriceFields {
        bytes32 salt;
        uint256 min_block_number;
        uint256 max_block_number;
        uint256 timestamp;
        bytes32 block_hash;
        address token;
        bytes32 oracle_type;
        uint256 precision;
        uint256[] min_prices;
        uint256[] max_prices;
    }
}

type SaltFields = (sol_data::Uint<256>, sol_data::String);

impl SignedPriceFields {
    /// `keccak256(abi.encode(...fields))`.
    pub(crate) fn digest(&self) -> [u8; 32] {
        keccak256(<Self as SolType>::abi_encode_params(self)).0
    }
}

pub(crate) fn uint_array(values: &[u128]) -> Vec<U256> {
    values.iter().copied().map(U256::from).collect()
}

/// `keccak256(abi.encode(value))`.
pub(crate) fn hash_string(value: &str) -> [u8; 32] {
    keccak256(sol_data::String::abi_encode(&value)).0
}

/// `keccak256(abi.encode(hash, address))`.
pub(crate) fn hash_with_address(hash: [u8; 32], address: &Address) -> [u8; 32] {
    keccak256((B256::from(hash), *address).abi_encode()).0
}

/// `keccak256(abi.encode(value, label))`.
pub(crate) fn hash_uint_with_label(value: u64, label: &str) -> [u8; 32] {
    keccak256(SaltFields::abi_encode_params(&(U256::from(value), label))).0
}
