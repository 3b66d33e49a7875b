/// Chain state visible to the oracle.
pub trait Chain {
    /// Current block number.
    fn block_number(&self) -> u64;

    /// Current unix timestamp in seconds.
    fn timestamp(&self) -> u64;

    /// Hash of a past block, `None` if it cannot be retrieved.
    fn block_hash(&self, number: u64) -> Option<[u8; 32]>;
}

impl<C: Chain + ?Sized> Chain for &C {
    fn block_number(&self) -> u64 {
        (**self).block_number()
    }

    fn timestamp(&self) -> u64 {
        (**self).timestamp()
    }

    fn block_hash(&self, number: u64) -> Option<[u8; 32]> {
        (**self).block_hash(number)
    }
}
