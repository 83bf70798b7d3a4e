//! Append-only `(block, value)` histories.
//!
//! Every checkpoint list in the ledger (per-account voting gons, per-account
//! gon balances, totals, the multiplier) is a [`History`]. Writes only ever
//! touch the tail: a write in the tail's block overwrites it, a write in a later
//! block appends. Lookups binary-search for the latest checkpoint at or before a
//! target block, so a block's value is final once the next block has begun.

use serde::{Deserialize, Serialize};
use tally_types::BlockNumber;

use crate::error::LedgerError;

/// An immutable `(block, value)` record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint<T = u128> {
    pub block: BlockNumber,
    pub value: T,
}

/// Ordered checkpoints with strictly increasing block numbers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct History<T = u128> {
    checkpoints: Vec<Checkpoint<T>>,
}

impl<T: Copy> History<T> {
    pub fn new() -> Self {
        Self {
            checkpoints: Vec::new(),
        }
    }

    /// A history seeded with one checkpoint.
    pub fn starting_at(block: BlockNumber, value: T) -> Self {
        Self {
            checkpoints: vec![Checkpoint { block, value }],
        }
    }

    /// Record `value` as of `block`.
    pub fn push(&mut self, block: BlockNumber, value: T) -> Result<(), LedgerError> {
        match self.checkpoints.last_mut() {
            Some(last) if last.block == block => {
                last.value = value;
                Ok(())
            }
            Some(last) if last.block > block => Err(LedgerError::NonMonotonicCheckpoint {
                block,
                latest: last.block,
            }),
            _ => {
                self.checkpoints.push(Checkpoint { block, value });
                Ok(())
            }
        }
    }

    /// The value of the latest checkpoint at or before `block`.
    pub fn value_at(&self, block: BlockNumber) -> Option<T> {
        let idx = self.checkpoints.partition_point(|c| c.block <= block);
        idx.checked_sub(1).map(|i| self.checkpoints[i].value)
    }

    pub fn latest(&self) -> Option<Checkpoint<T>> {
        self.checkpoints.last().copied()
    }

    pub fn checkpoints(&self) -> &[Checkpoint<T>] {
        &self.checkpoints
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }
}

impl<T: Copy> Default for History<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_history_has_no_value() {
        let h: History = History::new();
        assert_eq!(h.value_at(100), None);
        assert!(h.is_empty());
        assert_eq!(h.latest(), None);
    }

    #[test]
    fn lookup_resolves_latest_at_or_before() {
        let mut h = History::new();
        h.push(10, 100).unwrap();
        h.push(20, 200).unwrap();
        h.push(30, 300).unwrap();

        assert_eq!(h.value_at(9), None);
        assert_eq!(h.value_at(10), Some(100));
        assert_eq!(h.value_at(15), Some(100));
        assert_eq!(h.value_at(20), Some(200));
        assert_eq!(h.value_at(29), Some(200));
        assert_eq!(h.value_at(1_000), Some(300));
    }

    #[test]
    fn same_block_write_overwrites_tail() {
        let mut h = History::new();
        h.push(5, 1).unwrap();
        h.push(5, 2).unwrap();
        h.push(5, 3).unwrap();
        assert_eq!(h.len(), 1);
        assert_eq!(h.value_at(5), Some(3));
    }

    #[test]
    fn earlier_block_write_is_rejected() {
        let mut h = History::new();
        h.push(10, 1).unwrap();
        let err = h.push(9, 2).unwrap_err();
        assert_eq!(err, LedgerError::NonMonotonicCheckpoint { block: 9, latest: 10 });
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn block_numbers_strictly_increase() {
        let mut h = History::new();
        for (block, value) in [(1, 10), (1, 11), (3, 12), (7, 13), (7, 14), (8, 15)] {
            h.push(block, value).unwrap();
        }
        let blocks: Vec<_> = h.checkpoints().iter().map(|c| c.block).collect();
        assert_eq!(blocks, vec![1, 3, 7, 8]);
        assert!(blocks.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn starting_at_seeds_history() {
        let h = History::starting_at(4, 42u64);
        assert_eq!(h.value_at(3), None);
        assert_eq!(h.value_at(4), Some(42));
        assert_eq!(h.latest(), Some(Checkpoint { block: 4, value: 42 }));
    }
}
