//! The cumulative inflation multiplier and its history.
//!
//! Two logs are kept. `by_block` records the multiplier in force at the end of
//! every block in which a rebase happened, which is what explicit-block reads
//! convert with. `snapshots` records the multiplier fixed for each official
//! snapshot, keyed both by id and by boundary block; the boundary-keyed log is
//! the coarse-grained series behind [`MultiplierStore::past_linear_inflation`].
//! A snapshot whose boundary block is still being produced follows any rebase
//! in that block.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tally_types::{BlockNumber, Multiplier, SnapshotId};

use crate::error::LedgerError;
use crate::history::History;

/// The multiplier fixed for one official snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub id: SnapshotId,
    pub boundary: BlockNumber,
    pub multiplier: Multiplier,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MultiplierStore {
    initial: Multiplier,
    current: Multiplier,
    by_block: History<Multiplier>,
    snapshots: BTreeMap<SnapshotId, SnapshotRecord>,
    at_boundaries: History<Multiplier>,
}

impl MultiplierStore {
    pub fn new(initial: Multiplier, genesis: BlockNumber) -> Self {
        Self {
            initial,
            current: initial,
            by_block: History::starting_at(genesis, initial),
            snapshots: BTreeMap::new(),
            at_boundaries: History::new(),
        }
    }

    pub fn current(&self) -> Multiplier {
        self.current
    }

    pub fn initial(&self) -> Multiplier {
        self.initial
    }

    /// Compute the multiplier a rebase by `raw` would produce, without applying it.
    pub fn preview_rebase(&self, raw: u128) -> Result<Multiplier, LedgerError> {
        Ok(self.current.rebase(raw)?)
    }

    /// Install a multiplier computed by [`Self::preview_rebase`].
    ///
    /// A snapshot whose boundary is `block` itself is still open: its recorded
    /// multiplier follows the rebase so it stays the value in force at the end
    /// of the boundary block.
    pub fn apply(&mut self, next: Multiplier, block: BlockNumber) -> Result<(), LedgerError> {
        self.by_block.push(block, next)?;
        let mut open = self
            .snapshots
            .values_mut()
            .rev()
            .take_while(|r| r.boundary == block)
            .peekable();
        if open.peek().is_some() {
            open.for_each(|r| r.multiplier = next);
            self.at_boundaries.push(block, next)?;
        }
        self.current = next;
        Ok(())
    }

    /// The multiplier in force at the end of `block`.
    pub fn at_block(&self, block: BlockNumber) -> Multiplier {
        self.by_block.value_at(block).unwrap_or(self.initial)
    }

    /// Fix the multiplier for a new snapshot whose boundary is `boundary`.
    pub fn record_snapshot(
        &mut self,
        id: SnapshotId,
        boundary: BlockNumber,
    ) -> Result<SnapshotRecord, LedgerError> {
        let record = SnapshotRecord {
            id,
            boundary,
            multiplier: self.at_block(boundary),
        };
        self.at_boundaries.push(boundary, record.multiplier)?;
        self.snapshots.insert(id, record);
        Ok(record)
    }

    pub fn for_snapshot(&self, id: SnapshotId) -> Option<SnapshotRecord> {
        self.snapshots.get(&id).copied()
    }

    /// Multiplier recorded at the last snapshot boundary at or before `block`,
    /// or the initial multiplier when no snapshot covers it.
    pub fn past_linear_inflation(&self, block: BlockNumber) -> Multiplier {
        self.at_boundaries.value_at(block).unwrap_or(self.initial)
    }

    pub fn snapshot_count(&self) -> usize {
        self.snapshots.len()
    }
}
