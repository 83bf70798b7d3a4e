//! The official snapshot pointer.
//!
//! Governance reads voting power "as of the current snapshot". Taking a
//! snapshot bumps the id and fixes a boundary block; every snapshot read
//! resolves checkpoints at or before that boundary, so later mutations cannot
//! change the answer until the next snapshot.
//!
//! The boundary is `current_block - lag`. With the default lag of 1 the
//! boundary is the last fully produced block and snapshot reads are available
//! immediately. With a lag of 0 the boundary is the block still being produced;
//! reads revert with [`LedgerError::AtomicRead`] until the next block begins,
//! so the boundary is never observed while it can still change.

use serde::{Deserialize, Serialize};
use tally_types::{BlockNumber, SnapshotId};

use crate::error::LedgerError;

pub const DEFAULT_SNAPSHOT_LAG: u64 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SnapshotEngine {
    current_id: SnapshotId,
    boundary: Option<BlockNumber>,
    lag: u64,
}

impl SnapshotEngine {
    pub fn new(lag: u64) -> Self {
        Self {
            current_id: 0,
            boundary: None,
            lag,
        }
    }

    pub fn current_id(&self) -> SnapshotId {
        self.current_id
    }

    /// The boundary block of the current snapshot, if one was ever taken.
    pub fn boundary(&self) -> Option<BlockNumber> {
        self.boundary
    }

    pub fn lag(&self) -> u64 {
        self.lag
    }

    /// The id and boundary the next snapshot would get if taken at `current_block`.
    pub fn preview(&self, current_block: BlockNumber) -> (SnapshotId, BlockNumber) {
        (self.current_id + 1, current_block.saturating_sub(self.lag))
    }

    /// Advance the pointer. Returns the new id and boundary.
    pub fn take(&mut self, current_block: BlockNumber) -> (SnapshotId, BlockNumber) {
        let (id, boundary) = self.preview(current_block);
        self.current_id = id;
        self.boundary = Some(boundary);
        (id, boundary)
    }

    /// The boundary to read at, or `None` if no snapshot exists yet.
    ///
    /// Fails if the boundary is the block still being produced.
    pub fn readable_boundary(&self, current_block: BlockNumber) -> Result<Option<BlockNumber>, LedgerError> {
        match self.boundary {
            Some(b) if b >= current_block => Err(LedgerError::AtomicRead(b)),
            other => Ok(other),
        }
    }
}

impl Default for SnapshotEngine {
    fn default() -> Self {
        Self::new(DEFAULT_SNAPSHOT_LAG)
    }
}

/// Reject reads of the block being produced or of future blocks.
pub fn check_readable(block: BlockNumber, current_block: BlockNumber) -> Result<(), LedgerError> {
    if block == current_block {
        Err(LedgerError::AtomicRead(block))
    } else if block > current_block {
        Err(LedgerError::FutureBlock {
            requested: block,
            current: current_block,
        })
    } else {
        Ok(())
    }
}
