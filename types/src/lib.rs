//! Fundamental types for the Tally ledger.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! account addresses, the fixed-point inflation multiplier, and block/snapshot
//! numbering.

pub mod address;
pub mod amount;
pub mod error;

pub use address::Address;
pub use amount::{Multiplier, DENOMINATOR};
pub use error::TypesError;

/// Height of a block. The ledger always knows the block currently being produced.
pub type BlockNumber = u64;

/// Monotonic identifier of an official voting snapshot. Zero means "no snapshot yet".
pub type SnapshotId = u64;
