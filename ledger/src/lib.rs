//! Rebasing token ledger with delegated voting power.
//!
//! Balances are stored as gons, an internal unit that never changes on rebase.
//! The visible balance is `gons / multiplier`, so a single rebase rescales
//! every holder at once. Voting power is derived from gon balances through a
//! one-hop delegation graph and checkpointed per block, which lets governance
//! read it at past blocks and at official snapshots.

pub mod access;
pub mod config;
pub mod delegation;
pub mod error;
pub mod events;
pub mod gons;
pub mod history;
pub mod ledger;
pub mod multiplier;
pub mod snapshot;
pub mod voting;

pub use access::{AccessControl, Role};
pub use config::LedgerConfig;
pub use delegation::{AccountDelegation, DelegationGraph, DelegationMode, VoteShift};
pub use error::LedgerError;
pub use events::{EventBus, LedgerEvent};
pub use gons::{GonLedger, GonMove};
pub use history::{Checkpoint, History};
pub use ledger::Ledger;
pub use multiplier::{MultiplierStore, SnapshotRecord};
pub use snapshot::{check_readable, SnapshotEngine, DEFAULT_SNAPSHOT_LAG};
pub use voting::VotingLedger;
