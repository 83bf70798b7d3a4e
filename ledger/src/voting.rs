//! Derived voting-power balances, in gons, with per-account checkpoints.
//!
//! Only ever updated incrementally by applying [`VoteShift`]s planned by the
//! delegation graph. The sum of all voting balances is tracked separately so
//! total voting power can be read at any past block without a scan.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tally_types::{Address, BlockNumber};

use crate::delegation::VoteShift;
use crate::error::LedgerError;
use crate::history::History;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VotingLedger {
    voting_gons: HashMap<Address, u128>,
    total_voting_gons: u128,
    histories: HashMap<Address, History>,
    total_history: History,
}

impl VotingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn voting_gons(&self, account: &Address) -> u128 {
        self.voting_gons.get(account).copied().unwrap_or(0)
    }

    pub fn total_voting_gons(&self) -> u128 {
        self.total_voting_gons
    }

    /// Apply a shift and checkpoint every touched balance.
    ///
    /// Returns the accounts whose voting balance changed, with their new value.
    /// A shift that removes more power than an account holds, or overflows a
    /// balance, is reported as [`LedgerError::InvariantViolation`] and leaves
    /// the ledger unchanged.
    pub fn apply(&mut self, shift: VoteShift, block: BlockNumber) -> Result<Vec<(Address, u128)>, LedgerError> {
        let broken = || LedgerError::InvariantViolation(format!("{shift:?} does not fit the voting ledger"));
        let mut total = self.total_voting_gons;
        let mut updated: Vec<(Address, u128)> = Vec::with_capacity(2);

        match shift.from {
            Some(from) => {
                let v = self.voting_gons(&from).checked_sub(shift.gons).ok_or_else(broken)?;
                updated.push((from, v));
            }
            None => total = total.checked_add(shift.gons).ok_or_else(broken)?,
        }
        match shift.to {
            Some(to) => {
                let base = updated
                    .iter()
                    .find(|(account, _)| *account == to)
                    .map_or_else(|| self.voting_gons(&to), |(_, v)| *v);
                updated.push((to, base.checked_add(shift.gons).ok_or_else(broken)?));
            }
            None => total = total.checked_sub(shift.gons).ok_or_else(broken)?,
        }

        for (account, value) in &updated {
            self.voting_gons.insert(*account, *value);
            self.histories.entry(*account).or_default().push(block, *value)?;
        }
        self.total_voting_gons = total;
        if shift.from.is_none() || shift.to.is_none() {
            self.total_history.push(block, total)?;
        }
        tracing::trace!(?shift, block, "applied vote shift");
        Ok(updated)
    }

    /// Voting gons held by `account` at the end of `block`; zero if it had no
    /// checkpoint by then.
    pub fn voting_gons_at(&self, account: &Address, block: BlockNumber) -> u128 {
        self.histories
            .get(account)
            .and_then(|h| h.value_at(block))
            .unwrap_or(0)
    }

    pub fn total_at(&self, block: BlockNumber) -> u128 {
        self.total_history.value_at(block).unwrap_or(0)
    }

    pub fn history(&self, account: &Address) -> Option<&History> {
        self.histories.get(account)
    }

    pub fn accounts(&self) -> impl Iterator<Item = (&Address, &u128)> {
        self.voting_gons.iter()
    }

    /// Sum of all voting balances, recomputed from scratch.
    pub fn recompute_total(&self) -> Option<u128> {
        self.voting_gons
            .values()
            .try_fold(0u128, |acc, v| acc.checked_add(*v))
    }
}
