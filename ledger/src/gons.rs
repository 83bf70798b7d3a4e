//! Per-account gon balances, the gon total, and allowances.
//!
//! This is stage one of every balance mutation: it moves gons and records raw
//! balance checkpoints, and knows nothing about voting power. Each mutation is
//! split into a `check_*` step that validates and computes new balances, and
//! an `apply_*` step that writes them, so the ledger can validate every stage
//! of an operation before committing any of it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tally_types::{Address, BlockNumber};

use crate::error::LedgerError;
use crate::history::History;

/// A validated gon movement, ready to be applied.
///
/// `from == None` is a mint, `to == None` is a burn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GonMove {
    pub from: Option<Address>,
    pub to: Option<Address>,
    pub gons: u128,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GonLedger {
    balances: HashMap<Address, u128>,
    total_gons: u128,
    allowances: HashMap<(Address, Address), u128>,
    balance_history: HashMap<Address, History>,
    total_history: History,
}

impl GonLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self, account: &Address) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    pub fn total_gons(&self) -> u128 {
        self.total_gons
    }

    /// Validate a mint of `gons` to `to`.
    pub fn check_mint(&self, to: Address, gons: u128) -> Result<GonMove, LedgerError> {
        if to.is_zero() {
            return Err(LedgerError::ZeroAddress);
        }
        self.total_gons.checked_add(gons).ok_or(LedgerError::Overflow)?;
        Ok(GonMove {
            from: None,
            to: Some(to),
            gons,
        })
    }

    /// Validate a burn of `gons` from `holder`. `amount` is the visible token
    /// amount, used only for the error report.
    pub fn check_burn(
        &self,
        holder: Address,
        gons: u128,
        amount: u128,
        available: u128,
    ) -> Result<GonMove, LedgerError> {
        if self.balance(&holder) < gons {
            return Err(LedgerError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        Ok(GonMove {
            from: Some(holder),
            to: None,
            gons,
        })
    }

    /// Validate a transfer of `gons` between two accounts.
    pub fn check_transfer(
        &self,
        from: Address,
        to: Address,
        gons: u128,
        amount: u128,
        available: u128,
    ) -> Result<GonMove, LedgerError> {
        if to.is_zero() || from.is_zero() {
            return Err(LedgerError::ZeroAddress);
        }
        if self.balance(&from) < gons {
            return Err(LedgerError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        Ok(GonMove {
            from: Some(from),
            to: Some(to),
            gons,
        })
    }

    /// Apply a validated movement and checkpoint the touched balances.
    ///
    /// Every new value is computed before anything is written; a movement that
    /// does not fit the current balances is an accounting bug and is reported
    /// as [`LedgerError::InvariantViolation`] with the ledger unchanged.
    pub fn apply(&mut self, mv: GonMove, block: BlockNumber) -> Result<(), LedgerError> {
        let broken = || LedgerError::InvariantViolation(format!("{mv:?} does not fit the gon ledger"));
        let mut total = self.total_gons;
        let mut writes: Vec<(Address, u128)> = Vec::with_capacity(2);

        match mv.from {
            Some(from) => {
                let balance = self.balance(&from).checked_sub(mv.gons).ok_or_else(broken)?;
                writes.push((from, balance));
            }
            None => total = total.checked_add(mv.gons).ok_or_else(broken)?,
        }
        match mv.to {
            Some(to) => {
                let base = writes
                    .iter()
                    .find(|(account, _)| *account == to)
                    .map_or_else(|| self.balance(&to), |(_, b)| *b);
                writes.push((to, base.checked_add(mv.gons).ok_or_else(broken)?));
            }
            None => total = total.checked_sub(mv.gons).ok_or_else(broken)?,
        }

        for (account, balance) in writes {
            self.balances.insert(account, balance);
            self.balance_history.entry(account).or_default().push(block, balance)?;
        }
        self.total_gons = total;
        if mv.from.is_none() || mv.to.is_none() {
            self.total_history.push(block, total)?;
        }
        Ok(())
    }

    /// Raw gon balance at the end of `block`.
    pub fn balance_at(&self, account: &Address, block: BlockNumber) -> u128 {
        self.balance_history
            .get(account)
            .and_then(|h| h.value_at(block))
            .unwrap_or(0)
    }

    /// Total gons at the end of `block`.
    pub fn total_at(&self, block: BlockNumber) -> u128 {
        self.total_history.value_at(block).unwrap_or(0)
    }

    pub fn balance_history(&self, account: &Address) -> Option<&History> {
        self.balance_history.get(account)
    }

    // ── Allowances ──────────────────────────────────────────────────────
    //
    // Allowances are denominated in visible tokens and do not change on rebase.

    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.allowances.get(&(*owner, *spender)).copied().unwrap_or(0)
    }

    pub fn set_allowance(&mut self, owner: Address, spender: Address, amount: u128) -> Result<(), LedgerError> {
        if owner.is_zero() || spender.is_zero() {
            return Err(LedgerError::ZeroAddress);
        }
        if amount == 0 {
            self.allowances.remove(&(owner, spender));
        } else {
            self.allowances.insert((owner, spender), amount);
        }
        Ok(())
    }

    /// Allowance left after `spender` spends `amount` of `owner`'s tokens.
    /// An unlimited allowance (`u128::MAX`) is never decremented.
    pub fn check_spend(&self, owner: &Address, spender: &Address, amount: u128) -> Result<u128, LedgerError> {
        let current = self.allowance(owner, spender);
        if current == u128::MAX {
            return Ok(current);
        }
        current
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientAllowance {
                needed: amount,
                available: current,
            })
    }

    /// Every account that has ever held a balance.
    pub fn accounts(&self) -> impl Iterator<Item = &Address> {
        self.balances.keys()
    }

    /// Sum of all balances, recomputed from scratch. Used for consistency checks.
    pub fn recompute_total(&self) -> Option<u128> {
        self.balances
            .values()
            .try_fold(0u128, |acc, b| acc.checked_add(*b))
    }
}
