//! Delegation graph: who holds each account's voting power.
//!
//! Each account is in exactly one mode:
//! - **Self**: its voting power stays with it (the default).
//! - **Primary**: all of it goes to a single delegate.
//! - **Partial**: fixed gon amounts go to one or more delegates and the
//!   remainder stays with the account.
//!
//! Delegation is one hop only. An account that holds anyone else's votes
//! (primary or partial) cannot delegate out, and an account that delegates out
//! cannot receive delegation, so there are never chains or cycles.
//!
//! Every mutation here validates first and returns the [`VoteShift`]s the
//! voting ledger must apply; the graph never touches voting balances itself.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tally_types::Address;

use crate::error::LedgerError;

/// A movement of voting gons from one holder to another.
///
/// `from == None` means the power is entering the voting ledger (e.g. a mint to
/// a voter, or an account enabling voting); `to == None` means it is leaving.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoteShift {
    pub from: Option<Address>,
    pub to: Option<Address>,
    pub gons: u128,
}

impl VoteShift {
    fn between(from: Address, to: Address, gons: u128) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            gons,
        }
    }
}

/// Public view of an account's delegation mode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DelegationMode {
    SelfDelegated,
    Primary { delegate: Address },
    Partial { delegations: BTreeMap<Address, u128> },
}

/// Per-account delegation state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDelegation {
    pub is_voter: bool,
    /// Others may name this account as their primary delegate.
    pub delegation_enabled: bool,
    /// Set when the account opens itself to delegation; cleared only by
    /// `reenable_delegating`. While set, the account cannot delegate out.
    pub delegating_disabled: bool,
    pub primary_delegate: Option<Address>,
    pub partial_delegations: BTreeMap<Address, u128>,
    /// Cached sum of `partial_delegations`.
    pub partial_total: u128,
    pub inbound_primary: BTreeSet<Address>,
    pub inbound_partial: BTreeMap<Address, u128>,
}

impl AccountDelegation {
    fn has_inbound(&self) -> bool {
        !self.inbound_primary.is_empty() || !self.inbound_partial.is_empty()
    }

    fn is_delegating(&self) -> bool {
        self.primary_delegate.is_some() || !self.partial_delegations.is_empty()
    }

    pub fn mode(&self) -> DelegationMode {
        if let Some(delegate) = self.primary_delegate {
            DelegationMode::Primary { delegate }
        } else if !self.partial_delegations.is_empty() {
            DelegationMode::Partial {
                delegations: self.partial_delegations.clone(),
            }
        } else {
            DelegationMode::SelfDelegated
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DelegationGraph {
    accounts: HashMap<Address, AccountDelegation>,
}

impl DelegationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, account: &Address) -> Option<&AccountDelegation> {
        self.accounts.get(account)
    }

    fn state(&self, account: &Address) -> AccountDelegation {
        self.accounts.get(account).cloned().unwrap_or_default()
    }

    fn entry(&mut self, account: Address) -> &mut AccountDelegation {
        self.accounts.entry(account).or_default()
    }

    pub fn is_voter(&self, account: &Address) -> bool {
        self.accounts.get(account).is_some_and(|s| s.is_voter)
    }

    pub fn delegation_enabled(&self, account: &Address) -> bool {
        self.accounts.get(account).is_some_and(|s| s.delegation_enabled)
    }

    pub fn primary_delegate(&self, account: &Address) -> Option<Address> {
        self.accounts.get(account).and_then(|s| s.primary_delegate)
    }

    pub fn delegated_amount(&self, from: &Address, to: &Address) -> u128 {
        self.accounts
            .get(from)
            .and_then(|s| s.partial_delegations.get(to).copied())
            .unwrap_or(0)
    }

    pub fn partial_total(&self, account: &Address) -> u128 {
        self.accounts.get(account).map_or(0, |s| s.partial_total)
    }

    pub fn mode(&self, account: &Address) -> DelegationMode {
        self.accounts
            .get(account)
            .map_or(DelegationMode::SelfDelegated, AccountDelegation::mode)
    }

    pub fn accounts(&self) -> impl Iterator<Item = (&Address, &AccountDelegation)> {
        self.accounts.iter()
    }

    /// The account currently holding the voting power attached to `account`'s
    /// own balance, or `None` for non-voters.
    ///
    /// For partial delegators this is the account itself: only the undelegated
    /// remainder moves with balance changes.
    pub fn vote_holder(&self, account: &Address) -> Option<Address> {
        let state = self.accounts.get(account)?;
        if !state.is_voter {
            return None;
        }
        Some(state.primary_delegate.unwrap_or(*account))
    }

    // ── Stage two of a balance mutation ─────────────────────────────────

    /// Plan the voting-power consequence of moving `gons` of balance.
    ///
    /// `from` carries the sender and its gon balance before the move; `None`
    /// for a mint. `to` is `None` for a burn. A sender with partial
    /// delegations can only spend its undelegated remainder.
    pub fn plan_balance_change(
        &self,
        from: Option<(Address, u128)>,
        to: Option<Address>,
        gons: u128,
    ) -> Result<Option<VoteShift>, LedgerError> {
        let from_holder = match from {
            Some((sender, balance)) => {
                let partial = self.partial_total(&sender);
                if partial > 0 {
                    let available = balance.saturating_sub(partial);
                    if gons > available {
                        return Err(LedgerError::TransferTooComplicated {
                            needed: gons,
                            available,
                        });
                    }
                }
                self.vote_holder(&sender)
            }
            None => None,
        };
        let to_holder = to.and_then(|r| self.vote_holder(&r));

        if gons == 0 || from_holder == to_holder {
            return Ok(None);
        }
        Ok(Some(VoteShift {
            from: from_holder,
            to: to_holder,
            gons,
        }))
    }

    // ── Voting opt-in and delegation toggles ────────────────────────────

    /// Opt `caller` in to voting. Its whole balance becomes voting power.
    pub fn enable_voting(&mut self, caller: Address, balance: u128) -> Result<Option<VoteShift>, LedgerError> {
        if caller.is_zero() {
            return Err(LedgerError::ZeroAddress);
        }
        if self.is_voter(&caller) {
            return Err(LedgerError::AlreadyVoter(caller));
        }
        self.entry(caller).is_voter = true;
        Ok((balance > 0).then_some(VoteShift {
            from: None,
            to: Some(caller),
            gons: balance,
        }))
    }

    pub fn enable_delegation_to(&mut self, caller: Address) -> Result<(), LedgerError> {
        let state = self.state(&caller);
        if !state.is_voter {
            return Err(LedgerError::NotVoter(caller));
        }
        if state.is_delegating() {
            return Err(LedgerError::DelegationTooComplicated);
        }
        let entry = self.entry(caller);
        entry.delegation_enabled = true;
        entry.delegating_disabled = true;
        Ok(())
    }

    /// Stop accepting new primary delegators. Existing ones are untouched.
    pub fn disable_delegation_to(&mut self, caller: Address) -> Result<(), LedgerError> {
        let state = self.state(&caller);
        if !state.is_voter {
            return Err(LedgerError::NotVoter(caller));
        }
        self.entry(caller).delegation_enabled = false;
        Ok(())
    }

    /// Allow a former delegatee to delegate out again once every primary
    /// delegator has left.
    pub fn reenable_delegating(&mut self, caller: Address) -> Result<(), LedgerError> {
        let state = self.state(&caller);
        if !state.is_voter {
            return Err(LedgerError::NotVoter(caller));
        }
        if state.delegation_enabled {
            return Err(LedgerError::DelegationStillEnabled(caller));
        }
        if !state.inbound_primary.is_empty() {
            return Err(LedgerError::OutstandingDelegators(caller));
        }
        self.entry(caller).delegating_disabled = false;
        Ok(())
    }

    // ── Primary delegation ──────────────────────────────────────────────

    fn check_can_delegate_out(&self, caller: &Address, state: &AccountDelegation) -> Result<(), LedgerError> {
        if !state.is_voter {
            return Err(LedgerError::NotVoter(*caller));
        }
        if state.delegating_disabled {
            return Err(LedgerError::DelegatingDisabled(*caller));
        }
        if state.has_inbound() {
            return Err(LedgerError::HasInboundDelegators(*caller));
        }
        Ok(())
    }

    /// Delegate all of `caller`'s voting power to `to`.
    pub fn delegate(&mut self, caller: Address, to: Address, balance: u128) -> Result<Option<VoteShift>, LedgerError> {
        if to.is_zero() {
            return Err(LedgerError::ZeroAddress);
        }
        if to == caller {
            return Err(LedgerError::SelfDelegation);
        }
        let state = self.state(&caller);
        if state.primary_delegate.is_some() {
            return Err(LedgerError::AlreadyDelegated(caller));
        }
        if !state.partial_delegations.is_empty() {
            return Err(LedgerError::DelegationTooComplicated);
        }
        self.check_can_delegate_out(&caller, &state)?;

        let target = self.state(&to);
        if !target.delegation_enabled {
            return Err(LedgerError::DelegationNotEnabled(to));
        }
        if target.is_delegating() {
            return Err(LedgerError::DelegateIsDelegating(to));
        }

        self.entry(caller).primary_delegate = Some(to);
        self.entry(to).inbound_primary.insert(caller);
        Ok((balance > 0).then(|| VoteShift::between(caller, to, balance)))
    }

    /// Return `caller`'s voting power from its primary delegate.
    pub fn undelegate(&mut self, caller: Address, balance: u128) -> Result<(Address, Option<VoteShift>), LedgerError> {
        let state = self.state(&caller);
        let Some(delegate) = state.primary_delegate else {
            if !state.partial_delegations.is_empty() {
                return Err(LedgerError::MustSpecifyAddress);
            }
            return Err(LedgerError::NotDelegated(caller));
        };
        Ok((delegate, self.clear_primary(caller, delegate, balance)))
    }

    /// Called by a delegatee to push `delegator` back to self-delegation.
    pub fn revoke_delegation(
        &mut self,
        caller: Address,
        delegator: Address,
        balance: u128,
    ) -> Result<Option<VoteShift>, LedgerError> {
        if self.primary_delegate(&delegator) != Some(caller) {
            return Err(LedgerError::NotYourDelegator { caller, delegator });
        }
        Ok(self.clear_primary(delegator, caller, balance))
    }

    fn clear_primary(&mut self, delegator: Address, delegate: Address, balance: u128) -> Option<VoteShift> {
        self.entry(delegator).primary_delegate = None;
        self.entry(delegate).inbound_primary.remove(&delegator);
        (balance > 0).then(|| VoteShift::between(delegate, delegator, balance))
    }

    // ── Partial delegation ──────────────────────────────────────────────

    /// Delegate `gons` of `caller`'s voting power to `to`, on top of any
    /// existing partial delegation to `to`.
    pub fn delegate_amount(
        &mut self,
        caller: Address,
        to: Address,
        gons: u128,
        balance: u128,
    ) -> Result<VoteShift, LedgerError> {
        if to.is_zero() {
            return Err(LedgerError::ZeroAddress);
        }
        if to == caller {
            return Err(LedgerError::SelfDelegation);
        }
        if gons == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        let state = self.state(&caller);
        if state.primary_delegate.is_some() {
            return Err(LedgerError::DelegationTooComplicated);
        }
        self.check_can_delegate_out(&caller, &state)?;

        let target = self.state(&to);
        if !target.is_voter {
            return Err(LedgerError::NotVoter(to));
        }
        if target.is_delegating() {
            return Err(LedgerError::DelegateIsDelegating(to));
        }

        let available = balance.saturating_sub(state.partial_total);
        if gons > available {
            return Err(LedgerError::InsufficientUndelegatedBalance {
                needed: gons,
                available,
            });
        }

        let out = self.entry(caller);
        *out.partial_delegations.entry(to).or_insert(0) += gons;
        out.partial_total += gons;
        *self.entry(to).inbound_partial.entry(caller).or_insert(0) += gons;
        Ok(VoteShift::between(caller, to, gons))
    }

    /// Remove `gons` (or, with `None`, all) of the partial delegation from
    /// `caller` to `to`. Returns the edge amount left afterwards.
    pub fn undelegate_amount(
        &mut self,
        caller: Address,
        to: Address,
        gons: Option<u128>,
    ) -> Result<(u128, VoteShift), LedgerError> {
        let state = self.state(&caller);
        if state.primary_delegate.is_some() {
            return Err(LedgerError::WrongUndelegateMethod(caller));
        }
        let Some(&delegated) = state.partial_delegations.get(&to) else {
            return Err(LedgerError::NoDelegationToAddress {
                delegator: caller,
                delegatee: to,
            });
        };
        let removed = gons.unwrap_or(delegated);
        if removed == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        if removed > delegated {
            return Err(LedgerError::AmountExceedsDelegation {
                delegatee: to,
                requested: removed,
                delegated,
            });
        }
        let remaining = delegated - removed;

        let out = self.entry(caller);
        out.partial_total -= removed;
        if remaining == 0 {
            out.partial_delegations.remove(&to);
        } else {
            out.partial_delegations.insert(to, remaining);
        }
        let inbound = self.entry(to);
        if remaining == 0 {
            inbound.inbound_partial.remove(&caller);
        } else {
            inbound.inbound_partial.insert(caller, remaining);
        }
        Ok((remaining, VoteShift::between(to, caller, removed)))
    }

    /// Check the graph's structural invariants. Used by consistency checks.
    pub fn verify(&self) -> Result<(), LedgerError> {
        let fail = |msg: String| Err(LedgerError::InvariantViolation(msg));
        for (account, state) in &self.accounts {
            if state.primary_delegate.is_some() && !state.partial_delegations.is_empty() {
                return fail(format!("{account} mixes primary and partial delegation"));
            }
            if state.is_delegating() && state.has_inbound() {
                return fail(format!("{account} is part of a delegation chain"));
            }
            if state.is_delegating() && !state.is_voter {
                return fail(format!("{account} delegates without being a voter"));
            }
            let sum: u128 = state.partial_delegations.values().sum();
            if sum != state.partial_total {
                return fail(format!("{account} partial total {} != {sum}", state.partial_total));
            }
            if let Some(delegate) = state.primary_delegate {
                if !self.state(&delegate).inbound_primary.contains(account) {
                    return fail(format!("{delegate} is missing inbound record for {account}"));
                }
            }
            for (to, gons) in &state.partial_delegations {
                if self.state(to).inbound_partial.get(account) != Some(gons) {
                    return fail(format!("{to} has a stale inbound partial record for {account}"));
                }
            }
            for from in &state.inbound_primary {
                if self.primary_delegate(from) != Some(*account) {
                    return fail(format!("{account} lists {from} as a delegator, but it is not"));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        Address::new([n; 20])
    }

    fn voters(ns: &[u8]) -> DelegationGraph {
        let mut g = DelegationGraph::new();
        for n in ns {
            g.enable_voting(addr(*n), 0).unwrap();
        }
        g
    }

    #[test]
    fn default_account_is_self_delegated_non_voter() {
        let g = DelegationGraph::new();
        assert!(!g.is_voter(&addr(1)));
        assert_eq!(g.mode(&addr(1)), DelegationMode::SelfDelegated);
        assert_eq!(g.vote_holder(&addr(1)), None);
    }

    #[test]
    fn enable_voting_twice_fails() {
        let mut g = DelegationGraph::new();
        let shift = g.enable_voting(addr(1), 500).unwrap();
        assert_eq!(
            shift,
            Some(VoteShift {
                from: None,
                to: Some(addr(1)),
                gons: 500
            })
        );
        assert_eq!(g.enable_voting(addr(1), 500).unwrap_err(), LedgerError::AlreadyVoter(addr(1)));
    }

    #[test]
    fn delegate_requires_enabled_target() {
        let mut g = voters(&[1, 2]);
        assert_eq!(
            g.delegate(addr(1), addr(2), 100).unwrap_err(),
            LedgerError::DelegationNotEnabled(addr(2))
        );
        g.enable_delegation_to(addr(2)).unwrap();
        let shift = g.delegate(addr(1), addr(2), 100).unwrap();
        assert_eq!(shift, Some(VoteShift::between(addr(1), addr(2), 100)));
        assert_eq!(g.primary_delegate(&addr(1)), Some(addr(2)));
        assert_eq!(g.vote_holder(&addr(1)), Some(addr(2)));
        g.verify().unwrap();
    }

    #[test]
    fn delegate_rejects_self_and_zero() {
        let mut g = voters(&[1]);
        assert_eq!(g.delegate(addr(1), addr(1), 1).unwrap_err(), LedgerError::SelfDelegation);
        assert_eq!(g.delegate(addr(1), Address::ZERO, 1).unwrap_err(), LedgerError::ZeroAddress);
    }

    #[test]
    fn non_voter_cannot_delegate() {
        let mut g = voters(&[2]);
        g.enable_delegation_to(addr(2)).unwrap();
        assert_eq!(g.delegate(addr(1), addr(2), 1).unwrap_err(), LedgerError::NotVoter(addr(1)));
    }

    #[test]
    fn delegatee_cannot_chain() {
        let mut g = voters(&[1, 2, 3]);
        g.enable_delegation_to(addr(2)).unwrap();
        g.enable_delegation_to(addr(3)).unwrap();
        g.delegate(addr(1), addr(2), 10).unwrap();

        // 2 opened itself to delegation, so it cannot delegate out.
        assert_eq!(
            g.delegate(addr(2), addr(3), 10).unwrap_err(),
            LedgerError::DelegatingDisabled(addr(2))
        );

        // Even after closing and trying to re-enable, the inbound delegator blocks it.
        g.disable_delegation_to(addr(2)).unwrap();
        assert_eq!(
            g.reenable_delegating(addr(2)).unwrap_err(),
            LedgerError::OutstandingDelegators(addr(2))
        );
    }

    #[test]
    fn partial_recipient_cannot_delegate_out() {
        let mut g = voters(&[1, 2, 3]);
        g.enable_delegation_to(addr(3)).unwrap();
        g.delegate_amount(addr(1), addr(2), 10, 100).unwrap();
        assert_eq!(
            g.delegate(addr(2), addr(3), 50).unwrap_err(),
            LedgerError::HasInboundDelegators(addr(2))
        );
        assert_eq!(
            g.delegate_amount(addr(2), addr(3), 5, 50).unwrap_err(),
            LedgerError::HasInboundDelegators(addr(2))
        );
    }

    #[test]
    fn cannot_delegate_to_a_delegating_account() {
        let mut g = voters(&[1, 2, 3]);
        g.delegate_amount(addr(2), addr(3), 10, 100).unwrap();
        assert_eq!(
            g.delegate_amount(addr(1), addr(2), 10, 100).unwrap_err(),
            LedgerError::DelegateIsDelegating(addr(2))
        );
    }

    #[test]
    fn disabling_keeps_existing_delegators() {
        let mut g = voters(&[1, 2, 3]);
        g.enable_delegation_to(addr(2)).unwrap();
        g.delegate(addr(1), addr(2), 10).unwrap();
        g.disable_delegation_to(addr(2)).unwrap();

        assert_eq!(g.primary_delegate(&addr(1)), Some(addr(2)));
        assert_eq!(
            g.delegate(addr(3), addr(2), 10).unwrap_err(),
            LedgerError::DelegationNotEnabled(addr(2))
        );
    }

    #[test]
    fn revoke_then_reenable() {
        let mut g = voters(&[1, 2]);
        g.enable_delegation_to(addr(2)).unwrap();
        g.delegate(addr(1), addr(2), 10).unwrap();
        g.disable_delegation_to(addr(2)).unwrap();

        let shift = g.revoke_delegation(addr(2), addr(1), 10).unwrap();
        assert_eq!(shift, Some(VoteShift::between(addr(2), addr(1), 10)));
        assert_eq!(g.primary_delegate(&addr(1)), None);

        g.reenable_delegating(addr(2)).unwrap();
        g.verify().unwrap();
    }

    #[test]
    fn reenable_requires_disable_first() {
        let mut g = voters(&[2]);
        g.enable_delegation_to(addr(2)).unwrap();
        assert_eq!(
            g.reenable_delegating(addr(2)).unwrap_err(),
            LedgerError::DelegationStillEnabled(addr(2))
        );
    }

    #[test]
    fn revoke_by_stranger_fails() {
        let mut g = voters(&[1, 2, 3]);
        g.enable_delegation_to(addr(2)).unwrap();
        g.delegate(addr(1), addr(2), 10).unwrap();
        assert_eq!(
            g.revoke_delegation(addr(3), addr(1), 10).unwrap_err(),
            LedgerError::NotYourDelegator {
                caller: addr(3),
                delegator: addr(1)
            }
        );
    }

    #[test]
    fn undelegate_errors_by_mode() {
        let mut g = voters(&[1, 2]);
        assert_eq!(g.undelegate(addr(1), 0).unwrap_err(), LedgerError::NotDelegated(addr(1)));
        g.delegate_amount(addr(1), addr(2), 10, 100).unwrap();
        assert_eq!(g.undelegate(addr(1), 100).unwrap_err(), LedgerError::MustSpecifyAddress);
    }

    #[test]
    fn modes_are_mutually_exclusive() {
        let mut g = voters(&[1, 2, 3]);
        g.enable_delegation_to(addr(3)).unwrap();

        g.delegate_amount(addr(1), addr(2), 10, 100).unwrap();
        assert_eq!(
            g.delegate(addr(1), addr(3), 100).unwrap_err(),
            LedgerError::DelegationTooComplicated
        );

        g.undelegate_amount(addr(1), addr(2), None).unwrap();
        g.delegate(addr(1), addr(3), 100).unwrap();
        assert_eq!(
            g.delegate_amount(addr(1), addr(2), 10, 100).unwrap_err(),
            LedgerError::DelegationTooComplicated
        );
        assert_eq!(
            g.undelegate_amount(addr(1), addr(2), Some(1)).unwrap_err(),
            LedgerError::WrongUndelegateMethod(addr(1))
        );
    }

    #[test]
    fn partial_amounts_accumulate_and_are_bounded() {
        let mut g = voters(&[1, 2, 3]);
        g.delegate_amount(addr(1), addr(2), 30, 100).unwrap();
        g.delegate_amount(addr(1), addr(2), 20, 100).unwrap();
        g.delegate_amount(addr(1), addr(3), 40, 100).unwrap();
        assert_eq!(g.delegated_amount(&addr(1), &addr(2)), 50);
        assert_eq!(g.partial_total(&addr(1)), 90);

        assert_eq!(
            g.delegate_amount(addr(1), addr(3), 11, 100).unwrap_err(),
            LedgerError::InsufficientUndelegatedBalance {
                needed: 11,
                available: 10
            }
        );
        g.verify().unwrap();
    }

    #[test]
    fn partial_undelegation_by_amount() {
        let mut g = voters(&[1, 2]);
        g.delegate_amount(addr(1), addr(2), 50, 100).unwrap();

        assert_eq!(
            g.undelegate_amount(addr(1), addr(2), Some(51)).unwrap_err(),
            LedgerError::AmountExceedsDelegation {
                delegatee: addr(2),
                requested: 51,
                delegated: 50
            }
        );

        let (left, shift) = g.undelegate_amount(addr(1), addr(2), Some(20)).unwrap();
        assert_eq!(left, 30);
        assert_eq!(shift, VoteShift::between(addr(2), addr(1), 20));
        assert_eq!(g.delegated_amount(&addr(1), &addr(2)), 30);

        let (left, _) = g.undelegate_amount(addr(1), addr(2), None).unwrap();
        assert_eq!(left, 0);
        assert_eq!(g.mode(&addr(1)), DelegationMode::SelfDelegated);
        assert_eq!(
            g.undelegate_amount(addr(1), addr(2), None).unwrap_err(),
            LedgerError::NoDelegationToAddress {
                delegator: addr(1),
                delegatee: addr(2)
            }
        );
        g.verify().unwrap();
    }

    #[test]
    fn balance_change_plans_follow_holders() {
        let mut g = voters(&[1, 2, 3]);
        g.enable_delegation_to(addr(3)).unwrap();
        g.delegate(addr(2), addr(3), 0).unwrap();

        // Voter 1 to non-voter 4: power leaves the voting ledger.
        let shift = g.plan_balance_change(Some((addr(1), 100)), Some(addr(4)), 10).unwrap();
        assert_eq!(
            shift,
            Some(VoteShift {
                from: Some(addr(1)),
                to: None,
                gons: 10
            })
        );

        // Mint to 2: power lands on its primary delegate 3.
        let shift = g.plan_balance_change(None, Some(addr(2)), 10).unwrap();
        assert_eq!(
            shift,
            Some(VoteShift {
                from: None,
                to: Some(addr(3)),
                gons: 10
            })
        );

        // 2 -> 3: both sides are held by 3, nothing moves.
        assert_eq!(g.plan_balance_change(Some((addr(2), 100)), Some(addr(3)), 10).unwrap(), None);

        // Non-voter to non-voter.
        assert_eq!(g.plan_balance_change(Some((addr(4), 100)), Some(addr(5)), 10).unwrap(), None);
    }

    #[test]
    fn partial_sender_limited_to_remainder() {
        let mut g = voters(&[1, 2]);
        g.delegate_amount(addr(1), addr(2), 500, 1000).unwrap();
        assert_eq!(
            g.plan_balance_change(Some((addr(1), 1000)), Some(addr(9)), 501).unwrap_err(),
            LedgerError::TransferTooComplicated {
                needed: 501,
                available: 500
            }
        );
        assert!(g.plan_balance_change(Some((addr(1), 1000)), Some(addr(9)), 500).is_ok());
        assert!(g.plan_balance_change(Some((addr(1), 1000)), None, 400).is_ok());
    }
}
