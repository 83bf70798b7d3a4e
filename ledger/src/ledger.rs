//! The ledger façade: one capability-checked API over every sub-ledger.
//!
//! Balance mutations run in two ordered stages. The gon ledger validates and
//! computes the gon movement, then the delegation graph plans which voting
//! holders gain or lose power. Both stages are validated before either is
//! written, so a failing call leaves no trace.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tally_types::{Address, BlockNumber, Multiplier, SnapshotId};
use tracing::{debug, info, warn};

use crate::access::{AccessControl, Role};
use crate::config::LedgerConfig;
use crate::delegation::{DelegationGraph, DelegationMode, VoteShift};
use crate::error::LedgerError;
use crate::events::{EventBus, LedgerEvent};
use crate::gons::{GonLedger, GonMove};
use crate::multiplier::MultiplierStore;
use crate::snapshot::{check_readable, SnapshotEngine};
use crate::voting::VotingLedger;

/// The rebasing token ledger with delegated voting power.
///
/// Every mutating method takes the calling account explicitly and either
/// applies completely or returns an error with nothing changed.
#[derive(Debug, Serialize, Deserialize)]
pub struct Ledger {
    current_block: BlockNumber,
    access: AccessControl,
    multiplier: MultiplierStore,
    gons: GonLedger,
    delegation: DelegationGraph,
    voting: VotingLedger,
    snapshots: SnapshotEngine,
    #[serde(skip)]
    events: EventBus,
}

impl Ledger {
    pub fn new(config: &LedgerConfig) -> Result<Self, LedgerError> {
        config.validate()?;
        let mut access = AccessControl::new(config.admin)?;
        let grants = [
            (Role::Minter, &config.minters),
            (Role::Burner, &config.burners),
            (Role::Rebaser, &config.rebasers),
            (Role::Snapshotter, &config.snapshotters),
        ];
        for (role, accounts) in grants {
            for account in accounts {
                access.set_role(&config.admin, role, *account, true)?;
            }
        }

        info!(
            admin = %config.admin,
            start_block = config.start_block,
            snapshot_lag = config.snapshot_lag,
            "ledger created"
        );
        Ok(Self {
            current_block: config.start_block,
            access,
            multiplier: MultiplierStore::new(config.multiplier()?, config.start_block),
            gons: GonLedger::new(),
            delegation: DelegationGraph::new(),
            voting: VotingLedger::new(),
            snapshots: SnapshotEngine::new(config.snapshot_lag),
            events: EventBus::new(),
        })
    }

    /// A ledger with default settings and `admin` as administrator.
    pub fn with_admin(admin: Address) -> Result<Self, LedgerError> {
        Self::new(&LedgerConfig::with_admin(admin))
    }

    // ── Block clock ─────────────────────────────────────────────────────

    /// The block currently being produced.
    pub fn current_block(&self) -> BlockNumber {
        self.current_block
    }

    /// Finish the current block and start the next one.
    pub fn advance_block(&mut self) -> BlockNumber {
        self.advance_blocks(1)
    }

    pub fn advance_blocks(&mut self, count: u64) -> BlockNumber {
        self.current_block = self.current_block.saturating_add(count);
        self.current_block
    }

    // ── Administration ──────────────────────────────────────────────────

    pub fn update_minters(&mut self, caller: Address, account: Address, granted: bool) -> Result<(), LedgerError> {
        self.update_role(caller, Role::Minter, account, granted)
    }

    pub fn update_burners(&mut self, caller: Address, account: Address, granted: bool) -> Result<(), LedgerError> {
        self.update_role(caller, Role::Burner, account, granted)
    }

    pub fn update_rebasers(&mut self, caller: Address, account: Address, granted: bool) -> Result<(), LedgerError> {
        self.update_role(caller, Role::Rebaser, account, granted)
    }

    pub fn update_snapshotters(&mut self, caller: Address, account: Address, granted: bool) -> Result<(), LedgerError> {
        self.update_role(caller, Role::Snapshotter, account, granted)
    }

    pub fn update_role(&mut self, caller: Address, role: Role, account: Address, granted: bool) -> Result<(), LedgerError> {
        match self.access.set_role(&caller, role, account, granted) {
            Ok(true) => {
                info!(%role, %account, granted, "role updated");
                self.events.emit(LedgerEvent::RoleUpdated { role, account, granted });
                Ok(())
            }
            Ok(false) => {
                debug!(%role, %account, granted, "role unchanged");
                Ok(())
            }
            Err(e) => {
                warn!(%caller, %role, %account, "rejected role update: {e}");
                Err(e)
            }
        }
    }

    pub fn transfer_admin(&mut self, caller: Address, new_admin: Address) -> Result<(), LedgerError> {
        let previous = self.access.admin();
        self.access.transfer_admin(&caller, new_admin)?;
        info!(%previous, admin = %new_admin, "admin transferred");
        self.events.emit(LedgerEvent::AdminTransferred {
            previous,
            admin: new_admin,
        });
        Ok(())
    }

    pub fn access(&self) -> &AccessControl {
        &self.access
    }

    pub fn has_role(&self, role: Role, account: &Address) -> bool {
        self.access.has_role(role, account)
    }

    // ── Internal commit helpers ─────────────────────────────────────────

    fn to_gons(&self, amount: u128) -> Result<u128, LedgerError> {
        Ok(self.multiplier.current().to_gons(amount)?)
    }

    fn apply_shift(&mut self, shift: VoteShift, events: &mut Vec<LedgerEvent>) -> Result<(), LedgerError> {
        let updated = self.voting.apply(shift, self.current_block)?;
        events.push(LedgerEvent::VoteTransfer {
            from: shift.from.unwrap_or(Address::ZERO),
            to: shift.to.unwrap_or(Address::ZERO),
            gons: shift.gons,
        });
        events.extend(
            updated
                .into_iter()
                .map(|(account, voting_gons)| LedgerEvent::UpdatedVotes { account, voting_gons }),
        );
        Ok(())
    }

    fn apply_optional_shift(&mut self, shift: Option<VoteShift>, events: &mut Vec<LedgerEvent>) -> Result<(), LedgerError> {
        match shift {
            Some(shift) => self.apply_shift(shift, events),
            None => Ok(()),
        }
    }

    fn commit_balance(
        &mut self,
        mv: GonMove,
        shift: Option<VoteShift>,
        mut events: Vec<LedgerEvent>,
    ) -> Result<(), LedgerError> {
        self.gons.apply(mv, self.current_block)?;
        self.apply_optional_shift(shift, &mut events)?;
        self.events.emit_all(events);
        Ok(())
    }

    fn plan_transfer(
        &self,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<(GonMove, Option<VoteShift>), LedgerError> {
        let gons = self.to_gons(amount)?;
        let mv = self
            .gons
            .check_transfer(from, to, gons, amount, self.balance_of(&from))?;
        let shift = self.delegation.plan_balance_change(
            Some((from, self.gons.balance(&from))),
            Some(to),
            gons,
        )?;
        Ok((mv, shift))
    }

    // ── Gon ledger ──────────────────────────────────────────────────────

    pub fn mint(&mut self, caller: Address, to: Address, amount: u128) -> Result<(), LedgerError> {
        self.access.require(Role::Minter, &caller)?;
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        let gons = self.to_gons(amount)?;
        let mv = self.gons.check_mint(to, gons)?;
        let shift = self.delegation.plan_balance_change(None, Some(to), gons)?;

        debug!(%to, amount, gons, "mint");
        self.commit_balance(
            mv,
            shift,
            vec![LedgerEvent::Transfer {
                from: Address::ZERO,
                to,
                amount,
            }],
        )
    }

    /// Burn `amount` of `holder`'s tokens. The holder may always burn its own
    /// tokens; anyone else needs the burner capability.
    pub fn burn(&mut self, caller: Address, holder: Address, amount: u128) -> Result<(), LedgerError> {
        if caller != holder {
            self.access.require(Role::Burner, &caller)?;
        }
        if holder.is_zero() {
            return Err(LedgerError::ZeroAddress);
        }
        let gons = self.to_gons(amount)?;
        let mv = self
            .gons
            .check_burn(holder, gons, amount, self.balance_of(&holder))?;
        let shift = self.delegation.plan_balance_change(
            Some((holder, self.gons.balance(&holder))),
            None,
            gons,
        )?;

        debug!(%holder, amount, gons, "burn");
        self.commit_balance(
            mv,
            shift,
            vec![LedgerEvent::Transfer {
                from: holder,
                to: Address::ZERO,
                amount,
            }],
        )
    }

    pub fn transfer(&mut self, caller: Address, to: Address, amount: u128) -> Result<(), LedgerError> {
        let (mv, shift) = self.plan_transfer(caller, to, amount)?;
        debug!(from = %caller, %to, amount, "transfer");
        self.commit_balance(
            mv,
            shift,
            vec![LedgerEvent::Transfer {
                from: caller,
                to,
                amount,
            }],
        )
    }

    /// Move `amount` from `from` to `to` on `from`'s behalf, spending the
    /// caller's allowance.
    pub fn transfer_from(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), LedgerError> {
        if caller.is_zero() {
            return Err(LedgerError::ZeroAddress);
        }
        let remaining = self.gons.check_spend(&from, &caller, amount)?;
        let (mv, shift) = self.plan_transfer(from, to, amount)?;

        debug!(spender = %caller, %from, %to, amount, "transfer_from");
        self.commit_balance(
            mv,
            shift,
            vec![LedgerEvent::Transfer { from, to, amount }],
        )?;
        self.gons.set_allowance(from, caller, remaining)
    }

    pub fn approve(&mut self, owner: Address, spender: Address, amount: u128) -> Result<(), LedgerError> {
        self.gons.set_allowance(owner, spender, amount)?;
        self.events.emit(LedgerEvent::Approval { owner, spender, amount });
        Ok(())
    }

    pub fn increase_allowance(&mut self, owner: Address, spender: Address, added: u128) -> Result<(), LedgerError> {
        let amount = self
            .gons
            .allowance(&owner, &spender)
            .checked_add(added)
            .ok_or(LedgerError::Overflow)?;
        self.approve(owner, spender, amount)
    }

    pub fn decrease_allowance(&mut self, owner: Address, spender: Address, subtracted: u128) -> Result<(), LedgerError> {
        let amount = self
            .gons
            .allowance(&owner, &spender)
            .checked_sub(subtracted)
            .ok_or(LedgerError::AllowanceBelowZero)?;
        self.approve(owner, spender, amount)
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.gons.allowance(owner, spender)
    }

    /// Compound `raw` (fixed point, denominator 10^18) into the cumulative
    /// multiplier. Every visible balance changes; no gon balance does.
    pub fn rebase(&mut self, caller: Address, raw: u128) -> Result<Multiplier, LedgerError> {
        self.access.require(Role::Rebaser, &caller)?;
        let next = self.multiplier.preview_rebase(raw)?;
        self.multiplier.apply(next, self.current_block)?;

        info!(raw, cumulative = %next, block = self.current_block, "rebase");
        self.events.emit(LedgerEvent::NewInflationMultiplier {
            raw,
            cumulative: next,
        });
        Ok(next)
    }

    pub fn balance_of(&self, account: &Address) -> u128 {
        self.multiplier.current().to_tokens(self.gons.balance(account))
    }

    pub fn gon_balance_of(&self, account: &Address) -> u128 {
        self.gons.balance(account)
    }

    pub fn total_supply(&self) -> u128 {
        self.multiplier.current().to_tokens(self.gons.total_gons())
    }

    pub fn total_gons(&self) -> u128 {
        self.gons.total_gons()
    }

    pub fn inflation_multiplier(&self) -> Multiplier {
        self.multiplier.current()
    }

    // ── Delegation ──────────────────────────────────────────────────────

    pub fn enable_voting(&mut self, caller: Address) -> Result<(), LedgerError> {
        let balance = self.gons.balance(&caller);
        let shift = self.delegation.enable_voting(caller, balance)?;
        debug!(%caller, balance, "voting enabled");
        let mut events = Vec::new();
        self.apply_optional_shift(shift, &mut events)?;
        self.events.emit_all(events);
        Ok(())
    }

    pub fn enable_delegation_to(&mut self, caller: Address) -> Result<(), LedgerError> {
        self.delegation.enable_delegation_to(caller)?;
        debug!(%caller, "delegation to address enabled");
        Ok(())
    }

    pub fn disable_delegation_to(&mut self, caller: Address) -> Result<(), LedgerError> {
        self.delegation.disable_delegation_to(caller)?;
        debug!(%caller, "delegation to address disabled");
        Ok(())
    }

    pub fn reenable_delegating(&mut self, caller: Address) -> Result<(), LedgerError> {
        self.delegation.reenable_delegating(caller)?;
        debug!(%caller, "delegating re-enabled");
        Ok(())
    }

    /// Hand all of the caller's voting power to `to`.
    pub fn delegate(&mut self, caller: Address, to: Address) -> Result<(), LedgerError> {
        let balance = self.gons.balance(&caller);
        let shift = self.delegation.delegate(caller, to, balance)?;
        debug!(delegator = %caller, delegatee = %to, balance, "primary delegation");

        let mut events = vec![LedgerEvent::NewPrimaryDelegate {
            delegator: caller,
            delegatee: to,
        }];
        self.apply_optional_shift(shift, &mut events)?;
        self.events.emit_all(events);
        Ok(())
    }

    pub fn undelegate(&mut self, caller: Address) -> Result<(), LedgerError> {
        let balance = self.gons.balance(&caller);
        let (previous, shift) = self.delegation.undelegate(caller, balance)?;
        debug!(delegator = %caller, delegatee = %previous, "primary delegation removed");

        let mut events = vec![LedgerEvent::NewPrimaryDelegate {
            delegator: caller,
            delegatee: Address::ZERO,
        }];
        self.apply_optional_shift(shift, &mut events)?;
        self.events.emit_all(events);
        Ok(())
    }

    /// Called by a primary delegatee to send `delegator`'s votes back.
    pub fn revoke_delegation(&mut self, caller: Address, delegator: Address) -> Result<(), LedgerError> {
        let balance = self.gons.balance(&delegator);
        let shift = self.delegation.revoke_delegation(caller, delegator, balance)?;
        debug!(delegatee = %caller, %delegator, "primary delegation revoked");

        let mut events = vec![LedgerEvent::NewPrimaryDelegate {
            delegator,
            delegatee: Address::ZERO,
        }];
        self.apply_optional_shift(shift, &mut events)?;
        self.events.emit_all(events);
        Ok(())
    }

    /// Delegate `amount` tokens' worth of voting power to `to`.
    pub fn delegate_amount(&mut self, caller: Address, to: Address, amount: u128) -> Result<(), LedgerError> {
        let gons = self.to_gons(amount)?;
        let balance = self.gons.balance(&caller);
        let shift = self.delegation.delegate_amount(caller, to, gons, balance)?;
        debug!(delegator = %caller, delegatee = %to, amount, gons, "partial delegation");

        let mut events = vec![LedgerEvent::DelegatedVotes {
            delegator: caller,
            delegatee: to,
            gons: self.delegation.delegated_amount(&caller, &to),
        }];
        self.apply_shift(shift, &mut events)?;
        self.events.emit_all(events);
        Ok(())
    }

    /// Remove the whole partial delegation from the caller to `to`.
    pub fn undelegate_from_address(&mut self, caller: Address, to: Address) -> Result<(), LedgerError> {
        self.undelegate_partial(caller, to, None)
    }

    /// Remove `amount` tokens' worth of the partial delegation to `to`.
    pub fn undelegate_amount_from_address(&mut self, caller: Address, to: Address, amount: u128) -> Result<(), LedgerError> {
        let gons = self.to_gons(amount)?;
        self.undelegate_partial(caller, to, Some(gons))
    }

    fn undelegate_partial(&mut self, caller: Address, to: Address, gons: Option<u128>) -> Result<(), LedgerError> {
        let (remaining, shift) = self.delegation.undelegate_amount(caller, to, gons)?;
        debug!(delegator = %caller, delegatee = %to, removed = shift.gons, remaining, "partial undelegation");

        let mut events = vec![LedgerEvent::DelegatedVotes {
            delegator: caller,
            delegatee: to,
            gons: remaining,
        }];
        self.apply_shift(shift, &mut events)?;
        self.events.emit_all(events);
        Ok(())
    }

    pub fn is_voter(&self, account: &Address) -> bool {
        self.delegation.is_voter(account)
    }

    pub fn delegation_enabled(&self, account: &Address) -> bool {
        self.delegation.delegation_enabled(account)
    }

    pub fn primary_delegate(&self, account: &Address) -> Option<Address> {
        self.delegation.primary_delegate(account)
    }

    pub fn delegation_mode(&self, account: &Address) -> DelegationMode {
        self.delegation.mode(account)
    }

    /// Gons partially delegated from `from` to `to`.
    pub fn delegated_gons(&self, from: &Address, to: &Address) -> u128 {
        self.delegation.delegated_amount(from, to)
    }

    /// Tokens' worth of voting power partially delegated from `from` to `to`.
    pub fn delegated_amount(&self, from: &Address, to: &Address) -> u128 {
        self.multiplier
            .current()
            .to_tokens(self.delegation.delegated_amount(from, to))
    }

    /// The part of `account`'s balance not partially delegated away.
    ///
    /// Zero while `account` has a primary delegate, since its whole balance
    /// then votes through that delegate.
    pub fn undelegated_balance(&self, account: &Address) -> u128 {
        if self.delegation.primary_delegate(account).is_some() {
            return 0;
        }
        let remainder = self
            .gons
            .balance(account)
            .saturating_sub(self.delegation.partial_total(account));
        self.multiplier.current().to_tokens(remainder)
    }

    // ── Voting power ────────────────────────────────────────────────────

    pub fn vote_balance_of(&self, account: &Address) -> u128 {
        self.multiplier
            .current()
            .to_tokens(self.voting.voting_gons(account))
    }

    pub fn voting_gons_of(&self, account: &Address) -> u128 {
        self.voting.voting_gons(account)
    }

    pub fn total_voting_gons(&self) -> u128 {
        self.voting.total_voting_gons()
    }

    /// Voting power of `account` at the end of `block`, which must already be
    /// fully produced.
    pub fn voting_power(&self, account: &Address, block: BlockNumber) -> Result<u128, LedgerError> {
        check_readable(block, self.current_block)?;
        Ok(self
            .multiplier
            .at_block(block)
            .to_tokens(self.voting.voting_gons_at(account, block)))
    }

    pub fn total_voting_power(&self, block: BlockNumber) -> Result<u128, LedgerError> {
        check_readable(block, self.current_block)?;
        Ok(self.multiplier.at_block(block).to_tokens(self.voting.total_at(block)))
    }

    pub fn past_balance(&self, account: &Address, block: BlockNumber) -> Result<u128, LedgerError> {
        check_readable(block, self.current_block)?;
        Ok(self
            .multiplier
            .at_block(block)
            .to_tokens(self.gons.balance_at(account, block)))
    }

    pub fn past_total_supply(&self, block: BlockNumber) -> Result<u128, LedgerError> {
        check_readable(block, self.current_block)?;
        Ok(self.multiplier.at_block(block).to_tokens(self.gons.total_at(block)))
    }

    // ── Snapshots ───────────────────────────────────────────────────────

    /// Advance the official snapshot. Returns the new snapshot id.
    pub fn snapshot(&mut self, caller: Address) -> Result<SnapshotId, LedgerError> {
        self.access.require(Role::Snapshotter, &caller)?;
        let (id, boundary) = self.snapshots.preview(self.current_block);
        let record = self.multiplier.record_snapshot(id, boundary)?;
        self.snapshots.take(self.current_block);

        info!(
            snapshot_id = id,
            boundary,
            multiplier = %record.multiplier,
            block = self.current_block,
            "snapshot taken"
        );
        self.events.emit(LedgerEvent::NewSnapshotBlock {
            snapshot_id: id,
            block: boundary,
        });
        Ok(id)
    }

    pub fn current_snapshot_id(&self) -> SnapshotId {
        self.snapshots.current_id()
    }

    pub fn current_snapshot_block(&self) -> Option<BlockNumber> {
        self.snapshots.boundary()
    }

    /// The boundary and multiplier snapshot reads use, or `None` before the
    /// first snapshot.
    fn snapshot_view(&self) -> Result<Option<(BlockNumber, Multiplier)>, LedgerError> {
        let Some(boundary) = self.snapshots.readable_boundary(self.current_block)? else {
            return Ok(None);
        };
        let multiplier = self
            .multiplier
            .for_snapshot(self.snapshots.current_id())
            .map_or_else(|| self.multiplier.at_block(boundary), |r| r.multiplier);
        Ok(Some((boundary, multiplier)))
    }

    /// Voting power of `account` at the current snapshot boundary.
    pub fn vote_balance_snapshot(&self, account: &Address) -> Result<u128, LedgerError> {
        Ok(self.snapshot_view()?.map_or(0, |(boundary, m)| {
            m.to_tokens(self.voting.voting_gons_at(account, boundary))
        }))
    }

    pub fn total_voting_power_snapshot(&self) -> Result<u128, LedgerError> {
        Ok(self
            .snapshot_view()?
            .map_or(0, |(boundary, m)| m.to_tokens(self.voting.total_at(boundary))))
    }

    pub fn balance_snapshot(&self, account: &Address) -> Result<u128, LedgerError> {
        Ok(self.snapshot_view()?.map_or(0, |(boundary, m)| {
            m.to_tokens(self.gons.balance_at(account, boundary))
        }))
    }

    pub fn total_supply_snapshot(&self) -> Result<u128, LedgerError> {
        Ok(self
            .snapshot_view()?
            .map_or(0, |(boundary, m)| m.to_tokens(self.gons.total_at(boundary))))
    }

    /// The multiplier recorded at the last snapshot boundary at or before
    /// `block`.
    pub fn get_past_linear_inflation(&self, block: BlockNumber) -> Multiplier {
        self.multiplier.past_linear_inflation(block)
    }

    // ── Events ──────────────────────────────────────────────────────────

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&LedgerEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    pub fn events(&self) -> &[LedgerEvent] {
        self.events.log()
    }

    pub fn drain_events(&mut self) -> Vec<LedgerEvent> {
        self.events.drain()
    }

    // ── Persistence and consistency ─────────────────────────────────────

    /// Every account the ledger has seen, in address order.
    pub fn known_accounts(&self) -> BTreeSet<Address> {
        self.gons
            .accounts()
            .chain(self.delegation.accounts().map(|(a, _)| a))
            .copied()
            .collect()
    }

    /// Serialize the full ledger state (without subscribers or the event log).
    pub fn save_state(&self) -> Result<Vec<u8>, LedgerError> {
        bincode::serialize(self).map_err(|e| LedgerError::Serialization(e.to_string()))
    }

    /// Restore a ledger from [`Ledger::save_state`] output and check it.
    pub fn load_state(data: &[u8]) -> Result<Self, LedgerError> {
        let ledger: Self =
            bincode::deserialize(data).map_err(|e| LedgerError::Serialization(e.to_string()))?;
        ledger.verify_invariants()?;
        Ok(ledger)
    }

    /// Recompute every derived quantity from scratch and compare with the
    /// incrementally maintained one.
    pub fn verify_invariants(&self) -> Result<(), LedgerError> {
        let fail = |msg: String| Err(LedgerError::InvariantViolation(msg));

        if self.gons.recompute_total() != Some(self.gons.total_gons()) {
            return fail("sum of gon balances differs from total gons".into());
        }
        self.delegation.verify()?;
        if self.voting.recompute_total() != Some(self.voting.total_voting_gons()) {
            return fail("sum of voting gons differs from total voting gons".into());
        }

        let mut expected: HashMap<Address, u128> = HashMap::new();
        let mut voter_gons = 0u128;
        for account in self.known_accounts() {
            let Some(state) = self.delegation.get(&account) else {
                continue;
            };
            if !state.is_voter {
                continue;
            }
            let balance = self.gons.balance(&account);
            if state.partial_total > balance {
                return fail(format!("{account} delegated more than it holds"));
            }
            voter_gons += balance;
            let holder = state.primary_delegate.unwrap_or(account);
            *expected.entry(holder).or_insert(0) += balance - state.partial_total;
            for (to, gons) in &state.partial_delegations {
                *expected.entry(*to).or_insert(0) += gons;
            }
        }
        if voter_gons != self.voting.total_voting_gons() {
            return fail(format!(
                "total voting gons {} differs from voter balances {voter_gons}",
                self.voting.total_voting_gons()
            ));
        }
        for (account, actual) in self.voting.accounts() {
            let want = expected.get(account).copied().unwrap_or(0);
            if *actual != want {
                return fail(format!("{account} holds {actual} voting gons, expected {want}"));
            }
        }
        for (account, want) in &expected {
            if self.voting.voting_gons(account) != *want {
                return fail(format!("{account} is missing {want} voting gons"));
            }
        }
        Ok(())
    }
}
