//! JSON operation scripts and the replay summary.
//!
//! A script is a JSON array of steps, each tagged with `"op"` and naming the
//! calling account:
//!
//! ```json
//! [
//!   { "op": "mint", "caller": "0xab…", "to": "0x01…", "amount": 1000 },
//!   { "op": "enable_voting", "caller": "0x01…" },
//!   { "op": "advance_blocks", "count": 1 },
//!   { "op": "snapshot", "caller": "0xab…" }
//! ]
//! ```
//!
//! Amounts are plain JSON integers, so they are limited to 64 bits here even
//! though the ledger itself works in `u128`.

use serde::{Deserialize, Serialize};
use tally_ledger::{Ledger, LedgerError, Role};
use tally_types::{Address, BlockNumber, SnapshotId};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Mint { caller: Address, to: Address, amount: u64 },
    Burn { caller: Address, holder: Address, amount: u64 },
    Transfer { caller: Address, to: Address, amount: u64 },
    TransferFrom { caller: Address, from: Address, to: Address, amount: u64 },
    Approve { caller: Address, spender: Address, amount: u64 },
    IncreaseAllowance { caller: Address, spender: Address, amount: u64 },
    DecreaseAllowance { caller: Address, spender: Address, amount: u64 },
    /// `raw` is fixed point with denominator 10^18.
    Rebase { caller: Address, raw: u64 },
    EnableVoting { caller: Address },
    EnableDelegationTo { caller: Address },
    DisableDelegationTo { caller: Address },
    ReenableDelegating { caller: Address },
    Delegate { caller: Address, to: Address },
    Undelegate { caller: Address },
    RevokeDelegation { caller: Address, delegator: Address },
    DelegateAmount { caller: Address, to: Address, amount: u64 },
    UndelegateFromAddress { caller: Address, to: Address },
    UndelegateAmountFromAddress { caller: Address, to: Address, amount: u64 },
    Snapshot { caller: Address },
    UpdateRole { caller: Address, role: Role, account: Address, granted: bool },
    TransferAdmin { caller: Address, admin: Address },
    AdvanceBlocks { count: u64 },
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Mint { .. } => "mint",
            Step::Burn { .. } => "burn",
            Step::Transfer { .. } => "transfer",
            Step::TransferFrom { .. } => "transfer_from",
            Step::Approve { .. } => "approve",
            Step::IncreaseAllowance { .. } => "increase_allowance",
            Step::DecreaseAllowance { .. } => "decrease_allowance",
            Step::Rebase { .. } => "rebase",
            Step::EnableVoting { .. } => "enable_voting",
            Step::EnableDelegationTo { .. } => "enable_delegation_to",
            Step::DisableDelegationTo { .. } => "disable_delegation_to",
            Step::ReenableDelegating { .. } => "reenable_delegating",
            Step::Delegate { .. } => "delegate",
            Step::Undelegate { .. } => "undelegate",
            Step::RevokeDelegation { .. } => "revoke_delegation",
            Step::DelegateAmount { .. } => "delegate_amount",
            Step::UndelegateFromAddress { .. } => "undelegate_from_address",
            Step::UndelegateAmountFromAddress { .. } => "undelegate_amount_from_address",
            Step::Snapshot { .. } => "snapshot",
            Step::UpdateRole { .. } => "update_role",
            Step::TransferAdmin { .. } => "transfer_admin",
            Step::AdvanceBlocks { .. } => "advance_blocks",
        }
    }

    /// Run the step against `ledger`. A failing step leaves the ledger as it was.
    pub fn apply(&self, ledger: &mut Ledger) -> Result<(), LedgerError> {
        match *self {
            Step::Mint { caller, to, amount } => ledger.mint(caller, to, u128::from(amount)),
            Step::Burn { caller, holder, amount } => ledger.burn(caller, holder, u128::from(amount)),
            Step::Transfer { caller, to, amount } => ledger.transfer(caller, to, u128::from(amount)),
            Step::TransferFrom { caller, from, to, amount } => ledger.transfer_from(caller, from, to, u128::from(amount)),
            Step::Approve { caller, spender, amount } => ledger.approve(caller, spender, u128::from(amount)),
            Step::IncreaseAllowance { caller, spender, amount } => {
                ledger.increase_allowance(caller, spender, u128::from(amount))
            }
            Step::DecreaseAllowance { caller, spender, amount } => {
                ledger.decrease_allowance(caller, spender, u128::from(amount))
            }
            Step::Rebase { caller, raw } => ledger.rebase(caller, u128::from(raw)).map(|_| ()),
            Step::EnableVoting { caller } => ledger.enable_voting(caller),
            Step::EnableDelegationTo { caller } => ledger.enable_delegation_to(caller),
            Step::DisableDelegationTo { caller } => ledger.disable_delegation_to(caller),
            Step::ReenableDelegating { caller } => ledger.reenable_delegating(caller),
            Step::Delegate { caller, to } => ledger.delegate(caller, to),
            Step::Undelegate { caller } => ledger.undelegate(caller),
            Step::RevokeDelegation { caller, delegator } => ledger.revoke_delegation(caller, delegator),
            Step::DelegateAmount { caller, to, amount } => ledger.delegate_amount(caller, to, u128::from(amount)),
            Step::UndelegateFromAddress { caller, to } => ledger.undelegate_from_address(caller, to),
            Step::UndelegateAmountFromAddress { caller, to, amount } => {
                ledger.undelegate_amount_from_address(caller, to, u128::from(amount))
            }
            Step::Snapshot { caller } => ledger.snapshot(caller).map(|_| ()),
            Step::UpdateRole { caller, role, account, granted } => {
                ledger.update_role(caller, role, account, granted)
            }
            Step::TransferAdmin { caller, admin } => ledger.transfer_admin(caller, admin),
            Step::AdvanceBlocks { count } => {
                ledger.advance_blocks(count);
                Ok(())
            }
        }
    }
}

/// Per-account state printed after a replay.
#[derive(Debug, Serialize)]
pub struct AccountSummary {
    pub address: Address,
    pub balance: u128,
    pub gons: u128,
    pub voting_power: u128,
    pub is_voter: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_delegate: Option<Address>,
}

#[derive(Debug, Serialize)]
pub struct ReplaySummary {
    pub block: BlockNumber,
    pub multiplier: String,
    pub total_supply: u128,
    pub total_voting_gons: u128,
    pub snapshot_id: SnapshotId,
    pub applied: usize,
    pub reverted: usize,
    pub accounts: Vec<AccountSummary>,
}

impl ReplaySummary {
    pub fn collect(ledger: &Ledger, applied: usize, reverted: usize) -> Self {
        let accounts = ledger
            .known_accounts()
            .into_iter()
            .map(|address| AccountSummary {
                address,
                balance: ledger.balance_of(&address),
                gons: ledger.gon_balance_of(&address),
                voting_power: ledger.vote_balance_of(&address),
                is_voter: ledger.is_voter(&address),
                primary_delegate: ledger.primary_delegate(&address),
            })
            .collect();
        Self {
            block: ledger.current_block(),
            multiplier: ledger.inflation_multiplier().to_string(),
            total_supply: ledger.total_supply(),
            total_voting_gons: ledger.total_voting_gons(),
            snapshot_id: ledger.current_snapshot_id(),
            applied,
            reverted,
            accounts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_ledger::LedgerConfig;

    const ADMIN: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const ALICE: &str = "0x0101010101010101010101010101010101010101";

    fn parse(json: &str) -> Vec<Step> {
        serde_json::from_str(json).expect("valid script")
    }

    #[test]
    fn steps_parse_from_tagged_json() {
        let steps = parse(&format!(
            r#"[
                {{ "op": "mint", "caller": "{ADMIN}", "to": "{ALICE}", "amount": 5 }},
                {{ "op": "update_role", "caller": "{ADMIN}", "role": "minter", "account": "{ALICE}", "granted": true }},
                {{ "op": "advance_blocks", "count": 2 }}
            ]"#
        ));
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].name(), "mint");
        assert!(matches!(steps[1], Step::UpdateRole { role: Role::Minter, granted: true, .. }));
        assert_eq!(steps[2], Step::AdvanceBlocks { count: 2 });
    }

    #[test]
    fn unknown_op_is_rejected() {
        let result: Result<Vec<Step>, _> = serde_json::from_str(r#"[{ "op": "pause" }]"#);
        assert!(result.is_err());
    }

    #[test]
    fn steps_drive_the_ledger() {
        let admin: Address = ADMIN.parse().unwrap();
        let alice: Address = ALICE.parse().unwrap();
        let mut ledger = Ledger::new(&LedgerConfig::with_admin(admin)).unwrap();

        let steps = parse(&format!(
            r#"[
                {{ "op": "update_role", "caller": "{ADMIN}", "role": "minter", "account": "{ADMIN}", "granted": true }},
                {{ "op": "enable_voting", "caller": "{ALICE}" }},
                {{ "op": "mint", "caller": "{ADMIN}", "to": "{ALICE}", "amount": 1000 }},
                {{ "op": "transfer", "caller": "{ALICE}", "to": "{ADMIN}", "amount": 5000 }}
            ]"#
        ));
        let results: Vec<bool> = steps.iter().map(|s| s.apply(&mut ledger).is_ok()).collect();
        assert_eq!(results, vec![true, true, true, false]);

        let summary = ReplaySummary::collect(&ledger, 3, 1);
        assert_eq!(summary.total_supply, 1000);
        let alice_summary = summary.accounts.iter().find(|a| a.address == alice).unwrap();
        assert_eq!(alice_summary.voting_power, 1000);
        assert!(alice_summary.is_voter);

        // Gon values exceed 64 bits, so check the text form.
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"reverted\":1"));
        assert!(json.contains(&format!("\"gons\":{}", 1000 * tally_types::DENOMINATOR)));
    }
}
