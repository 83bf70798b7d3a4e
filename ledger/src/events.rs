//! Events emitted by successful ledger operations.

use serde::Serialize;
use tally_types::{Address, BlockNumber, Multiplier, SnapshotId};

use crate::access::Role;

/// Wire-visible side effects of ledger operations.
///
/// Amounts in `Transfer` and `Approval` are visible tokens; voting amounts are
/// gons, which do not change on rebase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// Tokens moved. `from` is zero for a mint, `to` is zero for a burn.
    Transfer {
        from: Address,
        to: Address,
        amount: u128,
    },
    Approval {
        owner: Address,
        spender: Address,
        amount: u128,
    },
    /// Voting power moved between holders. Zero on either side means the
    /// power entered or left the voting ledger.
    VoteTransfer {
        from: Address,
        to: Address,
        gons: u128,
    },
    /// An account's voting balance after a change.
    UpdatedVotes {
        account: Address,
        voting_gons: u128,
    },
    /// A primary delegate was set, or cleared (`delegatee` is zero).
    NewPrimaryDelegate {
        delegator: Address,
        delegatee: Address,
    },
    /// A partial delegation edge now carries `gons` (zero when removed).
    DelegatedVotes {
        delegator: Address,
        delegatee: Address,
        gons: u128,
    },
    NewInflationMultiplier {
        raw: u128,
        cumulative: Multiplier,
    },
    /// A capability was granted or revoked. Not emitted when the account already
    /// had the requested state.
    RoleUpdated {
        role: Role,
        account: Address,
        granted: bool,
    },
    AdminTransferred {
        previous: Address,
        admin: Address,
    },
    NewSnapshotBlock {
        snapshot_id: SnapshotId,
        block: BlockNumber,
    },
}

type Listener = Box<dyn Fn(&LedgerEvent) + Send + Sync>;

/// Synchronous fan-out event bus that also keeps an in-order log.
///
/// Listeners are invoked inline on the emitting thread. The log can be drained
/// by callers that poll instead of subscribing.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Listener>,
    log: Vec<LedgerEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    pub fn emit(&mut self, event: LedgerEvent) {
        for listener in &self.listeners {
            listener(&event);
        }
        self.log.push(event);
    }

    pub fn emit_all(&mut self, events: impl IntoIterator<Item = LedgerEvent>) {
        for event in events {
            self.emit(event);
        }
    }

    pub fn log(&self) -> &[LedgerEvent] {
        &self.log
    }

    pub fn drain(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.log)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .field("log", &self.log.len())
            .finish()
    }
}
