use tally_types::{Address, BlockNumber, TypesError};
use thiserror::Error;

/// Every way a ledger operation can revert.
///
/// All errors are whole-operation reverts: when a mutating call returns `Err`,
/// no balance, delegation edge, checkpoint, or event has been written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    // ── Authorization ───────────────────────────────────────────────────
    #[error("{caller} lacks the {role} capability")]
    Unauthorized { caller: Address, role: &'static str },

    // ── Invariant violations ────────────────────────────────────────────
    #[error("rebase factor must be non-zero")]
    ZeroRebase,

    #[error("the zero address is not a valid account here")]
    ZeroAddress,

    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("cannot delegate to self")]
    SelfDelegation,

    #[error("{0} has not enabled delegation to their address")]
    DelegationNotEnabled(Address),

    #[error("delegation too complicated: primary and partial delegation cannot be mixed")]
    DelegationTooComplicated,

    #[error("transfer too complicated: {needed} gons exceed the undelegated remainder of {available}")]
    TransferTooComplicated { needed: u128, available: u128 },

    #[error("insufficient undelegated balance: need {needed} gons, have {available}")]
    InsufficientUndelegatedBalance { needed: u128, available: u128 },

    #[error("cannot undelegate {requested} gons from {delegatee}, only {delegated} delegated")]
    AmountExceedsDelegation {
        delegatee: Address,
        requested: u128,
        delegated: u128,
    },

    #[error("{0} is delegating their own votes and cannot receive delegation")]
    DelegateIsDelegating(Address),

    #[error("{0} accepts delegation and cannot delegate out until re-enabled")]
    DelegatingDisabled(Address),

    #[error("{0} holds delegated votes and cannot delegate further")]
    HasInboundDelegators(Address),

    // ── State violations ────────────────────────────────────────────────
    #[error("{0} is already a voter")]
    AlreadyVoter(Address),

    #[error("{0} is not a voter")]
    NotVoter(Address),

    #[error("{0} has no primary delegate")]
    NotDelegated(Address),

    #[error("{0} already has a primary delegate")]
    AlreadyDelegated(Address),

    #[error("undelegation must specify an address when delegating partial amounts")]
    MustSpecifyAddress,

    #[error("{0} uses primary delegation, undelegate instead")]
    WrongUndelegateMethod(Address),

    #[error("{delegator} has not delegated to {caller}")]
    NotYourDelegator { caller: Address, delegator: Address },

    #[error("no partial delegation from {delegator} to {delegatee}")]
    NoDelegationToAddress { delegator: Address, delegatee: Address },

    #[error("{0} still has primary delegators")]
    OutstandingDelegators(Address),

    #[error("{0} must disable delegation to their address first")]
    DelegationStillEnabled(Address),

    // ── Read timing ─────────────────────────────────────────────────────
    #[error("cannot read block {0} atomically: it is still being produced")]
    AtomicRead(BlockNumber),

    #[error("block {requested} is in the future (current block {current})")]
    FutureBlock {
        requested: BlockNumber,
        current: BlockNumber,
    },

    // ── Standard ledger errors ──────────────────────────────────────────
    #[error("insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("insufficient allowance: need {needed}, have {available}")]
    InsufficientAllowance { needed: u128, available: u128 },

    #[error("decreased allowance below zero")]
    AllowanceBelowZero,

    #[error("arithmetic overflow")]
    Overflow,

    // ── Checkpoints, config and persistence ─────────────────────────────
    #[error("checkpoint at block {block} precedes latest checkpoint at block {latest}")]
    NonMonotonicCheckpoint {
        block: BlockNumber,
        latest: BlockNumber,
    },

    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<TypesError> for LedgerError {
    fn from(e: TypesError) -> Self {
        match e {
            TypesError::ZeroMultiplier => LedgerError::ZeroRebase,
            TypesError::Overflow => LedgerError::Overflow,
            TypesError::InvalidAddress(s) => LedgerError::Config(format!("invalid address: {s}")),
        }
    }
}
