use soroban_sdk::contracterror;

use crate::ledger::LedgerError;

/// Contract error codes. Auth failures are signaled by host panic (require_auth).
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
#[repr(u32)]
pub enum DividendsError {
    /// Caller is not the owner, or not an active stakeholder for a stakeholder-only call.
    Unauthorized = 1,
    /// Share cap or stakeholder-count cap would be exceeded. The share
    /// shortfall is logged as a diagnostic, not carried in the error code.
    CapExceeded = 2,
    /// The owner cannot hold shares.
    SelfDealing = 3,
    /// Deposits need at least two active stakeholders.
    InsufficientStakeholders = 4,
    /// Nothing accrued for this stakeholder.
    NoDividendsDue = 5,
    /// Amount or share count must be positive here.
    InvalidAmount = 6,
    /// `initialize` was already called.
    AlreadyInitialized = 7,
    /// Contract is not initialized (owner not set).
    NotInitialized = 8,
    /// Deploy-time parameters are out of range.
    InvalidConfig = 9,
    /// Checked arithmetic overflowed.
    MathOverflow = 10,
    /// Contract is paused; share changes and deposits are disabled.
    Paused = 11,
    /// No ownership transfer is pending.
    NoTransferPending = 12,
    /// An outbound transfer is already in progress.
    Reentrant = 13,
}

impl From<LedgerError> for DividendsError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::ZeroShares | LedgerError::ZeroAmount => DividendsError::InvalidAmount,
            LedgerError::InsufficientShares { .. } | LedgerError::StakeholderLimit { .. } => {
                DividendsError::CapExceeded
            }
            LedgerError::NotEnoughStakeholders { .. } => DividendsError::InsufficientStakeholders,
            LedgerError::NothingToClaim => DividendsError::NoDividendsDue,
            LedgerError::Overflow => DividendsError::MathOverflow,
        }
    }
}
