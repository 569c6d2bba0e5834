//! Host-independent dividend accounting.
//!
//! The ledger keeps a cumulative `dividends_per_share` index scaled by
//! [`INDEX_SCALE`]. A deposit advances the index by `amount * SCALE / sold`;
//! a stakeholder's accrual since their last settlement is
//! `(index - settled_index) * shares / SCALE`. The remainders of both divisions
//! collect as scaled dust and become whole `undistributed` units, so nothing
//! deposited is stranded. Every operation is O(1) in the number of
//! stakeholders and the length of the deposit history.
//!
//! Nothing here touches `Env`: the contract loads a [`LedgerState`] and the
//! relevant [`StakeholderRecord`]s, calls into this module, and writes them back.

use soroban_sdk::contracttype;

/// Fixed-point scale of the distribution index.
pub const INDEX_SCALE: i128 = 1_000_000_000_000;

/// Deposits are refused below this many active stakeholders.
pub const MIN_DEPOSIT_STAKEHOLDERS: u32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedgerError {
    /// Zero shares assigned to an identity that holds none.
    ZeroShares,
    /// Deposit of a non-positive amount.
    ZeroAmount,
    /// Requested share count exceeds what the cap leaves for this identity.
    InsufficientShares { available: u64, requested: u64 },
    /// Adding one more stakeholder would pass the configured maximum.
    StakeholderLimit { max: u32 },
    NotEnoughStakeholders { active: u32 },
    NothingToClaim,
    Overflow,
}

/// Global accounting state, stored once per contract instance.
#[contracttype]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerState {
    /// Total shares that may ever be sold (fixed at initialization).
    pub shares_cap: u64,
    /// Maximum number of simultaneously active stakeholders.
    pub max_stakeholders: u32,
    /// Sum of all active stakeholders' shares.
    pub sold_shares: u64,
    /// Number of stakeholders with a nonzero share count.
    pub stakeholder_count: u32,
    /// Cumulative dividends per share since genesis, scaled by `INDEX_SCALE`.
    pub dividends_per_share: i128,
    /// Native balance owed to stakeholders and the owner.
    pub total_balance: i128,
    /// Whole units lost to floor division, withdrawable by the owner.
    pub undistributed: i128,
    /// Scaled remainder below one unit, carried into `undistributed`.
    pub undistributed_dust: i128,
    pub total_deposited: i128,
    pub total_released: i128,
}

/// Per-identity accounting entry.
#[contracttype]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StakeholderRecord {
    pub shares: u64,
    /// Value of `dividends_per_share` at the last settlement.
    pub settled_index: i128,
    /// Settled but not yet released dividends.
    pub claimable: i128,
}

impl StakeholderRecord {
    pub fn is_active(&self) -> bool {
        self.shares > 0
    }

    /// A record with no shares and nothing left to claim can be purged.
    pub fn is_spent(&self) -> bool {
        self.shares == 0 && self.claimable == 0
    }
}

/// Outcome of a single deposit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Accrual {
    pub index_delta: i128,
    /// Whole units moved from dust into `undistributed` by this deposit.
    pub undistributed_delta: i128,
}

impl LedgerState {
    pub fn new(shares_cap: u64, max_stakeholders: u32) -> Self {
        Self {
            shares_cap,
            max_stakeholders,
            sold_shares: 0,
            stakeholder_count: 0,
            dividends_per_share: 0,
            total_balance: 0,
            undistributed: 0,
            undistributed_dust: 0,
            total_deposited: 0,
            total_released: 0,
        }
    }

    pub fn available_shares(&self) -> u64 {
        self.shares_cap.saturating_sub(self.sold_shares)
    }

    /// Scaled accrual of `record` since its last settlement, split into whole
    /// units owed and the sub-unit remainder (still scaled).
    fn accrued(&self, record: &StakeholderRecord) -> Result<(i128, i128), LedgerError> {
        let delta = self
            .dividends_per_share
            .checked_sub(record.settled_index)
            .ok_or(LedgerError::Overflow)?;
        let scaled = delta
            .checked_mul(record.shares as i128)
            .ok_or(LedgerError::Overflow)?;
        Ok((scaled / INDEX_SCALE, scaled % INDEX_SCALE))
    }

    /// Dividends accrued by `record` since its last settlement.
    pub fn pending(&self, record: &StakeholderRecord) -> Result<i128, LedgerError> {
        Ok(self.accrued(record)?.0)
    }

    /// Settled balance plus pending accrual, without mutating anything.
    pub fn claimable(&self, record: &StakeholderRecord) -> Result<i128, LedgerError> {
        record
            .claimable
            .checked_add(self.pending(record)?)
            .ok_or(LedgerError::Overflow)
    }

    /// Shares `record` could hold at most, given everyone else's holdings.
    pub fn capacity_for(&self, record: &StakeholderRecord) -> Result<u64, LedgerError> {
        let committed = self
            .sold_shares
            .checked_sub(record.shares)
            .ok_or(LedgerError::Overflow)?;
        Ok(self.shares_cap.saturating_sub(committed))
    }

    /// Crystallize pending accrual at the record's current share count.
    /// The sub-unit remainder joins the undistributed dust. Returns the amount
    /// moved into `claimable`.
    pub fn settle(&mut self, record: &mut StakeholderRecord) -> Result<i128, LedgerError> {
        let (owed, remainder) = self.accrued(record)?;
        let claimable = record
            .claimable
            .checked_add(owed)
            .ok_or(LedgerError::Overflow)?;
        self.add_dust(remainder)?;
        record.claimable = claimable;
        record.settled_index = self.dividends_per_share;
        Ok(owed)
    }

    /// Add a scaled remainder to the dust, carrying whole units into
    /// `undistributed`. Returns the number of units carried.
    fn add_dust(&mut self, remainder: i128) -> Result<i128, LedgerError> {
        let dust = self
            .undistributed_dust
            .checked_add(remainder)
            .ok_or(LedgerError::Overflow)?;
        let carried = dust / INDEX_SCALE;
        self.undistributed = self
            .undistributed
            .checked_add(carried)
            .ok_or(LedgerError::Overflow)?;
        self.undistributed_dust = dust % INDEX_SCALE;
        Ok(carried)
    }

    /// Assign `shares` to `record`, settling at the previous count first.
    /// Returns the previous share count.
    pub fn change_shares(
        &mut self,
        record: &mut StakeholderRecord,
        shares: u64,
    ) -> Result<u64, LedgerError> {
        let previous = record.shares;
        if previous == 0 && shares == 0 {
            return Err(LedgerError::ZeroShares);
        }

        let available = self.capacity_for(record)?;
        if shares > available {
            return Err(LedgerError::InsufficientShares {
                available,
                requested: shares,
            });
        }

        let count = match (previous, shares) {
            (0, _) => {
                if self.stakeholder_count >= self.max_stakeholders {
                    return Err(LedgerError::StakeholderLimit {
                        max: self.max_stakeholders,
                    });
                }
                self.stakeholder_count + 1
            }
            (_, 0) => self.stakeholder_count - 1,
            _ => self.stakeholder_count,
        };

        let mut next = self.clone();
        let mut settled = record.clone();
        next.settle(&mut settled)?;
        settled.shares = shares;
        next.sold_shares = self.sold_shares - previous + shares;
        next.stakeholder_count = count;

        *self = next;
        *record = settled;
        Ok(previous)
    }

    /// Spread `amount` over all sold shares.
    pub fn accrue(&mut self, amount: i128) -> Result<Accrual, LedgerError> {
        if amount <= 0 {
            return Err(LedgerError::ZeroAmount);
        }
        if self.stakeholder_count < MIN_DEPOSIT_STAKEHOLDERS {
            return Err(LedgerError::NotEnoughStakeholders {
                active: self.stakeholder_count,
            });
        }

        // sold_shares > 0: every active stakeholder holds at least one share.
        let sold = self.sold_shares as i128;
        let scaled = amount
            .checked_mul(INDEX_SCALE)
            .ok_or(LedgerError::Overflow)?;
        let index_delta = scaled / sold;
        let remainder = scaled - index_delta * sold;

        let mut next = self.clone();
        next.dividends_per_share = next
            .dividends_per_share
            .checked_add(index_delta)
            .ok_or(LedgerError::Overflow)?;
        next.total_balance = next
            .total_balance
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        next.total_deposited = next
            .total_deposited
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        let undistributed_delta = next.add_dust(remainder)?;

        *self = next;
        Ok(Accrual {
            index_delta,
            undistributed_delta,
        })
    }

    /// Settle `record` and zero its claimable balance. Returns the amount to pay.
    /// Leaves both `self` and `record` untouched on error.
    pub fn release(&mut self, record: &mut StakeholderRecord) -> Result<i128, LedgerError> {
        let mut next = self.clone();
        let mut settled = record.clone();
        next.settle(&mut settled)?;

        let amount = settled.claimable;
        if amount <= 0 {
            return Err(LedgerError::NothingToClaim);
        }
        next.total_balance = next
            .total_balance
            .checked_sub(amount)
            .ok_or(LedgerError::Overflow)?;
        next.total_released = next
            .total_released
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;

        settled.claimable = 0;
        *self = next;
        *record = settled;
        Ok(amount)
    }

    /// Zero the undistributed remainder and return it.
    pub fn take_undistributed(&mut self) -> Result<i128, LedgerError> {
        let amount = self.undistributed;
        self.total_balance = self
            .total_balance
            .checked_sub(amount)
            .ok_or(LedgerError::Overflow)?;
        self.undistributed = 0;
        Ok(amount)
    }
}
