#![no_std]
#![deny(unsafe_code)]
#![deny(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]

//! # Stakeholder Dividends Contract
//!
//! Tracks integer share counts for a bounded set of stakeholders and splits
//! every native-asset deposit between them pro rata to the shares held at the
//! moment of the deposit.
//!
//! ## Accrual model
//!
//! A deposit advances a global dividends-per-share index; each stakeholder's
//! balance is settled lazily from the index delta since their last snapshot.
//! Share changes settle the affected stakeholder at the old count first, so
//! entitlement earned before the change is neither lost nor double counted.
//! Floor-division remainders accumulate as "undistributed" value that only
//! the owner can withdraw.
//!
//! ## Roles
//!
//! - **Owner**: assigns shares and sweeps undistributed value. Never a stakeholder.
//! - **Stakeholder**: reads own shares and claimable balance, claims dividends.
//! - **Anyone**: deposits dividends and reads pool totals.

use soroban_sdk::{contract, contractimpl, contracttype, log, token, Address, Env, Vec};

mod errors;
mod events;
mod guard;
pub mod ledger;
mod storage;

pub use errors::DividendsError;
pub use ledger::{LedgerError, LedgerState, StakeholderRecord, INDEX_SCALE};

use guard::TransferGuard;

/// Contract version identifier. Bumped when storage or semantics change.
pub const CONTRACT_VERSION: u32 = 1;

/// Upper bound accepted for `max_stakeholders` at initialization.
pub const STAKEHOLDER_LIMIT: u32 = 25;

/// Maximum rows returned by one `get_stakeholders` page.
pub const MAX_PAGE_LIMIT: u32 = 20;

/// Row returned by `get_stakeholders`.
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct StakeholderView {
    pub identity: Address,
    pub shares: u64,
    /// Settled plus pending dividends.
    pub claimable: i128,
}

// ── Contract ─────────────────────────────────────────────────
#[contract]
pub struct DividendsContract;

#[contractimpl]
impl DividendsContract {
    fn require_owner(env: &Env, caller: &Address) -> Result<Address, DividendsError> {
        caller.require_auth();
        let owner = storage::get_owner(env)?;
        if *caller != owner {
            return Err(DividendsError::Unauthorized);
        }
        Ok(owner)
    }

    fn require_not_paused(env: &Env) -> Result<(), DividendsError> {
        if storage::is_paused(env) {
            return Err(DividendsError::Paused);
        }
        Ok(())
    }

    fn native_client(env: &Env) -> Result<token::Client, DividendsError> {
        let asset = storage::get_native_asset(env)?;
        Ok(token::Client::new(env, &asset))
    }

    /// Send `amount` of the native asset from the contract to `to`.
    /// Callers must have committed all state changes beforehand.
    fn pay_out(env: &Env, to: &Address, amount: i128) -> Result<(), DividendsError> {
        let client = Self::native_client(env)?;
        let _guard = TransferGuard::acquire(env)?;
        client.transfer(&env.current_contract_address(), to, &amount);
        Ok(())
    }

    /// Initialize the contract. Can only be called once.
    ///
    /// - `native_asset`: Stellar Asset Contract of the native settlement currency.
    /// - `total_shares`: share cap, must be greater than 1.
    /// - `max_stakeholders`: cap on active stakeholders, `2..=STAKEHOLDER_LIMIT`.
    pub fn initialize(
        env: Env,
        owner: Address,
        native_asset: Address,
        total_shares: u64,
        max_stakeholders: u32,
    ) -> Result<(), DividendsError> {
        if storage::is_initialized(&env) {
            return Err(DividendsError::AlreadyInitialized);
        }
        owner.require_auth();

        if total_shares <= 1 {
            return Err(DividendsError::InvalidConfig);
        }
        if !(2..=STAKEHOLDER_LIMIT).contains(&max_stakeholders) {
            return Err(DividendsError::InvalidConfig);
        }

        storage::set_owner(&env, &owner);
        storage::set_native_asset(&env, &native_asset);
        storage::set_paused(&env, false);
        storage::set_ledger(&env, &LedgerState::new(total_shares, max_stakeholders));

        events::initialized(&env, &owner, total_shares, max_stakeholders);
        Ok(())
    }

    // ── Share registry ─────────────────────────────────────────

    /// Register, alter or remove (`shares == 0`) a stakeholder. Owner only.
    ///
    /// The stakeholder is settled at the previous share count before the new
    /// count takes effect.
    ///
    /// # Errors
    /// - `Unauthorized`: caller is not the owner
    /// - `SelfDealing`: `identity` is the owner
    /// - `CapExceeded`: share cap or stakeholder cap would be exceeded. For the
    ///   share cap, the `available`/`requested` detail is written to the
    ///   diagnostic log only; `get_share_capacity` returns the same `available`.
    /// - `InvalidAmount`: zero shares for an identity without shares
    /// - `Paused`: contract is paused
    pub fn set_shares(
        env: Env,
        caller: Address,
        identity: Address,
        shares: u64,
    ) -> Result<(), DividendsError> {
        let owner = Self::require_owner(&env, &caller)?;
        Self::require_not_paused(&env)?;
        if identity == owner {
            return Err(DividendsError::SelfDealing);
        }

        let mut ledger = storage::get_ledger(&env)?;
        let mut record = storage::get_record(&env, &identity).unwrap_or_default();

        let previous = ledger
            .change_shares(&mut record, shares)
            .map_err(|err| {
                if let LedgerError::InsufficientShares {
                    available,
                    requested,
                } = err
                {
                    log!(
                        &env,
                        "insufficient shares: available {}, requested {}",
                        available,
                        requested
                    );
                }
                DividendsError::from(err)
            })?;

        storage::put_record(&env, &identity, &record);
        storage::set_ledger(&env, &ledger);

        events::share_changed(&env, &identity, previous, shares);
        Ok(())
    }

    /// Caller's own share count. Only active stakeholders may call this.
    pub fn get_own_shares(env: Env, caller: Address) -> Result<u64, DividendsError> {
        caller.require_auth();
        match storage::get_record(&env, &caller) {
            Some(record) if record.is_active() => Ok(record.shares),
            _ => Err(DividendsError::Unauthorized),
        }
    }

    /// Share count of any identity (0 if it holds none). Owner only.
    pub fn get_stakeholder_shares(
        env: Env,
        caller: Address,
        identity: Address,
    ) -> Result<u64, DividendsError> {
        Self::require_owner(&env, &caller)?;
        Ok(storage::get_record(&env, &identity)
            .map(|record| record.shares)
            .unwrap_or(0))
    }

    /// Return a page of stakeholder rows, starting at slot `start`. Owner only.
    /// `limit` is capped at `MAX_PAGE_LIMIT` (0 means the cap). The second value
    /// is the cursor for the next page, `None` once the last slot is reached.
    ///
    /// Removed stakeholders stay listed until their last balance is claimed.
    /// Slots follow registration order, except that purging a record moves
    /// the last slot into its place.
    pub fn get_stakeholders(
        env: Env,
        caller: Address,
        start: u32,
        limit: u32,
    ) -> Result<(Vec<StakeholderView>, Option<u32>), DividendsError> {
        Self::require_owner(&env, &caller)?;
        let ledger = storage::get_ledger(&env)?;
        let count = storage::get_record_count(&env);

        let effective_limit = if limit == 0 || limit > MAX_PAGE_LIMIT {
            MAX_PAGE_LIMIT
        } else {
            limit
        };
        if start >= count {
            return Ok((Vec::new(&env), None));
        }

        let end = core::cmp::min(start.saturating_add(effective_limit), count);
        let mut rows = Vec::new(&env);
        for slot in start..end {
            let Some(identity) = storage::get_record_at(&env, slot) else {
                continue;
            };
            if let Some(record) = storage::get_record(&env, &identity) {
                rows.push_back(StakeholderView {
                    claimable: ledger.claimable(&record)?,
                    shares: record.shares,
                    identity,
                });
            }
        }

        let next_cursor = if end < count { Some(end) } else { None };
        Ok((rows, next_cursor))
    }

    /// Number of stored records: active stakeholders plus removed ones that
    /// still hold an unclaimed balance.
    pub fn get_record_count(env: Env) -> u32 {
        storage::get_record_count(&env)
    }

    /// Largest share count `identity` could be assigned right now.
    /// Equals the `available` figure behind a `CapExceeded` share rejection.
    pub fn get_share_capacity(env: Env, identity: Address) -> Result<u64, DividendsError> {
        let ledger = storage::get_ledger(&env)?;
        let record = storage::get_record(&env, &identity).unwrap_or_default();
        Ok(ledger.capacity_for(&record)?)
    }

    /// Share cap fixed at initialization.
    pub fn get_total_shares(env: Env) -> Result<u64, DividendsError> {
        Ok(storage::get_ledger(&env)?.shares_cap)
    }

    /// Sum of all active stakeholders' shares.
    pub fn get_sold_shares(env: Env) -> Result<u64, DividendsError> {
        Ok(storage::get_ledger(&env)?.sold_shares)
    }

    pub fn get_available_shares(env: Env) -> Result<u64, DividendsError> {
        Ok(storage::get_ledger(&env)?.available_shares())
    }

    pub fn get_stakeholder_count(env: Env) -> Result<u32, DividendsError> {
        Ok(storage::get_ledger(&env)?.stakeholder_count)
    }

    pub fn get_max_stakeholders(env: Env) -> Result<u32, DividendsError> {
        Ok(storage::get_ledger(&env)?.max_stakeholders)
    }

    // ── Dividend ledger ────────────────────────────────────────

    /// Deposit `amount` of the native asset from `from` as dividends.
    ///
    /// Requires at least two active stakeholders. The amount is spread over all
    /// sold shares; the floor-division remainder goes to undistributed.
    pub fn deposit(env: Env, from: Address, amount: i128) -> Result<(), DividendsError> {
        from.require_auth();
        Self::require_not_paused(&env)?;

        let mut ledger = storage::get_ledger(&env)?;
        ledger.accrue(amount)?;
        storage::set_ledger(&env, &ledger);

        let client = Self::native_client(&env)?;
        client.transfer(&from, &env.current_contract_address(), &amount);

        events::dividends_accrued(&env, &from, amount);
        Ok(())
    }

    /// Pay out everything accrued for `stakeholder`. Returns the amount paid.
    ///
    /// A stakeholder removed after dividends accrued can still claim that
    /// balance once; the record is purged afterwards.
    ///
    /// # Errors
    /// - `Unauthorized`: `stakeholder` has no record
    /// - `NoDividendsDue`: nothing accrued since the last claim
    pub fn claim(env: Env, stakeholder: Address) -> Result<i128, DividendsError> {
        stakeholder.require_auth();

        let mut record =
            storage::get_record(&env, &stakeholder).ok_or(DividendsError::Unauthorized)?;
        let mut ledger = storage::get_ledger(&env)?;

        let amount = ledger.release(&mut record)?;
        storage::put_record(&env, &stakeholder, &record);
        storage::set_ledger(&env, &ledger);

        Self::pay_out(&env, &stakeholder, amount)?;

        events::dividends_released(&env, &stakeholder, amount);
        Ok(amount)
    }

    /// Dividends `caller` could claim right now.
    pub fn get_amount_to_claim(env: Env, caller: Address) -> Result<i128, DividendsError> {
        caller.require_auth();
        let record = storage::get_record(&env, &caller).ok_or(DividendsError::Unauthorized)?;
        let ledger = storage::get_ledger(&env)?;
        Ok(ledger.claimable(&record)?)
    }

    /// Transfer the undistributed remainder to the owner. Returns the amount.
    pub fn withdraw_undistributed(env: Env, caller: Address) -> Result<i128, DividendsError> {
        let owner = Self::require_owner(&env, &caller)?;

        let mut ledger = storage::get_ledger(&env)?;
        let amount = ledger.take_undistributed()?;
        storage::set_ledger(&env, &ledger);

        if amount > 0 {
            Self::pay_out(&env, &owner, amount)?;
        }

        events::dividends_withdrawn(&env, &owner, amount);
        Ok(amount)
    }

    /// Native balance held for stakeholders and the owner.
    pub fn get_total_balance(env: Env) -> Result<i128, DividendsError> {
        Ok(storage::get_ledger(&env)?.total_balance)
    }

    pub fn get_undistributed(env: Env) -> Result<i128, DividendsError> {
        Ok(storage::get_ledger(&env)?.undistributed)
    }

    /// Cumulative dividends per share, scaled by `INDEX_SCALE`.
    pub fn get_dividends_per_share(env: Env) -> Result<i128, DividendsError> {
        Ok(storage::get_ledger(&env)?.dividends_per_share)
    }

    pub fn get_total_deposited(env: Env) -> Result<i128, DividendsError> {
        Ok(storage::get_ledger(&env)?.total_deposited)
    }

    /// Lifetime dividends released to stakeholders (owner sweeps excluded).
    pub fn get_total_released(env: Env) -> Result<i128, DividendsError> {
        Ok(storage::get_ledger(&env)?.total_released)
    }

    // ── Administration ─────────────────────────────────────────

    /// Pause share changes and deposits (owner only). Idempotent.
    /// Claims and undistributed withdrawals stay available.
    pub fn pause(env: Env, caller: Address) -> Result<(), DividendsError> {
        let owner = Self::require_owner(&env, &caller)?;
        storage::set_paused(&env, true);
        events::paused(&env, &owner, true);
        Ok(())
    }

    /// Unpause the contract (owner only). Idempotent.
    pub fn unpause(env: Env, caller: Address) -> Result<(), DividendsError> {
        let owner = Self::require_owner(&env, &caller)?;
        storage::set_paused(&env, false);
        events::paused(&env, &owner, false);
        Ok(())
    }

    pub fn is_paused(env: Env) -> bool {
        storage::is_paused(&env)
    }

    /// Propose a new owner. Takes effect when `new_owner` calls `accept_owner`.
    /// Fails with `SelfDealing` if `new_owner` holds a stakeholder record.
    pub fn propose_owner(
        env: Env,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), DividendsError> {
        let owner = Self::require_owner(&env, &caller)?;
        if new_owner == owner {
            return Err(DividendsError::InvalidConfig);
        }
        if storage::get_record(&env, &new_owner).is_some() {
            return Err(DividendsError::SelfDealing);
        }

        storage::set_pending_owner(&env, &new_owner);
        events::owner_proposed(&env, &owner, &new_owner);
        Ok(())
    }

    /// Accept a pending ownership transfer. Must be called by the proposed owner.
    pub fn accept_owner(env: Env, new_owner: Address) -> Result<(), DividendsError> {
        new_owner.require_auth();
        let pending = storage::get_pending_owner(&env).ok_or(DividendsError::NoTransferPending)?;
        if pending != new_owner {
            return Err(DividendsError::Unauthorized);
        }
        // Shares may have been assigned after the proposal.
        if storage::get_record(&env, &new_owner).is_some() {
            return Err(DividendsError::SelfDealing);
        }

        let previous = storage::get_owner(&env)?;
        storage::set_owner(&env, &new_owner);
        storage::clear_pending_owner(&env);

        events::owner_accepted(&env, &previous, &new_owner);
        Ok(())
    }

    /// Cancel a pending ownership transfer (owner only).
    pub fn cancel_owner_transfer(env: Env, caller: Address) -> Result<(), DividendsError> {
        let owner = Self::require_owner(&env, &caller)?;
        let pending = storage::get_pending_owner(&env).ok_or(DividendsError::NoTransferPending)?;
        storage::clear_pending_owner(&env);
        events::owner_transfer_cancelled(&env, &owner, &pending);
        Ok(())
    }

    pub fn get_owner(env: Env) -> Result<Address, DividendsError> {
        storage::get_owner(&env)
    }

    pub fn get_pending_owner(env: Env) -> Option<Address> {
        storage::get_pending_owner(&env)
    }

    pub fn get_native_asset(env: Env) -> Result<Address, DividendsError> {
        storage::get_native_asset(&env)
    }

    /// Return the current contract version.
    pub fn get_version(env: Env) -> u32 {
        let _ = env;
        CONTRACT_VERSION
    }
}

mod test_auth;
mod test_properties;
