use soroban_sdk::{contracttype, Address, Env};

use crate::errors::DividendsError;
use crate::ledger::{LedgerState, StakeholderRecord};

const INSTANCE_LIFETIME_THRESHOLD: u32 = 17_280;
const INSTANCE_BUMP_AMOUNT: u32 = 86_400;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 120_960;
const PERSISTENT_BUMP_AMOUNT: u32 = 1_051_200;

/// Storage keys. Contract-wide configuration and the ledger live in instance
/// storage; per-stakeholder records and the slot index live in persistent storage.
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Owner address; the only identity allowed to change shares.
    Owner,
    /// Owner proposed through `propose_owner`, pending acceptance.
    PendingOwner,
    /// Native asset (Stellar Asset Contract) used for all payouts.
    NativeAsset,
    /// Global `LedgerState`.
    Ledger,
    /// Pause flag; blocks share changes and deposits.
    Paused,
    /// Number of live records (active, or removed with an unclaimed balance).
    RecordCount,
    /// Identity stored in slot `n`, `0 <= n < RecordCount`.
    RecordAt(u32),
    /// Slot of an identity's record.
    RecordSlot(Address),
    /// Per-identity `StakeholderRecord`.
    Stakeholder(Address),
    /// Set while an outbound transfer is in flight.
    TransferLock,
}

pub fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Owner)
}

pub fn get_owner(env: &Env) -> Result<Address, DividendsError> {
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .ok_or(DividendsError::NotInitialized)
}

pub fn set_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&DataKey::Owner, owner);
}

pub fn get_pending_owner(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::PendingOwner)
}

pub fn set_pending_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&DataKey::PendingOwner, owner);
}

pub fn clear_pending_owner(env: &Env) {
    env.storage().instance().remove(&DataKey::PendingOwner);
}

pub fn get_native_asset(env: &Env) -> Result<Address, DividendsError> {
    env.storage()
        .instance()
        .get(&DataKey::NativeAsset)
        .ok_or(DividendsError::NotInitialized)
}

pub fn set_native_asset(env: &Env, asset: &Address) {
    env.storage().instance().set(&DataKey::NativeAsset, asset);
}

pub fn get_ledger(env: &Env) -> Result<LedgerState, DividendsError> {
    env.storage()
        .instance()
        .get(&DataKey::Ledger)
        .ok_or(DividendsError::NotInitialized)
}

pub fn set_ledger(env: &Env, ledger: &LedgerState) {
    env.storage().instance().set(&DataKey::Ledger, ledger);
    bump_instance(env);
}

pub fn is_paused(env: &Env) -> bool {
    env.storage()
        .instance()
        .get::<DataKey, bool>(&DataKey::Paused)
        .unwrap_or(false)
}

pub fn set_paused(env: &Env, paused: bool) {
    env.storage().instance().set(&DataKey::Paused, &paused);
}

pub fn get_record(env: &Env, identity: &Address) -> Option<StakeholderRecord> {
    env.storage()
        .persistent()
        .get(&DataKey::Stakeholder(identity.clone()))
}

/// Persist `record`, or purge it (and its slot) once it is spent.
pub fn put_record(env: &Env, identity: &Address, record: &StakeholderRecord) {
    let key = DataKey::Stakeholder(identity.clone());
    let persistent = env.storage().persistent();
    if record.is_spent() {
        if persistent.has(&key) {
            persistent.remove(&key);
            release_slot(env, identity);
        }
        return;
    }

    if !persistent.has(&key) {
        let slot = get_record_count(env);
        set_slot(env, slot, identity);
        env.storage()
            .instance()
            .set(&DataKey::RecordCount, &(slot + 1));
    }
    persistent.set(&key, record);
    persistent.extend_ttl(&key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

pub fn get_record_count(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::RecordCount)
        .unwrap_or(0)
}

pub fn get_record_at(env: &Env, slot: u32) -> Option<Address> {
    env.storage().persistent().get(&DataKey::RecordAt(slot))
}

fn set_slot(env: &Env, slot: u32, identity: &Address) {
    let persistent = env.storage().persistent();
    let at_key = DataKey::RecordAt(slot);
    let slot_key = DataKey::RecordSlot(identity.clone());
    persistent.set(&at_key, identity);
    persistent.set(&slot_key, &slot);
    persistent.extend_ttl(&at_key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
    persistent.extend_ttl(&slot_key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// Free the slot of `identity`; the last slot moves into the gap.
fn release_slot(env: &Env, identity: &Address) {
    let persistent = env.storage().persistent();
    let slot_key = DataKey::RecordSlot(identity.clone());
    let Some(slot) = persistent.get::<DataKey, u32>(&slot_key) else {
        return;
    };
    let last = get_record_count(env).saturating_sub(1);
    if slot != last {
        if let Some(moved) = get_record_at(env, last) {
            set_slot(env, slot, &moved);
        }
    }
    persistent.remove(&DataKey::RecordAt(last));
    persistent.remove(&slot_key);
    env.storage().instance().set(&DataKey::RecordCount, &last);
}

pub fn is_transfer_locked(env: &Env) -> bool {
    env.storage().temporary().has(&DataKey::TransferLock)
}

pub fn set_transfer_lock(env: &Env) {
    env.storage().temporary().set(&DataKey::TransferLock, &true);
}

pub fn clear_transfer_lock(env: &Env) {
    env.storage().temporary().remove(&DataKey::TransferLock);
}
