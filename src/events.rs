use soroban_sdk::{symbol_short, Address, Env, Symbol};

// ── Event symbols ────────────────────────────────────────────
pub const EVENT_INIT: Symbol = symbol_short!("init");
pub const EVENT_SHARE_CHANGED: Symbol = symbol_short!("shr_chg");
pub const EVENT_ACCRUED: Symbol = symbol_short!("accrued");
pub const EVENT_RELEASED: Symbol = symbol_short!("released");
pub const EVENT_WITHDRAWN: Symbol = symbol_short!("withdrawn");
pub const EVENT_PAUSED: Symbol = symbol_short!("paused");
pub const EVENT_UNPAUSED: Symbol = symbol_short!("unpaused");
pub const EVENT_OWNER_PROPOSED: Symbol = symbol_short!("own_prop");
pub const EVENT_OWNER_ACCEPTED: Symbol = symbol_short!("own_acc");
pub const EVENT_OWNER_CANCELLED: Symbol = symbol_short!("own_canc");

pub fn initialized(env: &Env, owner: &Address, shares_cap: u64, max_stakeholders: u32) {
    env.events()
        .publish((EVENT_INIT, owner.clone()), (shares_cap, max_stakeholders));
}

/// One event for registration, alteration and removal alike.
pub fn share_changed(env: &Env, identity: &Address, previous: u64, shares: u64) {
    env.events()
        .publish((EVENT_SHARE_CHANGED, identity.clone()), (previous, shares));
}

pub fn dividends_accrued(env: &Env, from: &Address, amount: i128) {
    env.events().publish((EVENT_ACCRUED, from.clone()), amount);
}

pub fn dividends_released(env: &Env, identity: &Address, amount: i128) {
    env.events()
        .publish((EVENT_RELEASED, identity.clone()), amount);
}

pub fn dividends_withdrawn(env: &Env, owner: &Address, amount: i128) {
    env.events().publish((EVENT_WITHDRAWN, owner.clone()), amount);
}

pub fn paused(env: &Env, owner: &Address, paused: bool) {
    let topic = if paused { EVENT_PAUSED } else { EVENT_UNPAUSED };
    env.events().publish((topic, owner.clone()), ());
}

pub fn owner_proposed(env: &Env, owner: &Address, proposed: &Address) {
    env.events()
        .publish((EVENT_OWNER_PROPOSED, owner.clone()), proposed.clone());
}

pub fn owner_accepted(env: &Env, previous: &Address, owner: &Address) {
    env.events()
        .publish((EVENT_OWNER_ACCEPTED, previous.clone()), owner.clone());
}

pub fn owner_transfer_cancelled(env: &Env, owner: &Address, proposed: &Address) {
    env.events()
        .publish((EVENT_OWNER_CANCELLED, owner.clone()), proposed.clone());
}
