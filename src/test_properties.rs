#![cfg(test)]
//! Randomized operation sequences against the pure ledger.
extern crate std;

use arbitrary::{Arbitrary, Unstructured};
use std::vec::Vec;

use crate::ledger::{LedgerState, StakeholderRecord, INDEX_SCALE};

const IDENTITIES: usize = 6;
const SHARES_CAP: u64 = 1_000;
const MAX_STAKEHOLDERS: u32 = 4;

#[derive(Arbitrary, Debug)]
enum Op {
    SetShares { who: u8, shares: u16 },
    Deposit { amount: u32 },
    Claim { who: u8 },
    Sweep,
}

/// Deterministic byte stream for a seed (xorshift64).
fn seed_bytes(seed: u64, len: usize) -> Vec<u8> {
    let mut x = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1;
    (0..len)
        .map(|_| {
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            (x >> 24) as u8
        })
        .collect()
}

struct Model {
    state: LedgerState,
    records: [StakeholderRecord; IDENTITIES],
    deposited: i128,
    paid: i128,
    swept: i128,
}

impl Model {
    fn new() -> Self {
        Self {
            state: LedgerState::new(SHARES_CAP, MAX_STAKEHOLDERS),
            records: Default::default(),
            deposited: 0,
            paid: 0,
            swept: 0,
        }
    }

    fn apply(&mut self, op: &Op) {
        match *op {
            Op::SetShares { who, shares } => {
                let idx = who as usize % IDENTITIES;
                let mut state = self.state.clone();
                let mut record = self.records[idx].clone();
                if state
                    .change_shares(&mut record, shares as u64 % 400)
                    .is_ok()
                {
                    self.commit(idx, state, record);
                }
            }
            Op::Deposit { amount } => {
                let amount = amount as i128 % 100_000;
                let mut state = self.state.clone();
                if state.accrue(amount).is_ok() {
                    self.state = state;
                    self.deposited += amount;
                }
            }
            Op::Claim { who } => {
                let idx = who as usize % IDENTITIES;
                let mut state = self.state.clone();
                let mut record = self.records[idx].clone();
                if let Ok(amount) = state.release(&mut record) {
                    assert!(amount > 0);
                    self.paid += amount;
                    self.commit(idx, state, record);
                }
            }
            Op::Sweep => {
                let amount = self.state.take_undistributed().unwrap();
                self.swept += amount;
            }
        }
    }

    fn commit(&mut self, idx: usize, state: LedgerState, record: StakeholderRecord) {
        self.state = state;
        self.records[idx] = if record.is_spent() {
            StakeholderRecord::default()
        } else {
            record
        };
    }

    fn check(&self, previous_index: i128) {
        let state = &self.state;
        assert!(state.dividends_per_share >= previous_index);

        let sold: u64 = self.records.iter().map(|r| r.shares).sum();
        let active = self.records.iter().filter(|r| r.is_active()).count() as u32;
        assert_eq!(state.sold_shares, sold);
        assert_eq!(state.stakeholder_count, active);
        assert!(state.sold_shares <= state.shares_cap);
        assert!(state.stakeholder_count <= state.max_stakeholders);

        assert_eq!(state.total_balance, self.deposited - self.paid - self.swept);
        assert_eq!(state.total_deposited, self.deposited);
        assert_eq!(state.total_released, self.paid);

        let owed: i128 = self
            .records
            .iter()
            .map(|r| state.claimable(r).unwrap())
            .sum();
        assert!(owed >= 0);
        assert!(owed + state.undistributed <= state.total_balance);

        // Every scaled unit in the pool is settled, pending, or dust.
        assert!(state.undistributed_dust >= 0 && state.undistributed_dust < INDEX_SCALE);
        let accounted = self.records.iter().fold(
            state.undistributed * INDEX_SCALE + state.undistributed_dust,
            |acc, r| {
                acc + r.claimable * INDEX_SCALE
                    + (state.dividends_per_share - r.settled_index) * r.shares as i128
            },
        );
        assert_eq!(state.total_balance * INDEX_SCALE, accounted);
    }

    /// Remove every stakeholder, pay everyone out and sweep the remainder.
    fn drain(&mut self) {
        for idx in 0..IDENTITIES {
            if self.records[idx].is_active() {
                let mut state = self.state.clone();
                let mut record = self.records[idx].clone();
                state.change_shares(&mut record, 0).unwrap();
                self.commit(idx, state, record);
            }
        }
        for idx in 0..IDENTITIES {
            self.apply(&Op::Claim { who: idx as u8 });
        }
        self.apply(&Op::Sweep);
    }
}

fn run(seed: u64) {
    let bytes = seed_bytes(seed, 1_024);
    let mut u = Unstructured::new(&bytes);
    let mut model = Model::new();

    while let Ok(op) = Op::arbitrary(&mut u) {
        if u.is_empty() {
            break;
        }
        let previous_index = model.state.dividends_per_share;
        model.apply(&op);
        model.check(previous_index);
    }

    // Once every holder is removed and paid, the pool is empty.
    model.drain();
    model.check(model.state.dividends_per_share);
    assert!(model.records.iter().all(|r| *r == StakeholderRecord::default()));
    assert_eq!(model.state.total_balance, 0);
    assert_eq!(model.state.undistributed_dust, 0);
    assert_eq!(model.deposited, model.paid + model.swept);
}

#[test]
fn random_sequences_conserve_value() {
    for seed in 0..64 {
        run(seed);
    }
}

#[test]
fn claimable_never_decreases_without_release() {
    for seed in 100..132 {
        let bytes = seed_bytes(seed, 512);
        let mut u = Unstructured::new(&bytes);
        let mut model = Model::new();

        while let Ok(op) = Op::arbitrary(&mut u) {
            if u.is_empty() {
                break;
            }
            let before: Vec<i128> = model
                .records
                .iter()
                .map(|r| model.state.claimable(r).unwrap())
                .collect();
            model.apply(&op);
            for (idx, record) in model.records.iter().enumerate() {
                let released = matches!(op, Op::Claim { who } if who as usize % IDENTITIES == idx);
                if !released {
                    assert!(model.state.claimable(record).unwrap() >= before[idx]);
                }
            }
        }
    }
}
