#![cfg(test)]
extern crate std;

use soroban_sdk::{
    testutils::{Address as _, AuthorizedFunction, AuthorizedInvocation, MockAuth, MockAuthInvoke},
    Address, Env, IntoVal, Symbol,
};

use crate::{DividendsContract, DividendsContractClient};

fn make_client(env: &Env) -> DividendsContractClient<'_> {
    let id = env.register_contract(None, DividendsContract);
    DividendsContractClient::new(env, &id)
}

/// Initialize with only the owner's signature mocked for that call.
fn init_owner(env: &Env, client: &DividendsContractClient) -> Address {
    let owner = Address::generate(env);
    let asset = env
        .register_stellar_asset_contract_v2(Address::generate(env))
        .address();
    env.mock_auths(&[MockAuth {
        address: &owner,
        invoke: &MockAuthInvoke {
            contract: &client.address,
            fn_name: "initialize",
            args: (&owner, &asset, 100u64, 10u32).into_val(env),
            sub_invokes: &[],
        },
    }]);
    client.initialize(&owner, &asset, &100, &10);
    owner
}

/// Assign shares with the owner's signature mocked for exactly this call.
fn signed_set_shares(
    env: &Env,
    client: &DividendsContractClient,
    owner: &Address,
    identity: &Address,
    shares: u64,
) {
    env.mock_auths(&[MockAuth {
        address: owner,
        invoke: &MockAuthInvoke {
            contract: &client.address,
            fn_name: "set_shares",
            args: (owner, identity, shares).into_val(env),
            sub_invokes: &[],
        },
    }]);
    client.set_shares(owner, identity, &shares);
}

#[test]
fn initialize_requires_owner_signature() {
    let env = Env::default();
    let client = make_client(&env);
    let owner = Address::generate(&env);
    let asset = Address::generate(&env);
    assert!(client.try_initialize(&owner, &asset, &100, &10).is_err());
    assert!(client.try_get_owner().is_err());
}

#[test]
fn set_shares_requires_owner_signature() {
    let env = Env::default();
    let client = make_client(&env);
    let owner = init_owner(&env, &client);
    let holder = Address::generate(&env);

    assert!(client.try_set_shares(&owner, &holder, &10).is_err());
    assert_eq!(client.get_sold_shares(), 0);

    signed_set_shares(&env, &client, &owner, &holder, 10);
    assert_eq!(client.get_sold_shares(), 10);
}

#[test]
fn set_shares_records_owner_authorization() {
    let env = Env::default();
    let client = make_client(&env);
    let owner = init_owner(&env, &client);
    let holder = Address::generate(&env);

    env.mock_all_auths();
    client.set_shares(&owner, &holder, &25);

    assert_eq!(
        env.auths(),
        std::vec![(
            owner.clone(),
            AuthorizedInvocation {
                function: AuthorizedFunction::Contract((
                    client.address.clone(),
                    Symbol::new(&env, "set_shares"),
                    (&owner, &holder, 25u64).into_val(&env),
                )),
                sub_invocations: std::vec![],
            }
        )]
    );
}

#[test]
fn own_share_lookup_requires_signature() {
    let env = Env::default();
    let client = make_client(&env);
    let owner = init_owner(&env, &client);
    let holder = Address::generate(&env);
    signed_set_shares(&env, &client, &owner, &holder, 10);

    assert!(client.try_get_own_shares(&holder).is_err());
}

#[test]
fn deposit_requires_depositor_signature() {
    let env = Env::default();
    let client = make_client(&env);
    let owner = init_owner(&env, &client);
    signed_set_shares(&env, &client, &owner, &Address::generate(&env), 10);
    signed_set_shares(&env, &client, &owner, &Address::generate(&env), 20);

    let from = Address::generate(&env);
    assert!(client.try_deposit(&from, &1_000).is_err());
    assert_eq!(client.get_total_balance(), 0);
}

#[test]
fn claim_requires_stakeholder_signature() {
    let env = Env::default();
    let client = make_client(&env);
    let owner = init_owner(&env, &client);
    let holder = Address::generate(&env);
    signed_set_shares(&env, &client, &owner, &holder, 10);

    assert!(client.try_claim(&holder).is_err());
    assert!(client.try_get_amount_to_claim(&holder).is_err());
}

#[test]
fn withdraw_undistributed_requires_owner_signature() {
    let env = Env::default();
    let client = make_client(&env);
    let owner = init_owner(&env, &client);
    assert!(client.try_withdraw_undistributed(&owner).is_err());
}

#[test]
fn pause_and_unpause_require_owner_signature() {
    let env = Env::default();
    let client = make_client(&env);
    let owner = init_owner(&env, &client);

    assert!(client.try_pause(&owner).is_err());
    assert!(!client.is_paused());

    env.mock_all_auths();
    client.pause(&owner);
    let attacker = Address::generate(&env);
    assert!(client.try_unpause(&attacker).is_err());
    assert!(client.is_paused());
    client.unpause(&owner);
    assert!(!client.is_paused());
}

#[test]
fn ownership_transfer_requires_both_signatures() {
    let env = Env::default();
    let client = make_client(&env);
    let owner = init_owner(&env, &client);
    let successor = Address::generate(&env);

    assert!(client.try_propose_owner(&owner, &successor).is_err());
    assert_eq!(client.get_pending_owner(), None);

    env.mock_auths(&[MockAuth {
        address: &owner,
        invoke: &MockAuthInvoke {
            contract: &client.address,
            fn_name: "propose_owner",
            args: (&owner, &successor).into_val(&env),
            sub_invokes: &[],
        },
    }]);
    client.propose_owner(&owner, &successor);
    assert_eq!(client.get_pending_owner(), Some(successor.clone()));

    assert!(client.try_accept_owner(&successor).is_err());
    assert!(client.try_cancel_owner_transfer(&owner).is_err());
    assert_eq!(client.get_owner(), owner);
}
