//! Integration tests for the `call_once` contract.
use concordium_smart_contract_testing::*;
use web3_basics::call_once::{CallOnceError, CallOnceEvent};

mod helpers;
use helpers::*;

fn deploy_call_once() -> (Chain, ContractAddress) {
    let (mut chain, mod_ref) = setup_chain();
    let init = init_contract(&mut chain, mod_ref, "call_once");
    (chain, init.contract_address)
}

fn is_initialized(chain: &Chain, address: ContractAddress) -> bool {
    view(chain, OWNER, address, "call_once.isInitialized")
}

#[test]
fn test_first_initialize_succeeds() {
    let (mut chain, address) = deploy_call_once();
    assert!(!is_initialized(&chain, address));

    let initialized =
        update(&mut chain, OWNER, address, "call_once.initialize").expect("First initialize");

    let events = initialized
        .events()
        .flat_map(|(_addr, events)| events.iter().map(|e| e.parse().expect("Deserialize event")))
        .collect::<Vec<CallOnceEvent>>();
    assert_eq!(events, [CallOnceEvent::Initialized(Address::Account(OWNER))]);
    assert!(is_initialized(&chain, address));
}

#[test]
fn test_second_initialize_reverts() {
    let (mut chain, address) = deploy_call_once();
    update(&mut chain, OWNER, address, "call_once.initialize").expect("First initialize");

    let error: CallOnceError = update(&mut chain, OWNER, address, "call_once.initialize")
        .expect_err("Second initialize is rejected")
        .parse_return_value()
        .expect("Deserialize `CallOnceError`");

    assert_eq!(error, CallOnceError::AlreadyInitialized);
    assert_eq!(error.to_string(), "Already initialized");
}

/// The lock is not tied to the account that took it.
#[test]
fn test_no_account_can_initialize_twice() {
    let (mut chain, address) = deploy_call_once();
    update(&mut chain, OWNER, address, "call_once.initialize").expect("First initialize");

    for sender in [ADDR_1, ADDR_2, OWNER] {
        let error: CallOnceError = update(&mut chain, sender, address, "call_once.initialize")
            .expect_err("Repeated initialize is rejected")
            .parse_return_value()
            .expect("Deserialize `CallOnceError`");
        assert_eq!(error.to_string(), "Already initialized");
    }
    assert!(is_initialized(&chain, address));
}

/// Every instance has its own lock.
#[test]
fn test_lock_is_per_instance() {
    let (mut chain, mod_ref) = setup_chain();
    let first = init_contract(&mut chain, mod_ref, "call_once").contract_address;
    let second = init_contract(&mut chain, mod_ref, "call_once").contract_address;

    update(&mut chain, OWNER, first, "call_once.initialize").expect("Initialize first instance");

    assert!(is_initialized(&chain, first));
    assert!(!is_initialized(&chain, second));
    update(&mut chain, ADDR_1, second, "call_once.initialize").expect("Initialize second instance");
}
