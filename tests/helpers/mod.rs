//! Chain setup shared by the integration tests.
//!
//! The tests deploy `concordium-out/module.wasm.v1`. Run them with
//! `cargo concordium test --out concordium-out/module.wasm.v1`, which builds
//! the module before running the tests.
use concordium_smart_contract_testing::*;
use concordium_std::Deserial;

/// Path of the built module.
pub(crate) const MODULE_PATH: &str = "concordium-out/module.wasm.v1";

/// The account that deploys and owns every contract.
pub(crate) const OWNER: AccountAddress = AccountAddress([0u8; 32]);
pub(crate) const ADDR_1: AccountAddress = AccountAddress([1u8; 32]);
pub(crate) const ADDR_2: AccountAddress = AccountAddress([2u8; 32]);
/// Dead code is allowed since not every test file sends from every account.
#[allow(dead_code)]
pub(crate) const ADDR_3: AccountAddress = AccountAddress([3u8; 32]);

/// The initial balance of every test account.
pub(crate) const ACC_INITIAL_BALANCE: Amount = Amount::from_ccd(10_000);

/// A [`Signer`] with one set of keys, used for signing transactions.
pub(crate) const SIGNER: Signer = Signer::with_one_key();

/// Energy given to every transaction. Well above the bounds the tests check,
/// so a too expensive call fails the bound instead of running out of energy.
pub(crate) const ENERGY: Energy = Energy {
    energy: 100_000,
};

/// A chain with the four test accounts and the module deployed.
pub(crate) fn setup_chain() -> (Chain, ModuleReference) {
    let mut chain = Chain::new();
    for account in [OWNER, ADDR_1, ADDR_2, ADDR_3] {
        chain.create_account(Account::new(account, ACC_INITIAL_BALANCE));
    }

    let module = module_load_v1(MODULE_PATH).expect("Module exists at path");
    let deployment = chain.module_deploy_v1(SIGNER, OWNER, module).expect("Deploy valid module");

    (chain, deployment.module_reference)
}

/// Initialize the contract `name` from `mod_ref`, owned by `OWNER`.
pub(crate) fn init_contract(
    chain: &mut Chain,
    mod_ref: ModuleReference,
    name: &str,
) -> ContractInitSuccess {
    chain
        .contract_init(SIGNER, OWNER, ENERGY, InitContractPayload {
            amount: Amount::zero(),
            mod_ref,
            init_name: OwnedContractName::new_unchecked(format!("init_{name}")),
            param: OwnedParameter::empty(),
        })
        .expect("Initializing contract")
}

/// Send an update without parameter to `entrypoint` of the contract at
/// `address`, from `sender`.
#[allow(dead_code)]
pub(crate) fn update(
    chain: &mut Chain,
    sender: AccountAddress,
    address: ContractAddress,
    entrypoint: &str,
) -> Result<ContractInvokeSuccess, ContractInvokeError> {
    chain.contract_update(SIGNER, sender, Address::Account(sender), ENERGY, UpdateContractPayload {
        amount: Amount::zero(),
        address,
        receive_name: OwnedReceiveName::new_unchecked(entrypoint.to_string()),
        message: OwnedParameter::empty(),
    })
}

/// Invoke `entrypoint` of the contract at `address` without a transaction,
/// and parse its return value.
pub(crate) fn view<T: Deserial>(
    chain: &Chain,
    sender: AccountAddress,
    address: ContractAddress,
    entrypoint: &str,
) -> T {
    chain
        .contract_invoke(sender, Address::Account(sender), ENERGY, UpdateContractPayload {
            amount: Amount::zero(),
            address,
            receive_name: OwnedReceiveName::new_unchecked(entrypoint.to_string()),
            message: OwnedParameter::empty(),
        })
        .expect("View entrypoints never fail")
        .parse_return_value()
        .expect("Deserialize return value")
}
