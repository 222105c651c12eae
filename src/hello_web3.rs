//! A contract holding a fixed greeting that anyone can read.
use concordium_std::*;

/// The text every instance is created with.
pub const GREETING: &str = "Hello Web3";

/// The state of the greeting contract. Set once at construction.
#[derive(Debug, Serialize, SchemaType, PartialEq, Eq, Clone)]
pub struct Greeting {
    /// The greeting text.
    pub text: String,
}

#[init(contract = "hello_web3")]
fn hello_web3_init<S: HasStateApi>(
    _ctx: &impl HasInitContext,
    _state_builder: &mut StateBuilder<S>,
) -> InitResult<Greeting> {
    Ok(Greeting {
        text: GREETING.into(),
    })
}

/// Return the greeting. Same answer for every sender.
#[receive(contract = "hello_web3", name = "getGreeting", return_value = "String")]
fn hello_web3_get_greeting<'a, 'b, S: HasStateApi>(
    _ctx: &'a impl HasReceiveContext,
    host: &'b impl HasHost<Greeting, StateApiType = S>,
) -> ReceiveResult<&'b String> {
    Ok(&host.state().text)
}

#[concordium_cfg_test]
#[allow(deprecated)]
mod tests {
    use super::*;
    use test_infrastructure::*;

    #[concordium_test]
    fn test_init() {
        let ctx = TestInitContext::empty();
        let mut state_builder = TestStateBuilder::new();

        let state = hello_web3_init(&ctx, &mut state_builder)
            .expect_report("Contract initialization results in error.");

        claim_eq!(state.text, "Hello Web3", "The greeting should be set at construction.");
    }

    #[concordium_test]
    fn test_greeting_is_public() {
        let ctx = TestInitContext::empty();
        let mut state_builder = TestStateBuilder::new();
        let state = hello_web3_init(&ctx, &mut state_builder).expect_report("init");
        let host = TestHost::new(state, state_builder);

        for seed in 0u8..4 {
            let mut ctx = TestReceiveContext::empty();
            ctx.set_sender(Address::Account(AccountAddress([seed; 32])));
            let greeting = hello_web3_get_greeting(&ctx, &host).expect_report("getGreeting");
            claim_eq!(greeting, "Hello Web3");
        }
        claim_eq!(host.state().text, GREETING, "Reading must not change the greeting.");
    }
}
