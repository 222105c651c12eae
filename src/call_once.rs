//! A contract whose `initialize` entrypoint can be called successfully exactly
//! once.
//!
//! The lock is global to the instance: once set, every further call fails the
//! same way, whoever sends it, including the account that set it.
use concordium_std::*;

/// The one-time initialization lock.
#[derive(Debug, Serialize, SchemaType, PartialEq, Eq, Clone, Copy, Default)]
pub struct InitLock {
    /// Whether `initialize` has already succeeded.
    pub initialized: bool,
}

impl InitLock {
    /// Take the lock. Fails if it was taken before, leaving it as is.
    pub fn acquire(&mut self) -> Result<(), CallOnceError> {
        ensure!(!self.initialized, CallOnceError::AlreadyInitialized);
        self.initialized = true;
        Ok(())
    }
}

/// The errors the guard can reject with.
#[derive(Debug, PartialEq, Eq, Reject, Serialize, SchemaType)]
pub enum CallOnceError {
    /// `initialize` already succeeded on this instance.
    AlreadyInitialized, // -1
    /// Failed logging because the log is full.
    LogFull, // -2
    /// Failed logging because the log is malformed.
    LogMalformed, // -3
}

impl From<LogError> for CallOnceError {
    fn from(le: LogError) -> Self {
        match le {
            LogError::Full => Self::LogFull,
            LogError::Malformed => Self::LogMalformed,
        }
    }
}

impl fmt::Display for CallOnceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyInitialized => f.write_str("Already initialized"),
            Self::LogFull => f.write_str("Log is full"),
            Self::LogMalformed => f.write_str("Log is malformed"),
        }
    }
}

/// Logged once, when the lock is taken.
#[derive(Debug, Serialize, SchemaType, PartialEq, Eq, Clone, Copy)]
pub enum CallOnceEvent {
    /// `initialize` succeeded, sent by the given address.
    Initialized(Address),
}

#[init(contract = "call_once", event = "CallOnceEvent")]
fn call_once_init<S: HasStateApi>(
    _ctx: &impl HasInitContext,
    _state_builder: &mut StateBuilder<S>,
) -> InitResult<InitLock> {
    Ok(InitLock::default())
}

/// Perform the one-time initialization.
///
/// Logs `CallOnceEvent::Initialized`.
///
/// It rejects if:
/// - The instance has been initialized before, by any sender.
/// - It fails to log the event.
#[receive(
    contract = "call_once",
    name = "initialize",
    error = "CallOnceError",
    mutable,
    enable_logger
)]
fn call_once_initialize<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<InitLock, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> Result<(), CallOnceError> {
    host.state_mut().acquire()?;
    concordium_dbg!("call_once initialized by {:?}", ctx.sender());
    logger.log(&CallOnceEvent::Initialized(ctx.sender()))?;
    Ok(())
}

/// Whether `initialize` has already succeeded.
#[receive(contract = "call_once", name = "isInitialized", return_value = "bool")]
fn call_once_is_initialized<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<InitLock, StateApiType = S>,
) -> ReceiveResult<bool> {
    Ok(host.state().initialized)
}

#[concordium_cfg_test]
#[allow(deprecated)]
mod tests {
    use super::*;
    use test_infrastructure::*;

    const OWNER: AccountAddress = AccountAddress([0u8; 32]);
    const USER: AccountAddress = AccountAddress([1u8; 32]);

    fn deployed() -> TestHost<InitLock> {
        let ctx = TestInitContext::empty();
        let mut state_builder = TestStateBuilder::new();
        let state = call_once_init(&ctx, &mut state_builder)
            .expect_report("Contract initialization results in error.");
        TestHost::new(state, state_builder)
    }

    fn initialize(
        host: &mut TestHost<InitLock>,
        caller: AccountAddress,
        logger: &mut TestLogger,
    ) -> Result<(), CallOnceError> {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(caller));
        call_once_initialize(&ctx, host, logger)
    }

    fn is_initialized(host: &TestHost<InitLock>) -> bool {
        call_once_is_initialized(&TestReceiveContext::empty(), host)
            .expect_report("isInitialized never fails")
    }

    #[concordium_test]
    fn test_not_initialized_after_deployment() {
        let host = deployed();
        claim!(!is_initialized(&host), "A fresh instance should not be initialized.");
    }

    #[concordium_test]
    fn test_first_initialize_succeeds() {
        let mut host = deployed();
        let mut logger = TestLogger::init();

        let result = initialize(&mut host, OWNER, &mut logger);

        claim!(result.is_ok(), "The first initialize should succeed.");
        claim!(is_initialized(&host), "The instance should be initialized.");
        claim_eq!(
            logger.logs,
            vec![to_bytes(&CallOnceEvent::Initialized(Address::Account(OWNER)))],
            "Incorrect event logged"
        );
    }

    #[concordium_test]
    fn test_second_initialize_fails() {
        let mut host = deployed();
        let mut logger = TestLogger::init();
        initialize(&mut host, OWNER, &mut logger).expect_report("First initialize");

        let result = initialize(&mut host, OWNER, &mut logger);

        claim_eq!(result, Err(CallOnceError::AlreadyInitialized));
        claim!(is_initialized(&host), "The instance should stay initialized.");
        claim_eq!(logger.logs.len(), 1, "Only the first call should log an event");
    }

    #[concordium_test]
    fn test_second_initialize_from_other_caller_fails() {
        let mut host = deployed();
        let mut logger = TestLogger::init();
        initialize(&mut host, OWNER, &mut logger).expect_report("First initialize");

        let err = initialize(&mut host, USER, &mut logger)
            .expect_err_report("A different caller must not initialize again.");

        claim_eq!(err, CallOnceError::AlreadyInitialized);
        claim_eq!(err.to_string(), "Already initialized");
    }

    #[concordium_test]
    fn test_reject_codes() {
        claim_eq!(Reject::from(CallOnceError::AlreadyInitialized).error_code.get(), -1);
        claim_eq!(Reject::from(CallOnceError::LogFull).error_code.get(), -2);
    }

    /// Property: across any sequence of callers, exactly the first
    /// `initialize` succeeds.
    #[concordium_quickcheck(num_tests = 200)]
    fn prop_only_first_call_succeeds(seeds: Vec<u8>) -> bool {
        let mut host = deployed();
        let mut logger = TestLogger::init();
        seeds.iter().enumerate().all(|(i, seed)| {
            let result = initialize(&mut host, AccountAddress([*seed; 32]), &mut logger);
            if i == 0 {
                result.is_ok()
            } else {
                result == Err(CallOnceError::AlreadyInitialized)
            }
        }) && is_initialized(&host) == !seeds.is_empty()
    }
}
