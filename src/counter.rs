//! A counter that can be incremented and decremented by anyone.
//!
//! The count is an unsigned integer and never goes below zero: decrementing a
//! zero counter is rejected without touching the state. Both `get` and `count`
//! read the same stored field.
use concordium_std::*;

/// The state of the counter.
#[derive(Debug, Serialize, SchemaType, PartialEq, Eq, Clone, Copy, Default)]
pub struct CounterState {
    /// The current count.
    pub count: u64,
}

impl CounterState {
    /// A fresh counter starting at zero.
    pub fn new() -> Self { Self::default() }

    /// The current count.
    pub fn count(&self) -> u64 { self.count }

    /// Add one to the count, returning the new value.
    ///
    /// Fails with `Overflow` at `u64::MAX`, leaving the state unchanged.
    pub fn increment(&mut self) -> Result<u64, CounterError> {
        let next = self.count.checked_add(1).ok_or(CounterError::Overflow)?;
        self.count = next;
        Ok(next)
    }

    /// Subtract one from the count, returning the new value.
    ///
    /// Fails with `Underflow` when the count is zero, leaving the state
    /// unchanged.
    pub fn decrement(&mut self) -> Result<u64, CounterError> {
        ensure!(self.count > 0, CounterError::Underflow);
        self.count -= 1;
        Ok(self.count)
    }
}

/// The errors the counter can reject with.
#[derive(Debug, PartialEq, Eq, Reject, Serialize, SchemaType)]
pub enum CounterError {
    /// Decrementing a counter that is already zero.
    Underflow, // -1
    /// Incrementing a counter that is already at `u64::MAX`.
    Overflow, // -2
    /// Failed logging because the log is full.
    LogFull, // -3
    /// Failed logging because the log is malformed.
    LogMalformed, // -4
}

impl From<LogError> for CounterError {
    fn from(le: LogError) -> Self {
        match le {
            LogError::Full => Self::LogFull,
            LogError::Malformed => Self::LogMalformed,
        }
    }
}

/// The count after a change, and who made it.
#[derive(Debug, Serialize, SchemaType, PartialEq, Eq, Clone, Copy)]
pub struct CountChangedEvent {
    /// The sender of the update.
    pub caller: Address,
    /// The count after the update.
    pub count:  u64,
}

/// Events logged by the counter.
#[derive(Debug, Serialize, SchemaType, PartialEq, Eq, Clone, Copy)]
pub enum CounterEvent {
    /// The counter was incremented.
    Incremented(CountChangedEvent),
    /// The counter was decremented.
    Decremented(CountChangedEvent),
}

/// Start a new counter at zero.
#[init(contract = "counter", event = "CounterEvent")]
fn counter_init<S: HasStateApi>(
    _ctx: &impl HasInitContext,
    _state_builder: &mut StateBuilder<S>,
) -> InitResult<CounterState> {
    Ok(CounterState::new())
}

/// Return the current count.
#[receive(contract = "counter", name = "get", return_value = "u64")]
fn counter_get<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<CounterState, StateApiType = S>,
) -> ReceiveResult<u64> {
    Ok(host.state().count())
}

/// Direct accessor of the stored count. Always agrees with `get`.
#[receive(contract = "counter", name = "count", return_value = "u64")]
fn counter_count<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<CounterState, StateApiType = S>,
) -> ReceiveResult<u64> {
    Ok(host.state().count)
}

/// Increment the counter by one. Open to any sender.
///
/// Logs `CounterEvent::Incremented`.
///
/// It rejects if:
/// - The count is already `u64::MAX`.
/// - It fails to log the event.
#[receive(contract = "counter", name = "inc", error = "CounterError", mutable, enable_logger)]
fn counter_inc<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<CounterState, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> Result<(), CounterError> {
    let count = host.state_mut().increment()?;
    concordium_dbg!("counter incremented to {}", count);
    logger.log(&CounterEvent::Incremented(CountChangedEvent {
        caller: ctx.sender(),
        count,
    }))?;
    Ok(())
}

/// Decrement the counter by one. Open to any sender.
///
/// Logs `CounterEvent::Decremented`.
///
/// It rejects if:
/// - The count is zero.
/// - It fails to log the event.
#[receive(contract = "counter", name = "dec", error = "CounterError", mutable, enable_logger)]
fn counter_dec<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<CounterState, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> Result<(), CounterError> {
    let count = host.state_mut().decrement()?;
    concordium_dbg!("counter decremented to {}", count);
    logger.log(&CounterEvent::Decremented(CountChangedEvent {
        caller: ctx.sender(),
        count,
    }))?;
    Ok(())
}

#[concordium_cfg_test]
#[allow(deprecated)]
mod tests {
    use super::*;
    use quickcheck::{Arbitrary, Gen};
    use test_infrastructure::*;

    const OWNER: AccountAddress = AccountAddress([0u8; 32]);
    const ADDR_1: AccountAddress = AccountAddress([1u8; 32]);
    const ADDR_2: AccountAddress = AccountAddress([2u8; 32]);
    const ADDR_3: AccountAddress = AccountAddress([3u8; 32]);

    /// A fresh, deployed counter.
    fn deployed() -> TestHost<CounterState> {
        let ctx = TestInitContext::empty();
        let mut state_builder = TestStateBuilder::new();
        let state = counter_init(&ctx, &mut state_builder)
            .expect_report("Contract initialization results in error.");
        TestHost::new(state, state_builder)
    }

    fn sent_by(account: AccountAddress) -> TestReceiveContext<'static> {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(account));
        ctx
    }

    fn inc(host: &mut TestHost<CounterState>, caller: AccountAddress) -> Result<(), CounterError> {
        let mut logger = TestLogger::init();
        counter_inc(&sent_by(caller), host, &mut logger)
    }

    fn dec(host: &mut TestHost<CounterState>, caller: AccountAddress) -> Result<(), CounterError> {
        let mut logger = TestLogger::init();
        counter_dec(&sent_by(caller), host, &mut logger)
    }

    fn get(host: &TestHost<CounterState>) -> u64 {
        counter_get(&TestReceiveContext::empty(), host).expect_report("get never fails")
    }

    fn count(host: &TestHost<CounterState>) -> u64 {
        counter_count(&TestReceiveContext::empty(), host).expect_report("count never fails")
    }

    #[concordium_test]
    fn test_init() {
        let host = deployed();

        claim_eq!(*host.state(), CounterState { count: 0 }, "Counter should start at zero.");
        claim_eq!(count(&host), 0);
    }

    #[concordium_test]
    fn test_get_returns_current_count() {
        let mut host = deployed();
        claim_eq!(get(&host), 0);

        inc(&mut host, OWNER).expect_report("Increment should succeed.");
        claim_eq!(get(&host), 1);

        inc(&mut host, OWNER).expect_report("Increment should succeed.");
        claim_eq!(get(&host), 2);
    }

    #[concordium_test]
    fn test_get_matches_accessor() {
        let mut host = deployed();
        claim_eq!(get(&host), count(&host));

        inc(&mut host, OWNER).expect_report("Increment should succeed.");
        claim_eq!(get(&host), count(&host));
    }

    #[concordium_test]
    fn test_inc_logs_event() {
        let mut host = deployed();
        let ctx = sent_by(ADDR_1);
        let mut logger = TestLogger::init();

        let result = counter_inc(&ctx, &mut host, &mut logger);

        claim!(result.is_ok(), "Increment should succeed.");
        claim_eq!(logger.logs.len(), 1, "Exactly one event should be logged");
        claim_eq!(
            logger.logs[0],
            to_bytes(&CounterEvent::Incremented(CountChangedEvent {
                caller: Address::Account(ADDR_1),
                count:  1,
            })),
            "Incorrect event logged"
        );
    }

    #[concordium_test]
    fn test_inc_by_multiple_users() {
        let mut host = deployed();

        for (i, caller) in [OWNER, ADDR_1, ADDR_2, ADDR_3].into_iter().enumerate() {
            inc(&mut host, caller).expect_report("Increment should succeed.");
            claim_eq!(count(&host), i as u64 + 1);
        }
    }

    #[concordium_test]
    fn test_rapid_successive_increments() {
        let mut host = deployed();
        for _ in 0..10 {
            inc(&mut host, OWNER).expect_report("Increment should succeed.");
        }
        claim_eq!(count(&host), 10);
    }

    #[concordium_test]
    fn test_inc_overflow() {
        let mut host = deployed();
        host.state_mut().count = u64::MAX;
        let mut logger = TestLogger::init();

        let result = counter_inc(&sent_by(OWNER), &mut host, &mut logger);

        claim_eq!(result, Err(CounterError::Overflow), "Expected to fail with error Overflow.");
        claim_eq!(count(&host), u64::MAX, "State should be unchanged.");
        claim!(logger.logs.is_empty(), "No event should be logged");
    }

    #[concordium_test]
    fn test_dec() {
        let mut host = deployed();
        for _ in 0..3 {
            inc(&mut host, OWNER).expect_report("Increment should succeed.");
        }
        claim_eq!(count(&host), 3);

        for expected in [2, 1, 0] {
            dec(&mut host, OWNER).expect_report("Decrement should succeed.");
            claim_eq!(count(&host), expected);
        }
    }

    #[concordium_test]
    fn test_dec_logs_event() {
        let mut host = deployed();
        inc(&mut host, OWNER).expect_report("Increment should succeed.");
        let mut logger = TestLogger::init();

        let result = counter_dec(&sent_by(ADDR_2), &mut host, &mut logger);

        claim!(result.is_ok(), "Decrement should succeed.");
        claim_eq!(logger.logs, vec![to_bytes(&CounterEvent::Decremented(CountChangedEvent {
            caller: Address::Account(ADDR_2),
            count:  0,
        }))]);
    }

    #[concordium_test]
    fn test_dec_from_zero() {
        let mut host = deployed();
        let mut logger = TestLogger::init();

        let result = counter_dec(&sent_by(OWNER), &mut host, &mut logger);

        claim_eq!(result, Err(CounterError::Underflow), "Expected to fail with error Underflow.");
        claim_eq!(get(&host), 0, "A rejected decrement must not clamp or change the count.");
        claim!(logger.logs.is_empty(), "No event should be logged");
    }

    #[concordium_test]
    fn test_dec_by_multiple_users() {
        let mut host = deployed();
        for _ in 0..5 {
            inc(&mut host, OWNER).expect_report("Increment should succeed.");
        }

        for (caller, expected) in [(OWNER, 4), (ADDR_1, 3), (ADDR_2, 2)] {
            dec(&mut host, caller).expect_report("Decrement should succeed.");
            claim_eq!(count(&host), expected);
        }
    }

    #[concordium_test]
    fn test_mixed_operations() {
        let mut host = deployed();

        inc(&mut host, OWNER).expect_report("inc");
        claim_eq!(count(&host), 1);
        inc(&mut host, OWNER).expect_report("inc");
        claim_eq!(count(&host), 2);
        dec(&mut host, OWNER).expect_report("dec");
        claim_eq!(count(&host), 1);
        inc(&mut host, OWNER).expect_report("inc");
        claim_eq!(count(&host), 2);
        dec(&mut host, OWNER).expect_report("dec");
        claim_eq!(count(&host), 1);
        dec(&mut host, OWNER).expect_report("dec");
        claim_eq!(count(&host), 0);

        claim_eq!(dec(&mut host, OWNER), Err(CounterError::Underflow));
        claim_eq!(count(&host), 0);
    }

    #[concordium_test]
    fn test_one_increment_per_caller() {
        let mut host = deployed();
        for caller in [ADDR_1, ADDR_2, OWNER] {
            inc(&mut host, caller).expect_report("Increment should succeed.");
        }
        claim_eq!(count(&host), 3);
    }

    /// A single update call against the counter.
    #[derive(Debug, Clone, Copy)]
    enum Op {
        Inc,
        Dec,
    }

    impl Arbitrary for Op {
        fn arbitrary(g: &mut Gen) -> Self {
            if bool::arbitrary(g) {
                Op::Inc
            } else {
                Op::Dec
            }
        }
    }

    /// Run `ops`, sending the i-th call from `callers(i)`. Returns the final
    /// state and how many calls were rejected.
    fn run(ops: &[Op], callers: impl Fn(usize) -> AccountAddress) -> (u64, usize) {
        let mut host = deployed();
        let mut rejected = 0;
        for (i, op) in ops.iter().enumerate() {
            let result = match op {
                Op::Inc => inc(&mut host, callers(i)),
                Op::Dec => dec(&mut host, callers(i)),
            };
            if result.is_err() {
                rejected += 1;
            }
        }
        (count(&host), rejected)
    }

    /// Property: `n` increments from zero yield `n`.
    #[concordium_quickcheck(num_tests = 100)]
    fn prop_increments_count_up(n: u8) -> bool {
        let mut host = deployed();
        (0..n).all(|_| inc(&mut host, OWNER).is_ok()) && get(&host) == u64::from(n)
    }

    /// Property: `n` increments followed by `k <= n` decrements yield `n - k`.
    #[concordium_quickcheck(num_tests = 100)]
    fn prop_decrements_undo_increments(n: u8, k: u8) -> bool {
        let k = k.min(n);
        let mut host = deployed();
        (0..n).all(|_| inc(&mut host, OWNER).is_ok())
            && (0..k).all(|_| dec(&mut host, OWNER).is_ok())
            && get(&host) == u64::from(n - k)
    }

    /// Property: the count is the fold of the calls, where a decrement at zero
    /// is rejected and changes nothing. `get` and `count` agree after every
    /// call.
    #[concordium_quickcheck(num_tests = 500)]
    fn prop_count_is_fold_of_calls(ops: Vec<Op>) -> bool {
        let mut host = deployed();
        let mut expected: u64 = 0;
        for op in ops {
            match op {
                Op::Inc => {
                    if inc(&mut host, OWNER).is_err() {
                        return false;
                    }
                    expected += 1;
                }
                Op::Dec if expected == 0 => {
                    if dec(&mut host, OWNER) != Err(CounterError::Underflow) {
                        return false;
                    }
                }
                Op::Dec => {
                    if dec(&mut host, OWNER).is_err() {
                        return false;
                    }
                    expected -= 1;
                }
            }
            if get(&host) != expected || count(&host) != expected {
                return false;
            }
        }
        true
    }

    /// Property: who sends the calls never changes the outcome.
    #[concordium_quickcheck(num_tests = 500)]
    fn prop_caller_does_not_matter(ops: Vec<Op>, seeds: Vec<u8>) -> bool {
        let single = run(&ops, |_| OWNER);
        let many = run(&ops, |i| {
            AccountAddress([seeds.get(i).copied().unwrap_or_default(); 32])
        });
        single == many
    }
}
