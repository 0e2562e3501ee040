//! Counter contract fixture.
//!
//! `counter` keeps a single `uint` in shared state:
//!
//! | function | access | returns |
//! |---|---|---|
//! | `get-counter` | read-only | `(ok counter)` |
//! | `get-caller` | read-only | `(ok tx-sender)` |
//! | `increment` | public | `(ok true)`, prints the new value |
//! | `add (amount uint)` | public | `(ok counter)` or `(err u1)` on overflow |
//! | `set-label (label (string-ascii 16))` | public | `(ok true)` |
//! | `bump` | private | `u0` |

use parking_lot::Mutex;
use std::sync::Arc;

use simnet_harness::expect::Expectation;
use simnet_harness::mock::{MockSimnet, DEVNET_DEPLOYER};
use simnet_harness::types::{
    ClarityValue, ContractInterface, ParsedTransactionResult, TransactionEvent,
};
use simnet_harness::{ExtendedSimnet, SessionParams, Simnet};

pub const COUNTER: &str = "counter";

const COUNTER_INTERFACE: &str = include_str!("../fixture/counter.json");

pub struct CounterFixture {
    /// Concrete engine, for inspecting the call log.
    pub mock: Arc<MockSimnet>,
    /// Same engine, as the harness sees it.
    pub engine: Arc<dyn Simnet>,
    pub counter: Arc<Mutex<u128>>,
    pub label: Arc<Mutex<String>>,
}

/// A devnet `MockSimnet` with `counter` deployed.
pub fn counter_engine() -> CounterFixture {
    let interface =
        ContractInterface::from_json(COUNTER_INTERFACE).expect("counter fixture should parse");
    let counter = Arc::new(Mutex::new(0u128));
    let label = Arc::new(Mutex::new(String::new()));
    let contract_id = format!("{}.{}", DEVNET_DEPLOYER, COUNTER);

    let mut mock = MockSimnet::devnet();
    mock.add_contract(COUNTER, interface);

    let state = Arc::clone(&counter);
    mock.on_call(COUNTER, "get-counter", move |_| {
        Ok(ParsedTransactionResult::new(ClarityValue::ok(
            ClarityValue::uint(*state.lock()),
        )))
    });

    mock.on_call(COUNTER, "get-caller", |call| {
        let caller = ClarityValue::standard_principal(&call.sender)?;
        Ok(ParsedTransactionResult::new(ClarityValue::ok(caller)))
    });

    let state = Arc::clone(&counter);
    mock.on_call(COUNTER, "increment", move |_| {
        let mut value = state.lock();
        *value += 1;
        Ok(
            ParsedTransactionResult::new(ClarityValue::ok(ClarityValue::bool(true))).with_event(
                TransactionEvent::print(&contract_id, ClarityValue::uint(*value)),
            ),
        )
    });

    let state = Arc::clone(&counter);
    mock.on_call(COUNTER, "add", move |call| {
        let amount = match call.args.first() {
            Some(ClarityValue::UInt(amount)) => *amount,
            other => anyhow::bail!("add: bad argument {:?}", other),
        };
        let mut value = state.lock();
        let result = match value.checked_add(amount) {
            Some(sum) => {
                *value = sum;
                ClarityValue::ok(ClarityValue::uint(sum))
            }
            None => ClarityValue::error(ClarityValue::uint(1u32)),
        };
        Ok(ParsedTransactionResult::new(result))
    });

    let stored = Arc::clone(&label);
    mock.on_call(COUNTER, "set-label", move |call| {
        if let Some(ClarityValue::StringAscii(text)) = call.args.first() {
            *stored.lock() = text.clone();
        }
        Ok(ParsedTransactionResult::new(ClarityValue::ok(
            ClarityValue::bool(true),
        )))
    });

    mock.on_call(COUNTER, "bump", |_| {
        Ok(ParsedTransactionResult::new(ClarityValue::uint(0u32)))
    });

    let mock = Arc::new(mock);
    let engine: Arc<dyn Simnet> = mock.clone();
    CounterFixture {
        mock,
        engine,
        counter,
        label,
    }
}

/// A session on the counter engine with expectations enabled.
pub fn counter_session() -> (CounterFixture, ExtendedSimnet) {
    let fixture = counter_engine();
    let params = SessionParams::new(Arc::clone(&fixture.engine)).with_expect(Arc::new(Expectation::new));
    let session = ExtendedSimnet::create(params).expect("session should resolve wallet_1");
    (fixture, session)
}
