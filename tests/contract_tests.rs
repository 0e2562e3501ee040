//! Contract handle tests against the counter fixture.

mod common;

use anyhow::{anyhow, bail, Result};
use std::sync::Arc;

use common::{capture_logs, counter_session, harness_error, COUNTER};
use simnet_harness::mock::{MockSimnet, DEVNET_DEPLOYER, DEVNET_WALLET_1, DEVNET_WALLET_2};
use simnet_harness::types::{
    ClarityValue, ContractInterface, FunctionAccess, FunctionArg, FunctionSignature,
    ParsedTransactionResult, TypeDescriptor,
};
use simnet_harness::{
    CallKind, ContractExtension, ContractHandle, ContractParams, ExtendedSimnet, ExtensionMember,
    HarnessError, Outcome, OwnMember, Resolution, SessionParams, Simnet,
};

fn counter_handle(session: &ExtendedSimnet) -> ContractHandle {
    ContractHandle::create(ContractParams::new(session.clone(), COUNTER)).unwrap()
}

/// Adds a `maxSupply` field, an `incrementTwice` method, and tries to shadow
/// `getCounter` and `getSender`.
struct CounterHelpers;

impl ContractExtension for CounterHelpers {
    fn member(&self, name: &str) -> Option<ExtensionMember> {
        match name {
            "maxSupply" => Some(ExtensionMember::Field(ClarityValue::uint(100u32))),
            "incrementTwice" => Some(ExtensionMember::Method),
            "getCounter" => Some(ExtensionMember::Field(ClarityValue::none())),
            "getSender" => Some(ExtensionMember::Field(ClarityValue::ascii("shadowed"))),
            _ => None,
        }
    }

    fn call(&self, name: &str, contract: &ContractHandle, _args: &[ClarityValue]) -> Result<Outcome> {
        match name {
            "incrementTwice" => {
                contract.invoke("increment", &[])?;
                contract
                    .invoke("increment", &[])?
                    .ok_or_else(|| anyhow!("increment did not resolve"))
            }
            other => bail!("no method {}", other),
        }
    }
}

fn with_helpers(session: &ExtendedSimnet) -> ContractHandle {
    let params =
        ContractParams::new(session.clone(), COUNTER).with_extension(Arc::new(CounterHelpers));
    ContractHandle::create(params).unwrap()
}

// =============================================================================
// Construction
// =============================================================================

#[test]
fn test_create_finds_contract_by_name() {
    let (_fixture, session) = counter_session();
    let counter = counter_handle(&session);

    assert_eq!(counter.contract_name(), COUNTER);
    assert_eq!(counter.contract_id(), format!("{}.counter", DEVNET_DEPLOYER));
    assert_eq!(counter.functions().len(), 6);
    assert!(!counter.is_debug());
}

#[test]
fn test_create_unknown_contract_fails() {
    let (_fixture, session) = counter_session();
    let err = ContractHandle::create(ContractParams::new(session, "missing")).unwrap_err();

    assert_eq!(
        harness_error(&err),
        &HarnessError::ContractNotFound {
            contract: "missing".to_string()
        }
    );
    assert_eq!(err.to_string(), "Contract missing not found");
}

#[test]
fn test_create_matches_second_segment_only() {
    let mut mock = MockSimnet::devnet();
    mock.add_contract_with_id(
        &format!("{}.token", DEVNET_WALLET_2),
        ContractInterface::default(),
    );
    let engine: Arc<dyn Simnet> = Arc::new(mock);
    let session = ExtendedSimnet::create(SessionParams::new(engine)).unwrap();

    let token = ContractHandle::create(ContractParams::new(session.clone(), "token")).unwrap();
    assert_eq!(token.contract_id(), format!("{}.token", DEVNET_WALLET_2));

    let err = ContractHandle::create(ContractParams::new(session, DEVNET_WALLET_2)).unwrap_err();
    assert!(matches!(
        harness_error(&err),
        HarnessError::ContractNotFound { .. }
    ));
}

#[test]
fn test_create_with_sender_and_debug() {
    let (fixture, session) = counter_session();
    let params = ContractParams::new(session.clone(), COUNTER)
        .with_sender("wallet_2")
        .with_debug(true);
    let counter = ContractHandle::create(params).unwrap();

    assert_eq!(counter.get_sender(), DEVNET_WALLET_2);
    assert!(counter.is_debug());
    assert_eq!(session.get_principal(), DEVNET_WALLET_1);
    assert!(!session.is_debug());

    counter.invoke("getCounter", &[]).unwrap();
    assert_eq!(fixture.mock.last_call().unwrap().sender, DEVNET_WALLET_2);
}

#[test]
fn test_create_keeps_session_debug() {
    let (_fixture, session) = counter_session();
    let counter = counter_handle(&session.debug());
    assert!(counter.is_debug());
}

#[test]
fn test_create_with_unknown_sender_fails() {
    let (_fixture, session) = counter_session();
    let err = ContractHandle::create(ContractParams::new(session, COUNTER).with_sender("nobody"))
        .unwrap_err();
    assert!(matches!(
        harness_error(&err),
        HarnessError::IdentityLookupFailed { .. }
    ));
}

// =============================================================================
// Resolution
// =============================================================================

#[test]
fn test_resolve_picks_dispatch_kind() {
    let (_fixture, session) = counter_session();
    let counter = counter_handle(&session);

    for (name, expected) in [
        ("getCounter", CallKind::ReadOnly),
        ("getCaller", CallKind::ReadOnly),
        ("increment", CallKind::Public),
        ("add", CallKind::Public),
        ("setLabel", CallKind::Public),
        ("bump", CallKind::ReadOnly),
    ] {
        match counter.resolve(name) {
            Resolution::ContractCall(function) => {
                assert_eq!(function.kind(), expected, "{}", name)
            }
            other => panic!("{} resolved to {:?}", name, other),
        }
    }
}

#[test]
fn test_resolve_own_members_and_unresolved() {
    let (_fixture, session) = counter_session();
    let counter = counter_handle(&session);

    for (name, member) in [
        ("getSender", OwnMember::GetSender),
        ("getPrincipal", OwnMember::GetPrincipal),
        ("connect", OwnMember::Connect),
        ("debug", OwnMember::Debug),
        ("contractName", OwnMember::ContractName),
    ] {
        assert!(
            matches!(counter.resolve(name), Resolution::OwnMember(m) if m == member),
            "{}",
            name
        );
    }

    assert!(matches!(counter.resolve("get-counter"), Resolution::Unresolved));
    assert!(matches!(counter.resolve("decrement"), Resolution::Unresolved));
    assert!(counter.invoke("decrement", &[]).unwrap().is_none());
}

#[test]
fn test_unresolved_name_is_logged() {
    let (_fixture, session) = counter_session();
    let counter = counter_handle(&session);

    let (outcome, logs) = capture_logs(|| counter.invoke("decrement", &[]).unwrap());
    assert!(outcome.is_none());
    assert!(logs.contains("unresolved member"), "logs: {}", logs);
    assert!(logs.contains("decrement"), "logs: {}", logs);
}

#[test]
fn test_duplicate_translated_names_keep_first() {
    let mut mock = MockSimnet::devnet();
    mock.add_contract(
        "dup",
        ContractInterface::new(vec![
            FunctionSignature::new("get-value", FunctionAccess::ReadOnly, vec![]),
            FunctionSignature::new("get--value", FunctionAccess::Public, vec![]),
        ]),
    )
    .on_call("dup", "get-value", |_| {
        Ok(ParsedTransactionResult::new(ClarityValue::uint(1u32)))
    });
    let mock = Arc::new(mock);
    let session = ExtendedSimnet::create(SessionParams::new(mock.clone())).unwrap();
    let dup = ContractHandle::create(ContractParams::new(session, "dup")).unwrap();

    let function = dup.function("getValue").unwrap();
    assert_eq!(function.signature().name, "get-value");

    dup.invoke("getValue", &[]).unwrap();
    assert_eq!(mock.last_call().unwrap().kind, CallKind::ReadOnly);
}

// =============================================================================
// Contract calls
// =============================================================================

#[test]
fn test_read_only_and_public_dispatch() {
    let (fixture, session) = counter_session();
    let counter = counter_handle(&session);

    counter
        .invoke("increment", &[])
        .unwrap()
        .and_then(Outcome::into_call)
        .unwrap()
        .expect()
        .unwrap()
        .to_be_ok(ClarityValue::bool(true));

    counter
        .invoke("getCounter", &[])
        .unwrap()
        .and_then(Outcome::into_call)
        .unwrap()
        .expect()
        .unwrap()
        .to_be_ok(ClarityValue::uint(1u32));

    let calls = fixture.mock.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].kind, CallKind::Public);
    assert_eq!(calls[0].method, "increment");
    assert_eq!(calls[1].kind, CallKind::ReadOnly);
    assert_eq!(calls[1].method, "get-counter");
    assert!(calls.iter().all(|c| c.contract == COUNTER));
}

#[test]
fn test_private_function_calls_read_only() {
    let (fixture, session) = counter_session();
    let counter = counter_handle(&session);

    counter.invoke("bump", &[]).unwrap();
    assert_eq!(fixture.mock.last_call().unwrap().kind, CallKind::ReadOnly);
}

#[test]
fn test_call_passes_arguments() {
    let (fixture, session) = counter_session();
    let counter = counter_handle(&session);

    let result = counter
        .function("add")
        .unwrap()
        .call(&[ClarityValue::uint(41u32)])
        .unwrap();
    assert_eq!(result.result, ClarityValue::ok(ClarityValue::uint(41u32)));
    assert_eq!(*fixture.counter.lock(), 41);
    assert_eq!(
        fixture.mock.last_call().unwrap().args,
        vec![ClarityValue::uint(41u32)]
    );
}

#[test]
fn test_arity_mismatch_before_engine_call() {
    let (fixture, session) = counter_session();
    let counter = counter_handle(&session);

    let err = counter.invoke("add", &[]).unwrap_err();
    match harness_error(&err) {
        HarnessError::ArityMismatch {
            function,
            expected,
            got,
            signature,
        } => {
            assert_eq!(function, "add");
            assert_eq!(*expected, 1);
            assert_eq!(*got, 0);
            assert!(signature.contains("amount"), "signature: {}", signature);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(err.to_string().starts_with("Wrong number of arguments for add"));

    let err = counter
        .invoke("getCounter", &[ClarityValue::uint(1u32)])
        .unwrap_err();
    assert!(matches!(
        harness_error(&err),
        HarnessError::ArityMismatch { expected: 0, got: 1, .. }
    ));

    assert_eq!(fixture.mock.call_count(), 0);
}

#[test]
fn test_argument_type_mismatch_before_engine_call() {
    let (fixture, session) = counter_session();
    let counter = counter_handle(&session);

    let err = counter
        .invoke("add", &[ClarityValue::int(5)])
        .unwrap_err();
    assert_eq!(
        harness_error(&err),
        &HarnessError::ArgumentTypeMismatch {
            function: "add".to_string(),
            argument: 0,
            expected: "uint".to_string(),
            got: "5".to_string(),
        }
    );

    let err = counter
        .invoke("setLabel", &[ClarityValue::ascii("seventeen-chars!!")])
        .unwrap_err();
    assert!(matches!(
        harness_error(&err),
        HarnessError::ArgumentTypeMismatch { expected, .. } if expected == "(string-ascii 16)"
    ));

    assert_eq!(fixture.mock.call_count(), 0);

    counter
        .invoke("setLabel", &[ClarityValue::ascii("sixteen-chars!!!")])
        .unwrap();
    assert_eq!(*fixture.label.lock(), "sixteen-chars!!!");
}

#[test]
fn test_contract_response_errors_are_values() {
    let (fixture, session) = counter_session();
    let counter = counter_handle(&session);
    *fixture.counter.lock() = u128::MAX;

    counter
        .invoke("add", &[ClarityValue::uint(1u32)])
        .unwrap()
        .and_then(Outcome::into_call)
        .unwrap()
        .expect()
        .unwrap()
        .to_be_err(ClarityValue::uint(1u32));
}

#[test]
fn test_engine_error_passes_through_handle() {
    let (fixture, session) = counter_session();
    let counter = counter_handle(&session);
    fixture.mock.set_error("contract call aborted");

    let err = counter.invoke("increment", &[]).unwrap_err();
    assert!(err.downcast_ref::<HarnessError>().is_none());
    assert_eq!(err.to_string(), "contract call aborted");
}

// =============================================================================
// Own members
// =============================================================================

#[test]
fn test_sender_and_principal() {
    let (_fixture, session) = counter_session();
    let counter = counter_handle(&session);

    assert_eq!(counter.get_sender(), DEVNET_WALLET_1);
    assert_eq!(
        counter.get_principal().unwrap(),
        ClarityValue::contract_principal(DEVNET_DEPLOYER, COUNTER).unwrap()
    );

    let sender = counter.invoke("getSender", &[]).unwrap().unwrap();
    assert_eq!(sender.into_text().as_deref(), Some(DEVNET_WALLET_1));

    let principal = counter.invoke("getPrincipal", &[]).unwrap().unwrap();
    assert_eq!(
        principal.into_value(),
        Some(ClarityValue::contract_principal(DEVNET_DEPLOYER, COUNTER).unwrap())
    );

    let name = counter.invoke("contractName", &[]).unwrap().unwrap();
    assert_eq!(name.into_text().as_deref(), Some(COUNTER));
}

#[test]
fn test_properties_take_no_arguments() {
    let (_fixture, session) = counter_session();
    let counter = counter_handle(&session);

    for name in ["contractName", "debug", "getSender"] {
        let err = counter
            .invoke(name, &[ClarityValue::bool(true)])
            .unwrap_err();
        assert!(
            matches!(harness_error(&err), HarnessError::ArityMismatch { expected: 0, .. }),
            "{}",
            name
        );
    }
}

#[test]
fn test_connect_builds_new_handle() {
    let (fixture, session) = counter_session();
    let counter = counter_handle(&session);
    let alice = counter.connect(Some("wallet_2")).unwrap();

    assert_eq!(alice.get_sender(), DEVNET_WALLET_2);
    assert_eq!(counter.get_sender(), DEVNET_WALLET_1);
    assert_eq!(alice.contract_id(), counter.contract_id());

    alice.invoke("increment", &[]).unwrap();
    assert_eq!(fixture.mock.last_call().unwrap().sender, DEVNET_WALLET_2);
    counter.invoke("increment", &[]).unwrap();
    assert_eq!(fixture.mock.last_call().unwrap().sender, DEVNET_WALLET_1);
}

#[test]
fn test_connect_none_uses_default() {
    let (_fixture, session) = counter_session();
    let alice = counter_handle(&session).connect(Some("wallet_2")).unwrap();
    assert_eq!(alice.connect(None).unwrap().get_sender(), DEVNET_WALLET_1);
}

#[test]
fn test_connect_chain_keeps_resolved_address() {
    let (_fixture, session) = counter_session();
    let counter = counter_handle(&session);

    let mut handle = counter.connect(Some("wallet_2")).unwrap();
    for _ in 0..3 {
        handle = handle.connect(Some(handle.get_sender())).unwrap();
    }
    assert_eq!(handle.get_sender(), DEVNET_WALLET_2);
}

#[test]
fn test_connect_keeps_debug_and_extension() {
    let (_fixture, session) = counter_session();
    let counter = with_helpers(&session).debug();
    let alice = counter.connect(Some("wallet_2")).unwrap();

    assert!(alice.is_debug());
    assert!(alice.extension().is_some());
    assert!(matches!(
        alice.invoke("maxSupply", &[]).unwrap(),
        Some(Outcome::Value(ClarityValue::UInt(100)))
    ));
}

#[test]
fn test_connect_via_invoke() {
    let (_fixture, session) = counter_session();
    let counter = counter_handle(&session);

    let by_alias = counter
        .invoke("connect", &[ClarityValue::ascii("wallet_2")])
        .unwrap()
        .and_then(Outcome::into_handle)
        .unwrap();
    assert_eq!(by_alias.get_sender(), DEVNET_WALLET_2);

    let by_principal = counter
        .invoke(
            "connect",
            &[ClarityValue::standard_principal(DEVNET_WALLET_2).unwrap()],
        )
        .unwrap()
        .and_then(Outcome::into_handle)
        .unwrap();
    assert_eq!(by_principal.get_sender(), DEVNET_WALLET_2);

    let back = by_alias
        .invoke("connect", &[])
        .unwrap()
        .and_then(Outcome::into_handle)
        .unwrap();
    assert_eq!(back.get_sender(), DEVNET_WALLET_1);
}

#[test]
fn test_connect_via_invoke_rejects_bad_arguments() {
    let (_fixture, session) = counter_session();
    let counter = counter_handle(&session);

    let err = counter
        .invoke("connect", &[ClarityValue::uint(1u32)])
        .unwrap_err();
    assert!(matches!(
        harness_error(&err),
        HarnessError::ArgumentTypeMismatch { function, .. } if function == "connect"
    ));

    let err = counter
        .invoke(
            "connect",
            &[ClarityValue::ascii("wallet_1"), ClarityValue::ascii("wallet_2")],
        )
        .unwrap_err();
    assert!(matches!(
        harness_error(&err),
        HarnessError::ArityMismatch { expected: 1, got: 2, .. }
    ));
}

#[test]
fn test_debug_returns_independent_handle() {
    let (_fixture, session) = counter_session();
    let counter = counter_handle(&session);

    let traced = counter.debug();
    assert!(traced.is_debug());
    assert!(!counter.is_debug());

    let via_invoke = counter
        .invoke("debug", &[])
        .unwrap()
        .and_then(Outcome::into_handle)
        .unwrap();
    assert!(via_invoke.is_debug());
    assert!(!counter.is_debug());
}

#[test]
fn test_debug_handle_traces_calls() {
    let (_fixture, session) = counter_session();
    let traced = counter_handle(&session).debug();

    let (_, logs) = capture_logs(|| traced.invoke("increment", &[]).unwrap());
    assert!(logs.contains("[DEBUG] counter/increment"), "logs: {}", logs);
}

// =============================================================================
// Extensions
// =============================================================================

#[test]
fn test_extension_field_and_method() {
    let (fixture, session) = counter_session();
    let counter = with_helpers(&session);

    let supply = counter.invoke("maxSupply", &[]).unwrap().unwrap();
    assert_eq!(supply.into_value(), Some(ClarityValue::uint(100u32)));

    let outcome = counter.invoke("incrementTwice", &[]).unwrap().unwrap();
    assert!(outcome.into_call().is_some());
    assert_eq!(*fixture.counter.lock(), 2);
}

#[test]
fn test_extension_field_rejects_arguments() {
    let (_fixture, session) = counter_session();
    let counter = with_helpers(&session);

    let err = counter
        .invoke("maxSupply", &[ClarityValue::uint(1u32)])
        .unwrap_err();
    assert!(matches!(
        harness_error(&err),
        HarnessError::ArityMismatch { expected: 0, .. }
    ));
}

#[test]
fn test_contract_functions_shadow_extension() {
    let (_fixture, session) = counter_session();
    let counter = with_helpers(&session);

    assert!(matches!(
        counter.resolve("getCounter"),
        Resolution::ContractCall(_)
    ));
}

#[test]
fn test_extension_shadows_own_members() {
    let (_fixture, session) = counter_session();
    let counter = with_helpers(&session);

    let sender = counter.invoke("getSender", &[]).unwrap().unwrap();
    assert_eq!(sender.into_value(), Some(ClarityValue::ascii("shadowed")));
    assert_eq!(counter.get_sender(), DEVNET_WALLET_1);

    // Members the extension lacks still reach the handle.
    assert!(matches!(
        counter.resolve("contractName"),
        Resolution::OwnMember(OwnMember::ContractName)
    ));
    assert!(counter.invoke("decrement", &[]).unwrap().is_none());
}

#[test]
fn test_function_signature_types_from_fixture() {
    let (_fixture, session) = counter_session();
    let counter = counter_handle(&session);

    let add = counter.function("add").unwrap().signature();
    assert_eq!(
        add.args,
        vec![FunctionArg::new("amount", TypeDescriptor::UInt128)]
    );
    assert_eq!(add.access, FunctionAccess::Public);
}
