//! In-memory engine for tests.
//!
//! `MockSimnet` answers calls from registered handlers and records every call
//! it receives, so tests can check which entry point and sender the harness
//! actually used.
//!
//! # Example
//! ```
//! use std::sync::Arc;
//! use simnet_harness::mock::MockSimnet;
//! use simnet_harness::types::{ClarityValue, ContractInterface, ParsedTransactionResult};
//! use simnet_harness::Simnet;
//!
//! let mut mock = MockSimnet::devnet();
//! mock.add_contract("counter", ContractInterface::default())
//!     .on_call("counter", "get-counter", |_| {
//!         Ok(ParsedTransactionResult::new(ClarityValue::uint(0u32)))
//!     });
//!
//! let mock = Arc::new(mock);
//! let sender = mock.deployer();
//! assert!(mock.call_read_only_fn("counter", "get-counter", &[], &sender).is_ok());
//! assert!(mock.call_read_only_fn("counter", "missing", &[], &sender).is_err());
//! assert_eq!(mock.call_count(), 2);
//! ```

use anyhow::{anyhow, Result};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use simnet_harness_types::{ClarityValue, ContractInterface, ParsedTransactionResult};

use crate::engine::{CallKind, Simnet};

pub const DEVNET_DEPLOYER: &str = "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM";
pub const DEVNET_WALLET_1: &str = "ST1SJ3DTE5DN7X54YDH5D64R3BCB6A2AG2ZQ8YPD5";
pub const DEVNET_WALLET_2: &str = "ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG";
pub const DEVNET_WALLET_3: &str = "ST2JHG361ZXG51QTKY2NQCVBPPRRE2KZB1HR05NNC";

/// A call as the engine received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    pub kind: CallKind,
    /// Contract as passed by the caller (short name or full id).
    pub contract: String,
    pub method: String,
    pub args: Vec<ClarityValue>,
    pub sender: String,
}

pub type CallHandler = Arc<dyn Fn(&MockCall) -> Result<ParsedTransactionResult> + Send + Sync>;

/// Engine backed by handler closures.
///
/// Registration methods take `&mut self`; once shared behind an `Arc`, only
/// the forced error and the call log change.
pub struct MockSimnet {
    deployer: String,
    /// alias -> address
    accounts: BTreeMap<String, String>,
    /// `deployer.name` -> interface
    contracts: BTreeMap<String, ContractInterface>,
    /// (short contract name, method) -> handler
    handlers: HashMap<(String, String), CallHandler>,
    force_error: Mutex<Option<String>>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockSimnet {
    pub fn new(deployer: &str) -> Self {
        let mut accounts = BTreeMap::new();
        accounts.insert("deployer".to_string(), deployer.to_string());
        Self {
            deployer: deployer.to_string(),
            accounts,
            contracts: BTreeMap::new(),
            handlers: HashMap::new(),
            force_error: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Deployer plus `wallet_1`..`wallet_3` at their devnet addresses.
    pub fn devnet() -> Self {
        let mut mock = Self::new(DEVNET_DEPLOYER);
        mock.add_account("wallet_1", DEVNET_WALLET_1)
            .add_account("wallet_2", DEVNET_WALLET_2)
            .add_account("wallet_3", DEVNET_WALLET_3);
        mock
    }

    pub fn add_account(&mut self, alias: &str, address: &str) -> &mut Self {
        self.accounts.insert(alias.to_string(), address.to_string());
        self
    }

    /// Deploy `name` under the deployer.
    pub fn add_contract(&mut self, name: &str, interface: ContractInterface) -> &mut Self {
        let id = format!("{}.{}", self.deployer, name);
        self.add_contract_with_id(&id, interface)
    }

    /// Register an interface under an arbitrary key.
    pub fn add_contract_with_id(&mut self, id: &str, interface: ContractInterface) -> &mut Self {
        self.contracts.insert(id.to_string(), interface);
        self
    }

    pub fn on_call<F>(&mut self, contract: &str, method: &str, handler: F) -> &mut Self
    where
        F: Fn(&MockCall) -> Result<ParsedTransactionResult> + Send + Sync + 'static,
    {
        self.handlers.insert(
            (short_name(contract).to_string(), method.to_string()),
            Arc::new(handler),
        );
        self
    }

    /// Fail every subsequent call with `error`. Calls are still recorded.
    pub fn set_error(&self, error: &str) {
        *self.force_error.lock() = Some(error.to_string());
    }

    pub fn clear_error(&self) {
        *self.force_error.lock() = None;
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    pub fn last_call(&self) -> Option<MockCall> {
        self.calls.lock().last().cloned()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn dispatch(
        &self,
        kind: CallKind,
        contract: &str,
        method: &str,
        args: &[ClarityValue],
        sender: &str,
    ) -> Result<ParsedTransactionResult> {
        let call = MockCall {
            kind,
            contract: contract.to_string(),
            method: method.to_string(),
            args: args.to_vec(),
            sender: sender.to_string(),
        };
        self.calls.lock().push(call.clone());

        if let Some(error) = self.force_error.lock().clone() {
            return Err(anyhow!("{}", error));
        }

        let key = (short_name(contract).to_string(), method.to_string());
        let handler = self
            .handlers
            .get(&key)
            .cloned()
            .ok_or_else(|| anyhow!("MockSimnet: no handler for {}::{}", contract, method))?;
        handler(&call)
    }
}

impl Default for MockSimnet {
    fn default() -> Self {
        Self::devnet()
    }
}

impl fmt::Debug for MockSimnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockSimnet")
            .field("deployer", &self.deployer)
            .field("accounts", &self.accounts)
            .field("contracts", &self.contracts.keys().collect::<Vec<_>>())
            .field("handlers", &self.handlers.len())
            .field("calls", &self.call_count())
            .finish()
    }
}

impl Simnet for MockSimnet {
    fn call_read_only_fn(
        &self,
        contract: &str,
        method: &str,
        args: &[ClarityValue],
        sender: &str,
    ) -> Result<ParsedTransactionResult> {
        self.dispatch(CallKind::ReadOnly, contract, method, args, sender)
    }

    fn call_public_fn(
        &self,
        contract: &str,
        method: &str,
        args: &[ClarityValue],
        sender: &str,
    ) -> Result<ParsedTransactionResult> {
        self.dispatch(CallKind::Public, contract, method, args, sender)
    }

    fn get_accounts(&self) -> BTreeMap<String, String> {
        self.accounts.clone()
    }

    fn get_contracts_interfaces(&self) -> BTreeMap<String, ContractInterface> {
        self.contracts.clone()
    }

    fn deployer(&self) -> String {
        self.deployer.clone()
    }
}

/// `ADDR.name` -> `name`; bare names pass through.
fn short_name(contract: &str) -> &str {
    contract.split_once('.').map_or(contract, |(_, name)| name)
}
