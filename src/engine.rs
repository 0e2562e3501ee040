//! Simulation Engine Abstraction
//!
//! This module provides the `Simnet` trait: the capabilities the harness needs
//! from the engine that actually executes contract code. The harness never
//! executes anything itself; every call ends up here.
//!
//! Implementations:
//! - a binding to a real simulator
//! - [`MockSimnet`](crate::mock::MockSimnet) for tests
//!
//! All methods take `&self`. Every session derived through `connect`/`debug`
//! shares one `Arc<dyn Simnet>`, so an engine that mutates chain state must
//! use interior mutability.

use anyhow::Result;
use std::collections::BTreeMap;

use simnet_harness_types::{ClarityValue, ContractInterface, ParsedTransactionResult};

/// Which engine entry point a call went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    ReadOnly,
    Public,
}

impl std::fmt::Display for CallKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            CallKind::ReadOnly => "read-only",
            CallKind::Public => "public",
        })
    }
}

/// Trait for contract simulation engines.
///
/// `sender` is always a literal address by the time the harness calls in.
/// Errors returned here are passed through the harness unchanged.
pub trait Simnet: Send + Sync {
    /// Call a read-only function. Must not change chain state.
    fn call_read_only_fn(
        &self,
        contract: &str,
        method: &str,
        args: &[ClarityValue],
        sender: &str,
    ) -> Result<ParsedTransactionResult>;

    /// Call a public function as a transaction from `sender`.
    fn call_public_fn(
        &self,
        contract: &str,
        method: &str,
        args: &[ClarityValue],
        sender: &str,
    ) -> Result<ParsedTransactionResult>;

    /// Account table: alias (e.g. `wallet_1`) to literal address.
    fn get_accounts(&self) -> BTreeMap<String, String>;

    /// Interfaces of every deployed contract, keyed by `deployer.contract-name`.
    fn get_contracts_interfaces(&self) -> BTreeMap<String, ContractInterface>;

    /// Literal address of the deployer account.
    fn deployer(&self) -> String;
}
