//! Session Wrapper
//!
//! This module provides `ExtendedSimnet` - a calling surface over a [`Simnet`]
//! engine that remembers who is calling. It adds:
//!
//! - **Default sender**: calls without an explicit sender use the connected identity
//! - **Alias resolution**: `wallet_1` and friends resolve through the engine's account table
//! - **Debug traces**: per-call `tracing` events with pretty-printed results
//! - **Chained expectations**: results carry the session's [`ExpectFn`]
//!
//! ## Usage
//!
//! ```ignore
//! let session = ExtendedSimnet::create(
//!     SessionParams::new(engine).with_expect(Arc::new(Expectation::new)),
//! )?;
//!
//! // wallet_1 by default
//! session.call_public_fn("counter", "increment", &[], None)?;
//!
//! // Derived sessions never touch the original
//! let alice = session.connect(Some("wallet_2"))?.debug();
//! alice.call_read_only_fn("counter", "get-counter", &[], None)?
//!     .expect()?
//!     .to_be_ok(ClarityValue::uint(1u32));
//! ```
//!
//! ## Forwarding
//!
//! `ExtendedSimnet` derefs to `dyn Simnet`, so engine operations the wrapper
//! does not define (`deployer`, `get_accounts`, ...) are reachable directly
//! and always run against the engine itself. The wrapper's own
//! `call_read_only_fn`/`call_public_fn` shadow the engine's.

use anyhow::Result;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use tracing::info;

use simnet_harness_types::{is_address, ClarityValue, ParsedTransactionResult};

use crate::config::HarnessConfig;
use crate::engine::{CallKind, Simnet};
use crate::errors::HarnessError;
use crate::result::{CallResult, ExpectFn};

/// `tracing` target for debug-mode call traces.
pub const TRACE_TARGET: &str = "simnet_harness::trace";

/// Inputs to [`ExtendedSimnet::create`].
#[derive(Clone)]
pub struct SessionParams {
    pub simnet: Arc<dyn Simnet>,
    /// Alias or address; `None` or empty falls back to `default_sender`.
    pub sender: Option<String>,
    pub debug: bool,
    pub expect: Option<ExpectFn>,
    pub default_sender: String,
}

impl SessionParams {
    pub fn new(simnet: Arc<dyn Simnet>) -> Self {
        Self::with_config(simnet, HarnessConfig::default())
    }

    /// Params seeded from `SIMNET_HARNESS_*` environment variables.
    pub fn from_env(simnet: Arc<dyn Simnet>) -> Self {
        Self::with_config(simnet, HarnessConfig::from_env())
    }

    pub fn with_config(simnet: Arc<dyn Simnet>, config: HarnessConfig) -> Self {
        Self {
            simnet,
            sender: None,
            debug: config.debug,
            expect: None,
            default_sender: config.default_sender,
        }
    }

    pub fn with_sender(mut self, sender: &str) -> Self {
        self.sender = Some(sender.to_string());
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_expect(mut self, expect: ExpectFn) -> Self {
        self.expect = Some(expect);
        self
    }

    pub fn with_default_sender(mut self, sender: &str) -> Self {
        self.default_sender = sender.to_string();
        self
    }
}

/// An engine handle plus the current sender, debug flag and expectation.
///
/// Immutable by convention: `connect` and `debug` return new sessions that
/// share the engine but nothing else.
#[derive(Clone)]
pub struct ExtendedSimnet {
    simnet: Arc<dyn Simnet>,
    /// Always a literal address.
    sender: String,
    debug: bool,
    default_sender: String,
    expect: Option<ExpectFn>,
}

impl ExtendedSimnet {
    /// Create a session, resolving the sender (or the default) to an address.
    pub fn create(params: SessionParams) -> Result<Self> {
        let requested = params
            .sender
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| params.default_sender.clone());
        let sender = resolve_identity(params.simnet.as_ref(), &requested)?;

        Ok(Self {
            simnet: params.simnet,
            sender,
            debug: params.debug,
            default_sender: params.default_sender,
            expect: params.expect,
        })
    }

    /// Params that recreate this session.
    pub fn params(&self) -> SessionParams {
        SessionParams {
            simnet: Arc::clone(&self.simnet),
            sender: Some(self.sender.clone()),
            debug: self.debug,
            expect: self.expect.clone(),
            default_sender: self.default_sender.clone(),
        }
    }

    /// A new session calling as `sender`, or as the default sender when
    /// `sender` is `None` or empty.
    pub fn connect(&self, sender: Option<&str>) -> Result<Self> {
        let requested = sender
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.default_sender);
        let sender = self.parse_sender(requested)?;
        Ok(Self {
            sender,
            ..self.clone()
        })
    }

    /// A new session with call tracing on.
    pub fn debug(&self) -> Self {
        Self {
            debug: true,
            ..self.clone()
        }
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn call_read_only_fn(
        &self,
        contract: &str,
        method: &str,
        args: &[ClarityValue],
        sender: Option<&str>,
    ) -> Result<CallResult> {
        self.call(CallKind::ReadOnly, contract, method, args, sender)
    }

    pub fn call_public_fn(
        &self,
        contract: &str,
        method: &str,
        args: &[ClarityValue],
        sender: Option<&str>,
    ) -> Result<CallResult> {
        self.call(CallKind::Public, contract, method, args, sender)
    }

    /// The connected identity.
    pub fn get_principal(&self) -> &str {
        &self.sender
    }

    /// `deployer.contract_name` as a contract principal value.
    pub fn get_deployed_contract_principal(&self, contract_name: &str) -> Result<ClarityValue> {
        let deployer = self.simnet.deployer();
        Ok(ClarityValue::contract_principal(&deployer, contract_name)?)
    }

    /// Resolve an alias or address to a literal address.
    pub fn parse_sender(&self, sender: &str) -> Result<String> {
        resolve_identity(self.simnet.as_ref(), sender)
    }

    pub fn default_sender(&self) -> &str {
        &self.default_sender
    }

    pub fn simnet(&self) -> &Arc<dyn Simnet> {
        &self.simnet
    }

    fn call(
        &self,
        kind: CallKind,
        contract: &str,
        method: &str,
        args: &[ClarityValue],
        sender: Option<&str>,
    ) -> Result<CallResult> {
        // An explicit sender applies to this call only.
        let sender = match sender.filter(|s| !s.is_empty()) {
            Some(explicit) => self.parse_sender(explicit)?,
            None => self.sender.clone(),
        };

        let raw = match kind {
            CallKind::ReadOnly => self.simnet.call_read_only_fn(contract, method, args, &sender)?,
            CallKind::Public => self.simnet.call_public_fn(contract, method, args, &sender)?,
        };

        if self.debug {
            trace_call(kind, contract, method, &sender, &raw);
        }

        Ok(CallResult::new(raw, self.expect.clone()))
    }
}

impl Deref for ExtendedSimnet {
    type Target = dyn Simnet;

    fn deref(&self) -> &Self::Target {
        self.simnet.as_ref()
    }
}

impl fmt::Debug for ExtendedSimnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedSimnet")
            .field("sender", &self.sender)
            .field("debug", &self.debug)
            .field("default_sender", &self.default_sender)
            .field("expect", &self.expect.is_some())
            .finish_non_exhaustive()
    }
}

/// Empty input is an error; literal addresses pass through unchanged;
/// anything else must be an alias in the engine's account table.
fn resolve_identity(simnet: &dyn Simnet, sender: &str) -> Result<String> {
    if sender.is_empty() {
        return Err(HarnessError::IdentityUnresolved.into());
    }
    if is_address(sender) {
        return Ok(sender.to_string());
    }
    simnet
        .get_accounts()
        .remove(sender)
        .filter(|address| !address.is_empty())
        .ok_or_else(|| {
            HarnessError::IdentityLookupFailed {
                sender: sender.to_string(),
            }
            .into()
        })
}

fn trace_call(
    kind: CallKind,
    contract: &str,
    method: &str,
    sender: &str,
    raw: &ParsedTransactionResult,
) {
    let result = raw.result.pretty_print();
    match kind {
        CallKind::ReadOnly => {
            info!(
                target: TRACE_TARGET,
                contract,
                method,
                sender,
                result = %result,
                "[DEBUG] {}/{}",
                contract,
                method
            );
        }
        CallKind::Public => {
            let events: Vec<serde_json::Value> =
                raw.events.iter().map(|event| event.trace_json()).collect();
            let events = serde_json::to_string_pretty(&events).unwrap_or_default();
            info!(
                target: TRACE_TARGET,
                contract,
                method,
                sender,
                result = %result,
                events = %events,
                "[DEBUG] {}/{}",
                contract,
                method
            );
        }
    }
}
