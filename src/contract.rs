//! Contract Handle
//!
//! `ContractHandle` lets a test call a deployed contract's functions by name,
//! picking the public or read-only path from the contract's interface.
//!
//! Names are resolved in a fixed order by [`ContractHandle::resolve`]:
//!
//! 1. a contract function, by its camel-case name (`get-counter` -> `getCounter`)
//! 2. a member of the optional [`ContractExtension`]
//! 3. one of the handle's own members ([`OwnMember`])
//!
//! Anything else is [`Resolution::Unresolved`], which [`ContractHandle::invoke`]
//! reports as `Ok(None)` rather than an error.

use anyhow::Result;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use simnet_harness_types::{ClarityValue, FunctionAccess, FunctionSignature};

use crate::engine::CallKind;
use crate::errors::HarnessError;
use crate::result::CallResult;
use crate::session::ExtendedSimnet;
use crate::utils::kebab_to_camel;

/// Helper object attached to a handle. Its members are consulted after the
/// contract's functions and before the handle's own members.
pub trait ContractExtension: Send + Sync {
    /// Look up a member by name.
    fn member(&self, name: &str) -> Option<ExtensionMember>;

    /// Invoke a member that [`member`](Self::member) reported as a method.
    ///
    /// `contract` is the handle the extension was reached through.
    fn call(&self, name: &str, contract: &ContractHandle, args: &[ClarityValue]) -> Result<Outcome>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionMember {
    Field(ClarityValue),
    Method,
}

/// Members every handle defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OwnMember {
    GetSender,
    GetPrincipal,
    Connect,
    Debug,
    ContractName,
}

impl OwnMember {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "getSender" => Some(OwnMember::GetSender),
            "getPrincipal" => Some(OwnMember::GetPrincipal),
            "connect" => Some(OwnMember::Connect),
            "debug" => Some(OwnMember::Debug),
            "contractName" => Some(OwnMember::ContractName),
            _ => None,
        }
    }

    /// Properties (`debug`, `contractName`) take no arguments.
    pub fn is_method(&self) -> bool {
        !matches!(self, OwnMember::Debug | OwnMember::ContractName)
    }
}

/// What a name resolves to on a handle.
#[derive(Debug)]
pub enum Resolution<'a> {
    ContractCall(ContractFunction<'a>),
    ExtensionMember(ExtensionMember),
    OwnMember(OwnMember),
    Unresolved,
}

/// Value produced by [`ContractHandle::invoke`].
#[derive(Debug, Clone)]
pub enum Outcome {
    Call(CallResult),
    Value(ClarityValue),
    Text(String),
    Handle(ContractHandle),
}

impl Outcome {
    pub fn into_call(self) -> Option<CallResult> {
        match self {
            Outcome::Call(result) => Some(result),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<ClarityValue> {
        match self {
            Outcome::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Outcome::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn into_handle(self) -> Option<ContractHandle> {
        match self {
            Outcome::Handle(handle) => Some(handle),
            _ => None,
        }
    }
}

/// A contract function bound to the handle it was resolved on.
#[derive(Clone, Copy)]
pub struct ContractFunction<'a> {
    handle: &'a ContractHandle,
    signature: &'a FunctionSignature,
}

impl<'a> ContractFunction<'a> {
    pub fn signature(&self) -> &'a FunctionSignature {
        self.signature
    }

    /// Public functions go through the state-mutating path; everything else
    /// is called read-only.
    pub fn kind(&self) -> CallKind {
        match self.signature.access {
            FunctionAccess::Public => CallKind::Public,
            FunctionAccess::ReadOnly | FunctionAccess::Private => CallKind::ReadOnly,
        }
    }

    /// Validate `args` against the signature, then call through the session
    /// with its connected sender.
    pub fn call(&self, args: &[ClarityValue]) -> Result<CallResult> {
        let sig = self.signature;
        if args.len() != sig.arity() {
            return Err(HarnessError::ArityMismatch {
                function: sig.name.clone(),
                expected: sig.arity(),
                got: args.len(),
                signature: sig.args_json(),
            }
            .into());
        }
        for (idx, (arg, declared)) in args.iter().zip(&sig.args).enumerate() {
            if !declared.ty.admits(arg) {
                return Err(HarnessError::ArgumentTypeMismatch {
                    function: sig.name.clone(),
                    argument: idx,
                    expected: declared.ty.to_string(),
                    got: arg.pretty_print(),
                }
                .into());
            }
        }

        let session = &self.handle.simnet;
        let contract = &self.handle.contract_name;
        match self.kind() {
            CallKind::Public => session.call_public_fn(contract, &sig.name, args, None),
            CallKind::ReadOnly => session.call_read_only_fn(contract, &sig.name, args, None),
        }
    }
}

impl fmt::Debug for ContractFunction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractFunction")
            .field("contract", &self.handle.contract_name)
            .field("signature", self.signature)
            .finish()
    }
}

/// Inputs to [`ContractHandle::create`].
#[derive(Clone)]
pub struct ContractParams {
    pub simnet: ExtendedSimnet,
    pub contract_name: String,
    /// Connect the session to this sender first.
    pub sender: Option<String>,
    /// Force tracing on; `false` keeps the session's setting.
    pub debug: bool,
    pub extension: Option<Arc<dyn ContractExtension>>,
}

impl ContractParams {
    pub fn new(simnet: ExtendedSimnet, contract_name: &str) -> Self {
        Self {
            simnet,
            contract_name: contract_name.to_string(),
            sender: None,
            debug: false,
            extension: None,
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

    pub fn with_extension(mut self, extension: Arc<dyn ContractExtension>) -> Self {
        self.extension = Some(extension);
        self
    }
}

/// A named contract bound to a session.
#[derive(Clone)]
pub struct ContractHandle {
    simnet: ExtendedSimnet,
    contract_name: String,
    /// Interface key, `deployer.contract-name`.
    contract_id: String,
    functions: Arc<Vec<FunctionSignature>>,
    /// Camel-case name to index in `functions`; first signature wins.
    lookup: Arc<HashMap<String, usize>>,
    extension: Option<Arc<dyn ContractExtension>>,
}

impl ContractHandle {
    /// Create a handle, fetching the contract's interface from the engine.
    pub fn create(params: ContractParams) -> Result<Self> {
        let mut simnet = params.simnet;
        if let Some(sender) = params.sender.as_deref().filter(|s| !s.is_empty()) {
            simnet = simnet.connect(Some(sender))?;
        }
        if params.debug {
            simnet = simnet.debug();
        }

        let name = params.contract_name;
        let (contract_id, interface) = simnet
            .get_contracts_interfaces()
            .into_iter()
            .find(|(id, _)| id.split('.').nth(1) == Some(name.as_str()))
            .ok_or_else(|| HarnessError::ContractNotFound {
                contract: name.clone(),
            })?;

        let mut lookup = HashMap::with_capacity(interface.functions.len());
        for (idx, function) in interface.functions.iter().enumerate() {
            lookup.entry(kebab_to_camel(&function.name)).or_insert(idx);
        }

        Ok(Self {
            simnet,
            contract_name: name,
            contract_id,
            functions: Arc::new(interface.functions),
            lookup: Arc::new(lookup),
            extension: params.extension,
        })
    }

    /// Resolve `name` without calling anything.
    pub fn resolve(&self, name: &str) -> Resolution<'_> {
        if let Some(function) = self.function(name) {
            return Resolution::ContractCall(function);
        }
        if let Some(member) = self.extension.as_ref().and_then(|ext| ext.member(name)) {
            return Resolution::ExtensionMember(member);
        }
        if let Some(member) = OwnMember::from_name(name) {
            return Resolution::OwnMember(member);
        }
        debug!(contract = %self.contract_name, name, "unresolved member");
        Resolution::Unresolved
    }

    /// Resolve `name` and forward `args` to whatever it names.
    ///
    /// Returns `Ok(None)` for unresolved names. Fields and properties accept
    /// no arguments.
    pub fn invoke(&self, name: &str, args: &[ClarityValue]) -> Result<Option<Outcome>> {
        match self.resolve(name) {
            Resolution::ContractCall(function) => Ok(Some(Outcome::Call(function.call(args)?))),
            Resolution::ExtensionMember(ExtensionMember::Field(value)) => {
                expect_no_args(name, args)?;
                Ok(Some(Outcome::Value(value)))
            }
            Resolution::ExtensionMember(ExtensionMember::Method) => match &self.extension {
                Some(extension) => Ok(Some(extension.call(name, self, args)?)),
                None => Ok(None),
            },
            Resolution::OwnMember(member) => self.invoke_own(member, args).map(Some),
            Resolution::Unresolved => Ok(None),
        }
    }

    /// The contract function with camel-case name `name`, if any.
    pub fn function(&self, name: &str) -> Option<ContractFunction<'_>> {
        let idx = *self.lookup.get(name)?;
        Some(ContractFunction {
            handle: self,
            signature: &self.functions[idx],
        })
    }

    pub fn functions(&self) -> &[FunctionSignature] {
        &self.functions
    }

    pub fn contract_name(&self) -> &str {
        &self.contract_name
    }

    pub fn contract_id(&self) -> &str {
        &self.contract_id
    }

    pub fn simnet(&self) -> &ExtendedSimnet {
        &self.simnet
    }

    pub fn extension(&self) -> Option<&Arc<dyn ContractExtension>> {
        self.extension.as_ref()
    }

    /// The session's connected identity.
    pub fn get_sender(&self) -> &str {
        self.simnet.get_principal()
    }

    /// This contract's principal value.
    pub fn get_principal(&self) -> Result<ClarityValue> {
        self.simnet.get_deployed_contract_principal(&self.contract_name)
    }

    /// A new handle for the same contract calling as `sender` (or the
    /// session's default sender). The extension is kept.
    ///
    /// The sender is resolved here and the resulting address is handed to
    /// [`create`](Self::create), which resolves it again; literal addresses
    /// resolve to themselves.
    pub fn connect(&self, sender: Option<&str>) -> Result<Self> {
        let requested = sender
            .filter(|s| !s.is_empty())
            .unwrap_or(self.simnet.default_sender());
        let resolved = self.simnet.parse_sender(requested)?;

        let mut params = ContractParams::new(self.simnet.clone(), &self.contract_name)
            .with_sender(&resolved)
            .with_debug(self.simnet.is_debug());
        params.extension = self.extension.clone();
        Self::create(params)
    }

    /// A new handle with tracing forced on.
    pub fn debug(&self) -> Self {
        Self {
            simnet: self.simnet.debug(),
            ..self.clone()
        }
    }

    pub fn is_debug(&self) -> bool {
        self.simnet.is_debug()
    }

    fn invoke_own(&self, member: OwnMember, args: &[ClarityValue]) -> Result<Outcome> {
        match member {
            OwnMember::GetSender => {
                expect_no_args("getSender", args)?;
                Ok(Outcome::Text(self.get_sender().to_string()))
            }
            OwnMember::GetPrincipal => {
                expect_no_args("getPrincipal", args)?;
                Ok(Outcome::Value(self.get_principal()?))
            }
            OwnMember::Connect => {
                let sender = match args {
                    [] => None,
                    [arg] => Some(sender_text(arg)?),
                    _ => {
                        return Err(HarnessError::ArityMismatch {
                            function: "connect".to_string(),
                            expected: 1,
                            got: args.len(),
                            signature: r#"[{"name":"sender","type":"principal"}]"#.to_string(),
                        }
                        .into())
                    }
                };
                Ok(Outcome::Handle(self.connect(sender.as_deref())?))
            }
            OwnMember::Debug => {
                expect_no_args("debug", args)?;
                Ok(Outcome::Handle(self.debug()))
            }
            OwnMember::ContractName => {
                expect_no_args("contractName", args)?;
                Ok(Outcome::Text(self.contract_name.clone()))
            }
        }
    }
}

impl fmt::Debug for ContractHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractHandle")
            .field("contract_id", &self.contract_id)
            .field("simnet", &self.simnet)
            .field("functions", &self.functions.len())
            .field("extension", &self.extension.is_some())
            .finish()
    }
}

fn expect_no_args(name: &str, args: &[ClarityValue]) -> Result<()> {
    if args.is_empty() {
        return Ok(());
    }
    Err(HarnessError::ArityMismatch {
        function: name.to_string(),
        expected: 0,
        got: args.len(),
        signature: "[]".to_string(),
    }
    .into())
}

/// A `connect` argument: a principal, or a string holding an alias or address.
fn sender_text(arg: &ClarityValue) -> Result<String> {
    match arg {
        ClarityValue::StringAscii(text) | ClarityValue::StringUtf8(text) => Ok(text.clone()),
        other => other.principal_text().ok_or_else(|| {
            HarnessError::ArgumentTypeMismatch {
                function: "connect".to_string(),
                argument: 0,
                expected: "principal".to_string(),
                got: other.pretty_print(),
            }
            .into()
        }),
    }
}
