//! Contract interface descriptions as reported by the engine.
//!
//! The JSON shape matches the engine's interface dump:
//!
//! ```json
//! {
//!   "functions": [
//!     { "name": "get-counter", "access": "read_only", "args": [],
//!       "outputs": { "type": { "response": { "ok": "uint128", "error": "none" } } } }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::value::ClarityValue;

/// One deployed contract's interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ContractInterface {
    pub functions: Vec<FunctionSignature>,
    /// Variables, maps, tokens and other sections, kept verbatim.
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

impl ContractInterface {
    pub fn new(functions: Vec<FunctionSignature>) -> Self {
        Self {
            functions,
            other: BTreeMap::new(),
        }
    }

    /// Parse an interface from the engine's JSON representation.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// How a contract function may be called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionAccess {
    Public,
    #[serde(alias = "read-only")]
    ReadOnly,
    Private,
}

impl fmt::Display for FunctionAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FunctionAccess::Public => "public",
            FunctionAccess::ReadOnly => "read_only",
            FunctionAccess::Private => "private",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSignature {
    /// Hyphenated name as stored by the engine, e.g. `get-counter`.
    pub name: String,
    pub access: FunctionAccess,
    pub args: Vec<FunctionArg>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<FunctionOutput>,
}

impl FunctionSignature {
    pub fn new(name: &str, access: FunctionAccess, args: Vec<FunctionArg>) -> Self {
        Self {
            name: name.to_string(),
            access,
            args,
            outputs: None,
        }
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }

    /// Argument list as JSON, used in arity error messages.
    pub fn args_json(&self) -> String {
        serde_json::to_string(&self.args).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionArg {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
}

impl FunctionArg {
    pub fn new(name: &str, ty: TypeDescriptor) -> Self {
        Self {
            name: name.to_string(),
            ty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionOutput {
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
}

/// Declared type of a function argument or output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeDescriptor {
    #[serde(rename = "int128")]
    Int128,
    #[serde(rename = "uint128")]
    UInt128,
    Bool,
    Principal,
    #[serde(rename = "trait_reference")]
    TraitReference,
    /// The engine's `none` type: an unconstrained side of a response.
    #[serde(rename = "none")]
    NoType,
    Buffer {
        length: u32,
    },
    StringAscii {
        length: u32,
    },
    StringUtf8 {
        length: u32,
    },
    Optional(Box<TypeDescriptor>),
    Response {
        ok: Box<TypeDescriptor>,
        error: Box<TypeDescriptor>,
    },
    List {
        #[serde(rename = "type")]
        item: Box<TypeDescriptor>,
        length: u32,
    },
    Tuple(Vec<TupleEntry>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TupleEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
}

impl TypeDescriptor {
    /// Whether `value` is an instance of this type.
    ///
    /// Length bounds are upper bounds, as in Clarity. Tuples must carry
    /// exactly the declared fields.
    pub fn admits(&self, value: &ClarityValue) -> bool {
        match (self, value) {
            (TypeDescriptor::NoType, _) => true,
            (TypeDescriptor::Int128, ClarityValue::Int(_)) => true,
            (TypeDescriptor::UInt128, ClarityValue::UInt(_)) => true,
            (TypeDescriptor::Bool, ClarityValue::Bool(_)) => true,
            (
                TypeDescriptor::Principal,
                ClarityValue::StandardPrincipal(_) | ClarityValue::ContractPrincipal { .. },
            ) => true,
            (TypeDescriptor::TraitReference, ClarityValue::ContractPrincipal { .. }) => true,
            (TypeDescriptor::Buffer { length }, ClarityValue::Buffer(bytes)) => {
                bytes.len() <= *length as usize
            }
            (TypeDescriptor::StringAscii { length }, ClarityValue::StringAscii(s)) => {
                s.is_ascii() && s.len() <= *length as usize
            }
            (TypeDescriptor::StringUtf8 { length }, ClarityValue::StringUtf8(s)) => {
                s.chars().count() <= *length as usize
            }
            (TypeDescriptor::Optional(_), ClarityValue::OptionalNone) => true,
            (TypeDescriptor::Optional(inner), ClarityValue::OptionalSome(v)) => inner.admits(v),
            (TypeDescriptor::Response { ok, .. }, ClarityValue::ResponseOk(v)) => ok.admits(v),
            (TypeDescriptor::Response { error, .. }, ClarityValue::ResponseErr(v)) => {
                error.admits(v)
            }
            (TypeDescriptor::List { item, length }, ClarityValue::List(items)) => {
                items.len() <= *length as usize && items.iter().all(|v| item.admits(v))
            }
            (TypeDescriptor::Tuple(entries), ClarityValue::Tuple(fields)) => {
                entries.len() == fields.len()
                    && entries
                        .iter()
                        .all(|e| fields.get(&e.name).is_some_and(|v| e.ty.admits(v)))
            }
            _ => false,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Int128 => f.write_str("int"),
            TypeDescriptor::UInt128 => f.write_str("uint"),
            TypeDescriptor::Bool => f.write_str("bool"),
            TypeDescriptor::Principal => f.write_str("principal"),
            TypeDescriptor::TraitReference => f.write_str("<trait>"),
            TypeDescriptor::NoType => f.write_str("none"),
            TypeDescriptor::Buffer { length } => write!(f, "(buff {})", length),
            TypeDescriptor::StringAscii { length } => write!(f, "(string-ascii {})", length),
            TypeDescriptor::StringUtf8 { length } => write!(f, "(string-utf8 {})", length),
            TypeDescriptor::Optional(inner) => write!(f, "(optional {})", inner),
            TypeDescriptor::Response { ok, error } => write!(f, "(response {} {})", ok, error),
            TypeDescriptor::List { item, length } => write!(f, "(list {} {})", length, item),
            TypeDescriptor::Tuple(entries) => {
                f.write_str("(tuple")?;
                for entry in entries {
                    write!(f, " ({} {})", entry.name, entry.ty)?;
                }
                f.write_str(")")
            }
        }
    }
}
