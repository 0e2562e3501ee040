//! Decoded Clarity values.
//!
//! The engine hands back fully decoded values; nothing here serializes to the
//! consensus wire format. The harness only needs to build arguments, compare
//! results and render them for debug traces.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::address::{parse_address, AddressError};

/// Maximum contract name length in bytes.
pub const MAX_CONTRACT_NAME_LEN: usize = 128;

/// A decoded Clarity value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ClarityValue {
    Int(i128),
    #[serde(rename = "uint")]
    UInt(u128),
    Bool(bool),
    Buffer(Vec<u8>),
    StringAscii(String),
    StringUtf8(String),
    StandardPrincipal(String),
    ContractPrincipal {
        address: String,
        contract_name: String,
    },
    OptionalNone,
    OptionalSome(Box<ClarityValue>),
    ResponseOk(Box<ClarityValue>),
    ResponseErr(Box<ClarityValue>),
    List(Vec<ClarityValue>),
    Tuple(BTreeMap<String, ClarityValue>),
}

/// Value kind tag, one per runtime shape of [`ClarityValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClarityType {
    Int,
    UInt,
    Buffer,
    BoolTrue,
    BoolFalse,
    PrincipalStandard,
    PrincipalContract,
    ResponseOk,
    ResponseErr,
    OptionalNone,
    OptionalSome,
    List,
    Tuple,
    StringAscii,
    StringUtf8,
}

impl fmt::Display for ClarityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClarityType::Int => "int",
            ClarityType::UInt => "uint",
            ClarityType::Buffer => "buffer",
            ClarityType::BoolTrue => "true",
            ClarityType::BoolFalse => "false",
            ClarityType::PrincipalStandard => "address",
            ClarityType::PrincipalContract => "contract",
            ClarityType::ResponseOk => "ok",
            ClarityType::ResponseErr => "err",
            ClarityType::OptionalNone => "none",
            ClarityType::OptionalSome => "some",
            ClarityType::List => "list",
            ClarityType::Tuple => "tuple",
            ClarityType::StringAscii => "ascii",
            ClarityType::StringUtf8 => "utf8",
        };
        f.write_str(name)
    }
}

/// Error building a principal value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrincipalError {
    InvalidAddress(AddressError),
    InvalidContractName(String),
}

impl fmt::Display for PrincipalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrincipalError::InvalidAddress(err) => write!(f, "Invalid principal address: {}", err),
            PrincipalError::InvalidContractName(name) => {
                write!(f, "Invalid contract name: {:?}", name)
            }
        }
    }
}

impl std::error::Error for PrincipalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PrincipalError::InvalidAddress(err) => Some(err),
            PrincipalError::InvalidContractName(_) => None,
        }
    }
}

impl From<AddressError> for PrincipalError {
    fn from(err: AddressError) -> Self {
        PrincipalError::InvalidAddress(err)
    }
}

impl ClarityValue {
    pub fn int(value: impl Into<i128>) -> Self {
        ClarityValue::Int(value.into())
    }

    pub fn uint(value: impl Into<u128>) -> Self {
        ClarityValue::UInt(value.into())
    }

    pub fn bool(value: bool) -> Self {
        ClarityValue::Bool(value)
    }

    pub fn buffer(bytes: impl Into<Vec<u8>>) -> Self {
        ClarityValue::Buffer(bytes.into())
    }

    pub fn ascii(text: impl Into<String>) -> Self {
        ClarityValue::StringAscii(text.into())
    }

    pub fn utf8(text: impl Into<String>) -> Self {
        ClarityValue::StringUtf8(text.into())
    }

    pub fn none() -> Self {
        ClarityValue::OptionalNone
    }

    pub fn some(value: ClarityValue) -> Self {
        ClarityValue::OptionalSome(Box::new(value))
    }

    pub fn ok(value: ClarityValue) -> Self {
        ClarityValue::ResponseOk(Box::new(value))
    }

    pub fn error(value: ClarityValue) -> Self {
        ClarityValue::ResponseErr(Box::new(value))
    }

    pub fn list(items: impl IntoIterator<Item = ClarityValue>) -> Self {
        ClarityValue::List(items.into_iter().collect())
    }

    pub fn tuple<K: Into<String>>(fields: impl IntoIterator<Item = (K, ClarityValue)>) -> Self {
        ClarityValue::Tuple(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Build a standard principal, validating the address.
    pub fn standard_principal(address: &str) -> Result<Self, PrincipalError> {
        parse_address(address)?;
        Ok(ClarityValue::StandardPrincipal(address.to_string()))
    }

    /// Build a contract principal `address.contract_name`.
    ///
    /// # Examples
    ///
    /// ```
    /// use simnet_harness_types::ClarityValue;
    ///
    /// let principal = ClarityValue::contract_principal(
    ///     "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM",
    ///     "counter",
    /// )
    /// .unwrap();
    /// assert_eq!(
    ///     principal.pretty_print(),
    ///     "'ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM.counter"
    /// );
    /// ```
    pub fn contract_principal(address: &str, contract_name: &str) -> Result<Self, PrincipalError> {
        parse_address(address)?;
        if !is_valid_contract_name(contract_name) {
            return Err(PrincipalError::InvalidContractName(contract_name.to_string()));
        }
        Ok(ClarityValue::ContractPrincipal {
            address: address.to_string(),
            contract_name: contract_name.to_string(),
        })
    }

    /// Parse `ADDRESS` or `ADDRESS.contract-name` into a principal.
    pub fn principal(text: &str) -> Result<Self, PrincipalError> {
        match text.split_once('.') {
            Some((address, name)) => Self::contract_principal(address, name),
            None => Self::standard_principal(text),
        }
    }

    pub fn clarity_type(&self) -> ClarityType {
        match self {
            ClarityValue::Int(_) => ClarityType::Int,
            ClarityValue::UInt(_) => ClarityType::UInt,
            ClarityValue::Bool(true) => ClarityType::BoolTrue,
            ClarityValue::Bool(false) => ClarityType::BoolFalse,
            ClarityValue::Buffer(_) => ClarityType::Buffer,
            ClarityValue::StringAscii(_) => ClarityType::StringAscii,
            ClarityValue::StringUtf8(_) => ClarityType::StringUtf8,
            ClarityValue::StandardPrincipal(_) => ClarityType::PrincipalStandard,
            ClarityValue::ContractPrincipal { .. } => ClarityType::PrincipalContract,
            ClarityValue::OptionalNone => ClarityType::OptionalNone,
            ClarityValue::OptionalSome(_) => ClarityType::OptionalSome,
            ClarityValue::ResponseOk(_) => ClarityType::ResponseOk,
            ClarityValue::ResponseErr(_) => ClarityType::ResponseErr,
            ClarityValue::List(_) => ClarityType::List,
            ClarityValue::Tuple(_) => ClarityType::Tuple,
        }
    }

    /// Inner value of `(ok v)`, `(err v)` or `(some v)`.
    pub fn inner(&self) -> Option<&ClarityValue> {
        match self {
            ClarityValue::OptionalSome(v) | ClarityValue::ResponseOk(v) | ClarityValue::ResponseErr(v) => {
                Some(&**v)
            }
            _ => None,
        }
    }

    /// Principal text without the leading quote, if this is a principal.
    pub fn principal_text(&self) -> Option<String> {
        match self {
            ClarityValue::StandardPrincipal(address) => Some(address.clone()),
            ClarityValue::ContractPrincipal {
                address,
                contract_name,
            } => Some(format!("{}.{}", address, contract_name)),
            _ => None,
        }
    }

    /// Render in Clarity literal syntax, e.g. `(ok u1)`.
    pub fn pretty_print(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ClarityValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClarityValue::Int(v) => write!(f, "{}", v),
            ClarityValue::UInt(v) => write!(f, "u{}", v),
            ClarityValue::Bool(v) => write!(f, "{}", v),
            ClarityValue::Buffer(bytes) => write!(f, "0x{}", hex::encode(bytes)),
            ClarityValue::StringAscii(s) => write!(f, "\"{}\"", s),
            ClarityValue::StringUtf8(s) => write!(f, "u\"{}\"", s),
            ClarityValue::StandardPrincipal(address) => write!(f, "'{}", address),
            ClarityValue::ContractPrincipal {
                address,
                contract_name,
            } => write!(f, "'{}.{}", address, contract_name),
            ClarityValue::OptionalNone => f.write_str("none"),
            ClarityValue::OptionalSome(v) => write!(f, "(some {})", v),
            ClarityValue::ResponseOk(v) => write!(f, "(ok {})", v),
            ClarityValue::ResponseErr(v) => write!(f, "(err {})", v),
            ClarityValue::List(items) => {
                f.write_str("(list")?;
                for item in items {
                    write!(f, " {}", item)?;
                }
                f.write_str(")")
            }
            ClarityValue::Tuple(fields) => {
                if fields.is_empty() {
                    return f.write_str("{}");
                }
                let rendered: Vec<String> = fields
                    .iter()
                    .map(|(name, value)| format!("{}: {}", name, value))
                    .collect();
                write!(f, "{{ {} }}", rendered.join(", "))
            }
        }
    }
}

/// Clarity contract names: a letter, then letters, digits, `-` or `_`.
pub fn is_valid_contract_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    name.len() <= MAX_CONTRACT_NAME_LEN
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
