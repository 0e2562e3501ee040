//! Shared types for the simnet-harness workspace.
//!
//! These are the values that cross the boundary between the harness and a
//! simulation engine:
//!
//! - [`address`]: literal address parsing ([`is_address`], [`parse_address`])
//! - [`value`]: decoded contract values ([`ClarityValue`]) and their kinds
//! - [`interface`]: contract interfaces and function signatures
//! - [`transaction`]: raw call results and emitted events

pub mod address;
pub mod interface;
pub mod transaction;
pub mod value;

pub use address::{
    encode_address, is_address, parse_address, AddressError, StacksAddress, TESTNET_ZERO_ADDRESS,
};
pub use interface::{
    ContractInterface, FunctionAccess, FunctionArg, FunctionOutput, FunctionSignature,
    TupleEntry, TypeDescriptor,
};
pub use transaction::{EventData, ParsedTransactionResult, TransactionEvent};
pub use value::{is_valid_contract_name, ClarityType, ClarityValue, PrincipalError};
