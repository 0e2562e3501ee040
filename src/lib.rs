//! Simnet Harness
//!
//! Test-harness adapter over a contract simulation engine.
//!
//! The engine ([`Simnet`]) executes contract code. This crate adds the
//! ergonomics a test suite wants on top of it:
//!
//! - **Sessions**: [`ExtendedSimnet`] remembers the calling identity, resolves
//!   account aliases and optionally traces every call
//! - **Contract handles**: [`ContractHandle`] calls functions by camel-case
//!   name and checks arguments against the deployed interface
//! - **Assertions**: [`CallResult::expect`] feeds return values into
//!   [`Expectation`] matchers
//!
//! # Core Modules
//!
//! - [`engine`]: the `Simnet` trait
//! - [`session`]: `ExtendedSimnet` and `SessionParams`
//! - [`contract`]: `ContractHandle` and name resolution
//! - [`mock`]: in-memory engine for tests
//! - [`utils`]: `range`, `is_address`
//!
//! # Example
//!
//! ```ignore
//! use simnet_harness::{ContractHandle, ContractParams, ExtendedSimnet, SessionParams};
//!
//! let session = ExtendedSimnet::create(SessionParams::new(engine))?;
//! let counter = ContractHandle::create(ContractParams::new(session, "counter"))?;
//!
//! counter.invoke("increment", &[])?;
//! let alice = counter.connect(Some("wallet_2"))?;
//! alice.invoke("getCounter", &[])?;
//! ```

pub mod config;
pub mod contract;
pub mod engine;
pub mod errors;
pub mod expect;
pub mod mock;
pub mod result;
pub mod session;
pub mod utils;

pub use simnet_harness_types as types;

pub use config::HarnessConfig;
pub use contract::{
    ContractExtension, ContractFunction, ContractHandle, ContractParams, ExtensionMember,
    Outcome, OwnMember, Resolution,
};
pub use engine::{CallKind, Simnet};
pub use errors::HarnessError;
pub use expect::{expect, Expectation};
pub use result::{CallResult, ExpectFn};
pub use session::{ExtendedSimnet, SessionParams, TRACE_TARGET};
pub use utils::{is_address, range};
