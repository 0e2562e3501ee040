#![allow(dead_code)]
//! Shared test utilities for integration tests.
//!
//! - `fixtures`: the counter contract deployed on a `MockSimnet`
//! - `logs`: capture `tracing` output into a string

pub mod fixtures;
pub mod logs;

pub use fixtures::{counter_engine, counter_session, CounterFixture, COUNTER};
pub use logs::capture_logs;

use simnet_harness::HarnessError;

/// Downcast an `anyhow` error to the harness error it carries.
///
/// # Panics
///
/// Panics if `err` did not originate from the harness.
pub fn harness_error(err: &anyhow::Error) -> &HarnessError {
    err.downcast_ref::<HarnessError>()
        .unwrap_or_else(|| panic!("expected a harness error, got: {:#}", err))
}
