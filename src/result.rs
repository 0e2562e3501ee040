//! Call results returned by the harness.

use anyhow::Result;
use std::fmt;
use std::sync::Arc;

use simnet_harness_types::{ClarityValue, ParsedTransactionResult, TransactionEvent};

use crate::errors::HarnessError;
use crate::expect::Expectation;

/// Projection from a call's return value to an assertion object.
///
/// `Arc::new(Expectation::new)` is the usual choice.
pub type ExpectFn = Arc<dyn Fn(ClarityValue) -> Expectation + Send + Sync>;

/// A raw engine result plus the session's expectation function.
///
/// Built fresh for every call and owned by the caller.
#[derive(Clone)]
pub struct CallResult {
    /// Decoded return value.
    pub result: ClarityValue,
    /// Events in emission order.
    pub events: Vec<TransactionEvent>,
    expect: Option<ExpectFn>,
}

impl CallResult {
    pub fn new(raw: ParsedTransactionResult, expect: Option<ExpectFn>) -> Self {
        Self {
            result: raw.result,
            events: raw.events,
            expect,
        }
    }

    /// Apply the expectation function to the return value.
    ///
    /// Evaluated on each access. Fails with
    /// [`HarnessError::ExpectationDisabled`] when the session was created
    /// without one.
    pub fn expect(&self) -> Result<Expectation> {
        let project = self
            .expect
            .as_ref()
            .ok_or(HarnessError::ExpectationDisabled)?;
        Ok((**project)(self.result.clone()))
    }

    pub fn has_expect(&self) -> bool {
        self.expect.is_some()
    }

    pub fn into_parsed(self) -> ParsedTransactionResult {
        ParsedTransactionResult {
            result: self.result,
            events: self.events,
        }
    }
}

impl fmt::Debug for CallResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallResult")
            .field("result", &self.result)
            .field("events", &self.events)
            .field("expect", &self.expect.is_some())
            .finish()
    }
}
