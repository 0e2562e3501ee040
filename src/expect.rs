//! Chained assertions on contract return values.
//!
//! ```
//! use simnet_harness::expect::Expectation;
//! use simnet_harness::types::{ClarityType, ClarityValue};
//!
//! Expectation::new(ClarityValue::ok(ClarityValue::uint(7u32)))
//!     .to_have_clarity_type(ClarityType::ResponseOk)
//!     .to_be_ok(ClarityValue::uint(7u32));
//! ```
//!
//! Matchers panic on mismatch, like `assert!`, and report the caller's
//! location.

use std::collections::BTreeMap;

use simnet_harness_types::{ClarityType, ClarityValue};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expectation {
    actual: ClarityValue,
}

impl Expectation {
    pub fn new(actual: ClarityValue) -> Self {
        Self { actual }
    }

    pub fn actual(&self) -> &ClarityValue {
        &self.actual
    }

    #[track_caller]
    pub fn to_have_clarity_type(&self, expected: ClarityType) -> &Self {
        let got = self.actual.clarity_type();
        if got != expected {
            self.fail(&format!("to have clarity type {}, got {}", expected, got));
        }
        self
    }

    #[track_caller]
    pub fn to_equal(&self, expected: &ClarityValue) -> &Self {
        if &self.actual != expected {
            self.fail(&format!("to equal {}", expected));
        }
        self
    }

    /// `(ok expected)`
    #[track_caller]
    pub fn to_be_ok(&self, expected: ClarityValue) -> &Self {
        self.wrapped(ClarityType::ResponseOk, &expected)
    }

    /// `(err expected)`
    #[track_caller]
    pub fn to_be_err(&self, expected: ClarityValue) -> &Self {
        self.wrapped(ClarityType::ResponseErr, &expected)
    }

    /// `(some expected)`
    #[track_caller]
    pub fn to_be_some(&self, expected: ClarityValue) -> &Self {
        self.wrapped(ClarityType::OptionalSome, &expected)
    }

    #[track_caller]
    pub fn to_be_none(&self) -> &Self {
        self.to_have_clarity_type(ClarityType::OptionalNone)
    }

    #[track_caller]
    pub fn to_be_bool(&self, expected: bool) -> &Self {
        self.to_equal(&ClarityValue::Bool(expected))
    }

    #[track_caller]
    pub fn to_be_int(&self, expected: i128) -> &Self {
        self.to_equal(&ClarityValue::Int(expected))
    }

    #[track_caller]
    pub fn to_be_uint(&self, expected: u128) -> &Self {
        self.to_equal(&ClarityValue::UInt(expected))
    }

    #[track_caller]
    pub fn to_be_ascii(&self, expected: &str) -> &Self {
        self.to_equal(&ClarityValue::ascii(expected))
    }

    #[track_caller]
    pub fn to_be_utf8(&self, expected: &str) -> &Self {
        self.to_equal(&ClarityValue::utf8(expected))
    }

    #[track_caller]
    pub fn to_be_buff(&self, expected: &[u8]) -> &Self {
        self.to_equal(&ClarityValue::buffer(expected))
    }

    /// Standard (`ST...`) or contract (`ST....name`) principal.
    #[track_caller]
    pub fn to_be_principal(&self, expected: &str) -> &Self {
        match self.actual.principal_text() {
            Some(text) if text == expected => self,
            _ => self.fail(&format!("to be principal '{}", expected)),
        }
    }

    #[track_caller]
    pub fn to_be_list(&self, expected: Vec<ClarityValue>) -> &Self {
        self.to_equal(&ClarityValue::List(expected))
    }

    #[track_caller]
    pub fn to_be_tuple(&self, expected: BTreeMap<String, ClarityValue>) -> &Self {
        self.to_equal(&ClarityValue::Tuple(expected))
    }

    #[track_caller]
    fn wrapped(&self, kind: ClarityType, expected: &ClarityValue) -> &Self {
        self.to_have_clarity_type(kind);
        match self.actual.inner() {
            Some(inner) if inner == expected => self,
            _ => self.fail(&format!("to be ({} {})", kind, expected)),
        }
    }

    #[track_caller]
    fn fail(&self, what: &str) -> ! {
        panic!("expected {} {}", self.actual, what)
    }
}

/// Start an assertion chain on `value`.
pub fn expect(value: ClarityValue) -> Expectation {
    Expectation::new(value)
}
