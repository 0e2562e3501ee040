//! Harness error types.
//!
//! Every variant is a test-setup or call-site mistake, never a transient
//! condition. Engine failures are not wrapped; they reach the caller as the
//! engine produced them.

use std::fmt;

/// Structured errors raised by the session and contract wrappers.
///
/// Harness functions return `anyhow::Result`; match on a kind with
/// `err.downcast_ref::<HarnessError>()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarnessError {
    /// No sender was given and no default identity is configured.
    IdentityUnresolved,

    /// Sender is neither a literal address nor a known account alias.
    IdentityLookupFailed {
        /// The unresolved input
        sender: String,
    },

    /// No deployed contract has this name.
    ContractNotFound {
        contract: String,
    },

    /// Call-site argument count differs from the declared parameter count.
    ArityMismatch {
        /// Hyphenated function name
        function: String,
        expected: usize,
        got: usize,
        /// Declared arguments as JSON
        signature: String,
    },

    /// An argument is not an instance of its declared type.
    ArgumentTypeMismatch {
        function: String,
        /// Zero-based argument position
        argument: usize,
        /// Declared type in Clarity syntax
        expected: String,
        /// Offending value, pretty-printed
        got: String,
    },

    /// `expect` was used on a result but no expectation function was configured.
    ExpectationDisabled,
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarnessError::IdentityUnresolved => write!(f, "Connected sender is undefined!"),
            HarnessError::IdentityLookupFailed { sender } => write!(
                f,
                "Invalid sender: could not parse as address or get account from {}",
                sender
            ),
            HarnessError::ContractNotFound { contract } => {
                write!(f, "Contract {} not found", contract)
            }
            HarnessError::ArityMismatch {
                function,
                expected,
                got,
                signature,
            } => write!(
                f,
                "Wrong number of arguments for {} (expected {}, got {}), expecting: {}",
                function, expected, got, signature
            ),
            HarnessError::ArgumentTypeMismatch {
                function,
                argument,
                expected,
                got,
            } => write!(
                f,
                "Argument {} of {} has the wrong type: expected {}, got {}",
                argument, function, expected, got
            ),
            HarnessError::ExpectationDisabled => write!(
                f,
                "Expect chaining disabled: `expect` function was not passed as parameter"
            ),
        }
    }
}

impl std::error::Error for HarnessError {}
