//! Error taxonomy
//!
//! Collaborator errors (quote service, status endpoint, signer) and the
//! execution errors a leg can end with. Progress messages are built from
//! the `Display` impls, so the wording here is user facing.
//!
//! Created: 2026-10-18

use alloy::primitives::B256;
use thiserror::Error;

/// Quote service failure
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuoteError {
    /// Non-success response; `message` is the service's own message when it sent one
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Quote request failed: {0}")]
    Transport(String),

    #[error("Malformed quote response: {0}")]
    Malformed(String),
}

/// Status endpoint failure. Always transient from the poller's point of view.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatusError {
    #[error("Failed to get status: {0}")]
    Api(u16),

    #[error("Status request failed: {0}")]
    Transport(String),

    #[error("Malformed status response: {0}")]
    Malformed(String),
}

/// Signer failure as reported by the wallet implementation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignerError {
    #[error("User rejected the request: {0}")]
    UserRejected(String),

    #[error("Not supported by signer: {0}")]
    Unsupported(String),

    #[error("{0}")]
    Failed(String),
}

/// Why a leg ended without completing
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecutionError {
    #[error("Quote unavailable: {0}")]
    QuoteUnavailable(String),

    #[error("Transaction cancelled by user")]
    UserCancelled,

    #[error("{0}")]
    SignerFailure(String),

    #[error("Settlement not final after {attempts} status polls")]
    StatusPollTimeout { attempts: u32 },

    /// Single failed poll; logged and retried, never ends a leg
    #[error("Status poll failed: {0}")]
    StatusPollTransientError(String),
}

impl From<QuoteError> for ExecutionError {
    fn from(err: QuoteError) -> Self {
        ExecutionError::QuoteUnavailable(err.to_string())
    }
}

/// A leg that stopped before settlement tracking, with whatever it had
/// already submitted. Displays as the underlying `ExecutionError`.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{error}")]
pub struct LegAborted {
    pub error: ExecutionError,
    /// Transactions accepted by the signer before the abort
    pub tx_hashes: Vec<B256>,
    /// Settlement id seen before the abort, if any
    pub request_id: Option<String>,
}

impl From<ExecutionError> for LegAborted {
    fn from(error: ExecutionError) -> Self {
        Self {
            error,
            tx_hashes: Vec::new(),
            request_id: None,
        }
    }
}

/// Human amount could not be converted to base units
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AmountError {
    #[error("Invalid amount '{0}'")]
    Invalid(String),

    #[error("Amount must be positive, got '{0}'")]
    NotPositive(String),

    #[error("Amount '{0}' does not fit in 256 bits")]
    Overflow(String),
}
