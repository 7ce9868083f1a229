//! Signing interface collaborator
//!
//! `WalletSigner` is the single shared, non-reentrant signer the leg
//! executor drives. Signer failures are mapped onto the execution error
//! taxonomy by `classify_signer_error`.
//!
//! Created: 2026-10-18

pub mod local;

pub use local::LocalWalletSigner;

use crate::error::{ExecutionError, SignerError};
use crate::types::TransactionStep;
use alloy::primitives::{Address, B256};
use async_trait::async_trait;

#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// Trader address; also the recipient of every quoted leg
    fn address(&self) -> Address;

    /// Make `chain_id` the active network. Best effort; callers proceed on failure.
    async fn switch_network(&self, chain_id: u64) -> Result<(), SignerError> {
        Err(SignerError::Unsupported(format!(
            "network switching (chain {})",
            chain_id
        )))
    }

    async fn send_transaction(&self, tx: &TransactionStep) -> Result<B256, SignerError>;

    /// Returns the 0x-prefixed signature
    async fn sign_message(&self, message: &str) -> Result<String, SignerError>;
}

/// Lowercase fragments that identify a user rejection in signer error text
const CANCELLATION_PATTERNS: &[&str] = &[
    "user rejected",
    "user denied",
    "rejected the request",
    "request rejected",
    "user cancelled",
    "user canceled",
    "code: 4001",
    "code 4001",
    "\"code\":4001",
];

pub fn is_cancellation(message: &str) -> bool {
    let lower = message.to_lowercase();
    CANCELLATION_PATTERNS.iter().any(|p| lower.contains(p))
}

pub fn classify_signer_error(err: &SignerError) -> ExecutionError {
    match err {
        SignerError::UserRejected(_) => ExecutionError::UserCancelled,
        other => {
            let message = other.to_string();
            if is_cancellation(&message) {
                ExecutionError::UserCancelled
            } else {
                ExecutionError::SignerFailure(message)
            }
        }
    }
}
