//! Quote service collaborator
//!
//! `QuoteClient` is the seam the leg executor and the scanner talk to.
//! `RelayClient` is the HTTP implementation against the Relay API.
//!
//! Created: 2026-10-18

pub mod client;
pub mod dto;

pub use client::{AppFeeConfig, RelayClient, DEFAULT_RELAY_API};

use crate::error::{QuoteError, StatusError};
use crate::types::{Quote, QuoteRequest, StatusRecord};
use async_trait::async_trait;

/// Prices trade intents and reports settlement status.
///
/// Stateless from the caller's point of view; safe to call concurrently.
#[async_trait]
pub trait QuoteClient: Send + Sync {
    async fn quote(&self, request: &QuoteRequest) -> Result<Quote, QuoteError>;

    async fn status(&self, request_id: &str) -> Result<StatusRecord, StatusError>;
}

