//! Core data structures
//!
//! Trade intents, quotes, execution status and scan results shared by the
//! leg state machine, the multi-leg sequencer and the opportunity scanner.
//!
//! Amounts that cross into the signer are base-unit integers (`U256`),
//! USD valuations are `f64` as returned by the quoting service.
//!
//! Created: 2026-10-18

use crate::error::{ExecutionError, LegAborted};
use alloy::primitives::{Address, Bytes, B256, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One leg: move `amount` of the origin token to the destination chain/token.
///
/// Immutable once handed to the executor. `id` is assigned by whoever
/// builds the intent (see `config::LegsFile`), never by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeIntent {
    pub id: u64,
    pub origin_chain_id: u64,
    pub origin_currency: Address,
    pub destination_chain_id: u64,
    pub destination_currency: Address,
    /// Amount in origin-token base units
    pub amount: U256,
}

/// Parameters of a single quote request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    /// Trader address (zero address when nobody is connected)
    pub user: Address,
    pub recipient: Option<Address>,
    pub origin_chain_id: u64,
    pub origin_currency: Address,
    pub destination_chain_id: u64,
    pub destination_currency: Address,
    pub amount: U256,
}

impl QuoteRequest {
    /// Quote an intent for `trader`, who is also the recipient on the destination chain
    pub fn for_intent(intent: &TradeIntent, trader: Address) -> Self {
        Self {
            user: trader,
            recipient: Some(trader),
            origin_chain_id: intent.origin_chain_id,
            origin_currency: intent.origin_currency,
            destination_chain_id: intent.destination_chain_id,
            destination_currency: intent.destination_currency,
            amount: intent.amount,
        }
    }
}

/// Fee and output valuation of a quote, in USD
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Valuation {
    pub input_usd: f64,
    pub output_usd: f64,
    pub fee_usd: f64,
    pub rate: Option<f64>,
    pub eta_seconds: Option<u64>,
}

/// On-chain transaction the signer must submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionStep {
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
    pub chain_id: u64,
}

/// What a step asks the signer to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepAction {
    Transaction(TransactionStep),
    Signature { message: String },
}

/// One atomic action of a quote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Settlement correlation id; the last one seen in a quote wins
    pub request_id: Option<String>,
    pub action: StepAction,
}

impl Step {
    pub fn kind(&self) -> &'static str {
        match self.action {
            StepAction::Transaction(_) => "transaction",
            StepAction::Signature { .. } => "signature",
        }
    }
}

/// Priced execution plan for one leg. Never reused across legs.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub steps: Vec<Step>,
    pub valuation: Valuation,
}

/// Lifecycle of a leg (plus the sequencer's `starting` marker)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Pending,
    Starting,
    Quoting,
    Signing,
    Executing,
    Complete,
    Failed,
    Error,
    Timeout,
}

impl ExecutionStatus {
    /// Terminal states are never left once reached
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ExecutionStatus::Complete
                | ExecutionStatus::Failed
                | ExecutionStatus::Error
                | ExecutionStatus::Timeout
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStatus::Pending => "pending",
            ExecutionStatus::Starting => "starting",
            ExecutionStatus::Quoting => "quoting",
            ExecutionStatus::Signing => "signing",
            ExecutionStatus::Executing => "executing",
            ExecutionStatus::Complete => "complete",
            ExecutionStatus::Failed => "failed",
            ExecutionStatus::Error => "error",
            ExecutionStatus::Timeout => "timeout",
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Informational update emitted while legs execute
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    pub leg_id: u64,
    /// Zero-based position in the sequence (set by the sequencer)
    pub leg_index: Option<usize>,
    pub total_legs: Option<usize>,
    pub status: ExecutionStatus,
    pub message: String,
    pub tx_hash: Option<B256>,
    /// Chain the transaction was sent on (for explorer links)
    pub chain_id: Option<u64>,
    pub request_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ProgressEvent {
    pub fn new(leg_id: u64, status: ExecutionStatus, message: impl Into<String>) -> Self {
        Self {
            leg_id,
            leg_index: None,
            total_legs: None,
            status,
            message: message.into(),
            tx_hash: None,
            chain_id: None,
            request_id: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_tx(mut self, tx_hash: B256, chain_id: u64) -> Self {
        self.tx_hash = Some(tx_hash);
        self.chain_id = Some(chain_id);
        self
    }

    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }

    /// Tag the event with its position in a multi-leg run
    pub fn for_leg(mut self, leg_index: usize, total_legs: usize) -> Self {
        self.leg_index = Some(leg_index);
        self.total_legs = Some(total_legs);
        self
    }
}

/// Settlement record returned by the status endpoint
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatusRecord {
    pub status: Option<String>,
    pub details: Option<String>,
    pub in_tx_hashes: Vec<String>,
    pub out_tx_hashes: Vec<String>,
    pub updated_at: Option<u64>,
}

/// Terminal result of one leg
#[derive(Debug, Clone, PartialEq)]
pub struct LegOutcome {
    pub leg_id: u64,
    /// complete | failed | timeout | error
    pub status: ExecutionStatus,
    pub tx_hashes: Vec<B256>,
    pub request_id: Option<String>,
    /// Last settlement record that decided the outcome
    pub settlement: Option<StatusRecord>,
    /// Number of status polls performed
    pub polls: u32,
    pub error: Option<ExecutionError>,
}

impl LegOutcome {
    /// Outcome for a leg aborted by a quote or signer failure. Keeps the
    /// transactions and request id submitted before the abort.
    pub fn from_error(leg_id: u64, aborted: LegAborted) -> Self {
        Self {
            leg_id,
            status: ExecutionStatus::Error,
            tx_hashes: aborted.tx_hashes,
            request_id: aborted.request_id,
            settlement: None,
            polls: 0,
            error: Some(aborted.error),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == ExecutionStatus::Complete
    }
}

/// `{leg, outcome}` pair, in submission order
#[derive(Debug, Clone, PartialEq)]
pub struct LegResult {
    pub intent: TradeIntent,
    pub outcome: LegOutcome,
}

/// Priced cross-chain move of one reference asset, with spread metrics
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult {
    pub token: String,
    pub decimals: u8,
    pub origin_chain_id: u64,
    pub origin_chain_name: String,
    pub origin_currency: Address,
    pub destination_chain_id: u64,
    pub destination_chain_name: String,
    pub destination_currency: Address,
    pub amount: U256,
    pub input_usd: f64,
    pub output_usd: f64,
    pub fee_usd: f64,
    pub spread_percent: f64,
    pub net_profit_usd: f64,
    pub net_profit_percent: f64,
    pub rate: Option<f64>,
    pub eta_seconds: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        for status in [
            ExecutionStatus::Complete,
            ExecutionStatus::Failed,
            ExecutionStatus::Error,
            ExecutionStatus::Timeout,
        ] {
            assert!(status.is_terminal(), "{} should be terminal", status);
        }
        for status in [
            ExecutionStatus::Pending,
            ExecutionStatus::Starting,
            ExecutionStatus::Quoting,
            ExecutionStatus::Signing,
            ExecutionStatus::Executing,
        ] {
            assert!(!status.is_terminal(), "{} should be transient", status);
        }
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&ExecutionStatus::Timeout).unwrap();
        assert_eq!(json, "\"timeout\"");
        assert_eq!(ExecutionStatus::Executing.to_string(), "executing");
    }

    #[test]
    fn test_quote_request_uses_trader_as_recipient() {
        let trader = Address::repeat_byte(0x11);
        let intent = TradeIntent {
            id: 7,
            origin_chain_id: 1,
            origin_currency: Address::ZERO,
            destination_chain_id: 8453,
            destination_currency: Address::ZERO,
            amount: U256::from(1_000u64),
        };

        let request = QuoteRequest::for_intent(&intent, trader);
        assert_eq!(request.user, trader);
        assert_eq!(request.recipient, Some(trader));
        assert_eq!(request.amount, U256::from(1_000u64));
        assert_eq!(request.destination_chain_id, 8453);
    }

    #[test]
    fn test_error_outcome_keeps_submitted_transactions() {
        let aborted = LegAborted {
            error: ExecutionError::SignerFailure("ledger unplugged".to_string()),
            tx_hashes: vec![B256::repeat_byte(0xaa)],
            request_id: Some("0xreq".to_string()),
        };

        let outcome = LegOutcome::from_error(2, aborted);
        assert_eq!(outcome.status, ExecutionStatus::Error);
        assert_eq!(outcome.tx_hashes, vec![B256::repeat_byte(0xaa)]);
        assert_eq!(outcome.request_id.as_deref(), Some("0xreq"));
        assert_eq!(outcome.polls, 0);
        assert!(!outcome.is_complete());
    }

    #[test]
    fn test_event_tagging() {
        let event = ProgressEvent::new(3, ExecutionStatus::Quoting, "Getting quote...")
            .with_request_id(Some("0xabc".to_string()))
            .for_leg(1, 4);

        assert_eq!(event.leg_index, Some(1));
        assert_eq!(event.total_legs, Some(4));
        assert_eq!(event.request_id.as_deref(), Some("0xabc"));
        assert!(event.tx_hash.is_none());
    }
}
