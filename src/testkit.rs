//! Scripted collaborators for unit tests
//!
//! Quote clients and signers that replay queued responses and record
//! what they were asked, plus small builders for quotes and intents.

use crate::error::{QuoteError, SignerError, StatusError};
use crate::relay::QuoteClient;
use crate::types::{
    Quote, QuoteRequest, StatusRecord, Step, StepAction, TradeIntent, TransactionStep, Valuation,
};
use crate::wallet::WalletSigner;
use alloy::primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

pub fn intent(id: u64) -> TradeIntent {
    TradeIntent {
        id,
        origin_chain_id: 8453,
        origin_currency: Address::ZERO,
        destination_chain_id: 42161,
        destination_currency: Address::ZERO,
        amount: U256::from(1_000_000_000_000_000u64),
    }
}

pub fn valuation(input_usd: f64, output_usd: f64, fee_usd: f64) -> Valuation {
    Valuation {
        input_usd,
        output_usd,
        fee_usd,
        rate: None,
        eta_seconds: Some(10),
    }
}

pub fn tx_step(chain_id: u64, request_id: Option<&str>) -> Step {
    Step {
        request_id: request_id.map(str::to_string),
        action: StepAction::Transaction(TransactionStep {
            to: Address::repeat_byte(0xaa),
            data: Bytes::from(vec![0x01, 0x02]),
            value: U256::ZERO,
            chain_id,
        }),
    }
}

pub fn sig_step(request_id: Option<&str>) -> Step {
    Step {
        request_id: request_id.map(str::to_string),
        action: StepAction::Signature {
            message: "0x1234".to_string(),
        },
    }
}

pub fn quote(steps: Vec<Step>) -> Quote {
    Quote {
        steps,
        valuation: valuation(100.0, 99.8, 0.1),
    }
}

pub fn status(text: &str) -> StatusRecord {
    StatusRecord {
        status: Some(text.to_string()),
        ..Default::default()
    }
}

/// Replays queued quote and status responses in order.
///
/// Once the status queue is drained every poll returns `fallback_status`.
pub struct ScriptedQuoteClient {
    quotes: Mutex<VecDeque<Result<Quote, QuoteError>>>,
    statuses: Mutex<VecDeque<Result<StatusRecord, StatusError>>>,
    fallback_status: String,
    pub requests: Mutex<Vec<QuoteRequest>>,
    pub status_times: Mutex<Vec<Instant>>,
}

impl ScriptedQuoteClient {
    pub fn new() -> Self {
        Self {
            quotes: Mutex::new(VecDeque::new()),
            statuses: Mutex::new(VecDeque::new()),
            fallback_status: "pending".to_string(),
            requests: Mutex::new(Vec::new()),
            status_times: Mutex::new(Vec::new()),
        }
    }

    pub fn with_quote(self, quote: Result<Quote, QuoteError>) -> Self {
        self.quotes.lock().unwrap().push_back(quote);
        self
    }

    pub fn with_status(self, status: Result<StatusRecord, StatusError>) -> Self {
        self.statuses.lock().unwrap().push_back(status);
        self
    }

    pub fn polls(&self) -> usize {
        self.status_times.lock().unwrap().len()
    }
}

#[async_trait]
impl QuoteClient for ScriptedQuoteClient {
    async fn quote(&self, request: &QuoteRequest) -> Result<Quote, QuoteError> {
        self.requests.lock().unwrap().push(request.clone());
        self.quotes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(QuoteError::Transport("no quote scripted".to_string())))
    }

    async fn status(&self, _request_id: &str) -> Result<StatusRecord, StatusError> {
        self.status_times.lock().unwrap().push(Instant::now());
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(status(&self.fallback_status)))
    }
}

/// Signer that succeeds unless a failure is queued, logging every call
pub struct ScriptedSigner {
    address: Address,
    can_switch: bool,
    send_results: Mutex<VecDeque<Result<B256, SignerError>>>,
    sign_results: Mutex<VecDeque<Result<String, SignerError>>>,
    pub calls: Mutex<Vec<String>>,
    sent: AtomicUsize,
}

impl ScriptedSigner {
    pub fn new() -> Self {
        Self {
            address: Address::repeat_byte(0x42),
            can_switch: true,
            send_results: Mutex::new(VecDeque::new()),
            sign_results: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            sent: AtomicUsize::new(0),
        }
    }

    pub fn without_switching(mut self) -> Self {
        self.can_switch = false;
        self
    }

    pub fn with_send_result(self, result: Result<B256, SignerError>) -> Self {
        self.send_results.lock().unwrap().push_back(result);
        self
    }

    pub fn with_sign_result(self, result: Result<String, SignerError>) -> Self {
        self.sign_results.lock().unwrap().push_back(result);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl WalletSigner for ScriptedSigner {
    fn address(&self) -> Address {
        self.address
    }

    async fn switch_network(&self, chain_id: u64) -> Result<(), SignerError> {
        self.calls.lock().unwrap().push(format!("switch:{}", chain_id));
        if self.can_switch {
            Ok(())
        } else {
            Err(SignerError::Unsupported("switching".to_string()))
        }
    }

    async fn send_transaction(&self, tx: &TransactionStep) -> Result<B256, SignerError> {
        self.calls.lock().unwrap().push(format!("send:{}", tx.chain_id));
        let n = self.sent.fetch_add(1, Ordering::SeqCst) as u8;
        self.send_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(B256::repeat_byte(n.wrapping_add(1))))
    }

    async fn sign_message(&self, _message: &str) -> Result<String, SignerError> {
        self.calls.lock().unwrap().push("sign".to_string());
        self.sign_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(format!("0x{}", "11".repeat(65))))
    }
}

/// Counts simultaneous in-flight quote calls; quotes by chain pair via `responder`
pub struct InstrumentedQuoteClient {
    latency: Duration,
    responder: Box<dyn Fn(&QuoteRequest) -> Result<Quote, QuoteError> + Send + Sync>,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub calls: AtomicUsize,
}

impl InstrumentedQuoteClient {
    pub fn new<F>(latency: Duration, responder: F) -> Self
    where
        F: Fn(&QuoteRequest) -> Result<Quote, QuoteError> + Send + Sync + 'static,
    {
        Self {
            latency,
            responder: Box::new(responder),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl QuoteClient for InstrumentedQuoteClient {
    async fn quote(&self, request: &QuoteRequest) -> Result<Quote, QuoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.latency).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        (self.responder)(request)
    }

    async fn status(&self, _request_id: &str) -> Result<StatusRecord, StatusError> {
        Err(StatusError::Api(404))
    }
}
