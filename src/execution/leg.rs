//! Leg State Machine
//!
//! Drives one trade leg: fresh quote -> wallet prompts for each step in
//! order -> settlement polling by request id.
//!
//! quoting -> signing -> executing* -> complete | failed | timeout
//!
//! Quote and signer failures abort the leg immediately with a
//! `LegAborted` carrying anything already submitted (never retried). Failed status polls are logged and
//! the loop carries on. Only transient progress events are emitted here;
//! the terminal state is the return value.
//!
//! Created: 2026-10-18

use super::status::SettlementState;
use crate::error::{ExecutionError, LegAborted, SignerError};
use crate::relay::QuoteClient;
use crate::types::{
    ExecutionStatus, LegOutcome, ProgressEvent, QuoteRequest, StepAction, TradeIntent,
};
use crate::wallet::{classify_signer_error, WalletSigner};
use alloy::primitives::B256;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 3_000;
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 60;

/// Status polling cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionConfig {
    pub poll_interval: Duration,
    pub max_poll_attempts: u32,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            max_poll_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
        }
    }
}

pub struct LegExecutor<Q: ?Sized, S: ?Sized> {
    quotes: Arc<Q>,
    signer: Arc<S>,
    config: ExecutionConfig,
}

impl<Q, S> LegExecutor<Q, S>
where
    Q: QuoteClient + ?Sized,
    S: WalletSigner + ?Sized,
{
    pub fn new(quotes: Arc<Q>, signer: Arc<S>) -> Self {
        Self {
            quotes,
            signer,
            config: ExecutionConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ExecutionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    /// Run one leg to a terminal state.
    ///
    /// `Ok` carries `complete`, `failed` or `timeout`; quote and signer
    /// failures come back as `Err`, with the transactions submitted so far.
    pub async fn execute_leg<F>(
        &self,
        intent: &TradeIntent,
        on_update: &mut F,
    ) -> Result<LegOutcome, LegAborted>
    where
        F: FnMut(ProgressEvent) + Send,
    {
        let trader = self.signer.address();
        info!(
            "Leg {}: chain {} -> chain {} ({} base units)",
            intent.id, intent.origin_chain_id, intent.destination_chain_id, intent.amount
        );

        // 1. Fresh quote, never reused
        on_update(ProgressEvent::new(intent.id, ExecutionStatus::Quoting, "Getting quote..."));
        let request = QuoteRequest::for_intent(intent, trader);
        let quote = self.quotes.quote(&request).await.map_err(|e| {
            warn!("Leg {}: quote failed: {}", intent.id, e);
            LegAborted::from(ExecutionError::from(e))
        })?;
        info!(
            "Leg {}: quote with {} step(s), in ${:.2} out ${:.2} fee ${:.2}",
            intent.id,
            quote.steps.len(),
            quote.valuation.input_usd,
            quote.valuation.output_usd,
            quote.valuation.fee_usd
        );

        on_update(ProgressEvent::new(intent.id, ExecutionStatus::Signing, "Confirm in wallet..."));

        // 2. Steps strictly in quote order
        let mut request_id: Option<String> = None;
        let mut tx_hashes: Vec<B256> = Vec::new();

        for (index, step) in quote.steps.iter().enumerate() {
            if step.request_id.is_some() {
                request_id = step.request_id.clone();
            }
            debug!("Leg {}: step {} ({})", intent.id, index + 1, step.kind());

            match &step.action {
                StepAction::Transaction(tx) => {
                    // Best effort: a refused switch still lets submission try
                    if let Err(e) = self.signer.switch_network(tx.chain_id).await {
                        debug!("Leg {}: network switch to {} skipped: {}", intent.id, tx.chain_id, e);
                    }

                    let tx_hash = match self.signer.send_transaction(tx).await {
                        Ok(hash) => hash,
                        Err(e) => return Err(abort(intent.id, &e, tx_hashes, request_id)),
                    };
                    tx_hashes.push(tx_hash);

                    on_update(
                        ProgressEvent::new(intent.id, ExecutionStatus::Executing, "Transaction submitted")
                            .with_tx(tx_hash, tx.chain_id)
                            .with_request_id(request_id.clone()),
                    );
                }
                StepAction::Signature { message } => {
                    if let Err(e) = self.signer.sign_message(message).await {
                        return Err(abort(intent.id, &e, tx_hashes, request_id));
                    }

                    on_update(
                        ProgressEvent::new(intent.id, ExecutionStatus::Executing, "Signature submitted")
                            .with_request_id(request_id.clone()),
                    );
                }
            }
        }

        // 3. Settlement
        match request_id {
            Some(request_id) => {
                self.poll_settlement(intent.id, request_id, tx_hashes, on_update)
                    .await
            }
            None => {
                info!("Leg {}: nothing to track, complete", intent.id);
                Ok(LegOutcome {
                    leg_id: intent.id,
                    status: ExecutionStatus::Complete,
                    tx_hashes,
                    request_id: None,
                    settlement: None,
                    polls: 0,
                    error: None,
                })
            }
        }
    }

    async fn poll_settlement<F>(
        &self,
        leg_id: u64,
        request_id: String,
        tx_hashes: Vec<B256>,
        on_update: &mut F,
    ) -> Result<LegOutcome, LegAborted>
    where
        F: FnMut(ProgressEvent) + Send,
    {
        let max_attempts = self.config.max_poll_attempts;

        for attempt in 1..=max_attempts {
            tokio::time::sleep(self.config.poll_interval).await;

            let record = match self.quotes.status(&request_id).await {
                Ok(record) => record,
                Err(e) => {
                    let err = ExecutionError::StatusPollTransientError(e.to_string());
                    warn!("Leg {}: poll {}/{}: {}", leg_id, attempt, max_attempts, err);
                    continue;
                }
            };

            let state = SettlementState::from(&record);
            if let Some(status) = state.terminal_status() {
                info!(
                    "Leg {}: settlement {} after {} poll(s) ({})",
                    leg_id,
                    status,
                    attempt,
                    record.status.as_deref().unwrap_or("-")
                );
                return Ok(LegOutcome {
                    leg_id,
                    status,
                    tx_hashes,
                    request_id: Some(request_id),
                    settlement: Some(record),
                    polls: attempt,
                    error: None,
                });
            }

            let text = record.status.as_deref().unwrap_or("unknown");
            debug!("Leg {}: poll {}/{} status {}", leg_id, attempt, max_attempts, text);
            on_update(
                ProgressEvent::new(leg_id, ExecutionStatus::Executing, format!("Status: {}", text))
                    .with_request_id(Some(request_id.clone())),
            );
        }

        let err = ExecutionError::StatusPollTimeout {
            attempts: max_attempts,
        };
        warn!("Leg {}: {}", leg_id, err);
        Ok(LegOutcome {
            leg_id,
            status: ExecutionStatus::Timeout,
            tx_hashes,
            request_id: Some(request_id),
            settlement: None,
            polls: max_attempts,
            error: Some(err),
        })
    }
}

fn abort(
    leg_id: u64,
    err: &SignerError,
    tx_hashes: Vec<B256>,
    request_id: Option<String>,
) -> LegAborted {
    let classified = classify_signer_error(err);
    match &classified {
        ExecutionError::UserCancelled => info!("Leg {}: cancelled in wallet", leg_id),
        other => error!("Leg {}: signer error: {}", leg_id, other),
    }
    if !tx_hashes.is_empty() {
        warn!(
            "Leg {}: aborted after {} submitted transaction(s)",
            leg_id,
            tx_hashes.len()
        );
    }
    LegAborted {
        error: classified,
        tx_hashes,
        request_id,
    }
}
