//! Opportunity Scanner
//!
//! Prices every scan candidate against the quote service in bounded
//! concurrent batches, derives spread metrics and ranks by net profit %.
//!
//! Batching: `batch_size` quotes in flight via join_all, the whole batch
//! settles before the next starts, `batch_delay` between batches (not
//! after the last). Failed quotes and non-positive valuations are dropped.
//!
//! Created: 2026-10-18

use super::metrics::{rank_by_net_profit, SpreadMetrics};
use super::pairs::{default_scan_pairs, ScanCandidate};
use crate::chains::chain_name;
use crate::relay::QuoteClient;
use crate::types::ScanResult;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info};

pub const DEFAULT_BATCH_SIZE: usize = 4;
pub const DEFAULT_BATCH_DELAY_MS: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannerConfig {
    pub batch_size: usize,
    pub batch_delay: Duration,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay: Duration::from_millis(DEFAULT_BATCH_DELAY_MS),
        }
    }
}

pub struct OpportunityScanner<Q: ?Sized> {
    quotes: Arc<Q>,
    config: ScannerConfig,
    candidates: Vec<ScanCandidate>,
}

impl<Q> OpportunityScanner<Q>
where
    Q: QuoteClient + ?Sized,
{
    /// Scanner over the default basket
    pub fn new(quotes: Arc<Q>) -> Self {
        Self {
            quotes,
            config: ScannerConfig::default(),
            candidates: default_scan_pairs(),
        }
    }

    pub fn with_config(mut self, config: ScannerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_candidates(mut self, candidates: Vec<ScanCandidate>) -> Self {
        self.candidates = candidates;
        self
    }

    pub fn candidates(&self) -> &[ScanCandidate] {
        &self.candidates
    }

    /// Run one scan session.
    ///
    /// `on_result` sees each result as its batch settles (arrival order);
    /// the returned list is ranked.
    pub async fn scan_arbitrage<F>(&self, mut on_result: F) -> Vec<ScanResult>
    where
        F: FnMut(&ScanResult) + Send,
    {
        let batch_size = self.config.batch_size.max(1);
        let total_batches = self.candidates.len().div_ceil(batch_size);
        info!(
            "Scanning {} candidates in {} batch(es) of {}",
            self.candidates.len(),
            total_batches,
            batch_size
        );

        let mut results = Vec::new();
        for (batch_index, batch) in self.candidates.chunks(batch_size).enumerate() {
            let settled = join_all(batch.iter().map(|c| self.evaluate(c))).await;

            for result in settled.into_iter().flatten() {
                on_result(&result);
                results.push(result);
            }

            if batch_index + 1 < total_batches {
                tokio::time::sleep(self.config.batch_delay).await;
            }
        }

        rank_by_net_profit(&mut results);
        info!(
            "Scan complete: {} of {} candidates priced",
            results.len(),
            self.candidates.len()
        );
        results
    }

    async fn evaluate(&self, candidate: &ScanCandidate) -> Option<ScanResult> {
        let quote = match self.quotes.quote(&candidate.quote_request()).await {
            Ok(quote) => quote,
            Err(e) => {
                debug!(
                    "Dropped {} {} -> {}: {}",
                    candidate.token, candidate.origin_chain_id, candidate.destination_chain_id, e
                );
                return None;
            }
        };

        let valuation = quote.valuation;
        let Some(metrics) = SpreadMetrics::compute(&valuation) else {
            debug!(
                "Dropped {} {} -> {}: non-positive valuation (in ${}, out ${})",
                candidate.token,
                candidate.origin_chain_id,
                candidate.destination_chain_id,
                valuation.input_usd,
                valuation.output_usd
            );
            return None;
        };

        Some(ScanResult {
            token: candidate.token.to_string(),
            decimals: candidate.decimals,
            origin_chain_id: candidate.origin_chain_id,
            origin_chain_name: chain_name(candidate.origin_chain_id),
            origin_currency: candidate.origin_currency,
            destination_chain_id: candidate.destination_chain_id,
            destination_chain_name: chain_name(candidate.destination_chain_id),
            destination_currency: candidate.destination_currency,
            amount: candidate.amount,
            input_usd: valuation.input_usd,
            output_usd: valuation.output_usd,
            fee_usd: valuation.fee_usd,
            spread_percent: metrics.spread_percent,
            net_profit_usd: metrics.net_profit_usd,
            net_profit_percent: metrics.net_profit_percent,
            rate: valuation.rate,
            eta_seconds: valuation.eta_seconds,
        })
    }
}

impl<Q> OpportunityScanner<Q>
where
    Q: QuoteClient + ?Sized + 'static,
{
    /// Spawn a scan and stream its results in arrival order
    pub fn scan_stream(self: Arc<Self>) -> ReceiverStream<ScanResult> {
        let (tx, rx) = mpsc::channel(self.candidates.len().max(1));

        tokio::spawn(async move {
            self.scan_arbitrage(|result| {
                if tx.try_send(result.clone()).is_err() {
                    debug!("Scan stream receiver gone, result discarded");
                }
            })
            .await;
        });

        ReceiverStream::new(rx)
    }
}
