//! Multi-Leg Sequencer
//!
//! Runs legs strictly one after another in caller order over a single
//! shared signer, tags every event with the leg position, and stops at
//! the first leg that does not complete. Completed legs are final: there
//! is no rollback.
//!
//! Created: 2026-10-18

use super::leg::LegExecutor;
use crate::relay::QuoteClient;
use crate::types::{ExecutionStatus, LegOutcome, LegResult, ProgressEvent, TradeIntent};
use crate::wallet::WalletSigner;
use tracing::{info, warn};

pub struct MultiLegSequencer<Q: ?Sized, S: ?Sized> {
    executor: LegExecutor<Q, S>,
}

impl<Q, S> MultiLegSequencer<Q, S>
where
    Q: QuoteClient + ?Sized,
    S: WalletSigner + ?Sized,
{
    pub fn new(executor: LegExecutor<Q, S>) -> Self {
        Self { executor }
    }

    /// Execute `intents` in order. Never fails: the returned list holds
    /// one entry per attempted leg, the last one being the leg that
    /// stopped the run (if any).
    pub async fn execute_multi_leg<F>(
        &self,
        intents: &[TradeIntent],
        on_update: &mut F,
    ) -> Vec<LegResult>
    where
        F: FnMut(ProgressEvent) + Send,
    {
        let total = intents.len();
        let mut results = Vec::with_capacity(total);
        info!("Executing {} leg(s) sequentially", total);

        for (index, intent) in intents.iter().enumerate() {
            let leg_no = index + 1;
            on_update(
                ProgressEvent::new(
                    intent.id,
                    ExecutionStatus::Starting,
                    format!("Executing leg {} of {}", leg_no, total),
                )
                .for_leg(index, total),
            );

            let mut forward = |event: ProgressEvent| on_update(event.for_leg(index, total));
            let result = self.executor.execute_leg(intent, &mut forward).await;

            let (outcome, message) = match result {
                Ok(outcome) => {
                    let message = match outcome.status {
                        ExecutionStatus::Complete => format!("Leg {} complete", leg_no),
                        ExecutionStatus::Failed => {
                            format!("Leg {} failed, stopping execution", leg_no)
                        }
                        _ => format!(
                            "Leg {} timed out waiting for settlement, stopping execution",
                            leg_no
                        ),
                    };
                    (outcome, message)
                }
                Err(aborted) => {
                    let message = format!("Leg {} error: {}. Stopping execution", leg_no, aborted);
                    (LegOutcome::from_error(intent.id, aborted), message)
                }
            };

            let status = outcome.status;
            let tx_hash = outcome.tx_hashes.last().copied();
            let mut event = ProgressEvent::new(intent.id, status, message)
                .with_request_id(outcome.request_id.clone())
                .for_leg(index, total);
            event.tx_hash = tx_hash;
            on_update(event);

            results.push(LegResult {
                intent: intent.clone(),
                outcome,
            });

            if status != ExecutionStatus::Complete {
                warn!(
                    "Sequence stopped at leg {} of {} ({}); {} leg(s) skipped",
                    leg_no,
                    total,
                    status,
                    total - leg_no
                );
                break;
            }
        }

        results
    }
}

/// True when every one of `total` legs ran and completed
pub fn sequence_completed(results: &[LegResult], total: usize) -> bool {
    results.len() == total && results.iter().all(|r| r.outcome.is_complete())
}
