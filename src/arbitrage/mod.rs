//! Arbitrage Module
//!
//! Cross-chain spread scanning: candidate generation, spread metrics and
//! the batched opportunity scanner.
//!
//! Created: 2026-10-18

pub mod metrics;
pub mod pairs;
pub mod scanner;

pub use metrics::{rank_by_net_profit, RankedResults, SpreadMetrics};
pub use pairs::{default_scan_pairs, generate_scan_pairs, ScanCandidate};
pub use scanner::{OpportunityScanner, ScannerConfig};
