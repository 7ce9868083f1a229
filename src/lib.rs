//! ChainFunnel Library
//!
//! Multi-leg cross-chain execution over the Relay settlement network:
//! a per-leg state machine (quote, sign, poll settlement), a sequential
//! multi-leg runner, and a batched cross-chain spread scanner.
//!
//! Created: 2026-10-18

pub mod arbitrage;
pub mod chains;
pub mod config;
pub mod error;
pub mod execution;
pub mod format;
pub mod relay;
pub mod types;
pub mod wallet;

#[cfg(test)]
pub(crate) mod testkit;

// Re-export commonly used types
pub use arbitrage::{OpportunityScanner, RankedResults, ScannerConfig};
pub use config::{load_config, load_config_from_file, AppConfig, LegsFile};
pub use error::{ExecutionError, LegAborted, QuoteError, SignerError, StatusError};
pub use execution::{ExecutionConfig, LegExecutor, MultiLegSequencer};
pub use relay::{QuoteClient, RelayClient};
pub use types::{
    ExecutionStatus, LegOutcome, LegResult, ProgressEvent, Quote, ScanResult, TradeIntent,
};
pub use wallet::{LocalWalletSigner, WalletSigner};
