//! Leg execution
//!
//! Single-leg state machine, settlement status classification and the
//! sequential multi-leg runner.
//!
//! Created: 2026-10-18

pub mod leg;
pub mod sequencer;
pub mod status;

pub use leg::{ExecutionConfig, LegExecutor};
pub use sequencer::{sequence_completed, MultiLegSequencer};
pub use status::SettlementState;
