//! Settlement status classification
//!
//! | status text                       | state    |
//! |-----------------------------------|----------|
//! | `success`, `complete`, `filled`   | Complete |
//! | `failed`, `refunded`              | Failed   |
//! | anything else, or missing         | Pending  |
//!
//! Exact, case-sensitive match. Unknown text is never treated as terminal.
//!
//! Created: 2026-10-18

use crate::types::{ExecutionStatus, StatusRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementState {
    Complete,
    Failed,
    Pending,
}

impl SettlementState {
    pub fn classify(status: Option<&str>) -> Self {
        match status {
            Some("success") | Some("complete") | Some("filled") => SettlementState::Complete,
            Some("failed") | Some("refunded") => SettlementState::Failed,
            _ => SettlementState::Pending,
        }
    }

    /// Leg status this settlement state ends in, if any
    pub fn terminal_status(self) -> Option<ExecutionStatus> {
        match self {
            SettlementState::Complete => Some(ExecutionStatus::Complete),
            SettlementState::Failed => Some(ExecutionStatus::Failed),
            SettlementState::Pending => None,
        }
    }
}

impl From<&StatusRecord> for SettlementState {
    fn from(record: &StatusRecord) -> Self {
        SettlementState::classify(record.status.as_deref())
    }
}
