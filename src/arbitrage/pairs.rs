//! Scan candidate generation
//!
//! Every unordered chain pair (i < j, in deployment order) for each scan
//! asset deployed on both chains.
//!
//! Created: 2026-10-18

use crate::chains::{supported_chain_ids, ScanAsset, SCAN_ASSETS};
use crate::types::QuoteRequest;
use alloy::primitives::{Address, U256};

/// One chain pair to price for one asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanCandidate {
    pub token: &'static str,
    pub decimals: u8,
    pub origin_chain_id: u64,
    pub origin_currency: Address,
    pub destination_chain_id: u64,
    pub destination_currency: Address,
    pub amount: U256,
}

impl ScanCandidate {
    /// Anonymous quote: zero-address user, no recipient
    pub fn quote_request(&self) -> QuoteRequest {
        QuoteRequest {
            user: Address::ZERO,
            recipient: None,
            origin_chain_id: self.origin_chain_id,
            origin_currency: self.origin_currency,
            destination_chain_id: self.destination_chain_id,
            destination_currency: self.destination_currency,
            amount: self.amount,
        }
    }
}

pub fn generate_scan_pairs(assets: &[ScanAsset], chains: &[u64]) -> Vec<ScanCandidate> {
    let mut candidates = Vec::new();

    for asset in assets {
        let deployed: Vec<(u64, Address)> = asset
            .deployments
            .iter()
            .copied()
            .filter(|(chain_id, _)| chains.contains(chain_id))
            .collect();

        for (i, &(origin_chain_id, origin_currency)) in deployed.iter().enumerate() {
            for &(destination_chain_id, destination_currency) in &deployed[i + 1..] {
                candidates.push(ScanCandidate {
                    token: asset.symbol,
                    decimals: asset.decimals,
                    origin_chain_id,
                    origin_currency,
                    destination_chain_id,
                    destination_currency,
                    amount: U256::from(asset.scan_amount),
                });
            }
        }
    }

    candidates
}

/// Full basket over all supported chains
pub fn default_scan_pairs() -> Vec<ScanCandidate> {
    generate_scan_pairs(SCAN_ASSETS, &supported_chain_ids())
}
