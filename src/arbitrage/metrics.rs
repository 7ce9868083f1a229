//! Spread and net profit metrics, ranking
//!
//! spread%     = (out - in) / in * 100
//! net profit  = out - in - fee
//! net profit% = net profit / in * 100
//!
//! Created: 2026-10-18

use crate::types::{ScanResult, Valuation};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpreadMetrics {
    pub spread_percent: f64,
    pub net_profit_usd: f64,
    pub net_profit_percent: f64,
}

impl SpreadMetrics {
    /// `None` when either side of the valuation is not positive
    pub fn compute(valuation: &Valuation) -> Option<Self> {
        let input = valuation.input_usd;
        let output = valuation.output_usd;
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(input) || !positive(output) || !valuation.fee_usd.is_finite() {
            return None;
        }

        let net_profit_usd = output - input - valuation.fee_usd;
        Some(Self {
            spread_percent: (output - input) / input * 100.0,
            net_profit_usd,
            net_profit_percent: net_profit_usd / input * 100.0,
        })
    }
}

/// Sort by net profit % descending; equal values keep arrival order
pub fn rank_by_net_profit(results: &mut [ScanResult]) {
    results.sort_by(|a, b| b.net_profit_percent.total_cmp(&a.net_profit_percent));
}

/// Accumulates live scan results, re-ranked on every push
#[derive(Debug, Clone, Default)]
pub struct RankedResults {
    results: Vec<ScanResult>,
}

impl RankedResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: ScanResult) {
        self.results.push(result);
        rank_by_net_profit(&mut self.results);
    }

    pub fn as_slice(&self) -> &[ScanResult] {
        &self.results
    }

    pub fn best(&self) -> Option<&ScanResult> {
        self.results.first()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn into_vec(self) -> Vec<ScanResult> {
        self.results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::valuation;
    use alloy::primitives::{Address, U256};

    fn result(token: &str, net_profit_percent: f64) -> ScanResult {
        ScanResult {
            token: token.to_string(),
            decimals: 6,
            origin_chain_id: 1,
            origin_chain_name: "Ethereum".to_string(),
            origin_currency: Address::ZERO,
            destination_chain_id: 10,
            destination_chain_name: "Optimism".to_string(),
            destination_currency: Address::ZERO,
            amount: U256::from(1u64),
            input_usd: 100.0,
            output_usd: 100.0,
            fee_usd: 0.0,
            spread_percent: 0.0,
            net_profit_usd: net_profit_percent,
            net_profit_percent,
            rate: None,
            eta_seconds: None,
        }
    }

    #[test]
    fn test_metric_values() {
        let m = SpreadMetrics::compute(&valuation(100.0, 99.5, 0.2)).unwrap();
        assert!((m.spread_percent - -0.5).abs() < 1e-9);
        assert!((m.net_profit_usd - -0.7).abs() < 1e-9);
        assert!((m.net_profit_percent - -0.7).abs() < 1e-9);
    }

    #[test]
    fn test_non_positive_sides_are_rejected() {
        assert!(SpreadMetrics::compute(&valuation(100.0, 0.0, 0.1)).is_none());
        assert!(SpreadMetrics::compute(&valuation(0.0, 10.0, 0.1)).is_none());
        assert!(SpreadMetrics::compute(&valuation(-5.0, 10.0, 0.1)).is_none());
        assert!(SpreadMetrics::compute(&valuation(f64::NAN, 10.0, 0.1)).is_none());
    }

    #[test]
    fn test_non_finite_values_are_rejected() {
        assert!(SpreadMetrics::compute(&valuation(100.0, f64::INFINITY, 0.1)).is_none());
        assert!(SpreadMetrics::compute(&valuation(f64::INFINITY, 10.0, 0.1)).is_none());
        assert!(SpreadMetrics::compute(&valuation(100.0, 101.0, f64::NAN)).is_none());
    }

    #[test]
    fn test_ranking_descending() {
        let mut results = vec![result("A", 1.2), result("B", -0.3), result("C", 3.5)];
        rank_by_net_profit(&mut results);
        let ranked: Vec<f64> = results.iter().map(|r| r.net_profit_percent).collect();
        assert_eq!(ranked, vec![3.5, 1.2, -0.3]);
    }

    #[test]
    fn test_ties_keep_arrival_order() {
        let mut results = vec![result("first", 0.5), result("top", 2.0), result("second", 0.5)];
        rank_by_net_profit(&mut results);
        let tokens: Vec<&str> = results.iter().map(|r| r.token.as_str()).collect();
        assert_eq!(tokens, vec!["top", "first", "second"]);
    }

    #[test]
    fn test_ranked_accumulator() {
        let mut ranked = RankedResults::new();
        ranked.push(result("A", 1.2));
        assert_eq!(ranked.best().unwrap().token, "A");
        ranked.push(result("B", -0.3));
        ranked.push(result("C", 3.5));

        assert_eq!(ranked.len(), 3);
        let order: Vec<&str> = ranked.as_slice().iter().map(|r| r.token.as_str()).collect();
        assert_eq!(order, vec!["C", "A", "B"]);
    }
}
