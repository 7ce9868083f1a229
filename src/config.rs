//! Configuration management
//!
//! Runtime settings come from the environment (optionally a `.env` file);
//! trade legs come from a TOML file of `[[leg]]` tables.
//!
//! Created: 2026-10-18

use crate::arbitrage::ScannerConfig;
use crate::chains::NATIVE_TOKEN;
use crate::execution::ExecutionConfig;
use crate::format::parse_base_units;
use crate::relay::{AppFeeConfig, DEFAULT_RELAY_API};
use crate::types::TradeIntent;
use alloy::primitives::Address;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

const RPC_URL_PREFIX: &str = "RPC_URL_";
const DEFAULT_APP_FEE_BPS: u32 = 30;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub relay_api_url: String,
    pub http_timeout: Duration,
    /// Only needed to execute legs
    pub private_key: Option<String>,
    /// Per-chain RPC endpoints for the local signer
    pub rpc_urls: HashMap<u64, String>,
    pub app_fee: Option<AppFeeConfig>,
    pub execution: ExecutionConfig,
    pub scanner: ScannerConfig,
}

/// Load from the process environment, after reading `.env` if present
pub fn load_config() -> Result<AppConfig> {
    dotenv::dotenv().ok();
    AppConfig::from_vars(&std::env::vars().collect())
}

/// Load from the process environment, after reading `env_file` if present
pub fn load_config_from_file<P: AsRef<Path>>(env_file: P) -> Result<AppConfig> {
    dotenv::from_path(env_file.as_ref()).ok();
    AppConfig::from_vars(&std::env::vars().collect())
}

fn parse_var<T>(vars: &HashMap<String, String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty()) {
        Some(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid {} '{}': {}", key, raw, e)),
        None => Ok(default),
    }
}

impl AppConfig {
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        let relay_api_url = vars
            .get("RELAY_API_URL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_RELAY_API.to_string());

        let private_key = vars
            .get("PRIVATE_KEY")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let mut rpc_urls = HashMap::new();
        for (key, value) in vars {
            if let Some(suffix) = key.strip_prefix(RPC_URL_PREFIX) {
                let chain_id: u64 = suffix
                    .parse()
                    .with_context(|| format!("Invalid chain id in {}", key))?;
                rpc_urls.insert(chain_id, value.trim().to_string());
            }
        }

        let app_fee = match vars.get("APP_FEE_RECIPIENT").map(|v| v.trim()) {
            Some(raw) if !raw.is_empty() => {
                let recipient = Address::from_str(raw)
                    .with_context(|| format!("Invalid APP_FEE_RECIPIENT '{}'", raw))?;
                Some(AppFeeConfig {
                    recipient,
                    fee_bps: parse_var(vars, "APP_FEE_BPS", DEFAULT_APP_FEE_BPS)?,
                })
            }
            _ => None,
        };

        let execution = ExecutionConfig {
            poll_interval: Duration::from_millis(parse_var(
                vars,
                "POLL_INTERVAL_MS",
                crate::execution::leg::DEFAULT_POLL_INTERVAL_MS,
            )?),
            max_poll_attempts: parse_var(
                vars,
                "MAX_POLL_ATTEMPTS",
                crate::execution::leg::DEFAULT_MAX_POLL_ATTEMPTS,
            )?,
        };
        if execution.max_poll_attempts == 0 {
            bail!("MAX_POLL_ATTEMPTS must be at least 1");
        }

        let scanner = ScannerConfig {
            batch_size: parse_var(
                vars,
                "SCAN_BATCH_SIZE",
                crate::arbitrage::scanner::DEFAULT_BATCH_SIZE,
            )?,
            batch_delay: Duration::from_millis(parse_var(
                vars,
                "SCAN_BATCH_DELAY_MS",
                crate::arbitrage::scanner::DEFAULT_BATCH_DELAY_MS,
            )?),
        };
        if scanner.batch_size == 0 {
            bail!("SCAN_BATCH_SIZE must be at least 1");
        }

        Ok(Self {
            relay_api_url,
            http_timeout: Duration::from_secs(parse_var(
                vars,
                "HTTP_TIMEOUT_SECS",
                DEFAULT_HTTP_TIMEOUT_SECS,
            )?),
            private_key,
            rpc_urls,
            app_fee,
            execution,
            scanner,
        })
    }
}

/// Legs file: a list of `[[leg]]` tables
#[derive(Debug, Clone, Deserialize)]
pub struct LegsFile {
    #[serde(rename = "leg", default)]
    pub legs: Vec<LegConfig>,
}

/// One leg as written by the user
#[derive(Debug, Clone, Deserialize)]
pub struct LegConfig {
    pub origin_chain_id: u64,
    /// Token address, or "native"
    pub origin_currency: String,
    pub destination_chain_id: u64,
    pub destination_currency: String,
    /// Human amount, e.g. "0.05"
    pub amount: String,
    #[serde(default = "default_decimals")]
    pub decimals: u8,
}

fn default_decimals() -> u8 { 18 }

fn parse_currency(raw: &str) -> Result<Address> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("native") {
        return Ok(NATIVE_TOKEN);
    }
    Address::from_str(raw).with_context(|| format!("Invalid currency address '{}'", raw))
}

impl LegConfig {
    pub fn to_intent(&self, id: u64) -> Result<TradeIntent> {
        Ok(TradeIntent {
            id,
            origin_chain_id: self.origin_chain_id,
            origin_currency: parse_currency(&self.origin_currency)?,
            destination_chain_id: self.destination_chain_id,
            destination_currency: parse_currency(&self.destination_currency)?,
            amount: parse_base_units(&self.amount, self.decimals)
                .with_context(|| format!("Leg {}", id))?,
        })
    }
}

impl LegsFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read legs file: {}", path.as_ref().display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse legs file")
    }

    /// Build intents in file order, ids counting up from 1
    pub fn into_intents(self) -> Result<Vec<TradeIntent>> {
        if self.legs.is_empty() {
            bail!("Legs file contains no [[leg]] entries");
        }
        self.legs
            .iter()
            .zip(1u64..)
            .map(|(leg, id)| leg.to_intent(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::U256;
    use rust_decimal::prelude::ToPrimitive;
    use rust_decimal_macros::dec;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_vars(&HashMap::new()).unwrap();
        assert_eq!(config.relay_api_url, "https://api.relay.link");
        assert_eq!(config.execution, ExecutionConfig::default());
        assert_eq!(config.execution.poll_interval, Duration::from_secs(3));
        assert_eq!(config.execution.max_poll_attempts, 60);
        assert_eq!(config.scanner.batch_size, 4);
        assert_eq!(config.scanner.batch_delay, Duration::from_millis(500));
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert!(config.private_key.is_none());
        assert!(config.app_fee.is_none());
        assert!(config.rpc_urls.is_empty());
    }

    #[test]
    fn test_overrides_and_rpc_table() {
        let config = AppConfig::from_vars(&vars(&[
            ("RELAY_API_URL", "https://api.testnets.relay.link"),
            ("PRIVATE_KEY", " 0xabc "),
            ("RPC_URL_8453", "https://mainnet.base.org"),
            ("RPC_URL_42161", "https://arb1.arbitrum.io/rpc"),
            ("POLL_INTERVAL_MS", "1000"),
            ("SCAN_BATCH_SIZE", "2"),
            ("APP_FEE_RECIPIENT", "0x1111111111111111111111111111111111111111"),
        ]))
        .unwrap();

        assert_eq!(config.relay_api_url, "https://api.testnets.relay.link");
        assert_eq!(config.private_key.as_deref(), Some("0xabc"));
        assert_eq!(config.rpc_urls.len(), 2);
        assert_eq!(config.rpc_urls[&8453], "https://mainnet.base.org");
        assert_eq!(config.execution.poll_interval, Duration::from_secs(1));
        assert_eq!(config.scanner.batch_size, 2);

        let fee = config.app_fee.unwrap();
        assert_eq!(fee.recipient, Address::repeat_byte(0x11));
        assert_eq!(fee.fee_bps, 30);
    }

    #[test]
    fn test_invalid_values() {
        assert!(AppConfig::from_vars(&vars(&[("MAX_POLL_ATTEMPTS", "lots")])).is_err());
        assert!(AppConfig::from_vars(&vars(&[("MAX_POLL_ATTEMPTS", "0")])).is_err());
        assert!(AppConfig::from_vars(&vars(&[("SCAN_BATCH_SIZE", "0")])).is_err());
        assert!(AppConfig::from_vars(&vars(&[("RPC_URL_BASE", "http://x")])).is_err());
        assert!(AppConfig::from_vars(&vars(&[("APP_FEE_RECIPIENT", "0x12")])).is_err());
    }

    #[test]
    fn test_parse_legs_file() {
        let toml_str = r#"
[[leg]]
origin_chain_id = 8453
origin_currency = "native"
destination_chain_id = 42161
destination_currency = "0x0000000000000000000000000000000000000000"
amount = "0.05"

[[leg]]
origin_chain_id = 10
origin_currency = "0x0b2c639c533813f4aa9d7837caf62653d097ff85"
destination_chain_id = 137
destination_currency = "0x3c499c542cef5e3811e1192ce70d8cc03d5c3359"
amount = "250.1234567"
decimals = 6
"#;

        let intents = LegsFile::parse(toml_str).unwrap().into_intents().unwrap();
        assert_eq!(intents.len(), 2);

        assert_eq!(intents[0].id, 1);
        assert_eq!(intents[0].origin_currency, NATIVE_TOKEN);
        let expected_wei = (dec!(0.05) * dec!(1000000000000000000)).to_u128().unwrap();
        assert_eq!(intents[0].amount, U256::from(expected_wei));

        assert_eq!(intents[1].id, 2);
        assert_eq!(intents[1].destination_chain_id, 137);
        // truncated to 6 decimals
        assert_eq!(intents[1].amount, U256::from(250_123_456u64));
    }

    #[test]
    fn test_empty_or_bad_legs() {
        assert!(LegsFile::parse("").unwrap().into_intents().is_err());

        let bad_amount = r#"
[[leg]]
origin_chain_id = 1
origin_currency = "native"
destination_chain_id = 10
destination_currency = "native"
amount = "zero"
"#;
        let err = LegsFile::parse(bad_amount).unwrap().into_intents().unwrap_err();
        assert!(format!("{:#}", err).contains("Leg 1"));
    }
}
