//! Relay API wire types
//!
//! Request/response shapes for `/quote/v2` and `/intents/status/v3`, and
//! their conversion into the crate's `Quote` / `StatusRecord`.
//!
//! The service sends USD amounts and token values as decimal strings; a
//! few fields occasionally arrive as JSON numbers, so those are read as
//! `serde_json::Value` and coerced.
//!
//! Created: 2026-10-18

use crate::error::QuoteError;
use crate::types::{Quote, Step, StepAction, StatusRecord, TransactionStep, Valuation};
use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

pub const TRADE_TYPE_EXACT_INPUT: &str = "EXACT_INPUT";

/// Body of `POST /quote/v2`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequestBody {
    pub user: String,
    pub origin_chain_id: u64,
    pub origin_currency: String,
    pub destination_chain_id: u64,
    pub destination_currency: String,
    /// Base units, decimal integer string
    pub amount: String,
    pub trade_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_fees: Option<Vec<AppFee>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppFee {
    pub recipient: String,
    /// Basis points, as a string
    pub fee: String,
}

/// Error payload on non-success responses
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    #[serde(default)]
    pub steps: Vec<StepDto>,
    pub fees: Option<FeesDto>,
    pub details: Option<DetailsDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDto {
    pub id: Option<String>,
    pub kind: String,
    pub request_id: Option<String>,
    #[serde(default)]
    pub items: Vec<StepItemDto>,
}

#[derive(Debug, Deserialize)]
pub struct StepItemDto {
    pub status: Option<String>,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Deserialize)]
pub struct FeesDto {
    pub relayer: Option<CurrencyAmountDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailsDto {
    pub currency_in: Option<CurrencyAmountDto>,
    pub currency_out: Option<CurrencyAmountDto>,
    pub rate: Option<Value>,
    pub time_estimate: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyAmountDto {
    pub amount_usd: Option<Value>,
}

impl CurrencyAmountDto {
    fn usd(dto: Option<&CurrencyAmountDto>) -> f64 {
        dto.and_then(|c| c.amount_usd.as_ref())
            .and_then(value_as_f64)
            .unwrap_or(0.0)
    }
}

/// Response of `GET /intents/status/v3`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: Option<String>,
    pub state: Option<String>,
    pub details: Option<String>,
    #[serde(default)]
    pub in_tx_hashes: Vec<String>,
    #[serde(default)]
    pub tx_hashes: Vec<String>,
    pub updated_at: Option<u64>,
}

impl From<StatusResponse> for StatusRecord {
    fn from(dto: StatusResponse) -> Self {
        StatusRecord {
            status: dto.status.or(dto.state),
            details: dto.details,
            in_tx_hashes: dto.in_tx_hashes,
            out_tx_hashes: dto.tx_hashes,
            updated_at: dto.updated_at,
        }
    }
}

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

fn value_as_u256(value: &Value) -> Option<U256> {
    match value {
        Value::Number(n) => n.as_u64().map(U256::from),
        Value::String(s) => U256::from_str(s.trim()).ok(),
        _ => None,
    }
}

fn field_str<'a>(data: &'a Value, key: &str) -> Option<&'a str> {
    data.get(key).and_then(Value::as_str)
}

fn malformed(step: usize, what: impl std::fmt::Display) -> QuoteError {
    QuoteError::Malformed(format!("step {}: {}", step, what))
}

impl StepDto {
    fn into_step(self, index: usize) -> Result<Step, QuoteError> {
        let item = self
            .items
            .into_iter()
            .next()
            .ok_or_else(|| malformed(index, "no items"))?;
        let data = &item.data;

        let action = match self.kind.as_str() {
            "transaction" => {
                let to = field_str(data, "to")
                    .ok_or_else(|| malformed(index, "missing 'to'"))
                    .and_then(|s| {
                        Address::from_str(s).map_err(|e| malformed(index, format!("bad 'to': {}", e)))
                    })?;
                let calldata = match field_str(data, "data") {
                    Some(s) => Bytes::from_str(s)
                        .map_err(|e| malformed(index, format!("bad 'data': {}", e)))?,
                    None => Bytes::new(),
                };
                let value = match data.get("value") {
                    None | Some(Value::Null) => U256::ZERO,
                    Some(v) => value_as_u256(v).ok_or_else(|| malformed(index, "bad 'value'"))?,
                };
                let chain_id = data
                    .get("chainId")
                    .and_then(Value::as_u64)
                    .ok_or_else(|| malformed(index, "missing 'chainId'"))?;

                StepAction::Transaction(TransactionStep {
                    to,
                    data: calldata,
                    value,
                    chain_id,
                })
            }
            "signature" => {
                let message = field_str(data, "message")
                    .or_else(|| data.get("sign").and_then(|s| field_str(s, "message")))
                    .ok_or_else(|| malformed(index, "missing signature message"))?;
                StepAction::Signature {
                    message: message.to_string(),
                }
            }
            other => return Err(malformed(index, format!("unknown step kind '{}'", other))),
        };

        Ok(Step {
            request_id: self.request_id,
            action,
        })
    }
}

impl TryFrom<QuoteResponse> for Quote {
    type Error = QuoteError;

    fn try_from(response: QuoteResponse) -> Result<Self, Self::Error> {
        let steps = response
            .steps
            .into_iter()
            .enumerate()
            .map(|(i, step)| step.into_step(i))
            .collect::<Result<Vec<_>, _>>()?;

        let details = response.details.as_ref();
        let valuation = Valuation {
            input_usd: CurrencyAmountDto::usd(details.and_then(|d| d.currency_in.as_ref())),
            output_usd: CurrencyAmountDto::usd(details.and_then(|d| d.currency_out.as_ref())),
            fee_usd: CurrencyAmountDto::usd(
                response.fees.as_ref().and_then(|f| f.relayer.as_ref()),
            ),
            rate: details.and_then(|d| d.rate.as_ref()).and_then(value_as_f64),
            eta_seconds: details
                .and_then(|d| d.time_estimate.as_ref())
                .and_then(value_as_f64)
                .map(|secs| secs.max(0.0).round() as u64),
        };

        Ok(Quote { steps, valuation })
    }
}
