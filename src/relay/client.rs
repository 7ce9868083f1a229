//! Relay HTTP client
//!
//! Quotes via `POST /quote/v2` and settlement status via
//! `GET /intents/status/v3`. Optional app fee is attached to every quote.
//!
//! Created: 2026-10-18

use super::dto::{AppFee, ErrorBody, QuoteRequestBody, QuoteResponse, StatusResponse, TRADE_TYPE_EXACT_INPUT};
use super::QuoteClient;
use crate::error::{QuoteError, StatusError};
use crate::types::{Quote, QuoteRequest, StatusRecord};
use alloy::primitives::Address;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_RELAY_API: &str = "https://api.relay.link";

/// App fee forwarded with every quote request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppFeeConfig {
    pub recipient: Address,
    pub fee_bps: u32,
}

#[derive(Debug, Clone)]
pub struct RelayClient {
    client: reqwest::Client,
    base_url: String,
    app_fee: Option<AppFeeConfig>,
}

impl RelayClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            app_fee: None,
        })
    }

    pub fn with_app_fee(mut self, app_fee: Option<AppFeeConfig>) -> Self {
        self.app_fee = app_fee;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// A zero-address recipient means "no fee"
    fn app_fees(&self) -> Option<Vec<AppFee>> {
        self.app_fee
            .filter(|fee| fee.recipient != Address::ZERO)
            .map(|fee| {
                vec![AppFee {
                    recipient: fee.recipient.to_string(),
                    fee: fee.fee_bps.to_string(),
                }]
            })
    }

    pub(crate) fn build_body(&self, request: &QuoteRequest) -> QuoteRequestBody {
        QuoteRequestBody {
            user: request.user.to_string(),
            origin_chain_id: request.origin_chain_id,
            origin_currency: request.origin_currency.to_string(),
            destination_chain_id: request.destination_chain_id,
            destination_currency: request.destination_currency.to_string(),
            amount: request.amount.to_string(),
            trade_type: TRADE_TYPE_EXACT_INPUT,
            recipient: request.recipient.map(|r| r.to_string()),
            app_fees: self.app_fees(),
        }
    }
}

/// Non-2xx quote response: the service's `message` if the body carries one
fn quote_api_error(status: u16, body: &[u8]) -> QuoteError {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("Failed to get quote: {}", status));
    QuoteError::Api { status, message }
}

fn status_api_error(status: u16) -> StatusError {
    StatusError::Api(status)
}

#[async_trait]
impl QuoteClient for RelayClient {
    async fn quote(&self, request: &QuoteRequest) -> Result<Quote, QuoteError> {
        let url = format!("{}/quote/v2", self.base_url);
        let body = self.build_body(request);
        debug!(
            "Quote request: {} -> {} amount {}",
            request.origin_chain_id, request.destination_chain_id, body.amount
        );

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| QuoteError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let err = quote_api_error(status.as_u16(), &body);
            warn!("Quote rejected ({}): {}", status.as_u16(), err);
            return Err(err);
        }

        let payload: QuoteResponse = response
            .json()
            .await
            .map_err(|e| QuoteError::Malformed(e.to_string()))?;
        Quote::try_from(payload)
    }

    async fn status(&self, request_id: &str) -> Result<StatusRecord, StatusError> {
        let url = format!("{}/intents/status/v3", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("requestId", request_id)])
            .send()
            .await
            .map_err(|e| StatusError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_api_error(status.as_u16()));
        }

        let payload: StatusResponse = response
            .json()
            .await
            .map_err(|e| StatusError::Malformed(e.to_string()))?;
        Ok(payload.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::U256;

    fn request() -> QuoteRequest {
        QuoteRequest {
            user: Address::repeat_byte(0x22),
            recipient: Some(Address::repeat_byte(0x22)),
            origin_chain_id: 42161,
            origin_currency: Address::ZERO,
            destination_chain_id: 10,
            destination_currency: Address::ZERO,
            amount: U256::from(5_000_000u64),
        }
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = RelayClient::new("https://api.relay.link/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "https://api.relay.link");
    }

    #[test]
    fn test_body_without_fee() {
        let client = RelayClient::new(DEFAULT_RELAY_API, Duration::from_secs(5)).unwrap();
        let body = client.build_body(&request());

        assert_eq!(body.amount, "5000000");
        assert_eq!(body.origin_chain_id, 42161);
        assert_eq!(body.recipient, Some(Address::repeat_byte(0x22).to_string()));
        assert!(body.app_fees.is_none());
    }

    #[test]
    fn test_body_with_fee() {
        let recipient = Address::repeat_byte(0x33);
        let client = RelayClient::new(DEFAULT_RELAY_API, Duration::from_secs(5))
            .unwrap()
            .with_app_fee(Some(AppFeeConfig {
                recipient,
                fee_bps: 30,
            }));

        let fees = client.build_body(&request()).app_fees.unwrap();
        assert_eq!(fees.len(), 1);
        assert_eq!(fees[0].fee, "30");
        assert_eq!(fees[0].recipient, recipient.to_string());
    }

    #[test]
    fn test_quote_error_uses_service_message() {
        let body = br#"{"message":"Amount is too low","errorCode":"AMOUNT_TOO_LOW"}"#;
        let err = quote_api_error(400, body);
        assert_eq!(
            err,
            QuoteError::Api {
                status: 400,
                message: "Amount is too low".to_string(),
            }
        );
        assert_eq!(err.to_string(), "Amount is too low");
    }

    #[test]
    fn test_quote_error_fallback_message() {
        // JSON without a message
        let err = quote_api_error(422, br#"{"errorCode":"NO_ROUTES"}"#);
        assert_eq!(err.to_string(), "Failed to get quote: 422");

        // not JSON at all
        let err = quote_api_error(502, b"<html>Bad Gateway</html>");
        assert_eq!(
            err,
            QuoteError::Api {
                status: 502,
                message: "Failed to get quote: 502".to_string(),
            }
        );

        assert_eq!(quote_api_error(500, b"").to_string(), "Failed to get quote: 500");
    }

    #[test]
    fn test_status_error_keeps_code() {
        let err = status_api_error(503);
        assert_eq!(err, StatusError::Api(503));
        assert_eq!(err.to_string(), "Failed to get status: 503");
    }

    #[test]
    fn test_zero_fee_recipient_is_ignored() {
        let client = RelayClient::new(DEFAULT_RELAY_API, Duration::from_secs(5))
            .unwrap()
            .with_app_fee(Some(AppFeeConfig {
                recipient: Address::ZERO,
                fee_bps: 30,
            }));
        assert!(client.build_body(&request()).app_fees.is_none());
    }
}
