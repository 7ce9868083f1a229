//! Local private-key signer
//!
//! Signs with an in-process `PrivateKeySigner` and submits through an
//! HTTP provider for the step's chain. One RPC URL per chain
//! (`RPC_URL_<CHAIN_ID>`); chains without one cannot be switched to or
//! transacted on.
//!
//! Created: 2026-10-18

use super::WalletSigner;
use crate::error::SignerError;
use crate::types::TransactionStep;
use alloy::hex;
use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, B256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

pub struct LocalWalletSigner {
    signer: PrivateKeySigner,
    rpc_urls: HashMap<u64, String>,
    /// 0 until the first switch
    active_chain: AtomicU64,
}

impl LocalWalletSigner {
    pub fn new(private_key: &str, rpc_urls: HashMap<u64, String>) -> Result<Self> {
        let signer: PrivateKeySigner = private_key
            .trim()
            .parse()
            .context("Invalid PRIVATE_KEY")?;

        Ok(Self {
            signer,
            rpc_urls,
            active_chain: AtomicU64::new(0),
        })
    }

    pub fn active_chain(&self) -> Option<u64> {
        match self.active_chain.load(Ordering::SeqCst) {
            0 => None,
            id => Some(id),
        }
    }

    pub fn configured_chains(&self) -> Vec<u64> {
        let mut chains: Vec<u64> = self.rpc_urls.keys().copied().collect();
        chains.sort_unstable();
        chains
    }

    fn rpc_url(&self, chain_id: u64) -> Result<&str, SignerError> {
        self.rpc_urls
            .get(&chain_id)
            .map(String::as_str)
            .ok_or_else(|| SignerError::Failed(format!("No RPC URL configured for chain {}", chain_id)))
    }
}

/// `0x`-hex messages are signed as raw bytes, anything else as UTF-8 text
fn message_bytes(message: &str) -> Vec<u8> {
    if let Some(stripped) = message.strip_prefix("0x") {
        if let Ok(bytes) = hex::decode(stripped) {
            return bytes;
        }
    }
    message.as_bytes().to_vec()
}

#[async_trait]
impl WalletSigner for LocalWalletSigner {
    fn address(&self) -> Address {
        self.signer.address()
    }

    async fn switch_network(&self, chain_id: u64) -> Result<(), SignerError> {
        if !self.rpc_urls.contains_key(&chain_id) {
            return Err(SignerError::Unsupported(format!(
                "no RPC URL configured for chain {}",
                chain_id
            )));
        }
        if self.active_chain.swap(chain_id, Ordering::SeqCst) != chain_id {
            debug!("Active chain switched to {}", chain_id);
        }
        Ok(())
    }

    async fn send_transaction(&self, tx: &TransactionStep) -> Result<B256, SignerError> {
        let rpc_url = self.rpc_url(tx.chain_id)?;
        let url: reqwest::Url = rpc_url.parse().map_err(|e| {
            SignerError::Failed(format!("Invalid RPC URL for chain {}: {}", tx.chain_id, e))
        })?;

        let wallet = EthereumWallet::from(self.signer.clone());
        let provider = ProviderBuilder::new().wallet(wallet).connect_http(url);

        let request = TransactionRequest::default()
            .with_from(self.signer.address())
            .with_to(tx.to)
            .with_input(tx.data.clone())
            .with_value(tx.value)
            .with_chain_id(tx.chain_id);

        let pending = provider
            .send_transaction(request)
            .await
            .map_err(|e| SignerError::Failed(e.to_string()))?;
        let tx_hash = *pending.tx_hash();

        info!("Transaction submitted on chain {}: {:?}", tx.chain_id, tx_hash);
        Ok(tx_hash)
    }

    async fn sign_message(&self, message: &str) -> Result<String, SignerError> {
        let signature = self
            .signer
            .sign_message(&message_bytes(message))
            .await
            .map_err(|e| SignerError::Failed(e.to_string()))?;
        Ok(hex::encode_prefixed(signature.as_bytes()))
    }
}
