//! Chain registry and scan basket
//!
//! Static tables: supported chains, block explorers, and the reference
//! assets the opportunity scanner prices across chains.
//!
//! Created: 2026-10-18

use alloy::hex;
use alloy::primitives::{address, Address, B256};

/// Native gas token sentinel used by the quoting service
pub const NATIVE_TOKEN: Address = Address::ZERO;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainInfo {
    pub id: u64,
    pub name: &'static str,
}

/// Chains the scanner and executor know by name
pub const SUPPORTED_CHAINS: &[ChainInfo] = &[
    ChainInfo { id: 1, name: "Ethereum" },
    ChainInfo { id: 8453, name: "Base" },
    ChainInfo { id: 42161, name: "Arbitrum" },
    ChainInfo { id: 10, name: "Optimism" },
    ChainInfo { id: 137, name: "Polygon" },
    ChainInfo { id: 324, name: "zkSync" },
    ChainInfo { id: 59144, name: "Linea" },
    ChainInfo { id: 534352, name: "Scroll" },
];

const BLOCK_EXPLORERS: &[(u64, &str)] = &[
    (1, "https://etherscan.io"),
    (10, "https://optimistic.etherscan.io"),
    (56, "https://bscscan.com"),
    (137, "https://polygonscan.com"),
    (324, "https://explorer.zksync.io"),
    (8453, "https://basescan.org"),
    (42161, "https://arbiscan.io"),
    (43114, "https://snowtrace.io"),
    (59144, "https://lineascan.build"),
    (534352, "https://scrollscan.com"),
];

const DEFAULT_EXPLORER: &str = "https://etherscan.io";

pub fn chain_name(chain_id: u64) -> String {
    SUPPORTED_CHAINS
        .iter()
        .find(|c| c.id == chain_id)
        .map(|c| c.name.to_string())
        .unwrap_or_else(|| format!("Chain {}", chain_id))
}

pub fn supported_chain_ids() -> Vec<u64> {
    SUPPORTED_CHAINS.iter().map(|c| c.id).collect()
}

/// Explorer link for a transaction; unknown chains fall back to etherscan
pub fn explorer_tx_url(chain_id: u64, tx_hash: &B256) -> String {
    let base = BLOCK_EXPLORERS
        .iter()
        .find(|(id, _)| *id == chain_id)
        .map(|(_, url)| *url)
        .unwrap_or(DEFAULT_EXPLORER);
    format!("{}/tx/{}", base, hex::encode_prefixed(tx_hash))
}

/// Reference asset priced by the scanner, with its per-chain deployments
#[derive(Debug, Clone, Copy)]
pub struct ScanAsset {
    pub symbol: &'static str,
    pub decimals: u8,
    /// Amount quoted per candidate, in base units
    pub scan_amount: u64,
    /// (chain id, token address) in candidate generation order
    pub deployments: &'static [(u64, Address)],
}

impl ScanAsset {
    pub fn address_on(&self, chain_id: u64) -> Option<Address> {
        self.deployments
            .iter()
            .find(|(id, _)| *id == chain_id)
            .map(|(_, addr)| *addr)
    }
}

/// ETH (0.1), USDC (100), USDT (100)
pub const SCAN_ASSETS: &[ScanAsset] = &[
    ScanAsset {
        symbol: "ETH",
        decimals: 18,
        scan_amount: 100_000_000_000_000_000,
        deployments: &[
            (1, NATIVE_TOKEN),
            (8453, NATIVE_TOKEN),
            (42161, NATIVE_TOKEN),
            (10, NATIVE_TOKEN),
        ],
    },
    ScanAsset {
        symbol: "USDC",
        decimals: 6,
        scan_amount: 100_000_000,
        deployments: &[
            (1, address!("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48")),
            (10, address!("0x0b2c639c533813f4aa9d7837caf62653d097ff85")),
            (137, address!("0x3c499c542cef5e3811e1192ce70d8cc03d5c3359")),
            (8453, address!("0x833589fcd6edb6e08f4c7c32d4f71b54bda02913")),
            (42161, address!("0xaf88d065e77c8cc2239327c5edb3a432268e5831")),
        ],
    },
    ScanAsset {
        symbol: "USDT",
        decimals: 6,
        scan_amount: 100_000_000,
        deployments: &[
            (1, address!("0xdac17f958d2ee523a2206206994597c13d831ec7")),
            (10, address!("0x94b008aa00579c1307b0ef2c499ad98a8ce58e58")),
            (137, address!("0xc2132d05d31c914a87c6611c10748aeb04b58e8f")),
            (42161, address!("0xfd086bc7cd5c481dcc9c85ebe478a1c0b69fcbb9")),
        ],
    },
];
