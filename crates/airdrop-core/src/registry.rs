//! Endpoint registry
//!
//! The canonical, read-only table of supported chains. When the same chain
//! was described more than once (different endpoint lists), the richest
//! list is kept, and the metered network slug comes from the most specific
//! description.

use crate::error::{CoreError, CoreResult};
use crate::models::{ChainDescriptor, Endpoint, EndpointKind};

/// Chain id that gets the higher per-transaction gas estimate.
pub const PRIMARY_CHAIN_ID: u64 = 1;

/// Read-only per-chain endpoint table.
#[derive(Debug, Clone)]
pub struct EndpointRegistry {
    chains: Vec<ChainDescriptor>,
    metered_key: Option<String>,
}

impl EndpointRegistry {
    /// Build a registry from descriptors, rejecting duplicates and empty
    /// endpoint lists.
    pub fn new(chains: Vec<ChainDescriptor>, metered_key: Option<String>) -> CoreResult<Self> {
        for (idx, chain) in chains.iter().enumerate() {
            if chain.endpoints.is_empty() {
                return Err(CoreError::InvalidChain(format!(
                    "chain {} ({}) has no endpoints",
                    chain.id, chain.name
                )));
            }
            if chains[..idx].iter().any(|c| c.id == chain.id) {
                return Err(CoreError::InvalidChain(format!(
                    "chain {} registered twice",
                    chain.id
                )));
            }
        }

        let metered_key = metered_key.filter(|k| !k.trim().is_empty());
        Ok(Self { chains, metered_key })
    }

    /// Registry with the builtin chain table.
    pub fn builtin(metered_key: Option<String>) -> Self {
        Self {
            chains: builtin_chains(),
            metered_key: metered_key.filter(|k| !k.trim().is_empty()),
        }
    }

    /// Replace builtin entries by id and append new ones.
    pub fn with_overrides(self, overrides: Vec<ChainDescriptor>) -> CoreResult<Self> {
        let mut chains = self.chains;
        for chain in overrides {
            match chains.iter_mut().find(|c| c.id == chain.id) {
                Some(existing) => *existing = chain,
                None => chains.push(chain),
            }
        }
        Self::new(chains, self.metered_key)
    }

    pub fn descriptor(&self, chain_id: u64) -> CoreResult<&ChainDescriptor> {
        self.chains
            .iter()
            .find(|c| c.id == chain_id)
            .ok_or(CoreError::UnknownChain(chain_id))
    }

    pub fn chains(&self) -> &[ChainDescriptor] {
        &self.chains
    }

    pub fn chain_ids(&self) -> Vec<u64> {
        self.chains.iter().map(|c| c.id).collect()
    }

    pub fn has_metered_key(&self) -> bool {
        self.metered_key.is_some()
    }

    /// Ordered candidate endpoints for a chain. The metered endpoint, when a
    /// key is configured and the chain supports it, comes first.
    pub fn endpoints(&self, chain_id: u64) -> CoreResult<Vec<Endpoint>> {
        let chain = self.descriptor(chain_id)?;
        let mut endpoints = Vec::with_capacity(chain.endpoints.len() + 1);

        if let (Some(key), Some(network)) = (&self.metered_key, &chain.metered_network) {
            endpoints.push(Endpoint {
                url: format!("https://{}.g.alchemy.com/v2/{}", network, key),
                kind: EndpointKind::Metered,
            });
        }
        endpoints.extend(chain.endpoints.iter().map(Endpoint::public));

        Ok(endpoints)
    }
}

fn chain(
    id: u64,
    name: &str,
    symbol: &str,
    metered_network: Option<&str>,
    endpoints: &[&str],
) -> ChainDescriptor {
    ChainDescriptor {
        id,
        name: name.to_string(),
        symbol: symbol.to_string(),
        endpoints: endpoints.iter().map(|e| e.to_string()).collect(),
        metered_network: metered_network.map(String::from),
    }
}

pub fn builtin_chains() -> Vec<ChainDescriptor> {
    vec![
        chain(
            1,
            "Ethereum",
            "ETH",
            Some("eth-mainnet"),
            &[
                "https://eth.llamarpc.com",
                "https://rpc.ankr.com/eth",
                "https://ethereum.publicnode.com",
            ],
        ),
        chain(
            137,
            "Polygon",
            "MATIC",
            Some("polygon-mainnet"),
            &[
                "https://polygon.llamarpc.com",
                "https://rpc.ankr.com/polygon",
                "https://polygon-rpc.com",
            ],
        ),
        chain(
            42161,
            "Arbitrum",
            "ETH",
            Some("arb-mainnet"),
            &[
                "https://arbitrum.llamarpc.com",
                "https://rpc.ankr.com/arbitrum",
                "https://arb1.arbitrum.io/rpc",
            ],
        ),
        chain(
            10,
            "Optimism",
            "ETH",
            Some("opt-mainnet"),
            &[
                "https://optimism.llamarpc.com",
                "https://rpc.ankr.com/optimism",
                "https://mainnet.optimism.io",
            ],
        ),
        chain(
            8453,
            "Base",
            "ETH",
            Some("base-mainnet"),
            &[
                "https://base.llamarpc.com",
                "https://mainnet.base.org",
                "https://base.publicnode.com",
            ],
        ),
        chain(
            56,
            "BSC",
            "BNB",
            None,
            &[
                "https://bsc-dataseed.binance.org",
                "https://bsc.publicnode.com",
                "https://rpc.ankr.com/bsc",
            ],
        ),
        chain(
            43114,
            "Avalanche",
            "AVAX",
            None,
            &[
                "https://api.avax.network/ext/bc/C/rpc",
                "https://avalanche.publicnode.com",
                "https://rpc.ankr.com/avalanche",
            ],
        ),
        chain(
            59144,
            "Linea",
            "ETH",
            Some("linea-mainnet"),
            &["https://rpc.linea.build", "https://linea.drpc.org"],
        ),
        chain(
            534352,
            "Scroll",
            "ETH",
            None,
            &["https://rpc.scroll.io", "https://scroll.drpc.org"],
        ),
        chain(
            1088,
            "Metis",
            "METIS",
            None,
            &["https://andromeda.metis.io/?owner=1088"],
        ),
    ]
}
