//! Chainweb host resolution.
//!
//! A network id (`mainnet01`, `testnet04`, `testnet05`) together with a chain id
//! maps to the Pact API root of a Chainweb node. Unknown network ids are always
//! an error; there is no fallback host.

use crate::error::{KdnError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Chain on which the registry is deployed for testnet-family networks.
pub const TESTNET_CHAIN_ID: &str = "1";
/// Chain on which the registry is deployed for every other network.
pub const MAINNET_CHAIN_ID: &str = "15";

const DEFAULT_HOSTS: [(&str, &str); 3] = [
    ("mainnet01", "https://api.chainweb.com"),
    ("testnet04", "https://api.testnet.chainweb.com"),
    ("testnet05", "https://api.testnet.chainweb.com"),
];

/// A Chainweb chain id, carried as the string the node API expects.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(String);

impl ChainId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChainId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Is this network id part of the testnet family?
pub fn is_testnet(network_id: &str) -> bool {
    network_id.contains("testnet")
}

/// Chain id the registry lives on for the given network.
pub fn chain_id_for_network(network_id: &str) -> ChainId {
    if is_testnet(network_id) {
        ChainId::new(TESTNET_CHAIN_ID)
    } else {
        ChainId::new(MAINNET_CHAIN_ID)
    }
}

/// Everything needed to talk to the registry on one network.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkEndpoint {
    pub network_id: String,
    pub chain_id: ChainId,
    pub host_url: String,
}

/// Strategy turning a network id and chain id into a Pact API host.
///
/// Any `Fn(&str, &ChainId) -> Result<String>` closure is a resolver, so a
/// caller can swap in arbitrary routing without defining a type.
pub trait HostResolver: Send + Sync {
    fn resolve(&self, network_id: &str, chain_id: &ChainId) -> Result<String>;
}

impl<F> HostResolver for F
where
    F: Fn(&str, &ChainId) -> Result<String> + Send + Sync,
{
    fn resolve(&self, network_id: &str, chain_id: &ChainId) -> Result<String> {
        self(network_id, chain_id)
    }
}

fn pact_url(base_url: &str, network_id: &str, chain_id: &ChainId) -> String {
    format!(
        "{}/chainweb/0.0/{}/chain/{}/pact",
        base_url.trim_end_matches('/'),
        network_id,
        chain_id
    )
}

/// The built-in table of public Chainweb hosts.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultHostResolver;

impl HostResolver for DefaultHostResolver {
    fn resolve(&self, network_id: &str, chain_id: &ChainId) -> Result<String> {
        DEFAULT_HOSTS
            .iter()
            .find(|(id, _)| *id == network_id)
            .map(|(_, base)| pact_url(base, network_id, chain_id))
            .ok_or_else(|| KdnError::UnsupportedNetwork(network_id.to_string()))
    }
}

/// The public host table with per-network overrides layered on top, e.g. to
/// point `development` at a local devnet.
#[derive(Clone, Debug, Default)]
pub struct HostTable {
    overrides: HashMap<String, String>,
}

impl HostTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route `network_id` to `base_url` (scheme and authority, no path).
    pub fn with_host(mut self, network_id: impl Into<String>, base_url: impl Into<String>) -> Self {
        self.overrides.insert(network_id.into(), base_url.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}

impl HostResolver for HostTable {
    fn resolve(&self, network_id: &str, chain_id: &ChainId) -> Result<String> {
        match self.overrides.get(network_id) {
            Some(base) => Ok(pact_url(base, network_id, chain_id)),
            None => DefaultHostResolver.resolve(network_id, chain_id),
        }
    }
}

/// Resolve the full endpoint for a network using `resolver`.
pub fn resolve_endpoint(resolver: &dyn HostResolver, network_id: &str) -> Result<NetworkEndpoint> {
    let chain_id = chain_id_for_network(network_id);
    let host_url = resolver.resolve(network_id, &chain_id)?;
    Ok(NetworkEndpoint {
        network_id: network_id.to_string(),
        chain_id,
        host_url,
    })
}
