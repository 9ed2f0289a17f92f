use crate::client::{ChainClient, HttpChainClient};
use crate::config::SdkConfig;
use crate::error::{KdnError, Result};
use crate::hosts::{self, ChainId, NetworkEndpoint};
use crate::pact::Command;
use crate::types::TransactionDescriptor;
use tracing::{debug, error, warn};

/// Entry point for resolving Kadena Names and preparing registry transactions.
///
/// Holds only the configuration it was built with, so one value can serve
/// any number of concurrent calls. Registry reads and transactions need a
/// [`crate::RegistryConfig`]; without one they fail.
///
/// ```no_run
/// # async fn run() -> kadenanames_sdk::Result<()> {
/// use kadenanames_sdk::{KadenaNames, RegistryConfig, SdkConfig};
///
/// let registry = RegistryConfig::new("<mainnet module>", "<testnet module>", "<vault account>");
/// let sdk = KadenaNames::with_config(SdkConfig::new().with_registry(registry))?;
/// let address = sdk.name_to_address("turkiye.kda", "mainnet01").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct KadenaNames<C = HttpChainClient> {
    pub(crate) config: SdkConfig,
    pub(crate) client: C,
}

impl KadenaNames<HttpChainClient> {
    /// An SDK talking to the public Chainweb hosts, with no registry
    /// configured yet.
    pub fn new() -> Self {
        Self::with_client(SdkConfig::default(), HttpChainClient::new())
    }

    /// An SDK over HTTP using `config`.
    pub fn with_config(config: SdkConfig) -> Result<Self> {
        let client = match config.request_timeout {
            Some(timeout) => HttpChainClient::with_timeout(timeout)?,
            None => HttpChainClient::new(),
        };
        Ok(Self::with_client(config, client))
    }
}

impl Default for KadenaNames<HttpChainClient> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ChainClient> KadenaNames<C> {
    /// An SDK over a caller-supplied transport.
    pub fn with_client(config: SdkConfig, client: C) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// The Pact API host for `network_id` on `chain_id`.
    pub fn resolve_endpoint(&self, network_id: &str, chain_id: &ChainId) -> Result<String> {
        self.config.host_resolver.resolve(network_id, chain_id)
    }

    /// Like [`Self::resolve_endpoint`], but the failure names the operation.
    pub fn chainweb_url(&self, network_id: &str, chain_id: &ChainId) -> Result<String> {
        self.resolve_endpoint(network_id, chain_id)
            .map_err(|e| KdnError::context("Failed to generate chainweb url", e))
    }

    /// Host and chain the registry is reached through on `network_id`.
    pub fn endpoint(&self, network_id: &str) -> Result<NetworkEndpoint> {
        hosts::resolve_endpoint(self.config.host_resolver.as_ref(), network_id)
    }

    /// Submit a signed command.
    ///
    /// Transport failures come back exactly as the node or HTTP layer
    /// reported them.
    pub async fn send_transaction(
        &self,
        transaction: &Command,
        network_id: &str,
        chain_id: &ChainId,
    ) -> Result<TransactionDescriptor> {
        let host = self.resolve_endpoint(network_id, chain_id)?;
        if !transaction.is_signed() {
            warn!(network_id, hash = %transaction.hash, "submitting a command with empty signature slots");
        }
        debug!(network_id, chain_id = %chain_id, hash = %transaction.hash, "submitting transaction");

        match self.client.submit(&host, transaction).await {
            Ok(request_key) => Ok(TransactionDescriptor {
                request_key,
                chain_id: chain_id.to_string(),
                network_id: network_id.to_string(),
            }),
            Err(e) => {
                error!(network_id, chain_id = %chain_id, error = %e, "error in send_transaction");
                Err(e.into())
            }
        }
    }
}
