use crate::error::{KdnError, Result};
use crate::hosts::{DefaultHostResolver, HostResolver, HostTable};
use crate::registry::RegistryConfig;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

const HOST_ENV_PREFIX: &str = "KDN_HOST_";
const TIMEOUT_ENV: &str = "KDN_REQUEST_TIMEOUT_MS";
const MAINNET_MODULE_ENV: &str = "KDN_REGISTRY_MAINNET_MODULE";
const TESTNET_MODULE_ENV: &str = "KDN_REGISTRY_TESTNET_MODULE";
const VAULT_ENV: &str = "KDN_REGISTRY_VAULT";

/// Configuration captured by [`crate::KadenaNames`] at construction.
#[derive(Clone)]
pub struct SdkConfig {
    pub host_resolver: Arc<dyn HostResolver>,
    /// Registry deployment. Every registry read and transaction fails until
    /// this is set.
    pub registry: Option<RegistryConfig>,
    /// Applied by the HTTP transport; `None` leaves reqwest's default.
    pub request_timeout: Option<Duration>,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            host_resolver: Arc::new(DefaultHostResolver),
            registry: None,
            request_timeout: None,
        }
    }
}

impl fmt::Debug for SdkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SdkConfig")
            .field("registry", &self.registry)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

impl SdkConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host_resolver(mut self, resolver: impl HostResolver + 'static) -> Self {
        self.host_resolver = Arc::new(resolver);
        self
    }

    pub fn with_registry(mut self, registry: RegistryConfig) -> Self {
        self.registry = Some(registry);
        self
    }

    /// The configured registry deployment.
    pub fn registry(&self) -> Result<&RegistryConfig> {
        self.registry
            .as_ref()
            .ok_or_else(|| KdnError::DomainValidation("registry not configured".to_string()))
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Defaults plus overrides from the environment:
    ///
    /// - `KDN_HOST_<NETWORKID>=<base url>` routes a network id (lower-cased)
    ///   to a custom host, e.g. `KDN_HOST_DEVELOPMENT=http://localhost:8080`
    /// - `KDN_REQUEST_TIMEOUT_MS=<ms>` sets the HTTP timeout
    /// - `KDN_REGISTRY_MAINNET_MODULE`, `KDN_REGISTRY_TESTNET_MODULE` and
    ///   `KDN_REGISTRY_VAULT` together set the registry deployment
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    pub(crate) fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut config = Self::default();
        let mut table = HostTable::new();
        let (mut mainnet_module, mut testnet_module, mut vault) = (None, None, None);

        for (key, value) in vars {
            if let Some(network) = key.strip_prefix(HOST_ENV_PREFIX) {
                if !network.is_empty() && !value.is_empty() {
                    table = table.with_host(network.to_lowercase(), value);
                }
                continue;
            }
            match key.as_str() {
                TIMEOUT_ENV => match value.parse::<u64>() {
                    Ok(ms) => config.request_timeout = Some(Duration::from_millis(ms)),
                    Err(_) => tracing::warn!(value = %value, "ignoring invalid {}", TIMEOUT_ENV),
                },
                MAINNET_MODULE_ENV => mainnet_module = Some(value),
                TESTNET_MODULE_ENV => testnet_module = Some(value),
                VAULT_ENV => vault = Some(value),
                _ => {}
            }
        }

        match (mainnet_module, testnet_module, vault) {
            (Some(mainnet), Some(testnet), Some(vault)) => {
                config.registry = Some(RegistryConfig::new(mainnet, testnet, vault));
            }
            (None, None, None) => {}
            _ => tracing::warn!(
                "ignoring partial registry configuration; {}, {} and {} must all be set",
                MAINNET_MODULE_ENV,
                TESTNET_MODULE_ENV,
                VAULT_ENV
            ),
        }

        if !table.is_empty() {
            config.host_resolver = Arc::new(table);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hosts::ChainId;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn env_overrides_hosts_and_timeout() {
        let config = SdkConfig::from_vars(vars(&[
            ("KDN_HOST_DEVELOPMENT", "http://localhost:8080"),
            ("KDN_REQUEST_TIMEOUT_MS", "2500"),
            ("KDN_REGISTRY_MAINNET_MODULE", "main.registry"),
            ("KDN_REGISTRY_TESTNET_MODULE", "test.registry"),
            ("KDN_REGISTRY_VAULT", "c:vault"),
            ("PATH", "/usr/bin"),
        ]));
        assert_eq!(config.request_timeout, Some(Duration::from_millis(2500)));
        assert_eq!(
            config.registry().unwrap(),
            &RegistryConfig::new("main.registry", "test.registry", "c:vault")
        );
        assert_eq!(
            config
                .host_resolver
                .resolve("development", &ChainId::from("15"))
                .unwrap(),
            "http://localhost:8080/chainweb/0.0/development/chain/15/pact"
        );
        assert!(config
            .host_resolver
            .resolve("mainnet01", &ChainId::from("15"))
            .is_ok());
    }

    #[test]
    fn empty_env_keeps_defaults() {
        let config = SdkConfig::from_vars(vars(&[("KDN_REQUEST_TIMEOUT_MS", "soon")]));
        assert_eq!(config.request_timeout, None);
        assert!(config
            .host_resolver
            .resolve("development", &ChainId::from("15"))
            .is_err());
        assert_eq!(config.registry, None);
        assert_eq!(
            config.registry().unwrap_err().to_string(),
            "registry not configured"
        );
    }

    #[test]
    fn partial_registry_env_is_ignored() {
        let config = SdkConfig::from_vars(vars(&[("KDN_REGISTRY_VAULT", "c:vault")]));
        assert!(config.registry().is_err());
    }
}
