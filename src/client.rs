//! Transport to Chainweb nodes.
//!
//! [`ChainClient`] is the seam between the SDK and the network: a read-only
//! simulation (`/local`) and a submission (`/send`). [`HttpChainClient`] is
//! the production implementation; tests substitute their own.

use crate::error::TransportError;
use crate::pact::{Command, CommandResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Talks to the Pact API of a single host, e.g.
/// `https://api.chainweb.com/chainweb/0.0/mainnet01/chain/15/pact`.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Execute `command` without committing it.
    async fn local(&self, host: &str, command: &Command) -> Result<CommandResult, TransportError>;

    /// Submit a signed `command`, returning its request key.
    async fn submit(&self, host: &str, command: &Command) -> Result<String, TransportError>;
}

/// [`ChainClient`] over HTTP.
#[derive(Clone, Debug)]
pub struct HttpChainClient {
    client: reqwest::Client,
}

impl Default for HttpChainClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpChainClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// A client whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn post<T: Serialize + ?Sized, R: for<'de> Deserialize<'de>>(
        &self,
        url: Url,
        body: &T,
    ) -> Result<R, TransportError> {
        let response = self.client.post(url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| TransportError::Malformed(e.to_string()))
    }
}

pub(crate) fn api_url(host: &str, path: &str) -> Result<Url, TransportError> {
    let raw = format!("{}/api/v1/{}", host.trim_end_matches('/'), path);
    Url::parse(&raw).map_err(|source| TransportError::InvalidUrl { url: raw, source })
}

#[derive(Serialize)]
struct SendRequest<'a> {
    cmds: [&'a Command; 1],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendResponse {
    request_keys: Vec<String>,
}

#[async_trait]
impl ChainClient for HttpChainClient {
    async fn local(&self, host: &str, command: &Command) -> Result<CommandResult, TransportError> {
        let mut url = api_url(host, "local")?;
        url.query_pairs_mut()
            .append_pair("preflight", "false")
            .append_pair("signatureVerification", "false");
        self.post(url, command).await
    }

    async fn submit(&self, host: &str, command: &Command) -> Result<String, TransportError> {
        let url = api_url(host, "send")?;
        let response: SendResponse = self.post(url, &SendRequest { cmds: [command] }).await?;
        response
            .request_keys
            .into_iter()
            .next()
            .ok_or_else(|| TransportError::Malformed("send returned no request keys".to_string()))
    }
}
