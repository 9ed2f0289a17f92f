use thiserror::Error;

/// Errors raised by the transport that carries commands to a Chainweb node.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid endpoint url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("node responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed node response: {0}")]
    Malformed(String),
}

/// Errors that can occur when resolving names or preparing registry transactions.
#[derive(Debug, Error)]
pub enum KdnError {
    /// The network id has no entry in the host table.
    #[error("Unsupported networkId: {0}")]
    UnsupportedNetwork(String),

    /// The simulation ran and the contract reported a failure.
    #[error("Failed to retrieve {subject}: {error}")]
    ChainFailure { subject: String, error: String },

    /// The node answered with neither a success nor a failure outcome.
    #[error("Failed to retrieve {subject}: Unknown error")]
    UnknownOutcome { subject: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("{0}")]
    DomainValidation(String),

    /// A name or address lookup failed. The underlying cause stays reachable
    /// through [`std::error::Error::source`] but is kept out of the message.
    #[error("Failed to resolve {subject} for identifier \"{identifier}\"")]
    Resolution {
        subject: &'static str,
        identifier: String,
        #[source]
        source: Box<KdnError>,
    },

    /// A query failed; `action` names what was being fetched.
    #[error("Failed to {action}: {source}")]
    Query {
        action: &'static str,
        #[source]
        source: Box<KdnError>,
    },

    /// A step of a multi-step operation failed.
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<KdnError>,
    },
}

impl KdnError {
    pub(crate) fn query(action: &'static str, source: KdnError) -> Self {
        KdnError::Query {
            action,
            source: Box::new(source),
        }
    }

    pub(crate) fn context(context: impl Into<String>, source: KdnError) -> Self {
        KdnError::Context {
            context: context.into(),
            source: Box::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, KdnError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_message_hides_the_cause() {
        let err = KdnError::Resolution {
            subject: "address",
            identifier: "turkiye.kda".to_string(),
            source: Box::new(KdnError::ChainFailure {
                subject: "address".to_string(),
                error: "{\"message\":\"row not found\"}".to_string(),
            }),
        };
        assert_eq!(
            err.to_string(),
            "Failed to resolve address for identifier \"turkiye.kda\""
        );
        let cause = std::error::Error::source(&err).map(|e| e.to_string());
        assert_eq!(
            cause.as_deref(),
            Some("Failed to retrieve address: {\"message\":\"row not found\"}")
        );
    }

    #[test]
    fn context_prefixes_the_step_message() {
        let err = KdnError::context(
            "Failed to fetch price for period 1",
            KdnError::DomainValidation("Price parsing failed".to_string()),
        );
        assert_eq!(
            err.to_string(),
            "Failed to fetch price for period 1: Price parsing failed"
        );
    }
}
