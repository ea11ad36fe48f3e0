use thiserror::Error;

/// Result alias for pipeline stages and service clients.
pub type Result<T> = std::result::Result<T, RagError>;

/// Failure of a single query. Every variant aborts the rest of the pipeline;
/// nothing is retried.
#[derive(Debug, Error)]
pub enum RagError {
    /// The service could not be reached, or the request timed out.
    #[error("{service} request failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success HTTP status.
    #[error("{service} returned HTTP {status}: {body}")]
    ServiceStatus {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// The body holds no parseable JSON object, or the object lacks the
    /// fields the calling stage needs.
    #[error("malformed response: {reason}")]
    MalformedResponse { reason: String },

    /// An internal invariant was broken, e.g. embeddings of different
    /// dimensionality were compared.
    #[error("contract violation: {0}")]
    ContractViolation(String),

    /// The document store could not be enumerated.
    #[error("document store error at {location}: {source}")]
    Store {
        location: String,
        #[source]
        source: std::io::Error,
    },
}

impl RagError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            reason: reason.into(),
        }
    }

    /// `true` for failures reaching the service (transport or HTTP status).
    pub fn is_service_failure(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::ServiceStatus { .. })
    }
}
