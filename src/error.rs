use thiserror::Error;

/// Errors raised by the collection pipeline.
///
/// Every variant is terminal for the current run: nothing is retried
/// internally, the caller decides whether to re-run the whole collection.
#[derive(Debug, Error)]
pub enum CollectError {
    /// Controller login failed: bad credentials, unreachable host, or a TLS
    /// handshake rejected by certificate verification.
    #[error("controller login failed")]
    Authentication(#[source] reqwest::Error),

    /// A required resource fetch failed, either at the transport level or
    /// with a non-success HTTP status.
    #[error("failed to fetch {resource}")]
    Fetch {
        resource: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The response body was not the expected `{ "data": ... }` envelope,
    /// either because it is not JSON or because the field is missing.
    #[error("malformed response for {resource}: expected a `data` field")]
    MalformedResponse { resource: &'static str },

    /// The RF environment step collected data from zero access points.
    #[error("no spectrum scan data collected from any access point")]
    NoData,
}
