use thiserror::Error;

/// Errors from the plex.tv account surface and the media server itself.
///
/// Everything here aborts the run; conditions that degrade gracefully
/// (absent metadata, unsupported node types, per-item transfer failures)
/// are represented as values, not errors.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("authentication rejected: {0}")]
    Authentication(String),

    #[error("cookie is not a base64-encoded JSON object with a token field: {0}")]
    MalformedCookie(String),

    #[error("server {0} is not accessible from this account")]
    ServerNotFound(String),

    #[error("server {0} advertises no connection matching its public address")]
    NoReachableConnection(String),

    #[error("certificate for {host} is not trusted: {detail}")]
    UntrustedCertificate { host: String, detail: String },

    #[error("direct connection via {host} failed: {detail}")]
    DirectConnectionFailed { host: String, detail: String },

    #[error("unexpected response shape: {0}")]
    Decode(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
