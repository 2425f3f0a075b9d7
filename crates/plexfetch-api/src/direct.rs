use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use plexfetch_models::Server;

use crate::error::ApiError;

/// Find a TLS-valid base URL for a server.
///
/// When the resource listing already supplied an HTTPS URI that matched the
/// public address, that URI wins outright. Legacy listings only carry a raw
/// address and port; those get probed directly, and a hostname-mismatch
/// failure is turned into routing information: the certificate names a
/// `*.plex.direct` wildcard, and replacing the dots of the IP with dashes
/// under that suffix yields a hostname the certificate does cover.
///
/// Only the hostname-mismatch case gets the workaround. Any other
/// certificate failure (untrusted CA and the like) is fatal immediately,
/// since retrying under a different name cannot make an untrusted chain
/// trustworthy.
pub async fn resolve_base_url(client: &Client, server: &Server) -> Result<String, ApiError> {
    let endpoint = server
        .endpoint
        .as_ref()
        .ok_or_else(|| ApiError::NoReachableConnection(server.name.clone()))?;

    if let Some(uri) = &endpoint.uri {
        debug!("Server {} advertises direct HTTPS uri {}", server.name, uri);
        return Ok(uri.trim_end_matches('/').to_string());
    }

    let origin = format!("https://{}:{}", endpoint.address, endpoint.port);
    debug!("Probing {} for server {}", origin, server.name);

    let err = match probe(client, &origin, &server.access_token).await {
        Ok(StatusCode::OK) => return Ok(origin),
        Ok(status) => {
            return Err(ApiError::DirectConnectionFailed {
                host: origin,
                detail: format!("probe returned HTTP {}", status),
            })
        }
        Err(err) => err,
    };

    let text = error_chain_text(&err);
    let Some(suffix) = wildcard_suffix(&text) else {
        if is_certificate_failure(&text) {
            return Err(ApiError::UntrustedCertificate {
                host: endpoint.address.clone(),
                detail: text,
            });
        }
        return Err(ApiError::Http(err));
    };

    let alt_host = direct_hostname(&endpoint.address, &suffix);
    let alt_origin = format!("https://{}:{}", alt_host, endpoint.port);
    warn!(
        "Certificate for {} only covers *.{}; retrying via {}",
        endpoint.address, suffix, alt_host
    );

    match probe(client, &alt_origin, &server.access_token).await {
        Ok(StatusCode::OK) => Ok(alt_origin),
        Ok(status) => Err(ApiError::DirectConnectionFailed {
            host: alt_host,
            detail: format!("retry returned HTTP {}", status),
        }),
        Err(err) => Err(ApiError::DirectConnectionFailed {
            host: alt_host,
            detail: error_chain_text(&err),
        }),
    }
}

async fn probe(client: &Client, origin: &str, token: &str) -> Result<StatusCode, reqwest::Error> {
    let response = client
        .get(origin)
        .header("X-Plex-Token", token)
        .send()
        .await?;
    Ok(response.status())
}

/// Pull the wildcard suffix out of a hostname-verification error message:
/// the token following "doesn't match", stripped of surrounding quote,
/// asterisk and dot characters. Returns `None` when the message does not
/// describe a hostname mismatch.
pub fn wildcard_suffix(error_text: &str) -> Option<String> {
    let rest = error_text.split("doesn't match").nth(1)?;
    let token = rest.split_whitespace().next()?;
    let cleaned = token.trim_matches(|c: char| matches!(c, '\'' | '"' | '`' | '*' | '.' | ','));
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

/// Plex's direct-connect naming convention: the IP with dots replaced by
/// dashes, under the certificate's wildcard suffix.
pub fn direct_hostname(address: &str, suffix: &str) -> String {
    format!("{}.{}", address.replace('.', "-"), suffix)
}

fn error_chain_text(err: &(dyn std::error::Error + 'static)) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

fn is_certificate_failure(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("certificate") || lower.contains("tls") || lower.contains("ssl")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_extracted_from_mismatch_message() {
        let message = "hostname '10.0.0.5' doesn't match '*.example.plex.direct'";
        assert_eq!(
            wildcard_suffix(message).as_deref(),
            Some("example.plex.direct")
        );
    }

    #[test]
    fn test_suffix_extraction_survives_trailing_punctuation() {
        let message = "error: certificate subject name doesn't match \"*.abc123.plex.direct\".";
        assert_eq!(
            wildcard_suffix(message).as_deref(),
            Some("abc123.plex.direct")
        );
    }

    #[test]
    fn test_unrelated_errors_yield_no_suffix() {
        assert_eq!(wildcard_suffix("connection refused"), None);
        assert_eq!(
            wildcard_suffix("invalid peer certificate: UnknownIssuer"),
            None
        );
    }

    #[test]
    fn test_direct_hostname_replaces_dots_with_dashes() {
        assert_eq!(
            direct_hostname("10.0.0.5", "example.plex.direct"),
            "10-0-0-5.example.plex.direct"
        );
    }

    #[test]
    fn test_retry_url_keeps_original_port() {
        let message = "hostname '10.0.0.5' doesn't match '*.example.plex.direct'";
        let suffix = wildcard_suffix(message).unwrap();
        let url = format!("https://{}:{}", direct_hostname("10.0.0.5", &suffix), 32400);
        assert_eq!(url, "https://10-0-0-5.example.plex.direct:32400");
    }

    #[test]
    fn test_untrusted_chains_are_classified_as_certificate_failures() {
        assert!(is_certificate_failure(
            "invalid peer certificate: UnknownIssuer"
        ));
        assert!(!is_certificate_failure("connection reset by peer"));
    }
}
