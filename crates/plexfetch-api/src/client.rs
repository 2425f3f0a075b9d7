use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::Client;

use crate::error::ApiError;

pub const PLEX_TV_BASE_URL: &str = "https://plex.tv";

pub const CLIENT_IDENTIFIER: &str = "plexfetch";

/// Build the shared HTTP client with the identification headers every
/// plex.tv and media-server request carries. Tokens are attached per
/// request because the account token and each server's access token differ.
pub fn build_http_client() -> Result<Client, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        HeaderName::from_static("x-plex-client-identifier"),
        HeaderValue::from_static(CLIENT_IDENTIFIER),
    );
    headers.insert(
        HeaderName::from_static("x-plex-product"),
        HeaderValue::from_static(CLIENT_IDENTIFIER),
    );

    let client = Client::builder().default_headers(headers).build()?;
    Ok(client)
}
