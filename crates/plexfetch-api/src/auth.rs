use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::client::PLEX_TV_BASE_URL;
use crate::error::ApiError;

/// One credential form, already reduced by precedence: a cookie beats an
/// explicit token, which beats username/password.
#[derive(Debug, Clone)]
pub enum Credentials {
    Cookie(String),
    Token(String),
    Password { username: String, password: String },
}

impl Credentials {
    /// Apply the credential precedence to whatever the caller collected.
    /// Returns `None` when no usable form is present, which the caller
    /// reports as a configuration error before any network call.
    pub fn select(
        username: Option<String>,
        password: Option<String>,
        token: Option<String>,
        cookie: Option<String>,
    ) -> Option<Self> {
        if let Some(cookie) = cookie {
            return Some(Credentials::Cookie(cookie));
        }
        if let Some(token) = token {
            return Some(Credentials::Token(token));
        }
        match (username, password) {
            (Some(username), Some(password)) => Some(Credentials::Password { username, password }),
            _ => None,
        }
    }
}

/// Signed-in account identity.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub username: String,
    #[serde(rename = "authToken")]
    pub auth_token: String,
}

#[derive(Debug, Deserialize)]
struct AccountResponse {
    user: Account,
}

/// The Auth Sync cookie is base64 over a JSON object carrying the token.
pub fn token_from_cookie(cookie: &str) -> Result<String, ApiError> {
    let decoded = BASE64
        .decode(cookie.trim())
        .map_err(|e| ApiError::MalformedCookie(e.to_string()))?;
    let text =
        String::from_utf8(decoded).map_err(|e| ApiError::MalformedCookie(e.to_string()))?;
    let value: serde_json::Value =
        serde_json::from_str(&text).map_err(|e| ApiError::MalformedCookie(e.to_string()))?;
    value
        .get("token")
        .and_then(|t| t.as_str())
        .map(str::to_string)
        .ok_or_else(|| ApiError::MalformedCookie("missing token field".to_string()))
}

/// Exchange the selected credential form for an account identity and a
/// bearer token usable against plex.tv.
pub async fn sign_in(client: &Client, credentials: &Credentials) -> Result<Account, ApiError> {
    match credentials {
        Credentials::Cookie(cookie) => {
            let token = token_from_cookie(cookie)?;
            account_for_token(client, &token).await
        }
        Credentials::Token(token) => account_for_token(client, token).await,
        Credentials::Password { username, password } => {
            let url = format!("{}/users/sign_in.json", PLEX_TV_BASE_URL);
            let response = client
                .post(&url)
                .form(&[("user[login]", username.as_str()), ("user[password]", password.as_str())])
                .send()
                .await?;
            decode_account(response).await
        }
    }
}

async fn account_for_token(client: &Client, token: &str) -> Result<Account, ApiError> {
    let url = format!("{}/users/account.json", PLEX_TV_BASE_URL);
    let response = client
        .get(&url)
        .header("X-Plex-Token", token)
        .send()
        .await?;
    decode_account(response).await
}

async fn decode_account(response: reqwest::Response) -> Result<Account, ApiError> {
    let status = response.status();
    if !status.is_success() {
        // The provider reports the reason in an `error` field; surface it
        // verbatim when present.
        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
            .unwrap_or_else(|| format!("HTTP {}", status));
        return Err(ApiError::Authentication(message));
    }

    let body: AccountResponse = response
        .json()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))?;
    debug!("Signed in as {}", body.user.username);
    Ok(body.user)
}
