use std::collections::HashMap;

use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use plexfetch_models::{Endpoint, Server};

use crate::client::PLEX_TV_BASE_URL;
use crate::error::ApiError;

const DEFAULT_PORT: u16 = 32400;

/// The account's accessible media servers, keyed by client identifier.
/// Populated once per run and threaded through explicitly; there is no
/// process-wide registry.
#[derive(Debug, Default)]
pub struct ServerDirectory {
    servers: HashMap<String, Server>,
}

impl ServerDirectory {
    /// Fetch the account's resource listing and index every server in it.
    pub async fn fetch(client: &Client, token: &str) -> Result<Self, ApiError> {
        let url = format!(
            "{}/api/v2/resources?includeHttps=1&includeRelay=1",
            PLEX_TV_BASE_URL
        );
        let response = client
            .get(&url)
            .header("X-Plex-Token", token)
            .send()
            .await?
            .error_for_status()?;

        let json: Value = response.json().await?;
        let directory = Self::from_resources(&json);
        debug!("Resource listing yielded {} servers", directory.len());
        Ok(directory)
    }

    /// Index a resource listing. Each resource that provides a server
    /// becomes an entry; its endpoint is the connection whose address
    /// equals the resource's declared public address, or `None` when no
    /// connection matches.
    pub fn from_resources(value: &Value) -> Self {
        let mut servers = HashMap::new();

        for resource in value.as_array().into_iter().flatten() {
            let provides = resource
                .get("provides")
                .and_then(|p| p.as_str())
                .unwrap_or("");
            if !provides.contains("server") {
                continue;
            }
            let Some(id) = resource.get("clientIdentifier").and_then(|v| v.as_str()) else {
                continue;
            };

            let name = string_field(resource, "name");
            let access_token = string_field(resource, "accessToken");
            let public_address = string_field(resource, "publicAddress");

            let endpoint = resource
                .get("connections")
                .and_then(|c| c.as_array())
                .and_then(|connections| {
                    connections.iter().find(|conn| {
                        conn.get("address").and_then(|a| a.as_str())
                            == Some(public_address.as_str())
                    })
                })
                .map(|conn| Endpoint {
                    uri: conn
                        .get("uri")
                        .and_then(|u| u.as_str())
                        .map(str::to_string),
                    address: string_field(conn, "address"),
                    port: conn
                        .get("port")
                        .and_then(|p| p.as_u64())
                        .map(|p| p as u16)
                        .unwrap_or(DEFAULT_PORT),
                });

            servers.insert(
                id.to_string(),
                Server {
                    id: id.to_string(),
                    name,
                    access_token,
                    public_address,
                    endpoint,
                    resolved_base_url: None,
                },
            );
        }

        Self { servers }
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    /// Caller-visible, non-retryable when absent: the account simply has
    /// no access to that server.
    pub fn get(&self, hash: &str) -> Result<&Server, ApiError> {
        self.servers
            .get(hash)
            .ok_or_else(|| ApiError::ServerNotFound(hash.to_string()))
    }

    pub fn get_mut(&mut self, hash: &str) -> Result<&mut Server, ApiError> {
        self.servers
            .get_mut(hash)
            .ok_or_else(|| ApiError::ServerNotFound(hash.to_string()))
    }
}

fn string_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}
