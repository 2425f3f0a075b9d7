/// A connection endpoint advertised for a server. `uri` is present when the
/// resource listing already includes a ready-made HTTPS address; legacy
/// listings only carry the raw address and port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub uri: Option<String>,
    pub address: String,
    pub port: u16,
}

/// One media server the account has access to. Identity is `id`.
///
/// `endpoint` is the connection whose address matched the resource's
/// declared public address; `None` means no usable endpoint was advertised
/// and base URL resolution must fail. `resolved_base_url` stays `None`
/// until the direct-connection resolver has produced a TLS-valid URL.
#[derive(Debug, Clone)]
pub struct Server {
    pub id: String,
    pub name: String,
    pub access_token: String,
    pub public_address: String,
    pub endpoint: Option<Endpoint>,
    pub resolved_base_url: Option<String>,
}
