pub mod auth;
pub mod client;
pub mod direct;
pub mod directory;
pub mod error;
pub mod metadata;

pub use auth::{sign_in, Account, Credentials};
pub use client::build_http_client;
pub use direct::resolve_base_url;
pub use directory::ServerDirectory;
pub use error::ApiError;
pub use metadata::{MetadataProvider, ServerClient};
