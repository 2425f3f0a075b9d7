use thiserror::Error;

use plexfetch_api::ApiError;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("share URL is malformed: {0}")]
    MalformedUrl(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}
