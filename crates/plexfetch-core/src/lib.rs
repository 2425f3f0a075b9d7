pub mod error;
pub mod naming;
pub mod resolve;
pub mod share;

pub use error::ResolveError;
pub use naming::{build_task, NamingMode};
pub use resolve::resolve_leaves;
pub use share::parse_share_url;
