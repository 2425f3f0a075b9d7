/// A share URL broken down into the two pieces the rest of the pipeline
/// needs: which server the content lives on, and the server-relative
/// metadata key of the content itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareReference {
    /// `clientIdentifier` of the media server, as it appears in the URL
    /// fragment.
    pub server_hash: String,
    /// Server-relative metadata path, e.g. `/library/metadata/12345`.
    pub content_key: String,
}
