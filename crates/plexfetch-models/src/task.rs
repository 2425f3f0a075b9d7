use std::path::PathBuf;

/// Terminal artifact of resolution: one file to fetch and where to put it.
/// Self-contained once built; nothing here refers back to session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    pub remote_url: String,
    pub folder: PathBuf,
    pub filename: String,
    pub title: String,
}
