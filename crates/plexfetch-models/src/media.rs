use serde::Deserialize;

/// Playable file reference inside a metadata node. `key` is the
/// server-relative download path; `file` is the absolute path of the media
/// file on the server's own filesystem, when the server reports it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PartRef {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub file: Option<String>,
}

impl PartRef {
    /// File extension derived from the last dot-segment of the remote key.
    pub fn extension(&self) -> &str {
        self.key.rsplit('.').next().unwrap_or("")
    }

    /// Final path component of the server-reported original file path.
    pub fn original_filename(&self) -> Option<&str> {
        self.file.as_deref().and_then(|f| f.rsplit('/').next())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMedia {
    #[serde(rename = "Part", default)]
    pub part: Vec<PartRef>,
}

/// Wire shape of one metadata node as the server returns it. Fields beyond
/// the common core are optional because shows, seasons, episodes and movies
/// each populate a different subset.
#[derive(Debug, Clone, Deserialize)]
pub struct RawNode {
    #[serde(rename = "ratingKey", default)]
    pub rating_key: String,
    #[serde(rename = "type", default)]
    pub media_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "parentTitle", default)]
    pub parent_title: Option<String>,
    #[serde(rename = "grandparentTitle", default)]
    pub grandparent_title: Option<String>,
    #[serde(rename = "parentIndex", default)]
    pub parent_index: Option<u32>,
    #[serde(default)]
    pub index: Option<u32>,
    #[serde(rename = "Media", default)]
    pub media: Vec<RawMedia>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaContainer {
    #[serde(rename = "Metadata", default)]
    pub metadata: Vec<RawNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaContainerResponse {
    #[serde(rename = "MediaContainer")]
    pub media_container: MediaContainer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowNode {
    pub rating_key: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonNode {
    pub rating_key: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeNode {
    pub rating_key: String,
    pub title: String,
    pub series_title: String,
    pub season_title: String,
    pub season_index: Option<u32>,
    pub episode_index: Option<u32>,
    pub parts: Vec<PartRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieNode {
    pub rating_key: String,
    pub title: String,
    pub parts: Vec<PartRef>,
}

/// Closed set of node types the resolver understands, dispatched by the
/// server's `type` tag. Anything else lands in `Unsupported` so the caller
/// can report and skip it without aborting the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaNode {
    Show(ShowNode),
    Season(SeasonNode),
    Episode(EpisodeNode),
    Movie(MovieNode),
    Unsupported { rating_key: String, media_type: String, title: String },
}

impl MediaNode {
    pub fn from_raw(raw: RawNode) -> Self {
        // A movie has exactly one playable part in this design; episodes
        // likewise take the first media item's parts.
        let parts = raw
            .media
            .into_iter()
            .next()
            .map(|m| m.part)
            .unwrap_or_default();

        match raw.media_type.as_str() {
            "show" => MediaNode::Show(ShowNode {
                rating_key: raw.rating_key,
                title: raw.title,
            }),
            "season" => MediaNode::Season(SeasonNode {
                rating_key: raw.rating_key,
                title: raw.title,
            }),
            "episode" => MediaNode::Episode(EpisodeNode {
                rating_key: raw.rating_key,
                title: raw.title,
                series_title: raw.grandparent_title.unwrap_or_default(),
                season_title: raw.parent_title.unwrap_or_default(),
                season_index: raw.parent_index,
                episode_index: raw.index,
                parts,
            }),
            "movie" => MediaNode::Movie(MovieNode {
                rating_key: raw.rating_key,
                title: raw.title,
                parts,
            }),
            other => MediaNode::Unsupported {
                rating_key: raw.rating_key,
                media_type: other.to_string(),
                title: raw.title,
            },
        }
    }

    pub fn rating_key(&self) -> &str {
        match self {
            MediaNode::Show(n) => &n.rating_key,
            MediaNode::Season(n) => &n.rating_key,
            MediaNode::Episode(n) => &n.rating_key,
            MediaNode::Movie(n) => &n.rating_key,
            MediaNode::Unsupported { rating_key, .. } => rating_key,
        }
    }
}

/// Terminal output of hierarchy resolution. Shows and seasons never appear
/// here; they are always expanded down to their episodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadableLeaf {
    Episode(EpisodeNode),
    Movie(MovieNode),
}

impl DownloadableLeaf {
    pub fn title(&self) -> &str {
        match self {
            DownloadableLeaf::Episode(e) => &e.title,
            DownloadableLeaf::Movie(m) => &m.title,
        }
    }

    /// The single playable part this design downloads per leaf.
    pub fn primary_part(&self) -> Option<&PartRef> {
        match self {
            DownloadableLeaf::Episode(e) => e.parts.first(),
            DownloadableLeaf::Movie(m) => m.parts.first(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_from_json(json: &str) -> MediaNode {
        let raw: RawNode = serde_json::from_str(json).unwrap();
        MediaNode::from_raw(raw)
    }

    #[test]
    fn test_episode_from_raw() {
        let node = node_from_json(
            r#"{
                "ratingKey": "101",
                "type": "episode",
                "title": "Pilot",
                "grandparentTitle": "Some Show",
                "parentTitle": "Season 1",
                "parentIndex": 1,
                "index": 1,
                "Media": [{"Part": [{"key": "/library/parts/1/file.mkv", "file": "/data/tv/Some Show/s01e01.mkv"}]}]
            }"#,
        );

        match node {
            MediaNode::Episode(ep) => {
                assert_eq!(ep.series_title, "Some Show");
                assert_eq!(ep.season_index, Some(1));
                assert_eq!(ep.parts.len(), 1);
                assert_eq!(ep.parts[0].extension(), "mkv");
                assert_eq!(ep.parts[0].original_filename(), Some("s01e01.mkv"));
            }
            other => panic!("expected episode, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_type_maps_to_unsupported() {
        let node = node_from_json(r#"{"ratingKey": "7", "type": "clip", "title": "Trailer"}"#);
        assert_eq!(
            node,
            MediaNode::Unsupported {
                rating_key: "7".to_string(),
                media_type: "clip".to_string(),
                title: "Trailer".to_string(),
            }
        );
    }

    #[test]
    fn test_container_response_decodes_metadata_list() {
        let response: MediaContainerResponse = serde_json::from_str(
            r#"{"MediaContainer": {"Metadata": [
                {"ratingKey": "1", "type": "movie", "title": "A"},
                {"ratingKey": "2", "type": "show", "title": "B"}
            ]}}"#,
        )
        .unwrap();
        assert_eq!(response.media_container.metadata.len(), 2);
        assert_eq!(response.media_container.metadata[0].media_type, "movie");
    }

    #[test]
    fn test_movie_takes_first_media_parts_only() {
        let node = node_from_json(
            r#"{
                "ratingKey": "55",
                "type": "movie",
                "title": "Film",
                "Media": [
                    {"Part": [{"key": "/library/parts/10/a.mp4"}]},
                    {"Part": [{"key": "/library/parts/11/b.mp4"}]}
                ]
            }"#,
        );
        match node {
            MediaNode::Movie(m) => {
                assert_eq!(m.parts.len(), 1);
                assert_eq!(m.parts[0].key, "/library/parts/10/a.mp4");
            }
            other => panic!("expected movie, got {:?}", other),
        }
    }
}
