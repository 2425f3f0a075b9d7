use std::path::PathBuf;

use tracing::warn;

use plexfetch_models::{DownloadableLeaf, DownloadTask, EpisodeNode, MovieNode};

/// Filename policy, chosen once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamingMode {
    /// `"{series} - s01e01 - {title}.{ext}"` for episodes, `"{title}.{ext}"`
    /// for movies.
    #[default]
    Structured,
    /// Keep the server-reported original filename verbatim.
    Original,
}

/// Map a resolved leaf to a concrete download task. Returns `None` when the
/// leaf carries no playable part, which is reported and skipped rather than
/// failing the batch.
pub fn build_task(
    base_url: &str,
    leaf: &DownloadableLeaf,
    mode: NamingMode,
) -> Option<DownloadTask> {
    let Some(part) = leaf.primary_part() else {
        warn!("{} has no playable part, skipping", leaf.title());
        return None;
    };

    let filename = match (mode, part.original_filename()) {
        (NamingMode::Original, Some(original)) => original.to_string(),
        // Fall back to structured naming when the server did not report a
        // file path.
        _ => match leaf {
            DownloadableLeaf::Episode(episode) => structured_episode_name(episode, part.extension()),
            DownloadableLeaf::Movie(movie) => structured_movie_name(movie, part.extension()),
        },
    };

    Some(DownloadTask {
        remote_url: format!("{}{}", base_url, part.key),
        folder: folder_for(leaf),
        filename: sanitize_filename(&filename),
        title: leaf.title().to_string(),
    })
}

fn structured_episode_name(episode: &EpisodeNode, extension: &str) -> String {
    format!(
        "{} - s{:02}e{:02} - {}.{}",
        episode.series_title,
        episode.season_index.unwrap_or(0),
        episode.episode_index.unwrap_or(0),
        episode.title,
        extension
    )
}

fn structured_movie_name(movie: &MovieNode, extension: &str) -> String {
    format!("{}.{}", movie.title, extension)
}

fn folder_for(leaf: &DownloadableLeaf) -> PathBuf {
    match leaf {
        DownloadableLeaf::Episode(episode) => {
            PathBuf::from(&episode.series_title).join(&episode.season_title)
        }
        DownloadableLeaf::Movie(movie) => PathBuf::from(&movie.title),
    }
}

/// Slashes in a title would otherwise create surprise subdirectories; the
/// folder path is the policy's own and is left alone.
fn sanitize_filename(name: &str) -> String {
    name.replace('/', "-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use plexfetch_models::PartRef;

    const BASE_URL: &str = "https://10-0-0-5.example.plex.direct:32400";

    fn episode_leaf(title: &str, season: u32, index: u32, file: Option<&str>) -> DownloadableLeaf {
        DownloadableLeaf::Episode(EpisodeNode {
            rating_key: "101".to_string(),
            title: title.to_string(),
            series_title: "Some Show".to_string(),
            season_title: "Season 3".to_string(),
            season_index: Some(season),
            episode_index: Some(index),
            parts: vec![PartRef {
                key: "/library/parts/1/file.mkv".to_string(),
                file: file.map(str::to_string),
            }],
        })
    }

    fn movie_leaf(title: &str) -> DownloadableLeaf {
        DownloadableLeaf::Movie(MovieNode {
            rating_key: "9".to_string(),
            title: title.to_string(),
            parts: vec![PartRef {
                key: "/library/parts/9/movie.mp4".to_string(),
                file: Some("/data/movies/original.mp4".to_string()),
            }],
        })
    }

    #[test]
    fn test_structured_episode_name_zero_pads_indices() {
        let task = build_task(BASE_URL, &episode_leaf("Finale", 3, 7, None), NamingMode::Structured)
            .unwrap();
        assert_eq!(task.filename, "Some Show - s03e07 - Finale.mkv");
        assert_eq!(task.folder, PathBuf::from("Some Show").join("Season 3"));
        assert_eq!(
            task.remote_url,
            format!("{}/library/parts/1/file.mkv", BASE_URL)
        );
    }

    #[test]
    fn test_structured_movie_name_uses_part_extension() {
        let task = build_task(BASE_URL, &movie_leaf("Film"), NamingMode::Structured).unwrap();
        assert_eq!(task.filename, "Film.mp4");
        assert_eq!(task.folder, PathBuf::from("Film"));
    }

    #[test]
    fn test_original_mode_keeps_server_filename() {
        let leaf = episode_leaf("Finale", 3, 7, Some("/data/tv/Some Show/S03E07.Finale.mkv"));
        let task = build_task(BASE_URL, &leaf, NamingMode::Original).unwrap();
        assert_eq!(task.filename, "S03E07.Finale.mkv");
    }

    #[test]
    fn test_original_mode_falls_back_when_no_file_reported() {
        let task = build_task(BASE_URL, &episode_leaf("Finale", 3, 7, None), NamingMode::Original)
            .unwrap();
        assert_eq!(task.filename, "Some Show - s03e07 - Finale.mkv");
    }

    #[test]
    fn test_slashes_sanitized_in_filename_but_not_folder() {
        let task = build_task(
            BASE_URL,
            &episode_leaf("Either/Or", 3, 7, None),
            NamingMode::Structured,
        )
        .unwrap();
        assert_eq!(task.filename, "Some Show - s03e07 - Either-Or.mkv");
        assert!(!task.filename.contains('/'));
        // Folder separators are the policy's own, inserted by join.
        assert_eq!(task.folder, PathBuf::from("Some Show").join("Season 3"));
    }

    #[test]
    fn test_leaf_without_parts_builds_no_task() {
        let leaf = DownloadableLeaf::Movie(MovieNode {
            rating_key: "9".to_string(),
            title: "Empty".to_string(),
            parts: vec![],
        });
        assert!(build_task(BASE_URL, &leaf, NamingMode::Structured).is_none());
    }
}
