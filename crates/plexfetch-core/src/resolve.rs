use tracing::{debug, warn};

use plexfetch_api::MetadataProvider;
use plexfetch_models::{DownloadableLeaf, MediaNode};

use crate::error::ResolveError;

/// Expand a batch of metadata nodes into the flat, ordered list of
/// downloadable leaves beneath them.
///
/// Movies and episodes are terminal and pass through directly. A season
/// fetches its `/children`, a show its `/allLeaves`, and in both cases only
/// episode-typed children survive. Leaves keep the order the server
/// returned them in, and roots are expanded in the order given; nothing is
/// re-sorted. A branch whose metadata fetch comes back absent contributes
/// zero leaves and the batch continues, as does a root of an unsupported
/// type.
pub async fn resolve_leaves<P>(
    provider: &P,
    roots: Vec<MediaNode>,
) -> Result<Vec<DownloadableLeaf>, ResolveError>
where
    P: MetadataProvider + ?Sized,
{
    let mut leaves = Vec::new();

    for node in roots {
        match node {
            MediaNode::Movie(movie) => leaves.push(DownloadableLeaf::Movie(movie)),
            MediaNode::Episode(episode) => leaves.push(DownloadableLeaf::Episode(episode)),
            MediaNode::Season(season) => {
                let path = format!("/library/metadata/{}/children", season.rating_key);
                expand_branch(provider, &path, &season.title, &mut leaves).await?;
            }
            MediaNode::Show(show) => {
                let path = format!("/library/metadata/{}/allLeaves", show.rating_key);
                expand_branch(provider, &path, &show.title, &mut leaves).await?;
            }
            MediaNode::Unsupported {
                media_type, title, ..
            } => {
                warn!("Media type {} is not supported, skipping {}", media_type, title);
            }
        }
    }

    Ok(leaves)
}

async fn expand_branch<P>(
    provider: &P,
    path: &str,
    title: &str,
    leaves: &mut Vec<DownloadableLeaf>,
) -> Result<(), ResolveError>
where
    P: MetadataProvider + ?Sized,
{
    match provider.fetch_nodes(path).await? {
        Some(children) => {
            let before = leaves.len();
            for child in children {
                // Children of a show or season are episodes; anything else
                // (clips, extras) is discarded without comment.
                if let MediaNode::Episode(episode) = child {
                    leaves.push(DownloadableLeaf::Episode(episode));
                }
            }
            debug!("{} expanded to {} episodes", title, leaves.len() - before);
        }
        None => {
            warn!("Metadata for {} is unavailable, skipping that branch", title);
        }
    }
    Ok(())
}
