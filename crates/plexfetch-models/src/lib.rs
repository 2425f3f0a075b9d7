pub mod media;
pub mod server;
pub mod share;
pub mod task;

pub use media::{
    DownloadableLeaf, EpisodeNode, MediaContainer, MediaContainerResponse, MediaNode, MovieNode,
    PartRef, RawNode, SeasonNode, ShowNode,
};
pub use server::{Endpoint, Server};
pub use share::ShareReference;
pub use task::DownloadTask;
