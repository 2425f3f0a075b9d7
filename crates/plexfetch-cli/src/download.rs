use std::path::Path;

use color_eyre::eyre::{bail, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::warn;

use plexfetch_api::ServerClient;
use plexfetch_models::DownloadTask;

use crate::output::Output;

/// Sequential download loop. A failed item is reported and skipped; the
/// batch keeps going. Files are written as they stream in, so an
/// interrupted transfer can leave a partial file behind.
pub async fn run_downloads(
    client: &ServerClient,
    tasks: &[DownloadTask],
    root: &Path,
    output: &Output,
) -> Result<()> {
    let mut completed = 0usize;
    let mut failed = 0usize;

    for task in tasks {
        match download_one(client, task, root).await {
            Ok(()) => completed += 1,
            Err(err) => {
                failed += 1;
                warn!("Download of {} failed: {:#}", task.title, err);
                output.warn(format!("Skipping {}: {}", task.title, err));
            }
        }
    }

    if failed > 0 {
        output.warn(format!(
            "Downloaded {} of {} items ({} failed)",
            completed,
            tasks.len(),
            failed
        ));
    } else {
        output.success(format!("Downloaded {} items", completed));
    }
    Ok(())
}

async fn download_one(client: &ServerClient, task: &DownloadTask, root: &Path) -> Result<()> {
    let folder = root.join(&task.folder);
    fs::create_dir_all(&folder).await?;
    let destination = folder.join(&task.filename);

    let mut response = client.stream(&task.remote_url).await?;
    let status = response.status();
    if !status.is_success() {
        bail!("HTTP {}", status);
    }

    let total = response.content_length().unwrap_or(0);
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}) {msg}")
            .unwrap()
            .progress_chars("█▉▊▋▌▍▎▏  "),
    );
    bar.set_message(task.filename.clone());

    let mut file = fs::File::create(&destination).await?;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
        bar.inc(chunk.len() as u64);
    }
    file.flush().await?;
    bar.finish();

    Ok(())
}
