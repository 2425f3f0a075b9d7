use std::path::PathBuf;

use clap::{ArgAction, Parser};
use color_eyre::eyre::eyre;

use plexfetch_api::{
    auth, build_http_client, resolve_base_url, Credentials, MetadataProvider, ServerClient,
    ServerDirectory,
};
use plexfetch_core::{build_task, parse_share_url, resolve_leaves, NamingMode};
use plexfetch_models::DownloadTask;

mod download;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "plexfetch")]
#[command(about = "Download movies, shows, seasons, and episodes from a shared Plex server")]
#[command(version)]
struct Cli {
    /// URL to a movie, show, season, or episode. Tip: put the URL inside single quotes.
    url: String,

    /// Plex.tv email/username
    #[arg(short, long)]
    username: Option<String>,

    /// Plex.tv password (prompted when --username is given without it)
    #[arg(short, long)]
    password: Option<String>,

    /// Plex auth token
    #[arg(short, long)]
    token: Option<String>,

    /// Base64-encoded Plex.tv Auth Sync cookie
    #[arg(short, long)]
    cookie: Option<String>,

    /// Name downloaded files by their server-reported original filename
    #[arg(long, action = ArgAction::SetTrue)]
    original_filename: bool,

    /// Directory to download into
    #[arg(short = 'd', long, default_value = ".")]
    output_dir: PathBuf,

    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,

    /// Output format
    #[arg(long, default_value = "human", value_enum)]
    output: output::OutputFormat,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.quiet).map_err(|e| eyre!("{}", e))?;
    let output = output::Output::new(cli.output, cli.quiet);

    match run(cli, &output).await {
        Ok(()) => Ok(()),
        Err(err) => {
            output.error(format!("{:#}", err));
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli, output: &output::Output) -> color_eyre::Result<()> {
    // Validate both local inputs before touching the network.
    let reference = parse_share_url(&cli.url)?;
    let credentials = gather_credentials(&cli)?;

    let http = build_http_client()?;
    let account = auth::sign_in(&http, &credentials).await?;
    output.success(format!("Logged in as {}", account.username));

    let mut directory = ServerDirectory::fetch(&http, &account.auth_token).await?;
    output.info(format!("Found {} servers", directory.len()));

    let server = directory.get_mut(&reference.server_hash)?;
    let base_url = resolve_base_url(&http, server).await?;
    server.resolved_base_url = Some(base_url.clone());

    let client = ServerClient::new(http, base_url.clone(), server.access_token.clone());
    let roots = client
        .fetch_nodes(&reference.content_key)
        .await?
        .ok_or_else(|| eyre!("could not fetch metadata for {}", reference.content_key))?;

    let leaves = resolve_leaves(&client, roots).await?;
    output.info(format!("Found {} media items to download", leaves.len()));

    let mode = if cli.original_filename {
        NamingMode::Original
    } else {
        NamingMode::Structured
    };
    let tasks: Vec<DownloadTask> = leaves
        .iter()
        .filter_map(|leaf| build_task(&base_url, leaf, mode))
        .collect();

    download::run_downloads(&client, &tasks, &cli.output_dir, output).await
}

fn gather_credentials(cli: &Cli) -> color_eyre::Result<Credentials> {
    // Only prompt when the password is the credential that will actually
    // be used.
    let password = match (&cli.username, &cli.password) {
        (Some(_), None) if cli.token.is_none() && cli.cookie.is_none() => {
            Some(rpassword::prompt_password("Plex.tv password: ")?)
        }
        _ => cli.password.clone(),
    };

    Credentials::select(
        cli.username.clone(),
        password,
        cli.token.clone(),
        cli.cookie.clone(),
    )
    .ok_or_else(|| {
        eyre!("no credentials provided: pass --username/--password, --token, or --cookie")
    })
}
