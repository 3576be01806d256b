//! feed-notify — poll RSS feeds and push a notification for every new entry.
//!
//! Runs until Ctrl-C, or for a single cycle with `--once`.  Notifications go
//! to a Gotify server when `--gotify-url` and `--gotify-token` are given and
//! to the log otherwise.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use feed_notify::{Config, FeedPlugin, FileStore, GotifySink, LogSink, NotificationSink};

#[derive(Parser, Debug)]
#[command(name = "feed-notify", version, about)]
struct Args {
    /// TOML config file.  Built-in defaults are used when omitted.
    #[arg(short, long, env = "FEED_NOTIFY_CONFIG")]
    config: Option<PathBuf>,

    /// File the watermark is kept in.
    #[arg(short, long, env = "FEED_NOTIFY_STATE", default_value = "feed-notify.json")]
    state: PathBuf,

    /// Base URL of a Gotify server.
    #[arg(long, env = "GOTIFY_URL", requires = "gotify_token")]
    gotify_url: Option<String>,

    /// Gotify application token.
    #[arg(long, env = "GOTIFY_TOKEN", hide_env_values = true, requires = "gotify_url")]
    gotify_token: Option<String>,

    /// Run a single poll cycle and exit.
    #[arg(long)]
    once: bool,
}

fn init_tracing() {
    // Logs go to stderr; stdout only carries the `--once` status line.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

/// Block until the process receives Ctrl-C.
fn wait_for_shutdown() -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(tokio::signal::ctrl_c())?;
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    // -- configuration -------------------------------------------------------
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    // -- collaborators -------------------------------------------------------
    let sink: Arc<dyn NotificationSink> = match (&args.gotify_url, &args.gotify_token) {
        (Some(url), Some(token)) => Arc::new(GotifySink::new(url, token.as_str())?),
        _ => Arc::new(LogSink),
    };
    let store = Arc::new(FileStore::new(&args.state));

    let plugin = FeedPlugin::new(config, sink, store)?;
    info!(
        feeds = plugin.config().feed_urls.len(),
        state = %args.state.display(),
        status = %plugin.display(),
        "feed-notify starting"
    );

    if args.once {
        plugin.run_once()?;
        println!("{}", plugin.display());
        return Ok(());
    }

    // -- background polling until Ctrl-C -------------------------------------
    plugin.enable()?;
    wait_for_shutdown()?;
    info!("shutdown requested");
    plugin.disable()?;

    Ok(())
}
