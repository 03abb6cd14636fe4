//! 🚀 postwall — the front door, the bouncer, the maitre d' of the wall.
//!
//! 🎬 *[narrator voice]* "It all started with a simple main() function..."
//! 📦 This binary is the thin page layer: it loads config, sets up logging, picks a page,
//! and lets the library do the heavy lifting. Like a manager. 🦆

mod pages;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use postwall::logging::RenderLogger;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// 📰 Posts, their authors and their comments, in your terminal.
#[derive(Debug, Parser)]
#[command(name = "postwall", version)]
struct Cli {
    /// 🔧 TOML config. Skipped quietly if the file isn't there.
    #[arg(short, long, default_value = "postwall.toml")]
    config: PathBuf,

    #[command(subcommand)]
    page: Page,
}

#[derive(Debug, Subcommand)]
enum Page {
    /// Every post, optionally filtered by author name.
    Posts {
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// One post with its comments.
    Post {
        /// Positive integer, no leading zeros.
        number: String,
    },
    /// Type author names on stdin, one line per edit; the wall follows along.
    Browse,
}

/// 🚀 main() — where it all begins.
///
/// 🔧 Steps:
/// 1. Init tracing (so we can see what goes wrong, and when)
/// 2. Parse args
/// 3. Load config (the moment of truth)
/// 4. Render the page
/// 5. Handle errors (cry)
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        error!("💀 error: {}", err);
        // -- 🧅 peel the onion of sadness, one layer at a time
        for cause in err.chain().skip(1) {
            error!("⚠️  cause: {}", cause);
        }
        // 🗑️ Exit with prejudice.
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    // 🔒 Check the config file exists before we get too emotionally attached
    let config_file = cli
        .config
        .try_exists()
        .context(format!(
            "💀 Couldn't check whether the config file exists. Was checking here: '{}'",
            cli.config.display()
        ))?
        .then_some(cli.config.as_path());

    let app_config = postwall::load_config(config_file)
        .context("💀 Couldn't load the config. Make sure the TOML is valid and the values make sense.")?;

    let feed = Arc::new(
        postwall::feed_from_config(&app_config).context("💀 The HTTP client refused to be born.")?,
    );
    let logger = RenderLogger::from_config(&app_config.logging);

    match cli.page {
        Page::Posts { search } => pages::posts_page(feed, &logger, &search).await,
        Page::Post { number } => pages::post_page(feed, &logger, &number).await,
        Page::Browse => pages::browse_page(feed, &logger, &app_config).await,
    }
}
