//! 🖼️ Pages — the terminal stand-ins for the all-posts page and the single-post page.
//!
//! Every page goes through a [`Loader`]: spinner while the data is absent, the error text if
//! the feed rejected, the wall if it didn't.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use indicatif::{ProgressBar, ProgressStyle};
use postwall::debounce::Debouncer;
use postwall::loader::{Fetcher, Loader, fetcher};
use postwall::logging::RenderLogger;
use postwall::search::{SearchContext, filter_by_author};
use postwall::transport::TransportBackend;
use postwall::utils::{parse_post_number, title_case};
use postwall::{AppConfig, FeedError, Post, PostFeed};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

/// 📦 What a page receives: the joined data, or the message to show instead.
pub type PageData<T> = Result<T, String>;

type Feed = Arc<PostFeed<TransportBackend>>;

/// 💬 The page shows the error's message and nothing else. Network trouble gets a hint
/// in the logs too.
fn page_message(error: FeedError) -> String {
    if error.is_transport() {
        warn!(
            "🔧 hint: the API isn't reachable. Check `api.base_url` in your config \
             (or POSTWALL_API__BASE_URL) and your network. ☕"
        );
    }
    error.to_string()
}

pub fn all_posts_fetcher(feed: Feed) -> Fetcher<(), PageData<Vec<Post>>> {
    fetcher(move |deliver, ()| {
        let feed = Arc::clone(&feed);
        tokio::spawn(async move {
            let outcome = feed
                .fetch_all_posts_aggregated()
                .await
                .map_err(page_message);
            deliver.deliver(outcome);
        });
    })
}

pub fn one_post_fetcher(feed: Feed) -> Fetcher<u64, PageData<Post>> {
    fetcher(move |deliver, post_id| {
        let feed = Arc::clone(&feed);
        tokio::spawn(async move {
            let outcome = feed
                .fetch_one_post_aggregated(Some(post_id))
                .await
                .map_err(page_message);
            deliver.deliver(outcome);
        });
    })
}

/// 🌀 "Loading…" until the loader has something to show.
async fn wait_with_spinner<I, D: Clone>(loader: &Loader<I, D>) -> D {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("Loading…");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let data = loader.wait_for_delivery().await;
    spinner.finish_and_clear();
    data
}

pub fn render_posts_page(logger: &RenderLogger, posts: &[Post], search_term: &str) -> String {
    logger.render("PostsPage", || {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["#", "Title", "Author", "Comments"]);
        for post in filter_by_author(posts, search_term) {
            table.add_row(vec![
                post.id.to_string(),
                post.title.clone(),
                post.author.name.clone(),
                post.comments.len().to_string(),
            ]);
        }
        format!(
            "All Posts - My Posts\nSearch by author name: {search_term}\n{table}"
        )
    })
}

pub fn render_post_page(logger: &RenderLogger, post: &Post) -> String {
    logger.render("PostPage", || {
        let mut comments = Table::new();
        comments
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Name", "Email", "Comment"]);
        for comment in &post.comments {
            comments.add_row(vec![
                comment.name.clone(),
                comment.email.clone(),
                comment.body.clone(),
            ]);
        }
        format!(
            "{} - {} - My Posts\n\n{}\n\n{}",
            title_case(&post.title),
            post.author.name,
            post.body,
            comments
        )
    })
}

/// 📰 `posts [--search TERM]`
pub async fn posts_page(feed: Feed, logger: &RenderLogger, search_term: &str) -> Result<()> {
    let loader = Loader::mount((), all_posts_fetcher(feed));
    match wait_with_spinner(&loader).await {
        Ok(posts) => println!("{}", render_posts_page(logger, &posts, search_term)),
        Err(message) => println!("{message}"),
    }
    loader.teardown();
    Ok(())
}

/// 🎯 `post NUMBER`
pub async fn post_page(feed: Feed, logger: &RenderLogger, post_number: &str) -> Result<()> {
    let post_id = match parse_post_number(post_number) {
        Ok(post_id) => post_id,
        Err(error) => {
            println!("{error}");
            return Ok(());
        }
    };

    let loader = Loader::mount(post_id, one_post_fetcher(feed));
    match wait_with_spinner(&loader).await {
        Ok(post) => println!("{}", render_post_page(logger, &post)),
        Err(message) => println!("{message}"),
    }
    loader.teardown();
    Ok(())
}

/// ⌨️ `browse` — every stdin line is a keystroke burst; the wall re-renders when the
/// debounced term lands.
pub async fn browse_page(feed: Feed, logger: &RenderLogger, config: &AppConfig) -> Result<()> {
    let loader = Loader::mount((), all_posts_fetcher(feed));
    let posts = match wait_with_spinner(&loader).await {
        Ok(posts) => posts,
        Err(message) => {
            println!("{message}");
            return Ok(());
        }
    };
    loader.teardown();

    let search = SearchContext::new(config.search.initial_term.clone());
    let mut term_changes = search.subscribe();
    let mut search_bar = Debouncer::new(
        search.initial_term().to_string(),
        config.search.quiet_period(),
        search.updater(),
    );
    println!("{}", render_posts_page(logger, &posts, &search.term()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => {
                    search_bar.input(line.trim().to_string())?;
                    logger.render("SearchBar", || {
                        println!("🔍 {}", search_bar.displayed());
                    });
                }
                None => break,
            },
            changed = term_changes.changed() => {
                if changed.is_err() {
                    break;
                }
                println!("{}", render_posts_page(logger, &posts, &search.term()));
            }
        }
    }

    // -- ⏳ stdin closed mid-burst: let the last term land before leaving
    if search_bar.is_pending() {
        let _ = tokio::time::timeout(search_bar.quiet_period() * 2, term_changes.changed()).await;
        println!("{}", render_posts_page(logger, &posts, &search.term()));
    }
    Ok(())
}
