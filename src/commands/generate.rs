//! Generate the feed into the public directory

use anyhow::Result;
use notify::Watcher;
use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::channel;
use std::time::Duration;

use crate::cache::CollectionCache;
use crate::content::MarkdownRenderer;
use crate::feed::FeedGenerator;
use crate::store::{self, ContentStore};
use crate::Blog;

/// File name of the generated feed
pub const FEED_FILE: &str = "atom.xml";

/// Generate the feed with a fresh cache
pub fn run(blog: &Blog) -> Result<()> {
    let store = blog.content_store();
    let mut cache = CollectionCache::default();
    run_with_cache(blog, &store, &mut cache).map(|_| ())
}

/// Generate the feed through an existing cache, returning the written path
pub fn run_with_cache(
    blog: &Blog,
    store: &ContentStore,
    cache: &mut CollectionCache,
) -> Result<PathBuf> {
    let start = std::time::Instant::now();

    let renderer = MarkdownRenderer::new();
    let xml = FeedGenerator::new(&blog.config, &renderer).generate(store, cache)?;

    fs::create_dir_all(&blog.public_dir)?;
    let path = blog.public_dir.join(FEED_FILE);
    fs::write(&path, xml)?;

    let duration = start.elapsed();
    tracing::info!("Generated {:?} in {:.2}s", path, duration.as_secs_f64());

    Ok(path)
}

/// Watch the content directory and regenerate on change
pub async fn watch(blog: &Blog) -> Result<()> {
    let blog = blog.clone();
    tokio::task::spawn_blocking(move || watch_blocking(&blog)).await?
}

fn watch_blocking(blog: &Blog) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    fs::create_dir_all(&blog.content_dir)?;
    watcher.watch(&blog.content_dir, notify::RecursiveMode::Recursive)?;
    tracing::debug!("Watching: {:?}", blog.content_dir);

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    let store = blog.content_store();
    let mut cache = CollectionCache::default();
    let mut last_rebuild = std::time::Instant::now();

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(_event) => {
                // Debounce: only rebuild if more than 500ms since last rebuild
                if last_rebuild.elapsed() > Duration::from_millis(500) {
                    tracing::info!("File changed, regenerating...");
                    store::clear_cache(&mut cache);
                    if let Err(e) = run_with_cache(blog, &store, &mut cache) {
                        tracing::error!("Generation failed: {}", e);
                    }
                    last_rebuild = std::time::Instant::now();
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                break;
            }
        }
    }

    Ok(())
}
