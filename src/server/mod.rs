//! Development server: the feed on demand, everything else from public/

use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::cache::{CacheMode, CollectionCache};
use crate::config::ThemeConfig;
use crate::content::MarkdownRenderer;
use crate::feed::{FeedGenerator, FeedResponse, FEED_ERROR_BODY};
use crate::store::{self, ContentStore};
use crate::Blog;

/// Store and cache, locked together for the length of one request
struct SharedContent {
    store: ContentStore,
    cache: CollectionCache,
}

/// Server state
struct ServerState {
    config: ThemeConfig,
    renderer: MarkdownRenderer,
    content: Mutex<SharedContent>,
}

impl ServerState {
    fn new(config: ThemeConfig, store: ContentStore, mode: CacheMode) -> Self {
        Self {
            config,
            renderer: MarkdownRenderer::new(),
            content: Mutex::new(SharedContent {
                store,
                cache: CollectionCache::new(mode),
            }),
        }
    }

    /// Build the feed; the lock is held only for this call
    fn feed(&self) -> FeedResponse {
        let mut guard = self.content.lock().unwrap_or_else(PoisonError::into_inner);
        let content = &mut *guard;
        FeedGenerator::new(&self.config, &self.renderer)
            .respond(&content.store, &mut content.cache)
    }

    fn clear_cache(&self) {
        let mut content = self.content.lock().unwrap_or_else(PoisonError::into_inner);
        store::clear_cache(&mut content.cache);
    }
}

/// Start the development server
pub async fn start(blog: &Blog, ip: &str, port: u16, watch: bool) -> Result<()> {
    // Bad language files should stop us before we bind
    let translator = blog.translator()?;
    tracing::debug!("Using locale {}", translator.locale());

    let mode = if watch {
        CacheMode::Bypass
    } else {
        CacheMode::Memoize
    };
    let state = Arc::new(ServerState::new(
        blog.config.clone(),
        blog.content_store(),
        mode,
    ));

    let app = router(state.clone(), blog.public_dir.clone());

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    if watch {
        println!("Watching content for changes...");
    }
    println!("Press Ctrl+C to stop.");

    if watch {
        let content_dir = blog.content_dir.clone();
        tokio::task::spawn_blocking(move || {
            if let Err(e) = watch_content(content_dir, state) {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<ServerState>, public_dir: PathBuf) -> Router {
    Router::new()
        .route("/atom.xml", get(feed_handler))
        .fallback_service(ServeDir::new(public_dir).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Feed endpoint. Rendering and highlighting run on the blocking pool.
async fn feed_handler(State(state): State<Arc<ServerState>>) -> Response {
    match tokio::task::spawn_blocking(move || state.feed()).await {
        Ok(feed) => feed.into_response(),
        Err(e) => {
            tracing::error!("Feed task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, FEED_ERROR_BODY).into_response()
        }
    }
}

/// Clear the cache whenever something under the content directory changes
fn watch_content(content_dir: PathBuf, state: Arc<ServerState>) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    if content_dir.exists() {
        debouncer
            .watcher()
            .watch(&content_dir, RecursiveMode::Recursive)?;
        tracing::debug!("Watching: {:?}", content_dir);
    } else {
        tracing::warn!("Content directory {:?} does not exist", content_dir);
    }

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant = events.iter().any(|e| {
                    let path_str = e.path.to_string_lossy();
                    !path_str.contains(".git")
                        && !path_str.contains(".DS_Store")
                        && !path_str.ends_with('~')
                });
                if !relevant {
                    continue;
                }

                for event in &events {
                    tracing::info!("File changed: {}", event.path.display());
                }
                state.clear_cache();
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}
