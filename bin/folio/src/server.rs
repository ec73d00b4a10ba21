//! Development server with live reload

use std::{convert::Infallible, fs, io, path::Path, sync::Arc, time::Duration};

use axum::{
    Router,
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
};
use tokio::sync::broadcast;
use tokio_stream::{Stream, StreamExt, wrappers::BroadcastStream};
use tower_http::services::ServeDir;

/// Endpoint the injected script listens on.
pub const LIVERELOAD_PATH: &str = "/__livereload";

/// Script appended before `</body>` in every page served in watch mode.
pub const LIVERELOAD_SCRIPT: &str = r#"<script>
(function () {
  var source = new EventSource('/__livereload');
  source.onmessage = function (event) {
    if (event.data === 'reload') window.location.reload();
  };
  source.onerror = function () {
    console.log('[folio] live reload connection lost, retrying...');
  };
})();
</script>
"#;

/// Shared server state.
#[derive(Debug, Clone)]
pub struct ServerState {
    reload_tx: broadcast::Sender<()>,
}

impl ServerState {
    pub fn new() -> Self {
        let (reload_tx, _) = broadcast::channel(16);
        Self { reload_tx }
    }

    /// Tell every connected page to reload. Returns how many were listening.
    pub fn notify_reload(&self) -> usize {
        self.reload_tx.send(()).unwrap_or(0)
    }

    fn subscribe(&self) -> broadcast::Receiver<()> {
        self.reload_tx.subscribe()
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Router serving `output_dir` plus the live reload event stream.
pub fn create_router(output_dir: &Path, state: Arc<ServerState>) -> Router {
    Router::new()
        .route(LIVERELOAD_PATH, get(livereload_handler))
        .fallback_service(ServeDir::new(output_dir))
        .with_state(state)
}

async fn livereload_handler(
    State(state): State<Arc<ServerState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    tracing::debug!("live reload client connected");

    // Lagged receivers just skip to the next reload.
    let stream = BroadcastStream::new(state.subscribe())
        .filter_map(|msg| msg.ok().map(|()| Ok(Event::default().data("reload"))));

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(30))
            .text("ping"),
    )
}

/// Add the live reload script to one page.
pub fn inject_script(html: &str) -> Option<String> {
    if html.contains(LIVERELOAD_PATH) {
        return None;
    }

    let injected = match html.rfind("</body>") {
        Some(pos) => format!("{}{LIVERELOAD_SCRIPT}{}", &html[..pos], &html[pos..]),
        None => format!("{html}{LIVERELOAD_SCRIPT}"),
    };
    Some(injected)
}

/// Add the live reload script to every HTML file under `output_dir`.
pub fn inject_livereload(output_dir: &Path) -> io::Result<usize> {
    let mut count = 0;

    for entry in walkdir::WalkDir::new(output_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "html"))
    {
        let path = entry.path();
        let html = fs::read_to_string(path)?;
        if let Some(modified) = inject_script(&html) {
            fs::write(path, modified)?;
            count += 1;
        }
    }

    tracing::debug!(count, "injected live reload script");
    Ok(count)
}
