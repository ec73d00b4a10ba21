//! Watch command - development server with live reload

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use color_eyre::eyre::{Result, WrapErr};
use folio_core::Config;
use folio_generator::BuildStats;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::{net::TcpListener, sync::mpsc};

use super::{
    build::{builder_for, print_stats, print_warnings},
    check::quick_validate,
};
use crate::server::{ServerState, create_router, inject_livereload};

/// Quiet period after a change before rebuilding.
const DEBOUNCE: Duration = Duration::from_millis(200);

/// Run the watch command.
///
/// Builds with drafts, serves the output on `port` and rebuilds whenever the
/// configuration, content or static files change.
pub async fn run(config_path: &Path, port: u16, open_browser: bool) -> Result<()> {
    tracing::info!(?config_path, port, "Starting watch mode");

    let config = load_config(config_path)?;
    print_warnings(&quick_validate(&config));
    let output_dir = PathBuf::from(&config.build.output_dir);

    tracing::info!("Running initial build...");
    let stats = build_and_inject(config_path, config, &output_dir)?;
    println!();
    print_stats(&stats);
    println!("  Duration:    {:>6}ms", stats.duration_ms);

    let state = Arc::new(ServerState::new());

    let (tx, mut rx) = mpsc::channel::<()>(16);
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<notify::Event>| match res {
            Ok(event)
                if matches!(
                    event.kind,
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                ) =>
            {
                let _ = tx.blocking_send(());
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "file watcher error"),
        },
        notify::Config::default(),
    )
    .wrap_err("Failed to create file watcher")?;

    for dir in [
        super::content_dir(config_path),
        super::static_dir(config_path),
    ] {
        if dir.exists() {
            watcher
                .watch(&dir, RecursiveMode::Recursive)
                .wrap_err_with(|| format!("Failed to watch {}", dir.display()))?;
            tracing::debug!(dir = %dir.display(), "watching directory");
        }
    }
    watcher
        .watch(config_path, RecursiveMode::NonRecursive)
        .wrap_err("Failed to watch configuration file")?;

    let rebuild_state = state.clone();
    let rebuild_config = config_path.to_path_buf();
    let rebuild_output = output_dir.clone();

    tokio::spawn(async move {
        while rx.recv().await.is_some() {
            tokio::time::sleep(DEBOUNCE).await;
            while rx.try_recv().is_ok() {}

            println!();
            println!("  Change detected, rebuilding...");

            let config_path = rebuild_config.clone();
            let output_dir = rebuild_output.clone();
            let result = tokio::task::spawn_blocking(move || {
                let config = load_config(&config_path)?;
                build_and_inject(&config_path, config, &output_dir)
            })
            .await;

            match result {
                Ok(Ok(stats)) => {
                    println!(
                        "  ✓ Rebuilt {} pages in {}ms",
                        stats.total_pages(),
                        stats.duration_ms
                    );
                    rebuild_state.notify_reload();
                }
                Ok(Err(e)) => {
                    tracing::error!(error = %e, "rebuild failed");
                    eprintln!("  ✗ Rebuild failed: {e:#}");
                }
                Err(e) => tracing::error!(error = %e, "rebuild task panicked"),
            }
        }
    });

    let app = create_router(&output_dir, state);
    let addr = format!("127.0.0.1:{port}");

    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("Failed to bind to {addr}"))?;

    println!();
    println!("  Dev server running at http://{addr}");
    println!("  Press Ctrl+C to stop");
    println!();

    if open_browser {
        if let Err(e) = open::that(format!("http://{addr}")) {
            tracing::warn!(error = %e, "failed to open browser");
        }
    }

    // Dropping the watcher stops change events.
    let _watcher = watcher;

    axum::serve(listener, app).await.wrap_err("Server error")?;

    Ok(())
}

/// Configuration for watch mode: drafts are always shown.
fn load_config(config_path: &Path) -> Result<Config> {
    let mut config =
        Config::load_with_env(config_path).wrap_err("Failed to load configuration")?;
    config.build.drafts = true;
    Ok(config)
}

fn build_and_inject(config_path: &Path, config: Config, output_dir: &Path) -> Result<BuildStats> {
    let stats = builder_for(config_path, config, output_dir)
        .build()
        .wrap_err("Build failed")?;
    inject_livereload(output_dir).wrap_err("Failed to inject live reload script")?;

    tracing::debug!(?stats, "Build completed");
    Ok(stats)
}
