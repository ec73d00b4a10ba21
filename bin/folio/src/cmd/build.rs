//! Build command - generates the static site

use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use color_eyre::eyre::{Result, WrapErr};
use folio_core::Config;
use folio_generator::{BuildStats, Builder};

use super::check::quick_validate;

/// Run the build command.
///
/// `output` falls back to `build.output_dir` from the configuration.
pub fn run(
    config_path: &Path,
    output: Option<&Path>,
    drafts: bool,
    base_url: Option<&str>,
) -> Result<()> {
    let start = Instant::now();
    tracing::info!(?config_path, ?output, drafts, ?base_url, "Starting build");

    let mut config =
        Config::load_with_env(config_path).wrap_err("Failed to load configuration")?;
    print_warnings(&quick_validate(&config));

    if drafts {
        config.build.drafts = true;
    }

    if let Some(url) = base_url {
        tracing::info!(base_url = url, "Overriding site base_url from CLI");
        config.site.base_url = url.trim_end_matches('/').to_string();
    }

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&config.build.output_dir));

    tracing::debug!(?config, "Loaded configuration");

    let builder = builder_for(config_path, config, &output);
    let stats = builder.build().wrap_err("Build failed")?;

    let duration = start.elapsed();

    println!();
    println!("  Build completed successfully!");
    println!();
    print_stats(&stats);
    println!();
    println!("  Duration:    {:.2}s", duration.as_secs_f64());
    println!("  Output:      {}", output.display());
    println!();

    tracing::info!(?stats, ?duration, "Build completed successfully");

    Ok(())
}

/// Builder for the site rooted next to `config_path`.
pub(crate) fn builder_for(config_path: &Path, config: Config, output: &Path) -> Builder {
    let builder = Builder::new(config, super::content_dir(config_path), output);

    let static_dir = super::static_dir(config_path);
    if static_dir.is_dir() {
        tracing::info!(dir = %static_dir.display(), "Found static directory");
        builder.with_static_dir(static_dir)
    } else {
        builder
    }
}

pub(crate) fn print_stats(stats: &BuildStats) {
    println!("  Posts:       {:>6}", stats.posts);
    println!("  Pages:       {:>6}", stats.pages);
    println!("  Index pages: {:>6}", stats.index_pages);
    println!("  Assets:      {:>6}", stats.assets);
    println!("  Total:       {:>6} pages", stats.total_pages());
}

pub(crate) fn print_warnings(warnings: &[String]) {
    if warnings.is_empty() {
        return;
    }

    println!();
    println!("  Warnings:");
    for warn in warnings {
        println!("  ⚠ {warn}");
    }
    println!();
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    const CONFIG: &str = r#"
[site]
title = "CLI Test"
author = "Tester"
base_url = "https://example.com"
"#;

    fn site() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.toml"), CONFIG).unwrap();
        fs::create_dir_all(dir.path().join("content/posts")).unwrap();
        fs::write(
            dir.path().join("content/posts/hello.md"),
            "---\ntitle: Hello\ndate: 2024-05-01\n---\n\nHi.\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("content/posts/later.md"),
            "---\ntitle: Later\ndraft: true\n---\n\nSoon.\n",
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("static")).unwrap();
        fs::write(dir.path().join("static/robots.txt"), "User-agent: *\n").unwrap();
        dir
    }

    #[test]
    fn test_build_site_next_to_config() {
        let site = site();
        let output = site.path().join("out");

        run(&site.path().join("config.toml"), Some(&output), false, None).unwrap();

        assert!(output.join("index.html").exists());
        assert!(output.join("posts/hello/index.html").exists());
        assert!(!output.join("posts/later/index.html").exists());
        assert!(output.join("robots.txt").exists());
    }

    #[test]
    fn test_build_with_drafts_and_base_url() {
        let site = site();
        let output = site.path().join("out");

        run(
            &site.path().join("config.toml"),
            Some(&output),
            true,
            Some("https://preview.example.com/"),
        )
        .unwrap();

        assert!(output.join("posts/later/index.html").exists());
        let rss = fs::read_to_string(output.join("rss.xml")).unwrap();
        assert!(rss.contains("https://preview.example.com/posts/hello"));
    }

    #[test]
    fn test_build_missing_config() {
        let dir = TempDir::new().unwrap();
        let result = run(&dir.path().join("config.toml"), None, false, None);
        assert!(result.is_err());
    }
}
