//! Build orchestration.
//!
//! Coordinates the full site build process.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use folio_core::{Config, Post};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    assets::{AssetError, copy_static},
    collector::{CollectorError, ContentCollector, SiteContent, paginate},
    html::{HtmlError, HtmlGenerator, output_path, page_url},
    rss::{RssError, RssGenerator},
};

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Collector error.
    #[error("collector error: {0}")]
    Collector(#[from] CollectorError),

    /// HTML generation error.
    #[error("HTML error: {0}")]
    Html(#[from] HtmlError),

    /// RSS generation error.
    #[error("RSS error: {0}")]
    Rss(#[from] RssError),

    /// Asset error.
    #[error("asset error: {0}")]
    Asset(#[from] AssetError),
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Build statistics.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Post pages written, drafts included when enabled.
    pub posts: usize,

    /// Standalone pages written.
    pub pages: usize,

    /// Home, listing, tag and projects pages written.
    pub index_pages: usize,

    /// Number of static files copied.
    pub assets: usize,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

impl BuildStats {
    /// Every HTML file written.
    pub fn total_pages(&self) -> usize {
        self.posts + self.pages + self.index_pages
    }
}

/// Site builder that orchestrates the build process.
#[derive(Debug)]
pub struct Builder {
    config: Config,
    content_dir: PathBuf,
    output_dir: PathBuf,
    static_dir: Option<PathBuf>,
}

impl Builder {
    #[must_use]
    pub fn new(
        config: Config,
        content_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config,
            content_dir: content_dir.into(),
            output_dir: output_dir.into(),
            static_dir: None,
        }
    }

    /// Set the static assets directory.
    #[must_use]
    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Execute the full build process.
    pub fn build(&self) -> Result<BuildStats> {
        let start = Instant::now();
        let mut stats = BuildStats::default();

        info!(
            content = %self.content_dir.display(),
            output = %self.output_dir.display(),
            drafts = self.config.build.drafts,
            "starting build"
        );

        self.clean_output()?;

        let content = ContentCollector::new(&self.config, &self.content_dir).collect()?;
        let generator = HtmlGenerator::new(&self.config);

        let posts: Vec<_> = content.posts.values().collect();
        stats.posts = self.write_all(&posts, |post| generator.generate_post(post))?;

        let pages: Vec<_> = content.pages.values().collect();
        stats.pages = self.write_all(&pages, |page| generator.generate_page(page))?;

        stats.index_pages = self.generate_index_pages(&generator, &content)?;

        if self.config.rss.enabled {
            self.generate_rss(&content)?;
        }

        if let Some(static_dir) = &self.static_dir {
            stats.assets = copy_static(static_dir, &self.output_dir)?.len();
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            posts = stats.posts,
            pages = stats.pages,
            index_pages = stats.index_pages,
            assets = stats.assets,
            duration_ms = stats.duration_ms,
            "build complete"
        );

        Ok(stats)
    }

    fn clean_output(&self) -> Result<()> {
        if self.output_dir.exists() {
            debug!(dir = %self.output_dir.display(), "cleaning output directory");
            fs::remove_dir_all(&self.output_dir)?;
        }
        fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }

    /// Render and write items in parallel. Failures are logged and not counted.
    fn write_all<F>(&self, items: &[&Post], render: F) -> Result<usize>
    where
        F: Fn(&Post) -> std::result::Result<String, HtmlError> + Sync,
    {
        let results: Vec<_> = items
            .par_iter()
            .map(|post| {
                let html = render(post)?;
                self.write_page(&post.url, &html)
            })
            .collect();

        let mut count = 0;
        for (post, result) in items.iter().zip(results) {
            match result {
                Ok(()) => count += 1,
                Err(e) => warn!(url = %post.url, error = %e, "failed to generate page"),
            }
        }

        Ok(count)
    }

    fn write_page(&self, url: &str, html: &str) -> Result<()> {
        let path = output_path(url, &self.output_dir);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        if self.config.build.minify {
            fs::write(&path, minify_html(html))?;
        } else {
            fs::write(&path, html)?;
        }
        debug!(path = %path.display(), "wrote page");
        Ok(())
    }

    /// Home page, post listing, tag pages and the projects page.
    fn generate_index_pages(
        &self,
        generator: &HtmlGenerator<'_>,
        content: &SiteContent,
    ) -> Result<usize> {
        let per_page = self.config.build.paginate;
        let published = content.published_posts();
        let mut count = 0;

        self.write_page("/", &generator.generate_home(&published)?)?;
        count += 1;

        let chunks = paginate(&published, per_page);
        for (i, chunk) in chunks.iter().enumerate() {
            let html = generator.generate_posts_list(chunk, i + 1, chunks.len())?;
            self.write_page(&page_url("/posts", i + 1), &html)?;
            count += 1;
        }

        self.write_page("/tags", &generator.generate_tags_index(&content.tags)?)?;
        count += 1;

        for (slug, tag) in &content.tags {
            let tagged = content.posts_for_tag(slug);
            let base = format!("/tags/{slug}");
            let chunks = paginate(&tagged, per_page);
            for (i, chunk) in chunks.iter().enumerate() {
                let html = generator.generate_tag_page(tag, chunk, i + 1, chunks.len())?;
                self.write_page(&page_url(&base, i + 1), &html)?;
                count += 1;
            }
        }

        let projects = &self.config.project.projects;
        self.write_page("/projects", &generator.generate_projects(projects)?)?;
        count += 1;

        Ok(count)
    }

    fn generate_rss(&self, content: &SiteContent) -> Result<()> {
        let posts = content.published_posts();
        let feed_path = self.output_dir.join("rss.xml");
        let mut file = fs::File::create(&feed_path)?;
        RssGenerator::new(&self.config).write_to(&posts, &mut file)?;

        info!(path = %feed_path.display(), "generated RSS feed");
        Ok(())
    }

    /// Output directory this builder writes to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

/// Trim indentation and drop blank lines, leaving `<pre>` blocks verbatim.
fn minify_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_pre = false;

    for line in html.lines() {
        let was_pre = in_pre;
        in_pre = match (line.rfind("<pre"), line.rfind("</pre>")) {
            (Some(open), Some(close)) => open > close,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => in_pre,
        };

        let kept = if was_pre {
            line
        } else if in_pre {
            line.trim_start()
        } else {
            line.trim()
        };
        if !was_pre && kept.is_empty() {
            continue;
        }
        out.push_str(kept);
        out.push('\n');
    }

    out
}
