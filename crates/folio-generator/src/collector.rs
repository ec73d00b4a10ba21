//! Content collection and organization.
//!
//! Walks the content directory, parses every Markdown/MDX file and splits the
//! result into blog posts (`posts/...`) and standalone pages (everything else).

use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
};

use folio_core::{Config, ContentPath, ContentType, Post, content::published};
use folio_parser::{ParserRegistry, markdown::slugify};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Section holding blog posts.
pub const POSTS_SECTION: &str = "posts";

/// URLs the builder generates itself; content may not claim them.
const RESERVED_URLS: &[&str] = &["/posts", "/tags", "/projects", "/rss.xml"];

fn is_reserved_url(url: &str) -> bool {
    RESERVED_URLS.contains(&url) || url.starts_with("/tags/") || url.starts_with("/posts/page/")
}

/// Content collection errors.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parser error.
    #[error("parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Front-matter is missing required fields.
    #[error("invalid front-matter in {path}: {message}")]
    Invalid { path: PathBuf, message: String },

    /// Invalid content path.
    #[error("invalid content path: {0}")]
    InvalidPath(PathBuf),
}

/// Result type for collector operations.
pub type Result<T> = std::result::Result<T, CollectorError>;

/// A tag and the published posts carrying it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagEntry {
    /// Tag as first written by an author.
    pub name: String,

    /// Post URLs.
    pub posts: Vec<String>,
}

/// Collected site content.
#[derive(Debug, Default)]
pub struct SiteContent {
    /// Blog posts keyed by URL, drafts included only when configured.
    pub posts: HashMap<String, Post>,

    /// Standalone pages keyed by URL (e.g. `/about`).
    pub pages: HashMap<String, Post>,

    /// Tag slug to published posts.
    pub tags: BTreeMap<String, TagEntry>,
}

impl SiteContent {
    /// Published posts, newest first.
    pub fn published_posts(&self) -> Vec<&Post> {
        posts_by_date(published(self.posts.values()))
    }

    /// Published posts carrying a tag slug, newest first.
    pub fn posts_for_tag(&self, slug: &str) -> Vec<&Post> {
        let Some(entry) = self.tags.get(slug) else {
            return Vec::new();
        };
        posts_by_date(entry.posts.iter().filter_map(|url| self.posts.get(url)))
    }
}

/// Content collector that walks directories and parses files.
#[derive(Debug)]
pub struct ContentCollector<'a> {
    config: &'a Config,
    parser: ParserRegistry,
    content_dir: PathBuf,
}

impl<'a> ContentCollector<'a> {
    pub fn new(config: &'a Config, content_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            parser: ParserRegistry::with_theme(&config.build.syntax_theme),
            content_dir: content_dir.into(),
        }
    }

    /// Collect all content from the content directory.
    ///
    /// Files that fail to parse are logged and skipped.
    pub fn collect(&self) -> Result<SiteContent> {
        info!(dir = %self.content_dir.display(), "collecting content");

        let files = self.find_content_files()?;
        info!(count = files.len(), "found content files");

        let parsed: Vec<(ContentPath, Post)> = files
            .par_iter()
            .filter_map(|path| match self.parse_file(path) {
                Ok((content_path, post)) => {
                    if post.draft && !self.config.build.drafts {
                        debug!(url = %post.url, "skipping draft");
                        None
                    } else {
                        Some((content_path, post))
                    }
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to parse file");
                    None
                }
            })
            .collect();

        let mut content = SiteContent::default();

        for (content_path, post) in parsed {
            if content_path.slug.is_empty() {
                warn!(
                    path = %content_path.path.display(),
                    "content at the site root would replace the home page, skipping"
                );
                continue;
            }
            if is_reserved_url(&post.url) {
                warn!(
                    path = %content_path.path.display(),
                    url = %post.url,
                    "content would replace a generated page, skipping"
                );
                continue;
            }

            if content_path.section() == Some(POSTS_SECTION) {
                if post.is_published() {
                    index_tags(&mut content.tags, &post);
                }
                content.posts.insert(post.url.clone(), post);
            } else {
                content.pages.insert(post.url.clone(), post);
            }
        }

        info!(
            posts = content.posts.len(),
            pages = content.pages.len(),
            tags = content.tags.len(),
            "content collection complete"
        );

        Ok(content)
    }

    fn find_content_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        walk_dir(&self.content_dir, &mut files)?;
        files.sort();
        Ok(files)
    }

    /// Parse a single file and check its front-matter.
    pub fn parse_file(&self, path: &Path) -> Result<(ContentPath, Post)> {
        debug!(path = %path.display(), "parsing file");

        let source = fs::read_to_string(path)?;

        let relative_path = path.strip_prefix(&self.content_dir).unwrap_or(path);
        let content_path = ContentPath::from_path(relative_path)
            .ok_or_else(|| CollectorError::InvalidPath(path.to_path_buf()))?;

        let parsed = self
            .parser
            .parse(&source, path)
            .map_err(|e| CollectorError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        parsed
            .frontmatter
            .validate(relative_path)
            .map_err(|e| CollectorError::Invalid {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let post = Post::from_parsed(parsed, &content_path);
        Ok((content_path, post))
    }
}

/// Recursively collect content files, skipping hidden directories.
fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    if !dir.exists() {
        return Ok(());
    }

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();

        if path.is_dir() {
            if path
                .file_name()
                .is_some_and(|n| n.to_string_lossy().starts_with('.'))
            {
                continue;
            }
            walk_dir(&path, files)?;
        } else if path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ContentType::from_extension(&ext.to_string_lossy()).is_some())
        {
            files.push(path);
        }
    }

    Ok(())
}

fn index_tags(tags: &mut BTreeMap<String, TagEntry>, post: &Post) {
    for tag in &post.tags {
        let slug = slugify(tag);
        if slug.is_empty() {
            continue;
        }
        let entry = tags.entry(slug).or_insert_with(|| TagEntry {
            name: tag.clone(),
            posts: Vec::new(),
        });
        if !entry.posts.contains(&post.url) {
            entry.posts.push(post.url.clone());
        }
    }
}

/// Sort posts newest first. Undated posts go last; ties are broken by title.
pub fn posts_by_date<'a>(posts: impl IntoIterator<Item = &'a Post>) -> Vec<&'a Post> {
    let mut posts: Vec<_> = posts.into_iter().collect();
    posts.sort_by(|a, b| {
        let by_date = match (&a.date, &b.date) {
            (Some(a_date), Some(b_date)) => b_date.cmp(a_date),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_date.then_with(|| a.title.cmp(&b.title))
    });
    posts
}

/// Split items into pages of `per_page`.
///
/// Always yields at least one (possibly empty) page so listings render.
pub fn paginate<T>(items: &[T], per_page: usize) -> Vec<&[T]> {
    if items.is_empty() {
        return vec![items];
    }
    items.chunks(per_page.max(1)).collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tempfile::TempDir;

    use super::*;

    fn test_config(drafts: bool) -> Config {
        Config::from_toml_str(&format!(
            r#"
[site]
title = "Test"
author = "Tester"
base_url = "https://example.com"

[build]
drafts = {drafts}
"#
        ))
        .expect("config")
    }

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn post(title: &str, date: Option<(i32, u32, u32)>) -> Post {
        Post {
            url: format!("/posts/{}", slugify(title)),
            title: title.to_string(),
            summary: None,
            date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            tags: vec![],
            draft: false,
            content: String::new(),
            reading_time: 1,
            word_count: 0,
            toc: vec![],
            source_path: None,
        }
    }

    fn sample_site() -> TempDir {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "posts/first.md",
            "---\ntitle: First\ndate: 2024-01-01\ntags: [Rust, web]\n---\nHello",
        );
        write(
            dir.path(),
            "posts/second/index.mdx",
            "---\ntitle: Second\ndate: 2024-02-01\ntags: [rust]\n---\nimport X from './x'\n\nWorld",
        );
        write(
            dir.path(),
            "posts/wip.md",
            "---\ntitle: WIP\ndraft: true\ntags: [secret]\n---\nSoon",
        );
        write(dir.path(), "about.md", "---\ntitle: About\n---\nMe");
        write(dir.path(), "posts/untitled.md", "---\ndate: 2024-01-01\n---\nNo title");
        write(dir.path(), "posts/notes.txt", "ignored");
        write(dir.path(), ".hidden/secret.md", "---\ntitle: Hidden\n---\n");
        dir
    }

    #[test]
    fn test_collect_posts_and_pages() {
        let dir = sample_site();
        let config = test_config(false);
        let content = ContentCollector::new(&config, dir.path()).collect().unwrap();

        let mut urls: Vec<_> = content.posts.keys().cloned().collect();
        urls.sort();
        assert_eq!(urls, vec!["/posts/first", "/posts/second"]);
        assert!(content.pages.contains_key("/about"));
        assert!(!content.posts.contains_key("/posts/untitled"));
    }

    #[test]
    fn test_tags_are_merged_by_slug() {
        let dir = sample_site();
        let config = test_config(false);
        let content = ContentCollector::new(&config, dir.path()).collect().unwrap();

        let rust = content.tags.get("rust").expect("rust tag");
        assert_eq!(rust.name, "Rust");
        assert_eq!(rust.posts.len(), 2);
        assert!(content.tags.contains_key("web"));
        assert!(!content.tags.contains_key("secret"));

        let titles: Vec<_> = content
            .posts_for_tag("rust")
            .iter()
            .map(|p| p.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Second", "First"]);
    }

    #[test]
    fn test_drafts_kept_but_not_listed_when_enabled() {
        let dir = sample_site();
        let config = test_config(true);
        let content = ContentCollector::new(&config, dir.path()).collect().unwrap();

        assert!(content.posts.contains_key("/posts/wip"));
        let titles: Vec<_> = content
            .published_posts()
            .iter()
            .map(|p| p.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Second", "First"]);
        assert!(!content.tags.contains_key("secret"));
    }

    #[test]
    fn test_generated_urls_are_not_overwritten() {
        let dir = sample_site();
        write(dir.path(), "posts/index.md", "---\ntitle: Listing\n---\nMine");
        write(dir.path(), "projects.md", "---\ntitle: Projects\n---\nMine");
        write(dir.path(), "tags/rust.md", "---\ntitle: Rust\n---\nMine");
        write(dir.path(), "posts/page/2.md", "---\ntitle: Two\n---\nMine");
        let config = test_config(false);
        let content = ContentCollector::new(&config, dir.path()).collect().unwrap();

        for url in ["/posts", "/projects", "/tags/rust", "/posts/page/2"] {
            assert!(!content.pages.contains_key(url), "{url}");
            assert!(!content.posts.contains_key(url), "{url}");
        }
        assert!(content.pages.contains_key("/about"));
        assert_eq!(content.posts.len(), 2);
    }

    #[test]
    fn test_reserved_urls() {
        for url in ["/posts", "/tags", "/tags/rust", "/projects", "/rss.xml", "/posts/page/3"] {
            assert!(is_reserved_url(url), "{url}");
        }
        for url in ["/", "/about", "/posts/hello", "/posts/paging", "/tagsoup"] {
            assert!(!is_reserved_url(url), "{url}");
        }
    }

    #[test]
    fn test_missing_content_dir_is_empty() {
        let config = test_config(false);
        let content = ContentCollector::new(&config, "/nonexistent/folio/content")
            .collect()
            .unwrap();
        assert!(content.posts.is_empty());
    }

    #[test]
    fn test_posts_by_date() {
        let posts = vec![
            post("Beta", Some((2024, 1, 1))),
            post("Undated", None),
            post("Alpha", Some((2024, 1, 1))),
            post("Newest", Some((2025, 6, 1))),
        ];

        let titles: Vec<_> = posts_by_date(&posts)
            .iter()
            .map(|p| p.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Newest", "Alpha", "Beta", "Undated"]);
    }

    #[test]
    fn test_paginate() {
        let items = [1, 2, 3, 4, 5];
        let pages = paginate(&items, 2);
        assert_eq!(pages, vec![&[1, 2][..], &[3, 4][..], &[5][..]]);

        let empty: [u8; 0] = [];
        assert_eq!(paginate(&empty, 10).len(), 1);
        assert_eq!(paginate(&items, 0).len(), 5);
    }
}
