//! HTML page generation.
//!
//! Each `generate_*` method renders an inner template and hands the result to
//! the [`Layout`] shell.

use std::path::{Path, PathBuf};

use folio_core::{Config, Post, Project};
use folio_parser::escape::escape_html;
use thiserror::Error;
use tracing::debug;

use crate::{
    collector::TagEntry,
    components::{post_meta_html, project_card_html, social_icons_html, tag_url},
    layout::Layout,
    template::{TemplateContext, TemplateError, TemplateRegistry},
};

/// HTML generation errors.
#[derive(Debug, Error)]
pub enum HtmlError {
    /// Template error.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for HTML generation.
pub type Result<T> = std::result::Result<T, HtmlError>;

/// HTML page generator.
#[derive(Debug)]
pub struct HtmlGenerator<'a> {
    config: &'a Config,
    templates: TemplateRegistry,
    year: Option<i32>,
}

impl<'a> HtmlGenerator<'a> {
    #[must_use]
    pub fn new(config: &'a Config) -> Self {
        Self::with_templates(config, TemplateRegistry::new())
    }

    #[must_use]
    pub fn with_templates(config: &'a Config, templates: TemplateRegistry) -> Self {
        Self {
            config,
            templates,
            year: None,
        }
    }

    /// Pin the footer year instead of using the current one.
    #[must_use]
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    fn layout(&self) -> Layout<'_> {
        let layout = Layout::new(self.config, &self.templates);
        match self.year {
            Some(year) => layout.with_year(year),
            None => layout,
        }
    }

    fn wrap(&self, title: Option<&str>, path: &str, inner: &str) -> Result<String> {
        Ok(self.layout().render(title, path, inner)?)
    }

    /// Full page for a blog post.
    pub fn generate_post(&self, post: &Post) -> Result<String> {
        debug!(url = %post.url, "generating post");

        let ctx = TemplateContext::new()
            .with_var("title", escape_html(&post.title))
            .with_var("meta", post_meta_html(post))
            .with_var("content", &post.content);
        let inner = self.templates.render("post", &ctx)?;

        self.wrap(Some(&post.title), &post.url, &inner)
    }

    /// Full page for standalone content such as `/about`.
    pub fn generate_page(&self, page: &Post) -> Result<String> {
        debug!(url = %page.url, "generating page");

        let ctx = TemplateContext::new()
            .with_var("title", escape_html(&page.title))
            .with_var("meta", "")
            .with_var("content", &page.content);
        let inner = self.templates.render("post", &ctx)?;

        self.wrap(Some(&page.title), &page.url, &inner)
    }

    /// Home page with the site intro, social links and the most recent posts.
    pub fn generate_home(&self, posts: &[&Post]) -> Result<String> {
        let recent = &posts[..posts.len().min(self.config.home.recent_posts)];

        let ctx = TemplateContext::new()
            .with_var("site_title", escape_html(&self.config.site.title))
            .with_opt(
                "description",
                self.config.site.description.as_deref().map(escape_html),
            )
            .with_opt("socials", Some(social_icons_html(&self.config.home.socials)))
            .with_var("items", list_html(recent));
        let inner = self.templates.render("home", &ctx)?;

        self.wrap(None, "/", &inner)
    }

    /// One page of the post listing.
    pub fn generate_posts_list(
        &self,
        posts: &[&Post],
        current: usize,
        total: usize,
    ) -> Result<String> {
        let ctx = TemplateContext::new()
            .with_var("title", "Posts")
            .with_var("items", list_html(posts))
            .with_opt("pagination", pagination_html(current, total, "/posts"));
        let inner = self.templates.render("list", &ctx)?;

        self.wrap(Some("Posts"), &page_url("/posts", current), &inner)
    }

    /// Index of every tag with its post count, alphabetical by slug.
    pub fn generate_tags_index<'t>(
        &self,
        tags: impl IntoIterator<Item = (&'t String, &'t TagEntry)>,
    ) -> Result<String> {
        let items = tags
            .into_iter()
            .map(|(_, entry)| {
                format!(
                    r#"<li><a href="{}" rel="tag">{} <span class="count">({})</span></a></li>"#,
                    tag_url(&entry.name),
                    escape_html(&entry.name),
                    entry.posts.len()
                )
            })
            .collect::<String>();

        let ctx = TemplateContext::new().with_var("items", items);
        let inner = self.templates.render("tags_index", &ctx)?;

        self.wrap(Some("Tags"), "/tags", &inner)
    }

    /// One page of the posts carrying a tag.
    pub fn generate_tag_page(
        &self,
        tag: &TagEntry,
        posts: &[&Post],
        current: usize,
        total: usize,
    ) -> Result<String> {
        let base = tag_url(&tag.name);
        let base = base.trim_end_matches('/');

        let ctx = TemplateContext::new()
            .with_var("term", escape_html(&tag.name))
            .with_var("items", list_html(posts))
            .with_opt("pagination", pagination_html(current, total, base));
        let inner = self.templates.render("taxonomy", &ctx)?;

        let title = format!("Tagged: {}", tag.name);
        self.wrap(Some(&title), &page_url(base, current), &inner)
    }

    /// Projects page, one card per configured project.
    pub fn generate_projects(&self, projects: &[Project]) -> Result<String> {
        let cards = if projects.is_empty() {
            "<p>No projects yet.</p>".to_string()
        } else {
            projects.iter().map(project_card_html).collect::<String>()
        };

        let ctx = TemplateContext::new()
            .with_var("title", "Projects")
            .with_var("cards", cards);
        let inner = self.templates.render("projects", &ctx)?;

        self.wrap(Some("Projects"), "/projects", &inner)
    }
}

/// File that serves `url`: `<output_dir>/<url>/index.html`.
#[must_use]
pub fn output_path(url: &str, output_dir: &Path) -> PathBuf {
    let relative = url.trim_matches('/');

    if relative.is_empty() {
        output_dir.join("index.html")
    } else {
        output_dir.join(relative).join("index.html")
    }
}

/// URL of page `current` of a paginated listing rooted at `base`.
pub fn page_url(base: &str, current: usize) -> String {
    if current <= 1 {
        base.to_string()
    } else {
        format!("{base}/page/{current}")
    }
}

/// `<ul>` of post list items, or a placeholder when there are none.
pub fn list_html(posts: &[&Post]) -> String {
    if posts.is_empty() {
        return r#"<p class="empty">Nothing published yet.</p>"#.to_string();
    }
    let items = posts.iter().map(|post| list_item_html(post)).collect::<String>();
    format!(r#"<ul class="post-list">{items}</ul>"#)
}

/// A single entry of a post listing.
pub fn list_item_html(post: &Post) -> String {
    let date_html = post
        .date
        .map(|d| {
            format!(
                r#"<time datetime="{}">{}</time>"#,
                d.format("%Y-%m-%d"),
                d.format("%b %-d, %Y")
            )
        })
        .unwrap_or_default();

    let summary_html = post
        .summary
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|s| format!("<p>{}</p>", escape_html(s)))
        .unwrap_or_default();

    format!(
        r#"<li>{date_html}<a href="{}">{}</a>{summary_html}</li>"#,
        escape_html(&post.url),
        escape_html(&post.title),
    )
}

/// Previous/next navigation, `None` for a single page.
pub fn pagination_html(current: usize, total: usize, base_url: &str) -> Option<String> {
    if total <= 1 {
        return None;
    }

    let prev = if current > 1 {
        format!(
            r#"<a href="{}" rel="prev">&larr; Newer</a>"#,
            page_url(base_url, current - 1)
        )
    } else {
        "<span></span>".to_string()
    };
    let next = if current < total {
        format!(
            r#"<a href="{}" rel="next">Older &rarr;</a>"#,
            page_url(base_url, current + 1)
        )
    } else {
        "<span></span>".to_string()
    };

    Some(format!(
        r#"<nav class="pagination">{prev}<span>Page {current} of {total}</span>{next}</nav>"#
    ))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;

    use super::*;

    fn test_config() -> Config {
        Config::from_toml_str(
            r#"
[site]
title = "Test Site"
description = "A test site"
author = "Test Author"
base_url = "https://example.com"

[[header.routes]]
name = "Posts"
path = "/posts"

[home]
recent_posts = 2

[home.socials]
github = "https://github.com/tester"
"#,
        )
        .expect("config")
    }

    fn test_post(title: &str, day: u32) -> Post {
        Post {
            url: format!("/posts/{}", title.to_lowercase()),
            title: title.to_string(),
            summary: Some(format!("About {title}")),
            date: NaiveDate::from_ymd_opt(2024, 5, day),
            tags: vec!["rust".to_string()],
            draft: false,
            content: "<p>Hello, World!</p>".to_string(),
            reading_time: 1,
            word_count: 2,
            toc: vec![],
            source_path: Some(PathBuf::from("posts/test.md")),
        }
    }

    #[test]
    fn test_generate_post() {
        let config = test_config();
        let generator = HtmlGenerator::new(&config).with_year(2024);

        let html = generator.generate_post(&test_post("Hello", 1)).unwrap();

        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("<title>Hello | Test Site</title>"));
        assert!(html.contains("<p>Hello, World!</p>"));
        assert!(html.contains(r#"class="post-meta""#));
        assert!(html.contains(r#"<a href="/posts" aria-current="page">Posts</a>"#));
    }

    #[test]
    fn test_generate_page_has_no_meta() {
        let config = test_config();
        let generator = HtmlGenerator::new(&config);
        let mut page = test_post("About", 1);
        page.url = "/about".to_string();

        let html = generator.generate_page(&page).unwrap();
        assert!(html.contains("<h1>About</h1>"));
        assert!(!html.contains(r#"class="post-meta""#));
    }

    #[test]
    fn test_generate_home_limits_recent_posts() {
        let config = test_config();
        let generator = HtmlGenerator::new(&config);
        let posts = [test_post("C", 3), test_post("B", 2), test_post("A", 1)];
        let refs: Vec<_> = posts.iter().collect();

        let html = generator.generate_home(&refs).unwrap();

        assert!(html.contains(r#"href="/posts/c""#));
        assert!(html.contains(r#"href="/posts/b""#));
        assert!(!html.contains(r#"href="/posts/a""#));
        assert!(html.contains(r#"href="https://github.com/tester""#));
        assert!(html.contains("A test site"));
    }

    #[test]
    fn test_generate_tags_index() {
        let config = test_config();
        let generator = HtmlGenerator::new(&config);
        let mut tags = BTreeMap::new();
        tags.insert(
            "rust-lang".to_string(),
            TagEntry {
                name: "Rust Lang".to_string(),
                posts: vec!["/posts/a".to_string(), "/posts/b".to_string()],
            },
        );

        let html = generator.generate_tags_index(&tags).unwrap();
        assert!(html.contains(r#"<a href="/tags/rust-lang/" rel="tag">Rust Lang <span class="count">(2)</span></a>"#));
    }

    #[test]
    fn test_generate_tag_page_pagination() {
        let config = test_config();
        let generator = HtmlGenerator::new(&config);
        let tag = TagEntry {
            name: "rust".to_string(),
            posts: vec![],
        };
        let post = test_post("A", 1);

        let html = generator.generate_tag_page(&tag, &[&post], 2, 3).unwrap();
        assert!(html.contains("Tagged: <span>rust</span>"));
        assert!(html.contains(r#"<a href="/tags/rust" rel="prev">"#));
        assert!(html.contains(r#"<a href="/tags/rust/page/3" rel="next">"#));
    }

    #[test]
    fn test_generate_projects() {
        let config = test_config();
        let generator = HtmlGenerator::new(&config);
        let projects = vec![Project {
            name: "Folio".to_string(),
            description: "Blog engine".to_string(),
            href: None,
            repo_link: None,
            status: Some("filed".to_string()),
        }];

        let html = generator.generate_projects(&projects).unwrap();
        assert!(html.contains(r#"<span class="badge badge-outline">FILED</span>"#));

        let empty = generator.generate_projects(&[]).unwrap();
        assert!(empty.contains("No projects yet."));
    }

    #[test]
    fn test_list_item_html() {
        let html = list_item_html(&test_post("Hello", 9));

        assert!(html.contains(r#"<time datetime="2024-05-09">May 9, 2024</time>"#));
        assert!(html.contains(r#"<a href="/posts/hello">Hello</a>"#));
        assert!(html.contains("<p>About Hello</p>"));
    }

    #[test]
    fn test_list_item_summary_escaped_once() {
        let registry = folio_parser::ParserRegistry::new();
        let path = Path::new("posts/cartoons.md");
        let parsed = registry
            .parse("---\ntitle: Cartoons\n---\n\nTom & Jerry <3\n", path)
            .unwrap();
        let content_path = folio_core::ContentPath::from_path(path).unwrap();
        let post = Post::from_parsed(parsed, &content_path);

        let html = list_item_html(&post);
        assert!(html.contains("<p>Tom &amp; Jerry &lt;3</p>"), "{html}");
    }

    #[test]
    fn test_list_html_empty() {
        assert!(list_html(&[]).contains("Nothing published yet."));
    }

    #[test]
    fn test_pagination_html() {
        assert!(pagination_html(1, 1, "/posts").is_none());

        let html = pagination_html(1, 3, "/posts").unwrap();
        assert!(html.contains("Page 1 of 3"));
        assert!(html.contains(r#"href="/posts/page/2""#));
        assert!(!html.contains("rel=\"prev\""));

        let html = pagination_html(2, 3, "/posts").unwrap();
        assert!(html.contains(r#"<a href="/posts" rel="prev">"#));

        let html = pagination_html(3, 3, "/posts").unwrap();
        assert!(!html.contains("rel=\"next\""));
    }

    #[test]
    fn test_output_path() {
        let output_dir = Path::new("public");

        assert_eq!(
            output_path("/posts/hello", output_dir),
            PathBuf::from("public/posts/hello/index.html")
        );
        assert_eq!(
            output_path("/tags/rust/", output_dir),
            PathBuf::from("public/tags/rust/index.html")
        );
        assert_eq!(
            output_path("/", output_dir),
            PathBuf::from("public/index.html")
        );
    }
}
