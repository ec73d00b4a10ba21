//! RSS 2.0 feed of published posts.

use std::io::Write;

use chrono::{NaiveTime, Utc};
use folio_core::{Config, Post};
use rss::{Category, ChannelBuilder, GuidBuilder, Item, ItemBuilder};
use thiserror::Error;
use tracing::debug;

/// RSS generation errors.
#[derive(Debug, Error)]
pub enum RssError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for RSS operations.
pub type Result<T> = std::result::Result<T, RssError>;

/// RSS feed generator.
#[derive(Debug)]
pub struct RssGenerator<'a> {
    config: &'a Config,
}

impl<'a> RssGenerator<'a> {
    #[must_use]
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Feed XML for `posts`, which must already be sorted newest first.
    ///
    /// Drafts and undated posts are left out; at most `rss.limit` items are kept.
    pub fn generate(&self, posts: &[&Post]) -> String {
        let limit = self.config.rss.limit;
        let items: Vec<Item> = posts
            .iter()
            .filter(|post| post.is_published() && post.date.is_some())
            .take(limit)
            .map(|post| self.post_to_item(post))
            .collect();

        debug!(count = items.len(), limit, "generating RSS feed");

        let site = &self.config.site;
        let channel = ChannelBuilder::default()
            .title(site.title.clone())
            .link(site.base_url.clone())
            .description(site.description.clone().unwrap_or_else(|| site.title.clone()))
            .language(Some(site.language.clone()))
            .last_build_date(Some(Utc::now().to_rfc2822()))
            .items(items)
            .build();

        channel.to_string()
    }

    fn post_to_item(&self, post: &Post) -> Item {
        let url = self.config.url_for(&post.url);
        let guid = GuidBuilder::default().value(url.clone()).permalink(true).build();

        let mut builder = ItemBuilder::default();
        builder.title(Some(post.title.clone()));
        builder.link(Some(url));
        builder.guid(Some(guid));
        builder.author(Some(self.config.site.author.clone()));

        if let Some(date) = post.date {
            let published = date.and_time(NaiveTime::MIN).and_utc();
            builder.pub_date(Some(published.to_rfc2822()));
        }

        if let Some(summary) = &post.summary {
            builder.description(Some(summary.clone()));
        }

        let categories: Vec<_> = post
            .tags
            .iter()
            .map(|tag| Category {
                name: tag.clone(),
                domain: None,
            })
            .collect();
        if !categories.is_empty() {
            builder.categories(categories);
        }

        builder.build()
    }

    /// Write the feed to a writer.
    pub fn write_to<W: Write>(&self, posts: &[&Post], writer: &mut W) -> Result<()> {
        writer.write_all(self.generate(posts).as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn test_config(limit: usize) -> Config {
        Config::from_toml_str(&format!(
            r#"
[site]
title = "Test Blog"
description = "A test blog"
author = "Test Author"
base_url = "https://example.com"

[rss]
limit = {limit}
"#
        ))
        .expect("config")
    }

    fn test_post(title: &str, date: Option<NaiveDate>, draft: bool) -> Post {
        Post {
            url: format!("/posts/{}", title.to_lowercase().replace(' ', "-")),
            title: title.to_string(),
            summary: Some(format!("Summary for {title}")),
            date,
            tags: vec!["rust".to_string(), "web".to_string()],
            draft,
            content: String::new(),
            reading_time: 1,
            word_count: 0,
            toc: vec![],
            source_path: None,
        }
    }

    #[test]
    fn test_generate_rss() {
        let config = test_config(20);
        let generator = RssGenerator::new(&config);
        let first = test_post("First Post", NaiveDate::from_ymd_opt(2024, 2, 1), false);
        let second = test_post("Second Post", NaiveDate::from_ymd_opt(2024, 1, 1), false);

        let xml = generator.generate(&[&first, &second]);

        assert!(xml.contains("<title>Test Blog</title>"));
        assert!(xml.contains("<link>https://example.com</link>"));
        assert!(xml.contains("<link>https://example.com/posts/first-post</link>"));
        assert!(xml.contains("Second Post"));
        assert!(xml.contains("<category>rust</category>"));
        assert!(xml.contains("Feb 2024 00:00:00 +0000"));
    }

    #[test]
    fn test_rss_skips_drafts_and_undated() {
        let config = test_config(20);
        let generator = RssGenerator::new(&config);
        let draft = test_post("Draft Post", NaiveDate::from_ymd_opt(2024, 2, 1), true);
        let undated = test_post("Undated Post", None, false);
        let live = test_post("Live Post", NaiveDate::from_ymd_opt(2024, 1, 1), false);

        let xml = generator.generate(&[&draft, &undated, &live]);

        assert!(!xml.contains("Draft Post"));
        assert!(!xml.contains("Undated Post"));
        assert!(xml.contains("Live Post"));
    }

    #[test]
    fn test_rss_limit() {
        let config = test_config(1);
        let generator = RssGenerator::new(&config);
        let first = test_post("First Post", NaiveDate::from_ymd_opt(2024, 2, 1), false);
        let second = test_post("Second Post", NaiveDate::from_ymd_opt(2024, 1, 1), false);

        let xml = generator.generate(&[&first, &second]);

        assert!(xml.contains("First Post"));
        assert!(!xml.contains("Second Post"));
    }
}
