//! Post sources, their URLs, and the processed [`Post`] model.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::frontmatter::Frontmatter;

/// Words per minute used for reading time.
const WORDS_PER_MINUTE: u32 = 200;

/// Characters kept in a generated summary.
const SUMMARY_CHARS: usize = 160;

/// Source format of a post, picked by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// `.md` or `.markdown`.
    Markdown,
    /// MDX content (.mdx files): Markdown with ESM statements and JSX tags.
    Mdx,
}

impl ContentType {
    /// Case-insensitive extension lookup.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "md" | "markdown" => Some(Self::Markdown),
            "mdx" => Some(Self::Mdx),
            _ => None,
        }
    }

    /// Extension used when creating new files.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Mdx => "mdx",
        }
    }
}

/// Content file path with its URL slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPath {
    /// Path relative to the content directory.
    pub path: PathBuf,

    /// URL slug derived from the path.
    pub slug: String,

    /// Content type based on extension.
    pub content_type: ContentType,
}

impl ContentPath {
    /// Parse a content path relative to the content directory.
    ///
    /// - `posts/hello.md` → slug `posts/hello`
    /// - `posts/hello/index.mdx` → slug `posts/hello`
    /// - `index.md` → slug `` (site root)
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        let content_type = ContentType::from_extension(extension)?;
        let stem = path.file_stem()?.to_str()?;

        let parent = path.parent().unwrap_or(Path::new(""));
        let parent = parent
            .components()
            .filter_map(|c| c.as_os_str().to_str())
            .collect::<Vec<_>>()
            .join("/");

        let slug = if stem == "index" {
            parent
        } else if parent.is_empty() {
            stem.to_string()
        } else {
            format!("{parent}/{stem}")
        };

        Some(Self {
            path: path.to_path_buf(),
            slug: slug.trim_matches('/').to_string(),
            content_type,
        })
    }

    /// Site-relative URL, always starting with `/`.
    pub fn url_path(&self) -> String {
        format!("/{}", self.slug)
    }

    /// First path segment, e.g. `posts` for `posts/hello`.
    pub fn section(&self) -> Option<&str> {
        self.slug.split_once('/').map(|(section, _)| section)
    }
}

/// Output of a content parser.
#[derive(Debug, Clone)]
pub struct ParsedContent {
    pub frontmatter: Frontmatter,
    pub html: String,

    /// Body source after the front-matter block.
    pub raw: String,

    pub toc: Vec<TocEntry>,
}

/// A heading collected while rendering, linkable through `#id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    pub level: u8,
    pub text: String,
    pub id: String,
}

/// A fully processed post ready for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// URL path for this post.
    pub url: String,

    /// Post title.
    pub title: String,

    /// Summary for listings.
    #[serde(default)]
    pub summary: Option<String>,

    /// Publication date.
    #[serde(default)]
    pub date: Option<NaiveDate>,

    /// Tags in authored order.
    #[serde(default)]
    pub tags: Vec<String>,

    /// `draft: true` in the front-matter.
    #[serde(default)]
    pub draft: bool,

    /// Body HTML, without the layout.
    pub content: String,

    /// Whole minutes at 200 words per minute, never below one.
    #[serde(default)]
    pub reading_time: u32,

    #[serde(default)]
    pub word_count: u32,

    #[serde(default)]
    pub toc: Vec<TocEntry>,

    /// Source path relative to the content directory.
    #[serde(default)]
    pub source_path: Option<PathBuf>,
}

impl Post {
    /// Create a post from parsed content and its path.
    pub fn from_parsed(content: ParsedContent, content_path: &ContentPath) -> Self {
        let fm = content.frontmatter;

        let word_count = content.raw.split_whitespace().count() as u32;
        let reading_time = (word_count / WORDS_PER_MINUTE).max(1);

        let summary = fm
            .summary
            .filter(|s| !s.trim().is_empty())
            .or_else(|| summarize(&content.html, SUMMARY_CHARS));

        Self {
            url: content_path.url_path(),
            title: fm.title,
            summary,
            date: fm.date,
            tags: fm.tags,
            draft: fm.draft,
            content: content.html,
            reading_time,
            word_count,
            toc: content.toc,
            source_path: Some(content_path.path.clone()),
        }
    }

    /// Whether the post appears in public listings.
    pub fn is_published(&self) -> bool {
        !self.draft
    }

    /// URL slug without the leading slash.
    pub fn slug(&self) -> &str {
        self.url.trim_start_matches('/')
    }
}

/// Keep only posts that belong in public listings.
pub fn published<'a, I>(posts: I) -> impl Iterator<Item = &'a Post>
where
    I: IntoIterator<Item = &'a Post>,
{
    posts.into_iter().filter(|post| post.is_published())
}

/// Escapes produced by the Markdown renderer, `&amp;` last so it is not
/// decoded twice.
const ENTITIES: [(&str, &str); 6] = [
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#x27;", "'"),
    ("&#39;", "'"),
    ("&amp;", "&"),
];

/// Plain text of an HTML fragment, with the basic entities decoded.
pub fn strip_html(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(open) = rest.find('<') {
        text.push_str(&rest[..open]);
        rest = match rest[open..].find('>') {
            Some(close) => &rest[open + close + 1..],
            None => "",
        };
    }
    text.push_str(rest);

    if !text.contains('&') {
        return text;
    }
    ENTITIES
        .iter()
        .fold(text, |acc, (entity, plain)| acc.replace(entity, plain))
}

/// Whole words of `html`'s text up to `max_chars` characters, with `...`
/// appended when cut short. `None` when there is no text at all.
fn summarize(html: &str, max_chars: usize) -> Option<String> {
    let text = strip_html(html);
    let mut summary = String::new();
    let mut len = 0;

    for word in text.split_whitespace() {
        let sep = usize::from(!summary.is_empty());
        let word_len = word.chars().count();

        if len + sep + word_len > max_chars {
            if summary.is_empty() {
                summary.extend(word.chars().take(max_chars));
            }
            summary.push_str("...");
            return Some(summary);
        }

        if sep == 1 {
            summary.push(' ');
        }
        summary.push_str(word);
        len += sep + word_len;
    }

    (!summary.is_empty()).then_some(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(fm: Frontmatter, html: &str, raw: &str) -> ParsedContent {
        ParsedContent {
            frontmatter: fm,
            html: html.to_string(),
            raw: raw.to_string(),
            toc: vec![],
        }
    }

    #[test]
    fn test_content_type_from_extension() {
        assert_eq!(
            ContentType::from_extension("md"),
            Some(ContentType::Markdown)
        );
        assert_eq!(
            ContentType::from_extension("MD"),
            Some(ContentType::Markdown)
        );
        assert_eq!(ContentType::from_extension("mdx"), Some(ContentType::Mdx));
        assert_eq!(ContentType::from_extension("txt"), None);
    }

    #[test]
    fn test_content_path_simple() {
        let cp = ContentPath::from_path(Path::new("posts/hello.md")).expect("parse path");

        assert_eq!(cp.slug, "posts/hello");
        assert_eq!(cp.content_type, ContentType::Markdown);
        assert_eq!(cp.url_path(), "/posts/hello");
        assert_eq!(cp.section(), Some("posts"));
    }

    #[test]
    fn test_content_path_index_file() {
        let cp = ContentPath::from_path(Path::new("posts/hello/index.mdx")).expect("parse path");

        assert_eq!(cp.slug, "posts/hello");
        assert_eq!(cp.content_type, ContentType::Mdx);
    }

    #[test]
    fn test_content_path_root_index() {
        let cp = ContentPath::from_path(Path::new("index.md")).expect("parse path");
        assert_eq!(cp.slug, "");
        assert_eq!(cp.url_path(), "/");
        assert_eq!(cp.section(), None);
    }

    #[test]
    fn test_content_path_rejects_other_extensions() {
        assert!(ContentPath::from_path(Path::new("posts/notes.txt")).is_none());
        assert!(ContentPath::from_path(Path::new("posts/README")).is_none());
    }

    #[test]
    fn test_post_from_parsed_uses_frontmatter_summary() {
        let fm = Frontmatter {
            title: "Hello".to_string(),
            summary: Some("Custom summary".to_string()),
            date: NaiveDate::from_ymd_opt(2024, 2, 1),
            tags: vec!["rust".to_string()],
            ..Default::default()
        };
        let cp = ContentPath::from_path(Path::new("posts/hello.md")).expect("path");
        let post = Post::from_parsed(parsed(fm, "<p>Body text</p>", "Body text"), &cp);

        assert_eq!(post.url, "/posts/hello");
        assert_eq!(post.slug(), "posts/hello");
        assert_eq!(post.summary.as_deref(), Some("Custom summary"));
        assert_eq!(post.word_count, 2);
        assert_eq!(post.reading_time, 1);
        assert!(post.is_published());
    }

    #[test]
    fn test_post_summary_falls_back_to_body() {
        let fm = Frontmatter {
            title: "Hello".to_string(),
            ..Default::default()
        };
        let cp = ContentPath::from_path(Path::new("hello.md")).expect("path");
        let post = Post::from_parsed(
            parsed(fm, "<h1>Intro</h1>\n<p>First <em>words</em></p>", "# Intro"),
            &cp,
        );

        assert_eq!(post.summary.as_deref(), Some("Intro First words"));
    }

    #[test]
    fn test_reading_time() {
        let fm = Frontmatter {
            title: "Long".to_string(),
            ..Default::default()
        };
        let raw = "word ".repeat(1000);
        let cp = ContentPath::from_path(Path::new("long.md")).expect("path");
        let post = Post::from_parsed(parsed(fm, "<p>x</p>", &raw), &cp);
        assert_eq!(post.word_count, 1000);
        assert_eq!(post.reading_time, 5);
    }

    #[test]
    fn test_drafts_excluded_from_published() {
        let cp = ContentPath::from_path(Path::new("a.md")).expect("path");
        let make = |title: &str, draft: bool| {
            let fm = Frontmatter {
                title: title.to_string(),
                draft,
                ..Default::default()
            };
            Post::from_parsed(parsed(fm, "", ""), &cp)
        };
        let posts = vec![make("live", false), make("wip", true), make("also live", false)];

        let titles: Vec<_> = published(&posts).map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["live", "also live"]);
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<p>A <a href=\"/x\">link</a>.</p>"), "A link.");
        assert_eq!(strip_html("plain"), "plain");
        assert_eq!(strip_html("cut <span"), "cut ");
    }

    #[test]
    fn test_strip_html_decodes_entities() {
        assert_eq!(
            strip_html("<p>Tom &amp; Jerry &lt;3 &quot;cheese&quot; &#x27;n&#39; more</p>"),
            "Tom & Jerry <3 \"cheese\" 'n' more"
        );
        assert_eq!(strip_html("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_summary_fallback_is_plain_text() {
        let fm = Frontmatter {
            title: "Cartoons".to_string(),
            ..Default::default()
        };
        let cp = ContentPath::from_path(Path::new("posts/cartoons.md")).expect("path");
        let post = Post::from_parsed(parsed(fm, "<p>Tom &amp; Jerry &lt;3</p>", "Tom & Jerry <3"), &cp);

        assert_eq!(post.summary.as_deref(), Some("Tom & Jerry <3"));
    }

    #[test]
    fn test_summarize_keeps_whole_words() {
        let html = "<p>Hello world this is a test</p>";
        assert_eq!(summarize(html, 100).as_deref(), Some("Hello world this is a test"));
        assert_eq!(summarize(html, 11).as_deref(), Some("Hello world..."));
        assert_eq!(summarize(html, 10).as_deref(), Some("Hello..."));
        assert_eq!(summarize("<p>Supercalifragilistic</p>", 5).as_deref(), Some("Super..."));
        assert_eq!(summarize("<p>你好世界 Hello</p>", 7).as_deref(), Some("你好世界..."));
        assert_eq!(summarize("<hr>", 10), None);
    }
}
