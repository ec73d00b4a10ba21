//! Markdown parser using pulldown-cmark.

use std::{collections::HashMap, path::Path};

use folio_core::{
    content::{ParsedContent, TocEntry},
    frontmatter::parse_frontmatter,
};
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use thiserror::Error;

use crate::{escape::escape_html, syntax::SyntaxHighlighter};

/// Markdown parsing errors.
#[derive(Debug, Error)]
pub enum MarkdownError {
    /// Failed to parse front-matter.
    #[error("front-matter error: {0}")]
    Frontmatter(#[from] folio_core::error::CoreError),
}

/// Result type for markdown operations.
pub type Result<T> = std::result::Result<T, MarkdownError>;

/// Markdown parser with syntax highlighting support.
#[derive(Debug)]
pub struct MarkdownParser {
    highlighter: SyntaxHighlighter,
    options: Options,
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownParser {
    /// Create a new markdown parser with default options.
    pub fn new() -> Self {
        Self::with_highlighter(SyntaxHighlighter::default())
    }

    /// Create a parser with a custom syntax theme.
    pub fn with_theme(theme: &str) -> Self {
        Self::with_highlighter(SyntaxHighlighter::new(theme))
    }

    fn with_highlighter(highlighter: SyntaxHighlighter) -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

        Self {
            highlighter,
            options,
        }
    }

    /// Parse markdown content with front-matter.
    pub fn parse(&self, content: &str, path: &Path) -> Result<ParsedContent> {
        let (frontmatter, body) = parse_frontmatter(content, path)?;
        let (html, toc) = self.render(&body);

        Ok(ParsedContent {
            frontmatter,
            html,
            raw: body,
            toc,
        })
    }

    /// Render a markdown body (no front-matter) to HTML and a table of contents.
    pub fn render(&self, content: &str) -> (String, Vec<TocEntry>) {
        let mut state = RenderState::default();

        for event in Parser::new_ext(content, self.options) {
            self.handle_event(event, &mut state);
        }

        (state.html, state.toc)
    }

    fn handle_event(&self, event: Event<'_>, st: &mut RenderState) {
        // Text inside code blocks and image alt text is collected, not emitted.
        if let Some(code) = st.code_block.as_mut() {
            match event {
                Event::Text(text) => code.1.push_str(&text),
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((lang, code)) = st.code_block.take() {
                        let highlighted = self.highlighter.highlight(&code, lang.as_deref());
                        st.html.push_str(&highlighted);
                        st.html.push('\n');
                    }
                }
                _ => {}
            }
            return;
        }

        if let Some(image) = st.image.as_mut() {
            match event {
                Event::Text(text) | Event::Code(text) => image.alt.push_str(&text),
                Event::End(TagEnd::Image) => {
                    if let Some(image) = st.image.take() {
                        st.html.push_str(&image.to_html());
                    }
                }
                _ => {}
            }
            return;
        }

        match event {
            Event::Start(Tag::Heading { level, id, .. }) => {
                let lvl = level as u8;
                st.html.push_str(&format!("<h{lvl}"));
                st.heading = Some(HeadingState {
                    level: lvl,
                    insert_at: st.html.len(),
                    explicit_id: id.map(|i| i.to_string()),
                    text: String::new(),
                });
                st.html.push('>');
            }

            Event::End(TagEnd::Heading(level)) => {
                let lvl = level as u8;
                if let Some(heading) = st.heading.take() {
                    let id = heading
                        .explicit_id
                        .unwrap_or_else(|| st.unique_id(&slugify(&heading.text)));
                    st.html
                        .insert_str(heading.insert_at, &format!(" id=\"{}\"", escape_html(&id)));
                    st.toc.push(TocEntry {
                        level: heading.level,
                        text: heading.text,
                        id,
                    });
                }
                st.html.push_str(&format!("</h{lvl}>\n"));
            }

            Event::Start(Tag::CodeBlock(kind)) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .filter(|l| !l.is_empty())
                        .map(str::to_string),
                    CodeBlockKind::Indented => None,
                };
                st.code_block = Some((lang, String::new()));
            }

            Event::Start(Tag::Image {
                dest_url, title, ..
            }) => {
                st.image = Some(ImageState {
                    src: dest_url.to_string(),
                    title: title.to_string(),
                    alt: String::new(),
                });
            }

            Event::Start(Tag::TableHead) => {
                st.in_table_head = true;
                st.html.push_str("<thead><tr>");
            }

            Event::End(TagEnd::TableHead) => {
                st.in_table_head = false;
                st.html.push_str("</tr></thead>\n<tbody>\n");
            }

            Event::End(TagEnd::Table) => {
                st.html.push_str("</tbody></table>\n");
            }

            Event::Start(Tag::TableCell) => {
                st.html
                    .push_str(if st.in_table_head { "<th>" } else { "<td>" });
            }

            Event::End(TagEnd::TableCell) => {
                st.html
                    .push_str(if st.in_table_head { "</th>" } else { "</td>" });
            }

            Event::Text(text) => {
                if let Some(heading) = st.heading.as_mut() {
                    heading.text.push_str(&text);
                }
                st.html.push_str(&escape_html(&text));
            }

            Event::Code(code) => {
                if let Some(heading) = st.heading.as_mut() {
                    heading.text.push_str(&code);
                }
                st.html
                    .push_str(&format!("<code>{}</code>", escape_html(&code)));
            }

            Event::SoftBreak => st.html.push('\n'),

            Event::HardBreak => st.html.push_str("<br />\n"),

            Event::Start(tag) => st.html.push_str(&tag_to_html_start(&tag)),

            Event::End(tag) => st.html.push_str(&tag_to_html_end(&tag)),

            Event::Html(raw) | Event::InlineHtml(raw) => st.html.push_str(&raw),

            Event::FootnoteReference(name) => {
                let name = escape_html(&name);
                st.html.push_str(&format!(
                    "<sup class=\"footnote-ref\"><a href=\"#fn-{name}\">[{name}]</a></sup>"
                ));
            }

            Event::Rule => st.html.push_str("<hr />\n"),

            Event::TaskListMarker(checked) => {
                st.html.push_str(if checked {
                    "<input type=\"checkbox\" checked disabled />"
                } else {
                    "<input type=\"checkbox\" disabled />"
                });
            }

            Event::InlineMath(math) => {
                st.html.push_str(&format!(
                    "<span class=\"math inline\">\\({}\\)</span>",
                    escape_html(&math)
                ));
            }

            Event::DisplayMath(math) => {
                st.html.push_str(&format!(
                    "<div class=\"math display\">\\[{}\\]</div>",
                    escape_html(&math)
                ));
            }
        }
    }
}

#[derive(Debug, Default)]
struct RenderState {
    html: String,
    toc: Vec<TocEntry>,
    heading: Option<HeadingState>,
    code_block: Option<(Option<String>, String)>,
    image: Option<ImageState>,
    in_table_head: bool,
    used_ids: HashMap<String, usize>,
}

impl RenderState {
    /// Suffix repeated anchors: `intro`, `intro-1`, `intro-2`.
    fn unique_id(&mut self, base: &str) -> String {
        let base = if base.is_empty() { "section" } else { base };
        let count = self.used_ids.entry(base.to_string()).or_insert(0);
        let id = if *count == 0 {
            base.to_string()
        } else {
            format!("{base}-{count}")
        };
        *count += 1;
        id
    }
}

#[derive(Debug)]
struct HeadingState {
    level: u8,
    insert_at: usize,
    explicit_id: Option<String>,
    text: String,
}

#[derive(Debug)]
struct ImageState {
    src: String,
    title: String,
    alt: String,
}

impl ImageState {
    fn to_html(&self) -> String {
        let title_attr = if self.title.is_empty() {
            String::new()
        } else {
            format!(" title=\"{}\"", escape_html(&self.title))
        };
        format!(
            "<img src=\"{}\" alt=\"{}\"{title_attr} loading=\"lazy\" />",
            escape_html(&self.src),
            escape_html(&self.alt)
        )
    }
}

/// Convert a pulldown-cmark tag to HTML opening tag.
fn tag_to_html_start(tag: &Tag) -> String {
    match tag {
        Tag::Paragraph => "<p>".to_string(),
        Tag::BlockQuote(_) => "<blockquote>\n".to_string(),
        Tag::List(Some(1)) => "<ol>\n".to_string(),
        Tag::List(Some(start)) => format!("<ol start=\"{start}\">\n"),
        Tag::List(None) => "<ul>\n".to_string(),
        Tag::Item => "<li>".to_string(),
        Tag::FootnoteDefinition(name) => {
            format!("<div class=\"footnote\" id=\"fn-{}\">", escape_html(name))
        }
        Tag::Table(_) => "<table>".to_string(),
        Tag::TableRow => "<tr>".to_string(),
        Tag::Emphasis => "<em>".to_string(),
        Tag::Strong => "<strong>".to_string(),
        Tag::Strikethrough => "<del>".to_string(),
        Tag::Superscript => "<sup>".to_string(),
        Tag::Subscript => "<sub>".to_string(),
        Tag::DefinitionList => "<dl>".to_string(),
        Tag::DefinitionListTitle => "<dt>".to_string(),
        Tag::DefinitionListDefinition => "<dd>".to_string(),
        Tag::Link {
            dest_url, title, ..
        } => {
            let title_attr = if title.is_empty() {
                String::new()
            } else {
                format!(" title=\"{}\"", escape_html(title))
            };
            format!("<a href=\"{}\"{title_attr}>", escape_html(dest_url))
        }
        _ => String::new(),
    }
}

/// Convert a pulldown-cmark tag end to HTML closing tag.
fn tag_to_html_end(tag: &TagEnd) -> String {
    match tag {
        TagEnd::Paragraph => "</p>\n".to_string(),
        TagEnd::BlockQuote(_) => "</blockquote>\n".to_string(),
        TagEnd::List(true) => "</ol>\n".to_string(),
        TagEnd::List(false) => "</ul>\n".to_string(),
        TagEnd::Item => "</li>\n".to_string(),
        TagEnd::FootnoteDefinition => "</div>\n".to_string(),
        TagEnd::TableRow => "</tr>\n".to_string(),
        TagEnd::Emphasis => "</em>".to_string(),
        TagEnd::Strong => "</strong>".to_string(),
        TagEnd::Strikethrough => "</del>".to_string(),
        TagEnd::Superscript => "</sup>".to_string(),
        TagEnd::Subscript => "</sub>".to_string(),
        TagEnd::DefinitionList => "</dl>\n".to_string(),
        TagEnd::DefinitionListTitle => "</dt>\n".to_string(),
        TagEnd::DefinitionListDefinition => "</dd>\n".to_string(),
        TagEnd::Link => "</a>".to_string(),
        _ => String::new(),
    }
}

/// Convert heading text to an anchor id.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() {
                Some(c)
            } else if c.is_whitespace() || c == '-' || c == '_' {
                Some('-')
            } else {
                None
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_markdown() {
        let parser = MarkdownParser::new();
        let content = r#"---
title: "Test Post"
---

# Hello World

This is a test."#;

        let result = parser.parse(content, Path::new("test.md")).unwrap();

        assert_eq!(result.frontmatter.title, "Test Post");
        assert!(result.html.contains(r#"<h1 id="hello-world">Hello World</h1>"#));
        assert!(result.html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_parse_code_block() {
        let parser = MarkdownParser::new();
        let (html, _) = parser.render(
            r#"```rust
fn main() {
    println!("Hello");
}
```"#,
        );

        assert!(html.contains("<pre"));
        assert!(html.contains("main"));
        assert!(!html.contains("```"));
    }

    #[test]
    fn test_code_block_text_not_leaked_into_toc() {
        let parser = MarkdownParser::new();
        let (_, toc) = parser.render("```\n# not a heading\n```\n\n## Real");
        assert_eq!(toc.len(), 1);
        assert_eq!(toc[0].text, "Real");
    }

    #[test]
    fn test_toc_extraction() {
        let parser = MarkdownParser::new();
        let (_, toc) = parser.render(
            r#"# Heading 1
## Heading 2
### Heading `3`"#,
        );

        assert_eq!(toc.len(), 3);
        assert_eq!(toc[0].level, 1);
        assert_eq!(toc[0].text, "Heading 1");
        assert_eq!(toc[0].id, "heading-1");
        assert_eq!(toc[1].level, 2);
        assert_eq!(toc[2].text, "Heading 3");
    }

    #[test]
    fn test_duplicate_headings_get_unique_ids() {
        let parser = MarkdownParser::new();
        let (html, toc) = parser.render("## Notes\n\n## Notes\n\n## Notes");

        let ids: Vec<_> = toc.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["notes", "notes-1", "notes-2"]);
        assert!(html.contains(r#"<h2 id="notes-2">"#));
    }

    #[test]
    fn test_explicit_heading_id() {
        let parser = MarkdownParser::new();
        let (html, toc) = parser.render("## Setup {#install}");
        assert_eq!(toc[0].id, "install");
        assert!(html.contains(r#"<h2 id="install">Setup</h2>"#));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Test 123 Post"), "test-123-post");
        assert_eq!(slugify("Multiple   Spaces"), "multiple-spaces");
        assert_eq!(slugify("Special!@#Chars"), "specialchars");
    }

    #[test]
    fn test_table_rendering() {
        let parser = MarkdownParser::new();
        let (html, _) = parser.render(
            r#"| Header 1 | Header 2 |
|----------|----------|
| Cell 1   | Cell 2   |"#,
        );

        assert!(html.contains("<table>"));
        assert!(html.contains("<thead><tr><th>Header 1</th>"));
        assert!(html.contains("<tbody>"));
        assert!(html.contains("<td>Cell 1</td>"));
    }

    #[test]
    fn test_image_alt_text() {
        let parser = MarkdownParser::new();
        let (html, _) = parser.render(r#"![A *cat*](/cat.png "Cat")"#);
        assert!(html.contains(
            r#"<img src="/cat.png" alt="A cat" title="Cat" loading="lazy" />"#
        ));
    }

    #[test]
    fn test_link_rendering() {
        let parser = MarkdownParser::new();
        let (html, _) = parser.render("[home](https://example.com)");
        assert!(html.contains(r#"<a href="https://example.com">home</a>"#));
    }

    #[test]
    fn test_task_list() {
        let parser = MarkdownParser::new();
        let (html, _) = parser.render(
            r#"- [x] Done
- [ ] Not done"#,
        );

        assert!(html.contains("checkbox"));
        assert!(html.contains("checked"));
    }

    #[test]
    fn test_no_frontmatter() {
        let parser = MarkdownParser::new();
        let content = "# Just Content\n\nNo front-matter here.";
        let result = parser.parse(content, Path::new("test.md")).unwrap();

        assert!(result.frontmatter.title.is_empty());
        assert!(result.html.contains("Just Content"));
    }
}
