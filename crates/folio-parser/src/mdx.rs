//! MDX support.
//!
//! MDX bodies are Markdown plus ESM `import`/`export` statements and JSX. The
//! statements are dropped, `{/* ... */}` comments are removed, and JSX elements are
//! passed through to the Markdown renderer as raw HTML.

use std::path::Path;

use folio_core::content::ParsedContent;
use folio_core::frontmatter::parse_frontmatter;
use tracing::debug;

use crate::markdown::{MarkdownError, MarkdownParser};

/// MDX parser built on top of [`MarkdownParser`].
#[derive(Debug, Default)]
pub struct MdxParser {
    markdown: MarkdownParser,
}

impl MdxParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_theme(theme: &str) -> Self {
        Self {
            markdown: MarkdownParser::with_theme(theme),
        }
    }

    /// Parse MDX content with front-matter.
    pub fn parse(&self, content: &str, path: &Path) -> Result<ParsedContent, MarkdownError> {
        let (frontmatter, body) = parse_frontmatter(content, path)?;
        let markdown = strip_mdx_syntax(&body);
        debug!(
            path = %path.display(),
            removed_bytes = body.len() - markdown.len(),
            "stripped MDX statements"
        );
        let (html, toc) = self.markdown.render(&markdown);

        Ok(ParsedContent {
            frontmatter,
            html,
            raw: markdown,
            toc,
        })
    }
}

/// Remove ESM statements and JSX comments outside fenced code blocks.
pub fn strip_mdx_syntax(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut fence: Option<&str> = None;
    // Open bracket depth of the ESM statement being skipped.
    let mut statement: Option<i32> = None;

    for line in body.split_inclusive('\n') {
        let trimmed = line.trim_start();

        if let Some(marker) = fence {
            if trimmed.starts_with(marker) {
                fence = None;
            }
            out.push_str(line);
            continue;
        }

        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            fence = Some(&trimmed[..3]);
            out.push_str(line);
            continue;
        }

        // Multi-line imports such as `import {\n  A,\n} from "./a"`.
        if let Some(depth) = statement {
            let depth = depth + bracket_delta(trimmed);
            statement = (!ends_statement(trimmed, depth)).then_some(depth);
            continue;
        }

        if is_esm_statement(line) {
            let depth = bracket_delta(trimmed);
            statement = (!ends_statement(trimmed, depth)).then_some(depth);
            continue;
        }

        out.push_str(&strip_jsx_comments(line));
    }

    out
}

/// ESM statements start at column zero, as in MDX itself.
fn is_esm_statement(line: &str) -> bool {
    line.starts_with("import ") || line.starts_with("import{") || line.starts_with("export ")
}

/// Net change in `{`, `(` and `[` nesting, ignoring quoted text.
fn bracket_delta(line: &str) -> i32 {
    let mut delta = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in line.chars() {
        if let Some(q) = quote {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                _ if c == q => quote = None,
                _ => {}
            }
            continue;
        }

        match c {
            '\'' | '"' | '`' => quote = Some(c),
            '{' | '(' | '[' => delta += 1,
            '}' | ')' | ']' => delta -= 1,
            _ => {}
        }
    }

    delta
}

/// A statement ends once every bracket is closed and the line does not
/// continue onto the next one.
fn ends_statement(trimmed: &str, depth: i32) -> bool {
    let t = trimmed.trim_end();
    depth <= 0 && !t.ends_with(',') && !t.ends_with('=') && !t.ends_with("=>")
}

fn strip_jsx_comments(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;
    while let Some(start) = rest.find("{/*") {
        let Some(end) = rest[start..].find("*/}") else {
            break;
        };
        out.push_str(&rest[..start]);
        rest = &rest[start + end + 3..];
    }
    out.push_str(rest);
    out
}
