//! Folio Parser Library
//!
//! Turns post sources into [`ParsedContent`]: front-matter, rendered HTML
//! and a table of contents. Markdown (`.md`, `.markdown`) and MDX (`.mdx`)
//! are supported; the file extension picks the parser.

pub mod escape;
pub mod markdown;
pub mod mdx;
pub mod syntax;

use std::path::{Path, PathBuf};

use folio_core::content::{ContentType, ParsedContent};
pub use markdown::{MarkdownError, MarkdownParser};
pub use mdx::MdxParser;
pub use syntax::SyntaxHighlighter;
use thiserror::Error;

/// Errors from [`ParserRegistry::parse`].
#[derive(Debug, Error)]
pub enum ParserError {
    #[error(transparent)]
    Markdown(#[from] MarkdownError),

    /// No parser handles this file.
    #[error("no parser for {}", .0.display())]
    Unsupported(PathBuf),
}

pub type Result<T> = std::result::Result<T, ParserError>;

/// A source format the registry can dispatch to.
pub trait ContentParser: Send + Sync {
    /// Format handled by this parser.
    fn content_type(&self) -> ContentType;

    fn parse(&self, source: &str, path: &Path) -> markdown::Result<ParsedContent>;
}

impl ContentParser for MarkdownParser {
    fn content_type(&self) -> ContentType {
        ContentType::Markdown
    }

    fn parse(&self, source: &str, path: &Path) -> markdown::Result<ParsedContent> {
        MarkdownParser::parse(self, source, path)
    }
}

impl ContentParser for MdxParser {
    fn content_type(&self) -> ContentType {
        ContentType::Mdx
    }

    fn parse(&self, source: &str, path: &Path) -> markdown::Result<ParsedContent> {
        MdxParser::parse(self, source, path)
    }
}

/// Both post parsers, sharing one syntax theme.
#[derive(Debug, Default)]
pub struct ParserRegistry {
    markdown: MarkdownParser,
    mdx: MdxParser,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose code blocks use the named syntect theme.
    pub fn with_theme(theme: &str) -> Self {
        Self {
            markdown: MarkdownParser::with_theme(theme),
            mdx: MdxParser::with_theme(theme),
        }
    }

    /// Parser for a content type.
    pub fn parser_for(&self, content_type: ContentType) -> &dyn ContentParser {
        match content_type {
            ContentType::Markdown => &self.markdown,
            ContentType::Mdx => &self.mdx,
        }
    }

    /// Parse `source`, choosing the parser from the extension of `path`.
    pub fn parse(&self, source: &str, path: &Path) -> Result<ParsedContent> {
        let content_type = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(ContentType::from_extension)
            .ok_or_else(|| ParserError::Unsupported(path.to_path_buf()))?;

        Ok(self.parser_for(content_type).parse(source, path)?)
    }
}
