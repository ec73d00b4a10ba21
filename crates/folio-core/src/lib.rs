//! Folio Core Library
//!
//! Site configuration, social platform table, project status badges, front-matter
//! and post types shared by the parser, the generator and the CLI.

pub mod config;
pub mod content;
pub mod error;
pub mod frontmatter;
pub mod social;
pub mod status;

pub use config::{Config, Route, Theme};
pub use content::{ContentPath, ContentType, ParsedContent, Post, TocEntry};
pub use error::{CoreError, Result};
pub use frontmatter::Frontmatter;
pub use social::{Icon, SocialKey, SocialLink, SocialPlatform, Socials};
pub use status::{BadgeVariant, Project, ProjectStatus, StatusBadge};
