//! Folio Generator Library
//!
//! Turns a content directory and a site configuration into a static blog.
//!
//! # Modules
//!
//! - [`components`] - Presentational fragments (social icons, status badges, header, footer)
//! - [`layout`] - Page shell wrapping every generated page
//! - [`template`] - Built-in templates with `{{ var }}` interpolation
//! - [`html`] - Page generation for posts, listings, tags and projects
//! - [`collector`] - Content collection and organization
//! - [`rss`] - RSS feed generation
//! - [`assets`] - Static file copying
//! - [`build`] - Build orchestration

pub mod assets;
pub mod build;
pub mod collector;
pub mod components;
pub mod html;
pub mod layout;
pub mod rss;
pub mod template;

pub use build::{BuildError, BuildStats, Builder};
pub use collector::{ContentCollector, SiteContent, TagEntry};
pub use html::HtmlGenerator;
pub use layout::Layout;
pub use rss::RssGenerator;
pub use template::{Template, TemplateContext, TemplateRegistry};
