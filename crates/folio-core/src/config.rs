//! Site configuration management.
//!
//! The configuration is loaded once at startup and handed to every renderer by
//! reference. Optional sections that are missing mean "feature off".

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    error::{CoreError, Result},
    social::Socials,
    status::Project,
};

/// Main configuration structure for Folio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    pub site: SiteConfig,

    /// Header navigation.
    #[serde(default)]
    pub header: HeaderConfig,

    /// Home page settings.
    #[serde(default)]
    pub home: HomeConfig,

    /// Project showcase.
    #[serde(default)]
    pub project: ProjectConfig,

    /// Comment provider toggle.
    #[serde(default)]
    pub comment: CommentConfig,

    /// Search provider toggle.
    #[serde(default)]
    pub search: SearchConfig,

    /// Analytics toggle.
    #[serde(default)]
    pub analytics: AnalyticsConfig,

    /// Layout widgets.
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Build settings.
    #[serde(default)]
    pub build: BuildConfig,

    /// RSS feed settings.
    #[serde(default)]
    pub rss: RssConfig,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site title.
    pub title: String,

    /// Site description for listings and the feed.
    #[serde(default)]
    pub description: Option<String>,

    /// Author name, shown in the footer.
    pub author: String,

    /// Base URL for the site (e.g., "https://example.com").
    pub base_url: String,

    /// Locale tag used for `<html lang>`.
    #[serde(default = "default_language")]
    pub language: String,

    /// Initial color theme.
    #[serde(default)]
    pub theme: Theme,
}

/// Color theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// Header navigation configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeaderConfig {
    /// Navigation routes in display order.
    #[serde(default)]
    pub routes: Vec<Route>,
}

/// A single navigation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub name: String,
    pub path: String,
}

impl Route {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Whether this route is the current page or one of its ancestors.
    ///
    /// `/` only matches the root itself.
    pub fn is_active(&self, current: &str) -> bool {
        let path = self.path.trim_end_matches('/');
        let current = current.trim_end_matches('/');
        if path.is_empty() {
            return current.is_empty();
        }
        current == path || current.starts_with(&format!("{path}/"))
    }
}

/// Home page configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeConfig {
    /// Profile links keyed by platform.
    #[serde(default)]
    pub socials: Socials,

    /// Number of recent posts listed on the home page.
    #[serde(default = "default_recent_posts")]
    pub recent_posts: usize,
}

/// Project showcase configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub projects: Vec<Project>,
}

/// Comment widget settings. Parsed as data only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub provider: Option<CommentProvider>,

    #[serde(default)]
    pub giscus: Option<GiscusConfig>,

    #[serde(default)]
    pub utterances: Option<UtterancesConfig>,
}

/// Supported comment providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentProvider {
    Giscus,
    Utterances,
}

/// Giscus settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GiscusConfig {
    pub repo: String,
    pub repo_id: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default = "default_giscus_mapping")]
    pub mapping: String,
}

/// Utterances settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UtterancesConfig {
    pub repo: String,
    #[serde(default = "default_issue_term")]
    pub issue_term: String,
    #[serde(default)]
    pub label: Option<String>,
}

/// Search settings. Parsed as data only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub provider: Option<String>,
}

/// Analytics settings. Parsed as data only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub id: Option<String>,
}

/// Layout widget toggles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Render the back-to-top button.
    #[serde(default = "default_true")]
    pub back_to_top: bool,
}

/// Build configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Output directory for generated site.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Strip blank lines and indentation from HTML output.
    #[serde(default)]
    pub minify: bool,

    /// Syntax highlighting theme name.
    #[serde(default = "default_syntax_theme")]
    pub syntax_theme: String,

    /// Whether to publish drafts.
    #[serde(default)]
    pub drafts: bool,

    /// Posts per page on paginated listings.
    #[serde(default = "default_paginate")]
    pub paginate: usize,
}

/// RSS feed configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RssConfig {
    /// Whether RSS feed is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum number of items in feed.
    #[serde(default = "default_rss_limit")]
    pub limit: usize,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_output_dir() -> String {
    "public".to_string()
}

fn default_syntax_theme() -> String {
    "base16-ocean.dark".to_string()
}

fn default_giscus_mapping() -> String {
    "pathname".to_string()
}

fn default_issue_term() -> String {
    "pathname".to_string()
}

fn default_true() -> bool {
    true
}

fn default_rss_limit() -> usize {
    20
}

fn default_paginate() -> usize {
    10
}

fn default_recent_posts() -> usize {
    5
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self {
            socials: Socials::default(),
            recent_posts: default_recent_posts(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { back_to_top: true }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            minify: false,
            syntax_theme: default_syntax_theme(),
            drafts: false,
            paginate: default_paginate(),
        }
    }
}

impl Default for RssConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            limit: default_rss_limit(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration layered with `FOLIO__SECTION__KEY` environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(
                config::Environment::with_prefix("FOLIO")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.site.title.trim().is_empty() {
            return Err(CoreError::config("site.title cannot be empty"));
        }

        if self.site.author.trim().is_empty() {
            return Err(CoreError::config("site.author cannot be empty"));
        }

        if self.site.base_url.is_empty() {
            return Err(CoreError::config("site.base_url cannot be empty"));
        }

        if self.site.base_url.ends_with('/') {
            tracing::warn!("site.base_url should not have a trailing slash");
        }

        if self.build.paginate == 0 {
            return Err(CoreError::config("build.paginate must be at least 1"));
        }

        Ok(())
    }

    /// Get the full URL for a path.
    pub fn url_for(&self, path: &str) -> String {
        let base = self.site.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    /// Whether a comment provider is switched on and configured.
    pub fn comments_enabled(&self) -> bool {
        let comment = &self.comment;
        match (comment.enabled, comment.provider) {
            (true, Some(CommentProvider::Giscus)) => comment.giscus.is_some(),
            (true, Some(CommentProvider::Utterances)) => comment.utterances.is_some(),
            _ => false,
        }
    }

    /// Whether a search provider is switched on.
    pub fn search_enabled(&self) -> bool {
        self.search.enabled && self.search.provider.is_some()
    }
}
