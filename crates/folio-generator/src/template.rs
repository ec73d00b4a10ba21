//! Built-in page templates.
//!
//! Templates are plain strings with `{{ name }}` placeholders. A trailing `?`
//! (`{{ name? }}`) marks a placeholder that renders as nothing when unset.

use std::collections::HashMap;

use thiserror::Error;

/// Template rendering errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Missing required variable.
    #[error("missing required variable: {0}")]
    MissingVariable(String),

    /// Template not found.
    #[error("template not found: {0}")]
    NotFound(String),

    /// Invalid template syntax.
    #[error("invalid template syntax: {0}")]
    InvalidSyntax(String),
}

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;

/// Variables available to a template.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    variables: HashMap<String, String>,
}

impl TemplateContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert only when `value` is present and non-empty.
    #[must_use]
    pub fn with_opt(mut self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        if let Some(value) = value {
            let value = value.into();
            if !value.is_empty() {
                self.insert(key, value);
            }
        }
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }
}

/// A named template string.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    content: String,
}

impl Template {
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Substitute every placeholder from `context`.
    ///
    /// Substituted values are not rescanned, so user content containing `{{` is
    /// left as is.
    pub fn render(&self, context: &TemplateContext) -> Result<String> {
        let mut out = String::with_capacity(self.content.len());
        let mut rest = self.content.as_str();

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after
                .find("}}")
                .ok_or_else(|| TemplateError::InvalidSyntax("unclosed {{ delimiter".to_string()))?;

            let raw_name = after[..end].trim();
            let (name, optional) = match raw_name.strip_suffix('?') {
                Some(stripped) => (stripped.trim(), true),
                None => (raw_name, false),
            };

            if name.is_empty() {
                return Err(TemplateError::InvalidSyntax(
                    "empty placeholder".to_string(),
                ));
            }

            match context.get(name) {
                Some(value) => out.push_str(value),
                None if optional => {}
                None => return Err(TemplateError::MissingVariable(name.to_string())),
            }

            rest = &after[end + 2..];
        }

        out.push_str(rest);
        Ok(out)
    }
}

/// Registry of named templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, Template>,
}

impl TemplateRegistry {
    /// Registry preloaded with the built-in templates.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::default();
        for (name, content) in BUILTIN_TEMPLATES {
            registry.register(Template::new(*name, *content));
        }
        registry
    }

    /// Add or replace a template.
    pub fn register(&mut self, template: Template) {
        self.templates.insert(template.name.clone(), template);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    pub fn render(&self, name: &str, context: &TemplateContext) -> Result<String> {
        self.get(name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))?
            .render(context)
    }
}

const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    ("base", BASE_TEMPLATE),
    ("home", HOME_TEMPLATE),
    ("post", POST_TEMPLATE),
    ("list", LIST_TEMPLATE),
    ("projects", PROJECTS_TEMPLATE),
    ("tags_index", TAGS_INDEX_TEMPLATE),
    ("taxonomy", TAXONOMY_TEMPLATE),
];

/// Page shell. The header, footer and widgets are pre-rendered by the layout.
pub const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="{{ lang }}" data-theme="{{ theme }}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{ title }}</title>
    <meta name="description" content="{{ description? }}">
    <meta name="author" content="{{ author }}">
    <link rel="alternate" type="application/rss+xml" title="{{ site_title }}" href="/rss.xml">
    <style>
        :root {
            --bg: #ffffff;
            --fg: #18181b;
            --muted: #71717a;
            --border: #e4e4e7;
            --accent: #2563eb;
            --code-bg: #f4f4f5;
            color-scheme: light;
        }
        [data-theme="dark"] {
            --bg: #09090b;
            --fg: #fafafa;
            --muted: #a1a1aa;
            --border: #27272a;
            --accent: #60a5fa;
            --code-bg: #18181b;
            color-scheme: dark;
        }
        * { box-sizing: border-box; }
        body {
            margin: 0;
            font-family: system-ui, -apple-system, sans-serif;
            line-height: 1.7;
            color: var(--fg);
            background: var(--bg);
            display: flex;
            flex-direction: column;
            min-height: 100vh;
        }
        a { color: var(--accent); text-decoration: none; }
        a:hover { text-decoration: underline; }
        .container { width: 100%; max-width: 720px; margin: 0 auto; padding: 0 1.25rem; }
        .site-header { border-bottom: 1px solid var(--border); }
        .site-header nav { display: flex; align-items: center; justify-content: space-between; padding: 1rem 0; gap: 1rem; }
        .site-title { font-weight: 600; color: var(--fg); }
        .nav-links { display: flex; align-items: center; gap: 1.25rem; }
        .nav-links a { color: var(--muted); font-size: 0.9rem; }
        .nav-links a[aria-current="page"] { color: var(--fg); font-weight: 600; }
        .theme-toggle { background: none; border: 1px solid var(--border); border-radius: 0.375rem; color: var(--fg); cursor: pointer; padding: 0.25rem 0.5rem; }
        main { flex: 1; padding: 2.5rem 0; }
        pre { background: var(--code-bg); padding: 1rem; border-radius: 0.5rem; overflow-x: auto; }
        code { font-family: ui-monospace, Menlo, Consolas, monospace; font-size: 0.875em; }
        img { max-width: 100%; height: auto; }
        table { width: 100%; border-collapse: collapse; }
        th, td { padding: 0.5rem; border-bottom: 1px solid var(--border); text-align: left; }
        .post-meta { color: var(--muted); font-size: 0.875rem; display: flex; flex-wrap: wrap; gap: 0.75rem; }
        .tags { display: flex; flex-wrap: wrap; gap: 0.5rem; list-style: none; padding: 0; margin: 0; }
        .tags a { font-size: 0.75rem; padding: 0.125rem 0.625rem; border: 1px solid var(--border); border-radius: 9999px; }
        .post-list { list-style: none; padding: 0; }
        .post-list li { padding: 0.75rem 0; border-bottom: 1px solid var(--border); }
        .post-list time { color: var(--muted); font-size: 0.8rem; margin-right: 0.75rem; }
        .post-list p { margin: 0.25rem 0 0; color: var(--muted); }
        .pagination { display: flex; justify-content: space-between; margin-top: 2rem; }
        .socials { display: flex; gap: 0.75rem; list-style: none; padding: 0; margin: 0; }
        .socials a { display: inline-flex; align-items: center; color: var(--muted); }
        .socials svg { width: 1.25rem; height: 1.25rem; }
        .projects { display: grid; gap: 1rem; }
        .project-card { border: 1px solid var(--border); border-radius: 0.5rem; padding: 1rem 1.25rem; }
        .project-card h2 { display: flex; align-items: center; gap: 0.5rem; margin: 0 0 0.5rem; font-size: 1.125rem; }
        .project-links { display: flex; gap: 1rem; font-size: 0.875rem; }
        .badge { font-size: 0.65rem; font-weight: 600; letter-spacing: 0.05em; padding: 0.125rem 0.5rem; border-radius: 9999px; border: 1px solid transparent; }
        .badge-default { background: var(--fg); color: var(--bg); }
        .badge-secondary { background: var(--code-bg); color: var(--fg); }
        .badge-outline { border-color: var(--border); color: var(--fg); }
        .badge-destructive { background: #dc2626; color: #ffffff; }
        .site-footer { border-top: 1px solid var(--border); padding: 1.5rem 0; color: var(--muted); font-size: 0.875rem; }
        .site-footer .container { display: flex; justify-content: space-between; align-items: center; gap: 1rem; flex-wrap: wrap; }
        .back-to-top { position: fixed; right: 1.5rem; bottom: 1.5rem; display: none; border: 1px solid var(--border); border-radius: 9999px; background: var(--bg); color: var(--fg); width: 2.5rem; height: 2.5rem; cursor: pointer; }
        .back-to-top.visible { display: block; }
    </style>
    {{ theme_script }}
</head>
<body>
    {{ header }}
    <main>
        <div class="container">
            {{ content }}
        </div>
    </main>
    {{ footer }}
    {{ back_to_top? }}
</body>
</html>"##;

/// Home page: intro, social links and recent posts.
pub const HOME_TEMPLATE: &str = r#"<section class="home">
    <h1>{{ site_title }}</h1>
    <p class="intro">{{ description? }}</p>
    {{ socials? }}
    <h2>Recent posts</h2>
    {{ items }}
    <p><a href="/posts/">All posts &rarr;</a></p>
</section>"#;

/// Single post with its metadata line.
pub const POST_TEMPLATE: &str = r#"<article class="post">
    <header>
        <h1>{{ title }}</h1>
        {{ meta }}
    </header>
    <div class="content">
        {{ content }}
    </div>
</article>"#;

/// Paginated post listing.
pub const LIST_TEMPLATE: &str = r#"<section>
    <h1>{{ title }}</h1>
    {{ items }}
    {{ pagination? }}
</section>"#;

pub const PROJECTS_TEMPLATE: &str = r#"<section>
    <h1>{{ title }}</h1>
    <div class="projects">
        {{ cards }}
    </div>
</section>"#;

pub const TAGS_INDEX_TEMPLATE: &str = r#"<section>
    <h1>Tags</h1>
    <ul class="tags">
        {{ items }}
    </ul>
</section>"#;

/// Posts for a single tag.
pub const TAXONOMY_TEMPLATE: &str = r#"<section>
    <h1>Tagged: <span>{{ term }}</span></h1>
    {{ items }}
    {{ pagination? }}
</section>"#;
