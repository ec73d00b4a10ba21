//! Presentational components.
//!
//! Each function maps configuration or content to an HTML fragment. None of them
//! touch the filesystem and all text is escaped here.

use folio_core::{
    Config, Icon, Post, Project, Route, Socials, StatusBadge, Theme,
};
use folio_parser::{escape::escape_html, markdown::slugify};

/// Inline SVG markup for an icon.
pub fn icon_svg(icon: Icon) -> &'static str {
    match icon {
        Icon::Mail => {
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" aria-hidden="true"><rect x="2" y="4" width="20" height="16" rx="2"/><path d="m22 7-10 6L2 7"/></svg>"#
        }
        Icon::Github => {
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="currentColor" aria-hidden="true"><path d="M12 .5a12 12 0 0 0-3.8 23.4c.6.1.8-.3.8-.6v-2.2c-3.3.7-4-1.4-4-1.4-.6-1.4-1.4-1.8-1.4-1.8-1-.7.1-.7.1-.7 1.2.1 1.8 1.2 1.8 1.2 1 1.8 2.8 1.3 3.5 1 .1-.8.4-1.3.7-1.6-2.7-.3-5.5-1.3-5.5-5.9 0-1.3.5-2.4 1.2-3.2-.1-.3-.5-1.5.1-3.2 0 0 1-.3 3.3 1.2a11.5 11.5 0 0 1 6 0C17.3 4.6 18.3 5 18.3 5c.7 1.7.3 2.9.1 3.2.8.8 1.2 1.9 1.2 3.2 0 4.6-2.8 5.6-5.5 5.9.4.4.8 1.1.8 2.2v3.3c0 .3.2.7.8.6A12 12 0 0 0 12 .5z"/></svg>"#
        }
        Icon::Linkedin => {
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="currentColor" aria-hidden="true"><path d="M20.4 20.5h-3.6v-5.6c0-1.3 0-3-1.8-3s-2.1 1.4-2.1 2.9v5.7H9.3V9h3.4v1.6h.1c.5-.9 1.6-1.8 3.4-1.8 3.6 0 4.3 2.4 4.3 5.5v6.2zM5.3 7.4a2.1 2.1 0 1 1 0-4.2 2.1 2.1 0 0 1 0 4.2zM7.1 20.5H3.6V9h3.5v11.5zM22.2 0H1.8C.8 0 0 .8 0 1.7v20.6c0 .9.8 1.7 1.8 1.7h20.4c1 0 1.8-.8 1.8-1.7V1.7C24 .8 23.2 0 22.2 0z"/></svg>"#
        }
    }
}

/// Social-icon list.
///
/// One link per non-empty entry, in configuration order. Platforms without an
/// icon fall back to their text label. Returns an empty string when nothing is
/// configured.
pub fn social_icons_html(socials: &Socials) -> String {
    let links = socials.links();
    if links.is_empty() {
        return String::new();
    }

    let mut html = String::from(r#"<ul class="socials">"#);
    for link in &links {
        let target = if link.is_mailto() {
            ""
        } else {
            r#" target="_blank" rel="noopener noreferrer""#
        };
        let body = match link.icon {
            Some(icon) => icon_svg(icon).to_string(),
            None => escape_html(&link.label),
        };
        html.push_str(&format!(
            r#"<li><a href="{href}" aria-label="{label}" title="{label}"{target}>{body}</a></li>"#,
            href = escape_html(&link.href),
            label = escape_html(&link.label),
        ));
    }
    html.push_str("</ul>");
    html
}

/// Status badge for a project, or nothing for absent and unknown statuses.
pub fn status_badge_html(status: Option<&str>) -> String {
    match StatusBadge::for_status(status) {
        Some(badge) => format!(
            r#"<span class="badge badge-{}">{}</span>"#,
            badge.variant.as_str(),
            badge.text
        ),
        None => String::new(),
    }
}

/// Site header: title link, navigation routes and the theme toggle.
pub fn header_html(config: &Config, current_path: &str) -> String {
    let nav = config
        .header
        .routes
        .iter()
        .map(|route| nav_link_html(route, current_path))
        .collect::<String>();

    format!(
        r#"<header class="site-header">
    <div class="container">
        <nav>
            <a href="/" class="site-title">{title}</a>
            <div class="nav-links">{nav}{toggle}</div>
        </nav>
    </div>
</header>"#,
        title = escape_html(&config.site.title),
        toggle = ThemeProvider::TOGGLE_BUTTON,
    )
}

fn nav_link_html(route: &Route, current_path: &str) -> String {
    let current = if route.is_active(current_path) {
        r#" aria-current="page""#
    } else {
        ""
    };
    format!(
        r#"<a href="{}"{current}>{}</a>"#,
        escape_html(&route.path),
        escape_html(&route.name)
    )
}

/// Site footer: copyright line and social links.
pub fn footer_html(config: &Config, year: i32) -> String {
    format!(
        r#"<footer class="site-footer">
    <div class="container">
        <p>&copy; {year} {author}</p>
        {socials}
    </div>
</footer>"#,
        author = escape_html(&config.site.author),
        socials = social_icons_html(&config.home.socials),
    )
}

/// Emits the configured initial theme and the toggle script.
///
/// A visitor's saved choice in `localStorage` wins over the configured theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeProvider {
    initial: Theme,
}

impl ThemeProvider {
    const TOGGLE_BUTTON: &'static str = r#"<button class="theme-toggle" type="button" aria-label="Toggle theme">&#9680;</button>"#;

    pub fn new(initial: Theme) -> Self {
        Self { initial }
    }

    /// Value for `<html data-theme>`.
    pub fn initial(&self) -> &'static str {
        self.initial.as_str()
    }

    pub fn script(&self) -> String {
        format!(
            r#"<script>
(function() {{
    var root = document.documentElement;
    var saved = localStorage.getItem('theme');
    root.setAttribute('data-theme', saved || '{initial}');
    document.addEventListener('DOMContentLoaded', function() {{
        var toggle = document.querySelector('.theme-toggle');
        if (!toggle) return;
        toggle.addEventListener('click', function() {{
            var next = root.getAttribute('data-theme') === 'dark' ? 'light' : 'dark';
            root.setAttribute('data-theme', next);
            localStorage.setItem('theme', next);
        }});
    }});
}})();
</script>"#,
            initial = self.initial()
        )
    }
}

/// Floating back-to-top button, shown after scrolling down.
pub fn back_to_top_html() -> &'static str {
    r#"<button class="back-to-top" type="button" aria-label="Back to top">&uarr;</button>
<script>
(function() {
    var button = document.querySelector('.back-to-top');
    window.addEventListener('scroll', function() {
        button.classList.toggle('visible', window.scrollY > 400);
    });
    button.addEventListener('click', function() {
        window.scrollTo({ top: 0, behavior: 'smooth' });
    });
})();
</script>"#
}

/// URL of a tag page.
pub fn tag_url(tag: &str) -> String {
    format!("/tags/{}/", slugify(tag))
}

fn tags_html(tags: &[String]) -> String {
    if tags.is_empty() {
        return String::new();
    }
    let items = tags
        .iter()
        .map(|tag| {
            format!(
                r#"<li><a href="{}" rel="tag">{}</a></li>"#,
                tag_url(tag),
                escape_html(tag)
            )
        })
        .collect::<String>();
    format!(r#"<ul class="tags">{items}</ul>"#)
}

/// Date, reading time and tags for a post.
pub fn post_meta_html(post: &Post) -> String {
    let mut parts = Vec::new();
    if let Some(date) = post.date {
        parts.push(format!(
            r#"<time datetime="{}">{}</time>"#,
            date.format("%Y-%m-%d"),
            date.format("%B %-d, %Y")
        ));
    }
    parts.push(format!("<span>{} min read</span>", post.reading_time));
    if post.draft {
        parts.push(r#"<span class="badge badge-outline">DRAFT</span>"#.to_string());
    }

    format!(
        r#"<div class="post-meta">{}</div>{}"#,
        parts.join(""),
        tags_html(&post.tags)
    )
}

/// Card for one entry of the projects page.
pub fn project_card_html(project: &Project) -> String {
    let mut links = String::new();
    if let Some(href) = project.href.as_deref().filter(|h| !h.trim().is_empty()) {
        links.push_str(&format!(
            r#"<a href="{}" target="_blank" rel="noopener noreferrer">Website</a>"#,
            escape_html(href)
        ));
    }
    if let Some(repo) = project.repo_link.as_deref().filter(|r| !r.trim().is_empty()) {
        links.push_str(&format!(
            r#"<a href="{}" target="_blank" rel="noopener noreferrer">Source</a>"#,
            escape_html(repo)
        ));
    }

    format!(
        r#"<article class="project-card">
    <h2>{name}{badge}</h2>
    <p>{description}</p>
    <div class="project-links">{links}</div>
</article>"#,
        name = escape_html(&project.name),
        badge = status_badge_html(project.status.as_deref()),
        description = escape_html(&project.description),
    )
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn config() -> Config {
        Config::from_toml_str(
            r#"
[site]
title = "Jane's <Blog>"
author = "Jane Doe"
base_url = "https://example.com"

[[header.routes]]
name = "Home"
path = "/"

[[header.routes]]
name = "Posts"
path = "/posts"

[home.socials]
email = "jane@example.com"
github = ""
linkedin = "https://linkedin.com/in/jane"
"#,
        )
        .expect("config")
    }

    fn post(tags: &[&str], draft: bool) -> Post {
        Post {
            url: "/posts/hello".to_string(),
            title: "Hello".to_string(),
            summary: None,
            date: NaiveDate::from_ymd_opt(2024, 3, 9),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            draft,
            content: String::new(),
            reading_time: 3,
            word_count: 600,
            toc: vec![],
            source_path: None,
        }
    }

    #[test]
    fn test_social_icons_skip_empty_values() {
        let html = social_icons_html(&config().home.socials);

        assert_eq!(html.matches("<li>").count(), 2);
        assert!(html.contains(r#"href="mailto:jane@example.com""#));
        assert!(html.contains(r#"href="https://linkedin.com/in/jane""#));
        assert!(!html.contains("GitHub"));

        let mail = html.find("mailto:").unwrap();
        let linkedin = html.find("linkedin.com").unwrap();
        assert!(mail < linkedin);
    }

    #[test]
    fn test_social_icons_mailto_opens_in_place() {
        let socials = Socials::new()
            .with("email", "me@example.com")
            .with("github", "https://github.com/me");
        let html = social_icons_html(&socials);

        let mail_item = html.split("</li>").next().unwrap();
        assert!(!mail_item.contains("target="));
        assert!(html.contains(r#"href="https://github.com/me" aria-label="GitHub" title="GitHub" target="_blank""#));
    }

    #[test]
    fn test_social_icons_text_fallback() {
        let socials = Socials::new().with("twitter", "https://twitter.com/me");
        let html = social_icons_html(&socials);

        assert!(!html.contains("<svg"));
        assert!(html.contains(">Twitter</a>"));
    }

    #[test]
    fn test_social_icons_empty() {
        assert_eq!(social_icons_html(&Socials::new()), "");
        assert_eq!(social_icons_html(&Socials::new().with("github", "  ")), "");
    }

    #[test]
    fn test_status_badge_html() {
        assert_eq!(
            status_badge_html(Some("dev")),
            r#"<span class="badge badge-secondary">DEV</span>"#
        );
        assert_eq!(
            status_badge_html(Some("offline")),
            r#"<span class="badge badge-destructive">OFFLINE</span>"#
        );
        assert_eq!(status_badge_html(Some("archived")), "");
        assert_eq!(status_badge_html(None), "");
    }

    #[test]
    fn test_header_marks_active_route() {
        let html = header_html(&config(), "/posts/hello/");

        assert!(html.contains("Jane&#x27;s &lt;Blog&gt;"));
        assert!(html.contains(r#"<a href="/posts" aria-current="page">Posts</a>"#));
        assert!(html.contains(r#"<a href="/">Home</a>"#));
        assert!(html.contains("theme-toggle"));
    }

    #[test]
    fn test_footer() {
        let html = footer_html(&config(), 2025);

        assert!(html.contains("&copy; 2025 Jane Doe"));
        assert!(html.contains(r#"class="socials""#));
    }

    #[test]
    fn test_theme_provider() {
        let provider = ThemeProvider::new(Theme::Dark);
        assert_eq!(provider.initial(), "dark");
        assert!(provider.script().contains("saved || 'dark'"));
    }

    #[test]
    fn test_post_meta() {
        let html = post_meta_html(&post(&["Rust Lang", "web"], false));

        assert!(html.contains(r#"<time datetime="2024-03-09">March 9, 2024</time>"#));
        assert!(html.contains("3 min read"));
        assert!(html.contains(r#"<a href="/tags/rust-lang/" rel="tag">Rust Lang</a>"#));
        assert!(!html.contains("DRAFT"));

        let draft = post_meta_html(&post(&[], true));
        assert!(draft.contains("DRAFT"));
        assert!(!draft.contains("class=\"tags\""));
    }

    #[test]
    fn test_project_card() {
        let project = Project {
            name: "Folio".to_string(),
            description: "A blog & more".to_string(),
            href: None,
            repo_link: Some("https://github.com/me/folio".to_string()),
            status: Some("active".to_string()),
        };
        let html = project_card_html(&project);

        assert!(html.contains(r#"<span class="badge badge-default">ACTIVE</span>"#));
        assert!(html.contains("A blog &amp; more"));
        assert!(html.contains(">Source</a>"));
        assert!(!html.contains(">Website</a>"));
    }

    #[test]
    fn test_project_card_unknown_status_has_no_badge() {
        let project = Project {
            name: "Old".to_string(),
            description: String::new(),
            href: Some("https://old.example.com".to_string()),
            repo_link: None,
            status: Some("archived".to_string()),
        };
        assert!(!project_card_html(&project).contains("badge"));
    }
}
