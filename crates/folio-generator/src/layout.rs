//! Page shell shared by every generated page.

use chrono::{Datelike, Utc};
use folio_core::Config;
use folio_parser::escape::escape_html;

use crate::{
    components::{ThemeProvider, back_to_top_html, footer_html, header_html},
    template::{Result, TemplateContext, TemplateRegistry},
};

/// Wraps page bodies in the header, footer, theme provider and back-to-top widget.
#[derive(Debug, Clone, Copy)]
pub struct Layout<'a> {
    config: &'a Config,
    templates: &'a TemplateRegistry,
    year: i32,
}

impl<'a> Layout<'a> {
    pub fn new(config: &'a Config, templates: &'a TemplateRegistry) -> Self {
        Self {
            config,
            templates,
            year: Utc::now().year(),
        }
    }

    /// Pin the footer year.
    #[must_use]
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    /// Render a full document.
    ///
    /// `page_title` of `None` uses the bare site title; `current_path` drives
    /// active-route marking in the header.
    pub fn render(
        &self,
        page_title: Option<&str>,
        current_path: &str,
        body_html: &str,
    ) -> Result<String> {
        let site = &self.config.site;
        let title = match page_title {
            Some(page) if page != site.title => format!("{page} | {}", site.title),
            _ => site.title.clone(),
        };
        let theme = ThemeProvider::new(site.theme);

        let ctx = TemplateContext::new()
            .with_var("lang", escape_html(&site.language))
            .with_var("theme", theme.initial())
            .with_var("title", escape_html(&title))
            .with_var("site_title", escape_html(&site.title))
            .with_var("author", escape_html(&site.author))
            .with_opt("description", site.description.as_deref().map(escape_html))
            .with_var("theme_script", theme.script())
            .with_var("header", header_html(self.config, current_path))
            .with_var("content", body_html)
            .with_var("footer", footer_html(self.config, self.year))
            .with_opt(
                "back_to_top",
                self.config.layout.back_to_top.then(back_to_top_html),
            );

        self.templates.render("base", &ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(extra: &str) -> Config {
        Config::from_toml_str(&format!(
            r#"
[site]
title = "Folio"
author = "Jane"
base_url = "https://example.com"
language = "de"
theme = "dark"
description = "Notes & projects"

[[header.routes]]
name = "Projects"
path = "/projects"
{extra}
"#
        ))
        .expect("config")
    }

    #[test]
    fn test_layout_shell() {
        let config = config("");
        let templates = TemplateRegistry::new();
        let html = Layout::new(&config, &templates)
            .with_year(2024)
            .render(Some("Hello"), "/projects/", "<p>Body</p>")
            .unwrap();

        assert!(html.contains(r#"<html lang="de" data-theme="dark">"#));
        assert!(html.contains("<title>Hello | Folio</title>"));
        assert!(html.contains(r#"content="Notes &amp; projects""#));
        assert!(html.contains(r#"<a href="/projects" aria-current="page">Projects</a>"#));
        assert!(html.contains("<p>Body</p>"));
        assert!(html.contains("&copy; 2024 Jane"));
        assert!(html.contains(r#"class="back-to-top""#));

        let header = html.find(r#"<header class="site-header""#).unwrap();
        let body = html.find("<p>Body</p>").unwrap();
        let footer = html.find(r#"<footer class="site-footer""#).unwrap();
        assert!(header < body && body < footer);
    }

    #[test]
    fn test_layout_without_back_to_top() {
        let config = config("[layout]\nback_to_top = false");
        let templates = TemplateRegistry::new();
        let html = Layout::new(&config, &templates)
            .render(None, "/", "")
            .unwrap();

        assert!(html.contains("<title>Folio</title>"));
        assert!(!html.contains(r#"class="back-to-top""#));
    }
}
