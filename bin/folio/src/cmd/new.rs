//! New command - scaffold a draft post

use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use chrono::{NaiveDate, Utc};
use color_eyre::eyre::{Result, WrapErr, bail};
use folio_core::ContentType;
use folio_generator::collector::POSTS_SECTION;

/// Source format of a new post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum PostFormat {
    /// Plain Markdown (`.md`).
    #[default]
    Md,
    /// Markdown with MDX imports and components (`.mdx`).
    Mdx,
}

impl PostFormat {
    fn content_type(self) -> ContentType {
        match self {
            Self::Md => ContentType::Markdown,
            Self::Mdx => ContentType::Mdx,
        }
    }
}

/// Run the new command.
///
/// `path` is relative to the posts directory; a leading `posts/` is accepted.
/// Existing files are never overwritten.
pub fn run(config_path: &Path, path: &Path, format: PostFormat) -> Result<PathBuf> {
    tracing::info!(?path, ?format, "Creating new post");

    let file_path = target_path(&super::content_dir(config_path), path, format)?;
    if file_path.exists() {
        bail!("Refusing to overwrite {}", file_path.display());
    }

    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).wrap_err("Failed to create directories")?;
    }

    let today = Utc::now().date_naive();
    fs::write(&file_path, scaffold(&file_path, format, today)).wrap_err("Failed to write file")?;

    tracing::info!(?file_path, "Created new post");
    println!("Created: {}", file_path.display());

    Ok(file_path)
}

fn target_path(content_dir: &Path, path: &Path, format: PostFormat) -> Result<PathBuf> {
    if path
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        bail!(
            "Post path must stay inside the posts directory: {}",
            path.display()
        );
    }

    let relative = match path.strip_prefix(POSTS_SECTION) {
        Ok(rest) => rest,
        Err(_) => path,
    };
    if relative.as_os_str().is_empty() {
        bail!("Post path needs a file name");
    }

    let full_path = content_dir.join(POSTS_SECTION).join(relative);
    let has_content_ext = full_path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(ContentType::from_extension)
        .is_some();
    if has_content_ext {
        return Ok(full_path);
    }

    // Dots in the name (`v1.2`, `notes.txt`) are kept; the extension is appended.
    let mut file_name = full_path.into_os_string();
    file_name.push(".");
    file_name.push(format.content_type().extension());
    Ok(PathBuf::from(file_name))
}

fn scaffold(path: &Path, format: PostFormat, date: NaiveDate) -> String {
    let title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(title_from_stem)
        .unwrap_or_else(|| "Untitled".to_string());
    let date = date.format("%Y-%m-%d");

    let mut out = format!(
        r#"---
title: "{title}"
date: {date}
tags: []
draft: true
---

"#
    );

    if format == PostFormat::Mdx {
        out.push_str("{/* Imports and components go here. */}\n\n");
    }
    out.push_str("Write your post here.\n");
    out
}

/// `my-first-post` becomes `My First Post`.
fn title_from_stem(stem: &str) -> String {
    stem.split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
        .replace('"', "")
}
