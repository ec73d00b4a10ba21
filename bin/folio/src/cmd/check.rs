//! Check command - validate configuration and content

use std::path::Path;

use color_eyre::eyre::{Result, bail};
use folio_core::{Config, ContentType};
use folio_generator::ContentCollector;
use folio_parser::ParserRegistry;

/// Validation result.
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Validates configuration and all content files. With `strict`, warnings
/// fail the check too.
pub fn run(config_path: &Path, strict: bool) -> Result<()> {
    tracing::info!(?config_path, strict, "Checking configuration and content");

    let result = validate_site(config_path);

    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

fn validate_site(config_path: &Path) -> ValidationResult {
    let mut result = ValidationResult::default();

    println!("Checking configuration...");
    let config = match Config::load_with_env(config_path) {
        Ok(c) => {
            println!("  ✓ Configuration valid");
            Some(c)
        }
        Err(e) => {
            result.add_error(format!("Configuration error: {e}"));
            println!("  ✗ Configuration invalid: {e}");
            None
        }
    };

    let content_dir = super::content_dir(config_path);
    if content_dir.exists() {
        println!("\nChecking content files...");
        validate_content_files(&content_dir, config.as_ref(), &mut result);
    } else {
        result.add_warning(format!(
            "Content directory does not exist: {}",
            content_dir.display()
        ));
    }

    if let Some(cfg) = &config {
        println!("\nChecking configuration values...");
        for warning in quick_validate(cfg) {
            result.add_warning(warning);
        }
        println!("  ✓ Configuration values checked");
    }

    result
}

/// Configuration problems that do not stop a build.
///
/// Build and watch print these before starting; `check` reports them as
/// warnings.
pub fn quick_validate(config: &Config) -> Vec<String> {
    let mut warnings = Vec::new();

    if !config.site.base_url.starts_with("http://") && !config.site.base_url.starts_with("https://")
    {
        warnings.push("site.base_url should start with http:// or https://".to_string());
    }

    for key in config.home.socials.without_icon() {
        match key.platform() {
            Some(platform) => warnings.push(format!(
                "home.socials.{}: no icon for {} yet, rendered as a text link",
                key.as_str(),
                platform.label()
            )),
            None => warnings.push(format!(
                "home.socials.{}: unknown platform, rendered as a text link",
                key.as_str()
            )),
        }
    }

    for project in &config.project.projects {
        if project.has_unknown_status() {
            warnings.push(format!(
                "project '{}': unknown status '{}', no badge will be shown",
                project.name,
                project.status.as_deref().unwrap_or_default()
            ));
        }
    }

    if config.comment.enabled && !config.comments_enabled() {
        warnings.push(
            "comment.enabled is set but the provider or its settings are missing".to_string(),
        );
    }

    if config.search.enabled && !config.search_enabled() {
        warnings.push("search.enabled is set but no search.provider is configured".to_string());
    }

    warnings
}

/// Parse every content file, recording failures as errors.
fn validate_content_files(dir: &Path, config: Option<&Config>, result: &mut ValidationResult) {
    let collector = config.map(|cfg| ContentCollector::new(cfg, dir));
    let registry = ParserRegistry::new();
    let mut checked = 0;
    let mut failed = 0;

    for entry in walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        let is_content = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ContentType::from_extension)
            .is_some();
        if !is_content {
            continue;
        }

        checked += 1;

        let outcome = match &collector {
            Some(collector) => collector.parse_file(path).map(drop).map_err(|e| e.to_string()),
            None => std::fs::read_to_string(path)
                .map_err(|e| format!("Failed to read file: {e}"))
                .and_then(|source| {
                    registry
                        .parse(&source, path)
                        .map(drop)
                        .map_err(|e| format!("Parse error: {e}"))
                }),
        };

        if let Err(e) = outcome {
            result.add_error(format!("{}: {e}", path.display()));
            failed += 1;
        }
    }

    if failed == 0 {
        println!("  ✓ All {checked} content files valid");
    } else {
        println!("  ✗ {failed}/{checked} content files have errors");
    }
}
