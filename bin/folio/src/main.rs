//! Folio CLI
//!
//! Static site generator for a personal blog written in Markdown and MDX.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use folio::cmd::new::PostFormat;

/// Command-line interface for Folio.
#[derive(Parser)]
#[command(name = "folio", version, about = "A static site generator for a personal blog")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Build the static site
    Build {
        /// Output directory (defaults to build.output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Include draft posts
        #[arg(long)]
        drafts: bool,
        /// Override site base URL (e.g., https://example.com)
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Start development server with live reload
    Watch {
        /// Port to listen on
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
        /// Open browser automatically
        #[arg(long)]
        open: bool,
    },
    /// Create a new draft post
    New {
        /// Path under content/posts (e.g., my-article)
        path: PathBuf,
        /// Source format
        #[arg(short, long, value_enum, default_value_t = PostFormat::Md)]
        format: PostFormat,
    },
    /// Validate configuration and content
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    folio::init_tracing(cli.verbose);

    match cli.command {
        Commands::Build {
            output,
            drafts,
            base_url,
        } => {
            folio::cmd::build::run(&cli.config, output.as_deref(), drafts, base_url.as_deref())?;
        }
        Commands::Watch { port, open } => {
            folio::cmd::watch::run(&cli.config, port, open).await?;
        }
        Commands::New { path, format } => {
            folio::cmd::new::run(&cli.config, &path, format)?;
        }
        Commands::Check { strict } => {
            folio::cmd::check::run(&cli.config, strict)?;
        }
    }

    Ok(())
}
