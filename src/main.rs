//! CLI entry point for quill

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quill_rs::commands::list::ListKind;
use quill_rs::{Quill, RouteKind};

#[derive(Parser)]
#[command(name = "quill")]
#[command(version)]
#[command(about = "Index markdown posts and render them for a static blog", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the data files and sitemap
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Clean the public folder
    Clean,

    /// List site information
    List {
        /// Type of content to list
        #[arg(value_enum, default_value = "post")]
        r#type: ListKind,
    },

    /// Print a rendered post as JSON
    Show {
        /// Post id (file name without `.md`)
        id: String,
    },

    /// Print the static route params for a listing type
    Paths {
        #[arg(value_enum)]
        kind: RouteKind,
    },

    /// Print the sitemap
    Sitemap,

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "quill_rs=debug,info"
    } else {
        "quill_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("reading current directory")?,
    };

    match cli.command {
        Commands::Generate { watch } => {
            let quill = Quill::new(&base_dir)?;
            tracing::info!("Generating data files...");

            quill.generate()?;
            println!("Generated successfully!");

            if watch {
                quill_rs::commands::generate::watch(&quill)?;
            }
        }

        Commands::Clean => {
            let quill = Quill::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            quill.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type } => {
            let quill = Quill::new(&base_dir)?;
            quill_rs::commands::list::run(&quill, r#type)?;
        }

        Commands::Show { id } => {
            let quill = Quill::new(&base_dir)?;
            quill_rs::commands::show::run(&quill, &id)?;
        }

        Commands::Paths { kind } => {
            let quill = Quill::new(&base_dir)?;
            quill_rs::commands::paths::run(&quill, kind)?;
        }

        Commands::Sitemap => {
            let quill = Quill::new(&base_dir)?;
            tracing::debug!(
                "Sitemap content type: {}",
                quill_rs::sitemap::SITEMAP_CONTENT_TYPE
            );
            quill_rs::commands::sitemap::run(&quill)?;
        }

        Commands::Version => {
            println!("quill version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
