//! CLI entry point for postroll

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "postroll")]
#[command(version)]
#[command(about = "Load, validate and list front-matter markdown posts", long_about = None)]
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
    /// List posts, tags or categories
    #[command(alias = "ls")]
    List {
        /// Type of content to list (post, tag, category)
        #[arg(default_value = "post")]
        r#type: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Validate every post and report all problems
    Check,

    /// Print a single post
    Show {
        /// Slug of the post
        slug: String,

        /// Only print the excerpt
        #[arg(short, long)]
        excerpt: bool,

        /// Render markdown to HTML
        #[arg(long)]
        html: bool,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Category for the post (repeatable)
        #[arg(short = 'C', long = "category")]
        categories: Vec<String>,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "postroll=debug,info"
    } else {
        "postroll=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::List { r#type, json } => {
            let blog = postroll::Blog::new(&base_dir)?;
            postroll::commands::list::run(&blog, &r#type, json)?;
        }

        Commands::Check => {
            let blog = postroll::Blog::new(&base_dir)?;
            postroll::commands::check::run(&blog)?;
        }

        Commands::Show {
            slug,
            excerpt,
            html,
        } => {
            let blog = postroll::Blog::new(&base_dir)?;
            postroll::commands::show::run(&blog, &slug, excerpt, html)?;
        }

        Commands::New { title, categories } => {
            let blog = postroll::Blog::new(&base_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            let path = postroll::commands::new::run(&blog, &title, &categories)?;
            println!("Created: {:?}", path);
        }

        Commands::Version => {
            println!("postroll version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
