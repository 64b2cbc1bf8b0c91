use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// The command to execute
    #[command(subcommand)]
    command: ScribeCommand,
}

#[derive(Parser)]
struct InitArgs {
    /// The path to initialize the blog in
    path: PathBuf,

    /// Whether to create the directory if it doesn't exist
    #[arg(short, long, default_value = "false")]
    create: bool,
}

#[derive(Parser)]
struct BuildArgs {
    /// The path to the configuration file
    #[arg(short, long, default_value = "scribe.yaml")]
    config_file: Option<PathBuf>,
}

#[derive(Parser)]
struct CleanArgs {
    /// The path to the configuration file
    #[arg(short, long, default_value = "scribe.yaml")]
    config_file: Option<PathBuf>,

    /// Only print what would be deleted
    #[arg(short, long, default_value = "false")]
    dry_run: bool,
}

#[derive(Parser)]
struct MigrateArgs {
    /// Base URL of the WordPress site, e.g. https://blog.example.com
    url: String,

    /// Directory the Markdown posts are written to
    dest: PathBuf,
}

#[derive(Parser)]
struct RenderArgs {
    /// The Markdown file to render
    file: PathBuf,

    /// Strip a YAML front matter header before rendering
    #[arg(long, default_value = "false")]
    front_matter: bool,

    /// Disable tables, strikethrough, task lists and autolinks
    #[arg(long)]
    no_gfm: bool,

    /// Disable the generated table of contents
    #[arg(long)]
    no_toc: bool,

    /// Disable :shortcode: emoji
    #[arg(long)]
    no_emoji: bool,

    /// Disable heading ids
    #[arg(long)]
    no_slug: bool,

    /// Disable syntax highlighting
    #[arg(long)]
    no_highlight: bool,

    /// Syntax highlighting theme
    #[arg(long, default_value = "github-dark")]
    theme: String,
}

#[derive(Subcommand)]
enum ScribeCommand {
    /// Initialize a new blog
    Init(InitArgs),

    /// Build the blog into a static site
    Build(BuildArgs),

    /// Delete the generated site
    Clean(CleanArgs),

    /// Import posts from a WordPress site
    Migrate(MigrateArgs),

    /// Render a single Markdown file to stdout
    Render(RenderArgs),
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let filter = EnvFilter::try_from_env("SCRIBE_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        ScribeCommand::Init(args) => {
            commands::init::run(&args).await?;
        }
        ScribeCommand::Build(args) => {
            commands::build::run(&args).await?;
        }
        ScribeCommand::Clean(args) => {
            commands::clean::run(&args).await?;
        }
        ScribeCommand::Migrate(args) => {
            commands::migrate::run(&args).await?;
        }
        ScribeCommand::Render(args) => {
            commands::render::run(&args).await?;
        }
    }

    Ok(())
}
