//! Vitrine CLI
//!
//! Query relay, SVG proxy and content inspection for Vitrine sites.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for Vitrine.
#[derive(Parser)]
#[command(
    name = "vitrine",
    version,
    about = "Content relay and settings tooling for headless-CMS sites"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "vitrine.toml")]
    config: std::path::PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Serve the query relay and SVG proxy
    Serve {
        /// Port to listen on (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Run a GROQ query and print the response
    Query {
        /// Query text
        groq: String,
        /// Query parameter as name=value (repeatable)
        #[arg(short = 'p', long = "param")]
        params: Vec<String>,
        /// Go through the query relay instead of the backend
        #[arg(long)]
        relay: bool,
    },
    /// Print site settings with defaults applied
    Settings {
        /// Go through the query relay instead of the backend
        #[arg(long)]
        relay: bool,
        /// Also print favicon and analytics head tags
        #[arg(long)]
        head: bool,
    },
    /// Print page settings for a route path
    Page {
        /// Route path (e.g., / or /about)
        path: String,
        /// Go through the query relay instead of the backend
        #[arg(long)]
        relay: bool,
    },
    /// Resolve an asset reference to a CDN URL
    Asset {
        /// Asset JSON or a plain URL
        input: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    vitrine::init_tracing(cli.verbose);

    match cli.command {
        Commands::Serve { port } => {
            vitrine::cmd::serve::run(&cli.config, port).await?;
        }
        Commands::Query {
            groq,
            params,
            relay,
        } => {
            vitrine::cmd::query::run(&cli.config, &groq, &params, relay).await?;
        }
        Commands::Settings { relay, head } => {
            vitrine::cmd::settings::run(&cli.config, relay, head).await?;
        }
        Commands::Page { path, relay } => {
            vitrine::cmd::page::run(&cli.config, &path, relay).await?;
        }
        Commands::Asset { input } => {
            vitrine::cmd::asset::run(&cli.config, &input)?;
        }
    }

    Ok(())
}
