use anyhow::Result;
use clap::{Parser, Subcommand};
use datedine_common::{logger, AppConfig};
use datedine_vector::MatchingEngine;
use std::path::PathBuf;
use std::sync::Arc;

/// Find project root by looking for .git directory
fn find_project_root() -> Option<PathBuf> {
    let mut current_dir = std::env::current_dir().ok()?;

    loop {
        if current_dir.join(".git").exists() {
            return Some(current_dir);
        }

        if !current_dir.pop() {
            break;
        }
    }

    None
}

/// Load .env file from project root
fn load_dotenv_from_project_root() {
    if let Some(root) = find_project_root() {
        let env_path = root.join(".env");
        if env_path.exists() {
            dotenv::from_path(&env_path).ok();
        }
    } else {
        dotenv::dotenv().ok();
    }
}

#[derive(Parser)]
#[command(name = "datedine")]
#[command(about = "DateDine - match a date-night vibe to restaurants", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the matching engine and start the HTTP server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long)]
        port: Option<u16>,

        /// Restaurant catalog CSV
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Print the restaurants that best match a vibe
    Match {
        /// Free-text vibe, e.g. "romantic rooftop with Italian food"
        query: String,

        /// Number of matches
        #[arg(short, long)]
        k: Option<usize>,

        /// Restaurant catalog CSV
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Build the engine and print what it was built from
    Stats {
        /// Restaurant catalog CSV
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

/// CLI flags win over .env by going through the same environment variables
fn apply_overrides(host: Option<&str>, port: Option<u16>, catalog: Option<&PathBuf>) {
    if let Some(host) = host {
        std::env::set_var("SERVER_HOST", host);
    }
    if let Some(port) = port {
        std::env::set_var("SERVER_PORT", port.to_string());
    }
    if let Some(catalog) = catalog {
        std::env::set_var("CATALOG_PATH", catalog);
    }
}

async fn serve(config: AppConfig) -> Result<()> {
    logger::setup_logging(&config.log_dir, &config.log_level)?;

    tracing::info!("DateDine starting...");
    tracing::info!("  Catalog: {}", config.catalog_path.display());
    tracing::info!("  Encoder: {} ({})", config.embedding_backend, config.embedding_model);
    tracing::info!("  Bind: {}", config.server_bind_address());

    // Startup failures (catalog, encoder, index) abort before anything is served
    let engine = Arc::new(MatchingEngine::from_config(&config).await?);

    println!("Server listening on http://{}", config.server_bind_address());
    datedine_server::start_server(config, engine).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    load_dotenv_from_project_root();

    match cli.command {
        Some(Commands::Serve { host, port, catalog }) => {
            apply_overrides(host.as_deref(), port, catalog.as_ref());
            serve(AppConfig::from_env()?).await?;
        }
        Some(Commands::Match {
            query,
            k,
            catalog,
            json,
        }) => {
            apply_overrides(None, None, catalog.as_ref());
            let config = AppConfig::from_env()?;
            logger::setup_console_logging(&config.log_level)?;

            let engine = MatchingEngine::from_config(&config).await?;
            let result = engine
                .find_matches(&query, k.unwrap_or(config.default_top_k))
                .await?;
            let recommendations = result.to_recommendations();

            if json {
                println!("{}", serde_json::to_string_pretty(&recommendations)?);
            } else {
                println!("Top matches for \"{}\":", result.query);
                for recommendation in &recommendations {
                    println!("  {}", recommendation.display_line());
                }
            }
        }
        Some(Commands::Stats { catalog }) => {
            apply_overrides(None, None, catalog.as_ref());
            let config = AppConfig::from_env()?;
            logger::setup_console_logging(&config.log_level)?;

            let engine = MatchingEngine::from_config(&config).await?;
            println!("{}", serde_json::to_string_pretty(engine.stats())?);
        }
        None => {
            serve(AppConfig::from_env()?).await?;
        }
    }

    Ok(())
}
