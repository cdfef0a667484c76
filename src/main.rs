//! API service entry point.

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use api_projects::api;
use api_projects::config::{Config, VERBOSE_LOG_DIRECTIVES};
use api_projects::server;
use api_projects::ApiError;

/// HTTP API answering with uniform JSON envelopes.
#[derive(Parser, Debug)]
#[command(name = "api-projects")]
#[command(about = "HTTP API answering with uniform JSON response envelopes")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API (default).
    Serve {
        /// Interface to bind (overrides HOST).
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Print the OpenAPI document as JSON.
    Openapi,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Filter comes from RUST_LOG / VERBOSE when the environment parses
    let directives = match Config::load() {
        Ok(config) => config.log_directives(args.verbose).to_string(),
        Err(_) if args.verbose => VERBOSE_LOG_DIRECTIVES.to_string(),
        Err(_) => "info".to_string(),
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::new(directives))
        .init();

    match args.command {
        Some(Command::Serve { host, port }) => cmd_serve(host, port).await,
        Some(Command::CheckConfig) => cmd_check_config(),
        Some(Command::Openapi) => cmd_openapi(),
        None => cmd_serve(None, None).await,
    }
}

/// Serve the HTTP API until a shutdown signal arrives.
async fn cmd_serve(host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    info!("Loading configuration...");
    let mut config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    config.validate().map_err(ApiError::InvalidConfig)?;

    server::run(config).await?;
    Ok(())
}

/// Check configuration validity.
fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("API SERVICE - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    print!("Checking run id... ");
    match config.run_id_path.as_deref() {
        Some(path) => match api::context::read_run_id(path) {
            Ok(run_id) => {
                println!("OK");
                println!("  Run id: {}", run_id);
            }
            Err(e) => {
                println!("FAILED");
                println!("  Error: {}", e);
                return Err(anyhow::anyhow!("Run id check failed"));
            }
        },
        None => println!("SKIPPED (RUN_ID_PATH not set)"),
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Title: {} v{}", config.app_title, config.app_version);
    println!("  Bind Address: {}", config.bind_addr());
    println!(
        "  Metrics: {}",
        match config.metrics_port {
            Some(port) => format!("Prometheus on port {}", port),
            None => "Disabled".to_string(),
        }
    );
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Print the OpenAPI document.
fn cmd_openapi() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    println!("{}", api::openapi_json(&config)?);
    Ok(())
}
