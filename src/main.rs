//! CRUD API server entry point.

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crud_api::api::{build_app, serve, API_PREFIX};
use crud_api::config::Config;
use crud_api::metrics;
use crud_api::model::ResourceKind;

/// In-memory CRUD REST services for health records and users.
#[derive(Parser, Debug)]
#[command(name = "crud-api")]
#[command(about = "In-memory CRUD REST API for health records or users")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve one resource (default).
    Serve {
        /// Resource to serve: records or users (overrides RESOURCE).
        #[arg(short, long)]
        resource: Option<ResourceKind>,

        /// HTTP server port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Serve health records at /api/v1/records.
    Records {
        /// HTTP server port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Serve users at /api/v1/users.
    Users {
        /// HTTP server port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let mut config = Config::load()?;
    if args.verbose {
        config.verbose = true;
    }

    // Initialize logging
    init_tracing(&config);

    // Handle subcommands
    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(config),
        Some(Command::Serve { resource, port }) => {
            if let Some(resource) = resource {
                config.resource = resource;
            }
            cmd_serve(config, port.or(args.port)).await
        }
        Some(Command::Records { port }) => {
            config.resource = ResourceKind::Records;
            cmd_serve(config, port.or(args.port)).await
        }
        Some(Command::Users { port }) => {
            config.resource = ResourceKind::Users;
            cmd_serve(config, port.or(args.port)).await
        }
        None => cmd_serve(config, args.port).await,
    }
}

fn init_tracing(config: &Config) {
    let filter = if config.verbose {
        EnvFilter::new("crud_api=debug,tower_http=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.rust_log))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if config.log_json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Check configuration validity.
fn cmd_check_config(config: Config) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("CRUD API - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Resource: {} ({}/{})", config.resource, API_PREFIX, config.resource);
    println!("  Listen: {}:{}", config.host, config.port);
    println!("  Seed data: {}", config.seed);
    println!("  Envelope: {}", config.envelope_enabled());
    println!("  CORS: {}", if config.cors_enabled() { "Permissive" } else { "Disabled" });
    println!("  Metrics: {}", if config.metrics { "Enabled" } else { "Disabled" });
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Run the HTTP server until a shutdown signal arrives.
async fn cmd_serve(mut config: Config, port_override: Option<u16>) -> anyhow::Result<()> {
    if let Some(port) = port_override {
        config.port = port;
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(e.into());
    }

    let handle = if config.metrics {
        match metrics::install_prometheus() {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("Metrics disabled, recorder install failed: {}", e);
                None
            }
        }
    } else {
        None
    };

    let router = build_app(&config, handle);

    let addr = config.bind_addr()?;

    info!("========================================");
    info!("CRUD API STARTED");
    info!("========================================");
    info!("Resource: {}{}/{}", addr, API_PREFIX, config.resource);
    info!("Seed data: {}", config.seed);
    info!("Envelope: {}", config.envelope_enabled());
    info!("CORS: {}", config.cors_enabled());
    info!("========================================");

    serve(router, addr).await?;
    Ok(())
}
