use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clima_agent::cli::{Cli, Commands};
use clima_agent::config::ClimaConfig;
use clima_agent::handlers::{self, CommandContext};

/// Initialize tracing with the given verbosity level
///
/// - 0: warn (default)
/// - 1: info (-v)
/// - 2: debug (-vv)
/// - 3+: trace (-vvv)
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    // Allow RUST_LOG to override if set
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string()));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI first to get verbosity before initializing tracing
    let cli = Cli::parse();

    // The server logs requests at info by default
    #[cfg(feature = "web")]
    let verbosity = match cli.command {
        Commands::Serve { .. } => cli.verbose.max(1),
        _ => cli.verbose,
    };
    #[cfg(not(feature = "web"))]
    let verbosity = cli.verbose;
    init_tracing(verbosity);

    let file_config = match &cli.config {
        Some(path) => ClimaConfig::load_from_path(path)?,
        None => ClimaConfig::load()?,
    };
    let ctx = CommandContext::new(cli.llm_url, cli.proxy_url, cli.verbose, file_config);

    match cli.command {
        #[cfg(feature = "web")]
        Commands::Serve {
            port,
            generate_url,
            model,
        } => handlers::run_web(&ctx, port, generate_url, model).await,
        Commands::Chat { message, agent } => handlers::chat(&ctx, &message, agent).await,
        Commands::Interactive { agent } => handlers::interactive(&ctx, agent).await,
        Commands::Models => handlers::models(&ctx).await,
        Commands::Health => handlers::run_health(&ctx).await,
        Commands::Generate {
            prompt,
            model,
            temperature,
            num_predict,
        } => handlers::generate(&ctx, &prompt, model, temperature, num_predict).await,
    }
}
