use clap::Parser;
use price_pulse::cli::{Cli, Commands};
use price_pulse::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
            eprintln!("Using default configuration");
            Config::parse(include_str!("../config.toml.example"))?
        }
    };

    price_pulse::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Run(args) => {
            tracing::info!("Starting live dashboard");
            args.execute(&config).await?;
        }
        Commands::Replay(args) => {
            tracing::info!(file = %args.file.display(), "Starting replay");
            args.execute(&config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!("  Feed: {}", config.feed.endpoint);
            println!("  Assets: {}", config.feed.assets.join(", "));
            println!(
                "  Reconnect: max_attempts={}, delay={}ms..{}ms",
                config.feed.max_reconnect_attempts,
                config.feed.initial_reconnect_delay_ms,
                config.feed.max_reconnect_delay_ms
            );
            println!("  History: {:?}", config.history.policy());
            println!(
                "  Selected: {}",
                config
                    .dashboard
                    .selected
                    .as_deref()
                    .unwrap_or(&config.feed.assets[0])
            );
            println!(
                "  Telemetry: level={}, format={:?}, metrics_port={:?}",
                config.telemetry.log_level,
                config.telemetry.log_format,
                config.telemetry.metrics_port
            );
        }
    }

    Ok(())
}
