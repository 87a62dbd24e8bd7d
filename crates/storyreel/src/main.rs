//! Storyreel CLI binary.
//!
//! - `generate` turns a scene catalog into one video per scene
//! - `interpolate` turns a scene manifest into transition clips

use anyhow::Result;
use clap::Parser;
use storyreel::LoggingConfig;

mod cli;

#[tokio::main]
async fn main() -> Result<()> {
    use cli::{Cli, Commands, load_config, run_generate, run_interpolate, shutdown_on_ctrl_c};

    // Load environment variables from .env file
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let logging = LoggingConfig::new(cli.verbose, cli.json_logs);

    #[cfg(not(feature = "observability"))]
    storyreel::init_logging(&logging).map_err(|e| anyhow::anyhow!(e))?;
    #[cfg(feature = "observability")]
    let tracer_provider = storyreel::observability::init_observability("storyreel", &logging)
        .map_err(|e| anyhow::anyhow!(e))?;

    let config = load_config(cli.config.as_deref())?;
    let shutdown = shutdown_on_ctrl_c();

    let result = match cli.command {
        Commands::Generate {
            scenes,
            story,
            out,
            no_continuity,
        } => {
            let continuity = config.generation.continuity && !no_continuity;
            run_generate(&config, &scenes, &story, &out, continuity, shutdown).await
        }
        Commands::Interpolate {
            videos,
            out,
            from,
            to,
        } => {
            let pair = from.zip(to);
            run_interpolate(&config, &videos, &out, pair, shutdown).await
        }
    };

    #[cfg(feature = "observability")]
    storyreel::observability::shutdown_observability(&tracer_provider);

    result?;
    Ok(())
}
