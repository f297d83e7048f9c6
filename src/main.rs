use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use homelink::api::{ApiServer, ApiState};
use homelink::dispatch::DeviceDispatcher;
use homelink::llm::GeminiModel;
use homelink::stt::WhisperTranscriber;
use homelink::stt::whisper::WhisperEngine;
use homelink::Config;

/// Homelink - voice-command relay for smart home device control
#[derive(Parser)]
#[command(name = "homelink", version, about)]
struct Cli {
    /// Port to listen on
    #[arg(long, env = "HOMELINK_PORT", default_value = "5000")]
    port: u16,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,homelink=info",
        1 => "info,homelink=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    tracing::info!(port = cli.port, "starting homelink relay");

    // Load and validate configuration up front; requests assume it is sound
    let config = Config::load()?;
    tracing::debug!(
        controller = %config.controller_url(),
        gemini_model = %config.gemini_model,
        whisper_model = %config.whisper_model.display(),
        "loaded configuration"
    );

    // The Whisper context is the only cross-request state: loaded once here,
    // read-only thereafter
    let engine = WhisperEngine::load(
        &config.whisper_model,
        config.stt_language.clone(),
        config.stt_threads,
    )?;
    let transcriber = WhisperTranscriber::new(Arc::new(engine));

    let model = GeminiModel::new(config.gemini_api_key.clone(), config.gemini_model.clone())?;
    let dispatcher = DeviceDispatcher::new(config.controller_url())?;

    let state = Arc::new(ApiState::new(
        Arc::new(transcriber),
        Arc::new(model),
        dispatcher,
    ));

    tracing::info!("homelink relay ready");

    ApiServer::new(state, cli.port).run().await?;

    Ok(())
}
