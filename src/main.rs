//! Camcorder CLI entry point

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use camcorder::cli::{
    app::{load_merged_config, record_options, run_record, SIMULATED_LATENCY},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
    profiles_cmd::handle_profiles_command,
    EXIT_ERROR, EXIT_USAGE_ERROR,
};
use camcorder::domain::config::{AppConfig, DEFAULT_LOG_LEVEL};
use camcorder::domain::recording::{OutputTarget, RecordingRequest};
use camcorder::infrastructure::{SimulatedCamera, XdgConfigStore};

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();
    let cli_config = cli.to_config();

    // Handle subcommands
    match cli.command {
        Some(Commands::Config { action }) => {
            init_logging(DEFAULT_LOG_LEVEL);
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        Some(Commands::Profiles { json }) => {
            let config = load_merged_config(cli_config).await;
            init_logging(config.log_level_or_default());
            let request = RecordingRequest::new(
                config.resolution_or_default(),
                config.frame_rate_or_default(),
                config.hdr_or_default(),
                config.codec_or_default(),
                OutputTarget {
                    preview_surface: String::new(),
                    encoder_surface: String::new(),
                    path: PathBuf::new(),
                },
            );
            let camera = SimulatedCamera::new().with_latency(SIMULATED_LATENCY);
            if let Err(e) = handle_profiles_command(&camera, &request, json, &presenter).await {
                presenter.error(&e.user_message());
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        None => {}
    }

    // Merge config
    let config: AppConfig = load_merged_config(cli_config).await;
    init_logging(config.log_level_or_default());

    let limit = match cli.limit() {
        Ok(limit) => limit,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    run_record(record_options(&config, limit, cli.zoom_steps)).await
}

/// Log to stderr; RUST_LOG wins over the configured level
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("camcorder={}", level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
