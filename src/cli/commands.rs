//! Handlers for the capture run, list-cameras and config actions.

use std::path::{Path, PathBuf};

use super::args::{Args, ConfigAction};
use crate::config::{self, Config, ConfigError, DEFAULT_CONFIG_TEMPLATE};
use crate::pipeline::{self, PipelineError, RunOutcome};
use crate::rayci::{RayCiClient, RpcError};
use crate::session;

/// Top-level error of a command; printed by `main` before exiting with 1.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("RayCi request failed: {0}")]
    Device(#[from] RpcError),

    #[error("Config file already exists: {}\nUse 'rayci-snap config show' to view current settings.", .0.display())]
    ConfigExists(PathBuf),

    #[error("Failed to write config file '{}': {source}", .path.display())]
    ConfigWrite {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Connect to the server named on the command line or in the config.
pub fn connect(args: &Args, config: &Config) -> Result<RayCiClient, RpcError> {
    let url = args
        .server
        .clone()
        .unwrap_or_else(|| config.server.url.clone());
    log::debug!("Using RayCi server at {}", url);
    RayCiClient::with_timeout(url, config.server.timeout())
}

/// Configure the camera and take the snapshot.
pub async fn run_capture(args: &Args, config: &Config) -> Result<RunOutcome, AppError> {
    let request = args.capture_request();
    let client = connect(args, config)?;
    Ok(pipeline::run(&client, &request, config).await?)
}

/// List available cameras and print them to stdout.
pub async fn list_cameras(args: &Args, config: &Config) -> Result<(), AppError> {
    let client = connect(args, config)?;
    let cameras = session::list_cameras(&client).await?;

    if cameras.is_empty() {
        println!("No cameras found.");
        println!();
        println!("Make sure your camera is connected and RayCi is running.");
    } else {
        println!("Available cameras:");
        for (index, camera) in cameras.iter().enumerate() {
            println!("  [{}] {}", index, camera);
        }
    }
    Ok(())
}

/// Handle config subcommand actions.
pub fn handle_config_action(
    action: &ConfigAction,
    config_path: Option<&Path>,
    config: &Config,
) -> Result<(), AppError> {
    let config_path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(config::default_path);

    match action {
        ConfigAction::Show => {
            println!("Current configuration:");
            println!("  Server: {}", config.server.url);
            match config.server.timeout_secs {
                Some(secs) => println!("  Timeout: {}s", secs),
                None => println!("  Timeout: none"),
            }
            println!(
                "  Default directory: {}",
                config.capture.default_directory.display()
            );
            println!(
                "  Histogram export: {}x{} ({})",
                config.histogram.width, config.histogram.height, config.histogram.palette
            );
            println!();

            if config_path.exists() {
                println!("Config file: {} (exists)", config_path.display());
            } else {
                println!("Config file: {} (not found)", config_path.display());
            }
            Ok(())
        }
        ConfigAction::Init => {
            init_config_file(&config_path)?;
            println!("Created config file: {}", config_path.display());
            Ok(())
        }
    }
}

/// Write the default config file, refusing to overwrite an existing one.
fn init_config_file(path: &Path) -> Result<(), AppError> {
    if path.exists() {
        return Err(AppError::ConfigExists(path.to_path_buf()));
    }

    let write_error = |source: std::io::Error| AppError::ConfigWrite {
        path: path.to_path_buf(),
        source,
    };

    // Create parent directories if needed
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }
    std::fs::write(path, DEFAULT_CONFIG_TEMPLATE).map_err(write_error)
}
