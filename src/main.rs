use rayci_snap::cli::{self, Args, Command};
use rayci_snap::config::Config;

/// Initialize env_logger; RUST_LOG overrides the default level.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

/// Load the config file.
/// If --config is specified the file must exist; otherwise a missing default
/// file falls back to built-in defaults.
fn load_config(args: &Args) -> Result<Config, cli::AppError> {
    let config = match args.config.as_deref() {
        Some(path) => Config::load_from_explicit(path)?,
        None => Config::load(None)?,
    };
    Ok(config)
}

async fn dispatch(args: &Args) -> Result<(), cli::AppError> {
    let config = load_config(args)?;

    match &args.command {
        Some(Command::ListCameras) => cli::list_cameras(args, &config).await,
        Some(Command::Config { action }) => {
            cli::handle_config_action(action, args.config.as_deref(), &config)
        }
        None => cli::run_capture(args, &config).await.map(|_| ()),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse_with_legacy_flags();
    init_logging(args.verbose);

    if let Err(e) = dispatch(&args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
