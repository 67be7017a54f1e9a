//! dbsh binary entry point
//!
//! Loads config, applies CLI overrides, then runs the shell or a subcommand.

use clap::Parser;
use color_eyre::eyre::Result;
use dbsh::backend::{Backend, DryRunBackend};
use dbsh::{Args, Config, History, cli::Command, logging, prompt, repl};
use tracing::{info, warn};

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    args.apply_overrides(&mut config);
    config.validate()?;
    Ok(config)
}

fn load_history(config: &Config) -> History {
    let size = config.settings.history_size;
    if !config.settings.persist_history {
        return History::in_memory(size);
    }
    let Some(path) = History::default_path() else {
        warn!("no state directory, history will not be saved");
        return History::in_memory(size);
    };
    History::load(&path, size).unwrap_or_else(|e| {
        warn!("ignoring unreadable history: {e:#}");
        History::in_memory(size)
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install color-eyre for panic handling
    color_eyre::install()?;

    let args = Args::parse();
    let config = load_config(&args)?;

    if let Some(Command::Validate) = args.command {
        println!("dbsh {}\n", dbsh::version_string());
        let path = match &args.config {
            Some(path) => Some(path.clone()),
            None => Config::get_config_path().ok(),
        };
        config.print_summary(path.as_deref());
        return Ok(());
    }

    let _log_guard = logging::init(&config.settings.log_level);
    info!(version = %dbsh::version_string(), "starting dbsh");

    // Restore the terminal before color-eyre prints a panic report
    prompt::install_panic_hook();

    let target = args.target()?;
    if let Some(target) = &target {
        info!(%target, "connection target");
    }

    let mut history = load_history(&config);
    let mut backend = DryRunBackend::new(&args.connection_name(&config, target.as_ref()));
    info!(backend = backend.name(), format = %config.settings.format, "shell ready");

    repl::run(&config, &mut history, &mut backend, args.transaction).await
}
