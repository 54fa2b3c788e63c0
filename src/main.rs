use std::fs::{self, File};
use std::path::PathBuf;

use checklist::cli::commands::Cli;
use checklist::cli::handlers;
use checklist::io::config_io;
use clap::Parser;
use log::{LevelFilter, info};

fn main() {
    let cli = Cli::parse();
    let tui_mode = cli.command.is_none();
    setup_logging(cli.verbose, tui_mode);

    let config = match config_io::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let result = if tui_mode {
        // No subcommand → launch TUI
        checklist::tui::run(cli.file.as_deref(), &config)
    } else {
        handlers::dispatch(cli, &config)
    };
    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins; otherwise warnings, or debug with `-v`. The TUI owns the
/// terminal, so in TUI mode log lines go to `<data dir>/checklist/checklist.log`.
fn setup_logging(verbose: bool, tui_mode: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default));

    if tui_mode {
        match open_log_file() {
            Some(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            None => {
                builder.filter_level(LevelFilter::Off);
            }
        }
    }

    if builder.try_init().is_ok() {
        info!("logging initialized (verbose: {})", verbose);
    }
}

fn open_log_file() -> Option<File> {
    let dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("checklist");
    fs::create_dir_all(&dir).ok()?;
    File::create(dir.join("checklist.log")).ok()
}
