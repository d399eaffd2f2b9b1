//! Terminal front-end for the servicedesk admin grids.

mod config;
mod error;
mod paths;
mod presets;
mod render;
mod repl;

use std::error::Error as _;
use std::fs;
use std::fs::File;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use log::info;
use servicedesk_lib::grid::GridRuntime;
use servicedesk_lib::grid::GridState;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::WriteLogger;

use crate::config::Cli;
use crate::config::FileConfig;
use crate::config::Settings;
use crate::error::CliError;
use crate::presets::Preset;
use crate::render::TerminalRenderer;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    paths::rotate_logs();
    let Some(path) = paths::log_file() else {
        return;
    };
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }
    match File::create(&path) {
        Ok(file) => {
            let _ = WriteLogger::init(level, Config::default(), file);
        }
        Err(e) => eprintln!("Warning: cannot write log file {}: {}", path.display(), e),
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let file = FileConfig::load(cli.config.as_deref())?;
    let settings = Settings::resolve(&cli, file)?;
    let preset = Preset::for_resource(settings.resource)?;
    info!("Browsing {} at {}", preset.path, settings.url);

    let client = settings.client();
    let options = preset
        .options()
        .with_step(settings.step)
        .with_locale(settings.locale.clone())
        .with_sort_locally(settings.local_sort);
    let state = GridState::new(preset.columns.clone(), options)?;
    let renderer = TerminalRenderer::stdout(Some(preset.href), preset.empty_text);

    let (grid, task) = GridRuntime::spawn(state, Arc::new(client.resource(preset.path)), Box::new(renderer));

    println!("{}", preset.title);
    grid.mount().await?;
    repl::run(&grid, preset.filters.clone(), settings.local_sort).await?;

    drop(grid);
    task.await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("Error: {e}");
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
