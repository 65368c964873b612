use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use steam_market_sheet::config::{Settings, DEFAULT_CONFIG_PATH};
use steam_market_sheet::market_data::{self, HttpTransport};
use steam_market_sheet::sheet;

/// Record Steam Community Market prices for the configured items into a spreadsheet
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// INI file with an [API] section
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Exit without waiting for ENTER
    #[arg(long)]
    no_wait: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

fn wait_for_enter(no_wait: bool) {
    if no_wait {
        return;
    }
    print!("Press ENTER to exit");
    // Nothing useful to do if the console is gone
    let _ = io::stdout().flush();
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
}

fn run(settings: &Settings) -> anyhow::Result<()> {
    sheet::ensure_file_exists(&settings.file_name)?;

    let transport = HttpTransport::new(settings.timeout);
    let results = market_data::collect_all(&transport, settings);

    if let Some(rows) = sheet::write(&settings.file_name, &results, settings.offset) {
        info!("Wrote {} rows to {}", rows, settings.file_name.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging();

    let settings = match Settings::from_file(&args.config) {
        Ok(settings) => settings,
        Err(err) => {
            error!("{}", err);
            wait_for_enter(args.no_wait);
            return ExitCode::from(1);
        }
    };
    info!(
        "Loaded {} items from {}, starting at offset {}",
        settings.items.item_count(),
        args.config.display(),
        settings.offset
    );

    if let Err(err) = run(&settings) {
        error!("Error: {:#}", err);
    }

    wait_for_enter(args.no_wait);
    ExitCode::SUCCESS
}
