use clap::Parser;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

use studymate::core::config::{self, CliOverrides, StudyMateConfig};

#[derive(Parser)]
#[command(name = "studymate", about = "Ask questions about your PDF notes from the terminal")]
struct Args {
    /// Backend base URL (overrides config file and STUDYMATE_BACKEND_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Log level: error, warn, info, debug, trace
    #[arg(long)]
    log_level: Option<String>,

    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Pre-fill the login form with this username
    #[arg(short, long)]
    username: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Config is read before the logger exists; report failures once it does
    let (file_config, config_error) = match config::load_config() {
        Ok(c) => (c, None),
        Err(e) => (StudyMateConfig::default(), Some(e)),
    };
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            base_url: args.base_url,
            log_level: args.log_level,
            log_file: args.log_file,
            username: args.username,
        },
    );

    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create(&resolved.log_file) {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }

    if let Some(e) = config_error {
        log::warn!("Ignoring config file: {}", e);
    }
    log::info!("StudyMate starting up against {}", resolved.base_url);

    studymate::tui::run(resolved)
}
