use clap::{Parser, ValueEnum};
use jukebox::core::config;
use jukebox::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    #[default]
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Parser)]
#[command(name = "jukebox", about = "Remote control for a home media player")]
struct Args {
    /// Media server base URL, e.g. http://192.168.1.20:8000
    #[arg(short, long)]
    base_url: Option<String>,

    /// Verbosity of jukebox.log
    #[arg(long, default_value_t, value_enum)]
    log_level: LogLevel,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to jukebox.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("jukebox.log") {
        let _ = WriteLogger::init(args.log_level.into(), log_config, log_file);
    }

    let file_config = config::load_config().map_err(std::io::Error::other)?;
    let resolved = config::resolve(&file_config, args.base_url.as_deref());

    log::info!("Jukebox starting up against {}", resolved.base_url);

    tui::run(resolved)
}
