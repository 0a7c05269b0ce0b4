// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use subtrans::app_config::{Config, ConfigOverrides, LogLevel};
use subtrans::app_controller::Controller;
use subtrans::media::{self, FixedTrack, InteractiveSelector, TrackSelector};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate one subtitle track (default command)
    Translate(TranslateArgs),

    /// List the subtitle tracks of a media file
    Tracks {
        /// Media file to inspect
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,
    },

    /// Generate shell completions for subtrans
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Settings that override the configuration file
#[derive(Args, Debug, Clone)]
struct SettingsArgs {
    /// Translation provider (only "gemini" is supported)
    #[arg(long, env = "PROVIDER")]
    provider: Option<String>,

    /// API key for the provider
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Target language, used verbatim in the prompt and the output filename
    #[arg(short, long, env = "LANGUAGE")]
    language: Option<String>,

    /// Number of subtitle entries sent per request
    #[arg(short, long, env = "BATCH_SIZE")]
    batch_size: Option<usize>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Maximum requests per minute (0 disables pacing)
    #[arg(long)]
    rate_limit: Option<u32>,

    /// Attempts per batch before giving up
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

impl SettingsArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            provider: self.provider.clone(),
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            target_language: self.language.clone(),
            batch_size: self.batch_size,
            timeout_secs: self.timeout_secs,
            rate_limit: self.rate_limit,
            max_attempts: self.max_attempts,
            log_level: self.log_level.map(Into::into),
        }
    }
}

#[derive(Args, Debug)]
struct TranslateArgs {
    /// Media file or .srt file to translate
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Stream index of the subtitle track; prompts when omitted
    #[arg(short, long)]
    track: Option<usize>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    #[command(flatten)]
    settings: SettingsArgs,
}

/// subtrans - translate a subtitle track with a generative text service
///
/// Extracts one subtitle track from a media container, translates it in
/// batches and writes `<name>_<language>.srt` next to the input.
#[derive(Parser, Debug)]
#[command(name = "subtrans")]
#[command(version)]
#[command(about = "Translate a subtitle track with a generative text service")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "subtrans extracts a subtitle track from a media file and translates it with Gemini.

EXAMPLES:
    subtrans movie.mkv                          # Pick a track interactively
    subtrans -t 3 -l Spanish movie.mkv          # Translate stream 3 to Spanish
    subtrans -f -b 25 episode.srt               # Translate an .srt file, overwrite output
    subtrans tracks movie.mkv                   # List subtitle tracks
    subtrans completions bash > subtrans.bash   # Generate bash completions

CONFIGURATION:
    Settings are read from conf.json (if present), then from the environment
    (PROVIDER, API_KEY, LANGUAGE, BATCH_SIZE), then from the command line.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Media file or .srt file to translate
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Stream index of the subtitle track; prompts when omitted
    #[arg(short, long)]
    track: Option<usize>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    #[command(flatten)]
    settings: SettingsArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger { level: LevelFilter::Trace }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and tag for a log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, tag) = Self::style_for_level(record.level());
            let _ = writeln!(std::io::stderr(), "{}{} {} {}\x1B[0m", color, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The level is refined once the configuration is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subtrans", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Tracks { input_path }) => list_tracks(input_path).await,
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => {
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;

            run_translate(TranslateArgs {
                input_path,
                track: cli.track,
                force_overwrite: cli.force_overwrite,
                settings: cli.settings,
            })
            .await
        }
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    if let Some(level) = options.settings.log_level {
        log::set_max_level(LogLevel::from(level).to_level_filter());
    }

    let mut config = Config::load(&options.settings.config_path)?;
    if !options.settings.config_path.exists() {
        info!(
            "No config file at {}, using defaults and environment",
            options.settings.config_path.display()
        );
    }
    config.apply_overrides(options.settings.overrides())?;
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)?;

    let selector: Box<dyn TrackSelector> = match options.track {
        Some(index) => Box::new(FixedTrack(index)),
        None => Box::new(InteractiveSelector),
    };

    match controller
        .run(&options.input_path, selector.as_ref(), options.force_overwrite)
        .await?
    {
        Some(path) => println!("{}", path.display()),
        None => warn!("Nothing written"),
    }

    Ok(())
}

async fn list_tracks(input_path: PathBuf) -> Result<()> {
    let tracks = media::list_subtitle_tracks(&input_path).await?;
    if tracks.is_empty() {
        println!("No subtitle tracks found");
        return Ok(());
    }

    println!("Subtitle tracks in {}:", input_path.display());
    println!("{}", "-".repeat(50));
    for track in &tracks {
        let note = if track.is_bitmap() { " (bitmap, not translatable)" } else { "" };
        println!("stream {}: {}{}", track.index, track, note);
    }

    Ok(())
}
