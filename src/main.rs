// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use chaptersplit::app_config::{self, Config, LibraryImporter};
use chaptersplit::{Controller, RunOptions, Workflow};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for LibraryImporter to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLibraryImporter {
    Beets,
}

impl From<CliLibraryImporter> for LibraryImporter {
    fn from(cli_importer: CliLibraryImporter) -> Self {
        match cli_importer {
            CliLibraryImporter::Beets => LibraryImporter::Beets,
        }
    }
}

/// Options shared by the splitting commands
#[derive(Args, Debug)]
struct SplitArgs {
    /// Remove the original audio directory after a clean split
    #[arg(short, long)]
    cleanup: bool,

    /// Import the split directory into a media library
    #[arg(short = 'i', long, value_enum)]
    import_to: Option<CliLibraryImporter>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read embedded chapter markers and write the chapter file
    Extract {
        /// Audiobook directories to process
        #[arg(value_name = "DIR", required = true)]
        dirs: Vec<PathBuf>,

        /// Continue with splitting after extraction
        #[arg(short, long)]
        process: bool,

        #[command(flatten)]
        split: SplitArgs,
    },

    /// Split audiobook directories using their chapter file
    Process {
        /// Audiobook directories to process
        #[arg(value_name = "DIR", required = true)]
        dirs: Vec<PathBuf>,

        #[command(flatten)]
        split: SplitArgs,
    },

    /// Generate shell completions for chaptersplit
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// chaptersplit - Split multi-file audiobooks into one file per chapter
#[derive(Parser, Debug)]
#[command(name = "chaptersplit")]
#[command(version)]
#[command(about = "Audiobook chapter extraction and splitting tool")]
#[command(long_about = "chaptersplit reconciles the chapter markers embedded in a multi-file audiobook
into a single chapter list, then cuts and retags one file per chapter.

EXAMPLES:
    chaptersplit extract /books/Title            # Write /books/Title/chapters.txt
    chaptersplit extract -p /books/Title         # Extract, then split into /books/Title_split
    chaptersplit process /books/A /books/B       # Split using existing chapters.txt files
    chaptersplit process -c -i beets /books/A    # Split, remove originals, import with beets
    chaptersplit completions bash > cs.bash      # Generate bash completions

CONFIGURATION:
    Configuration is stored in chaptersplit.json by default. You can specify a
    different file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(long, global = true, default_value = "chaptersplit.json")]
    config: PathBuf,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji and ANSI color for log level
    fn decoration_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌ ", "1;31"),
            Level::Warn => ("🚧 ", "1;33"),
            Level::Info => (" ", "1;32"),
            Level::Debug => ("🔍 ", "1;36"),
            Level::Trace => ("📋 ", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (emoji, color) = Self::decoration_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Load the configuration file, creating a default one when missing
fn load_or_create_config(path: &Path) -> Result<Config> {
    if path.exists() {
        return Config::from_file(path);
    }

    warn!("Config file not found at '{}', creating default config.", path.display());
    let config = Config::default();
    config
        .save_to_file(path)
        .context("Failed to write default config")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logger starts at Trace so the level can be narrowed after loading the config
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    let (dirs, workflow, options) = match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "chaptersplit", &mut std::io::stdout());
            return Ok(());
        }
        Commands::Extract { dirs, process, split } => (
            dirs,
            Workflow::Extract,
            RunOptions {
                process,
                cleanup: split.cleanup,
                import_to: split.import_to.map(Into::into),
            },
        ),
        Commands::Process { dirs, split } => (
            dirs,
            Workflow::Process,
            RunOptions {
                process: true,
                cleanup: split.cleanup,
                import_to: split.import_to.map(Into::into),
            },
        ),
    };

    let mut config = load_or_create_config(&cli.config)?;
    if let Some(log_level) = cli.log_level {
        config.log_level = log_level.into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)?;
    let summary = controller.run_batch(&dirs, workflow, &options).await;

    if summary.has_failures() {
        std::process::exit(1);
    }

    Ok(())
}
