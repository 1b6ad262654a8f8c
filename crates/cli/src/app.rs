//! CLI application entry point.

use crate::commands::{
    AnalyzeArgs, Cli, Commands, ConfigAction, ConfigArgs, LastDayArgs, OutputFormat,
};
use crate::error::{CliError, Result};
use chatlens_analysis::config::AnalysisConfig;
use chatlens_analysis::extract::{last_day_lines, parse_name_mapping, replace_names};
use chatlens_analysis::parsers::{ChatParser, ParseError, WhatsAppParser};
use chatlens_analysis::Analyzer;
use chatlens_core::config::{load_toml, save_toml, LogLevel};
use chatlens_core::constants::MAX_IMPORT_FILE_SIZE;
use chatlens_core::{ChatReport, ChatlensConfig, Transcript};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, Level};

/// Contents of the TOML configuration file.
///
/// Top-level keys belong to [`ChatlensConfig`]; aggregator settings live
/// under `[analysis]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Paths and logging.
    #[serde(flatten)]
    pub core: ChatlensConfig,

    /// Aggregator settings.
    pub analysis: AnalysisConfig,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Settings loaded from file, or defaults.
    pub settings: Settings,
    /// Verbosity level from `-v` flags.
    pub verbosity: u8,
    /// File the settings were loaded from.
    pub config_path: Option<PathBuf>,
}

/// Main CLI application.
pub struct App {
    config: AppConfig,
    cli: Cli,
}

impl App {
    /// Create a new application instance from command line arguments.
    pub fn new() -> Result<Self> {
        Self::from_cli(Cli::parse())
    }

    /// Create an application instance from already-parsed arguments.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let config = Self::load_config(&cli)?;
        Ok(Self { config, cli })
    }

    /// Effective configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Load configuration from file and environment.
    fn load_config(cli: &Cli) -> Result<AppConfig> {
        let config_path = match &cli.config {
            Some(path) if path.exists() => Some(path.clone()),
            Some(path) => {
                return Err(CliError::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            None => ChatlensConfig::default_file()
                .ok()
                .filter(|path| path.exists()),
        };

        let mut settings = match &config_path {
            Some(path) => read_settings_file(path)?,
            None => Settings::default(),
        };

        // Override with environment variables
        if let Ok(reports_dir) = std::env::var("CHATLENS_REPORTS_DIR") {
            settings.core.reports_dir = PathBuf::from(reports_dir);
        }

        settings.analysis.validate()?;

        Ok(AppConfig {
            settings,
            verbosity: cli.verbose,
            config_path,
        })
    }

    /// Run the application.
    pub fn run(self) -> Result<()> {
        self.setup_logging();

        match &self.cli.command {
            Commands::Analyze(args) => self.handle_analyze(args),
            Commands::LastDay(args) => self.handle_last_day(args),
            Commands::Config(args) => self.handle_config(args),
        }
    }

    /// Set up logging based on verbosity level, falling back to the configured level.
    fn setup_logging(&self) {
        let logging = &self.config.settings.core.logging;
        let level = log_level(self.config.verbosity, logging.level);

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(logging.show_target)
            .with_writer(std::io::stderr)
            .try_init()
            .ok(); // Ignore errors if a subscriber is already installed
    }

    fn handle_analyze(&self, args: &AnalyzeArgs) -> Result<()> {
        let parser = WhatsAppParser::new();
        let transcript = parser.parse(&args.transcript)?;
        info!(
            "Parsed {} messages from {}",
            transcript.len(),
            args.transcript.display()
        );

        let analyzer = Analyzer::with_defaults(self.config.settings.analysis.clone())?;
        let report = if args.sequential {
            analyzer.analyze(&transcript)?
        } else {
            self.analyze_on_runtime(&analyzer, transcript)?
        };

        match args.format {
            OutputFormat::Text => print!("{}", render_text(&report)),
            OutputFormat::Json => println!("{}", to_json(&report)?),
        }

        let out_dir = args.out_dir.clone().or_else(|| {
            args.write
                .then(|| self.config.settings.core.reports_dir.clone())
        });
        if let Some(dir) = out_dir {
            let written = write_author_reports(&dir, &report)?;
            info!("Wrote {} author reports to {}", written.len(), dir.display());
            if args.format == OutputFormat::Text {
                println!("Wrote {} author reports to {}", written.len(), dir.display());
            }
        }
        Ok(())
    }

    fn analyze_on_runtime(&self, analyzer: &Analyzer, transcript: Transcript) -> Result<ChatReport> {
        let workers = self.config.settings.analysis.max_workers.max(1);
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(workers)
            .max_blocking_threads(workers)
            .enable_all()
            .build()
            .map_err(|e| CliError::Internal(format!("failed to build runtime: {}", e)))?;

        let report = runtime.block_on(analyzer.analyze_concurrent(Arc::new(transcript)))?;
        Ok(report)
    }

    fn handle_last_day(&self, args: &LastDayArgs) -> Result<()> {
        let mapping = args
            .renames
            .iter()
            .map(|raw| {
                parse_name_mapping(raw).ok_or_else(|| {
                    CliError::Argument(format!(
                        "rename expects \"<old name> <new name>\", got '{}'",
                        raw
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let content = read_transcript(&args.transcript)?;
        let Some((date, lines)) = last_day_lines(content.lines()) else {
            return Err(CliError::Parse(format!(
                "no dated lines found in {}",
                args.transcript.display()
            )));
        };
        let lines = replace_names(&lines, &mapping);

        let mut output = lines.join("\n");
        output.push('\n');
        fs::write(&args.output, output).map_err(|e| {
            CliError::FileSystem(format!(
                "failed to write {}: {}",
                args.output.display(),
                e
            ))
        })?;
        info!(
            "Wrote {} lines from {} to {}",
            lines.len(),
            date,
            args.output.display()
        );

        for line in &lines {
            println!("{}", line);
        }
        Ok(())
    }

    fn handle_config(&self, args: &ConfigArgs) -> Result<()> {
        match &args.action {
            ConfigAction::Init { path, force } => {
                let path = match path {
                    Some(path) => path.clone(),
                    None => ChatlensConfig::default_file()?,
                };
                if path.exists() && !force {
                    return Err(CliError::Config(format!(
                        "{} already exists (use --force to overwrite)",
                        path.display()
                    )));
                }
                save_toml(&Settings::default(), &path)?;
                println!("Wrote default configuration to {}", path.display());
                Ok(())
            }
            ConfigAction::Show => {
                if let Some(path) = &self.config.config_path {
                    debug!("Configuration loaded from {}", path.display());
                }
                print!("{}", to_toml(&self.config.settings)?);
                Ok(())
            }
        }
    }
}

/// Map `-v` occurrences to a level; zero keeps the configured level.
pub fn log_level(verbosity: u8, configured: LogLevel) -> Level {
    match verbosity {
        0 => match configured {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Read settings from a TOML file. An empty file yields defaults.
pub fn read_settings_file(path: &Path) -> Result<Settings> {
    Ok(load_toml(path)?)
}

fn to_toml(settings: &Settings) -> Result<String> {
    toml::to_string_pretty(settings)
        .map_err(|e| CliError::Internal(format!("failed to serialize config: {}", e)))
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CliError::Internal(format!("failed to serialize report: {}", e)))
}

fn read_transcript(path: &Path) -> Result<String> {
    let size = fs::metadata(path)?.len();
    if size > MAX_IMPORT_FILE_SIZE {
        return Err(ParseError::FileTooLarge {
            size,
            limit: MAX_IMPORT_FILE_SIZE,
        }
        .into());
    }
    Ok(fs::read_to_string(path)?)
}

/// Replace every character other than ASCII alphanumerics, `-` and `_` with `_`.
pub fn safe_file_name(author: &str) -> String {
    let name: String = author
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if name.is_empty() {
        "_".to_string()
    } else {
        name
    }
}

/// Write one `<safe-name>.json` per author into `dir`.
///
/// Authors whose safe names collide get a numeric suffix.
pub fn write_author_reports(dir: &Path, report: &ChatReport) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|e| {
        CliError::FileSystem(format!("failed to create {}: {}", dir.display(), e))
    })?;

    let mut used = HashSet::new();
    let mut written = Vec::with_capacity(report.authors.len());
    for (author, author_report) in &report.authors {
        let base = safe_file_name(author);
        let mut name = base.clone();
        let mut n = 2;
        while !used.insert(name.clone()) {
            name = format!("{}-{}", base, n);
            n += 1;
        }

        let path = dir.join(format!("{}.json", name));
        fs::write(&path, to_json(author_report)?)?;
        debug!("Wrote report for {} to {}", author, path.display());
        written.push(path);
    }
    Ok(written)
}

/// Plain-text summary of a report, one block per author.
pub fn render_text(report: &ChatReport) -> String {
    let mut out = format!(
        "{} messages, {} authors, median gap {}s\n",
        report.message_count,
        report.authors.len(),
        report.median_gap_seconds
    );

    for (author, a) in &report.authors {
        out.push_str(&format!("\n== {} ==\n", author));
        for (key, value) in a.stats.entries() {
            out.push_str(&format!("  {:<30} {}\n", key, value));
        }

        let top: Vec<String> = a
            .top_words
            .iter()
            .map(|w| format!("{} ({})", w.word, w.count))
            .collect();
        out.push_str(&format!("  {:<30} {}\n", "Top words", top.join(", ")));
        out.push_str(&format!("  {:<30} {}\n", "Active days", a.daily_activity.len()));
        out.push_str(&format!(
            "  {:<30} happiness {} / sadness {} / overall {}\n",
            "Sentiment", a.sentiment.happiness, a.sentiment.sadness, a.sentiment.overall
        ));
        out.push_str(&format!(
            "  {:<30} {}\n",
            "Confrontational index", a.confrontational_index
        ));
        out.push_str(&format!("  {:<30} {}\n", "Nouns", a.parts_of_speech.nouns.join(", ")));
        out.push_str(&format!("  {:<30} {}\n", "Verbs", a.parts_of_speech.verbs.join(", ")));
        out.push_str(&format!(
            "  {:<30} {}\n",
            "Adjectives",
            a.parts_of_speech.adjectives.join(", ")
        ));
        out.push_str(&format!(
            "  {:<30} {}\n",
            "Words not to say",
            a.words_not_to_say.join(", ")
        ));
    }
    out
}

/// Run the CLI application.
pub fn run() -> Result<()> {
    let app = App::new()?;
    app.run()
}
