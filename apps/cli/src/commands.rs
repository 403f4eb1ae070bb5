//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use notepress_core::converter::CommandConverter;
use notepress_core::pipeline::{ConvertConfig, ConvertSummary, ProgressReporter};
use notepress_shared::{AppConfig, init_config, load_config, validate_config};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// notepress: turn notebooks into blog posts.
#[derive(Parser)]
#[command(
    name = "notepress",
    version,
    about = "Convert Jupyter notebooks into blog-ready Markdown posts.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Defaults to `convert` in the current directory.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Convert every notebook in a directory into a post.
    Convert {
        /// Directory containing the notebooks.
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Notebook language (overrides `notebook.language`).
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = ["notepress_cli", "notepress_core", "notepress_markdown", "notepress_shared"]
        .map(|target| format!("{target}={level}"))
        .join(",");

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let command = cli.command.unwrap_or(Command::Convert {
        dir: PathBuf::from("."),
        language: None,
    });

    match command {
        Command::Convert { dir, language } => cmd_convert(&dir, language.as_deref()),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

fn cmd_convert(dir: &Path, language: Option<&str>) -> Result<()> {
    let mut config = load_config()?;
    if let Some(language) = language {
        config.notebook.language = language.to_string();
    }
    validate_config(&config)?;

    if !dir.is_dir() {
        return Err(eyre!("'{}' is not a directory", dir.display()));
    }

    let converter = CommandConverter::from_config(&config.converter)?;
    let convert_config = ConvertConfig::from_app(&config, dir);

    info!(
        dir = %dir.display(),
        language = %convert_config.language,
        converter = %converter.display_command(),
        "converting notebooks"
    );

    let reporter = CliProgress::new();
    let summary = notepress_core::pipeline::convert_all(&convert_config, &converter, &reporter)?;

    println!();
    if summary.posts.is_empty() {
        println!("  No notebooks found in {}", dir.display());
    }
    for post in &summary.posts {
        println!(
            "  {} -> {} ({} form{}, front matter {})",
            post.paths.notebook.display(),
            post.paths.markdown.display(),
            post.forms_collapsed,
            if post.forms_collapsed == 1 { "" } else { "s" },
            if post.front_matter_preserved { "kept" } else { "new" },
        );
    }
    println!("  Time: {:.1}s", summary.elapsed.as_secs_f64());
    println!();

    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn notebook_started(&self, path: &Path, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Converting [{current}/{total}] {}", path.display()));
    }

    fn done(&self, _summary: &ConvertSummary) {
        self.spinner.finish_and_clear();
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        // Clear the spinner when the run aborts with an error.
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
