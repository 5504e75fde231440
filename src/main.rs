//! token-detector - Flag authentication tokens in intercepted HTTP requests
//!
//! # Usage
//!
//! ```bash
//! # Scan a raw HTTP request (file or stdin), print the annotation as JSON
//! printf 'GET / HTTP/1.1\r\nCookie: LtpaToken2=abc\r\n\r\n' | token-detector scan
//!
//! # Manage the stored rules
//! token-detector rules list
//! token-detector rules add --name "API key" --colour yellow --regex '(?i)x-api-key'
//! token-detector rules disable 2
//! token-detector rules reset
//! ```

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use token_detector::{
    audit::AuditLogger,
    colour::Colour,
    config::Config,
    editor::RulesEditor,
    handler::TokenHandler,
    output::annotation_json,
    request::HttpRequest,
    rules::Rule,
    store::{FilePreferences, RuleStore},
};

#[derive(Parser)]
#[command(name = "token-detector")]
#[command(about = "Flag authentication tokens in HTTP requests using configurable regex rules")]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the preferences file holding the rules
    #[arg(short, long, global = true)]
    preferences: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a raw HTTP request and print the annotation
    Scan {
        /// File containing the request (default: stdin)
        file: Option<PathBuf>,
    },
    /// Manage detection rules
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },
}

#[derive(Subcommand)]
enum RulesAction {
    /// Show all rules in evaluation order
    List,
    /// Append a rule
    Add {
        #[arg(long)]
        name: String,
        /// Highlight colour (unknown names fall back to gray)
        #[arg(long, default_value = "gray")]
        colour: String,
        #[arg(long)]
        regex: String,
        /// Store the rule disabled
        #[arg(long)]
        disabled: bool,
    },
    /// Delete a rule by row number
    Remove { row: usize },
    /// Enable a rule by row number
    Enable { row: usize },
    /// Disable a rule by row number
    Disable { row: usize },
    /// Replace all rules with the built-in defaults
    Reset,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Config {
    match path {
        Some(path) => Config::load_from(path).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            Config::default()
        }),
        None => Config::load(),
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref());

    let prefs_path = cli
        .preferences
        .clone()
        .unwrap_or_else(|| config.preferences_path());
    let store = Arc::new(RuleStore::new(Arc::new(FilePreferences::new(prefs_path))));

    let result = match cli.command {
        Commands::Scan { file } => scan(&config, store, file),
        Commands::Rules { action } => rules(&store, action),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn scan(
    config: &Config,
    store: Arc<RuleStore>,
    file: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let raw = match file {
        Some(path) => std::fs::read(path)?,
        None => {
            let mut buf = Vec::new();
            io::stdin().lock().read_to_end(&mut buf)?;
            buf
        }
    };

    let request = HttpRequest::parse(&raw);
    let handler = TokenHandler::new(store, config.mark_requests());
    let detection = handler.detect(&request);

    let mut logger = AuditLogger::new(config.audit_path().as_deref());
    if let Err(e) = logger.log_detection(&request, &detection, !handler.marking_enabled()) {
        tracing::warn!(error = %e, "failed to write audit log");
    }

    let annotation = detection.to_annotation();
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", annotation_json(annotation.as_ref()))?;
    handle.flush()?;
    Ok(())
}

fn rules(store: &RuleStore, action: RulesAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = RulesEditor::load(store);

    match action {
        RulesAction::List => {
            print_rules(editor.rules());
            return Ok(());
        }
        RulesAction::Add {
            name,
            colour,
            regex,
            disabled,
        } => {
            let colour = Colour::resolve(&colour, Colour::Gray);
            editor.insert(Rule::new(!disabled, name, colour, regex))?;
        }
        RulesAction::Remove { row } => {
            let index = row_index(row, editor.len())?;
            editor.remove_rows(&[index]);
        }
        RulesAction::Enable { row } => editor.set_enabled(&[row_index(row, editor.len())?], true)?,
        RulesAction::Disable { row } => editor.set_enabled(&[row_index(row, editor.len())?], false)?,
        RulesAction::Reset => {
            let rules = store.reset_to_defaults()?;
            print_rules(&rules);
            return Ok(());
        }
    }

    editor.save(store)?;
    print_rules(editor.rules());
    Ok(())
}

/// Rows are numbered from 1 on the command line
fn row_index(row: usize, len: usize) -> Result<usize, token_detector::RuleError> {
    if row == 0 || row > len {
        return Err(token_detector::RuleError::NoSuchRow { row, len });
    }
    Ok(row - 1)
}

fn print_rules(rules: &[Rule]) {
    for (i, rule) in rules.iter().enumerate() {
        println!(
            "{:>3}  [{}]  {:<8} {:<24} {}",
            i + 1,
            if rule.enabled { "x" } else { " " },
            rule.colour.name(),
            rule.name,
            rule.regex
        );
    }
}
