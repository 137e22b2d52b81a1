// artview - browse a paged artwork collection and select rows across pages

mod exit_codes;
mod source;
mod table;
mod tui;
mod util;

use std::process::ExitCode;

use artview_client::Artwork;
use artview_core::{
    FetchError, InvalidCountError, LoadOutcome, NavigationError, PageLoader, RecordId,
    SelectionReconciler,
};
use clap::{Parser, Subcommand};
use env_logger::{Builder, Env};

use exit_codes::{fetch_exit_code, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};
use source::SourceArgs;

#[derive(Parser)]
#[command(name = "artview")]
#[command(about = "Browse a paged artwork collection and select rows across pages")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive table
    #[command(after_help = "\
Examples:
  artview browse
  artview browse --page 40 --page-size 25
  artview browse --offline")]
    Browse {
        /// Page to open first (1-based)
        #[arg(long, default_value_t = 1)]
        page: usize,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Print one page with its selection state
    #[command(after_help = "\
Examples:
  artview page 2 --select 15
  artview page 2 --select 15 --toggle 100013 --offline
  artview page 1 --select 30 --json | jq .total_selected")]
    Page {
        /// Page to print (1-based)
        page: usize,

        /// Select the first N rows of the whole collection
        #[arg(long, value_name = "N", allow_hyphen_values = true)]
        select: Option<String>,

        /// Flip the checkbox of a record on this page. Repeatable.
        #[arg(long = "toggle", value_name = "ID")]
        toggle: Vec<u64>,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Suppress stderr notes (e.g. ignored toggles)
        #[arg(long, short = 'q')]
        quiet: bool,

        #[command(flatten)]
        source: SourceArgs,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\ncore:    artview-core ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
    )
}

fn init_logger() {
    // RUST_LOG overrides; default stays quiet so the TUI is not overdrawn.
    Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();
}

fn main() -> ExitCode {
    init_logger();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Browse { page, source } => cmd_browse(page, source),
        Commands::Page { page, select, toggle, json, quiet, source } => {
            cmd_page(page, select, toggle, json, quiet, source)
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn fetch(err: FetchError) -> Self {
        let hint = match &err {
            FetchError::Network(_) => Some("check the connection, or try --offline".to_string()),
            FetchError::Http { status: 429, .. } => Some("rate limited; retry later".to_string()),
            _ => None,
        };
        Self { code: fetch_exit_code(&err), message: err.to_string(), hint }
    }

    pub fn count(err: InvalidCountError) -> Self {
        Self::args(err.to_string())
    }

    pub fn navigation(err: NavigationError) -> Self {
        Self::args(err.to_string())
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// browse
// ============================================================================

fn cmd_browse(page: usize, source: SourceArgs) -> Result<(), CliError> {
    let source = source.resolve()?;
    if artview_core::page::first_rank(page, source.page_size).is_none() {
        return Err(CliError::navigation(NavigationError::InvalidPage(page)));
    }
    tui::run(source, page).map_err(CliError::general)
}

// ============================================================================
// page
// ============================================================================

fn cmd_page(
    page: usize,
    select: Option<String>,
    toggle: Vec<u64>,
    json: bool,
    quiet: bool,
    source: SourceArgs,
) -> Result<(), CliError> {
    let source = source.resolve()?;
    let mut rec = SelectionReconciler::<Artwork>::new(source.page_size);

    // Validate the count before touching the network.
    let count = select
        .as_deref()
        .map(|s| s.parse::<artview_core::VirtualCount>())
        .transpose()
        .map_err(|e| CliError::count(e).with_hint("--select takes a positive whole number"))?;

    let request = rec.on_page_change(page).map_err(CliError::navigation)?;
    let response = request.respond(source.loader.fetch_page(request.page, request.page_size));
    match rec.on_page_loaded(response) {
        LoadOutcome::Committed { page: committed } => {
            log::debug!("page {} committed, {} of {} records", committed,
                rec.window().map(|w| w.len()).unwrap_or(0), rec.navigator().total_count());
        }
        LoadOutcome::Failed(err) => {
            log::debug!("page {} failed: {:?}", page, err);
            return Err(CliError::fetch(err));
        }
        LoadOutcome::Stale { seq, latest } => {
            return Err(CliError::general(format!("response #{} superseded by #{}", seq, latest)));
        }
    }

    // The total is only known once a page has come back.
    let last = rec.navigator().page_count();
    if page > last {
        return Err(CliError::navigation(NavigationError::InvalidPage(page))
            .with_hint(format!("the collection has {} page(s)", last)));
    }

    if let Some(count) = count {
        rec.set_virtual_count(count.get()).map_err(CliError::count)?;
    }

    for id in toggle {
        let flipped = rec
            .toggle(RecordId(id))
            .map_err(|e| CliError::general(e.to_string()))?;
        match flipped {
            Some(now) => log::debug!("record {} toggled, selected={}", id, now),
            None if !quiet => eprintln!("note: record {} is not on page {}; ignored", id, page),
            None => log::debug!("record {} is not on page {}; ignored", id, page),
        }
    }

    if json {
        let doc = table::to_json(&rec);
        let text = serde_json::to_string_pretty(&doc).map_err(|e| CliError::general(e.to_string()))?;
        println!("{}", text);
    } else {
        table::print_plain(&rec).map_err(|e| CliError::general(e.to_string()))?;
    }
    Ok(())
}
