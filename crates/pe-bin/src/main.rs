//! promptedit entrypoint.
//!
//! Opens a prompt file, reports placeholder problems, and reviews suggestion
//! batches from a JSON file: each suggestion is previewed as a diff, then
//! accepted or rejected. Accepted changes are written back with the file's
//! original line endings.
use anyhow::{Context, Result, bail};
use clap::Parser;
use core_actions::{Action, Workspace, io_ops};
use core_config::load_from;
use core_review::{ReviewOutcome, Suggestion};
use serde::Deserialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "promptedit", version, about = "Review edit suggestions against a prompt file")]
struct Args {
    /// Prompt file to open (UTF-8 text).
    pub path: PathBuf,
    /// JSON file holding one suggestion or an array of suggestions.
    #[arg(long = "suggestion", short = 's')]
    pub suggestion: Option<PathBuf>,
    /// Apply every suggestion that still matches the buffer.
    #[arg(long, conflicts_with = "reject")]
    pub accept: bool,
    /// Dismiss every suggestion after previewing it.
    #[arg(long)]
    pub reject: bool,
    /// Write the result here instead of back to `path`.
    #[arg(long = "output", short = 'o')]
    pub output: Option<PathBuf>,
    /// Exit with an error when placeholders are malformed or duplicated.
    #[arg(long)]
    pub check: bool,
    /// Optional configuration file path (overrides discovery of `promptedit.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    Accept,
    Reject,
}

impl Args {
    fn decision(&self) -> Decision {
        if self.accept {
            Decision::Accept
        } else {
            Decision::Reject
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SuggestionFile {
    Many(Vec<Suggestion>),
    One(Box<Suggestion>),
}

impl SuggestionFile {
    fn into_vec(self) -> Vec<Suggestion> {
        match self {
            SuggestionFile::Many(v) => v,
            SuggestionFile::One(s) => vec![*s],
        }
    }
}

/// What a run did, for the exit status.
#[derive(Debug, Default, PartialEq, Eq)]
struct RunSummary {
    committed: usize,
    discarded: usize,
    failed: usize,
    placeholder_issues: usize,
    written: bool,
}

struct AppStartup {
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self { log_guard: None }
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join("promptedit.log");
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, "promptedit.log");
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        match tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .try_init()
        {
            Ok(_) => {
                self.log_guard = Some(guard);
            }
            Err(_err) => {
                // Global tracing subscriber already installed; drop guard so writer shuts down.
            }
        }

        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

fn load_suggestions(path: &Path) -> Result<Vec<Suggestion>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading suggestions from {}", path.display()))?;
    let file: SuggestionFile = serde_json::from_str(&raw)
        .with_context(|| format!("parsing suggestions in {}", path.display()))?;
    Ok(file.into_vec())
}

fn run(args: &Args, out: &mut impl Write) -> Result<RunSummary> {
    let config = load_from(args.config.clone())?;
    let Some(mut ws) = io_ops::open_workspace(&args.path, &config) else {
        bail!("cannot open {}", args.path.display());
    };
    info!(target: "runtime.startup", path = %args.path.display(), lines = ws.state.line_count(), placeholders = ws.state.placeholders().len(), config_override = args.config.is_some(), "bootstrap_complete");

    let mut summary = RunSummary::default();
    let issues = ws.state.placeholder_issues();
    summary.placeholder_issues = issues.len();
    for issue in &issues {
        writeln!(out, "{}:{}:{}: {}", args.path.display(), issue.line, issue.column, issue.message)?;
    }

    let suggestions = match &args.suggestion {
        Some(path) => load_suggestions(path)?,
        None => Vec::new(),
    };
    let decision = args.decision();
    for suggestion in suggestions {
        review_one(&mut ws, suggestion, decision, out, &mut summary)?;
    }

    if summary.committed > 0 {
        let target = args.output.as_deref();
        match io_ops::write_file(&mut ws, target) {
            io_ops::WriteFileResult::Success => summary.written = true,
            other => bail!("failed to write result: {other:?}"),
        }
    }
    info!(target: "runtime", committed = summary.committed, discarded = summary.discarded, failed = summary.failed, written = summary.written, "run_complete");
    Ok(summary)
}

fn review_one(
    ws: &mut Workspace,
    suggestion: Suggestion,
    decision: Decision,
    out: &mut impl Write,
    summary: &mut RunSummary,
) -> Result<()> {
    let title = suggestion.display_title();
    ws.dispatch(Action::ProposeSuggestion(suggestion));
    let Some(diff) = ws.review.pending_diff() else {
        summary.failed += 1;
        let reason = ws.state.status_message().unwrap_or("preview failed").to_string();
        warn!(target: "runtime", %title, %reason, "suggestion_skipped");
        writeln!(out, "skipped {title}: {reason}")?;
        return Ok(());
    };
    writeln!(out, "{title}")?;
    write!(out, "{}", core_diff::format(diff))?;

    let action = match decision {
        Decision::Accept => Action::AcceptSuggestion,
        Decision::Reject => Action::RejectSuggestion,
    };
    ws.dispatch(action);
    match ws.review.last_outcome() {
        Some(ReviewOutcome::Committed) => {
            summary.committed += 1;
            writeln!(out, "applied")?;
        }
        Some(ReviewOutcome::Discarded) if decision == Decision::Accept => {
            summary.failed += 1;
            writeln!(out, "{}", ws.state.status_message().unwrap_or("not applied"))?;
        }
        _ => {
            summary.discarded += 1;
            writeln!(out, "dismissed")?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let mut startup = AppStartup::new();
    startup.configure_logging()?;
    AppStartup::install_panic_hook();
    info!(target: "runtime", "startup");

    let args = Args::parse();
    let stdout = std::io::stdout();
    let summary = run(&args, &mut stdout.lock()).inspect_err(|e| {
        error!(target: "runtime", error = %e, "run_failed");
    })?;
    if args.check && summary.placeholder_issues > 0 {
        bail!("{} placeholder issue(s)", summary.placeholder_issues);
    }
    if summary.failed > 0 {
        bail!("{} suggestion(s) could not be applied", summary.failed);
    }
    Ok(())
}
