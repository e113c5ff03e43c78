//! `agd` command-line entry point.
//!
//! # Responsibility
//! - Resolve the project root once and hand it to `agd_core`.
//! - Translate core results into hook exit codes and messages.
//!
//! Exit codes: 0 proceed, 1 validation errors or failure, 2 blocked.

mod hook;
mod report;

use agd_core::{GateDecision, ProjectLayout, ProposedRecord};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{debug, info};
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

const PROJECT_DIR_ENV: &str = "CLAUDE_PROJECT_DIR";
const EXIT_INVALID: u8 = 1;
const EXIT_BLOCKED: u8 = 2;

#[derive(Parser)]
#[command(name = "agd")]
#[command(version, about = "Validate AGD decision records and regenerate their indexes")]
struct Cli {
    /// Write rolling logs to this absolute directory.
    #[arg(long, global = true, env = "AGD_LOG_DIR")]
    log_dir: Option<PathBuf>,
    /// Log level (trace|debug|info|warn|error).
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate tags and references of every record.
    Validate {
        #[command(flatten)]
        project: ProjectArgs,
        /// Read a PostToolUse hook payload from stdin and skip unrelated paths.
        #[arg(long)]
        hook: bool,
    },
    /// Gate a proposed record write (PreToolUse hook payload on stdin).
    PreValidate {
        #[command(flatten)]
        project: ProjectArgs,
    },
    /// Regenerate INDEX-TAGS.md and INDEX-AGD-RELATIONS.md.
    Index {
        #[command(flatten)]
        project: ProjectArgs,
    },
    /// Validate, then regenerate indexes when validation passes.
    Check {
        #[command(flatten)]
        project: ProjectArgs,
        /// Read a PostToolUse hook payload from stdin and skip unrelated paths.
        #[arg(long)]
        hook: bool,
    },
}

#[derive(Args)]
struct ProjectArgs {
    /// Project root; `CLAUDE_PROJECT_DIR` takes precedence when set.
    project_dir: Option<PathBuf>,
}

#[derive(Debug)]
struct MissingProjectRoot;

impl Display for MissingProjectRoot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{PROJECT_DIR_ENV} not set and no project dir given")
    }
}

impl std::error::Error for MissingProjectRoot {}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_cli_logging(&cli);

    match run(cli.command) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            if err.downcast_ref::<MissingProjectRoot>().is_some() {
                ExitCode::from(EXIT_BLOCKED)
            } else {
                ExitCode::from(EXIT_INVALID)
            }
        }
    }
}

fn init_cli_logging(cli: &Cli) {
    let Some(log_dir) = cli.log_dir.as_deref() else {
        return;
    };
    let level = cli
        .log_level
        .as_deref()
        .unwrap_or_else(|| agd_core::default_log_level());
    if let Err(err) = agd_core::init_logging(level, log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }
}

fn run(command: Commands) -> Result<ExitCode> {
    match command {
        Commands::Validate { project, hook } => {
            let layout = resolve_layout(&project)?;
            if hook && !hook_targets_decisions(&layout) {
                return Ok(ExitCode::SUCCESS);
            }
            Ok(exit_code(validate(&layout)?))
        }
        Commands::PreValidate { project } => pre_validate(&resolve_layout(&project)?),
        Commands::Index { project } => index(&resolve_layout(&project)?),
        Commands::Check { project, hook } => {
            let layout = resolve_layout(&project)?;
            if hook && !hook_targets_decisions(&layout) {
                return Ok(ExitCode::SUCCESS);
            }
            if !validate(&layout)? {
                return Ok(ExitCode::from(EXIT_INVALID));
            }
            index(&layout)
        }
    }
}

fn resolve_layout(project: &ProjectArgs) -> Result<ProjectLayout> {
    let from_env = std::env::var(PROJECT_DIR_ENV)
        .ok()
        .filter(|value| !value.is_empty())
        .map(PathBuf::from);
    let root = resolve_project_root(from_env, project.project_dir.clone())?;
    debug!("event=project_root module=cli status=ok root={}", root.display());
    Ok(ProjectLayout::new(root))
}

/// Environment value first, then the positional argument.
fn resolve_project_root(
    from_env: Option<PathBuf>,
    from_arg: Option<PathBuf>,
) -> Result<PathBuf, MissingProjectRoot> {
    from_env.or(from_arg).ok_or(MissingProjectRoot)
}

// An unreadable payload means "validate everything".
fn hook_targets_decisions(layout: &ProjectLayout) -> bool {
    let input = hook::read_hook_input(io::stdin().lock()).unwrap_or_default();
    let file_path = input.tool_input.file_path;
    file_path.is_empty() || layout.is_in_decisions_dir(&file_path)
}

fn exit_code(valid: bool) -> ExitCode {
    if valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_INVALID)
    }
}

/// Runs the full audit; prints the failure report and returns `false` on issues.
fn validate(layout: &ProjectLayout) -> Result<bool> {
    let report = agd_core::validate_project(layout).with_context(|| {
        format!(
            "cannot list decisions in {}",
            layout.decisions_dir().display()
        )
    })?;
    if report.is_valid() {
        return Ok(true);
    }

    report::write_validation_failure(&mut io::stderr().lock(), &report)?;
    Ok(false)
}

fn pre_validate(layout: &ProjectLayout) -> Result<ExitCode> {
    let input = match hook::read_hook_input(io::stdin().lock()) {
        Ok(input) => input,
        Err(err) => {
            eprintln!("❌ BLOCKED: Failed to parse hook input: {err}");
            return Ok(ExitCode::from(EXIT_BLOCKED));
        }
    };

    let proposed = ProposedRecord {
        file_path: &input.tool_input.file_path,
        content: &input.tool_input.content,
    };
    match agd_core::pre_validate(layout, proposed) {
        GateDecision::Allow(_) => Ok(ExitCode::SUCCESS),
        GateDecision::Block {
            invalid_tags,
            allowed_tags,
        } => {
            report::write_block(&mut io::stderr().lock(), &invalid_tags, &allowed_tags)?;
            Ok(ExitCode::from(EXIT_BLOCKED))
        }
    }
}

fn index(layout: &ProjectLayout) -> Result<ExitCode> {
    let summary = agd_core::generate_indexes(layout)?;
    info!("event=cli_index module=cli status=ok");
    println!("{}", report::index_summary_line(&summary));
    Ok(ExitCode::SUCCESS)
}
