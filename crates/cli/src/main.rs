// rostermerge - merge cooking-group rosters into a member directory
// Engine lives in rostermerge-recon; this crate owns args, files and output.

mod clean;
mod exit_codes;
mod merge;
mod report;
mod util;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use rostermerge_recon::ReconError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use clean::CleanCommands;
use exit_codes::{recon_exit_code, EXIT_ERROR, EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "rostermerge")]
#[command(about = "Merge cooking-group rosters into a member directory")]
#[command(version)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assign groups and captain roles from roster text to the member file
    #[command(after_help = "\
Examples:
  rostermerge merge raw.txt members.json
  rostermerge merge raw.txt members.json --dry-run --json
  rostermerge merge raw.txt members.json --output updated.json --groups-out groups.json
  ROSTERMERGE_CONFIG=strict.toml rostermerge merge raw.txt members.json")]
    Merge {
        /// Roster text with \"Group No - N\" blocks
        raw: PathBuf,

        /// Member collection (JSON array); rewritten in place unless --output is given
        members: PathBuf,

        /// TOML config file
        #[arg(long, env = "ROSTERMERGE_CONFIG")]
        config: Option<PathBuf>,

        /// Write the updated members here instead of over the input
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Also write the parsed groups as JSON
        #[arg(long)]
        groups_out: Option<PathBuf>,

        /// Print the run result as JSON on stdout
        #[arg(long)]
        json: bool,

        /// Compute and report, but write nothing
        #[arg(long)]
        dry_run: bool,

        /// Number of parsed groups to preview in the human report
        #[arg(long, default_value_t = 3)]
        preview: usize,
    },

    /// Parse roster text and print the groups as JSON
    #[command(after_help = "\
Examples:
  rostermerge parse raw.txt
  rostermerge parse raw.txt --output cooking_groups.json")]
    Parse {
        /// Roster text with \"Group No - N\" blocks
        raw: PathBuf,

        /// TOML config file
        #[arg(long, env = "ROSTERMERGE_CONFIG")]
        config: Option<PathBuf>,

        /// Write the groups here instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Clean-up passes over the member file
    #[command(subcommand)]
    Clean(CleanCommands),
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Merge {
            raw,
            members,
            config,
            output,
            groups_out,
            json,
            dry_run,
            preview,
        } => merge::cmd_merge(merge::MergeArgs {
            raw,
            members,
            config,
            output,
            groups_out,
            json,
            dry_run,
            preview,
        }),
        Commands::Parse { raw, config, output } => merge::cmd_parse(raw, config, output),
        Commands::Clean(cmd) => clean::cmd_clean(cmd),
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
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Create error from an engine error with its exit code.
    pub fn recon(err: ReconError) -> Self {
        let hint = match &err {
            ReconError::NameCollision { .. } => Some(
                "rename one entry in the roster text, or set collision_policy = \"keep_first\""
                    .to_string(),
            ),
            ReconError::MemberParse(_) => {
                Some("the member file must be a JSON array of objects with a \"name\"".to_string())
            }
            _ => None,
        };
        Self { code: recon_exit_code(&err), message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        Self::recon(err)
    }
}
