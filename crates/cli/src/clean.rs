//! `rostermerge clean`: one-off clean-up passes over the member file.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use rostermerge_recon::cleanup::{
    fix_duplicate_ids, normalize_blood_groups, proper_case_names, FieldChange,
};
use rostermerge_recon::store::{load_members, render_members};
use rostermerge_recon::MemberRecord;
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::report;
use crate::util::{read_text, write_atomic};
use crate::CliError;

#[derive(Subcommand)]
pub enum CleanCommands {
    /// Title-case every member name
    #[command(after_help = "\
Examples:
  rostermerge clean names members.json
  rostermerge clean names members.json --dry-run")]
    Names(CleanTarget),

    /// Rewrite blood groups to the eight canonical forms (A+ ... O-)
    #[command(after_help = "\
Examples:
  rostermerge clean blood-groups members.json --json")]
    BloodGroups(CleanTarget),

    /// Reassign duplicate and missing member ids
    #[command(after_help = "\
Examples:
  rostermerge clean ids members.json --output fixed.json")]
    Ids(CleanTarget),
}

#[derive(Args)]
pub struct CleanTarget {
    /// Member collection (JSON array); rewritten in place unless --output is given
    members: PathBuf,

    /// Write the result here instead of over the input
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Print the changes as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Report the changes, but write nothing
    #[arg(long)]
    dry_run: bool,
}

#[derive(Serialize)]
struct CleanReport<'a> {
    pass: &'static str,
    changes: &'a [FieldChange],
    #[serde(flatten)]
    extra: serde_json::Value,
}

pub fn cmd_clean(cmd: CleanCommands) -> Result<(), CliError> {
    match cmd {
        CleanCommands::Names(target) => apply(target, "names", |members| {
            let changes = proper_case_names(members);
            let human = report::change_list("Names", &changes);
            (changes, human, json!({}))
        }),
        CleanCommands::BloodGroups(target) => apply(target, "blood_groups", |members| {
            let result = normalize_blood_groups(members);
            let human = format!(
                "{}\n{}",
                report::change_list("Blood groups", &result.changes),
                report::distribution(&result.distribution)
            );
            (result.changes, human, json!({ "distribution": result.distribution }))
        }),
        CleanCommands::Ids(target) => apply(target, "ids", |members| {
            let changes = fix_duplicate_ids(members);
            let human = format!(
                "{}Unique ids: {}\n",
                report::change_list("Ids", &changes),
                members.len()
            );
            (changes, human, json!({}))
        }),
    }
}

/// Load, run one pass, report, then write unless dry-run or nothing changed.
fn apply<F>(target: CleanTarget, pass: &'static str, run_pass: F) -> Result<(), CliError>
where
    F: FnOnce(&mut Vec<MemberRecord>) -> (Vec<FieldChange>, String, serde_json::Value),
{
    let text = read_text(&target.members, "member file")?;
    let mut members = load_members(&text).map_err(|e| {
        CliError::recon(e).with_hint(format!("check {}", target.members.display()))
    })?;

    let (changes, human, extra) = run_pass(&mut members);
    info!(pass, changes = changes.len(), "clean-up pass finished");
    eprint!("{}", human);

    let destination = target.output.as_ref().unwrap_or(&target.members);
    // A separate --output is always written so callers can rely on it existing.
    if target.dry_run {
        eprintln!("dry run: nothing written");
    } else if !changes.is_empty() || target.output.is_some() {
        write_atomic(destination, &render_members(&members)?)?;
        eprintln!("wrote {}", destination.display());
    }

    if target.json {
        let payload = CleanReport { pass, changes: &changes, extra };
        let json = serde_json::to_string_pretty(&payload)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{}", json);
    }

    Ok(())
}
