//! `rostermerge merge` and `rostermerge parse`.

use std::path::PathBuf;

use rostermerge_recon::model::SkippedBlock;
use rostermerge_recon::store::{load_members, render_groups, render_members};
use rostermerge_recon::{parse_groups, run, ReconResult};
use serde::Serialize;
use tracing::info;

use crate::report;
use crate::util::{load_config, read_text, same_target, stage_write, write_atomic};
use crate::CliError;

pub struct MergeArgs {
    pub raw: PathBuf,
    pub members: PathBuf,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub groups_out: Option<PathBuf>,
    pub json: bool,
    pub dry_run: bool,
    pub preview: usize,
}

/// `--json` payload: the engine result plus what only the CLI knows.
#[derive(Serialize)]
struct MergeReport<'a> {
    #[serde(flatten)]
    result: &'a ReconResult,
    skipped_blocks: &'a [SkippedBlock],
    dry_run: bool,
    written: Option<String>,
}

pub fn cmd_merge(args: MergeArgs) -> Result<(), CliError> {
    let target = args.output.as_ref().unwrap_or(&args.members);
    if let Some(groups_out) = &args.groups_out {
        if same_target(groups_out, target) {
            return Err(CliError::usage(format!(
                "--groups-out {} is the member output file",
                groups_out.display()
            )));
        }
    }

    let config = load_config(args.config.as_deref())?;

    let text = read_text(&args.raw, "roster text")?;
    let parsed = parse_groups(&text, &config.parser);
    info!(
        groups = parsed.groups.len(),
        skipped = parsed.skipped.len(),
        "parsed roster text"
    );

    let members_json = read_text(&args.members, "member file")?;
    let mut members = load_members(&members_json)
        .map_err(|e| CliError::recon(e).with_hint(format!("check {}", args.members.display())))?;

    let result = run(&config, &parsed.groups, &mut members)?;
    let rendered = render_members(&members)?;

    let written = if args.dry_run {
        None
    } else {
        // Stage every output before replacing anything, so a bad export
        // path leaves the member file as it was.
        let members_write = stage_write(target, &rendered)?;
        let groups_write = match &args.groups_out {
            Some(path) => Some(stage_write(path, &render_groups(&parsed.groups)?)?),
            None => None,
        };

        members_write.commit()?;
        info!(path = %target.display(), "wrote member file");
        if let Some(staged) = groups_write {
            staged.commit()?;
            info!("wrote group export");
        }
        Some(target.display().to_string())
    };

    eprint!("{}", report::group_preview(&parsed.groups, &parsed.skipped, args.preview));
    eprintln!();
    eprint!("{}", report::merge_summary(&result, &config.output.unassigned_label));
    match &written {
        Some(path) => eprintln!("\nwrote {}", path),
        None => eprintln!("\ndry run: nothing written"),
    }

    if args.json {
        let payload = MergeReport {
            result: &result,
            skipped_blocks: &parsed.skipped,
            dry_run: args.dry_run,
            written,
        };
        let json = serde_json::to_string_pretty(&payload)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{}", json);
    }

    Ok(())
}

pub fn cmd_parse(
    raw: PathBuf,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let config = load_config(config.as_deref())?;
    let text = read_text(&raw, "roster text")?;
    let parsed = parse_groups(&text, &config.parser);

    for block in &parsed.skipped {
        eprintln!(
            "skipped block {}: header {:?} is not a group number",
            block.index, block.header
        );
    }

    let json = render_groups(&parsed.groups)?;
    match output {
        Some(path) => {
            write_atomic(&path, &json)?;
            eprintln!("wrote {} groups to {}", parsed.groups.len(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
