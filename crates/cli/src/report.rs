//! Human-readable reports. Everything here goes to stderr so stdout stays
//! clean for `--json` and `parse` output.

use std::collections::BTreeMap;
use std::fmt::Write;

use rostermerge_recon::cleanup::FieldChange;
use rostermerge_recon::model::SkippedBlock;
use rostermerge_recon::{GroupRecord, ReconResult};

use crate::util::fit_column;

/// Names shown per group in the preview before eliding.
const PREVIEW_MEMBERS: usize = 3;

pub fn group_preview(groups: &[GroupRecord], skipped: &[SkippedBlock], limit: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Parsed {} groups", groups.len());

    for group in groups.iter().take(limit) {
        let _ = writeln!(out, "  Group {}:", group.group_number);
        let _ = writeln!(out, "    Captains: {}", list_or_none(&group.captains));
        let shown: Vec<String> =
            group.members.iter().take(PREVIEW_MEMBERS).cloned().collect();
        let more = if group.members.len() > PREVIEW_MEMBERS { ", ..." } else { "" };
        let _ = writeln!(
            out,
            "    Members ({}): {}{}",
            group.members.len(),
            list_or_none(&shown),
            more
        );
    }
    if groups.len() > limit {
        let _ = writeln!(out, "  ... {} more", groups.len() - limit);
    }

    for block in skipped {
        let _ = writeln!(
            out,
            "  skipped block {}: header {:?} is not a group number",
            block.index, block.header
        );
    }
    out
}

pub fn merge_summary(result: &ReconResult, unassigned_label: &str) -> String {
    let mut out = String::new();
    let s = &result.summary;

    let _ = writeln!(out, "Updated {} of {} members with group info", s.matched, s.members);
    let _ = writeln!(out, "Found {} cooking captains", s.captains);

    let changed: Vec<_> =
        result.matches.iter().filter(|m| m.role_changed_to.is_some()).collect();
    if !changed.is_empty() {
        let _ = writeln!(out, "\nRole changes:");
        for m in changed {
            let role = m.role_changed_to.as_deref().unwrap_or_default();
            let _ = writeln!(out, "  {} -> {}", fit_column(&m.member_name, 28), role);
        }
    }

    let _ = writeln!(out, "\nGroups:");
    for tally in &result.tally {
        if tally.group_number == 0 {
            let _ = writeln!(out, "  {}: {} members", unassigned_label, tally.total);
        } else {
            let _ = writeln!(
                out,
                "  Group {}: {} members, {} captains",
                tally.group_number, tally.total, tally.captains
            );
        }
    }

    if !result.unmatched.is_empty() {
        let _ = writeln!(out, "\nNot found in any group ({}):", result.unmatched.len());
        for u in &result.unmatched {
            let _ = writeln!(out, "  {}", u.name);
        }
    }

    if !result.collisions.is_empty() {
        let _ = writeln!(out, "\nListed in more than one group ({}):", result.collisions.len());
        for c in &result.collisions {
            let _ = writeln!(
                out,
                "  {}: kept Group {}, ignored Group {}",
                c.key, c.kept_group, c.dropped_group
            );
        }
    }
    out
}

pub fn change_list(title: &str, changes: &[FieldChange]) -> String {
    let mut out = String::new();
    if changes.is_empty() {
        let _ = writeln!(out, "{}: nothing to change", title);
        return out;
    }

    let _ = writeln!(out, "{} ({}):", title, changes.len());
    for c in changes {
        let id = c.id.as_deref().unwrap_or("-");
        let _ = writeln!(
            out,
            "  [{}] {} {:?} -> {:?}",
            fit_column(id, 4),
            fit_column(&c.name, 24),
            c.before,
            c.after
        );
    }
    out
}

pub fn distribution(counts: &BTreeMap<String, usize>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Distribution:");
    for (label, count) in counts {
        let _ = writeln!(out, "  {}{}", fit_column(label, 15), count);
    }
    out
}

fn list_or_none(names: &[String]) -> String {
    if names.is_empty() {
        "(none)".to_string()
    } else {
        names.join(", ")
    }
}
