use std::collections::BTreeMap;

use crate::model::{Collision, GroupTally, MemberMatch, MemberRecord, ReconSummary, UnmatchedMember};
use crate::role::RoleSet;

/// Compute summary statistics for a finished run.
pub fn compute_summary(
    members: &[MemberRecord],
    groups: usize,
    matches: &[MemberMatch],
    unmatched: &[UnmatchedMember],
    collisions: &[Collision],
) -> ReconSummary {
    ReconSummary {
        members: members.len(),
        groups,
        matched: matches.len(),
        captains: matches.iter().filter(|m| m.is_captain).count(),
        unmatched: unmatched.len(),
        collisions: collisions.len(),
    }
}

/// Members and captains per group number, ascending. Captains are counted by
/// role tag, so captains carried over from earlier runs are included.
pub fn group_tally(members: &[MemberRecord]) -> Vec<GroupTally> {
    let mut counts: BTreeMap<u32, (usize, usize)> = BTreeMap::new();

    for member in members {
        let entry = counts.entry(member.group_number()).or_insert((0, 0));
        entry.0 += 1;
        if RoleSet::parse(member.role()).is_captain() {
            entry.1 += 1;
        }
    }

    counts
        .into_iter()
        .map(|(group_number, (total, captains))| GroupTally {
            group_number,
            total,
            captains,
        })
        .collect()
}
