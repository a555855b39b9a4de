use tracing::{debug, info};

use crate::config::ReconConfig;
use crate::error::ReconError;
use crate::evidence::{compute_summary, group_tally};
use crate::lookup::build_lookup;
use crate::matcher::best_match;
use crate::model::{GroupRecord, MemberMatch, MemberRecord, ReconMeta, ReconResult, UnmatchedMember};
use crate::role::RoleSet;

/// Reconcile `members` against the parsed groups, annotating each record in
/// place with its group and, for captains, the promoted role.
///
/// Members without a match are set to group 0 with the unassigned label. The
/// only error is a name collision under the `fail` policy, raised before any
/// record is touched.
pub fn run(
    config: &ReconConfig,
    groups: &[GroupRecord],
    members: &mut [MemberRecord],
) -> Result<ReconResult, ReconError> {
    let lookup = build_lookup(groups, &config.parser, config.output.collision_policy)?;
    info!(
        groups = groups.len(),
        names = lookup.len(),
        members = members.len(),
        "reconciling roster"
    );

    let mut matches = Vec::new();
    let mut unmatched = Vec::new();

    for (member_index, member) in members.iter_mut().enumerate() {
        let Some((entry, score)) = best_match(member.name(), &lookup, &config.matching) else {
            debug!(name = member.name(), "no group match");
            unmatched.push(UnmatchedMember {
                member_index,
                name: member.name().to_string(),
            });
            member.assign_group(0, &config.output.unassigned_label);
            continue;
        };

        member.assign_group(entry.group_number, &config.output.group_name(entry.group_number));

        let mut role_changed_to = None;
        if entry.is_captain {
            let mut roles = RoleSet::parse(member.role());
            if roles.promote_to_captain() {
                let rendered = roles.to_string();
                member.set_role(&rendered);
                role_changed_to = Some(rendered);
            }
        }

        matches.push(MemberMatch {
            member_index,
            member_name: member.name().to_string(),
            lookup_name: entry.name.clone(),
            group_number: entry.group_number,
            is_captain: entry.is_captain,
            score,
            role_changed_to,
        });
    }

    let collisions = lookup.collisions().to_vec();
    let summary = compute_summary(members, groups.len(), &matches, &unmatched, &collisions);

    Ok(ReconResult {
        meta: ReconMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            collision_policy: config.output.collision_policy,
            containment: config.matching.containment,
        },
        summary,
        tally: group_tally(members),
        matches,
        unmatched,
        collisions,
    })
}
