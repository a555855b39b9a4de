use std::path::PathBuf;

use rostermerge_recon::cleanup::{fix_duplicate_ids, normalize_blood_groups};
use rostermerge_recon::config::ReconConfig;
use rostermerge_recon::model::{GroupTally, MemberRecord};
use rostermerge_recon::store::{load_members, render_members};
use rostermerge_recon::{parse_groups, run, MatchScore, ReconError};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn fixture(name: &str) -> String {
    let path = fixtures_dir().join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
}

fn load_and_run(config: &ReconConfig) -> (Vec<MemberRecord>, rostermerge_recon::ReconResult) {
    let parsed = parse_groups(&fixture("raw.txt"), &config.parser);
    let mut members = load_members(&fixture("members.json")).unwrap();
    let result = run(config, &parsed.groups, &mut members).unwrap();
    (members, result)
}

// -------------------------------------------------------------------------
// Parsing
// -------------------------------------------------------------------------

#[test]
fn fixture_parses_three_groups_and_skips_one() {
    let parsed = parse_groups(&fixture("raw.txt"), &ReconConfig::default().parser);

    let numbers: Vec<u32> = parsed.groups.iter().map(|g| g.group_number).collect();
    assert_eq!(numbers, vec![1, 2, 5]);
    assert_eq!(parsed.groups[0].captains, vec!["Dr. Anand Kulkarni", "Meena Joshi"]);
    assert_eq!(
        parsed.groups[0].members,
        vec!["Anand Kulkarni", "Prakash Deshmukh", "Sunita Rao"]
    );
    assert_eq!(parsed.groups[1].captains, vec!["Rajesh Kumar Iyer"]);
    assert!(parsed.groups[2].captains.is_empty());

    assert_eq!(parsed.skipped.len(), 1);
    assert_eq!(parsed.skipped[0].header, "two");
}

// -------------------------------------------------------------------------
// Reconciliation
// -------------------------------------------------------------------------

#[test]
fn fixture_assignments() {
    let (members, result) = load_and_run(&ReconConfig::default());

    let view: Vec<(&str, u32, &str, &str)> = members
        .iter()
        .map(|m| (m.name(), m.group_number(), m.group_name().unwrap(), m.role()))
        .collect();
    assert_eq!(
        view,
        vec![
            ("Anand Kulkarni", 1, "Group 1", "President, Cooking Captain"),
            ("Meena  Joshi", 1, "Group 1", "Cooking Captain"),
            ("Prakash S. Deshmukh", 1, "Group 1", "Secretary"),
            ("Iyer Rajesh Kumar", 2, "Group 2", "Cooking Captain"),
            ("José Fernandes", 2, "Group 2", "Member"),
            ("Farhan Sheikh", 5, "Group 5", "Member"),
            ("Ghost Member", 0, "Unassigned", "Member"),
            ("Unlisted Person", 0, "Unassigned", "Treasurer"),
        ]
    );

    let s = &result.summary;
    assert_eq!(s.members, 8);
    assert_eq!(s.groups, 3);
    assert_eq!(s.matched, 6);
    assert_eq!(s.captains, 3);
    assert_eq!(s.unmatched, 2);
    assert_eq!(s.collisions, 0);

    // Honorific-prefixed captain entry beats the plain member entry.
    assert_eq!(result.matches[0].lookup_name, "Dr. Anand Kulkarni");
    assert!(result.matches[0].is_captain);
    assert_eq!(result.matches[2].score, MatchScore::TokenOverlap { shared: 2 });
    assert_eq!(result.matches[3].score, MatchScore::TokenOverlap { shared: 3 });
}

#[test]
fn fixture_tally() {
    let (_, result) = load_and_run(&ReconConfig::default());
    assert_eq!(
        result.tally,
        vec![
            GroupTally { group_number: 0, total: 2, captains: 0 },
            GroupTally { group_number: 1, total: 3, captains: 2 },
            GroupTally { group_number: 2, total: 2, captains: 1 },
            GroupTally { group_number: 5, total: 1, captains: 0 },
        ]
    );
}

#[test]
fn second_pass_is_stable() {
    let config = ReconConfig::default();
    let parsed = parse_groups(&fixture("raw.txt"), &config.parser);

    let mut members = load_members(&fixture("members.json")).unwrap();
    run(&config, &parsed.groups, &mut members).unwrap();
    let first = render_members(&members).unwrap();

    let mut reloaded = load_members(&first).unwrap();
    let second_result = run(&config, &parsed.groups, &mut reloaded).unwrap();
    let second = render_members(&reloaded).unwrap();

    assert_eq!(first, second);
    assert!(second_result.matches.iter().all(|m| m.role_changed_to.is_none()));
}

#[test]
fn output_keeps_unknown_fields_and_order() {
    let (members, _) = load_and_run(&ReconConfig::default());
    let out = render_members(&members).unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();

    let first = value[0].as_object().unwrap();
    let keys: Vec<&str> = first.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec!["id", "name", "role", "photo", "phone", "bloodGroup", "groupNumber", "groupName"]
    );
    assert!(out.contains("José Fernandes"), "non-ASCII must not be escaped");
}

#[test]
fn strict_config_fixture() {
    let config = ReconConfig::from_toml(&fixture("strict.toml")).unwrap();
    let (_, result) = load_and_run(&config);
    assert_eq!(result.summary.matched, 6);
    assert!(result.meta.containment);
}

#[test]
fn strict_config_rejects_cross_group_duplicate() {
    let config = ReconConfig::from_toml(&fixture("strict.toml")).unwrap();
    let text = format!("{}\nGroup No - 9\n1. Sunita Rao\n", fixture("raw.txt"));
    let parsed = parse_groups(&text, &config.parser);
    let mut members = load_members(&fixture("members.json")).unwrap();

    let err = run(&config, &parsed.groups, &mut members).unwrap_err();
    assert!(matches!(
        err,
        ReconError::NameCollision { first_group: 1, second_group: 9, .. }
    ));
}

// -------------------------------------------------------------------------
// Clean-up passes on the same collection
// -------------------------------------------------------------------------

#[test]
fn cleanup_passes_on_fixture() {
    let mut members = load_members(&fixture("members.json")).unwrap();

    let report = normalize_blood_groups(&mut members);
    let groups: Vec<&str> = members.iter().map(|m| m.blood_group().unwrap()).collect();
    assert_eq!(groups, vec!["B+", "O+", "", "AB+", "A-", "O+", "", "B-"]);
    assert_eq!(report.changes.len(), 4);
    assert_eq!(report.distribution.get("O+"), Some(&2));
    assert_eq!(report.distribution.get("Not provided"), Some(&2));

    assert!(fix_duplicate_ids(&mut members).is_empty());
}
