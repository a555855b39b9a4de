//! Roster clean-up passes run over the member collection.

use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use serde_json::Value;

use crate::model::{MemberRecord, FIELD_BLOOD_GROUP, FIELD_ID};

/// One field rewritten by a clean-up pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChange {
    pub member_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub before: String,
    pub after: String,
}

fn change(index: usize, member: &MemberRecord, before: &str, after: &str) -> FieldChange {
    FieldChange {
        member_index: index,
        id: member.id(),
        name: member.name().to_string(),
        before: before.to_string(),
        after: after.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Names
// ---------------------------------------------------------------------------

/// Title-case a name: each word capitalized with the rest lower-cased,
/// single letters upper-cased, dotted initials cased per part.
pub fn proper_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            if word.contains('.') {
                word.split('.').map(case_part).collect::<Vec<_>>().join(".")
            } else {
                case_part(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn case_part(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
    }
}

pub fn proper_case_names(members: &mut [MemberRecord]) -> Vec<FieldChange> {
    let mut changes = Vec::new();
    for (index, member) in members.iter_mut().enumerate() {
        let before = member.name().to_string();
        let after = proper_case(&before);
        if before != after {
            changes.push(change(index, member, &before, &after));
            member.set_name(&after);
        }
    }
    changes
}

// ---------------------------------------------------------------------------
// Blood groups
// ---------------------------------------------------------------------------

pub const BLOOD_GROUPS: &[&str] = &["O+", "O-", "A+", "A-", "B+", "B-", "AB+", "AB-"];

struct BloodPatterns {
    prefix_label: Regex,
    prefix_bg: Regex,
    positive: Regex,
    negative: Regex,
    ve_suffix: Regex,
    zero_for_o: Regex,
    trailing_punct: Regex,
    a1_subtype: Regex,
    non_type: Regex,
}

static BLOOD: LazyLock<BloodPatterns> = LazyLock::new(|| {
    let re = |p: &str| Regex::new(p).expect("blood group pattern");
    BloodPatterns {
        prefix_label: re(r"^BLOOD\s*GROUP[-:.\s]*"),
        prefix_bg: re(r"^BG[-:.\s]*"),
        positive: re(r"\s*POS(I)?TIVE\s*$"),
        negative: re(r"\s*NEGATIVE\s*$"),
        ve_suffix: re(r"([+-])\s*VE\.?$"),
        zero_for_o: re(r"^0([+-])"),
        trailing_punct: re(r"[.,;:]+$"),
        a1_subtype: re(r"^A1([+-])"),
        non_type: re(r"[^ABO+-]"),
    }
});

/// Canonical ABO/Rh form (`AB+`, `O-`, ...) of a free-text blood group, or
/// an empty string when the type cannot be determined.
pub fn normalize_blood_group(raw: &str) -> String {
    let p = &*BLOOD;

    let upper = raw.to_uppercase();
    let mut s = upper.split_whitespace().collect::<Vec<_>>().join(" ");
    if s.is_empty() {
        return String::new();
    }

    s = p.prefix_label.replace(&s, "").into_owned();
    s = p.prefix_bg.replace(&s, "").into_owned();
    s = p.positive.replace(&s, "+").into_owned();
    s = p.negative.replace(&s, "-").into_owned();
    s = p.ve_suffix.replace(&s, "$1").into_owned();
    s.retain(|c| !c.is_whitespace());
    s = p.zero_for_o.replace(&s, "O$1").into_owned();
    s = s.trim_start_matches('.').to_string();
    s = p.trailing_punct.replace(&s, "").into_owned();
    s = p.a1_subtype.replace(&s, "A$1").into_owned();
    s = p.non_type.replace_all(&s, "").into_owned();

    if BLOOD_GROUPS.contains(&s.as_str()) {
        return s;
    }

    let sign = if s.contains('+') {
        "+"
    } else if s.contains('-') {
        "-"
    } else {
        return String::new();
    };
    let abo = if s.contains("AB") {
        "AB"
    } else if s.contains('A') {
        "A"
    } else if s.contains('B') {
        "B"
    } else if s.contains('O') {
        "O"
    } else {
        return String::new();
    };
    format!("{abo}{sign}")
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BloodGroupReport {
    pub changes: Vec<FieldChange>,
    /// Members per normalized blood group; blank values count under
    /// `"Not provided"`.
    pub distribution: BTreeMap<String, usize>,
}

pub fn normalize_blood_groups(members: &mut [MemberRecord]) -> BloodGroupReport {
    let mut report = BloodGroupReport::default();

    for (index, member) in members.iter_mut().enumerate() {
        // Missing and non-string values are rewritten as "" and reported
        // with their JSON text.
        let (before, after) = match member.get(FIELD_BLOOD_GROUP) {
            Some(Value::String(s)) => (s.clone(), normalize_blood_group(s)),
            Some(other) => (other.to_string(), String::new()),
            None => (String::new(), String::new()),
        };
        let unchanged =
            matches!(member.get(FIELD_BLOOD_GROUP), Some(Value::String(s)) if *s == after);
        if !unchanged {
            report.changes.push(change(index, member, &before, &after));
            member.set_blood_group(&after);
        }

        let label = if after.is_empty() { "Not provided".to_string() } else { after };
        *report.distribution.entry(label).or_insert(0) += 1;
    }

    report
}

// ---------------------------------------------------------------------------
// Ids
// ---------------------------------------------------------------------------

/// Leading decimal digits of an id, as `parseInt` would read them.
fn numeric_prefix(id: &str) -> u64 {
    let digits: String = id.trim().chars().take_while(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

/// An id as stored: `5` and `"5"` are different ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum IdKey {
    Text(String),
    Number(String),
}

fn id_key(member: &MemberRecord) -> Option<IdKey> {
    match member.get(FIELD_ID)? {
        Value::String(s) => Some(IdKey::Text(s.clone())),
        Value::Number(n) => Some(IdKey::Number(n.to_string())),
        _ => None,
    }
}

/// Give every member a unique id. The first holder of an id keeps it; later
/// holders, and members without an id, get the next number above the
/// highest numeric id in the collection. Ids compare with their JSON type,
/// so a numeric `5` and a string `"5"` are not duplicates.
pub fn fix_duplicate_ids(members: &mut [MemberRecord]) -> Vec<FieldChange> {
    let mut next = members
        .iter()
        .filter_map(MemberRecord::id)
        .map(|id| numeric_prefix(&id))
        .max()
        .unwrap_or(0);

    let mut seen: HashSet<IdKey> = HashSet::new();
    let mut changes = Vec::new();

    for (index, member) in members.iter_mut().enumerate() {
        if let Some(key) = id_key(member) {
            if seen.insert(key) {
                continue;
            }
        }

        let fresh = loop {
            next += 1;
            let candidate = next.to_string();
            if !seen.contains(&IdKey::Text(candidate.clone()))
                && !seen.contains(&IdKey::Number(candidate.clone()))
            {
                break candidate;
            }
        };
        let before = member.id().unwrap_or_default();
        changes.push(change(index, member, &before, &fresh));
        member.set_id(&fresh);
        seen.insert(IdKey::Text(fresh));
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proper_case_words_and_initials() {
        assert_eq!(proper_case("  RAMESH   kumar\n gupta "), "Ramesh Kumar Gupta");
        assert_eq!(proper_case("a.b. roy"), "A.B. Roy");
        assert_eq!(proper_case("dr.SHARMA"), "Dr.Sharma");
        assert_eq!(proper_case("k"), "K");
        assert_eq!(proper_case(""), "");
    }

    #[test]
    fn proper_case_names_reports_changes_once() {
        let mut members = vec![
            MemberRecord::new("ASHA DEVI", "Member"),
            MemberRecord::new("Ravi Rao", "Member"),
        ];
        let changes = proper_case_names(&mut members);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].before, "ASHA DEVI");
        assert_eq!(members[0].name(), "Asha Devi");
        assert!(proper_case_names(&mut members).is_empty());
    }

    #[test]
    fn blood_group_spellings() {
        let cases = [
            ("O+", "O+"),
            ("o +ve", "O+"),
            ("B POSITIVE", "B+"),
            ("ab negative", "AB-"),
            ("A postive", "A+"),
            ("Blood Group: A1+", "A+"),
            ("BG- 0+", "O+"),
            ("B-ve.", "B-"),
            ("\nAB\n+\n", "AB+"),
            ("A+.", "A+"),
            ("unknown", ""),
            ("", ""),
            ("AB", ""),
        ];
        for (raw, expected) in cases {
            assert_eq!(normalize_blood_group(raw), expected, "input {raw:?}");
        }
    }

    #[test]
    fn blood_group_normalization_is_idempotent() {
        for bg in BLOOD_GROUPS {
            assert_eq!(normalize_blood_group(bg), *bg);
        }
    }

    #[test]
    fn blood_group_report() {
        let mut members = vec![
            MemberRecord::new("a", "Member"),
            MemberRecord::new("b", "Member"),
            MemberRecord::new("c", "Member"),
        ];
        members[0].set_blood_group("b +ve");
        members[1].set_blood_group("B+");

        let report = normalize_blood_groups(&mut members);
        assert_eq!(report.changes.len(), 2);
        assert_eq!(report.changes[0].after, "B+");
        assert_eq!((report.changes[1].before.as_str(), report.changes[1].member_index), ("", 2));
        assert_eq!(report.distribution.get("B+"), Some(&2));
        assert_eq!(report.distribution.get("Not provided"), Some(&1));
        assert_eq!(members[2].blood_group(), Some(""));
    }

    #[test]
    fn non_string_blood_group_rewrite_is_reported() {
        let json = r#"[{"name": "a", "bloodGroup": null}, {"name": "b", "bloodGroup": 5},
                       {"name": "c", "bloodGroup": ""}]"#;
        let mut members = crate::store::load_members(json).unwrap();

        let report = normalize_blood_groups(&mut members);
        let befores: Vec<&str> = report.changes.iter().map(|c| c.before.as_str()).collect();
        assert_eq!(befores, vec!["null", "5"]);
        assert!(report.changes.iter().all(|c| c.after.is_empty()));
        assert_eq!(members[1].blood_group(), Some(""));
        assert_eq!(report.distribution.get("Not provided"), Some(&3));

        assert!(normalize_blood_groups(&mut members).changes.is_empty());
    }

    #[test]
    fn duplicate_ids_get_fresh_numbers() {
        let mut members: Vec<MemberRecord> = ["1", "2", "2", "7", "1"]
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let mut m = MemberRecord::new(&format!("m{i}"), "Member");
                m.set_id(id);
                m
            })
            .collect();

        let changes = fix_duplicate_ids(&mut members);
        let ids: Vec<String> = members.iter().filter_map(MemberRecord::id).collect();
        assert_eq!(ids, vec!["1", "2", "8", "7", "9"]);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].before, "2");
        assert_eq!(changes[0].after, "8");

        assert!(fix_duplicate_ids(&mut members).is_empty());
    }

    #[test]
    fn numeric_and_string_ids_are_distinct() {
        let json = r#"[{"id": 5, "name": "a"}, {"id": "5", "name": "b"},
                       {"id": 5, "name": "c"}, {"name": "d"}]"#;
        let mut members = crate::store::load_members(json).unwrap();

        let changes = fix_duplicate_ids(&mut members);
        let moved: Vec<(usize, &str, &str)> = changes
            .iter()
            .map(|c| (c.member_index, c.before.as_str(), c.after.as_str()))
            .collect();
        assert_eq!(moved, vec![(2, "5", "6"), (3, "", "7")]);
        assert_eq!(members[0].get("id"), Some(&serde_json::json!(5)));
        assert_eq!(members[1].get("id"), Some(&serde_json::json!("5")));
    }

    #[test]
    fn missing_id_is_assigned() {
        let mut members = vec![MemberRecord::new("a", "Member"), MemberRecord::new("b", "Member")];
        members[0].set_id("3");
        let changes = fix_duplicate_ids(&mut members);
        assert_eq!(members[1].id().as_deref(), Some("4"));
        assert_eq!(changes[0].before, "");
    }
}
