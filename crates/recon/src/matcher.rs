use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::MatchingConfig;
use crate::lookup::NameLookup;
use crate::model::LookupEntry;

/// Leading tokens dropped during normalization.
const HONORIFICS: &[&str] = &["dr", "mr", "mrs", "ms", "miss", "prof", "smt", "shri", "sri"];

/// How two names matched. Variant order is rank order: a later variant
/// always beats an earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchScore {
    Containment,
    TokenOverlap { shared: usize },
    Exact,
}

/// Canonical comparison form of a person's name.
///
/// Periods and commas are removed, whitespace runs collapse to one space, the
/// result is lower-cased and leading honorifics are dropped while at least one
/// other token remains.
pub fn normalize_name(name: &str) -> String {
    let stripped: String = name.chars().filter(|c| !matches!(c, '.' | ',')).collect();
    let tokens: Vec<String> = stripped.split_whitespace().map(str::to_lowercase).collect();

    let mut start = 0;
    while tokens.len() - start > 1 && HONORIFICS.contains(&tokens[start].as_str()) {
        start += 1;
    }

    tokens[start..].join(" ")
}

/// Score a pair of names; `None` means no match. Symmetric in `a` and `b`.
pub fn score_match(a: &str, b: &str, config: &MatchingConfig) -> Option<MatchScore> {
    let n1 = normalize_name(a);
    let n2 = normalize_name(b);

    if n1.is_empty() || n2.is_empty() {
        return None;
    }

    if n1 == n2 {
        return Some(MatchScore::Exact);
    }

    let words1 = significant_tokens(&n1, config.min_token_len);
    let words2 = significant_tokens(&n2, config.min_token_len);
    if words1.len() >= config.min_shared_tokens && words2.len() >= config.min_shared_tokens {
        let shared = words1.intersection(&words2).count();
        if shared >= config.min_shared_tokens {
            return Some(MatchScore::TokenOverlap { shared });
        }
    }

    if config.containment
        && n1.chars().count() > config.containment_min_len
        && n2.chars().count() > config.containment_min_len
        && (n1.contains(&n2) || n2.contains(&n1))
    {
        return Some(MatchScore::Containment);
    }

    None
}

pub fn names_match(a: &str, b: &str, config: &MatchingConfig) -> bool {
    score_match(a, b, config).is_some()
}

fn significant_tokens(normalized: &str, min_len: usize) -> BTreeSet<&str> {
    normalized
        .split(' ')
        .filter(|w| w.chars().count() > min_len)
        .collect()
}

/// Best lookup entry for `name`.
///
/// Higher score wins; ties go to the lower group number, then to captain
/// entries, then to the earlier entry in the table.
pub fn best_match<'a>(
    name: &str,
    lookup: &'a NameLookup,
    config: &MatchingConfig,
) -> Option<(&'a LookupEntry, MatchScore)> {
    let mut best: Option<(&LookupEntry, MatchScore)> = None;

    for entry in lookup.entries() {
        let Some(score) = score_match(name, &entry.key, config) else {
            continue;
        };
        let better = match best {
            None => true,
            Some((current, current_score)) => {
                rank(entry, score, current, current_score) == Ordering::Greater
            }
        };
        if better {
            best = Some((entry, score));
        }
    }

    best
}

/// Strict ordering between two candidates. Equal candidates keep the earlier
/// entry because only `Greater` replaces it.
fn rank(a: &LookupEntry, a_score: MatchScore, b: &LookupEntry, b_score: MatchScore) -> Ordering {
    a_score
        .cmp(&b_score)
        .then_with(|| b.group_number.cmp(&a.group_number))
        .then_with(|| a.is_captain.cmp(&b.is_captain))
}
