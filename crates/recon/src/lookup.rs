use std::collections::HashMap;

use tracing::warn;

use crate::config::{CollisionPolicy, ParserConfig};
use crate::error::ReconError;
use crate::matcher::normalize_name;
use crate::model::{Collision, GroupRecord, LookupEntry};

/// Name table built from the parsed groups, in roster order.
#[derive(Debug, Default)]
pub struct NameLookup {
    entries: Vec<LookupEntry>,
    /// Keyed by `normalize_name`, so entries the matcher scores as exact
    /// duplicates share one slot.
    index: HashMap<String, usize>,
    collisions: Vec<Collision>,
}

impl NameLookup {
    pub fn entries(&self) -> &[LookupEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&LookupEntry> {
        self.index.get(&normalize_name(name)).map(|&i| &self.entries[i])
    }

    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(
        &mut self,
        name: &str,
        group_number: u32,
        is_captain: bool,
        policy: CollisionPolicy,
    ) -> Result<(), ReconError> {
        let key = lookup_key(name);
        let identity = normalize_name(name);
        if identity.is_empty() {
            return Ok(());
        }

        let Some(&existing) = self.index.get(&identity) else {
            self.index.insert(identity, self.entries.len());
            self.entries.push(LookupEntry {
                key,
                name: name.trim().to_string(),
                group_number,
                is_captain,
            });
            return Ok(());
        };

        let entry = &mut self.entries[existing];
        if entry.group_number == group_number {
            // Captains are often repeated in their own numbered list.
            entry.is_captain |= is_captain;
            return Ok(());
        }

        match policy {
            CollisionPolicy::Fail => Err(ReconError::NameCollision {
                key,
                first_group: entry.group_number,
                second_group: group_number,
            }),
            CollisionPolicy::KeepFirst => {
                warn!(
                    name = %key,
                    kept = entry.group_number,
                    dropped = group_number,
                    "name listed in two groups; keeping first"
                );
                self.collisions.push(Collision {
                    key,
                    kept_group: entry.group_number,
                    dropped_group: group_number,
                });
                Ok(())
            }
        }
    }
}

/// Key a roster name: commas removed, trimmed, lower-cased.
pub fn lookup_key(name: &str) -> String {
    name.replace(',', "").trim().to_lowercase()
}

/// Build the lookup table. Within each group captains go in before members;
/// placeholder member entries are left out.
pub fn build_lookup(
    groups: &[GroupRecord],
    parser: &ParserConfig,
    policy: CollisionPolicy,
) -> Result<NameLookup, ReconError> {
    let mut lookup = NameLookup::default();

    for group in groups {
        for captain in &group.captains {
            lookup.insert(captain, group.group_number, true, policy)?;
        }
        for member in &group.members {
            if parser.is_placeholder(member.trim()) {
                continue;
            }
            lookup.insert(member, group.group_number, false, policy)?;
        }
    }

    Ok(lookup)
}
