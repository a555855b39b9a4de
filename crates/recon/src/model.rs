use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::CollisionPolicy;
use crate::matcher::MatchScore;

// ---------------------------------------------------------------------------
// Parsed roster
// ---------------------------------------------------------------------------

/// One "Group No - N" block: a group number with its captains and members,
/// names kept as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRecord {
    pub group_number: u32,
    pub captains: Vec<String>,
    pub members: Vec<String>,
}

/// A block whose header line was not a group number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedBlock {
    /// Zero-based position among the delimiter-separated blocks.
    pub index: usize,
    pub header: String,
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupEntry {
    /// Lower-cased name with commas removed.
    pub key: String,
    /// Name as it appeared in the roster text.
    pub name: String,
    pub group_number: u32,
    pub is_captain: bool,
}

/// Two groups listing the same lookup name. The entry from `kept_group` wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collision {
    pub key: String,
    pub kept_group: u32,
    pub dropped_group: u32,
}

// ---------------------------------------------------------------------------
// Member records
// ---------------------------------------------------------------------------

/// A member object from the roster collection.
///
/// Stored as the raw JSON object so fields this tool does not know about
/// survive a load/save cycle untouched and in their original order. Typed
/// accessors cover the fields reconciliation and clean-up read or write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberRecord(Map<String, Value>);

pub const FIELD_ID: &str = "id";
pub const FIELD_NAME: &str = "name";
pub const FIELD_ROLE: &str = "role";
pub const FIELD_GROUP_NUMBER: &str = "groupNumber";
pub const FIELD_GROUP_NAME: &str = "groupName";
pub const FIELD_BLOOD_GROUP: &str = "bloodGroup";

impl MemberRecord {
    pub fn new(name: &str, role: &str) -> Self {
        let mut fields = Map::new();
        fields.insert(FIELD_NAME.into(), Value::String(name.into()));
        fields.insert(FIELD_ROLE.into(), Value::String(role.into()));
        Self(fields)
    }

    pub(crate) fn from_object(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    fn str_field(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    fn set_str_field(&mut self, field: &str, value: &str) {
        self.0.insert(field.into(), Value::String(value.into()));
    }

    pub fn name(&self) -> &str {
        self.str_field(FIELD_NAME).unwrap_or_default()
    }

    pub fn set_name(&mut self, name: &str) {
        self.set_str_field(FIELD_NAME, name);
    }

    pub fn role(&self) -> &str {
        self.str_field(FIELD_ROLE).unwrap_or_default()
    }

    pub fn set_role(&mut self, role: &str) {
        self.set_str_field(FIELD_ROLE, role);
    }

    /// Ids appear as strings or bare numbers in exported rosters.
    pub fn id(&self) -> Option<String> {
        match self.0.get(FIELD_ID)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn set_id(&mut self, id: &str) {
        self.set_str_field(FIELD_ID, id);
    }

    /// 0 when absent or not a non-negative integer.
    pub fn group_number(&self) -> u32 {
        self.0
            .get(FIELD_GROUP_NUMBER)
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0)
    }

    pub fn group_name(&self) -> Option<&str> {
        self.str_field(FIELD_GROUP_NAME)
    }

    pub fn assign_group(&mut self, group_number: u32, group_name: &str) {
        self.0
            .insert(FIELD_GROUP_NUMBER.into(), Value::from(group_number));
        self.set_str_field(FIELD_GROUP_NAME, group_name);
    }

    pub fn blood_group(&self) -> Option<&str> {
        self.str_field(FIELD_BLOOD_GROUP)
    }

    pub fn set_blood_group(&mut self, blood_group: &str) {
        self.set_str_field(FIELD_BLOOD_GROUP, blood_group);
    }
}

// ---------------------------------------------------------------------------
// Reconciliation output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct MemberMatch {
    pub member_index: usize,
    pub member_name: String,
    pub lookup_name: String,
    pub group_number: u32,
    pub is_captain: bool,
    pub score: MatchScore,
    /// Role text after the run, when promotion changed it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_changed_to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmatchedMember {
    pub member_index: usize,
    pub name: String,
}

/// Member count per group number; group 0 holds the unassigned members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupTally {
    pub group_number: u32,
    pub total: usize,
    pub captains: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    pub members: usize,
    pub groups: usize,
    pub matched: usize,
    pub captains: usize,
    pub unmatched: usize,
    pub collisions: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub engine_version: String,
    pub run_at: String,
    pub collision_policy: CollisionPolicy,
    pub containment: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub tally: Vec<GroupTally>,
    pub matches: Vec<MemberMatch>,
    pub unmatched: Vec<UnmatchedMember>,
    pub collisions: Vec<Collision>,
}
