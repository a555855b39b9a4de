//! JSON codec for the member collection and the group export.

use serde_json::Value;

use crate::error::ReconError;
use crate::model::{GroupRecord, MemberRecord, FIELD_NAME};

/// Parse a member collection: a JSON array of objects, each with a string
/// `name`. Everything else in each object is carried through untouched.
pub fn load_members(json: &str) -> Result<Vec<MemberRecord>, ReconError> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| ReconError::MemberParse(e.to_string()))?;

    let Value::Array(items) = value else {
        return Err(ReconError::MemberParse(
            "expected a JSON array of member objects".into(),
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(fields) => {
                if !matches!(fields.get(FIELD_NAME), Some(Value::String(_))) {
                    return Err(ReconError::MemberParse(format!(
                        "member {index}: missing string field 'name'"
                    )));
                }
                Ok(MemberRecord::from_object(fields))
            }
            other => Err(ReconError::MemberParse(format!(
                "member {index}: expected an object, found {}",
                json_kind(&other)
            ))),
        })
        .collect()
}

/// Pretty JSON with two-space indentation. Non-ASCII text is written as is.
pub fn render_members(members: &[MemberRecord]) -> Result<String, ReconError> {
    serde_json::to_string_pretty(members).map_err(|e| ReconError::Serialize(e.to_string()))
}

/// Parsed groups as a JSON array of `{groupNumber, captains, members}`.
pub fn render_groups(groups: &[GroupRecord]) -> Result<String, ReconError> {
    serde_json::to_string_pretty(groups).map_err(|e| ReconError::Serialize(e.to_string()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
