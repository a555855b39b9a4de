use serde::{Deserialize, Serialize};

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Run configuration. Every section and field has a default, so an empty
/// TOML document is a valid config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconConfig {
    #[serde(default)]
    pub parser: ParserConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserConfig {
    /// Literal text that starts every group block.
    pub delimiter: String,
    /// Case-sensitive substring marking the captain header line.
    pub captain_marker: String,
    /// Member entries that stand for an empty slot.
    pub placeholders: Vec<String>,
    /// Length of the leading digit run treated as a phone number.
    pub phone_digits: usize,
    /// Captain lines at or below this many characters are noise.
    pub min_captain_len: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: "Group No - ".into(),
            captain_marker: "Captain".into(),
            placeholders: vec!["DIL".into()],
            phone_digits: 10,
            min_captain_len: 3,
        }
    }
}

impl ParserConfig {
    pub fn is_placeholder(&self, name: &str) -> bool {
        self.placeholders.iter().any(|p| p == name)
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchingConfig {
    /// Tokens must be longer than this to count toward overlap.
    pub min_token_len: usize,
    /// Shared significant tokens required for a token-overlap match.
    pub min_shared_tokens: usize,
    /// Allow substring containment between long names.
    pub containment: bool,
    /// Both normalized names must be longer than this for containment.
    pub containment_min_len: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            min_token_len: 2,
            min_shared_tokens: 2,
            containment: false,
            containment_min_len: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub unassigned_label: String,
    pub group_name_prefix: String,
    pub collision_policy: CollisionPolicy,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            unassigned_label: "Unassigned".into(),
            group_name_prefix: "Group".into(),
            collision_policy: CollisionPolicy::default(),
        }
    }
}

impl OutputConfig {
    pub fn group_name(&self, group_number: u32) -> String {
        format!("{} {group_number}", self.group_name_prefix)
    }
}

/// What to do when two groups list the same lookup name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    #[default]
    KeepFirst,
    Fail,
}

impl std::fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::KeepFirst => write!(f, "keep_first"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.parser.delimiter.is_empty() {
            return Err(ReconError::ConfigValidation(
                "parser.delimiter must not be empty".into(),
            ));
        }

        if self.parser.captain_marker.is_empty() {
            return Err(ReconError::ConfigValidation(
                "parser.captain_marker must not be empty".into(),
            ));
        }

        if self.parser.phone_digits == 0 {
            return Err(ReconError::ConfigValidation(
                "parser.phone_digits must be at least 1".into(),
            ));
        }

        if self.matching.min_shared_tokens == 0 {
            return Err(ReconError::ConfigValidation(
                "matching.min_shared_tokens must be at least 1".into(),
            ));
        }

        if self.output.unassigned_label.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "output.unassigned_label must not be blank".into(),
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
