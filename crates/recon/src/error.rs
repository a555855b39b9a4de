use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),
    /// Config validation error (empty delimiter, zero thresholds, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),
    /// Member collection is not a JSON array of member objects.
    #[error("member collection parse error: {0}")]
    MemberParse(String),
    /// Two groups claim the same lookup name and the policy is `fail`.
    #[error("name '{key}' appears in group {first_group} and group {second_group}")]
    NameCollision {
        key: String,
        first_group: u32,
        second_group: u32,
    },
    /// JSON rendering error.
    #[error("serialization error: {0}")]
    Serialize(String),
}
