use thiserror::Error;

use super::condition::ConditionKind;

/// Problems with a stored configuration value. Evaluators never surface these
/// to the host; they log them and return no operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("metafield value is missing")]
    MissingMetafield,

    #[error("metafield value is not valid configuration JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("configuration could not be serialized: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("rule has no shop id to own its metafield")]
    MissingOwner,
}

/// Authoring-time rule validation failures, in the wording merchants see.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid shop identifier '{shop_id}'")]
    InvalidShopId { shop_id: String },

    #[error("customization name is required")]
    MissingName,

    #[error("{field} is required")]
    MissingTarget { field: &'static str },

    #[error("message is required")]
    MissingMessage,

    #[error("at least one condition is required")]
    NoConditions,

    #[error("condition {position} is not a recognized condition")]
    UnrecognizedCondition { position: usize },

    #[error("condition {position} ({kind}) is not supported by this customization")]
    UnsupportedKind { position: usize, kind: ConditionKind },

    #[error("only one {kind} condition is allowed")]
    RepeatedKind { kind: ConditionKind },

    #[error("duplicate condition found: {kind} {operator} {value}")]
    DuplicateCondition {
        kind: ConditionKind,
        operator: String,
        value: String,
    },

    #[error("value is required for condition {position} ({kind})")]
    EmptyValue { position: usize, kind: ConditionKind },

    #[error("cart total for condition {position} must be a number greater than 0")]
    NonPositiveAmount { position: usize },

    #[error("discount thresholds must satisfy 0 < low ({low}) < high ({high})")]
    ThresholdOrder { low: u64, high: u64 },

    #[error("discount '{field}' must be greater than 0 and at most 1")]
    DiscountOutOfRange { field: &'static str },
}
