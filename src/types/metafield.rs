use serde::{Deserialize, Serialize};

use super::feature::Feature;

/// A metafield write carrying a serialized configuration, in the shape of a
/// `metafieldsSet` input entry.
///
/// The crate never performs the write. Whatever stores rules builds this
/// value so the evaluators read back exactly what was serialized. Writes are
/// last-write-wins with no versioning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetafieldSet {
    pub owner_id: String,
    pub namespace: String,
    pub key: String,
    #[serde(rename = "type")]
    pub value_type: String,
    pub value: String,
}

impl MetafieldSet {
    #[must_use]
    pub fn json(owner_id: &str, feature: Feature, value: String) -> Self {
        Self {
            owner_id: owner_id.to_owned(),
            namespace: feature.namespace().to_owned(),
            key: feature.key().to_owned(),
            value_type: "json".to_owned(),
            value,
        }
    }
}
