use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::condition::{Condition, RawCondition};

/// Ordered conditions combined with OR: any match triggers the action.
///
/// Serializes as the canonical array. Deserializes from either the canonical
/// array or the older categorized object
/// (`{ "cartTotal": [...], "products": [...], "shippingCountry": [...] }`),
/// which is migrated onto the array form.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct ConditionSet {
    conditions: Vec<Condition>,
}

impl ConditionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a condition (builder style).
    #[must_use]
    pub fn with(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn push(&mut self, condition: Condition) {
        self.conditions.push(condition);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Condition> {
        self.conditions.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Condition] {
        &self.conditions
    }
}

impl From<Vec<Condition>> for ConditionSet {
    fn from(conditions: Vec<Condition>) -> Self {
        Self { conditions }
    }
}

impl FromIterator<Condition> for ConditionSet {
    fn from_iter<I: IntoIterator<Item = Condition>>(iter: I) -> Self {
        Self {
            conditions: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ConditionSet {
    type Item = &'a Condition;
    type IntoIter = std::slice::Iter<'a, Condition>;

    fn into_iter(self) -> Self::IntoIter {
        self.conditions.iter()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ConditionShape {
    Canonical(Vec<Condition>),
    Categorized(CategorizedConditions),
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CategorizedConditions {
    #[serde(default)]
    cart_total: Vec<CategorizedCartTotal>,
    #[serde(default)]
    products: Vec<CategorizedProducts>,
    #[serde(default)]
    shipping_country: Vec<CategorizedCountry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CategorizedCartTotal {
    greater_or_small: Option<String>,
    amount: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CategorizedProducts {
    greater_or_small: Option<String>,
    products: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CategorizedCountry {
    greater_or_small: Option<String>,
    country: Option<Value>,
}

fn categorized(
    kind: &str,
    operator: Option<String>,
    default_operator: &str,
    value: Option<Value>,
) -> Condition {
    Condition::from(RawCondition {
        kind: kind.to_owned(),
        operator: Some(operator.unwrap_or_else(|| default_operator.to_owned())),
        value,
    })
}

impl From<CategorizedConditions> for ConditionSet {
    fn from(legacy: CategorizedConditions) -> Self {
        let cart_totals = legacy
            .cart_total
            .into_iter()
            .map(|c| categorized("cart_total", c.greater_or_small, "greater_than", c.amount));
        let products = legacy
            .products
            .into_iter()
            .map(|c| categorized("product", c.greater_or_small, "is", c.products));
        let countries = legacy
            .shipping_country
            .into_iter()
            .map(|c| categorized("shipping_country", c.greater_or_small, "is", c.country));

        cart_totals.chain(products).chain(countries).collect()
    }
}

impl<'de> Deserialize<'de> for ConditionSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match ConditionShape::deserialize(deserializer)? {
            ConditionShape::Canonical(conditions) => Ok(Self { conditions }),
            ConditionShape::Categorized(legacy) => Ok(legacy.into()),
        }
    }
}
