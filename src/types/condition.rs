use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The `type` discriminant of a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionKind {
    CartTotal,
    Product,
    ProductTag,
    ShippingCountry,
    CustomerTag,
    CustomerType,
}

impl ConditionKind {
    pub const ALL: [ConditionKind; 6] = [
        ConditionKind::CartTotal,
        ConditionKind::Product,
        ConditionKind::ProductTag,
        ConditionKind::ShippingCountry,
        ConditionKind::CustomerTag,
        ConditionKind::CustomerType,
    ];

    /// The wire tag, e.g. `"cart_total"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ConditionKind::CartTotal => "cart_total",
            ConditionKind::Product => "product",
            ConditionKind::ProductTag => "product_tag",
            ConditionKind::ShippingCountry => "shipping_country",
            ConditionKind::CustomerTag => "customer_tag",
            ConditionKind::CustomerType => "customer_type",
        }
    }

    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionKind::CartTotal => write!(f, "cart total"),
            ConditionKind::Product => write!(f, "product"),
            ConditionKind::ProductTag => write!(f, "product tag"),
            ConditionKind::ShippingCountry => write!(f, "shipping country"),
            ConditionKind::CustomerTag => write!(f, "customer tag"),
            ConditionKind::CustomerType => write!(f, "customer type"),
        }
    }
}

/// Numeric comparison against the cart total. Both directions are strict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    GreaterThan,
    LessThan,
}

impl Comparator {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Comparator::GreaterThan => "greater_than",
            Comparator::LessThan => "less_than",
        }
    }

    #[must_use]
    pub fn parse(operator: &str) -> Option<Self> {
        match operator {
            "greater_than" => Some(Comparator::GreaterThan),
            "less_than" => Some(Comparator::LessThan),
            _ => None,
        }
    }

    /// `lhs > rhs` or `lhs < rhs`.
    #[must_use]
    pub fn holds(self, lhs: Decimal, rhs: Decimal) -> bool {
        match self {
            Comparator::GreaterThan => lhs > rhs,
            Comparator::LessThan => lhs < rhs,
        }
    }
}

/// Polarity of a membership or equality test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    Is,
    IsNot,
}

impl Membership {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Membership::Is => "is",
            Membership::IsNot => "is_not",
        }
    }

    #[must_use]
    pub fn parse(operator: &str) -> Option<Self> {
        match operator {
            "is" => Some(Membership::Is),
            "is_not" => Some(Membership::IsNot),
            _ => None,
        }
    }

    #[must_use]
    pub fn apply(self, present: bool) -> bool {
        match self {
            Membership::Is => present,
            Membership::IsNot => !present,
        }
    }
}

/// Canonical stored form of one condition: `{ "type", "operator", "value" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCondition {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl RawCondition {
    #[must_use]
    pub fn new(kind: &str, operator: &str, value: impl Into<Value>) -> Self {
        Self {
            kind: kind.to_owned(),
            operator: Some(operator.to_owned()),
            value: Some(value.into()),
        }
    }

    /// The value as merchants typed it; arrays are comma-joined.
    #[must_use]
    pub fn value_text(&self) -> String {
        match &self.value {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
            Some(other) => other.to_string(),
        }
    }
}

/// A single predicate over the cart.
///
/// Anything that does not parse into a known variant is kept verbatim as
/// [`Condition::Unsupported`], which never matches and re-serializes unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCondition", into = "RawCondition")]
pub enum Condition {
    CartTotal {
        comparator: Comparator,
        amount: Decimal,
    },
    Product {
        membership: Membership,
        product_ids: Vec<String>,
    },
    ProductTag {
        membership: Membership,
        tag: String,
    },
    ShippingCountry {
        membership: Membership,
        country: String,
    },
    CustomerTag {
        membership: Membership,
        tag: String,
    },
    CustomerType {
        membership: Membership,
        customer_type: String,
    },
    Unsupported(RawCondition),
}

impl Condition {
    #[must_use]
    pub fn cart_total(comparator: Comparator, amount: Decimal) -> Self {
        Condition::CartTotal { comparator, amount }
    }

    #[must_use]
    pub fn product<I, S>(membership: Membership, product_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Condition::Product {
            membership,
            product_ids: product_ids.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn product_tag(membership: Membership, tag: &str) -> Self {
        Condition::ProductTag {
            membership,
            tag: tag.to_owned(),
        }
    }

    #[must_use]
    pub fn shipping_country(membership: Membership, country: &str) -> Self {
        Condition::ShippingCountry {
            membership,
            country: country.to_owned(),
        }
    }

    #[must_use]
    pub fn customer_tag(membership: Membership, tag: &str) -> Self {
        Condition::CustomerTag {
            membership,
            tag: tag.to_owned(),
        }
    }

    #[must_use]
    pub fn customer_type(membership: Membership, customer_type: &str) -> Self {
        Condition::CustomerType {
            membership,
            customer_type: customer_type.to_owned(),
        }
    }

    /// The condition's kind, or `None` when it was not recognized.
    #[must_use]
    pub fn kind(&self) -> Option<ConditionKind> {
        match self {
            Condition::CartTotal { .. } => Some(ConditionKind::CartTotal),
            Condition::Product { .. } => Some(ConditionKind::Product),
            Condition::ProductTag { .. } => Some(ConditionKind::ProductTag),
            Condition::ShippingCountry { .. } => Some(ConditionKind::ShippingCountry),
            Condition::CustomerTag { .. } => Some(ConditionKind::CustomerTag),
            Condition::CustomerType { .. } => Some(ConditionKind::CustomerType),
            Condition::Unsupported(_) => None,
        }
    }

    fn recognize(raw: &RawCondition) -> Option<Condition> {
        let kind = ConditionKind::from_tag(&raw.kind)?;
        let operator = raw.operator.as_deref()?;
        let value = raw.value.as_ref()?;

        let condition = match kind {
            ConditionKind::CartTotal => Condition::CartTotal {
                comparator: Comparator::parse(operator)?,
                amount: decimal_value(value)?,
            },
            ConditionKind::Product => Condition::Product {
                membership: Membership::parse(operator)?,
                product_ids: id_list(value)?,
            },
            ConditionKind::ProductTag => Condition::ProductTag {
                membership: Membership::parse(operator)?,
                tag: text_value(value)?,
            },
            ConditionKind::ShippingCountry => Condition::ShippingCountry {
                membership: Membership::parse(operator)?,
                country: text_value(value)?,
            },
            ConditionKind::CustomerTag => Condition::CustomerTag {
                membership: Membership::parse(operator)?,
                tag: text_value(value)?,
            },
            ConditionKind::CustomerType => Condition::CustomerType {
                membership: Membership::parse(operator)?,
                customer_type: text_value(value)?,
            },
        };
        Some(condition)
    }
}

fn decimal_value(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::String(s) => s.trim().to_owned(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

// Product pickers store either a JSON array or a comma-separated string.
fn id_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_owned))
            .collect(),
        Value::String(s) => Some(
            s.split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_owned)
                .collect(),
        ),
        _ => None,
    }
}

impl From<RawCondition> for Condition {
    fn from(raw: RawCondition) -> Self {
        Condition::recognize(&raw).unwrap_or(Condition::Unsupported(raw))
    }
}

impl From<Condition> for RawCondition {
    fn from(condition: Condition) -> Self {
        match condition {
            Condition::CartTotal { comparator, amount } => {
                RawCondition::new("cart_total", comparator.as_str(), amount.to_string())
            }
            Condition::Product {
                membership,
                product_ids,
            } => RawCondition::new(
                "product",
                membership.as_str(),
                Value::Array(product_ids.into_iter().map(Value::String).collect()),
            ),
            Condition::ProductTag { membership, tag } => {
                RawCondition::new("product_tag", membership.as_str(), tag)
            }
            Condition::ShippingCountry {
                membership,
                country,
            } => RawCondition::new("shipping_country", membership.as_str(), country),
            Condition::CustomerTag { membership, tag } => {
                RawCondition::new("customer_tag", membership.as_str(), tag)
            }
            Condition::CustomerType {
                membership,
                customer_type,
            } => RawCondition::new("customer_type", membership.as_str(), customer_type),
            Condition::Unsupported(raw) => raw,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::CartTotal { comparator, amount } => {
                write!(f, "cart_total {} {amount}", comparator.as_str())
            }
            Condition::Product {
                membership,
                product_ids,
            } => write!(
                f,
                "product {} [{}]",
                membership.as_str(),
                product_ids.join(", ")
            ),
            Condition::ProductTag { membership, tag } => {
                write!(f, "product_tag {} \"{tag}\"", membership.as_str())
            }
            Condition::ShippingCountry {
                membership,
                country,
            } => write!(f, "shipping_country {} \"{country}\"", membership.as_str()),
            Condition::CustomerTag { membership, tag } => {
                write!(f, "customer_tag {} \"{tag}\"", membership.as_str())
            }
            Condition::CustomerType {
                membership,
                customer_type,
            } => write!(
                f,
                "customer_type {} \"{customer_type}\"",
                membership.as_str()
            ),
            Condition::Unsupported(raw) => write!(
                f,
                "unsupported {} {} {}",
                raw.kind,
                raw.operator.as_deref().unwrap_or("?"),
                raw.value_text()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn parse(value: serde_json::Value) -> Condition {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn parses_cart_total_from_string() {
        let c = parse(json!({"type": "cart_total", "operator": "greater_than", "value": "100"}));
        assert_eq!(
            c,
            Condition::cart_total(Comparator::GreaterThan, Decimal::new(100, 0))
        );
    }

    #[test]
    fn parses_cart_total_from_number() {
        let c = parse(json!({"type": "cart_total", "operator": "less_than", "value": 49.5}));
        assert_eq!(
            c,
            Condition::cart_total(Comparator::LessThan, Decimal::new(495, 1))
        );
    }

    #[test]
    fn non_numeric_cart_total_is_unsupported() {
        let c = parse(json!({"type": "cart_total", "operator": "greater_than", "value": "lots"}));
        assert!(matches!(c, Condition::Unsupported(_)));
        assert_eq!(c.kind(), None);
    }

    #[test]
    fn unknown_type_is_kept_verbatim() {
        let input = json!({"type": "weather", "operator": "is", "value": "sunny"});
        let c = parse(input.clone());
        assert!(matches!(&c, Condition::Unsupported(raw) if raw.kind == "weather"));
        assert_eq!(serde_json::to_value(&c).unwrap(), input);
    }

    #[test]
    fn operator_not_valid_for_type_is_unsupported() {
        let c = parse(json!({"type": "customer_type", "operator": "greater_than", "value": "B2C"}));
        assert!(matches!(c, Condition::Unsupported(_)));
    }

    #[test]
    fn missing_value_is_unsupported() {
        let c = parse(json!({"type": "customer_tag", "operator": "is"}));
        assert!(matches!(c, Condition::Unsupported(_)));
    }

    #[test]
    fn product_ids_from_array_or_comma_string() {
        let from_array = parse(json!({
            "type": "product",
            "operator": "is",
            "value": ["gid://shopify/Product/1", "gid://shopify/Product/2"]
        }));
        let from_string = parse(json!({
            "type": "product",
            "operator": "is",
            "value": "gid://shopify/Product/1, gid://shopify/Product/2"
        }));
        assert_eq!(from_array, from_string);
        assert_eq!(
            from_array,
            Condition::product(
                Membership::Is,
                ["gid://shopify/Product/1", "gid://shopify/Product/2"]
            )
        );
    }

    #[test]
    fn cart_total_serializes_amount_as_string() {
        let c = Condition::cart_total(Comparator::GreaterThan, Decimal::new(10050, 2));
        assert_eq!(
            serde_json::to_value(&c).unwrap(),
            json!({"type": "cart_total", "operator": "greater_than", "value": "100.50"})
        );
    }

    #[test]
    fn comparator_is_strict() {
        let ten = Decimal::new(10, 0);
        assert!(!Comparator::GreaterThan.holds(ten, ten));
        assert!(!Comparator::LessThan.holds(ten, ten));
        assert!(Comparator::GreaterThan.holds(Decimal::new(11, 0), ten));
        assert!(Comparator::LessThan.holds(Decimal::new(9, 0), ten));
    }

    #[test]
    fn membership_polarity() {
        assert!(Membership::Is.apply(true));
        assert!(!Membership::Is.apply(false));
        assert!(Membership::IsNot.apply(false));
        assert!(!Membership::IsNot.apply(true));
    }

    #[test]
    fn kind_tags_round_trip() {
        for kind in ConditionKind::ALL {
            assert_eq!(ConditionKind::from_tag(kind.as_str()), Some(kind));
        }
        assert_eq!(ConditionKind::from_tag("cart total"), None);
    }

    #[test]
    fn display() {
        assert_eq!(
            Condition::cart_total(Comparator::GreaterThan, Decimal::new(100, 0)).to_string(),
            "cart_total greater_than 100"
        );
        assert_eq!(
            Condition::customer_tag(Membership::IsNot, "VIP").to_string(),
            "customer_tag is_not \"VIP\""
        );
    }
}
