use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};

use super::condition::Condition;
use super::condition_set::ConditionSet;
use super::error::ConfigError;
use super::feature::Feature;
use super::metafield::MetafieldSet;

/// A configuration stored as a JSON metafield value.
pub trait MetafieldConfig: Serialize + DeserializeOwned {
    /// Parse a stored metafield value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Malformed`] when the value is not valid JSON or
    /// lacks a required key.
    fn from_metafield(value: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(value).map_err(ConfigError::Malformed)
    }

    /// Serialize into the stored metafield value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialize`] if serialization fails.
    fn to_metafield_value(&self) -> Result<String, ConfigError> {
        serde_json::to_string(self).map_err(ConfigError::Serialize)
    }
}

/// What a condition-based rule acts on. Flattened into the rule object under
/// its feature-specific key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetSelector {
    #[serde(rename = "paymentMethod")]
    PaymentMethod(String),
    #[serde(rename = "shippingMethodToHide")]
    ShippingMethod(String),
}

impl TargetSelector {
    #[must_use]
    pub fn payment_method(&self) -> Option<&str> {
        match self {
            TargetSelector::PaymentMethod(name) => Some(name),
            TargetSelector::ShippingMethod(_) => None,
        }
    }

    #[must_use]
    pub fn shipping_method(&self) -> Option<&str> {
        match self {
            TargetSelector::ShippingMethod(title) => Some(title),
            TargetSelector::PaymentMethod(_) => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            TargetSelector::PaymentMethod(s) | TargetSelector::ShippingMethod(s) => s,
        }
    }
}

/// A merchant-authored rule: hide or rename `target` when any condition matches.
///
/// Stored form:
///
/// ```json
/// {
///   "shop": "gid://shopify/Shop/74655760623",
///   "customizeName": "Hide Standard Shipping",
///   "shippingMethodToHide": "Standard",
///   "conditions": [{"type": "cart_total", "operator": "greater_than", "value": "1000"}]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, alias = "shop", skip_serializing_if = "Option::is_none")]
    pub shop_id: Option<String>,
    #[serde(rename = "customizeName", default)]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub customization_type: Option<String>,
    #[serde(flatten)]
    pub target: TargetSelector,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(alias = "condition")]
    pub conditions: ConditionSet,
}

impl MetafieldConfig for RuleConfig {}

impl RuleConfig {
    #[must_use]
    pub fn new(name: &str, target: TargetSelector) -> Self {
        Self {
            id: None,
            shop_id: None,
            name: name.to_owned(),
            customization_type: None,
            target,
            message: None,
            conditions: ConditionSet::new(),
        }
    }

    #[must_use]
    pub fn with_shop_id(mut self, shop_id: &str) -> Self {
        self.shop_id = Some(shop_id.to_owned());
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_owned());
        self
    }

    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// The metafield write that publishes this rule for `feature`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingOwner`] without a shop id, or
    /// [`ConfigError::Serialize`] if serialization fails.
    pub fn metafield(&self, feature: Feature) -> Result<MetafieldSet, ConfigError> {
        let owner = self.shop_id.as_deref().ok_or(ConfigError::MissingOwner)?;
        Ok(MetafieldSet::json(owner, feature, self.to_metafield_value()?))
    }
}

/// Rename a payment method unconditionally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenamePaymentConfig {
    #[serde(default, alias = "shop", skip_serializing_if = "Option::is_none")]
    pub shop_id: Option<String>,
    #[serde(rename = "customizeName", default)]
    pub name: String,
    pub payment_method: String,
    pub new_name: String,
}

impl MetafieldConfig for RenamePaymentConfig {}

impl RenamePaymentConfig {
    #[must_use]
    pub fn new(payment_method: &str, new_name: &str) -> Self {
        Self {
            shop_id: None,
            name: String::new(),
            payment_method: payment_method.to_owned(),
            new_name: new_name.to_owned(),
        }
    }
}

/// Two-tier quantity ladder. Discounts are fractions (`0.05` is 5%).
///
/// Thresholds and discounts are read from JSON numbers or numeric strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountConfig {
    #[serde(deserialize_with = "quantity_threshold")]
    pub threshold_low: u64,
    pub discount_low: Decimal,
    #[serde(deserialize_with = "quantity_threshold")]
    pub threshold_high: u64,
    pub discount_high: Decimal,
}

// Quantities are whole, so a fractional threshold rounds up to the first
// quantity that reaches it.
fn quantity_threshold<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let raw = <Decimal as Deserialize>::deserialize(deserializer)?;
    raw.ceil()
        .to_u64()
        .ok_or_else(|| D::Error::custom(format!("quantity threshold {raw} is not a count")))
}

impl MetafieldConfig for DiscountConfig {}

impl DiscountConfig {
    #[must_use]
    pub fn new(
        threshold_low: u64,
        discount_low: Decimal,
        threshold_high: u64,
        discount_high: Decimal,
    ) -> Self {
        Self {
            threshold_low,
            discount_low,
            threshold_high,
            discount_high,
        }
    }

    /// The discount fraction for a cart holding `quantity` items, or `None`
    /// below the low threshold or when the tier's discount is zero.
    #[must_use]
    pub fn tier_for(&self, quantity: u64) -> Option<Decimal> {
        let discount = if quantity >= self.threshold_high {
            self.discount_high
        } else if quantity >= self.threshold_low {
            self.discount_low
        } else {
            return None;
        };
        (discount > Decimal::ZERO).then_some(discount)
    }
}

/// `selectionType` value that offers upsells on every order.
const SELECT_ALL: &str = "all";

const PRODUCT_GID_PREFIX: &str = "gid://shopify/Product/";

/// Post-purchase upsell settings.
///
/// The shop-level value offers `upsellProducts` when the order holds one of
/// `selectedProducts`, or on every order when `selectionType` is `"all"`.
/// A product-level value always offers its `upsellProducts`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsellConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selected_products: Vec<String>,
    #[serde(default)]
    pub upsell_products: Vec<String>,
}

impl MetafieldConfig for UpsellConfig {}

impl UpsellConfig {
    #[must_use]
    pub fn new<I, S>(upsell_products: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            upsell_products: upsell_products.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Offer the upsell on every order.
    #[must_use]
    pub fn for_all(mut self) -> Self {
        self.selection_type = Some(SELECT_ALL.to_owned());
        self
    }

    /// Offer the upsell when the order holds one of these products.
    #[must_use]
    pub fn for_products<I, S>(mut self, products: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_products = products.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn applies_to_all(&self) -> bool {
        self.selection_type.as_deref() == Some(SELECT_ALL)
    }

    /// Whether any of `product_ids` is one of the selected products.
    pub fn selects_any<'a>(&self, mut product_ids: impl Iterator<Item = &'a str>) -> bool {
        let selected: Vec<String> = normalized(&self.selected_products).collect();
        !selected.is_empty() && product_ids.any(|id| selected.iter().any(|s| s == id))
    }

    /// Upsell product ids with blanks dropped, as product GIDs.
    #[must_use]
    pub fn offered_products(&self) -> Vec<String> {
        normalized(&self.upsell_products).collect()
    }
}

fn normalized(ids: &[String]) -> impl Iterator<Item = String> + '_ {
    ids.iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .map(product_gid)
}

/// `id` as a product GID, prefixing bare numeric ids.
#[must_use]
pub fn product_gid(id: &str) -> String {
    if id.starts_with("gid://") {
        id.to_owned()
    } else {
        format!("{PRODUCT_GID_PREFIX}{id}")
    }
}
