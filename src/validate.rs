//! Authoring-time checks run before a rule is stored.
//!
//! Evaluation never depends on these: a rule that skipped validation still
//! evaluates, with unrecognized conditions simply never matching.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::{
    Condition, ConditionKind, DiscountConfig, Feature, RawCondition, RenamePaymentConfig,
    RuleConfig, TargetSelector, UpsellConfig, ValidationError,
};

const SHOP_GID_PREFIX: &str = "gid://shopify/Shop/";

impl RuleConfig {
    /// Validate this rule for `feature`, returning the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] in check order.
    pub fn validate(&self, feature: Feature) -> Result<(), ValidationError> {
        first(self.validation_errors(feature))
    }

    /// Every validation failure for `feature`, in check order.
    #[must_use]
    pub fn validation_errors(&self, feature: Feature) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        check_shop_id(self.shop_id.as_deref(), &mut errors);
        check_name(&self.name, &mut errors);
        check_target(&self.target, feature, &mut errors);
        check_message(self, feature, &mut errors);
        check_conditions(self, feature, &mut errors);
        check_unique_kinds(self, feature, &mut errors);
        check_duplicates(self, &mut errors);
        errors
    }
}

impl RenamePaymentConfig {
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] in check order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        check_shop_id(self.shop_id.as_deref(), &mut errors);
        if self.payment_method.trim().is_empty() {
            errors.push(ValidationError::MissingTarget {
                field: "payment method",
            });
        }
        if self.new_name.trim().is_empty() {
            errors.push(ValidationError::MissingTarget { field: "new name" });
        }
        first(errors)
    }
}

impl DiscountConfig {
    /// # Errors
    ///
    /// Returns [`ValidationError::ThresholdOrder`] unless
    /// `0 < threshold_low < threshold_high`, or
    /// [`ValidationError::DiscountOutOfRange`] for a discount outside `(0, 1]`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.threshold_low == 0 || self.threshold_low >= self.threshold_high {
            return Err(ValidationError::ThresholdOrder {
                low: self.threshold_low,
                high: self.threshold_high,
            });
        }
        for (field, discount) in [
            ("discountLow", self.discount_low),
            ("discountHigh", self.discount_high),
        ] {
            if discount <= Decimal::ZERO || discount > Decimal::ONE {
                return Err(ValidationError::DiscountOutOfRange { field });
            }
        }
        Ok(())
    }
}

impl UpsellConfig {
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingTarget`] when nothing would be
    /// offered, or when a selective upsell names no trigger products.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        if self.offered_products().is_empty() {
            errors.push(ValidationError::MissingTarget {
                field: "upsell products",
            });
        }
        if !self.applies_to_all() && self.selected_products.iter().all(|id| id.trim().is_empty())
        {
            errors.push(ValidationError::MissingTarget {
                field: "selected products",
            });
        }
        first(errors)
    }
}

fn first(errors: Vec<ValidationError>) -> Result<(), ValidationError> {
    match errors.into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn check_shop_id(shop_id: Option<&str>, errors: &mut Vec<ValidationError>) {
    if let Some(shop_id) = shop_id
        && !shop_id.starts_with(SHOP_GID_PREFIX)
    {
        errors.push(ValidationError::InvalidShopId {
            shop_id: shop_id.to_owned(),
        });
    }
}

fn check_name(name: &str, errors: &mut Vec<ValidationError>) {
    if name.trim().is_empty() {
        errors.push(ValidationError::MissingName);
    }
}

fn check_target(target: &TargetSelector, feature: Feature, errors: &mut Vec<ValidationError>) {
    let (field, selected) = match feature {
        Feature::HidePayment => ("payment method", target.payment_method()),
        _ => ("shipping method", target.shipping_method()),
    };
    if selected.is_none_or(|s| s.trim().is_empty()) {
        errors.push(ValidationError::MissingTarget { field });
    }
}

fn check_message(rule: &RuleConfig, feature: Feature, errors: &mut Vec<ValidationError>) {
    if feature == Feature::RenameShipping
        && rule.message.as_deref().is_none_or(|m| m.trim().is_empty())
    {
        errors.push(ValidationError::MissingMessage);
    }
}

fn check_conditions(rule: &RuleConfig, feature: Feature, errors: &mut Vec<ValidationError>) {
    if rule.conditions.is_empty() {
        errors.push(ValidationError::NoConditions);
        return;
    }

    for (index, condition) in rule.conditions.iter().enumerate() {
        let position = index + 1;
        match condition {
            Condition::Unsupported(raw) => errors.push(unrecognized(raw, position)),
            known => {
                let Some(kind) = known.kind() else { continue };
                if !feature.honors(kind) {
                    errors.push(ValidationError::UnsupportedKind { position, kind });
                } else if is_blank(known) {
                    errors.push(ValidationError::EmptyValue { position, kind });
                } else if let Condition::CartTotal { amount, .. } = known
                    && *amount <= Decimal::ZERO
                {
                    errors.push(ValidationError::NonPositiveAmount { position });
                }
            }
        }
    }
}

// Map a condition that failed to parse onto the most specific message.
fn unrecognized(raw: &RawCondition, position: usize) -> ValidationError {
    match ConditionKind::from_tag(&raw.kind) {
        Some(kind) if raw.value_text().trim().is_empty() => {
            ValidationError::EmptyValue { position, kind }
        }
        Some(ConditionKind::CartTotal) => ValidationError::NonPositiveAmount { position },
        _ => ValidationError::UnrecognizedCondition { position },
    }
}

fn is_blank(condition: &Condition) -> bool {
    match condition {
        Condition::Product { product_ids, .. } => {
            product_ids.iter().all(|id| id.trim().is_empty())
        }
        Condition::ProductTag { tag, .. } | Condition::CustomerTag { tag, .. } => {
            tag.trim().is_empty()
        }
        Condition::ShippingCountry { country, .. } => country.trim().is_empty(),
        Condition::CustomerType { customer_type, .. } => customer_type.trim().is_empty(),
        Condition::CartTotal { .. } | Condition::Unsupported(_) => false,
    }
}

fn check_unique_kinds(rule: &RuleConfig, feature: Feature, errors: &mut Vec<ValidationError>) {
    let mut counts: HashMap<ConditionKind, usize> = HashMap::new();
    for kind in rule.conditions.iter().filter_map(tagged_kind) {
        *counts.entry(kind).or_insert(0) += 1;
    }
    for &kind in feature.unique_kinds() {
        if counts.get(&kind).copied().unwrap_or(0) > 1 {
            errors.push(ValidationError::RepeatedKind { kind });
        }
    }
}

// Kind by `type` tag, including conditions that failed to parse.
fn tagged_kind(condition: &Condition) -> Option<ConditionKind> {
    match condition {
        Condition::Unsupported(raw) => ConditionKind::from_tag(&raw.kind),
        known => known.kind(),
    }
}

fn check_duplicates(rule: &RuleConfig, errors: &mut Vec<ValidationError>) {
    let mut seen: Vec<RawCondition> = Vec::new();
    for condition in rule.conditions.iter() {
        let Some(kind) = condition.kind() else {
            continue;
        };
        if is_blank(condition) {
            continue;
        }
        let raw = RawCondition::from(condition.clone());
        if seen.contains(&raw) {
            errors.push(ValidationError::DuplicateCondition {
                kind,
                operator: raw.operator.clone().unwrap_or_default(),
                value: raw.value_text(),
            });
        } else {
            seen.push(raw);
        }
    }
}
