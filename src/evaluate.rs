use crate::types::EvaluationReport;
use crate::{CartSnapshot, Condition, ConditionKind, ConditionSet, Feature};

/// Whether a single condition holds for `cart`. Missing cart data never matches.
#[must_use]
pub fn condition_matches(condition: &Condition, cart: &CartSnapshot) -> bool {
    match condition {
        Condition::CartTotal { comparator, amount } => cart
            .total_amount()
            .is_some_and(|total| comparator.holds(total, *amount)),
        Condition::Product {
            membership,
            product_ids,
        } => {
            let mut in_cart = cart.product_ids().peekable();
            if in_cart.peek().is_none() {
                return false;
            }
            let present = in_cart.any(|id| product_ids.iter().any(|p| p == id));
            membership.apply(present)
        }
        Condition::ProductTag { membership, tag } => {
            if cart.lines.is_empty() {
                return false;
            }
            membership.apply(cart.lines.iter().any(|line| line.has_product_tag(tag)))
        }
        Condition::ShippingCountry {
            membership,
            country,
        } => {
            let mut codes = cart.country_codes().peekable();
            if codes.peek().is_none() {
                return false;
            }
            let wanted = country.trim();
            membership.apply(codes.any(|code| code.eq_ignore_ascii_case(wanted)))
        }
        Condition::CustomerTag { membership, tag } => cart
            .customer_has_tag(tag)
            .is_some_and(|present| membership.apply(present)),
        Condition::CustomerType {
            membership,
            customer_type,
        } => cart
            .customer_has_tag(customer_type)
            .is_some_and(|present| membership.apply(present)),
        Condition::Unsupported(raw) => {
            tracing::warn!(
                kind = %raw.kind,
                operator = raw.operator.as_deref().unwrap_or_default(),
                "unsupported condition never matches"
            );
            false
        }
    }
}

// Conditions outside `honored` are skipped as non-matches.
fn applicable(condition: &Condition, honored: &[ConditionKind]) -> bool {
    match condition.kind() {
        Some(kind) if honored.contains(&kind) => true,
        Some(kind) => {
            tracing::debug!(%kind, "condition kind not honored, skipping");
            false
        }
        None => true,
    }
}

/// OR fold over `set`: true as soon as one honored condition matches.
#[must_use]
pub fn evaluate_conditions(
    set: &ConditionSet,
    cart: &CartSnapshot,
    honored: &[ConditionKind],
) -> bool {
    set.iter().any(|condition| {
        let matched = applicable(condition, honored) && condition_matches(condition, cart);
        tracing::debug!(%condition, matched, "condition evaluated");
        matched
    })
}

/// Like [`evaluate_conditions`] but visits every condition.
pub fn evaluate_detailed(
    set: &ConditionSet,
    cart: &CartSnapshot,
    honored: &[ConditionKind],
) -> EvaluationReport {
    let mut matched = Vec::new();
    let mut ignored = Vec::new();
    let mut evaluated = 0;

    for (index, condition) in set.iter().enumerate() {
        let recognized = condition.kind().is_some();
        if !recognized || !applicable(condition, honored) {
            ignored.push(index);
            continue;
        }
        evaluated += 1;
        if condition_matches(condition, cart) {
            matched.push(index);
        }
    }

    EvaluationReport::new(matched, ignored, evaluated)
}

impl Condition {
    /// Whether this condition holds for `cart`.
    #[must_use]
    pub fn matches(&self, cart: &CartSnapshot) -> bool {
        condition_matches(self, cart)
    }
}

impl ConditionSet {
    /// Whether any condition honored by `feature` matches `cart`.
    #[must_use]
    pub fn evaluate(&self, cart: &CartSnapshot, feature: Feature) -> bool {
        evaluate_conditions(self, cart, feature.honored_kinds())
    }

    /// Evaluate every condition and report which matched.
    pub fn evaluate_detailed(&self, cart: &CartSnapshot, feature: Feature) -> EvaluationReport {
        evaluate_detailed(self, cart, feature.honored_kinds())
    }
}
