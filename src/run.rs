use rust_decimal::Decimal;

use crate::{
    ConfigError, DiscountConfig, DiscountOutput, Feature, FunctionInput, FunctionResult,
    MetafieldConfig, Operation, RenamePaymentConfig, RuleConfig, TargetSelector, UpsellConfig,
};

/// Evaluate `feature` against one function input.
///
/// Configuration problems never surface as errors: a missing or malformed
/// metafield yields [`FunctionResult::no_changes()`] and a `warn` log.
pub fn run(feature: Feature, input: &FunctionInput) -> FunctionResult {
    match feature {
        Feature::HidePayment => hide_payment(input),
        Feature::RenamePayment => rename_payment(input),
        Feature::HideShipping => hide_shipping(input),
        Feature::RenameShipping => rename_shipping(input),
        Feature::QuantityDiscount => quantity_discount(input),
        Feature::Upsell => upsell(input),
    }
}

/// Host-facing entry point: parse the input JSON, run `feature`, and
/// serialize the result in the feature's output shape.
///
/// # Errors
///
/// Returns [`Error::Json`](crate::Error::Json) only when `input` is not a
/// valid function input document.
pub fn run_json(feature: Feature, input: &str) -> Result<String, crate::Error> {
    let input: FunctionInput = serde_json::from_str(input)?;
    let result = run(feature, &input);
    let output = match feature {
        Feature::QuantityDiscount => serde_json::to_string(&DiscountOutput::from(result))?,
        _ => serde_json::to_string(&result)?,
    };
    Ok(output)
}

fn load<C: MetafieldConfig>(input: &FunctionInput, feature: Feature) -> Option<C> {
    let parsed = input
        .metafield_value()
        .ok_or(ConfigError::MissingMetafield)
        .and_then(C::from_metafield);
    match parsed {
        Ok(config) => Some(config),
        Err(err) => {
            tracing::warn!(%feature, error = %err, "configuration unusable, no changes");
            None
        }
    }
}

// Loads a condition rule and returns it only when its conditions fire.
fn triggered_rule(input: &FunctionInput, feature: Feature) -> Option<RuleConfig> {
    let rule = load::<RuleConfig>(input, feature)?;
    if rule.conditions.evaluate(&input.cart, feature) {
        tracing::debug!(%feature, rule = %rule.name, "conditions matched");
        Some(rule)
    } else {
        tracing::debug!(%feature, rule = %rule.name, "no condition matched");
        None
    }
}

fn target<'a>(
    rule: &'a RuleConfig,
    feature: Feature,
    select: fn(&TargetSelector) -> Option<&str>,
) -> Option<&'a str> {
    match select(&rule.target).map(str::trim) {
        Some(name) if !name.is_empty() => Some(name),
        _ => {
            tracing::warn!(%feature, configured = rule.target.as_str(), "rule has no usable target");
            None
        }
    }
}

fn collect(feature: Feature, wanted: &str, operations: Vec<Operation>) -> FunctionResult {
    if operations.is_empty() {
        tracing::info!(%feature, wanted, "target not present at checkout");
    }
    FunctionResult::new(operations)
}

/// Hide the first payment method whose name contains the configured one.
pub fn hide_payment(input: &FunctionInput) -> FunctionResult {
    let feature = Feature::HidePayment;
    let Some(rule) = triggered_rule(input, feature) else {
        return FunctionResult::no_changes();
    };
    let Some(wanted) = target(&rule, feature, TargetSelector::payment_method) else {
        return FunctionResult::no_changes();
    };

    let operations = input
        .payment_methods
        .iter()
        .find(|method| method.name.contains(wanted))
        .map(|method| Operation::hide_payment_method(&method.id))
        .into_iter()
        .collect();
    collect(feature, wanted, operations)
}

/// Rename payment methods named exactly as configured, unconditionally.
pub fn rename_payment(input: &FunctionInput) -> FunctionResult {
    let feature = Feature::RenamePayment;
    let Some(config) = load::<RenamePaymentConfig>(input, feature) else {
        return FunctionResult::no_changes();
    };
    let wanted = config.payment_method.trim();
    if wanted.is_empty() || config.new_name.trim().is_empty() {
        tracing::warn!(%feature, "payment method and new name are both required");
        return FunctionResult::no_changes();
    }

    let operations = input
        .payment_methods
        .iter()
        .filter(|method| method.name == wanted)
        .map(|method| Operation::rename_payment_method(&method.id, &config.new_name))
        .collect();
    collect(feature, wanted, operations)
}

/// Hide every delivery option titled exactly as configured.
pub fn hide_shipping(input: &FunctionInput) -> FunctionResult {
    let feature = Feature::HideShipping;
    let Some(rule) = triggered_rule(input, feature) else {
        return FunctionResult::no_changes();
    };
    let Some(wanted) = target(&rule, feature, TargetSelector::shipping_method) else {
        return FunctionResult::no_changes();
    };

    let operations = input
        .cart
        .delivery_options()
        .filter(|option| option.title.as_deref() == Some(wanted))
        .map(|option| Operation::hide_delivery_option(&option.handle))
        .collect();
    collect(feature, wanted, operations)
}

/// Append the rule's message to every delivery option titled as configured.
pub fn rename_shipping(input: &FunctionInput) -> FunctionResult {
    let feature = Feature::RenameShipping;
    let Some(rule) = triggered_rule(input, feature) else {
        return FunctionResult::no_changes();
    };
    let Some(wanted) = target(&rule, feature, TargetSelector::shipping_method) else {
        return FunctionResult::no_changes();
    };
    let Some(message) = rule.message.as_deref().filter(|m| !m.trim().is_empty()) else {
        tracing::warn!(%feature, rule = %rule.name, "rename rule has no message");
        return FunctionResult::no_changes();
    };

    let operations = input
        .cart
        .delivery_options()
        .filter_map(|option| {
            let title = option.title.as_deref().filter(|t| *t == wanted)?;
            Some(Operation::rename_delivery_option(
                &option.handle,
                &format!("{title} - {message}"),
            ))
        })
        .collect();
    collect(feature, wanted, operations)
}

/// Percentage (0-100) for a discount fraction, without trailing zeros.
fn percentage(fraction: Decimal) -> Decimal {
    (fraction * Decimal::ONE_HUNDRED).normalize()
}

/// Discount every line once the cart's total quantity reaches a tier.
pub fn quantity_discount(input: &FunctionInput) -> FunctionResult {
    let feature = Feature::QuantityDiscount;
    let Some(config) = load::<DiscountConfig>(input, feature) else {
        return FunctionResult::no_changes();
    };

    let quantity = input.cart.total_quantity();
    let Some(fraction) = config.tier_for(quantity) else {
        tracing::debug!(%feature, quantity, "below every discount tier");
        return FunctionResult::no_changes();
    };
    let percent = percentage(fraction);
    tracing::debug!(%feature, quantity, %percent, "discount tier reached");

    let operations = input
        .cart
        .lines
        .iter()
        .filter_map(|line| line.variant_id())
        .map(|variant| Operation::discount_variant(variant, percent))
        .collect();
    FunctionResult::new(operations)
}

/// Offer upsell products after checkout.
///
/// A product-level setting on any cart line wins over the shop setting. The
/// shop setting applies when the cart holds a selected product or when it
/// targets every order. An empty offer list shows nothing.
pub fn upsell(input: &FunctionInput) -> FunctionResult {
    let feature = Feature::Upsell;
    let config = if let Some(value) = input.product_metafield_value() {
        match UpsellConfig::from_metafield(value) {
            Ok(config) => {
                tracing::debug!(%feature, "product-level upsell applies");
                config
            }
            Err(err) => {
                tracing::warn!(
                    %feature,
                    error = %err,
                    "product upsell setting unusable, no changes"
                );
                return FunctionResult::no_changes();
            }
        }
    } else {
        let Some(config) = load::<UpsellConfig>(input, feature) else {
            return FunctionResult::no_changes();
        };
        if config.selects_any(input.cart.product_ids()) {
            tracing::debug!(%feature, "cart holds a selected product");
        } else if config.applies_to_all() {
            tracing::debug!(%feature, "upsell applies to every order");
        } else {
            tracing::debug!(%feature, "no selected product in cart");
            return FunctionResult::no_changes();
        }
        config
    };

    let products = config.offered_products();
    if products.is_empty() {
        tracing::info!(%feature, "upsell has no products to offer");
        return FunctionResult::no_changes();
    }
    FunctionResult::new(vec![Operation::show_upsell(products)])
}
