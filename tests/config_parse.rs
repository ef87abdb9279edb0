use checkout_rules::{
    Comparator, Condition, ConditionSet, DiscountConfig, Feature, Membership, MetafieldConfig,
    MetafieldSet, RawCondition, RenamePaymentConfig, RuleConfig, TargetSelector, UpsellConfig,
    ValidationError,
};
use rust_decimal::Decimal;
use serde_json::json;

fn every_kind() -> ConditionSet {
    ConditionSet::new()
        .with(Condition::cart_total(Comparator::LessThan, Decimal::new(4999, 2)))
        .with(Condition::product(
            Membership::IsNot,
            ["gid://shopify/Product/1", "gid://shopify/Product/2"],
        ))
        .with(Condition::product_tag(Membership::Is, "Sale"))
        .with(Condition::shipping_country(Membership::Is, "IN"))
        .with(Condition::customer_tag(Membership::IsNot, "VIP"))
        .with(Condition::customer_type(Membership::Is, "B2B"))
}

#[test]
fn payment_rule_round_trip() {
    let rule = RuleConfig::new(
        "Hide COD",
        TargetSelector::PaymentMethod("Cash on Delivery".to_owned()),
    )
    .with_shop_id("gid://shopify/Shop/74655760623");
    let rule = RuleConfig {
        conditions: every_kind(),
        ..rule
    };

    let stored = rule.to_metafield_value().unwrap();
    assert_eq!(RuleConfig::from_metafield(&stored).unwrap(), rule);
}

#[test]
fn shipping_rule_round_trip() {
    let rule = RuleConfig::new(
        "Slow shipping note",
        TargetSelector::ShippingMethod("Standard".to_owned()),
    )
    .with_message("Ships in 5 days")
    .with_condition(Condition::shipping_country(Membership::IsNot, "US"));

    let stored = rule.to_metafield_value().unwrap();
    assert_eq!(RuleConfig::from_metafield(&stored).unwrap(), rule);
}

#[test]
fn rename_payment_round_trip() {
    let config = RenamePaymentConfig::new("Cash on Delivery", "Pay on arrival");
    let stored = config.to_metafield_value().unwrap();
    assert_eq!(RenamePaymentConfig::from_metafield(&stored).unwrap(), config);
}

#[test]
fn discount_round_trip() {
    let config = DiscountConfig::new(5, Decimal::new(5, 2), 10, Decimal::new(10, 2));
    let stored = config.to_metafield_value().unwrap();
    assert_eq!(DiscountConfig::from_metafield(&stored).unwrap(), config);
}

#[test]
fn upsell_round_trip() {
    let config = UpsellConfig::new(["gid://shopify/Product/8001"])
        .for_products(["gid://shopify/Product/1"]);
    let stored = config.to_metafield_value().unwrap();
    assert_eq!(UpsellConfig::from_metafield(&stored).unwrap(), config);
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&stored).unwrap(),
        json!({
            "selectedProducts": ["gid://shopify/Product/1"],
            "upsellProducts": ["gid://shopify/Product/8001"]
        })
    );
}

#[test]
fn unknown_condition_round_trips_verbatim() {
    let raw = json!({"type": "weather", "operator": "is", "value": {"sky": "grey"}});
    let condition: Condition = serde_json::from_value(raw.clone()).unwrap();
    assert!(matches!(condition, Condition::Unsupported(_)));
    assert_eq!(serde_json::to_value(&condition).unwrap(), raw);
}

#[test]
fn legacy_shape_migrates_in_category_order() {
    let rule = RuleConfig::from_metafield(
        r#"{"paymentMethod":"Cash on Delivery","conditions":{
            "shippingCountry":[{"greaterOrSmall":"is_not","country":"FR"}],
            "products":[{"products":"gid://shopify/Product/1, gid://shopify/Product/2"}],
            "cartTotal":[{"amount":"100"},{"greaterOrSmall":"less_than","amount":20}]
        }}"#,
    )
    .unwrap();

    assert_eq!(
        rule.conditions.as_slice(),
        &[
            Condition::cart_total(Comparator::GreaterThan, Decimal::new(100, 0)),
            Condition::cart_total(Comparator::LessThan, Decimal::new(20, 0)),
            Condition::product(
                Membership::Is,
                ["gid://shopify/Product/1", "gid://shopify/Product/2"]
            ),
            Condition::shipping_country(Membership::IsNot, "FR"),
        ]
    );
}

#[test]
fn legacy_shape_reserializes_canonically() {
    let rule = RuleConfig::from_metafield(
        r#"{"paymentMethod":"COD","condition":{"cartTotal":[{"greaterOrSmall":"greater_than","amount":"100"}]}}"#,
    )
    .unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&rule.to_metafield_value().unwrap()).unwrap();
    assert_eq!(
        value["conditions"],
        json!([{"type": "cart_total", "operator": "greater_than", "value": "100"}])
    );
}

#[test]
fn unparseable_amount_is_kept_as_unsupported() {
    let rule = RuleConfig::from_metafield(
        r#"{"paymentMethod":"COD","conditions":[{"type":"cart_total","operator":"greater_than","value":"lots"}]}"#,
    )
    .unwrap();
    assert_eq!(
        rule.conditions.as_slice(),
        &[Condition::Unsupported(RawCondition::new(
            "cart_total",
            "greater_than",
            "lots"
        ))]
    );
}

#[test]
fn metafield_contract_per_feature() {
    let rule = RuleConfig::new("r", TargetSelector::ShippingMethod("Express".to_owned()))
        .with_shop_id("gid://shopify/Shop/3")
        .with_condition(Condition::customer_tag(Membership::Is, "VIP"));

    let locations: Vec<(&str, &str)> = Feature::ALL
        .iter()
        .map(|f| (f.namespace(), f.key()))
        .collect();
    assert_eq!(
        locations,
        [
            ("cart", "hide_payment"),
            ("rename", "payment_method"),
            ("method", "hide_shipping"),
            ("method", "rename_shipping"),
            ("discount", "quantity_tiers"),
            ("settings", "upsell"),
        ]
    );

    let set = rule.metafield(Feature::RenameShipping).unwrap();
    assert_eq!(
        serde_json::to_value(&set).unwrap()["type"],
        json!("json")
    );
    let back: MetafieldSet = serde_json::from_value(serde_json::to_value(&set).unwrap()).unwrap();
    assert_eq!(back, set);
}

#[test]
fn validation_reports_every_failure() {
    let rule = RuleConfig::new(" ", TargetSelector::ShippingMethod("Standard".to_owned()))
        .with_shop_id("shop-1")
        .with_condition(Condition::product(Membership::Is, ["gid://shopify/Product/1"]))
        .with_condition(Condition::cart_total(Comparator::GreaterThan, Decimal::ZERO))
        .with_condition(Condition::cart_total(Comparator::LessThan, Decimal::new(10, 0)));

    assert_eq!(
        rule.validation_errors(Feature::RenameShipping),
        vec![
            ValidationError::InvalidShopId {
                shop_id: "shop-1".to_owned()
            },
            ValidationError::MissingName,
            ValidationError::MissingMessage,
            ValidationError::UnsupportedKind {
                position: 1,
                kind: checkout_rules::ConditionKind::Product
            },
            ValidationError::NonPositiveAmount { position: 2 },
            ValidationError::RepeatedKind {
                kind: checkout_rules::ConditionKind::CartTotal
            },
        ]
    );
    assert_eq!(
        rule.validate(Feature::RenameShipping),
        Err(ValidationError::InvalidShopId {
            shop_id: "shop-1".to_owned()
        })
    );
}

#[test]
fn valid_rule_passes() {
    let rule = RuleConfig::new("Hide COD", TargetSelector::PaymentMethod("COD".to_owned()))
        .with_shop_id("gid://shopify/Shop/1")
        .with_condition(Condition::cart_total(Comparator::GreaterThan, Decimal::new(100, 0)))
        .with_condition(Condition::customer_tag(Membership::Is, "VIP"));
    assert_eq!(rule.validate(Feature::HidePayment), Ok(()));
}

#[test]
fn discount_validation() {
    let inverted = DiscountConfig::new(10, Decimal::new(5, 2), 5, Decimal::new(10, 2));
    assert_eq!(
        inverted.validate(),
        Err(ValidationError::ThresholdOrder { low: 10, high: 5 })
    );
    let too_big = DiscountConfig::new(5, Decimal::new(5, 2), 10, Decimal::new(15, 1));
    assert_eq!(
        too_big.validate(),
        Err(ValidationError::DiscountOutOfRange {
            field: "discountHigh"
        })
    );
}
