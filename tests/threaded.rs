use std::sync::Arc;
use std::thread;

use checkout_rules::{
    CartSnapshot, Comparator, Condition, Feature, FunctionInput, FunctionResult, MetafieldConfig,
    Membership, Operation, RuleConfig, TargetSelector, run,
};
use rust_decimal::Decimal;

#[test]
fn evaluate_across_threads() {
    let rule = RuleConfig::new(
        "No COD for big or wholesale carts",
        TargetSelector::PaymentMethod("Cash on Delivery".to_owned()),
    )
    .with_condition(Condition::cart_total(
        Comparator::GreaterThan,
        Decimal::new(100, 0),
    ))
    .with_condition(Condition::customer_type(Membership::Is, "Wholesale"));
    let stored = Arc::new(rule.to_metafield_value().unwrap());

    let carts = vec![
        // Thread 1: big cart -> hidden
        CartSnapshot::new().with_total(Decimal::new(150, 0)),
        // Thread 2: small wholesale cart -> hidden
        CartSnapshot::new()
            .with_total(Decimal::new(20, 0))
            .with_customer_tags(&["Wholesale"]),
        // Thread 3: small retail cart -> kept
        CartSnapshot::new()
            .with_total(Decimal::new(20, 0))
            .with_customer_tags(&["VIP"]),
        // Thread 4: no total, guest -> kept
        CartSnapshot::new(),
    ];

    let handles: Vec<_> = carts
        .into_iter()
        .map(|cart| {
            let stored = Arc::clone(&stored);
            thread::spawn(move || {
                let input = FunctionInput::new(cart)
                    .with_metafield(&stored)
                    .with_payment_method("pm-cod", "Cash on Delivery");
                run(Feature::HidePayment, &input)
            })
        })
        .collect();

    let results: Vec<FunctionResult> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let hidden = vec![Operation::hide_payment_method("pm-cod")];
    assert_eq!(results[0].operations, hidden);
    assert_eq!(results[1].operations, hidden);
    assert!(results[2].is_no_change());
    assert!(results[3].is_no_change());
}

#[test]
fn shared_rule_evaluates_identically() {
    let rule = Arc::new(
        RuleConfig::new("r", TargetSelector::ShippingMethod("Standard".to_owned()))
            .with_condition(Condition::cart_total(Comparator::LessThan, Decimal::new(50, 0))),
    );
    let cart = Arc::new(CartSnapshot::new().with_total(Decimal::new(49, 0)));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let rule = Arc::clone(&rule);
            let cart = Arc::clone(&cart);
            thread::spawn(move || rule.conditions.evaluate(&cart, Feature::HideShipping))
        })
        .collect();

    assert!(handles.into_iter().all(|h| h.join().unwrap()));
}
