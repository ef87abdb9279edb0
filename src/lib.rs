mod error;
mod evaluate;
mod run;
mod types;
mod validate;

pub use error::Error;
pub use evaluate::{condition_matches, evaluate_conditions, evaluate_detailed};
pub use run::{
    hide_payment, hide_shipping, quantity_discount, rename_payment, rename_shipping, run, run_json,
    upsell,
};
pub use types::{
    BuyerIdentity, CartCost, CartLine, CartSnapshot, Comparator, Condition, ConditionKind,
    ConditionSet, ConfigError, Customer, DeliveryGroup, DeliveryOption, DiscountConfig,
    DiscountOperation, DiscountOutput, DiscountTarget, DiscountValue, EvaluationReport, Feature,
    FunctionInput, FunctionResult, HasTagResponse, HideOperation, MailingAddress, Membership,
    Merchandise, MetafieldConfig, MetafieldSet, MetafieldValue, Money, Operation, PaymentMethod,
    Percentage, Product, RawCondition, RenameOperation, RenamePaymentConfig, RuleConfig, Shop,
    TargetSelector, UnknownFeature, UpsellConfig, UpsellOperation, ValidationError, VariantRef,
    product_gid,
};
