mod cart;
mod condition;
mod condition_set;
mod error;
mod evaluation_report;
mod feature;
mod metafield;
mod operation;
mod rule_config;

pub use cart::{
    BuyerIdentity, CartCost, CartLine, CartSnapshot, Customer, DeliveryGroup, DeliveryOption,
    FunctionInput, HasTagResponse, MailingAddress, Merchandise, MetafieldValue, Money,
    PaymentMethod, Product, Shop,
};
pub use condition::{Comparator, Condition, ConditionKind, Membership, RawCondition};
pub use condition_set::ConditionSet;
pub use error::{ConfigError, ValidationError};
pub use evaluation_report::EvaluationReport;
pub use feature::{Feature, UnknownFeature};
pub use metafield::MetafieldSet;
pub use operation::{
    DiscountOperation, DiscountOutput, DiscountTarget, DiscountValue, FunctionResult,
    HideOperation, Operation, Percentage, RenameOperation, UpsellOperation, VariantRef,
};
pub use rule_config::{
    DiscountConfig, MetafieldConfig, RenamePaymentConfig, RuleConfig, TargetSelector,
    UpsellConfig, product_gid,
};
