use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single change the host applies to checkout.
///
/// Serializes in the host's operation shape, e.g.
/// `{"hide": {"paymentMethodId": "..."}}` or
/// `{"rename": {"deliveryOptionHandle": "...", "title": "..."}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Hide(HideOperation),
    Rename(RenameOperation),
    Discount(DiscountOperation),
    ShowUpsell(UpsellOperation),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HideOperation {
    PaymentMethod {
        #[serde(rename = "paymentMethodId")]
        payment_method_id: String,
    },
    DeliveryOption {
        #[serde(rename = "deliveryOptionHandle")]
        delivery_option_handle: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RenameOperation {
    PaymentMethod {
        #[serde(rename = "paymentMethodId")]
        payment_method_id: String,
        name: String,
    },
    DeliveryOption {
        #[serde(rename = "deliveryOptionHandle")]
        delivery_option_handle: String,
        title: String,
    },
}

/// Products to offer on the order status page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsellOperation {
    pub product_ids: Vec<String>,
}

/// Percentage discount on one product variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountOperation {
    pub targets: Vec<DiscountTarget>,
    pub value: DiscountValue,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountTarget {
    pub product_variant: VariantRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRef {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountValue {
    pub percentage: Percentage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Percentage {
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
}

impl Operation {
    #[must_use]
    pub fn hide_payment_method(id: &str) -> Self {
        Operation::Hide(HideOperation::PaymentMethod {
            payment_method_id: id.to_owned(),
        })
    }

    #[must_use]
    pub fn hide_delivery_option(handle: &str) -> Self {
        Operation::Hide(HideOperation::DeliveryOption {
            delivery_option_handle: handle.to_owned(),
        })
    }

    #[must_use]
    pub fn rename_payment_method(id: &str, name: &str) -> Self {
        Operation::Rename(RenameOperation::PaymentMethod {
            payment_method_id: id.to_owned(),
            name: name.to_owned(),
        })
    }

    #[must_use]
    pub fn rename_delivery_option(handle: &str, title: &str) -> Self {
        Operation::Rename(RenameOperation::DeliveryOption {
            delivery_option_handle: handle.to_owned(),
            title: title.to_owned(),
        })
    }

    #[must_use]
    pub fn show_upsell(product_ids: Vec<String>) -> Self {
        Operation::ShowUpsell(UpsellOperation { product_ids })
    }

    /// Discount `variant_id` by `percentage` (0-100).
    #[must_use]
    pub fn discount_variant(variant_id: &str, percentage: Decimal) -> Self {
        Operation::Discount(DiscountOperation {
            targets: vec![DiscountTarget {
                product_variant: VariantRef {
                    id: variant_id.to_owned(),
                },
            }],
            value: DiscountValue {
                percentage: Percentage { value: percentage },
            },
            message: format!("You have received a {percentage}% discount!"),
        })
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Hide(HideOperation::PaymentMethod { payment_method_id }) => {
                write!(f, "hide payment method {payment_method_id}")
            }
            Operation::Hide(HideOperation::DeliveryOption {
                delivery_option_handle,
            }) => write!(f, "hide delivery option {delivery_option_handle}"),
            Operation::Rename(RenameOperation::PaymentMethod {
                payment_method_id,
                name,
            }) => write!(f, "rename payment method {payment_method_id} to \"{name}\""),
            Operation::Rename(RenameOperation::DeliveryOption {
                delivery_option_handle,
                title,
            }) => write!(
                f,
                "rename delivery option {delivery_option_handle} to \"{title}\""
            ),
            Operation::Discount(d) => {
                let ids: Vec<&str> = d
                    .targets
                    .iter()
                    .map(|t| t.product_variant.id.as_str())
                    .collect();
                write!(
                    f,
                    "discount {}% on [{}]",
                    d.value.percentage.value,
                    ids.join(", ")
                )
            }
            Operation::ShowUpsell(u) => write!(f, "show upsell [{}]", u.product_ids.join(", ")),
        }
    }
}

/// Result of one function invocation. No operations means no change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct FunctionResult {
    pub operations: Vec<Operation>,
}

impl FunctionResult {
    pub fn no_changes() -> Self {
        Self::default()
    }

    pub fn new(operations: Vec<Operation>) -> Self {
        Self { operations }
    }

    #[must_use]
    pub fn is_no_change(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Output shape for discount functions:
/// `{ "discountApplicationStrategy": "FIRST", "discounts": [...] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountOutput {
    pub discount_application_strategy: String,
    pub discounts: Vec<DiscountOperation>,
}

impl From<FunctionResult> for DiscountOutput {
    fn from(result: FunctionResult) -> Self {
        let discounts = result
            .operations
            .into_iter()
            .filter_map(|op| match op {
                Operation::Discount(d) => Some(d),
                _ => None,
            })
            .collect();
        Self {
            discount_application_strategy: "FIRST".to_owned(),
            discounts,
        }
    }
}
