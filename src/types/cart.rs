use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Read-only view of the cart supplied by the host at evaluation time.
///
/// Field names follow the host's input query (camelCase). Every part the
/// evaluators read is optional: absent buyer, address or total simply makes
/// the conditions that need them fail to match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    #[serde(default)]
    pub lines: Vec<CartLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer_identity: Option<BuyerIdentity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<CartCost>,
    #[serde(default)]
    pub delivery_groups: Vec<DeliveryGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    #[serde(default)]
    pub quantity: u64,
    pub merchandise: Merchandise,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Merchandise {
    #[serde(rename = "__typename", default, skip_serializing_if = "Option::is_none")]
    pub typename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    #[serde(default)]
    pub has_tags: Vec<HasTagResponse>,
    /// Product-level override of the shop configuration, where a feature reads one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metafield: Option<MetafieldValue>,
}

/// One entry of a `hasTags(tags: [...])` query result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HasTagResponse {
    pub tag: String,
    #[serde(default = "tag_present")]
    pub has_tag: bool,
}

fn tag_present() -> bool {
    true
}

impl HasTagResponse {
    #[must_use]
    pub fn present(tag: &str) -> Self {
        Self {
            tag: tag.to_owned(),
            has_tag: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerIdentity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(default)]
    pub has_tags: Vec<HasTagResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCost {
    pub total_amount: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Money {
    pub amount: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<MailingAddress>,
    #[serde(default)]
    pub delivery_options: Vec<DeliveryOption>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailingAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryOption {
    pub handle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: String,
    pub name: String,
}

/// Everything the host hands a function invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionInput {
    #[serde(default)]
    pub cart: CartSnapshot,
    #[serde(default)]
    pub payment_methods: Vec<PaymentMethod>,
    #[serde(default)]
    pub shop: Shop,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shop {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metafield: Option<MetafieldValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetafieldValue {
    #[serde(default)]
    pub value: Option<String>,
}

impl FunctionInput {
    #[must_use]
    pub fn new(cart: CartSnapshot) -> Self {
        Self {
            cart,
            ..Self::default()
        }
    }

    /// Attach the stored configuration value.
    #[must_use]
    pub fn with_metafield(mut self, value: &str) -> Self {
        self.shop.metafield = Some(MetafieldValue {
            value: Some(value.to_owned()),
        });
        self
    }

    #[must_use]
    pub fn with_payment_method(mut self, id: &str, name: &str) -> Self {
        self.payment_methods.push(PaymentMethod {
            id: id.to_owned(),
            name: name.to_owned(),
        });
        self
    }

    /// The metafield value, if the shop has one and it is non-empty.
    #[must_use]
    pub fn metafield_value(&self) -> Option<&str> {
        self.shop.metafield.as_ref().and_then(MetafieldValue::non_blank)
    }

    /// The first product-level metafield value found on a cart line.
    #[must_use]
    pub fn product_metafield_value(&self) -> Option<&str> {
        self.cart
            .lines
            .iter()
            .find_map(CartLine::product_metafield_value)
    }
}

impl MetafieldValue {
    fn non_blank(&self) -> Option<&str> {
        self.value.as_deref().filter(|v| !v.trim().is_empty())
    }
}

impl CartLine {
    /// A product-variant line.
    #[must_use]
    pub fn new(variant_id: &str, product_id: &str, quantity: u64) -> Self {
        Self {
            quantity,
            merchandise: Merchandise {
                typename: Some("ProductVariant".to_owned()),
                id: Some(variant_id.to_owned()),
                product: Some(Product {
                    id: product_id.to_owned(),
                    has_tags: Vec::new(),
                    metafield: None,
                }),
            },
        }
    }

    /// Mark the line's product as carrying these tags.
    #[must_use]
    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        if let Some(product) = self.merchandise.product.as_mut() {
            product
                .has_tags
                .extend(tags.iter().map(|t| HasTagResponse::present(t)));
        }
        self
    }

    /// Attach a product-level configuration value.
    #[must_use]
    pub fn with_product_metafield(mut self, value: &str) -> Self {
        if let Some(product) = self.merchandise.product.as_mut() {
            product.metafield = Some(MetafieldValue {
                value: Some(value.to_owned()),
            });
        }
        self
    }

    /// The product-level metafield value, if present and non-empty.
    #[must_use]
    pub fn product_metafield_value(&self) -> Option<&str> {
        self.merchandise
            .product
            .as_ref()
            .and_then(|p| p.metafield.as_ref())
            .and_then(MetafieldValue::non_blank)
    }

    #[must_use]
    pub fn product_id(&self) -> Option<&str> {
        self.merchandise.product.as_ref().map(|p| p.id.as_str())
    }

    #[must_use]
    pub fn variant_id(&self) -> Option<&str> {
        self.merchandise.id.as_deref()
    }

    #[must_use]
    pub fn has_product_tag(&self, tag: &str) -> bool {
        self.merchandise
            .product
            .as_ref()
            .is_some_and(|p| has_tag(&p.has_tags, tag))
    }
}

impl DeliveryGroup {
    #[must_use]
    pub fn new(country_code: Option<&str>) -> Self {
        Self {
            delivery_address: Some(MailingAddress {
                country_code: country_code.map(str::to_owned),
            }),
            delivery_options: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_option(mut self, handle: &str, title: &str) -> Self {
        self.delivery_options.push(DeliveryOption {
            handle: handle.to_owned(),
            title: Some(title.to_owned()),
        });
        self
    }

    #[must_use]
    pub fn country_code(&self) -> Option<&str> {
        self.delivery_address
            .as_ref()
            .and_then(|a| a.country_code.as_deref())
            .filter(|c| !c.is_empty())
    }
}

fn has_tag(tags: &[HasTagResponse], tag: &str) -> bool {
    tags.iter().any(|t| t.has_tag && t.tag == tag)
}

impl CartSnapshot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_total(mut self, amount: Decimal) -> Self {
        self.cost = Some(CartCost {
            total_amount: Money { amount },
        });
        self
    }

    #[must_use]
    pub fn with_line(mut self, line: CartLine) -> Self {
        self.lines.push(line);
        self
    }

    /// Attach a logged-in customer carrying these tags.
    #[must_use]
    pub fn with_customer_tags(mut self, tags: &[&str]) -> Self {
        self.buyer_identity = Some(BuyerIdentity {
            customer: Some(Customer {
                has_tags: tags.iter().map(|t| HasTagResponse::present(t)).collect(),
            }),
        });
        self
    }

    #[must_use]
    pub fn with_delivery_group(mut self, group: DeliveryGroup) -> Self {
        self.delivery_groups.push(group);
        self
    }

    #[must_use]
    pub fn total_amount(&self) -> Option<Decimal> {
        self.cost.as_ref().map(|c| c.total_amount.amount)
    }

    /// Whether the buyer carries `tag`, or `None` when there is no customer.
    #[must_use]
    pub fn customer_has_tag(&self, tag: &str) -> Option<bool> {
        let customer = self.buyer_identity.as_ref()?.customer.as_ref()?;
        Some(has_tag(&customer.has_tags, tag))
    }

    /// Parent product ids of all product-variant lines.
    pub fn product_ids(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().filter_map(CartLine::product_id)
    }

    /// Country codes of all delivery addresses that have one.
    pub fn country_codes(&self) -> impl Iterator<Item = &str> {
        self.delivery_groups
            .iter()
            .filter_map(DeliveryGroup::country_code)
    }

    /// Sum of line quantities, saturating at `u64::MAX`.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.lines
            .iter()
            .fold(0_u64, |total, line| total.saturating_add(line.quantity))
    }

    pub fn delivery_options(&self) -> impl Iterator<Item = &DeliveryOption> {
        self.delivery_groups
            .iter()
            .flat_map(|g| g.delivery_options.iter())
    }
}
