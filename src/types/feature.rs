use std::fmt;
use std::str::FromStr;

use super::condition::ConditionKind;

/// The checkout customizations this crate evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    HidePayment,
    RenamePayment,
    HideShipping,
    RenameShipping,
    QuantityDiscount,
    Upsell,
}

const SHIPPING_KINDS: &[ConditionKind] = &[
    ConditionKind::CartTotal,
    ConditionKind::CustomerTag,
    ConditionKind::CustomerType,
    ConditionKind::ShippingCountry,
    ConditionKind::ProductTag,
];

impl Feature {
    pub const ALL: [Feature; 6] = [
        Feature::HidePayment,
        Feature::RenamePayment,
        Feature::HideShipping,
        Feature::RenameShipping,
        Feature::QuantityDiscount,
        Feature::Upsell,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Feature::HidePayment => "hide-payment",
            Feature::RenamePayment => "rename-payment",
            Feature::HideShipping => "hide-shipping",
            Feature::RenameShipping => "rename-shipping",
            Feature::QuantityDiscount => "quantity-discount",
            Feature::Upsell => "upsell",
        }
    }

    /// Metafield namespace the feature's configuration lives under.
    #[must_use]
    pub fn namespace(self) -> &'static str {
        match self {
            Feature::HidePayment => "cart",
            Feature::RenamePayment => "rename",
            Feature::HideShipping | Feature::RenameShipping => "method",
            Feature::QuantityDiscount => "discount",
            Feature::Upsell => "settings",
        }
    }

    /// Metafield key the feature's configuration lives under.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Feature::HidePayment => "hide_payment",
            Feature::RenamePayment => "payment_method",
            Feature::HideShipping => "hide_shipping",
            Feature::RenameShipping => "rename_shipping",
            Feature::QuantityDiscount => "quantity_tiers",
            Feature::Upsell => "upsell",
        }
    }

    /// Condition kinds this feature evaluates. Anything else never matches.
    #[must_use]
    pub fn honored_kinds(self) -> &'static [ConditionKind] {
        match self {
            Feature::HidePayment => &ConditionKind::ALL,
            Feature::HideShipping | Feature::RenameShipping => SHIPPING_KINDS,
            Feature::RenamePayment | Feature::QuantityDiscount | Feature::Upsell => &[],
        }
    }

    /// Kinds that may appear at most once in a rule.
    #[must_use]
    pub fn unique_kinds(self) -> &'static [ConditionKind] {
        match self {
            Feature::HidePayment => &ConditionKind::ALL,
            Feature::HideShipping | Feature::RenameShipping => &[
                ConditionKind::CartTotal,
                ConditionKind::CustomerType,
                ConditionKind::ShippingCountry,
            ],
            Feature::RenamePayment | Feature::QuantityDiscount | Feature::Upsell => &[],
        }
    }

    #[must_use]
    pub fn honors(self, kind: ConditionKind) -> bool {
        self.honored_kinds().contains(&kind)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown feature '{0}'")]
pub struct UnknownFeature(pub String);

impl FromStr for Feature {
    type Err = UnknownFeature;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| UnknownFeature(s.to_owned()))
    }
}
