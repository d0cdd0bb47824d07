//! Campaign trigger kinds.

use serde::{Deserialize, Serialize};

/// Condition that causes a campaign to be executed.
///
/// `Manual` campaigns are only dispatched by an explicit caller. All other
/// kinds are evaluated by the automation sweep, though only a subset is
/// automated today (see [`TriggerKind::is_automated`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "campaign_trigger", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    #[default]
    Manual,
    Birthday,
    Festival,
    WarrantyExpiry,
    CartAbandoned,
    PurchaseAnniversary,
    NoPurchase30Days,
    GeoTargeted,
}

impl TriggerKind {
    /// Whether the automation sweep evaluates this trigger kind.
    ///
    /// Cart-abandoned, purchase-anniversary and geo-targeted campaigns exist
    /// in the schema but have no sweep logic; they are skipped.
    #[must_use]
    pub const fn is_automated(self) -> bool {
        matches!(
            self,
            Self::Birthday | Self::Festival | Self::WarrantyExpiry | Self::NoPurchase30Days
        )
    }
}

impl std::fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Manual => "manual",
            Self::Birthday => "birthday",
            Self::Festival => "festival",
            Self::WarrantyExpiry => "warranty_expiry",
            Self::CartAbandoned => "cart_abandoned",
            Self::PurchaseAnniversary => "purchase_anniversary",
            Self::NoPurchase30Days => "no_purchase_30_days",
            Self::GeoTargeted => "geo_targeted",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_is_not_automated() {
        assert!(!TriggerKind::Manual.is_automated());
    }

    #[test]
    fn test_automated_kinds() {
        assert!(TriggerKind::Birthday.is_automated());
        assert!(TriggerKind::Festival.is_automated());
        assert!(TriggerKind::WarrantyExpiry.is_automated());
        assert!(TriggerKind::NoPurchase30Days.is_automated());
        assert!(!TriggerKind::CartAbandoned.is_automated());
        assert!(!TriggerKind::PurchaseAnniversary.is_automated());
        assert!(!TriggerKind::GeoTargeted.is_automated());
    }
}
