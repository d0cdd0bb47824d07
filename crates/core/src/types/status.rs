//! Campaign lifecycle status and its state machine.

use serde::{Deserialize, Serialize};

/// Campaign lifecycle status.
///
/// Legal transitions:
///
/// ```text
/// Draft -> Scheduled -> Active <-> Paused
///                         |           |
///                         +-> Completed <-+
/// ```
///
/// `Completed` is terminal. `Scheduled -> Active` also happens implicitly the
/// first time a scheduled campaign is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "campaign_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    #[default]
    Draft,
    Scheduled,
    Active,
    Paused,
    Completed,
}

impl CampaignStatus {
    /// Whether a transition from `self` to `next` is legal.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::Scheduled)
                | (Self::Scheduled, Self::Active)
                | (Self::Active, Self::Paused | Self::Completed)
                | (Self::Paused, Self::Active | Self::Completed)
        )
    }

    /// Whether the dispatcher may execute sends for a campaign in this status.
    ///
    /// Scheduled campaigns are dispatchable; their first run moves them to
    /// `Active`.
    #[must_use]
    pub const fn is_dispatchable(self) -> bool {
        matches!(self, Self::Scheduled | Self::Active)
    }
}

impl std::fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Draft => "draft",
            Self::Scheduled => "scheduled",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Completed => "completed",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for CampaignStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "scheduled" => Ok(Self::Scheduled),
            "active" => Ok(Self::Active),
            "paused" => Ok(Self::Paused),
            "completed" => Ok(Self::Completed),
            _ => Err(format!("invalid campaign status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_path_is_legal() {
        assert!(CampaignStatus::Draft.can_transition_to(CampaignStatus::Scheduled));
        assert!(CampaignStatus::Scheduled.can_transition_to(CampaignStatus::Active));
        assert!(CampaignStatus::Active.can_transition_to(CampaignStatus::Completed));
    }

    #[test]
    fn test_pause_resume_cycle() {
        assert!(CampaignStatus::Active.can_transition_to(CampaignStatus::Paused));
        assert!(CampaignStatus::Paused.can_transition_to(CampaignStatus::Active));
        assert!(CampaignStatus::Paused.can_transition_to(CampaignStatus::Completed));
    }

    #[test]
    fn test_no_skipping_or_reversing() {
        assert!(!CampaignStatus::Draft.can_transition_to(CampaignStatus::Active));
        assert!(!CampaignStatus::Active.can_transition_to(CampaignStatus::Draft));
        assert!(!CampaignStatus::Scheduled.can_transition_to(CampaignStatus::Draft));
        assert!(!CampaignStatus::Draft.can_transition_to(CampaignStatus::Completed));
    }

    #[test]
    fn test_completed_is_terminal() {
        for next in [
            CampaignStatus::Draft,
            CampaignStatus::Scheduled,
            CampaignStatus::Active,
            CampaignStatus::Paused,
            CampaignStatus::Completed,
        ] {
            assert!(!CampaignStatus::Completed.can_transition_to(next));
        }
    }

    #[test]
    fn test_dispatchable_states() {
        assert!(CampaignStatus::Scheduled.is_dispatchable());
        assert!(CampaignStatus::Active.is_dispatchable());
        assert!(!CampaignStatus::Draft.is_dispatchable());
        assert!(!CampaignStatus::Paused.is_dispatchable());
        assert!(!CampaignStatus::Completed.is_dispatchable());
    }
}
