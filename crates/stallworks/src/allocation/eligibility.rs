use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ApplicationStatus, IdentityHistory};

/// Cooldown thresholds governing resubmission, in whole days. The
/// combined stall-application entry point uses the stricter same-day
/// window because it creates a live reservation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityConfig {
    pub general_cooldown_days: i64,
    pub direct_cooldown_days: i64,
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            general_cooldown_days: 7,
            direct_cooldown_days: 1,
        }
    }
}

/// Verdict over an identity's submission history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EligibilityRuling {
    Allow,
    AllowWithWarning { notice: String },
    Deny { reason: String },
}

/// Stateless evaluator over the latest applicant+application pair for
/// an e-mail identity.
#[derive(Debug, Clone)]
pub struct EligibilityPolicy {
    config: EligibilityConfig,
}

impl EligibilityPolicy {
    pub fn new(config: EligibilityConfig) -> Self {
        Self { config }
    }

    /// Threshold for the applicant-only intake entry point.
    pub fn assess_intake(
        &self,
        history: Option<&IdentityHistory>,
        now: DateTime<Utc>,
    ) -> EligibilityRuling {
        self.assess(history, self.config.general_cooldown_days, now)
    }

    /// Threshold for the combined stall-application entry point.
    pub fn assess_direct(
        &self,
        history: Option<&IdentityHistory>,
        now: DateTime<Utc>,
    ) -> EligibilityRuling {
        self.assess(history, self.config.direct_cooldown_days, now)
    }

    fn assess(
        &self,
        history: Option<&IdentityHistory>,
        cooldown_days: i64,
        now: DateTime<Utc>,
    ) -> EligibilityRuling {
        let Some(history) = history else {
            return EligibilityRuling::Allow;
        };
        let Some(application) = history.application.as_ref() else {
            return EligibilityRuling::Allow;
        };

        match application.status {
            ApplicationStatus::Approved => EligibilityRuling::Deny {
                reason: "already associated with an approved application".to_string(),
            },
            ApplicationStatus::Declined => EligibilityRuling::Allow,
            ApplicationStatus::Pending => {
                let age_days = application.age_in_days(now);
                if age_days < cooldown_days {
                    let remaining = cooldown_days - age_days;
                    EligibilityRuling::Deny {
                        reason: format!(
                            "a pending application is still under review, wait {remaining} day(s) before submitting again"
                        ),
                    }
                } else {
                    EligibilityRuling::AllowWithWarning {
                        notice: "a previous pending application remains on file and is not cancelled by this submission"
                            .to_string(),
                    }
                }
            }
        }
    }
}
