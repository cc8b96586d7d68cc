use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use super::domain::{
    AllocationMode, ApplicantDossier, ApplicantId, ApplicantRecord, ApplicantUpdate,
    ApplicationId, ApplicationRecord, ApplicationStatus, BusinessProfile, CivilStatus,
    ContactProfile, IntakeSubmission, SpouseRecord, StallId, StallStatus,
};
use super::eligibility::{EligibilityConfig, EligibilityPolicy, EligibilityRuling};
use super::repository::{
    ActivityEntry, ActivityEvent, ActivityLog, AllocationStore, AllocationTxn,
    NotificationGateway, OutcomeNotice, StoreError,
};
use super::sessions::{
    BidOutcome, ClosingOutcome, JoinOutcome, SessionError, SessionId, SessionKind, SessionRecord,
};

/// Service composing the eligibility policy, transactional store, and
/// post-commit collaborators into the allocation operation surface.
pub struct StallAllocationService<S, N, L> {
    store: Arc<S>,
    notifier: Arc<N>,
    activity: Arc<L>,
    policy: EligibilityPolicy,
    retention_days: i64,
}

static APPLICANT_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_applicant_id() -> ApplicantId {
    let id = APPLICANT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicantId(format!("apl-{id:06}"))
}

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("ses-{id:06}"))
}

/// Error raised by the allocation service.
#[derive(Debug, thiserror::Error)]
pub enum AllocationServiceError {
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },
    #[error("{reason}")]
    EligibilityDenied { reason: String },
    #[error("stall is not open for applications")]
    StallUnavailable,
    #[error("session no longer accepts changes")]
    SessionClosed,
    #[error("bid of {offered} does not beat the applicant's standing bid of {previous}")]
    BidTooLow { offered: u32, previous: u32 },
    #[error("{entity} not found")]
    NotFound { entity: &'static str },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<SessionError> for AllocationServiceError {
    fn from(value: SessionError) -> Self {
        match value {
            SessionError::Closed => Self::SessionClosed,
            SessionError::BidTooLow { offered, previous } => {
                Self::BidTooLow { offered, previous }
            }
            SessionError::WrongKind { submitted } => Self::Validation {
                field: "session_id",
                message: format!("session does not accept {submitted} entries"),
            },
        }
    }
}

/// Result of an admitted intake.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntakeReceipt {
    pub applicant_id: ApplicantId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<ApplicationId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

/// Sanitized session snapshot for API responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub stall_id: StallId,
    pub kind: &'static str,
    pub status: &'static str,
    pub deadline: DateTime<Utc>,
    pub participants: usize,
    pub bids: usize,
}

impl SessionView {
    fn from_record(record: &SessionRecord) -> Self {
        Self {
            session_id: record.id.clone(),
            stall_id: record.stall_id.clone(),
            kind: record.kind.label(),
            status: record.status.label(),
            deadline: record.deadline,
            participants: record.participants.len(),
            bids: record.bids.len(),
        }
    }
}

/// Outcome of a closing transition, for responses and sweep accounting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionClosure {
    pub session_id: SessionId,
    pub stall_id: StallId,
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<ApplicantId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<ApplicationId>,
}

/// Tally of one expiry sweep run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExpirySweepReport {
    pub closed_won: usize,
    pub cancelled: usize,
    pub skipped: usize,
    pub failures: usize,
}

impl ExpirySweepReport {
    pub fn touched(&self) -> usize {
        self.closed_won + self.cancelled + self.skipped + self.failures
    }
}

/// Tally of one cleanup sweep run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanupSweepReport {
    pub purged: usize,
    pub skipped: usize,
    pub failures: usize,
}

impl<S, N, L> StallAllocationService<S, N, L>
where
    S: AllocationStore + 'static,
    N: NotificationGateway + 'static,
    L: ActivityLog + 'static,
{
    pub fn new(
        store: Arc<S>,
        notifier: Arc<N>,
        activity: Arc<L>,
        eligibility: EligibilityConfig,
        retention_days: i64,
    ) -> Self {
        Self {
            store,
            notifier,
            activity,
            policy: EligibilityPolicy::new(eligibility),
            retention_days,
        }
    }

    /// Admit an applicant; a stall reservation is attached only when the
    /// submission carries a stall id.
    pub fn submit_intake(
        &self,
        submission: IntakeSubmission,
    ) -> Result<IntakeReceipt, AllocationServiceError> {
        self.admit(submission, false)
    }

    /// Combined entry point: applicant and stall application in one
    /// step, under the stricter same-day cooldown.
    pub fn submit_stall_application(
        &self,
        submission: IntakeSubmission,
    ) -> Result<IntakeReceipt, AllocationServiceError> {
        if submission.stall_id.is_none() {
            return Err(AllocationServiceError::Validation {
                field: "stall_id",
                message: "a stall id is required for a stall application".to_string(),
            });
        }
        self.admit(submission, true)
    }

    fn admit(
        &self,
        submission: IntakeSubmission,
        direct: bool,
    ) -> Result<IntakeReceipt, AllocationServiceError> {
        validate_submission(&submission)?;

        let now = Utc::now();
        let email = submission.other.email.trim().to_string();
        let history = self.store.latest_identity(&email)?;
        let ruling = if direct {
            self.policy.assess_direct(history.as_ref(), now)
        } else {
            self.policy.assess_intake(history.as_ref(), now)
        };
        let notice = match ruling {
            EligibilityRuling::Allow => None,
            EligibilityRuling::AllowWithWarning { notice } => Some(notice),
            EligibilityRuling::Deny { reason } => {
                return Err(AllocationServiceError::EligibilityDenied { reason })
            }
        };

        let applicant_id = next_applicant_id();
        let applicant = ApplicantRecord {
            id: applicant_id.clone(),
            full_name: submission.personal.full_name.trim().to_string(),
            contact_number: submission.personal.contact_number.trim().to_string(),
            civil_status: submission.personal.civil_status,
            address: submission.personal.address.trim().to_string(),
            created_at: now,
        };
        let business = submission.business.as_ref().map(|details| BusinessProfile {
            applicant_id: applicant_id.clone(),
            business_name: details.business_name.trim().to_string(),
            line_of_business: details.line_of_business.trim().to_string(),
            capitalization: details.capitalization,
        });
        // A spouse record is kept only for married applicants who named one.
        let spouse = submission
            .spouse
            .as_ref()
            .filter(|details| {
                submission.personal.civil_status == CivilStatus::Married
                    && !details.full_name.trim().is_empty()
            })
            .map(|details| SpouseRecord {
                applicant_id: applicant_id.clone(),
                full_name: details.full_name.trim().to_string(),
                contact_number: details.contact_number.clone(),
            });
        let contact = ContactProfile {
            applicant_id: applicant_id.clone(),
            email: email.clone(),
            emergency_contact: submission.other.emergency_contact.clone(),
        };
        let requested_stall = submission.stall_id.clone();

        let application_id = self.store.transaction(
            &mut |txn| -> Result<Option<ApplicationId>, AllocationServiceError> {
                txn.insert_applicant(applicant.clone())?;
                if let Some(business) = business.clone() {
                    txn.insert_business_profile(business)?;
                }
                if let Some(spouse) = spouse.clone() {
                    txn.insert_spouse_record(spouse)?;
                }
                txn.insert_contact_profile(contact.clone())?;

                let Some(stall_id) = requested_stall.clone() else {
                    return Ok(None);
                };

                // Availability is re-checked here, inside the same
                // transaction as the application insert, to close the
                // race between the eligibility check and the write.
                let mut stall = txn
                    .stall(&stall_id)
                    .ok_or(AllocationServiceError::NotFound { entity: "stall" })?;
                if !stall.open_for_application() {
                    return Err(AllocationServiceError::StallUnavailable);
                }

                let application_id = next_application_id();
                txn.insert_application(ApplicationRecord {
                    id: application_id.clone(),
                    applicant_id: applicant_id.clone(),
                    stall_id: stall_id.clone(),
                    status: ApplicationStatus::Pending,
                    submitted_at: now,
                })?;
                stall.available = false;
                txn.update_stall(stall)?;
                Ok(Some(application_id))
            },
        )?;

        self.send_notice(
            "application_received",
            &email,
            application_id
                .as_ref()
                .map(|id| ("application_id", id.0.clone())),
        );
        self.activity.record(ActivityEntry {
            event: ActivityEvent::IntakeSubmitted,
            subject: applicant_id.0.clone(),
            detail: format!("intake admitted for {email}"),
        });
        if let Some(id) = &application_id {
            self.activity.record(ActivityEntry {
                event: ActivityEvent::ApplicationCreated,
                subject: id.0.clone(),
                detail: format!(
                    "pending application on stall {}",
                    requested_stall
                        .as_ref()
                        .map(|stall| stall.0.as_str())
                        .unwrap_or_default()
                ),
            });
        }

        Ok(IntakeReceipt {
            applicant_id,
            application_id,
            notice,
        })
    }

    pub fn get_applicant(
        &self,
        id: &ApplicantId,
    ) -> Result<ApplicantDossier, AllocationServiceError> {
        self.store
            .dossier(id)?
            .ok_or(AllocationServiceError::NotFound {
                entity: "applicant",
            })
    }

    pub fn update_applicant(
        &self,
        id: &ApplicantId,
        update: ApplicantUpdate,
    ) -> Result<ApplicantDossier, AllocationServiceError> {
        if update.is_empty() {
            return Err(AllocationServiceError::Validation {
                field: "body",
                message: "no fields to update".to_string(),
            });
        }
        for (field, value) in [
            ("full_name", update.full_name.as_deref()),
            ("contact_number", update.contact_number.as_deref()),
            ("email", update.email.as_deref()),
        ] {
            if let Some(value) = value {
                if value.trim().is_empty() {
                    return Err(AllocationServiceError::Validation {
                        field,
                        message: "must not be empty".to_string(),
                    });
                }
            }
        }
        if let Some(email) = update.email.as_deref() {
            validate_email(email)?;
        }

        self.store
            .transaction(&mut |txn| -> Result<(), AllocationServiceError> {
                let mut applicant =
                    txn.applicant(id)
                        .ok_or(AllocationServiceError::NotFound {
                            entity: "applicant",
                        })?;
                if let Some(full_name) = &update.full_name {
                    applicant.full_name = full_name.trim().to_string();
                }
                if let Some(contact_number) = &update.contact_number {
                    applicant.contact_number = contact_number.trim().to_string();
                }
                if let Some(address) = &update.address {
                    applicant.address = address.trim().to_string();
                }
                txn.update_applicant(applicant)?;

                if update.email.is_some() || update.emergency_contact.is_some() {
                    let mut contact =
                        txn.contact_profile(id)
                            .ok_or(AllocationServiceError::NotFound {
                                entity: "applicant",
                            })?;
                    if let Some(email) = &update.email {
                        contact.email = email.trim().to_string();
                    }
                    if let Some(emergency) = &update.emergency_contact {
                        contact.emergency_contact = Some(emergency.clone());
                    }
                    txn.update_contact_profile(contact)?;
                }
                Ok(())
            })?;

        self.activity.record(ActivityEntry {
            event: ActivityEvent::ApplicantUpdated,
            subject: id.0.clone(),
            detail: "applicant record updated".to_string(),
        });
        self.get_applicant(id)
    }

    /// Remove an applicant and everything attached. A pending
    /// fixed-price application held by the applicant releases its stall.
    pub fn delete_applicant(&self, id: &ApplicantId) -> Result<(), AllocationServiceError> {
        self.store
            .transaction(&mut |txn| -> Result<(), AllocationServiceError> {
                if txn.applicant(id).is_none() {
                    return Err(AllocationServiceError::NotFound {
                        entity: "applicant",
                    });
                }
                for application in txn.applications_for(id) {
                    if application.status != ApplicationStatus::Pending {
                        continue;
                    }
                    if let Some(mut stall) = txn.stall(&application.stall_id) {
                        if stall.allocation == AllocationMode::FixedPrice && !stall.available {
                            stall.available = true;
                            txn.update_stall(stall)?;
                        }
                    }
                }
                txn.delete_applicant(id)?;
                Ok(())
            })?;

        self.activity.record(ActivityEntry {
            event: ActivityEvent::ApplicantDeleted,
            subject: id.0.clone(),
            detail: "applicant removed on request".to_string(),
        });
        Ok(())
    }

    /// Operator activation of a stall for competitive allocation.
    pub fn open_session(
        &self,
        stall_id: &StallId,
        kind: SessionKind,
        deadline: DateTime<Utc>,
    ) -> Result<SessionView, AllocationServiceError> {
        let now = Utc::now();
        if deadline <= now {
            return Err(AllocationServiceError::Validation {
                field: "deadline",
                message: "deadline must be in the future".to_string(),
            });
        }

        let session_id = next_session_id();
        let view = self.store.transaction(
            &mut |txn| -> Result<SessionView, AllocationServiceError> {
                let mut stall = txn
                    .stall(stall_id)
                    .ok_or(AllocationServiceError::NotFound { entity: "stall" })?;
                if stall.status != StallStatus::Active {
                    return Err(AllocationServiceError::StallUnavailable);
                }
                let expected = match kind {
                    SessionKind::Raffle => AllocationMode::Raffle,
                    SessionKind::Auction => AllocationMode::Auction,
                };
                if stall.allocation != expected {
                    return Err(AllocationServiceError::Validation {
                        field: "kind",
                        message: format!(
                            "stall {} is allocated by {}",
                            stall.id.0,
                            stall.allocation.label()
                        ),
                    });
                }
                if let Some(existing) = stall.session_id.as_ref().and_then(|id| txn.session(id)) {
                    if existing.status.is_open() {
                        return Err(AllocationServiceError::StallUnavailable);
                    }
                }

                let session =
                    SessionRecord::open(session_id.clone(), stall_id.clone(), kind, now, deadline);
                let view = SessionView::from_record(&session);
                txn.insert_session(session)?;
                stall.available = false;
                stall.session_id = Some(session_id.clone());
                txn.update_stall(stall)?;
                Ok(view)
            },
        )?;

        self.activity.record(ActivityEntry {
            event: ActivityEvent::SessionOpened,
            subject: view.session_id.0.clone(),
            detail: format!("{} session opened on stall {}", view.kind, stall_id.0),
        });
        Ok(view)
    }

    pub fn join_raffle(
        &self,
        session_id: &SessionId,
        applicant_id: &ApplicantId,
    ) -> Result<JoinOutcome, AllocationServiceError> {
        let now = Utc::now();
        self.store
            .transaction(&mut |txn| -> Result<JoinOutcome, AllocationServiceError> {
                if txn.applicant(applicant_id).is_none() {
                    return Err(AllocationServiceError::NotFound {
                        entity: "applicant",
                    });
                }
                let mut session =
                    txn.session(session_id)
                        .ok_or(AllocationServiceError::NotFound { entity: "session" })?;
                let outcome = session.register_participant(applicant_id.clone(), now)?;
                txn.update_session(session)?;
                Ok(outcome)
            })
    }

    pub fn place_bid(
        &self,
        session_id: &SessionId,
        applicant_id: &ApplicantId,
        amount: u32,
    ) -> Result<BidOutcome, AllocationServiceError> {
        if amount == 0 {
            return Err(AllocationServiceError::Validation {
                field: "amount",
                message: "bid amount must be positive".to_string(),
            });
        }
        let now = Utc::now();
        self.store
            .transaction(&mut |txn| -> Result<BidOutcome, AllocationServiceError> {
                if txn.applicant(applicant_id).is_none() {
                    return Err(AllocationServiceError::NotFound {
                        entity: "applicant",
                    });
                }
                let mut session =
                    txn.session(session_id)
                        .ok_or(AllocationServiceError::NotFound { entity: "session" })?;
                let outcome = session.place_bid(applicant_id.clone(), amount, now)?;
                txn.update_session(session)?;
                Ok(outcome)
            })
    }

    pub fn extend_session(
        &self,
        session_id: &SessionId,
        new_deadline: DateTime<Utc>,
    ) -> Result<SessionView, AllocationServiceError> {
        if new_deadline <= Utc::now() {
            return Err(AllocationServiceError::Validation {
                field: "deadline",
                message: "deadline must be in the future".to_string(),
            });
        }

        let view = self.store.transaction(
            &mut |txn| -> Result<SessionView, AllocationServiceError> {
                let mut session =
                    txn.session(session_id)
                        .ok_or(AllocationServiceError::NotFound { entity: "session" })?;
                session.extend(new_deadline)?;
                let view = SessionView::from_record(&session);
                txn.update_session(session)?;
                Ok(view)
            },
        )?;

        self.activity.record(ActivityEntry {
            event: ActivityEvent::SessionExtended,
            subject: session_id.0.clone(),
            detail: format!("deadline moved to {new_deadline}"),
        });
        Ok(view)
    }

    pub fn cancel_session(
        &self,
        session_id: &SessionId,
    ) -> Result<SessionView, AllocationServiceError> {
        let view = self.store.transaction(
            &mut |txn| -> Result<SessionView, AllocationServiceError> {
                let mut session =
                    txn.session(session_id)
                        .ok_or(AllocationServiceError::NotFound { entity: "session" })?;
                session.cancel()?;
                let view = SessionView::from_record(&session);
                release_stall(txn, &session)?;
                txn.update_session(session)?;
                Ok(view)
            },
        )?;

        self.activity.record(ActivityEntry {
            event: ActivityEvent::SessionCancelled,
            subject: session_id.0.clone(),
            detail: "session cancelled by operator".to_string(),
        });
        Ok(view)
    }

    /// Operator shortcut running the closing transition immediately,
    /// regardless of the deadline.
    pub fn force_close_session(
        &self,
        session_id: &SessionId,
    ) -> Result<SessionClosure, AllocationServiceError> {
        self.close_session(session_id, Utc::now())
    }

    /// Auto-winner sweep over every session past its deadline. Each
    /// session closes in its own transaction; one failure never aborts
    /// the rest.
    pub fn run_expiry_sweep(
        &self,
        now: DateTime<Utc>,
    ) -> Result<ExpirySweepReport, AllocationServiceError> {
        let due = self.store.due_sessions(now)?;
        let mut report = ExpirySweepReport::default();
        for session_id in due {
            match self.close_session(&session_id, now) {
                Ok(closure) if closure.winner.is_some() => report.closed_won += 1,
                Ok(_) => report.cancelled += 1,
                // Lost the race against a manual close or cancel.
                Err(AllocationServiceError::SessionClosed) => report.skipped += 1,
                Err(error) => {
                    tracing::error!(
                        session = %session_id.0,
                        error = %error,
                        "expiry sweep failed to close session"
                    );
                    report.failures += 1;
                }
            }
        }
        Ok(report)
    }

    /// Purge applicants whose paperwork was declined past the retention
    /// window. Pending and approved applications shield the applicant
    /// regardless of age.
    pub fn run_cleanup_sweep(
        &self,
        now: DateTime<Utc>,
    ) -> Result<CleanupSweepReport, AllocationServiceError> {
        let cutoff = now - chrono::Duration::days(self.retention_days);
        let purgeable = self.store.purgeable_applicants(cutoff)?;
        let mut report = CleanupSweepReport::default();
        for applicant_id in purgeable {
            let purged = self
                .store
                .transaction(&mut |txn| -> Result<bool, AllocationServiceError> {
                    Ok(txn.delete_applicant(&applicant_id)?)
                });
            match purged {
                Ok(true) => {
                    self.activity.record(ActivityEntry {
                        event: ActivityEvent::ApplicantPurged,
                        subject: applicant_id.0.clone(),
                        detail: "declined paperwork past retention".to_string(),
                    });
                    report.purged += 1;
                }
                Ok(false) => report.skipped += 1,
                Err(error) => {
                    tracing::error!(
                        applicant = %applicant_id.0,
                        error = %error,
                        "cleanup sweep failed to purge applicant"
                    );
                    report.failures += 1;
                }
            }
        }
        Ok(report)
    }

    fn close_session(
        &self,
        session_id: &SessionId,
        now: DateTime<Utc>,
    ) -> Result<SessionClosure, AllocationServiceError> {
        let closure = self.store.transaction(
            &mut |txn| -> Result<SessionClosure, AllocationServiceError> {
                let mut session =
                    txn.session(session_id)
                        .ok_or(AllocationServiceError::NotFound { entity: "session" })?;
                // finalize errors with SessionClosed when another actor
                // committed the terminal transition first.
                let outcome = session.finalize(&mut rand::thread_rng())?;

                let mut closure = SessionClosure {
                    session_id: session.id.clone(),
                    stall_id: session.stall_id.clone(),
                    outcome: "cancelled",
                    winner: None,
                    application_id: None,
                };

                match outcome {
                    ClosingOutcome::Winner(winner) => {
                        let application_id = next_application_id();
                        txn.insert_application(ApplicationRecord {
                            id: application_id.clone(),
                            applicant_id: winner.clone(),
                            stall_id: session.stall_id.clone(),
                            status: ApplicationStatus::Pending,
                            submitted_at: now,
                        })?;
                        if let Some(mut stall) = txn.stall(&session.stall_id) {
                            stall.session_id = None;
                            stall.available = false;
                            txn.update_stall(stall)?;
                        }
                        closure.outcome = "closed_won";
                        closure.winner = Some(winner);
                        closure.application_id = Some(application_id);
                    }
                    ClosingOutcome::NoEntries => {
                        release_stall(txn, &session)?;
                    }
                }

                txn.update_session(session)?;
                Ok(closure)
            },
        )?;

        match &closure.winner {
            Some(winner) => {
                if let Ok(Some(dossier)) = self.store.dossier(winner) {
                    if let Some(contact) = dossier.contact {
                        self.send_notice(
                            "winner_selected",
                            &contact.email,
                            closure
                                .application_id
                                .as_ref()
                                .map(|id| ("application_id", id.0.clone())),
                        );
                    }
                }
                self.activity.record(ActivityEntry {
                    event: ActivityEvent::SessionClosedWon,
                    subject: closure.session_id.0.clone(),
                    detail: format!("winner {}", winner.0),
                });
            }
            None => {
                self.activity.record(ActivityEntry {
                    event: ActivityEvent::SessionCancelled,
                    subject: closure.session_id.0.clone(),
                    detail: "closed without entries".to_string(),
                });
            }
        }

        Ok(closure)
    }

    fn send_notice(&self, template: &str, email: &str, extra: Option<(&str, String)>) {
        let mut details = BTreeMap::new();
        if let Some((key, value)) = extra {
            details.insert(key.to_string(), value);
        }
        let notice = OutcomeNotice {
            template: template.to_string(),
            email: email.to_string(),
            details,
        };
        if let Err(error) = self.notifier.notify(notice) {
            warn!(%email, template, error = %error, "notification dispatch failed");
        }
    }
}

fn release_stall(
    txn: &mut dyn AllocationTxn,
    session: &SessionRecord,
) -> Result<(), StoreError> {
    if let Some(mut stall) = txn.stall(&session.stall_id) {
        stall.session_id = None;
        stall.available = true;
        txn.update_stall(stall)?;
    }
    Ok(())
}

fn validate_submission(submission: &IntakeSubmission) -> Result<(), AllocationServiceError> {
    if submission.personal.full_name.trim().is_empty() {
        return Err(AllocationServiceError::Validation {
            field: "full_name",
            message: "must not be empty".to_string(),
        });
    }
    if submission.personal.contact_number.trim().is_empty() {
        return Err(AllocationServiceError::Validation {
            field: "contact_number",
            message: "must not be empty".to_string(),
        });
    }
    validate_email(&submission.other.email)
}

fn validate_email(email: &str) -> Result<(), AllocationServiceError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(AllocationServiceError::Validation {
            field: "email",
            message: "must not be empty".to_string(),
        });
    }
    if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
        return Err(AllocationServiceError::Validation {
            field: "email",
            message: "must be a valid e-mail address".to_string(),
        });
    }
    Ok(())
}
