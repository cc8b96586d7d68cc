use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    ApplicantDossier, ApplicantId, ApplicantRecord, ApplicationRecord, BusinessProfile,
    ContactProfile, IdentityHistory, SpouseRecord, StallId, StallRecord,
};
use super::sessions::{SessionId, SessionRecord};

/// Storage abstraction so the allocation service can be exercised in
/// isolation. Implementations must give at least read-committed
/// isolation with the touched stall and session rows held until commit;
/// the in-memory store serializes transactions outright.
pub trait AllocationStore: Send + Sync {
    /// Run `op` inside one atomic transaction: every write applies on
    /// `Ok`, none on `Err`. Availability checks and status
    /// compare-and-sets belong inside `op`, next to the writes that
    /// depend on them.
    fn transaction<T, E>(
        &self,
        op: &mut dyn FnMut(&mut dyn AllocationTxn) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<StoreError>;

    /// Latest applicant carrying `email` on its contact profile,
    /// together with that applicant's latest application. Newest
    /// creation time wins; the e-mail is not unique in storage.
    fn latest_identity(&self, email: &str) -> Result<Option<IdentityHistory>, StoreError>;

    fn dossier(&self, id: &ApplicantId) -> Result<Option<ApplicantDossier>, StoreError>;

    fn stall(&self, id: &StallId) -> Result<Option<StallRecord>, StoreError>;

    fn session(&self, id: &SessionId) -> Result<Option<SessionRecord>, StoreError>;

    /// Open/extended sessions whose deadline has passed, ordered by
    /// deadline.
    fn due_sessions(&self, now: DateTime<Utc>) -> Result<Vec<SessionId>, StoreError>;

    /// Applicants whose applications are all declined, the newest of
    /// them submitted at or before `cutoff`. Applicants with any
    /// pending or approved application never qualify.
    fn purgeable_applicants(&self, cutoff: DateTime<Utc>)
        -> Result<Vec<ApplicantId>, StoreError>;
}

/// Mutation surface available inside a transaction.
pub trait AllocationTxn {
    fn insert_applicant(&mut self, record: ApplicantRecord) -> Result<(), StoreError>;
    fn insert_business_profile(&mut self, record: BusinessProfile) -> Result<(), StoreError>;
    fn insert_spouse_record(&mut self, record: SpouseRecord) -> Result<(), StoreError>;
    fn insert_contact_profile(&mut self, record: ContactProfile) -> Result<(), StoreError>;
    fn insert_application(&mut self, record: ApplicationRecord) -> Result<(), StoreError>;
    fn update_application(&mut self, record: ApplicationRecord) -> Result<(), StoreError>;

    fn applicant(&self, id: &ApplicantId) -> Option<ApplicantRecord>;
    fn update_applicant(&mut self, record: ApplicantRecord) -> Result<(), StoreError>;
    fn contact_profile(&self, id: &ApplicantId) -> Option<ContactProfile>;
    fn update_contact_profile(&mut self, record: ContactProfile) -> Result<(), StoreError>;
    fn applications_for(&self, id: &ApplicantId) -> Vec<ApplicationRecord>;

    /// Remove the applicant and every cascading sub-record, including
    /// session participations and bids. Returns false when the
    /// applicant was already gone.
    fn delete_applicant(&mut self, id: &ApplicantId) -> Result<bool, StoreError>;

    fn stall(&self, id: &StallId) -> Option<StallRecord>;
    fn insert_stall(&mut self, record: StallRecord) -> Result<(), StoreError>;
    fn update_stall(&mut self, record: StallRecord) -> Result<(), StoreError>;

    fn session(&self, id: &SessionId) -> Option<SessionRecord>;
    fn insert_session(&mut self, record: SessionRecord) -> Result<(), StoreError>;
    fn update_session(&mut self, record: SessionRecord) -> Result<(), StoreError>;
}

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Outbound notification hook (e-mail/SMS adapters live outside this
/// crate). Invoked strictly after commit; failures are logged and
/// swallowed, never propagated into the transaction result.
pub trait NotificationGateway: Send + Sync {
    fn notify(&self, notice: OutcomeNotice) -> Result<(), NotifyError>;
}

/// Notice payload so routes/tests can assert integration boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeNotice {
    pub template: String,
    pub email: String,
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Fire-and-forget audit trail of allocation state transitions.
pub trait ActivityLog: Send + Sync {
    fn record(&self, entry: ActivityEntry);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityEntry {
    pub event: ActivityEvent,
    pub subject: String,
    pub detail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityEvent {
    IntakeSubmitted,
    ApplicationCreated,
    ApplicantUpdated,
    ApplicantDeleted,
    SessionOpened,
    SessionExtended,
    SessionCancelled,
    SessionClosedWon,
    ApplicantPurged,
}
