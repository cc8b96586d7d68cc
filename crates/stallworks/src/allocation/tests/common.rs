use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

use crate::allocation::domain::{
    AllocationMode, ApplicantId, ApplicantRecord, ApplicationId, ApplicationRecord,
    ApplicationStatus, BusinessDetails, CivilStatus, ContactProfile, IntakeSubmission,
    OtherInformation, PersonalDetails, SpouseDetails, StallId, StallRecord, StallStatus,
};
use crate::allocation::eligibility::EligibilityConfig;
use crate::allocation::memory::MemoryAllocationStore;
use crate::allocation::repository::{
    ActivityEntry, ActivityLog, AllocationStore, AllocationTxn, NotificationGateway,
    NotifyError, OutcomeNotice, StoreError,
};
use crate::allocation::service::StallAllocationService;
use crate::allocation::sessions::{Bid, Participant, SessionId, SessionKind, SessionRecord};

static SEED_SEQUENCE: AtomicU64 = AtomicU64::new(1);

pub(super) fn seed_id(prefix: &str) -> String {
    let id = SEED_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{id:04}")
}

pub(super) fn submission(email: &str) -> IntakeSubmission {
    IntakeSubmission {
        personal: PersonalDetails {
            full_name: "Rosa Dimaano".to_string(),
            contact_number: "0917-555-0101".to_string(),
            civil_status: CivilStatus::Single,
            address: "Blk 4 Lot 9, San Roque".to_string(),
        },
        business: None,
        spouse: None,
        other: OtherInformation {
            email: email.to_string(),
            emergency_contact: None,
        },
        stall_id: None,
    }
}

pub(super) fn married_submission(email: &str) -> IntakeSubmission {
    let mut submission = submission(email);
    submission.personal.civil_status = CivilStatus::Married;
    submission.spouse = Some(SpouseDetails {
        full_name: "Elias Dimaano".to_string(),
        contact_number: Some("0917-555-0102".to_string()),
    });
    submission
}

pub(super) fn business_submission(email: &str) -> IntakeSubmission {
    let mut submission = submission(email);
    submission.business = Some(BusinessDetails {
        business_name: "Dimaano Dry Goods".to_string(),
        line_of_business: "textiles".to_string(),
        capitalization: Some(75_000),
    });
    submission
}

#[derive(Default)]
pub(super) struct RecordingNotifier {
    notices: Mutex<Vec<OutcomeNotice>>,
}

impl RecordingNotifier {
    pub(super) fn notices(&self) -> Vec<OutcomeNotice> {
        self.notices.lock().expect("notifier mutex poisoned").clone()
    }
}

impl NotificationGateway for RecordingNotifier {
    fn notify(&self, notice: OutcomeNotice) -> Result<(), NotifyError> {
        self.notices
            .lock()
            .expect("notifier mutex poisoned")
            .push(notice);
        Ok(())
    }
}

pub(super) struct FailingNotifier;

impl NotificationGateway for FailingNotifier {
    fn notify(&self, _notice: OutcomeNotice) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("smtp relay offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct RecordingActivity {
    entries: Mutex<Vec<ActivityEntry>>,
}

impl RecordingActivity {
    pub(super) fn entries(&self) -> Vec<ActivityEntry> {
        self.entries.lock().expect("activity mutex poisoned").clone()
    }
}

impl ActivityLog for RecordingActivity {
    fn record(&self, entry: ActivityEntry) {
        self.entries
            .lock()
            .expect("activity mutex poisoned")
            .push(entry);
    }
}

pub(super) type TestService =
    StallAllocationService<MemoryAllocationStore, RecordingNotifier, RecordingActivity>;

pub(super) fn build_service() -> (
    Arc<TestService>,
    Arc<MemoryAllocationStore>,
    Arc<RecordingNotifier>,
    Arc<RecordingActivity>,
) {
    let store = Arc::new(MemoryAllocationStore::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let activity = Arc::new(RecordingActivity::default());
    let service = Arc::new(StallAllocationService::new(
        store.clone(),
        notifier.clone(),
        activity.clone(),
        EligibilityConfig::default(),
        30,
    ));
    (service, store, notifier, activity)
}

pub(super) fn seed_stall(
    store: &MemoryAllocationStore,
    allocation: AllocationMode,
    available: bool,
) -> StallId {
    let id = StallId(seed_id("stall"));
    let record = StallRecord {
        id: id.clone(),
        branch: "poblacion".to_string(),
        allocation,
        status: StallStatus::Active,
        available,
        session_id: None,
    };
    store
        .transaction(&mut |txn| -> Result<(), StoreError> { txn.insert_stall(record.clone()) })
        .expect("stall seeded");
    id
}

/// Insert an applicant (and optionally an application in `status`) whose
/// paperwork is `age` old, bypassing the service so tests control the
/// clock exactly.
pub(super) fn seed_history(
    store: &MemoryAllocationStore,
    email: &str,
    status: Option<ApplicationStatus>,
    age: Duration,
) -> ApplicantId {
    let applicant_id = ApplicantId(seed_id("seed-apl"));
    let created_at = Utc::now() - age;
    let applicant = ApplicantRecord {
        id: applicant_id.clone(),
        full_name: "Seeded Applicant".to_string(),
        contact_number: "0917-555-0000".to_string(),
        civil_status: CivilStatus::Single,
        address: String::new(),
        created_at,
    };
    let contact = ContactProfile {
        applicant_id: applicant_id.clone(),
        email: email.to_string(),
        emergency_contact: None,
    };
    let application = status.map(|status| ApplicationRecord {
        id: ApplicationId(seed_id("seed-app")),
        applicant_id: applicant_id.clone(),
        stall_id: StallId(seed_id("seed-stall")),
        status,
        submitted_at: created_at,
    });
    store
        .transaction(&mut |txn| -> Result<(), StoreError> {
            txn.insert_applicant(applicant.clone())?;
            txn.insert_contact_profile(contact.clone())?;
            if let Some(application) = application.clone() {
                txn.insert_application(application)?;
            }
            Ok(())
        })
        .expect("history seeded");
    applicant_id
}

pub(super) fn seed_applicant(store: &MemoryAllocationStore, email: &str) -> ApplicantId {
    seed_history(store, email, None, Duration::zero())
}

/// Insert an open raffle session (and its stall) with the given
/// deadline and participants already joined.
pub(super) fn seed_raffle_session(
    store: &MemoryAllocationStore,
    deadline: DateTime<Utc>,
    participants: &[ApplicantId],
) -> (StallId, SessionId) {
    let stall_id = StallId(seed_id("stall"));
    let session_id = SessionId(seed_id("seed-ses"));
    let mut session = SessionRecord::open(
        session_id.clone(),
        stall_id.clone(),
        SessionKind::Raffle,
        deadline - Duration::hours(24),
        deadline,
    );
    session.participants = participants
        .iter()
        .map(|applicant_id| Participant {
            applicant_id: applicant_id.clone(),
            joined_at: deadline - Duration::hours(1),
        })
        .collect();
    seed_session(store, stall_id.clone(), session);
    (stall_id, session_id)
}

/// Insert an open auction session with pre-placed bids
/// `(applicant, amount, placed_at)`.
pub(super) fn seed_auction_session(
    store: &MemoryAllocationStore,
    deadline: DateTime<Utc>,
    bids: &[(ApplicantId, u32, DateTime<Utc>)],
) -> (StallId, SessionId) {
    let stall_id = StallId(seed_id("stall"));
    let session_id = SessionId(seed_id("seed-ses"));
    let mut session = SessionRecord::open(
        session_id.clone(),
        stall_id.clone(),
        SessionKind::Auction,
        deadline - Duration::hours(24),
        deadline,
    );
    session.bids = bids
        .iter()
        .map(|(applicant_id, amount, placed_at)| Bid {
            applicant_id: applicant_id.clone(),
            amount: *amount,
            placed_at: *placed_at,
        })
        .collect();
    seed_session(store, stall_id.clone(), session);
    (stall_id, session_id)
}

fn seed_session(store: &MemoryAllocationStore, stall_id: StallId, session: SessionRecord) {
    let allocation = match session.kind {
        SessionKind::Raffle => AllocationMode::Raffle,
        SessionKind::Auction => AllocationMode::Auction,
    };
    let stall = StallRecord {
        id: stall_id.clone(),
        branch: "poblacion".to_string(),
        allocation,
        status: StallStatus::Active,
        available: false,
        session_id: Some(session.id.clone()),
    };
    store
        .transaction(&mut |txn| -> Result<(), StoreError> {
            txn.insert_stall(stall.clone())?;
            txn.insert_session(session.clone())?;
            Ok(())
        })
        .expect("session seeded");
}

/// Store wrapper whose transactions fail on the contact-profile insert,
/// simulating a sub-insert fault mid-transaction.
pub(super) struct SabotagedStore {
    pub(super) inner: MemoryAllocationStore,
}

impl AllocationStore for SabotagedStore {
    fn transaction<T, E>(
        &self,
        op: &mut dyn FnMut(&mut dyn AllocationTxn) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        self.inner.transaction(&mut |txn| {
            let mut sabotaged = SabotagedTxn { inner: txn };
            op(&mut sabotaged)
        })
    }

    fn latest_identity(
        &self,
        email: &str,
    ) -> Result<Option<crate::allocation::domain::IdentityHistory>, StoreError> {
        self.inner.latest_identity(email)
    }

    fn dossier(
        &self,
        id: &ApplicantId,
    ) -> Result<Option<crate::allocation::domain::ApplicantDossier>, StoreError> {
        self.inner.dossier(id)
    }

    fn stall(&self, id: &StallId) -> Result<Option<StallRecord>, StoreError> {
        self.inner.stall(id)
    }

    fn session(&self, id: &SessionId) -> Result<Option<SessionRecord>, StoreError> {
        self.inner.session(id)
    }

    fn due_sessions(&self, now: DateTime<Utc>) -> Result<Vec<SessionId>, StoreError> {
        self.inner.due_sessions(now)
    }

    fn purgeable_applicants(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<ApplicantId>, StoreError> {
        self.inner.purgeable_applicants(cutoff)
    }
}

struct SabotagedTxn<'a> {
    inner: &'a mut (dyn AllocationTxn + 'a),
}

impl AllocationTxn for SabotagedTxn<'_> {
    fn insert_applicant(&mut self, record: ApplicantRecord) -> Result<(), StoreError> {
        self.inner.insert_applicant(record)
    }

    fn insert_business_profile(
        &mut self,
        record: crate::allocation::domain::BusinessProfile,
    ) -> Result<(), StoreError> {
        self.inner.insert_business_profile(record)
    }

    fn insert_spouse_record(
        &mut self,
        record: crate::allocation::domain::SpouseRecord,
    ) -> Result<(), StoreError> {
        self.inner.insert_spouse_record(record)
    }

    fn insert_contact_profile(&mut self, _record: ContactProfile) -> Result<(), StoreError> {
        Err(StoreError::Unavailable(
            "contact profile tablespace offline".to_string(),
        ))
    }

    fn insert_application(&mut self, record: ApplicationRecord) -> Result<(), StoreError> {
        self.inner.insert_application(record)
    }

    fn update_application(&mut self, record: ApplicationRecord) -> Result<(), StoreError> {
        self.inner.update_application(record)
    }

    fn applicant(&self, id: &ApplicantId) -> Option<ApplicantRecord> {
        self.inner.applicant(id)
    }

    fn update_applicant(&mut self, record: ApplicantRecord) -> Result<(), StoreError> {
        self.inner.update_applicant(record)
    }

    fn contact_profile(&self, id: &ApplicantId) -> Option<ContactProfile> {
        self.inner.contact_profile(id)
    }

    fn update_contact_profile(&mut self, record: ContactProfile) -> Result<(), StoreError> {
        self.inner.update_contact_profile(record)
    }

    fn applications_for(&self, id: &ApplicantId) -> Vec<ApplicationRecord> {
        self.inner.applications_for(id)
    }

    fn delete_applicant(&mut self, id: &ApplicantId) -> Result<bool, StoreError> {
        self.inner.delete_applicant(id)
    }

    fn stall(&self, id: &StallId) -> Option<StallRecord> {
        self.inner.stall(id)
    }

    fn insert_stall(&mut self, record: StallRecord) -> Result<(), StoreError> {
        self.inner.insert_stall(record)
    }

    fn update_stall(&mut self, record: StallRecord) -> Result<(), StoreError> {
        self.inner.update_stall(record)
    }

    fn session(&self, id: &SessionId) -> Option<SessionRecord> {
        self.inner.session(id)
    }

    fn insert_session(&mut self, record: SessionRecord) -> Result<(), StoreError> {
        self.inner.insert_session(record)
    }

    fn update_session(&mut self, record: SessionRecord) -> Result<(), StoreError> {
        self.inner.update_session(record)
    }
}
