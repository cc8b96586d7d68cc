use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use super::domain::{
    ApplicantDossier, ApplicantId, ApplicantRecord, ApplicationId, ApplicationRecord,
    ApplicationStatus, BusinessProfile, ContactProfile, IdentityHistory, SpouseRecord, StallId,
    StallRecord,
};
use super::repository::{AllocationStore, AllocationTxn, StoreError};
use super::sessions::{SessionId, SessionRecord};

#[derive(Debug, Default, Clone)]
struct StoreState {
    applicants: HashMap<ApplicantId, ApplicantRecord>,
    business_profiles: HashMap<ApplicantId, BusinessProfile>,
    spouse_records: HashMap<ApplicantId, SpouseRecord>,
    contact_profiles: HashMap<ApplicantId, ContactProfile>,
    applications: HashMap<ApplicationId, ApplicationRecord>,
    stalls: HashMap<StallId, StallRecord>,
    sessions: HashMap<SessionId, SessionRecord>,
}

/// In-memory store backing tests, demos, and single-node deployments.
/// Transactions mutate a snapshot of the state and swap it in on
/// commit, all under one lock, so they are fully serialized and satisfy
/// the isolation the `AllocationStore` contract requires.
#[derive(Default)]
pub struct MemoryAllocationStore {
    state: Mutex<StoreState>,
}

impl MemoryAllocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&StoreState) -> T) -> Result<T, StoreError> {
        let guard = self
            .state
            .lock()
            .map_err(|_| StoreError::Unavailable("state mutex poisoned".to_string()))?;
        Ok(f(&guard))
    }
}

impl AllocationStore for MemoryAllocationStore {
    fn transaction<T, E>(
        &self,
        op: &mut dyn FnMut(&mut dyn AllocationTxn) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let mut guard = self
            .state
            .lock()
            .map_err(|_| E::from(StoreError::Unavailable("state mutex poisoned".to_string())))?;

        let mut working = guard.clone();
        let value = op(&mut MemoryTxn {
            state: &mut working,
        })?;

        *guard = working;
        Ok(value)
    }

    fn latest_identity(&self, email: &str) -> Result<Option<IdentityHistory>, StoreError> {
        self.read(|state| latest_identity(state, email))
    }

    fn dossier(&self, id: &ApplicantId) -> Result<Option<ApplicantDossier>, StoreError> {
        self.read(|state| dossier(state, id))
    }

    fn stall(&self, id: &StallId) -> Result<Option<StallRecord>, StoreError> {
        self.read(|state| state.stalls.get(id).cloned())
    }

    fn session(&self, id: &SessionId) -> Result<Option<SessionRecord>, StoreError> {
        self.read(|state| state.sessions.get(id).cloned())
    }

    fn due_sessions(&self, now: DateTime<Utc>) -> Result<Vec<SessionId>, StoreError> {
        self.read(|state| {
            let mut due: Vec<&SessionRecord> = state
                .sessions
                .values()
                .filter(|session| session.status.is_open() && session.deadline <= now)
                .collect();
            due.sort_by(|a, b| a.deadline.cmp(&b.deadline).then_with(|| a.id.cmp(&b.id)));
            due.into_iter().map(|session| session.id.clone()).collect()
        })
    }

    fn purgeable_applicants(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<ApplicantId>, StoreError> {
        self.read(|state| {
            let mut ids: Vec<ApplicantId> = state
                .applicants
                .keys()
                .filter(|id| {
                    let applications = applications_for(state, id);
                    !applications.is_empty()
                        && applications
                            .iter()
                            .all(|application| application.status == ApplicationStatus::Declined)
                        && applications
                            .iter()
                            .map(|application| application.submitted_at)
                            .max()
                            .is_some_and(|newest| newest <= cutoff)
                })
                .cloned()
                .collect();
            ids.sort();
            ids
        })
    }
}

struct MemoryTxn<'a> {
    state: &'a mut StoreState,
}

impl AllocationTxn for MemoryTxn<'_> {
    fn insert_applicant(&mut self, record: ApplicantRecord) -> Result<(), StoreError> {
        if self.state.applicants.contains_key(&record.id) {
            return Err(StoreError::Conflict);
        }
        self.state.applicants.insert(record.id.clone(), record);
        Ok(())
    }

    fn insert_business_profile(&mut self, record: BusinessProfile) -> Result<(), StoreError> {
        if self
            .state
            .business_profiles
            .contains_key(&record.applicant_id)
        {
            return Err(StoreError::Conflict);
        }
        self.state
            .business_profiles
            .insert(record.applicant_id.clone(), record);
        Ok(())
    }

    fn insert_spouse_record(&mut self, record: SpouseRecord) -> Result<(), StoreError> {
        if self.state.spouse_records.contains_key(&record.applicant_id) {
            return Err(StoreError::Conflict);
        }
        self.state
            .spouse_records
            .insert(record.applicant_id.clone(), record);
        Ok(())
    }

    fn insert_contact_profile(&mut self, record: ContactProfile) -> Result<(), StoreError> {
        if self
            .state
            .contact_profiles
            .contains_key(&record.applicant_id)
        {
            return Err(StoreError::Conflict);
        }
        self.state
            .contact_profiles
            .insert(record.applicant_id.clone(), record);
        Ok(())
    }

    fn insert_application(&mut self, record: ApplicationRecord) -> Result<(), StoreError> {
        if self.state.applications.contains_key(&record.id) {
            return Err(StoreError::Conflict);
        }
        self.state.applications.insert(record.id.clone(), record);
        Ok(())
    }

    fn update_application(&mut self, record: ApplicationRecord) -> Result<(), StoreError> {
        if !self.state.applications.contains_key(&record.id) {
            return Err(StoreError::NotFound);
        }
        self.state.applications.insert(record.id.clone(), record);
        Ok(())
    }

    fn applicant(&self, id: &ApplicantId) -> Option<ApplicantRecord> {
        self.state.applicants.get(id).cloned()
    }

    fn update_applicant(&mut self, record: ApplicantRecord) -> Result<(), StoreError> {
        if !self.state.applicants.contains_key(&record.id) {
            return Err(StoreError::NotFound);
        }
        self.state.applicants.insert(record.id.clone(), record);
        Ok(())
    }

    fn contact_profile(&self, id: &ApplicantId) -> Option<ContactProfile> {
        self.state.contact_profiles.get(id).cloned()
    }

    fn update_contact_profile(&mut self, record: ContactProfile) -> Result<(), StoreError> {
        if !self
            .state
            .contact_profiles
            .contains_key(&record.applicant_id)
        {
            return Err(StoreError::NotFound);
        }
        self.state
            .contact_profiles
            .insert(record.applicant_id.clone(), record);
        Ok(())
    }

    fn applications_for(&self, id: &ApplicantId) -> Vec<ApplicationRecord> {
        applications_for(self.state, id)
    }

    fn delete_applicant(&mut self, id: &ApplicantId) -> Result<bool, StoreError> {
        if self.state.applicants.remove(id).is_none() {
            return Ok(false);
        }

        self.state.business_profiles.remove(id);
        self.state.spouse_records.remove(id);
        self.state.contact_profiles.remove(id);
        self.state
            .applications
            .retain(|_, application| &application.applicant_id != id);
        for session in self.state.sessions.values_mut() {
            session
                .participants
                .retain(|participant| &participant.applicant_id != id);
            session.bids.retain(|bid| &bid.applicant_id != id);
        }
        Ok(true)
    }

    fn stall(&self, id: &StallId) -> Option<StallRecord> {
        self.state.stalls.get(id).cloned()
    }

    fn insert_stall(&mut self, record: StallRecord) -> Result<(), StoreError> {
        if self.state.stalls.contains_key(&record.id) {
            return Err(StoreError::Conflict);
        }
        self.state.stalls.insert(record.id.clone(), record);
        Ok(())
    }

    fn update_stall(&mut self, record: StallRecord) -> Result<(), StoreError> {
        if !self.state.stalls.contains_key(&record.id) {
            return Err(StoreError::NotFound);
        }
        self.state.stalls.insert(record.id.clone(), record);
        Ok(())
    }

    fn session(&self, id: &SessionId) -> Option<SessionRecord> {
        self.state.sessions.get(id).cloned()
    }

    fn insert_session(&mut self, record: SessionRecord) -> Result<(), StoreError> {
        if self.state.sessions.contains_key(&record.id) {
            return Err(StoreError::Conflict);
        }
        self.state.sessions.insert(record.id.clone(), record);
        Ok(())
    }

    fn update_session(&mut self, record: SessionRecord) -> Result<(), StoreError> {
        if !self.state.sessions.contains_key(&record.id) {
            return Err(StoreError::NotFound);
        }
        self.state.sessions.insert(record.id.clone(), record);
        Ok(())
    }
}

fn applications_for(state: &StoreState, id: &ApplicantId) -> Vec<ApplicationRecord> {
    let mut applications: Vec<ApplicationRecord> = state
        .applications
        .values()
        .filter(|application| &application.applicant_id == id)
        .cloned()
        .collect();
    applications.sort_by(|a, b| {
        a.submitted_at
            .cmp(&b.submitted_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    applications
}

fn latest_identity(state: &StoreState, email: &str) -> Option<IdentityHistory> {
    let needle = email.trim();
    let applicant = state
        .contact_profiles
        .values()
        .filter(|profile| profile.email.eq_ignore_ascii_case(needle))
        .filter_map(|profile| state.applicants.get(&profile.applicant_id))
        .max_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        })?
        .clone();

    let application = applications_for(state, &applicant.id).into_iter().last();
    Some(IdentityHistory {
        applicant,
        application,
    })
}

fn dossier(state: &StoreState, id: &ApplicantId) -> Option<ApplicantDossier> {
    let applicant = state.applicants.get(id)?.clone();
    Some(ApplicantDossier {
        applicant,
        business: state.business_profiles.get(id).cloned(),
        spouse: state.spouse_records.get(id).cloned(),
        contact: state.contact_profiles.get(id).cloned(),
        applications: applications_for(state, id),
    })
}
