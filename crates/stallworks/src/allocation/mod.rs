//! Stall allocation: applicant intake, resubmission eligibility,
//! raffle/auction sessions, and the expiry/cleanup sweeps.

pub mod domain;
pub mod eligibility;
pub mod memory;
pub mod repository;
pub mod router;
pub mod service;
pub mod sessions;
pub mod sweep;

#[cfg(test)]
mod tests;

pub use domain::{
    AllocationMode, ApplicantDossier, ApplicantId, ApplicantRecord, ApplicantUpdate,
    ApplicationId, ApplicationRecord, ApplicationStatus, BusinessDetails, BusinessProfile,
    CivilStatus, ContactProfile, IdentityHistory, IntakeSubmission, OtherInformation,
    PersonalDetails, SpouseDetails, SpouseRecord, StallId, StallRecord, StallStatus,
};
pub use eligibility::{EligibilityConfig, EligibilityPolicy, EligibilityRuling};
pub use memory::MemoryAllocationStore;
pub use repository::{
    ActivityEntry, ActivityEvent, ActivityLog, AllocationStore, AllocationTxn,
    NotificationGateway, NotifyError, OutcomeNotice, StoreError,
};
pub use router::allocation_router;
pub use service::{
    AllocationServiceError, CleanupSweepReport, ExpirySweepReport, IntakeReceipt,
    SessionClosure, SessionView, StallAllocationService,
};
pub use sessions::{
    Bid, BidOutcome, ClosingOutcome, JoinOutcome, Participant, SessionError, SessionId,
    SessionKind, SessionRecord, SessionStatus,
};
pub use sweep::spawn_sweeps;
