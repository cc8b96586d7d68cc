use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::sessions::SessionId;

/// Identifier wrapper for admitted applicants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApplicantId(pub String);

/// Identifier wrapper for stall applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Identifier for an allocatable stall; stalls themselves are owned by
/// the catalog, this engine only tracks their reservation state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StallId(pub String);

/// Civil status captured at intake. Married applicants may attach a
/// spouse record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CivilStatus {
    Single,
    Married,
    Widowed,
    Separated,
}

/// Inbound intake payload: the applicant's paperwork plus the optional
/// stall the applicant wants to reserve in the same step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeSubmission {
    pub personal: PersonalDetails,
    #[serde(default)]
    pub business: Option<BusinessDetails>,
    #[serde(default)]
    pub spouse: Option<SpouseDetails>,
    pub other: OtherInformation,
    #[serde(default)]
    pub stall_id: Option<StallId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalDetails {
    pub full_name: String,
    pub contact_number: String,
    pub civil_status: CivilStatus,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessDetails {
    pub business_name: String,
    pub line_of_business: String,
    #[serde(default)]
    pub capitalization: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpouseDetails {
    pub full_name: String,
    #[serde(default)]
    pub contact_number: Option<String>,
}

/// The "other information" sheet; carries the e-mail used as the
/// eligibility identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtherInformation {
    pub email: String,
    #[serde(default)]
    pub emergency_contact: Option<String>,
}

/// Stored applicant row. Sub-records live beside it, keyed by the
/// applicant id, so intake can insert them independently inside one
/// transaction and cleanup can cascade over them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantRecord {
    pub id: ApplicantId,
    pub full_name: String,
    pub contact_number: String,
    pub civil_status: CivilStatus,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub applicant_id: ApplicantId,
    pub business_name: String,
    pub line_of_business: String,
    pub capitalization: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpouseRecord {
    pub applicant_id: ApplicantId,
    pub full_name: String,
    pub contact_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactProfile {
    pub applicant_id: ApplicantId,
    pub email: String,
    pub emergency_contact: Option<String>,
}

/// Lifecycle of a stall application. Transitions out of Pending happen
/// in the approval workflow, outside this engine; eligibility and
/// cleanup only read them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Declined,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Declined => "declined",
        }
    }
}

/// Binds one applicant to one stall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    pub applicant_id: ApplicantId,
    pub stall_id: StallId,
    pub status: ApplicationStatus,
    pub submitted_at: DateTime<Utc>,
}

impl ApplicationRecord {
    /// Whole days elapsed since submission; partial days round down.
    pub fn age_in_days(&self, now: DateTime<Utc>) -> i64 {
        (now - self.submitted_at).num_days()
    }
}

/// How a stall is handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationMode {
    FixedPrice,
    Raffle,
    Auction,
}

impl AllocationMode {
    pub const fn label(self) -> &'static str {
        match self {
            AllocationMode::FixedPrice => "fixed_price",
            AllocationMode::Raffle => "raffle",
            AllocationMode::Auction => "auction",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StallStatus {
    Active,
    Inactive,
}

/// The slice of a stall this engine owns: its reservation state and the
/// competitive session attached to it. Pricing, floor, and section data
/// live with the stall catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StallRecord {
    pub id: StallId,
    pub branch: String,
    pub allocation: AllocationMode,
    pub status: StallStatus,
    pub available: bool,
    pub session_id: Option<SessionId>,
}

impl StallRecord {
    /// True when a fixed-price application may reserve this stall.
    pub fn open_for_application(&self) -> bool {
        self.status == StallStatus::Active
            && self.available
            && self.allocation == AllocationMode::FixedPrice
    }
}

/// Latest applicant + application pair for one identity e-mail. The
/// e-mail is not unique in storage; the newest applicant row wins.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdentityHistory {
    pub applicant: ApplicantRecord,
    pub application: Option<ApplicationRecord>,
}

/// Assembled read view of an applicant and everything attached to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicantDossier {
    pub applicant: ApplicantRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business: Option<BusinessProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spouse: Option<SpouseRecord>,
    pub contact: Option<ContactProfile>,
    pub applications: Vec<ApplicationRecord>,
}

/// Field-level updates applied to an existing applicant. Absent fields
/// are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicantUpdate {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub emergency_contact: Option<String>,
}

impl ApplicantUpdate {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.contact_number.is_none()
            && self.address.is_none()
            && self.email.is_none()
            && self.emergency_contact.is_none()
    }
}
