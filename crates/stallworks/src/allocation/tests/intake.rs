use std::sync::Arc;

use chrono::Duration;

use super::common::*;
use crate::allocation::domain::{AllocationMode, ApplicationStatus, StallId};
use crate::allocation::eligibility::EligibilityConfig;
use crate::allocation::memory::MemoryAllocationStore;
use crate::allocation::repository::{ActivityEvent, AllocationStore};
use crate::allocation::service::{AllocationServiceError, StallAllocationService};

#[test]
fn intake_persists_applicant_with_contact_profile() {
    let (service, _, notifier, activity) = build_service();

    let receipt = service
        .submit_intake(submission("rosa@sample.ph"))
        .expect("intake admitted");
    assert!(receipt.application_id.is_none());
    assert!(receipt.notice.is_none());

    let dossier = service
        .get_applicant(&receipt.applicant_id)
        .expect("dossier readable");
    assert_eq!(dossier.applicant.full_name, "Rosa Dimaano");
    let contact = dossier.contact.expect("contact profile present");
    assert_eq!(contact.email, "rosa@sample.ph");
    assert!(dossier.applications.is_empty());

    let notices = notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].template, "application_received");
    assert!(activity
        .entries()
        .iter()
        .any(|entry| entry.event == ActivityEvent::IntakeSubmitted));
}

#[test]
fn spouse_record_kept_only_for_married_applicants() {
    let (service, _, _, _) = build_service();

    let married = service
        .submit_intake(married_submission("married@sample.ph"))
        .expect("intake admitted");
    let dossier = service.get_applicant(&married.applicant_id).expect("dossier");
    assert!(dossier.spouse.is_some());

    // The same spouse payload on a single applicant is dropped.
    let mut single = married_submission("single@sample.ph");
    single.personal.civil_status = crate::allocation::domain::CivilStatus::Single;
    let receipt = service.submit_intake(single).expect("intake admitted");
    let dossier = service.get_applicant(&receipt.applicant_id).expect("dossier");
    assert!(dossier.spouse.is_none());
}

#[test]
fn business_profile_persisted_when_present() {
    let (service, _, _, _) = build_service();
    let receipt = service
        .submit_intake(business_submission("vendor@sample.ph"))
        .expect("intake admitted");
    let dossier = service.get_applicant(&receipt.applicant_id).expect("dossier");
    let business = dossier.business.expect("business profile present");
    assert_eq!(business.line_of_business, "textiles");
}

#[test]
fn rejects_missing_required_fields() {
    let (service, _, _, _) = build_service();

    let mut nameless = submission("a@sample.ph");
    nameless.personal.full_name = "  ".to_string();
    match service.submit_intake(nameless) {
        Err(AllocationServiceError::Validation { field, .. }) => assert_eq!(field, "full_name"),
        other => panic!("expected validation error, got {other:?}"),
    }

    let mut unreachable = submission("a@sample.ph");
    unreachable.personal.contact_number = String::new();
    assert!(matches!(
        service.submit_intake(unreachable),
        Err(AllocationServiceError::Validation {
            field: "contact_number",
            ..
        })
    ));

    let mut bad_email = submission("not-an-address");
    bad_email.other.email = "not-an-address".to_string();
    assert!(matches!(
        service.submit_intake(bad_email),
        Err(AllocationServiceError::Validation { field: "email", .. })
    ));
}

#[test]
fn intake_with_stall_reserves_it_in_the_same_transaction() {
    let (service, store, _, activity) = build_service();
    let stall_id = seed_stall(&store, AllocationMode::FixedPrice, true);

    let mut submission = submission("reserver@sample.ph");
    submission.stall_id = Some(stall_id.clone());
    let receipt = service.submit_intake(submission).expect("intake admitted");

    let application_id = receipt.application_id.expect("application created");
    let dossier = service.get_applicant(&receipt.applicant_id).expect("dossier");
    assert_eq!(dossier.applications.len(), 1);
    assert_eq!(dossier.applications[0].id, application_id);
    assert_eq!(dossier.applications[0].status, ApplicationStatus::Pending);

    let stall = store.stall(&stall_id).expect("store read").expect("stall");
    assert!(!stall.available);
    assert!(activity
        .entries()
        .iter()
        .any(|entry| entry.event == ActivityEvent::ApplicationCreated));
}

#[test]
fn reserved_stall_rejects_the_next_applicant() {
    let (service, store, _, _) = build_service();
    let stall_id = seed_stall(&store, AllocationMode::FixedPrice, true);

    let mut first = submission("first@sample.ph");
    first.stall_id = Some(stall_id.clone());
    service.submit_intake(first).expect("first intake admitted");

    let mut second = submission("second@sample.ph");
    second.stall_id = Some(stall_id);
    assert!(matches!(
        service.submit_intake(second),
        Err(AllocationServiceError::StallUnavailable)
    ));
    // The losing submission leaves nothing behind.
    assert!(store
        .latest_identity("second@sample.ph")
        .expect("store read")
        .is_none());
}

#[test]
fn unknown_stall_rolls_back_the_applicant() {
    let (service, store, _, _) = build_service();

    let mut submission = submission("ghost@sample.ph");
    submission.stall_id = Some(StallId("stall-9999".to_string()));
    assert!(matches!(
        service.submit_intake(submission),
        Err(AllocationServiceError::NotFound { entity: "stall" })
    ));
    assert!(store
        .latest_identity("ghost@sample.ph")
        .expect("store read")
        .is_none());
}

#[test]
fn competitive_stalls_reject_fixed_price_applications() {
    let (service, store, _, _) = build_service();
    let stall_id = seed_stall(&store, AllocationMode::Raffle, true);

    let mut submission = submission("raffler@sample.ph");
    submission.stall_id = Some(stall_id);
    assert!(matches!(
        service.submit_intake(submission),
        Err(AllocationServiceError::StallUnavailable)
    ));
}

#[test]
fn eligibility_denial_carries_the_reason() {
    let (service, store, _, _) = build_service();
    seed_history(
        &store,
        "pending@sample.ph",
        Some(ApplicationStatus::Pending),
        Duration::days(1),
    );

    match service.submit_intake(submission("pending@sample.ph")) {
        Err(AllocationServiceError::EligibilityDenied { reason }) => {
            assert!(reason.contains("under review"));
        }
        other => panic!("expected eligibility denial, got {other:?}"),
    }
}

#[test]
fn stale_pending_history_resubmits_with_notice() {
    let (service, store, _, _) = build_service();
    seed_history(
        &store,
        "stale@sample.ph",
        Some(ApplicationStatus::Pending),
        Duration::days(8),
    );

    let receipt = service
        .submit_intake(submission("stale@sample.ph"))
        .expect("resubmission admitted");
    assert!(receipt.notice.is_some());
}

#[test]
fn combined_entry_point_requires_a_stall() {
    let (service, _, _, _) = build_service();
    assert!(matches!(
        service.submit_stall_application(submission("direct@sample.ph")),
        Err(AllocationServiceError::Validation {
            field: "stall_id",
            ..
        })
    ));
}

#[test]
fn combined_entry_point_uses_the_one_day_threshold() {
    let (service, store, _, _) = build_service();
    seed_history(
        &store,
        "redo@sample.ph",
        Some(ApplicationStatus::Pending),
        Duration::days(2),
    );
    let stall_id = seed_stall(&store, AllocationMode::FixedPrice, true);

    // Two-day-old pending paperwork blocks general intake but passes
    // the combined endpoint.
    assert!(matches!(
        service.submit_intake(submission("redo@sample.ph")),
        Err(AllocationServiceError::EligibilityDenied { .. })
    ));

    let mut direct = submission("redo@sample.ph");
    direct.stall_id = Some(stall_id);
    let receipt = service
        .submit_stall_application(direct)
        .expect("combined submission admitted");
    assert!(receipt.application_id.is_some());
    assert!(receipt.notice.is_some());
}

#[test]
fn sub_insert_failure_rolls_back_the_whole_intake() {
    let store = Arc::new(SabotagedStore {
        inner: MemoryAllocationStore::new(),
    });
    let service = StallAllocationService::new(
        store.clone(),
        Arc::new(RecordingNotifier::default()),
        Arc::new(RecordingActivity::default()),
        EligibilityConfig::default(),
        30,
    );

    assert!(matches!(
        service.submit_intake(submission("atomic@sample.ph")),
        Err(AllocationServiceError::Store(_))
    ));
    assert!(store
        .latest_identity("atomic@sample.ph")
        .expect("store read")
        .is_none());
}

#[test]
fn notification_failure_never_fails_the_intake() {
    let store = Arc::new(MemoryAllocationStore::new());
    let service = StallAllocationService::new(
        store,
        Arc::new(FailingNotifier),
        Arc::new(RecordingActivity::default()),
        EligibilityConfig::default(),
        30,
    );

    let receipt = service
        .submit_intake(submission("quiet@sample.ph"))
        .expect("intake admitted despite notification failure");
    assert!(receipt.application_id.is_none());
}

#[test]
fn update_applicant_edits_contact_fields() {
    let (service, _, _, _) = build_service();
    let receipt = service
        .submit_intake(submission("editable@sample.ph"))
        .expect("intake admitted");

    let update = crate::allocation::domain::ApplicantUpdate {
        contact_number: Some("0917-555-0999".to_string()),
        email: Some("edited@sample.ph".to_string()),
        ..Default::default()
    };
    let dossier = service
        .update_applicant(&receipt.applicant_id, update)
        .expect("update applied");
    assert_eq!(dossier.applicant.contact_number, "0917-555-0999");
    assert_eq!(
        dossier.contact.expect("contact profile").email,
        "edited@sample.ph"
    );
}

#[test]
fn delete_applicant_releases_a_pending_fixed_price_stall() {
    let (service, store, _, _) = build_service();
    let stall_id = seed_stall(&store, AllocationMode::FixedPrice, true);

    let mut submission = submission("leaver@sample.ph");
    submission.stall_id = Some(stall_id.clone());
    let receipt = service.submit_intake(submission).expect("intake admitted");

    service
        .delete_applicant(&receipt.applicant_id)
        .expect("applicant deleted");
    assert!(matches!(
        service.get_applicant(&receipt.applicant_id),
        Err(AllocationServiceError::NotFound { .. })
    ));
    let stall = store.stall(&stall_id).expect("store read").expect("stall");
    assert!(stall.available);
}
