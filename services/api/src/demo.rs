use crate::infra::{InMemoryNotificationGateway, TracingActivityLog};
use chrono::{Duration, Utc};
use clap::Args;
use std::sync::Arc;
use stallworks::allocation::{
    AllocationMode, AllocationServiceError, AllocationStore, ApplicantId, ApplicantRecord,
    ApplicationId, ApplicationRecord, ApplicationStatus, CivilStatus, ContactProfile,
    EligibilityConfig, IntakeSubmission, MemoryAllocationStore, OtherInformation,
    PersonalDetails, SessionKind, StallAllocationService, StallId, StallRecord, StallStatus,
};
use stallworks::error::AppError;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Number of raffle participants to enrol
    #[arg(long, default_value_t = 3)]
    pub(crate) participants: u8,
    /// Skip the auction portion of the demo
    #[arg(long)]
    pub(crate) skip_auction: bool,
}

type DemoService =
    StallAllocationService<MemoryAllocationStore, InMemoryNotificationGateway, TracingActivityLog>;

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let store = Arc::new(MemoryAllocationStore::new());
    let notifier = Arc::new(InMemoryNotificationGateway::default());
    let service: Arc<DemoService> = Arc::new(StallAllocationService::new(
        store.clone(),
        notifier.clone(),
        Arc::new(TracingActivityLog),
        EligibilityConfig::default(),
        30,
    ));

    println!("Stallworks allocation demo");

    println!("\n== Fixed-price intake ==");
    let fixed_stall = seed_stall(&store, "stall-101", AllocationMode::FixedPrice)?;
    let mut submission = demo_submission("rosa@demo.ph", "Rosa Dimaano");
    submission.stall_id = Some(fixed_stall.clone());
    let receipt = service.submit_intake(submission)?;
    println!(
        "admitted {} with pending application {} on {}",
        receipt.applicant_id.0,
        receipt
            .application_id
            .as_ref()
            .map(|id| id.0.as_str())
            .unwrap_or("-"),
        fixed_stall.0
    );

    let mut duplicate = demo_submission("rosa@demo.ph", "Rosa Dimaano");
    duplicate.stall_id = Some(fixed_stall);
    match service.submit_intake(duplicate) {
        Err(AllocationServiceError::EligibilityDenied { reason }) => {
            println!("resubmission blocked: {reason}");
        }
        Err(AllocationServiceError::StallUnavailable) => {
            println!("resubmission blocked: stall already reserved");
        }
        other => println!("unexpected resubmission outcome: {other:?}"),
    }

    println!("\n== Raffle ==");
    let raffle_stall = seed_stall(&store, "stall-202", AllocationMode::Raffle)?;
    let session = service.open_session(
        &raffle_stall,
        SessionKind::Raffle,
        Utc::now() + Duration::hours(2),
    )?;
    let participants = args.participants.max(1);
    for index in 0..participants {
        let entrant = service.submit_intake(demo_submission(
            &format!("entrant-{index}@demo.ph"),
            &format!("Entrant {index}"),
        ))?;
        service.join_raffle(&session.session_id, &entrant.applicant_id)?;
    }
    let closure = service.force_close_session(&session.session_id)?;
    println!(
        "raffle on {} drew {} entrants, winner {} (application {})",
        closure.stall_id.0,
        participants,
        closure.winner.as_ref().map(|id| id.0.as_str()).unwrap_or("-"),
        closure
            .application_id
            .as_ref()
            .map(|id| id.0.as_str())
            .unwrap_or("-"),
    );

    if !args.skip_auction {
        println!("\n== Auction ==");
        let auction_stall = seed_stall(&store, "stall-303", AllocationMode::Auction)?;
        let session = service.open_session(
            &auction_stall,
            SessionKind::Auction,
            Utc::now() + Duration::hours(2),
        )?;
        let amounts: [(&str, u32); 3] = [("ana", 1_000), ("ben", 1_500), ("cris", 1_500)];
        for (name, amount) in amounts {
            let bidder = service.submit_intake(demo_submission(
                &format!("{name}@demo.ph"),
                &format!("Bidder {name}"),
            ))?;
            service.place_bid(&session.session_id, &bidder.applicant_id, amount)?;
        }
        let closure = service.force_close_session(&session.session_id)?;
        println!(
            "auction on {} closed, winner {} (the earlier of the equal high bids)",
            closure.stall_id.0,
            closure.winner.as_ref().map(|id| id.0.as_str()).unwrap_or("-"),
        );
    }

    println!("\n== Cleanup ==");
    seed_declined_history(&store, "stale@demo.ph", Duration::days(40))?;
    let report = service.run_cleanup_sweep(Utc::now())?;
    println!(
        "cleanup sweep purged {} applicant(s) with declined paperwork past retention",
        report.purged
    );

    println!(
        "\n{} notification(s) dispatched during the demo",
        notifier.notices().len()
    );
    Ok(())
}

fn demo_submission(email: &str, full_name: &str) -> IntakeSubmission {
    IntakeSubmission {
        personal: PersonalDetails {
            full_name: full_name.to_string(),
            contact_number: "0917-555-0100".to_string(),
            civil_status: CivilStatus::Single,
            address: "Poblacion Market Area".to_string(),
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

fn seed_stall(
    store: &MemoryAllocationStore,
    id: &str,
    allocation: AllocationMode,
) -> Result<StallId, AppError> {
    let stall = StallRecord {
        id: StallId(id.to_string()),
        branch: "poblacion".to_string(),
        allocation,
        status: StallStatus::Active,
        available: true,
        session_id: None,
    };
    store.transaction(&mut |txn| -> Result<(), AllocationServiceError> {
        Ok(txn.insert_stall(stall.clone())?)
    })?;
    Ok(stall.id)
}

fn seed_declined_history(
    store: &MemoryAllocationStore,
    email: &str,
    age: Duration,
) -> Result<(), AppError> {
    let applicant_id = ApplicantId(format!("demo-{email}"));
    let created_at = Utc::now() - age;
    let applicant = ApplicantRecord {
        id: applicant_id.clone(),
        full_name: "Former Applicant".to_string(),
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
    let application = ApplicationRecord {
        id: ApplicationId(format!("demo-app-{email}")),
        applicant_id: applicant_id.clone(),
        stall_id: StallId("stall-archived".to_string()),
        status: ApplicationStatus::Declined,
        submitted_at: created_at,
    };
    store.transaction(&mut |txn| -> Result<(), AllocationServiceError> {
        txn.insert_applicant(applicant.clone())?;
        txn.insert_contact_profile(contact.clone())?;
        txn.insert_application(application.clone())?;
        Ok(())
    })?;
    Ok(())
}
