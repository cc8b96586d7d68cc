//! Stall allocation and application lifecycle engine for multi-branch
//! public markets: applicant intake, resubmission eligibility, raffle and
//! auction sessions, and the background sweeps that expire sessions and
//! purge rejected paperwork.

pub mod allocation;
pub mod config;
pub mod error;
pub mod telemetry;
