use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::domain::{ApplicantId, StallId};

/// Identifier wrapper for raffle/auction sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    Raffle,
    Auction,
}

impl SessionKind {
    pub const fn label(self) -> &'static str {
        match self {
            SessionKind::Raffle => "raffle",
            SessionKind::Auction => "auction",
        }
    }
}

/// Session lifecycle. Extended behaves like Open except it records that
/// the deadline was replaced at least once. ClosedWon and Cancelled are
/// terminal; a session reaches a terminal state exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Open,
    Extended,
    ClosedWon,
    Cancelled,
}

impl SessionStatus {
    pub const fn is_open(self) -> bool {
        matches!(self, SessionStatus::Open | SessionStatus::Extended)
    }

    pub const fn label(self) -> &'static str {
        match self {
            SessionStatus::Open => "open",
            SessionStatus::Extended => "extended",
            SessionStatus::ClosedWon => "closed_won",
            SessionStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub applicant_id: ApplicantId,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    pub applicant_id: ApplicantId,
    pub amount: u32,
    pub placed_at: DateTime<Utc>,
}

/// Time-boxed competitive allocation attached 1:1 to a stall while open.
/// Raffle sessions collect participants, auction sessions collect bids;
/// the other list stays empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: SessionId,
    pub stall_id: StallId,
    pub kind: SessionKind,
    pub status: SessionStatus,
    pub opened_at: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    pub participants: Vec<Participant>,
    pub bids: Vec<Bid>,
}

/// Rule violations raised by session transitions.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session no longer accepts changes")]
    Closed,
    #[error("bid of {offered} does not beat the applicant's standing bid of {previous}")]
    BidTooLow { offered: u32, previous: u32 },
    #[error("session does not accept {submitted} entries")]
    WrongKind { submitted: &'static str },
}

/// Outcome of a raffle join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    Joined,
    AlreadyJoined,
}

/// Outcome of an auction bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BidOutcome {
    Placed,
    Superseded,
}

/// Result of the closing transition.
#[derive(Debug, Clone, PartialEq)]
pub enum ClosingOutcome {
    Winner(ApplicantId),
    NoEntries,
}

impl SessionRecord {
    pub fn open(
        id: SessionId,
        stall_id: StallId,
        kind: SessionKind,
        opened_at: DateTime<Utc>,
        deadline: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            stall_id,
            kind,
            status: SessionStatus::Open,
            opened_at,
            deadline,
            participants: Vec::new(),
            bids: Vec::new(),
        }
    }

    /// Entries are accepted while the session is open and the deadline
    /// has not passed, even if the expiry sweep has not observed the
    /// overdue session yet.
    pub fn accepts_entries(&self, now: DateTime<Utc>) -> bool {
        self.status.is_open() && now < self.deadline
    }

    pub fn entry_count(&self) -> usize {
        match self.kind {
            SessionKind::Raffle => self.participants.len(),
            SessionKind::Auction => self.bids.len(),
        }
    }

    /// Register a raffle participant. Re-joining is a no-op rather than
    /// a duplicate row.
    pub fn register_participant(
        &mut self,
        applicant_id: ApplicantId,
        now: DateTime<Utc>,
    ) -> Result<JoinOutcome, SessionError> {
        if self.kind != SessionKind::Raffle {
            return Err(SessionError::WrongKind {
                submitted: "participant",
            });
        }
        if !self.accepts_entries(now) {
            return Err(SessionError::Closed);
        }
        if self
            .participants
            .iter()
            .any(|participant| participant.applicant_id == applicant_id)
        {
            return Ok(JoinOutcome::AlreadyJoined);
        }

        self.participants.push(Participant {
            applicant_id,
            joined_at: now,
        });
        Ok(JoinOutcome::Joined)
    }

    /// Place or raise a bid. A later bid from the same applicant
    /// supersedes the earlier one, and only needs to beat that
    /// applicant's own previous amount, not the current leader.
    pub fn place_bid(
        &mut self,
        applicant_id: ApplicantId,
        amount: u32,
        now: DateTime<Utc>,
    ) -> Result<BidOutcome, SessionError> {
        if self.kind != SessionKind::Auction {
            return Err(SessionError::WrongKind { submitted: "bid" });
        }
        if !self.accepts_entries(now) {
            return Err(SessionError::Closed);
        }

        if let Some(standing) = self
            .bids
            .iter_mut()
            .find(|bid| bid.applicant_id == applicant_id)
        {
            if amount <= standing.amount {
                return Err(SessionError::BidTooLow {
                    offered: amount,
                    previous: standing.amount,
                });
            }
            standing.amount = amount;
            standing.placed_at = now;
            return Ok(BidOutcome::Superseded);
        }

        self.bids.push(Bid {
            applicant_id,
            amount,
            placed_at: now,
        });
        Ok(BidOutcome::Placed)
    }

    /// Replace the deadline. The session keeps accepting entries; the
    /// status records that the timer was moved.
    pub fn extend(&mut self, new_deadline: DateTime<Utc>) -> Result<(), SessionError> {
        if !self.status.is_open() {
            return Err(SessionError::Closed);
        }
        self.deadline = new_deadline;
        self.status = SessionStatus::Extended;
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), SessionError> {
        if !self.status.is_open() {
            return Err(SessionError::Closed);
        }
        self.status = SessionStatus::Cancelled;
        Ok(())
    }

    /// The closing transition. Errors with `Closed` when the session is
    /// already terminal, which is what serializes racing closers: only
    /// the transaction that observes the session still open commits a
    /// winner.
    pub fn finalize<R: Rng>(&mut self, rng: &mut R) -> Result<ClosingOutcome, SessionError> {
        if !self.status.is_open() {
            return Err(SessionError::Closed);
        }

        match self.select_winner(rng) {
            Some(winner) => {
                self.status = SessionStatus::ClosedWon;
                Ok(ClosingOutcome::Winner(winner))
            }
            None => {
                self.status = SessionStatus::Cancelled;
                Ok(ClosingOutcome::NoEntries)
            }
        }
    }

    /// Raffle: uniform pick over the current participants. Auction:
    /// highest amount, ties broken by the earlier bid timestamp.
    fn select_winner<R: Rng>(&self, rng: &mut R) -> Option<ApplicantId> {
        match self.kind {
            SessionKind::Raffle => self
                .participants
                .choose(rng)
                .map(|participant| participant.applicant_id.clone()),
            SessionKind::Auction => self
                .bids
                .iter()
                .max_by(|a, b| {
                    a.amount
                        .cmp(&b.amount)
                        .then_with(|| b.placed_at.cmp(&a.placed_at))
                })
                .map(|bid| bid.applicant_id.clone()),
        }
    }
}
