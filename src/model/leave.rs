use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LeaveRequest {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "TRD1042")]
    pub employee_code: String,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-03", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "Family event")]
    pub reason: String,
    #[schema(example = "pending")]
    pub status: String,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

/// A decision an admin can hand down on a pending request.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LeaveDecision {
    Approve,
    Reject,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LeaveTransitionError {
    #[error("Leave request already {0}")]
    AlreadyDecided(&'static str),
}

impl LeaveStatus {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(LeaveStatus::Pending),
            "approved" => Some(LeaveStatus::Approved),
            "rejected" => Some(LeaveStatus::Rejected),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "pending",
            LeaveStatus::Approved => "approved",
            LeaveStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, LeaveStatus::Pending)
    }

    /// The only legal transition: pending → approved/rejected. Deciding an
    /// already-terminal request is rejected rather than silently overwritten.
    pub fn decide(self, decision: LeaveDecision) -> Result<LeaveStatus, LeaveTransitionError> {
        if self.is_terminal() {
            return Err(LeaveTransitionError::AlreadyDecided(self.as_str()));
        }
        Ok(match decision {
            LeaveDecision::Approve => LeaveStatus::Approved,
            LeaveDecision::Reject => LeaveStatus::Rejected,
        })
    }
}

impl LeaveDecision {
    /// Accepts exactly the two terminal status tags; anything else is a
    /// caller validation error.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "approved" => Some(LeaveDecision::Approve),
            "rejected" => Some(LeaveDecision::Reject),
            _ => None,
        }
    }

    pub fn as_status_str(&self) -> &'static str {
        match self {
            LeaveDecision::Approve => "approved",
            LeaveDecision::Reject => "rejected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_accepts_both_decisions() {
        assert_eq!(
            LeaveStatus::Pending.decide(LeaveDecision::Approve),
            Ok(LeaveStatus::Approved)
        );
        assert_eq!(
            LeaveStatus::Pending.decide(LeaveDecision::Reject),
            Ok(LeaveStatus::Rejected)
        );
    }

    #[test]
    fn terminal_states_reject_any_further_decision() {
        for terminal in [LeaveStatus::Approved, LeaveStatus::Rejected] {
            for decision in [LeaveDecision::Approve, LeaveDecision::Reject] {
                assert_eq!(
                    terminal.decide(decision),
                    Err(LeaveTransitionError::AlreadyDecided(terminal.as_str()))
                );
            }
        }
    }

    #[test]
    fn decision_parsing_accepts_only_terminal_tags() {
        assert_eq!(LeaveDecision::parse("approved"), Some(LeaveDecision::Approve));
        assert_eq!(LeaveDecision::parse("rejected"), Some(LeaveDecision::Reject));
        assert_eq!(LeaveDecision::parse("pending"), None);
        assert_eq!(LeaveDecision::parse("Approved"), None);
        assert_eq!(LeaveDecision::parse(""), None);
    }

    #[test]
    fn status_round_trips_through_tags() {
        for s in [LeaveStatus::Pending, LeaveStatus::Approved, LeaveStatus::Rejected] {
            assert_eq!(LeaveStatus::from_str(s.as_str()), Some(s));
        }
        assert_eq!(LeaveStatus::from_str("cancelled"), None);
    }
}
