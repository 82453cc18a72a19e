use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Task {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "TRD1042")]
    pub employee_code: String,
    #[schema(example = "Quarterly report")]
    pub title: String,
    #[schema(example = "Prepare the Q3 attendance summary")]
    pub description: String,
    #[schema(example = "assigned")]
    pub status: String,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, PartialOrd, Ord)]
pub enum TaskStatus {
    Assigned,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "assigned" => Some(TaskStatus::Assigned),
            "in-progress" => Some(TaskStatus::InProgress),
            "completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Assigned => "assigned",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }

    /// Task status only ever moves forward through assigned → in-progress →
    /// completed; staying put is allowed, moving back is not.
    pub fn can_advance_to(&self, next: TaskStatus) -> bool {
        next >= *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_moves_are_allowed() {
        assert!(TaskStatus::Assigned.can_advance_to(TaskStatus::InProgress));
        assert!(TaskStatus::Assigned.can_advance_to(TaskStatus::Completed));
        assert!(TaskStatus::InProgress.can_advance_to(TaskStatus::Completed));
        assert!(TaskStatus::Completed.can_advance_to(TaskStatus::Completed));
    }

    #[test]
    fn backward_moves_are_rejected() {
        assert!(!TaskStatus::Completed.can_advance_to(TaskStatus::InProgress));
        assert!(!TaskStatus::Completed.can_advance_to(TaskStatus::Assigned));
        assert!(!TaskStatus::InProgress.can_advance_to(TaskStatus::Assigned));
    }

    #[test]
    fn tags_round_trip() {
        for s in [TaskStatus::Assigned, TaskStatus::InProgress, TaskStatus::Completed] {
            assert_eq!(TaskStatus::from_str(s.as_str()), Some(s));
        }
        assert_eq!(TaskStatus::from_str("done"), None);
    }
}
