//! Access request entity and status state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Lifecycle status of an access request.
///
/// `Pending` is the only initial state; `Approved` and `Declined` are
/// terminal and can never be left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "request_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Awaiting administrator verification.
    Pending,
    /// Verified and granted; a purchase record exists.
    Approved,
    /// Rejected with a reason; does not block resubmission.
    Declined,
}

impl RequestStatus {
    /// Whether this status can never change again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Declined)
    }

    /// Whether a request in this status blocks a new submission for the
    /// same (user, course) pair.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }

    /// Whether `self -> next` is a legal transition.
    pub fn can_transition_to(&self, next: RequestStatus) -> bool {
        matches!(self, Self::Pending) && next.is_terminal()
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Declined => "declined",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = coursehub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "declined" => Ok(Self::Declined),
            _ => Err(coursehub_core::AppError::validation(format!(
                "Invalid request status: '{s}'. Expected one of: pending, approved, declined"
            ))),
        }
    }
}

/// A student-initiated request asking an administrator to manually
/// verify an off-platform payment.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AccessRequest {
    /// Unique request identifier.
    pub id: Uuid,
    /// The requesting student.
    pub user_id: Uuid,
    /// The course the request is for.
    pub course_id: Uuid,
    /// Current lifecycle status.
    pub status: RequestStatus,
    /// Reason set when the request was declined.
    pub decline_reason: Option<String>,
    /// When the request was submitted.
    pub created_at: DateTime<Utc>,
    /// Last status change.
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(RequestStatus::Approved.is_terminal());
        assert!(RequestStatus::Declined.is_terminal());
    }

    #[test]
    fn test_active_blocks_resubmission() {
        assert!(RequestStatus::Pending.is_active());
        assert!(RequestStatus::Approved.is_active());
        assert!(!RequestStatus::Declined.is_active());
    }

    #[test]
    fn test_legal_transitions() {
        assert!(RequestStatus::Pending.can_transition_to(RequestStatus::Approved));
        assert!(RequestStatus::Pending.can_transition_to(RequestStatus::Declined));
        // No transition leaves a terminal state.
        assert!(!RequestStatus::Approved.can_transition_to(RequestStatus::Declined));
        assert!(!RequestStatus::Declined.can_transition_to(RequestStatus::Approved));
        // Re-entering pending is never legal.
        assert!(!RequestStatus::Pending.can_transition_to(RequestStatus::Pending));
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "pending".parse::<RequestStatus>().unwrap(),
            RequestStatus::Pending
        );
        assert_eq!(
            "APPROVED".parse::<RequestStatus>().unwrap(),
            RequestStatus::Approved
        );
        assert!("cancelled".parse::<RequestStatus>().is_err());
    }
}
