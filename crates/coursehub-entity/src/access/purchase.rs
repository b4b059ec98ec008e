//! Purchase record entity: durable, append-only access evidence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// How the purchase evidence came into existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "purchase_source", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PurchaseSource {
    /// Settled by the external payment gateway callback.
    Gateway,
    /// Self-enrollment in a free course.
    FreeEnrollment,
    /// Admin-verified off-platform (UPI) payment.
    ManualApproval,
}

impl PurchaseSource {
    /// Return the source as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gateway => "gateway",
            Self::FreeEnrollment => "free_enrollment",
            Self::ManualApproval => "manual_approval",
        }
    }
}

impl fmt::Display for PurchaseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Durable proof that a (user, course) pair has settled payment or free
/// enrollment. Immutable once created; unique per pair.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PurchaseRecord {
    /// Unique purchase identifier.
    pub id: Uuid,
    /// The purchasing user.
    pub user_id: Uuid,
    /// The purchased course.
    pub course_id: Uuid,
    /// Evidence source.
    pub source: PurchaseSource,
    /// Gateway transaction reference, when applicable.
    pub reference: Option<String>,
    /// When the evidence was recorded.
    pub created_at: DateTime<Utc>,
}
