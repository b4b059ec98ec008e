//! Pure access decision engine.
//!
//! Given a snapshot of the evidence for one (user, course) pair, the
//! engine resolves the single effective decision. The evidence sources
//! can conflict (a purchased course may also have a declined request
//! lying around); precedence is a fixed total order, and the first
//! matching source wins:
//!
//! 1. free course → granted
//! 2. purchase record exists → granted
//! 3. user is in the enrolled-students set → granted
//! 4. approved access request → granted
//! 5. pending access request → pending
//! 6. otherwise → denied
//!
//! The function is pure: no I/O, no caching, no unconditional bypass.
//! Callers assemble a fresh [`AccessEvidence`] snapshot on every call.

use serde::{Deserialize, Serialize};

use coursehub_entity::access::RequestStatus;
use coursehub_entity::course::price_is_free;

/// The tri-state outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessStatus {
    /// The user may view gated content.
    Granted,
    /// A request is awaiting administrator verification.
    Pending,
    /// No access; the caller should route the user to the request flow.
    Denied,
}

impl AccessStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Granted => "granted",
            Self::Pending => "pending",
            Self::Denied => "denied",
        }
    }
}

/// Why a decision came out the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessReason {
    /// The course is free; everyone is granted.
    FreeCourse,
    /// A purchase record exists for the pair.
    Purchased,
    /// The user appears in the course's enrolled-students set.
    Enrolled,
    /// An access request was approved.
    ApprovedRequest,
    /// A pending access request awaits verification.
    AwaitingVerification,
    /// No evidence grants access.
    NoAccess,
}

impl AccessReason {
    /// Human-readable label for API responses and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FreeCourse => "free course",
            Self::Purchased => "purchased",
            Self::Enrolled => "enrolled",
            Self::ApprovedRequest => "approved request",
            Self::AwaitingVerification => "awaiting verification",
            Self::NoAccess => "no access",
        }
    }
}

/// The resolved decision plus its reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessDecision {
    /// Whether access is granted, pending, or denied.
    pub status: AccessStatus,
    /// Which evidence source produced the decision.
    pub reason: AccessReason,
}

impl AccessDecision {
    /// Whether gated content may be viewed.
    pub fn is_granted(&self) -> bool {
        self.status == AccessStatus::Granted
    }
}

/// Snapshot of all evidence for one (user, course) pair.
///
/// Assembled fresh by the caller; the engine never reads storage.
#[derive(Debug, Clone, Default)]
pub struct AccessEvidence {
    /// The course's raw price field.
    pub price: Option<String>,
    /// Whether a purchase record exists for the pair.
    pub has_purchase: bool,
    /// Whether the user is in the course's enrolled-students set.
    pub is_enrolled: bool,
    /// Status of the active access request, if one exists.
    pub request_status: Option<RequestStatus>,
}

/// One evidence checker: returns `Some` to claim the decision.
type Checker = fn(&AccessEvidence) -> Option<AccessDecision>;

/// Ordered evidence checkers; order IS the precedence rule.
const CHECKERS: [Checker; 5] = [
    check_free,
    check_purchased,
    check_enrolled,
    check_approved_request,
    check_pending_request,
];

/// Resolve the effective decision for an evidence snapshot.
pub fn decide(evidence: &AccessEvidence) -> AccessDecision {
    CHECKERS
        .iter()
        .find_map(|check| check(evidence))
        .unwrap_or(AccessDecision {
            status: AccessStatus::Denied,
            reason: AccessReason::NoAccess,
        })
}

fn check_free(evidence: &AccessEvidence) -> Option<AccessDecision> {
    price_is_free(evidence.price.as_deref()).then_some(AccessDecision {
        status: AccessStatus::Granted,
        reason: AccessReason::FreeCourse,
    })
}

fn check_purchased(evidence: &AccessEvidence) -> Option<AccessDecision> {
    evidence.has_purchase.then_some(AccessDecision {
        status: AccessStatus::Granted,
        reason: AccessReason::Purchased,
    })
}

fn check_enrolled(evidence: &AccessEvidence) -> Option<AccessDecision> {
    evidence.is_enrolled.then_some(AccessDecision {
        status: AccessStatus::Granted,
        reason: AccessReason::Enrolled,
    })
}

fn check_approved_request(evidence: &AccessEvidence) -> Option<AccessDecision> {
    (evidence.request_status == Some(RequestStatus::Approved)).then_some(AccessDecision {
        status: AccessStatus::Granted,
        reason: AccessReason::ApprovedRequest,
    })
}

fn check_pending_request(evidence: &AccessEvidence) -> Option<AccessDecision> {
    (evidence.request_status == Some(RequestStatus::Pending)).then_some(AccessDecision {
        status: AccessStatus::Pending,
        reason: AccessReason::AwaitingVerification,
    })
}
