//! Access decision engine and the manual access-request workflow.

pub mod decision;
pub mod requests;
pub mod service;

pub use decision::{AccessDecision, AccessEvidence, AccessReason, AccessStatus, decide};
pub use requests::AccessRequestService;
pub use service::AccessService;
