//! # coursehub-service
//!
//! Business logic service layer for CourseHub. Each service orchestrates
//! repositories, the invalidation hub, and authentication to implement
//! application-level use cases.
//!
//! Services follow constructor injection — all dependencies are provided
//! at construction time via `Arc` references.

pub mod access;
pub mod context;
pub mod course;
pub mod notification;
pub mod progress;
pub mod user;

pub use access::{
    AccessDecision, AccessEvidence, AccessReason, AccessRequestService, AccessService,
    AccessStatus, decide,
};
pub use context::RequestContext;
pub use course::CourseService;
pub use notification::NotificationService;
pub use progress::ProgressService;
pub use user::UserService;
