//! Repository implementations, one per aggregate.

pub mod access_request;
pub mod course;
pub mod notification;
pub mod progress;
pub mod purchase;
pub mod user;

pub use access_request::AccessRequestRepository;
pub use course::CourseRepository;
pub use notification::NotificationRepository;
pub use progress::ProgressRepository;
pub use purchase::PurchaseRepository;
pub use user::UserRepository;
