//! Access evidence entities: manual access requests and purchase records.

pub mod purchase;
pub mod request;

pub use purchase::{PurchaseRecord, PurchaseSource};
pub use request::{AccessRequest, RequestStatus};
