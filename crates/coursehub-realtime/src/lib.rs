//! # coursehub-realtime
//!
//! Push-based invalidation for access and progress state. Admin
//! approvals, declines, and purchase writes publish events here so
//! connected clients learn about them immediately; clients without a
//! WebSocket connection fall back to polling the same read endpoints.
//!
//! ## Modules
//!
//! - `message` — outbound event payloads
//! - `channel` — channel naming conventions
//! - `pubsub` — in-memory broadcast fan-out
//! - `hub` — typed publish/subscribe facade used by the service layer

pub mod channel;
pub mod hub;
pub mod message;
pub mod pubsub;

pub use hub::InvalidationHub;
pub use message::OutboundMessage;
pub use pubsub::MemoryPubSub;
