//! # coursehub-database
//!
//! PostgreSQL connection management and concrete repository
//! implementations for all CourseHub entities. The access record store
//! (purchases + access requests) lives here, including the
//! compare-and-set status transition and the approve transaction.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
