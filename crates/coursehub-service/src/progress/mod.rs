//! Lecture progress tracking and derived course completion.

pub mod service;

pub use service::ProgressService;
