//! Course catalog reads.

pub mod service;

pub use service::{CourseDetail, CourseService};
