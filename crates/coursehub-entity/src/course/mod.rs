//! Course and lecture entities.

pub mod model;
pub mod price;

pub use model::{Course, Lecture};
pub use price::price_is_free;
