//! # coursehub-entity
//!
//! Domain entity models for CourseHub: users, courses and lectures,
//! access requests, purchase records, and learning progress. Pure data
//! types with small invariant helpers; persistence lives in
//! `coursehub-database`.

pub mod access;
pub mod course;
pub mod notification;
pub mod progress;
pub mod user;
