//! # coursehub-auth
//!
//! Authentication primitives for the CourseHub platform.
//!
//! ## Modules
//!
//! - `jwt` — JWT token creation and validation
//! - `password` — Argon2id password hashing and verification

pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtDecoder, JwtEncoder, TokenPair};
pub use password::PasswordHasher;
