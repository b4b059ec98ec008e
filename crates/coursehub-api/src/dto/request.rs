//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Desired username.
    #[validate(length(min = 3, max = 100, message = "Username must be 3-100 characters"))]
    pub username: String,
    /// Email address.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username.
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token.
    pub refresh_token: String,
}

/// Decline an access request (admin).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DeclineRequest {
    /// Why the request was declined; shown to the requester.
    #[validate(length(min = 1, message = "Decline reason is required"))]
    pub reason: String,
}

/// Record a gateway-settled purchase (admin).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordPurchaseRequest {
    /// The purchasing user.
    pub user_id: uuid::Uuid,
    /// Gateway settlement reference.
    #[validate(length(min = 1, message = "Payment reference is required"))]
    pub reference: String,
}

/// Set a lecture's viewed flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetViewedRequest {
    /// Whether the lecture has been viewed.
    pub viewed: bool,
}

/// Playback progress report from the video player.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PlaybackRequest {
    /// Fraction of the lecture played, 0.0 to 1.0.
    #[validate(range(min = 0.0, max = 1.0, message = "Played fraction must be 0-1"))]
    pub played_fraction: f64,
}
