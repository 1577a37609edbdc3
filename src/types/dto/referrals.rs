use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// Request model for creating a promotion referral
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ReferralCreateRequest {
    /// The employee being referred for promotion to manager
    pub referred_user_id: i32,

    /// Why the employee should be promoted
    pub reason: String,
}

/// Request model for an admin review decision
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ReferralReviewRequest {
    /// Optional notes recorded with the decision
    pub admin_notes: Option<String>,
}

/// Referral record with resolved participant emails
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ReferralOut {
    pub id: i32,
    pub referred_user_id: i32,
    pub referred_user_email: String,
    pub referred_user_name: Option<String>,
    pub referring_manager_id: i32,
    pub referring_manager_email: String,

    /// One of pending, approved, rejected, canceled
    pub status: String,
    pub reason: String,
    pub admin_notes: Option<String>,

    /// Creation time (RFC 3339)
    pub created_at: String,

    /// Review time (RFC 3339), absent while pending
    pub reviewed_at: Option<String>,
}
