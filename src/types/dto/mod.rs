// Request/response models exposed by the HTTP API
pub mod audit;
pub mod auth;
pub mod common;
pub mod referrals;
pub mod users;
