// Database entity definitions (sea-orm)
pub mod audit_log;
pub mod employee_referral;
pub mod user;
