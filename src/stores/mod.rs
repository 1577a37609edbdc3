pub mod audit_store;
pub mod referral_store;
pub mod user_store;

pub use audit_store::{AuditQuery, AuditStore};
pub use referral_store::ReferralStore;
pub use user_store::UserStore;
