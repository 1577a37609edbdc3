// Internal types shared across layers (never serialized to the API)
pub mod audit;
pub mod auth;
pub mod context;

pub use audit::AuditEvent;
pub use auth::Claims;
pub use context::{Actor, RequestContext};
