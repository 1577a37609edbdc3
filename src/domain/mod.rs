// Domain rules: roles and the role-transition decision engine
pub mod role;
pub mod transition;

pub use role::Role;
pub use transition::{decide, ReassignmentPlan, RoleChangeDecision, UserDirectory};
