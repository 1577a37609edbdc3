use sea_orm::entity::prelude::*;

/// Immutable record of an administrative or account action.
///
/// `details` holds a free-form JSON blob; its known shapes are interpreted
/// by the audit formatter, unknown shapes render as generic key/value pairs.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub action_type: String,
    pub actor_id: Option<i32>,
    pub actor_email: Option<String>,
    pub target_type: String,
    pub target_id: i32,
    pub details: Option<String>,
    pub ip_address: Option<String>,

    // Unix milliseconds, UTC
    pub timestamp_ms: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
