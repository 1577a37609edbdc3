use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "employee_referrals")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub referred_user_id: i32,
    pub referring_manager_id: i32,

    // pending | approved | rejected | canceled
    pub status: String,
    pub reason: String,
    pub admin_notes: Option<String>,

    pub created_at: i64,
    pub reviewed_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
