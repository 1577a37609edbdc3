use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::FullName).string().null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null().default("customer"))
                    .col(ColumnDef::new(Users::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Users::ReportsTo).integer().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_reports_to")
                            .from(Users::Table, Users::ReportsTo)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_role")
                    .table(Users::Table)
                    .col(Users::Role)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_reports_to")
                    .table(Users::Table)
                    .col(Users::ReportsTo)
                    .to_owned(),
            )
            .await?;

        // Create employee_referrals table
        manager
            .create_table(
                Table::create()
                    .table(EmployeeReferrals::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(EmployeeReferrals::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(EmployeeReferrals::ReferredUserId).integer().not_null())
                    .col(ColumnDef::new(EmployeeReferrals::ReferringManagerId).integer().not_null())
                    .col(ColumnDef::new(EmployeeReferrals::Status).string().not_null().default("pending"))
                    .col(ColumnDef::new(EmployeeReferrals::Reason).text().not_null())
                    .col(ColumnDef::new(EmployeeReferrals::AdminNotes).text().null())
                    .col(ColumnDef::new(EmployeeReferrals::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(EmployeeReferrals::ReviewedAt).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_referrals_referred_user")
                            .from(EmployeeReferrals::Table, EmployeeReferrals::ReferredUserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_referrals_referring_manager")
                            .from(EmployeeReferrals::Table, EmployeeReferrals::ReferringManagerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_referrals_status")
                    .table(EmployeeReferrals::Table)
                    .col(EmployeeReferrals::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_referrals_referred_user")
                    .table(EmployeeReferrals::Table)
                    .col(EmployeeReferrals::ReferredUserId)
                    .to_owned(),
            )
            .await?;

        // Create audit_logs table
        manager
            .create_table(
                Table::create()
                    .table(AuditLogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AuditLogs::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(AuditLogs::ActionType).string().not_null())
                    .col(ColumnDef::new(AuditLogs::ActorId).integer().null())
                    .col(ColumnDef::new(AuditLogs::ActorEmail).string().null())
                    .col(ColumnDef::new(AuditLogs::TargetType).string().not_null())
                    .col(ColumnDef::new(AuditLogs::TargetId).integer().not_null())
                    .col(ColumnDef::new(AuditLogs::Details).text().null())
                    .col(ColumnDef::new(AuditLogs::IpAddress).string().null())
                    .col(ColumnDef::new(AuditLogs::TimestampMs).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_audit_logs_action_type")
                    .table(AuditLogs::Table)
                    .col(AuditLogs::ActionType)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_audit_logs_timestamp")
                    .table(AuditLogs::Table)
                    .col(AuditLogs::TimestampMs)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_audit_logs_target")
                    .table(AuditLogs::Table)
                    .col(AuditLogs::TargetType)
                    .col(AuditLogs::TargetId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuditLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EmployeeReferrals::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Email,
    FullName,
    PasswordHash,
    Role,
    IsActive,
    ReportsTo,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum EmployeeReferrals {
    Table,
    Id,
    ReferredUserId,
    ReferringManagerId,
    Status,
    Reason,
    AdminNotes,
    CreatedAt,
    ReviewedAt,
}

#[derive(Iden)]
enum AuditLogs {
    Table,
    Id,
    ActionType,
    ActorId,
    ActorEmail,
    TargetType,
    TargetId,
    Details,
    IpAddress,
    TimestampMs,
}
