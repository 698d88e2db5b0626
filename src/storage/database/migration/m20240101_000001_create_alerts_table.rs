use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alerts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alerts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Alerts::Fingerprint).string().not_null())
                    .col(
                        ColumnDef::new(Alerts::Status)
                            .string()
                            .not_null()
                            .check(Expr::col(Alerts::Status).is_in(["firing", "resolved"])),
                    )
                    .col(
                        ColumnDef::new(Alerts::Count)
                            .integer()
                            .not_null()
                            .default(1)
                            .check(Expr::col(Alerts::Count).gt(0)),
                    )
                    .col(ColumnDef::new(Alerts::StartTime).string().not_null())
                    .col(
                        ColumnDef::new(Alerts::ResolvedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Alerts::EndsAt).string().null())
                    .col(ColumnDef::new(Alerts::Alertname).string().null())
                    .col(ColumnDef::new(Alerts::Summary).text().null())
                    .col(ColumnDef::new(Alerts::Instance).string().null())
                    .col(ColumnDef::new(Alerts::Severity).string().null())
                    .col(
                        ColumnDef::new(Alerts::Platform).string().null().check(
                            Expr::col(Alerts::Platform)
                                .is_in(["qywechat", "feishu", "dingtalk"])
                                .or(Expr::col(Alerts::Platform).is_null()),
                        ),
                    )
                    .col(
                        ColumnDef::new(Alerts::SendStatus).string().null().check(
                            Expr::col(Alerts::SendStatus)
                                .is_in(["success", "failed"])
                                .or(Expr::col(Alerts::SendStatus).is_null()),
                        ),
                    )
                    .col(ColumnDef::new(Alerts::SendError).text().null())
                    .col(
                        ColumnDef::new(Alerts::LastSentAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Alerts::WebhookUrl).text().null())
                    .col(
                        ColumnDef::new(Alerts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Alerts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Create indexes
        let indexes = [
            ("idx_alerts_fingerprint", Alerts::Fingerprint),
            ("idx_alerts_status", Alerts::Status),
            ("idx_alerts_resolved_at", Alerts::ResolvedAt),
            ("idx_alerts_created_at", Alerts::CreatedAt),
            ("idx_alerts_platform", Alerts::Platform),
            ("idx_alerts_send_status", Alerts::SendStatus),
            ("idx_alerts_last_sent_at", Alerts::LastSentAt),
        ];

        for (name, column) in indexes {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(name)
                        .table(Alerts::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alerts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Alerts {
    Table,
    Id,
    Fingerprint,
    Status,
    Count,
    StartTime,
    ResolvedAt,
    EndsAt,
    Alertname,
    Summary,
    Instance,
    Severity,
    Platform,
    SendStatus,
    SendError,
    LastSentAt,
    WebhookUrl,
    CreatedAt,
    UpdatedAt,
}
