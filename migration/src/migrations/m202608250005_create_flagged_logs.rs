use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202608250005_create_flagged_logs"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // No foreign key to qr_sessions: audit entries must survive the
        // session row going away.
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("flagged_logs"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("session_token"))
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Alias::new("roll_no")).string().not_null())
                    .col(ColumnDef::new(Alias::new("reason")).string().not_null())
                    .col(ColumnDef::new(Alias::new("details")).text().not_null())
                    .col(
                        ColumnDef::new(Alias::new("timestamp"))
                            .timestamp()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_flagged_logs_roll_no")
                    .table(Alias::new("flagged_logs"))
                    .col(Alias::new("roll_no"))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("flagged_logs")).to_owned())
            .await
    }
}
