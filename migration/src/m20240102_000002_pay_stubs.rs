use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

const UP_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS pay_stubs (
    id bigserial PRIMARY KEY,
    employee_internal_id bigint NOT NULL REFERENCES employees(internal_id) ON DELETE CASCADE,
    check_number bigint NOT NULL,
    net_pay_cents bigint NULL,
    bank_code text NULL,
    record_type text NOT NULL,
    UNIQUE (employee_internal_id, check_number)
);

CREATE INDEX IF NOT EXISTS pay_stubs_recent_idx
    ON pay_stubs (employee_internal_id, check_number DESC);
"#;

const DOWN_SQL: &str = "DROP TABLE IF EXISTS pay_stubs";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(UP_SQL)
            .await
            .map(|_| ())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(DOWN_SQL)
            .await
            .map(|_| ())
    }
}
