use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

// Mirror of the payroll master. Text columns keep the source padding.
const UP_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS employees (
    employee_number bigint PRIMARY KEY,
    internal_id bigint NOT NULL UNIQUE,
    first_name text NULL,
    middle_name text NULL,
    last_name text NULL,
    street_address text NULL,
    city text NULL,
    state_code text NULL,
    zip_code bigint NULL,
    ssn text NULL,
    hire_date_code bigint NULL,
    birth_date_code bigint NULL,
    department text NULL,
    position text NULL,
    status_code integer NOT NULL DEFAULT 0,
    employment_type_code text NULL,
    permanence_code text NULL
);
"#;

const DOWN_SQL: &str = "DROP TABLE IF EXISTS employees CASCADE";

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
