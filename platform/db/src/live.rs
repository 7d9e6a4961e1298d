use std::sync::Arc;

use async_trait::async_trait;
use entity::{employees, pay_stubs};
use products_hr::{EmployeeRecord, PayStubRecord, RecordStore, StoreError, store::StoreResult};
use sea_orm::{ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};
use tracing::warn;

use crate::DbPool;

/// Record store reading the `employees` and `pay_stubs` tables.
#[derive(Clone, Debug)]
pub struct LiveStore {
    pool: Arc<DbPool>,
}

impl LiveStore {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl RecordStore for LiveStore {
    async fn fetch_employee(&self, employee_number: i64) -> StoreResult<Option<EmployeeRecord>> {
        let model = employees::Entity::find_by_id(employee_number)
            .one(self.pool())
            .await
            .map_err(unavailable)?;
        Ok(model.map(employee_record))
    }

    async fn fetch_pay_stubs(&self, internal_id: i64) -> StoreResult<Vec<PayStubRecord>> {
        let rows = pay_stubs::Entity::find()
            .filter(pay_stubs::Column::EmployeeInternalId.eq(internal_id))
            .order_by_desc(pay_stubs::Column::CheckNumber)
            .all(self.pool())
            .await
            .map_err(unavailable)?;
        Ok(rows.into_iter().map(pay_stub_record).collect())
    }

    async fn ping(&self) -> StoreResult<()> {
        crate::ping(self.pool()).await.map_err(unavailable)
    }
}

fn unavailable(err: DbErr) -> StoreError {
    warn!(error = %err, "payroll store query failed");
    StoreError::Unavailable(err.to_string())
}

fn employee_record(model: employees::Model) -> EmployeeRecord {
    EmployeeRecord {
        employee_number: model.employee_number,
        internal_id: model.internal_id,
        first_name: model.first_name,
        middle_name: model.middle_name,
        last_name: model.last_name,
        street_address: model.street_address,
        city: model.city,
        state_code: model.state_code,
        zip_code: model.zip_code,
        ssn: model.ssn,
        hire_date_code: model.hire_date_code,
        birth_date_code: model.birth_date_code,
        department: model.department,
        position: model.position,
        status_code: model.status_code,
        employment_type_code: model.employment_type_code,
        permanence_code: model.permanence_code,
    }
}

fn pay_stub_record(model: pay_stubs::Model) -> PayStubRecord {
    PayStubRecord {
        check_number: model.check_number,
        net_pay_cents: model.net_pay_cents,
        bank_code: model.bank_code,
        record_type: model.record_type,
    }
}
