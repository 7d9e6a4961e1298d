use entity::{employees, pay_stubs};
use products_hr::{EmployeeRecord, MockStore, PayStubRecord};
use sea_orm::{ActiveValue::Set, EntityTrait, TransactionTrait};
use tracing::info;

use crate::{DbPool, DbResult};

/// Copy every fixture from `source` into the mirror tables.
///
/// Rows are replaced per employee, so running the seed twice leaves the
/// same data behind. Returns the number of employees written.
pub async fn seed_records(pool: &DbPool, source: &MockStore) -> DbResult<usize> {
    let txn = pool.begin().await?;
    for record in source.employees() {
        // Pay stubs follow through ON DELETE CASCADE.
        employees::Entity::delete_by_id(record.employee_number)
            .exec(&txn)
            .await?;
        employees::Entity::insert(employee_model(record))
            .exec(&txn)
            .await?;
        let stubs = source
            .pay_stubs_for(record.internal_id)
            .iter()
            .map(|stub| pay_stub_model(record.internal_id, stub))
            .collect::<Vec<_>>();
        let stub_count = stubs.len();
        if !stubs.is_empty() {
            pay_stubs::Entity::insert_many(stubs).exec(&txn).await?;
        }
        info!(
            employee_number = record.employee_number,
            stub_count, "seeded employee"
        );
    }
    txn.commit().await?;
    Ok(source.employees().len())
}

fn employee_model(record: &EmployeeRecord) -> employees::ActiveModel {
    employees::ActiveModel {
        employee_number: Set(record.employee_number),
        internal_id: Set(record.internal_id),
        first_name: Set(record.first_name.clone()),
        middle_name: Set(record.middle_name.clone()),
        last_name: Set(record.last_name.clone()),
        street_address: Set(record.street_address.clone()),
        city: Set(record.city.clone()),
        state_code: Set(record.state_code.clone()),
        zip_code: Set(record.zip_code),
        ssn: Set(record.ssn.clone()),
        hire_date_code: Set(record.hire_date_code),
        birth_date_code: Set(record.birth_date_code),
        department: Set(record.department.clone()),
        position: Set(record.position.clone()),
        status_code: Set(record.status_code),
        employment_type_code: Set(record.employment_type_code.clone()),
        permanence_code: Set(record.permanence_code.clone()),
    }
}

fn pay_stub_model(internal_id: i64, stub: &PayStubRecord) -> pay_stubs::ActiveModel {
    pay_stubs::ActiveModel {
        employee_internal_id: Set(internal_id),
        check_number: Set(stub.check_number),
        net_pay_cents: Set(stub.net_pay_cents),
        bank_code: Set(stub.bank_code.clone()),
        record_type: Set(stub.record_type.clone()),
        ..Default::default()
    }
}
