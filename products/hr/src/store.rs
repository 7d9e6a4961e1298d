//! Record store seam.
//!
//! The portal reads two kinds of payroll records: the employee master row,
//! keyed by the public employee number, and pay-stub rows, keyed by the
//! employee's internal id. Backends implement [`RecordStore`]; [`MockStore`]
//! serves fixed fixtures for development and tests.

use std::{collections::HashMap, fmt, sync::Arc};

use async_trait::async_trait;
use thiserror::Error;

use crate::format::mask_ssn;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Raw employee master row. Text fields may carry fixed-width padding.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct EmployeeRecord {
    pub employee_number: i64,
    pub internal_id: i64,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub state_code: Option<String>,
    pub zip_code: Option<i64>,
    pub ssn: Option<String>,
    pub hire_date_code: Option<i64>,
    pub birth_date_code: Option<i64>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub status_code: i32,
    pub employment_type_code: Option<String>,
    pub permanence_code: Option<String>,
}

impl EmployeeRecord {
    pub fn is_active(&self) -> bool {
        self.status_code == 1
    }

    pub fn is_full_time(&self) -> bool {
        code_is(self.employment_type_code.as_deref(), "F")
    }

    pub fn is_permanent(&self) -> bool {
        code_is(self.permanence_code.as_deref(), "P")
    }
}

fn code_is(code: Option<&str>, expected: &str) -> bool {
    code.map(str::trim) == Some(expected)
}

// Hand-written so the SSN never reaches logs or panic messages unmasked.
impl fmt::Debug for EmployeeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmployeeRecord")
            .field("employee_number", &self.employee_number)
            .field("internal_id", &self.internal_id)
            .field("first_name", &self.first_name)
            .field("middle_name", &self.middle_name)
            .field("last_name", &self.last_name)
            .field("ssn", &mask_ssn(self.ssn.as_deref()))
            .field("department", &self.department)
            .field("position", &self.position)
            .field("status_code", &self.status_code)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PayStubRecord {
    pub check_number: i64,
    pub net_pay_cents: Option<i64>,
    pub bank_code: Option<String>,
    pub record_type: String,
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Look up an employee by public employee number.
    async fn fetch_employee(&self, employee_number: i64) -> StoreResult<Option<EmployeeRecord>>;

    /// Pay stubs for an internal id, most recent first. Unknown ids yield an
    /// empty list.
    async fn fetch_pay_stubs(&self, internal_id: i64) -> StoreResult<Vec<PayStubRecord>>;

    /// Cheap reachability probe used by health checks.
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// In-memory store backed by fixture records.
#[derive(Clone, Debug)]
pub struct MockStore {
    employees: Arc<Vec<EmployeeRecord>>,
    pay_stubs: Arc<HashMap<i64, Vec<PayStubRecord>>>,
    offline: bool,
}

impl MockStore {
    pub fn new(
        employees: Vec<EmployeeRecord>,
        pay_stubs: impl IntoIterator<Item = (i64, Vec<PayStubRecord>)>,
    ) -> Self {
        Self {
            employees: Arc::new(employees),
            pay_stubs: Arc::new(pay_stubs.into_iter().collect()),
            offline: false,
        }
    }

    /// A store whose every call fails as unavailable.
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::new(Vec::new(), [])
        }
    }

    pub fn employees(&self) -> &[EmployeeRecord] {
        &self.employees
    }

    pub fn pay_stubs_for(&self, internal_id: i64) -> &[PayStubRecord] {
        self.pay_stubs
            .get(&internal_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn ensure_online(&self) -> StoreResult<()> {
        if self.offline {
            Err(StoreError::Unavailable("mock store is offline".into()))
        } else {
            Ok(())
        }
    }
}

impl Default for MockStore {
    fn default() -> Self {
        let employee = demo_employee();
        let stubs = demo_pay_stubs();
        let internal_id = employee.internal_id;
        Self::new(vec![employee], [(internal_id, stubs)])
    }
}

#[async_trait]
impl RecordStore for MockStore {
    async fn fetch_employee(&self, employee_number: i64) -> StoreResult<Option<EmployeeRecord>> {
        self.ensure_online()?;
        Ok(self
            .employees
            .iter()
            .find(|record| record.employee_number == employee_number)
            .cloned())
    }

    async fn fetch_pay_stubs(&self, internal_id: i64) -> StoreResult<Vec<PayStubRecord>> {
        self.ensure_online()?;
        Ok(self.pay_stubs_for(internal_id).to_vec())
    }

    async fn ping(&self) -> StoreResult<()> {
        self.ensure_online()
    }
}

/// The fixture employee served by the default mock store.
pub fn demo_employee() -> EmployeeRecord {
    EmployeeRecord {
        employee_number: 123,
        internal_id: -999_999_900,
        first_name: Some("JOHN      ".into()),
        middle_name: Some("V".into()),
        last_name: Some("SMITH     ".into()),
        street_address: Some("WHOSIT ST, BOX 1".into()),
        city: Some("DEMING    ".into()),
        state_code: Some("NM".into()),
        zip_code: Some(88030),
        ssn: Some("123456789".into()),
        hire_date_code: Some(19750201),
        birth_date_code: Some(19551027),
        department: Some("ASSESSOR  ".into()),
        position: Some("SEN APPRAISER".into()),
        status_code: 1,
        employment_type_code: Some("F".into()),
        permanence_code: Some("P".into()),
    }
}

pub fn demo_pay_stubs() -> Vec<PayStubRecord> {
    [1_033_678, 1_033_500]
        .into_iter()
        .map(|check_number| PayStubRecord {
            check_number,
            net_pay_cents: Some(250_000),
            bank_code: Some("02".into()),
            record_type: "D".into(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_store_serves_fixtures() {
        let store = MockStore::default();
        let employee = store.fetch_employee(123).await.unwrap().unwrap();
        assert_eq!(employee.internal_id, -999_999_900);
        let stubs = store.fetch_pay_stubs(employee.internal_id).await.unwrap();
        assert_eq!(stubs.len(), 2);
        assert_eq!(stubs[0].check_number, 1_033_678);
    }

    #[tokio::test]
    async fn unknown_keys_are_absent_not_errors() {
        let store = MockStore::default();
        assert!(store.fetch_employee(999).await.unwrap().is_none());
        assert!(store.fetch_pay_stubs(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn offline_store_reports_unavailable() {
        let store = MockStore::offline();
        assert!(matches!(
            store.fetch_employee(123).await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(store.ping().await.is_err());
    }

    #[test]
    fn debug_output_masks_ssn() {
        let rendered = format!("{:?}", demo_employee());
        assert!(!rendered.contains("123456789"));
        assert!(rendered.contains("XXX-XX-6789"));
    }

    #[test]
    fn classification_codes() {
        let mut record = demo_employee();
        assert!(record.is_active() && record.is_full_time() && record.is_permanent());
        record.status_code = 2;
        record.employment_type_code = Some("P".into());
        record.permanence_code = None;
        assert!(!record.is_active());
        assert!(!record.is_full_time());
        assert!(!record.is_permanent());
    }
}
