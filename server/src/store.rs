use async_trait::async_trait;
use platform_db::LiveStore;
use products_hr::{
    EmployeeRecord, MockStore, PayStubRecord, RecordStore, store::StoreResult,
};

use crate::config::StoreKind;

/// Record store picked once at start-up.
#[derive(Clone, Debug)]
pub enum Store {
    Mock(MockStore),
    Live(LiveStore),
}

impl Store {
    pub fn kind(&self) -> StoreKind {
        match self {
            Store::Mock(_) => StoreKind::Mock,
            Store::Live(_) => StoreKind::Live,
        }
    }
}

#[async_trait]
impl RecordStore for Store {
    async fn fetch_employee(&self, employee_number: i64) -> StoreResult<Option<EmployeeRecord>> {
        match self {
            Store::Mock(store) => store.fetch_employee(employee_number).await,
            Store::Live(store) => store.fetch_employee(employee_number).await,
        }
    }

    async fn fetch_pay_stubs(&self, internal_id: i64) -> StoreResult<Vec<PayStubRecord>> {
        match self {
            Store::Mock(store) => store.fetch_pay_stubs(internal_id).await,
            Store::Live(store) => store.fetch_pay_stubs(internal_id).await,
        }
    }

    async fn ping(&self) -> StoreResult<()> {
        match self {
            Store::Mock(store) => store.ping().await,
            Store::Live(store) => store.ping().await,
        }
    }
}
