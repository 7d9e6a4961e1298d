//! HR vertical slice: employee self-service.
//!
//! Employees sign in with their employee number and part of their SSN, then
//! read their own profile and pay-stub history. Raw payroll rows come from a
//! [`RecordStore`]; everything shown to a client goes through the codecs in
//! [`format`].

pub mod auth;
pub mod error;
pub mod format;
pub mod profile;
pub mod store;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, instrument};

pub use auth::{Authenticator, SsnFragment};
pub use error::{HrError, HrResult};
pub use profile::{EmployeeProfile, LoginSummary, PayStubList, PayStubSummary};
pub use store::{EmployeeRecord, MockStore, PayStubRecord, RecordStore, StoreError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginOutcome {
    Accepted(LoginSummary),
    Rejected,
}

/// Profile and pay stubs for one signed-in employee.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeOverview {
    pub profile: EmployeeProfile,
    pub pay_stubs: PayStubList,
}

/// Self-service operations over a record store.
#[derive(Clone, Debug)]
pub struct HrModule<S> {
    store: S,
    auth: Authenticator<S>,
}

impl<S: RecordStore + Clone> HrModule<S> {
    pub fn new(store: S) -> Self {
        Self {
            auth: Authenticator::new(store.clone()),
            store,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    #[instrument(name = "hr.login", skip(self, ssn))]
    pub async fn login(&self, employee_number: i64, ssn: &SsnFragment) -> HrResult<LoginOutcome> {
        let outcome = match self.auth.verify(employee_number, ssn.as_str()).await? {
            Some(record) => LoginOutcome::Accepted(LoginSummary::from_record(&record)),
            None => LoginOutcome::Rejected,
        };
        info!(
            employee_number,
            accepted = matches!(outcome, LoginOutcome::Accepted(_)),
            "login attempt"
        );
        Ok(outcome)
    }

    #[instrument(name = "hr.employee_profile", skip(self))]
    pub async fn employee_profile(
        &self,
        employee_number: i64,
        today: NaiveDate,
    ) -> HrResult<EmployeeProfile> {
        let record = self
            .store
            .fetch_employee(employee_number)
            .await?
            .ok_or(HrError::NotFound)?;
        Ok(EmployeeProfile::from_record(&record, today))
    }

    #[instrument(name = "hr.pay_stubs", skip(self))]
    pub async fn pay_stubs(
        &self,
        internal_id: i64,
        check_filter: Option<&str>,
    ) -> HrResult<PayStubList> {
        let stubs = self.store.fetch_pay_stubs(internal_id).await?;
        Ok(PayStubList::from_records(&stubs, check_filter))
    }

    /// Both lookups run concurrently; they are keyed independently.
    pub async fn overview(
        &self,
        employee_number: i64,
        internal_id: i64,
        today: NaiveDate,
    ) -> HrResult<EmployeeOverview> {
        let (profile, pay_stubs) = tokio::try_join!(
            self.employee_profile(employee_number, today),
            self.pay_stubs(internal_id, None),
        )?;
        Ok(EmployeeOverview { profile, pay_stubs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module() -> HrModule<MockStore> {
        HrModule::new(MockStore::default())
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[tokio::test]
    async fn login_accepts_matching_fragment() {
        let fragment = SsnFragment::parse("6789").unwrap();
        let outcome = module().login(123, &fragment).await.unwrap();
        let LoginOutcome::Accepted(summary) = outcome else {
            panic!("expected login to succeed");
        };
        assert_eq!(summary.id, "123");
        assert_eq!(summary.hidden_id, -999_999_900);
    }

    #[tokio::test]
    async fn login_rejects_mismatch_and_unknown_employee() {
        let fragment = SsnFragment::parse("0000").unwrap();
        assert_eq!(
            module().login(123, &fragment).await.unwrap(),
            LoginOutcome::Rejected
        );
        let fragment = SsnFragment::parse("6789").unwrap();
        assert_eq!(
            module().login(456, &fragment).await.unwrap(),
            LoginOutcome::Rejected
        );
    }

    #[tokio::test]
    async fn login_surfaces_outage() {
        let fragment = SsnFragment::parse("6789").unwrap();
        let err = HrModule::new(MockStore::offline())
            .login(123, &fragment)
            .await
            .unwrap_err();
        assert!(matches!(err, HrError::Unavailable(_)));
    }

    #[tokio::test]
    async fn missing_profile_is_not_found() {
        let err = module().employee_profile(404, today()).await.unwrap_err();
        assert!(matches!(err, HrError::NotFound));
    }

    #[tokio::test]
    async fn overview_combines_profile_and_stubs() {
        let overview = module().overview(123, -999_999_900, today()).await.unwrap();
        assert_eq!(overview.profile.name.full, "JOHN V SMITH");
        assert_eq!(overview.pay_stubs.count, 2);
    }

    #[tokio::test]
    async fn unknown_internal_id_has_no_stubs() {
        let list = module().pay_stubs(42, None).await.unwrap();
        assert_eq!(list.count, 0);
        assert!(list.pay_stubs.is_empty());
    }
}
