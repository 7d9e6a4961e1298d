use async_graphql::SimpleObject;
use products_hr::{EmployeeOverview, EmployeeProfile, PayStubList};

use crate::session::Identity;

/// Everything the dashboard shows for the signed-in employee.
#[derive(Clone, Debug, SimpleObject)]
pub struct MePayload {
    pub employee_number: i64,
    pub session_expires_at: String,
    pub profile: EmployeeProfile,
    pub pay_stubs: PayStubList,
}

impl MePayload {
    pub fn from_overview(identity: &Identity, overview: EmployeeOverview) -> Self {
        Self {
            employee_number: identity.employee_number,
            session_expires_at: identity.expires_at.to_rfc3339(),
            profile: overview.profile,
            pay_stubs: overview.pay_stubs,
        }
    }
}
