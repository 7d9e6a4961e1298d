//! Response shapes served to the portal pages.

use async_graphql::SimpleObject;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::{
    format::{clean, date_year, decode_date, encode_currency, full_name, mask_ssn},
    store::{EmployeeRecord, PayStubRecord},
};

/// Identity returned by a successful login.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct LoginSummary {
    pub id: String,
    pub hidden_id: i64,
    pub name: String,
    pub first_name: String,
    pub position: String,
    pub department: String,
}

impl LoginSummary {
    pub fn from_record(record: &EmployeeRecord) -> Self {
        Self {
            id: record.employee_number.to_string(),
            hidden_id: record.internal_id,
            name: full_name(record.first_name.as_deref(), None, record.last_name.as_deref()),
            first_name: clean(record.first_name.as_deref()),
            position: clean(record.position.as_deref()),
            department: clean(record.department.as_deref()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeProfile {
    pub employee_number: String,
    pub employee_hidden_id: i64,
    pub name: PersonName,
    pub department: String,
    pub position: String,
    pub hire_date: Option<String>,
    pub date_of_birth: Option<String>,
    pub years_of_service: Option<i32>,
    pub ssn: String,
    pub address: Address,
    pub employment: Employment,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, SimpleObject)]
pub struct PersonName {
    pub first: String,
    pub middle: String,
    pub last: String,
    pub full: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, SimpleObject)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, SimpleObject)]
pub struct Employment {
    #[serde(rename = "type")]
    #[graphql(name = "type")]
    pub kind: String,
    pub status: String,
    pub permanent: String,
}

impl EmployeeProfile {
    /// Shape a raw record. `today` anchors the years-of-service figure.
    pub fn from_record(record: &EmployeeRecord, today: NaiveDate) -> Self {
        let first = record.first_name.as_deref();
        let middle = record.middle_name.as_deref();
        let last = record.last_name.as_deref();
        Self {
            employee_number: record.employee_number.to_string(),
            employee_hidden_id: record.internal_id,
            name: PersonName {
                first: clean(first),
                middle: clean(middle),
                last: clean(last),
                full: full_name(first, middle, last),
            },
            department: clean(record.department.as_deref()),
            position: clean(record.position.as_deref()),
            hire_date: decode_date(record.hire_date_code),
            date_of_birth: decode_date(record.birth_date_code),
            years_of_service: years_of_service(record.hire_date_code, today),
            ssn: mask_ssn(record.ssn.as_deref()),
            address: Address {
                street: clean(record.street_address.as_deref()),
                city: clean(record.city.as_deref()),
                state: clean(record.state_code.as_deref()),
                zip: record.zip_code.map(|zip| zip.to_string()).unwrap_or_default(),
            },
            employment: Employment {
                kind: label(record.is_full_time(), "Full Time", "Part Time"),
                status: label(record.is_active(), "Active", "Inactive"),
                permanent: label(record.is_permanent(), "Permanent", "Temporary"),
            },
        }
    }
}

fn label(flag: bool, yes: &str, no: &str) -> String {
    let text = if flag { yes } else { no };
    text.to_string()
}

/// Calendar years between the hire year and `today`, never negative.
pub fn years_of_service(hire_date_code: Option<i64>, today: NaiveDate) -> Option<i32> {
    date_year(hire_date_code).map(|hired| (today.year() - hired).max(0))
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct PayStubSummary {
    pub check_number: i64,
    pub net_pay: String,
    /// Exact cents, for consumers that must not parse `net_pay`.
    pub net_pay_raw: Option<i64>,
    pub bank: Option<String>,
    pub record_type: String,
}

impl From<&PayStubRecord> for PayStubSummary {
    fn from(stub: &PayStubRecord) -> Self {
        Self {
            check_number: stub.check_number,
            net_pay: encode_currency(stub.net_pay_cents),
            net_pay_raw: stub.net_pay_cents,
            bank: stub.bank_code.as_deref().map(|bank| clean(Some(bank))),
            record_type: clean(Some(&stub.record_type)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct PayStubList {
    pub pay_stubs: Vec<PayStubSummary>,
    pub count: usize,
    /// Net pay of the most recent stub in the list.
    pub latest_net_pay: Option<String>,
}

impl PayStubList {
    /// Build the list, keeping only stubs whose check number contains
    /// `check_filter` when one is given.
    pub fn from_records(records: &[PayStubRecord], check_filter: Option<&str>) -> Self {
        let needle = check_filter.map(str::trim).filter(|needle| !needle.is_empty());
        let pay_stubs: Vec<PayStubSummary> = records
            .iter()
            .filter(|stub| needle.is_none_or(|needle| stub.check_number.to_string().contains(needle)))
            .map(PayStubSummary::from)
            .collect();
        Self {
            count: pay_stubs.len(),
            latest_net_pay: pay_stubs.first().map(|stub| stub.net_pay.clone()),
            pay_stubs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{demo_employee, demo_pay_stubs};
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn login_summary_trims_fields() {
        let summary = LoginSummary::from_record(&demo_employee());
        assert_eq!(
            serde_json::to_value(summary).unwrap(),
            json!({
                "id": "123",
                "hiddenId": -999999900,
                "name": "JOHN SMITH",
                "firstName": "JOHN",
                "position": "SEN APPRAISER",
                "department": "ASSESSOR",
            })
        );
    }

    #[test]
    fn profile_matches_portal_shape() {
        let profile = EmployeeProfile::from_record(&demo_employee(), today());
        assert_eq!(
            serde_json::to_value(profile).unwrap(),
            json!({
                "employeeNumber": "123",
                "employeeHiddenId": -999999900,
                "name": {
                    "first": "JOHN",
                    "middle": "V",
                    "last": "SMITH",
                    "full": "JOHN V SMITH",
                },
                "department": "ASSESSOR",
                "position": "SEN APPRAISER",
                "hireDate": "02/01/1975",
                "dateOfBirth": "10/27/1955",
                "yearsOfService": 51,
                "ssn": "XXX-XX-6789",
                "address": {
                    "street": "WHOSIT ST, BOX 1",
                    "city": "DEMING",
                    "state": "NM",
                    "zip": "88030",
                },
                "employment": {
                    "type": "Full Time",
                    "status": "Active",
                    "permanent": "Permanent",
                },
            })
        );
    }

    #[test]
    fn sparse_record_renders_empty_strings_and_nulls() {
        let record = EmployeeRecord {
            employee_number: 7,
            internal_id: 70,
            ..EmployeeRecord::default()
        };
        let profile = EmployeeProfile::from_record(&record, today());
        assert_eq!(profile.name.full, "");
        assert_eq!(profile.hire_date, None);
        assert_eq!(profile.years_of_service, None);
        assert_eq!(profile.ssn, "XXX-XX-XXXX");
        assert_eq!(profile.address.zip, "");
        assert_eq!(profile.employment.kind, "Part Time");
        assert_eq!(profile.employment.status, "Inactive");
        assert_eq!(profile.employment.permanent, "Temporary");
    }

    #[test]
    fn years_of_service_never_negative() {
        assert_eq!(years_of_service(Some(20300101), today()), Some(0));
        assert_eq!(years_of_service(Some(20260101), today()), Some(0));
        assert_eq!(years_of_service(Some(20000101), today()), Some(26));
    }

    #[test]
    fn pay_stub_list_keeps_raw_cents() {
        let list = PayStubList::from_records(&demo_pay_stubs(), None);
        assert_eq!(
            serde_json::to_value(list).unwrap(),
            json!({
                "payStubs": [
                    {"checkNumber": 1033678, "netPay": "$2,500.00", "netPayRaw": 250000, "bank": "02", "recordType": "D"},
                    {"checkNumber": 1033500, "netPay": "$2,500.00", "netPayRaw": 250000, "bank": "02", "recordType": "D"},
                ],
                "count": 2,
                "latestNetPay": "$2,500.00",
            })
        );
    }

    #[test]
    fn pay_stub_list_filters_by_check_number() {
        let list = PayStubList::from_records(&demo_pay_stubs(), Some("3500"));
        assert_eq!(list.count, 1);
        assert_eq!(list.pay_stubs[0].check_number, 1_033_500);

        let list = PayStubList::from_records(&demo_pay_stubs(), Some("  "));
        assert_eq!(list.count, 2);

        let list = PayStubList::from_records(&demo_pay_stubs(), Some("42"));
        assert_eq!(list.count, 0);
        assert_eq!(list.latest_net_pay, None);
    }

    #[test]
    fn missing_net_pay_renders_zero() {
        let stub = PayStubRecord {
            check_number: 1,
            net_pay_cents: None,
            bank_code: None,
            record_type: "V".into(),
        };
        let summary = PayStubSummary::from(&stub);
        assert_eq!(summary.net_pay, "$0.00");
        assert_eq!(summary.net_pay_raw, None);
        assert_eq!(summary.bank, None);
    }
}
