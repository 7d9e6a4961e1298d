use std::hint::black_box;

use tracing::debug;

use crate::{
    error::{HrError, HrResult},
    format::ascii_digits,
    store::{EmployeeRecord, RecordStore},
};

/// Shortest SSN fragment accepted as a credential.
pub const MIN_FRAGMENT_DIGITS: usize = 4;
const FULL_SSN_DIGITS: usize = 9;

/// Validated SSN digits supplied by a caller: the last four or all nine.
#[derive(Clone, PartialEq, Eq)]
pub struct SsnFragment(String);

impl SsnFragment {
    /// Accepts `6789`, `123456789` or `123-45-6789`. Anything else is
    /// rejected before it reaches the store.
    pub fn parse(raw: &str) -> HrResult<Self> {
        let compact: String = raw
            .trim()
            .chars()
            .filter(|ch| *ch != '-' && !ch.is_whitespace())
            .collect();
        let valid_length = matches!(compact.len(), MIN_FRAGMENT_DIGITS | FULL_SSN_DIGITS);
        if !valid_length || !compact.chars().all(|ch| ch.is_ascii_digit()) {
            return Err(HrError::InvalidInput(
                "SSN must be the last 4 digits or all 9 digits".into(),
            ));
        }
        Ok(Self(compact))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SsnFragment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SsnFragment(..)")
    }
}

/// Checks employee number + SSN fragment pairs against a record store.
#[derive(Clone, Debug)]
pub struct Authenticator<S> {
    store: S,
}

impl<S: RecordStore> Authenticator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// `Ok(false)` when the employee is unknown or the fragment does not
    /// match. Store failures are returned as errors.
    pub async fn authenticate(&self, employee_number: i64, ssn_fragment: &str) -> HrResult<bool> {
        Ok(self.verify(employee_number, ssn_fragment).await?.is_some())
    }

    /// Like [`Self::authenticate`] but hands back the matched record, so a
    /// login needs a single store lookup.
    pub async fn verify(
        &self,
        employee_number: i64,
        ssn_fragment: &str,
    ) -> HrResult<Option<EmployeeRecord>> {
        let Some(record) = self.store.fetch_employee(employee_number).await? else {
            debug!(employee_number, "no employee record");
            return Ok(None);
        };
        if ssn_matches(record.ssn.as_deref(), ssn_fragment) {
            Ok(Some(record))
        } else {
            Ok(None)
        }
    }
}

/// Compare a fragment against the tail of the stored SSN of equal length.
pub fn ssn_matches(stored: Option<&str>, fragment: &str) -> bool {
    let stored = ascii_digits(stored.unwrap_or_default());
    let fragment = ascii_digits(fragment);
    if fragment.len() < MIN_FRAGMENT_DIGITS || fragment.len() > stored.len() {
        return false;
    }
    let tail = &stored.as_bytes()[stored.len() - fragment.len()..];
    constant_time_eq(tail, fragment.as_bytes())
}

// Runs over every byte regardless of where the first mismatch sits.
fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    let diff = left
        .iter()
        .zip(right)
        .fold(0u8, |acc, (l, r)| black_box(acc | (l ^ r)));
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MockStore, StoreError};

    #[tokio::test]
    async fn accepts_last_four_and_full_ssn() {
        let auth = Authenticator::new(MockStore::default());
        assert!(auth.authenticate(123, "6789").await.unwrap());
        assert!(auth.authenticate(123, "123456789").await.unwrap());
        assert!(auth.authenticate(123, "123-45-6789").await.unwrap());
    }

    #[tokio::test]
    async fn rejects_wrong_fragment() {
        let auth = Authenticator::new(MockStore::default());
        assert!(!auth.authenticate(123, "0000").await.unwrap());
        assert!(!auth.authenticate(123, "6788").await.unwrap());
        assert!(!auth.authenticate(123, "").await.unwrap());
        assert!(!auth.authenticate(123, "789").await.unwrap());
        assert!(!auth.authenticate(123, "1123456789").await.unwrap());
    }

    #[tokio::test]
    async fn unknown_employee_never_authenticates() {
        let auth = Authenticator::new(MockStore::default());
        for employee_number in [0, 1, 124, -123, i64::MAX] {
            for fragment in ["6789", "123456789", "0000"] {
                assert!(!auth.authenticate(employee_number, fragment).await.unwrap());
            }
        }
    }

    #[tokio::test]
    async fn store_failure_is_not_a_rejection() {
        let auth = Authenticator::new(MockStore::offline());
        let err = auth.authenticate(123, "6789").await.unwrap_err();
        assert!(matches!(err, HrError::Unavailable(_)));
        let err: HrError = StoreError::Unavailable("down".into()).into();
        assert!(matches!(err, HrError::Unavailable(reason) if reason == "down"));
    }

    #[tokio::test]
    async fn verify_returns_matched_record() {
        let auth = Authenticator::new(MockStore::default());
        let record = auth.verify(123, "6789").await.unwrap().unwrap();
        assert_eq!(record.employee_number, 123);
        assert!(auth.verify(123, "1111").await.unwrap().is_none());
    }

    #[test]
    fn missing_stored_ssn_never_matches() {
        assert!(!ssn_matches(None, "6789"));
        assert!(!ssn_matches(Some("12"), "0012"));
    }

    #[test]
    fn parses_fragments() {
        assert_eq!(SsnFragment::parse(" 6789 ").unwrap().as_str(), "6789");
        assert_eq!(SsnFragment::parse("123-45-6789").unwrap().as_str(), "123456789");
        assert!(SsnFragment::parse("67a9").is_err());
        assert!(SsnFragment::parse("678").is_err());
        assert!(SsnFragment::parse("12345").is_err());
        assert!(SsnFragment::parse("").is_err());
    }

    #[test]
    fn fragment_debug_hides_digits() {
        let fragment = SsnFragment::parse("6789").unwrap();
        assert!(!format!("{fragment:?}").contains("6789"));
    }

    #[test]
    fn constant_time_eq_compares_whole_slices() {
        assert!(constant_time_eq(b"6789", b"6789"));
        assert!(!constant_time_eq(b"6789", b"0789"));
        assert!(!constant_time_eq(b"6789", b"6780"));
        assert!(!constant_time_eq(b"6789", b"67890"));
    }
}
