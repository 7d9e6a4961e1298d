//! sea-orm entities mirroring the payroll master tables.

pub mod employees;
pub mod pay_stubs;
