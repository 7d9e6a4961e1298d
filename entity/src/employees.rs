use crate::pay_stubs;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub employee_number: i64,
    #[sea_orm(unique)]
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

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "pay_stubs::Entity")]
    PayStubs,
}

impl Related<pay_stubs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PayStubs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
