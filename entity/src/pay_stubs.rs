use crate::employees;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "pay_stubs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub employee_internal_id: i64,
    pub check_number: i64,
    pub net_pay_cents: Option<i64>,
    pub bank_code: Option<String>,
    pub record_type: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "employees::Entity",
        from = "Column::EmployeeInternalId",
        to = "employees::Column::InternalId"
    )]
    Employee,
}

impl Related<employees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
