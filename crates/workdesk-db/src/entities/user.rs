//! User entity: accounts and their place in the org structure

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role of a user inside their company
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "lowercase")]
pub enum CompanyRole {
    /// Regular employee
    #[sea_orm(string_value = "employee")]
    Employee,

    /// Manager: may run meetings and rate tasks
    #[sea_orm(string_value = "manager")]
    Manager,

    /// Company administrator: manages the org structure
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl CompanyRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanyRole::Employee => "employee",
            CompanyRole::Manager => "manager",
            CompanyRole::Admin => "admin",
        }
    }

    /// Managers and admins
    pub fn is_manager_or_above(&self) -> bool {
        matches!(self, CompanyRole::Manager | CompanyRole::Admin)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub first_name: String,

    pub last_name: String,

    /// Login email (unique)
    #[sea_orm(unique)]
    pub email: String,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub company_role: CompanyRole,

    /// Company the user belongs to, if any
    pub company_id: Option<i32>,

    /// Department inside `company_id`, if any
    pub department_id: Option<i32>,

    pub is_active: bool,

    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::CompanyId",
        to = "super::company::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Company,

    #[sea_orm(
        belongs_to = "super::department::Entity",
        from = "Column::DepartmentId",
        to = "super::department::Column::Id"
    )]
    Department,

    /// Calendar events of the user
    #[sea_orm(has_many = "super::calendar_event::Entity")]
    CalendarEvents,
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl Related<super::department::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Department.def()
    }
}

impl Related<super::calendar_event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CalendarEvents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
