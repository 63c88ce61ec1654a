//! Companies and their membership

use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;
use validator::Validate;
use workdesk_db::entities::{company, department, user, Company, Department, User};

use super::{find_company, find_company_user, find_user, headed_department};
use crate::error::{ServiceError, ServiceResult};
use crate::middleware::{require_admin, require_member_of};
use crate::models::CreateCompanyRequest;

/// Create a company; the creator joins it as its admin
pub async fn create_company(
    db: &DatabaseConnection,
    creator: &user::Model,
    req: CreateCompanyRequest,
) -> ServiceResult<company::Model> {
    require_admin(creator)?;
    if creator.company_id.is_some() {
        return Err(ServiceError::conflict("You already belong to a company"));
    }

    req.validate()?;
    let name = req.name.trim().to_string();
    if name.is_empty() {
        return Err(ServiceError::bad_request("name must not be blank"));
    }

    let txn = db.begin().await?;

    let taken = Company::find()
        .filter(company::Column::Name.eq(name.as_str()))
        .one(&txn)
        .await?;
    if taken.is_some() {
        return Err(ServiceError::conflict(format!(
            "Company '{}' already exists",
            name
        )));
    }

    let created = company::ActiveModel {
        name: Set(name),
        description: Set(req.description),
        company_code: Set(req.company_code),
        admin_code: Set(req.admin_code),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut active: user::ActiveModel = creator.clone().into();
    active.company_id = Set(Some(created.id));
    active.company_role = Set(user::CompanyRole::Admin);
    active.update(&txn).await?;

    txn.commit().await?;

    info!("Company {} created by user {}", created.id, creator.id);
    Ok(created)
}

/// Admin: bring a company-less user into the company
pub async fn add_user(
    db: &DatabaseConnection,
    caller: &user::Model,
    company_id: i32,
    user_id: i32,
) -> ServiceResult<user::Model> {
    require_admin(caller)?;

    let txn = db.begin().await?;
    find_company(&txn, company_id).await?;
    require_member_of(caller, company_id)?;

    let target = find_user(&txn, user_id).await?;
    if target.company_id.is_some() {
        return Err(ServiceError::conflict(format!(
            "User {} already belongs to a company",
            user_id
        )));
    }

    let mut active: user::ActiveModel = target.into();
    active.company_id = Set(Some(company_id));
    active.department_id = Set(None);
    let updated = active.update(&txn).await?;

    txn.commit().await?;

    info!("User {} added to company {}", user_id, company_id);
    Ok(updated)
}

/// Admin: detach a member from the company and from their department
pub async fn remove_user(
    db: &DatabaseConnection,
    caller: &user::Model,
    company_id: i32,
    user_id: i32,
) -> ServiceResult<user::Model> {
    require_admin(caller)?;

    let txn = db.begin().await?;
    find_company(&txn, company_id).await?;
    require_member_of(caller, company_id)?;

    let target = find_company_user(&txn, company_id, user_id).await?;
    if headed_department(&txn, target.id).await?.is_some() {
        return Err(ServiceError::conflict(
            "User heads a department; change the head first",
        ));
    }

    let mut active: user::ActiveModel = target.into();
    active.company_id = Set(None);
    active.department_id = Set(None);
    let updated = active.update(&txn).await?;

    txn.commit().await?;

    info!("User {} removed from company {}", user_id, company_id);
    Ok(updated)
}

/// Members of the caller's company
pub async fn list_users(
    db: &DatabaseConnection,
    caller: &user::Model,
    company_id: i32,
) -> ServiceResult<Vec<user::Model>> {
    require_member_of(caller, company_id)?;

    Ok(User::find()
        .filter(user::Column::CompanyId.eq(company_id))
        .order_by_asc(user::Column::Id)
        .all(db)
        .await?)
}

/// Admin: delete the company with its departments and detach every member
pub async fn delete_company(
    db: &DatabaseConnection,
    caller: &user::Model,
    company_id: i32,
) -> ServiceResult<()> {
    require_admin(caller)?;

    let txn = db.begin().await?;
    let target = find_company(&txn, company_id).await?;
    require_member_of(caller, company_id)?;

    let departments = Department::delete_many()
        .filter(department::Column::CompanyId.eq(company_id))
        .exec(&txn)
        .await?;

    let members = User::update_many()
        .col_expr(user::Column::CompanyId, Expr::value(Option::<i32>::None))
        .col_expr(user::Column::DepartmentId, Expr::value(Option::<i32>::None))
        .filter(user::Column::CompanyId.eq(company_id))
        .exec(&txn)
        .await?;

    target.delete(&txn).await?;
    txn.commit().await?;

    info!(
        "Company {} deleted by user {} ({} departments removed, {} members detached)",
        company_id, caller.id, departments.rows_affected, members.rows_affected
    );
    Ok(())
}
