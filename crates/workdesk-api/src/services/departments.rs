//! Departments: creation, head changes, membership and deletion
//!
//! A department always has exactly one head. The head and every member
//! carry the department's id in `users.department_id`, and that id is only
//! ever set for users of the department's own company.

use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;
use validator::Validate;
use workdesk_db::entities::{department, user, Department, User};

use super::{find_company_user, headed_department};
use crate::error::{ServiceError, ServiceResult};
use crate::middleware::{require_admin, require_member_of};
use crate::models::CreateDepartmentRequest;

async fn find_company_department<C: ConnectionTrait>(
    conn: &C,
    company_id: i32,
    department_id: i32,
) -> ServiceResult<department::Model> {
    Department::find_by_id(department_id)
        .one(conn)
        .await?
        .filter(|d| d.company_id == company_id)
        .ok_or_else(|| {
            ServiceError::not_found(format!(
                "Department {} not found in company {}",
                department_id, company_id
            ))
        })
}

/// A user may head at most one department
async fn ensure_not_heading_other<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    department_id: Option<i32>,
) -> ServiceResult<()> {
    match headed_department(conn, user_id).await? {
        Some(headed) if Some(headed.id) != department_id => Err(ServiceError::conflict(format!(
            "User {} already heads department '{}'",
            user_id, headed.name
        ))),
        _ => Ok(()),
    }
}

async fn set_department<C: ConnectionTrait>(
    conn: &C,
    member: user::Model,
    department_id: Option<i32>,
) -> ServiceResult<user::Model> {
    let mut active: user::ActiveModel = member.into();
    active.department_id = Set(department_id);
    Ok(active.update(conn).await?)
}

/// Admin: create a department headed by an in-company user
pub async fn create_department(
    db: &DatabaseConnection,
    caller: &user::Model,
    company_id: i32,
    req: CreateDepartmentRequest,
) -> ServiceResult<department::Model> {
    require_admin(caller)?;
    require_member_of(caller, company_id)?;

    req.validate()?;
    let name = req.name.trim().to_string();
    if name.is_empty() {
        return Err(ServiceError::bad_request("name must not be blank"));
    }

    let txn = db.begin().await?;

    let taken = Department::find()
        .filter(department::Column::Name.eq(name.as_str()))
        .one(&txn)
        .await?;
    if taken.is_some() {
        return Err(ServiceError::conflict(format!(
            "Department '{}' already exists",
            name
        )));
    }

    let head = find_company_user(&txn, company_id, req.head_user_id).await?;
    ensure_not_heading_other(&txn, head.id, None).await?;

    let created = department::ActiveModel {
        name: Set(name),
        company_id: Set(company_id),
        head_user_id: Set(head.id),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    set_department(&txn, head, Some(created.id)).await?;

    txn.commit().await?;

    info!(
        "Department {} created in company {} by user {}",
        created.id, company_id, caller.id
    );
    Ok(created)
}

pub async fn list_departments(
    db: &DatabaseConnection,
    caller: &user::Model,
    company_id: i32,
) -> ServiceResult<Vec<department::Model>> {
    require_member_of(caller, company_id)?;

    Ok(Department::find()
        .filter(department::Column::CompanyId.eq(company_id))
        .order_by_asc(department::Column::Id)
        .all(db)
        .await?)
}

/// Admin: hand the department over to another in-company user
pub async fn change_head_user(
    db: &DatabaseConnection,
    caller: &user::Model,
    company_id: i32,
    department_id: i32,
    new_head_id: i32,
) -> ServiceResult<department::Model> {
    require_admin(caller)?;
    require_member_of(caller, company_id)?;

    let txn = db.begin().await?;
    let dep = find_company_department(&txn, company_id, department_id).await?;
    let new_head = find_company_user(&txn, company_id, new_head_id).await?;

    if dep.head_user_id == new_head.id {
        txn.commit().await?;
        return Ok(dep);
    }
    ensure_not_heading_other(&txn, new_head.id, Some(dep.id)).await?;

    // The previous head may already be gone
    if let Some(previous) = User::find_by_id(dep.head_user_id).one(&txn).await? {
        if previous.department_id == Some(dep.id) {
            set_department(&txn, previous, None).await?;
        }
    }

    let mut active: department::ActiveModel = dep.into();
    active.head_user_id = Set(new_head.id);
    let updated = active.update(&txn).await?;

    set_department(&txn, new_head, Some(updated.id)).await?;

    txn.commit().await?;

    info!(
        "Department {} head changed to user {} by {}",
        updated.id, new_head_id, caller.id
    );
    Ok(updated)
}

/// Admin: delete the department after detaching its members
pub async fn delete_department(
    db: &DatabaseConnection,
    caller: &user::Model,
    company_id: i32,
    department_id: i32,
) -> ServiceResult<()> {
    require_admin(caller)?;
    require_member_of(caller, company_id)?;

    let txn = db.begin().await?;
    let dep = find_company_department(&txn, company_id, department_id).await?;

    let detached = User::update_many()
        .col_expr(user::Column::DepartmentId, Expr::value(Option::<i32>::None))
        .filter(user::Column::DepartmentId.eq(dep.id))
        .exec(&txn)
        .await?;

    dep.delete(&txn).await?;
    txn.commit().await?;

    info!(
        "Department {} deleted by user {} ({} members detached)",
        department_id, caller.id, detached.rows_affected
    );
    Ok(())
}

/// Admin: place an in-company user into the department
pub async fn add_member(
    db: &DatabaseConnection,
    caller: &user::Model,
    company_id: i32,
    department_id: i32,
    user_id: i32,
) -> ServiceResult<user::Model> {
    require_admin(caller)?;
    require_member_of(caller, company_id)?;

    let txn = db.begin().await?;
    let dep = find_company_department(&txn, company_id, department_id).await?;
    let member = find_company_user(&txn, company_id, user_id).await?;
    ensure_not_heading_other(&txn, member.id, Some(dep.id)).await?;

    let updated = set_department(&txn, member, Some(dep.id)).await?;
    txn.commit().await?;

    info!("User {} added to department {}", user_id, department_id);
    Ok(updated)
}
