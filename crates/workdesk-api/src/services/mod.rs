//! Domain services
//!
//! Every public operation opens one transaction, issues all of its queries
//! on it and commits once at the end of the success path. Returning early
//! with an error drops the transaction, which rolls it back.

pub mod calendar;
pub mod comments;
pub mod companies;
pub mod departments;
pub mod meetings;
pub mod news;
pub mod ratings;
pub mod tasks;
pub mod users;

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use workdesk_db::entities::{company, department, user, Company, Department, User};

use crate::error::{ServiceError, ServiceResult};

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub(crate) async fn find_user<C: ConnectionTrait>(conn: &C, user_id: i32) -> ServiceResult<user::Model> {
    User::find_by_id(user_id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found(format!("User {} not found", user_id)))
}

pub(crate) async fn find_company<C: ConnectionTrait>(
    conn: &C,
    company_id: i32,
) -> ServiceResult<company::Model> {
    Company::find_by_id(company_id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found(format!("Company {} not found", company_id)))
}

/// Loads a user and checks they belong to `company_id`
pub(crate) async fn find_company_user<C: ConnectionTrait>(
    conn: &C,
    company_id: i32,
    user_id: i32,
) -> ServiceResult<user::Model> {
    let found = find_user(conn, user_id).await?;
    if found.company_id != Some(company_id) {
        return Err(ServiceError::forbidden(format!(
            "User {} is not a member of this company",
            user_id
        )));
    }
    Ok(found)
}

/// Department headed by `user_id`, if any
pub(crate) async fn headed_department<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
) -> ServiceResult<Option<department::Model>> {
    Ok(Department::find()
        .filter(department::Column::HeadUserId.eq(user_id))
        .one(conn)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ann@Example.COM "), "ann@example.com");
        assert_eq!(normalize_email("ann@example.com"), "ann@example.com");
    }
}
