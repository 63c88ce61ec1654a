//! Accounts, sessions and per-user views

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::info;
use validator::Validate;
use workdesk_auth::{hash_password, verify_password, JwtClaims, JwtValidator};
use workdesk_db::entities::{company, rating, task, user, Company, Rating, Task, User};

use super::{find_company_user, headed_department, normalize_email};
use crate::error::{ServiceError, ServiceResult};
use crate::middleware::{require_admin, require_company};
use crate::models::{AverageRating, ChangeUserRequest, RegisterRequest};

/// A freshly issued login session
#[derive(Debug, Clone)]
pub struct Session {
    pub user: user::Model,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Create an account, optionally joining a company by its invite code
pub async fn register(
    db: &DatabaseConnection,
    mut req: RegisterRequest,
) -> ServiceResult<user::Model> {
    req.email = normalize_email(&req.email);
    req.validate()?;
    let email = req.email.clone();

    let password_hash = hash_password(&req.password)?;

    let txn = db.begin().await?;

    let taken = User::find()
        .filter(user::Column::Email.eq(email.as_str()))
        .one(&txn)
        .await?;
    if taken.is_some() {
        return Err(ServiceError::conflict("User with this email already exists"));
    }

    let company_id = match &req.company_code {
        Some(code) => Some(
            Company::find()
                .filter(company::Column::CompanyCode.eq(code.as_str()))
                .one(&txn)
                .await?
                .ok_or_else(|| ServiceError::not_found("Company with this code not found"))?
                .id,
        ),
        None => None,
    };

    let created = user::ActiveModel {
        first_name: Set(req.first_name.trim().to_string()),
        last_name: Set(req.last_name.trim().to_string()),
        email: Set(email),
        password_hash: Set(password_hash),
        company_role: Set(req.company_role.into()),
        company_id: Set(company_id),
        department_id: Set(None),
        is_active: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!("Registered user {} ({})", created.id, created.email);
    Ok(created)
}

/// Verify credentials and issue a session token valid for `ttl`
pub async fn login(
    db: &DatabaseConnection,
    jwt_secret: &[u8],
    ttl: Duration,
    email: &str,
    password: &str,
) -> ServiceResult<Session> {
    let rejected = || ServiceError::Unauthorized("Invalid email or password".to_string());

    let found = User::find()
        .filter(user::Column::Email.eq(normalize_email(email)))
        .one(db)
        .await?
        .ok_or_else(rejected)?;

    if !verify_password(password, &found.password_hash)? {
        return Err(rejected());
    }
    if !found.is_active {
        return Err(ServiceError::Unauthorized(
            "User account is disabled".to_string(),
        ));
    }

    let claims = JwtClaims::session(found.id, found.company_role.as_str(), ttl);
    let token = JwtValidator::encode(jwt_secret, &claims)?;

    Ok(Session {
        expires_at: claims.expires_at(),
        user: found,
        token,
    })
}

/// Partial update of the caller's own profile
pub async fn change_me(
    db: &DatabaseConnection,
    me: &user::Model,
    mut patch: ChangeUserRequest,
) -> ServiceResult<user::Model> {
    if patch.is_empty() {
        return Err(ServiceError::bad_request("No fields to update"));
    }
    patch.email = patch.email.as_deref().map(normalize_email);
    patch.validate()?;

    let txn = db.begin().await?;
    let mut active: user::ActiveModel = me.clone().into();

    if let Some(first_name) = patch.first_name {
        active.first_name = Set(first_name.trim().to_string());
    }
    if let Some(last_name) = patch.last_name {
        active.last_name = Set(last_name.trim().to_string());
    }
    if let Some(email) = patch.email {
        if email != me.email {
            let taken = User::find()
                .filter(user::Column::Email.eq(email.as_str()))
                .one(&txn)
                .await?;
            if taken.is_some() {
                return Err(ServiceError::conflict("User with this email already exists"));
            }
        }
        active.email = Set(email);
    }
    if let Some(role) = patch.company_role {
        active.company_role = Set(role.into());
    }
    if let Some(code) = patch.company_code {
        let joined = Company::find()
            .filter(company::Column::CompanyCode.eq(code.trim()))
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Company with this code not found"))?;

        if me.company_id != Some(joined.id) {
            if headed_department(&txn, me.id).await?.is_some() {
                return Err(ServiceError::conflict(
                    "You head a department; hand it over before changing company",
                ));
            }
            active.company_id = Set(Some(joined.id));
            active.department_id = Set(None);
        }
    }

    // Re-joining the current company leaves nothing to write
    let updated = if active.is_changed() {
        active.update(&txn).await?
    } else {
        me.clone()
    };
    txn.commit().await?;

    info!("User {} updated their profile", updated.id);
    Ok(updated)
}

/// Delete the caller's account once they have left every org unit
pub async fn delete_me(db: &DatabaseConnection, me: &user::Model) -> ServiceResult<()> {
    if me.company_id.is_some() {
        return Err(ServiceError::conflict(
            "Leave your company before deleting the account",
        ));
    }

    let txn = db.begin().await?;

    if headed_department(&txn, me.id).await?.is_some() {
        return Err(ServiceError::conflict(
            "You head a department; hand it over before deleting the account",
        ));
    }

    me.clone().delete(&txn).await?;
    txn.commit().await?;

    info!("User {} deleted their account", me.id);
    Ok(())
}

/// Admin: change the role of a colleague
pub async fn change_role(
    db: &DatabaseConnection,
    caller: &user::Model,
    user_id: i32,
    role: user::CompanyRole,
) -> ServiceResult<user::Model> {
    require_admin(caller)?;
    let company_id = require_company(caller)?;

    let txn = db.begin().await?;
    let target = find_company_user(&txn, company_id, user_id).await?;

    let mut active: user::ActiveModel = target.into();
    active.company_role = Set(role);
    let updated = active.update(&txn).await?;

    txn.commit().await?;

    info!(
        "User {} role set to {} by {}",
        updated.id,
        role.as_str(),
        caller.id
    );
    Ok(updated)
}

/// Admin: detach a colleague from their department
pub async fn remove_from_department(
    db: &DatabaseConnection,
    caller: &user::Model,
    user_id: i32,
) -> ServiceResult<user::Model> {
    require_admin(caller)?;
    let company_id = require_company(caller)?;

    let txn = db.begin().await?;
    let target = find_company_user(&txn, company_id, user_id).await?;

    if target.department_id.is_none() {
        return Err(ServiceError::forbidden(format!(
            "User {} is not in a department",
            user_id
        )));
    }
    if headed_department(&txn, target.id).await?.is_some() {
        return Err(ServiceError::conflict(
            "User heads a department; change the head first",
        ));
    }

    let mut active: user::ActiveModel = target.into();
    active.department_id = Set(None);
    let updated = active.update(&txn).await?;

    txn.commit().await?;

    info!("User {} removed from their department by {}", user_id, caller.id);
    Ok(updated)
}

/// Tasks assigned to the user, earliest deadline first
pub async fn my_tasks(db: &DatabaseConnection, me: &user::Model) -> ServiceResult<Vec<task::Model>> {
    Ok(Task::find()
        .filter(task::Column::TargetId.eq(me.id))
        .order_by_asc(task::Column::EndDate)
        .order_by_asc(task::Column::Id)
        .all(db)
        .await?)
}

/// Tasks the user assigned to others
pub async fn owned_tasks(
    db: &DatabaseConnection,
    me: &user::Model,
) -> ServiceResult<Vec<task::Model>> {
    Ok(Task::find()
        .filter(task::Column::OwnerId.eq(me.id))
        .order_by_asc(task::Column::EndDate)
        .order_by_asc(task::Column::Id)
        .all(db)
        .await?)
}

/// Ratings received by the user, newest first
pub async fn my_ratings(
    db: &DatabaseConnection,
    me: &user::Model,
) -> ServiceResult<Vec<rating::Model>> {
    Ok(Rating::find()
        .filter(rating::Column::OwnerId.eq(me.id))
        .order_by_desc(rating::Column::CreatedAt)
        .order_by_desc(rating::Column::Id)
        .all(db)
        .await?)
}

/// First day of the calendar quarter containing `day`
pub fn quarter_start(day: NaiveDate) -> NaiveDate {
    let first_month = (day.month0() / 3) * 3 + 1;
    day.with_day(1)
        .and_then(|d| d.with_month(first_month))
        .unwrap_or(day)
}

/// Averages of the user's scores received since the start of the quarter
pub async fn average_rating(
    db: &DatabaseConnection,
    me: &user::Model,
    today: NaiveDate,
) -> ServiceResult<AverageRating> {
    let ratings = Rating::find()
        .filter(rating::Column::OwnerId.eq(me.id))
        .filter(rating::Column::CreatedAt.gte(quarter_start(today)))
        .all(db)
        .await?;

    Ok(average_of(&ratings))
}

fn average_of(ratings: &[rating::Model]) -> AverageRating {
    if ratings.is_empty() {
        return AverageRating {
            avg_date: None,
            avg_quality: None,
            avg_complete: None,
        };
    }

    let n = ratings.len() as f64;
    let mean = |score: fn(&rating::Model) -> i32| {
        Some(ratings.iter().map(|r| score(r) as f64).sum::<f64>() / n)
    };

    AverageRating {
        avg_date: mean(|r| r.score_date),
        avg_quality: mean(|r| r.score_quality),
        avg_complete: mean(|r| r.score_complete),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn scored(date_score: i32, quality: i32, complete: i32) -> rating::Model {
        rating::Model {
            id: 1,
            task_id: 1,
            owner_id: 1,
            head_id: 2,
            score_date: date_score,
            score_quality: quality,
            score_complete: complete,
            created_at: date(2025, 1, 1),
        }
    }

    #[test]
    fn test_quarter_start() {
        assert_eq!(quarter_start(date(2025, 1, 1)), date(2025, 1, 1));
        assert_eq!(quarter_start(date(2025, 3, 31)), date(2025, 1, 1));
        assert_eq!(quarter_start(date(2025, 5, 17)), date(2025, 4, 1));
        assert_eq!(quarter_start(date(2025, 9, 30)), date(2025, 7, 1));
        assert_eq!(quarter_start(date(2024, 12, 31)), date(2024, 10, 1));
    }

    #[test]
    fn test_average_of_empty_is_null() {
        let avg = average_of(&[]);
        assert!(avg.avg_date.is_none());
        assert!(avg.avg_quality.is_none());
        assert!(avg.avg_complete.is_none());
    }

    #[test]
    fn test_average_of_scores() {
        let avg = average_of(&[scored(5, 4, 3), scored(3, 4, 5)]);
        assert_eq!(avg.avg_date, Some(4.0));
        assert_eq!(avg.avg_quality, Some(4.0));
        assert_eq!(avg.avg_complete, Some(4.0));
    }
}
