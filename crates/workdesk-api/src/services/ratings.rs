//! Post-completion scoring of tasks

use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set, TransactionTrait};
use tracing::info;
use validator::Validate;
use workdesk_db::entities::{rating, task::TaskStatus, user};

use super::tasks::find_company_task;
use crate::error::{ServiceError, ServiceResult};
use crate::middleware::{require_company, require_manager};
use crate::models::CreateRatingRequest;

/// Rate a finished task; the assignee is the ratee and the caller the rater.
/// Repeated ratings of the same task are accepted.
pub async fn create_rating(
    db: &DatabaseConnection,
    rater: &user::Model,
    task_id: i32,
    scores: CreateRatingRequest,
    today: NaiveDate,
) -> ServiceResult<rating::Model> {
    require_manager(rater)?;
    let company_id = require_company(rater)?;
    scores.validate()?;

    let txn = db.begin().await?;
    let task = find_company_task(&txn, company_id, task_id).await?;

    if task.status != TaskStatus::Done {
        return Err(ServiceError::forbidden(
            "Only tasks with status 'done' can be rated",
        ));
    }

    let created = rating::ActiveModel {
        task_id: Set(task.id),
        owner_id: Set(task.target_id),
        head_id: Set(rater.id),
        score_date: Set(scores.score_date),
        score_quality: Set(scores.score_quality),
        score_complete: Set(scores.score_complete),
        created_at: Set(today),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!(
        "Task {} rated by user {} for user {}",
        task_id, rater.id, created.owner_id
    );
    Ok(created)
}
