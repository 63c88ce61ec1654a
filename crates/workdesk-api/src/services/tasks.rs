//! Task lifecycle and the assignee's deadline calendar entry

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, Set, TransactionTrait,
};
use tracing::info;
use validator::Validate;
use workdesk_db::entities::{
    calendar_event::{self, EventType},
    task::{self, TaskStatus},
    user, CalendarEvent, Task,
};

use super::find_company_user;
use crate::error::{ServiceError, ServiceResult};
use crate::middleware::require_company;
use crate::models::{ChangeTaskRequest, CreateTaskRequest};

/// Loads a task of `company_id`
pub(crate) async fn find_company_task<C: ConnectionTrait>(
    conn: &C,
    company_id: i32,
    task_id: i32,
) -> ServiceResult<task::Model> {
    let found = Task::find_by_id(task_id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found(format!("Task {} not found", task_id)))?;

    if found.company_id != company_id {
        return Err(ServiceError::forbidden(format!(
            "Task {} belongs to another company",
            task_id
        )));
    }
    Ok(found)
}

/// All-day entry on the assignee's calendar at the task deadline
pub(crate) async fn add_task_calendar<C: ConnectionTrait>(
    conn: &C,
    task: &task::Model,
) -> ServiceResult<calendar_event::Model> {
    Ok(calendar_event::ActiveModel {
        user_id: Set(task.target_id),
        event_date: Set(task.end_date),
        event_time: Set(None),
        title: Set(task.title.clone()),
        type_event: Set(EventType::Task),
        task_id: Set(Some(task.id)),
        meeting_id: Set(None),
        ..Default::default()
    }
    .insert(conn)
    .await?)
}

/// Create a task for a colleague; the calendar entry is written in the same
/// transaction so both land or neither does
pub async fn create_task(
    db: &DatabaseConnection,
    owner: &user::Model,
    req: CreateTaskRequest,
) -> ServiceResult<task::Model> {
    let company_id = require_company(owner)?;
    req.validate()?;
    if req.start_date > req.end_date {
        return Err(ServiceError::bad_request(
            "start_date must not be after end_date",
        ));
    }

    let txn = db.begin().await?;
    let target = find_company_user(&txn, company_id, req.target_id).await?;

    let created = task::ActiveModel {
        company_id: Set(company_id),
        owner_id: Set(owner.id),
        target_id: Set(target.id),
        start_date: Set(req.start_date),
        end_date: Set(req.end_date),
        title: Set(req.title),
        description: Set(req.description),
        status: Set(TaskStatus::Todo),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    add_task_calendar(&txn, &created).await?;

    txn.commit().await?;

    info!(
        "Task {} created by user {} for user {}",
        created.id, owner.id, created.target_id
    );
    Ok(created)
}

pub async fn get_task(
    db: &DatabaseConnection,
    caller: &user::Model,
    task_id: i32,
) -> ServiceResult<task::Model> {
    let company_id = require_company(caller)?;
    find_company_task(db, company_id, task_id).await
}

/// Partial update of any task field except its company
pub async fn change_task(
    db: &DatabaseConnection,
    caller: &user::Model,
    task_id: i32,
    patch: ChangeTaskRequest,
) -> ServiceResult<task::Model> {
    if patch.is_empty() {
        return Err(ServiceError::bad_request("No fields to update"));
    }
    let company_id = require_company(caller)?;
    patch.validate()?;

    let txn = db.begin().await?;
    let current = find_company_task(&txn, company_id, task_id).await?;

    if patch.status.is_some() && current.target_id != caller.id {
        return Err(ServiceError::forbidden(
            "Only the assignee can change the task status",
        ));
    }

    let start_date = patch.start_date.unwrap_or(current.start_date);
    let end_date = patch.end_date.unwrap_or(current.end_date);
    if start_date > end_date {
        return Err(ServiceError::bad_request(
            "start_date must not be after end_date",
        ));
    }

    let mut active: task::ActiveModel = current.into();
    if let Some(target_id) = patch.target_id {
        let target = find_company_user(&txn, company_id, target_id).await?;
        active.target_id = Set(target.id);
    }
    if let Some(start_date) = patch.start_date {
        active.start_date = Set(start_date);
    }
    if let Some(end_date) = patch.end_date {
        active.end_date = Set(end_date);
    }
    if let Some(title) = patch.title {
        active.title = Set(title);
    }
    if let Some(description) = patch.description {
        active.description = Set(description);
    }
    if let Some(status) = patch.status {
        active.status = Set(status.into());
    }
    let updated = active.update(&txn).await?;

    // Keep the deadline entry pointing at the current assignee and date
    let entries = CalendarEvent::find()
        .filter(calendar_event::Column::TaskId.eq(updated.id))
        .filter(calendar_event::Column::TypeEvent.eq(EventType::Task))
        .all(&txn)
        .await?;
    for entry in entries {
        let mut entry: calendar_event::ActiveModel = entry.into();
        entry.user_id = Set(updated.target_id);
        entry.event_date = Set(updated.end_date);
        entry.title = Set(updated.title.clone());
        entry.update(&txn).await?;
    }

    txn.commit().await?;

    info!("Task {} updated by user {}", task_id, caller.id);
    Ok(updated)
}

/// Assignee-only status transition; any status may follow any other
pub async fn change_task_status(
    db: &DatabaseConnection,
    caller: &user::Model,
    task_id: i32,
    status: TaskStatus,
) -> ServiceResult<task::Model> {
    let company_id = require_company(caller)?;

    let txn = db.begin().await?;
    let current = find_company_task(&txn, company_id, task_id).await?;

    if current.target_id != caller.id {
        return Err(ServiceError::forbidden(
            "Only the assignee can change the task status",
        ));
    }

    let mut active: task::ActiveModel = current.into();
    active.status = Set(status);
    let updated = active.update(&txn).await?;

    txn.commit().await?;

    info!("Task {} status set to {:?} by user {}", task_id, status, caller.id);
    Ok(updated)
}

/// Delete a task; comments, ratings and calendar entries go with it
pub async fn delete_task(
    db: &DatabaseConnection,
    caller: &user::Model,
    task_id: i32,
) -> ServiceResult<()> {
    let company_id = require_company(caller)?;

    let txn = db.begin().await?;
    let current = find_company_task(&txn, company_id, task_id).await?;
    current.delete(&txn).await?;
    txn.commit().await?;

    info!("Task {} deleted by user {}", task_id, caller.id);
    Ok(())
}
