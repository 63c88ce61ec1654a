//! Discussion threads on tasks

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::info;
use validator::Validate;
use workdesk_db::entities::{
    comment,
    user::{self, CompanyRole},
    Comment,
};

use super::tasks::find_company_task;
use crate::error::{ServiceError, ServiceResult};
use crate::middleware::require_company;
use crate::models::CreateCommentRequest;

pub async fn create_comment(
    db: &DatabaseConnection,
    author: &user::Model,
    task_id: i32,
    req: CreateCommentRequest,
) -> ServiceResult<comment::Model> {
    let company_id = require_company(author)?;
    req.validate()?;

    let txn = db.begin().await?;
    let task = find_company_task(&txn, company_id, task_id).await?;

    let created = comment::ActiveModel {
        author_id: Set(author.id),
        task_id: Set(task.id),
        description: Set(req.description),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!("Comment {} added to task {} by user {}", created.id, task_id, author.id);
    Ok(created)
}

/// Comments of a task, oldest first
pub async fn list_comments(
    db: &DatabaseConnection,
    caller: &user::Model,
    task_id: i32,
) -> ServiceResult<Vec<comment::Model>> {
    let company_id = require_company(caller)?;

    let txn = db.begin().await?;
    find_company_task(&txn, company_id, task_id).await?;

    let comments = Comment::find()
        .filter(comment::Column::TaskId.eq(task_id))
        .order_by_asc(comment::Column::Id)
        .all(&txn)
        .await?;

    txn.commit().await?;
    Ok(comments)
}

/// Only the author or a company admin may delete a comment
pub async fn delete_comment(
    db: &DatabaseConnection,
    caller: &user::Model,
    task_id: i32,
    comment_id: i32,
) -> ServiceResult<()> {
    let company_id = require_company(caller)?;

    let txn = db.begin().await?;
    find_company_task(&txn, company_id, task_id).await?;

    let found = Comment::find_by_id(comment_id)
        .one(&txn)
        .await?
        .filter(|c| c.task_id == task_id)
        .ok_or_else(|| {
            ServiceError::not_found(format!(
                "Comment {} not found on task {}",
                comment_id, task_id
            ))
        })?;

    if found.author_id != caller.id && caller.company_role != CompanyRole::Admin {
        return Err(ServiceError::forbidden(
            "Only the author or an admin can delete this comment",
        ));
    }

    found.delete(&txn).await?;
    txn.commit().await?;

    info!("Comment {} deleted by user {}", comment_id, caller.id);
    Ok(())
}
