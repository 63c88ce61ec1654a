//! Company news feed

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::info;
use validator::Validate;
use workdesk_db::entities::{news, user, News};

use crate::error::{ServiceError, ServiceResult};
use crate::middleware::{require_admin, require_member_of};
use crate::models::CreateNewsRequest;

/// Admin: publish a news item to the caller's company
pub async fn create_news(
    db: &DatabaseConnection,
    author: &user::Model,
    company_id: i32,
    req: CreateNewsRequest,
) -> ServiceResult<news::Model> {
    require_admin(author)?;
    require_member_of(author, company_id)?;
    req.validate()?;

    let txn = db.begin().await?;

    let created = news::ActiveModel {
        owner_id: Set(author.id),
        company_id: Set(company_id),
        title: Set(req.title),
        description: Set(req.description),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!("News {} published in company {}", created.id, company_id);
    Ok(created)
}

/// News of the caller's company, newest first
pub async fn list_news(
    db: &DatabaseConnection,
    reader: &user::Model,
    company_id: i32,
) -> ServiceResult<Vec<news::Model>> {
    require_member_of(reader, company_id)?;

    Ok(News::find()
        .filter(news::Column::CompanyId.eq(company_id))
        .order_by_desc(news::Column::Id)
        .all(db)
        .await?)
}

/// Admin: remove a news item of the caller's company
pub async fn delete_news(
    db: &DatabaseConnection,
    caller: &user::Model,
    company_id: i32,
    news_id: i32,
) -> ServiceResult<()> {
    require_admin(caller)?;
    require_member_of(caller, company_id)?;

    let txn = db.begin().await?;

    let found = News::find_by_id(news_id)
        .one(&txn)
        .await?
        .filter(|n| n.company_id == company_id)
        .ok_or_else(|| ServiceError::not_found(format!("News {} not found", news_id)))?;

    found.delete(&txn).await?;
    txn.commit().await?;

    info!("News {} deleted by user {}", news_id, caller.id);
    Ok(())
}
