//! Meetings and participant booking
//!
//! A participant's calendar slot is the exact (date, time) pair of the
//! meeting. Booking fails when the participant already has any entry at
//! that same pair; overlapping but different times are not considered.

use chrono::{NaiveDate, NaiveTime};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;
use validator::Validate;
use workdesk_db::entities::{
    calendar_event::{self, EventType},
    meeting, user, CalendarEvent, Meeting,
};

use super::find_company_user;
use crate::error::{ServiceError, ServiceResult};
use crate::middleware::{require_company, require_manager};
use crate::models::{ChangeMeetingRequest, CreateMeetingRequest};

async fn find_company_meeting<C: ConnectionTrait>(
    conn: &C,
    company_id: i32,
    meeting_id: i32,
) -> ServiceResult<meeting::Model> {
    let found = Meeting::find_by_id(meeting_id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found(format!("Meeting {} not found", meeting_id)))?;

    if found.company_id != company_id {
        return Err(ServiceError::forbidden(format!(
            "Meeting {} belongs to another company",
            meeting_id
        )));
    }
    Ok(found)
}

/// Whether `user_id` already has a calendar entry at exactly this slot
async fn slot_taken<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    date: NaiveDate,
    time: NaiveTime,
) -> ServiceResult<bool> {
    let count = CalendarEvent::find()
        .filter(calendar_event::Column::UserId.eq(user_id))
        .filter(calendar_event::Column::EventDate.eq(date))
        .filter(calendar_event::Column::EventTime.eq(time))
        .count(conn)
        .await?;
    Ok(count > 0)
}

/// Manager/admin: schedule a meeting in the caller's company. The
/// organizer's own calendar is not checked.
pub async fn create_meeting(
    db: &DatabaseConnection,
    organizer: &user::Model,
    req: CreateMeetingRequest,
) -> ServiceResult<meeting::Model> {
    require_manager(organizer)?;
    let company_id = require_company(organizer)?;
    req.validate()?;

    let txn = db.begin().await?;

    let created = meeting::ActiveModel {
        organizer_id: Set(organizer.id),
        company_id: Set(company_id),
        title: Set(req.title),
        description: Set(req.description),
        meeting_date: Set(req.meeting_date),
        meeting_time: Set(req.meeting_time),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!(
        "Meeting {} scheduled by user {} on {} {}",
        created.id, organizer.id, created.meeting_date, created.meeting_time
    );
    Ok(created)
}

/// Meetings of the caller's company in chronological order
pub async fn list_meetings(
    db: &DatabaseConnection,
    caller: &user::Model,
) -> ServiceResult<Vec<meeting::Model>> {
    let company_id = require_company(caller)?;

    Ok(Meeting::find()
        .filter(meeting::Column::CompanyId.eq(company_id))
        .order_by_asc(meeting::Column::MeetingDate)
        .order_by_asc(meeting::Column::MeetingTime)
        .order_by_asc(meeting::Column::Id)
        .all(db)
        .await?)
}

/// Manager/admin: partial update; participants' entries follow a new slot
pub async fn change_meeting(
    db: &DatabaseConnection,
    caller: &user::Model,
    meeting_id: i32,
    patch: ChangeMeetingRequest,
) -> ServiceResult<meeting::Model> {
    let patch = patch.normalized();
    if patch.is_empty() {
        return Err(ServiceError::bad_request("No fields to update"));
    }
    require_manager(caller)?;
    let company_id = require_company(caller)?;
    patch.validate()?;

    let txn = db.begin().await?;
    let current = find_company_meeting(&txn, company_id, meeting_id).await?;

    let date = patch.meeting_date.unwrap_or(current.meeting_date);
    let time = patch.meeting_time.unwrap_or(current.meeting_time);
    let moved = date != current.meeting_date || time != current.meeting_time;

    let entries = CalendarEvent::find()
        .filter(calendar_event::Column::MeetingId.eq(meeting_id))
        .all(&txn)
        .await?;

    if moved {
        for entry in &entries {
            let clash = CalendarEvent::find()
                .filter(calendar_event::Column::UserId.eq(entry.user_id))
                .filter(calendar_event::Column::EventDate.eq(date))
                .filter(calendar_event::Column::EventTime.eq(time))
                .filter(
                    Condition::any()
                        .add(calendar_event::Column::MeetingId.ne(meeting_id))
                        .add(calendar_event::Column::MeetingId.is_null()),
                )
                .count(&txn)
                .await?;
            if clash > 0 {
                return Err(ServiceError::conflict(format!(
                    "Participant {} already has an event at {} {}",
                    entry.user_id, date, time
                )));
            }
        }
    }

    let mut active: meeting::ActiveModel = current.into();
    if let Some(title) = patch.title {
        active.title = Set(title);
    }
    if let Some(description) = patch.description {
        active.description = Set(Some(description));
    }
    active.meeting_date = Set(date);
    active.meeting_time = Set(time);
    let updated = active.update(&txn).await?;

    for entry in entries {
        let mut entry: calendar_event::ActiveModel = entry.into();
        entry.event_date = Set(updated.meeting_date);
        entry.event_time = Set(Some(updated.meeting_time));
        entry.title = Set(updated.title.clone());
        entry.update(&txn).await?;
    }

    txn.commit().await?;

    info!("Meeting {} updated by user {}", meeting_id, caller.id);
    Ok(updated)
}

/// Manager/admin: cancel a meeting; participants' entries go with it
pub async fn delete_meeting(
    db: &DatabaseConnection,
    caller: &user::Model,
    meeting_id: i32,
) -> ServiceResult<()> {
    require_manager(caller)?;
    let company_id = require_company(caller)?;

    let txn = db.begin().await?;
    let current = find_company_meeting(&txn, company_id, meeting_id).await?;
    current.delete(&txn).await?;
    txn.commit().await?;

    info!("Meeting {} deleted by user {}", meeting_id, caller.id);
    Ok(())
}

/// Manager/admin: book a colleague into the meeting's slot
pub async fn add_participant(
    db: &DatabaseConnection,
    caller: &user::Model,
    meeting_id: i32,
    user_id: i32,
) -> ServiceResult<calendar_event::Model> {
    require_manager(caller)?;
    let company_id = require_company(caller)?;

    let txn = db.begin().await?;
    let found = find_company_meeting(&txn, company_id, meeting_id).await?;
    let participant = find_company_user(&txn, company_id, user_id).await?;

    if slot_taken(&txn, participant.id, found.meeting_date, found.meeting_time).await? {
        return Err(ServiceError::conflict(format!(
            "User {} already has an event at {} {}",
            participant.id, found.meeting_date, found.meeting_time
        )));
    }

    let entry = calendar_event::ActiveModel {
        user_id: Set(participant.id),
        event_date: Set(found.meeting_date),
        event_time: Set(Some(found.meeting_time)),
        title: Set(found.title.clone()),
        type_event: Set(EventType::Meeting),
        task_id: Set(None),
        meeting_id: Set(Some(found.id)),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!(
        "User {} added to meeting {} by user {}",
        participant.id, meeting_id, caller.id
    );
    Ok(entry)
}
