//! Per-user calendar views

use chrono::{Datelike, NaiveDate};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use workdesk_db::entities::{calendar_event, user, CalendarEvent};

use crate::error::{ServiceError, ServiceResult};

/// First and last day of a month, or None when the month does not exist
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next_month.pred_opt()?))
}

/// Entries on `day` of the month `today` falls in, ordered by time.
///
/// Year and month are always taken from `today`.
pub async fn day_schedule(
    db: &DatabaseConnection,
    me: &user::Model,
    day: u32,
    today: NaiveDate,
) -> ServiceResult<Vec<calendar_event::Model>> {
    let date = NaiveDate::from_ymd_opt(today.year(), today.month(), day).ok_or_else(|| {
        ServiceError::bad_request(format!(
            "Day {} does not exist in {}-{:02}",
            day,
            today.year(),
            today.month()
        ))
    })?;

    Ok(CalendarEvent::find()
        .filter(calendar_event::Column::UserId.eq(me.id))
        .filter(calendar_event::Column::EventDate.eq(date))
        .order_by_asc(calendar_event::Column::EventTime)
        .order_by_asc(calendar_event::Column::Id)
        .all(db)
        .await?)
}

/// Entries between the first and last day of the month inclusive, ordered
/// by date then time
pub async fn month_schedule(
    db: &DatabaseConnection,
    me: &user::Model,
    year: i32,
    month: u32,
) -> ServiceResult<Vec<calendar_event::Model>> {
    let (first, last) = month_bounds(year, month)
        .ok_or_else(|| ServiceError::bad_request(format!("Invalid month {}-{}", year, month)))?;

    Ok(CalendarEvent::find()
        .filter(calendar_event::Column::UserId.eq(me.id))
        .filter(calendar_event::Column::EventDate.between(first, last))
        .order_by_asc(calendar_event::Column::EventDate)
        .order_by_asc(calendar_event::Column::EventTime)
        .order_by_asc(calendar_event::Column::Id)
        .all(db)
        .await?)
}
