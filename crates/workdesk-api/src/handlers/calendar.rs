use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::models::*;
use crate::services::calendar;
use crate::AppState;

/// Schedule for one day of the current month
#[utoipa::path(
    get,
    path = "/calendar/my/day",
    params(DayScheduleQuery),
    responses(
        (status = 200, description = "Entries ordered by time", body = Vec<CalendarEvent>),
        (status = 400, description = "Day does not exist in the current month", body = ErrorResponse)
    ),
    tag = "calendar"
)]
pub async fn day_schedule(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
    Query(query): Query<DayScheduleQuery>,
) -> Result<Json<Vec<CalendarEvent>>, ApiError> {
    debug!("Day schedule of user {} for day {}", me.id, query.day);

    let entries =
        calendar::day_schedule(&state.db, &me, query.day, Utc::now().date_naive()).await?;

    Ok(Json(entries.into_iter().map(CalendarEvent::from).collect()))
}

/// Schedule for a whole month
#[utoipa::path(
    get,
    path = "/calendar/my/month",
    params(MonthScheduleQuery),
    responses(
        (status = 200, description = "Entries ordered by date and time", body = Vec<CalendarEvent>),
        (status = 400, description = "Invalid month", body = ErrorResponse)
    ),
    tag = "calendar"
)]
pub async fn month_schedule(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
    Query(query): Query<MonthScheduleQuery>,
) -> Result<Json<Vec<CalendarEvent>>, ApiError> {
    debug!(
        "Month schedule of user {} for {}-{:02}",
        me.id, query.year, query.month
    );

    let entries = calendar::month_schedule(&state.db, &me, query.year, query.month).await?;

    Ok(Json(entries.into_iter().map(CalendarEvent::from).collect()))
}
