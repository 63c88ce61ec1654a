use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt::Display, str::FromStr};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use workdesk_db::entities::{
    calendar_event, comment, company, department, meeting, news, rating, task, user,
};

// ============================================================================
// System
// ============================================================================

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Plain acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// Enums
// ============================================================================

/// Role of a user inside their company
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CompanyRole {
    Employee,
    Manager,
    Admin,
}

impl From<user::CompanyRole> for CompanyRole {
    fn from(role: user::CompanyRole) -> Self {
        match role {
            user::CompanyRole::Employee => CompanyRole::Employee,
            user::CompanyRole::Manager => CompanyRole::Manager,
            user::CompanyRole::Admin => CompanyRole::Admin,
        }
    }
}

impl From<CompanyRole> for user::CompanyRole {
    fn from(role: CompanyRole) -> Self {
        match role {
            CompanyRole::Employee => user::CompanyRole::Employee,
            CompanyRole::Manager => user::CompanyRole::Manager,
            CompanyRole::Admin => user::CompanyRole::Admin,
        }
    }
}

/// Task lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl From<task::TaskStatus> for TaskStatus {
    fn from(status: task::TaskStatus) -> Self {
        match status {
            task::TaskStatus::Todo => TaskStatus::Todo,
            task::TaskStatus::InProgress => TaskStatus::InProgress,
            task::TaskStatus::Done => TaskStatus::Done,
        }
    }
}

impl From<TaskStatus> for task::TaskStatus {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Todo => task::TaskStatus::Todo,
            TaskStatus::InProgress => task::TaskStatus::InProgress,
            TaskStatus::Done => task::TaskStatus::Done,
        }
    }
}

/// Source of a calendar entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Task,
    Meeting,
}

impl From<calendar_event::EventType> for EventType {
    fn from(kind: calendar_event::EventType) -> Self {
        match kind {
            calendar_event::EventType::Task => EventType::Task,
            calendar_event::EventType::Meeting => EventType::Meeting,
        }
    }
}

// ============================================================================
// Authentication & users
// ============================================================================

/// User registration request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct RegisterRequest {
    /// First name (2-20 characters)
    #[serde(alias = "name")]
    #[validate(length(min = 2, max = 20))]
    pub first_name: String,
    /// Last name (2-20 characters)
    #[serde(alias = "surname")]
    #[validate(length(min = 2, max = 20))]
    pub last_name: String,
    /// Role inside the company
    #[serde(alias = "role")]
    pub company_role: CompanyRole,
    /// 4-character company invite code (optional)
    #[serde(default, alias = "code", skip_serializing_if = "Option::is_none")]
    #[validate(length(equal = 4))]
    pub company_code: Option<String>,
    /// Email address (must be unique)
    #[validate(email)]
    pub email: String,
    /// Password (minimum 6 characters)
    #[validate(length(min = 6))]
    pub password: String,
}

/// User login request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// User email address
    pub email: String,
    /// User password
    pub password: String,
}

/// User login response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Logged in user
    pub user: User,
    /// Session token (also set as the `session_token` cookie)
    pub token: String,
    /// Token expiration timestamp
    pub expires_at: DateTime<Utc>,
}

/// User information
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company_role: CompanyRole,
    pub company_id: Option<i32>,
    pub department_id: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for User {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            company_role: model.company_role.into(),
            company_id: model.company_id,
            department_id: model.department_id,
            is_active: model.is_active,
            created_at: model.created_at,
        }
    }
}

/// Partial update of the current user
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct ChangeUserRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 2, max = 20))]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 2, max = 20))]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_role: Option<CompanyRole>,
    /// Join the company with this invite code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(equal = 4))]
    pub company_code: Option<String>,
}

impl ChangeUserRequest {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.company_role.is_none()
            && self.company_code.is_none()
    }
}

/// Role change performed by a company admin
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChangeRoleRequest {
    pub company_role: CompanyRole,
}

/// Quarter-to-date rating averages, null when there are no ratings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AverageRating {
    pub avg_date: Option<f64>,
    pub avg_quality: Option<f64>,
    pub avg_complete: Option<f64>,
}

// ============================================================================
// Companies & departments
// ============================================================================

/// Company creation request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateCompanyRequest {
    /// Company name (must be unique)
    #[validate(length(min = 1, max = 40))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub description: Option<String>,
    /// Invite code, exactly 4 characters
    #[validate(length(equal = 4))]
    pub company_code: String,
    /// Administrator code, exactly 6 characters
    #[validate(length(equal = 6))]
    pub admin_code: String,
}

/// Company information (the admin code is never returned)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Company {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub company_code: String,
}

impl From<company::Model> for Company {
    fn from(model: company::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            company_code: model.company_code,
        }
    }
}

/// Department creation request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateDepartmentRequest {
    /// Department name (must be unique)
    #[validate(length(min = 1, max = 40))]
    pub name: String,
    /// Head of the department, must belong to the company
    pub head_user_id: i32,
}

/// Department head change
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChangeHeadRequest {
    pub head_user_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Department {
    pub id: i32,
    pub name: String,
    pub company_id: i32,
    pub head_user_id: i32,
}

impl From<department::Model> for Department {
    fn from(model: department::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            company_id: model.company_id,
            head_user_id: model.head_user_id,
        }
    }
}

// ============================================================================
// Tasks, comments, ratings
// ============================================================================

/// Task creation request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateTaskRequest {
    /// Assignee
    pub target_id: i32,
    pub start_date: NaiveDate,
    /// Deadline; the assignee's calendar gets an entry on this day
    pub end_date: NaiveDate,
    /// Title (4-40 characters)
    #[validate(length(min = 4, max = 40))]
    pub title: String,
    /// Description (up to 400 characters)
    #[serde(default)]
    #[validate(length(max = 400))]
    pub description: String,
}

/// Partial task update; only the assignee may include `status`
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct ChangeTaskRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 4, max = 40))]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 400))]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl ChangeTaskRequest {
    pub fn is_empty(&self) -> bool {
        self.target_id.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
    }
}

/// Status change, allowed for the assignee only
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChangeTaskStatusRequest {
    pub status: TaskStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Task {
    pub id: i32,
    pub company_id: i32,
    /// Assigner
    pub owner_id: i32,
    /// Assignee
    pub target_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
}

impl From<task::Model> for Task {
    fn from(model: task::Model) -> Self {
        Self {
            id: model.id,
            company_id: model.company_id,
            owner_id: model.owner_id,
            target_id: model.target_id,
            start_date: model.start_date,
            end_date: model.end_date,
            title: model.title,
            description: model.description,
            status: model.status.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateCommentRequest {
    /// Comment text (1-1024 characters)
    #[validate(length(min = 1, max = 1024))]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Comment {
    pub id: i32,
    pub author_id: i32,
    pub task_id: i32,
    pub description: String,
}

impl From<comment::Model> for Comment {
    fn from(model: comment::Model) -> Self {
        Self {
            id: model.id,
            author_id: model.author_id,
            task_id: model.task_id,
            description: model.description,
        }
    }
}

/// Rating scores, each in 1..=5
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateRatingRequest {
    #[validate(range(min = 1, max = 5))]
    pub score_date: i32,
    #[validate(range(min = 1, max = 5))]
    pub score_quality: i32,
    #[validate(range(min = 1, max = 5))]
    pub score_complete: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Rating {
    pub id: i32,
    pub task_id: i32,
    /// Ratee
    pub owner_id: i32,
    /// Rater
    pub head_id: i32,
    pub score_date: i32,
    pub score_quality: i32,
    pub score_complete: i32,
    pub created_at: NaiveDate,
}

impl From<rating::Model> for Rating {
    fn from(model: rating::Model) -> Self {
        Self {
            id: model.id,
            task_id: model.task_id,
            owner_id: model.owner_id,
            head_id: model.head_id,
            score_date: model.score_date,
            score_quality: model.score_quality,
            score_complete: model.score_complete,
            created_at: model.created_at,
        }
    }
}

// ============================================================================
// Meetings & calendar
// ============================================================================

/// Meeting creation request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateMeetingRequest {
    /// Title (4-40 characters)
    #[validate(length(min = 4, max = 40))]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 400))]
    pub description: Option<String>,
    pub meeting_date: NaiveDate,
    #[schema(value_type = String, example = "10:00:00")]
    pub meeting_time: NaiveTime,
}

/// Partial meeting update; blank strings count as absent
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct ChangeMeetingRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 4, max = 40))]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 400))]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, example = "2025-03-14")]
    pub meeting_date: Option<NaiveDate>,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, example = "10:00:00")]
    pub meeting_time: Option<NaiveTime>,
}

impl ChangeMeetingRequest {
    /// Trim text fields and drop the ones left blank
    pub fn normalized(self) -> Self {
        let keep = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            title: keep(self.title),
            description: keep(self.description),
            meeting_date: self.meeting_date,
            meeting_time: self.meeting_time,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.meeting_date.is_none()
            && self.meeting_time.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Meeting {
    pub id: i32,
    pub organizer_id: i32,
    pub company_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub meeting_date: NaiveDate,
    #[schema(value_type = String, example = "10:00:00")]
    pub meeting_time: NaiveTime,
}

impl From<meeting::Model> for Meeting {
    fn from(model: meeting::Model) -> Self {
        Self {
            id: model.id,
            organizer_id: model.organizer_id,
            company_id: model.company_id,
            title: model.title,
            description: model.description,
            meeting_date: model.meeting_date,
            meeting_time: model.meeting_time,
        }
    }
}

/// One entry of a user's calendar
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CalendarEvent {
    pub id: i32,
    pub event_date: NaiveDate,
    /// Null for all-day entries such as task deadlines
    #[schema(value_type = Option<String>, example = "10:00:00")]
    pub event_time: Option<NaiveTime>,
    pub title: String,
    pub type_event: EventType,
    pub task_id: Option<i32>,
    pub meeting_id: Option<i32>,
}

impl From<calendar_event::Model> for CalendarEvent {
    fn from(model: calendar_event::Model) -> Self {
        Self {
            id: model.id,
            event_date: model.event_date,
            event_time: model.event_time,
            title: model.title,
            type_event: model.type_event.into(),
            task_id: model.task_id,
            meeting_id: model.meeting_id,
        }
    }
}

/// Day of the current month
#[derive(Debug, Clone, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DayScheduleQuery {
    /// Day of month (1-31)
    pub day: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MonthScheduleQuery {
    pub year: i32,
    /// Month (1-12)
    pub month: u32,
}

// ============================================================================
// News
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateNewsRequest {
    /// Headline (1-100 characters)
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    /// Body (1-1024 characters)
    #[validate(length(min = 1, max = 1024))]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct News {
    pub id: i32,
    pub owner_id: i32,
    pub company_id: i32,
    pub title: String,
    pub description: String,
}

impl From<news::Model> for News {
    fn from(model: news::Model) -> Self {
        Self {
            id: model.id,
            owner_id: model.owner_id,
            company_id: model.company_id,
            title: model.title,
            description: model.description,
        }
    }
}

/// Accepts `null`, a missing field, or a blank string as `None`
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
