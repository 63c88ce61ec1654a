//! Integration tests for workdesk-db
//!
//! Runs the schema against a real SQLite in-memory database

use chrono::{NaiveDate, NaiveTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, Set,
};
use workdesk_db::entities::prelude::*;
use workdesk_db::entities::{calendar_event, company, meeting, task, user};
use workdesk_db::{connect, migrate};

async fn setup_test_db() -> sea_orm::DatabaseConnection {
    let db = connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    migrate(&db).await.expect("Failed to run migrations");

    db
}

async fn insert_company(db: &sea_orm::DatabaseConnection, name: &str) -> company::Model {
    company::ActiveModel {
        name: Set(name.to_string()),
        description: Set(None),
        company_code: Set("AB12".to_string()),
        admin_code: Set("XYZ123".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert company")
}

async fn insert_user(
    db: &sea_orm::DatabaseConnection,
    email: &str,
    company_id: Option<i32>,
) -> user::Model {
    user::ActiveModel {
        first_name: Set("Ann".to_string()),
        last_name: Set("Lee".to_string()),
        email: Set(email.to_string()),
        password_hash: Set("hash".to_string()),
        company_role: Set(CompanyRole::Employee),
        company_id: Set(company_id),
        department_id: Set(None),
        is_active: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert user")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn test_database_connection() {
    let db = connect("sqlite::memory:").await.expect("Failed to connect");

    let backend = db.get_database_backend();
    assert!(matches!(backend, sea_orm::DatabaseBackend::Sqlite));
}

#[tokio::test]
async fn test_migrations_run_successfully() {
    let db = connect("sqlite::memory:").await.expect("Failed to connect");

    assert!(migrate(&db).await.is_ok());
    // Running twice is a no-op
    assert!(migrate(&db).await.is_ok());
}

#[tokio::test]
async fn test_user_email_is_unique() {
    let db = setup_test_db().await;

    insert_user(&db, "a@example.com", None).await;

    let duplicate = user::ActiveModel {
        first_name: Set("Bob".to_string()),
        last_name: Set("Ray".to_string()),
        email: Set("a@example.com".to_string()),
        password_hash: Set("hash".to_string()),
        company_role: Set(CompanyRole::Manager),
        company_id: Set(None),
        department_id: Set(None),
        is_active: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&db)
    .await;

    assert!(duplicate.is_err());
}

#[tokio::test]
async fn test_company_role_round_trips_as_string() {
    let db = setup_test_db().await;

    let mut active: user::ActiveModel = insert_user(&db, "r@example.com", None).await.into();
    active.company_role = Set(CompanyRole::Admin);
    let updated = active.update(&db).await.unwrap();

    let found = User::find()
        .filter(user::Column::CompanyRole.eq(CompanyRole::Admin))
        .one(&db)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(found.id, updated.id);
    assert_eq!(found.company_role.as_str(), "admin");
}

#[tokio::test]
async fn test_deleting_company_detaches_users() {
    let db = setup_test_db().await;

    let acme = insert_company(&db, "Acme").await;
    let member = insert_user(&db, "m@example.com", Some(acme.id)).await;

    acme.delete(&db).await.unwrap();

    let member = User::find_by_id(member.id).one(&db).await.unwrap().unwrap();
    assert_eq!(member.company_id, None);
}

#[tokio::test]
async fn test_deleting_task_removes_calendar_entries() {
    let db = setup_test_db().await;

    let acme = insert_company(&db, "Acme").await;
    let owner = insert_user(&db, "o@example.com", Some(acme.id)).await;
    let target = insert_user(&db, "t@example.com", Some(acme.id)).await;

    let task = task::ActiveModel {
        company_id: Set(acme.id),
        owner_id: Set(owner.id),
        target_id: Set(target.id),
        start_date: Set(date(2025, 3, 1)),
        end_date: Set(date(2025, 3, 10)),
        title: Set("Write report".to_string()),
        description: Set("Quarterly numbers".to_string()),
        status: Set(TaskStatus::Todo),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    calendar_event::ActiveModel {
        user_id: Set(target.id),
        event_date: Set(task.end_date),
        event_time: Set(None),
        title: Set(task.title.clone()),
        type_event: Set(EventType::Task),
        task_id: Set(Some(task.id)),
        meeting_id: Set(None),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    assert_eq!(CalendarEvent::find().count(&db).await.unwrap(), 1);

    task.delete(&db).await.unwrap();

    assert_eq!(CalendarEvent::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_calendar_slot_is_unique_per_user() {
    let db = setup_test_db().await;

    let acme = insert_company(&db, "Acme").await;
    let organizer = insert_user(&db, "org@example.com", Some(acme.id)).await;

    let slot_date = date(2025, 4, 2);
    let slot_time = NaiveTime::from_hms_opt(10, 0, 0).unwrap();

    let mut meeting_ids = Vec::new();
    for title in ["Standup", "Retro"] {
        let m = meeting::ActiveModel {
            organizer_id: Set(organizer.id),
            company_id: Set(acme.id),
            title: Set(title.to_string()),
            description: Set(None),
            meeting_date: Set(slot_date),
            meeting_time: Set(slot_time),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();
        meeting_ids.push(m.id);
    }

    let entry = |meeting_id: i32| calendar_event::ActiveModel {
        user_id: Set(organizer.id),
        event_date: Set(slot_date),
        event_time: Set(Some(slot_time)),
        title: Set("meeting".to_string()),
        type_event: Set(EventType::Meeting),
        task_id: Set(None),
        meeting_id: Set(Some(meeting_id)),
        ..Default::default()
    };

    assert!(entry(meeting_ids[0]).insert(&db).await.is_ok());
    assert!(entry(meeting_ids[1]).insert(&db).await.is_err());
}

#[tokio::test]
async fn test_all_day_entries_do_not_collide() {
    let db = setup_test_db().await;

    let acme = insert_company(&db, "Acme").await;
    let owner = insert_user(&db, "o@example.com", Some(acme.id)).await;

    for title in ["First", "Second"] {
        let task = task::ActiveModel {
            company_id: Set(acme.id),
            owner_id: Set(owner.id),
            target_id: Set(owner.id),
            start_date: Set(date(2025, 5, 1)),
            end_date: Set(date(2025, 5, 9)),
            title: Set(title.to_string()),
            description: Set(String::new()),
            status: Set(TaskStatus::Todo),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        calendar_event::ActiveModel {
            user_id: Set(owner.id),
            event_date: Set(task.end_date),
            event_time: Set(None),
            title: Set(task.title),
            type_event: Set(EventType::Task),
            task_id: Set(Some(task.id)),
            meeting_id: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();
    }

    let on_day = CalendarEvent::find()
        .filter(calendar_event::Column::UserId.eq(owner.id))
        .filter(calendar_event::Column::EventDate.eq(date(2025, 5, 9)))
        .all(&db)
        .await
        .unwrap();

    assert_eq!(on_day.len(), 2);
}
