//! Initial schema: org structure, tasks, meetings, calendar and news

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ============================================================
        // 1. companies
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Company::Table)
                    .if_not_exists()
                    .col(pk_auto(Company::Id))
                    .col(string_len(Company::Name, 40).not_null().unique_key())
                    .col(string_len_null(Company::Description, 200))
                    .col(string_len(Company::CompanyCode, 4).not_null())
                    .col(string_len(Company::AdminCode, 6).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_companies_company_code")
                    .table(Company::Table)
                    .col(Company::CompanyCode)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 2. users
        // ============================================================
        // department_id carries no foreign key: departments reference users
        // through head_user_id, and the service layer clears department_id
        // whenever a department goes away.
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(pk_auto(User::Id))
                    .col(string_len(User::FirstName, 40).not_null())
                    .col(string_len(User::LastName, 40).not_null())
                    .col(string_len(User::Email, 255).not_null().unique_key())
                    .col(string_len(User::PasswordHash, 1024).not_null())
                    .col(
                        string_len(User::CompanyRole, 32)
                            .not_null()
                            .default("employee"),
                    )
                    .col(integer_null(User::CompanyId))
                    .col(integer_null(User::DepartmentId))
                    .col(boolean(User::IsActive).not_null().default(true))
                    .col(
                        timestamp_with_time_zone(User::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_company_id")
                            .from(User::Table, User::CompanyId)
                            .to(Company::Table, Company::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_company_id")
                    .table(User::Table)
                    .col(User::CompanyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_department_id")
                    .table(User::Table)
                    .col(User::DepartmentId)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 3. departments
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Department::Table)
                    .if_not_exists()
                    .col(pk_auto(Department::Id))
                    .col(string_len(Department::Name, 40).not_null().unique_key())
                    .col(integer(Department::CompanyId).not_null())
                    .col(integer(Department::HeadUserId).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_departments_company_id")
                            .from(Department::Table, Department::CompanyId)
                            .to(Company::Table, Company::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_departments_head_user_id")
                            .from(Department::Table, Department::HeadUserId)
                            .to(User::Table, User::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_departments_company_id")
                    .table(Department::Table)
                    .col(Department::CompanyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_departments_head_user_id")
                    .table(Department::Table)
                    .col(Department::HeadUserId)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 4. tasks
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Task::Table)
                    .if_not_exists()
                    .col(pk_auto(Task::Id))
                    .col(integer(Task::CompanyId).not_null())
                    .col(integer(Task::OwnerId).not_null())
                    .col(integer(Task::TargetId).not_null())
                    .col(date(Task::StartDate).not_null())
                    .col(date(Task::EndDate).not_null())
                    .col(string_len(Task::Title, 400).not_null())
                    .col(string_len(Task::Description, 1024).not_null())
                    .col(string_len(Task::Status, 32).not_null().default("todo"))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tasks_company_id")
                            .from(Task::Table, Task::CompanyId)
                            .to(Company::Table, Company::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tasks_owner_id")
                            .from(Task::Table, Task::OwnerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tasks_target_id")
                            .from(Task::Table, Task::TargetId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_tasks_target_id")
                    .table(Task::Table)
                    .col(Task::TargetId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_tasks_owner_id")
                    .table(Task::Table)
                    .col(Task::OwnerId)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 5. comments
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Comment::Table)
                    .if_not_exists()
                    .col(pk_auto(Comment::Id))
                    .col(integer(Comment::AuthorId).not_null())
                    .col(integer(Comment::TaskId).not_null())
                    .col(string_len(Comment::Description, 1024).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_author_id")
                            .from(Comment::Table, Comment::AuthorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_task_id")
                            .from(Comment::Table, Comment::TaskId)
                            .to(Task::Table, Task::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_comments_task_id")
                    .table(Comment::Table)
                    .col(Comment::TaskId)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 6. ratings
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Rating::Table)
                    .if_not_exists()
                    .col(pk_auto(Rating::Id))
                    .col(integer(Rating::TaskId).not_null())
                    .col(integer(Rating::OwnerId).not_null())
                    .col(integer(Rating::HeadId).not_null())
                    .col(integer(Rating::ScoreDate).not_null())
                    .col(integer(Rating::ScoreQuality).not_null())
                    .col(integer(Rating::ScoreComplete).not_null())
                    .col(date(Rating::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ratings_task_id")
                            .from(Rating::Table, Rating::TaskId)
                            .to(Task::Table, Task::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ratings_owner_id")
                            .from(Rating::Table, Rating::OwnerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ratings_head_id")
                            .from(Rating::Table, Rating::HeadId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_ratings_owner_created")
                    .table(Rating::Table)
                    .col(Rating::OwnerId)
                    .col(Rating::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 7. meetings
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Meeting::Table)
                    .if_not_exists()
                    .col(pk_auto(Meeting::Id))
                    .col(integer(Meeting::OrganizerId).not_null())
                    .col(integer(Meeting::CompanyId).not_null())
                    .col(string_len(Meeting::Title, 40).not_null())
                    .col(string_len_null(Meeting::Description, 400))
                    .col(date(Meeting::MeetingDate).not_null())
                    .col(time(Meeting::MeetingTime).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meetings_organizer_id")
                            .from(Meeting::Table, Meeting::OrganizerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meetings_company_id")
                            .from(Meeting::Table, Meeting::CompanyId)
                            .to(Company::Table, Company::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_meetings_date_time")
                    .table(Meeting::Table)
                    .col(Meeting::MeetingDate)
                    .col(Meeting::MeetingTime)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 8. calendar_events
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(CalendarEvent::Table)
                    .if_not_exists()
                    .col(pk_auto(CalendarEvent::Id))
                    .col(integer(CalendarEvent::UserId).not_null())
                    .col(date(CalendarEvent::EventDate).not_null())
                    .col(time_null(CalendarEvent::EventTime))
                    .col(string_len(CalendarEvent::Title, 400).not_null())
                    .col(string_len(CalendarEvent::TypeEvent, 16).not_null())
                    .col(integer_null(CalendarEvent::TaskId))
                    .col(integer_null(CalendarEvent::MeetingId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_calendar_events_user_id")
                            .from(CalendarEvent::Table, CalendarEvent::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_calendar_events_task_id")
                            .from(CalendarEvent::Table, CalendarEvent::TaskId)
                            .to(Task::Table, Task::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_calendar_events_meeting_id")
                            .from(CalendarEvent::Table, CalendarEvent::MeetingId)
                            .to(Meeting::Table, Meeting::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uix_calendar_events_user_slot")
                    .table(CalendarEvent::Table)
                    .col(CalendarEvent::UserId)
                    .col(CalendarEvent::EventDate)
                    .col(CalendarEvent::EventTime)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_calendar_events_event_date")
                    .table(CalendarEvent::Table)
                    .col(CalendarEvent::EventDate)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 9. news
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(News::Table)
                    .if_not_exists()
                    .col(pk_auto(News::Id))
                    .col(integer(News::OwnerId).not_null())
                    .col(integer(News::CompanyId).not_null())
                    .col(string_len(News::Title, 100).not_null())
                    .col(string_len(News::Description, 1024).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_news_owner_id")
                            .from(News::Table, News::OwnerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_news_company_id")
                            .from(News::Table, News::CompanyId)
                            .to(Company::Table, Company::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_news_company_id")
                    .table(News::Table)
                    .col(News::CompanyId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(News::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CalendarEvent::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Meeting::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Rating::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Comment::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Task::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Department::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(User::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Company::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Company {
    #[sea_orm(iden = "companies")]
    Table,
    Id,
    Name,
    Description,
    CompanyCode,
    AdminCode,
}

#[derive(DeriveIden)]
enum User {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    PasswordHash,
    CompanyRole,
    CompanyId,
    DepartmentId,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Department {
    #[sea_orm(iden = "departments")]
    Table,
    Id,
    Name,
    CompanyId,
    HeadUserId,
}

#[derive(DeriveIden)]
enum Task {
    #[sea_orm(iden = "tasks")]
    Table,
    Id,
    CompanyId,
    OwnerId,
    TargetId,
    StartDate,
    EndDate,
    Title,
    Description,
    Status,
}

#[derive(DeriveIden)]
enum Comment {
    #[sea_orm(iden = "comments")]
    Table,
    Id,
    AuthorId,
    TaskId,
    Description,
}

#[derive(DeriveIden)]
enum Rating {
    #[sea_orm(iden = "ratings")]
    Table,
    Id,
    TaskId,
    OwnerId,
    HeadId,
    ScoreDate,
    ScoreQuality,
    ScoreComplete,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Meeting {
    #[sea_orm(iden = "meetings")]
    Table,
    Id,
    OrganizerId,
    CompanyId,
    Title,
    Description,
    MeetingDate,
    MeetingTime,
}

#[derive(DeriveIden)]
enum CalendarEvent {
    #[sea_orm(iden = "calendar_events")]
    Table,
    Id,
    UserId,
    EventDate,
    EventTime,
    Title,
    TypeEvent,
    TaskId,
    MeetingId,
}

#[derive(DeriveIden)]
enum News {
    #[sea_orm(iden = "news")]
    Table,
    Id,
    OwnerId,
    CompanyId,
    Title,
    Description,
}
