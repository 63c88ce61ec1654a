//! Database entities

pub mod calendar_event;
pub mod comment;
pub mod company;
pub mod department;
pub mod meeting;
pub mod news;
pub mod rating;
pub mod task;
pub mod user;

pub use calendar_event::Entity as CalendarEvent;
pub use comment::Entity as Comment;
pub use company::Entity as Company;
pub use department::Entity as Department;
pub use meeting::Entity as Meeting;
pub use news::Entity as News;
pub use rating::Entity as Rating;
pub use task::Entity as Task;
pub use user::Entity as User;

pub mod prelude {
    pub use super::calendar_event::{Entity as CalendarEvent, EventType};
    pub use super::comment::Entity as Comment;
    pub use super::company::Entity as Company;
    pub use super::department::Entity as Department;
    pub use super::meeting::Entity as Meeting;
    pub use super::news::Entity as News;
    pub use super::rating::Entity as Rating;
    pub use super::task::{Entity as Task, TaskStatus};
    pub use super::user::{CompanyRole, Entity as User};
}
