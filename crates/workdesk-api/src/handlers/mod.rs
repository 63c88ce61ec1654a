//! HTTP handlers, one module per resource

pub mod auth;
pub mod calendar;
pub mod companies;
pub mod departments;
pub mod meetings;
pub mod news;
pub mod system;
pub mod tasks;
pub mod users;
