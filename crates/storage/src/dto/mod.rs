pub mod common;
pub mod competition;
pub mod dashboard;
pub mod event;
pub mod registration;
pub mod user;
