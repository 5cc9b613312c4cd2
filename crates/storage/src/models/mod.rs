mod club;
mod competition;
mod event;
mod registration;
mod user;

pub use club::Club;
pub use competition::Competition;
pub use event::Event;
pub use registration::Registration;
pub use user::User;
