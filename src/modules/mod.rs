pub mod auth;
pub mod rating;
pub mod video;
pub mod watch;
