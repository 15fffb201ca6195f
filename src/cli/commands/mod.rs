pub mod auth;
pub mod documents;
pub mod reviews;
pub mod users;
