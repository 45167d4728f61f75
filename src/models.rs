pub mod auth;
pub mod complaint;
pub mod dashboard;
