pub mod auth;
pub mod authorization;
pub mod complaint_service;
pub mod dashboard_service;
