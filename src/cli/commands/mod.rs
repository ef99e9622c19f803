//! CLI command implementations

pub mod assignment;
pub mod auth;
pub mod dashboard;
pub mod delivery;
pub mod init;
pub mod notifications;
pub mod request;
pub mod workers;
pub mod worksite;
