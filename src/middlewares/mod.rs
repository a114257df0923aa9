pub mod auth;
pub mod log;
pub mod version;
