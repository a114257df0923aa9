pub mod channels;
pub mod config;
pub mod errors;
pub mod headers;
pub mod store;
