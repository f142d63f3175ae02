pub mod api;
pub mod client;
pub mod config;
pub mod schema;
pub mod store;
pub mod tables;
pub const BASE_URL: &str = "http://localhost:8000";
pub const NOTES_API: &str = "api/notes";
pub const FOLDERS_API: &str = "api/folders";
pub const HEALTH_API: &str = "test";
