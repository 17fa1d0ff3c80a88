//! Application constants and configuration

/// Directory daemon resolving subscription references, local by default.
pub const DEFAULT_DIRECTORY_URL: &str = "http://127.0.0.1:8640";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
