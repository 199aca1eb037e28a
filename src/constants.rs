//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Default origin for composed requests
pub const DEFAULT_BASE_URL: &str = "https://apisandbox.facturama.mx";

/// Placeholder shown in the Authorization header until the user fills it in
pub const DEFAULT_AUTHORIZATION: &str = "Basic [Base64(username:password)]";

/// Content type forced on every composed request
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Default transport timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Name of the config directory under the user's home
pub const CONFIG_DIR_NAME: &str = ".facturama-sandbox";

/// Config file name inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Default log file (relative to the working directory)
pub const DEFAULT_LOG_FILE: &str = "facturama-sandbox.log";

/// Application name
pub const APP_NAME: &str = "Facturama Sandbox";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
