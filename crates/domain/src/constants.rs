//! Client constants
//!
//! Defaults and header names shared by configuration and the HTTP layer.

// Endpoints
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3001/api";
pub const PRODUCTION_API_BASE_URL: &str = "https://farmersmarket.com/api";
pub const REFRESH_PATH: &str = "/auth/refresh";
pub const HEALTH_PATH: &str = "/health";

// Timeouts
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const UPLOAD_TIMEOUT_SECS: u64 = 60;
pub const HEALTH_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_PROBE_INTERVAL_SECS: u64 = 15;

// Client identification headers
pub const HEADER_CLIENT_TYPE: &str = "x-client-type";
pub const HEADER_PLATFORM: &str = "x-platform";
pub const HEADER_APP_VERSION: &str = "x-app-version";
pub const DEFAULT_CLIENT_TYPE: &str = "mobile";
pub const DEFAULT_APP_VERSION: &str = "1.0.0";

// Secure storage
pub const DEFAULT_KEYCHAIN_SERVICE: &str = "farmlink";

// Domain defaults
pub const DEFAULT_NEARBY_RADIUS_KM: u32 = 50;
pub const DEFAULT_TOP_PRODUCTS_LIMIT: u32 = 10;
pub const DEFAULT_CURRENCY: &str = "usd";
pub const DEFAULT_UPLOAD_FOLDER: &str = "products";
