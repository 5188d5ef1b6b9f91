//! Application-wide constants
//!
//! Centralized location for magic values to improve maintainability.

// =============================================================================
// Authentication & Security
// =============================================================================

/// Default access token lifetime in minutes
pub const DEFAULT_JWT_EXPIRATION_MINUTES: i64 = 15;

/// Longest accepted access token lifetime in minutes (one week)
pub const MAX_JWT_EXPIRATION_MINUTES: i64 = 7 * 24 * 60;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Seconds per minute (for token expiration calculation)
pub const SECONDS_PER_MINUTE: i64 = 60;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

/// JWT token type identifier
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// Value of the `type` claim carried by access tokens
pub const ACCESS_TOKEN_KIND: &str = "access";

// =============================================================================
// Server Configuration
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 5000;

// =============================================================================
// Environment
// =============================================================================

/// Database connection string variable
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";

/// Token signing secret variable
pub const ENV_JWT_SECRET: &str = "JWT_SECRET";

/// Access token lifetime variable
pub const ENV_JWT_EXPIRATION_MINUTES: &str = "JWT_EXPIRATION_MINUTES";

/// Listen address variable
pub const ENV_SERVER_HOST: &str = "SERVER_HOST";

/// Listen port variable
pub const ENV_SERVER_PORT: &str = "SERVER_PORT";

// =============================================================================
// Catalog
// =============================================================================

/// Field carrying the store-generated identifier in book documents
pub const BOOK_ID_FIELD: &str = "id";

/// Field used for duplicate detection
pub const BOOK_TITLE_FIELD: &str = "title";
