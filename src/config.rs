//! Server configuration, loaded from environment variables at startup.

/// Runtime configuration for taskboard-server.
///
/// Every field has a sensible default so the server works out-of-the-box
/// without any environment variables set.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:3001"`).
    pub bind_address: String,

    /// SQLite (or other) database URL (default: `"sqlite://taskboard.db"`).
    /// Supports any sqlx-compatible connection string; use
    /// `"sqlite::memory:"` for throwaway instances.
    pub database_url: String,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Comma-separated list of allowed CORS origins.
    /// `None` means wildcard (development default).
    pub cors_allowed_origins: Option<String>,

    /// Serve Swagger UI at `/swagger-ui` (default: `true`).
    pub enable_swagger: bool,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            bind_address: env_or("TASKBOARD_BIND", "0.0.0.0:3001"),
            database_url: env_or("TASKBOARD_DATABASE_URL", "sqlite://taskboard.db"),
            log_level: env_or("TASKBOARD_LOG", "info"),
            log_json: env_flag("TASKBOARD_LOG_JSON", false),
            cors_allowed_origins: std::env::var("TASKBOARD_CORS_ORIGINS").ok(),
            enable_swagger: env_flag("TASKBOARD_ENABLE_SWAGGER", true),
        }
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(default)
}
