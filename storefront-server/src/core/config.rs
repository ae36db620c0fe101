//! Server configuration
//!
//! Every setting can be overridden through an environment variable:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | WORK_DIR | /var/lib/storefront | Working directory (store, logs) |
//! | HTTP_PORT | 3000 | HTTP API port |
//! | ENVIRONMENT | development | development \| staging \| production |
//! | SHOWCASE_LIMIT | 6 | Max categories on the homepage showcase |
//! | DEFAULT_FEATURED_LIMIT | 4 | Default featured-product cap per category |

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory holding the embedded store and logs
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    /// Max categories on the homepage showcase
    pub showcase_limit: u32,
    /// Featured-product cap applied to categories created without one
    pub default_featured_limit: u32,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/storefront".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            showcase_limit: std::env::var("SHOWCASE_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(6),
            default_featured_limit: std::env::var("DEFAULT_FEATURED_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(4),
        }
    }

    /// Override work dir and port, keeping everything else from the
    /// environment. Used by tests.
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// Directory of the embedded store
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("data")
    }

    /// Directory of the rotating application logs
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }
}
