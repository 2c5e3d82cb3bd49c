use std::{env, sync::Arc};

#[derive(Clone, Debug)]
/// Configuration struct for the server.
///
/// Holds everything needed to initialize and run the service:
/// database connection details, server host and port, worker count,
/// CORS settings, logging preferences, and the rate-limiting knobs
/// for the global and per-IP burst limiters.
pub struct Config {
    // environment
    pub environment: String, // development or production
    /// The URL of the database to connect to.
    pub database_url: String,
    /// The hostname or IP address the server will bind to.
    pub server_host: String,
    /// The port number the server will listen on.
    pub server_port: u16,
    /// The number of worker threads to spawn for handling requests.
    pub num_workers: usize,
    /// The allowed origin for CORS (Cross-Origin Resource Sharing).
    pub cors_allowed_origin: String,
    /// A boolean indicating whether console logging is enabled.
    pub console_logging_enabled: bool,
    /// Process-wide request ceiling, in permits per second.
    pub global_rate_limit: u32,
    /// Per-IP burst limiter applied to generation endpoints.
    pub burst: BurstConfig,
}

#[derive(Clone, Debug)]
/// Fixed-window burst limiter settings for a route group.
pub struct BurstConfig {
    /// Maximum requests allowed per client IP within one window.
    pub max: u32,
    /// Window length in milliseconds.
    pub window_ms: u64,
}

impl Config {
    /// Creates a new `Config` instance from environment variables.
    ///
    /// Required:
    /// - `ENVIRONMENT`: "development" or "production"
    /// - `DATABASE_URL`: Connection string for the database
    ///
    /// Optional (with defaults):
    /// - `IP`: Server host (default: "127.0.0.1")
    /// - `PORT`: Server port (default: 8080)
    /// - `WORKERS`: Number of worker threads (default: 4)
    /// - `CORS_ALLOWED_ORIGIN`: Allowed CORS origin (default: "http://localhost:3000")
    /// - `ENABLE_CONSOLE_LOGGING`: Whether to enable console logging (default: true)
    /// - `GLOBAL_RATE_LIMIT`: Requests per second across all clients (default: 50)
    /// - `BURST_MAX`: Requests per IP per burst window (default: 10)
    /// - `BURST_WINDOW_MS`: Burst window length in milliseconds (default: 60000)
    ///
    /// # Panics
    ///
    /// Panics if a required environment variable is missing.
    pub fn from_env() -> Arc<Self> {
        dotenvy::dotenv().ok();

        Arc::new(Config {
            environment: env::var("ENVIRONMENT").expect("ENVIRONMENT must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            server_host: env::var("IP").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            num_workers: env::var("WORKERS")
                .unwrap_or_else(|_| "4".to_string())
                .parse()
                .unwrap_or(4),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            console_logging_enabled: env::var("ENABLE_CONSOLE_LOGGING")
                .unwrap_or_else(|_| "true".to_string())
                .to_lowercase()
                == "true",
            global_rate_limit: env::var("GLOBAL_RATE_LIMIT")
                .unwrap_or_else(|_| "50".to_string())
                .parse()
                .unwrap_or(50),
            burst: BurstConfig {
                max: env::var("BURST_MAX")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .unwrap_or(10),
                window_ms: env::var("BURST_WINDOW_MS")
                    .unwrap_or_else(|_| "60000".to_string())
                    .parse()
                    .unwrap_or(60_000),
            },
        })
    }
}
