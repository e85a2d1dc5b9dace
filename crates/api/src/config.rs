use agora_core::token::KEY_SIZE;

/// Token configuration: the symmetric key and the two lifetimes.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// 32-byte symmetric key for access-token encryption.
    pub key: Vec<u8>,
    /// Access token lifetime in minutes (default: `15`).
    pub access_ttl_mins: i64,
    /// Session lifetime in hours (default: `24`).
    pub session_ttl_hours: i64,
}

impl TokenConfig {
    /// Load token configuration from environment variables.
    ///
    /// `TOKEN_KEY` is mandatory and must be exactly 32 bytes; everything
    /// else has a default. Panics on a missing or malformed value so a
    /// misconfigured deployment fails at startup instead of at first login.
    pub fn from_env() -> Self {
        let key = std::env::var("TOKEN_KEY")
            .expect("TOKEN_KEY must be set")
            .into_bytes();
        assert_eq!(
            key.len(),
            KEY_SIZE,
            "TOKEN_KEY must be exactly {KEY_SIZE} bytes"
        );

        let access_ttl_mins: i64 = std::env::var("ACCESS_TOKEN_TTL_MINS")
            .unwrap_or_else(|_| "15".into())
            .parse()
            .expect("ACCESS_TOKEN_TTL_MINS must be a valid i64");

        let session_ttl_hours: i64 = std::env::var("SESSION_TTL_HOURS")
            .unwrap_or_else(|_| "24".into())
            .parse()
            .expect("SESSION_TTL_HOURS must be a valid i64");

        Self {
            key,
            access_ttl_mins,
            session_ttl_hours,
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields except the token key have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// HTTP bind port (default: `3000`).
    pub port: u16,
    /// RPC bind port (default: `3001`).
    pub rpc_port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory where uploaded photos are stored (default: `./media`).
    pub media_dir: String,
    /// How often the expired-session sweep runs, in seconds (default: `3600`).
    pub session_sweep_interval_secs: u64,
    /// Token configuration (key, lifetimes).
    pub token: TokenConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                 |
    /// |------------------------------|-------------------------|
    /// | `HOST`                       | `0.0.0.0`               |
    /// | `PORT`                       | `3000`                  |
    /// | `RPC_PORT`                   | `3001`                  |
    /// | `CORS_ORIGINS`               | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                    |
    /// | `MEDIA_DIR`                  | `./media`               |
    /// | `SESSION_SWEEP_INTERVAL_SECS`| `3600`                  |
    /// | `TOKEN_KEY`                  | (required, 32 bytes)    |
    /// | `ACCESS_TOKEN_TTL_MINS`      | `15`                    |
    /// | `SESSION_TTL_HOURS`          | `24`                    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let rpc_port: u16 = std::env::var("RPC_PORT")
            .unwrap_or_else(|_| "3001".into())
            .parse()
            .expect("RPC_PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let media_dir = std::env::var("MEDIA_DIR").unwrap_or_else(|_| "./media".into());

        let session_sweep_interval_secs: u64 = std::env::var("SESSION_SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| "3600".into())
            .parse()
            .expect("SESSION_SWEEP_INTERVAL_SECS must be a valid u64");

        Self {
            host,
            port,
            rpc_port,
            cors_origins,
            request_timeout_secs,
            media_dir,
            session_sweep_interval_secs,
            token: TokenConfig::from_env(),
        }
    }
}
