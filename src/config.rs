use std::env;

/// Default FQL endpoint of the hosted database.
pub const DEFAULT_FAUNA_ENDPOINT: &str = "https://db.fauna.com/";

/// AppConfig
///
/// Holds the service configuration. Loaded once at startup and shared
/// read-only through `AppState`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Selects log format and secret policy.
    pub env: Env,
    // Database access key, sent as a bearer token with every query.
    pub fauna_secret: String,
    // FQL endpoint the queries are posted to.
    pub fauna_endpoint: String,
    // Directory holding the routed HTML pages (index.html, 404.html, ...).
    pub pages_dir: String,
    // Directory holding unguarded static assets (css, js, images).
    pub assets_dir: String,
    // Socket address the HTTP listener binds to.
    pub bind_addr: String,
}

/// Env
///
/// Runtime context. `Local` tolerates missing secrets, `Production` does not.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

const LOCAL_FAUNA_SECRET: &str = "local-dev-secret";

impl Default for AppConfig {
    /// Non-panicking configuration used to scaffold test state.
    fn default() -> Self {
        Self {
            env: Env::Local,
            fauna_secret: LOCAL_FAUNA_SECRET.to_string(),
            fauna_endpoint: DEFAULT_FAUNA_ENDPOINT.to_string(),
            pages_dir: "htdocs".to_string(),
            assets_dir: "htdocs/public".to_string(),
            bind_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables.
    ///
    /// # Panics
    /// Panics in `Production` when `FAUNADB_SECRET` is not set, so the service
    /// never starts without database credentials.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let fauna_secret = match env {
            Env::Production => env::var("FAUNADB_SECRET")
                .expect("FATAL: FAUNADB_SECRET must be set in production."),
            Env::Local => {
                env::var("FAUNADB_SECRET").unwrap_or_else(|_| LOCAL_FAUNA_SECRET.to_string())
            }
        };

        let defaults = Self::default();

        Self {
            env,
            fauna_secret,
            fauna_endpoint: env::var("FAUNADB_ENDPOINT").unwrap_or(defaults.fauna_endpoint),
            pages_dir: env::var("PAGES_DIR").unwrap_or(defaults.pages_dir),
            assets_dir: env::var("ASSETS_DIR").unwrap_or(defaults.assets_dir),
            bind_addr: env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
        }
    }
}
