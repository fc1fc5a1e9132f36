use std::io;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }

const SUPPORTED_SCHEMES: [&str; 3] = ["mysql://", "mariadb://", "sqlite:"];

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), falling back to environment
    /// variables when no file is present, then normalize and validate.
    pub fn load_and_validate() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        let mut cfg = Self::load_file_or_env(&path)?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Only a missing file falls back to the environment; unreadable or
    /// malformed files are errors.
    pub fn load_file_or_env(path: &str) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => parse(&content).with_context(|| format!("invalid config file {path}")),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::from_env()),
            Err(e) => Err(anyhow::Error::new(e).context(format!("cannot read config file {path}"))),
        }
    }

    pub fn from_env() -> Self {
        let mut server = ServerConfig::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            server.port = port;
        }
        if let Some(w) = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok()) {
            server.worker_threads = Some(w);
        }
        Self { server, database: DatabaseConfig::from_env() }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.normalize_from_env();
        self.database.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl DatabaseConfig {
    /// Build from `DATABASE_URL`, or from the discrete `DB_*` variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.normalize_from_env();
        cfg
    }

    /// Fill an empty URL from the environment.
    pub fn normalize_from_env(&mut self) {
        if !self.url.trim().is_empty() {
            return;
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.url = url;
            return;
        }
        if let Some(url) = url_from_parts(
            std::env::var("DB_HOST").ok(),
            std::env::var("DB_PORT").ok(),
            std::env::var("DB_USER").ok(),
            std::env::var("DB_PASSWORD").ok(),
            std::env::var("DB_NAME").ok(),
        ) {
            self.url = url;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml, DATABASE_URL or DB_HOST/DB_NAME"));
        }
        let lower = self.url.to_lowercase();
        if !SUPPORTED_SCHEMES.iter().any(|s| lower.starts_with(s)) {
            return Err(anyhow!("database.url must start with one of {:?}", SUPPORTED_SCHEMES));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

/// Assemble a `mysql://` URL; host and database name are mandatory.
/// Credentials are percent-encoded into the userinfo part.
fn url_from_parts(
    host: Option<String>,
    port: Option<String>,
    user: Option<String>,
    password: Option<String>,
    name: Option<String>,
) -> Option<String> {
    let host = host.filter(|h| !h.trim().is_empty())?;
    let name = name.filter(|n| !n.trim().is_empty())?;
    let port = port.unwrap_or_else(|| "3306".to_string());
    let mut url = url::Url::parse(&format!("mysql://{host}:{port}/{name}")).ok()?;
    if let Some(user) = user.filter(|u| !u.is_empty()) {
        url.set_username(&user).ok()?;
        if let Some(password) = password.filter(|p| !p.is_empty()) {
            url.set_password(Some(&password)).ok()?;
        }
    }
    Some(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db(url: &str) -> DatabaseConfig {
        DatabaseConfig { url: url.into(), ..DatabaseConfig::default() }
    }

    #[test]
    fn parse_applies_defaults() {
        let cfg = parse("[server]\nhost = \"0.0.0.0\"\nport = 9000\n\n[database]\nurl = \"mysql://u:p@db:3306/app\"\n").unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.database.max_connections, 10);
        assert_eq!(cfg.database.min_connections, 2);
        assert!(!cfg.database.sqlx_logging);
    }

    #[test]
    fn validate_accepts_mysql_and_sqlite() {
        assert!(db("mysql://root@localhost:3306/app").validate().is_ok());
        assert!(db("sqlite::memory:").validate().is_ok());
    }

    #[test]
    fn validate_rejects_unknown_scheme_and_empty_url() {
        assert!(db("postgres://localhost/app").validate().is_err());
        assert!(db("").validate().is_err());
    }

    #[test]
    fn validate_rejects_inverted_pool_bounds() {
        let mut cfg = db("mysql://localhost/app");
        cfg.min_connections = 5;
        cfg.max_connections = 2;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn server_normalize_fills_defaults() {
        let mut s = ServerConfig { host: " ".into(), port: 8080, worker_threads: Some(0) };
        s.normalize().unwrap();
        assert_eq!(s.host, "127.0.0.1");
        assert_eq!(s.worker_threads, Some(4));
    }

    #[test]
    fn url_from_parts_builds_mysql_url() {
        let url = url_from_parts(Some("db".into()), None, Some("app".into()), Some("secret".into()), Some("billing".into()));
        assert_eq!(url.as_deref(), Some("mysql://app:secret@db:3306/billing"));
        assert!(url_from_parts(None, None, None, None, Some("billing".into())).is_none());
    }

    #[test]
    fn url_from_parts_escapes_credentials() {
        let url = url_from_parts(Some("db".into()), Some("3307".into()), Some("app user".into()), Some("p@ss/w:rd".into()), Some("billing".into()))
            .unwrap();
        assert_eq!(url, "mysql://app%20user:p%40ss%2Fw%3Ard@db:3307/billing");
        let parsed = url::Url::parse(&url).unwrap();
        assert_eq!(parsed.host_str(), Some("db"));
        assert_eq!(parsed.port(), Some(3307));
    }

    fn temp_config(name: &str, content: &str) -> String {
        let path = std::env::temp_dir().join(format!("customer_hub_{}_{}.toml", name, std::process::id()));
        std::fs::write(&path, content).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn malformed_config_file_is_an_error() {
        let path = temp_config("malformed", "[server]\nport = \"not a number\"\n");
        let res = AppConfig::load_file_or_env(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(res.is_err());
    }

    #[test]
    fn missing_config_file_falls_back_to_env() {
        let path = std::env::temp_dir().join("customer_hub_absent_config.toml");
        assert!(AppConfig::load_file_or_env(&path.to_string_lossy()).is_ok());
    }

    #[test]
    fn present_config_file_is_used() {
        let path = temp_config("valid", "[server]\nhost = \"0.0.0.0\"\nport = 9100\n");
        let res = AppConfig::load_file_or_env(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(res.unwrap().server.port, 9100);
    }
}
