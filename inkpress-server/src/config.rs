//! Server configuration
//!
//! Settings come from an optional `inkpress.toml` next to the binary,
//! overridden by `INKPRESS_*` environment variables
//! (e.g. `INKPRESS_DATABASE_URL`, `INKPRESS_SERVER__PORT`).

use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// Server-side pepper mixed into every password hash. Required.
    pub password_pepper: String,
    #[serde(default = "default_session_days")]
    pub session_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub database_url: String,
    pub auth: AuthSettings,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_session_days() -> i64 {
    7
}

impl Settings {
    pub fn load() -> anyhow::Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name("inkpress").required(false))
            .add_source(Environment::with_prefix("INKPRESS").separator("__"))
            .build()?
            .try_deserialize::<Settings>()?;
        Ok(settings)
    }
}
