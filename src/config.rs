use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Optional configuration file, read from the working directory.
pub const CONFIG_FILE: &str = "recordings.toml";

/// Environment variables carrying the database credentials, and the config key each one sets.
const CREDENTIAL_VARS: [(&str, &str); 2] = [
    ("DBUSER", "database.user"),
    ("DBPASS", "database.password"),
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub listen_addr: String,
    pub loglevel: String,
    pub database: DatabaseConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "localhost:8080".to_string(),
            loglevel: "info".to_string(),
            database: DatabaseConfig::default(),
        }
    }
}

/// Connection settings for the album database.
///
/// `url` takes precedence over the discrete fields when present; a `sqlite:` URL
/// selects the SQLite backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    pub user: String,
    pub password: String,
    /// `tcp` or `unix`
    pub net: String,
    pub addr: String,
    pub db_name: String,
    pub allow_native_passwords: bool,
    pub acquire_timeout_secs: u64,
    pub url: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            user: String::new(),
            password: String::new(),
            net: "tcp".to_string(),
            addr: "127.0.0.1:3306".to_string(),
            db_name: "recordings".to_string(),
            allow_native_passwords: true,
            acquire_timeout_secs: 30,
            url: None,
        }
    }
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// Human readable target for logs. Never includes the password.
    pub fn display_target(&self) -> String {
        match self.url.as_deref() {
            Some(url) => redact_url(url),
            None => format!(
                "mysql://{}@{}({})/{}",
                self.user, self.net, self.addr, self.db_name
            ),
        }
    }
}

impl Config {
    /// Layering: defaults, then `recordings.toml`, then `DBUSER`/`DBPASS`,
    /// then `RECORDINGS_*` variables (`__` separates nested keys).
    pub fn figment() -> Figment {
        let mut figment =
            Figment::from(Serialized::defaults(Config::default())).merge(Toml::file(CONFIG_FILE));

        // Read directly so numeric-looking passwords stay strings.
        for (var, key) in CREDENTIAL_VARS {
            if let Ok(value) = std::env::var(var) {
                figment = figment.merge(Serialized::default(key, value));
            }
        }

        figment.merge(Env::prefixed("RECORDINGS_").split("__"))
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }
}

fn redact_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    match rest.rsplit_once('@') {
        Some((userinfo, host)) => {
            let user = userinfo.split(':').next().unwrap_or_default();
            format!("{scheme}://{user}:<redacted>@{host}")
        }
        None => url.to_string(),
    }
}
