use std::collections::HashMap;
use std::path::Path;

/// Resolved connection parameters, derived once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing {0}")]
    MissingVar(&'static str),
    #[error("Invalid {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Simple `KEY=VALUE` file. Values are taken verbatim (quotes are not stripped).
#[derive(Debug, Default)]
pub struct EnvFile {
    vars: HashMap<String, String>,
}

impl EnvFile {
    /// Load `path` if it exists; a missing or unreadable file is an empty map.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::parse(&text),
            Err(_) => Self::default(),
        }
    }

    pub fn parse(text: &str) -> Self {
        let mut vars = HashMap::new();
        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            vars.insert(key.trim().to_string(), value.trim().to_string());
        }
        Self { vars }
    }

    /// First non-empty value among `names`. For each name the OS environment
    /// is consulted before the file.
    pub fn var(&self, names: &[&str]) -> Option<String> {
        for name in names {
            if let Ok(v) = std::env::var(name) {
                if !v.is_empty() {
                    return Some(v);
                }
            }
            if let Some(v) = self.vars.get(*name) {
                if !v.is_empty() {
                    return Some(v.clone());
                }
            }
        }
        None
    }
}

impl Config {
    /// Resolve connection parameters from the environment and `env_file`.
    /// No network I/O happens here.
    pub fn resolve(env_file: &EnvFile) -> Result<Self, ConfigError> {
        let url = env_file
            .var(&["SUPABASE_URL", "VITE_SUPABASE_URL"])
            .ok_or(ConfigError::MissingVar("SUPABASE_URL/VITE_SUPABASE_URL"))?;
        let password = env_file
            .var(&["SUPABASE_DB_PASSWORD", "VITE_SUPABASE_DB_PASSWORD"])
            .ok_or(ConfigError::MissingVar(
                "SUPABASE_DB_PASSWORD/VITE_SUPABASE_DB_PASSWORD",
            ))?;

        let host = env_file
            .var(&["SUPABASE_DB_HOST"])
            .unwrap_or_else(|| format!("db.{}.supabase.co", project_ref(&url)));
        let port = match env_file.var(&["SUPABASE_DB_PORT"]) {
            Some(v) => v.parse().map_err(|_| ConfigError::InvalidValue {
                name: "SUPABASE_DB_PORT",
                value: v,
            })?,
            None => 5432,
        };
        let dbname = env_file
            .var(&["SUPABASE_DB_NAME"])
            .unwrap_or_else(|| "postgres".to_string());
        let user = env_file
            .var(&["SUPABASE_DB_USER"])
            .unwrap_or_else(|| "postgres".to_string());

        Ok(Self {
            host,
            port,
            dbname,
            user,
            password,
        })
    }
}

/// Project ref from a project URL. Expected shape: `https://<ref>.supabase.co`.
pub fn project_ref(url: &str) -> &str {
    let host = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let host = host.split('/').next().unwrap_or(host);
    host.split('.').next().unwrap_or(host)
}
