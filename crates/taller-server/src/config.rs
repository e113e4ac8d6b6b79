use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Server configuration, loaded from a TOML file:
///
/// ```toml
/// [server]
/// listen = "0.0.0.0:8080"
///
/// [storage]
/// database_url = "sqlite://taller.db?mode=rwc"
///
/// [auth]
/// secret_key = "..."          # or TALLER_SECRET_KEY env var
/// session_ttl_secs = 43200
/// password_iterations = 600000
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSection,
    pub storage: StorageSection,
    pub auth: AuthSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self { listen: default_listen() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSection {
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSection {
    /// Master secret. Sourcing from TALLER_SECRET_KEY wins over the file so
    /// the secret can stay out of version-controlled configs.
    #[serde(default)]
    pub secret_key: String,

    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: i64,

    #[serde(default = "default_password_iterations")]
    pub password_iterations: u32,
}

fn default_listen() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_session_ttl() -> i64 {
    12 * 60 * 60
}

fn default_password_iterations() -> u32 {
    600_000
}

impl ServerConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read config {}: {e}", path.display()))?;
        let mut config: ServerConfig = toml::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("invalid config {}: {e}", path.display()))?;

        if let Ok(secret) = std::env::var("TALLER_SECRET_KEY") {
            let secret = normalize_value(&secret);
            if !secret.is_empty() {
                config.auth.secret_key = secret;
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.storage.database_url.trim().is_empty() {
            anyhow::bail!("storage.database_url is required");
        }
        if self.auth.secret_key.trim().is_empty() {
            anyhow::bail!("auth.secret_key (or TALLER_SECRET_KEY) is required");
        }
        if self.auth.session_ttl_secs <= 0 {
            anyhow::bail!("auth.session_ttl_secs must be positive");
        }
        if self.auth.password_iterations == 0 {
            anyhow::bail!("auth.password_iterations must be non-zero");
        }
        Ok(())
    }

    /// Resolve a config argument: a bare name maps to
    /// `/etc/taller/<name>.toml`, anything with a separator or extension is
    /// used as a path directly.
    pub fn resolve_path(arg: &str) -> PathBuf {
        if arg.contains('/') || arg.contains('.') {
            PathBuf::from(arg)
        } else {
            PathBuf::from(format!("/etc/taller/{arg}.toml"))
        }
    }
}

fn normalize_value(raw: &str) -> String {
    let trimmed = raw.trim();

    if let Some(inner) = trimmed.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        return inner.trim().to_string();
    }
    if let Some(inner) = trimmed.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
        return inner.trim().to_string();
    }

    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_config() {
        let cfg: ServerConfig = toml::from_str(
            r#"
            [storage]
            database_url = "sqlite::memory:"

            [auth]
            secret_key = "s3cr3t"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.server.listen, "0.0.0.0:8080");
        assert_eq!(cfg.auth.session_ttl_secs, 12 * 60 * 60);
        assert_eq!(cfg.auth.password_iterations, 600_000);
        cfg.validate().unwrap();
    }

    #[test]
    fn missing_secret_fails_validation() {
        let cfg: ServerConfig = toml::from_str(
            r#"
            [storage]
            database_url = "sqlite::memory:"

            [auth]
            "#,
        )
        .unwrap();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn resolve_path_bare_name_vs_path() {
        assert_eq!(
            ServerConfig::resolve_path("produccion"),
            PathBuf::from("/etc/taller/produccion.toml")
        );
        assert_eq!(
            ServerConfig::resolve_path("./local.toml"),
            PathBuf::from("./local.toml")
        );
    }

    #[test]
    fn normalize_value_strips_quotes() {
        assert_eq!(normalize_value("\"abc\""), "abc");
        assert_eq!(normalize_value("'abc'"), "abc");
        assert_eq!(normalize_value("  abc  "), "abc");
    }
}
