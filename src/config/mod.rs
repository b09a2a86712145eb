// Configuration module entry point
// Layers defaults, an optional TOML file, FILEWALKER_* environment variables
// and command line overrides into one `Config`

mod state;
mod types;

use std::net::SocketAddr;

use config::ConfigError;

use crate::logger::Level;

pub use state::AppState;
pub use types::{Config, HttpConfig, LoggingConfig, PerformanceConfig, ServeConfig, ServerConfig};

/// Smallest accepted download chunk
pub const MIN_CHUNK_SIZE: usize = 1024;

/// Values given on the command line; `None` leaves lower layers in effect
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub root: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub workers: Option<usize>,
}

impl Config {
    /// Load configuration from specified file path (extension optional)
    ///
    /// A missing file is not an error; defaults and the environment still apply.
    pub fn load_from(config_path: &str, overrides: &Overrides) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8888)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.backlog", 128)?
            .set_default("performance.shutdown_grace_period", 10)?
            .set_default("http.server_name", "filewalker")?
            .set_default("serve.chunk_size", 65_536)?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("FILEWALKER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("serve.root", overrides.root.clone())?
            .set_override_option("server.host", overrides.host.clone())?
            .set_override_option("server.port", overrides.port.map(i64::from))?
            .set_override_option(
                "server.workers",
                overrides.workers.and_then(|w| i64::try_from(w).ok()),
            )?
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the server cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.workers == Some(0) {
            return Err(ConfigError::Message(
                "server.workers must be at least 1".to_string(),
            ));
        }
        if self.serve.chunk_size < MIN_CHUNK_SIZE {
            return Err(ConfigError::Message(format!(
                "serve.chunk_size must be at least {MIN_CHUNK_SIZE} bytes"
            )));
        }
        if self.performance.backlog <= 0 {
            return Err(ConfigError::Message(
                "performance.backlog must be positive".to_string(),
            ));
        }
        self.logging
            .level
            .parse::<Level>()
            .map_err(ConfigError::Message)?;
        Ok(())
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_file(dir: &TempDir) -> String {
        dir.path().join("absent").to_string_lossy().into_owned()
    }

    #[test]
    fn test_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = Config::load_from(&no_file(&dir), &Overrides::default()).unwrap();

        assert_eq!(cfg.server.port, 8888);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.workers, None);
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert_eq!(cfg.serve.chunk_size, 65_536);
        assert_eq!(cfg.performance.backlog, 128);
        assert_eq!(cfg.http.server_name, "filewalker");
        assert!(cfg.serve.root.is_none());
    }

    #[test]
    fn test_file_then_overrides() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("walker.toml");
        std::fs::write(
            &path,
            r#"
[server]
host = "127.0.0.1"
port = 9000

[serve]
root = "/srv/from-file"
chunk_size = 4096

[logging]
level = "debug"
access_log = false
"#,
        )
        .unwrap();

        let overrides = Overrides {
            root: Some("/srv/from-cli".to_string()),
            port: Some(9100),
            ..Overrides::default()
        };
        let cfg = Config::load_from(path.to_str().unwrap(), &overrides).unwrap();

        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.serve.root.as_deref(), Some("/srv/from-cli"));
        assert_eq!(cfg.serve.chunk_size, 4096);
        assert_eq!(cfg.logging.level, "debug");
        assert!(!cfg.logging.access_log);
        assert_eq!(cfg.get_socket_addr().unwrap().to_string(), "127.0.0.1:9100");
    }

    #[test]
    fn test_rejects_zero_workers() {
        let dir = TempDir::new().unwrap();
        let overrides = Overrides {
            workers: Some(0),
            ..Overrides::default()
        };
        assert!(Config::load_from(&no_file(&dir), &overrides).is_err());
    }

    #[test]
    fn test_rejects_tiny_chunks_and_bad_level() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[serve]\nchunk_size = 16\n").unwrap();
        assert!(Config::load_from(path.to_str().unwrap(), &Overrides::default()).is_err());

        std::fs::write(&path, "[logging]\nlevel = \"loud\"\n").unwrap();
        assert!(Config::load_from(path.to_str().unwrap(), &Overrides::default()).is_err());
    }
}
