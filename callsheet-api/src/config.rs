use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub cors: Option<CorsConfig>,
    pub server: Option<ServerConfig>,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub uploads: UploadConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            cors: Some(CorsConfig {
                allowed_origins: vec!["http://localhost:3000".to_string()],
            }),
            server: Some(ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            }),
            auth: AuthConfig::default(),
            uploads: UploadConfig::default(),
            database: DatabaseConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl_days")]
    pub token_ttl_days: u64,
    /// Marks the session cookie `Secure`; enable whenever served over HTTPS
    #[serde(default)]
    pub secure_cookies: bool,
}

fn default_token_ttl_days() -> u64 {
    30
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me".to_string(),
            token_ttl_days: default_token_ttl_days(),
            secure_cookies: false,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UploadConfig {
    /// Directory for in-flight uploads; defaults to the system temp dir
    pub dir: Option<PathBuf>,
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: usize,
}

fn default_max_file_size() -> usize {
    10 * 1024 * 1024
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: None,
            max_file_size_bytes: default_max_file_size(),
        }
    }
}

impl UploadConfig {
    pub fn upload_dir(&self) -> PathBuf {
        self.dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("callsheet-uploads"))
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct DatabaseConfig {
    /// Overrides the platform data directory location
    pub path: Option<PathBuf>,
}

const DEFAULT_CONFIG: &str = r#"
[cors]
allowed_origins = ["http://localhost:3000"]

[server]
host = "127.0.0.1"
port = 8080

[auth]
# Secret used to sign session tokens. Replace before exposing the server.
jwt_secret = "change-me"
token_ttl_days = 30
secure_cookies = false

[uploads]
# dir = "/var/tmp/callsheet-uploads"
max_file_size_bytes = 10485760

[database]
# path = "/var/lib/callsheet/db.sqlite"
"#;

impl ApiConfig {
    /// Loads the config file (writing the default one on first run), then
    /// applies `CALLSHEET__SECTION__KEY` environment overrides.
    pub fn load(path: Option<&Path>) -> Result<(Self, PathBuf), ConfigError> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(get_config_path);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        if !config_path.exists() {
            std::fs::write(&config_path, DEFAULT_CONFIG).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let builder = Config::builder()
            .add_source(File::from(config_path.clone()))
            .add_source(
                Environment::with_prefix("CALLSHEET")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: ApiConfig = builder.try_deserialize()?;

        Ok((config, config_path))
    }
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("callsheet").join("api.toml")
    } else {
        PathBuf::from("api.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Environment overrides are process-wide; loads must not interleave
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_load_writes_default_config() {
        let _env = ENV_LOCK.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("api.toml");

        let (config, loaded_from) = ApiConfig::load(Some(&path)).unwrap();

        assert!(path.exists());
        assert_eq!(loaded_from, path);
        assert_eq!(config.server.unwrap().port, 8080);
        assert_eq!(config.auth.token_ttl_days, 30);
        assert_eq!(config.uploads.max_file_size_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_load_reads_existing_file() {
        let _env = ENV_LOCK.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api.toml");
        std::fs::write(
            &path,
            "[auth]\njwt_secret = \"s3cret\"\n\n[uploads]\nmax_file_size_bytes = 1024\n",
        )
        .unwrap();

        let (config, _) = ApiConfig::load(Some(&path)).unwrap();

        assert_eq!(config.auth.jwt_secret, "s3cret");
        assert_eq!(config.auth.token_ttl_days, 30);
        assert_eq!(config.uploads.max_file_size_bytes, 1024);
        assert!(config.server.is_none());
    }

    #[test]
    fn test_environment_overrides_file() {
        let _env = ENV_LOCK.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api.toml");

        std::env::set_var("CALLSHEET__UPLOADS__MAX_FILE_SIZE_BYTES", "2048");
        std::env::set_var("CALLSHEET__AUTH__JWT_SECRET", "from-env");
        let result = ApiConfig::load(Some(&path));
        std::env::remove_var("CALLSHEET__UPLOADS__MAX_FILE_SIZE_BYTES");
        std::env::remove_var("CALLSHEET__AUTH__JWT_SECRET");

        let (config, _) = result.unwrap();
        assert_eq!(config.uploads.max_file_size_bytes, 2048);
        assert_eq!(config.auth.jwt_secret, "from-env");
        assert_eq!(config.auth.token_ttl_days, 30);
    }
}
