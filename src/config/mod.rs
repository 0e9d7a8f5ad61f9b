use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use crate::error::{Result, SwsError};

const CONFIG_DIR_NAME: &str = ".sws";
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Versioned service root; the public tier lives under `public/` below it.
pub const DEFAULT_BASE_URL: &str = "https://ws.admin.washington.edu/student/v5/";

/// Client construction options
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Treat HTTP 404 as fatal. When false, a 404 is logged and the fetch yields nothing.
    pub throw_404: bool,
    /// Read and write the on-disk response cache
    pub use_cache: bool,
    /// Directory holding cached response bodies
    pub cache_dir: PathBuf,
    /// PEM client certificate for the private tier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert_path: Option<PathBuf>,
    /// PEM private key for the private tier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_path: Option<PathBuf>,
    /// Versioned service root
    pub base_url: String,
    /// Treat 401 and the known course-title 500 as fatal instead of logging them
    pub throw_hepps: bool,
    /// Connect/read timeout in seconds
    pub timeout_secs: u64,
    /// Redirect hops followed before giving up
    pub max_redirects: usize,
    /// User agent string
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            throw_404: true,
            use_cache: true,
            cache_dir: PathBuf::from("cache"),
            cert_path: None,
            key_path: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            throw_hepps: false,
            timeout_secs: 30,
            max_redirects: 5,
            user_agent: format!("sws/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Persistent configuration file (`~/.sws/config.yaml`)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(flatten)]
    pub client: ClientConfig,
}

impl Config {
    /// Get the configuration directory
    pub fn config_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| SwsError::Config("Could not determine home directory".to_string()))?;

        Ok(home_dir.join(CONFIG_DIR_NAME))
    }

    /// Get the configuration file full path
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_path()?.join(CONFIG_FILE_NAME))
    }

    /// Initialize configuration directory and file
    pub fn initialize() -> Result<()> {
        let config_file = Self::config_file_path()?;
        Self::initialize_at(&config_file)
    }

    /// Create `path` (and its directory) with default contents if missing
    pub fn initialize_at(path: &Path) -> Result<()> {
        if let Some(config_dir) = path.parent() {
            if !config_dir.exists() {
                fs::create_dir_all(config_dir).map_err(|e| {
                    SwsError::Config(format!("Failed to create config directory: {}", e))
                })?;

                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    let permissions = fs::Permissions::from_mode(0o700);
                    fs::set_permissions(config_dir, permissions).map_err(|e| {
                        SwsError::Config(format!("Failed to set directory permissions: {}", e))
                    })?;
                }
            }
        }

        if !path.exists() {
            Self::default().save_to(path)?;
        }

        Ok(())
    }

    /// Load configuration from the default file
    pub fn load() -> Result<Self> {
        let config_file = Self::config_file_path()?;
        Self::load_from(&config_file)
    }

    /// Load configuration from `path`, creating it with defaults first
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::initialize_at(path)?;

        let contents = fs::read_to_string(path)
            .map_err(|e| SwsError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Self = serde_yaml::from_str(&contents)
            .map_err(|e| SwsError::Config(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to the default file
    pub fn save(&self) -> Result<()> {
        let config_file = Self::config_file_path()?;
        self.save_to(&config_file)
    }

    /// Save configuration to `path` with owner-only permissions
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self)
            .map_err(|e| SwsError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, yaml)
            .map_err(|e| SwsError::Config(format!("Failed to write config file: {}", e)))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(path, permissions)
                .map_err(|e| SwsError::Config(format!("Failed to set file permissions: {}", e)))?;
        }

        Ok(())
    }

    /// Set a configuration value by key (does not save)
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let client = &mut self.client;
        match key {
            "throw_404" => client.throw_404 = parse_bool(key, value)?,
            "use_cache" => client.use_cache = parse_bool(key, value)?,
            "throw_hepps" => client.throw_hepps = parse_bool(key, value)?,
            "cache_dir" => client.cache_dir = PathBuf::from(value),
            "cert_path" => client.cert_path = non_empty_path(value),
            "key_path" => client.key_path = non_empty_path(value),
            "base_url" => client.base_url = value.to_string(),
            "timeout_secs" => client.timeout_secs = parse_number(key, value)?,
            "max_redirects" => client.max_redirects = parse_number(key, value)?,
            "user_agent" => client.user_agent = value.to_string(),
            _ => {
                return Err(SwsError::Config(format!("Unknown configuration key: {}", key)));
            }
        }
        Ok(())
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> Option<String> {
        let client = &self.client;
        match key {
            "throw_404" => Some(client.throw_404.to_string()),
            "use_cache" => Some(client.use_cache.to_string()),
            "throw_hepps" => Some(client.throw_hepps.to_string()),
            "cache_dir" => Some(client.cache_dir.display().to_string()),
            "cert_path" => client.cert_path.as_ref().map(|p| p.display().to_string()),
            "key_path" => client.key_path.as_ref().map(|p| p.display().to_string()),
            "base_url" => Some(client.base_url.clone()),
            "timeout_secs" => Some(client.timeout_secs.to_string()),
            "max_redirects" => Some(client.max_redirects.to_string()),
            "user_agent" => Some(client.user_agent.clone()),
            _ => None,
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(SwsError::Config(format!(
            "Expected true/false for {}, got '{}'",
            key, value
        ))),
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| SwsError::Config(format!("Expected a number for {}, got '{}'", key, value)))
}

fn non_empty_path(value: &str) -> Option<PathBuf> {
    if value.is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}
