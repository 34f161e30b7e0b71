use crate::utils::error::{LibraryError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub cache: CacheConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Shared-secret header that gates every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub header_name: String,
    pub api_key: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            header_name: "X-ADMIN-KEY".to_string(),
            api_key: "ADMIN".to_string(),
        }
    }
}

/// Applied to both the book and the patron cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_seconds: u64,
    pub max_entries: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 600,
            max_entries: 100,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON snapshot written on every commit. Without it the store lives in
    /// memory only.
    pub snapshot_path: Option<String>,
}

impl LibraryConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LibraryError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| LibraryError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are
    /// left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| LibraryError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn snapshot_path(&self) -> Option<&str> {
        self.store.snapshot_path.as_deref()
    }
}

impl Validate for LibraryConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_socket_addr("server.bind_address", &self.server.bind_address)?;
        validation::validate_non_empty_string("auth.header_name", &self.auth.header_name)?;
        validation::validate_header_name("auth.header_name", &self.auth.header_name)?;
        validation::validate_non_empty_string("auth.api_key", &self.auth.api_key)?;
        validation::validate_range("cache.ttl_seconds", self.cache.ttl_seconds, 1, 86_400)?;
        validation::validate_positive_number("cache.max_entries", self.cache.max_entries, 1)?;
        if let Some(path) = &self.store.snapshot_path {
            validation::validate_path("store.snapshot_path", path)?;
        }
        Ok(())
    }
}
