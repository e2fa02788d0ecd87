use crate::error::DateDineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Which text encoder implementation to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// Local feature-hashing encoder, no network
    Hash,
    /// Ollama embeddings API
    Ollama,
}

impl FromStr for EmbeddingBackend {
    type Err = DateDineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hash" => Ok(Self::Hash),
            "ollama" => Ok(Self::Ollama),
            other => Err(DateDineError::config(format!(
                "Unknown embedding backend '{}' (expected 'hash' or 'ollama')",
                other
            ))),
        }
    }
}

impl fmt::Display for EmbeddingBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hash => write!(f, "hash"),
            Self::Ollama => write!(f, "ollama"),
        }
    }
}

/// DateDine application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Restaurant catalog CSV path
    pub catalog_path: PathBuf,

    /// Text encoder backend
    pub embedding_backend: EmbeddingBackend,

    /// Embedding model name
    pub embedding_model: String,

    /// Vector dimension for the hash backend
    pub embedding_dim: usize,

    /// Ollama API base URL
    pub ollama_base_url: String,

    /// Number of matches returned when the caller does not ask for a count
    pub default_top_k: usize,

    /// Google Places API key (place lookup is disabled without it)
    #[serde(skip_serializing)]
    pub google_api_key: Option<String>,

    /// Server bind address
    pub server_host: String,

    /// Server port
    pub server_port: u16,

    /// Log directory
    pub log_dir: PathBuf,

    /// Log level
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("./restaurants.csv"),
            embedding_backend: EmbeddingBackend::Hash,
            embedding_model: "all-minilm".to_string(),
            embedding_dim: 384,
            ollama_base_url: "http://localhost:11434".to_string(),
            default_top_k: 3,
            google_api_key: None,
            server_host: "0.0.0.0".to_string(),
            server_port: 8080,
            log_dir: PathBuf::from("./log"),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self, DateDineError> {
        // Load .env file (ignore if not exists)
        let _ = dotenv::dotenv();

        let defaults = Self::default();

        let embedding_backend = match std::env::var("EMBEDDING_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.embedding_backend,
        };

        let config = Self {
            catalog_path: Self::get_env_path("CATALOG_PATH")
                .unwrap_or(defaults.catalog_path),
            embedding_backend,
            embedding_model: std::env::var("EMBEDDING_MODEL")
                .unwrap_or(defaults.embedding_model),
            embedding_dim: Self::get_env_parsed::<usize>("EMBEDDING_DIM")?
                .unwrap_or(defaults.embedding_dim),
            ollama_base_url: std::env::var("OLLAMA_BASE_URL")
                .unwrap_or(defaults.ollama_base_url),
            default_top_k: Self::get_env_parsed::<usize>("DEFAULT_TOP_K")?
                .unwrap_or(defaults.default_top_k),
            google_api_key: std::env::var("GOOGLE_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            server_host: std::env::var("SERVER_HOST")
                .unwrap_or(defaults.server_host),
            server_port: Self::get_env_parsed::<u16>("SERVER_PORT")?
                .unwrap_or(defaults.server_port),
            log_dir: Self::get_env_path("LOG_DIR").unwrap_or(defaults.log_dir),
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
        };

        config.validate()?;

        Ok(config)
    }

    /// Get PathBuf from environment variable
    fn get_env_path(key: &str) -> Option<PathBuf> {
        std::env::var(key).ok().map(PathBuf::from)
    }

    /// Parse an environment variable, failing loudly on garbage
    fn get_env_parsed<T: FromStr>(key: &str) -> Result<Option<T>, DateDineError> {
        match std::env::var(key) {
            Ok(raw) => raw.trim().parse().map(Some).map_err(|_| {
                DateDineError::config(format!("{} has an invalid value: '{}'", key, raw))
            }),
            Err(_) => Ok(None),
        }
    }

    /// Get server bind address (host:port)
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), DateDineError> {
        if self.embedding_model.trim().is_empty() {
            return Err(DateDineError::config("Embedding model name cannot be empty"));
        }

        if self.embedding_dim == 0 {
            return Err(DateDineError::config("Embedding dimension must be at least 1"));
        }

        if self.default_top_k == 0 {
            return Err(DateDineError::config("Default top-k must be at least 1"));
        }

        if self.embedding_backend == EmbeddingBackend::Ollama
            && !self.ollama_base_url.starts_with("http://")
            && !self.ollama_base_url.starts_with("https://")
        {
            return Err(DateDineError::config(
                "Ollama base URL must start with http:// or https://",
            ));
        }

        if self.server_port == 0 {
            return Err(DateDineError::config("Server port cannot be 0"));
        }

        Ok(())
    }
}
