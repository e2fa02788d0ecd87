/// DateDine error types
#[derive(Debug, thiserror::Error)]
pub enum DateDineError {
    /// Bad or empty query text, or a malformed value supplied by the caller
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Catalog source missing or malformed
    #[error("Catalog load error: {0}")]
    CatalogLoad(String),

    /// Vectors of inconsistent length (encoder/model mismatch)
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Index and catalog are out of sync
    #[error("Internal consistency error: {0}")]
    InternalConsistency(String),

    /// Embedding backend failure
    #[error("Encoder error: {0}")]
    Encoder(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network/HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General error (anyhow integration)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DateDineError {
    /// Create invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create catalog load error
    pub fn catalog_load<S: Into<String>>(msg: S) -> Self {
        Self::CatalogLoad(msg.into())
    }

    /// Create dimension mismatch error
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    /// Create internal consistency error
    pub fn internal_consistency<S: Into<String>>(msg: S) -> Self {
        Self::InternalConsistency(msg.into())
    }

    /// Create encoder error
    pub fn encoder<S: Into<String>>(msg: S) -> Self {
        Self::Encoder(msg.into())
    }

    /// Create config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create network error
    pub fn network<S: Into<String>>(msg: S) -> Self {
        Self::Network(msg.into())
    }

    /// Whether the caller can fix this by changing the request.
    ///
    /// Everything else is fatal for the engine that produced it.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Short machine-readable name for API responses
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::CatalogLoad(_) => "catalog_load",
            Self::DimensionMismatch { .. } => "dimension_mismatch",
            Self::InternalConsistency(_) => "internal_consistency",
            Self::Encoder(_) => "encoder",
            Self::Config(_) => "config",
            Self::Network(_) => "network",
            Self::Io(_) => "io",
            Self::Json(_) => "json",
            Self::Other(_) => "other",
        }
    }
}

// HTTP response conversion
impl DateDineError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::Network(_) => 503,
            Self::CatalogLoad(_)
            | Self::DimensionMismatch { .. }
            | Self::InternalConsistency(_)
            | Self::Encoder(_)
            | Self::Config(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Other(_) => 500,
        }
    }
}
