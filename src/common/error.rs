use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid flare class '{0}': expected C, M or X followed by a positive number")]
    InvalidFlareClass(String),

    #[error("Invalid time range: {0}")]
    InvalidTimeRange(String),

    #[error("Region catalog error: {0}")]
    Catalog(String),

    #[error("API error: {message}")]
    Api { message: String },
}

pub type Result<T> = std::result::Result<T, CatalogError>;
