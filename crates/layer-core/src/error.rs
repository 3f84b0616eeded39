/// All errors produced by layer-core.
#[derive(Debug, thiserror::Error)]
pub enum LayerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Tool '{name}' is not available")]
    ToolNotAvailable { name: String },

    #[error("invalid arguments for tool '{tool}': {}", errors.join("; "))]
    InvalidArguments { tool: String, errors: Vec<String> },

    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, LayerError>;
