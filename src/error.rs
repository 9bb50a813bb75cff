use thiserror::Error;

/// Main error type for the address monitor
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Block {height} not found")]
    NotFound { height: u64 },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// RPC and network failures talking to the node
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("RPC method error: code={code}, message={message}")]
    Method { code: i64, message: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Timeout after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("Rate limit exceeded, retry after {seconds} seconds")]
    RateLimit { seconds: u64 },

    #[error("Connection failed: {0}")]
    Connection(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Configuration parsing failed: {0}")]
    Parsing(String),

    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),
}

/// Validation errors for user or node supplied values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid address {input:?}: {reason}")]
    InvalidAddress { input: String, reason: String },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid block number: {0}")]
    InvalidBlockNumber(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Error severity levels for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Stops the process
    Critical,
    /// The node is unreachable or refusing us
    High,
    /// Transient failure, usually gone by the next cycle
    Medium,
    /// Expected during normal operation
    Low,
}

impl MonitorError {
    /// Get the severity level of an error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            MonitorError::Config(_) => ErrorSeverity::Critical,

            MonitorError::Transport(TransportError::Connection(_)) => ErrorSeverity::High,

            MonitorError::Transport(TransportError::Timeout { .. }) => ErrorSeverity::Medium,
            MonitorError::Transport(TransportError::RateLimit { .. }) => ErrorSeverity::Medium,
            MonitorError::Transport(_) => ErrorSeverity::Medium,

            MonitorError::NotFound { .. } => ErrorSeverity::Low,
            MonitorError::Validation(_) => ErrorSeverity::Low,
        }
    }

    /// Whether a poll cycle can continue past this error.
    ///
    /// Only configuration problems are fatal, and those only surface at startup.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, MonitorError::Config(_))
    }

    /// Whether the same call is worth repeating within the current cycle.
    ///
    /// Only network-level failures qualify. A node that answers with an RPC
    /// error or a body we cannot decode gives the same answer again, and a
    /// missing block is left for the next cycle.
    pub fn is_retryable(&self) -> bool {
        match self {
            MonitorError::Transport(
                TransportError::Method { .. }
                | TransportError::Json(_)
                | TransportError::InvalidResponse(_),
            ) => false,
            MonitorError::Transport(_) => true,
            _ => false,
        }
    }

    /// Minimum wait the node asked for before the next attempt
    pub fn retry_delay(&self) -> Option<u64> {
        match self {
            MonitorError::Transport(TransportError::RateLimit { seconds }) => Some(*seconds),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for MonitorError {
    fn from(err: reqwest::Error) -> Self {
        MonitorError::Transport(TransportError::Http(err))
    }
}
