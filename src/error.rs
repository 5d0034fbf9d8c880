use thiserror::Error;

/// Domain-level error taxonomy, independent of transport.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Environment variable error: {0}")]
    Env(#[from] std::env::VarError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No pool registered for this pair")]
    NoPool,

    #[error("No liquidity on either side of the book")]
    NoLiquidity,

    #[error("Insufficient balance: {0}")]
    InsufficientBalance(String),

    #[error("No DEEP fee coin available")]
    NoFeeCoin,

    #[error("Transaction reverted: abort code {code} ({reason})")]
    Reverted { code: u64, reason: String },

    #[error("Transient RPC failure: {0}")]
    Transient(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Fatal startup error: {0}")]
    Fatal(String),
}

pub type Result<T> = std::result::Result<T, SolverError>;

impl SolverError {
    /// Map an on-chain abort code to its human-readable reason.
    pub fn from_abort_code(code: u64) -> Self {
        let reason = match code {
            0 => "InvalidStatus",
            1 => "InvalidOwner",
            2 => "InsufficientOutput",
            3 => "IntentExpired",
            4 => "SameAssetSwap",
            5 => "IntentNotExpired",
            6 => "IntentNotTerminal",
            7 => "ZeroAmount",
            8 => "InvalidDeadline",
            9 => "InvalidFee",
            _ => "Unknown",
        };
        SolverError::Reverted {
            code,
            reason: reason.to_string(),
        }
    }

    /// Whether this error belongs in the "skip and move on" bucket for
    /// the engine pipeline (never tears down the process).
    pub fn is_recoverable_in_pipeline(&self) -> bool {
        !matches!(self, SolverError::Fatal(_))
    }
}
