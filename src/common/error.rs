use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Malformed event: {reason}")]
    MalformedEvent { reason: String },

    #[error("Position ({x}, {y}) is outside the {board_size}x{board_size} board")]
    OutOfBounds { x: u32, y: u32, board_size: u32 },
}

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Kafka error: {0}")]
    Kafka(String),

    #[error("Transport channel closed")]
    Closed,

    #[error("Timed out waiting for a reply")]
    Timeout,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
pub type TransportResult<T> = Result<T, TransportError>;
pub type ApplicationResult<T> = Result<T, ApplicationError>;
