use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid square: {0}")]
    InvalidSquare(String),

    #[error("invalid piece: {0}")]
    InvalidPiece(String),

    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    #[error("engine channel unavailable: {0}")]
    ChannelUnavailable(String),

    #[error("engine busy")]
    Busy,

    #[error("not found: {0}")]
    MissingInput(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
