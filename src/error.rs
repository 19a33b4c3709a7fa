use std::io;

/// Everything that can go wrong while talking to the API or the operator.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown option type {0}")]
    UnknownOptionType(u8),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("there is no command number {order} (found {count})")]
    NoSuchCommand { order: usize, count: usize },

    #[error("Command '{0}' is not a recognized command")]
    UnknownCommand(String),

    #[error("{0}")]
    Usage(String),

    #[error("{0}")]
    Conversion(String),

    #[error("invalid id '{0}'")]
    InvalidId(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("input interrupted")]
    Interrupted,

    #[error("end of input")]
    EndOfInput,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
