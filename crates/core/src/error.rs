use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid processing options: {0}")]
    InvalidOptions(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
