use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed tar header at offset {offset}: {reason}")]
    MalformedHeader { offset: usize, reason: String },

    #[error("archive contains no tar entries")]
    EmptyArchive,

    #[error("package contains no assets")]
    NoAssets,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, UpkError>;
