use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Profile error: {0}")]
    Profile(String),

    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Process error: {0}")]
    Process(String),
}

pub type Result<T> = std::result::Result<T, Error>;
