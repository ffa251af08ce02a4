use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("File read error: {0}")]
    Io(#[from] std::io::Error),

    #[error("IO error: {path}\nreason: {message}")]
    IoError { path: PathBuf, message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Project not found: {name}\navailable: {available}")]
    ProjectNotFound { name: String, available: String },

    #[error("Please choose a project: fc-remove remove --project <name>\navailable: {0}")]
    AmbiguousProject(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
