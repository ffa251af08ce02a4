use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error(
        "Deployment descriptor not found. Looked for:\n\
        - --config <path> or the FC_REMOVE_CONFIG environment variable\n\
        - current directory: s.yaml, s.yml, template.yaml, template.yml"
    )]
    DescriptorNotFound,

    #[error("Deployment descriptor does not exist: {0}")]
    DescriptorMissing(PathBuf),

    #[error(
        "Credentials not found: {0}\n\
        Set ALIBABA_CLOUD_ACCOUNT_ID, ALIBABA_CLOUD_ACCESS_KEY_ID and ALIBABA_CLOUD_ACCESS_KEY_SECRET, \
        or add an alias to the access file"
    )]
    AccessFileNotFound(PathBuf),

    #[error("Access alias '{alias}' not found in {path}\navailable: {available}")]
    AccessAliasNotFound {
        alias: String,
        path: PathBuf,
        available: String,
    },

    #[error("Access file parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
