pub mod error;

pub use error::*;

use fcremove_core::Credentials;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// デプロイメント記述ファイルのパスを指定する環境変数
pub const CONFIG_ENV: &str = "FC_REMOVE_CONFIG";

/// 認証情報ファイルのパスを上書きする環境変数
pub const ACCESS_FILE_ENV: &str = "FC_REMOVE_ACCESS_FILE";

pub const ACCOUNT_ID_ENV: &str = "ALIBABA_CLOUD_ACCOUNT_ID";
pub const ACCESS_KEY_ID_ENV: &str = "ALIBABA_CLOUD_ACCESS_KEY_ID";
pub const ACCESS_KEY_SECRET_ENV: &str = "ALIBABA_CLOUD_ACCESS_KEY_SECRET";
pub const SECURITY_TOKEN_ENV: &str = "ALIBABA_CLOUD_SECURITY_TOKEN";

/// エイリアス未指定時に使う名前
pub const DEFAULT_ACCESS_ALIAS: &str = "default";

const DESCRIPTOR_CANDIDATES: [&str; 4] = ["s.yaml", "s.yml", "template.yaml", "template.yml"];

/// デプロイメント記述ファイルを探す
///
/// 以下の優先順位で検索:
/// 1. 引数で直接指定されたパス
/// 2. 環境変数 FC_REMOVE_CONFIG
/// 3. カレントディレクトリ: s.yaml, s.yml, template.yaml, template.yml
pub fn find_descriptor_file(explicit: Option<&Path>) -> Result<PathBuf> {
    // 1. 直接指定
    if let Some(path) = explicit {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        return Err(ConfigError::DescriptorMissing(path.to_path_buf()));
    }

    // 2. 環境変数で指定
    if let Ok(config_path) = std::env::var(CONFIG_ENV) {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::DescriptorMissing(path));
    }

    // 3. カレントディレクトリで検索
    let current_dir = std::env::current_dir()?;
    for filename in &DESCRIPTOR_CANDIDATES {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(path);
        }
    }

    Err(ConfigError::DescriptorNotFound)
}

/// 認証情報ファイル (~/.s/access.yaml) のパス
pub fn access_file_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(ACCESS_FILE_ENV) {
        return Ok(PathBuf::from(path));
    }
    let home = dirs::home_dir().ok_or(ConfigError::HomeDirNotFound)?;
    Ok(home.join(".s").join("access.yaml"))
}

/// 認証情報をロード
///
/// 環境変数 (ALIBABA_CLOUD_*) が揃っていればそれを優先し、
/// なければ認証情報ファイルからエイリアスで引きます。
pub fn load_credentials(alias: Option<&str>) -> Result<Credentials> {
    if let Some(credentials) = credentials_from_env() {
        tracing::debug!(
            access_key_id = %credentials.access_key_id,
            "Using credentials from environment"
        );
        return Ok(credentials);
    }

    let path = access_file_path()?;
    load_credentials_from_file(&path, alias.unwrap_or(DEFAULT_ACCESS_ALIAS))
}

/// 環境変数から認証情報を組み立てる（必須項目が欠けていれば None）
pub fn credentials_from_env() -> Option<Credentials> {
    let account_id = std::env::var(ACCOUNT_ID_ENV).ok()?;
    let access_key_id = std::env::var(ACCESS_KEY_ID_ENV).ok()?;
    let access_key_secret = std::env::var(ACCESS_KEY_SECRET_ENV).ok()?;

    let credentials = Credentials::new(account_id, access_key_id, access_key_secret);
    Some(match std::env::var(SECURITY_TOKEN_ENV) {
        Ok(token) if !token.is_empty() => credentials.with_security_token(token),
        _ => credentials,
    })
}

/// 認証情報ファイルからエイリアスを読み込む
pub fn load_credentials_from_file(path: &Path, alias: &str) -> Result<Credentials> {
    if !path.exists() {
        return Err(ConfigError::AccessFileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let mut aliases: BTreeMap<String, Credentials> = serde_yaml::from_str(&content)?;

    aliases
        .remove(alias)
        .ok_or_else(|| ConfigError::AccessAliasNotFound {
            alias: alias.to_string(),
            path: path.to_path_buf(),
            available: aliases.keys().cloned().collect::<Vec<_>>().join(", "),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    const ACCESS_YAML: &str = r#"
default:
  AccountID: '1111'
  AccessKeyID: ak-default
  AccessKeySecret: sk-default
release:
  AccountID: '2222'
  AccessKeyID: ak-release
  AccessKeySecret: sk-release
  SecurityToken: sts-token
"#;

    const NO_CREDENTIAL_ENV: [(&str, Option<&str>); 4] = [
        (ACCOUNT_ID_ENV, None),
        (ACCESS_KEY_ID_ENV, None),
        (ACCESS_KEY_SECRET_ENV, None),
        (SECURITY_TOKEN_ENV, None),
    ];

    #[test]
    #[serial]
    fn test_find_descriptor_in_current_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        // s.yml と template.yaml を作成
        fs::write(temp_dir.path().join("template.yaml"), "# template").unwrap();
        fs::write(temp_dir.path().join("s.yml"), "# s").unwrap();

        std::env::set_current_dir(&temp_dir).unwrap();

        let result = temp_env::with_var_unset(CONFIG_ENV, || find_descriptor_file(None));

        std::env::set_current_dir(original_dir).unwrap();

        // s.yml が template.yaml より優先される
        assert!(result.unwrap().ends_with("s.yml"));
    }

    #[test]
    #[serial]
    fn test_find_descriptor_env_var() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("custom.yaml");
        fs::write(&config_path, "# custom").unwrap();

        let result = temp_env::with_var(CONFIG_ENV, Some(config_path.as_os_str()), || {
            find_descriptor_file(None)
        });
        assert_eq!(result.unwrap(), config_path);
    }

    #[test]
    #[serial]
    fn test_find_descriptor_explicit_missing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("nope.yaml");

        let result = find_descriptor_file(Some(&missing));
        assert!(matches!(result, Err(ConfigError::DescriptorMissing(_))));
    }

    #[test]
    #[serial]
    fn test_find_descriptor_not_found() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        // 空のディレクトリに移動
        std::env::set_current_dir(&temp_dir).unwrap();

        let result = temp_env::with_var_unset(CONFIG_ENV, || find_descriptor_file(None));

        std::env::set_current_dir(original_dir).unwrap();

        assert!(matches!(result, Err(ConfigError::DescriptorNotFound)));
    }

    #[test]
    fn test_load_credentials_from_file_alias() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("access.yaml");
        fs::write(&path, ACCESS_YAML).unwrap();

        let creds = load_credentials_from_file(&path, "release").unwrap();
        assert_eq!(creds.account_id, "2222");
        assert_eq!(creds.security_token.as_deref(), Some("sts-token"));

        let err = load_credentials_from_file(&path, "staging").unwrap_err();
        match err {
            ConfigError::AccessAliasNotFound { available, .. } => {
                assert_eq!(available, "default, release");
            }
            other => panic!("Expected AccessAliasNotFound, got {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_load_credentials_prefers_env() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("access.yaml");
        fs::write(&path, ACCESS_YAML).unwrap();

        let creds = temp_env::with_vars(
            [
                (ACCOUNT_ID_ENV, Some("9999")),
                (ACCESS_KEY_ID_ENV, Some("ak-env")),
                (ACCESS_KEY_SECRET_ENV, Some("sk-env")),
                (SECURITY_TOKEN_ENV, None),
                (ACCESS_FILE_ENV, path.to_str()),
            ],
            || load_credentials(Some("release")),
        )
        .unwrap();

        assert_eq!(creds.account_id, "9999");
        assert_eq!(creds.access_key_id, "ak-env");
        assert!(creds.security_token.is_none());
    }

    #[test]
    #[serial]
    fn test_load_credentials_default_alias_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("access.yaml");
        fs::write(&path, ACCESS_YAML).unwrap();

        let mut vars: Vec<(&str, Option<&str>)> = NO_CREDENTIAL_ENV.to_vec();
        vars.push((ACCESS_FILE_ENV, path.to_str()));

        let creds = temp_env::with_vars(vars, || load_credentials(None)).unwrap();
        assert_eq!(creds.access_key_id, "ak-default");
    }

    #[test]
    #[serial]
    fn test_load_credentials_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("absent.yaml");

        let mut vars: Vec<(&str, Option<&str>)> = NO_CREDENTIAL_ENV.to_vec();
        vars.push((ACCESS_FILE_ENV, path.to_str()));

        let result = temp_env::with_vars(vars, || load_credentials(None));
        assert!(matches!(result, Err(ConfigError::AccessFileNotFound(_))));
    }
}
