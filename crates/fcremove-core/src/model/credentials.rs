//! 認証情報

use serde::{Deserialize, Serialize};

/// アカウントとアクセスキー
///
/// `~/.s/access.yaml` のエイリアス形式と同じキー名で読み書きします。
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    #[serde(rename = "AccountID")]
    pub account_id: String,
    #[serde(rename = "AccessKeyID")]
    pub access_key_id: String,
    #[serde(rename = "AccessKeySecret")]
    pub access_key_secret: String,
    #[serde(rename = "SecurityToken", default, skip_serializing_if = "Option::is_none")]
    pub security_token: Option<String>,
}

impl Credentials {
    pub fn new(
        account_id: impl Into<String>,
        access_key_id: impl Into<String>,
        access_key_secret: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            access_key_id: access_key_id.into(),
            access_key_secret: access_key_secret.into(),
            security_token: None,
        }
    }

    pub fn with_security_token(mut self, token: impl Into<String>) -> Self {
        self.security_token = Some(token.into());
        self
    }
}

// シークレットはログに出さない
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token = self.security_token.as_ref().map(|_| "***");
        f.debug_struct("Credentials")
            .field("account_id", &self.account_id)
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"***")
            .field("security_token", &token)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secret() {
        let creds = Credentials::new("1234", "LTAIexample", "s3cret").with_security_token("sts");
        let printed = format!("{:?}", creds);
        assert!(printed.contains("LTAIexample"));
        assert!(!printed.contains("s3cret"));
        assert!(!printed.contains("sts\""));
    }

    #[test]
    fn test_deserialize_access_alias() {
        let yaml = "AccountID: '1234'\nAccessKeyID: ak\nAccessKeySecret: sk\n";
        let creds: Credentials = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(creds, Credentials::new("1234", "ak", "sk"));
    }
}
