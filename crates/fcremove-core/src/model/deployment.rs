//! デプロイメント記述 (s.yaml の Properties ブロック)

use serde::{Deserialize, Serialize};

/// 自動生成リソースを示すキーワード
pub const AUTO_KEYWORD: &str = "Auto";

/// ドメイン逆引きを示すキーワード（大文字小文字を区別しない）
pub const AUTO_DOMAIN: &str = "AUTO";

/// 削除対象のデプロイメント
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Deployment {
    pub region: String,
    pub service: ServiceConfig,
    #[serde(default)]
    pub function: Option<FunctionConfig>,
}

impl Deployment {
    pub fn service_name(&self) -> &str {
        &self.service.name
    }

    pub fn function_name(&self) -> Option<&str> {
        self.function.as_ref().map(|f| f.name.as_str())
    }

    /// ドメインが設定された HTTP トリガー
    pub fn http_triggers_with_domains(&self) -> Vec<&TriggerConfig> {
        self.function
            .iter()
            .flat_map(|f| f.triggers.iter())
            .filter(|t| t.is_http() && !t.domains().is_empty())
            .collect()
    }
}

/// サービス定義
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub nas: Option<NasConfig>,
    #[serde(default)]
    pub log: Option<LogConfig>,
}

/// 関数定義
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FunctionConfig {
    pub name: String,
    #[serde(default)]
    pub triggers: Vec<TriggerConfig>,
}

/// トリガー定義
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TriggerConfig {
    pub name: String,
    #[serde(rename = "Type")]
    pub trigger_type: String,
    #[serde(default)]
    pub parameters: Option<TriggerParameters>,
}

impl TriggerConfig {
    pub fn is_http(&self) -> bool {
        self.trigger_type.eq_ignore_ascii_case("http")
    }

    pub fn domains(&self) -> &[DomainBinding] {
        self.parameters
            .as_ref()
            .and_then(|p| p.domains.as_deref())
            .unwrap_or(&[])
    }
}

/// トリガーのパラメータ（ドメイン以外は削除時に使わない）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TriggerParameters {
    #[serde(default)]
    pub domains: Option<Vec<DomainBinding>>,
}

/// HTTP トリガーにバインドされたカスタムドメイン
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DomainBinding {
    pub domain: String,
    #[serde(default)]
    pub protocol: Option<String>,
}

impl DomainBinding {
    pub fn is_auto(&self) -> bool {
        is_auto_domain(&self.domain)
    }
}

/// 逆引き指定 `AUTO` か（大文字小文字を区別しない）
pub fn is_auto_domain(name: &str) -> bool {
    name.eq_ignore_ascii_case(AUTO_DOMAIN)
}

/// NAS 設定: `Nas: Auto` または詳細設定
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NasConfig {
    Keyword(String),
    Detailed(NasDetail),
}

impl NasConfig {
    /// `Nas: Auto` もしくは `Nas: { Type: Auto }`
    pub fn is_auto(&self) -> bool {
        match self {
            NasConfig::Keyword(k) => k == AUTO_KEYWORD,
            NasConfig::Detailed(d) => d.nas_type.as_deref() == Some(AUTO_KEYWORD),
        }
    }

    pub fn mount_points(&self) -> &[MountPoint] {
        match self {
            NasConfig::Keyword(_) => &[],
            NasConfig::Detailed(d) => &d.mount_points,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NasDetail {
    #[serde(default, rename = "Type")]
    pub nas_type: Option<String>,
    #[serde(default, rename = "UserId")]
    pub user_id: Option<i64>,
    #[serde(default, rename = "GroupId")]
    pub group_id: Option<i64>,
    #[serde(default)]
    pub mount_points: Vec<MountPoint>,
}

/// マウントポイント
///
/// `ServerAddr` は `xxxx.nas.aliyuncs.com:/dir` 形式、
/// `NasAddr` はマウントターゲットのドメインそのもの。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MountPoint {
    #[serde(default)]
    pub server_addr: Option<String>,
    #[serde(default)]
    pub nas_addr: Option<String>,
    #[serde(default)]
    pub nas_dir: Option<String>,
    #[serde(default)]
    pub mount_dir: Option<String>,
}

impl MountPoint {
    /// このマウントポイントが指定のマウントターゲットを指しているか
    pub fn targets(&self, mount_target_domain: &str) -> bool {
        if self.nas_addr.as_deref() == Some(mount_target_domain) {
            return true;
        }
        self.server_addr
            .as_deref()
            .and_then(|addr| addr.split(':').next())
            .is_some_and(|host| host == mount_target_domain)
    }
}

/// ログ設定: `Log: Auto` または明示的なプロジェクト指定
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LogConfig {
    Keyword(String),
    Explicit {
        #[serde(rename = "Project")]
        project: String,
        #[serde(rename = "LogStore")]
        log_store: String,
    },
}

impl LogConfig {
    pub fn is_auto(&self) -> bool {
        matches!(self, LogConfig::Keyword(k) if k == AUTO_KEYWORD)
    }

    /// 明示的に指定されたプロジェクトとログストアが一致するか
    pub fn matches(&self, project: &str, log_store: &str) -> bool {
        match self {
            LogConfig::Keyword(_) => false,
            LogConfig::Explicit {
                project: p,
                log_store: s,
            } => p == project && s == log_store,
        }
    }
}
