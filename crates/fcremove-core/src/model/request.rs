//! 削除リクエスト

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// `remove` のサブコマンド
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoveTarget {
    Tags,
    Domain,
    Trigger,
    Function,
    Service,
}

impl std::fmt::Display for RemoveTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoveTarget::Tags => write!(f, "tags"),
            RemoveTarget::Domain => write!(f, "domain"),
            RemoveTarget::Trigger => write!(f, "trigger"),
            RemoveTarget::Function => write!(f, "function"),
            RemoveTarget::Service => write!(f, "service"),
        }
    }
}

impl FromStr for RemoveTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tags" => Ok(RemoveTarget::Tags),
            "domain" => Ok(RemoveTarget::Domain),
            "trigger" => Ok(RemoveTarget::Trigger),
            "function" => Ok(RemoveTarget::Function),
            "service" => Ok(RemoveTarget::Service),
            other => Err(format!("unknown remove target: {}", other)),
        }
    }
}

/// コマンドラインから組み立てる削除リクエスト
///
/// `target` が `None` の場合は全リソースを削除します。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalRequest {
    pub target: Option<RemoveTarget>,
    /// 自動生成リソースを確認なしで削除
    pub force: bool,
    /// 削除するタグキー (`tags -k`)
    pub key: Option<String>,
    /// 削除するドメイン名 (`domain -d`)
    pub domain: Option<String>,
    /// 削除するトリガー名 (`trigger -n`)
    pub name: Option<String>,
}

impl RemovalRequest {
    /// 全リソース削除
    pub fn all() -> Self {
        Self::default()
    }

    pub fn only(target: RemoveTarget) -> Self {
        Self {
            target: Some(target),
            ..Self::default()
        }
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn is_remove_all(&self) -> bool {
        self.target.is_none()
    }

    /// 指定フェーズを実行するか
    pub fn includes(&self, target: RemoveTarget) -> bool {
        self.target.is_none_or(|t| t == target)
    }
}
