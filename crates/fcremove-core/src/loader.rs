//! 統合ローダー
//!
//! s.yaml を読み込み、削除対象のプロジェクトを選択します。
//!
//! 次の3形式を受け付けます:
//! 1. プロジェクト名をキーにしたマップ (`MyDemo: { Component, Access, Properties }`)
//! 2. 単一プロジェクト (`Component`, `Access`, `Properties` がルート)
//! 3. `Properties` ブロックそのもの (`Region`, `Service`, `Function` がルート)

use crate::error::{CoreError, Result};
use crate::model::Deployment;
use serde::Deserialize;
use serde_yaml::Value;
use std::path::Path;
use tracing::{debug, info, instrument};

/// 読み込んだプロジェクト
#[derive(Debug, Clone)]
pub struct Project {
    pub name: String,
    pub component: Option<String>,
    pub provider: Option<String>,
    /// 認証情報のエイリアス
    pub access: Option<String>,
    pub properties: Deployment,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ProjectEntry {
    #[serde(default)]
    component: Option<String>,
    #[serde(default)]
    provider: Option<String>,
    #[serde(default)]
    access: Option<String>,
    properties: Deployment,
}

impl ProjectEntry {
    fn into_project(self, name: String) -> Project {
        Project {
            name,
            component: self.component,
            provider: self.provider,
            access: self.access,
            properties: self.properties,
        }
    }
}

/// ファイルからプロジェクトをロード
#[instrument(skip(path), fields(path = %path.display()))]
pub fn load_project(path: &Path, project: Option<&str>) -> Result<Project> {
    let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    // 単一プロジェクト形式ではディレクトリ名をプロジェクト名とする
    let fallback_name = path
        .canonicalize()
        .ok()
        .and_then(|p| p.parent()?.file_name().map(|n| n.to_owned()))
        .and_then(|n| n.to_str().map(str::to_string))
        .unwrap_or_else(|| "unnamed".to_string());

    let loaded = parse_project_str(&content, &fallback_name, project)?;
    info!(
        project = %loaded.name,
        service = %loaded.properties.service.name,
        region = %loaded.properties.region,
        "Project loaded successfully"
    );
    Ok(loaded)
}

/// 文字列からプロジェクトをパース
pub fn parse_project_str(
    content: &str,
    fallback_name: &str,
    project: Option<&str>,
) -> Result<Project> {
    let root: Value = serde_yaml::from_str(content)?;
    let not_mapping = || CoreError::InvalidConfig("descriptor root must be a mapping".into());
    let mapping = root.as_mapping().ok_or_else(not_mapping)?;

    // 3. Properties ブロックそのもの
    if root.get("Region").is_some() {
        debug!("Descriptor is a bare Properties block");
        let properties: Deployment = serde_yaml::from_value(root.clone())?;
        return Ok(Project {
            name: fallback_name.to_string(),
            component: None,
            provider: None,
            access: None,
            properties,
        });
    }

    // 2. 単一プロジェクト
    if root.get("Properties").is_some() {
        debug!("Descriptor is a single project");
        let entry: ProjectEntry = serde_yaml::from_value(root.clone())?;
        return Ok(entry.into_project(fallback_name.to_string()));
    }

    // 1. プロジェクトのマップ（Properties を持たないキーは無視）
    let mut candidates: Vec<(String, Value)> = mapping
        .iter()
        .filter_map(|(key, value)| {
            let name = key.as_str()?;
            value
                .get("Properties")
                .map(|_| (name.to_string(), value.clone()))
        })
        .collect();

    let available = candidates
        .iter()
        .map(|(name, _)| name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let (name, value) = match project {
        Some(wanted) => {
            let index = candidates
                .iter()
                .position(|(name, _)| name == wanted)
                .ok_or_else(|| CoreError::ProjectNotFound {
                    name: wanted.to_string(),
                    available: available.clone(),
                })?;
            candidates.swap_remove(index)
        }
        None => match candidates.len() {
            0 => {
                return Err(CoreError::InvalidConfig(
                    "no project with a Properties block found".to_string(),
                ));
            }
            1 => candidates.remove(0),
            _ => return Err(CoreError::AmbiguousProject(available)),
        },
    };

    debug!(project = %name, "Selected project");
    let entry: ProjectEntry = serde_yaml::from_value(value)?;
    Ok(entry.into_project(name))
}
