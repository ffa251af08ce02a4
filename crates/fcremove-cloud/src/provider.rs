//! Client trait definitions
//!
//! Each trait covers one regional service endpoint. The removal engine only
//! talks to these traits; the Alibaba Cloud adapters and the in-memory test
//! fakes both implement them.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Function Compute (services, functions, triggers, custom domains, tags)
#[async_trait]
pub trait ComputeClient: Send + Sync {
    /// Delete a service; fails with `ServiceNotFound` when absent
    async fn delete_service(&self, service: &str) -> Result<()>;

    /// Fetch function metadata; used as an existence check
    async fn get_function(&self, service: &str, function: &str) -> Result<FunctionInfo>;

    /// Delete a function; fails with `FunctionNotFound` when absent
    async fn delete_function(&self, service: &str, function: &str) -> Result<()>;

    /// List one page of triggers attached to a function
    async fn list_triggers(
        &self,
        service: &str,
        function: &str,
        next_token: Option<&str>,
    ) -> Result<TokenPage<TriggerInfo>>;

    /// Delete a single trigger by name
    async fn delete_trigger(&self, service: &str, function: &str, trigger: &str) -> Result<()>;

    /// Return every tag attached to a resource
    async fn get_resource_tags(&self, resource_arn: &str) -> Result<BTreeMap<String, String>>;

    /// Remove the given tag keys from a resource in one call
    async fn untag_resource(&self, resource_arn: &str, tag_keys: &[String]) -> Result<()>;

    /// List one page of custom domains in the region
    async fn list_custom_domains(
        &self,
        next_token: Option<&str>,
    ) -> Result<TokenPage<CustomDomain>>;

    /// Delete a custom domain; fails with `DomainNameNotFound` when absent
    async fn delete_custom_domain(&self, domain_name: &str) -> Result<()>;
}

/// Virtual network lookups
#[async_trait]
pub trait VpcClient: Send + Sync {
    /// One page of VPCs; page numbers start at 1
    async fn describe_vpcs(
        &self,
        page_number: u32,
        page_size: u32,
    ) -> Result<NumberedPage<VpcInfo>>;

    async fn describe_vswitch_attributes(&self, vswitch_id: &str) -> Result<VSwitchInfo>;
}

/// Network attached storage
#[async_trait]
pub trait NasClient: Send + Sync {
    /// One page of file systems; page numbers start at 1
    async fn describe_file_systems(
        &self,
        page_number: u32,
        page_size: u32,
    ) -> Result<NumberedPage<FileSystemInfo>>;

    async fn describe_mount_targets(&self, file_system_id: &str) -> Result<Vec<MountTargetInfo>>;

    async fn delete_mount_target(&self, file_system_id: &str, mount_target_domain: &str)
    -> Result<()>;

    async fn delete_file_system(&self, file_system_id: &str) -> Result<()>;
}

/// Log service projects
#[async_trait]
pub trait LogClient: Send + Sync {
    /// Fails with `ProjectNotExist` when absent
    async fn get_project(&self, project: &str) -> Result<ProjectInfo>;

    async fn delete_project(&self, project: &str) -> Result<()>;
}

/// Resource kinds, used to pick a retry configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    Service,
    Function,
    Trigger,
    Tag,
    CustomDomain,
    Vpc,
    VSwitch,
    FileSystem,
    MountTarget,
    LogProject,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Service => write!(f, "service"),
            ResourceKind::Function => write!(f, "function"),
            ResourceKind::Trigger => write!(f, "trigger"),
            ResourceKind::Tag => write!(f, "tag"),
            ResourceKind::CustomDomain => write!(f, "custom domain"),
            ResourceKind::Vpc => write!(f, "vpc"),
            ResourceKind::VSwitch => write!(f, "vswitch"),
            ResourceKind::FileSystem => write!(f, "nas file system"),
            ResourceKind::MountTarget => write!(f, "mount target"),
            ResourceKind::LogProject => write!(f, "sls project"),
        }
    }
}

/// A page from a `nextToken` style listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenPage<T> {
    pub items: Vec<T>,
    pub next_token: Option<String>,
}

impl<T> TokenPage<T> {
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_token: None,
        }
    }
}

/// A page from a `PageNumber`/`TotalCount` style listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NumberedPage<T> {
    pub items: Vec<T>,
    pub total_count: u32,
    pub page_number: u32,
    pub page_size: u32,
}

impl<T> NumberedPage<T> {
    /// Whether pages after this one may still hold entries
    pub fn has_more(&self) -> bool {
        self.total_count > 0
            && self.page_number > 0
            && self.page_number.saturating_mul(self.page_size) < self.total_count
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub function_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerInfo {
    pub trigger_name: String,
    pub trigger_type: String,
}

/// A custom domain and its route table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomDomain {
    pub domain_name: String,
    pub routes: Vec<DomainRoute>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DomainRoute {
    pub path: String,
    pub service_name: String,
    pub function_name: String,
    pub qualifier: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VpcInfo {
    pub vpc_id: String,
    pub vpc_name: String,
    pub vswitch_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VSwitchInfo {
    pub vswitch_id: String,
    pub vswitch_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileSystemInfo {
    pub file_system_id: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MountTargetInfo {
    pub mount_target_domain: String,
    pub vpc_id: String,
    pub vswitch_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub project_name: String,
    pub description: Option<String>,
}
