//! POP RPC clients for VPC (2016-04-28) and NAS (2017-06-26)
//!
//! Both services share the RPC style: every call is a `POST /` whose form
//! body carries the action, the common parameters and a HMAC-SHA1 signature.

use crate::config::{AliyunConfig, NAS_API_VERSION, POP_TIMEOUT, VPC_API_VERSION};
use crate::error::{AliyunError, Result};
use crate::sign;
use async_trait::async_trait;
use fcremove_cloud::{
    FileSystemInfo, MountTargetInfo, NasClient, NumberedPage, VSwitchInfo, VpcClient, VpcInfo,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

/// Signed RPC client bound to one endpoint and API version
pub struct PopClient {
    client: reqwest::Client,
    config: AliyunConfig,
    endpoint: String,
    version: &'static str,
}

impl PopClient {
    pub fn new(
        config: AliyunConfig,
        endpoint: impl Into<String>,
        version: &'static str,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(POP_TIMEOUT).build()?;
        Ok(Self {
            client,
            config,
            endpoint: endpoint.into(),
            version,
        })
    }

    /// Common parameters plus the action's own, with `Signature` added
    fn signed_params(
        &self,
        action: &str,
        params: &[(&str, String)],
    ) -> Result<BTreeMap<String, String>> {
        let credentials = &self.config.credentials;
        let mut query: BTreeMap<String, String> = BTreeMap::new();
        query.insert("Format".to_string(), "JSON".to_string());
        query.insert("Version".to_string(), self.version.to_string());
        query.insert("AccessKeyId".to_string(), credentials.access_key_id.clone());
        query.insert("SignatureMethod".to_string(), "HMAC-SHA1".to_string());
        query.insert("Timestamp".to_string(), sign::iso8601(chrono::Utc::now()));
        query.insert("SignatureVersion".to_string(), "1.0".to_string());
        query.insert(
            "SignatureNonce".to_string(),
            uuid::Uuid::new_v4().to_string(),
        );
        query.insert("Action".to_string(), action.to_string());
        query.insert("RegionId".to_string(), self.config.region.clone());
        if let Some(token) = &credentials.security_token {
            query.insert("SecurityToken".to_string(), token.clone());
        }
        for (k, v) in params {
            query.insert((*k).to_string(), v.clone());
        }

        let canonical = sign::pop_canonical_query(&query);
        let string_to_sign = sign::pop_string_to_sign("POST", &canonical);
        let signature = sign::pop_signature(&credentials.access_key_secret, &string_to_sign)?;
        query.insert("Signature".to_string(), signature);
        Ok(query)
    }

    pub async fn call<T: DeserializeOwned>(
        &self,
        action: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let form = self.signed_params(action, params)?;
        let url = format!("{}/", self.endpoint.trim_end_matches('/'));

        tracing::debug!(%action, %url, "POP request");

        let response = self.client.post(&url).form(&form).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(parse_error(status.as_u16(), &text));
        }

        tracing::debug!(%action, status = status.as_u16(), "POP response");
        Ok(serde_json::from_str(&text)?)
    }
}

fn parse_error(status: u16, body: &str) -> AliyunError {
    match serde_json::from_str::<PopErrorBody>(body) {
        Ok(err) => AliyunError::Api {
            status,
            code: err.code,
            message: err.message,
            request_id: err.request_id,
        },
        Err(_) => AliyunError::Api {
            status,
            code: String::new(),
            message: body.trim().to_string(),
            request_id: String::new(),
        },
    }
}

/// VPC lookups (`https://vpc.aliyuncs.com`)
pub struct VpcApi {
    pop: PopClient,
}

impl VpcApi {
    pub fn new(config: AliyunConfig) -> Result<Self> {
        let endpoint = config.endpoints.vpc.clone();
        Ok(Self {
            pop: PopClient::new(config, endpoint, VPC_API_VERSION)?,
        })
    }
}

#[async_trait]
impl VpcClient for VpcApi {
    async fn describe_vpcs(
        &self,
        page_number: u32,
        page_size: u32,
    ) -> fcremove_cloud::Result<NumberedPage<VpcInfo>> {
        let wire: DescribeVpcsResponse = self
            .pop
            .call(
                "DescribeVpcs",
                &[
                    ("PageNumber", page_number.to_string()),
                    ("PageSize", page_size.to_string()),
                ],
            )
            .await?;
        Ok(wire.into_page())
    }

    async fn describe_vswitch_attributes(
        &self,
        vswitch_id: &str,
    ) -> fcremove_cloud::Result<VSwitchInfo> {
        let wire: DescribeVSwitchAttributesResponse = self
            .pop
            .call(
                "DescribeVSwitchAttributes",
                &[("VSwitchId", vswitch_id.to_string())],
            )
            .await?;
        Ok(VSwitchInfo {
            vswitch_id: wire.vswitch_id,
            vswitch_name: wire.vswitch_name,
        })
    }
}

/// NAS file systems and mount targets (`http://nas.<region>.aliyuncs.com`)
pub struct NasApi {
    pop: PopClient,
}

impl NasApi {
    pub fn new(config: AliyunConfig) -> Result<Self> {
        let endpoint = config.endpoints.nas.clone();
        Ok(Self {
            pop: PopClient::new(config, endpoint, NAS_API_VERSION)?,
        })
    }
}

#[async_trait]
impl NasClient for NasApi {
    async fn describe_file_systems(
        &self,
        page_number: u32,
        page_size: u32,
    ) -> fcremove_cloud::Result<NumberedPage<FileSystemInfo>> {
        let wire: DescribeFileSystemsResponse = self
            .pop
            .call(
                "DescribeFileSystems",
                &[
                    ("PageNumber", page_number.to_string()),
                    ("PageSize", page_size.to_string()),
                ],
            )
            .await?;
        Ok(wire.into_page())
    }

    async fn describe_mount_targets(
        &self,
        file_system_id: &str,
    ) -> fcremove_cloud::Result<Vec<MountTargetInfo>> {
        let wire: DescribeMountTargetsResponse = self
            .pop
            .call(
                "DescribeMountTargets",
                &[("FileSystemId", file_system_id.to_string())],
            )
            .await?;
        Ok(wire.into_items())
    }

    async fn delete_mount_target(
        &self,
        file_system_id: &str,
        mount_target_domain: &str,
    ) -> fcremove_cloud::Result<()> {
        let _: serde_json::Value = self
            .pop
            .call(
                "DeleteMountTarget",
                &[
                    ("FileSystemId", file_system_id.to_string()),
                    ("MountTargetDomain", mount_target_domain.to_string()),
                ],
            )
            .await?;
        Ok(())
    }

    async fn delete_file_system(&self, file_system_id: &str) -> fcremove_cloud::Result<()> {
        let _: serde_json::Value = self
            .pop
            .call(
                "DeleteFileSystem",
                &[("FileSystemId", file_system_id.to_string())],
            )
            .await?;
        Ok(())
    }
}

// Wire types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PopErrorBody {
    #[serde(default)]
    request_id: String,
    code: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct VSwitchIdList {
    #[serde(default, rename = "VSwitchId")]
    vswitch_id: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireVpc {
    vpc_id: String,
    #[serde(default)]
    vpc_name: String,
    #[serde(default, rename = "VSwitchIds")]
    vswitch_ids: VSwitchIdList,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct VpcList {
    #[serde(default)]
    vpc: Vec<WireVpc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeVpcsResponse {
    #[serde(default)]
    total_count: u32,
    #[serde(default)]
    page_number: u32,
    #[serde(default)]
    page_size: u32,
    #[serde(default)]
    vpcs: VpcList,
}

impl DescribeVpcsResponse {
    fn into_page(self) -> NumberedPage<VpcInfo> {
        NumberedPage {
            items: self
                .vpcs
                .vpc
                .into_iter()
                .map(|v| VpcInfo {
                    vpc_id: v.vpc_id,
                    vpc_name: v.vpc_name,
                    vswitch_ids: v.vswitch_ids.vswitch_id,
                })
                .collect(),
            total_count: self.total_count,
            page_number: self.page_number,
            page_size: self.page_size,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DescribeVSwitchAttributesResponse {
    #[serde(rename = "VSwitchId")]
    vswitch_id: String,
    #[serde(rename = "VSwitchName", default)]
    vswitch_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireFileSystem {
    file_system_id: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct FileSystemList {
    #[serde(default)]
    file_system: Vec<WireFileSystem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeFileSystemsResponse {
    #[serde(default)]
    total_count: u32,
    #[serde(default)]
    page_number: u32,
    #[serde(default)]
    page_size: u32,
    #[serde(default)]
    file_systems: FileSystemList,
}

impl DescribeFileSystemsResponse {
    fn into_page(self) -> NumberedPage<FileSystemInfo> {
        NumberedPage {
            items: self
                .file_systems
                .file_system
                .into_iter()
                .map(|f| FileSystemInfo {
                    file_system_id: f.file_system_id,
                    description: f.description,
                })
                .collect(),
            total_count: self.total_count,
            page_number: self.page_number,
            page_size: self.page_size,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireMountTarget {
    mount_target_domain: String,
    #[serde(default)]
    vpc_id: String,
    #[serde(default)]
    vsw_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct MountTargetList {
    #[serde(default)]
    mount_target: Vec<WireMountTarget>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeMountTargetsResponse {
    #[serde(default)]
    mount_targets: MountTargetList,
}

impl DescribeMountTargetsResponse {
    fn into_items(self) -> Vec<MountTargetInfo> {
        self.mount_targets
            .mount_target
            .into_iter()
            .map(|m| MountTargetInfo {
                mount_target_domain: m.mount_target_domain,
                vpc_id: m.vpc_id,
                vswitch_id: m.vsw_id,
            })
            .collect()
    }
}
