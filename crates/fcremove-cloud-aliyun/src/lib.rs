//! Alibaba Cloud adapters for fc-remove
//!
//! Implements the `fcremove-cloud` client traits over signed HTTP:
//!
//! - [`FcClient`]: Function Compute REST API
//! - [`VpcApi`] / [`NasApi`]: POP RPC APIs for VPC and NAS
//! - [`SlsClient`]: Log Service project API
//!
//! Provider error codes are translated into [`fcremove_cloud::ErrorKind`] in
//! [`error::classify`].
//!
//! # Example
//!
//! ```ignore
//! use fcremove_cloud_aliyun::{AliyunClients, AliyunConfig};
//!
//! let config = AliyunConfig::new(credentials, "cn-hangzhou");
//! let clients = AliyunClients::new(config)?;
//! clients.compute.delete_service("demo").await?;
//! ```

pub mod config;
pub mod error;
pub mod fc;
pub mod pop;
pub mod sign;
pub mod sls;

pub use config::{AliyunConfig, Endpoints};
pub use error::{AliyunError, Result, classify};
pub use fc::FcClient;
pub use pop::{NasApi, PopClient, VpcApi};
pub use sls::SlsClient;

/// The four regional clients built from one configuration
pub struct AliyunClients {
    pub compute: FcClient,
    pub vpc: VpcApi,
    pub nas: NasApi,
    pub log: SlsClient,
}

impl AliyunClients {
    pub fn new(config: AliyunConfig) -> Result<Self> {
        Ok(Self {
            compute: FcClient::new(config.clone())?,
            vpc: VpcApi::new(config.clone())?,
            nas: NasApi::new(config.clone())?,
            log: SlsClient::new(config)?,
        })
    }
}
