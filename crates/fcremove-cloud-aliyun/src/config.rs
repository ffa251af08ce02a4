//! Adapter configuration: credentials, region and endpoints

use fcremove_core::Credentials;
use std::time::Duration;

pub const FC_API_VERSION: &str = "2016-08-15";
pub const VPC_API_VERSION: &str = "2016-04-28";
pub const NAS_API_VERSION: &str = "2017-06-26";
pub const SLS_API_VERSION: &str = "0.6.0";

pub const FC_TIMEOUT: Duration = Duration::from_secs(600);
pub const FC_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const POP_TIMEOUT: Duration = Duration::from_secs(60);
pub const SLS_TIMEOUT: Duration = Duration::from_secs(60);

/// Base URLs of the regional endpoints
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoints {
    pub fc: String,
    pub vpc: String,
    pub nas: String,
    /// Host suffix for log projects; the project name is prepended as a subdomain
    pub sls_host: String,
    pub sls_scheme: String,
}

impl Endpoints {
    pub fn for_region(account_id: &str, region: &str) -> Self {
        Self {
            fc: format!("https://{}.{}.fc.aliyuncs.com", account_id, region),
            vpc: "https://vpc.aliyuncs.com".to_string(),
            nas: format!("http://nas.{}.aliyuncs.com", region),
            sls_host: format!("{}.log.aliyuncs.com", region),
            sls_scheme: "https".to_string(),
        }
    }

    pub fn sls_project_url(&self, project: &str) -> String {
        format!("{}://{}.{}/", self.sls_scheme, project, self.sls_host)
    }
}

/// Everything an adapter needs to sign and address requests
#[derive(Debug, Clone)]
pub struct AliyunConfig {
    pub credentials: Credentials,
    pub region: String,
    pub endpoints: Endpoints,
}

impl AliyunConfig {
    pub fn new(credentials: Credentials, region: impl Into<String>) -> Self {
        let region = region.into();
        let endpoints = Endpoints::for_region(&credentials.account_id, &region);
        Self {
            credentials,
            region,
            endpoints,
        }
    }
}
