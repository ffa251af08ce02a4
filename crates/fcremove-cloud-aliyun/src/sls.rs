//! Log Service (SLS) project client

use crate::config::{AliyunConfig, SLS_API_VERSION, SLS_TIMEOUT};
use crate::error::{AliyunError, Result};
use crate::sign;
use async_trait::async_trait;
use fcremove_cloud::{LogClient, ProjectInfo};
use reqwest::Method;
use serde::Deserialize;
use std::collections::BTreeMap;

const REQUEST_ID_HEADER: &str = "x-log-requestid";
const SIGNATURE_METHOD: &str = "hmac-sha1";

pub struct SlsClient {
    client: reqwest::Client,
    config: AliyunConfig,
}

impl SlsClient {
    pub fn new(config: AliyunConfig) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(SLS_TIMEOUT).build()?;
        Ok(Self { client, config })
    }

    fn signed_headers(&self, method: &Method) -> Result<BTreeMap<String, String>> {
        let credentials = &self.config.credentials;
        let mut headers = BTreeMap::new();
        headers.insert("date".to_string(), sign::http_date(chrono::Utc::now()));
        headers.insert("x-log-apiversion".to_string(), SLS_API_VERSION.to_string());
        headers.insert(
            "x-log-signaturemethod".to_string(),
            SIGNATURE_METHOD.to_string(),
        );
        headers.insert("x-log-bodyrawsize".to_string(), "0".to_string());
        if let Some(token) = &credentials.security_token {
            headers.insert("x-acs-security-token".to_string(), token.clone());
        }

        let string_to_sign = sign::sls_string_to_sign(method.as_str(), "/", &headers);
        let authorization = sign::sls_authorization(
            &credentials.access_key_id,
            &credentials.access_key_secret,
            &string_to_sign,
        )?;
        headers.insert("authorization".to_string(), authorization);
        Ok(headers)
    }

    async fn send(&self, method: Method, project: &str) -> Result<String> {
        let headers = self.signed_headers(&method)?;
        let url = self.config.endpoints.sls_project_url(project);

        tracing::debug!(method = %method, %url, "SLS request");

        let mut request = self.client.request(method, &url);
        for (name, value) in &headers {
            request = request.header(name, value);
        }

        let response = request.send().await?;
        let status = response.status();
        let request_id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let text = response.text().await?;

        if status.is_success() {
            return Ok(text);
        }
        Err(parse_error(status.as_u16(), request_id, &text))
    }
}

fn parse_error(status: u16, request_id: String, body: &str) -> AliyunError {
    match serde_json::from_str::<SlsErrorBody>(body) {
        Ok(err) => AliyunError::Api {
            status,
            code: err.error_code,
            message: err.error_message,
            request_id,
        },
        Err(_) => AliyunError::Api {
            status,
            code: String::new(),
            message: body.trim().to_string(),
            request_id,
        },
    }
}

#[async_trait]
impl LogClient for SlsClient {
    async fn get_project(&self, project: &str) -> fcremove_cloud::Result<ProjectInfo> {
        let text = self.send(Method::GET, project).await?;
        let wire: WireProject = serde_json::from_str(&text).map_err(AliyunError::from)?;
        Ok(ProjectInfo {
            project_name: wire.project_name.unwrap_or_else(|| project.to_string()),
            description: wire.description,
        })
    }

    async fn delete_project(&self, project: &str) -> fcremove_cloud::Result<()> {
        self.send(Method::DELETE, project).await?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SlsErrorBody {
    error_code: String,
    #[serde(default)]
    error_message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireProject {
    project_name: Option<String>,
    description: Option<String>,
}
