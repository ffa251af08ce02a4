//! Function Compute REST client (API version 2016-08-15)

use crate::config::{AliyunConfig, FC_API_VERSION, FC_CONNECT_TIMEOUT, FC_TIMEOUT};
use crate::error::{AliyunError, Result};
use crate::sign;
use async_trait::async_trait;
use fcremove_cloud::{
    ComputeClient, CustomDomain, DomainRoute, FunctionInfo, TokenPage, TriggerInfo,
};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const PAGE_LIMIT: &str = "100";
const REQUEST_ID_HEADER: &str = "x-fc-request-id";

/// Signed client for one account/region FC endpoint
pub struct FcClient {
    client: reqwest::Client,
    config: AliyunConfig,
}

impl FcClient {
    pub fn new(config: AliyunConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(FC_TIMEOUT)
            .connect_timeout(FC_CONNECT_TIMEOUT)
            .build()?;
        Ok(Self { client, config })
    }

    /// Expand a short ARN such as `services/demo` to `acs:fc:<region>:<account>:services/demo`
    pub fn resource_arn(&self, arn: &str) -> String {
        if arn.starts_with("acs:") {
            arn.to_string()
        } else {
            format!(
                "acs:fc:{}:{}:{}",
                self.config.region, self.config.credentials.account_id, arn
            )
        }
    }

    fn signed_headers(
        &self,
        method: &Method,
        path: &str,
        query: &[(String, String)],
    ) -> Result<BTreeMap<String, String>> {
        let credentials = &self.config.credentials;
        let mut headers = BTreeMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        headers.insert("date".to_string(), sign::http_date(chrono::Utc::now()));
        headers.insert(
            "x-fc-account-id".to_string(),
            credentials.account_id.clone(),
        );
        if let Some(token) = &credentials.security_token {
            headers.insert("x-fc-security-token".to_string(), token.clone());
        }

        let string_to_sign = sign::fc_string_to_sign(method.as_str(), path, &headers, query);
        let authorization = sign::fc_authorization(
            &credentials.access_key_id,
            &credentials.access_key_secret,
            &string_to_sign,
        )?;
        headers.insert("authorization".to_string(), authorization);
        Ok(headers)
    }

    async fn send(
        &self,
        method: Method,
        resource: &str,
        query: &[(String, String)],
        body: Option<serde_json::Value>,
    ) -> Result<String> {
        let path = format!("/{}{}", FC_API_VERSION, resource);
        let headers = self.signed_headers(&method, &path, query)?;
        let url = format!("{}{}", self.config.endpoints.fc, path);

        tracing::debug!(method = %method, %url, "FC request");

        let mut request = self.client.request(method, &url);
        for (name, value) in &headers {
            request = request.header(name, value);
        }
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.body(body.to_string());
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
            tracing::debug!(status = status.as_u16(), %request_id, "FC response");
            return Ok(text);
        }

        Err(parse_error(status.as_u16(), request_id, &text))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        resource: &str,
        query: &[(String, String)],
    ) -> Result<T> {
        let text = self.send(method, resource, query, None).await?;
        Ok(serde_json::from_str(&text)?)
    }
}

fn page_query(next_token: Option<&str>) -> Vec<(String, String)> {
    let mut query = vec![("limit".to_string(), PAGE_LIMIT.to_string())];
    if let Some(token) = next_token {
        query.push(("nextToken".to_string(), token.to_string()));
    }
    query
}

fn parse_error(status: u16, request_id: String, body: &str) -> AliyunError {
    match serde_json::from_str::<FcErrorBody>(body) {
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

fn non_empty(token: Option<String>) -> Option<String> {
    token.filter(|t| !t.is_empty())
}

#[async_trait]
impl ComputeClient for FcClient {
    async fn delete_service(&self, service: &str) -> fcremove_cloud::Result<()> {
        self.send(Method::DELETE, &format!("/services/{}", service), &[], None)
            .await?;
        Ok(())
    }

    async fn get_function(
        &self,
        service: &str,
        function: &str,
    ) -> fcremove_cloud::Result<FunctionInfo> {
        let wire: WireFunction = self
            .send_json(
                Method::GET,
                &format!("/services/{}/functions/{}", service, function),
                &[],
            )
            .await?;
        Ok(FunctionInfo {
            function_name: wire.function_name,
        })
    }

    async fn delete_function(&self, service: &str, function: &str) -> fcremove_cloud::Result<()> {
        self.send(
            Method::DELETE,
            &format!("/services/{}/functions/{}", service, function),
            &[],
            None,
        )
        .await?;
        Ok(())
    }

    async fn list_triggers(
        &self,
        service: &str,
        function: &str,
        next_token: Option<&str>,
    ) -> fcremove_cloud::Result<TokenPage<TriggerInfo>> {
        let wire: ListTriggersResponse = self
            .send_json(
                Method::GET,
                &format!("/services/{}/functions/{}/triggers", service, function),
                &page_query(next_token),
            )
            .await?;
        Ok(wire.into_page())
    }

    async fn delete_trigger(
        &self,
        service: &str,
        function: &str,
        trigger: &str,
    ) -> fcremove_cloud::Result<()> {
        self.send(
            Method::DELETE,
            &format!(
                "/services/{}/functions/{}/triggers/{}",
                service, function, trigger
            ),
            &[],
            None,
        )
        .await?;
        Ok(())
    }

    async fn get_resource_tags(
        &self,
        resource_arn: &str,
    ) -> fcremove_cloud::Result<BTreeMap<String, String>> {
        let query = vec![("resourceArn".to_string(), self.resource_arn(resource_arn))];
        let wire: TagsResponse = self.send_json(Method::GET, "/tag", &query).await?;
        Ok(wire.tags.unwrap_or_default())
    }

    async fn untag_resource(
        &self,
        resource_arn: &str,
        tag_keys: &[String],
    ) -> fcremove_cloud::Result<()> {
        let body = UntagRequest {
            resource_arn: self.resource_arn(resource_arn),
            tag_keys: tag_keys.to_vec(),
            all: false,
        };
        let body = serde_json::to_value(&body).map_err(AliyunError::from)?;
        self.send(Method::DELETE, "/tag", &[], Some(body)).await?;
        Ok(())
    }

    async fn list_custom_domains(
        &self,
        next_token: Option<&str>,
    ) -> fcremove_cloud::Result<TokenPage<CustomDomain>> {
        let wire: ListCustomDomainsResponse = self
            .send_json(Method::GET, "/custom-domains", &page_query(next_token))
            .await?;
        Ok(wire.into_page())
    }

    async fn delete_custom_domain(&self, domain_name: &str) -> fcremove_cloud::Result<()> {
        self.send(
            Method::DELETE,
            &format!("/custom-domains/{}", domain_name),
            &[],
            None,
        )
        .await?;
        Ok(())
    }
}

// Wire types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct FcErrorBody {
    error_code: String,
    #[serde(default)]
    error_message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireFunction {
    function_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireTrigger {
    trigger_name: String,
    #[serde(default)]
    trigger_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListTriggersResponse {
    #[serde(default)]
    triggers: Vec<WireTrigger>,
    next_token: Option<String>,
}

impl ListTriggersResponse {
    fn into_page(self) -> TokenPage<TriggerInfo> {
        TokenPage {
            items: self
                .triggers
                .into_iter()
                .map(|t| TriggerInfo {
                    trigger_name: t.trigger_name,
                    trigger_type: t.trigger_type,
                })
                .collect(),
            next_token: non_empty(self.next_token),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    tags: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UntagRequest {
    resource_arn: String,
    tag_keys: Vec<String>,
    all: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireRoute {
    #[serde(default)]
    path: String,
    #[serde(default)]
    service_name: String,
    #[serde(default)]
    function_name: String,
    qualifier: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WireRouteConfig {
    #[serde(default)]
    routes: Vec<WireRoute>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCustomDomain {
    domain_name: String,
    route_config: Option<WireRouteConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListCustomDomainsResponse {
    #[serde(default)]
    custom_domains: Vec<WireCustomDomain>,
    next_token: Option<String>,
}

impl ListCustomDomainsResponse {
    fn into_page(self) -> TokenPage<CustomDomain> {
        TokenPage {
            items: self
                .custom_domains
                .into_iter()
                .map(|d| CustomDomain {
                    domain_name: d.domain_name,
                    routes: d
                        .route_config
                        .unwrap_or_default()
                        .routes
                        .into_iter()
                        .map(|r| DomainRoute {
                            path: r.path,
                            service_name: r.service_name,
                            function_name: r.function_name,
                            qualifier: r.qualifier,
                        })
                        .collect(),
                })
                .collect(),
            next_token: non_empty(self.next_token),
        }
    }
}
