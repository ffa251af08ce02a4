//! Cleanup of the Log Service project auto-provisioned for a region

use crate::error::{RemoveError, Result};
use crate::interaction::Interaction;
use crate::report::RemovalReport;
use fcremove_cloud::{ErrorKind, LogClient, ResourceKind, RetryPolicy, retry};
use fcremove_core::LogConfig;
use sha1::{Digest, Sha1};
use tracing::instrument;

pub const DEFAULT_LOG_STORE: &str = "function-log";

/// `aliyun-fc-<region>-<uuid>`, where the uuid is derived from the account id
pub fn default_project_name(region: &str, account_id: &str) -> String {
    format!("aliyun-fc-{}-{}", region, account_uuid(account_id))
}

/// Name-based (SHA-1, version 5 layout) uuid of the account id, no namespace
fn account_uuid(account_id: &str) -> String {
    let digest = Sha1::digest(account_id.as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    uuid::Builder::from_sha1_bytes(bytes)
        .into_uuid()
        .hyphenated()
        .to_string()
}

pub struct LogCleaner<'a> {
    client: &'a dyn LogClient,
    ui: &'a dyn Interaction,
    retry: &'a RetryPolicy,
    project: String,
}

impl<'a> LogCleaner<'a> {
    pub fn new(
        client: &'a dyn LogClient,
        ui: &'a dyn Interaction,
        retry: &'a RetryPolicy,
        region: &str,
        account_id: &str,
    ) -> Self {
        Self {
            client,
            ui,
            retry,
            project: default_project_name(region, account_id),
        }
    }

    /// Delete the default project if it belongs to this deployment
    ///
    /// Only an unauthorized existence check escalates; everything else is
    /// reported as a warning.
    #[instrument(skip(self, log_config, report), fields(project = %self.project))]
    pub async fn remove(
        &self,
        log_config: &LogConfig,
        force: bool,
        report: &mut RemovalReport,
    ) -> Result<()> {
        let project = self.project.as_str();
        if !(log_config.is_auto() || log_config.matches(project, DEFAULT_LOG_STORE)) {
            self.ui.debug("Log config is not auto generated, skip");
            return Ok(());
        }

        if !self.project_exists(project, report).await? {
            return Ok(());
        }

        self.ui
            .info(&format!("Found auto generated sls project: {}.", project));
        let question = format!("Do you want to delete sls project: {}?", project);
        if !force && !self.ui.confirm(&question) {
            report.record_skipped(ResourceKind::LogProject, project);
            return Ok(());
        }

        self.ui.info(&format!("Deleting sls project: {}", project));
        match self.client.delete_project(project).await {
            Ok(()) => {
                self.ui.success("Delete sls project successfully.");
                report.record_removed(ResourceKind::LogProject, project);
            }
            Err(e) if e.is_not_found() => {
                self.ui.info(&format!("Sls project {} not exists", project));
                report.record_absent(ResourceKind::LogProject, project);
            }
            Err(e) => {
                let message = format!("Failed to delete sls project {}: {}", project, e);
                self.ui.warn(&message);
                report.record_warning(message);
            }
        }
        Ok(())
    }

    async fn project_exists(&self, project: &str, report: &mut RemovalReport) -> Result<bool> {
        let config = self.retry.for_kind(ResourceKind::LogProject);
        match retry(config, "get sls project", || {
            self.client.get_project(project)
        })
        .await
        {
            Ok(_) => Ok(true),
            Err(e) if e.kind == ErrorKind::Unauthorized => Err(RemoveError::Unauthorized {
                code: e.code,
                message: format!(
                    "Log Service '{}' may create by others, you should use a unique project name.",
                    project
                ),
            }),
            Err(e) if e.is_not_found() => {
                self.ui
                    .debug(&format!("Sls project {} not exists", project));
                Ok(false)
            }
            Err(e) => {
                let message = format!("Unable to get sls project {}: {}", project, e);
                self.ui.warn(&message);
                report.record_warning(message);
                Ok(false)
            }
        }
    }
}
