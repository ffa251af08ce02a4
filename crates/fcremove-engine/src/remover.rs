//! Phase dispatcher for a removal run

use crate::compute::ComputeCleaner;
use crate::error::Result;
use crate::interaction::Interaction;
use crate::log::LogCleaner;
use crate::nas::NasCleaner;
use crate::report::RemovalReport;
use fcremove_cloud::{ComputeClient, LogClient, NasClient, RetryPolicy, VpcClient};
use fcremove_core::{Deployment, RemovalRequest, RemoveTarget};
use tracing::instrument;

/// Regional clients used by one run
#[derive(Clone, Copy)]
pub struct CloudClients<'a> {
    pub compute: &'a dyn ComputeClient,
    pub vpc: &'a dyn VpcClient,
    pub nas: &'a dyn NasClient,
    pub log: &'a dyn LogClient,
}

/// Tears down one deployment
///
/// Phases run in a fixed order (tags, domains, triggers, function, service,
/// then the NAS and log side resources) and each one is gated by the
/// request's target. The first escalated error stops the run.
pub struct Remover<'a> {
    deployment: &'a Deployment,
    account_id: String,
    clients: CloudClients<'a>,
    ui: &'a dyn Interaction,
    retry: RetryPolicy,
}

impl<'a> Remover<'a> {
    pub fn new(
        deployment: &'a Deployment,
        account_id: impl Into<String>,
        clients: CloudClients<'a>,
        ui: &'a dyn Interaction,
    ) -> Self {
        Self {
            deployment,
            account_id: account_id.into(),
            clients,
            ui,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn compute(&self) -> ComputeCleaner<'_> {
        ComputeCleaner::new(self.clients.compute, self.ui, &self.retry)
    }

    #[instrument(skip(self), fields(service = %self.deployment.service_name()))]
    pub async fn run(&self, request: &RemovalRequest) -> Result<RemovalReport> {
        let mut report = RemovalReport::new();
        let service = self.deployment.service_name();
        let compute = self.compute();

        if request.includes(RemoveTarget::Tags) {
            let arn = format!("services/{}", service);
            compute
                .remove_tags(&arn, request.key.as_deref(), &mut report)
                .await?;
        }

        let function = self.deployment.function_name();

        if request.includes(RemoveTarget::Domain) {
            match function {
                Some(function) => {
                    let triggers = self.deployment.http_triggers_with_domains();
                    if triggers.is_empty() {
                        self.ui
                            .debug("No http trigger with custom domains, skip deleting domain");
                    } else if let Some(domain) = request.domain.as_deref() {
                        compute
                            .remove_domain(&[], service, function, Some(domain), &mut report)
                            .await?;
                    } else {
                        for trigger in triggers {
                            compute
                                .remove_domain(
                                    trigger.domains(),
                                    service,
                                    function,
                                    None,
                                    &mut report,
                                )
                                .await?;
                        }
                    }
                }
                None => self.ui.info("No function declared, skip deleting domain"),
            }
        }

        if request.includes(RemoveTarget::Trigger) {
            match function {
                Some(function) => {
                    compute
                        .remove_trigger(service, function, request.name.as_deref(), &mut report)
                        .await?
                }
                None => self.ui.info("No function declared, skip deleting trigger"),
            }
        }

        if request.includes(RemoveTarget::Function) {
            match function {
                Some(function) => compute.remove_function(service, function, &mut report).await?,
                None => self.ui.info("No function declared, skip deleting function"),
            }
        }

        let nas_config = self.deployment.service.nas.as_ref();

        if request.includes(RemoveTarget::Service) {
            if nas_config.is_some() {
                compute
                    .remove_nas_function_if_exists(service, &mut report)
                    .await;
            }
            compute.remove_service(service, &mut report).await?;
        }

        if request.is_remove_all() {
            if let Some(nas_config) = nas_config {
                NasCleaner::new(self.clients.vpc, self.clients.nas, self.ui, &self.retry)
                    .remove(nas_config, request.force, &mut report)
                    .await;
            }
            if let Some(log_config) = self.deployment.service.log.as_ref() {
                LogCleaner::new(
                    self.clients.log,
                    self.ui,
                    &self.retry,
                    &self.deployment.region,
                    &self.account_id,
                )
                .remove(log_config, request.force, &mut report)
                .await?;
            }
        }

        tracing::debug!(summary = %report, "Removal finished");
        Ok(report)
    }
}
