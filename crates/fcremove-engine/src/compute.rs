//! Service, function, trigger, tag and custom-domain removal
//!
//! Every operation absorbs "not found" as an info line and escalates any
//! other failure as a [`RemoveError`].

use crate::error::{RemoveError, Result};
use crate::interaction::Interaction;
use crate::report::RemovalReport;
use fcremove_cloud::{ComputeClient, ResourceKind, RetryPolicy, retry};
use fcremove_core::{DomainBinding, is_auto_domain};
use tracing::instrument;

/// Helper function deployed next to a NAS-enabled service
pub const NAS_FUNCTION_NAME: &str = "fun-nas-function";
pub const NAS_TRIGGER_NAME: &str = "httpTrigger";

pub struct ComputeCleaner<'a> {
    client: &'a dyn ComputeClient,
    ui: &'a dyn Interaction,
    retry: &'a RetryPolicy,
}

impl<'a> ComputeCleaner<'a> {
    pub fn new(
        client: &'a dyn ComputeClient,
        ui: &'a dyn Interaction,
        retry: &'a RetryPolicy,
    ) -> Self {
        Self { client, ui, retry }
    }

    #[instrument(skip(self, report))]
    pub async fn remove_service(&self, service: &str, report: &mut RemovalReport) -> Result<()> {
        self.ui.info(&format!("Deleting service {}", service));
        match self.client.delete_service(service).await {
            Ok(()) => {
                self.ui
                    .success(&format!("Delete service {} successfully", service));
                report.record_removed(ResourceKind::Service, service);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                self.ui.info(&format!("Service {} not exists", service));
                report.record_absent(ResourceKind::Service, service);
                Ok(())
            }
            Err(e) => Err(RemoveError::from_cloud(
                format!("Unable to delete service {}", service),
                &e,
            )),
        }
    }

    #[instrument(skip(self, report))]
    pub async fn remove_function(
        &self,
        service: &str,
        function: &str,
        report: &mut RemovalReport,
    ) -> Result<()> {
        let qualified = format!("{}@{}", service, function);
        self.ui.info(&format!("Deleting function {}", qualified));
        match self.client.delete_function(service, function).await {
            Ok(()) => {
                self.ui
                    .success(&format!("Delete function {} successfully", qualified));
                report.record_removed(ResourceKind::Function, qualified);
                Ok(())
            }
            Err(e) if e.is_code("ServiceNotFound") => {
                self.ui.info("Service not exists, skip deleting function");
                report.record_absent(ResourceKind::Function, qualified);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                self.ui.info(&format!("Function {} not exists.", qualified));
                report.record_absent(ResourceKind::Function, qualified);
                Ok(())
            }
            Err(e) => Err(RemoveError::from_cloud(
                format!("Unable to delete function {}", qualified),
                &e,
            )),
        }
    }

    /// Delete `only_name`, or every trigger on the function in list order
    #[instrument(skip(self, report))]
    pub async fn remove_trigger(
        &self,
        service: &str,
        function: &str,
        only_name: Option<&str>,
        report: &mut RemovalReport,
    ) -> Result<()> {
        let triggers = match only_name {
            Some(name) => vec![name.to_string()],
            None => match self.list_trigger_names(service, function).await? {
                Some(names) => names,
                None => return Ok(()),
            },
        };

        for trigger in &triggers {
            self.ui.info(&format!("Deleting trigger: {}", trigger));
            match self.client.delete_trigger(service, function, trigger).await {
                Ok(()) => {
                    self.ui
                        .success(&format!("Delete trigger successfully: {}", trigger));
                    report.record_removed(ResourceKind::Trigger, trigger.as_str());
                }
                Err(e) if e.is_not_found() => {
                    self.ui.info(&format!("Trigger {} not exists", trigger));
                    report.record_absent(ResourceKind::Trigger, trigger.as_str());
                }
                Err(e) => {
                    return Err(RemoveError::from_cloud(
                        format!("Unable to delete trigger {}", trigger),
                        &e,
                    ));
                }
            }
        }
        Ok(())
    }

    /// `None` when the service or function is already gone
    async fn list_trigger_names(
        &self,
        service: &str,
        function: &str,
    ) -> Result<Option<Vec<String>>> {
        let config = self.retry.for_kind(ResourceKind::Trigger);
        let mut names = Vec::new();
        let mut next_token: Option<String> = None;
        loop {
            let token = next_token.as_deref();
            let page = retry(config, "list triggers", || {
                self.client.list_triggers(service, function, token)
            })
            .await;
            match page {
                Ok(page) => {
                    names.extend(page.items.into_iter().map(|t| t.trigger_name));
                    match page.next_token {
                        Some(token) => next_token = Some(token),
                        None => return Ok(Some(names)),
                    }
                }
                Err(e) if e.is_code("ServiceNotFound") => {
                    self.ui.info("Service not exists, skip deleting trigger");
                    return Ok(None);
                }
                Err(e) if e.is_not_found() => {
                    self.ui.info("Function not exists, skip deleting trigger");
                    return Ok(None);
                }
                Err(e) => return Err(RemoveError::from_cloud("Unable to get triggers", &e)),
            }
        }
    }

    /// Untag `only_key`, or every tag on the resource in one call
    #[instrument(skip(self, report))]
    pub async fn remove_tags(
        &self,
        resource_arn: &str,
        only_key: Option<&str>,
        report: &mut RemovalReport,
    ) -> Result<()> {
        let tag_keys: Vec<String> = match only_key {
            Some(key) => vec![key.to_string()],
            None => {
                let config = self.retry.for_kind(ResourceKind::Tag);
                match retry(config, "get resource tags", || {
                    self.client.get_resource_tags(resource_arn)
                })
                .await
                {
                    Ok(tags) => tags.into_keys().collect(),
                    Err(e) if e.is_not_found() => {
                        self.ui.info("Service not exists, skip deleting tags");
                        return Ok(());
                    }
                    Err(e) => return Err(RemoveError::from_cloud("Unable to get tags", &e)),
                }
            }
        };

        if tag_keys.is_empty() {
            self.ui.info("Tags empty, skip deleting.");
            return Ok(());
        }

        let listed = format!("[{}]", tag_keys.join(", "));
        self.ui.info(&format!("Tags: untag resource: {}", listed));
        match self.client.untag_resource(resource_arn, &tag_keys).await {
            Ok(()) => {
                self.ui
                    .success(&format!("Tags: untag resource successfully: {}", listed));
                for key in tag_keys {
                    report.record_removed(ResourceKind::Tag, key);
                }
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                self.ui.info("Service not exists, skip deleting tags");
                Ok(())
            }
            Err(e) => Err(RemoveError::from_cloud(
                format!("Unable to untag resource {}", resource_arn),
                &e,
            )),
        }
    }

    /// Delete the custom domains bound to an HTTP trigger
    ///
    /// With `only_domain` the bindings are ignored and that single name is
    /// removed. A name of `AUTO` is resolved through the route tables of all
    /// custom domains in the region; no matching route means nothing to do.
    #[instrument(skip(self, bindings, report))]
    pub async fn remove_domain(
        &self,
        bindings: &[DomainBinding],
        service: &str,
        function: &str,
        only_domain: Option<&str>,
        report: &mut RemovalReport,
    ) -> Result<()> {
        let requested: Vec<(&str, bool)> = match only_domain {
            Some(name) => vec![(name, is_auto_domain(name))],
            None => bindings
                .iter()
                .map(|b| (b.domain.as_str(), b.is_auto()))
                .collect(),
        };

        for (name, auto) in requested {
            let domain = if auto {
                match self.find_auto_domain(service, function).await? {
                    Some(domain) => domain,
                    None => {
                        self.ui.debug(&format!(
                            "No custom domain routes to {}@{}, skip",
                            service, function
                        ));
                        continue;
                    }
                }
            } else {
                name.to_string()
            };
            self.delete_domain(&domain, report).await?;
        }
        Ok(())
    }

    async fn delete_domain(&self, domain: &str, report: &mut RemovalReport) -> Result<()> {
        self.ui.info(&format!("Deleting domain: {}", domain));
        match self.client.delete_custom_domain(domain).await {
            Ok(()) => {
                self.ui
                    .success(&format!("Delete domain successfully: {}", domain));
                report.record_removed(ResourceKind::CustomDomain, domain);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                self.ui.info(&format!("Domain {} not exists", domain));
                report.record_absent(ResourceKind::CustomDomain, domain);
                Ok(())
            }
            Err(e) => Err(RemoveError::from_cloud(
                format!("Unable to delete domain {}", domain),
                &e,
            )),
        }
    }

    /// First custom domain with a route to `service`/`function`
    async fn find_auto_domain(&self, service: &str, function: &str) -> Result<Option<String>> {
        let config = self.retry.for_kind(ResourceKind::CustomDomain);
        let mut next_token: Option<String> = None;
        loop {
            let token = next_token.as_deref();
            let page = match retry(config, "list custom domains", || {
                self.client.list_custom_domains(token)
            })
            .await
            {
                Ok(page) => page,
                Err(e) if e.is_not_found() => return Ok(None),
                Err(e) => {
                    return Err(RemoveError::from_cloud("Unable to list custom domains", &e));
                }
            };

            let found = page.items.into_iter().find(|d| {
                d.routes
                    .iter()
                    .any(|r| r.service_name == service && r.function_name == function)
            });
            if let Some(domain) = found {
                return Ok(Some(domain.domain_name));
            }
            match page.next_token {
                Some(token) => next_token = Some(token),
                None => return Ok(None),
            }
        }
    }

    /// Best-effort removal of the NAS helper function; failures become warnings
    #[instrument(skip(self, report))]
    pub async fn remove_nas_function_if_exists(&self, service: &str, report: &mut RemovalReport) {
        let config = self.retry.for_kind(ResourceKind::Function);
        match retry(config, "get function", || {
            self.client.get_function(service, NAS_FUNCTION_NAME)
        })
        .await
        {
            Ok(_) => {}
            Err(e) if e.is_not_found() => {
                self.ui.debug(&format!(
                    "Nas function {}@{} not exists, skip",
                    service, NAS_FUNCTION_NAME
                ));
                return;
            }
            Err(e) => {
                let message = format!("Unable to get nas function {}: {}", NAS_FUNCTION_NAME, e);
                self.ui.warn(&message);
                report.record_warning(message);
                return;
            }
        }

        let nas = format!("{}@{}", service, NAS_FUNCTION_NAME);
        self.ui.info(&format!("Deleting nas function {}", nas));
        match self
            .client
            .delete_trigger(service, NAS_FUNCTION_NAME, NAS_TRIGGER_NAME)
            .await
        {
            Ok(()) => report.record_removed(ResourceKind::Trigger, NAS_TRIGGER_NAME),
            Err(e) if e.is_not_found() => {}
            Err(e) => {
                let message = format!(
                    "Failed to delete nas function trigger {}: {}",
                    NAS_TRIGGER_NAME, e
                );
                self.ui.warn(&message);
                report.record_warning(message);
            }
        }

        match self
            .client
            .delete_function(service, NAS_FUNCTION_NAME)
            .await
        {
            Ok(()) => {
                self.ui
                    .success(&format!("Delete nas function {} successfully", nas));
                report.record_removed(ResourceKind::Function, nas);
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => {
                let message = format!("Failed to delete nas function {}: {}", nas, e);
                self.ui.warn(&message);
                report.record_warning(message);
            }
        }
    }
}
