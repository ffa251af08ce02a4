//! Cleanup of the NAS file system auto-provisioned for a service
//!
//! Everything here is best-effort: a failure at any step becomes a warning
//! and the run carries on.

use crate::interaction::Interaction;
use crate::report::RemovalReport;
use fcremove_cloud::{MountTargetInfo, NasClient, ResourceKind, RetryPolicy, VpcClient, retry};
use fcremove_core::NasConfig;
use tracing::instrument;

pub const DEFAULT_VPC_NAME: &str = "fc-fun-vpc";
pub const DEFAULT_VSWITCH_NAME: &str = "fc-fun-vswitch-1";
pub const DEFAULT_NAS_DESCRIPTION: &str = "default_nas_created_by_fc_fun";
pub const PAGE_SIZE: u32 = 50;

/// The default network the deployment tool provisions NAS into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultNetwork {
    pub vpc_id: String,
    pub vswitch_id: String,
}

impl DefaultNetwork {
    fn contains(&self, target: &MountTargetInfo) -> bool {
        target.vpc_id == self.vpc_id && target.vswitch_id == self.vswitch_id
    }
}

pub struct NasCleaner<'a> {
    vpc: &'a dyn VpcClient,
    nas: &'a dyn NasClient,
    ui: &'a dyn Interaction,
    retry: &'a RetryPolicy,
}

impl<'a> NasCleaner<'a> {
    pub fn new(
        vpc: &'a dyn VpcClient,
        nas: &'a dyn NasClient,
        ui: &'a dyn Interaction,
        retry: &'a RetryPolicy,
    ) -> Self {
        Self { vpc, nas, ui, retry }
    }

    #[instrument(skip(self, nas_config, report))]
    pub async fn remove(&self, nas_config: &NasConfig, force: bool, report: &mut RemovalReport) {
        if let Err(e) = self.try_remove(nas_config, force, report).await {
            let message = format!("Failed to delete auto generated nas: {}", e);
            self.ui.warn(&message);
            report.record_warning(message);
        }
    }

    async fn try_remove(
        &self,
        nas_config: &NasConfig,
        force: bool,
        report: &mut RemovalReport,
    ) -> fcremove_cloud::Result<()> {
        let Some(network) = self.find_default_network().await? else {
            return Ok(());
        };
        let Some(file_system_id) = self.find_file_system(DEFAULT_NAS_DESCRIPTION).await? else {
            self.ui.debug("No auto generated nas file system found");
            return Ok(());
        };
        let Some(mount_target) = self.find_mount_target(&file_system_id, &network).await? else {
            self.ui.debug(&format!(
                "No mount target of {} in {}/{}",
                file_system_id, network.vpc_id, network.vswitch_id
            ));
            return Ok(());
        };

        if !is_auto_generated(nas_config, &mount_target) {
            self.ui.info(&format!(
                "Nas file system {} was not generated automatically, skip deleting.",
                file_system_id
            ));
            report.record_skipped(ResourceKind::FileSystem, file_system_id);
            return Ok(());
        }

        self.ui.info(&format!(
            "Found auto generated nas file system: {}, mount target: {}.",
            file_system_id, mount_target
        ));
        let question = format!("Do you want to delete NAS: {}?", file_system_id);
        if !force && !self.ui.confirm(&question) {
            report.record_skipped(ResourceKind::FileSystem, file_system_id);
            return Ok(());
        }

        self.ui
            .info(&format!("Deleting mount target: {}.", mount_target));
        self.nas
            .delete_mount_target(&file_system_id, &mount_target)
            .await?;
        self.ui.success("Delete successfully.");
        report.record_removed(ResourceKind::MountTarget, mount_target);

        self.ui
            .info(&format!("Deleting nas file system: {}", file_system_id));
        self.nas.delete_file_system(&file_system_id).await?;
        self.ui.success("Delete successfully.");
        report.record_removed(ResourceKind::FileSystem, file_system_id);
        Ok(())
    }

    /// Locate `fc-fun-vpc` and its `fc-fun-vswitch-1`
    pub async fn find_default_network(&self) -> fcremove_cloud::Result<Option<DefaultNetwork>> {
        let vpc_retry = self.retry.for_kind(ResourceKind::Vpc);
        let mut page_number = 1;
        let vpc = loop {
            let page = retry(vpc_retry, "describe vpcs", || {
                self.vpc.describe_vpcs(page_number, PAGE_SIZE)
            })
            .await?;
            let has_more = page.has_more() && !page.items.is_empty();
            if let Some(vpc) = page
                .items
                .into_iter()
                .find(|v| v.vpc_name == DEFAULT_VPC_NAME)
            {
                break vpc;
            }
            if !has_more {
                self.ui
                    .debug(&format!("Could not find default vpc {}", DEFAULT_VPC_NAME));
                return Ok(None);
            }
            page_number += 1;
        };
        self.ui.debug(&format!("Found default vpc: {}", vpc.vpc_id));

        let vswitch_retry = self.retry.for_kind(ResourceKind::VSwitch);
        for vswitch_id in &vpc.vswitch_ids {
            let vswitch = retry(vswitch_retry, "describe vswitch attributes", || {
                self.vpc.describe_vswitch_attributes(vswitch_id)
            })
            .await?;
            if vswitch.vswitch_name == DEFAULT_VSWITCH_NAME {
                self.ui
                    .debug(&format!("Found default vswitch: {}", vswitch_id));
                return Ok(Some(DefaultNetwork {
                    vpc_id: vpc.vpc_id.clone(),
                    vswitch_id: vswitch_id.clone(),
                }));
            }
        }

        self.ui.debug(&format!(
            "Could not find {} from {:?}",
            DEFAULT_VSWITCH_NAME, vpc.vswitch_ids
        ));
        Ok(None)
    }

    async fn find_file_system(&self, description: &str) -> fcremove_cloud::Result<Option<String>> {
        let config = self.retry.for_kind(ResourceKind::FileSystem);
        let mut page_number = 1;
        loop {
            let page = retry(config, "describe file systems", || {
                self.nas.describe_file_systems(page_number, PAGE_SIZE)
            })
            .await?;
            let has_more = page.has_more() && !page.items.is_empty();
            if let Some(fs) = page
                .items
                .into_iter()
                .find(|f| f.description == description)
            {
                return Ok(Some(fs.file_system_id));
            }
            if !has_more {
                return Ok(None);
            }
            page_number += 1;
        }
    }

    async fn find_mount_target(
        &self,
        file_system_id: &str,
        network: &DefaultNetwork,
    ) -> fcremove_cloud::Result<Option<String>> {
        let config = self.retry.for_kind(ResourceKind::MountTarget);
        let targets = retry(config, "describe mount targets", || {
            self.nas.describe_mount_targets(file_system_id)
        })
        .await?;
        Ok(targets
            .into_iter()
            .find(|t| network.contains(t))
            .map(|t| t.mount_target_domain))
    }
}

/// `Nas: Auto`, or a declared mount point that addresses this mount target
pub fn is_auto_generated(nas_config: &NasConfig, mount_target_domain: &str) -> bool {
    nas_config.is_auto()
        || nas_config
            .mount_points()
            .iter()
            .any(|m| m.targets(mount_target_domain))
}
