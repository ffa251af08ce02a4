use crate::RemoveArgs;
use crate::console::Console;
use colored::Colorize;
use fcremove_cloud_aliyun::{AliyunClients, AliyunConfig};
use fcremove_core::RemovalRequest;
use fcremove_engine::{CloudClients, Remover};

impl RemoveArgs {
    fn request(&self) -> RemovalRequest {
        RemovalRequest {
            target: self.target.map(Into::into),
            force: self.force,
            key: self.key.clone(),
            domain: self.domain.clone(),
            name: self.name.clone(),
        }
    }
}

pub async fn handle(args: RemoveArgs) -> anyhow::Result<()> {
    let path = fcremove_config::find_descriptor_file(args.config.as_deref())?;
    println!("{} {}", "Descriptor:".dimmed(), path.display());

    let project = fcremove_core::load_project(&path, args.project.as_deref())?;

    // --access > プロジェクトの Access > default
    let alias = args.access.as_deref().or(project.access.as_deref());
    let credentials = fcremove_config::load_credentials(alias)?;

    let deployment = &project.properties;
    let request = args.request();
    let scope = match request.target {
        Some(target) => target.to_string(),
        None => "all resources".to_string(),
    };
    println!(
        "{}",
        format!(
            "Removing {} of service {} ({})",
            scope,
            deployment.service_name(),
            deployment.region
        )
        .bold()
    );

    let config = AliyunConfig::new(credentials.clone(), deployment.region.clone());
    let clients = AliyunClients::new(config)?;
    let console = Console::new();

    let remover = Remover::new(
        deployment,
        credentials.account_id.clone(),
        CloudClients {
            compute: &clients.compute,
            vpc: &clients.vpc,
            nas: &clients.nas,
            log: &clients.log,
        },
        &console,
    );
    let report = remover.run(&request).await?;

    println!();
    println!("{} {}", "✓ Done:".green().bold(), report);
    for warning in &report.warnings {
        println!("  {} {}", "⚠".yellow(), warning);
    }
    Ok(())
}
