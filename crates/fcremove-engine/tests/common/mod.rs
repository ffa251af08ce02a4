//! In-memory cloud and scripted interaction for engine tests

#![allow(dead_code)]

use async_trait::async_trait;
use fcremove_cloud::{
    CloudError, ComputeClient, CustomDomain, DomainRoute, FileSystemInfo, FunctionInfo, LogClient,
    MountTargetInfo, NasClient, NumberedPage, ProjectInfo, Result, TokenPage, TriggerInfo,
    VSwitchInfo, VpcClient, VpcInfo,
};
use fcremove_core::Deployment;
use fcremove_engine::{CloudClients, Interaction};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

pub const ACCOUNT_ID: &str = "1234567890123456";

#[derive(Default)]
struct State {
    services: BTreeSet<String>,
    functions: BTreeSet<(String, String)>,
    triggers: BTreeMap<(String, String), Vec<String>>,
    tags: BTreeMap<String, BTreeMap<String, String>>,
    domains: Vec<CustomDomain>,
    vpcs: Vec<VpcInfo>,
    vswitches: BTreeMap<String, String>,
    file_systems: Vec<FileSystemInfo>,
    mount_targets: BTreeMap<String, Vec<MountTargetInfo>>,
    projects: BTreeSet<String>,
    errors: HashMap<&'static str, VecDeque<CloudError>>,
    calls: Vec<String>,
}

/// A region worth of resources, with every call recorded
pub struct FakeCloud {
    state: Mutex<State>,
    page_size: usize,
}

impl FakeCloud {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            page_size: 100,
        }
    }

    /// Page size used by the token-paginated listings
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn with_service(self, service: &str) -> Self {
        self.state().services.insert(service.to_string());
        self
    }

    pub fn with_function(self, service: &str, function: &str) -> Self {
        {
            let mut state = self.state();
            state.services.insert(service.to_string());
            let key = (service.to_string(), function.to_string());
            state.functions.insert(key);
        }
        self
    }

    pub fn with_triggers(self, service: &str, function: &str, triggers: &[&str]) -> Self {
        let this = self.with_function(service, function);
        let key = (service.to_string(), function.to_string());
        let names = triggers.iter().map(|t| t.to_string()).collect();
        this.state().triggers.insert(key, names);
        this
    }

    pub fn with_tags(self, service: &str, pairs: &[(&str, &str)]) -> Self {
        let tags = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let arn = format!("services/{}", service);
        self.state().tags.insert(arn, tags);
        self
    }

    pub fn with_domain(self, domain: &str, service: &str, function: &str) -> Self {
        self.state().domains.push(CustomDomain {
            domain_name: domain.to_string(),
            routes: vec![DomainRoute {
                path: "/*".to_string(),
                service_name: service.to_string(),
                function_name: function.to_string(),
                qualifier: None,
            }],
        });
        self
    }

    pub fn with_vpc(self, vpc_id: &str, vpc_name: &str, vswitches: &[(&str, &str)]) -> Self {
        {
            let mut state = self.state();
            state.vpcs.push(VpcInfo {
                vpc_id: vpc_id.to_string(),
                vpc_name: vpc_name.to_string(),
                vswitch_ids: vswitches.iter().map(|(id, _)| id.to_string()).collect(),
            });
            for (id, name) in vswitches {
                state.vswitches.insert(id.to_string(), name.to_string());
            }
        }
        self
    }

    /// `fc-fun-vpc` / `fc-fun-vswitch-1` as `vpc-default` / `vsw-default`
    pub fn with_default_network(self) -> Self {
        self.with_vpc(
            "vpc-default",
            "fc-fun-vpc",
            &[("vsw-other", "custom"), ("vsw-default", "fc-fun-vswitch-1")],
        )
    }

    pub fn with_file_system(self, file_system_id: &str, description: &str) -> Self {
        self.state().file_systems.push(FileSystemInfo {
            file_system_id: file_system_id.to_string(),
            description: description.to_string(),
        });
        self
    }

    pub fn with_mount_target(
        self,
        file_system_id: &str,
        domain: &str,
        vpc_id: &str,
        vswitch_id: &str,
    ) -> Self {
        let target = MountTargetInfo {
            mount_target_domain: domain.to_string(),
            vpc_id: vpc_id.to_string(),
            vswitch_id: vswitch_id.to_string(),
        };
        self.state()
            .mount_targets
            .entry(file_system_id.to_string())
            .or_default()
            .push(target);
        self
    }

    /// Auto-generated NAS in the default network
    pub fn with_default_nas(self, mount_target: &str) -> Self {
        self.with_default_network()
            .with_file_system("fs-other", "hand made")
            .with_file_system("fs-auto", "default_nas_created_by_fc_fun")
            .with_mount_target("fs-auto", mount_target, "vpc-default", "vsw-default")
    }

    pub fn with_project(self, project: &str) -> Self {
        self.state().projects.insert(project.to_string());
        self
    }

    /// Make the next calls of `method` fail with these errors, in order
    pub fn failing(self, method: &'static str, errors: Vec<CloudError>) -> Self {
        self.state()
            .errors
            .entry(method)
            .or_default()
            .extend(errors);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    /// Calls whose method name starts with `prefix`
    pub fn calls_of(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .collect()
    }

    pub fn has_service(&self, service: &str) -> bool {
        self.state().services.contains(service)
    }

    pub fn has_project(&self, project: &str) -> bool {
        self.state().projects.contains(project)
    }

    pub fn clients(&self) -> CloudClients<'_> {
        CloudClients {
            compute: self,
            vpc: self,
            nas: self,
            log: self,
        }
    }

    /// Record the call and pop an injected error, if any
    fn enter(&self, method: &'static str, args: String) -> Result<()> {
        let mut state = self.state();
        let call = if args.is_empty() {
            method.to_string()
        } else {
            format!("{} {}", method, args)
        };
        state.calls.push(call);
        match state.errors.get_mut(method).and_then(|q| q.pop_front()) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn service_not_found(service: &str) -> CloudError {
    let message = format!("service '{}' does not exist", service);
    CloudError::not_found("ServiceNotFound", message)
}

fn function_not_found(function: &str) -> CloudError {
    let message = format!("function '{}' does not exist", function);
    CloudError::not_found("FunctionNotFound", message)
}

fn token_page<T: Clone>(items: &[T], token: Option<&str>, page_size: usize) -> TokenPage<T> {
    let start: usize = token.and_then(|t| t.parse().ok()).unwrap_or(0);
    let end = (start + page_size).min(items.len());
    TokenPage {
        items: items[start.min(end)..end].to_vec(),
        next_token: (end < items.len()).then(|| end.to_string()),
    }
}

fn numbered_page<T: Clone>(items: &[T], page_number: u32, page_size: u32) -> NumberedPage<T> {
    let start = ((page_number.max(1) - 1) * page_size) as usize;
    let end = (start + page_size as usize).min(items.len());
    NumberedPage {
        items: items[start.min(end)..end].to_vec(),
        total_count: items.len() as u32,
        page_number,
        page_size,
    }
}

#[async_trait]
impl ComputeClient for FakeCloud {
    async fn delete_service(&self, service: &str) -> Result<()> {
        self.enter("delete_service", service.to_string())?;
        let mut state = self.state();
        if !state.services.remove(service) {
            return Err(service_not_found(service));
        }
        Ok(())
    }

    async fn get_function(&self, service: &str, function: &str) -> Result<FunctionInfo> {
        self.enter("get_function", format!("{}/{}", service, function))?;
        let state = self.state();
        if !state.services.contains(service) {
            return Err(service_not_found(service));
        }
        let key = (service.to_string(), function.to_string());
        if !state.functions.contains(&key) {
            return Err(function_not_found(function));
        }
        Ok(FunctionInfo {
            function_name: function.to_string(),
        })
    }

    async fn delete_function(&self, service: &str, function: &str) -> Result<()> {
        self.enter("delete_function", format!("{}/{}", service, function))?;
        let mut state = self.state();
        if !state.services.contains(service) {
            return Err(service_not_found(service));
        }
        let key = (service.to_string(), function.to_string());
        if !state.functions.remove(&key) {
            return Err(function_not_found(function));
        }
        Ok(())
    }

    async fn list_triggers(
        &self,
        service: &str,
        function: &str,
        next_token: Option<&str>,
    ) -> Result<TokenPage<TriggerInfo>> {
        self.enter(
            "list_triggers",
            format!("{}/{} {}", service, function, next_token.unwrap_or("-")),
        )?;
        let state = self.state();
        if !state.services.contains(service) {
            return Err(service_not_found(service));
        }
        let key = (service.to_string(), function.to_string());
        if !state.functions.contains(&key) {
            return Err(function_not_found(function));
        }
        let triggers: Vec<TriggerInfo> = state
            .triggers
            .get(&key)
            .map(|names| {
                names
                    .iter()
                    .map(|n| TriggerInfo {
                        trigger_name: n.clone(),
                        trigger_type: "http".to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(token_page(&triggers, next_token, self.page_size))
    }

    async fn delete_trigger(&self, service: &str, function: &str, trigger: &str) -> Result<()> {
        let path = format!("{}/{}/{}", service, function, trigger);
        self.enter("delete_trigger", path)?;
        let mut state = self.state();
        let key = (service.to_string(), function.to_string());
        let removed = state
            .triggers
            .get_mut(&key)
            .and_then(|names| {
                let idx = names.iter().position(|n| n == trigger)?;
                Some(names.remove(idx))
            })
            .is_some();
        if !removed {
            return Err(CloudError::not_found(
                "TriggerNotFound",
                format!("trigger '{}' does not exist", trigger),
            ));
        }
        Ok(())
    }

    async fn get_resource_tags(&self, resource_arn: &str) -> Result<BTreeMap<String, String>> {
        self.enter("get_resource_tags", resource_arn.to_string())?;
        let state = self.state();
        let service = resource_arn.trim_start_matches("services/");
        if !state.services.contains(service) {
            return Err(service_not_found(service));
        }
        Ok(state.tags.get(resource_arn).cloned().unwrap_or_default())
    }

    async fn untag_resource(&self, resource_arn: &str, tag_keys: &[String]) -> Result<()> {
        self.enter(
            "untag_resource",
            format!("{} [{}]", resource_arn, tag_keys.join(",")),
        )?;
        let mut state = self.state();
        if let Some(tags) = state.tags.get_mut(resource_arn) {
            for key in tag_keys {
                tags.remove(key);
            }
        }
        Ok(())
    }

    async fn list_custom_domains(
        &self,
        next_token: Option<&str>,
    ) -> Result<TokenPage<CustomDomain>> {
        self.enter("list_custom_domains", next_token.unwrap_or("-").to_string())?;
        let state = self.state();
        Ok(token_page(&state.domains, next_token, self.page_size))
    }

    async fn delete_custom_domain(&self, domain_name: &str) -> Result<()> {
        self.enter("delete_custom_domain", domain_name.to_string())?;
        let mut state = self.state();
        let before = state.domains.len();
        state.domains.retain(|d| d.domain_name != domain_name);
        if state.domains.len() == before {
            return Err(CloudError::not_found(
                "DomainNameNotFound",
                format!("domain '{}' does not exist", domain_name),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl VpcClient for FakeCloud {
    async fn describe_vpcs(
        &self,
        page_number: u32,
        page_size: u32,
    ) -> Result<NumberedPage<VpcInfo>> {
        self.enter("describe_vpcs", page_number.to_string())?;
        let state = self.state();
        Ok(numbered_page(&state.vpcs, page_number, page_size))
    }

    async fn describe_vswitch_attributes(&self, vswitch_id: &str) -> Result<VSwitchInfo> {
        self.enter("describe_vswitch_attributes", vswitch_id.to_string())?;
        let state = self.state();
        match state.vswitches.get(vswitch_id) {
            Some(name) => Ok(VSwitchInfo {
                vswitch_id: vswitch_id.to_string(),
                vswitch_name: name.clone(),
            }),
            None => Err(CloudError::not_found(
                "InvalidVSwitchId.NotFound",
                "vswitch not found",
            )),
        }
    }
}

#[async_trait]
impl NasClient for FakeCloud {
    async fn describe_file_systems(
        &self,
        page_number: u32,
        page_size: u32,
    ) -> Result<NumberedPage<FileSystemInfo>> {
        self.enter("describe_file_systems", page_number.to_string())?;
        let state = self.state();
        Ok(numbered_page(&state.file_systems, page_number, page_size))
    }

    async fn describe_mount_targets(&self, file_system_id: &str) -> Result<Vec<MountTargetInfo>> {
        self.enter("describe_mount_targets", file_system_id.to_string())?;
        let state = self.state();
        Ok(state
            .mount_targets
            .get(file_system_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn delete_mount_target(
        &self,
        file_system_id: &str,
        mount_target_domain: &str,
    ) -> Result<()> {
        self.enter(
            "delete_mount_target",
            format!("{} {}", file_system_id, mount_target_domain),
        )?;
        let mut state = self.state();
        if let Some(targets) = state.mount_targets.get_mut(file_system_id) {
            targets.retain(|t| t.mount_target_domain != mount_target_domain);
        }
        Ok(())
    }

    async fn delete_file_system(&self, file_system_id: &str) -> Result<()> {
        self.enter("delete_file_system", file_system_id.to_string())?;
        let mut state = self.state();
        state
            .file_systems
            .retain(|f| f.file_system_id != file_system_id);
        Ok(())
    }
}

#[async_trait]
impl LogClient for FakeCloud {
    async fn get_project(&self, project: &str) -> Result<ProjectInfo> {
        self.enter("get_project", project.to_string())?;
        let state = self.state();
        if !state.projects.contains(project) {
            return Err(CloudError::not_found(
                "ProjectNotExist",
                format!("The Project does not exist : {}", project),
            ));
        }
        Ok(ProjectInfo {
            project_name: project.to_string(),
            description: None,
        })
    }

    async fn delete_project(&self, project: &str) -> Result<()> {
        self.enter("delete_project", project.to_string())?;
        let mut state = self.state();
        if !state.projects.remove(project) {
            return Err(CloudError::not_found("ProjectNotExist", "gone"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warn,
    Debug,
}

/// Records every line and answers every question the same way
pub struct ScriptedInteraction {
    answer: bool,
    lines: Mutex<Vec<(Level, String)>>,
    questions: Mutex<Vec<String>>,
}

impl ScriptedInteraction {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            lines: Mutex::new(Vec::new()),
            questions: Mutex::new(Vec::new()),
        }
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }

    pub fn lines(&self, level: Level) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn logged(&self, level: Level, needle: &str) -> bool {
        self.lines(level).iter().any(|m| m.contains(needle))
    }

    fn push(&self, level: Level, message: &str) {
        self.lines
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }
}

impl Interaction for ScriptedInteraction {
    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }

    fn success(&self, message: &str) {
        self.push(Level::Success, message);
    }

    fn warn(&self, message: &str) {
        self.push(Level::Warn, message);
    }

    fn debug(&self, message: &str) {
        self.push(Level::Debug, message);
    }

    fn confirm(&self, question: &str) -> bool {
        self.questions.lock().unwrap().push(question.to_string());
        self.answer
    }
}

/// Parse a `Properties` block
pub fn deployment(yaml: &str) -> Deployment {
    fcremove_core::parse_project_str(yaml, "demo", None)
        .unwrap()
        .properties
}

pub const BASIC: &str = r#"
Region: cn-hangzhou
Service:
  Name: demo
Function:
  Name: index
  Triggers:
    - Name: http
      Type: HTTP
      Parameters:
        Domains:
          - Domain: AUTO
    - Name: timer
      Type: Timer
"#;

pub const WITH_SIDE_RESOURCES: &str = r#"
Region: cn-hangzhou
Service:
  Name: demo
  Nas: Auto
  Log: Auto
Function:
  Name: index
"#;
