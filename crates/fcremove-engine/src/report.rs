//! Outcome of a removal run

use fcremove_cloud::ResourceKind;
use serde::Serialize;

/// A remote resource touched during the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceRef {
    pub kind: ResourceKind,
    pub name: String,
}

impl std::fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind, self.name)
    }
}

/// What a run did, in the order it happened
#[derive(Debug, Clone, Default, Serialize)]
pub struct RemovalReport {
    /// Deleted by this run
    pub removed: Vec<ResourceRef>,

    /// Already gone when the run reached them
    pub already_absent: Vec<ResourceRef>,

    /// Found but left in place (declined, or not auto-generated)
    pub skipped: Vec<ResourceRef>,

    /// Best-effort failures that did not abort the run
    pub warnings: Vec<String>,
}

impl RemovalReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_removed(&mut self, kind: ResourceKind, name: impl Into<String>) {
        self.removed.push(ResourceRef {
            kind,
            name: name.into(),
        });
    }

    pub fn record_absent(&mut self, kind: ResourceKind, name: impl Into<String>) {
        self.already_absent.push(ResourceRef {
            kind,
            name: name.into(),
        });
    }

    pub fn record_skipped(&mut self, kind: ResourceKind, name: impl Into<String>) {
        self.skipped.push(ResourceRef {
            kind,
            name: name.into(),
        });
    }

    pub fn record_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// No warnings were raised
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn removed_of(&self, kind: ResourceKind) -> Vec<&str> {
        self.removed
            .iter()
            .filter(|r| r.kind == kind)
            .map(|r| r.name.as_str())
            .collect()
    }
}

impl std::fmt::Display for RemovalReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} removed, {} already absent, {} skipped",
            self.removed.len(),
            self.already_absent.len(),
            self.skipped.len()
        )?;
        match self.warnings.len() {
            0 => Ok(()),
            1 => write!(f, ", 1 warning"),
            n => write!(f, ", {} warnings", n),
        }
    }
}
