//! Removal orchestration for Function Compute deployments
//!
//! [`Remover`] walks the phases of a teardown against the client traits of
//! `fcremove-cloud`. Failures fall into three tiers:
//!
//! - absent resources are reported as info and skipped
//! - any other failure on a compute resource aborts with [`RemoveError`]
//! - failures while cleaning the NAS and log side resources become warnings
//!
//! ```text
//! Remover::run
//!   ├── ComputeCleaner  tags → domains → triggers → function → service
//!   ├── NasCleaner      default vpc/vswitch → file system → mount target
//!   └── LogCleaner      default sls project
//! ```

pub mod compute;
pub mod error;
pub mod interaction;
pub mod log;
pub mod nas;
pub mod remover;
pub mod report;

pub use compute::{ComputeCleaner, NAS_FUNCTION_NAME, NAS_TRIGGER_NAME};
pub use error::{RemoveError, Result};
pub use interaction::Interaction;
pub use log::{DEFAULT_LOG_STORE, LogCleaner, default_project_name};
pub use nas::{DefaultNetwork, NasCleaner, is_auto_generated};
pub use remover::{CloudClients, Remover};
pub use report::{RemovalReport, ResourceRef};
