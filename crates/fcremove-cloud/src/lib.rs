//! fc-remove cloud abstraction
//!
//! Provider-agnostic building blocks for tearing down a Function Compute
//! deployment: the error classification every adapter maps into, the client
//! traits the removal engine is written against, and the retry helper that
//! wraps remote reads.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                fc-remove CLI                     │
//! │                (fc-remove remove)                │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │               fcremove-engine                    │
//! │   compute / nas / log cleaners + dispatcher      │
//! └─────────────────┬───────────────────────────────┘
//!                   │  trait ComputeClient / VpcClient
//!                   │  trait NasClient / LogClient
//! ┌─────────────────▼───────────────────────────────┐
//! │             fcremove-cloud-aliyun                │
//! │        FC / VPC / NAS / SLS over HTTPS           │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod provider;
pub mod retry;

// Re-exports
pub use error::{CloudError, ErrorKind, Result};
pub use provider::{
    ComputeClient, CustomDomain, DomainRoute, FileSystemInfo, FunctionInfo, LogClient,
    MountTargetInfo, NasClient, NumberedPage, ProjectInfo, ResourceKind, TokenPage, TriggerInfo,
    VSwitchInfo, VpcClient, VpcInfo,
};
pub use retry::{RetryConfig, RetryPolicy, retry};
