//! Core of quotactl: entity resolution, quota payloads, rendering and task running.
//!
//! Nothing here talks to the network directly. Remote calls go through the
//! [`IdentityService`] and [`QuotaService`] traits, which the CLI implements over HTTP.

pub mod entity;
pub mod error;
pub mod quota;
pub mod render;
pub mod resolve;
pub mod service;
pub mod task;
pub mod unit;

#[cfg(test)]
pub(crate) mod test_utils;

pub use entity::{Cluster, Domain, Entity, EntityRef, Filter, OutputOptions, Project};
pub use error::{EntityKind, QuotaError, QuotaResult};
pub use quota::{QuotaAssignment, Quotas, Resource};
pub use render::{CsvData, Renderer, Report};
pub use resolve::{resolve_domain, resolve_project};
pub use service::{IdentityService, QuotaService};
pub use task::{run_get, run_list, run_sync, write_report, OutputFormat, Task};
pub use unit::Unit;
