//! vrops-inventory: vROps to HostDB inventory collection
//!
//! Turns the resources of vROps infrastructure adapters into HostDB records:
//!
//! 1. [`authenticate`] acquires a session token.
//! 2. [`Collector::run`] lists the adapter catalog and keeps the configured
//!    adapter kind.
//! 3. [`ResourcePaginator`] walks every resource page of an adapter.
//! 4. [`RecordTransformer`] drops resources outside the kind allow-list,
//!    fetches properties and extracts hostname/IP per the [`extract`] rules.
//! 5. [`build_record_set`] wraps the records with the adapter's context and a
//!    [`Sink`] stores the result.

pub mod collector;
pub mod error;
pub mod extract;
pub mod pagination;
pub mod recordset;
pub mod session;
pub mod sink;
pub mod transform;
pub mod types;

pub use collector::{Collector, CollectorSettings, RunSummary, SinkFailurePolicy};
pub use error::{CollectError, SinkError};
pub use pagination::{AdapterResources, ResourcePaginator, page_count};
pub use recordset::{adapter_context, build_record_set};
pub use session::authenticate;
pub use sink::{FileSink, HostDbSink, Sink};
pub use transform::{RecordTransformer, build_record};
pub use types::{COMMITTER, Record, RecordSet, RecordSetContext};
