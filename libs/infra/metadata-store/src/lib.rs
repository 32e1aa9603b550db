// [libs/infra/metadata-store/src/lib.rs]
//! libsql-backed store for tenants, sync jobs and sync reports. Separate
//! logical database from the ClickHouse warehouse in `sync-infra-warehouse`:
//! this one holds small, relational, frequently-updated control-plane state.

pub mod client;
pub mod errors;
pub mod job_repository;
pub mod report_repository;
pub mod schema;
pub mod tenant_repository;

pub use client::MetadataClient;
pub use errors::MetadataError;
pub use job_repository::JobRepository;
pub use report_repository::ReportRepository;
pub use tenant_repository::TenantRepository;
