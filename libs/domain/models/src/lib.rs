// [libs/domain/models/src/lib.rs]
//! Shared domain contracts for the sync core: tenants, sync jobs and
//! reports, and the closed row schemas for the credit and payment streams.
//!
//! Every other crate in the workspace depends on this one; it depends on
//! nothing internal, so it compiles first and changes here ripple outward.

pub mod credit;
pub mod enums;
pub mod job;
pub mod payment;
pub mod tenant;

pub use credit::{CreditRow, CREDIT_COLUMNS, CREDIT_FIELD_SCHEMA};
pub use enums::{
    CustomerType, EnumCode, FieldType, FileRole, InsuranceIncluded, InstallmentStatus,
    LoanCategory, LoanProductType, LoanStatusCode, LoanStatusFlag, SyncJobStatus,
};
pub use job::{SyncJob, SyncReport};
pub use payment::{PaymentRow, PAYMENT_COLUMNS, PAYMENT_FIELD_SCHEMA};
pub use tenant::Tenant;
