//! Payment intake, amendment, and landlord-scoped querying.
//!
//! The flow mirrors the HTTP surface: a raw payload is normalized
//! ([`amount`], [`dates`]), resolved against the record directory
//! ([`repository::LedgerDirectory`]), persisted through
//! [`repository::PaymentRepository`], and projected back out as
//! [`domain::PaymentView`]. Listing applies [`query::PaymentFilter`] in a
//! single pass over the caller's own payments.

pub mod amount;
pub mod dates;
pub mod domain;
pub mod query;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use amount::{normalize_amount, AmountError, RawAmount};
pub use dates::{extract_date, DateError};
pub use domain::{
    Landlord, LandlordId, Lease, Payment, PaymentId, PaymentRequest, PaymentType, PaymentTypeId,
    PaymentTypeView, PaymentView, PropertyId, Tenant, TenantId, TenantView, UserId,
};
pub use query::{DateWindow, PaymentFilter};
pub use repository::{LedgerDirectory, PaymentRepository, RepositoryError};
pub use router::{payment_router, CALLER_HEADER};
pub use service::{LedgerError, LedgerPolicy, PaymentLedgerService};
