use super::domain::{
    Landlord, LandlordId, Lease, Payment, PaymentId, PaymentType, PaymentTypeId, Tenant, TenantId,
    UserId,
};

/// Storage abstraction for payments so the service can be exercised without
/// a real database. Implementations provide atomic single-record operations;
/// concurrent writers to the same payment get last-write-wins semantics.
pub trait PaymentRepository: Send + Sync {
    fn insert(&self, payment: Payment) -> Result<Payment, RepositoryError>;
    fn update(&self, payment: Payment) -> Result<(), RepositoryError>;
    fn fetch(&self, id: PaymentId) -> Result<Option<Payment>, RepositoryError>;
    fn remove(&self, id: PaymentId) -> Result<(), RepositoryError>;
    fn for_landlord(&self, landlord: LandlordId) -> Result<Vec<Payment>, RepositoryError>;
}

/// Read-only lookups the payment core performs against the wider record
/// store: landlord resolution for the authenticated caller, tenant and
/// payment-type references, and the active lease used by property linkage.
pub trait LedgerDirectory: Send + Sync {
    fn landlord_for_user(&self, user: UserId) -> Result<Option<Landlord>, RepositoryError>;
    fn tenant(&self, id: TenantId) -> Result<Option<Tenant>, RepositoryError>;
    fn payment_type(&self, id: PaymentTypeId) -> Result<Option<PaymentType>, RepositoryError>;
    fn active_lease(&self, tenant: TenantId) -> Result<Option<Lease>, RepositoryError>;
}

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
