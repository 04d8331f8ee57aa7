use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use axum::Router;
use serde_json::Value;

use crate::ledger::payments::amount::RawAmount;
use crate::ledger::payments::domain::{
    Landlord, LandlordId, Lease, Payment, PaymentId, PaymentRequest, PaymentType, PaymentTypeId,
    PropertyId, Tenant, TenantId, UserId,
};
use crate::ledger::payments::repository::{LedgerDirectory, PaymentRepository, RepositoryError};
use crate::ledger::payments::router::payment_router;
use crate::ledger::payments::service::{LedgerPolicy, PaymentLedgerService};

/// User id of the landlord owning the standard directory's tenants.
pub(super) const OWNER: UserId = UserId(10);
/// User id of a second landlord with tenants of their own.
pub(super) const NEIGHBOR: UserId = UserId(20);
/// User id with no landlord profile at all.
pub(super) const STRANGER: UserId = UserId(99);

#[derive(Default, Clone)]
pub(super) struct MemoryPayments {
    records: Arc<Mutex<HashMap<PaymentId, Payment>>>,
}

impl MemoryPayments {
    pub(super) fn stored(&self, id: PaymentId) -> Option<Payment> {
        self.records.lock().expect("lock").get(&id).cloned()
    }
}

impl PaymentRepository for MemoryPayments {
    fn insert(&self, payment: Payment) -> Result<Payment, RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
        if guard.contains_key(&payment.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(payment.id, payment.clone());
        Ok(payment)
    }

    fn update(&self, payment: Payment) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
        if guard.contains_key(&payment.id) {
            guard.insert(payment.id, payment);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: PaymentId) -> Result<Option<Payment>, RepositoryError> {
        let guard = self.records.lock().expect("lock");
        Ok(guard.get(&id).cloned())
    }

    fn remove(&self, id: PaymentId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
        guard.remove(&id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn for_landlord(&self, landlord: LandlordId) -> Result<Vec<Payment>, RepositoryError> {
        let guard = self.records.lock().expect("lock");
        Ok(guard
            .values()
            .filter(|payment| payment.landlord == landlord)
            .cloned()
            .collect())
    }
}

/// Payment store that fails every call, for 500-class coverage.
pub(super) struct UnavailablePayments;

impl PaymentRepository for UnavailablePayments {
    fn insert(&self, _payment: Payment) -> Result<Payment, RepositoryError> {
        Err(RepositoryError::Unavailable("payments store offline".to_string()))
    }

    fn update(&self, _payment: Payment) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("payments store offline".to_string()))
    }

    fn fetch(&self, _id: PaymentId) -> Result<Option<Payment>, RepositoryError> {
        Err(RepositoryError::Unavailable("payments store offline".to_string()))
    }

    fn remove(&self, _id: PaymentId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("payments store offline".to_string()))
    }

    fn for_landlord(&self, _landlord: LandlordId) -> Result<Vec<Payment>, RepositoryError> {
        Err(RepositoryError::Unavailable("payments store offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryDirectory {
    landlords: HashMap<UserId, Landlord>,
    tenants: HashMap<TenantId, Tenant>,
    payment_types: HashMap<PaymentTypeId, PaymentType>,
    leases: HashMap<TenantId, Lease>,
}

impl MemoryDirectory {
    /// Two landlords, three tenants, two payment types, one active lease
    /// (tenant 7 renting property 301).
    pub(super) fn standard() -> Self {
        let mut directory = Self::default();

        directory.landlords.insert(
            OWNER,
            Landlord {
                id: LandlordId(1),
                user: OWNER,
            },
        );
        directory.landlords.insert(
            NEIGHBOR,
            Landlord {
                id: LandlordId(2),
                user: NEIGHBOR,
            },
        );

        directory.tenants.insert(
            TenantId(7),
            Tenant {
                id: TenantId(7),
                phone_number: "515-555-0142".to_string(),
                email: "john.smith@example.com".to_string(),
                full_name: "John Smith".to_string(),
                landlord: LandlordId(1),
            },
        );
        directory.tenants.insert(
            TenantId(8),
            Tenant {
                id: TenantId(8),
                phone_number: "515-555-0143".to_string(),
                email: "jane.doe@example.com".to_string(),
                full_name: "Jane Doe".to_string(),
                landlord: LandlordId(1),
            },
        );
        directory.tenants.insert(
            TenantId(9),
            Tenant {
                id: TenantId(9),
                phone_number: "515-555-0144".to_string(),
                email: "alex.mason@example.com".to_string(),
                full_name: "Alex Mason".to_string(),
                landlord: LandlordId(2),
            },
        );

        directory.payment_types.insert(
            PaymentTypeId(1),
            PaymentType {
                id: PaymentTypeId(1),
                label: "Rent".to_string(),
            },
        );
        directory.payment_types.insert(
            PaymentTypeId(2),
            PaymentType {
                id: PaymentTypeId(2),
                label: "Deposit".to_string(),
            },
        );

        directory.leases.insert(
            TenantId(7),
            Lease {
                tenant: TenantId(7),
                property: PropertyId(301),
            },
        );

        directory
    }
}

impl LedgerDirectory for MemoryDirectory {
    fn landlord_for_user(&self, user: UserId) -> Result<Option<Landlord>, RepositoryError> {
        Ok(self.landlords.get(&user).copied())
    }

    fn tenant(&self, id: TenantId) -> Result<Option<Tenant>, RepositoryError> {
        Ok(self.tenants.get(&id).cloned())
    }

    fn payment_type(&self, id: PaymentTypeId) -> Result<Option<PaymentType>, RepositoryError> {
        Ok(self.payment_types.get(&id).cloned())
    }

    fn active_lease(&self, tenant: TenantId) -> Result<Option<Lease>, RepositoryError> {
        Ok(self.leases.get(&tenant).copied())
    }
}

pub(super) fn request(tenant: i64, date: &str, amount: RawAmount, ref_num: &str) -> PaymentRequest {
    PaymentRequest {
        tenant: TenantId(tenant),
        date: date.to_string(),
        amount,
        ref_num: ref_num.to_string(),
        payment_type: PaymentTypeId(1),
    }
}

pub(super) fn build_service() -> (
    PaymentLedgerService<MemoryPayments, MemoryDirectory>,
    Arc<MemoryPayments>,
) {
    build_service_with_policy(LedgerPolicy::default())
}

pub(super) fn build_service_with_policy(
    policy: LedgerPolicy,
) -> (
    PaymentLedgerService<MemoryPayments, MemoryDirectory>,
    Arc<MemoryPayments>,
) {
    let payments = Arc::new(MemoryPayments::default());
    let directory = Arc::new(MemoryDirectory::standard());
    let service = PaymentLedgerService::new(payments.clone(), directory, policy);
    (service, payments)
}

pub(super) fn router_with_service(
    service: PaymentLedgerService<MemoryPayments, MemoryDirectory>,
) -> Router {
    payment_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body collects");
    serde_json::from_slice(&bytes).expect("json body")
}
