use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use crosscheck::ledger::payments::{
    Landlord, LandlordId, Lease, LedgerDirectory, Payment, PaymentId, PaymentRepository,
    PaymentType, PaymentTypeId, PropertyId, RepositoryError, Tenant, TenantId, UserId,
};
use crosscheck::ledger::seed::DirectorySeed;
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryPaymentRepository {
    records: Arc<Mutex<HashMap<PaymentId, Payment>>>,
}

impl PaymentRepository for InMemoryPaymentRepository {
    fn insert(&self, payment: Payment) -> Result<Payment, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&payment.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(payment.id, payment.clone());
        Ok(payment)
    }

    fn update(&self, payment: Payment) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&payment.id) {
            guard.insert(payment.id, payment);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: PaymentId) -> Result<Option<Payment>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn remove(&self, id: PaymentId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.remove(&id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn for_landlord(&self, landlord: LandlordId) -> Result<Vec<Payment>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|payment| payment.landlord == landlord)
            .cloned()
            .collect())
    }
}

/// Directory hydrated once from a seed bundle; read-only afterwards.
#[derive(Default, Clone)]
pub(crate) struct InMemoryDirectory {
    landlords: HashMap<UserId, Landlord>,
    tenants: HashMap<TenantId, Tenant>,
    payment_types: HashMap<PaymentTypeId, PaymentType>,
    leases: HashMap<TenantId, Lease>,
}

impl InMemoryDirectory {
    pub(crate) fn from_seed(seed: DirectorySeed) -> Self {
        let mut directory = Self::default();
        for landlord in seed.landlords {
            directory.landlords.insert(landlord.user, landlord);
        }
        for tenant in seed.tenants {
            directory.tenants.insert(tenant.id, tenant);
        }
        for payment_type in seed.payment_types {
            directory
                .payment_types
                .insert(payment_type.id, payment_type);
        }
        for lease in seed.leases {
            directory.leases.insert(lease.tenant, lease);
        }
        directory
    }
}

impl LedgerDirectory for InMemoryDirectory {
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

/// Built-in bundle backing the `demo` subcommand: one landlord, two tenants,
/// two payment types, one active lease.
pub(crate) fn sample_seed() -> DirectorySeed {
    DirectorySeed {
        landlords: vec![Landlord {
            id: LandlordId(1),
            user: UserId(10),
        }],
        tenants: vec![
            Tenant {
                id: TenantId(7),
                phone_number: "515-555-0142".to_string(),
                email: "john.smith@example.com".to_string(),
                full_name: "John Smith".to_string(),
                landlord: LandlordId(1),
            },
            Tenant {
                id: TenantId(8),
                phone_number: "515-555-0143".to_string(),
                email: "jane.doe@example.com".to_string(),
                full_name: "Jane Doe".to_string(),
                landlord: LandlordId(1),
            },
        ],
        payment_types: vec![
            PaymentType {
                id: PaymentTypeId(1),
                label: "Rent".to_string(),
            },
            PaymentType {
                id: PaymentTypeId(2),
                label: "Deposit".to_string(),
            },
        ],
        leases: vec![Lease {
            tenant: TenantId(7),
            property: PropertyId(301),
        }],
    }
}
