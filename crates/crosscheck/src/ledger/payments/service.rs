use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use super::amount::{normalize_amount, AmountError};
use super::dates::{extract_date, DateError};
use super::domain::{
    Landlord, Payment, PaymentId, PaymentRequest, PaymentType, PaymentTypeId, PaymentView,
    PropertyId, Tenant, TenantId, UserId,
};
use super::query::{apply_filter, PaymentFilter};
use super::repository::{LedgerDirectory, PaymentRepository, RepositoryError};

/// Toggles for ledger behavior the product has not fully committed to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerPolicy {
    /// When enabled, a recorded payment is stamped with the property on the
    /// tenant's active lease; a tenant without a lease simply leaves the
    /// association empty. Disabled unless explicitly switched on.
    pub link_property_from_lease: bool,
}

/// Service composing the payment repository and the record directory.
/// The authenticated caller is always an explicit argument; the service
/// resolves it to a landlord through the directory rather than reading any
/// ambient request context.
pub struct PaymentLedgerService<R, D> {
    payments: Arc<R>,
    directory: Arc<D>,
    policy: LedgerPolicy,
}

static PAYMENT_SEQUENCE: AtomicI64 = AtomicI64::new(1);

fn next_payment_id() -> PaymentId {
    PaymentId(PAYMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed))
}

/// Request fields after normalization and directory resolution.
struct ResolvedEntry {
    tenant: Tenant,
    payment_type: PaymentType,
    date: chrono::NaiveDate,
    amount: i64,
    ref_num: String,
    leased_property: Option<PropertyId>,
}

impl<R, D> PaymentLedgerService<R, D>
where
    R: PaymentRepository + 'static,
    D: LedgerDirectory + 'static,
{
    pub fn new(payments: Arc<R>, directory: Arc<D>, policy: LedgerPolicy) -> Self {
        Self {
            payments,
            directory,
            policy,
        }
    }

    /// Record a new payment for the caller's landlord, returning the fully
    /// resolved view. One durable write per call.
    pub fn record(
        &self,
        caller: UserId,
        request: PaymentRequest,
    ) -> Result<PaymentView, LedgerError> {
        let landlord = self.require_landlord(caller)?;
        let entry = self.resolve_entry(request)?;

        let payment = Payment {
            id: next_payment_id(),
            date: entry.date,
            amount: entry.amount,
            ref_num: entry.ref_num,
            tenant: entry.tenant.id,
            payment_type: entry.payment_type.id,
            landlord: landlord.id,
            property: entry.leased_property,
        };

        let stored = self.payments.insert(payment)?;
        Ok(PaymentView::assemble(&stored, &entry.tenant, &entry.payment_type))
    }

    /// Re-run the full resolution pipeline against an existing payment and
    /// persist it in place.
    pub fn amend(
        &self,
        caller: UserId,
        id: PaymentId,
        request: PaymentRequest,
    ) -> Result<(), LedgerError> {
        let landlord = self.require_landlord(caller)?;
        let existing = self
            .payments
            .fetch(id)?
            .ok_or(LedgerError::PaymentNotFound(id))?;
        let entry = self.resolve_entry(request)?;

        // With linkage disabled the previously stored association is kept
        // untouched rather than cleared.
        let property = if self.policy.link_property_from_lease {
            entry.leased_property
        } else {
            existing.property
        };

        self.payments.update(Payment {
            id: existing.id,
            date: entry.date,
            amount: entry.amount,
            ref_num: entry.ref_num,
            tenant: entry.tenant.id,
            payment_type: entry.payment_type.id,
            landlord: landlord.id,
            property,
        })?;

        Ok(())
    }

    /// Fetch a single payment by id, resolved into its serialized view.
    pub fn retrieve(&self, id: PaymentId) -> Result<PaymentView, LedgerError> {
        let payment = self
            .payments
            .fetch(id)?
            .ok_or(LedgerError::PaymentNotFound(id))?;
        self.view_of(payment)
    }

    /// Delete a payment by id.
    pub fn remove(&self, id: PaymentId) -> Result<(), LedgerError> {
        match self.payments.remove(id) {
            Err(RepositoryError::NotFound) => Err(LedgerError::PaymentNotFound(id)),
            other => Ok(other?),
        }
    }

    /// List the caller's landlord's payments, filtered and sorted most
    /// recent first. Payments belonging to other landlords are never
    /// consulted.
    pub fn search(
        &self,
        caller: UserId,
        filter: &PaymentFilter,
    ) -> Result<Vec<PaymentView>, LedgerError> {
        let landlord = self.require_landlord(caller)?;

        let mut views = Vec::new();
        for payment in self.payments.for_landlord(landlord.id)? {
            views.push(self.view_of(payment)?);
        }

        Ok(apply_filter(views, filter))
    }

    fn require_landlord(&self, caller: UserId) -> Result<Landlord, LedgerError> {
        self.directory
            .landlord_for_user(caller)?
            .ok_or(LedgerError::LandlordNotFound(caller))
    }

    fn view_of(&self, payment: Payment) -> Result<PaymentView, LedgerError> {
        let tenant = self
            .directory
            .tenant(payment.tenant)?
            .ok_or(LedgerError::TenantNotFound(payment.tenant))?;
        let payment_type = self
            .directory
            .payment_type(payment.payment_type)?
            .ok_or(LedgerError::PaymentTypeNotFound(payment.payment_type))?;

        Ok(PaymentView::assemble(&payment, &tenant, &payment_type))
    }

    fn resolve_entry(&self, request: PaymentRequest) -> Result<ResolvedEntry, LedgerError> {
        let tenant = self
            .directory
            .tenant(request.tenant)?
            .ok_or(LedgerError::TenantNotFound(request.tenant))?;
        let payment_type = self
            .directory
            .payment_type(request.payment_type)?
            .ok_or(LedgerError::PaymentTypeNotFound(request.payment_type))?;

        let date = extract_date(&request.date)?;
        let amount = normalize_amount(&request.amount)?;

        let leased_property = if self.policy.link_property_from_lease {
            self.directory
                .active_lease(tenant.id)?
                .map(|lease| lease.property)
        } else {
            None
        };

        Ok(ResolvedEntry {
            tenant,
            payment_type,
            date,
            amount,
            ref_num: request.ref_num,
            leased_property,
        })
    }
}

/// Error raised by the payment ledger service.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("no landlord profile exists for user {0}")]
    LandlordNotFound(UserId),
    #[error("tenant {0} does not exist")]
    TenantNotFound(TenantId),
    #[error("payment type {0} does not exist")]
    PaymentTypeNotFound(PaymentTypeId),
    #[error("payment {0} does not exist")]
    PaymentNotFound(PaymentId),
    #[error(transparent)]
    InvalidAmount(#[from] AmountError),
    #[error(transparent)]
    InvalidDate(#[from] DateError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
