use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::amount::RawAmount;

/// Identifier for a stored payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PaymentId(pub i64);

/// Identifier for a tenant record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(pub i64);

/// Identifier for a payment-type record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaymentTypeId(pub i64);

/// Identifier for a landlord record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LandlordId(pub i64);

/// Identifier for a rental property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyId(pub i64);

/// Identifier for an authenticated user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for PaymentTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A payment as the ledger stores it. Amount is whole units, date carries no
/// time component, and every payment belongs to exactly one landlord.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub date: NaiveDate,
    pub amount: i64,
    pub ref_num: String,
    pub tenant: TenantId,
    pub payment_type: PaymentTypeId,
    pub landlord: LandlordId,
    /// Populated only by the optional lease-linkage step; never serialized
    /// in API responses.
    pub property: Option<PropertyId>,
}

/// Tenant record, read-only from the ledger's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: TenantId,
    pub phone_number: String,
    pub email: String,
    pub full_name: String,
    pub landlord: LandlordId,
}

/// Categorical tag for a payment (rent, deposit, late fee, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentType {
    pub id: PaymentTypeId,
    pub label: String,
}

/// Landlord profile tied to an authenticated user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Landlord {
    pub id: LandlordId,
    pub user: UserId,
}

/// Active tenancy linking a tenant to the property they rent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lease {
    pub tenant: TenantId,
    pub property: PropertyId,
}

/// Inbound payload for creating or amending a payment. Wire names follow the
/// client contract: `full_name` carries the tenant id and `type` the payment
/// type id, both tolerated as numbers or numeric strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    #[serde(rename = "full_name", deserialize_with = "tenant_id_lenient")]
    pub tenant: TenantId,
    pub date: String,
    pub amount: RawAmount,
    pub ref_num: String,
    #[serde(rename = "type", deserialize_with = "payment_type_id_lenient")]
    pub payment_type: PaymentTypeId,
}

/// Numeric id that may arrive as a JSON number or a numeric string.
#[derive(Deserialize)]
#[serde(untagged)]
enum LenientId {
    Number(i64),
    Text(String),
}

impl LenientId {
    fn resolve<E: serde::de::Error>(self) -> Result<i64, E> {
        match self {
            LenientId::Number(value) => Ok(value),
            LenientId::Text(text) => text.trim().parse::<i64>().map_err(|_| {
                E::custom(format!("expected a numeric identifier, got '{text}'"))
            }),
        }
    }
}

fn tenant_id_lenient<'de, D>(deserializer: D) -> Result<TenantId, D::Error>
where
    D: Deserializer<'de>,
{
    LenientId::deserialize(deserializer)?.resolve().map(TenantId)
}

fn payment_type_id_lenient<'de, D>(deserializer: D) -> Result<PaymentTypeId, D::Error>
where
    D: Deserializer<'de>,
{
    LenientId::deserialize(deserializer)?
        .resolve()
        .map(PaymentTypeId)
}

/// Fully resolved payment as serialized in API responses: the tenant is
/// nested with its own landlord reference, and the payment type is expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentView {
    pub id: PaymentId,
    pub date: NaiveDate,
    pub amount: i64,
    pub ref_num: String,
    pub tenant: TenantView,
    pub payment_type: PaymentTypeView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TenantView {
    pub id: TenantId,
    pub phone_number: String,
    pub email: String,
    pub landlord: LandlordId,
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentTypeView {
    pub id: PaymentTypeId,
    pub label: String,
}

impl PaymentView {
    pub fn assemble(payment: &Payment, tenant: &Tenant, payment_type: &PaymentType) -> Self {
        Self {
            id: payment.id,
            date: payment.date,
            amount: payment.amount,
            ref_num: payment.ref_num.clone(),
            tenant: TenantView {
                id: tenant.id,
                phone_number: tenant.phone_number.clone(),
                email: tenant.email.clone(),
                landlord: tenant.landlord,
                full_name: tenant.full_name.clone(),
            },
            payment_type: PaymentTypeView {
                id: payment_type.id,
                label: payment_type.label.clone(),
            },
        }
    }
}
