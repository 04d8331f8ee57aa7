use std::sync::Arc;

use crate::ledger::payments::amount::RawAmount;
use crate::ledger::payments::domain::{
    LandlordId, PaymentId, PaymentTypeId, PropertyId, TenantId, UserId,
};
use crate::ledger::payments::query::{DateWindow, PaymentFilter};
use crate::ledger::payments::repository::RepositoryError;
use crate::ledger::payments::service::{LedgerError, LedgerPolicy, PaymentLedgerService};

use super::common::*;

#[test]
fn record_normalizes_and_persists() {
    let (service, payments) = build_service();

    let view = service
        .record(
            OWNER,
            request(
                7,
                "2023-05-01T09:00:00",
                RawAmount::Text("$1250.75".to_string()),
                "CHK-1204",
            ),
        )
        .expect("payment records");

    assert_eq!(view.amount, 1250);
    assert_eq!(view.date.to_string(), "2023-05-01");
    assert_eq!(view.ref_num, "CHK-1204");
    assert_eq!(view.tenant.full_name, "John Smith");
    assert_eq!(view.tenant.landlord, LandlordId(1));
    assert_eq!(view.payment_type.label, "Rent");

    let stored = payments.stored(view.id).expect("payment persisted");
    assert_eq!(stored.landlord, LandlordId(1));
    assert_eq!(stored.amount, 1250);
    assert_eq!(stored.property, None);
}

#[test]
fn record_rejects_unknown_tenant() {
    let (service, _) = build_service();

    match service.record(
        OWNER,
        request(999, "2023-05-01", RawAmount::Integer(900), "CHK-1"),
    ) {
        Err(LedgerError::TenantNotFound(TenantId(999))) => {}
        other => panic!("expected missing tenant error, got {other:?}"),
    }
}

#[test]
fn record_rejects_unknown_payment_type() {
    let (service, _) = build_service();

    let mut bad = request(7, "2023-05-01", RawAmount::Integer(900), "CHK-1");
    bad.payment_type = PaymentTypeId(42);

    match service.record(OWNER, bad) {
        Err(LedgerError::PaymentTypeNotFound(PaymentTypeId(42))) => {}
        other => panic!("expected missing payment type error, got {other:?}"),
    }
}

#[test]
fn record_rejects_caller_without_landlord_profile() {
    let (service, _) = build_service();

    match service.record(
        STRANGER,
        request(7, "2023-05-01", RawAmount::Integer(900), "CHK-1"),
    ) {
        Err(LedgerError::LandlordNotFound(UserId(99))) => {}
        other => panic!("expected missing landlord error, got {other:?}"),
    }
}

#[test]
fn record_rejects_unparseable_amount_and_date() {
    let (service, _) = build_service();

    match service.record(
        OWNER,
        request(7, "2023-05-01", RawAmount::Text("rent".to_string()), "CHK-1"),
    ) {
        Err(LedgerError::InvalidAmount(_)) => {}
        other => panic!("expected amount rejection, got {other:?}"),
    }

    match service.record(
        OWNER,
        request(7, "yesterday", RawAmount::Integer(900), "CHK-1"),
    ) {
        Err(LedgerError::InvalidDate(_)) => {}
        other => panic!("expected date rejection, got {other:?}"),
    }
}

#[test]
fn lease_linkage_stamps_property_only_when_enabled() {
    let policy = LedgerPolicy {
        link_property_from_lease: true,
    };
    let (service, payments) = build_service_with_policy(policy);

    // Tenant 7 rents property 301 under the standard directory's lease.
    let linked = service
        .record(
            OWNER,
            request(7, "2023-05-01", RawAmount::Integer(900), "CHK-1"),
        )
        .expect("payment records");
    assert_eq!(
        payments.stored(linked.id).expect("persisted").property,
        Some(PropertyId(301))
    );

    // Tenant 8 has no lease on file; linkage stays silent.
    let unlinked = service
        .record(
            OWNER,
            request(8, "2023-05-02", RawAmount::Integer(900), "CHK-2"),
        )
        .expect("payment records");
    assert_eq!(payments.stored(unlinked.id).expect("persisted").property, None);
}

#[test]
fn amend_overwrites_fields_in_place() {
    let (service, payments) = build_service();

    let view = service
        .record(
            OWNER,
            request(7, "2023-05-01", RawAmount::Integer(900), "CHK-1"),
        )
        .expect("payment records");

    service
        .amend(
            OWNER,
            view.id,
            request(
                8,
                "2023-06-15T12:00:00",
                RawAmount::Text("$725.99".to_string()),
                "CHK-2",
            ),
        )
        .expect("payment amends");

    let stored = payments.stored(view.id).expect("payment persisted");
    assert_eq!(stored.id, view.id);
    assert_eq!(stored.tenant, TenantId(8));
    assert_eq!(stored.date.to_string(), "2023-06-15");
    assert_eq!(stored.amount, 725);
    assert_eq!(stored.ref_num, "CHK-2");
}

#[test]
fn amend_missing_payment_is_not_found() {
    let (service, _) = build_service();

    match service.amend(
        OWNER,
        PaymentId(999_999),
        request(7, "2023-05-01", RawAmount::Integer(900), "CHK-1"),
    ) {
        Err(LedgerError::PaymentNotFound(PaymentId(999_999))) => {}
        other => panic!("expected missing payment error, got {other:?}"),
    }
}

#[test]
fn amend_keeps_stored_property_when_linkage_disabled() {
    let linking = LedgerPolicy {
        link_property_from_lease: true,
    };
    let (service, payments) = build_service_with_policy(linking);

    let view = service
        .record(
            OWNER,
            request(7, "2023-05-01", RawAmount::Integer(900), "CHK-1"),
        )
        .expect("payment records");
    assert!(payments.stored(view.id).expect("persisted").property.is_some());

    let plain = PaymentLedgerService::new(
        payments.clone(),
        Arc::new(MemoryDirectory::standard()),
        LedgerPolicy::default(),
    );
    plain
        .amend(
            OWNER,
            view.id,
            request(7, "2023-05-03", RawAmount::Integer(950), "CHK-1R"),
        )
        .expect("payment amends");

    let stored = payments.stored(view.id).expect("payment persisted");
    assert_eq!(stored.property, Some(PropertyId(301)));
    assert_eq!(stored.amount, 950);
}

#[test]
fn retrieve_resolves_nested_records() {
    let (service, _) = build_service();

    let view = service
        .record(
            OWNER,
            request(8, "2023-05-01", RawAmount::Integer(640), "CHK-9"),
        )
        .expect("payment records");

    let fetched = service.retrieve(view.id).expect("payment retrieves");
    assert_eq!(fetched, view);
}

#[test]
fn remove_deletes_and_reports_missing_ids() {
    let (service, payments) = build_service();

    let view = service
        .record(
            OWNER,
            request(7, "2023-05-01", RawAmount::Integer(900), "CHK-1"),
        )
        .expect("payment records");

    service.remove(view.id).expect("payment removes");
    assert!(payments.stored(view.id).is_none());

    match service.remove(view.id) {
        Err(LedgerError::PaymentNotFound(id)) => assert_eq!(id, view.id),
        other => panic!("expected missing payment error, got {other:?}"),
    }
}

#[test]
fn search_never_crosses_landlord_boundaries() {
    let (service, _) = build_service();

    service
        .record(
            OWNER,
            request(7, "2023-01-01", RawAmount::Integer(900), "OWNER-1"),
        )
        .expect("payment records");
    service
        .record(
            NEIGHBOR,
            request(9, "2023-01-02", RawAmount::Integer(700), "NEIGHBOR-1"),
        )
        .expect("payment records");

    let owned = service
        .search(OWNER, &PaymentFilter::default())
        .expect("search succeeds");
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].ref_num, "OWNER-1");

    let neighbors = service
        .search(NEIGHBOR, &PaymentFilter::default())
        .expect("search succeeds");
    assert_eq!(neighbors.len(), 1);
    assert_eq!(neighbors[0].ref_num, "NEIGHBOR-1");
}

#[test]
fn search_composes_keyword_and_window() {
    let (service, _) = build_service();

    for (tenant, date, ref_num) in [
        (7, "2023-01-05", "SMITH-001"),
        (8, "2023-01-06", "CHK-0042"),
        (8, "2023-04-06", "SMITH-002"),
    ] {
        service
            .record(OWNER, request(tenant, date, RawAmount::Integer(900), ref_num))
            .expect("payment records");
    }

    let filter = PaymentFilter {
        keyword: Some("smith".to_string()),
        window: Some(DateWindow {
            start: chrono::NaiveDate::from_ymd_opt(2023, 1, 1).expect("valid"),
            end: chrono::NaiveDate::from_ymd_opt(2023, 1, 31).expect("valid"),
        }),
    };

    let matched = service.search(OWNER, &filter).expect("search succeeds");
    // SMITH-002 falls outside the window; CHK-0042 belongs to Jane Doe and
    // misses the keyword; SMITH-001 matches by ref_num and by tenant name.
    let refs: Vec<_> = matched.iter().map(|view| view.ref_num.as_str()).collect();
    assert_eq!(refs, ["SMITH-001"]);
}

#[test]
fn unavailable_store_surfaces_as_repository_error() {
    let service = PaymentLedgerService::new(
        Arc::new(UnavailablePayments),
        Arc::new(MemoryDirectory::standard()),
        LedgerPolicy::default(),
    );

    match service.record(
        OWNER,
        request(7, "2023-05-01", RawAmount::Integer(900), "CHK-1"),
    ) {
        Err(LedgerError::Repository(RepositoryError::Unavailable(_))) => {}
        other => panic!("expected unavailable store error, got {other:?}"),
    }
}
