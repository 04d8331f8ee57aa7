use crate::infra::{sample_seed, InMemoryDirectory, InMemoryPaymentRepository};
use chrono::NaiveDate;
use clap::Args;
use crosscheck::error::AppError;
use crosscheck::ledger::payments::{
    DateWindow, LedgerPolicy, PaymentFilter, PaymentLedgerService, PaymentRepository,
    PaymentRequest, PaymentTypeId, PaymentView, RawAmount, TenantId, UserId,
};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Stamp recorded payments with the property on the tenant's active lease
    #[arg(long)]
    pub(crate) link_leases: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let payments = Arc::new(InMemoryPaymentRepository::default());
    let directory = Arc::new(InMemoryDirectory::from_seed(sample_seed()));
    let service = PaymentLedgerService::new(
        payments.clone(),
        directory,
        LedgerPolicy {
            link_property_from_lease: args.link_leases,
        },
    );

    // The sample bundle registers landlord 1 under user 10.
    let caller = UserId(10);

    println!("Cross Check payment ledger demo");
    println!(
        "Lease linkage: {}",
        if args.link_leases { "enabled" } else { "disabled" }
    );

    println!("\nRecording payments");
    let entries = [
        (7, "2023-01-01T08:15:00", RawAmount::Text("$850.00".to_string()), "SMITH-001", 1),
        (8, "2023-03-01", RawAmount::Text("1250.50".to_string()), "CHK-0042", 1),
        (7, "2023-02-01T17:40:00", RawAmount::Integer(425), "DEP-0007", 2),
    ];
    for (tenant, date, amount, ref_num, payment_type) in entries {
        let request = PaymentRequest {
            tenant: TenantId(tenant),
            date: date.to_string(),
            amount,
            ref_num: ref_num.to_string(),
            payment_type: PaymentTypeId(payment_type),
        };
        let view = service.record(caller, request)?;
        render_payment(&view);

        if args.link_leases {
            if let Ok(Some(payment)) = payments.fetch(view.id) {
                match payment.property {
                    Some(property) => println!("    linked to property {}", property.0),
                    None => println!("    no active lease on file"),
                }
            }
        }
    }

    println!("\nAll payments, most recent first");
    for view in service.search(caller, &PaymentFilter::default())? {
        render_payment(&view);
    }

    println!("\nKeyword search: 'smith'");
    let keyword_filter = PaymentFilter {
        keyword: Some("smith".to_string()),
        window: None,
    };
    for view in service.search(caller, &keyword_filter)? {
        render_payment(&view);
    }

    println!("\nDate window: 2023-01-01 through 2023-01-31");
    let window_filter = PaymentFilter {
        keyword: None,
        window: Some(DateWindow {
            start: NaiveDate::from_ymd_opt(2023, 1, 1).expect("valid date"),
            end: NaiveDate::from_ymd_opt(2023, 1, 31).expect("valid date"),
        }),
    };
    for view in service.search(caller, &window_filter)? {
        render_payment(&view);
    }

    Ok(())
}

fn render_payment(view: &PaymentView) {
    println!(
        "- #{} | {} | {} units | {} | {} ({})",
        view.id.0, view.date, view.amount, view.ref_num, view.tenant.full_name,
        view.payment_type.label
    );
}
