use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryDirectory, InMemoryPaymentRepository};
use crate::routes::with_payment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use crosscheck::config::AppConfig;
use crosscheck::error::AppError;
use crosscheck::ledger::payments::{LedgerPolicy, PaymentLedgerService};
use crosscheck::ledger::seed::DirectorySeed;
use crosscheck::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(seed_dir) = args.seed_dir.take() {
        config.ledger.seed_dir = Some(seed_dir);
    }
    if args.link_leases {
        config.ledger.link_property_from_lease = true;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let seed = match &config.ledger.seed_dir {
        Some(dir) => DirectorySeed::from_dir(dir)?,
        None => DirectorySeed::default(),
    };
    info!(
        landlords = seed.landlords.len(),
        tenants = seed.tenants.len(),
        payment_types = seed.payment_types.len(),
        leases = seed.leases.len(),
        "directory hydrated"
    );

    let payments = Arc::new(InMemoryPaymentRepository::default());
    let directory = Arc::new(InMemoryDirectory::from_seed(seed));
    let policy = LedgerPolicy {
        link_property_from_lease: config.ledger.link_property_from_lease,
    };
    let service = Arc::new(PaymentLedgerService::new(payments, directory, policy));

    let app = with_payment_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "cross check record api ready");

    axum::serve(listener, app).await?;
    Ok(())
}
