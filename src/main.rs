use rusty_circulation::{
    adapters::postgres::{PostgresBookStore, PostgresIssueStore, PostgresMemberStore},
    api::{handlers::AppState, router::create_router},
    application::circulation::ServiceDependencies,
    domain::CirculationPolicy,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Read an env var and parse it, falling back to the policy default
fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rusty_circulation=debug,tower_http=debug,axum=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection URL
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "postgres://localhost/circulation".into());

    tracing::info!("Database URL: {}", database_url);

    // Initialize database connection pool
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    // Initialize adapters
    let member_store = Arc::new(PostgresMemberStore::new(pool.clone()));
    let book_store = Arc::new(PostgresBookStore::new(pool.clone()));
    let issue_store = Arc::new(PostgresIssueStore::new(pool.clone()));

    // Create service dependencies
    let service_deps = ServiceDependencies {
        member_store,
        book_store,
        issue_store,
    };

    // Circulation policy, overridable from the environment
    let defaults = CirculationPolicy::default();
    let policy = CirculationPolicy {
        loan_period_days: env_or("LOAN_PERIOD_DAYS", defaults.loan_period_days),
        fine_per_day: env_or("FINE_PER_DAY", defaults.fine_per_day),
        prompt_on_expired_renewal: env_or(
            "PROMPT_ON_EXPIRED_RENEWAL",
            defaults.prompt_on_expired_renewal,
        ),
    };

    tracing::info!(
        loan_period_days = policy.loan_period_days,
        fine_per_day = policy.fine_per_day,
        prompt_on_expired_renewal = policy.prompt_on_expired_renewal,
        "Circulation policy loaded"
    );

    // Create application state
    let app_state = Arc::new(AppState {
        service_deps,
        policy,
    });

    // Create router
    let app = create_router(app_state);

    // Server configuration
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".into());
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
