use anyhow::Context;
use kidcare_billing::{
    api::{self, AppState},
    auth::{GateState, HeaderIdentityResolver, RouteGate},
    config::Config,
    payments::{providers::RazorpayConfig, providers::RazorpayProvider, InMemorySubscriptionStore},
    telemetry,
};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    telemetry::init_tracing();

    let config = Config::from_env()?;

    tracing::info!("Starting KidCare billing service");
    tracing::info!("Environment: {}", config.server.environment);
    if !config.payments.is_configured() {
        tracing::warn!("Razorpay credentials are incomplete; payment requests will fail until configured");
    }
    if config.payments.webhook_secret.is_none() {
        tracing::warn!("RAZORPAY_WEBHOOK_SECRET not set; webhooks will be rejected");
    }

    let provider = RazorpayProvider::new(RazorpayConfig::from(&config.payments))
        .context("Failed to build Razorpay client")?;
    let state = AppState::new(
        &config,
        Arc::new(provider),
        Arc::new(InMemorySubscriptionStore::new()),
    );

    let gate = GateState {
        gate: Arc::new(
            RouteGate::new(&config.auth.public_routes).context("Invalid AUTH_PUBLIC_ROUTES pattern")?,
        ),
        resolver: Arc::new(HeaderIdentityResolver),
        sign_in_url: config.auth.sign_in_url.clone(),
    };

    let app = api::router(state, gate);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("HOST and PORT must form a valid socket address")?;
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
