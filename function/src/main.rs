// function/src/main.rs

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use products_api::{handle_event, AppConfig, FunctionResponse, PgConnector};
use serde_json::Value;
use tracing::Instrument;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

async fn function_handler(
  connector: &PgConnector,
  event: LambdaEvent<Value>,
) -> Result<FunctionResponse, Error> {
  // Taken as raw JSON so a malformed envelope still gets a JSON error response.
  let (payload, context) = event.into_parts();
  let span = tracing::info_span!("invocation", request_id = %context.request_id);
  Ok(handle_event(connector, payload).instrument(span).await)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
  // RUST_LOG overrides the default level. No ANSI colors: output goes to the platform log collector.
  tracing_subscriber::fmt()
    .json()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_span_events(FmtSpan::CLOSE) // Log when spans close, showing duration
    .with_ansi(false)
    .init();

  tracing::info!("Starting products function...");

  let app_config = AppConfig::from_env().map_err(|e| {
    tracing::error!(error = %e, "Failed to load application configuration.");
    e
  })?;

  // Holds only the connection string; every invocation opens its own connection.
  let connector = PgConnector::from_config(&app_config);

  run(service_fn(|event| function_handler(&connector, event))).await
}
