// core/src/handler.rs

//! The request dispatcher: one invocation, at most one store connection, one statement.

use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::error::{AppError, Result};
use crate::event::{FunctionRequest, FunctionResponse, HttpMethod};
use crate::store::{ProductStore, StoreConnector};

const PRODUCT_DELETED: &str = "Product deleted successfully";

/// Operations that need the store.
#[derive(Debug, Clone, Copy)]
enum StoreOperation {
  Read,
  Create,
  Update,
  Delete,
}

/// Serves one raw trigger event.
///
/// An envelope whose fields have the wrong JSON type is answered like any other
/// failure, with a 500 carrying the deserialization message.
pub async fn handle_event<C: StoreConnector>(connector: &C, event: Value) -> FunctionResponse {
  match FunctionRequest::from_event(event) {
    Ok(request) => handle(connector, request).await,
    Err(e) => e.into_response(),
  }
}

/// Serves one invocation. Never fails: every error is turned into a response.
#[instrument(name = "handler::handle", skip(connector, request), fields(method = ?request.method()))]
pub async fn handle<C: StoreConnector>(connector: &C, request: FunctionRequest) -> FunctionResponse {
  let operation = match request.method() {
    HttpMethod::Options => {
      info!("Answering CORS preflight.");
      return FunctionResponse::preflight();
    }
    HttpMethod::Unsupported(method) => return AppError::MethodNotAllowed { method }.into_response(),
    HttpMethod::Get => StoreOperation::Read,
    HttpMethod::Create => StoreOperation::Create,
    HttpMethod::Update => StoreOperation::Update,
    HttpMethod::Delete => StoreOperation::Delete,
  };

  match run_with_store(connector, operation, &request).await {
    Ok(response) => {
      info!(status = response.status_code, "Request handled.");
      response
    }
    Err(e) => e.into_response(),
  }
}

/// Opens a connection, runs the operation and closes the connection on every path.
async fn run_with_store<C: StoreConnector>(
  connector: &C,
  operation: StoreOperation,
  request: &FunctionRequest,
) -> Result<FunctionResponse> {
  let mut store = connector.connect().await?;

  let outcome = match operation {
    StoreOperation::Read => read_products(&mut store, request).await,
    StoreOperation::Create => create_product(&mut store, request).await,
    StoreOperation::Update => update_product(&mut store, request).await,
    StoreOperation::Delete => delete_product(&mut store, request).await,
  };

  // A failed close is not the caller's problem once the statement has run.
  if let Err(e) = store.close().await {
    warn!(error = %e, "Failed to close store connection.");
  }

  outcome
}

async fn read_products<S: ProductStore>(store: &mut S, request: &FunctionRequest) -> Result<FunctionResponse> {
  match request.product_id()? {
    Some(id) => {
      let product = store
        .find_product(id)
        .await?
        .ok_or_else(AppError::product_not_found)?;
      FunctionResponse::json(200, &product)
    }
    None => {
      let products = store.list_products().await?;
      FunctionResponse::json(200, &products)
    }
  }
}

async fn create_product<S: ProductStore>(store: &mut S, request: &FunctionRequest) -> Result<FunctionResponse> {
  let new_product = request.payload()?.into_new_product()?;
  let created = store.insert_product(new_product).await?;
  info!(product_id = created.id, "Product created.");
  FunctionResponse::json(201, &created)
}

async fn update_product<S: ProductStore>(store: &mut S, request: &FunctionRequest) -> Result<FunctionResponse> {
  let id = request.product_id()?.ok_or_else(AppError::product_id_required)?;
  let changes = request.payload()?.into_changes();

  let updated = store
    .update_product(id, changes)
    .await?
    .ok_or_else(AppError::product_not_found)?;
  info!(product_id = id, "Product updated.");
  FunctionResponse::json(200, &updated)
}

async fn delete_product<S: ProductStore>(store: &mut S, request: &FunctionRequest) -> Result<FunctionResponse> {
  let id = request.product_id()?.ok_or_else(AppError::product_id_required)?;

  if !store.delete_product(id).await? {
    return Err(AppError::product_not_found());
  }
  info!(product_id = id, "Product deleted.");
  FunctionResponse::json(200, &json!({ "message": PRODUCT_DELETED }))
}
