// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use products_api::{
  AppError, FunctionRequest, FunctionResponse, NewProduct, PathParams, Product, ProductChanges, ProductStore,
  Result, StoreConnector,
};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::Level;

// --- In-memory store ---
#[derive(Debug, Default)]
pub struct MemoryState {
  pub rows: Vec<Product>,
  pub last_id: i64,
  pub connections_opened: usize,
  pub connections_closed: usize,
  pub statements: usize,
}

/// Connector over a shared in-memory table. Counts connections so tests can
/// check that every opened connection gets closed.
#[derive(Clone, Default)]
pub struct MemoryConnector {
  pub state: Arc<Mutex<MemoryState>>,
  pub fail_connect: Option<String>,
  pub fail_statements: Option<String>,
}

impl MemoryConnector {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn failing_connect(message: &str) -> Self {
    Self {
      fail_connect: Some(message.to_string()),
      ..Self::default()
    }
  }

  pub fn failing_statements(message: &str) -> Self {
    Self {
      fail_statements: Some(message.to_string()),
      ..Self::default()
    }
  }

  pub fn rows(&self) -> Vec<Product> {
    self.state.lock().rows.clone()
  }

  pub fn opened(&self) -> usize {
    self.state.lock().connections_opened
  }

  pub fn closed(&self) -> usize {
    self.state.lock().connections_closed
  }
}

pub struct MemoryStore {
  state: Arc<Mutex<MemoryState>>,
  fail_statements: Option<String>,
}

impl MemoryStore {
  fn statement(&self) -> Result<()> {
    self.state.lock().statements += 1;
    match &self.fail_statements {
      Some(message) => Err(AppError::Internal(message.clone())),
      None => Ok(()),
    }
  }
}

#[async_trait]
impl StoreConnector for MemoryConnector {
  type Store = MemoryStore;

  async fn connect(&self) -> Result<MemoryStore> {
    if let Some(message) = &self.fail_connect {
      return Err(AppError::Internal(message.clone()));
    }
    self.state.lock().connections_opened += 1;
    Ok(MemoryStore {
      state: self.state.clone(),
      fail_statements: self.fail_statements.clone(),
    })
  }
}

#[async_trait]
impl ProductStore for MemoryStore {
  async fn list_products(&mut self) -> Result<Vec<Product>> {
    self.statement()?;
    let mut rows = self.state.lock().rows.clone();
    rows.sort_by_key(|row| row.id);
    Ok(rows)
  }

  async fn find_product(&mut self, id: i64) -> Result<Option<Product>> {
    self.statement()?;
    Ok(self.state.lock().rows.iter().find(|row| row.id == id).cloned())
  }

  async fn insert_product(&mut self, product: NewProduct) -> Result<Product> {
    self.statement()?;
    let mut state = self.state.lock();
    state.last_id += 1;
    let now = Utc::now().to_rfc3339();
    let mut extra = Map::new();
    extra.insert("created_at".to_string(), Value::String(now.clone()));
    let row = Product {
      id: state.last_id,
      name: Some(product.name),
      price: Some(product.price),
      category: Some(product.category),
      description: product.description,
      image_url: product.image_url,
      updated_at: Some(now),
      extra,
    };
    state.rows.push(row.clone());
    Ok(row)
  }

  async fn update_product(&mut self, id: i64, changes: ProductChanges) -> Result<Option<Product>> {
    self.statement()?;
    let mut state = self.state.lock();
    let Some(row) = state.rows.iter_mut().find(|row| row.id == id) else {
      return Ok(None);
    };
    row.name = changes.name;
    row.price = changes.price;
    row.category = changes.category;
    row.description = changes.description;
    row.image_url = changes.image_url;
    row.updated_at = Some(Utc::now().to_rfc3339());
    Ok(Some(row.clone()))
  }

  async fn delete_product(&mut self, id: i64) -> Result<bool> {
    self.statement()?;
    let mut state = self.state.lock();
    let before = state.rows.len();
    state.rows.retain(|row| row.id != id);
    Ok(state.rows.len() != before)
  }

  async fn close(self) -> Result<()> {
    self.state.lock().connections_closed += 1;
    Ok(())
  }
}

// --- Request builders ---
pub fn request(method: &str) -> FunctionRequest {
  FunctionRequest {
    http_method: Some(method.to_string()),
    ..FunctionRequest::default()
  }
}

pub fn request_with_id(method: &str, id: Value) -> FunctionRequest {
  FunctionRequest {
    path_params: Some(PathParams { id: Some(id) }),
    ..request(method)
  }
}

pub fn with_body(mut request: FunctionRequest, body: Value) -> FunctionRequest {
  request.body = Some(Some(body.to_string()));
  request
}

pub fn body_json(response: &FunctionResponse) -> Value {
  serde_json::from_str(&response.body).expect("response body should be JSON")
}

pub fn error_message(response: &FunctionResponse) -> String {
  body_json(response)["error"]
    .as_str()
    .expect("error body should carry a message")
    .to_string()
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
