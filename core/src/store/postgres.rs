// core/src/store/postgres.rs

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{Connection, PgConnection};
use tracing::{debug, error, info, instrument};

use super::{ProductStore, StoreConnector};
use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::models::{NewProduct, Product, ProductChanges};

// Every statement hands back whole rows as JSON, so columns beyond the ones
// `Product` names (and a table without `created_at`) pass through untouched.
const SELECT_ALL_PRODUCTS: &str = "SELECT to_jsonb(p) FROM products AS p ORDER BY p.id";

const SELECT_PRODUCT_BY_ID: &str = "SELECT to_jsonb(p) FROM products AS p WHERE p.id = $1";

const INSERT_PRODUCT: &str = "INSERT INTO products AS p (name, price, category, description, image_url) \
   VALUES ($1, $2, $3, $4, $5) RETURNING to_jsonb(p)";

const UPDATE_PRODUCT: &str = "UPDATE products AS p SET name = $1, price = $2, category = $3, description = $4, \
   image_url = $5, updated_at = CURRENT_TIMESTAMP WHERE p.id = $6 RETURNING to_jsonb(p)";

const DELETE_PRODUCT: &str = "DELETE FROM products WHERE id = $1 RETURNING id::int8";

/// Opens a new PostgreSQL connection for every invocation.
#[derive(Clone)]
pub struct PgConnector {
  database_url: String,
}

impl PgConnector {
  pub fn new(database_url: impl Into<String>) -> Self {
    Self {
      database_url: database_url.into(),
    }
  }

  pub fn from_config(config: &AppConfig) -> Self {
    Self::new(config.database_url.clone())
  }
}

impl std::fmt::Debug for PgConnector {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("PgConnector").finish_non_exhaustive()
  }
}

#[async_trait]
impl StoreConnector for PgConnector {
  type Store = PgProductStore;

  #[instrument(name = "store::connect", skip(self))]
  async fn connect(&self) -> Result<PgProductStore> {
    let conn = PgConnection::connect(&self.database_url).await.map_err(|e| {
      error!("Failed to connect to the database: {}", e);
      AppError::Sqlx(e)
    })?;
    debug!("Opened database connection.");
    Ok(PgProductStore::new(conn))
  }
}

/// A single PostgreSQL connection running auto-committed statements.
pub struct PgProductStore {
  conn: PgConnection,
}

impl PgProductStore {
  pub fn new(conn: PgConnection) -> Self {
    Self { conn }
  }
}

#[async_trait]
impl ProductStore for PgProductStore {
  #[instrument(name = "store::list_products", skip(self))]
  async fn list_products(&mut self) -> Result<Vec<Product>> {
    let rows: Vec<Json<Product>> = sqlx::query_scalar(SELECT_ALL_PRODUCTS)
      .fetch_all(&mut self.conn)
      .await
      .map_err(|e| {
        error!("Failed to fetch products from database: {}", e);
        AppError::Sqlx(e)
      })?;
    let products: Vec<Product> = rows.into_iter().map(|Json(product)| product).collect();

    info!("Fetched {} products.", products.len());
    Ok(products)
  }

  #[instrument(name = "store::find_product", skip(self))]
  async fn find_product(&mut self, id: i64) -> Result<Option<Product>> {
    let row: Option<Json<Product>> = sqlx::query_scalar(SELECT_PRODUCT_BY_ID)
      .bind(id)
      .fetch_optional(&mut self.conn)
      .await
      .map_err(|e| {
        error!("Database error while fetching product {}: {}", id, e);
        AppError::Sqlx(e)
      })?;
    Ok(row.map(|Json(product)| product))
  }

  #[instrument(name = "store::insert_product", skip(self, product), fields(name = %product.name))]
  async fn insert_product(&mut self, product: NewProduct) -> Result<Product> {
    let Json(created): Json<Product> = sqlx::query_scalar(INSERT_PRODUCT)
      .bind(product.name)
      .bind(product.price)
      .bind(product.category)
      .bind(product.description)
      .bind(product.image_url)
      .fetch_one(&mut self.conn)
      .await
      .map_err(|e| {
        error!("Failed to insert product: {}", e);
        AppError::Sqlx(e)
      })?;

    info!(product_id = created.id, "Inserted product.");
    Ok(created)
  }

  #[instrument(name = "store::update_product", skip(self, changes))]
  async fn update_product(&mut self, id: i64, changes: ProductChanges) -> Result<Option<Product>> {
    let row: Option<Json<Product>> = sqlx::query_scalar(UPDATE_PRODUCT)
      .bind(changes.name)
      .bind(changes.price)
      .bind(changes.category)
      .bind(changes.description)
      .bind(changes.image_url)
      .bind(id)
      .fetch_optional(&mut self.conn)
      .await
      .map_err(|e| {
        error!("Failed to update product {}: {}", id, e);
        AppError::Sqlx(e)
      })?;
    Ok(row.map(|Json(product)| product))
  }

  #[instrument(name = "store::delete_product", skip(self))]
  async fn delete_product(&mut self, id: i64) -> Result<bool> {
    let deleted: Option<i64> = sqlx::query_scalar(DELETE_PRODUCT)
      .bind(id)
      .fetch_optional(&mut self.conn)
      .await
      .map_err(|e| {
        error!("Failed to delete product {}: {}", id, e);
        AppError::Sqlx(e)
      })?;

    Ok(deleted.is_some())
  }

  async fn close(self) -> Result<()> {
    self.conn.close().await?;
    debug!("Closed database connection.");
    Ok(())
  }
}
