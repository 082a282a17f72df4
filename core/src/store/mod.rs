// core/src/store/mod.rs

//! Access to the `products` table.
//!
//! A [`StoreConnector`] opens one [`ProductStore`] connection per invocation.
//! Every store operation runs exactly one statement, committed on its own.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{NewProduct, Product, ProductChanges};

pub mod postgres;

pub use postgres::{PgConnector, PgProductStore};

#[async_trait]
pub trait ProductStore: Send {
  /// All rows, ordered by ascending id.
  async fn list_products(&mut self) -> Result<Vec<Product>>;

  async fn find_product(&mut self, id: i64) -> Result<Option<Product>>;

  /// Inserts a row and returns it as stored, generated id and timestamps included.
  async fn insert_product(&mut self, product: NewProduct) -> Result<Product>;

  /// Overwrites the mutable columns and stamps `updated_at`.
  /// Returns `None` when no row has the id.
  async fn update_product(&mut self, id: i64, changes: ProductChanges) -> Result<Option<Product>>;

  /// Returns whether a row was deleted.
  async fn delete_product(&mut self, id: i64) -> Result<bool>;

  /// Releases the connection.
  async fn close(self) -> Result<()>;
}

#[async_trait]
pub trait StoreConnector: Send + Sync {
  type Store: ProductStore;

  /// Opens a fresh connection. Implementations must not reuse connections across calls.
  async fn connect(&self) -> Result<Self::Store>;
}
