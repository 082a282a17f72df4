// core/src/lib.rs

//! Products API: CRUD over the `products` table for a single serverless function.
//!
//! Each invocation carries an HTTP-like event. The [`handler`] dispatches on the
//! method, runs one SQL statement through a freshly opened [`store`] connection,
//! and answers with an HTTP-like response whose body is JSON.
//!
//!  - `OPTIONS` answers the CORS preflight without touching the store.
//!  - `GET` lists all products, or fetches one when `pathParams.id` is set.
//!  - `POST` creates, `PUT` replaces, `DELETE` removes a product.

pub mod config;
pub mod error;
pub mod event;
pub mod handler;
pub mod models;
pub mod store;

// --- Re-exports for the Public API ---

pub use crate::config::AppConfig;
pub use crate::error::{AppError, Result};
pub use crate::event::{FunctionRequest, FunctionResponse, HttpMethod, PathParams};
pub use crate::handler::{handle, handle_event};
pub use crate::models::{NewProduct, Product, ProductChanges, ProductPayload};
pub use crate::store::{PgConnector, PgProductStore, ProductStore, StoreConnector};
