// core/src/models/mod.rs

//! Data structures representing the `products` table and request bodies.

pub mod product;

pub use product::{NewProduct, Product, ProductChanges, ProductPayload};
