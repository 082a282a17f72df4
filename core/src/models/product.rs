// core/src/models/product.rs

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{AppError, Result};

/// One row of the `products` table, as the store renders it to JSON.
///
/// `name`, `price` and `category` are nullable here: an update writes absent
/// fields as NULL, and a row read back afterwards has to decode. Columns not
/// named below (`created_at` among them, when the table has it) are kept in
/// `extra` and serialized alongside the known fields. Timestamps stay in the
/// ISO-8601 text the store produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  pub id: i64,
  pub name: Option<String>,
  pub price: Option<f64>,
  pub category: Option<String>,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub image_url: Option<String>,
  #[serde(default)]
  pub updated_at: Option<String>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

/// JSON body of a create or update request.
///
/// `description` and `image_url` keep track of presence: the outer `Option` is
/// `None` when the key is missing, `Some(None)` when it is an explicit `null`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductPayload {
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default)]
  pub price: Option<f64>,
  #[serde(default)]
  pub category: Option<String>,
  #[serde(default, deserialize_with = "present")]
  pub description: Option<Option<String>>,
  #[serde(default, deserialize_with = "present")]
  pub image_url: Option<Option<String>>,
}

// Only called when the key exists, so a `null` value still reads as present.
pub(crate) fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Option::<T>::deserialize(deserializer).map(Some)
}

/// Validated values for an insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
  pub name: String,
  pub price: f64,
  pub category: String,
  pub description: Option<String>,
  pub image_url: Option<String>,
}

/// Full replacement of the mutable columns; `None` is written as NULL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
  pub name: Option<String>,
  pub price: Option<f64>,
  pub category: Option<String>,
  pub description: Option<String>,
  pub image_url: Option<String>,
}

impl ProductPayload {
  /// Checks the fields a new product needs.
  ///
  /// `name` and `category` must be non-empty strings and `price` must be
  /// non-zero. Missing `description`/`image_url` default to an empty string.
  pub fn into_new_product(self) -> Result<NewProduct> {
    let name = self.name.filter(|name| !name.is_empty());
    let price = self.price.filter(|price| *price != 0.0);
    let category = self.category.filter(|category| !category.is_empty());

    let (Some(name), Some(price), Some(category)) = (name, price, category) else {
      return Err(AppError::required_fields_missing());
    };

    Ok(NewProduct {
      name,
      price,
      category,
      description: self.description.unwrap_or_else(|| Some(String::new())),
      image_url: self.image_url.unwrap_or_else(|| Some(String::new())),
    })
  }

  pub fn into_changes(self) -> ProductChanges {
    ProductChanges {
      name: self.name,
      price: self.price,
      category: self.category,
      description: self.description.flatten(),
      image_url: self.image_url.flatten(),
    }
  }
}
