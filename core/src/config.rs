// core/src/config.rs

use crate::error::{AppError, Result};
use dotenvy::dotenv;
use std::env;

#[derive(Clone)]
pub struct AppConfig {
  pub database_url: String,
}

// Hand-written so the connection string (credentials included) never ends up in logs.
impl std::fmt::Debug for AppConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("AppConfig")
      .field("database_url", &"[REDACTED]")
      .finish()
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let database_url = env::var("DATABASE_URL")
      .map_err(|e| AppError::Config(format!("Missing environment variable 'DATABASE_URL': {}", e)))?;

    if database_url.trim().is_empty() {
      return Err(AppError::Config("Environment variable 'DATABASE_URL' is empty".to_string()));
    }

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self { database_url })
  }
}
