// core/src/event.rs

//! Envelopes exchanged with the function trigger.
//!
//! The trigger delivers an HTTP-like event (`httpMethod`, `pathParams`, `body`,
//! `queryStringParameters`) and expects an HTTP-like reply (`statusCode`,
//! `headers`, `body`, `isBase64Encoded`).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{AppError, Result};
use crate::models::product::present;
use crate::models::ProductPayload;

pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const HEADER_ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
pub const HEADER_ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
pub const HEADER_ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";
pub const HEADER_MAX_AGE: &str = "Access-Control-Max-Age";

const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const PREFLIGHT_MAX_AGE_SECS: &str = "86400";

/// HTTP method of an invocation, closed over the operations the function serves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
  Get,
  Create,
  Update,
  Delete,
  Options,
  Unsupported(String),
}

impl From<&str> for HttpMethod {
  fn from(value: &str) -> Self {
    match value {
      "GET" => HttpMethod::Get,
      "POST" => HttpMethod::Create,
      "PUT" => HttpMethod::Update,
      "DELETE" => HttpMethod::Delete,
      "OPTIONS" => HttpMethod::Options,
      other => HttpMethod::Unsupported(other.to_string()),
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathParams {
  #[serde(default)]
  pub id: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionRequest {
  #[serde(default)]
  pub http_method: Option<String>,
  #[serde(default)]
  pub path_params: Option<PathParams>,
  /// `None` when the key is missing, `Some(None)` when it is an explicit `null`.
  #[serde(default, deserialize_with = "present")]
  pub body: Option<Option<String>>,
  // Accepted so the envelope deserializes, never read.
  #[serde(default)]
  pub query_string_parameters: Option<Value>,
}

impl FunctionRequest {
  /// A missing `httpMethod` is served as `GET`.
  pub fn method(&self) -> HttpMethod {
    HttpMethod::from(self.http_method.as_deref().unwrap_or("GET"))
  }

  /// The product identifier from `pathParams.id`.
  ///
  /// Absent params, a null id, an empty string, a numeric zero and `false` all
  /// mean "no identifier". Anything else must be an integer, given either as a
  /// JSON number or as a string.
  pub fn product_id(&self) -> Result<Option<i64>> {
    let raw = match self.path_params.as_ref().and_then(|params| params.id.as_ref()) {
      None | Some(Value::Null) => return Ok(None),
      Some(raw) => raw,
    };

    match raw {
      Value::String(text) if text.is_empty() => Ok(None),
      Value::Number(number) if number.as_f64() == Some(0.0) => Ok(None),
      Value::Bool(false) => Ok(None),
      Value::String(text) => text
        .trim()
        .parse::<i64>()
        .map(Some)
        .map_err(|_| AppError::InvalidId(text.clone())),
      Value::Number(number) => number
        .as_i64()
        .map(Some)
        .ok_or_else(|| AppError::InvalidId(number.to_string())),
      other => Err(AppError::InvalidId(other.to_string())),
    }
  }

  /// Parses the JSON body. A missing body reads as `{}`; an explicit `null` is an error.
  pub fn payload(&self) -> Result<ProductPayload> {
    let body = match &self.body {
      None => "{}",
      Some(None) => return Err(AppError::Internal("Request body must be a JSON string, got null".to_string())),
      Some(Some(body)) => body.as_str(),
    };
    Ok(serde_json::from_str(body)?)
  }

  /// Builds a request from the raw trigger event.
  pub fn from_event(event: Value) -> Result<Self> {
    Ok(serde_json::from_value(event)?)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
  pub status_code: u16,
  pub headers: BTreeMap<String, String>,
  pub body: String,
  pub is_base64_encoded: bool,
}

impl FunctionResponse {
  /// A JSON response carrying the standard content-type and CORS headers.
  pub fn json<T: Serialize + ?Sized>(status_code: u16, payload: &T) -> Result<Self> {
    let body = serde_json::to_string(payload)?;
    Ok(Self::with_json_body(status_code, body))
  }

  /// Like [`FunctionResponse::json`] for an in-memory JSON value, which always serializes.
  pub fn from_json_value(status_code: u16, payload: &Value) -> Self {
    Self::with_json_body(status_code, payload.to_string())
  }

  /// The CORS preflight reply: no content type, empty body.
  pub fn preflight() -> Self {
    let headers = [
      (HEADER_ALLOW_ORIGIN, "*"),
      (HEADER_ALLOW_METHODS, ALLOWED_METHODS),
      (HEADER_ALLOW_HEADERS, HEADER_CONTENT_TYPE),
      (HEADER_MAX_AGE, PREFLIGHT_MAX_AGE_SECS),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), value.to_string()))
    .collect();

    Self {
      status_code: 200,
      headers,
      body: String::new(),
      is_base64_encoded: false,
    }
  }

  pub fn header(&self, name: &str) -> Option<&str> {
    self.headers.get(name).map(String::as_str)
  }

  fn with_json_body(status_code: u16, body: String) -> Self {
    let mut headers = BTreeMap::new();
    headers.insert(HEADER_CONTENT_TYPE.to_string(), "application/json".to_string());
    headers.insert(HEADER_ALLOW_ORIGIN.to_string(), "*".to_string());

    Self {
      status_code,
      headers,
      body,
      is_base64_encoded: false,
    }
  }
}
