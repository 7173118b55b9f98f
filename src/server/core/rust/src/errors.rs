/* src/server/core/rust/src/errors.rs */

use std::fmt;

use crate::store::StoreError;

#[derive(Debug)]
pub struct MarqueeError {
  code: String,
  message: String,
  status: u16,
}

fn default_status(code: &str) -> u16 {
  match code {
    "VALIDATION_ERROR" => 400,
    "UNAUTHORIZED" => 401,
    "NOT_FOUND" | "PAGE_HIDDEN" => 404,
    "STORE_UNAVAILABLE" => 503,
    _ => 500,
  }
}

impl MarqueeError {
  pub fn new(code: impl Into<String>, message: impl Into<String>, status: u16) -> Self {
    Self { code: code.into(), message: message.into(), status }
  }

  pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
    let code = code.into();
    let status = default_status(&code);
    Self { code, message: message.into(), status }
  }

  pub fn validation(msg: impl Into<String>) -> Self {
    Self::with_code("VALIDATION_ERROR", msg)
  }

  pub fn not_found(msg: impl Into<String>) -> Self {
    Self::with_code("NOT_FOUND", msg)
  }

  /// The page exists but the visibility config hides it.
  pub fn page_hidden(page_key: &str) -> Self {
    Self::with_code("PAGE_HIDDEN", format!("page \"{page_key}\" is hidden"))
  }

  pub fn store_unavailable(msg: impl Into<String>) -> Self {
    Self::with_code("STORE_UNAVAILABLE", msg)
  }

  pub fn unauthorized(msg: impl Into<String>) -> Self {
    Self::with_code("UNAUTHORIZED", msg)
  }

  pub fn internal(msg: impl Into<String>) -> Self {
    Self::with_code("INTERNAL_ERROR", msg)
  }

  pub fn code(&self) -> &str {
    &self.code
  }

  pub fn message(&self) -> &str {
    &self.message
  }

  pub fn status(&self) -> u16 {
    self.status
  }

  pub fn is_page_hidden(&self) -> bool {
    self.code == "PAGE_HIDDEN"
  }

  /// Store outages may succeed on a later request; everything else will not.
  pub fn is_transient(&self) -> bool {
    self.code == "STORE_UNAVAILABLE"
  }
}

impl fmt::Display for MarqueeError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.code, self.message)
  }
}

impl std::error::Error for MarqueeError {}

impl From<StoreError> for MarqueeError {
  fn from(err: StoreError) -> Self {
    match err {
      StoreError::InvalidKey(_) => Self::validation(err.to_string()),
      StoreError::Encode { .. } => Self::internal(err.to_string()),
      StoreError::Io { .. } | StoreError::Corrupt { .. } => Self::store_unavailable(err.to_string()),
    }
  }
}
