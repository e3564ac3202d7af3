//! Error types for `neko-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown {field} value: {value:?}")]
  UnknownVariant { field: &'static str, value: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
