//! The `CatStore` trait.
//!
//! Implemented by storage backends (e.g. `neko-store-sqlite`). The API layer
//! depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  cat::{CatProfile, CatProfilePatch, NewCatProfile},
  poop_log::{NewPoopLog, PoopLog},
};

/// Abstraction over a Neko store backend.
///
/// Lookups by an id that does not exist are not errors: they come back as
/// `None` (or `false` for deletion) so callers can map them to 404.
///
/// All methods return `Send` futures so the trait can be used from axum
/// handlers on a multi-threaded runtime.
pub trait CatStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// All profiles, highest id first, each with its poop logs.
  fn list_cats(
    &self,
  ) -> impl Future<Output = Result<Vec<CatProfile>, Self::Error>> + Send + '_;

  /// A single profile with its poop logs.
  fn get_cat(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<CatProfile>, Self::Error>> + Send + '_;

  /// Persist a new profile; the store assigns the id.
  fn create_cat(
    &self,
    input: NewCatProfile,
  ) -> impl Future<Output = Result<CatProfile, Self::Error>> + Send + '_;

  /// Apply `patch` to the profile and return the updated record.
  fn update_cat(
    &self,
    id: i64,
    patch: CatProfilePatch,
  ) -> impl Future<Output = Result<Option<CatProfile>, Self::Error>> + Send + '_;

  /// Remove a profile and its poop logs. Returns `false` if it did not exist.
  fn delete_cat(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Record a poop log for `cat_id`. Returns `None` if the profile is missing.
  fn record_poop_log(
    &self,
    cat_id: i64,
    input: NewPoopLog,
  ) -> impl Future<Output = Result<Option<PoopLog>, Self::Error>> + Send + '_;
}
