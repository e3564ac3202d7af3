//! Poop logs — stool observations owned by a cat profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single stool observation. Deleted together with its owning profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoopLog {
  pub id:    i64,
  pub date:  DateTime<Utc>,
  pub score: Option<f64>,
  pub note:  Option<String>,
}

/// Input for recording a log entry against a profile.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPoopLog {
  pub date:  DateTime<Utc>,
  pub score: Option<f64>,
  pub note:  Option<String>,
}

impl NewPoopLog {
  /// An entry dated now, with no score or note.
  pub fn now() -> Self {
    Self { date: Utc::now(), score: None, note: None }
  }
}
