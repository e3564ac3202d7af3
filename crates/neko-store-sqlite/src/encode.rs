//! Encoding and decoding helpers between Rust domain types and the plain
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with a fixed microsecond width
//! so that lexical order matches chronological order. Enumerations are
//! stored as their lowercase wire tokens.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use neko_core::{
  cat::{CatProfile, FurType, Gender, LifeStage, Size},
  poop_log::PoopLog,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Enumerations ────────────────────────────────────────────────────────────

fn decode_opt<T>(s: Option<String>) -> Result<Option<T>>
where
  T: FromStr<Err = neko_core::Error>,
{
  Ok(s.as_deref().map(T::from_str).transpose()?)
}

// ─── Patches ─────────────────────────────────────────────────────────────────

/// Split a patch field into `(supplied, value)` for the
/// `CASE WHEN ?supplied THEN ?value ELSE column END` update form.
pub fn split_patch<T>(field: Option<Option<T>>) -> (bool, Option<T>) {
  match field {
    None => (false, None),
    Some(value) => (true, value),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `cat_profiles` row.
pub struct RawCat {
  pub id:             i64,
  pub name:           String,
  pub age:            i64,
  pub weight:         Option<f64>,
  pub gender:         Option<String>,
  pub allergies:      Option<String>,
  pub activity_level: Option<String>,
  pub fur_type:       Option<String>,
  pub size:           Option<String>,
  pub life_stage:     Option<String>,
  pub neutered:       Option<bool>,
}

/// Column list matching [`RawCat::from_row`].
pub const CAT_COLUMNS: &str = "id, name, age, weight, gender, allergies, \
   activity_level, fur_type, size, life_stage, neutered";

impl RawCat {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:             row.get(0)?,
      name:           row.get(1)?,
      age:            row.get(2)?,
      weight:         row.get(3)?,
      gender:         row.get(4)?,
      allergies:      row.get(5)?,
      activity_level: row.get(6)?,
      fur_type:       row.get(7)?,
      size:           row.get(8)?,
      life_stage:     row.get(9)?,
      neutered:       row.get(10)?,
    })
  }

  /// Decode into a [`CatProfile`] carrying `poop_logs`.
  pub fn into_cat(self, poop_logs: Vec<PoopLog>) -> Result<CatProfile> {
    Ok(CatProfile {
      id: self.id,
      name: self.name,
      age: self.age,
      weight: self.weight,
      gender: decode_opt::<Gender>(self.gender)?,
      allergies: self.allergies,
      activity_level: self.activity_level,
      fur_type: decode_opt::<FurType>(self.fur_type)?,
      size: decode_opt::<Size>(self.size)?,
      life_stage: decode_opt::<LifeStage>(self.life_stage)?,
      neutered: self.neutered,
      poop_logs,
    })
  }
}

/// Raw values read directly from a `poop_logs` row.
pub struct RawPoopLog {
  pub id:     i64,
  pub cat_id: i64,
  pub date:   String,
  pub score:  Option<f64>,
  pub note:   Option<String>,
}

impl RawPoopLog {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:     row.get(0)?,
      cat_id: row.get(1)?,
      date:   row.get(2)?,
      score:  row.get(3)?,
      note:   row.get(4)?,
    })
  }

  pub fn into_log(self) -> Result<PoopLog> {
    Ok(PoopLog {
      id:    self.id,
      date:  decode_dt(&self.date)?,
      score: self.score,
      note:  self.note,
    })
  }
}
