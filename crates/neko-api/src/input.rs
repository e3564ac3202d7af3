//! Normalisation of loosely-typed JSON request bodies.
//!
//! Browser forms send numbers as strings, leave fields as `""`, and omit keys
//! entirely. This module turns such a body into a typed [`NewCatProfile`] or
//! [`CatProfilePatch`], keeping the difference between an omitted key and an
//! explicit `null` intact.
//!
//! | Key state | Create | Update |
//! |-----------|--------|--------|
//! | absent | null (required fields: 400) | unchanged |
//! | `null` or blank string | null (required fields: 400) | cleared (required fields: unchanged) |
//! | value | coerced | coerced |

use std::str::FromStr;

use neko_core::cat::{CatProfilePatch, FurType, Gender, LifeStage, NewCatProfile, Size};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::ApiError;

type Result<T, E = ApiError> = std::result::Result<T, E>;

// ─── Body ────────────────────────────────────────────────────────────────────

/// What a request body says about one key. A blank string counts as `Null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Supplied {
  #[default]
  Absent,
  Null,
  Value(Value),
}

impl<'de> Deserialize<'de> for Supplied {
  fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    Ok(match Value::deserialize(deserializer)? {
      Value::Null => Self::Null,
      Value::String(s) if s.trim().is_empty() => Self::Null,
      v => Self::Value(v),
    })
  }
}

/// JSON body accepted by `POST /cats` and `PUT /cats/{id}`.
///
/// Every key is kept raw so form-style values can be coerced per field;
/// unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatBody {
  #[serde(default)]
  pub name:           Supplied,
  #[serde(default)]
  pub age:            Supplied,
  #[serde(default)]
  pub weight:         Supplied,
  #[serde(default)]
  pub gender:         Supplied,
  #[serde(default)]
  pub allergies:      Supplied,
  #[serde(default)]
  pub activity_level: Supplied,
  #[serde(default)]
  pub fur_type:       Supplied,
  #[serde(default)]
  pub size:           Supplied,
  #[serde(default)]
  pub life_stage:     Supplied,
  #[serde(default)]
  pub neutered:       Supplied,
}

// ─── Coercions ───────────────────────────────────────────────────────────────

fn text(key: &str, v: &Value) -> Result<String> {
  match v {
    Value::String(s) => Ok(s.trim().to_owned()),
    Value::Number(n) => Ok(n.to_string()),
    _ => Err(ApiError::BadRequest(format!("{key} must be a string"))),
  }
}

fn whole(key: &str, v: &Value) -> Result<i64> {
  let invalid = || ApiError::BadRequest(format!("{key} must be a non-negative whole number"));

  let n = match v {
    Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
    Value::String(s) => {
      let s = s.trim();
      s.parse::<i64>()
        .ok()
        .or_else(|| s.parse::<f64>().ok().and_then(integral))
    }
    _ => None,
  };

  n.filter(|n| *n >= 0).ok_or_else(invalid)
}

/// `Some(n)` if `f` is a finite float with no fractional part that fits i64.
fn integral(f: f64) -> Option<i64> {
  (f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
}

fn decimal(key: &str, v: &Value) -> Result<f64> {
  let n = match v {
    Value::Number(n) => n.as_f64(),
    Value::String(s) => s.trim().parse::<f64>().ok(),
    _ => None,
  };

  n.filter(|n| n.is_finite() && *n >= 0.0)
    .ok_or_else(|| ApiError::BadRequest(format!("{key} must be a non-negative number")))
}

fn boolean(key: &str, v: &Value) -> Result<bool> {
  let b = match v {
    Value::Bool(b) => Some(*b),
    Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
      "true" | "on" => Some(true),
      "false" | "off" => Some(false),
      _ => None,
    },
    Value::Number(n) => match n.as_i64() {
      Some(1) => Some(true),
      Some(0) => Some(false),
      _ => None,
    },
    _ => None,
  };

  b.ok_or_else(|| ApiError::BadRequest(format!("{key} must be a boolean")))
}

fn choice<T>(key: &str, v: &Value) -> Result<T>
where
  T: FromStr<Err = neko_core::Error>,
{
  match v {
    Value::String(s) => s.parse().map_err(|e: neko_core::Error| ApiError::BadRequest(e.to_string())),
    _ => Err(ApiError::BadRequest(format!("{key} must be a string"))),
  }
}

// ─── Field readers ───────────────────────────────────────────────────────────

type Coerce<T> = fn(&str, &Value) -> Result<T>;

/// A nullable column: `None` = omitted, `Some(None)` = clear.
fn nullable<T>(field: &Supplied, key: &str, coerce: Coerce<T>) -> Result<Option<Option<T>>> {
  match field {
    Supplied::Absent => Ok(None),
    Supplied::Null => Ok(Some(None)),
    Supplied::Value(v) => coerce(key, v).map(|t| Some(Some(t))),
  }
}

/// A non-null column: only a concrete value counts as supplied.
fn present<T>(field: &Supplied, key: &str, coerce: Coerce<T>) -> Result<Option<T>> {
  match field {
    Supplied::Absent | Supplied::Null => Ok(None),
    Supplied::Value(v) => coerce(key, v).map(Some),
  }
}

// ─── Entry points ────────────────────────────────────────────────────────────

/// Read a request body into a [`CatBody`]. Only JSON objects are accepted;
/// a derived struct would otherwise take arrays positionally.
pub fn body(value: Value) -> Result<CatBody> {
  if !value.is_object() {
    return Err(ApiError::BadRequest("request body must be a JSON object".into()));
  }
  serde_json::from_value(value).map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// Build a [`NewCatProfile`]; `name` and `age` are mandatory.
pub fn new_profile(body: &CatBody) -> Result<NewCatProfile> {
  let missing = || ApiError::BadRequest("name and age are required".into());

  let name = present(&body.name, "name", text)?.filter(|n| !n.is_empty()).ok_or_else(missing)?;
  let age = present(&body.age, "age", whole)?.ok_or_else(missing)?;

  Ok(NewCatProfile {
    name,
    age,
    weight:         nullable(&body.weight, "weight", decimal)?.flatten(),
    gender:         nullable(&body.gender, "gender", choice::<Gender>)?.flatten(),
    allergies:      nullable(&body.allergies, "allergies", text)?.flatten(),
    activity_level: nullable(&body.activity_level, "activityLevel", text)?.flatten(),
    fur_type:       nullable(&body.fur_type, "furType", choice::<FurType>)?.flatten(),
    size:           nullable(&body.size, "size", choice::<Size>)?.flatten(),
    life_stage:     nullable(&body.life_stage, "lifeStage", choice::<LifeStage>)?.flatten(),
    neutered:       nullable(&body.neutered, "neutered", boolean)?.flatten(),
  })
}

/// Build a [`CatProfilePatch`]. `name` and `age` are only touched when a
/// concrete value is supplied; every other field may be cleared with `null`.
pub fn patch(body: &CatBody) -> Result<CatProfilePatch> {
  Ok(CatProfilePatch {
    name:           present(&body.name, "name", text)?,
    age:            present(&body.age, "age", whole)?,
    weight:         nullable(&body.weight, "weight", decimal)?,
    gender:         nullable(&body.gender, "gender", choice::<Gender>)?,
    allergies:      nullable(&body.allergies, "allergies", text)?,
    activity_level: nullable(&body.activity_level, "activityLevel", text)?,
    fur_type:       nullable(&body.fur_type, "furType", choice::<FurType>)?,
    size:           nullable(&body.size, "size", choice::<Size>)?,
    life_stage:     nullable(&body.life_stage, "lifeStage", choice::<LifeStage>)?,
    neutered:       nullable(&body.neutered, "neutered", boolean)?,
  })
}

/// Parse a path id. Anything but an integer is a 400.
pub fn id(raw: &str) -> Result<i64> {
  raw
    .trim()
    .parse()
    .map_err(|_| ApiError::BadRequest("invalid id".into()))
}
