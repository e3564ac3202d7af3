//! Cat profiles — the primary record of the store.
//!
//! Enumerated attributes travel over the wire and into the database as their
//! lowercase English tokens (`"male"`, `"hairless"`, ...). Localised display
//! labels are a UI concern and live in `neko-cli`.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, poop_log::PoopLog};

// ─── Enumerations ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
  Male,
  Female,
  Unknown,
}

impl Gender {
  pub const ALL: [Self; 3] = [Self::Male, Self::Female, Self::Unknown];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Male => "male",
      Self::Female => "female",
      Self::Unknown => "unknown",
    }
  }
}

impl FromStr for Gender {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "male" => Ok(Self::Male),
      "female" => Ok(Self::Female),
      "unknown" => Ok(Self::Unknown),
      _ => Err(Error::UnknownVariant { field: "gender", value: s.to_owned() }),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FurType {
  Short,
  Long,
  Hairless,
}

impl FurType {
  pub const ALL: [Self; 3] = [Self::Short, Self::Long, Self::Hairless];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Short => "short",
      Self::Long => "long",
      Self::Hairless => "hairless",
    }
  }
}

impl FromStr for FurType {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "short" => Ok(Self::Short),
      "long" => Ok(Self::Long),
      "hairless" => Ok(Self::Hairless),
      _ => Err(Error::UnknownVariant { field: "furType", value: s.to_owned() }),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Size {
  Small,
  Medium,
  Large,
}

impl Size {
  pub const ALL: [Self; 3] = [Self::Small, Self::Medium, Self::Large];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Small => "small",
      Self::Medium => "medium",
      Self::Large => "large",
    }
  }
}

impl FromStr for Size {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "small" => Ok(Self::Small),
      "medium" => Ok(Self::Medium),
      "large" => Ok(Self::Large),
      _ => Err(Error::UnknownVariant { field: "size", value: s.to_owned() }),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifeStage {
  Kitten,
  Adult,
  Senior,
}

impl LifeStage {
  pub const ALL: [Self; 3] = [Self::Kitten, Self::Adult, Self::Senior];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Kitten => "kitten",
      Self::Adult => "adult",
      Self::Senior => "senior",
    }
  }
}

impl FromStr for LifeStage {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "kitten" => Ok(Self::Kitten),
      "adult" => Ok(Self::Adult),
      "senior" => Ok(Self::Senior),
      _ => Err(Error::UnknownVariant { field: "lifeStage", value: s.to_owned() }),
    }
  }
}

macro_rules! display_as_str {
  ($($ty:ty),*) => {
    $(
      impl fmt::Display for $ty {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
          f.write_str(self.as_str())
        }
      }
    )*
  };
}

display_as_str!(Gender, FurType, Size, LifeStage);

// ─── Profile ─────────────────────────────────────────────────────────────────

/// One registered cat, bundled with its poop logs on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatProfile {
  pub id:             i64,
  pub name:           String,
  /// Age in whole years.
  pub age:            i64,
  /// Weight in kilograms.
  pub weight:         Option<f64>,
  pub gender:         Option<Gender>,
  /// Comma-separated free text, e.g. `"chicken, fish"`.
  pub allergies:      Option<String>,
  pub activity_level: Option<String>,
  pub fur_type:       Option<FurType>,
  pub size:           Option<Size>,
  pub life_stage:     Option<LifeStage>,
  pub neutered:       Option<bool>,
  /// Newest first.
  #[serde(default)]
  pub poop_logs:      Vec<PoopLog>,
}

impl CatProfile {
  /// The individual allergy tokens: split on commas, trimmed, empties dropped.
  pub fn allergy_list(&self) -> Vec<&str> {
    self
      .allergies
      .as_deref()
      .map(|a| a.split(',').map(str::trim).filter(|t| !t.is_empty()).collect())
      .unwrap_or_default()
  }
}

/// Input for creating a profile. The store assigns the id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewCatProfile {
  pub name:           String,
  pub age:            i64,
  pub weight:         Option<f64>,
  pub gender:         Option<Gender>,
  pub allergies:      Option<String>,
  pub activity_level: Option<String>,
  pub fur_type:       Option<FurType>,
  pub size:           Option<Size>,
  pub life_stage:     Option<LifeStage>,
  pub neutered:       Option<bool>,
}

impl NewCatProfile {
  /// A profile with only the required fields set.
  pub fn new(name: impl Into<String>, age: i64) -> Self {
    Self { name: name.into(), age, ..Self::default() }
  }
}

/// A partial update.
///
/// For the nullable columns the outer `Option` says whether the field was
/// supplied at all; `Some(None)` clears the stored value. `name` and `age`
/// cannot be cleared, so they carry a single level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatProfilePatch {
  pub name:           Option<String>,
  pub age:            Option<i64>,
  pub weight:         Option<Option<f64>>,
  pub gender:         Option<Option<Gender>>,
  pub allergies:      Option<Option<String>>,
  pub activity_level: Option<Option<String>>,
  pub fur_type:       Option<Option<FurType>>,
  pub size:           Option<Option<Size>>,
  pub life_stage:     Option<Option<LifeStage>>,
  pub neutered:       Option<Option<bool>>,
}

impl CatProfilePatch {
  /// `true` if applying this patch would change nothing.
  pub fn is_empty(&self) -> bool { *self == Self::default() }
}
