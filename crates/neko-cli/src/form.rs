//! Editable profile form shared by the registration and edit screens.
//!
//! Values are held as the user typed them and only turned into JSON on
//! submit; validation is left to the server so its error text reaches the
//! user unchanged.

use neko_core::cat::{CatProfile, FurType, Gender, LifeStage, Size};
use serde_json::{Value, json};

use crate::labels;

// ─── Fields ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
  Name,
  Age,
  Weight,
  Gender,
  Allergies,
  ActivityLevel,
  FurType,
  Size,
  LifeStage,
  Neutered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
  Text,
  Select,
  Checkbox,
}

impl Field {
  /// Tab order.
  pub const ALL: [Self; 10] = [
    Self::Name,
    Self::Age,
    Self::Weight,
    Self::Gender,
    Self::Allergies,
    Self::ActivityLevel,
    Self::FurType,
    Self::Size,
    Self::LifeStage,
    Self::Neutered,
  ];

  pub fn label(self) -> &'static str {
    match self {
      Self::Name => "名前(必須)",
      Self::Age => "年齢(必須・数値)",
      Self::Weight => "体重(kg)",
      Self::Gender => "性別",
      Self::Allergies => "アレルギー(カンマ区切り)",
      Self::ActivityLevel => "活動量(low/normal/high)",
      Self::FurType => "毛の量",
      Self::Size => "サイズ",
      Self::LifeStage => "ライフステージ",
      Self::Neutered => "避妊・去勢済み",
    }
  }

  pub fn kind(self) -> FieldKind {
    match self {
      Self::Gender | Self::FurType | Self::Size | Self::LifeStage => FieldKind::Select,
      Self::Neutered => FieldKind::Checkbox,
      _ => FieldKind::Text,
    }
  }

  /// `(token, label)` choices for select fields; empty for the others.
  pub fn options(self) -> Vec<(&'static str, &'static str)> {
    match self {
      Self::Gender => labels::options(&Gender::ALL, Gender::as_str, labels::gender),
      Self::FurType => labels::options(&FurType::ALL, FurType::as_str, labels::fur_type),
      Self::Size => labels::options(&Size::ALL, Size::as_str, labels::size),
      Self::LifeStage => {
        labels::options(&LifeStage::ALL, LifeStage::as_str, labels::life_stage)
      }
      _ => Vec::new(),
    }
  }
}

// ─── Form ─────────────────────────────────────────────────────────────────────

/// Raw form contents. Select fields hold the wire token (`""` = unselected).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatForm {
  pub name:           String,
  pub age:            String,
  pub weight:         String,
  pub gender:         String,
  pub allergies:      String,
  pub activity_level: String,
  pub fur_type:       String,
  pub size:           String,
  pub life_stage:     String,
  pub neutered:       bool,
}

impl CatForm {
  /// A blank registration form. Gender starts at "unknown".
  pub fn registration() -> Self {
    Self { gender: Gender::Unknown.as_str().to_owned(), ..Self::default() }
  }

  /// Pre-fill from a stored profile.
  pub fn from_cat(cat: &CatProfile) -> Self {
    let token = |t: Option<&'static str>| t.unwrap_or_default().to_owned();
    Self {
      name:           cat.name.clone(),
      age:            cat.age.to_string(),
      weight:         cat.weight.map(|w| w.to_string()).unwrap_or_default(),
      gender:         token(cat.gender.map(Gender::as_str)),
      allergies:      cat.allergies.clone().unwrap_or_default(),
      activity_level: cat.activity_level.clone().unwrap_or_default(),
      fur_type:       token(cat.fur_type.map(FurType::as_str)),
      size:           token(cat.size.map(Size::as_str)),
      life_stage:     token(cat.life_stage.map(LifeStage::as_str)),
      neutered:       cat.neutered.unwrap_or(false),
    }
  }

  fn slot(&self, field: Field) -> Option<&String> {
    match field {
      Field::Name => Some(&self.name),
      Field::Age => Some(&self.age),
      Field::Weight => Some(&self.weight),
      Field::Gender => Some(&self.gender),
      Field::Allergies => Some(&self.allergies),
      Field::ActivityLevel => Some(&self.activity_level),
      Field::FurType => Some(&self.fur_type),
      Field::Size => Some(&self.size),
      Field::LifeStage => Some(&self.life_stage),
      Field::Neutered => None,
    }
  }

  fn slot_mut(&mut self, field: Field) -> Option<&mut String> {
    match field {
      Field::Name => Some(&mut self.name),
      Field::Age => Some(&mut self.age),
      Field::Weight => Some(&mut self.weight),
      Field::Gender => Some(&mut self.gender),
      Field::Allergies => Some(&mut self.allergies),
      Field::ActivityLevel => Some(&mut self.activity_level),
      Field::FurType => Some(&mut self.fur_type),
      Field::Size => Some(&mut self.size),
      Field::LifeStage => Some(&mut self.life_stage),
      Field::Neutered => None,
    }
  }

  /// Text shown for `field`.
  pub fn display(&self, field: Field) -> String {
    match field.kind() {
      FieldKind::Text => self.slot(field).cloned().unwrap_or_default(),
      FieldKind::Select => {
        let token = self.slot(field).map(String::as_str).unwrap_or_default();
        labels::option_label(&field.options(), token).to_owned()
      }
      FieldKind::Checkbox => if self.neutered { "[x]" } else { "[ ]" }.to_owned(),
    }
  }

  /// Type a character into a text field.
  pub fn push_char(&mut self, field: Field, c: char) {
    if field.kind() == FieldKind::Text
      && let Some(slot) = self.slot_mut(field)
    {
      slot.push(c);
    }
  }

  /// Delete the last character of a text field.
  pub fn pop_char(&mut self, field: Field) {
    if field.kind() == FieldKind::Text
      && let Some(slot) = self.slot_mut(field)
    {
      slot.pop();
    }
  }

  /// Move a select field to its next (or previous) option, wrapping around.
  pub fn cycle(&mut self, field: Field, forward: bool) {
    let options = field.options();
    if options.is_empty() {
      return;
    }
    let Some(slot) = self.slot_mut(field) else {
      return;
    };
    let len = options.len();
    let at = options.iter().position(|(t, _)| *t == slot.as_str()).unwrap_or(0);
    let next = if forward { (at + 1) % len } else { (at + len - 1) % len };
    *slot = options[next].0.to_owned();
  }

  /// Flip a checkbox.
  pub fn toggle(&mut self, field: Field) {
    if field == Field::Neutered {
      self.neutered = !self.neutered;
    }
  }

  /// The JSON body sent on submit. Every field is included: blanks go out as
  /// `null`, numbers as numbers when they parse, raw text otherwise.
  pub fn payload(&self) -> Value {
    json!({
      "name":          self.name,
      "age":           number_or_raw(&self.age),
      "weight":        number_or_raw(&self.weight),
      "gender":        text_or_null(&self.gender),
      "allergies":     text_or_null(&self.allergies),
      "activityLevel": text_or_null(&self.activity_level),
      "furType":       text_or_null(&self.fur_type),
      "size":          text_or_null(&self.size),
      "lifeStage":     text_or_null(&self.life_stage),
      "neutered":      self.neutered,
    })
  }
}

fn text_or_null(s: &str) -> Value {
  let s = s.trim();
  if s.is_empty() { Value::Null } else { Value::from(s) }
}

fn number_or_raw(s: &str) -> Value {
  let s = s.trim();
  if s.is_empty() {
    return Value::Null;
  }
  if let Ok(n) = s.parse::<i64>() {
    return Value::from(n);
  }
  match s.parse::<f64>() {
    Ok(f) if f.is_finite() => Value::from(f),
    _ => Value::from(s),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn typed(field: Field, text: &str) -> CatForm {
    let mut form = CatForm::registration();
    for c in text.chars() {
      form.push_char(field, c);
    }
    form
  }

  #[test]
  fn registration_defaults_gender_to_unknown() {
    let form = CatForm::registration();
    assert_eq!(form.gender, "unknown");
    assert_eq!(form.display(Field::Gender), "不明");
    assert_eq!(form.display(Field::Neutered), "[ ]");
  }

  #[test]
  fn typing_only_affects_text_fields() {
    let mut form = typed(Field::Name, "Tama");
    form.push_char(Field::Size, 'x');
    form.push_char(Field::Neutered, 'x');
    assert_eq!(form.name, "Tama");
    assert_eq!(form.size, "");

    form.pop_char(Field::Name);
    assert_eq!(form.name, "Tam");
  }

  #[test]
  fn cycle_wraps_through_unselected() {
    let mut form = CatForm::default();
    form.cycle(Field::LifeStage, true);
    assert_eq!(form.life_stage, "kitten");
    form.cycle(Field::LifeStage, false);
    assert_eq!(form.life_stage, "");
    form.cycle(Field::LifeStage, false);
    assert_eq!(form.life_stage, "senior");
    assert_eq!(form.display(Field::LifeStage), "シニア");
  }

  #[test]
  fn payload_sends_blanks_as_null() {
    let mut form = typed(Field::Name, "Tama");
    form.age = "3".into();
    form.weight = "4.2".into();
    form.toggle(Field::Neutered);

    assert_eq!(
      form.payload(),
      json!({
        "name": "Tama",
        "age": 3,
        "weight": 4.2,
        "gender": "unknown",
        "allergies": null,
        "activityLevel": null,
        "furType": null,
        "size": null,
        "lifeStage": null,
        "neutered": true,
      })
    );
  }

  #[test]
  fn payload_passes_unparseable_numbers_through() {
    let mut form = CatForm::registration();
    form.age = "three".into();
    assert_eq!(form.payload()["age"], "three");
  }

  #[test]
  fn from_cat_round_trips_through_payload() {
    let cat = CatProfile {
      id:             9,
      name:           "Mike".into(),
      age:            7,
      weight:         Some(5.5),
      gender:         Some(Gender::Female),
      allergies:      Some("fish".into()),
      activity_level: Some("low".into()),
      fur_type:       Some(FurType::Hairless),
      size:           Some(Size::Small),
      life_stage:     None,
      neutered:       None,
      poop_logs:      vec![],
    };
    let form = CatForm::from_cat(&cat);
    assert_eq!(form.weight, "5.5");
    assert_eq!(form.display(Field::FurType), "無毛");

    let payload = form.payload();
    assert_eq!(payload["age"], 7);
    assert_eq!(payload["gender"], "female");
    assert_eq!(payload["size"], "small");
    assert!(payload["lifeStage"].is_null());
    assert_eq!(payload["neutered"], false);
  }
}
