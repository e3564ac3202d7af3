//! Localised display labels for wire tokens.
//!
//! The API always speaks the English enum tokens; only the UI translates.

use chrono::Local;
use neko_core::cat::{CatProfile, FurType, Gender, LifeStage, Size};

pub const UNSET: &str = "-";
pub const UNSELECTED: &str = "未選択";

pub fn gender(g: Gender) -> &'static str {
  match g {
    Gender::Male => "オス",
    Gender::Female => "メス",
    Gender::Unknown => "不明",
  }
}

pub fn fur_type(f: FurType) -> &'static str {
  match f {
    FurType::Short => "短毛",
    FurType::Long => "長毛",
    FurType::Hairless => "無毛",
  }
}

pub fn size(s: Size) -> &'static str {
  match s {
    Size::Small => "小型",
    Size::Medium => "中型",
    Size::Large => "大型",
  }
}

pub fn life_stage(l: LifeStage) -> &'static str {
  match l {
    LifeStage::Kitten => "子猫",
    LifeStage::Adult => "成猫",
    LifeStage::Senior => "シニア",
  }
}

pub fn neutered(n: Option<bool>) -> &'static str {
  match n {
    None => UNSET,
    Some(true) => "済",
    Some(false) => "未",
  }
}

/// `(token, label)` pairs for a select box, led by the empty choice.
pub fn options<T: Copy>(
  all:   &[T],
  token: fn(T) -> &'static str,
  label: fn(T) -> &'static str,
) -> Vec<(&'static str, &'static str)> {
  std::iter::once(("", UNSELECTED))
    .chain(all.iter().map(|v| (token(*v), label(*v))))
    .collect()
}

/// Label for a select token, falling back to the raw token.
pub fn option_label<'a>(options: &[(&'static str, &'static str)], token: &'a str) -> &'a str {
  options
    .iter()
    .find(|(t, _)| *t == token)
    .map_or(token, |&(_, label)| label)
}

// ─── Profile lines ───────────────────────────────────────────────────────────

/// `年齢: 3歳 / 体重: 4.2kg / 性別: オス`
pub fn summary_line(cat: &CatProfile) -> String {
  let weight = cat.weight.map_or_else(|| UNSET.to_owned(), |w| w.to_string());
  format!(
    "年齢: {}歳 / 体重: {}kg / 性別: {}",
    cat.age,
    weight,
    cat.gender.map_or(UNSET, gender),
  )
}

/// `活動量: high ／ 毛: 短毛 ／ サイズ: - ／ ステージ: 成猫 ／ 去勢/避妊: 済`
pub fn attribute_line(cat: &CatProfile) -> String {
  format!(
    "活動量: {} ／ 毛: {} ／ サイズ: {} ／ ステージ: {} ／ 去勢/避妊: {}",
    cat.activity_level.as_deref().unwrap_or(UNSET),
    cat.fur_type.map_or(UNSET, fur_type),
    cat.size.map_or(UNSET, size),
    cat.life_stage.map_or(UNSET, life_stage),
    neutered(cat.neutered),
  )
}

/// Log count plus the local date of the newest entry.
pub fn log_line(cat: &CatProfile) -> String {
  match cat.poop_logs.first() {
    None => "うんちログ: 0 件".to_owned(),
    Some(latest) => format!(
      "うんちログ: {} 件（最新 {}）",
      cat.poop_logs.len(),
      latest.date.with_timezone(&Local).format("%Y-%m-%d"),
    ),
  }
}
