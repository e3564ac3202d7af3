//! [`SqliteStore`] — the SQLite implementation of [`CatStore`].

use std::{collections::HashMap, path::Path};

use chrono::SubsecRound as _;
use rusqlite::OptionalExtension as _;

use neko_core::{
  cat::{CatProfile, CatProfilePatch, FurType, Gender, LifeStage, NewCatProfile, Size},
  poop_log::{NewPoopLog, PoopLog},
  store::CatStore,
};

use crate::{
  encode::{CAT_COLUMNS, RawCat, RawPoopLog, encode_dt, split_patch},
  schema::SCHEMA,
  Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Neko store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  #[cfg(test)]
  pub(crate) fn conn_for_tests(&self) -> &tokio_rusqlite::Connection { &self.conn }
}

// ─── Row helpers ─────────────────────────────────────────────────────────────

/// Read one profile row and its logs (newest first) on the database thread.
fn fetch_cat(
  conn: &rusqlite::Connection,
  id:   i64,
) -> rusqlite::Result<Option<(RawCat, Vec<RawPoopLog>)>> {
  let raw = conn
    .query_row(
      &format!("SELECT {CAT_COLUMNS} FROM cat_profiles WHERE id = ?1"),
      rusqlite::params![id],
      RawCat::from_row,
    )
    .optional()?;

  let Some(raw) = raw else {
    return Ok(None);
  };

  let mut stmt = conn.prepare(
    "SELECT id, cat_id, date, score, note FROM poop_logs
     WHERE cat_id = ?1
     ORDER BY date DESC, id DESC",
  )?;
  let logs = stmt
    .query_map(rusqlite::params![id], RawPoopLog::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  Ok(Some((raw, logs)))
}

fn decode_cat(raw: RawCat, logs: Vec<RawPoopLog>) -> Result<CatProfile> {
  let logs = logs
    .into_iter()
    .map(RawPoopLog::into_log)
    .collect::<Result<Vec<_>>>()?;
  raw.into_cat(logs)
}

// ─── CatStore impl ───────────────────────────────────────────────────────────

impl CatStore for SqliteStore {
  type Error = crate::Error;

  async fn list_cats(&self) -> Result<Vec<CatProfile>> {
    let (cats, logs): (Vec<RawCat>, Vec<RawPoopLog>) = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {CAT_COLUMNS} FROM cat_profiles ORDER BY id DESC"
        ))?;
        let cats = stmt
          .query_map([], RawCat::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(
          "SELECT id, cat_id, date, score, note FROM poop_logs
           ORDER BY cat_id, date DESC, id DESC",
        )?;
        let logs = stmt
          .query_map([], RawPoopLog::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((cats, logs))
      })
      .await?;

    let mut by_cat: HashMap<i64, Vec<PoopLog>> = HashMap::new();
    for raw in logs {
      let cat_id = raw.cat_id;
      by_cat.entry(cat_id).or_default().push(raw.into_log()?);
    }

    cats
      .into_iter()
      .map(|raw| {
        let logs = by_cat.remove(&raw.id).unwrap_or_default();
        raw.into_cat(logs)
      })
      .collect()
  }

  async fn get_cat(&self, id: i64) -> Result<Option<CatProfile>> {
    let found = self.conn.call(move |conn| Ok(fetch_cat(conn, id)?)).await?;

    found.map(|(raw, logs)| decode_cat(raw, logs)).transpose()
  }

  async fn create_cat(&self, input: NewCatProfile) -> Result<CatProfile> {
    let NewCatProfile {
      name,
      age,
      weight,
      gender,
      allergies,
      activity_level,
      fur_type,
      size,
      life_stage,
      neutered,
    } = input;

    let insert_name           = name.clone();
    let insert_allergies      = allergies.clone();
    let insert_activity_level = activity_level.clone();
    let gender_str            = gender.map(Gender::as_str);
    let fur_type_str          = fur_type.map(FurType::as_str);
    let size_str              = size.map(Size::as_str);
    let life_stage_str        = life_stage.map(LifeStage::as_str);

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO cat_profiles (
             name, age, weight, gender, allergies,
             activity_level, fur_type, size, life_stage, neutered
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            insert_name,
            age,
            weight,
            gender_str,
            insert_allergies,
            insert_activity_level,
            fur_type_str,
            size_str,
            life_stage_str,
            neutered,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(CatProfile {
      id,
      name,
      age,
      weight,
      gender,
      allergies,
      activity_level,
      fur_type,
      size,
      life_stage,
      neutered,
      poop_logs: Vec::new(),
    })
  }

  async fn update_cat(
    &self,
    id:    i64,
    patch: CatProfilePatch,
  ) -> Result<Option<CatProfile>> {
    if patch.is_empty() {
      return self.get_cat(id).await;
    }

    let name                       = patch.name;
    let age                        = patch.age;
    let (weight_set, weight)       = split_patch(patch.weight);
    let (gender_set, gender)       = split_patch(patch.gender.map(|g| g.map(Gender::as_str)));
    let (allergies_set, allergies) = split_patch(patch.allergies);
    let (activity_set, activity)   = split_patch(patch.activity_level);
    let (fur_set, fur)             = split_patch(patch.fur_type.map(|f| f.map(FurType::as_str)));
    let (size_set, size)           = split_patch(patch.size.map(|s| s.map(Size::as_str)));
    let (stage_set, stage)         =
      split_patch(patch.life_stage.map(|l| l.map(LifeStage::as_str)));
    let (neutered_set, neutered)   = split_patch(patch.neutered);

    let found = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        // `?n` flags pick between the supplied value (possibly NULL) and the
        // stored one, so omitted fields never change.
        let changed = tx.execute(
          "UPDATE cat_profiles SET
             name           = COALESCE(?2, name),
             age            = COALESCE(?3, age),
             weight         = CASE WHEN ?4  THEN ?5  ELSE weight         END,
             gender         = CASE WHEN ?6  THEN ?7  ELSE gender         END,
             allergies      = CASE WHEN ?8  THEN ?9  ELSE allergies      END,
             activity_level = CASE WHEN ?10 THEN ?11 ELSE activity_level END,
             fur_type       = CASE WHEN ?12 THEN ?13 ELSE fur_type       END,
             size           = CASE WHEN ?14 THEN ?15 ELSE size           END,
             life_stage     = CASE WHEN ?16 THEN ?17 ELSE life_stage     END,
             neutered       = CASE WHEN ?18 THEN ?19 ELSE neutered       END
           WHERE id = ?1",
          rusqlite::params![
            id,
            name,
            age,
            weight_set,
            weight,
            gender_set,
            gender,
            allergies_set,
            allergies,
            activity_set,
            activity,
            fur_set,
            fur,
            size_set,
            size,
            stage_set,
            stage,
            neutered_set,
            neutered,
          ],
        )?;

        if changed == 0 {
          return Ok(None);
        }

        let found = fetch_cat(&tx, id)?;
        tx.commit()?;
        Ok(found)
      })
      .await?;

    found.map(|(raw, logs)| decode_cat(raw, logs)).transpose()
  }

  async fn delete_cat(&self, id: i64) -> Result<bool> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM cat_profiles WHERE id = ?1",
          rusqlite::params![id],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn record_poop_log(
    &self,
    cat_id: i64,
    input:  NewPoopLog,
  ) -> Result<Option<PoopLog>> {
    // Columns hold microseconds; return exactly what a later read yields.
    let date     = input.date.trunc_subsecs(6);
    let date_str = encode_dt(date);
    let note     = input.note.clone();
    let score    = input.score;

    let id = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "INSERT INTO poop_logs (cat_id, date, score, note)
           SELECT ?1, ?2, ?3, ?4
           WHERE EXISTS (SELECT 1 FROM cat_profiles WHERE id = ?1)",
          rusqlite::params![cat_id, date_str, score, note],
        )?;
        Ok((changed > 0).then(|| conn.last_insert_rowid()))
      })
      .await?;

    Ok(id.map(|id| PoopLog {
      id,
      date,
      score: input.score,
      note:  input.note,
    }))
  }
}
