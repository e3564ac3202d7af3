//! Application state machine and event dispatcher.
//!
//! Key handling only changes state and queues at most one [`Action`]; the
//! event loop draws the resulting frame (so loading and saving flags are
//! visible) and then calls [`App::perform`] to run the request.

use std::{
  sync::Arc,
  time::{Duration, Instant},
};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use neko_core::cat::CatProfile;

use crate::{
  client::ApiClient,
  form::{CatForm, Field, FieldKind},
};

/// How long a banner stays on screen.
pub const BANNER_TTL: Duration = Duration::from_secs(3);

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  List,
  Register,
  /// Editing the profile with this id.
  Edit(i64),
}

/// A request queued by key handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
  LoadCats,
  OpenEdit(i64),
  Submit,
  Delete(i64),
}

// ─── Banner ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
  Success,
  Failure,
}

/// Transient one-line message shown under the header.
#[derive(Debug, Clone)]
pub struct Banner {
  pub kind:     BannerKind,
  pub text:     String,
  pub shown_at: Instant,
}

impl Banner {
  fn new(kind: BannerKind, text: impl Into<String>) -> Self {
    Self { kind, text: text.into(), shown_at: Instant::now() }
  }

  pub fn expired(&self, now: Instant) -> bool {
    now.saturating_duration_since(self.shown_at) >= BANNER_TTL
  }
}

// ─── Per-screen state ─────────────────────────────────────────────────────────

/// State of the list screen.
#[derive(Debug, Default)]
pub struct ListView {
  pub cats:           Vec<CatProfile>,
  pub loading:        bool,
  pub error:          Option<String>,
  /// Position within the *filtered* list.
  pub cursor:         usize,
  pub filter:         String,
  pub filter_active:  bool,
  /// Id awaiting a y/n answer.
  pub confirm_delete: Option<i64>,
}

/// State of the register and edit screens.
#[derive(Debug, Default)]
pub struct FormView {
  pub form:    CatForm,
  /// Index into [`Field::ALL`].
  pub focus:   usize,
  pub loading: bool,
  pub saving:  bool,
  pub error:   Option<String>,
}

impl FormView {
  fn fresh(form: CatForm) -> Self { Self { form, ..Self::default() } }

  pub fn focused(&self) -> Field { Field::ALL[self.focus] }
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub screen:  Screen,
  pub list:    ListView,
  pub form:    FormView,
  pub banner:  Option<Banner>,
  pub pending: Option<Action>,
  pub client:  Arc<ApiClient>,
}

impl App {
  /// Start on the list screen with the initial fetch queued.
  pub fn new(client: ApiClient) -> Self {
    Self {
      screen:  Screen::List,
      list:    ListView { loading: true, ..ListView::default() },
      form:    FormView::default(),
      banner:  None,
      pending: Some(Action::LoadCats),
      client:  Arc::new(client),
    }
  }

  fn succeed(&mut self, text: impl Into<String>) {
    self.banner = Some(Banner::new(BannerKind::Success, text));
  }

  fn fail(&mut self, text: impl Into<String>) {
    self.banner = Some(Banner::new(BannerKind::Failure, text));
  }

  /// Drop an expired banner.
  pub fn tick(&mut self, now: Instant) {
    if self.banner.as_ref().is_some_and(|b| b.expired(now)) {
      self.banner = None;
    }
  }

  // ── Filtered list ─────────────────────────────────────────────────────────

  /// Profiles whose name matches the current filter query.
  pub fn filtered_cats(&self) -> Vec<&CatProfile> {
    if self.list.filter.is_empty() {
      return self.list.cats.iter().collect();
    }
    let matcher = SkimMatcherV2::default();
    self
      .list
      .cats
      .iter()
      .filter(|c| matcher.fuzzy_match(&c.name, &self.list.filter).is_some())
      .collect()
  }

  /// The profile under the list cursor, if any.
  pub fn cursor_cat(&self) -> Option<&CatProfile> {
    self.filtered_cats().get(self.list.cursor).copied()
  }

  // ── Requests ──────────────────────────────────────────────────────────────

  /// Run the queued action, if any.
  pub async fn perform(&mut self) {
    let Some(action) = self.pending.take() else {
      return;
    };
    tracing::debug!(?action, "performing");
    match action {
      Action::LoadCats => self.load_cats().await,
      Action::OpenEdit(id) => self.load_edit(id).await,
      Action::Submit => self.submit().await,
      Action::Delete(id) => self.delete(id).await,
    }
  }

  async fn load_cats(&mut self) {
    self.list.loading = true;
    match self.client.list_cats().await {
      Ok(cats) => {
        self.list.cats = cats;
        self.list.error = None;
      }
      Err(e) => {
        tracing::warn!(error = %e, "listing cats failed");
        self.list.error = Some(format!("データ読み込み失敗: {e}"));
      }
    }
    self.list.loading = false;
    let len = self.filtered_cats().len();
    self.list.cursor = self.list.cursor.min(len.saturating_sub(1));
  }

  async fn load_edit(&mut self, id: i64) {
    self.form.loading = true;
    match self.client.get_cat(id).await {
      Ok(cat) => self.form = FormView::fresh(CatForm::from_cat(&cat)),
      Err(e) => {
        tracing::warn!(id, error = %e, "loading cat failed");
        self.form.loading = false;
        self.form.error = Some(format!("データ読み込み失敗: {e}"));
      }
    }
  }

  async fn submit(&mut self) {
    let payload = self.form.form.payload();
    self.form.saving = true;
    match self.screen {
      Screen::Register => match self.client.create_cat(&payload).await {
        Ok(cat) => {
          tracing::info!(id = cat.id, "registered cat");
          self.form = FormView::fresh(CatForm::registration());
          self.succeed(format!("登録OK: id {}", cat.id));
        }
        Err(e) => self.fail(format!("エラー: {e}")),
      },
      Screen::Edit(id) => match self.client.update_cat(id, &payload).await {
        Ok(_) => {
          tracing::info!(id, "updated cat");
          self.screen = Screen::List;
          self.succeed("更新しました。");
          self.load_cats().await;
        }
        Err(e) => self.fail(format!("エラー: {e}")),
      },
      Screen::List => {}
    }
    self.form.saving = false;
  }

  async fn delete(&mut self, id: i64) {
    match self.client.delete_cat(id).await {
      Ok(()) => {
        tracing::info!(id, "deleted cat");
        self.list.cats.retain(|c| c.id != id);
        let len = self.filtered_cats().len();
        self.list.cursor = self.list.cursor.min(len.saturating_sub(1));
        self.succeed("削除しました。");
      }
      Err(e) => self.fail(format!("削除に失敗しました: {e}")),
    }
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }
    // Nothing else is accepted while a request is queued.
    if self.pending.is_some() {
      return true;
    }
    match self.screen {
      Screen::List if self.list.confirm_delete.is_some() => self.handle_confirm_key(key),
      Screen::List if self.list.filter_active => self.handle_filter_key(key),
      Screen::List => return self.handle_list_key(key),
      Screen::Register | Screen::Edit(_) => self.handle_form_key(key),
    }
    true
  }

  fn handle_confirm_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('y') | KeyCode::Char('Y') => {
        self.pending = self.list.confirm_delete.take().map(Action::Delete);
      }
      KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
        self.list.confirm_delete = None;
      }
      _ => {}
    }
  }

  fn handle_filter_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.list.filter_active = false;
        self.list.filter.clear();
      }
      KeyCode::Enter => self.list.filter_active = false,
      KeyCode::Backspace => {
        self.list.filter.pop();
      }
      KeyCode::Char(c) => self.list.filter.push(c),
      _ => return,
    }
    self.list.cursor = 0;
  }

  fn handle_list_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Char('q') => return false,

      KeyCode::Down | KeyCode::Char('j') => {
        if self.list.cursor + 1 < self.filtered_cats().len() {
          self.list.cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.list.cursor = self.list.cursor.saturating_sub(1);
      }

      KeyCode::Char('/') => {
        self.list.filter_active = true;
        self.list.filter.clear();
        self.list.cursor = 0;
      }
      KeyCode::Char('r') => {
        self.list.loading = true;
        self.pending = Some(Action::LoadCats);
      }
      KeyCode::Char('n') => {
        self.screen = Screen::Register;
        self.form = FormView::fresh(CatForm::registration());
      }
      KeyCode::Enter | KeyCode::Char('e') => {
        if let Some(id) = self.cursor_cat().map(|c| c.id) {
          self.screen = Screen::Edit(id);
          self.form = FormView { loading: true, ..FormView::default() };
          self.pending = Some(Action::OpenEdit(id));
        }
      }
      KeyCode::Char('d') => {
        self.list.confirm_delete = self.cursor_cat().map(|c| c.id);
      }

      _ => {}
    }
    true
  }

  fn handle_form_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Esc {
      self.screen = Screen::List;
      self.list.loading = true;
      self.pending = Some(Action::LoadCats);
      return;
    }
    if self.form.loading || self.form.saving || self.form.error.is_some() {
      return;
    }

    let field = self.form.focused();
    let last = Field::ALL.len() - 1;
    match (key.code, field.kind()) {
      (KeyCode::Tab | KeyCode::Down, _) => {
        self.form.focus = if self.form.focus == last { 0 } else { self.form.focus + 1 };
      }
      (KeyCode::BackTab | KeyCode::Up, _) => {
        self.form.focus = if self.form.focus == 0 { last } else { self.form.focus - 1 };
      }
      (KeyCode::Enter, _) => {
        self.form.saving = true;
        self.pending = Some(Action::Submit);
      }
      (KeyCode::Right | KeyCode::Char(' '), FieldKind::Select) => {
        self.form.form.cycle(field, true);
      }
      (KeyCode::Left, FieldKind::Select) => self.form.form.cycle(field, false),
      (KeyCode::Char(' '), FieldKind::Checkbox) => self.form.form.toggle(field),
      (KeyCode::Char(c), FieldKind::Text) => self.form.form.push_char(field, c),
      (KeyCode::Backspace, FieldKind::Text) => self.form.form.pop_char(field),
      _ => {}
    }
  }
}

#[cfg(test)]
mod tests {
  use neko_store_sqlite::SqliteStore;
  use tokio::net::TcpListener;

  use super::*;
  use crate::client::ApiConfig;

  /// Serve a fresh in-memory API on a random local port.
  async fn spawn_api() -> ApiClient {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let router = axum::Router::new().nest("/api", neko_api::api_router(store));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
    ApiClient::new(ApiConfig { base_url: format!("http://{addr}") }).unwrap()
  }

  fn press(app: &mut App, code: KeyCode) -> bool {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
  }

  fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
      press(app, KeyCode::Char(c));
    }
  }

  async fn started() -> App {
    let mut app = App::new(spawn_api().await);
    assert!(app.list.loading);
    app.perform().await;
    assert!(!app.list.loading);
    app
  }

  async fn register(app: &mut App, name: &str, age: &str) {
    press(app, KeyCode::Char('n'));
    type_text(app, name);
    press(app, KeyCode::Tab);
    type_text(app, age);
    press(app, KeyCode::Enter);
    assert!(app.form.saving);
    app.perform().await;
    assert!(!app.form.saving);
    press(app, KeyCode::Esc);
    app.perform().await;
  }

  #[tokio::test]
  async fn starts_on_empty_list() {
    let app = started().await;
    assert_eq!(app.screen, Screen::List);
    assert!(app.list.cats.is_empty());
    assert!(app.list.error.is_none());
  }

  #[tokio::test]
  async fn register_shows_new_id_and_resets_form() {
    let mut app = started().await;
    press(&mut app, KeyCode::Char('n'));
    assert_eq!(app.screen, Screen::Register);
    assert_eq!(app.form.form.gender, "unknown");

    type_text(&mut app, "Tama");
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "3");
    press(&mut app, KeyCode::Enter);
    app.perform().await;

    let banner = app.banner.clone().unwrap();
    assert_eq!(banner.kind, BannerKind::Success);
    assert!(banner.text.starts_with("登録OK: id "), "{}", banner.text);
    assert_eq!(app.screen, Screen::Register);
    assert_eq!(app.form.form, CatForm::registration());

    press(&mut app, KeyCode::Esc);
    app.perform().await;
    assert_eq!(app.screen, Screen::List);
    assert_eq!(app.list.cats.len(), 1);
    assert_eq!(app.list.cats[0].name, "Tama");
    assert_eq!(app.list.cats[0].gender.map(|g| g.as_str()), Some("unknown"));
  }

  #[tokio::test]
  async fn register_failure_surfaces_server_error() {
    let mut app = started().await;
    press(&mut app, KeyCode::Char('n'));
    type_text(&mut app, "Tama");
    press(&mut app, KeyCode::Enter);
    app.perform().await;

    let banner = app.banner.clone().unwrap();
    assert_eq!(banner.kind, BannerKind::Failure);
    assert_eq!(banner.text, "エラー: name and age are required");
    assert_eq!(app.form.form.name, "Tama");
  }

  #[tokio::test]
  async fn edit_prefills_and_returns_to_list() {
    let mut app = started().await;
    register(&mut app, "Tama", "3").await;

    press(&mut app, KeyCode::Enter);
    let id = app.list.cats[0].id;
    assert_eq!(app.screen, Screen::Edit(id));
    assert!(app.form.loading);
    app.perform().await;
    assert!(!app.form.loading);
    assert_eq!(app.form.form.name, "Tama");
    assert_eq!(app.form.form.age, "3");

    // Move to weight and type a value.
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Tab);
    assert_eq!(app.form.focused(), Field::Weight);
    type_text(&mut app, "4.2");
    press(&mut app, KeyCode::Enter);
    app.perform().await;

    assert_eq!(app.screen, Screen::List);
    let banner = app.banner.clone().unwrap();
    assert_eq!((banner.kind, banner.text.as_str()), (BannerKind::Success, "更新しました。"));
    assert_eq!(app.list.cats[0].weight, Some(4.2));
    assert_eq!(app.list.cats[0].age, 3);
  }

  #[tokio::test]
  async fn delete_requires_confirmation() {
    let mut app = started().await;
    register(&mut app, "Tama", "3").await;
    register(&mut app, "Mike", "5").await;
    assert_eq!(app.list.cats.len(), 2);

    press(&mut app, KeyCode::Char('d'));
    assert!(app.list.confirm_delete.is_some());
    press(&mut app, KeyCode::Char('n'));
    assert!(app.list.confirm_delete.is_none());
    assert!(app.pending.is_none());

    let target = app.cursor_cat().unwrap().id;
    press(&mut app, KeyCode::Char('d'));
    press(&mut app, KeyCode::Char('y'));
    assert_eq!(app.pending, Some(Action::Delete(target)));
    app.perform().await;

    assert_eq!(app.list.cats.len(), 1);
    assert!(app.list.cats.iter().all(|c| c.id != target));
    assert_eq!(app.banner.clone().unwrap().text, "削除しました。");
  }

  #[tokio::test]
  async fn unreachable_server_sets_list_error() {
    let client = ApiClient::new(ApiConfig { base_url: "http://127.0.0.1:9".into() }).unwrap();
    let mut app = App::new(client);
    app.perform().await;
    assert!(!app.list.loading);
    assert!(app.list.error.as_deref().unwrap().starts_with("データ読み込み失敗"));
  }

  #[tokio::test]
  async fn filter_narrows_by_name() {
    let mut app = started().await;
    register(&mut app, "Tama", "3").await;
    register(&mut app, "Mike", "5").await;

    press(&mut app, KeyCode::Char('/'));
    type_text(&mut app, "tm");
    assert_eq!(app.filtered_cats().len(), 1);
    assert_eq!(app.cursor_cat().unwrap().name, "Tama");

    press(&mut app, KeyCode::Esc);
    assert!(app.list.filter.is_empty());
    assert_eq!(app.filtered_cats().len(), 2);
  }

  #[tokio::test]
  async fn banner_expires_after_ttl() {
    let mut app = started().await;
    app.succeed("更新しました。");
    let shown = app.banner.as_ref().unwrap().shown_at;

    app.tick(shown + Duration::from_millis(2900));
    assert!(app.banner.is_some());
    app.tick(shown + BANNER_TTL);
    assert!(app.banner.is_none());
  }

  #[tokio::test]
  async fn form_keys_route_by_field_kind() {
    let mut app = started().await;
    press(&mut app, KeyCode::Char('n'));

    // 'q' is text in a form, not quit.
    assert!(press(&mut app, KeyCode::Char('q')));
    assert_eq!(app.form.form.name, "q");

    press(&mut app, KeyCode::BackTab);
    assert_eq!(app.form.focused(), Field::Neutered);
    press(&mut app, KeyCode::Char(' '));
    assert!(app.form.form.neutered);

    press(&mut app, KeyCode::Up);
    assert_eq!(app.form.focused(), Field::LifeStage);
    press(&mut app, KeyCode::Right);
    assert_eq!(app.form.form.life_stage, "kitten");
    press(&mut app, KeyCode::Char('x'));
    assert_eq!(app.form.form.life_stage, "kitten");
  }
}
