//! TUI rendering: header, banner, the active screen, and the status bar.

pub mod cat_form;
pub mod cat_list;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::app::{App, BannerKind, Screen};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Length(1), // banner
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(f.area());

  draw_header(f, rows[0], app);
  draw_banner(f, rows[1], app);
  match app.screen {
    Screen::List => cat_list::draw(f, rows[2], app),
    Screen::Register | Screen::Edit(_) => cat_form::draw(f, rows[2], app),
  }
  draw_status(f, rows[3], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let title = match app.screen {
    Screen::List => " neko  猫プロフィール一覧".to_owned(),
    Screen::Register => " neko  猫プロフィール登録".to_owned(),
    Screen::Edit(id) => format!(" neko  プロフィール編集 (id {id})"),
  };
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(
    title,
    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(format!("{date} "), Style::default().fg(Color::Gray));

  let pad = area
    .width
    .saturating_sub(left.width() as u16)
    .saturating_sub(right.width() as u16);
  let line = Line::from(vec![left, Span::raw(" ".repeat(pad as usize)), right]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Banner ───────────────────────────────────────────────────────────────────

fn draw_banner(f: &mut Frame, area: Rect, app: &App) {
  let Some(banner) = &app.banner else {
    return;
  };
  let color = match banner.kind {
    BannerKind::Success => Color::Green,
    BannerKind::Failure => Color::Red,
  };
  f.render_widget(
    Paragraph::new(format!(" {}", banner.text))
      .style(Style::default().fg(color).add_modifier(Modifier::BOLD)),
    area,
  );
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match app.screen {
    Screen::List if app.list.confirm_delete.is_some() => {
      ("DELETE", "本当に削除しますか？ (y/n)")
    }
    Screen::List if app.list.filter_active => {
      ("SEARCH", "Type to filter  Esc clear  Enter done")
    }
    Screen::List => (
      "LIST",
      "↑↓/jk move  / search  n new  Enter/e edit  d delete  r reload  q quit",
    ),
    Screen::Register => ("NEW", "Tab/↑↓ field  ←→/Space choose  Enter register  Esc back"),
    Screen::Edit(_) => ("EDIT", "Tab/↑↓ field  ←→/Space choose  Enter save  Esc back"),
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(format!("  {hints}"), Style::default().fg(Color::DarkGray));

  f.render_widget(
    Paragraph::new(Line::from(vec![mode_span, hint_span]))
      .style(Style::default().bg(Color::Black)),
    area,
  );
}
