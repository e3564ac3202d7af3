//! Registration and edit form.

use ratatui::{
  Frame,
  layout::{Constraint, Rect},
  style::{Color, Modifier, Style},
  text::Line,
  widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use crate::{
  app::{App, Screen},
  form::{Field, FieldKind},
};

/// Render the form for the current screen into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let view = &app.form;
  let title = match app.screen {
    Screen::Edit(_) => " プロフィール編集 ",
    _ => " 猫プロフィール登録 ",
  };
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  if view.loading {
    f.render_widget(
      Paragraph::new("読み込み中…").style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  }
  if let Some(err) = &view.error {
    f.render_widget(Paragraph::new(err.as_str()).style(Style::default().fg(Color::Red)), inner);
    return;
  }

  let rows: Vec<Row> = Field::ALL
    .iter()
    .enumerate()
    .map(|(i, &field)| {
      let focused = i == view.focus;
      let mut value = view.form.display(field);
      match field.kind() {
        FieldKind::Text if focused => value.push('_'),
        FieldKind::Select => value = format!("‹ {value} ›"),
        _ => {}
      }

      let style = if focused {
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD)
      } else {
        Style::default()
      };
      Row::new(vec![
        Cell::from(field.label()).style(Style::default().fg(Color::Cyan)),
        Cell::from(value),
      ])
      .style(style)
    })
    .collect();

  let mut lines = Vec::new();
  if view.saving {
    lines.push(Line::styled("保存中…", Style::default().fg(Color::Yellow)));
  }

  let table_area = Rect { height: inner.height.saturating_sub(lines.len() as u16), ..inner };
  f.render_widget(
    Table::new(rows, [Constraint::Length(26), Constraint::Min(10)]).column_spacing(2),
    table_area,
  );

  if !lines.is_empty() {
    let footer = Rect {
      y: table_area.y + table_area.height,
      height: lines.len() as u16,
      ..inner
    };
    f.render_widget(Paragraph::new(lines), footer);
  }
}
