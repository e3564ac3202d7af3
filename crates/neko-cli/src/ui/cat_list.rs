//! Profile list screen.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::{app::App, labels};

/// Render the list screen into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let filtered = app.filtered_cats();
  let total = app.list.cats.len();

  let title = if app.list.filter_active || !app.list.filter.is_empty() {
    format!(" 猫 ({}/{}) ", filtered.len(), total)
  } else {
    format!(" 猫 ({total}) ")
  };
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let mut inner = block.inner(area);
  f.render_widget(block, area);

  if (app.list.filter_active || !app.list.filter.is_empty()) && inner.height > 2 {
    let filter_area = Rect { y: inner.y + inner.height.saturating_sub(1), height: 1, ..inner };
    inner.height = inner.height.saturating_sub(1);

    let cursor = if app.list.filter_active { "_" } else { "" };
    f.render_widget(
      Paragraph::new(format!("/{}{cursor}", app.list.filter))
        .style(Style::default().fg(Color::Yellow)),
      filter_area,
    );
  }

  let placeholder = if app.list.loading {
    Some(("読み込み中…".to_owned(), Color::DarkGray))
  } else if let Some(err) = &app.list.error {
    Some((err.clone(), Color::Red))
  } else if total == 0 {
    Some(("まだ登録がありません。".to_owned(), Color::DarkGray))
  } else {
    None
  };
  if let Some((text, color)) = placeholder {
    f.render_widget(Paragraph::new(text).style(Style::default().fg(color)), inner);
    return;
  }

  let dim = Style::default().fg(Color::DarkGray);
  let items: Vec<ListItem> = filtered
    .iter()
    .map(|cat| {
      let mut chips = vec![Span::styled("  アレルギー: ", dim)];
      if cat.allergy_list().is_empty() {
        chips.push(Span::styled(labels::UNSET, dim));
      }
      for allergy in cat.allergy_list() {
        chips.push(Span::styled(
          format!("[{allergy}]"),
          Style::default().fg(Color::Magenta),
        ));
        chips.push(Span::raw(" "));
      }

      ListItem::new(vec![
        Line::from(vec![
          Span::styled(cat.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
          Span::styled(format!("  #{}", cat.id), dim),
        ]),
        Line::from(format!("  {}", labels::summary_line(cat))),
        Line::from(format!("  {}", labels::attribute_line(cat))),
        Line::from(chips),
        Line::styled(format!("  {}", labels::log_line(cat)), dim),
        Line::raw(""),
      ])
    })
    .collect();

  let mut state = ListState::default();
  state.select((!filtered.is_empty()).then_some(app.list.cursor));

  f.render_stateful_widget(
    List::new(items)
      .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
      .highlight_symbol("▌"),
    inner,
    &mut state,
  );
}
