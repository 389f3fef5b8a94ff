use crate::ui::view::ShortcutInfo;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the header bar with logo, active mode, and shortcuts
pub fn draw_header(
  frame: &mut Frame,
  area: Rect,
  mode: &str,
  refreshing: bool,
  shortcuts: &[ShortcutInfo],
) {
  let mut spans = vec![
    Span::styled(" reelscout ", Style::default().fg(Color::Cyan).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", mode), Style::default().fg(Color::Yellow).bold()),
  ];
  if refreshing {
    spans.push(Span::styled("⟳ ", Style::default().fg(Color::DarkGray)));
  }
  spans.push(Span::raw(" "));

  // Keys and brackets highlighted, descriptions dimmed
  let mut sorted: Vec<&ShortcutInfo> = shortcuts.iter().collect();
  sorted.sort_by_key(|s| s.priority);
  for shortcut in sorted {
    spans.push(Span::styled(
      format!("<{}>", shortcut.key),
      Style::default().fg(Color::Cyan),
    ));
    spans.push(Span::styled(
      format!(" {}   ", shortcut.label),
      Style::default().fg(Color::DarkGray),
    ));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}
