use super::input::{InputResult, TextInput};
use super::KeyResult;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

/// Events emitted by the search bar that the parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
  /// Text changed (emitted on each edit)
  Changed(String),
  /// Esc wiped the text
  Cleared,
  /// Focus left the bar, text kept
  Submitted,
}

/// Always-visible search bar. `/` focuses it; while focused it takes
/// every key.
#[derive(Debug, Clone, Default)]
pub struct SearchInput {
  input: TextInput,
  active: bool,
}

impl SearchInput {
  pub fn with_query(query: &str) -> Self {
    let mut search = Self::default();
    search.input.set_value(query);
    search
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  pub fn query(&self) -> &str {
    self.input.value()
  }

  /// Handle a key event. Call regardless of focus; it handles `/` too.
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<SearchEvent> {
    if !self.active {
      if key.code == KeyCode::Char('/') {
        self.active = true;
        return KeyResult::Handled;
      }
      return KeyResult::NotHandled;
    }

    match self.input.handle_key(key) {
      InputResult::Submitted(_) => {
        self.active = false;
        KeyResult::Event(SearchEvent::Submitted)
      }
      InputResult::Cancelled => {
        self.active = false;
        self.input.clear();
        KeyResult::Event(SearchEvent::Cleared)
      }
      InputResult::Changed => KeyResult::Event(SearchEvent::Changed(self.query().to_string())),
      InputResult::Consumed | InputResult::NotHandled => KeyResult::Handled,
    }
  }

  /// `pending` marks text that has not been searched for yet
  pub fn render(&self, frame: &mut Frame, area: Rect, pending: bool) {
    let border = if self.active {
      Color::Yellow
    } else {
      Color::DarkGray
    };
    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(border))
      .title(if pending { " Search (typing...) " } else { " Search " });

    let line = if self.input.is_empty() && !self.active {
      Line::from(Span::styled(
        "press / to search titles",
        Style::default().fg(Color::DarkGray),
      ))
    } else if self.active {
      // Highlight the character under the cursor, or a blank at the end
      let cursor = self.input.cursor_position();
      let before: String = self.query().chars().take(cursor).collect();
      let mut rest = self.query().chars().skip(cursor);
      let under = rest.next().map_or_else(|| " ".to_string(), String::from);
      Line::from(vec![
        Span::styled("/", Style::default().fg(Color::Yellow)),
        Span::raw(before),
        Span::styled(under, Style::default().add_modifier(Modifier::REVERSED)),
        Span::raw(rest.collect::<String>()),
      ])
    } else {
      Line::from(vec![
        Span::styled("/", Style::default().fg(Color::Yellow)),
        Span::raw(self.query()),
      ])
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
  }
}
