use crate::tmdb::Genre;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Horizontal genre picker. The bar keeps its own cursor; which genre is
/// selected belongs to the controller and is passed in at render time.
#[derive(Debug, Clone, Default)]
pub struct GenreBar {
  cursor: usize,
  focused: bool,
}

impl GenreBar {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_focused(&self) -> bool {
    self.focused
  }

  pub fn blur(&mut self) {
    self.focused = false;
  }

  pub fn next(&mut self, len: usize) {
    self.focused = true;
    if len > 0 {
      self.cursor = (self.cursor + 1) % len;
    }
  }

  pub fn previous(&mut self, len: usize) {
    self.focused = true;
    if len > 0 {
      self.cursor = (self.cursor + len - 1) % len;
    }
  }

  /// Genre under the cursor
  pub fn highlighted(&self, genres: &[Genre]) -> Option<u32> {
    genres.get(self.cursor.min(genres.len().saturating_sub(1))).map(|g| g.id)
  }

  pub fn render(&self, frame: &mut Frame, area: Rect, genres: &[Genre], selected: Option<u32>) {
    let mut spans = vec![Span::styled(" Genres ", Style::default().fg(Color::DarkGray))];

    if genres.is_empty() {
      spans.push(Span::styled("loading...", Style::default().fg(Color::DarkGray)));
    }

    // Keep the cursor on screen by starting at it when the bar overflows
    let width: usize = genres.iter().map(|g| g.name.chars().count() + 3).sum();
    let start = if width > area.width as usize {
      self.cursor.min(genres.len().saturating_sub(1))
    } else {
      0
    };

    for (i, genre) in genres.iter().enumerate().skip(start) {
      let mut style = if selected == Some(genre.id) {
        Style::default().fg(Color::Black).bg(Color::Yellow).bold()
      } else {
        Style::default().fg(Color::White)
      };
      if self.focused && i == self.cursor {
        style = style.add_modifier(Modifier::UNDERLINED | Modifier::BOLD);
      }
      spans.push(Span::styled(format!(" {} ", genre.name), style));
      spans.push(Span::raw(" "));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn genres() -> Vec<Genre> {
    ["Action", "Comedy", "Drama"]
      .iter()
      .zip([28, 35, 18])
      .map(|(name, id)| Genre {
        id,
        name: name.to_string(),
      })
      .collect()
  }

  #[test]
  fn test_cursor_wraps() {
    let genres = genres();
    let mut bar = GenreBar::new();
    assert!(!bar.is_focused());
    assert_eq!(bar.highlighted(&genres), Some(28));

    bar.previous(genres.len());
    assert!(bar.is_focused());
    assert_eq!(bar.highlighted(&genres), Some(18));

    bar.next(genres.len());
    bar.next(genres.len());
    assert_eq!(bar.highlighted(&genres), Some(35));
  }

  #[test]
  fn test_no_genres() {
    let mut bar = GenreBar::new();
    bar.next(0);
    assert_eq!(bar.highlighted(&[]), None);
  }
}
