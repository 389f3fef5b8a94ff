use crate::browse::DetailsView;
use crate::tmdb::{ImageUrls, MovieDetail};
use crate::ui::renderfns::{format_rating, format_runtime, rating_color};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

/// Centered panel with the open movie's details, drawn over the list.
pub fn render_movie_detail(frame: &mut Frame, area: Rect, details: &DetailsView, images: &ImageUrls) {
  if *details == DetailsView::Closed {
    return;
  }

  let width = (area.width / 5 * 4).max(40).min(area.width);
  let height = (area.height / 5 * 4).max(12).min(area.height);
  let panel = Rect::new(
    area.x + (area.width - width) / 2,
    area.y + (area.height - height) / 2,
    width,
    height,
  );
  frame.render_widget(Clear, panel);

  let title = match details {
    DetailsView::Loaded(detail) => format!(" {} ", detail.title()),
    DetailsView::Error(_) => " Movie (error) ".to_string(),
    _ => " Movie (loading...) ".to_string(),
  };
  let block = Block::default()
    .title(title)
    .title_alignment(Alignment::Center)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));
  let inner = block.inner(panel);
  frame.render_widget(block, panel);

  match details {
    DetailsView::Closed => {}
    DetailsView::Loading => {
      let paragraph =
        Paragraph::new("Loading movie details...").style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, inner);
    }
    DetailsView::Error(error) => {
      let paragraph = Paragraph::new(format!("Error: {}\n\nPress 'r' to retry.", error))
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true });
      frame.render_widget(paragraph, inner);
    }
    DetailsView::Loaded(detail) => render_loaded(frame, inner, detail, images),
  }
}

fn render_loaded(frame: &mut Frame, area: Rect, detail: &MovieDetail, images: &ImageUrls) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(5), // Facts
      Constraint::Length(1), // Separator
      Constraint::Min(1),    // Overview
    ])
    .split(area);

  let label = Style::default().fg(Color::DarkGray);
  let summary = &detail.summary;
  let genres = detail
    .genres
    .iter()
    .map(|g| g.name.as_str())
    .collect::<Vec<_>>()
    .join(", ");
  let released = if summary.release_date.is_empty() {
    "unknown".to_string()
  } else {
    summary.release_date.clone()
  };

  let mut facts = Vec::new();
  if !detail.tagline.is_empty() {
    facts.push(Line::from(Span::styled(
      detail.tagline.as_str(),
      Style::default().fg(Color::White).italic(),
    )));
  }
  facts.push(Line::from(vec![
    Span::styled("Released: ", label),
    Span::raw(released),
    Span::raw("  "),
    Span::styled("Runtime: ", label),
    Span::raw(format_runtime(detail.runtime)),
    Span::raw("  "),
    Span::styled("Rating: ", label),
    Span::styled(
      format_rating(summary.vote_average, summary.vote_count),
      Style::default().fg(rating_color(summary.vote_average)),
    ),
  ]));
  facts.push(Line::from(vec![
    Span::styled("Status: ", label),
    Span::styled(detail.status.as_str(), Style::default().fg(Color::Yellow)),
    Span::raw("  "),
    Span::styled("Language: ", label),
    Span::raw(detail.original_language.as_str()),
  ]));
  facts.push(Line::from(vec![
    Span::styled("Genres: ", label),
    Span::raw(if genres.is_empty() { "-".to_string() } else { genres }),
  ]));
  facts.push(Line::from(vec![
    Span::styled("Poster: ", label),
    Span::styled(
      images
        .poster(summary.poster_path.as_deref())
        .unwrap_or_else(|| "none".to_string()),
      Style::default().fg(Color::Cyan),
    ),
  ]));
  frame.render_widget(Paragraph::new(facts), chunks[0]);

  let sep = Paragraph::new("─".repeat(chunks[1].width as usize)).style(label);
  frame.render_widget(sep, chunks[1]);

  let overview = if summary.overview.is_empty() {
    "No overview available."
  } else {
    summary.overview.as_str()
  };
  frame.render_widget(Paragraph::new(overview).wrap(Wrap { trim: true }), chunks[2]);
}
