use ratatui::prelude::Color;

/// Truncate a string to at most `max_len` characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Display color for a TMDB vote average (0-10)
pub fn rating_color(vote_average: f64) -> Color {
  if vote_average >= 7.5 {
    Color::Green
  } else if vote_average >= 6.0 {
    Color::Yellow
  } else if vote_average > 0.0 {
    Color::Red
  } else {
    Color::DarkGray
  }
}

/// "1h 52m", "45m"; unknown runtimes render as "-"
pub fn format_runtime(minutes: Option<u32>) -> String {
  match minutes {
    Some(m) if m >= 60 => format!("{}h {:02}m", m / 60, m % 60),
    Some(m) => format!("{}m", m),
    None => "-".to_string(),
  }
}

/// "7.8 (1.2k)"; movies nobody has rated yet show as "unrated"
pub fn format_rating(vote_average: f64, vote_count: u64) -> String {
  if vote_count == 0 {
    return "unrated".to_string();
  }
  let votes = if vote_count >= 1000 {
    format!("{:.1}k", vote_count as f64 / 1000.0)
  } else {
    vote_count.to_string()
  };
  format!("{:.1} ({})", vote_average, votes)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
    assert_eq!(truncate("hello", 5), "hello");
  }

  #[test]
  fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 8), "hello...");
  }

  #[test]
  fn test_truncate_counts_characters() {
    assert_eq!(truncate("Léon: The Professional", 7), "Léon...");
    assert_eq!(truncate("千と千尋の神隠し", 5), "千と...");
  }

  #[test]
  fn test_rating_color() {
    assert_eq!(rating_color(8.4), Color::Green);
    assert_eq!(rating_color(6.5), Color::Yellow);
    assert_eq!(rating_color(3.0), Color::Red);
    assert_eq!(rating_color(0.0), Color::DarkGray);
  }

  #[test]
  fn test_format_runtime() {
    assert_eq!(format_runtime(Some(112)), "1h 52m");
    assert_eq!(format_runtime(Some(120)), "2h 00m");
    assert_eq!(format_runtime(Some(45)), "45m");
    assert_eq!(format_runtime(None), "-");
  }

  #[test]
  fn test_format_rating() {
    assert_eq!(format_rating(7.84, 1234), "7.8 (1.2k)");
    assert_eq!(format_rating(6.0, 12), "6.0 (12)");
    assert_eq!(format_rating(0.0, 0), "unrated");
  }
}
