/// Image size segment understood by the TMDB image CDN
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
  /// Thumbnails, posters and the featured strip
  W500,
  /// Full resolution, used for the hero backdrop
  Original,
}

impl ImageSize {
  pub fn segment(self) -> &'static str {
    match self {
      ImageSize::W500 => "w500",
      ImageSize::Original => "original",
    }
  }
}

/// Assembles displayable image URLs from the partial paths TMDB returns.
#[derive(Debug, Clone)]
pub struct ImageUrls {
  base: String,
}

impl ImageUrls {
  pub fn new(base: &str) -> Self {
    Self {
      base: base.trim_end_matches('/').to_string(),
    }
  }

  /// `None` when the movie has no artwork for this slot.
  pub fn url(&self, path: Option<&str>, size: ImageSize) -> Option<String> {
    let path = path.filter(|p| !p.is_empty())?;
    let separator = if path.starts_with('/') { "" } else { "/" };
    Some(format!(
      "{}/{}{}{}",
      self.base,
      size.segment(),
      separator,
      path
    ))
  }

  pub fn poster(&self, path: Option<&str>) -> Option<String> {
    self.url(path, ImageSize::W500)
  }

  pub fn hero_backdrop(&self, path: Option<&str>) -> Option<String> {
    self.url(path, ImageSize::Original)
  }
}
