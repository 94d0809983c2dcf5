//! Bot-level settings.

use carousel::{CARDS_IN_CAROUSEL, CardRenderer, ResultWindow};
use catalog::COMEDY;
use catalog::config::DEFAULT_IMAGE_BASE_URL;

/// Tunables for the conversation flow
#[derive(Debug, Clone, PartialEq)]
pub struct BotConfig {
    /// Cards per carousel
    pub cards_in_carousel: usize,
    /// Genre shown right away to a user in a negative mood
    pub cheer_up_genre: String,
    /// Optional release year for the cheer-up carousel
    pub cheer_up_year: Option<i32>,
    /// Prefix for poster images
    pub image_base_url: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            cards_in_carousel: CARDS_IN_CAROUSEL,
            cheer_up_genre: COMEDY.to_string(),
            cheer_up_year: None,
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
        }
    }
}

impl BotConfig {
    pub fn with_cards_in_carousel(mut self, cards: usize) -> Self {
        self.cards_in_carousel = cards;
        self
    }

    pub fn with_image_base_url(mut self, image_base_url: impl Into<String>) -> Self {
        self.image_base_url = image_base_url.into();
        self
    }

    pub fn window(&self) -> ResultWindow {
        ResultWindow::new(self.cards_in_carousel)
    }

    pub fn renderer(&self) -> CardRenderer {
        CardRenderer::new(self.image_base_url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BotConfig::default();
        assert_eq!(config.cards_in_carousel, 3);
        assert_eq!(config.cheer_up_genre, "comedy");
        assert_eq!(config.cheer_up_year, None);
        assert_eq!(config.window().count(), 3);
    }

    #[test]
    fn test_builder_overrides() {
        let config = BotConfig::default()
            .with_cards_in_carousel(5)
            .with_image_base_url("http://localhost/img");
        assert_eq!(config.window().count(), 5);
        assert_eq!(config.image_base_url, "http://localhost/img");
    }
}
