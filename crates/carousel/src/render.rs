//! Card renderer: `MovieRecord` -> `CardDescription`.
//!
//! A pure function of the record and the poster base URL. The overview is
//! silently cut to `OVERVIEW_MAX_CHARS` characters, no ellipsis appended.

use domain::{CardAction, CardDescription, MovieRecord};
use reqwest::Url;

/// Hard cap on the synopsis length, in characters
pub const OVERVIEW_MAX_CHARS: usize = 400;

const SEARCH_URL: &str = "https://www.google.com/search";
const TRAILER_URL: &str = "https://www.youtube.com/results";

/// Truncate text to at most `OVERVIEW_MAX_CHARS` characters.
///
/// Works on characters, not bytes, so multi-byte text is never split mid-character.
pub fn truncate_overview(overview: &str) -> String {
    match overview.char_indices().nth(OVERVIEW_MAX_CHARS) {
        Some((cut, _)) => overview[..cut].to_string(),
        None => overview.to_string(),
    }
}

/// Build a link with a single URL-encoded query parameter
fn search_link(base: &str, key: &str, terms: &str) -> Option<String> {
    Url::parse_with_params(base, &[(key, terms)])
        .ok()
        .map(String::from)
}

/// Turns movie records into card descriptions
#[derive(Debug, Clone)]
pub struct CardRenderer {
    image_base_url: String,
}

impl CardRenderer {
    /// # Arguments
    /// * `image_base_url` - Prefix for poster paths (e.g. "https://image.tmdb.org/t/p/w200")
    pub fn new(image_base_url: impl Into<String>) -> Self {
        let image_base_url = image_base_url.into().trim_end_matches('/').to_string();
        Self { image_base_url }
    }

    /// Render one card
    pub fn render(&self, movie: &MovieRecord) -> CardDescription {
        let image_url = movie
            .poster_path
            .as_deref()
            .filter(|path| !path.is_empty())
            .map(|path| {
                if path.starts_with('/') {
                    format!("{}{}", self.image_base_url, path)
                } else {
                    format!("{}/{}", self.image_base_url, path)
                }
            });

        let actions = [
            (
                "More info about movie",
                search_link(SEARCH_URL, "q", &format!("movie {}", movie.title)),
            ),
            (
                "Watch trailer",
                search_link(TRAILER_URL, "search_query", &format!("trailer {}", movie.title)),
            ),
        ]
        .into_iter()
        .filter_map(|(title, url)| {
            url.map(|url| CardAction {
                title: title.to_string(),
                url,
            })
        })
        .collect();

        CardDescription {
            kicker: "Movie".to_string(),
            title: movie.title.clone(),
            subtitles: vec![
                format!("Vote Average: {}", movie.vote_average),
                format!("Release Date: {}", movie.release_date),
            ],
            overview: truncate_overview(&movie.overview),
            image_url,
            actions,
        }
    }

    /// Render a list of records, preserving order
    pub fn render_all(&self, movies: &[MovieRecord]) -> Vec<CardDescription> {
        movies.iter().map(|movie| self.render(movie)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_movie() -> MovieRecord {
        MovieRecord {
            id: 8,
            title: "The Grand Budapest Hotel".to_string(),
            vote_average: 8.1,
            release_date: "2014-02-26".to_string(),
            overview: "A writer encounters the owner of an aging high-class hotel.".to_string(),
            poster_path: Some("/eWdyYQreja6JGCzqHWXpWHDrrPo.jpg".to_string()),
        }
    }

    #[test]
    fn test_render_fields() {
        let renderer = CardRenderer::new("https://image.tmdb.org/t/p/w200/");
        let card = renderer.render(&sample_movie());

        assert_eq!(card.kicker, "Movie");
        assert_eq!(card.title, "The Grand Budapest Hotel");
        assert_eq!(
            card.subtitles,
            vec!["Vote Average: 8.1", "Release Date: 2014-02-26"]
        );
        assert_eq!(
            card.image_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w200/eWdyYQreja6JGCzqHWXpWHDrrPo.jpg")
        );
    }

    #[test]
    fn test_action_links_are_encoded() {
        let card = CardRenderer::new("http://img").render(&sample_movie());

        assert_eq!(card.actions.len(), 2);
        assert_eq!(card.actions[0].title, "More info about movie");
        assert_eq!(
            card.actions[0].url,
            "https://www.google.com/search?q=movie+The+Grand+Budapest+Hotel"
        );
        assert_eq!(card.actions[1].title, "Watch trailer");
        assert_eq!(
            card.actions[1].url,
            "https://www.youtube.com/results?search_query=trailer+The+Grand+Budapest+Hotel"
        );
    }

    #[test]
    fn test_missing_poster_has_no_image() {
        let mut movie = sample_movie();
        movie.poster_path = None;
        assert!(CardRenderer::new("http://img").render(&movie).image_url.is_none());

        movie.poster_path = Some(String::new());
        assert!(CardRenderer::new("http://img").render(&movie).image_url.is_none());
    }

    #[test]
    fn test_overview_truncated_to_400_chars() {
        let long = "x".repeat(1000);
        assert_eq!(truncate_overview(&long).chars().count(), OVERVIEW_MAX_CHARS);

        let exact = "y".repeat(400);
        assert_eq!(truncate_overview(&exact), exact);

        // No ellipsis is appended
        assert!(!truncate_overview(&long).ends_with("..."));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let accented = "é".repeat(500);
        let cut = truncate_overview(&accented);
        assert_eq!(cut.chars().count(), 400);
        assert!(accented.starts_with(&cut));
    }

    #[test]
    fn test_render_all_preserves_order() {
        let mut second = sample_movie();
        second.title = "Moonrise Kingdom".to_string();
        let cards = CardRenderer::new("http://img").render_all(&[sample_movie(), second]);
        let titles: Vec<_> = cards.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["The Grand Budapest Hotel", "Moonrise Kingdom"]);
    }
}
