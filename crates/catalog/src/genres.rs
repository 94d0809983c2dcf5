//! Static lookup table from genre names to TMDB genre ids.
//!
//! The catalog only understands its own numeric ids, so every genre the
//! recognizer reports goes through this table first.

/// TMDB movie genres, `(name, id)`.
///
/// Names are lowercase; a few common spellings map onto the same id.
pub const GENRES: &[(&str, &str)] = &[
    ("action", "28"),
    ("adventure", "12"),
    ("animation", "16"),
    ("comedy", "35"),
    ("crime", "80"),
    ("documentary", "99"),
    ("drama", "18"),
    ("family", "10751"),
    ("fantasy", "14"),
    ("history", "36"),
    ("horror", "27"),
    ("music", "10402"),
    ("mystery", "9648"),
    ("romance", "10749"),
    ("science fiction", "878"),
    ("sci-fi", "878"),
    ("scifi", "878"),
    ("tv movie", "10770"),
    ("thriller", "53"),
    ("war", "10752"),
    ("western", "37"),
];

/// Genre used to cheer up a user in a negative mood
pub const COMEDY: &str = "comedy";

/// Look up the TMDB id for a genre name (case-insensitive, surrounding whitespace ignored)
pub fn genre_id(name: &str) -> Option<&'static str> {
    let name = name.trim().to_lowercase();
    GENRES
        .iter()
        .find(|(genre, _)| *genre == name)
        .map(|(_, id)| *id)
}

/// All genre names the table knows about, in table order
pub fn genre_names() -> impl Iterator<Item = &'static str> {
    GENRES.iter().map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_genres() {
        assert_eq!(genre_id("comedy"), Some("35"));
        assert_eq!(genre_id("horror"), Some("27"));
        assert_eq!(genre_id("  Horror "), Some("27"));
        assert_eq!(genre_id("Sci-Fi"), Some("878"));
    }

    #[test]
    fn test_unknown_genre() {
        assert_eq!(genre_id("telenovela"), None);
        assert_eq!(genre_id(""), None);
    }

    #[test]
    fn test_cheer_up_genre_is_in_table() {
        assert!(genre_names().any(|name| name == COMEDY));
    }
}
