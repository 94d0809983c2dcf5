//! Property tests for windowing and rendering.
//!
//! These check the quantified guarantees of the carousel builder over
//! arbitrary inputs instead of a handful of fixed cases.

use carousel::{
    CardRenderer, OVERVIEW_MAX_CHARS, ResultWindow, build_carousel, truncate_overview, window_start,
};
use domain::MovieRecord;
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn movies(count: usize) -> Vec<MovieRecord> {
    (0..count)
        .map(|i| MovieRecord::new(i as u64, format!("Movie {}", i)))
        .collect()
}

proptest! {
    #[test]
    fn prop_window_length_is_min_of_total_and_count(
        total in 0usize..200,
        count in 1usize..20,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let shown = ResultWindow::new(count).apply_with_rng(movies(total), &mut rng);
        prop_assert_eq!(shown.len(), total.min(count));
    }

    #[test]
    fn prop_window_start_bounds(
        total in 0usize..200,
        count in 1usize..20,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let start = window_start(total, count, &mut rng);
        if total <= count {
            prop_assert_eq!(start, 0);
        } else {
            prop_assert!(start <= total - count);
        }
    }

    #[test]
    fn prop_window_is_a_contiguous_slice(
        total in 0usize..100,
        count in 1usize..10,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let shown = ResultWindow::new(count).apply_with_rng(movies(total), &mut rng);
        for pair in shown.windows(2) {
            prop_assert_eq!(pair[1].id, pair[0].id + 1);
        }
    }

    #[test]
    fn prop_truncated_overview_is_bounded_prefix(overview in ".{0,600}") {
        let cut = truncate_overview(&overview);
        prop_assert!(cut.chars().count() <= OVERVIEW_MAX_CHARS);
        prop_assert!(overview.starts_with(&cut));
    }

    #[test]
    fn prop_rendered_card_keeps_title(title in "[A-Za-z0-9 :'!?&-]{1,60}") {
        let movie = MovieRecord::new(1, title.clone());
        let card = CardRenderer::new("https://image.tmdb.org/t/p/w200").render(&movie);
        prop_assert_eq!(card.title, title);
        prop_assert_eq!(card.actions.len(), 2);
    }
}

#[test]
fn test_build_carousel_end_to_end() {
    let renderer = CardRenderer::new("https://image.tmdb.org/t/p/w200");
    let mut records = movies(10);
    records[0].overview = "z".repeat(900);

    let cards = build_carousel(records, &ResultWindow::new(3), &renderer);

    assert_eq!(cards.len(), 3);
    for card in &cards {
        assert!(card.overview.chars().count() <= OVERVIEW_MAX_CHARS);
        assert_eq!(card.kicker, "Movie");
    }
}

#[test]
fn test_build_carousel_short_list() {
    let renderer = CardRenderer::new("https://image.tmdb.org/t/p/w200");
    let cards = build_carousel(movies(2), &ResultWindow::new(3), &renderer);
    let titles: Vec<_> = cards.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["Movie 0", "Movie 1"]);
}
