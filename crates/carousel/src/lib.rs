//! Carousel building: windowing ranked results and rendering them as cards.
//!
//! This crate provides:
//! - `ResultWindow` for picking a contiguous page of results
//! - `CardRenderer` for turning movie records into card descriptions
//! - Adaptive Card JSON output for channels that speak it
//!
//! ## Example Usage
//! ```ignore
//! use carousel::{CardRenderer, ResultWindow};
//!
//! let window = ResultWindow::new(3);
//! let renderer = CardRenderer::new("https://image.tmdb.org/t/p/w200");
//!
//! let shown = window.apply(movies);
//! let cards = renderer.render_all(&shown);
//! ```

pub mod adaptive;
pub mod render;
pub mod window;

// Re-export main types
pub use adaptive::{carousel_attachments, to_adaptive_card};
pub use render::{CardRenderer, OVERVIEW_MAX_CHARS, truncate_overview};
pub use window::{CARDS_IN_CAROUSEL, ResultWindow, window_start};

use domain::{CardDescription, MovieRecord};

/// Window a ranked result list and render what survives, in one call
pub fn build_carousel(
    movies: Vec<MovieRecord>,
    window: &ResultWindow,
    renderer: &CardRenderer,
) -> Vec<CardDescription> {
    let shown = window.apply(movies);
    renderer.render_all(&shown)
}
