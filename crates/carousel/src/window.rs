//! Result windowing: pick which slice of a ranked result list goes into a carousel.
//!
//! This is a "random contiguous page" policy, not random sampling:
//! - `N <= K`: show everything
//! - otherwise: `start = floor(random * floor(N - 1 - K))`, show `[start, start + K)`
//!
//! When `N - 1 - K` is zero the start is always 0.

use rand::Rng;
use tracing::debug;

/// Default number of cards shown in one carousel
pub const CARDS_IN_CAROUSEL: usize = 3;

/// Compute the first index of the window.
///
/// Always satisfies `start + count <= total` when `total > count`.
pub fn window_start<R: Rng>(total: usize, count: usize, rng: &mut R) -> usize {
    if total <= count {
        return 0;
    }
    // total > count, so this cannot underflow
    let span = total - 1 - count;
    if span == 0 { 0 } else { rng.random_range(0..span) }
}

/// Selects a fixed-size contiguous window of results.
#[derive(Debug, Clone, Copy)]
pub struct ResultWindow {
    count: usize,
}

impl ResultWindow {
    /// Create a window showing at most `count` results
    pub fn new(count: usize) -> Self {
        Self { count }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Apply the window using the thread-local generator
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        self.apply_with_rng(items, &mut rand::rng())
    }

    /// Apply the window with an explicit generator (seeded in tests)
    pub fn apply_with_rng<T, R: Rng>(&self, items: Vec<T>, rng: &mut R) -> Vec<T> {
        let total = items.len();
        let start = window_start(total, self.count, rng);
        debug!(
            "Windowing {} results to {} starting at {}",
            total, self.count, start
        );
        items.into_iter().skip(start).take(self.count).collect()
    }
}

impl Default for ResultWindow {
    fn default() -> Self {
        Self::new(CARDS_IN_CAROUSEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_short_list_is_shown_whole() {
        let window = ResultWindow::new(3);
        let mut rng = StdRng::seed_from_u64(7);

        assert_eq!(window.apply_with_rng(vec![1, 2], &mut rng), vec![1, 2]);
        assert_eq!(window.apply_with_rng(vec![1, 2, 3], &mut rng), vec![1, 2, 3]);
        assert!(window.apply_with_rng(Vec::<u8>::new(), &mut rng).is_empty());
    }

    #[test]
    fn test_zero_span_starts_at_zero() {
        // N = 4, K = 3 -> N - 1 - K = 0
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            assert_eq!(window_start(4, 3, &mut rng), 0);
        }
        let window = ResultWindow::new(3);
        assert_eq!(window.apply_with_rng(vec![1, 2, 3, 4], &mut rng), vec![1, 2, 3]);
    }

    #[test]
    fn test_long_list_window_is_contiguous() {
        let window = ResultWindow::new(3);
        let mut rng = StdRng::seed_from_u64(42);
        let items: Vec<u32> = (0..20).collect();

        for _ in 0..50 {
            let picked = window.apply_with_rng(items.clone(), &mut rng);
            assert_eq!(picked.len(), 3);
            assert_eq!(picked[1], picked[0] + 1);
            assert_eq!(picked[2], picked[0] + 2);
            // start < N - 1 - K, so the last element is never shown
            assert!(picked[0] < 16);
        }
    }

    #[test]
    fn test_default_count() {
        assert_eq!(ResultWindow::default().count(), CARDS_IN_CAROUSEL);
    }
}
