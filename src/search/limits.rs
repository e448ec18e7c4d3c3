//! Search limits and time allocation.

use std::time::Duration;

use crate::types::Color;
use crate::uci::SearchParams;

/// Depth searched when `go` gives none.
pub const DEFAULT_DEPTH: i32 = 10;

/// Initial per-move time limit in milliseconds. The limit persists across
/// searches until a `go` command replaces it.
pub const DEFAULT_MOVETIME_MS: u64 = 5000;

/// Resolved limits for one search.
#[derive(Debug, Clone, Copy)]
pub struct SearchLimits {
    /// Maximum iterative-deepening depth.
    pub depth: i32,
    /// Wall-clock budget for the whole search.
    pub time_limit: Duration,
}

impl SearchLimits {
    /// Resolve `go` parameters into concrete limits.
    ///
    /// `movetime` sets the budget directly; otherwise the side to move's
    /// remaining clock divided by 20 is used; otherwise `fallback_ms` (the
    /// limit left over from the previous search) applies. `infinite`
    /// overrides the budget entirely and leaves the fallback untouched.
    pub fn from_params(params: &SearchParams, side: Color, fallback_ms: u64) -> Self {
        let depth = params.depth.unwrap_or(DEFAULT_DEPTH);

        let ms = if params.infinite {
            u64::MAX
        } else if let Some(movetime) = params.movetime {
            movetime
        } else {
            let clock = match side {
                Color::White => params.wtime,
                Color::Black => params.btime,
            };
            match clock {
                Some(remaining) => remaining / 20,
                None => fallback_ms,
            }
        };

        Self {
            depth,
            time_limit: Duration::from_millis(ms),
        }
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            time_limit: Duration::from_millis(DEFAULT_MOVETIME_MS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = SearchParams::default();
        let limits = SearchLimits::from_params(&params, Color::White, DEFAULT_MOVETIME_MS);
        assert_eq!(limits.depth, 10);
        assert_eq!(limits.time_limit, Duration::from_millis(5000));
    }

    #[test]
    fn test_movetime_sets_budget() {
        let params = SearchParams {
            movetime: Some(100),
            ..Default::default()
        };
        let limits = SearchLimits::from_params(&params, Color::Black, DEFAULT_MOVETIME_MS);
        assert_eq!(limits.time_limit, Duration::from_millis(100));
    }

    #[test]
    fn test_clock_divided_by_twenty() {
        let params = SearchParams {
            wtime: Some(4000),
            btime: Some(8000),
            ..Default::default()
        };

        let white = SearchLimits::from_params(&params, Color::White, DEFAULT_MOVETIME_MS);
        assert_eq!(white.time_limit, Duration::from_millis(200));

        let black = SearchLimits::from_params(&params, Color::Black, DEFAULT_MOVETIME_MS);
        assert_eq!(black.time_limit, Duration::from_millis(400));
    }

    #[test]
    fn test_depth_overrides_default() {
        let params = SearchParams {
            depth: Some(4),
            ..Default::default()
        };
        let limits = SearchLimits::from_params(&params, Color::White, DEFAULT_MOVETIME_MS);
        assert_eq!(limits.depth, 4);
    }

    #[test]
    fn test_infinite_ignores_clock() {
        let params = SearchParams {
            infinite: true,
            movetime: Some(100),
            ..Default::default()
        };
        let limits = SearchLimits::from_params(&params, Color::White, DEFAULT_MOVETIME_MS);
        assert_eq!(limits.time_limit, Duration::from_millis(u64::MAX));
    }
}
