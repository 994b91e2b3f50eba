//! Uniform sample grid and monotonic segment lookup.
//!
//! The grid starts at the first pose timestamp and steps by `1 / frequency`.
//! A trailing interval shorter than one step is dropped, so the last grid
//! point is at or before the last pose:
//!
//! `count = floor((t_last - t_first) * frequency) + 1`

use crate::config::ResampleConfig;
use crate::error::{ResampleError, Result};

/// Implicit uniform time axis over `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleGrid {
    start: f64,
    end: f64,
    frequency: f64,
    count: usize,
}

impl SampleGrid {
    /// Build the grid spanning `[start, end]` at `config.frequency`.
    ///
    /// Expects a validated config and `end >= start`.
    ///
    /// # Errors
    ///
    /// Returns [`ResampleError::InvalidConfig`] when the grid would have
    /// more than `config.max_samples` points.
    pub fn new(start: f64, end: f64, config: &ResampleConfig) -> Result<Self> {
        let steps = ((end - start) * config.frequency + config.time_epsilon).floor();

        // NaN fails both comparisons; below the cap the cast cannot overflow
        if !(steps >= 0.0 && steps < config.max_samples as f64) {
            return Err(ResampleError::invalid_config(format!(
                "{} Hz over {:.6} s exceeds max_samples ({})",
                config.frequency,
                end - start,
                config.max_samples
            )));
        }

        Ok(Self {
            start,
            end,
            frequency: config.frequency,
            count: steps as usize + 1,
        })
    }

    /// Number of grid points.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Always false; the grid contains at least its start point.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Time of grid point `k`.
    ///
    /// Computed as `start + k / frequency` rather than by accumulation, and
    /// clamped to `end` so tolerance-admitted points never leave the span.
    #[must_use]
    pub fn time(&self, k: usize) -> f64 {
        (self.start + k as f64 / self.frequency).min(self.end)
    }

    /// Iterate over grid times in increasing order.
    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.count).map(move |k| self.time(k))
    }
}

/// Forward-only cursor over the segments of a knot sequence.
///
/// Queries must arrive in non-decreasing time order; the cursor then only
/// ever moves forward, so a full grid sweep costs O(knots + queries).
#[derive(Debug, Clone, Default)]
pub struct SegmentCursor {
    segment: usize,
}

impl SegmentCursor {
    /// Cursor positioned on the first segment.
    #[must_use]
    pub const fn new() -> Self {
        Self { segment: 0 }
    }

    /// Index `i` of the segment `[knots[i], knots[i + 1]]` holding `t`.
    ///
    /// A time exactly on an interior knot belongs to the segment starting
    /// there; the last knot belongs to the last segment.
    pub fn locate(&mut self, knots: &[f64], t: f64) -> usize {
        debug_assert!(knots.len() >= 2);
        debug_assert!(t >= knots[self.segment]);

        let last_segment = knots.len() - 2;
        while self.segment < last_segment && t >= knots[self.segment + 1] {
            self.segment += 1;
        }
        self.segment
    }
}
