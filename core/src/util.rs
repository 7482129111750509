//! Small helpers for randomization, interpolation, and display formatting.

use rand::{distributions::WeightedIndex, prelude::Distribution, Rng};

/// Uniform sample in `[min, max)`; returns `min` for an empty range.
pub fn random_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    rng.gen_range(min..max)
}

/// Uniform integer in `[min, max]`; returns `min` for an empty range.
pub fn random_int<R: Rng + ?Sized>(rng: &mut R, min: i64, max: i64) -> i64 {
    if max <= min {
        return min;
    }
    rng.gen_range(min..=max)
}

/// Uniformly chosen element of `items`.
pub fn random_choice<'a, R: Rng + ?Sized, T>(rng: &mut R, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(rng.gen_range(0..items.len()))
}

/// Index chosen with probability proportional to its weight.
///
/// Non-positive or non-finite weights count as one. Returns `None` only for
/// an empty slice.
pub fn random_weighted<R: Rng + ?Sized>(rng: &mut R, weights: &[f64]) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }

    let sanitized = weights
        .iter()
        .map(|weight| if *weight > 0.0 && weight.is_finite() { *weight } else { 1.0 });
    match WeightedIndex::new(sanitized) {
        Ok(distribution) => Some(distribution.sample(rng)),
        Err(_) => Some(0),
    }
}

/// Linear interpolation between `a` and `b`.
#[must_use]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Compact currency label: `1.5M`, `12.3K`, or the plain amount below a thousand.
#[must_use]
pub fn format_currency(amount: f64) -> String {
    if amount >= 1_000_000.0 {
        format!("{:.1}M", amount / 1_000_000.0)
    } else if amount >= 1_000.0 {
        format!("{:.1}K", amount / 1_000.0)
    } else {
        format!("{amount}")
    }
}

/// Easing curves mapping progress in `0..=1` to eased progress.
pub mod easing {
    /// No easing.
    #[must_use]
    pub fn linear(t: f32) -> f32 {
        t
    }

    /// Accelerating quadratic.
    #[must_use]
    pub fn ease_in_quad(t: f32) -> f32 {
        t * t
    }

    /// Decelerating quadratic.
    #[must_use]
    pub fn ease_out_quad(t: f32) -> f32 {
        t * (2.0 - t)
    }

    /// Quadratic acceleration until halfway, then deceleration.
    #[must_use]
    pub fn ease_in_out_quad(t: f32) -> f32 {
        if t < 0.5 {
            2.0 * t * t
        } else {
            -1.0 + (4.0 - 2.0 * t) * t
        }
    }

    /// Accelerating cubic.
    #[must_use]
    pub fn ease_in_cubic(t: f32) -> f32 {
        t * t * t
    }

    /// Decelerating cubic.
    #[must_use]
    pub fn ease_out_cubic(t: f32) -> f32 {
        let shifted = t - 1.0;
        shifted * shifted * shifted + 1.0
    }

    /// Cubic acceleration until halfway, then deceleration.
    #[must_use]
    pub fn ease_in_out_cubic(t: f32) -> f32 {
        if t < 0.5 {
            4.0 * t * t * t
        } else {
            (t - 1.0) * (2.0 * t - 2.0) * (2.0 * t - 2.0) + 1.0
        }
    }
}
