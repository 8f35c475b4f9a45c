//! Spin arithmetic: how far to turn the wheel so a chosen slice stops under
//! the pointer, which slice a given rotation lands on, and the eased
//! animation between the two.
//!
//! `resolve(forward(s)) == s.item_index` must hold for every slice.

use std::f64::consts::{FRAC_PI_2, TAU};

use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};

use super::items::WeightedItem;
use super::segments::{Segment, normalize_angle, weight_scale};

/// The pointer sits at the top of the wheel.
pub const POINTER_ANGLE: f64 = -FRAC_PI_2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelConfig {
    pub spin_duration_ms: f64,
    /// Full turns are drawn from `min_turns..max_turns`. Whole turns only:
    /// a fractional turn would move the target away from the pointer.
    pub min_turns: u32,
    pub max_turns: u32,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            spin_duration_ms: 2000.0,
            min_turns: 5,
            max_turns: 8,
        }
    }
}

impl WheelConfig {
    pub fn pick_turns<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        if self.max_turns > self.min_turns {
            rng.gen_range(self.min_turns..self.max_turns)
        } else {
            self.min_turns
        }
    }
}

/// Index of an item drawn with probability proportional to its weight.
pub fn pick_weighted<R: Rng + ?Sized>(items: &[WeightedItem], rng: &mut R) -> Option<usize> {
    let scale = weight_scale(items.iter().map(|i| i.weight));
    if !scale.is_finite() || scale <= 0.0 {
        return None;
    }
    let dist = WeightedIndex::new(items.iter().map(|i| i.weight / scale)).ok()?;
    Some(dist.sample(rng))
}

pub fn ease_out_cubic(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(3)
}

/// Forward and inverse mapping between slices and wheel rotations.
#[derive(Clone, Copy, Debug)]
pub struct SpinResolver<'a> {
    segments: &'a [Segment],
}

impl<'a> SpinResolver<'a> {
    pub fn new(segments: &'a [Segment]) -> Self {
        Self { segments }
    }

    /// Total rotation that brings the midpoint of `segment` under the
    /// pointer after `full_turns` whole revolutions.
    pub fn rotation_for(segment: &Segment, full_turns: u32) -> f64 {
        let delta = normalize_angle(POINTER_ANGLE - segment.midpoint());
        full_turns as f64 * TAU + delta
    }

    /// `rotation_for` looked up by item index.
    pub fn forward(&self, item_index: usize, full_turns: u32) -> Option<f64> {
        self.segments
            .iter()
            .find(|s| s.item_index == item_index)
            .map(|s| Self::rotation_for(s, full_turns))
    }

    /// Item under the pointer once the wheel has turned by `rotation`.
    /// `None` means the slices do not cover the circle, which is a bug.
    pub fn resolve(&self, rotation: f64) -> Option<usize> {
        let effective = normalize_angle(POINTER_ANGLE - normalize_angle(rotation));
        let found = self
            .segments
            .iter()
            .find(|s| s.contains(effective))
            .map(|s| s.item_index);
        if found.is_none() && !self.segments.is_empty() {
            log::error!("no segment under the pointer at rotation {}", rotation);
        }
        found
    }
}

/// Eased rotation from 0 to `total_rotation` over a fixed duration, stepped
/// by an external frame driver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpinAnimation {
    total_rotation: f64,
    duration_ms: f64,
    elapsed_ms: f64,
}

impl SpinAnimation {
    pub fn new(total_rotation: f64, duration_ms: f64) -> Self {
        Self {
            total_rotation,
            duration_ms: duration_ms.max(0.0),
            elapsed_ms: 0.0,
        }
    }

    pub fn total_rotation(&self) -> f64 {
        self.total_rotation
    }

    pub fn progress(&self) -> f64 {
        if self.duration_ms <= 0.0 {
            1.0
        } else {
            (self.elapsed_ms / self.duration_ms).min(1.0)
        }
    }

    /// Moves to `elapsed_ms` since the spin began and returns the rotation to
    /// draw. Reaches exactly `total_rotation` once the duration has passed.
    pub fn advance(&mut self, elapsed_ms: f64) -> f64 {
        self.elapsed_ms = elapsed_ms.max(self.elapsed_ms);
        self.rotation()
    }

    pub fn rotation(&self) -> f64 {
        if self.is_finished() {
            self.total_rotation
        } else {
            self.total_rotation * ease_out_cubic(self.progress())
        }
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wheel::segments::build_segments;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn assert_round_trip(weights: &[f64]) {
        let segments = build_segments(weights.iter().copied().enumerate());
        let resolver = SpinResolver::new(&segments);
        for turns in 5..8 {
            for seg in &segments {
                let rotation = resolver.forward(seg.item_index, turns).unwrap();
                assert_eq!(
                    resolver.resolve(rotation),
                    Some(seg.item_index),
                    "weights {:?}, segment {:?}, turns {}",
                    weights,
                    seg,
                    turns
                );
            }
        }
    }

    #[test]
    fn test_round_trip_single_segment() {
        assert_round_trip(&[1.0]);
    }

    #[test]
    fn test_round_trip_two_segments() {
        assert_round_trip(&[1.0, 1.0]);
        assert_round_trip(&[1.0, 9.0]);
    }

    #[test]
    fn test_round_trip_ten_segments() {
        assert_round_trip(&[1.0; 10]);
        assert_round_trip(&[0.5, 3.0, 1.0, 1.0, 7.0, 0.25, 2.0, 1.0, 4.0, 1.5]);
    }

    #[test]
    fn test_segment_straddling_zero_resolves() {
        // First slice runs from -π/2 to past 0, i.e. it wraps when normalized.
        let segments = build_segments([(0, 3.0), (1, 1.0)]);
        let start = normalize_angle(segments[0].start_angle);
        let end = normalize_angle(segments[0].end_angle);
        assert!(start > end);
        let resolver = SpinResolver::new(&segments);
        let rotation = resolver.forward(0, 6).unwrap();
        assert_eq!(resolver.resolve(rotation), Some(0));
    }

    #[test]
    fn test_weighted_scenario() {
        let segments = build_segments([(0, 1.0), (1, 1.0), (2, 2.0)]);
        let resolver = SpinResolver::new(&segments);
        let rotation = resolver.forward(2, 5).unwrap();
        assert_eq!(resolver.resolve(rotation), Some(2));
    }

    #[test]
    fn test_resolve_on_empty_wheel() {
        assert_eq!(SpinResolver::new(&[]).resolve(1.0), None);
    }

    #[test]
    fn test_animation_eases_out_and_lands_exactly() {
        let mut anim = SpinAnimation::new(40.0, 2000.0);
        assert_eq!(anim.advance(0.0), 0.0);
        let half = anim.advance(1000.0);
        // ease-out: half the time covers 7/8 of the distance
        assert!((half - 35.0).abs() < 1e-9);
        assert!(!anim.is_finished());
        assert_eq!(anim.advance(2500.0), 40.0);
        assert!(anim.is_finished());
        // time never runs backwards
        assert_eq!(anim.advance(100.0), 40.0);
    }

    #[test]
    fn test_pick_turns_in_range() {
        let config = WheelConfig::default();
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            let turns = config.pick_turns(&mut rng);
            assert!((5..8).contains(&turns));
        }
    }

    #[test]
    fn test_pick_weighted_prefers_heavy_items() {
        let items = vec![WeightedItem::new("light", 1.0), WeightedItem::new("heavy", 99.0)];
        let mut rng = StdRng::seed_from_u64(5);
        let heavy = (0..1000)
            .filter(|_| pick_weighted(&items, &mut rng) == Some(1))
            .count();
        assert!(heavy > 900);
        assert_eq!(pick_weighted(&[], &mut rng), None);
    }

    #[test]
    fn test_pick_weighted_with_overflowing_total() {
        let items = vec![WeightedItem::new("a", 1e308), WeightedItem::new("b", 1e308)];
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..50 {
            assert!(matches!(pick_weighted(&items, &mut rng), Some(0 | 1)));
        }
    }

    #[test]
    fn test_ease_out_cubic_bounds() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_out_cubic(2.0), 1.0);
    }
}
