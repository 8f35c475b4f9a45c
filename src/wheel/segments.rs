//! Partition of the wheel into weighted angular slices.
//!
//! Angles are radians in canvas convention (0 = 3 o'clock, growing
//! clockwise on screen). Slices start at the top of the wheel.

use std::f64::consts::{FRAC_PI_2, TAU};

use serde::Serialize;

/// Angle of the first slice's leading edge: straight up.
pub const START_ANGLE: f64 = -FRAC_PI_2;

/// Maps any angle into `[0, 2π)`.
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round tiny negatives up to exactly TAU
    if a >= TAU { 0.0 } else { a }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub start_angle: f64,
    pub end_angle: f64,
    pub item_index: usize,
}

impl Segment {
    pub fn width(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    pub fn midpoint(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }

    /// Whether normalized `angle` falls in `[start, end)`, taking slices
    /// that wrap through 0 into account. A slice spanning the whole circle
    /// contains every angle.
    pub fn contains(&self, angle: f64) -> bool {
        if self.width() >= TAU {
            return true;
        }
        let angle = normalize_angle(angle);
        let start = normalize_angle(self.start_angle);
        let end = normalize_angle(self.end_angle);
        if start <= end {
            angle >= start && angle < end
        } else {
            angle >= start || angle < end
        }
    }
}

/// Divisor that keeps `Σ(w / scale)` finite: 1 normally, the largest
/// weight when the plain sum overflows.
pub fn weight_scale<I>(weights: I) -> f64
where
    I: IntoIterator<Item = f64>,
    I::IntoIter: Clone,
{
    let weights = weights.into_iter();
    let total: f64 = weights.clone().sum();
    if total.is_finite() {
        1.0
    } else {
        weights.fold(0.0, f64::max)
    }
}

/// Builds contiguous slices, in list order, each `2π · w / Σw` wide.
pub fn build_segments<I>(weights: I) -> Vec<Segment>
where
    I: IntoIterator<Item = (usize, f64)>,
{
    let mut weights: Vec<(usize, f64)> = weights.into_iter().collect();
    let scale = weight_scale(weights.iter().map(|(_, w)| *w));
    for (_, w) in &mut weights {
        *w /= scale;
    }
    let total: f64 = weights.iter().map(|(_, w)| *w).sum();
    if weights.is_empty() || !total.is_finite() || total <= 0.0 {
        return Vec::new();
    }

    let mut cursor = START_ANGLE;
    let mut segments: Vec<Segment> = weights
        .iter()
        .map(|&(item_index, weight)| {
            let start_angle = cursor;
            cursor += weight / total * TAU;
            Segment {
                start_angle,
                end_angle: cursor,
                item_index,
            }
        })
        .collect();

    // Pin the closing edge so accumulated rounding leaves no gap at the top.
    if let Some(last) = segments.last_mut() {
        last.end_angle = START_ANGLE + TAU;
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_widths_follow_weights() {
        let segs = build_segments([(0, 1.0), (1, 1.0), (2, 2.0)]);
        let widths: Vec<f64> = segs.iter().map(Segment::width).collect();
        assert!((widths[0] - PI / 2.0).abs() < EPS);
        assert!((widths[1] - PI / 2.0).abs() < EPS);
        assert!((widths[2] - PI).abs() < EPS);
        assert_eq!(segs[0].start_angle, START_ANGLE);
    }

    #[test]
    fn test_partition_is_complete_and_contiguous() {
        let weights: Vec<(usize, f64)> = (0..10).map(|i| (i, 0.5 + i as f64 * 0.7)).collect();
        let segs = build_segments(weights);
        let total: f64 = segs.iter().map(Segment::width).sum();
        assert!((total - TAU).abs() < EPS);
        for pair in segs.windows(2) {
            assert_eq!(pair[0].end_angle, pair[1].start_angle);
        }
    }

    #[test]
    fn test_every_angle_has_exactly_one_owner() {
        let segs = build_segments([(0, 3.0), (1, 1.0), (2, 1.0), (3, 5.0)]);
        for step in 0..720 {
            let angle = step as f64 * TAU / 720.0;
            let owners = segs.iter().filter(|s| s.contains(angle)).count();
            assert_eq!(owners, 1, "angle {} owned by {} segments", angle, owners);
        }
    }

    #[test]
    fn test_single_segment_covers_circle() {
        let segs = build_segments([(0, 7.0)]);
        assert_eq!(segs.len(), 1);
        assert!(segs[0].contains(0.0));
        assert!(segs[0].contains(3.0 * FRAC_PI_2));
    }

    #[test]
    #[allow(overflowing_literals)]
    fn test_huge_weights_keep_proportions() {
        let segs = build_segments([(0, 1e308), (1, 1e308), (2, 2e308 / 4.0)]);
        let widths: Vec<f64> = segs.iter().map(Segment::width).collect();
        assert!((widths[0] - TAU * 0.4).abs() < EPS);
        assert!((widths[1] - TAU * 0.4).abs() < EPS);
        assert!((widths[2] - TAU * 0.2).abs() < EPS);
        assert_eq!(weight_scale([1e308, 1e308]), 1e308);
        assert_eq!(weight_scale([1.0, 2.0]), 1.0);
    }

    #[test]
    fn test_infinite_weight_builds_nothing() {
        assert!(build_segments([(0, f64::INFINITY), (1, 1.0)]).is_empty());
    }

    #[test]
    fn test_empty_list_builds_nothing() {
        assert!(build_segments(Vec::new()).is_empty());
    }

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(-FRAC_PI_2) - 3.0 * FRAC_PI_2).abs() < EPS);
        assert_eq!(normalize_angle(TAU), 0.0);
        assert_eq!(normalize_angle(-1e-20), 0.0);
        assert!(normalize_angle(-1e-20) < TAU);
    }
}
