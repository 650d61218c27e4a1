//! Curve flattening - turns a cubic Bézier into a polyline.
//!
//! Unlike tolerance-based flattening, the curve is sampled at a fixed
//! number of evenly spaced parameter values, so the caller controls the
//! segment count directly: `steps` intervals means `steps + 1` points
//! and `steps` line segments.
//!
//! The sampling itself is lyon_geom's `CubicBezierSegment::sample`, the
//! standard Bernstein blend
//! `(1-t)^3 P0 + 3(1-t)^2 t P1 + 3(1-t) t^2 P2 + t^3 P3`.

use std::iter::FusedIterator;
use std::num::NonZeroU32;

use lyon_geom::CubicBezierSegment;

use crate::geometry::{Line, Point};

/// A cubic Bézier curve in absolute drawing coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicCurve {
    pub start: Point,
    pub ctrl1: Point,
    pub ctrl2: Point,
    pub end: Point,
}

impl CubicCurve {
    pub fn new(start: Point, ctrl1: Point, ctrl2: Point, end: Point) -> Self {
        Self { start, ctrl1, ctrl2, end }
    }

    fn to_segment(self) -> CubicBezierSegment<f64> {
        CubicBezierSegment {
            from: self.start.into(),
            ctrl1: self.ctrl1.into(),
            ctrl2: self.ctrl2.into(),
            to: self.end.into(),
        }
    }
}

/// Lazy sample sequence over a curve.
///
/// Cheap to clone; a clone restarts from wherever the original was, and
/// calling [`flatten`] again restarts from the beginning.
#[derive(Debug, Clone)]
pub struct Flattened {
    segment: CubicBezierSegment<f64>,
    steps: u32,
    next: u64,
    /// One past the last index to yield (`steps + 1` when fresh).
    end: u64,
}

/// Sample `curve` at `t = i / steps` for every `i` in `0..=steps`.
pub fn flatten(curve: &CubicCurve, steps: NonZeroU32) -> Flattened {
    let steps = steps.get();
    Flattened {
        segment: curve.to_segment(),
        steps,
        next: 0,
        end: u64::from(steps) + 1,
    }
}

impl Flattened {
    fn point_at(&self, i: u64) -> Point {
        // Pin the endpoints so they match the command coordinates exactly.
        if i == 0 {
            return self.segment.from.into();
        }
        if i == u64::from(self.steps) {
            return self.segment.to.into();
        }
        let t = i as f64 / f64::from(self.steps);
        self.segment.sample(t).into()
    }

    /// Consecutive sample pairs as line segments.
    pub fn lines(self) -> impl Iterator<Item = Line> {
        let mut prev: Option<Point> = None;
        self.filter_map(move |p| {
            let line = prev.map(|start| Line::between(start, p));
            prev = Some(p);
            line
        })
    }
}

impl Iterator for Flattened {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.next >= self.end {
            return None;
        }
        let p = self.point_at(self.next);
        self.next += 1;
        Some(p)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.end - self.next).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for Flattened {
    fn next_back(&mut self) -> Option<Point> {
        if self.next >= self.end {
            return None;
        }
        self.end -= 1;
        Some(self.point_at(self.end))
    }
}

impl ExactSizeIterator for Flattened {}

impl FusedIterator for Flattened {}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn steps(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    fn s_curve() -> CubicCurve {
        CubicCurve::new(
            Point::new(10.0, 10.0),
            Point::new(40.0, 10.0),
            Point::new(60.0, 90.0),
            Point::new(90.0, 90.0),
        )
    }

    #[test]
    fn yields_steps_plus_one_points() {
        for n in [1, 2, 3, 10, 64] {
            let points: Vec<Point> = flatten(&s_curve(), steps(n)).collect();
            assert_eq!(points.len(), n as usize + 1, "steps = {}", n);
        }
    }

    #[test]
    fn endpoints_match_curve() {
        let curve = s_curve();
        let points: Vec<Point> = flatten(&curve, steps(7)).collect();
        let first = points.first().unwrap();
        let last = points.last().unwrap();
        assert_abs_diff_eq!(first.x, curve.start.x, epsilon = 1e-12);
        assert_abs_diff_eq!(first.y, curve.start.y, epsilon = 1e-12);
        assert_abs_diff_eq!(last.x, curve.end.x, epsilon = 1e-12);
        assert_abs_diff_eq!(last.y, curve.end.y, epsilon = 1e-12);
    }

    #[test]
    fn single_step_is_the_chord() {
        let curve = s_curve();
        let points: Vec<Point> = flatten(&curve, steps(1)).collect();
        assert_eq!(points, vec![curve.start, curve.end]);
    }

    #[test]
    fn midpoint_uses_bernstein_blend() {
        // At t = 0.5 the weights are 1/8, 3/8, 3/8, 1/8.
        let curve = s_curve();
        let points: Vec<Point> = flatten(&curve, steps(2)).collect();
        let mid = points[1];
        assert_abs_diff_eq!(mid.x, (10.0 + 3.0 * 40.0 + 3.0 * 60.0 + 90.0) / 8.0, epsilon = 1e-9);
        assert_abs_diff_eq!(mid.y, (10.0 + 3.0 * 10.0 + 3.0 * 90.0 + 90.0) / 8.0, epsilon = 1e-9);
    }

    #[test]
    fn degenerate_curve_repeats_one_point() {
        let p = Point::new(3.0, 4.0);
        let curve = CubicCurve::new(p, p, p, p);
        let points: Vec<Point> = flatten(&curve, steps(5)).collect();
        assert_eq!(points.len(), 6);
        for q in points {
            assert_abs_diff_eq!(q.x, 3.0, epsilon = 1e-12);
            assert_abs_diff_eq!(q.y, 4.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn restartable_and_exact_size() {
        let samples = flatten(&s_curve(), steps(4));
        assert_eq!(samples.len(), 5);

        let again = samples.clone();
        let a: Vec<Point> = samples.collect();
        let b: Vec<Point> = again.collect();
        assert_eq!(a, b);

        let reversed: Vec<Point> = flatten(&s_curve(), steps(4)).rev().collect();
        let mut forward = a.clone();
        forward.reverse();
        assert_eq!(reversed, forward);
    }

    #[test]
    fn max_steps_length_does_not_wrap() {
        let curve = s_curve();
        let mut samples = flatten(&curve, NonZeroU32::MAX);

        #[cfg(target_pointer_width = "64")]
        assert_eq!(samples.len(), u32::MAX as usize + 1);
        #[cfg(not(target_pointer_width = "64"))]
        assert_eq!(samples.len(), usize::MAX);

        assert_eq!(samples.next(), Some(curve.start));
        assert_eq!(samples.next_back(), Some(curve.end));
        #[cfg(target_pointer_width = "64")]
        assert_eq!(samples.len(), u32::MAX as usize - 1);
    }

    #[test]
    fn lines_pair_consecutive_samples() {
        let curve = s_curve();
        let lines: Vec<Line> = flatten(&curve, steps(3)).lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].start(), curve.start);
        assert_eq!(lines[2].end(), curve.end);
        assert_eq!(lines[0].end(), lines[1].start());
        assert_eq!(lines[1].end(), lines[2].start());
    }
}
