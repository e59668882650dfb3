// ============================================================================
// GAUGE GEOMETRY & ANGLE MAPPING
// ============================================================================
//
// Angles are radians measured clockwise from the vertical "up" axis, so a
// point at radius `r` on angle `a` is `(cx + r sin a, cy - r cos a)` in screen
// coordinates (y grows downwards).

use std::f64::consts::{FRAC_PI_2, TAU};

use crate::error::GaugeError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Area of the host view the gauge is laid out in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Linear value-to-angle transform.
///
/// Values outside `[value_min, value_max]` extrapolate past the arc ends.
/// The caller guarantees `value_min != value_max`.
pub fn value_to_angle(
    value: f64,
    value_min: f64,
    value_max: f64,
    start_angle: f64,
    end_angle: f64,
) -> f64 {
    start_angle + (value - value_min) / (value_max - value_min) * (end_angle - start_angle)
}

/// Everything the tick, pointer and label components need to place marks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeGeometry {
    pub cx: f64,
    pub cy: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub value_min: f64,
    pub value_max: f64,
}

impl GaugeGeometry {
    /// Builds a geometry, rejecting value domains the angle mapper cannot
    /// divide by and arcs that sweep no angle. Radii are normalized so that
    /// `outer >= inner >= 0`.
    pub fn new(
        center: Point,
        inner_radius: f64,
        outer_radius: f64,
        (start_angle, end_angle): (f64, f64),
        (value_min, value_max): (f64, f64),
    ) -> Result<Self, GaugeError> {
        let span = value_max - value_min;
        if span == 0.0 || !span.is_finite() {
            return Err(GaugeError::DegenerateDomain {
                min: value_min,
                max: value_max,
            });
        }
        if start_angle == end_angle || !start_angle.is_finite() || !end_angle.is_finite() {
            return Err(GaugeError::DegenerateArc {
                start: start_angle,
                end: end_angle,
            });
        }
        let outer_radius = outer_radius.max(0.0);
        Ok(Self {
            cx: center.x,
            cy: center.y,
            inner_radius: inner_radius.clamp(0.0, outer_radius),
            outer_radius,
            start_angle,
            end_angle,
            value_min,
            value_max,
        })
    }

    /// Fits the arc into `bounds`: the largest outer radius whose arc (and
    /// center) fits inside the bounds minus `margin`, centered.
    pub fn fit(
        bounds: Bounds,
        margin: f64,
        inner_radius_ratio: f64,
        angles: (f64, f64),
        domain: (f64, f64),
    ) -> Result<Self, GaugeError> {
        let (min_x, max_x, min_y, max_y) = arc_unit_extents(angles.0, angles.1);
        let (box_w, box_h) = (max_x - min_x, max_y - min_y);

        let avail_w = (bounds.width - 2.0 * margin).max(0.0);
        let avail_h = (bounds.height - 2.0 * margin).max(0.0);
        let outer_radius = (avail_w / box_w).min(avail_h / box_h).max(0.0);

        let cx = bounds.x + margin + (avail_w - box_w * outer_radius) / 2.0 - min_x * outer_radius;
        let cy = bounds.y + margin + (avail_h - box_h * outer_radius) / 2.0 - min_y * outer_radius;

        Self::new(
            Point::new(cx, cy),
            outer_radius * inner_radius_ratio,
            outer_radius,
            angles,
            domain,
        )
    }

    pub fn center(&self) -> Point {
        Point::new(self.cx, self.cy)
    }

    pub fn angle_of(&self, value: f64) -> f64 {
        value_to_angle(
            value,
            self.value_min,
            self.value_max,
            self.start_angle,
            self.end_angle,
        )
    }

    /// Point at `radius` along the ray at `angle` from the center.
    pub fn point_at(&self, angle: f64, radius: f64) -> Point {
        Point::new(
            self.cx + radius * angle.sin(),
            self.cy - radius * angle.cos(),
        )
    }
}

/// Bounding box of the unit arc between two angles, including the center.
/// Returns `(min_x, max_x, min_y, max_y)`.
fn arc_unit_extents(start_angle: f64, end_angle: f64) -> (f64, f64, f64, f64) {
    let (lo, hi) = (start_angle.min(end_angle), start_angle.max(end_angle));
    if hi - lo >= TAU {
        return (-1.0, 1.0, -1.0, 1.0);
    }

    let mut extents = (0.0_f64, 0.0_f64, 0.0_f64, 0.0_f64);
    let mut include = |angle: f64| {
        let (x, y) = (angle.sin(), -angle.cos());
        extents.0 = extents.0.min(x);
        extents.1 = extents.1.max(x);
        extents.2 = extents.2.min(y);
        extents.3 = extents.3.max(y);
    };
    include(lo);
    include(hi);
    let first = (lo / FRAC_PI_2).ceil() as i64;
    let last = (hi / FRAC_PI_2).floor() as i64;
    for k in first..=last {
        include(k as f64 * FRAC_PI_2);
    }
    extents
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DEFAULT_ANGLES: (f64, f64) = (
        -110.0 * std::f64::consts::PI / 180.0,
        110.0 * std::f64::consts::PI / 180.0,
    );

    #[test]
    fn maps_domain_ends_to_arc_ends() {
        let (start, end) = DEFAULT_ANGLES;
        assert_eq!(value_to_angle(-500.0, -500.0, 500.0, start, end), start);
        assert!((value_to_angle(500.0, -500.0, 500.0, start, end) - end).abs() < 1e-12);
        assert!(value_to_angle(0.0, -500.0, 500.0, start, end).abs() < 1e-12);
    }

    #[test]
    fn out_of_range_values_extrapolate() {
        let (start, end) = DEFAULT_ANGLES;
        assert!(value_to_angle(600.0, -500.0, 500.0, start, end) > end);
        assert!(value_to_angle(-600.0, -500.0, 500.0, start, end) < start);
    }

    #[test]
    fn rejects_degenerate_domain() {
        let result = GaugeGeometry::new(Point::new(0.0, 0.0), 8.0, 10.0, DEFAULT_ANGLES, (3.0, 3.0));
        assert!(matches!(result, Err(GaugeError::DegenerateDomain { .. })));
        let result = GaugeGeometry::new(
            Point::new(0.0, 0.0),
            8.0,
            10.0,
            DEFAULT_ANGLES,
            (0.0, f64::INFINITY),
        );
        assert!(result.is_err());
    }

    #[test]
    fn rejects_arc_without_sweep() {
        let result = GaugeGeometry::new(Point::new(0.0, 0.0), 8.0, 10.0, (0.5, 0.5), (0.0, 1.0));
        assert!(matches!(
            result,
            Err(GaugeError::DegenerateArc { start, end }) if start == 0.5 && end == 0.5
        ));
        let result = GaugeGeometry::new(Point::new(0.0, 0.0), 8.0, 10.0, (0.0, f64::NAN), (0.0, 1.0));
        assert!(matches!(result, Err(GaugeError::DegenerateArc { .. })));
        let result = GaugeGeometry::fit(
            Bounds::new(0.0, 0.0, 100.0, 100.0),
            0.0,
            0.8,
            (1.0, 1.0),
            (0.0, 1.0),
        );
        assert!(result.is_err());
    }

    #[test]
    fn clamps_inner_radius_into_outer() {
        let geometry =
            GaugeGeometry::new(Point::new(0.0, 0.0), 12.0, 10.0, DEFAULT_ANGLES, (0.0, 1.0)).unwrap();
        assert_eq!(geometry.inner_radius, 10.0);
        let geometry =
            GaugeGeometry::new(Point::new(0.0, 0.0), -2.0, 10.0, DEFAULT_ANGLES, (0.0, 1.0)).unwrap();
        assert_eq!(geometry.inner_radius, 0.0);
    }

    #[test]
    fn point_at_zero_angle_is_straight_up() {
        let geometry =
            GaugeGeometry::new(Point::new(50.0, 50.0), 8.0, 10.0, DEFAULT_ANGLES, (0.0, 1.0)).unwrap();
        let p = geometry.point_at(0.0, 10.0);
        assert!((p.x - 50.0).abs() < 1e-12);
        assert!((p.y - 40.0).abs() < 1e-12);
        let p = geometry.point_at(FRAC_PI_2, 10.0);
        assert!((p.x - 60.0).abs() < 1e-12);
        assert!((p.y - 50.0).abs() < 1e-12);
    }

    #[test]
    fn fit_centers_default_arc_horizontally() {
        let bounds = Bounds::new(0.0, 0.0, 400.0, 200.0);
        let geometry = GaugeGeometry::fit(bounds, 10.0, 0.8, DEFAULT_ANGLES, (-500.0, 500.0)).unwrap();
        assert!((geometry.cx - 200.0).abs() < 1e-9);
        // Height limits the radius: 180 / (1 + cos 70°).
        let expected = 180.0 / (1.0 + 70.0_f64.to_radians().cos());
        assert!((geometry.outer_radius - expected).abs() < 1e-9);
        assert!((geometry.inner_radius - expected * 0.8).abs() < 1e-9);
        // Arc top touches the top margin.
        assert!((geometry.cy - geometry.outer_radius - 10.0).abs() < 1e-9);
    }

    #[test]
    fn fit_full_circle_uses_square_box() {
        let bounds = Bounds::new(0.0, 0.0, 200.0, 100.0);
        let geometry = GaugeGeometry::fit(bounds, 0.0, 0.5, (0.0, TAU), (0.0, 1.0)).unwrap();
        assert!((geometry.outer_radius - 50.0).abs() < 1e-9);
        assert!((geometry.cx - 100.0).abs() < 1e-9);
        assert!((geometry.cy - 50.0).abs() < 1e-9);
    }

    #[test]
    fn fit_tiny_container_gives_zero_radius() {
        let bounds = Bounds::new(0.0, 0.0, 5.0, 5.0);
        let geometry = GaugeGeometry::fit(bounds, 10.0, 0.8, DEFAULT_ANGLES, (0.0, 1.0)).unwrap();
        assert_eq!(geometry.outer_radius, 0.0);
        assert_eq!(geometry.inner_radius, 0.0);
    }

    proptest! {
        #[test]
        fn prop_angle_mapper_monotonic(
            a in -1000.0f64..1000.0,
            b in -1000.0f64..1000.0,
            min in -1000.0f64..0.0,
            span in 1.0f64..1000.0,
        ) {
            let (start, end) = DEFAULT_ANGLES;
            let max = min + span;
            let (lo, hi) = (a.min(b), a.max(b));
            prop_assert!(value_to_angle(lo, min, max, start, end) <= value_to_angle(hi, min, max, start, end));
        }

        #[test]
        fn prop_angle_mapper_hits_both_ends(
            min in -1000.0f64..1000.0,
            span in 0.001f64..1000.0,
            start in -3.0f64..0.0,
            sweep in 0.1f64..6.0,
        ) {
            let max = min + span;
            let end = start + sweep;
            prop_assert!((value_to_angle(min, min, max, start, end) - start).abs() < 1e-9);
            prop_assert!((value_to_angle(max, min, max, start, end) - end).abs() < 1e-9);
        }
    }
}
