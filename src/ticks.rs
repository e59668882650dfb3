// ============================================================================
// TICK GENERATION
// ============================================================================

use crate::geometry::{GaugeGeometry, Point};
use crate::label::{self, TextPlacement, TickLabelSide};

/// Stroke parameters shared by every tick of one gauge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickStyle {
    /// How far a major tick reaches inside the inner radius.
    pub major_inset: f64,
    pub major_width: f32,
    pub minor_width: f32,
    pub label_offset: f64,
}

impl Default for TickStyle {
    fn default() -> Self {
        Self {
            major_inset: 10.0,
            major_width: 2.0,
            minor_width: 1.0,
            label_offset: 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickLabel {
    pub side: TickLabelSide,
    pub placement: TextPlacement,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickKind {
    Major(TickLabel),
    Minor,
}

/// One graduation mark on the gauge scale.
#[derive(Debug, Clone, PartialEq)]
pub struct TickMark {
    pub value: f64,
    pub angle: f64,
    pub inner: Point,
    pub outer: Point,
    pub width: f32,
    pub kind: TickKind,
}

impl TickMark {
    pub fn is_major(&self) -> bool {
        matches!(self.kind, TickKind::Major(_))
    }

    pub fn label(&self) -> Option<&TickLabel> {
        match &self.kind {
            TickKind::Major(label) => Some(label),
            TickKind::Minor => None,
        }
    }
}

/// Values of the major ticks, evenly spaced over `[min, max]` inclusive.
///
/// Fewer than two majors cannot span the domain, so they yield nothing.
pub fn major_values(value_min: f64, value_max: f64, major_ticks: usize) -> Vec<f64> {
    if major_ticks < 2 {
        return Vec::new();
    }
    let step = (value_max - value_min) / (major_ticks - 1) as f64;
    (0..major_ticks)
        .map(|i| value_min + i as f64 * step)
        .collect()
}

/// Values of the minor ticks, `minor_per_major` strictly inside each
/// interval between adjacent majors.
pub fn minor_values(
    value_min: f64,
    value_max: f64,
    major_ticks: usize,
    minor_per_major: usize,
) -> Vec<f64> {
    if major_ticks < 2 {
        return Vec::new();
    }
    let step = (value_max - value_min) / (major_ticks - 1) as f64;
    (0..major_ticks - 1)
        .flat_map(|i| {
            (0..minor_per_major).map(move |j| {
                let fraction = (j + 1) as f64 / (minor_per_major + 1) as f64;
                value_min + (i as f64 + fraction) * step
            })
        })
        .collect()
}

/// Builds every tick mark of the gauge: majors first, then minors.
pub fn generate_ticks(
    geometry: &GaugeGeometry,
    major_ticks: usize,
    minor_per_major: usize,
    style: &TickStyle,
) -> Vec<TickMark> {
    let majors = major_values(geometry.value_min, geometry.value_max, major_ticks)
        .into_iter()
        .map(|value| major_tick(geometry, value, style));
    let minors = minor_values(
        geometry.value_min,
        geometry.value_max,
        major_ticks,
        minor_per_major,
    )
    .into_iter()
    .map(|value| minor_tick(geometry, value, style));
    majors.chain(minors).collect()
}

fn major_tick(geometry: &GaugeGeometry, value: f64, style: &TickStyle) -> TickMark {
    let angle = geometry.angle_of(value);
    let inner = geometry.point_at(angle, geometry.inner_radius - style.major_inset);
    let outer = geometry.point_at(angle, geometry.outer_radius);
    let side = label::tick_label_side(geometry, inner);
    TickMark {
        value,
        angle,
        inner,
        outer,
        width: style.major_width,
        kind: TickKind::Major(TickLabel {
            side,
            placement: label::place_tick_label(inner, side, style.label_offset),
            text: label::format_tick_value(value),
        }),
    }
}

fn minor_tick(geometry: &GaugeGeometry, value: f64, style: &TickStyle) -> TickMark {
    let angle = geometry.angle_of(value);
    TickMark {
        value,
        angle,
        inner: geometry.point_at(angle, geometry.inner_radius),
        outer: geometry.point_at(angle, geometry.outer_radius),
        width: style.minor_width,
        kind: TickKind::Minor,
    }
}
