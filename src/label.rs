// ============================================================================
// LABEL PLACEMENT
// ============================================================================

use crate::geometry::{GaugeGeometry, Point};

/// Horizontal alignment of a text block relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    /// Text starts at the anchor.
    Start,
    Middle,
    /// Text ends at the anchor.
    End,
}

/// Vertical alignment of a text block relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Baseline {
    /// Top of the text sits on the anchor.
    Hanging,
    /// Text is vertically centered on the anchor.
    Central,
    /// Alphabetic baseline sits on the anchor.
    Auto,
}

/// Where a gauge-level label (unit, value) goes relative to the center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelPosition {
    #[default]
    Central,
    Above,
    Below,
}

/// Which side of a major tick its label is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickLabelSide {
    /// Tick is in the left part of the gauge; the label extends rightwards.
    Right,
    /// Tick is in the right part of the gauge; the label extends leftwards.
    Left,
    /// Tick is near the middle; the label hangs below the point.
    Central,
}

/// Resolved anchor coordinate plus alignment for one piece of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextPlacement {
    pub x: f64,
    pub y: f64,
    pub anchor: TextAnchor,
    pub baseline: Baseline,
}

/// Places the unit/value label of the gauge.
///
/// `Below` never goes lower than the highest of the arc's end caps, so the
/// value text cannot run into the arc when the span opens upwards.
pub fn place_gauge_label(geometry: &GaugeGeometry, position: LabelPosition) -> TextPlacement {
    let y = match position {
        LabelPosition::Central => geometry.cy,
        LabelPosition::Above => geometry.cy - geometry.inner_radius / 2.0,
        LabelPosition::Below => {
            let below = geometry.cy + geometry.inner_radius / 2.0;
            below.min(arc_cap_top(geometry))
        }
    };
    let baseline = match position {
        LabelPosition::Central => Baseline::Central,
        LabelPosition::Above | LabelPosition::Below => Baseline::Auto,
    };
    TextPlacement {
        x: geometry.cx,
        y,
        anchor: TextAnchor::Middle,
        baseline,
    }
}

/// Smallest y among both radii at both arc ends.
fn arc_cap_top(geometry: &GaugeGeometry) -> f64 {
    [geometry.start_angle, geometry.end_angle]
        .into_iter()
        .flat_map(|angle| {
            [geometry.outer_radius, geometry.inner_radius]
                .map(|radius| geometry.cy - radius * angle.cos())
        })
        .fold(f64::INFINITY, f64::min)
}

/// Picks the label side for a major tick from the x of its inner endpoint.
///
/// Assumes the gauge is horizontally centered in a container starting at
/// x = 0, so that `cx` is about half the container width.
pub fn tick_label_side(geometry: &GaugeGeometry, inner: Point) -> TickLabelSide {
    let half_cx = geometry.cx / 2.0;
    if inner.x < half_cx {
        TickLabelSide::Right
    } else if inner.x > geometry.cx + half_cx {
        TickLabelSide::Left
    } else {
        TickLabelSide::Central
    }
}

pub fn place_tick_label(inner: Point, side: TickLabelSide, offset: f64) -> TextPlacement {
    match side {
        TickLabelSide::Right => TextPlacement {
            x: inner.x + offset,
            y: inner.y,
            anchor: TextAnchor::Start,
            baseline: Baseline::Central,
        },
        TickLabelSide::Left => TextPlacement {
            x: inner.x - offset,
            y: inner.y,
            anchor: TextAnchor::End,
            baseline: Baseline::Central,
        },
        TickLabelSide::Central => TextPlacement {
            x: inner.x,
            y: inner.y + offset,
            anchor: TextAnchor::Middle,
            baseline: Baseline::Hanging,
        },
    }
}

/// Shortest decimal text that reads back as `value`; `-0` prints as `0`.
pub fn format_tick_value(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}
