// ============================================================================
// POINTER
// ============================================================================

use crate::geometry::{GaugeGeometry, Point};

/// Line from the gauge center to the current value on the outer radius,
/// with a round hub over the center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub angle: f64,
    pub hub: Point,
    pub hub_radius: f64,
    pub tip: Point,
    pub width: f32,
}

/// Locates the pointer for `value`. No value means no pointer.
///
/// Nothing is interpolated between calls; every render starts from scratch.
pub fn locate_pointer(
    geometry: &GaugeGeometry,
    value: Option<f64>,
    hub_radius: f64,
    width: f32,
) -> Option<Pointer> {
    let value = value?;
    let angle = geometry.angle_of(value);
    Some(Pointer {
        angle,
        hub: geometry.center(),
        hub_radius,
        tip: geometry.point_at(angle, geometry.outer_radius),
        width,
    })
}
