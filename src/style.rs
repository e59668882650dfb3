// ============================================================================
// VISUAL STYLE
// ============================================================================

use bon::Builder;
use std::path::PathBuf;

/// Color representation for gauge elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn as_tuple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

/// Everything about how a gauge looks that is not part of the persisted
/// per-instance configuration.
///
/// Angles are radians measured clockwise from "up".
#[derive(Debug, Clone, Builder)]
pub struct GaugeStyle {
    // Arc geometry
    #[builder(default = (-110.0_f64).to_radians())]
    pub start_angle: f64,
    #[builder(default = 110.0_f64.to_radians())]
    pub end_angle: f64,
    #[builder(default = 0.8)]
    pub inner_radius_ratio: f64,
    #[builder(default = 10.0)]
    pub margin: f64,
    #[builder(default = 40.0)]
    pub header_height: f64,

    // Ticks
    #[builder(default = 10.0)]
    pub major_tick_inset: f64,
    #[builder(default = 2.0)]
    pub major_tick_width: f32,
    #[builder(default = 1.0)]
    pub minor_tick_width: f32,
    #[builder(default = 4.0)]
    pub tick_label_offset: f64,

    // Pointer
    #[builder(default = 3.0)]
    pub pointer_width: f32,
    #[builder(default = 5.0)]
    pub pointer_hub_radius: f64,

    // Fonts
    #[builder(default = 13.0)]
    pub tick_font_size: f32,
    #[builder(default = 14.0)]
    pub unit_font_size: f32,
    #[builder(default = 24.0)]
    pub value_font_size: f32,
    #[builder(default = 20.0)]
    pub header_font_size: f32,
    pub font_path: Option<PathBuf>,

    // Palette
    #[builder(default = Color::new(0xff, 0xff, 0xff))]
    pub background_color: Color,
    #[builder(default = Color::new(0x21, 0x21, 0x21))]
    pub text_color: Color,
    #[builder(default = Color::new(0xe0, 0xe0, 0xe0))]
    pub reference_arc_color: Color,
    #[builder(default = Color::new(0x19, 0x76, 0xd2))]
    pub value_arc_color: Color,
    #[builder(default = Color::new(0x9c, 0x27, 0xb0))]
    pub pointer_color: Color,

    // Window
    #[builder(default = 400)]
    pub window_width: usize,
    #[builder(default = 360)]
    pub window_height: usize,
    #[builder(default = 30.0)]
    pub max_framerate: f64,
}

impl Default for GaugeStyle {
    fn default() -> Self {
        Self::builder().build()
    }
}
