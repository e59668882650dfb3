// ============================================================================
// RETAINED MODE SCENE
// ============================================================================

use std::f64::consts::TAU;
use std::path::Path;

use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::error::GaugeError;
use crate::label::{Baseline, TextAnchor};
use crate::style::Color;

/// One draw instruction. Coordinates are framebuffer pixels, angles are
/// radians clockwise from "up".
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    /// Annular sector between two radii.
    Arc {
        cx: f64,
        cy: f64,
        inner_radius: f64,
        outer_radius: f64,
        start_angle: f64,
        end_angle: f64,
        color: Color,
    },
    Line {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        width: f32,
        color: Color,
    },
    Circle {
        cx: f64,
        cy: f64,
        radius: f64,
        color: Color,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        font_size: f32,
        anchor: TextAnchor,
        baseline: Baseline,
        color: Color,
    },
}

/// Ordered draw list for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Rasterizes every command in order. Text is skipped without a font.
    pub fn render(&self, canvas: &mut Canvas, font: Option<&Font>) {
        for command in &self.commands {
            match command {
                DrawCommand::Clear(color) => canvas.clear(*color),
                DrawCommand::Arc {
                    cx,
                    cy,
                    inner_radius,
                    outer_radius,
                    start_angle,
                    end_angle,
                    color,
                } => canvas.fill_arc(
                    (*cx, *cy),
                    (*inner_radius, *outer_radius),
                    (*start_angle, *end_angle),
                    *color,
                ),
                DrawCommand::Line {
                    x0,
                    y0,
                    x1,
                    y1,
                    width,
                    color,
                } if [x0, y0, x1, y1].iter().all(|v| v.is_finite()) => canvas.draw_line(
                    x0.round() as i32,
                    y0.round() as i32,
                    x1.round() as i32,
                    y1.round() as i32,
                    *width,
                    *color,
                ),
                DrawCommand::Line { .. } => {}
                DrawCommand::Circle {
                    cx,
                    cy,
                    radius,
                    color,
                } => canvas.fill_circle(
                    cx.round() as i32,
                    cy.round() as i32,
                    radius.round() as i32,
                    *color,
                ),
                DrawCommand::Text {
                    x,
                    y,
                    text,
                    font_size,
                    anchor,
                    baseline,
                    color,
                } => {
                    if let Some(font) = font {
                        canvas.draw_text(
                            font,
                            (*x as f32, *y as f32),
                            text,
                            Scale::uniform(*font_size),
                            (*anchor, *baseline),
                            *color,
                        );
                    }
                }
            }
        }
    }
}

// ============================================================================
// CANVAS & DRAWING PRIMITIVES
// ============================================================================

/// RGBA8 framebuffer view.
pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        self.frame.get(idx..idx + 4)?.try_into().ok()
    }

    pub fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            let (r, g, b) = color.as_tuple();
            chunk.copy_from_slice(&[r, g, b, 0xff]);
        }
    }

    /// Alpha-blends `color` over the pixel at `(x, y)`; out of bounds is a no-op.
    fn blend(&mut self, x: i32, y: i32, color: Color, alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let Some(dst) = self.frame.get_mut(idx..idx + 4) else {
            return;
        };
        let a = alpha.clamp(0.0, 1.0);
        let (r, g, b) = color.as_tuple();
        for (channel, src) in dst.iter_mut().zip([r, g, b]) {
            *channel = (src as f32 * a + *channel as f32 * (1.0 - a)).round() as u8;
        }
        dst[3] = 0xff;
    }

    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, thickness: f32, color: Color) {
        let pad = thickness.ceil() as i32 + 1;
        let dx = (x1 - x0) as f32;
        let dy = (y1 - y0) as f32;
        let len_sq = (dx * dx + dy * dy).max(f32::EPSILON);
        for y in y0.min(y1) - pad..=y0.max(y1) + pad {
            for x in x0.min(x1) - pad..=x0.max(x1) + pad {
                let px = (x - x0) as f32;
                let py = (y - y0) as f32;
                let t = ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0);
                let lx = x0 as f32 + t * dx;
                let ly = y0 as f32 + t * dy;
                let dist = ((lx - x as f32).powi(2) + (ly - y as f32).powi(2)).sqrt();
                let aa = (1.0 - (dist - thickness / 2.0).clamp(0.0, 1.0)).clamp(0.0, 1.0);
                if aa > 0.01 {
                    self.blend(x, y, color, aa);
                }
            }
        }
    }

    pub fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color) {
        for y in -radius - 1..=radius + 1 {
            for x in -radius - 1..=radius + 1 {
                let dist = ((x * x + y * y) as f64).sqrt();
                let aa = if dist > radius as f64 {
                    1.0 - (dist - radius as f64).min(1.0)
                } else {
                    1.0
                };
                if aa > 0.0 {
                    self.blend(cx + x, cy + y, color, aa as f32);
                }
            }
        }
    }

    /// Fills the annular sector between `radii` swept from the first to the
    /// second angle, with anti-aliased radial edges.
    pub fn fill_arc(
        &mut self,
        (cx, cy): (f64, f64),
        (inner, outer): (f64, f64),
        (start_angle, end_angle): (f64, f64),
        color: Color,
    ) {
        let lo = start_angle.min(end_angle);
        let span = (end_angle - start_angle).abs();
        if ![cx, cy, inner, outer, lo, span].iter().all(|v| v.is_finite()) {
            return;
        }
        let reach = outer.ceil() as i32 + 1;
        let (icx, icy) = (cx.round() as i32, cy.round() as i32);

        for y in (icy - reach).max(0)..=(icy + reach).min(self.height as i32 - 1) {
            for x in (icx - reach).max(0)..=(icx + reach).min(self.width as i32 - 1) {
                let dx = x as f64 - cx;
                let dy = y as f64 - cy;
                let dist = (dx * dx + dy * dy).sqrt();
                if dist < inner - 1.0 || dist > outer + 1.0 {
                    continue;
                }
                if span < TAU && (dx.atan2(-dy) - lo).rem_euclid(TAU) > span {
                    continue;
                }
                let aa = if dist > outer {
                    1.0 - (dist - outer).min(1.0)
                } else if dist < inner {
                    1.0 - (inner - dist).min(1.0)
                } else {
                    1.0
                };
                if aa > 0.0 {
                    self.blend(x, y, color, aa as f32);
                }
            }
        }
    }

    pub fn draw_text(
        &mut self,
        font: &Font,
        (x, y): (f32, f32),
        text: &str,
        scale: Scale,
        (anchor, baseline): (TextAnchor, Baseline),
        color: Color,
    ) {
        let v_metrics = font.v_metrics(scale);
        let width = text_width(font, text, scale);
        let origin = text_origin(
            (x, y),
            width,
            (v_metrics.ascent, v_metrics.descent),
            anchor,
            baseline,
        );
        let glyphs: Vec<PositionedGlyph> = font.layout(text, scale, point(origin.0, origin.1)).collect();
        for glyph in glyphs {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    self.blend(bb.min.x + gx as i32, bb.min.y + gy as i32, color, v);
                });
            }
        }
    }
}

/// Advance width of `text` laid out on one line.
pub fn text_width(font: &Font, text: &str, scale: Scale) -> f32 {
    font.layout(text, scale, point(0.0, 0.0))
        .last()
        .map(|glyph| glyph.position().x + glyph.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}

/// Pen origin (left end of the alphabetic baseline) for text of `width`
/// aligned on `(x, y)`. `descent` is negative, as rusttype reports it.
pub fn text_origin(
    (x, y): (f32, f32),
    width: f32,
    (ascent, descent): (f32, f32),
    anchor: TextAnchor,
    baseline: Baseline,
) -> (f32, f32) {
    let left = match anchor {
        TextAnchor::Start => x,
        TextAnchor::Middle => x - width / 2.0,
        TextAnchor::End => x - width,
    };
    let base = match baseline {
        Baseline::Hanging => y + ascent,
        Baseline::Central => y + (ascent + descent) / 2.0,
        Baseline::Auto => y,
    };
    (left, base)
}

pub fn load_font(path: &Path) -> Result<Font<'static>, GaugeError> {
    let data = std::fs::read(path)?;
    Font::try_from_vec(data).ok_or_else(|| GaugeError::Font(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Color = Color::new(0xff, 0xff, 0xff);
    const BLACK: Color = Color::new(0, 0, 0);

    fn frame(width: usize, height: usize) -> Vec<u8> {
        vec![0; width * height * 4]
    }

    #[test]
    fn clear_fills_every_pixel() {
        let mut buf = frame(4, 3);
        let mut canvas = Canvas::new(&mut buf, 4, 3);
        canvas.clear(Color::new(1, 2, 3));
        assert_eq!(canvas.pixel(3, 2), Some([1, 2, 3, 0xff]));
        assert_eq!(canvas.pixel(4, 0), None);
    }

    #[test]
    fn line_covers_its_path_only() {
        let mut buf = frame(20, 20);
        let mut canvas = Canvas::new(&mut buf, 20, 20);
        canvas.clear(WHITE);
        canvas.draw_line(2, 10, 17, 10, 2.0, BLACK);
        assert_eq!(canvas.pixel(10, 10), Some([0, 0, 0, 0xff]));
        assert_eq!(canvas.pixel(10, 2), Some([0xff, 0xff, 0xff, 0xff]));
    }

    #[test]
    fn drawing_off_canvas_is_ignored() {
        let mut buf = frame(8, 8);
        let mut canvas = Canvas::new(&mut buf, 8, 8);
        canvas.draw_line(-20, -20, -10, -10, 3.0, BLACK);
        canvas.fill_circle(-50, 4, 3, BLACK);
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn arc_fills_only_inside_its_sweep() {
        let mut buf = frame(101, 101);
        let mut canvas = Canvas::new(&mut buf, 101, 101);
        canvas.clear(WHITE);
        // Upper half ring from -90° to 90°.
        canvas.fill_arc(
            (50.0, 50.0),
            (30.0, 40.0),
            ((-90.0_f64).to_radians(), 90.0_f64.to_radians()),
            BLACK,
        );
        // Straight up, mid-ring.
        assert_eq!(canvas.pixel(50, 15), Some([0, 0, 0, 0xff]));
        // Straight down is outside the sweep.
        assert_eq!(canvas.pixel(50, 85), Some([0xff, 0xff, 0xff, 0xff]));
        // Center is inside the hole.
        assert_eq!(canvas.pixel(50, 50), Some([0xff, 0xff, 0xff, 0xff]));
    }

    #[test]
    fn arc_with_non_finite_angle_draws_nothing() {
        let mut buf = frame(101, 101);
        let mut canvas = Canvas::new(&mut buf, 101, 101);
        canvas.clear(WHITE);
        canvas.fill_arc((50.0, 50.0), (30.0, 40.0), (-1.9, f64::NAN), BLACK);
        assert!(buf.chunks_exact(4).all(|px| px == [0xff, 0xff, 0xff, 0xff]));
    }

    #[test]
    fn line_with_non_finite_end_is_skipped() {
        let mut scene = Scene::new();
        scene.add_command(DrawCommand::Clear(WHITE));
        scene.add_command(DrawCommand::Line {
            x0: 5.0,
            y0: 5.0,
            x1: f64::NAN,
            y1: f64::NAN,
            width: 3.0,
            color: BLACK,
        });
        let mut buf = frame(10, 10);
        let mut canvas = Canvas::new(&mut buf, 10, 10);
        scene.render(&mut canvas, None);
        assert!(buf.chunks_exact(4).all(|px| px == [0xff, 0xff, 0xff, 0xff]));
    }

    #[test]
    fn circle_is_solid_at_center() {
        let mut buf = frame(11, 11);
        let mut canvas = Canvas::new(&mut buf, 11, 11);
        canvas.clear(WHITE);
        canvas.fill_circle(5, 5, 3, BLACK);
        assert_eq!(canvas.pixel(5, 5), Some([0, 0, 0, 0xff]));
        assert_eq!(canvas.pixel(0, 0), Some([0xff, 0xff, 0xff, 0xff]));
    }

    #[test]
    fn text_origin_combinations() {
        let metrics = (10.0, -4.0);
        assert_eq!(
            text_origin((100.0, 50.0), 40.0, metrics, TextAnchor::Start, Baseline::Central),
            (100.0, 53.0)
        );
        assert_eq!(
            text_origin((100.0, 50.0), 40.0, metrics, TextAnchor::End, Baseline::Central),
            (60.0, 53.0)
        );
        assert_eq!(
            text_origin((100.0, 50.0), 40.0, metrics, TextAnchor::Middle, Baseline::Hanging),
            (80.0, 60.0)
        );
        assert_eq!(
            text_origin((100.0, 50.0), 40.0, metrics, TextAnchor::Middle, Baseline::Auto),
            (80.0, 50.0)
        );
    }

    #[test]
    fn scene_without_font_skips_text() {
        let mut scene = Scene::new();
        scene.add_command(DrawCommand::Clear(WHITE));
        scene.add_command(DrawCommand::Text {
            x: 5.0,
            y: 5.0,
            text: "42".into(),
            font_size: 12.0,
            anchor: TextAnchor::Middle,
            baseline: Baseline::Central,
            color: BLACK,
        });
        let mut buf = frame(10, 10);
        let mut canvas = Canvas::new(&mut buf, 10, 10);
        scene.render(&mut canvas, None);
        assert!(buf.chunks_exact(4).all(|px| px == [0xff, 0xff, 0xff, 0xff]));
        assert_eq!(scene.texts().collect::<Vec<_>>(), vec!["42"]);
    }

    #[test]
    fn missing_font_file_is_an_io_error() {
        let result = load_font(Path::new("/definitely/not/a/font.ttf"));
        assert!(matches!(result, Err(GaugeError::Io(_))));
    }
}
