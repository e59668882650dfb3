// ============================================================================
// GAUGE COMPOSITION
// ============================================================================

use tracing::{debug, info};

use crate::config::{
    ConfigDialog, PersistedConfiguration, DEFAULT_MAX_SIGNAL_VALUE, DEFAULT_MIN_SIGNAL_VALUE,
    MAX_DECIMALS, MAX_TICKS,
};
use crate::error::GaugeError;
use crate::geometry::{Bounds, GaugeGeometry};
use crate::host::{instance_id_from_query, Notifier, ProjectStore, SignalDefinition, SignalFeed, SignalPicker};
use crate::label::{self, Baseline, LabelPosition, TextAnchor, TextPlacement};
use crate::pointer;
use crate::render::{DrawCommand, Scene};
use crate::style::{Color, GaugeStyle};
use crate::ticks::{self, TickStyle};

pub const NO_SIGNAL_TEXT: &str = "No signal selected";
pub const NO_DATA_TEXT: &str = "No data";

/// Text of the value label for the selected signal's latest value.
/// A non-finite value counts as no data.
pub fn value_text(config: &PersistedConfiguration, value: Option<f64>) -> String {
    if config.qualified_signal_name.is_none() {
        return NO_SIGNAL_TEXT.to_string();
    }
    match value.filter(|v| v.is_finite()) {
        Some(value) => {
            let decimals = usize::from(config.decimals.min(MAX_DECIMALS));
            format!("{value:.decimals$}")
        }
        None => NO_DATA_TEXT.to_string(),
    }
}

/// Configuration after picking `signal`: name, display name and unit are
/// taken over, the domain only when the signal reports a usable range.
pub fn with_signal(
    current: &PersistedConfiguration,
    signal: &SignalDefinition,
) -> PersistedConfiguration {
    let (min, max) = if signal.min_value < signal.max_value {
        (signal.min_value, signal.max_value)
    } else {
        (DEFAULT_MIN_SIGNAL_VALUE, DEFAULT_MAX_SIGNAL_VALUE)
    };
    PersistedConfiguration {
        qualified_signal_name: Some(signal.qualified_name.clone()),
        signal_name: Some(signal.name.clone()),
        signal_unit: signal.unit.clone(),
        min_signal_value: min,
        max_signal_value: max,
        ..current.clone()
    }
}

/// Background and title; all that is drawn when the gauge itself cannot be.
pub fn compose_header(config: &PersistedConfiguration, width: f64, style: &GaugeStyle) -> Scene {
    let mut scene = Scene::new();
    scene.add_command(DrawCommand::Clear(style.background_color));
    if let Some(name) = &config.signal_name {
        scene.add_command(text_command(
            TextPlacement {
                x: width / 2.0,
                y: style.header_height / 2.0,
                anchor: TextAnchor::Middle,
                baseline: Baseline::Central,
            },
            name.clone(),
            style.header_font_size,
            style.text_color,
        ));
    }
    scene
}

/// Builds the full draw list for one frame of a `width` x `height` view.
///
/// Fails only when the value domain or the arc sweep is degenerate.
pub fn compose(
    config: &PersistedConfiguration,
    value: Option<f64>,
    (width, height): (f64, f64),
    style: &GaugeStyle,
) -> Result<Scene, GaugeError> {
    let value = value.filter(|v| v.is_finite());
    let geometry = GaugeGeometry::fit(
        Bounds::new(0.0, style.header_height, width, (height - style.header_height).max(0.0)),
        style.margin,
        style.inner_radius_ratio,
        (style.start_angle, style.end_angle),
        (config.min_signal_value, config.max_signal_value),
    )?;
    let mut scene = compose_header(config, width, style);

    scene.add_command(arc_command(
        &geometry,
        (geometry.start_angle, geometry.end_angle),
        style.reference_arc_color,
    ));
    if let Some(value) = value {
        let (lo, hi) = if geometry.start_angle <= geometry.end_angle {
            (geometry.start_angle, geometry.end_angle)
        } else {
            (geometry.end_angle, geometry.start_angle)
        };
        let value_angle = geometry.angle_of(value).clamp(lo, hi);
        scene.add_command(arc_command(
            &geometry,
            (geometry.start_angle, value_angle),
            style.value_arc_color,
        ));
    }

    if config.show_ticks {
        let tick_style = TickStyle {
            major_inset: style.major_tick_inset,
            major_width: style.major_tick_width,
            minor_width: style.minor_tick_width,
            label_offset: style.tick_label_offset,
        };
        let marks = ticks::generate_ticks(
            &geometry,
            config.major_ticks.min(MAX_TICKS) as usize,
            config.minor_ticks_per_major.min(MAX_TICKS) as usize,
            &tick_style,
        );
        for mark in &marks {
            scene.add_command(DrawCommand::Line {
                x0: mark.inner.x,
                y0: mark.inner.y,
                x1: mark.outer.x,
                y1: mark.outer.y,
                width: mark.width,
                color: style.text_color,
            });
            if let Some(tick_label) = mark.label() {
                scene.add_command(text_command(
                    tick_label.placement,
                    tick_label.text.clone(),
                    style.tick_font_size,
                    style.text_color,
                ));
            }
        }
    }

    if config.show_unit_label {
        scene.add_command(text_command(
            label::place_gauge_label(&geometry, LabelPosition::Above),
            config.signal_unit.clone().unwrap_or_default(),
            style.unit_font_size,
            style.text_color,
        ));
    }
    if config.show_value_label {
        scene.add_command(text_command(
            label::place_gauge_label(&geometry, LabelPosition::Below),
            value_text(config, value),
            style.value_font_size,
            style.text_color,
        ));
    }

    if config.show_pointer {
        if let Some(pointer) =
            pointer::locate_pointer(&geometry, value, style.pointer_hub_radius, style.pointer_width)
        {
            scene.add_command(DrawCommand::Line {
                x0: pointer.hub.x,
                y0: pointer.hub.y,
                x1: pointer.tip.x,
                y1: pointer.tip.y,
                width: pointer.width,
                color: style.pointer_color,
            });
            scene.add_command(DrawCommand::Circle {
                cx: pointer.hub.x,
                cy: pointer.hub.y,
                radius: pointer.hub_radius,
                color: style.pointer_color,
            });
        }
    }

    Ok(scene)
}

fn arc_command(geometry: &GaugeGeometry, (start, end): (f64, f64), color: Color) -> DrawCommand {
    DrawCommand::Arc {
        cx: geometry.cx,
        cy: geometry.cy,
        inner_radius: geometry.inner_radius,
        outer_radius: geometry.outer_radius,
        start_angle: start,
        end_angle: end,
        color,
    }
}

fn text_command(placement: TextPlacement, text: String, font_size: f32, color: Color) -> DrawCommand {
    DrawCommand::Text {
        x: placement.x,
        y: placement.y,
        text,
        font_size,
        anchor: placement.anchor,
        baseline: placement.baseline,
        color,
    }
}

// ============================================================================
// GAUGE VIEW
// ============================================================================

/// One placed gauge: its instance id, the host collaborators and the
/// configuration dialog.
pub struct GaugeView<S, F> {
    instance_id: i64,
    store: S,
    feed: F,
    style: GaugeStyle,
    dialog: ConfigDialog,
}

impl<S: ProjectStore, F: SignalFeed> GaugeView<S, F> {
    pub fn new(instance_id: i64, store: S, feed: F, style: GaugeStyle) -> Self {
        Self {
            instance_id,
            store,
            feed,
            style,
            dialog: ConfigDialog::new(),
        }
    }

    /// Builds a view for the instance named by a view query such as `?id=3`.
    pub fn from_query(query: &str, store: S, feed: F, style: GaugeStyle) -> Self {
        let instance_id = instance_id_from_query(query);
        debug!(query, instance_id, "gauge view created");
        Self::new(instance_id, store, feed, style)
    }

    pub fn instance_id(&self) -> i64 {
        self.instance_id
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn feed(&self) -> &F {
        &self.feed
    }

    pub fn style(&self) -> &GaugeStyle {
        &self.style
    }

    pub fn dialog(&self) -> &ConfigDialog {
        &self.dialog
    }

    pub fn dialog_mut(&mut self) -> &mut ConfigDialog {
        &mut self.dialog
    }

    pub fn configuration(&self) -> PersistedConfiguration {
        self.store
            .get(self.instance_id, &PersistedConfiguration::default())
    }

    /// Latest value of the selected signal, if any.
    pub fn current_value(&self, config: &PersistedConfiguration) -> Option<f64> {
        let names: Vec<String> = config.qualified_signal_name.iter().cloned().collect();
        self.feed
            .subscribe(&names)
            .into_iter()
            .next()
            .and_then(|sample| sample.value)
            .filter(|v| v.is_finite())
    }

    pub fn render(&self, width: f64, height: f64) -> Result<Scene, GaugeError> {
        let config = self.configuration();
        let value = self.current_value(&config);
        compose(&config, value, (width, height), &self.style)
    }

    /// Stores `signal` as the selection in one update.
    pub fn apply_signal(&self, signal: &SignalDefinition) -> Result<PersistedConfiguration, GaugeError> {
        let next = self.store.update(
            self.instance_id,
            &PersistedConfiguration::default(),
            &|current: &PersistedConfiguration| with_signal(current, signal),
        )?;
        info!(
            instance_id = self.instance_id,
            signal = %signal.qualified_name,
            min = next.min_signal_value,
            max = next.max_signal_value,
            "signal selected"
        );
        Ok(next)
    }

    /// Runs `picker`; returns whether a signal was chosen.
    pub fn select_signal(&self, picker: &mut dyn SignalPicker) -> Result<bool, GaugeError> {
        match picker.pick() {
            Some(signal) => self.apply_signal(&signal).map(|_| true),
            None => {
                debug!(instance_id = self.instance_id, "signal picker dismissed");
                Ok(false)
            }
        }
    }

    pub fn open_config(&mut self) {
        let persisted = self.configuration();
        self.dialog.open(&persisted);
    }

    pub fn cancel_config(&mut self) {
        self.dialog.cancel();
    }

    pub fn save_config(&mut self, notifier: &dyn Notifier) -> Result<(), GaugeError> {
        self.dialog.save(&self.store, self.instance_id, notifier)
    }
}
