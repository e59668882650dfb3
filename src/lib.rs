//! Radial gauge for a single live signal value.
//!
//! A gauge is composed into a [`Scene`] of draw commands from its persisted
//! per-instance configuration, the container size and the latest sample, and
//! rasterized into an RGBA framebuffer. [`GaugeView`] ties one instance to its
//! host collaborators and can run itself in a window.

// ============================================================================
// MODULES
// ============================================================================

pub mod compose;
pub mod config;
pub mod error;
pub mod geometry;
pub mod host;
pub mod label;
pub mod pointer;
pub mod render;
pub mod style;
pub mod ticks;
pub mod window;

// ============================================================================
// PUBLIC API
// ============================================================================

pub use compose::{compose, value_text, GaugeView};
pub use config::{ConfigDialog, DialogState, EditBuffer, EditField, PersistedConfiguration};
pub use error::{ConfigError, GaugeError};
pub use geometry::{value_to_angle, Bounds, GaugeGeometry, Point};
pub use host::{
    instance_id_from_query, FixedSignalPicker, JsonFileProjectStore, LogNotifier,
    MemoryProjectStore, MemorySignalFeed, Notifier, ProjectStore, RecordingNotifier,
    SignalDefinition, SignalFeed, SignalPicker, SignalSample,
};
pub use label::{Baseline, LabelPosition, TextAnchor, TextPlacement, TickLabelSide};
pub use render::{Canvas, DrawCommand, Scene};
pub use style::{Color, GaugeStyle};
pub use ticks::{generate_ticks, TickMark, TickStyle};
pub use window::GaugeCommand;
