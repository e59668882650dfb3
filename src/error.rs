use std::path::PathBuf;

/// Errors raised while editing or committing the gauge configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Min Signal Value must be less than Max Signal Value.")]
    InvalidRange { min: f64, max: f64 },
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error("{field}: cannot parse {input:?}")]
    Parse { field: &'static str, input: String },
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("configuration dialog is not open")]
    DialogClosed,
}

#[derive(Debug, thiserror::Error)]
pub enum GaugeError {
    #[error("degenerate value domain: min {min} and max {max} span no range")]
    DegenerateDomain { min: f64, max: f64 },
    #[error("degenerate arc: start angle {start} and end angle {end} sweep nothing")]
    DegenerateArc { start: f64, end: f64 },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("project data error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cannot load font from {0}")]
    Font(PathBuf),
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("window error: {0}")]
    Os(#[from] winit::error::OsError),
    #[error("pixel surface error: {0}")]
    Pixels(#[from] pixels::Error),
}
