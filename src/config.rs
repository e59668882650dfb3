// ============================================================================
// CONFIGURATION STATE MODEL
// ============================================================================

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, GaugeError};
use crate::host::{Notifier, ProjectStore};

pub const DEFAULT_MIN_SIGNAL_VALUE: f64 = -500.0;
pub const DEFAULT_MAX_SIGNAL_VALUE: f64 = 500.0;
pub const MAX_DECIMALS: u8 = 15;
pub const MAX_TICKS: u32 = 100;

/// Per-instance gauge configuration as stored in the host project.
///
/// Field names serialize in camelCase; they are the project file schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedConfiguration {
    pub qualified_signal_name: Option<String>,
    pub signal_name: Option<String>,
    pub signal_unit: Option<String>,
    pub min_signal_value: f64,
    pub max_signal_value: f64,
    pub decimals: u8,
    pub show_unit_label: bool,
    pub show_value_label: bool,
    pub show_pointer: bool,
    pub show_ticks: bool,
    pub major_ticks: u32,
    pub minor_ticks_per_major: u32,
}

impl Default for PersistedConfiguration {
    fn default() -> Self {
        Self {
            qualified_signal_name: None,
            signal_name: None,
            signal_unit: None,
            min_signal_value: DEFAULT_MIN_SIGNAL_VALUE,
            max_signal_value: DEFAULT_MAX_SIGNAL_VALUE,
            decimals: 2,
            show_unit_label: true,
            show_value_label: true,
            show_pointer: true,
            show_ticks: true,
            major_ticks: 7,
            minor_ticks_per_major: 4,
        }
    }
}

/// A field of the configuration dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    MinSignalValue,
    MaxSignalValue,
    Decimals,
    ShowUnitLabel,
    ShowValueLabel,
    ShowPointer,
    ShowTicks,
    MajorTicks,
    MinorTicksPerMajor,
}

impl EditField {
    pub const fn label(self) -> &'static str {
        match self {
            EditField::MinSignalValue => "Min Signal Value",
            EditField::MaxSignalValue => "Max Signal Value",
            EditField::Decimals => "Decimals",
            EditField::ShowUnitLabel => "Show Unit",
            EditField::ShowValueLabel => "Show Value",
            EditField::ShowPointer => "Show Pointer",
            EditField::ShowTicks => "Show Ticks",
            EditField::MajorTicks => "Major Ticks",
            EditField::MinorTicksPerMajor => "Minor Ticks Per Major",
        }
    }
}

/// Working copy of the editable fields while the dialog is open.
///
/// Setters enforce the field ranges; a rejected edit leaves the buffer as it
/// was.
#[derive(Debug, Clone, PartialEq)]
pub struct EditBuffer {
    min_signal_value: f64,
    max_signal_value: f64,
    decimals: u8,
    show_unit_label: bool,
    show_value_label: bool,
    show_pointer: bool,
    show_ticks: bool,
    major_ticks: u32,
    minor_ticks_per_major: u32,
}

impl EditBuffer {
    pub fn from_persisted(config: &PersistedConfiguration) -> Self {
        Self {
            min_signal_value: config.min_signal_value,
            max_signal_value: config.max_signal_value,
            decimals: config.decimals,
            show_unit_label: config.show_unit_label,
            show_value_label: config.show_value_label,
            show_pointer: config.show_pointer,
            show_ticks: config.show_ticks,
            major_ticks: config.major_ticks,
            minor_ticks_per_major: config.minor_ticks_per_major,
        }
    }

    /// Copies every editable field onto `config`, leaving the signal
    /// selection alone.
    pub fn apply_to(&self, config: &mut PersistedConfiguration) {
        config.min_signal_value = self.min_signal_value;
        config.max_signal_value = self.max_signal_value;
        config.decimals = self.decimals;
        config.show_unit_label = self.show_unit_label;
        config.show_value_label = self.show_value_label;
        config.show_pointer = self.show_pointer;
        config.show_ticks = self.show_ticks;
        config.major_ticks = self.major_ticks;
        config.minor_ticks_per_major = self.minor_ticks_per_major;
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_signal_value >= self.max_signal_value {
            return Err(ConfigError::InvalidRange {
                min: self.min_signal_value,
                max: self.max_signal_value,
            });
        }
        Ok(())
    }

    pub fn min_signal_value(&self) -> f64 {
        self.min_signal_value
    }

    pub fn max_signal_value(&self) -> f64 {
        self.max_signal_value
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn show_unit_label(&self) -> bool {
        self.show_unit_label
    }

    pub fn show_value_label(&self) -> bool {
        self.show_value_label
    }

    pub fn show_pointer(&self) -> bool {
        self.show_pointer
    }

    pub fn show_ticks(&self) -> bool {
        self.show_ticks
    }

    pub fn major_ticks(&self) -> u32 {
        self.major_ticks
    }

    pub fn minor_ticks_per_major(&self) -> u32 {
        self.minor_ticks_per_major
    }

    pub fn set_min_signal_value(&mut self, value: f64) -> Result<(), ConfigError> {
        self.min_signal_value = finite(EditField::MinSignalValue, value)?;
        Ok(())
    }

    pub fn set_max_signal_value(&mut self, value: f64) -> Result<(), ConfigError> {
        self.max_signal_value = finite(EditField::MaxSignalValue, value)?;
        Ok(())
    }

    pub fn set_decimals(&mut self, value: i64) -> Result<(), ConfigError> {
        let value = in_range(EditField::Decimals, value, i64::from(MAX_DECIMALS))?;
        self.decimals = u8::try_from(value).unwrap_or(MAX_DECIMALS);
        Ok(())
    }

    pub fn set_major_ticks(&mut self, value: i64) -> Result<(), ConfigError> {
        let value = in_range(EditField::MajorTicks, value, i64::from(MAX_TICKS))?;
        self.major_ticks = u32::try_from(value).unwrap_or(MAX_TICKS);
        Ok(())
    }

    pub fn set_minor_ticks_per_major(&mut self, value: i64) -> Result<(), ConfigError> {
        let value = in_range(EditField::MinorTicksPerMajor, value, i64::from(MAX_TICKS))?;
        self.minor_ticks_per_major = u32::try_from(value).unwrap_or(MAX_TICKS);
        Ok(())
    }

    pub fn set_show_unit_label(&mut self, show: bool) {
        self.show_unit_label = show;
    }

    pub fn set_show_value_label(&mut self, show: bool) {
        self.show_value_label = show;
    }

    pub fn set_show_pointer(&mut self, show: bool) {
        self.show_pointer = show;
    }

    pub fn set_show_ticks(&mut self, show: bool) {
        self.show_ticks = show;
    }

    /// Sets a field from user-typed text. Numeric fields parse as float or
    /// integer according to the field; flags accept `true`/`false`.
    pub fn set_text(&mut self, field: EditField, input: &str) -> Result<(), ConfigError> {
        let trimmed = input.trim();
        let parse_error = || ConfigError::Parse {
            field: field.label(),
            input: input.to_string(),
        };
        match field {
            EditField::MinSignalValue | EditField::MaxSignalValue => {
                let value: f64 = trimmed.parse().map_err(|_| parse_error())?;
                if field == EditField::MinSignalValue {
                    self.set_min_signal_value(value)
                } else {
                    self.set_max_signal_value(value)
                }
            }
            EditField::Decimals | EditField::MajorTicks | EditField::MinorTicksPerMajor => {
                let value: i64 = trimmed.parse().map_err(|_| parse_error())?;
                match field {
                    EditField::Decimals => self.set_decimals(value),
                    EditField::MajorTicks => self.set_major_ticks(value),
                    _ => self.set_minor_ticks_per_major(value),
                }
            }
            EditField::ShowUnitLabel
            | EditField::ShowValueLabel
            | EditField::ShowPointer
            | EditField::ShowTicks => {
                let show: bool = trimmed.parse().map_err(|_| parse_error())?;
                match field {
                    EditField::ShowUnitLabel => self.set_show_unit_label(show),
                    EditField::ShowValueLabel => self.set_show_value_label(show),
                    EditField::ShowPointer => self.set_show_pointer(show),
                    _ => self.set_show_ticks(show),
                }
                Ok(())
            }
        }
    }
}

fn finite(field: EditField, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NotFinite {
            field: field.label(),
        })
    }
}

fn in_range(field: EditField, value: i64, max: i64) -> Result<i64, ConfigError> {
    if (0..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::OutOfRange {
            field: field.label(),
            value,
            min: 0,
            max,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DialogState {
    #[default]
    Closed,
    Open(EditBuffer),
}

/// Open/cancel/save lifecycle of the configuration dialog for one gauge.
#[derive(Debug, Clone, Default)]
pub struct ConfigDialog {
    state: DialogState,
}

impl ConfigDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, DialogState::Open(_))
    }

    /// Seeds a fresh buffer from `persisted`. Called on every open, so edits
    /// abandoned in an earlier session never come back.
    pub fn open(&mut self, persisted: &PersistedConfiguration) {
        debug!(
            min = persisted.min_signal_value,
            max = persisted.max_signal_value,
            "configuration dialog opened"
        );
        self.state = DialogState::Open(EditBuffer::from_persisted(persisted));
    }

    pub fn buffer(&self) -> Option<&EditBuffer> {
        match &self.state {
            DialogState::Open(buffer) => Some(buffer),
            DialogState::Closed => None,
        }
    }

    pub fn buffer_mut(&mut self) -> Result<&mut EditBuffer, ConfigError> {
        match &mut self.state {
            DialogState::Open(buffer) => Ok(buffer),
            DialogState::Closed => Err(ConfigError::DialogClosed),
        }
    }

    /// Drops the buffer without touching the stored configuration.
    pub fn cancel(&mut self) {
        if self.is_open() {
            debug!("configuration dialog cancelled");
        }
        self.state = DialogState::Closed;
    }

    /// Validates the buffer and commits it to `store` in one update.
    ///
    /// On a bad range the user is told through `notifier`, the dialog stays
    /// open and nothing is written.
    pub fn save<S>(
        &mut self,
        store: &S,
        instance_id: i64,
        notifier: &dyn Notifier,
    ) -> Result<(), GaugeError>
    where
        S: ProjectStore + ?Sized,
    {
        let buffer = match &self.state {
            DialogState::Open(buffer) => buffer,
            DialogState::Closed => return Err(ConfigError::DialogClosed.into()),
        };
        if let Err(err) = buffer.validate() {
            warn!(instance_id, error = %err, "configuration rejected");
            notifier.notify(&err.to_string());
            return Err(err.into());
        }

        store.update(
            instance_id,
            &PersistedConfiguration::default(),
            &|current: &PersistedConfiguration| {
                let mut next = current.clone();
                buffer.apply_to(&mut next);
                next
            },
        )?;
        info!(instance_id, "configuration saved");
        self.state = DialogState::Closed;
        Ok(())
    }
}
