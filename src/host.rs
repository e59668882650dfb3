// ============================================================================
// HOST COLLABORATORS
// ============================================================================
//
// The gauge talks to its host through these traits: a project store for the
// per-instance configuration, a feed of live signal values, a signal picker
// and a blocking user notifier. In-process implementations are provided for
// running stand-alone and for tests.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError, RwLock};

use tracing::{debug, info, warn};

use crate::config::PersistedConfiguration;
use crate::error::GaugeError;

/// Instance id used when the hosting view does not supply a usable one.
pub const UNUSED_INSTANCE_ID: i64 = -1;

/// Reads the `id` parameter from a view query string such as `?id=3&x=y`.
/// Absent or malformed ids map to [`UNUSED_INSTANCE_ID`].
pub fn instance_id_from_query(query: &str) -> i64 {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "id")
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(UNUSED_INSTANCE_ID)
}

// ============================================================================
// PROJECT STORE
// ============================================================================

pub trait ProjectStore {
    /// Stored configuration for `instance_id`, or `defaults` if none exists.
    fn get(&self, instance_id: i64, defaults: &PersistedConfiguration) -> PersistedConfiguration;

    /// Replaces the configuration with `updater(current)` as one atomic step
    /// and returns the new value. `current` is `defaults` for a new instance.
    fn update(
        &self,
        instance_id: i64,
        defaults: &PersistedConfiguration,
        updater: &dyn Fn(&PersistedConfiguration) -> PersistedConfiguration,
    ) -> Result<PersistedConfiguration, GaugeError>;
}

#[derive(Debug, Default)]
pub struct MemoryProjectStore {
    entries: RwLock<HashMap<i64, PersistedConfiguration>>,
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProjectStore for MemoryProjectStore {
    fn get(&self, instance_id: i64, defaults: &PersistedConfiguration) -> PersistedConfiguration {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(&instance_id)
            .cloned()
            .unwrap_or_else(|| defaults.clone())
    }

    fn update(
        &self,
        instance_id: i64,
        defaults: &PersistedConfiguration,
        updater: &dyn Fn(&PersistedConfiguration) -> PersistedConfiguration,
    ) -> Result<PersistedConfiguration, GaugeError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let next = updater(entries.get(&instance_id).unwrap_or(defaults));
        entries.insert(instance_id, next.clone());
        Ok(next)
    }
}

/// Project store persisted as one JSON object mapping instance ids to
/// configurations. Every update rewrites the file through a temporary file.
#[derive(Debug)]
pub struct JsonFileProjectStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<i64, PersistedConfiguration>>,
}

impl JsonFileProjectStore {
    /// Loads `path`, or starts empty if it does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, GaugeError> {
        let path = path.into();
        let entries: BTreeMap<i64, PersistedConfiguration> = if path.exists() {
            let text = fs::read_to_string(&path)?;
            serde_json::from_str(&text)?
        } else {
            BTreeMap::new()
        };
        info!(path = %path.display(), instances = entries.len(), "project store opened");
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    fn write(&self, entries: &BTreeMap<i64, PersistedConfiguration>) -> Result<(), GaugeError> {
        let text = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), "project store written");
        Ok(())
    }
}

impl ProjectStore for JsonFileProjectStore {
    fn get(&self, instance_id: i64, defaults: &PersistedConfiguration) -> PersistedConfiguration {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(&instance_id)
            .cloned()
            .unwrap_or_else(|| defaults.clone())
    }

    fn update(
        &self,
        instance_id: i64,
        defaults: &PersistedConfiguration,
        updater: &dyn Fn(&PersistedConfiguration) -> PersistedConfiguration,
    ) -> Result<PersistedConfiguration, GaugeError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let next = updater(entries.get(&instance_id).unwrap_or(defaults));
        let previous = entries.insert(instance_id, next.clone());
        if let Err(err) = self.write(&entries) {
            // Keep memory and disk in agreement.
            match previous {
                Some(previous) => entries.insert(instance_id, previous),
                None => entries.remove(&instance_id),
            };
            return Err(err);
        }
        Ok(next)
    }
}

// ============================================================================
// SIGNAL DATA
// ============================================================================

/// Latest reading for one signal; `value` is `None` until data arrives.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalSample {
    pub qualified_name: String,
    pub value: Option<f64>,
}

pub trait SignalFeed {
    /// Latest samples for `qualified_names`, in the same order.
    fn subscribe(&self, qualified_names: &[String]) -> Vec<SignalSample>;
}

#[derive(Debug, Default)]
pub struct MemorySignalFeed {
    values: RwLock<HashMap<String, f64>>,
}

impl MemorySignalFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, qualified_name: &str, value: f64) {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        values.insert(qualified_name.to_string(), value);
    }
}

impl SignalFeed for MemorySignalFeed {
    fn subscribe(&self, qualified_names: &[String]) -> Vec<SignalSample> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        qualified_names
            .iter()
            .map(|name| SignalSample {
                qualified_name: name.clone(),
                value: values.get(name).copied(),
            })
            .collect()
    }
}

// ============================================================================
// SIGNAL PICKER & NOTIFIER
// ============================================================================

/// What the signal picker hands back for a chosen signal.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalDefinition {
    pub qualified_name: String,
    pub name: String,
    pub unit: Option<String>,
    pub min_value: f64,
    pub max_value: f64,
}

pub trait SignalPicker {
    /// Runs the picker; `None` when the user dismisses it.
    fn pick(&mut self) -> Option<SignalDefinition>;
}

/// Picker that always answers with the same preset signal.
#[derive(Debug, Clone, Default)]
pub struct FixedSignalPicker {
    signal: Option<SignalDefinition>,
}

impl FixedSignalPicker {
    pub fn new(signal: Option<SignalDefinition>) -> Self {
        Self { signal }
    }
}

impl SignalPicker for FixedSignalPicker {
    fn pick(&mut self) -> Option<SignalDefinition> {
        self.signal.clone()
    }
}

pub trait Notifier {
    /// Shows `message` to the user and returns once it is acknowledged.
    fn notify(&self, message: &str);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        warn!(%message, "user notification");
    }
}

/// Keeps every message; handy for headless hosts.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn temp_project_path() -> PathBuf {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        let n = COUNTER.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!("signal-gauge-host-{}-{n}.json", std::process::id()))
    }

    #[test]
    fn parses_instance_id_from_query() {
        assert_eq!(instance_id_from_query("id=3"), 3);
        assert_eq!(instance_id_from_query("?view=gauge&id=42"), 42);
        assert_eq!(instance_id_from_query(""), -1);
        assert_eq!(instance_id_from_query("?id="), -1);
        assert_eq!(instance_id_from_query("?id=abc"), -1);
        assert_eq!(instance_id_from_query("?identity=5"), -1);
    }

    #[test]
    fn memory_store_returns_defaults_until_written() {
        let store = MemoryProjectStore::new();
        let defaults = PersistedConfiguration::default();
        assert_eq!(store.get(1, &defaults), defaults);

        let next = store
            .update(1, &defaults, &|current: &PersistedConfiguration| PersistedConfiguration {
                decimals: 4,
                ..current.clone()
            })
            .unwrap();
        assert_eq!(next.decimals, 4);
        assert_eq!(store.get(1, &defaults).decimals, 4);
        assert_eq!(store.get(2, &defaults), defaults);
    }

    #[test]
    fn json_store_round_trips_through_disk() {
        let path = temp_project_path();
        let defaults = PersistedConfiguration::default();
        {
            let store = JsonFileProjectStore::open(&path).unwrap();
            store
                .update(5, &defaults, &|current: &PersistedConfiguration| PersistedConfiguration {
                    qualified_signal_name: Some("Can0.Engine.Temp".into()),
                    signal_unit: Some("°C".into()),
                    ..current.clone()
                })
                .unwrap();
        }

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"qualifiedSignalName\": \"Can0.Engine.Temp\""));

        let reopened = JsonFileProjectStore::open(&path).unwrap();
        let stored = reopened.get(5, &defaults);
        assert_eq!(stored.signal_unit.as_deref(), Some("°C"));
        assert_eq!(stored.major_ticks, 7);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn json_store_rejects_corrupt_file() {
        let path = temp_project_path();
        fs::write(&path, "not json").unwrap();
        let result = JsonFileProjectStore::open(&path);
        assert!(matches!(result, Err(GaugeError::Json(_))));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn feed_preserves_subscription_order() {
        let feed = MemorySignalFeed::new();
        feed.publish("b", 2.0);
        feed.publish("a", 1.0);

        assert!(feed.subscribe(&[]).is_empty());
        let samples = feed.subscribe(&["a".to_string(), "missing".to_string(), "b".to_string()]);
        let values: Vec<_> = samples.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![Some(1.0), None, Some(2.0)]);
        assert_eq!(samples[1].qualified_name, "missing");
    }

    #[test]
    fn recording_notifier_keeps_messages() {
        let notifier = RecordingNotifier::default();
        notifier.notify("one");
        notifier.notify("two");
        assert_eq!(notifier.messages(), vec!["one", "two"]);
    }
}
