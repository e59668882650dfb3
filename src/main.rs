use std::env;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use rand::Rng;
use tracing::info;

use signal_gauge::{
    GaugeCommand, GaugeError, GaugeStyle, GaugeView, JsonFileProjectStore, MemorySignalFeed,
    SignalDefinition,
};

const DEMO_SIGNAL: &str = "Demo.Engine.CoolantTemp";

fn main() -> Result<(), GaugeError> {
    tracing_subscriber::fmt::init();

    let project = env::var("GAUGE_PROJECT").unwrap_or_else(|_| "gauge-project.json".to_string());
    let query = env::var("GAUGE_VIEW_QUERY").unwrap_or_else(|_| "id=1".to_string());
    let style = GaugeStyle::builder()
        .maybe_font_path(env::var_os("GAUGE_FONT").map(Into::into))
        .build();

    let store = JsonFileProjectStore::open(project)?;
    let mut view = GaugeView::from_query(&query, store, MemorySignalFeed::new(), style);

    if view.configuration().qualified_signal_name.is_none() {
        info!(signal = DEMO_SIGNAL, "no signal selected; picking the demo signal");
        let signal = SignalDefinition {
            qualified_name: DEMO_SIGNAL.to_string(),
            name: "Coolant Temperature".to_string(),
            unit: Some("°C".to_string()),
            min_value: -40.0,
            max_value: 140.0,
        };
        view.apply_signal(&signal)?;
    }

    let target = view
        .configuration()
        .qualified_signal_name
        .unwrap_or_else(|| DEMO_SIGNAL.to_string());
    let (sender, receiver) = mpsc::channel();

    // Random walk standing in for a live bus signal.
    thread::spawn(move || {
        let mut rng = rand::rng();
        let mut value: f64 = 80.0;
        loop {
            value = (value + rng.random_range(-2.5..2.5)).clamp(-40.0, 140.0);
            let sample = GaugeCommand::Sample {
                qualified_name: target.clone(),
                value,
            };
            if sender.send(sample).is_err() {
                break;
            }
            thread::sleep(Duration::from_millis(100));
        }
    });

    view.show_with_commands(receiver)
}
