use std::sync::atomic::{AtomicUsize, Ordering};

use signal_gauge::{
    compose, generate_ticks, instance_id_from_query, Canvas, ConfigError, DrawCommand, EditField,
    FixedSignalPicker, GaugeError, GaugeGeometry, GaugeStyle, GaugeView, JsonFileProjectStore,
    MemoryProjectStore, MemorySignalFeed, PersistedConfiguration, Point, ProjectStore,
    RecordingNotifier, SignalDefinition, TickStyle,
};

fn memory_view(id: i64) -> GaugeView<MemoryProjectStore, MemorySignalFeed> {
    GaugeView::new(id, MemoryProjectStore::new(), MemorySignalFeed::new(), GaugeStyle::default())
}

fn rpm_signal(min: f64, max: f64) -> SignalDefinition {
    SignalDefinition {
        qualified_name: "Can1.Engine.Rpm".to_string(),
        name: "Engine Speed".to_string(),
        unit: Some("rpm".to_string()),
        min_value: min,
        max_value: max,
    }
}

#[test]
fn default_gauge_has_seven_labelled_majors() {
    let geometry = GaugeGeometry::new(
        Point::new(200.0, 180.0),
        120.0,
        150.0,
        ((-110.0_f64).to_radians(), 110.0_f64.to_radians()),
        (-500.0, 500.0),
    )
    .unwrap();
    let ticks = generate_ticks(&geometry, 7, 4, &TickStyle::default());
    let labels: Vec<_> = ticks
        .iter()
        .filter_map(|t| t.label())
        .map(|l| l.text.parse::<f64>().unwrap())
        .collect();
    let expected = [-500.0, -333.33, -166.67, 0.0, 166.67, 333.33, 500.0];
    assert_eq!(labels.len(), 7);
    for (label, expected) in labels.iter().zip(expected) {
        assert!((label - expected).abs() < 0.01);
    }
    assert_eq!(ticks.len(), 7 + 6 * 4);
}

#[test]
fn inverted_signal_range_selects_default_domain() {
    let view = memory_view(2);
    let mut picker = FixedSignalPicker::new(Some(rpm_signal(10.0, 0.0)));
    assert!(view.select_signal(&mut picker).unwrap());

    let config = view.configuration();
    assert_eq!(config.qualified_signal_name.as_deref(), Some("Can1.Engine.Rpm"));
    assert_eq!(config.signal_unit.as_deref(), Some("rpm"));
    assert_eq!((config.min_signal_value, config.max_signal_value), (-500.0, 500.0));
}

#[test]
fn unselected_gauge_shows_placeholder_without_pointer() {
    let view = memory_view(3);
    view.feed().publish("Can1.Engine.Rpm", 900.0);
    let scene = view.render(400.0, 360.0).unwrap();

    assert!(scene.texts().any(|t| t == "No signal selected"));
    assert!(!scene
        .commands()
        .iter()
        .any(|c| matches!(c, DrawCommand::Circle { .. })));
}

#[test]
fn selected_signal_without_samples_shows_no_data() {
    let view = memory_view(3);
    view.apply_signal(&rpm_signal(0.0, 8000.0)).unwrap();
    let scene = view.render(400.0, 360.0).unwrap();
    assert!(scene.texts().any(|t| t == "No data"));
}

#[test]
fn dialog_round_trip_through_view() {
    let mut view = memory_view(4);
    let notifier = RecordingNotifier::default();

    view.open_config();
    view.cancel_config();
    assert_eq!(view.configuration(), PersistedConfiguration::default());

    view.open_config();
    let buffer = view.dialog_mut().buffer_mut().unwrap();
    for (field, input) in [
        (EditField::MinSignalValue, "0"),
        (EditField::MaxSignalValue, "8000"),
        (EditField::Decimals, "0"),
        (EditField::ShowUnitLabel, "false"),
        (EditField::ShowValueLabel, "true"),
        (EditField::ShowPointer, "false"),
        (EditField::ShowTicks, "true"),
        (EditField::MajorTicks, "9"),
        (EditField::MinorTicksPerMajor, "1"),
    ] {
        buffer.set_text(field, input).unwrap();
    }
    let saved = buffer.clone();
    view.save_config(&notifier).unwrap();

    view.open_config();
    assert_eq!(view.dialog().buffer(), Some(&saved));
    assert!(notifier.messages().is_empty());
}

#[test]
fn inverted_range_save_is_refused() {
    let mut view = memory_view(5);
    let notifier = RecordingNotifier::default();
    view.open_config();
    let buffer = view.dialog_mut().buffer_mut().unwrap();
    buffer.set_min_signal_value(10.0).unwrap();
    buffer.set_max_signal_value(5.0).unwrap();

    let err = view.save_config(&notifier).unwrap_err();
    assert!(matches!(err, GaugeError::Config(ConfigError::InvalidRange { .. })));
    assert!(view.dialog().is_open());
    assert_eq!(view.configuration(), PersistedConfiguration::default());
    assert_eq!(notifier.messages().len(), 1);
}

#[test]
fn malformed_query_maps_to_unused_instance() {
    assert_eq!(instance_id_from_query("?id=7"), 7);
    assert_eq!(instance_id_from_query("?id=seven"), -1);
    assert_eq!(instance_id_from_query(""), -1);
}

#[test]
fn json_project_keeps_instances_apart() {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let path = std::env::temp_dir().join(format!(
        "signal-gauge-scenarios-{}-{}.json",
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::SeqCst)
    ));

    let store = JsonFileProjectStore::open(&path).unwrap();
    let first = GaugeView::new(1, store, MemorySignalFeed::new(), GaugeStyle::default());
    first.apply_signal(&rpm_signal(0.0, 8000.0)).unwrap();

    let reopened = JsonFileProjectStore::open(&path).unwrap();
    let defaults = PersistedConfiguration::default();
    assert_eq!(reopened.get(1, &defaults).max_signal_value, 8000.0);
    assert_eq!(reopened.get(2, &defaults), defaults);
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn rendered_frame_paints_reference_arc() {
    let style = GaugeStyle::default();
    let (width, height) = (400usize, 360usize);
    let config = PersistedConfiguration {
        show_ticks: false,
        ..PersistedConfiguration::default()
    };
    let scene = compose(
        &config,
        None,
        (width as f64, height as f64),
        &style,
    )
    .unwrap();

    let mut frame = vec![0u8; width * height * 4];
    let mut canvas = Canvas::new(&mut frame, width, height);
    scene.render(&mut canvas, None);

    let (cx, cy, ring) = scene
        .commands()
        .iter()
        .find_map(|c| match c {
            DrawCommand::Arc {
                cx,
                cy,
                inner_radius,
                outer_radius,
                ..
            } => Some((*cx, *cy, (inner_radius + outer_radius) / 2.0)),
            _ => None,
        })
        .unwrap();
    let top = canvas
        .pixel(cx.round() as usize, (cy - ring).round() as usize)
        .unwrap();
    let arc = style.reference_arc_color;
    assert_eq!(top, [arc.r, arc.g, arc.b, 0xff]);

    let corner = canvas.pixel(0, height - 1).unwrap();
    let bg = style.background_color;
    assert_eq!(corner, [bg.r, bg.g, bg.b, 0xff]);
}
