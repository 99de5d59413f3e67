use bubblepack::viz::{self, PreviewOptions, Shape};
use bubblepack::{CirclePacker, Item, PlacedCircle};
use std::fs;
use std::path::PathBuf;

fn sample_layout() -> Vec<PlacedCircle> {
    let items = vec![
        Item::new("Population", 83_000_000.0).with_color("#1f77b4"),
        Item::new("Exports", 41_000_000.0),
        Item::new("=tiny", 2_000_000.0).with_color("not-a-color"),
    ];
    CirclePacker::default()
        .pack(&items, 400.0, 300.0)
        .unwrap()
        .into_circles()
}

fn write_and_check(circles: &[PlacedCircle], name: &str, opts: &PreviewOptions) -> String {
    let dir = tempfile::tempdir().unwrap();
    let path: PathBuf = dir.path().join(name);
    viz::render_preview(circles, 400.0, 300.0, &path, opts).unwrap();
    let meta = fs::metadata(&path).expect("file created");
    assert!(meta.len() > 0, "{name} has content");
    if name.ends_with(".svg") {
        fs::read_to_string(&path).unwrap()
    } else {
        String::new()
    }
}

#[test]
fn every_shape_renders_to_svg() {
    let circles = sample_layout();
    assert!(!circles.is_empty());
    for (i, shape) in [Shape::Circle, Shape::Square, Shape::Triangle].into_iter().enumerate() {
        let opts = PreviewOptions {
            shape,
            ..PreviewOptions::default()
        };
        let svg = write_and_check(&circles, &format!("shape{i}.svg"), &opts);
        assert!(svg.contains("<svg"));
    }
}

#[test]
fn svg_labels_use_the_item_ids() {
    let circles = sample_layout();
    let svg = write_and_check(&circles, "labels.svg", &PreviewOptions::default());
    assert!(svg.contains("Population"), "largest item should be labelled");
}

#[test]
fn labels_can_be_disabled() {
    let circles = sample_layout();
    let opts = PreviewOptions {
        draw_labels: false,
        ..PreviewOptions::default()
    };
    let svg = write_and_check(&circles, "nolabels.svg", &opts);
    assert!(!svg.contains("<text"));
}

#[test]
fn png_preview_is_written() {
    let circles = sample_layout();
    write_and_check(&circles, "preview.png", &PreviewOptions::default());
}

#[test]
fn empty_layout_still_renders() {
    write_and_check(&[], "empty.svg", &PreviewOptions::default());
}

#[test]
fn non_positive_canvas_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.svg");
    assert!(viz::render_preview(&[], 0.0, 100.0, &path, &PreviewOptions::default()).is_err());
}

#[test]
fn long_ids_are_cut_with_an_ellipsis() {
    let circles = vec![PlacedCircle {
        id: "Supercalifragilistic".into(),
        value: 1.0,
        x: 50.0,
        y: 50.0,
        radius: 20.0,
        area: std::f64::consts::PI * 400.0,
        order: 0,
        clamped: false,
        color: None,
        icon: None,
    }];
    let svg = write_and_check(&circles, "truncated.svg", &PreviewOptions::default());
    assert!(svg.contains("Super…"), "expected a truncated label");
    assert!(!svg.contains("Supercalifragilistic"));
}
