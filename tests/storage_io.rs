use bubblepack::models::{Item, ItemFields, PlacedCircle};
use bubblepack::{LoadError, storage};
use std::fs;
use std::path::PathBuf;

fn sample(n: usize) -> Vec<PlacedCircle> {
    (0..n)
        .map(|i| PlacedCircle {
            id: format!("item{i}"),
            value: 10.0 - i as f64,
            x: 20.0 + 40.0 * i as f64,
            y: 20.0,
            radius: 18.0,
            area: std::f64::consts::PI * 324.0,
            order: i,
            clamped: false,
            color: (i == 0).then(|| "#4472C4".to_string()),
            icon: None,
        })
        .collect()
}

#[test]
fn load_csv_with_default_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("items.csv");
    fs::write(&path, "id,value,color\nNorth,1200,#ff0000\nSouth,\"1,500\",\nEast,n/a,\n").unwrap();

    let items = storage::load_items(&path, &ItemFields::default()).unwrap();
    assert_eq!(
        items,
        vec![
            Item::new("North", 1200.0).with_color("#ff0000"),
            Item::new("South", 1500.0),
        ]
    );
}

#[test]
fn load_json_wrapped_under_data_with_custom_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("items.json");
    fs::write(
        &path,
        r#"{"data": [
            {"name": "a", "amount": 3, "logo": "a.png"},
            {"name": "b", "amount": "4.5"},
            {"name": "c"}
        ]}"#,
    )
    .unwrap();
    let fields = ItemFields {
        id: "name".into(),
        value: "amount".into(),
        color: None,
        icon: Some("logo".into()),
    };

    let items = storage::load_items(&path, &fields).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0], Item::new("a", 3.0).with_icon("a.png"));
    assert_eq!(items[1], Item::new("b", 4.5));
}

#[test]
fn missing_value_column_is_a_mapping_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("items.csv");
    fs::write(&path, "id,amount\nA,1\n").unwrap();

    let err = storage::load_items(&path, &ItemFields::default()).unwrap_err();
    match err.downcast_ref::<LoadError>() {
        Some(LoadError::FieldMapping { role, name, available }) => {
            assert_eq!(*role, "value");
            assert_eq!(name, "value");
            assert!(available.contains("amount"));
        }
        other => panic!("expected a field mapping error, got {other:?}"),
    }
}

#[test]
fn unknown_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("items.xlsx");
    fs::write(&path, "").unwrap();
    let err = storage::load_items(&path, &ItemFields::default()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LoadError>(),
        Some(LoadError::UnsupportedFormat(ext)) if ext == "xlsx"
    ));
}

#[test]
fn json_scalar_is_a_shape_error() {
    let v = serde_json::json!(42);
    let err = storage::items_from_json(&v, &ItemFields::default()).unwrap_err();
    assert!(matches!(err.downcast_ref::<LoadError>(), Some(LoadError::JsonShape)));
}

#[test]
fn save_csv_and_json() {
    let rows = sample(3);
    let tmp = std::env::temp_dir();

    let csv_path: PathBuf = tmp.join("bubblepack_test.csv");
    storage::save_csv(&rows, &csv_path).unwrap();
    let csv_txt = fs::read_to_string(&csv_path).unwrap();
    assert!(csv_txt.starts_with("id,value,x,y,radius,area,order,clamped,color,icon"));
    assert_eq!(csv_txt.lines().count(), 1 + rows.len());
    fs::remove_file(&csv_path).ok();

    let json_path: PathBuf = tmp.join("bubblepack_test.json");
    storage::save_json(&rows, &json_path).unwrap();
    let json_txt = fs::read_to_string(&json_path).unwrap();
    let back: Vec<PlacedCircle> = serde_json::from_str(&json_txt).unwrap();
    assert_eq!(back.len(), rows.len());
    assert_eq!(back[0].id, "item0");
    assert_eq!(back[0].color.as_deref(), Some("#4472C4"));
    assert!(back[1].color.is_none());
    assert!((back[2].x - 100.0).abs() < 1e-9);
    fs::remove_file(&json_path).ok();
}

// Text cells starting with = + - @ would be evaluated by spreadsheet apps,
// so they are written with a leading single quote.
#[test]
fn csv_cells_are_prefixed_to_avoid_formulas() {
    let mut circles = sample(1);
    circles[0].id = "=HYPERLINK(\"http://evil\")".into();
    circles[0].icon = Some("@foo".into());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("csv_injection.csv");
    storage::save_csv(&circles, &path).unwrap();

    let mut rdr = csv::Reader::from_path(&path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    let row = rdr.records().next().expect("one data row expected").unwrap();
    let cell = |name: &str| {
        let idx = headers.iter().position(|h| h == name).expect("header present");
        row.get(idx).unwrap().to_string()
    };

    let id = cell("id");
    assert!(id.starts_with('\''), "id not prefixed: {id}");
    assert!(id.contains("=HYPERLINK"), "id content changed: {id}");
    assert_eq!(cell("icon"), "'@foo");
    // Plain values stay untouched.
    assert_eq!(cell("color"), "#4472C4");
}
