use crate::error::LoadError;
use crate::models::{Item, ItemFields, PlacedCircle};
use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use log::{info, warn};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Load items from `.csv` (header row) or `.json`, mapping columns/keys via `fields`.
///
/// JSON input is either an array of objects or an object holding such an array
/// under `data` or `items`. Values may be numbers or numeric strings. Rows with an
/// empty id, or whose value does not parse, are skipped with a warning.
pub fn load_items<P: AsRef<Path>>(path: P, fields: &ItemFields) -> Result<Vec<Item>> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    let items = match ext.as_str() {
        "csv" => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            read_csv(file, fields)?
        }
        "json" => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let v: Value = serde_json::from_str(&text)
                .with_context(|| format!("parsing {}", path.display()))?;
            items_from_json(&v, fields)?
        }
        other => return Err(LoadError::UnsupportedFormat(other.to_string()).into()),
    };
    info!("loaded {} items from {}", items.len(), path.display());
    Ok(items)
}

/// Read items from CSV data with a header row.
pub fn read_csv<R: std::io::Read>(reader: R, fields: &ItemFields) -> Result<Vec<Item>> {
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let available = || headers.iter().collect::<Vec<_>>().join(", ");
    let column = |role: &'static str, name: &str| -> Result<usize, LoadError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| LoadError::FieldMapping {
                role,
                name: name.to_string(),
                available: available(),
            })
    };
    let id_col = column("id", &fields.id)?;
    let value_col = column("value", &fields.value)?;
    // Optional columns are simply absent when missing.
    let color_col = fields
        .color
        .as_deref()
        .and_then(|n| headers.iter().position(|h| h == n));
    let icon_col = fields
        .icon
        .as_deref()
        .and_then(|n| headers.iter().position(|h| h == n));

    let mut out = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        let id = record.get(id_col).unwrap_or("").to_string();
        if id.is_empty() {
            warn!("row {}: skipping row without an id", row + 1);
            continue;
        }
        let raw = record.get(value_col).unwrap_or("");
        let Some(value) = parse_number(raw) else {
            warn!("row {}: skipping {:?}, unparseable value {:?}", row + 1, id, raw);
            continue;
        };
        let opt = |col: Option<usize>| {
            col.and_then(|c| record.get(c))
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        out.push(Item {
            id,
            value,
            color: opt(color_col),
            icon: opt(icon_col),
        });
    }
    Ok(out)
}

/// Map a parsed JSON payload onto items.
pub fn items_from_json(v: &Value, fields: &ItemFields) -> Result<Vec<Item>> {
    let rows = match v {
        Value::Array(rows) => rows,
        Value::Object(obj) => obj
            .get("data")
            .or_else(|| obj.get("items"))
            .and_then(Value::as_array)
            .ok_or(LoadError::JsonShape)?,
        _ => return Err(LoadError::JsonShape.into()),
    };
    let objects: Vec<&Map<String, Value>> = rows
        .iter()
        .map(|r| r.as_object().ok_or(LoadError::JsonShape))
        .collect::<Result<_, _>>()?;

    // The mapping must resolve on at least one row, otherwise it is wrong rather than sparse.
    for (role, name) in [("id", &fields.id), ("value", &fields.value)] {
        if !objects.is_empty() && !objects.iter().any(|o| o.contains_key(name)) {
            let mut keys: Vec<&str> = objects[0].keys().map(String::as_str).collect();
            keys.sort_unstable();
            return Err(LoadError::FieldMapping {
                role,
                name: name.clone(),
                available: keys.join(", "),
            }
            .into());
        }
    }

    let mut out = Vec::new();
    for (row, obj) in objects.iter().enumerate() {
        let id = match obj.get(&fields.id) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        if id.is_empty() {
            warn!("row {}: skipping row without an id", row + 1);
            continue;
        }
        let value = match obj.get(&fields.value) {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => parse_number(s),
            _ => None,
        };
        let Some(value) = value else {
            warn!("row {}: skipping {:?}, missing or unparseable value", row + 1, id);
            continue;
        };
        let opt = |key: &Option<String>| {
            key.as_ref()
                .and_then(|k| obj.get(k))
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        out.push(Item {
            id,
            value,
            color: opt(&fields.color),
            icon: opt(&fields.icon),
        });
    }
    Ok(out)
}

/// Keep items with a positive, finite value. Returns the kept items and how many were removed.
pub fn positive_items(items: Vec<Item>) -> (Vec<Item>, usize) {
    let before = items.len();
    let kept: Vec<Item> = items
        .into_iter()
        .filter(|i| i.value.is_finite() && i.value > 0.0)
        .collect();
    let removed = before - kept.len();
    (kept, removed)
}

/// Numbers may carry grouping commas or underscores (`"1,200"`).
fn parse_number(s: &str) -> Option<f64> {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',' && *c != '_').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// Prefix text cells that a spreadsheet would evaluate as a formula.
fn csv_safe(s: &str) -> String {
    if s.starts_with(['=', '+', '-', '@']) {
        format!("'{s}")
    } else {
        s.to_string()
    }
}

/// Save placements as CSV with header.
pub fn save_csv<P: AsRef<Path>>(circles: &[PlacedCircle], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize((
        "id", "value", "x", "y", "radius", "area", "order", "clamped", "color", "icon",
    ))?;
    for c in circles {
        wtr.serialize((
            csv_safe(&c.id),
            c.value,
            c.x,
            c.y,
            c.radius,
            c.area,
            c.order,
            c.clamped,
            c.color.as_deref().map(csv_safe),
            c.icon.as_deref().map(csv_safe),
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save placements as pretty JSON array.
pub fn save_json<P: AsRef<Path>>(circles: &[PlacedCircle], path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(circles)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_grouped_numbers() {
        assert_eq!(parse_number(" 1,200 "), Some(1200.0));
        assert_eq!(parse_number("3.5"), Some(3.5));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("n/a"), None);
    }

    #[test]
    fn csv_mapping_with_custom_columns() {
        let data = "category,amount,fill\nA,10,#ff0000\nB,oops,\nC,2.5,\n";
        let fields = ItemFields {
            id: "category".into(),
            value: "amount".into(),
            color: Some("fill".into()),
            icon: None,
        };
        let items = read_csv(data.as_bytes(), &fields).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], Item::new("A", 10.0).with_color("#ff0000"));
        assert_eq!(items[1], Item::new("C", 2.5));
    }

    #[test]
    fn rows_without_an_id_are_skipped() {
        let v = serde_json::json!([
            {"id": null, "value": 1},
            {"value": 2},
            {"id": "", "value": 3},
            {"id": "kept", "value": 4}
        ]);
        let items = items_from_json(&v, &ItemFields::default()).unwrap();
        assert_eq!(items, vec![Item::new("kept", 4.0)]);

        let data = "id,value\n,1\n  ,2\nkept,4\n";
        let items = read_csv(data.as_bytes(), &ItemFields::default()).unwrap();
        assert_eq!(items, vec![Item::new("kept", 4.0)]);
    }

    #[test]
    fn positive_filter_counts_removed() {
        let items = vec![
            Item::new("a", 1.0),
            Item::new("b", 0.0),
            Item::new("c", -3.0),
            Item::new("d", f64::NAN),
        ];
        let (kept, removed) = positive_items(items);
        assert_eq!(kept.len(), 1);
        assert_eq!(removed, 3);
    }
}
