use serde::{Deserialize, Serialize};

/// One weighted input item. `color` and `icon` are carried through to the
/// output untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Item {
    pub fn new(id: impl Into<String>, value: f64) -> Self {
        Self {
            id: id.into(),
            value,
            color: None,
            icon: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Final position and size of one item (one row = one circle).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlacedCircle {
    pub id: String,
    pub value: f64,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    /// Area derived from the (possibly clamped) radius.
    pub area: f64,
    /// Descending-area rank among the placed circles; 0 is the largest and is drawn first.
    pub order: usize,
    /// True when the radius hit `min_radius` or `max_radius`.
    pub clamped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Column (CSV) or key (JSON) names used to map raw rows onto [`Item`]s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFields {
    pub id: String,
    pub value: String,
    pub color: Option<String>,
    pub icon: Option<String>,
}

impl Default for ItemFields {
    fn default() -> Self {
        Self {
            id: "id".into(),
            value: "value".into(),
            color: Some("color".into()),
            icon: Some("icon".into()),
        }
    }
}
