use derive_more::Display;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Display)]
pub enum WidgetKind {
    Counter,
    Table,
    Histogram,
    Scatter,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
pub enum WidgetSize {
    Half,
    Full,
}

/// A rendering artifact. Widgets are plain data; turning them into HTML is left to consumers.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct Widget {
    pub title: String,
    pub kind: WidgetKind,
    pub size: WidgetSize,
    pub params: Value,
}

impl Widget {
    pub fn new(title: &str, kind: WidgetKind, size: WidgetSize, params: Value) -> Widget {
        Widget {
            title: title.to_owned(),
            kind,
            size,
            params,
        }
    }

    pub fn counter(title: &str, label: &str, value: f64) -> Widget {
        Widget::new(
            title,
            WidgetKind::Counter,
            WidgetSize::Half,
            json!({ "counters": [{ "label": label, "value": value }] }),
        )
    }

    pub fn table(title: &str, header: &[&str], rows: Vec<Vec<Value>>) -> Widget {
        Widget::new(
            title,
            WidgetKind::Table,
            WidgetSize::Full,
            json!({ "header": header, "data": rows }),
        )
    }
}
