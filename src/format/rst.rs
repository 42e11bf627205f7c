use super::{FormatKind, Resolution, AUTOGENERATED_PROMPT};
use crate::record::{Columns, Record};
use crate::text::{Cell, Text};

const NEW_ROW: &str = "   *";
const NEW_ITEM: &str = "     -";

pub(super) fn render(columns: &Columns, records: &[Record]) -> String {
    let mut result = vec![
        format!(".. {AUTOGENERATED_PROMPT}"),
        String::new(),
        ".. list-table::".to_string(),
        "   :header-rows: 1".to_string(),
        String::new(),
    ];

    result.push(NEW_ROW.to_string());
    for heading in columns.headings() {
        result.push(item(&render_text(heading)));
    }

    for record in records {
        result.push(NEW_ROW.to_string());
        for column in columns {
            result.push(item(&render_cell(record.get(&column.key))));
        }
    }

    result.join("\n")
}

/// Every cell needs an item marker to keep the columns aligned, even an empty one.
fn item(rst: &str) -> String {
    if rst.is_empty() {
        NEW_ITEM.to_string()
    } else {
        format!("{NEW_ITEM} {rst}")
    }
}

/// rst has no hover text, so the longer details replace the short label.
fn render_text(text: &Text) -> String {
    let label = text.details().unwrap_or(text.text());
    match FormatKind::Rst.link(text, Resolution::Render) {
        Some(link) => format!(":any:`{label} <{link}>`"),
        None => label.to_string(),
    }
}

fn render_cell(cell: &Cell) -> String {
    match cell {
        Cell::Empty => String::new(),
        Cell::One(text) => render_text(text),
        Cell::Many(texts) => texts
            .iter()
            .map(render_text)
            .collect::<Vec<_>>()
            .join(", "),
    }
}
