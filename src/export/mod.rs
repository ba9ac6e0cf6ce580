// src/export/mod.rs
use crate::models::Result;
use serde_json::{Map, Value};

/// Serialize loosely-typed business records to CSV. Columns are the union
/// of all keys present, in first-encounter order; list values are joined
/// with "; ".
pub fn businesses_to_csv(records: &[Map<String, Value>]) -> Result<String> {
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
    }

    if columns.is_empty() {
        return Ok(String::new());
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&columns)?;

    for record in records {
        let row: Vec<String> = columns
            .iter()
            .map(|column| record.get(column).map(render_value).unwrap_or_default())
            .collect();
        writer.write_record(&row)?;
    }

    let bytes = writer.into_inner()?;
    Ok(String::from_utf8(bytes)?)
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(render_value)
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(json: &str) -> Map<String, Value> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn exports_present_keys_in_insertion_order() {
        let records = vec![record(r#"{"name":"Acme","website":"https://acme.test"}"#)];
        let csv = businesses_to_csv(&records).unwrap();

        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("name,website"));
        assert_eq!(lines.next(), Some("Acme,https://acme.test"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn columns_are_the_union_across_records() {
        let records = vec![
            record(r#"{"name":"Acme","website":"https://acme.test"}"#),
            record(r#"{"name":"Beta","phone":"+1 555"}"#),
        ];
        let csv = businesses_to_csv(&records).unwrap();

        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("name,website,phone"));
        assert_eq!(lines.next(), Some("Acme,https://acme.test,"));
        assert_eq!(lines.next(), Some("Beta,,+1 555"));
    }

    #[test]
    fn joins_email_lists_and_renders_scalars() {
        let records = vec![record(
            r#"{"name":"Acme","emails":["a@acme.test","b@acme.test"],"has_website":true}"#,
        )];
        let csv = businesses_to_csv(&records).unwrap();

        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("name,emails,has_website"));
        assert_eq!(lines.next(), Some("Acme,a@acme.test; b@acme.test,true"));
    }

    #[test]
    fn empty_input_yields_empty_header() {
        let csv = businesses_to_csv(&[]).unwrap();
        assert!(csv.trim().is_empty());
    }
}
