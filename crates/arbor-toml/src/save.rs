//! Node tree to TOML text.

use crate::error::TomlError;
use crate::options::TomlOptions;
use arbor_config::{ConfigNode, ScalarValue};
use chrono::{DateTime, Datelike, FixedOffset, Timelike};
use toml::value::{Date, Datetime, Offset, Time};

/// Serialize `node` as a TOML document.
pub fn write_document(node: &ConfigNode, options: &TomlOptions) -> Result<String, TomlError> {
    let table = if node.is_virtual() {
        toml::Table::new()
    } else if node.has_map_children() {
        build_table(node, options)
    } else {
        let found = if node.has_list_children() { "list" } else { "scalar" };
        return Err(TomlError::RootNotTable { found });
    };

    tracing::debug!(entries = table.len(), "Writing TOML document");
    let text = if options.pretty() {
        toml::to_string_pretty(&table)?
    } else {
        toml::to_string(&table)?
    };
    Ok(text)
}

fn build_table(node: &ConfigNode, options: &TomlOptions) -> toml::Table {
    node.get_children_map()
        .into_iter()
        .filter_map(|(key, child)| build_value(&child, options).map(|value| (key, value)))
        .collect()
}

/// `None` for virtual nodes, which have nothing to write.
fn build_value(node: &ConfigNode, options: &TomlOptions) -> Option<toml::Value> {
    if node.has_map_children() {
        Some(toml::Value::Table(build_table(node, options)))
    } else if node.has_list_children() {
        let items = node
            .get_children_list()
            .iter()
            .filter_map(|item| build_value(item, options))
            .collect();
        Some(toml::Value::Array(items))
    } else {
        node.get_value().map(|value| scalar_value(value, options))
    }
}

fn scalar_value(value: ScalarValue, options: &TomlOptions) -> toml::Value {
    match value {
        ScalarValue::String(s) => toml::Value::String(s),
        ScalarValue::Boolean(b) => toml::Value::Boolean(b),
        ScalarValue::Int(i) => toml::Value::Integer(i64::from(i)),
        ScalarValue::Long(l) => toml::Value::Integer(l),
        // Going through the shortest decimal form keeps 0.1f32 as 0.1.
        ScalarValue::Float(f) => {
            toml::Value::Float(f.to_string().parse().unwrap_or(f64::from(f)))
        }
        ScalarValue::Double(d) => toml::Value::Float(d),
        ScalarValue::Instant(instant) => toml::Value::Datetime(datetime(
            &instant.with_timezone(&options.zone_offset()),
            options,
        )),
        ScalarValue::Date(date) => toml::Value::Datetime(datetime(&date, options)),
    }
}

fn datetime(value: &DateTime<FixedOffset>, options: &TomlOptions) -> Datetime {
    let nanosecond = if options.fractional_seconds() {
        value.nanosecond() % 1_000_000_000
    } else {
        0
    };
    let offset_seconds = value.offset().local_minus_utc();
    let offset = if offset_seconds == 0 {
        Offset::Z
    } else {
        Offset::Custom {
            minutes: (offset_seconds / 60) as i16,
        }
    };

    Datetime {
        date: Some(Date {
            year: value.year() as u16,
            month: value.month() as u8,
            day: value.day() as u8,
        }),
        time: Some(Time {
            hour: value.hour() as u8,
            minute: value.minute() as u8,
            second: value.second() as u8,
            nanosecond,
        }),
        offset: Some(offset),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_config::Value;
    use chrono::{TimeZone, Utc};

    fn tree(value: impl Into<Value>) -> ConfigNode {
        let node = ConfigNode::default();
        node.set_value(value).unwrap();
        node
    }

    #[test]
    fn test_scalars_and_tables() {
        let node = tree(Value::map([
            ("name", Value::from("arbor")),
            ("count", Value::from(3)),
            ("server", Value::map([("port", 8080)])),
        ]));
        let text = write_document(&node, &TomlOptions::default()).unwrap();
        assert_eq!(text, "name = \"arbor\"\ncount = 3\n\n[server]\nport = 8080\n");
    }

    #[test]
    fn test_virtual_root_is_empty_document() {
        let text = write_document(&ConfigNode::default(), &TomlOptions::default()).unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn test_non_table_root_fails() {
        let err = write_document(&tree(vec![1, 2]), &TomlOptions::default()).unwrap_err();
        assert!(matches!(err, TomlError::RootNotTable { found: "list" }));

        let err = write_document(&tree("text"), &TomlOptions::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot write a scalar as a TOML document, the root must be a table"
        );
    }

    #[test]
    fn test_float_keeps_short_form() {
        let node = tree(Value::map([("ratio", 0.1_f32)]));
        let text = write_document(&node, &TomlOptions::default()).unwrap();
        assert_eq!(text, "ratio = 0.1\n");
    }

    #[test]
    fn test_instant_uses_zone_offset() {
        // 2024-01-01T12:00:00.250Z
        let instant = Utc.timestamp_millis_opt(1_704_110_400_250).unwrap();
        let node = tree(Value::map([("at", instant)]));

        let utc = write_document(&node, &TomlOptions::default()).unwrap();
        assert_eq!(utc, "at = 2024-01-01T12:00:00Z\n");

        let options = TomlOptions::new()
            .with_zone_offset(FixedOffset::east_opt(3600).unwrap())
            .with_fractional_seconds(true);
        let shifted = write_document(&node, &options).unwrap();
        assert_eq!(shifted, "at = 2024-01-01T13:00:00.25+01:00\n");
    }

    #[test]
    fn test_virtual_children_are_skipped() {
        let node = tree(Value::map([("kept", 1)]));
        let _ = node.child("skipped");
        let text = write_document(&node, &TomlOptions::default()).unwrap();
        assert_eq!(text, "kept = 1\n");
    }
}
