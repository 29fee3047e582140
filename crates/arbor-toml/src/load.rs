//! TOML text to node tree.

use crate::error::TomlError;
use crate::options::TomlOptions;
use arbor_config::{ConfigNode, ScalarValue, Value};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use toml::value::{Datetime, Offset};

/// Parse `text` and populate `node` with its contents.
pub fn read_document(
    text: &str,
    node: &ConfigNode,
    options: &TomlOptions,
) -> Result<(), TomlError> {
    let table: toml::Table = toml::from_str(text)?;
    tracing::debug!(entries = table.len(), "Reading TOML document");
    read_table(&table, node, options)
}

fn read_table(
    table: &toml::Table,
    node: &ConfigNode,
    options: &TomlOptions,
) -> Result<(), TomlError> {
    if table.is_empty() && node.is_virtual() {
        node.set_value(Value::Map(Default::default()))?;
        return Ok(());
    }
    for (key, value) in table {
        read_value(value, &node.child(key), options)?;
    }
    Ok(())
}

fn read_array(
    items: &[toml::Value],
    node: &ConfigNode,
    options: &TomlOptions,
) -> Result<(), TomlError> {
    if items.is_empty() && node.is_virtual() {
        node.set_value(Value::List(Vec::new()))?;
        return Ok(());
    }
    for item in items {
        read_value(item, &node.get_appended_node(), options)?;
    }
    Ok(())
}

fn read_value(
    value: &toml::Value,
    node: &ConfigNode,
    options: &TomlOptions,
) -> Result<(), TomlError> {
    match value {
        toml::Value::Table(table) => read_table(table, node, options),
        toml::Value::Array(items) => read_array(items, node, options),
        toml::Value::String(s) => Ok(node.set_value(s.as_str())?),
        toml::Value::Integer(i) => Ok(node.set_value(*i)?),
        toml::Value::Float(f) => Ok(node.set_value(*f)?),
        toml::Value::Boolean(b) => Ok(node.set_value(*b)?),
        toml::Value::Datetime(dt) => {
            Ok(node.set_value(datetime_value(dt, options.zone_offset()))?)
        }
    }
}

/// Offset date-times keep their offset; local date-times and dates are placed
/// at `zone`. Local times have no date and stay as text.
fn datetime_value(dt: &Datetime, zone: FixedOffset) -> ScalarValue {
    let converted = dt.date.and_then(|date| {
        let date = NaiveDate::from_ymd_opt(
            i32::from(date.year),
            u32::from(date.month),
            u32::from(date.day),
        )?;
        let time = match dt.time {
            Some(time) => NaiveTime::from_hms_nano_opt(
                u32::from(time.hour),
                u32::from(time.minute),
                u32::from(time.second),
                time.nanosecond,
            )?,
            None => NaiveTime::MIN,
        };
        let offset = match dt.offset {
            Some(Offset::Z) => FixedOffset::east_opt(0)?,
            Some(Offset::Custom { minutes }) => FixedOffset::east_opt(i32::from(minutes) * 60)?,
            None => zone,
        };
        local_to_date(NaiveDateTime::new(date, time), offset)
    });

    match converted {
        Some(date) => ScalarValue::Date(date),
        None => ScalarValue::String(dt.to_string()),
    }
}

fn local_to_date(local: NaiveDateTime, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    offset.from_local_datetime(&local).single()
}
