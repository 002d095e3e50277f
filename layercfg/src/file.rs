//! Configuration files: format detection and decoding.
//!
//! JSON, YAML and TOML documents are decoded into a generic value tree and
//! matched against the record by their format annotation (`json`, `yaml`,
//! `toml`), writing every value they contain. Dotenv files are flattened to
//! key/value pairs and go through the same keyed writer as the environment.

use std::collections::HashMap;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::ConfError;
use crate::record::{Record, Slot};

/// Supported file formats, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
    Toml,
    Dotenv,
}

impl Format {
    /// Detect the format from the extension of `path`, case-insensitively.
    ///
    /// The extension is whatever follows the last `.` of the file name, so a
    /// bare `.env` counts. Returns `None` for anything other than `.json`,
    /// `.yaml`, `.yml`, `.toml` and `.env`.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        let (_, extension) = name.rsplit_once('.')?;
        match extension.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            "env" => Some(Self::Dotenv),
            _ => None,
        }
    }

    /// Name used in error messages; also the annotation the format reads.
    pub fn name(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Toml => "toml",
            Self::Dotenv => "dotenv",
        }
    }
}

/// Parse a structured document into a value tree.
pub(crate) fn parse_document(format: Format, content: &str) -> Result<Value, ConfError> {
    let parsed: Value = match format {
        Format::Json => serde_json::from_str(content).map_err(|e| ConfError::decode("json", e)),
        Format::Yaml => serde_yaml::from_str(content).map_err(|e| ConfError::decode("yaml", e)),
        Format::Toml => toml::from_str(content).map_err(|e| ConfError::decode("toml", e)),
        Format::Dotenv => Err(ConfError::decode(
            "dotenv",
            "dotenv files are not structured documents",
        )),
    }?;

    if parsed.is_object() {
        Ok(parsed)
    } else {
        Err(ConfError::decode(
            format.name(),
            format!("expected a mapping at the top level, found {}", kind_of(&parsed)),
        ))
    }
}

/// Parse dotenv content (`KEY=value` lines) into a flat map.
pub(crate) fn parse_dotenv(content: &str) -> Result<HashMap<String, String>, ConfError> {
    dotenvy::from_read_iter(content.as_bytes())
        .map(|item| item.map_err(|e| ConfError::decode("dotenv", e)))
        .collect()
}

/// Write every value of `document` into the matching fields of `record`.
///
/// Fields are matched by the `format` annotation (text before the first
/// `,`; `-` skips the field) or else by field name, exactly first and then
/// ignoring ASCII case. Missing keys and `null` leave fields untouched.
pub(crate) fn apply_document(
    record: &mut dyn Record,
    document: &Value,
    format: Format,
) -> Result<(), ConfError> {
    match document {
        Value::Object(map) => apply_object(record, map, format, ""),
        other => Err(ConfError::decode(
            format.name(),
            format!("expected a mapping, found {}", kind_of(other)),
        )),
    }
}

fn apply_object(
    record: &mut dyn Record,
    map: &Map<String, Value>,
    format: Format,
    prefix: &str,
) -> Result<(), ConfError> {
    let mut result = Ok(());

    record.visit_mut(&mut |field, slot| {
        if result.is_err() {
            return;
        }

        let key = match field.annotation(format.name()) {
            Some(tag) => tag.split(',').next().unwrap_or(tag),
            None => field.name(),
        };
        if key == "-" {
            return;
        }
        let key = if key.is_empty() { field.name() } else { key };

        let Some(value) = lookup(map, key) else {
            return;
        };
        let path = format!("{prefix}{}", field.name());
        result = apply_value(slot, value, format, &path);
    });

    result
}

fn lookup<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).or_else(|| {
        map.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    })
}

fn apply_value(slot: Slot<'_>, value: &Value, format: Format, path: &str) -> Result<(), ConfError> {
    if value.is_null() {
        return Ok(());
    }

    let mismatch = |expected: &str| {
        ConfError::decode(
            format.name(),
            format!("{path}: expected {expected}, found {}", kind_of(value)),
        )
    };

    match slot {
        Slot::String(dst) => *dst = value.as_str().ok_or_else(|| mismatch("a string"))?.to_string(),
        Slot::I8(dst) => *dst = integer(value, format, path)?,
        Slot::I16(dst) => *dst = integer(value, format, path)?,
        Slot::I32(dst) => *dst = integer(value, format, path)?,
        Slot::I64(dst) => *dst = integer(value, format, path)?,
        Slot::Isize(dst) => *dst = integer(value, format, path)?,
        Slot::U8(dst) => *dst = integer(value, format, path)?,
        Slot::U16(dst) => *dst = integer(value, format, path)?,
        Slot::U32(dst) => *dst = integer(value, format, path)?,
        Slot::U64(dst) => *dst = integer(value, format, path)?,
        Slot::Usize(dst) => *dst = integer(value, format, path)?,
        Slot::F32(dst) => *dst = value.as_f64().ok_or_else(|| mismatch("a number"))? as f32,
        Slot::F64(dst) => *dst = value.as_f64().ok_or_else(|| mismatch("a number"))?,
        Slot::Bool(dst) => *dst = value.as_bool().ok_or_else(|| mismatch("a boolean"))?,
        Slot::Record(nested) => {
            let map = value.as_object().ok_or_else(|| mismatch("a mapping"))?;
            apply_object(nested, map, format, &format!("{path}."))?;
        }
    }
    Ok(())
}

/// Convert a JSON integer into the field's integer type, rejecting fractions
/// and values out of range.
fn integer<T>(value: &Value, format: Format, path: &str) -> Result<T, ConfError>
where
    T: TryFrom<i64> + TryFrom<u64>,
{
    let converted = match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(|i| <T as TryFrom<i64>>::try_from(i).ok())
            .or_else(|| n.as_u64().and_then(|u| <T as TryFrom<u64>>::try_from(u).ok())),
        _ => None,
    };

    converted.ok_or_else(|| {
        ConfError::decode(
            format.name(),
            format!(
                "{path}: expected an integer in range of {}, found {value}",
                short_type_name::<T>()
            ),
        )
    })
}

fn short_type_name<T>() -> &'static str {
    let name = std::any::type_name::<T>();
    name.rsplit("::").next().unwrap_or(name)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a mapping",
    }
}
