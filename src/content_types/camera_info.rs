//! Camera info stored in the `INFO` frame.
//!
//! The payload is a protobuf message. Decoding is delegated to an
//! `InfoDecoder`. The default one parses the message with the `protobuf`
//! crate, keeping every field as an unknown field, and names fields from
//! a table of known field numbers. Nested messages are flattened into
//! `parent.child` names.

use protobuf::{well_known_types::empty::Empty, Message, UnknownValueRef};
use serde::{ser::SerializeMap, Serialize, Serializer};

use crate::{
    constants::{INSV_INFO_GYRO_FIELD, INSV_INFO_GYRO_KEY},
    InsvError,
};

use super::gyro::to_hex;

/// Max depth for nested messages.
const MAX_NESTING: usize = 8;

/// Known top-level field numbers.
const INFO_FIELD_NAMES: &[(u32, &str)] = &[
    (1, "serial_number"),
    (2, "camera_type"),
    (3, "fw_version"),
    (5, "offset"),
    (8, "creation_time"),
    (11, "total_time"),
    (INSV_INFO_GYRO_FIELD, INSV_INFO_GYRO_KEY),
];

/// Camera info value, after flattening.
#[derive(Debug, Clone, PartialEq)]
pub enum InfoValue {
    Unsigned(u64),
    Text(String),
    Bytes(Vec<u8>),
    /// Repeated field.
    List(Vec<InfoValue>),
}

impl InfoValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Unsigned(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            Self::Text(s) => Some(s.as_bytes()),
            _ => None,
        }
    }
}

/// Bytes serialize as a lower case hex string.
impl Serialize for InfoValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Unsigned(v) => serializer.serialize_u64(*v),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Bytes(b) => serializer.serialize_str(&to_hex(b)),
            Self::List(values) => serializer.collect_seq(values),
        }
    }
}

/// Flattened camera info, in decoded order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CameraInfo {
    fields: Vec<(String, InfoValue)>,
}

impl CameraInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value. A name that is already present
    /// becomes a list (repeated field).
    pub fn insert(&mut self, name: &str, value: InfoValue) {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, InfoValue::List(values))) => values.push(value),
            Some((_, existing)) => {
                let first = std::mem::replace(existing, InfoValue::List(Vec::new()));
                *existing = InfoValue::List(vec![first, value]);
            }
            None => self.fields.push((name.to_owned(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&InfoValue> {
        self.fields.iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, InfoValue)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Gyro record width, the byte length of the gyro field.
    /// `None` if the field is absent or empty.
    pub fn gyro_record_size(&self) -> Option<usize> {
        self.get(INSV_INFO_GYRO_KEY)
            .and_then(|v| v.as_bytes())
            .map(|b| b.len())
            .filter(|len| *len > 0)
    }
}

impl Serialize for CameraInfo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in self.fields.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Turns an `INFO` payload into named fields.
pub trait InfoDecoder {
    fn decode(&self, payload: &[u8]) -> Result<CameraInfo, InsvError>;
}

/// Default decoder: protobuf message without schema, field names from
/// a table of known numbers, `field_<N>` otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtobufInfoDecoder;

impl ProtobufInfoDecoder {
    fn field_name(prefix: Option<&str>, number: u32) -> String {
        let name = match prefix {
            None => INFO_FIELD_NAMES.iter()
                .find(|(n, _)| *n == number)
                .map(|(_, name)| name.to_string()),
            Some(_) => None,
        }
        .unwrap_or_else(|| format!("field_{number}"));

        match prefix {
            Some(p) => format!("{p}.{name}"),
            None => name,
        }
    }

    fn flatten(
        info: &mut CameraInfo,
        bytes: &[u8],
        prefix: Option<&str>,
        depth: usize,
    ) -> Result<(), InsvError> {
        let message = Empty::parse_from_bytes(bytes)?;
        let mut fields: Vec<(u32, UnknownValueRef)> = message.special_fields
            .unknown_fields()
            .iter()
            .collect();
        // Stable, repeated values keep their order
        fields.sort_by_key(|(number, _)| *number);

        for (number, value) in fields {
            let name = Self::field_name(prefix, number);
            match value {
                UnknownValueRef::Varint(v) | UnknownValueRef::Fixed64(v) => {
                    info.insert(&name, InfoValue::Unsigned(v))
                }
                UnknownValueRef::Fixed32(v) => info.insert(&name, InfoValue::Unsigned(v as u64)),
                UnknownValueRef::LengthDelimited(data) if prefix.is_none() && number == INSV_INFO_GYRO_FIELD => {
                    info.insert(&name, InfoValue::Bytes(data.to_owned()))
                }
                UnknownValueRef::LengthDelimited(data) => {
                    // Printable text first, then nested message, raw bytes as last resort
                    if let Some(text) = printable(data) {
                        info.insert(&name, InfoValue::Text(text));
                    } else if depth < MAX_NESTING && is_message(data) {
                        Self::flatten(info, data, Some(&name), depth + 1)?;
                    } else {
                        info.insert(&name, InfoValue::Bytes(data.to_owned()));
                    }
                }
            }
        }
        Ok(())
    }
}

impl InfoDecoder for ProtobufInfoDecoder {
    fn decode(&self, payload: &[u8]) -> Result<CameraInfo, InsvError> {
        let mut info = CameraInfo::new();
        Self::flatten(&mut info, payload, None, 0)?;
        log::debug!("Decoded {} camera info fields", info.len());
        Ok(info)
    }
}

/// Parses as a protobuf message with at least one field.
fn is_message(data: &[u8]) -> bool {
    Empty::parse_from_bytes(data)
        .is_ok_and(|m| m.special_fields.unknown_fields().iter().next().is_some())
}

fn printable(data: &[u8]) -> Option<String> {
    let text = std::str::from_utf8(data).ok()?;
    text.chars()
        .all(|c| !c.is_control() || c.is_whitespace())
        .then(|| text.to_owned())
}
