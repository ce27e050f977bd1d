//! GeoJSON export of GPS records.

use std::fs::OpenOptions;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};

use crate::{Gps, GpsRecord, InsvError};

fn feature(record: &GpsRecord) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("timestamp".to_owned(), JsonValue::from(record.timestamp));
    if let Ok(datetime) = record.datetime_to_string() {
        properties.insert("datetime".to_owned(), JsonValue::from(datetime));
    }
    properties.insert("speed".to_owned(), JsonValue::from(record.speed));
    properties.insert("track".to_owned(), JsonValue::from(record.track));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![
            record.signed_longitude(),
            record.signed_latitude(),
            record.altitude,
        ]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

impl Gps {
    /// Points with a valid fix as GeoJSON point features.
    pub fn to_geojson(&self) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features: self.iter()
                .filter(|r| r.is_valid())
                .map(feature)
                .collect(),
            foreign_members: None,
        }
    }

    /// Write GeoJSON to `path`. An existing file is never overwritten.
    pub fn write_geojson(&self, path: &Path) -> Result<(), InsvError> {
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|err| match err.kind() {
                ErrorKind::AlreadyExists => InsvError::OutputExists(path.to_owned()),
                _ => InsvError::IOError(err),
            })?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &self.to_geojson())?;
        writer.flush()?;

        Ok(())
    }
}
