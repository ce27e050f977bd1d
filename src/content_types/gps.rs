//! GPS points logged in the `GPS` frame.

use binrw::BinRead;
use serde::{ser::SerializeMap, Serialize, Serializer};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::{insv::FixedRecord, InsvError};

/// Single GPS point, 53 bytes.
#[derive(Debug, Clone, Copy, PartialEq, BinRead)]
#[br(little)]
pub struct GpsRecord {
    /// Unix time, seconds.
    pub timestamp: i64,
    /// Undocumented.
    pub unknown: u16,
    /// `A` for a valid fix, `V` for void.
    #[br(map = |b: u8| b as char)]
    pub fix: char,
    /// Latitude, unsigned. See `latitude_ref`.
    pub latitude: f64,
    /// `N` or `S`
    #[br(map = |b: u8| b as char)]
    pub latitude_ref: char,
    /// Longitude, unsigned. See `longitude_ref`.
    pub longitude: f64,
    /// `E` or `W`
    #[br(map = |b: u8| b as char)]
    pub longitude_ref: char,
    /// Speed, m/s.
    pub speed: f64,
    /// Track/heading, degrees.
    pub track: f64,
    /// Altitude, meters.
    pub altitude: f64,
}

impl FixedRecord for GpsRecord {
    const WIDTH: usize = 53;
}

impl GpsRecord {
    /// Returns `true` if the device had a satellite lock.
    pub fn is_valid(&self) -> bool {
        self.fix == 'A'
    }

    /// Latitude, negative for the southern hemisphere.
    pub fn signed_latitude(&self) -> f64 {
        match self.latitude_ref {
            'S' | 's' => -self.latitude,
            _ => self.latitude,
        }
    }

    /// Longitude, negative west of Greenwich.
    pub fn signed_longitude(&self) -> f64 {
        match self.longitude_ref {
            'W' | 'w' => -self.longitude,
            _ => self.longitude,
        }
    }

    /// UTC date time for the point.
    pub fn datetime(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::from_unix_timestamp(self.timestamp).ok()
    }

    /// UTC date time as an RFC3339 formatted string.
    pub fn datetime_to_string(&self) -> Result<String, InsvError> {
        let datetime = self.datetime()
            .ok_or_else(|| InsvError::InvalidDateTime(format!("GPS timestamp {}", self.timestamp)))?;
        datetime.format(&Rfc3339)
            .map_err(|err| InsvError::InvalidDateTime(err.to_string()))
    }

    /// Human readable summary of the point.
    /// Falls back to the raw timestamp if it is not a valid date time.
    pub fn description(&self) -> String {
        let time = self.datetime_to_string()
            .unwrap_or_else(|_| self.timestamp.to_string());
        format!(
            "time {time} position {:?}{} {:?}{} speed {:?} track {:?} altitude {:?}",
            self.latitude, self.latitude_ref,
            self.longitude, self.longitude_ref,
            self.speed, self.track, self.altitude
        )
    }
}

/// Hemisphere references serialize as `ns` and `ew`,
/// undocumented and fix bytes are left out.
impl Serialize for GpsRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(9))?;
        map.serialize_entry("timestamp", &self.timestamp)?;
        map.serialize_entry("latitude", &self.latitude)?;
        map.serialize_entry("ns", &self.latitude_ref)?;
        map.serialize_entry("longitude", &self.longitude)?;
        map.serialize_entry("ew", &self.longitude_ref)?;
        map.serialize_entry("speed", &self.speed)?;
        map.serialize_entry("track", &self.track)?;
        map.serialize_entry("altitude", &self.altitude)?;
        map.serialize_entry("description", &self.description())?;
        map.end()
    }
}

/// All GPS points in a file, in logged order.
#[derive(Debug, Default, Clone)]
pub struct Gps(pub Vec<GpsRecord>);

impl Gps {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GpsRecord> {
        self.0.iter()
    }

    pub fn first(&self) -> Option<&GpsRecord> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&GpsRecord> {
        self.0.last()
    }

    /// Returns the first logged date time with a valid fix.
    pub fn t0(&self) -> Option<OffsetDateTime> {
        self.iter()
            .find(|p| p.is_valid())
            .and_then(|p| p.datetime())
    }

    /// Keep only points logged with a satellite lock.
    /// Without a lock the camera logs zeros or the
    /// latest known position.
    pub fn filter_valid(&self) -> Self {
        Self(self.iter().filter(|p| p.is_valid()).cloned().collect())
    }
}
