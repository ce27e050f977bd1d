//! Synthetic INSV files for integration tests.
//!
//! Layouts as written by the cameras: frame header is version, type,
//! size, and index entries hold offsets relative to the metadata block.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use insv_rs::constants::INSV_SIGNATURE;

pub fn logger() {
    _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::max())
        .format_file(true)
        .format_line_number(true)
        .try_init();
}

fn varint(mut value: u64) -> Vec<u8> {
    let mut b = Vec::new();
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            b.push(byte);
            return b;
        }
        b.push(byte | 0x80);
    }
}

fn bytes_field(number: u64, data: &[u8]) -> Vec<u8> {
    let mut b = varint(number << 3 | 2);
    b.extend(varint(data.len() as u64));
    b.extend(data);
    b
}

/// Binary gyro sample as stored in camera info, `width` bytes long.
pub fn gyro_field(width: usize) -> Vec<u8> {
    let mut b = 1_i64.to_le_bytes().to_vec();
    b.resize(width, 0x80);
    b.truncate(width);
    b
}

/// Camera info protobuf message, with a gyro field (20) if set.
pub fn info_payload(gyro: Option<&[u8]>) -> Vec<u8> {
    let mut b = bytes_field(1, b"IXSE42XXXXXXXX");
    b.extend(bytes_field(2, b"Insta360 X3"));
    b.extend(bytes_field(3, b"v1.0.0"));
    if let Some(gyro) = gyro {
        b.extend(bytes_field(20, gyro));
    }
    b
}

/// 56 byte gyro sample.
pub fn gyro_v1_sample(timestamp: i64, values: [f64; 6]) -> Vec<u8> {
    let mut b = timestamp.to_le_bytes().to_vec();
    values.iter().for_each(|v| b.extend(v.to_le_bytes()));
    b
}

/// 20 byte gyro sample.
pub fn gyro_v2_sample(timestamp: i64, values: [i16; 6]) -> Vec<u8> {
    let mut b = timestamp.to_le_bytes().to_vec();
    values.iter().for_each(|v| b.extend(v.to_le_bytes()));
    b
}

pub fn exposure_sample(timestamp: i64, shutter_speed: f64) -> Vec<u8> {
    let mut b = timestamp.to_le_bytes().to_vec();
    b.extend(shutter_speed.to_le_bytes());
    b
}

pub fn timelapse_sample(timestamp: i64) -> Vec<u8> {
    timestamp.to_le_bytes().to_vec()
}

/// 44 byte drone position sample.
pub fn pos_sample(timestamp: u32, xyz: [f32; 3], velocity: (f32, f32), agl: f32) -> Vec<u8> {
    let mut b = timestamp.to_le_bytes().to_vec();
    for v in [xyz[0], xyz[1], xyz[2], 0., 0., 0., velocity.0, velocity.1, 0., agl] {
        b.extend(v.to_le_bytes());
    }
    b
}

pub fn gps_sample(timestamp: i64, fix: u8, lat: f64, lon: f64) -> Vec<u8> {
    let mut b = timestamp.to_le_bytes().to_vec();
    b.extend(0_u16.to_le_bytes());
    b.push(fix);
    b.extend(lat.to_le_bytes());
    b.push(b'N');
    b.extend(lon.to_le_bytes());
    b.push(b'E');
    b.extend(2.5_f64.to_le_bytes());
    b.extend(180_f64.to_le_bytes());
    b.extend(30_f64.to_le_bytes());
    b
}

/// Builds a file: video data, frames in order added, trailer.
pub struct InsvBuilder {
    data: Vec<u8>,
    metadata_pos: usize,
    /// Type code, version, size, offset from metadata start for each frame added
    entries: Vec<(u8, u8, u32, u32)>,
}

impl InsvBuilder {
    pub fn new(video_size: usize) -> Self {
        Self {
            data: vec![0x55; video_size],
            metadata_pos: video_size,
            entries: Vec::new(),
        }
    }

    pub fn metadata_pos(&self) -> u64 {
        self.metadata_pos as u64
    }

    /// Bytes not belonging to any frame.
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.data.extend(bytes);
        self
    }

    /// Version 1 frame.
    pub fn frame(self, code: u8, payload: &[u8]) -> Self {
        self.versioned_frame(code, 1, payload)
    }

    pub fn versioned_frame(mut self, code: u8, version: u8, payload: &[u8]) -> Self {
        let offset = (self.data.len() - self.metadata_pos) as u32;
        self.entries.push((code, version, payload.len() as u32, offset));
        self.data.extend(payload);
        self.data.push(version);
        self.data.push(code);
        self.data.extend((payload.len() as u32).to_le_bytes());
        self
    }

    /// Index frame listing all frames added so far,
    /// followed by `unused` empty slots.
    pub fn index(self, unused: usize) -> Self {
        let mut payload = Vec::new();
        for (code, version, size, offset) in self.entries.iter() {
            payload.push(*code);
            payload.push(*version);
            payload.extend(size.to_le_bytes());
            payload.extend(offset.to_le_bytes());
        }
        payload.extend(vec![0; unused * 10]);
        self.frame(0, &payload)
    }

    pub fn build(self) -> Vec<u8> {
        let metadata_size = (self.data.len() - self.metadata_pos + 72) as u32;
        let mut data = self.data;
        data.extend([0_u8; 32]);
        data.extend(metadata_size.to_le_bytes());
        data.extend(3_u32.to_le_bytes());
        data.extend(INSV_SIGNATURE);
        data
    }

    pub fn write(self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, self.build()).unwrap();
        path
    }
}
