//! Bounded random-access reads over a byte slice.
//!
//! All reads take an explicit position and byte order,
//! nothing advances implicitly. Sequential decoders
//! keep track of their own offsets.

use std::io::Cursor;

use binrw::{BinRead, Endian};

use crate::InsvError;

/// Fixed-width binary record, decoded little-endian.
pub trait FixedRecord: for<'a> BinRead<Args<'a> = ()> {
    /// Record size in bytes.
    const WIDTH: usize;
}

#[derive(Debug, Clone, Copy)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    /// Absolute file offset of `data[0]`.
    base: u64,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8], base: u64) -> Self {
        Self { data, base }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Absolute file offset for a position within the cursor.
    pub fn absolute(&self, pos: usize) -> u64 {
        self.base + pos as u64
    }

    /// Position within the cursor for an absolute file offset.
    /// `None` if the offset lies outside the cursor.
    pub fn relative(&self, offset: u64) -> Option<usize> {
        let pos = offset.checked_sub(self.base)?;
        (pos <= self.data.len() as u64).then_some(pos as usize)
    }

    fn check(&self, pos: usize, width: usize) -> Result<(), InsvError> {
        match pos.checked_add(width) {
            Some(end) if end <= self.data.len() => Ok(()),
            _ => Err(InsvError::OutOfBounds {
                pos,
                width,
                len: self.data.len(),
            }),
        }
    }

    /// Returns `len` bytes starting at `pos`.
    pub fn read_bytes(&self, pos: usize, len: usize) -> Result<&'a [u8], InsvError> {
        self.check(pos, len)?;
        Ok(&self.data[pos..pos + len])
    }

    /// Returns a new cursor over `len` bytes at `pos`,
    /// keeping absolute offsets intact.
    pub fn sub(&self, pos: usize, len: usize) -> Result<ByteCursor<'a>, InsvError> {
        let data = self.read_bytes(pos, len)?;
        Ok(Self::new(data, self.absolute(pos)))
    }

    /// Read a scalar at `pos`. Width is the in-memory size of `T`,
    /// so only use for primitive types.
    pub fn read<T>(&self, pos: usize, endian: Endian) -> Result<T, InsvError>
    where
        T: for<'b> BinRead<Args<'b> = ()>,
    {
        let width = std::mem::size_of::<T>();
        let bytes = self.read_bytes(pos, width)?;
        T::read_options(&mut Cursor::new(bytes), endian, ()).map_err(|err| err.into())
    }

    pub fn read_u8(&self, pos: usize) -> Result<u8, InsvError> {
        self.read(pos, Endian::Little)
    }

    pub fn read_i8(&self, pos: usize) -> Result<i8, InsvError> {
        self.read(pos, Endian::Little)
    }

    pub fn read_u16(&self, pos: usize, endian: Endian) -> Result<u16, InsvError> {
        self.read(pos, endian)
    }

    pub fn read_i16(&self, pos: usize, endian: Endian) -> Result<i16, InsvError> {
        self.read(pos, endian)
    }

    pub fn read_u32(&self, pos: usize, endian: Endian) -> Result<u32, InsvError> {
        self.read(pos, endian)
    }

    pub fn read_i32(&self, pos: usize, endian: Endian) -> Result<i32, InsvError> {
        self.read(pos, endian)
    }

    pub fn read_u64(&self, pos: usize, endian: Endian) -> Result<u64, InsvError> {
        self.read(pos, endian)
    }

    pub fn read_i64(&self, pos: usize, endian: Endian) -> Result<i64, InsvError> {
        self.read(pos, endian)
    }

    pub fn read_f32(&self, pos: usize, endian: Endian) -> Result<f32, InsvError> {
        self.read(pos, endian)
    }

    pub fn read_f64(&self, pos: usize, endian: Endian) -> Result<f64, InsvError> {
        self.read(pos, endian)
    }

    /// Read a fixed-width record at `pos`.
    pub fn read_record<R: FixedRecord>(&self, pos: usize) -> Result<R, InsvError> {
        let bytes = self.read_bytes(pos, R::WIDTH)?;
        R::read_options(&mut Cursor::new(bytes), Endian::Little, ()).map_err(|err| err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_endianness() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
        let cursor = ByteCursor::new(&data, 100);
        assert_eq!(cursor.read_u16(0, Endian::Little).unwrap(), 0x0201);
        assert_eq!(cursor.read_u16(0, Endian::Big).unwrap(), 0x0102);
        assert_eq!(cursor.read_u32(4, Endian::Little).unwrap(), 0x08070605);
        assert_eq!(cursor.read_u64(0, Endian::Big).unwrap(), 0x0102030405060708);
        assert_eq!(cursor.read_u8(7).unwrap(), 8);
        assert_eq!(cursor.absolute(4), 104);
        assert_eq!(cursor.relative(104), Some(4));
        assert_eq!(cursor.relative(99), None);
    }

    #[test]
    fn signed_and_float() {
        let mut data = Vec::new();
        data.extend((-2_i16).to_le_bytes());
        data.extend(1.5_f32.to_be_bytes());
        data.extend((-3.25_f64).to_le_bytes());
        let cursor = ByteCursor::new(&data, 0);
        assert_eq!(cursor.read_i16(0, Endian::Little).unwrap(), -2);
        assert_eq!(cursor.read_f32(2, Endian::Big).unwrap(), 1.5);
        assert_eq!(cursor.read_f64(6, Endian::Little).unwrap(), -3.25);
    }

    #[test]
    fn out_of_bounds() {
        let data = [0_u8; 6];
        let cursor = ByteCursor::new(&data, 0);
        assert!(cursor.read_u32(2, Endian::Little).is_ok());
        match cursor.read_u32(3, Endian::Little) {
            Err(InsvError::OutOfBounds { pos, width, len }) => {
                assert_eq!((pos, width, len), (3, 4, 6))
            }
            other => panic!("expected out of bounds, got {other:?}"),
        }
        assert!(cursor.read_bytes(usize::MAX, 2).is_err());
        assert!(cursor.sub(4, 3).is_err());
        assert_eq!(cursor.sub(4, 2).unwrap().absolute(0), 4);
    }
}
