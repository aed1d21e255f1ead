//! Binary codec helpers
//!
//! Instruction data and account projections use fixed layouts with explicit
//! widths. Account records and instruction arguments are little-endian; the
//! signed report payload is big-endian because that is what oracles sign.
//! All readers perform bounds checking and return errors on short input.

use crate::error::OcrError;
use bytemuck::{Pod, Zeroable};

/// Read a fixed-size byte array from instruction data
#[inline]
pub fn read_bytes<const N: usize>(data: &[u8], offset: usize) -> Result<[u8; N], OcrError> {
    let end = offset.checked_add(N).ok_or(OcrError::InvalidInstruction)?;
    if end > data.len() {
        return Err(OcrError::InvalidInstruction);
    }
    let mut bytes = [0u8; N];
    bytes.copy_from_slice(&data[offset..end]);
    Ok(bytes)
}

/// Read a u8 from instruction data
#[inline]
pub fn read_u8(data: &[u8], offset: usize) -> Result<u8, OcrError> {
    data.get(offset).copied().ok_or(OcrError::InvalidInstruction)
}

/// Read a u32 (little-endian)
#[inline]
pub fn read_u32(data: &[u8], offset: usize) -> Result<u32, OcrError> {
    Ok(u32::from_le_bytes(read_bytes(data, offset)?))
}

/// Read a u64 (little-endian)
#[inline]
pub fn read_u64(data: &[u8], offset: usize) -> Result<u64, OcrError> {
    Ok(u64::from_le_bytes(read_bytes(data, offset)?))
}

/// Read an i128 (little-endian)
#[inline]
pub fn read_i128(data: &[u8], offset: usize) -> Result<i128, OcrError> {
    Ok(i128::from_le_bytes(read_bytes(data, offset)?))
}

/// Read a u32 (big-endian)
#[inline]
pub fn read_u32_be(data: &[u8], offset: usize) -> Result<u32, OcrError> {
    Ok(u32::from_be_bytes(read_bytes(data, offset)?))
}

/// Read a u64 (big-endian)
#[inline]
pub fn read_u64_be(data: &[u8], offset: usize) -> Result<u64, OcrError> {
    Ok(u64::from_be_bytes(read_bytes(data, offset)?))
}

/// Read an i128 (big-endian)
#[inline]
pub fn read_i128_be(data: &[u8], offset: usize) -> Result<i128, OcrError> {
    Ok(i128::from_be_bytes(read_bytes(data, offset)?))
}

/// Instruction data reader with tracked offset
///
/// Provides a convenient way to sequentially read fields from instruction data
/// while automatically tracking the current offset.
pub struct InstructionReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> InstructionReader<'a> {
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.offset)
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, OcrError> {
        let val = read_u8(self.data, self.offset)?;
        self.offset += 1;
        Ok(val)
    }

    #[inline]
    pub fn read_u32(&mut self) -> Result<u32, OcrError> {
        let val = read_u32(self.data, self.offset)?;
        self.offset += 4;
        Ok(val)
    }

    #[inline]
    pub fn read_u64(&mut self) -> Result<u64, OcrError> {
        let val = read_u64(self.data, self.offset)?;
        self.offset += 8;
        Ok(val)
    }

    #[inline]
    pub fn read_i128(&mut self) -> Result<i128, OcrError> {
        let val = read_i128(self.data, self.offset)?;
        self.offset += 16;
        Ok(val)
    }

    #[inline]
    pub fn read_bytes<const N: usize>(&mut self) -> Result<[u8; N], OcrError> {
        let val = read_bytes(self.data, self.offset)?;
        self.offset += N;
        Ok(val)
    }

    /// Borrow the next `len` bytes without copying
    #[inline]
    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8], OcrError> {
        let end = self.offset.checked_add(len).ok_or(OcrError::InvalidInstruction)?;
        let slice = self.data.get(self.offset..end).ok_or(OcrError::InvalidInstruction)?;
        self.offset = end;
        Ok(slice)
    }

    /// Read a u32 length prefix followed by that many bytes
    #[inline]
    pub fn read_vec(&mut self) -> Result<&'a [u8], OcrError> {
        let len = self.read_u32()? as usize;
        self.read_slice(len)
    }

    /// Everything not yet consumed
    #[inline]
    pub fn rest(&mut self) -> &'a [u8] {
        let rest = self.data.get(self.offset..).unwrap_or(&[]);
        self.offset = self.data.len();
        rest
    }

    /// Fail if trailing bytes remain
    #[inline]
    pub fn finish(&self) -> Result<(), OcrError> {
        if self.remaining() != 0 {
            return Err(OcrError::InvalidInstruction);
        }
        Ok(())
    }
}

/// Fixed-capacity writer for account projections
///
/// Writes never grow the target; running past the end is an error rather than
/// a truncation.
pub struct ByteWriter<'a> {
    buf: &'a mut [u8],
    offset: usize,
}

impl<'a> ByteWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    pub fn position(&self) -> usize {
        self.offset
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), OcrError> {
        let end = self.offset.checked_add(bytes.len()).ok_or(OcrError::BufferTooSmall)?;
        let dst = self.buf.get_mut(self.offset..end).ok_or(OcrError::BufferTooSmall)?;
        dst.copy_from_slice(bytes);
        self.offset = end;
        Ok(())
    }

    pub fn write_u8(&mut self, v: u8) -> Result<(), OcrError> {
        self.write_bytes(&[v])
    }

    pub fn write_u32(&mut self, v: u32) -> Result<(), OcrError> {
        self.write_bytes(&v.to_le_bytes())
    }

    pub fn write_u64(&mut self, v: u64) -> Result<(), OcrError> {
        self.write_bytes(&v.to_le_bytes())
    }

    pub fn write_i64(&mut self, v: i64) -> Result<(), OcrError> {
        self.write_bytes(&v.to_le_bytes())
    }

    pub fn write_i128(&mut self, v: i128) -> Result<(), OcrError> {
        self.write_bytes(&v.to_le_bytes())
    }
}

/// Little-endian i128 stored as raw bytes
///
/// Keeps zero-copy records at 8-byte alignment; a native `i128` field would
/// be 16-aligned on the host and leave the layout target-dependent.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct PodI128(pub [u8; 16]);

impl PodI128 {
    #[inline]
    pub fn get(&self) -> i128 {
        i128::from_le_bytes(self.0)
    }

    #[inline]
    pub fn set(&mut self, v: i128) {
        self.0 = v.to_le_bytes();
    }
}

impl From<i128> for PodI128 {
    fn from(v: i128) -> Self {
        Self(v.to_le_bytes())
    }
}
