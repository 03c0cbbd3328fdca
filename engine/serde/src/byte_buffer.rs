use crate::error::BufferError;

/// Backing storage grows in whole chunks to amortize reallocation
const GROWTH_CHUNK: usize = 1024;

/// A single growable byte region with independent write and read cursors.
///
/// All component payloads and all wire messages are encoded through this
/// type. Cursor writes append and grow on demand; cursor reads fail with a
/// bounds error rather than returning garbage once they would pass the write
/// cursor. Fixed-offset accessors bypass both cursors for random access into
/// already-reserved space and never grow.
pub struct ByteBuffer {
    data: Vec<u8>,
    write_head: usize,
    read_head: usize,
}

macro_rules! numeric_accessors {
    ($($ty:ty: $write:ident, $read:ident, $get:ident, $set:ident;)*) => {
        $(
            pub fn $write(&mut self, value: $ty) {
                self.write_raw(&value.to_le_bytes());
            }

            pub fn $read(&mut self) -> Result<$ty, BufferError> {
                let mut bytes = [0u8; std::mem::size_of::<$ty>()];
                bytes.copy_from_slice(self.read_raw(std::mem::size_of::<$ty>())?);
                Ok(<$ty>::from_le_bytes(bytes))
            }

            pub fn $get(&self, offset: usize) -> Result<$ty, BufferError> {
                let mut bytes = [0u8; std::mem::size_of::<$ty>()];
                bytes.copy_from_slice(self.get_raw(offset, std::mem::size_of::<$ty>())?);
                Ok(<$ty>::from_le_bytes(bytes))
            }

            pub fn $set(&mut self, offset: usize, value: $ty) -> Result<(), BufferError> {
                self.set_raw(offset, &value.to_le_bytes())
            }
        )*
    };
}

impl ByteBuffer {
    pub fn new() -> Self {
        Self {
            data: vec![0; GROWTH_CHUNK],
            write_head: 0,
            read_head: 0,
        }
    }

    /// Wraps received bytes for decoding: the whole slice counts as written
    pub fn from_bytes(payload: &[u8]) -> Self {
        Self {
            data: payload.to_vec(),
            write_head: payload.len(),
            read_head: 0,
        }
    }

    pub fn write_head(&self) -> usize {
        self.write_head
    }

    pub fn read_head(&self) -> usize {
        self.read_head
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Bytes written but not yet read
    pub fn remaining(&self) -> usize {
        self.write_head - self.read_head
    }

    /// Resets both cursors; capacity is retained
    pub fn clear(&mut self) {
        self.write_head = 0;
        self.read_head = 0;
    }

    /// Moves the read cursor to an absolute position within written data
    pub fn seek_read(&mut self, position: usize) -> Result<(), BufferError> {
        if position > self.write_head {
            return Err(BufferError::SeekOutOfRange {
                position,
                written: self.write_head,
            });
        }
        self.read_head = position;
        Ok(())
    }

    /// Reserves `length` bytes at the write cursor for later fixed-offset
    /// writes and advances the cursor past them
    pub fn advance_write(&mut self, length: usize) -> usize {
        self.ensure_space(length);
        let offset = self.write_head;
        self.write_head += length;
        offset
    }

    /// Borrow of the logically valid prefix. Invalidated by any
    /// growth-triggering write; use [`Self::to_bytes`] to outlive mutation.
    pub fn written_bytes(&self) -> &[u8] {
        &self.data[..self.write_head]
    }

    /// Independent copy of the logically valid prefix
    pub fn to_bytes(&self) -> Vec<u8> {
        self.data[..self.write_head].to_vec()
    }

    numeric_accessors! {
        i8:  write_i8,  read_i8,  get_i8_at,  set_i8_at;
        i16: write_i16, read_i16, get_i16_at, set_i16_at;
        i32: write_i32, read_i32, get_i32_at, set_i32_at;
        i64: write_i64, read_i64, get_i64_at, set_i64_at;
        u8:  write_u8,  read_u8,  get_u8_at,  set_u8_at;
        u16: write_u16, read_u16, get_u16_at, set_u16_at;
        u32: write_u32, read_u32, get_u32_at, set_u32_at;
        u64: write_u64, read_u64, get_u64_at, set_u64_at;
        f32: write_f32, read_f32, get_f32_at, set_f32_at;
        f64: write_f64, read_f64, get_f64_at, set_f64_at;
    }

    /// Length-prefixed byte blob
    pub fn write_bytes(&mut self, payload: &[u8]) {
        self.write_u32(payload.len() as u32);
        self.write_raw(payload);
    }

    pub fn read_bytes(&mut self) -> Result<Vec<u8>, BufferError> {
        let length = self.read_u32()? as usize;
        Ok(self.read_raw(length)?.to_vec())
    }

    /// Length-prefixed UTF-8 string
    pub fn write_string(&mut self, value: &str) {
        self.write_bytes(value.as_bytes());
    }

    pub fn read_string(&mut self) -> Result<String, BufferError> {
        let length = self.read_u32()? as usize;
        let bytes = self.read_raw(length)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| BufferError::InvalidUtf8 { length })
    }

    fn write_raw(&mut self, bytes: &[u8]) {
        self.ensure_space(bytes.len());
        self.data[self.write_head..self.write_head + bytes.len()].copy_from_slice(bytes);
        self.write_head += bytes.len();
    }

    fn read_raw(&mut self, length: usize) -> Result<&[u8], BufferError> {
        if self.read_head + length > self.write_head {
            return Err(BufferError::OutOfBounds {
                requested: length,
                cursor: self.read_head,
                written: self.write_head,
            });
        }
        let bytes = &self.data[self.read_head..self.read_head + length];
        self.read_head += length;
        Ok(bytes)
    }

    fn get_raw(&self, offset: usize, length: usize) -> Result<&[u8], BufferError> {
        if offset + length > self.data.len() {
            return Err(BufferError::OffsetOutOfRange {
                requested: length,
                offset,
                capacity: self.data.len(),
            });
        }
        Ok(&self.data[offset..offset + length])
    }

    fn set_raw(&mut self, offset: usize, bytes: &[u8]) -> Result<(), BufferError> {
        if offset + bytes.len() > self.data.len() {
            return Err(BufferError::OffsetOutOfRange {
                requested: bytes.len(),
                offset,
                capacity: self.data.len(),
            });
        }
        self.data[offset..offset + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    // Grows to the next multiple of GROWTH_CHUNK strictly above
    // max(capacity, write_head + needed), preserving written content.
    fn ensure_space(&mut self, needed: usize) {
        let required = self.write_head + needed;
        if required <= self.data.len() {
            return;
        }
        let base = self.data.len().max(required);
        let new_capacity = (base / GROWTH_CHUNK + 1) * GROWTH_CHUNK;
        self.data.resize(new_capacity, 0);
    }
}

impl Default for ByteBuffer {
    fn default() -> Self {
        Self::new()
    }
}
