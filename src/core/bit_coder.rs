use std::{slice, vec};

/// Byte sink used by the encoder. All multi-byte values are written little-endian.
pub trait ByteWriter: Sized {
    fn write_u8(&mut self, value: u8);
    fn write_u32(&mut self, value: u32) {
        for b in value.to_le_bytes() {
            self.write_u8(b);
        }
    }
    fn write_f32(&mut self, value: f32) {
        self.write_u32(value.to_bits());
    }
    fn write_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.write_u8(b);
        }
    }
}

impl ByteWriter for Vec<u8> {
    fn write_u8(&mut self, value: u8) {
        self.push(value);
    }

    fn write_u32(&mut self, value: u32) {
        self.extend_from_slice(&value.to_le_bytes());
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

pub struct FunctionalByteWriter<R> {
    write_fn: R,
}

impl<R: FnMut(u8)> ByteWriter for FunctionalByteWriter<R> {
    fn write_u8(&mut self, value: u8) {
        (self.write_fn)(value);
    }
}

impl<R: FnMut(u8)> FunctionalByteWriter<R> {
    pub fn new(write_fn: R) -> Self {
        FunctionalByteWriter { write_fn }
    }
}

/// Byte source used by the decoder. All multi-byte values are read little-endian.
pub trait ByteReader {
    fn read_u8(&mut self) -> Result<u8, ReaderErr>;
    fn read_u32(&mut self) -> Result<u32, ReaderErr> {
        let out = [
            self.read_u8()?,
            self.read_u8()?,
            self.read_u8()?,
            self.read_u8()?
        ];
        Ok(u32::from_le_bytes(out))
    }
    fn read_f32(&mut self) -> Result<f32, ReaderErr> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    /// Reads exactly `len` bytes. Nothing is consumed when fewer bytes are left.
    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>, ReaderErr> {
        if self.num_remaining() < len {
            return Err(ReaderErr::NotEnoughData);
        }
        (0..len).map(|_| self.read_u8()).collect()
    }

    /// The number of bytes that can still be read.
    fn num_remaining(&self) -> usize;
}

impl ByteReader for vec::IntoIter<u8> {
    fn read_u8(&mut self) -> Result<u8, ReaderErr> {
        self.next().ok_or(ReaderErr::NotEnoughData)
    }

    fn read_u32(&mut self) -> Result<u32, ReaderErr> {
        let out = self.as_slice()
            .get(..4)
            .ok_or(ReaderErr::NotEnoughData)?;
        let out = u32::from_le_bytes([out[0], out[1], out[2], out[3]]);
        self.nth(3);
        Ok(out)
    }

    fn num_remaining(&self) -> usize {
        self.len()
    }
}

impl ByteReader for slice::Iter<'_, u8> {
    fn read_u8(&mut self) -> Result<u8, ReaderErr> {
        self.next().copied().ok_or(ReaderErr::NotEnoughData)
    }

    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>, ReaderErr> {
        let rest = self.as_slice();
        if rest.len() < len {
            return Err(ReaderErr::NotEnoughData);
        }
        let (out, rest) = rest.split_at(len);
        *self = rest.iter();
        Ok(out.to_vec())
    }

    fn num_remaining(&self) -> usize {
        self.len()
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderErr {
    #[error("Not enough data to read")]
    NotEnoughData,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f32_is_little_endian() {
        let mut buffer = Vec::new();
        buffer.write_f32(1.0);
        assert_eq!(buffer, vec![0x00, 0x00, 0x80, 0x3f]);

        let mut reader = buffer.into_iter();
        assert_eq!(reader.read_f32().unwrap(), 1.0);
        assert_eq!(reader.num_remaining(), 0);
    }

    #[test]
    fn mixed_writes_read_back() {
        let mut buffer = Vec::new();
        buffer.write_u8(200);
        buffer.write_u32(202);
        buffer.write_f32(-0.5);
        buffer.write_bytes(b"abc");
        assert_eq!(buffer.len(), 1 + 4 + 4 + 3);

        let mut reader = buffer.iter();
        assert_eq!(reader.read_u8().unwrap(), 200);
        assert_eq!(reader.read_u32().unwrap(), 202);
        assert_eq!(reader.read_f32().unwrap(), -0.5);
        assert_eq!(reader.read_bytes(3).unwrap(), b"abc".to_vec());
        assert_eq!(reader.read_u8(), Err(ReaderErr::NotEnoughData));
    }

    #[test]
    fn short_reads_fail() {
        let buffer = vec![1_u8, 2, 3];
        let mut reader = buffer.clone().into_iter();
        assert_eq!(reader.read_u32(), Err(ReaderErr::NotEnoughData));

        let mut reader = buffer.iter();
        assert_eq!(reader.read_bytes(4), Err(ReaderErr::NotEnoughData));
        // a failed `read_bytes` leaves the reader untouched
        assert_eq!(reader.num_remaining(), 3);
    }

    #[test]
    fn functional_writer() {
        let mut sink = Vec::new();
        let mut writer = FunctionalByteWriter::new(|b| sink.push(b));
        writer.write_u32(0x0403_0201);
        drop(writer);
        assert_eq!(sink, vec![1, 2, 3, 4]);
    }
}
