//! Fixed-order binary layout shared by account state, instruction payloads and
//! bridge logs.
//!
//! Fields are written in declaration order with no padding. Integers are
//! little-endian, addresses are 32 raw bytes, strings and byte sequences carry a
//! `u32` little-endian length prefix. Every read is bounds-checked so decoding
//! hostile input returns [`CodecError`] instead of panicking.

use crate::error::CodecError;
use solana_program::pubkey::Pubkey;

/// A record with a statically known field layout.
pub trait Record: Sized {
    /// Name used in error messages.
    const NAME: &'static str;

    /// Length of the fixed prefix every valid encoding starts with. For records
    /// without variable-length fields this is the full encoded length.
    const MIN_LEN: usize;

    fn encode_into(&self, writer: &mut Writer);

    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, CodecError>;
}

pub fn encode<R: Record>(record: &R) -> Vec<u8> {
    let mut writer = Writer::with_capacity(R::MIN_LEN);
    record.encode_into(&mut writer);
    writer.into_inner()
}

/// Decodes a whole buffer as `R`. Leftover bytes mean the buffer holds some
/// other schema and are reported as [`CodecError::SchemaMismatch`].
pub fn decode<R: Record>(bytes: &[u8]) -> Result<R, CodecError> {
    if bytes.len() < R::MIN_LEN {
        return Err(CodecError::malformed(
            R::NAME,
            format!("needs at least {} bytes, got {}", R::MIN_LEN, bytes.len()),
        ));
    }

    let mut reader = Reader::new(R::NAME, bytes);
    let record = R::decode_from(&mut reader)?;

    if !reader.is_empty() {
        return Err(CodecError::mismatch(
            R::NAME,
            format!(
                "{} trailing bytes after {} decoded bytes",
                reader.remaining(),
                reader.offset()
            ),
        ));
    }

    Ok(record)
}

#[derive(Debug, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn put_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn put_bool(&mut self, value: bool) {
        self.buf.push(value as u8);
    }

    pub fn put_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_pubkey(&mut self, value: &Pubkey) {
        self.buf.extend_from_slice(value.as_ref());
    }

    pub fn put_bytes(&mut self, value: &[u8]) {
        debug_assert!(value.len() <= u32::MAX as usize);
        self.put_u32(value.len() as u32);
        self.buf.extend_from_slice(value);
    }

    pub fn put_str(&mut self, value: &str) {
        self.put_bytes(value.as_bytes());
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

pub struct Reader<'a> {
    record: &'static str,
    data: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    pub fn new(record: &'static str, data: &'a [u8]) -> Self {
        Self {
            record,
            data,
            offset: 0,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, len: usize, field: &str) -> Result<&'a [u8], CodecError> {
        let end = self
            .offset
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| {
                CodecError::malformed(
                    self.record,
                    format!(
                        "{} needs {} bytes at offset {}, only {} left",
                        field,
                        len,
                        self.offset,
                        self.remaining()
                    ),
                )
            })?;

        let bytes = &self.data[self.offset..end];
        self.offset = end;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self, field: &str) -> Result<[u8; N], CodecError> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.take(N, field)?);
        Ok(array)
    }

    pub fn read_u8(&mut self, field: &str) -> Result<u8, CodecError> {
        Ok(self.take(1, field)?[0])
    }

    pub fn read_bool(&mut self, field: &str) -> Result<bool, CodecError> {
        match self.read_u8(field)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(CodecError::malformed(
                self.record,
                format!("{} holds {} where a bool (0 or 1) is expected", field, other),
            )),
        }
    }

    pub fn read_u32(&mut self, field: &str) -> Result<u32, CodecError> {
        Ok(u32::from_le_bytes(self.take_array(field)?))
    }

    pub fn read_u64(&mut self, field: &str) -> Result<u64, CodecError> {
        Ok(u64::from_le_bytes(self.take_array(field)?))
    }

    pub fn read_pubkey(&mut self, field: &str) -> Result<Pubkey, CodecError> {
        Ok(Pubkey::new_from_array(self.take_array(field)?))
    }

    pub fn read_bytes(&mut self, field: &str) -> Result<Vec<u8>, CodecError> {
        let len = self.read_u32(field)? as usize;
        Ok(self.take(len, field)?.to_vec())
    }

    pub fn read_string(&mut self, field: &str) -> Result<String, CodecError> {
        let bytes = self.read_bytes(field)?;
        String::from_utf8(bytes).map_err(|e| {
            CodecError::malformed(self.record, format!("{} is not valid UTF-8: {}", field, e))
        })
    }
}
