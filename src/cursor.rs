use log::trace;

use crate::classify::Shape;
use crate::error::{DecodeError, DecodeResult};

/// Forward-only read position over a borrowed machine-code buffer.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
  bytes: &'a [u8],
  offset: usize,
}

impl<'a> Cursor<'a> {
  pub fn new(bytes: &'a [u8], offset: usize) -> Self {
    Self {
      bytes,
      offset: offset.min(bytes.len()),
    }
  }

  pub fn offset(&self) -> usize {
    self.offset
  }

  pub fn is_at_end(&self) -> bool {
    self.offset == self.bytes.len()
  }

  /// Takes the next byte, or `None` at the end of the buffer.
  pub fn next_byte(&mut self) -> Option<u8> {
    let byte = *self.bytes.get(self.offset)?;
    trace!("byte {}: {:08b}", self.offset, byte);
    self.offset += 1;
    Some(byte)
  }

  /// Takes a byte the instruction being decoded as `shape` requires.
  pub fn next_u8(&mut self, shape: Shape) -> DecodeResult<u8> {
    self.next_byte().ok_or(DecodeError::TruncatedInstruction {
      shape,
      offset: self.offset,
    })
  }

  pub fn next_i8(&mut self, shape: Shape) -> DecodeResult<i8> {
    self.next_u8(shape).map(|byte| byte as i8)
  }

  /// Little-endian: low byte first.
  pub fn next_u16(&mut self, shape: Shape) -> DecodeResult<u16> {
    let lo = self.next_u8(shape)?;
    let hi = self.next_u8(shape)?;
    Ok(u16::from_le_bytes([lo, hi]))
  }
}
