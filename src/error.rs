use thiserror::Error;

use crate::classify::{Shape, Unsupported};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
  #[error("unrecognized opcode {byte:08b} at offset {offset}")]
  UnrecognizedOpcode { offset: usize, byte: u8 },
  #[error("truncated {shape} instruction: input ends at offset {offset}")]
  TruncatedInstruction { shape: Shape, offset: usize },
  #[error("unsupported {what} ({byte:08b}) at offset {offset}")]
  UnsupportedAddressingMode {
    offset: usize,
    byte: u8,
    what: Unsupported,
  },
}

impl DecodeError {
  /// Offset of the offending byte, or where the input ran out.
  pub fn offset(&self) -> usize {
    match *self {
      DecodeError::UnrecognizedOpcode { offset, .. }
      | DecodeError::TruncatedInstruction { offset, .. }
      | DecodeError::UnsupportedAddressingMode { offset, .. } => offset,
    }
  }
}

pub type DecodeResult<T> = Result<T, DecodeError>;
