use log::debug;

use crate::classify::{classify, Shape};
use crate::cursor::Cursor;
use crate::emit::render;
use crate::error::{DecodeError, DecodeResult};
use crate::operand::{Displacement, EffectiveAddress, Immediate, Memory, Operand, Register, Width};

/// rm value that means "direct address" rather than `[bp]` when mod is 00.
const DIRECT_ADDRESS: u8 = 0b_110;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
  Mov,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
  pub operation: Operation,
  pub dest: Operand,
  pub src: Operand,
  /// Offset of the first byte in the input.
  pub offset: usize,
  /// Encoded length in bytes.
  pub size: usize,
}

impl Instruction {
  /// Offset just past the instruction, where decoding resumes.
  pub fn end(&self) -> usize {
    self.offset + self.size
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
  Memory,
  Memory8,
  Memory16,
  Register,
}

#[derive(Debug, Clone, Copy)]
struct ModRegRm {
  mode: Mode,
  reg: u8,
  rm: u8,
}

impl ModRegRm {
  fn from_byte(byte: u8) -> Self {
    let mode = match byte >> 6 {
      0b_00 => Mode::Memory,
      0b_01 => Mode::Memory8,
      0b_10 => Mode::Memory16,
      _ => Mode::Register,
    };
    Self {
      mode,
      reg: (byte >> 3) & 0b_111,
      rm: byte & 0b_111,
    }
  }
}

/// Decodes the whole buffer into a listing, stopping at the first error.
pub fn disassemble(bytes: &[u8]) -> DecodeResult<String> {
  let instructions = Disassembly::new(bytes).collect::<DecodeResult<Vec<_>>>()?;
  Ok(render(&instructions))
}

/// Decodes the one instruction starting at `offset`.
///
/// Returns `Ok(None)` when `offset` is already at the end of `bytes`. On error nothing
/// about the position is meaningful; the caller decides whether to stop or to retry
/// from a later offset.
pub fn decode_instruction(bytes: &[u8], offset: usize) -> DecodeResult<Option<Instruction>> {
  let mut cursor = Cursor::new(bytes, offset);
  let start = cursor.offset();
  let Some(opcode) = cursor.next_byte() else {
    return Ok(None);
  };

  let shape = classify(opcode);
  debug!("offset {start}: {shape:?}");

  let (dest, src) = match shape {
    Shape::RegisterMemoryToFromRegister { d, w } => {
      let modrm = ModRegRm::from_byte(cursor.next_u8(shape)?);
      let reg = Operand::Register(Register::decode(modrm.reg, w));
      let rm = register_or_memory(&mut cursor, shape, modrm, w)?;
      if d {
        (reg, rm)
      } else {
        (rm, reg)
      }
    }
    Shape::ImmediateToRegisterMemory { w } => {
      let modrm = ModRegRm::from_byte(cursor.next_u8(shape)?);
      if modrm.reg != 0b_000 {
        return Err(DecodeError::UnrecognizedOpcode {
          offset: start,
          byte: opcode,
        });
      }
      let dest = register_or_memory(&mut cursor, shape, modrm, w)?;
      (dest, immediate(&mut cursor, shape, w)?)
    }
    Shape::ImmediateToRegister { w, reg } => {
      let dest = Operand::Register(Register::decode(reg, w));
      (dest, immediate(&mut cursor, shape, w)?)
    }
    Shape::MemoryToAccumulator { w } => {
      let address = cursor.next_u16(shape)?;
      (
        Operand::Register(Register::accumulator(w)),
        Operand::Memory(Memory::Direct(address)),
      )
    }
    Shape::AccumulatorToMemory { w } => {
      let address = cursor.next_u16(shape)?;
      (
        Operand::Memory(Memory::Direct(address)),
        Operand::Register(Register::accumulator(w)),
      )
    }
    Shape::Unsupported(what) => {
      return Err(DecodeError::UnsupportedAddressingMode {
        offset: start,
        byte: opcode,
        what,
      })
    }
    Shape::Unrecognized => {
      return Err(DecodeError::UnrecognizedOpcode {
        offset: start,
        byte: opcode,
      })
    }
  };

  Ok(Some(Instruction {
    operation: Operation::Mov,
    dest,
    src,
    offset: start,
    size: cursor.offset() - start,
  }))
}

fn register_or_memory(
  cursor: &mut Cursor,
  shape: Shape,
  modrm: ModRegRm,
  w: bool,
) -> DecodeResult<Operand> {
  let base = EffectiveAddress::from_rm(modrm.rm);
  let memory = match modrm.mode {
    Mode::Register => return Ok(Operand::Register(Register::decode(modrm.rm, w))),
    Mode::Memory if modrm.rm == DIRECT_ADDRESS => Memory::Direct(cursor.next_u16(shape)?),
    Mode::Memory => Memory::Based {
      base,
      displacement: Displacement::None,
    },
    Mode::Memory8 => Memory::Based {
      base,
      displacement: Displacement::Byte(cursor.next_i8(shape)?),
    },
    Mode::Memory16 => Memory::Based {
      base,
      displacement: Displacement::Word(cursor.next_u16(shape)?),
    },
  };
  Ok(Operand::Memory(memory))
}

fn immediate(cursor: &mut Cursor, shape: Shape, w: bool) -> DecodeResult<Operand> {
  let value = if w {
    cursor.next_u16(shape)?
  } else {
    u16::from(cursor.next_u8(shape)?)
  };
  Ok(Operand::Immediate(Immediate {
    value,
    width: Width::from_w_bit(w),
  }))
}

/// Instruction-by-instruction decoding of a buffer.
///
/// Yields each decoded instruction in order. After an error it yields nothing more
/// until [`Disassembly::skip_byte`] moves past the failing instruction's first byte.
#[derive(Debug, Clone)]
pub struct Disassembly<'a> {
  bytes: &'a [u8],
  offset: usize,
  failed: bool,
}

impl<'a> Disassembly<'a> {
  pub fn new(bytes: &'a [u8]) -> Self {
    Self {
      bytes,
      offset: 0,
      failed: false,
    }
  }

  /// Start of the next instruction, or of the one that failed.
  pub fn offset(&self) -> usize {
    self.offset
  }

  /// Steps over one byte at the current offset and resumes decoding after it.
  pub fn skip_byte(&mut self) -> Option<u8> {
    let byte = *self.bytes.get(self.offset)?;
    self.offset += 1;
    self.failed = false;
    Some(byte)
  }
}

impl Iterator for Disassembly<'_> {
  type Item = DecodeResult<Instruction>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.failed {
      return None;
    }
    match decode_instruction(self.bytes, self.offset) {
      Ok(Some(instruction)) => {
        self.offset = instruction.end();
        Some(Ok(instruction))
      }
      Ok(None) => None,
      Err(err) => {
        self.failed = true;
        Some(Err(err))
      }
    }
  }
}
