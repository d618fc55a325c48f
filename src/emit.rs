use std::fmt::{self, Display, Write};

use crate::decode::{Instruction, Operation};
use crate::operand::{Displacement, EffectiveAddress, Immediate, Memory, Operand, Register, Width};

pub const HEADER: &str = "bits 16";

/// Renders a listing: the `bits 16` directive, then one newline-terminated line per item.
pub fn render<I>(lines: I) -> String
where
  I: IntoIterator,
  I::Item: Display,
{
  let mut listing = format!("{HEADER}\n");
  for line in lines {
    // writing to a String cannot fail
    let _ = writeln!(listing, "{line}");
  }
  listing
}

/// A raw byte the decoder gave up on, as an assembler data directive.
pub fn data_byte(byte: u8) -> String {
  format!("db {byte}")
}

impl Display for Instruction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {}, ", self.operation, self.dest)?;
    match (self.dest, self.src) {
      // nothing else tells the assembler how wide the store is
      (Operand::Memory(_), Operand::Immediate(imm)) => write!(f, "{} {}", imm.width, imm),
      (_, src) => write!(f, "{src}"),
    }
  }
}

impl Display for Operation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Operation::Mov => write!(f, "mov"),
    }
  }
}

impl Display for Operand {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Operand::Register(reg) => reg.fmt(f),
      Operand::Memory(mem) => mem.fmt(f),
      Operand::Immediate(imm) => imm.fmt(f),
    }
  }
}

impl Display for Register {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl Display for EffectiveAddress {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.expression())
  }
}

impl Display for Memory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match *self {
      Memory::Direct(address) => write!(f, "[{address}]"),
      Memory::Based { base, displacement } if displacement.is_zero() => write!(f, "[{base}]"),
      Memory::Based { base, displacement } => match displacement {
        Displacement::Byte(disp) if disp < 0 => write!(f, "[{base} - {}]", disp.unsigned_abs()),
        Displacement::Byte(disp) => write!(f, "[{base} + {disp}]"),
        Displacement::Word(disp) => write!(f, "[{base} + {disp}]"),
        Displacement::None => write!(f, "[{base}]"),
      },
    }
  }
}

impl Display for Immediate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.value)
  }
}

impl Display for Width {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Width::Byte => write!(f, "byte"),
      Width::Word => write!(f, "word"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use indoc::indoc as asm;
  use pretty_assertions::assert_eq;

  fn based(base: EffectiveAddress, displacement: Displacement) -> String {
    Memory::Based { base, displacement }.to_string()
  }

  fn mov(dest: Operand, src: Operand) -> Instruction {
    Instruction {
      operation: Operation::Mov,
      dest,
      src,
      offset: 0,
      size: 0,
    }
  }

  #[test]
  fn test_memory_operands() {
    use Displacement::*;
    use EffectiveAddress::*;
    assert_eq!(based(BxSi, None), "[bx + si]");
    assert_eq!(based(Bp, Byte(0)), "[bp]");
    assert_eq!(based(Bx, Word(0)), "[bx]");
    assert_eq!(based(BpDi, Byte(4)), "[bp + di + 4]");
    assert_eq!(based(BxDi, Byte(-37)), "[bx + di - 37]");
    assert_eq!(based(Si, Byte(i8::MIN)), "[si - 128]");
    assert_eq!(based(Di, Word(65236)), "[di + 65236]");
    assert_eq!(Memory::Direct(1000).to_string(), "[1000]");
    assert_eq!(Memory::Direct(0).to_string(), "[0]");
  }

  #[test]
  fn test_size_keyword_only_for_memory_destination() {
    let imm = Operand::Immediate(Immediate { value: 7, width: Width::Byte });
    let mem = Operand::Memory(Memory::Based {
      base: EffectiveAddress::BpDi,
      displacement: Displacement::None,
    });
    assert_eq!(mov(mem, imm).to_string(), "mov [bp + di], byte 7");
    assert_eq!(
      mov(Operand::Register(Register::Cl), imm).to_string(),
      "mov cl, 7"
    );
    let imm = Operand::Immediate(Immediate { value: 347, width: Width::Word });
    let mem = Operand::Memory(Memory::Direct(16));
    assert_eq!(mov(mem, imm).to_string(), "mov [16], word 347");
  }

  #[test]
  fn test_render_listing() {
    let lines = [
      mov(Operand::Register(Register::Si), Operand::Register(Register::Bx)),
      mov(Operand::Register(Register::Ax), Operand::Memory(Memory::Direct(2555))),
    ];
    assert_eq!(
      render(&lines),
      asm! {"
        bits 16
        mov si, bx
        mov ax, [2555]
      "}
    );
    assert_eq!(render(Vec::<String>::new()), "bits 16\n");
    assert_eq!(render([data_byte(0x90)]), "bits 16\ndb 144\n");
  }
}
