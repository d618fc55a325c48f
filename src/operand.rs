#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Width {
  Byte,
  Word,
}

impl Width {
  pub fn from_w_bit(w: bool) -> Self {
    if w {
      Width::Word
    } else {
      Width::Byte
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
  Al,
  Cl,
  Dl,
  Bl,
  Ah,
  Ch,
  Dh,
  Bh,
  Ax,
  Cx,
  Dx,
  Bx,
  Sp,
  Bp,
  Si,
  Di,
}

use Register::*;

// indexed by the 3-bit reg/rm code; code 100 is ah in the byte column but sp in the word column
const BYTE_REGISTERS: [Register; 8] = [Al, Cl, Dl, Bl, Ah, Ch, Dh, Bh];
const WORD_REGISTERS: [Register; 8] = [Ax, Cx, Dx, Bx, Sp, Bp, Si, Di];

impl Register {
  /// Register selected by a 3-bit `reg`/`rm` code and the W bit.
  pub fn decode(code: u8, w: bool) -> Self {
    let table = if w { &WORD_REGISTERS } else { &BYTE_REGISTERS };
    table[usize::from(code & 0b_111)]
  }

  pub fn accumulator(w: bool) -> Self {
    Register::decode(0b_000, w)
  }

  pub fn width(self) -> Width {
    if WORD_REGISTERS.contains(&self) {
      Width::Word
    } else {
      Width::Byte
    }
  }

  pub fn name(self) -> &'static str {
    match self {
      Al => "al",
      Cl => "cl",
      Dl => "dl",
      Bl => "bl",
      Ah => "ah",
      Ch => "ch",
      Dh => "dh",
      Bh => "bh",
      Ax => "ax",
      Cx => "cx",
      Dx => "dx",
      Bx => "bx",
      Sp => "sp",
      Bp => "bp",
      Si => "si",
      Di => "di",
    }
  }
}

/// Base expression of a memory operand, selected by the rm field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectiveAddress {
  BxSi,
  BxDi,
  BpSi,
  BpDi,
  Si,
  Di,
  Bp,
  Bx,
}

const EFFECTIVE_ADDRESSES: [EffectiveAddress; 8] = [
  EffectiveAddress::BxSi,
  EffectiveAddress::BxDi,
  EffectiveAddress::BpSi,
  EffectiveAddress::BpDi,
  EffectiveAddress::Si,
  EffectiveAddress::Di,
  EffectiveAddress::Bp,
  EffectiveAddress::Bx,
];

impl EffectiveAddress {
  /// rm = 110 yields `Bp`; the mod = 00 direct address case is the decoder's concern.
  pub fn from_rm(rm: u8) -> Self {
    EFFECTIVE_ADDRESSES[usize::from(rm & 0b_111)]
  }

  pub fn expression(self) -> &'static str {
    match self {
      EffectiveAddress::BxSi => "bx + si",
      EffectiveAddress::BxDi => "bx + di",
      EffectiveAddress::BpSi => "bp + si",
      EffectiveAddress::BpDi => "bp + di",
      EffectiveAddress::Si => "si",
      EffectiveAddress::Di => "di",
      EffectiveAddress::Bp => "bp",
      EffectiveAddress::Bx => "bx",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Displacement {
  None,
  /// mod = 01, sign-extended by the CPU.
  Byte(i8),
  /// mod = 10, kept as the raw 16-bit offset.
  Word(u16),
}

impl Displacement {
  pub fn is_zero(self) -> bool {
    matches!(
      self,
      Displacement::None | Displacement::Byte(0) | Displacement::Word(0)
    )
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Memory {
  Based {
    base: EffectiveAddress,
    displacement: Displacement,
  },
  Direct(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Immediate {
  pub value: u16,
  pub width: Width,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
  Register(Register),
  Memory(Memory),
  Immediate(Immediate),
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;
  use std::collections::HashSet;

  #[test]
  fn test_register_table() {
    let names: Vec<_> = (0..8)
      .flat_map(|code| [false, true].map(|w| Register::decode(code, w).name()))
      .collect();
    assert_eq!(
      names,
      vec![
        "al", "ax", "cl", "cx", "dl", "dx", "bl", "bx", "ah", "sp", "ch", "bp", "dh", "si", "bh",
        "di"
      ]
    );
    let unique: HashSet<_> = names.iter().collect();
    assert_eq!(unique.len(), 16);
  }

  #[test]
  fn test_register_width_follows_w_bit() {
    for code in 0..8 {
      assert_eq!(Register::decode(code, false).width(), Width::Byte);
      assert_eq!(Register::decode(code, true).width(), Width::Word);
    }
    assert_eq!(Register::accumulator(false), Register::Al);
    assert_eq!(Register::accumulator(true), Register::Ax);
  }

  #[test]
  fn test_effective_address_table() {
    let expressions: Vec<_> = (0..8)
      .map(|rm| EffectiveAddress::from_rm(rm).expression())
      .collect();
    assert_eq!(
      expressions,
      vec!["bx + si", "bx + di", "bp + si", "bp + di", "si", "di", "bp", "bx"]
    );
  }

  #[test]
  fn test_zero_displacement() {
    assert!(Displacement::None.is_zero());
    assert!(Displacement::Byte(0).is_zero());
    assert!(Displacement::Word(0).is_zero());
    assert!(!Displacement::Byte(-1).is_zero());
    assert!(!Displacement::Word(65535).is_zero());
  }
}
