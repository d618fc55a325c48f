use std::fmt;

/// Encoding shape of the instruction starting at a given byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
  /// `100010dw`
  RegisterMemoryToFromRegister { d: bool, w: bool },
  /// `1100011w`
  ImmediateToRegisterMemory { w: bool },
  /// `1011wreg`
  ImmediateToRegister { w: bool, reg: u8 },
  /// `1010000w`
  MemoryToAccumulator { w: bool },
  /// `1010001w`
  AccumulatorToMemory { w: bool },
  Unsupported(Unsupported),
  Unrecognized,
}

/// Real 8086 encodings this decoder knows of but does not decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unsupported {
  /// `100011d0`, mov to or from a segment register
  SegmentRegisterMov,
  /// `001sr110`
  SegmentOverride,
}

pub fn classify(byte: u8) -> Shape {
  let d = byte & 0b_0000_0010 != 0;
  let w = byte & 0b_0000_0001 != 0;
  match byte {
    b if b & 0b_1111_1100 == 0b_1000_1000 => Shape::RegisterMemoryToFromRegister { d, w },
    b if b & 0b_1111_1110 == 0b_1100_0110 => Shape::ImmediateToRegisterMemory { w },
    b if b & 0b_1111_0000 == 0b_1011_0000 => Shape::ImmediateToRegister {
      w: b & 0b_0000_1000 != 0,
      reg: b & 0b_0000_0111,
    },
    b if b & 0b_1111_1110 == 0b_1010_0000 => Shape::MemoryToAccumulator { w },
    b if b & 0b_1111_1110 == 0b_1010_0010 => Shape::AccumulatorToMemory { w },
    b if b & 0b_1111_1101 == 0b_1000_1100 => Shape::Unsupported(Unsupported::SegmentRegisterMov),
    b if b & 0b_1110_0111 == 0b_0010_0110 => Shape::Unsupported(Unsupported::SegmentOverride),
    _ => Shape::Unrecognized,
  }
}

impl fmt::Display for Shape {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Shape::RegisterMemoryToFromRegister { .. } => write!(f, "register/memory to/from register"),
      Shape::ImmediateToRegisterMemory { .. } => write!(f, "immediate to register/memory"),
      Shape::ImmediateToRegister { .. } => write!(f, "immediate to register"),
      Shape::MemoryToAccumulator { .. } => write!(f, "memory to accumulator"),
      Shape::AccumulatorToMemory { .. } => write!(f, "accumulator to memory"),
      Shape::Unsupported(what) => write!(f, "{what}"),
      Shape::Unrecognized => write!(f, "unrecognized"),
    }
  }
}

impl fmt::Display for Unsupported {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Unsupported::SegmentRegisterMov => write!(f, "segment register mov"),
      Unsupported::SegmentOverride => write!(f, "segment override prefix"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn test_register_memory_direction_and_width() {
    assert_eq!(
      classify(0b_100010_0_1),
      Shape::RegisterMemoryToFromRegister { d: false, w: true }
    );
    assert_eq!(
      classify(0b_100010_1_0),
      Shape::RegisterMemoryToFromRegister { d: true, w: false }
    );
  }

  #[test]
  fn test_immediate_shapes() {
    assert_eq!(classify(0b_1100011_1), Shape::ImmediateToRegisterMemory { w: true });
    assert_eq!(
      classify(0b_1011_0_001),
      Shape::ImmediateToRegister { w: false, reg: 0b_001 }
    );
    assert_eq!(
      classify(0b_1011_1_111),
      Shape::ImmediateToRegister { w: true, reg: 0b_111 }
    );
  }

  #[test]
  fn test_accumulator_shapes() {
    assert_eq!(classify(0b_1010000_0), Shape::MemoryToAccumulator { w: false });
    assert_eq!(classify(0b_1010000_1), Shape::MemoryToAccumulator { w: true });
    assert_eq!(classify(0b_1010001_0), Shape::AccumulatorToMemory { w: false });
    assert_eq!(classify(0b_1010001_1), Shape::AccumulatorToMemory { w: true });
  }

  #[test]
  fn test_known_but_unsupported() {
    assert_eq!(
      classify(0b_1000_1110),
      Shape::Unsupported(Unsupported::SegmentRegisterMov)
    );
    assert_eq!(
      classify(0b_1000_1100),
      Shape::Unsupported(Unsupported::SegmentRegisterMov)
    );
    for prefix in [0x26, 0x2e, 0x36, 0x3e] {
      assert_eq!(classify(prefix), Shape::Unsupported(Unsupported::SegmentOverride));
    }
  }

  #[test]
  fn test_everything_else_unrecognized() {
    for byte in [0x00, 0x90, 0xc3, 0xff, 0b_1000_1101, 0b_1010_0100] {
      assert_eq!(classify(byte), Shape::Unrecognized, "{byte:08b}");
    }
  }

  #[test]
  fn test_shapes_partition_byte_space() {
    let recognized = (0..=u8::MAX)
      .filter(|&b| !matches!(classify(b), Shape::Unrecognized | Shape::Unsupported(_)))
      .count();
    // 4 + 2 + 16 + 2 + 2
    assert_eq!(recognized, 26);
  }
}
