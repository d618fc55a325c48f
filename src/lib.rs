//! Disassembler for the 8086 MOV data-transfer encodings.
//!
//! Turns a raw machine-code image into `bits 16` assembly that reassembles to the
//! same bytes:
//!
//! ```
//! let listing = disasm_8086::disassemble(&[0x89, 0xde, 0xb1, 0x0c]).unwrap();
//! assert_eq!(listing, "bits 16\nmov si, bx\nmov cl, 12\n");
//! ```

pub mod classify;
pub mod cursor;
pub mod decode;
pub mod emit;
pub mod error;
pub mod operand;

pub use classify::{classify, Shape, Unsupported};
pub use decode::{decode_instruction, disassemble, Disassembly, Instruction, Operation};
pub use error::{DecodeError, DecodeResult};
pub use operand::{Displacement, EffectiveAddress, Immediate, Memory, Operand, Register, Width};
