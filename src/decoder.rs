//! Bit-field decoder for the 8086 register-to-register `mov`.

use std::fmt;

use crate::registers::{LookupError, Register};
use crate::{Address, Decoder, Insn, Mnemonic, MAX_INSTRUCTION_SIZE};

/// `mod` value for register-direct addressing
pub const MODE_REGISTER: u8 = 0b11;

/// Errors that can occur during decoding
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Top six bits of the leading byte name no known instruction family
    #[error("unsupported opcode {:06b} in byte {byte:#04x} at offset {offset:#06x}", .byte >> 2)]
    UnsupportedOpcode { offset: Address, byte: u8 },

    /// Only register-register (`mod == 11`) is decoded
    #[error("unsupported addressing mode {mode:02b} at offset {offset:#06x}: only register-register mode is supported")]
    UnsupportedAddressingMode { offset: Address, mode: u8 },

    /// The image ends inside an instruction
    #[error("truncated instruction at offset {offset:#06x}: need {needed} bytes, {available} available")]
    Truncated {
        offset: Address,
        needed: usize,
        available: usize,
    },

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

/// Instruction family selected by the top six bits of the leading byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    /// `100010dw`: register/memory to/from register
    MovRegRm,
}

impl Opcode {
    pub fn classify(byte: u8) -> Option<Opcode> {
        match byte >> 2 {
            0b100010 => Some(Opcode::MovRegRm),
            _ => None,
        }
    }

    pub fn mnemonic(self) -> Mnemonic {
        match self {
            Opcode::MovRegRm => Mnemonic::Mov,
        }
    }

    /// Encoded length in register-direct mode.
    pub fn size(self) -> usize {
        match self {
            Opcode::MovRegRm => 2,
        }
    }
}

/// Fields of the second (`mod reg r/m`) byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModRm {
    pub mode: u8,
    pub reg: u8,
    pub rm: u8,
}

impl ModRm {
    pub fn from_byte(byte: u8) -> Self {
        Self {
            mode: byte >> 6,
            reg: (byte >> 3) & 0b111,
            rm: byte & 0b111,
        }
    }
}

/// Decoder for the 16-bit 8086 instruction set.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sim8086Decoder;

impl fmt::Display for Sim8086Decoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sim8086Decoder")
    }
}

impl Decoder for Sim8086Decoder {
    fn decode(&self, image: &[u8], at: Address) -> Result<Insn, DecodeError> {
        let window = usize::try_from(at)
            .ok()
            .and_then(|offset| image.get(offset..))
            .unwrap_or(&[]);
        decode_window(window, at)
    }
}

/// Decode the instruction at the start of `window`, labelling it with `at`.
pub fn decode_window(window: &[u8], at: Address) -> Result<Insn, DecodeError> {
    let Some(&first) = window.first() else {
        return Err(DecodeError::Truncated {
            offset: at,
            needed: 1,
            available: 0,
        });
    };

    let opcode = Opcode::classify(first).ok_or(DecodeError::UnsupportedOpcode {
        offset: at,
        byte: first,
    })?;

    let insn = match opcode {
        Opcode::MovRegRm => decode_reg_rm(opcode, window, at)?,
    };
    log::trace!("{:#06x}: {:<8} {}", at, insn.hex_bytes(), insn);
    Ok(insn)
}

fn decode_reg_rm(opcode: Opcode, window: &[u8], at: Address) -> Result<Insn, DecodeError> {
    let size = opcode.size();
    if window.len() < size {
        return Err(DecodeError::Truncated {
            offset: at,
            needed: size,
            available: window.len(),
        });
    }

    let direction = (window[0] >> 1) & 1 == 1;
    let wide = window[0] & 1 == 1;
    let modrm = ModRm::from_byte(window[1]);

    if modrm.mode != MODE_REGISTER {
        return Err(DecodeError::UnsupportedAddressingMode {
            offset: at,
            mode: modrm.mode,
        });
    }

    let reg = Register::decode(modrm.reg, wide)?;
    let rm = Register::decode(modrm.rm, wide)?;
    let (dst, src) = if direction { (reg, rm) } else { (rm, reg) };

    let mut bytes = [0u8; MAX_INSTRUCTION_SIZE];
    bytes[..size].copy_from_slice(&window[..size]);

    Ok(Insn {
        addr: at,
        size: size as u8,
        mnemonic: opcode.mnemonic(),
        dst,
        src,
        bytes,
    })
}

/// Append `insn` to a listing as one `mov <dst>, <src>` line.
pub fn push_line(output: &mut String, insn: &Insn) {
    output.push_str(&insn.to_string());
    output.push('\n');
}

/// Decode one instruction from `window` and append its line to `output`.
///
/// Returns the number of bytes consumed. On failure nothing is appended.
pub fn decode(window: &[u8], output: &mut String) -> Result<usize, DecodeError> {
    let insn = decode_window(window, 0)?;
    push_line(output, &insn);
    Ok(insn.size as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_mov_bx_ax() {
        let mut out = String::new();
        let consumed = decode(&[0b10001001, 0b11000011], &mut out).unwrap();

        assert_eq!(out, "mov bx, ax\n");
        assert_eq!(consumed, 2);
    }

    #[test]
    fn test_direction_bit_swaps_operands() {
        let mut out = String::new();
        decode(&[0b100010_0_1, 0b11_000_011], &mut out).unwrap();
        decode(&[0b100010_1_1, 0b11_000_011], &mut out).unwrap();

        assert_eq!(out, "mov bx, ax\nmov ax, bx\n");
    }

    #[test]
    fn test_byte_width() {
        let insn = decode_window(&[0b100010_0_0, 0b11_100_101], 0).unwrap();

        assert_eq!(insn.dst, Register::Ch);
        assert_eq!(insn.src, Register::Ah);
        assert_eq!(insn.bytes(), &[0x88, 0xe5]);
    }

    #[test]
    fn test_unsupported_opcode() {
        let mut out = String::from("bits 16\n");
        let err = decode(&[0b1011_1000, 0x01, 0x00], &mut out).unwrap_err();

        assert_eq!(err, DecodeError::UnsupportedOpcode { offset: 0, byte: 0xb8 });
        assert_eq!(out, "bits 16\n");
    }

    #[test]
    fn test_unsupported_addressing_mode() {
        for mode in [0b00, 0b01, 0b10] {
            let mut out = String::new();
            let err = decode(&[0b1000_1001, mode << 6 | 0b011_001], &mut out).unwrap_err();

            assert_eq!(err, DecodeError::UnsupportedAddressingMode { offset: 0, mode });
            assert!(out.is_empty());
        }
    }

    #[test]
    fn test_truncated_window() {
        let mut out = String::new();

        assert_eq!(
            decode(&[0b1000_1001], &mut out).unwrap_err(),
            DecodeError::Truncated { offset: 0, needed: 2, available: 1 }
        );
        assert_eq!(
            decode(&[], &mut out).unwrap_err(),
            DecodeError::Truncated { offset: 0, needed: 1, available: 0 }
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_decoder_trait_offsets() {
        let image = [0x89, 0xd9, 0x88, 0xe5];
        let insn = Sim8086Decoder.decode(&image, 2).unwrap();

        assert_eq!(insn.addr, 2);
        assert_eq!(insn.to_string(), "mov ch, ah");

        let err = Sim8086Decoder.decode(&image, 4).unwrap_err();
        assert_eq!(err, DecodeError::Truncated { offset: 4, needed: 1, available: 0 });
    }

    #[test]
    fn test_modrm_fields() {
        let modrm = ModRm::from_byte(0b11_011_001);

        assert_eq!(modrm, ModRm { mode: 0b11, reg: 0b011, rm: 0b001 });
    }

    #[test]
    fn test_classify() {
        assert_eq!(Opcode::classify(0x88), Some(Opcode::MovRegRm));
        assert_eq!(Opcode::classify(0x8b), Some(Opcode::MovRegRm));
        assert_eq!(Opcode::classify(0x8c), None);
        assert_eq!(Opcode::classify(0x90), None);
    }
}
