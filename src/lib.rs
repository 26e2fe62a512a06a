//! Core IR, traits, and errors for the sim8086 disassembler.
//!
//! This library turns a raw 8086 binary image into NASM-style assembly text.
//! Decoding covers the register-to-register form of `mov`; anything else
//! stops the run with a typed error.
//!
//! # Basic Usage
//!
//! ```rust
//! let text = sim8086::disassemble(&[0b1000_1001, 0b1100_0011]).unwrap();
//! assert_eq!(text, "bits 16\nmov bx, ax\n");
//! ```
//!
//! For structured output, run the linear sweep and pick a formatter:
//!
//! ```rust
//! use sim8086::{decoder::Sim8086Decoder, format::OutputFormat, linear};
//!
//! let disassembly = linear::run(&[0x89, 0xd9], &Sim8086Decoder).unwrap();
//! let json = OutputFormat::Json.formatter().format(&disassembly).unwrap();
//! assert!(json.contains("\"destination\": \"cx\""));
//! ```

pub mod registers;
pub mod decoder;
pub mod linear;
pub mod format;

use std::fmt;
use std::path::Path;

use serde::Serialize;

pub use decoder::{DecodeError, Sim8086Decoder};
pub use linear::{disassemble, disassemble_into};
pub use registers::{LookupError, Register};

/// Byte offset into the image
pub type Address = u64;

/// Longest 8086 instruction encoding without prefixes
pub const MAX_INSTRUCTION_SIZE: usize = 6;

/// Instruction operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mnemonic {
    Mov,
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mnemonic::Mov => write!(f, "mov"),
        }
    }
}

/// One decoded instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insn {
    /// Offset of the instruction in the image
    pub addr: Address,
    /// Size of the instruction in bytes
    pub size: u8,
    pub mnemonic: Mnemonic,
    /// Destination operand
    pub dst: Register,
    /// Source operand
    pub src: Register,
    /// Raw encoding, zero padded past `size`
    pub bytes: [u8; MAX_INSTRUCTION_SIZE],
}

impl Insn {
    /// Returns the instruction bytes, up to the actual instruction size.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes[..self.size as usize]
    }

    /// Operands in assembler order, e.g. `"bx, ax"`.
    pub fn operands(&self) -> String {
        format!("{}, {}", self.dst, self.src)
    }

    /// Encoding as space separated hex pairs.
    pub fn hex_bytes(&self) -> String {
        self.bytes()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Insn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}, {}", self.mnemonic, self.dst, self.src)
    }
}

/// Decoder trait: turns the bytes at one offset into an instruction.
pub trait Decoder: Send + Sync {
    /// Decode a single instruction at `at` offset.
    ///
    /// # Arguments
    /// * `image` - The binary image to decode
    /// * `at` - Offset into the image
    ///
    /// # Returns
    /// The decoded instruction, or the reason the bytes at `at` could not be decoded
    fn decode(&self, image: &[u8], at: Address) -> Result<Insn, DecodeError>;
}

/// Instructions recovered by one run, in program order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Disassembly {
    pub insns: Vec<Insn>,
    /// Total bytes consumed by the decoder
    pub consumed: usize,
}

impl Disassembly {
    /// Get the total number of instructions
    pub fn instruction_count(&self) -> usize {
        self.insns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.insns.is_empty()
    }
}

/// Error type for disassembly operations
#[derive(Debug, thiserror::Error)]
pub enum DisassemblyError {
    /// The decoder rejected the bytes at some offset
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A decoder reported success without consuming input
    #[error("decoder made no progress at offset {0:#06x}")]
    Stalled(Address),

    /// I/O error
    #[error("I/O error")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error")]
    Json(#[from] serde_json::Error),

    #[error("CSV serialization error")]
    Csv(#[from] csv::Error),

    /// Generic error
    #[error("{0}")]
    Generic(String),
}

/// Read a whole binary image into memory.
pub fn read_image<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, DisassemblyError> {
    let path = path.as_ref();
    let image = std::fs::read(path)?;
    log::debug!("Read {} bytes from {}", image.len(), path.display());
    Ok(image)
}
