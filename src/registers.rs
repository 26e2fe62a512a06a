//! Register name resolution for the 8086 `reg` / `rm` operand fields.

use std::fmt;

use serde::Serialize;

/// An 8086 general purpose register, in either its byte or word form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
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

/// Selector lookup outside the 3-bit encoding domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("register not found for bit pattern {selector:#05b} (wide={wide})")]
pub struct LookupError {
    pub selector: u8,
    pub wide: bool,
}

/// Indexed by `selector | (wide << 3)`.
static REGISTER_TABLE: [Register; 16] = [
    Register::Al,
    Register::Cl,
    Register::Dl,
    Register::Bl,
    Register::Ah,
    Register::Ch,
    Register::Dh,
    Register::Bh,
    Register::Ax,
    Register::Cx,
    Register::Dx,
    Register::Bx,
    Register::Sp,
    Register::Bp,
    Register::Si,
    Register::Di,
];

impl Register {
    /// Look up the register named by a 3-bit selector and the width flag.
    pub fn decode(selector: u8, wide: bool) -> Result<Register, LookupError> {
        if selector > 0b111 {
            return Err(LookupError { selector, wide });
        }
        let key = selector as usize | (usize::from(wide) << 3);
        Ok(REGISTER_TABLE[key])
    }

    /// Assembler mnemonic, e.g. `"ax"`.
    pub fn name(self) -> &'static str {
        match self {
            Register::Al => "al",
            Register::Cl => "cl",
            Register::Dl => "dl",
            Register::Bl => "bl",
            Register::Ah => "ah",
            Register::Ch => "ch",
            Register::Dh => "dh",
            Register::Bh => "bh",
            Register::Ax => "ax",
            Register::Cx => "cx",
            Register::Dx => "dx",
            Register::Bx => "bx",
            Register::Sp => "sp",
            Register::Bp => "bp",
            Register::Si => "si",
            Register::Di => "di",
        }
    }

    /// True for the 16-bit registers.
    pub fn is_wide(self) -> bool {
        matches!(
            self,
            Register::Ax
                | Register::Cx
                | Register::Dx
                | Register::Bx
                | Register::Sp
                | Register::Bp
                | Register::Si
                | Register::Di
        )
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolve a `(selector, wide)` pair straight to its mnemonic.
pub fn resolve(selector: u8, wide: bool) -> Result<&'static str, LookupError> {
    Register::decode(selector, wide).map(Register::name)
}
