//! Linear-sweep disassembly: decode back to back from offset zero.

use std::path::Path;

use crate::decoder::{push_line, Sim8086Decoder};
use crate::{Address, Decoder, Disassembly, DisassemblyError, Insn};

/// First line of every text listing.
pub const HEADER: &str = "bits 16";

/// Walk `image` from the start, handing each decoded instruction to `emit`.
///
/// Stops at the first decode failure and returns it unchanged. On success
/// returns the total number of bytes consumed.
pub fn sweep<F>(image: &[u8], decoder: &dyn Decoder, mut emit: F) -> Result<usize, DisassemblyError>
where
    F: FnMut(Insn) -> Result<(), DisassemblyError>,
{
    let mut offset = 0usize;
    while offset < image.len() {
        let insn = decoder.decode(image, offset as Address)?;
        if insn.size == 0 {
            return Err(DisassemblyError::Stalled(offset as Address));
        }
        offset += insn.size as usize;
        emit(insn)?;
    }
    Ok(offset)
}

/// Linear-sweep disassembly into structured instructions
///
/// # Arguments
/// * `image` - The binary image to disassemble
/// * `decoder` - The decoder to use for disassembly
pub fn run(image: &[u8], decoder: &dyn Decoder) -> Result<Disassembly, DisassemblyError> {
    log::debug!("Starting linear sweep on {} bytes", image.len());

    let mut insns = Vec::new();
    let consumed = sweep(image, decoder, |insn| {
        insns.push(insn);
        Ok(())
    })?;

    log::debug!("Linear sweep complete: {} instructions", insns.len());
    Ok(Disassembly { insns, consumed })
}

/// Disassemble `image` into `output`, header first, one line per instruction.
///
/// Lines decoded before a failure stay in `output`. Returns the number of
/// bytes consumed.
pub fn disassemble_into(image: &[u8], output: &mut String) -> Result<usize, DisassemblyError> {
    log::debug!("Disassembling {} bytes", image.len());
    push_header(output);

    let consumed = sweep(image, &Sim8086Decoder, |insn| {
        push_line(output, &insn);
        Ok(())
    });
    if let Err(e) = &consumed {
        log::debug!("Disassembly stopped: {}", e);
    }
    consumed
}

/// Start a listing with the `bits 16` line.
pub fn push_header(output: &mut String) {
    output.push_str(HEADER);
    output.push('\n');
}

/// Disassemble a whole image to NASM-style text.
pub fn disassemble(image: &[u8]) -> Result<String, DisassemblyError> {
    let mut output = String::new();
    disassemble_into(image, &mut output)?;
    Ok(output)
}

/// Listing for an image loaded from `path`, led by a comment naming the file.
///
/// Returns nothing but the error if any instruction fails to decode.
pub fn listing_for(path: &Path, image: &[u8]) -> Result<String, DisassemblyError> {
    let body = disassemble(image)?;
    Ok(format!("; disassembly for file {}\n{body}", path.display()))
}
