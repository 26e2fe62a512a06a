//! CSV output formatter

use super::{DisassemblyFormatter, InstructionRecord};
use crate::{Disassembly, DisassemblyError};

const COLUMNS: [&str; 6] = ["address", "size", "mnemonic", "destination", "source", "bytes"];

impl DisassemblyFormatter for super::CsvFormatter {
    fn format(&self, disassembly: &Disassembly) -> Result<String, DisassemblyError> {
        let mut writer = ::csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());

        writer.write_record(COLUMNS)?;
        for insn in &disassembly.insns {
            writer.serialize(InstructionRecord::from(insn))?;
        }

        let data = writer
            .into_inner()
            .map_err(|e| DisassemblyError::IoError(e.into_error()))?;
        String::from_utf8(data).map_err(|e| DisassemblyError::Generic(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use crate::format::{CsvFormatter, DisassemblyFormatter};
    use crate::{linear, Disassembly, Sim8086Decoder};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_csv_rows() {
        let disassembly = linear::run(&[0x89, 0xd9, 0x88, 0xc8], &Sim8086Decoder).unwrap();
        let output = CsvFormatter.format(&disassembly).unwrap();

        assert_eq!(
            output,
            "address,size,mnemonic,destination,source,bytes\n\
             0x0000,2,mov,cx,bx,89 d9\n\
             0x0002,2,mov,al,cl,88 c8\n"
        );
    }

    #[test]
    fn test_csv_header_only_when_empty() {
        let output = CsvFormatter.format(&Disassembly::default()).unwrap();

        assert_eq!(output, "address,size,mnemonic,destination,source,bytes\n");
    }
}
