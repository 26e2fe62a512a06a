//! JSON and JSON Lines output formatters

use serde::Serialize;

use super::{DisassemblyFormatter, InstructionRecord};
use crate::{Disassembly, DisassemblyError};

/// Serializable disassembly result for JSON output
#[derive(Serialize)]
struct DisassemblyJson {
    /// Operand size mode of the listing
    bits: u8,
    /// Total bytes consumed
    consumed: usize,
    instructions: Vec<InstructionRecord>,
}

impl DisassemblyFormatter for super::JsonFormatter {
    fn format(&self, disassembly: &Disassembly) -> Result<String, DisassemblyError> {
        let result = DisassemblyJson {
            bits: 16,
            consumed: disassembly.consumed,
            instructions: disassembly.insns.iter().map(InstructionRecord::from).collect(),
        };

        Ok(serde_json::to_string_pretty(&result)?)
    }
}

impl DisassemblyFormatter for super::JsonLinesFormatter {
    fn format(&self, disassembly: &Disassembly) -> Result<String, DisassemblyError> {
        let mut output = String::new();

        for insn in &disassembly.insns {
            output.push_str(&serde_json::to_string(&InstructionRecord::from(insn))?);
            output.push('\n');
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use crate::decoder::Sim8086Decoder;
    use crate::format::{DisassemblyFormatter, JsonFormatter, JsonLinesFormatter};
    use crate::linear;
    use serde_json::Value;

    #[test]
    fn test_json_document() {
        let disassembly = linear::run(&[0x89, 0xc3, 0x8b, 0xc3], &Sim8086Decoder).unwrap();
        let output = JsonFormatter.format(&disassembly).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["bits"], 16);
        assert_eq!(value["consumed"], 4);
        assert_eq!(value["instructions"][0]["mnemonic"], "mov");
        assert_eq!(value["instructions"][0]["destination"], "bx");
        assert_eq!(value["instructions"][1]["destination"], "ax");
        assert_eq!(value["instructions"][1]["address"], "0x0002");
    }

    #[test]
    fn test_json_lines() {
        let disassembly = linear::run(&[0x89, 0xd9, 0x88, 0xe5], &Sim8086Decoder).unwrap();
        let output = JsonLinesFormatter.format(&disassembly).unwrap();
        let lines: Vec<Value> = output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["source"], "ah");
        assert_eq!(lines[1]["bytes"], "88 e5");
    }
}
