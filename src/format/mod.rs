//! Output format module implementation

mod json;
mod csv;

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::Serialize;

use crate::decoder::push_line;
use crate::linear::push_header;
use crate::{Disassembly, DisassemblyError, Insn, Mnemonic};

/// Supported output formats for disassembly results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// NASM-compatible listing (default)
    #[default]
    Text,
    /// JSON format (one document)
    Json,
    /// JSON Lines format (one JSON object per line)
    #[value(name = "jsonl")]
    JsonLines,
    /// CSV format (comma-separated values)
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::JsonLines => write!(f, "jsonl"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "asm" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "jsonlines" => Ok(OutputFormat::JsonLines),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

impl OutputFormat {
    /// Get all available output formats
    pub fn available_formats() -> &'static [Self] {
        &[
            OutputFormat::Text,
            OutputFormat::Json,
            OutputFormat::JsonLines,
            OutputFormat::Csv,
        ]
    }

    /// Get a formatter for this output format
    pub fn formatter(&self) -> Box<dyn DisassemblyFormatter> {
        match self {
            OutputFormat::Text => Box::new(TextFormatter),
            OutputFormat::Json => Box::new(JsonFormatter),
            OutputFormat::JsonLines => Box::new(JsonLinesFormatter),
            OutputFormat::Csv => Box::new(CsvFormatter),
        }
    }
}

/// Formatter trait for disassembly output
pub trait DisassemblyFormatter {
    /// Format a disassembly result
    fn format(&self, disassembly: &Disassembly) -> Result<String, DisassemblyError>;
}

/// Format disassembly as a NASM listing
pub struct TextFormatter;

/// Format disassembly in JSON
pub struct JsonFormatter;

/// Format disassembly in JSON Lines
pub struct JsonLinesFormatter;

/// Format disassembly in CSV
pub struct CsvFormatter;

/// Flat per-instruction record shared by the JSON and CSV formatters.
#[derive(Debug, Serialize)]
struct InstructionRecord {
    address: String,
    size: u8,
    mnemonic: Mnemonic,
    destination: &'static str,
    source: &'static str,
    bytes: String,
}

impl From<&Insn> for InstructionRecord {
    fn from(insn: &Insn) -> Self {
        Self {
            address: format!("0x{:04x}", insn.addr),
            size: insn.size,
            mnemonic: insn.mnemonic,
            destination: insn.dst.name(),
            source: insn.src.name(),
            bytes: insn.hex_bytes(),
        }
    }
}

impl DisassemblyFormatter for TextFormatter {
    fn format(&self, disassembly: &Disassembly) -> Result<String, DisassemblyError> {
        let mut output = String::new();
        push_header(&mut output);
        for insn in &disassembly.insns {
            push_line(&mut output, insn);
        }
        Ok(output)
    }
}
