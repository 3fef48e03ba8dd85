//! Assembler for the [seqvm](../seqvm/index.html) machine.
//!
//! [`assemble_into`](fn.assemble_into.html) parses a source file, resolves
//! names to absolute addresses in two passes, writes the encoded
//! instructions straight into a machine's memory, and sets the machine's
//! program counter to the address declared for `main`. There is no
//! intermediate executable: the in-memory image *is* the interpreter's
//! input.
//!
//! # Source format
//!
//! A program is a sequence of lines:
//!
//! ```text
//! .data
//! NAME HEXVAL
//! .text
//! <funcname:HEXADDR>
//!     mnemonic [operand1[,] [operand2]]
//! .LABEL
//!     ...
//! ```
//!
//! - `.data` / `.text` switch sections. Inside `.data`, each line binds a
//!   variable name to a hex value; variables never occupy memory, they are
//!   immediate-operand aliases.
//! - `<name:HEXADDR>` declares a function at an absolute address; the
//!   following instructions are laid out from there with a fixed 6-byte
//!   stride. The address of `main` becomes the entry point.
//! - Any other `.NAME` line is a jump label bound to the address of the
//!   next instruction.
//!
//! Operand tokens are resolved by the mnemonic's operand pattern:
//!
//!  Position       | Meaning
//! ----------------|---------------------------------------------------
//!  register       | register name (`eax`..`r15d`, case-insensitive)
//!  immediate      | data-variable name, else hex literal (optional `0x`)
//!  jump target    | label name, with or without the leading `.`
//!  call target    | function name, else hex literal
//!
//! Hex literals are unprefixed base-16 by convention; a `0x` prefix is
//! tolerated. Immediates are normalized to their unsigned 32-bit form
//! before encoding.

mod assemble;
mod error;
mod parser;


use pest::iterators::Pair;
use pest::Parser;

use assemble::Assembler;
pub use error::Error;
pub use parser::{AsmParser, Rule};
use seqvm::Machine;

pub type Result<T> = std::result::Result<T, Error>;

/// Assembles `input` into the machine's memory and sets its entry PC.
///
/// The machine's memory is only modified at the addresses the program
/// declares; on error it may have been partially written, but execution
/// has not started.
pub fn assemble_into(input: &str, machine: &mut Machine) -> Result<()> {
    Assembler::new().assemble(parse(input)?, machine)
}

fn parse(input: &str) -> Result<Pair<Rule>> {
    Ok(AsmParser::parse(Rule::program, input)?.next().unwrap())
}
