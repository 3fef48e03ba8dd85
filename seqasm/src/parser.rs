use pest_derive::Parser;

/// Pest parser for the assembly source format.
///
/// The grammar is deliberately line-oriented and permissive: it only
/// recognizes the three line shapes (function header, dot-directive,
/// statement) and tokenizes them. Which section a line is legal in, and
/// what its tokens mean, is decided by the assembler so that misuse
/// surfaces as the assembler's own error kinds instead of syntax errors.
#[derive(Parser)]
#[grammar = "asm.pest"]
pub struct AsmParser;
