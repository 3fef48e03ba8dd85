use std::{error::Error as StdError, fmt};

use pest::error::Error as PestError;

use crate::parser::Rule;
use seqvm::Word;

/// Errors raised while assembling a source file.
///
/// Every variant except `Syntax` carries the 1-based source line it was
/// raised on; `Syntax` wraps the pest error, which formats its own span.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    Syntax(Box<PestError<Rule>>),
    BadMnemonic { line: usize, mnemonic: String },
    BadRegister { line: usize, name: String },
    BadLabel { line: usize, label: String },
    BadLiteral { line: usize, literal: String },
    BadSection { line: usize, what: String },
    OutOfMemory { line: usize, address: Word },
}

impl From<PestError<Rule>> for Error {
    fn from(err: PestError<Rule>) -> Error {
        Error::Syntax(Box::new(err))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Syntax(err) => fmt::Display::fmt(err, f),
            Error::BadMnemonic { line, mnemonic } => {
                write!(f, "line {}: bad mnemonic or operands for \"{}\"", line, mnemonic)
            }
            Error::BadRegister { line, name } => {
                write!(f, "line {}: unknown register \"{}\"", line, name)
            }
            Error::BadLabel { line, label } => {
                write!(f, "line {}: unknown label \"{}\"", line, label)
            }
            Error::BadLiteral { line, literal } => {
                write!(f, "line {}: bad hex literal \"{}\"", line, literal)
            }
            Error::BadSection { line, what } => {
                write!(f, "line {}: {} is not allowed in this section", line, what)
            }
            Error::OutOfMemory { line, address } => {
                write!(
                    f,
                    "line {}: instruction at {:#x} does not fit in machine memory",
                    line, address
                )
            }
        }
    }
}

impl StdError for Error {}
