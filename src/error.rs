use std::{error::Error, fmt};

use crate::memory::BadAddress;
use crate::stages::Stage;

/// Why a stage reported a nonzero status.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StageCause {
    /// A memory access left `[0, M)`.
    BadAddress(BadAddress),
    /// The executor received an icode/ifun pair it does not implement.
    UnknownOpcode { icode: u8, ifun: u8 },
    /// A raw nonzero status with no recorded origin.
    Stat(u8),
}

impl fmt::Display for StageCause {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StageCause::BadAddress(e) => fmt::Display::fmt(e, f),
            StageCause::UnknownOpcode { icode, ifun } => {
                write!(f, "unknown opcode (icode {:#x}, ifun {:#x})", icode, ifun)
            }
            StageCause::Stat(stat) => write!(f, "stat = {:#x}", stat),
        }
    }
}

/// A pipeline stage observed a nonzero status and aborted the run.
///
/// The machine does not recover; it lands in `Halted` with this error
/// retained and all state still inspectable.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct StageError {
    pub stage: Stage,
    pub icode: u8,
    pub cause: StageCause,
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} stage aborted (icode {:#x}): {}",
            self.stage, self.icode, self.cause
        )
    }
}

impl Error for StageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            StageCause::BadAddress(e) => Some(e),
            _ => None,
        }
    }
}
