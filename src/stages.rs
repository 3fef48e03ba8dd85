//! Stage registers of the pipeline.
//!
//! Each downstream stage owns one bank; the banks form a one-deep queue so
//! only adjacent stages ever communicate. Fields are `Option`al because a
//! bank only carries what its producer set this tick; a `None` read means
//! the producer had nothing to say and decodes as zero.

use num_derive::{FromPrimitive, ToPrimitive};

use crate::instructions::Opcode;

/// The five pipeline stages, in program order.
#[derive(Clone, Copy, PartialEq, Eq, Debug, FromPrimitive, ToPrimitive)]
pub enum Stage {
    Fetch,
    Decode,
    Execute,
    Memory,
    WriteBack,
}

impl Stage {
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Single-letter tag used by stage traces.
    pub fn letter(self) -> char {
        match self {
            Stage::Fetch => 'F',
            Stage::Decode => 'D',
            Stage::Execute => 'E',
            Stage::Memory => 'M',
            Stage::WriteBack => 'W',
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// What the memory stage does with its bank this tick.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MemCtl {
    /// No memory action.
    None,
    /// `mem32[valE] = valA`.
    Store,
    /// Hand `(valE, valA)` to write-back as `(dstE, valM)`.
    Forward,
    /// `WB.valM = mem32[valE]`, destination register index in `valA`.
    Load,
}

impl Default for MemCtl {
    fn default() -> MemCtl {
        MemCtl::None
    }
}

/// Fetch → decode bank. `ra`/`rb` hold register indices, or the normalized
/// immediate when fetch substituted it for one of the operands.
#[derive(Clone, Copy, Default, Debug)]
pub struct DecodeBank {
    pub stat: u8,
    pub icode: Option<u8>,
    pub ifun: Option<u8>,
    pub ra: Option<i64>,
    pub rb: Option<i64>,
}

impl DecodeBank {
    pub fn clear(&mut self) {
        *self = Default::default();
    }
}

/// Decode → execute bank. `val_a`/`val_b` are still register indices or
/// immediates; the executor resolves which by the opcode. `src_a`/`src_b`
/// record the registers the instruction actually reads, for the hazard
/// check.
#[derive(Clone, Copy, Default, Debug)]
pub struct ExecuteBank {
    pub stat: u8,
    pub icode: Option<u8>,
    pub ifun: Option<u8>,
    pub val_a: Option<i64>,
    pub val_b: Option<i64>,
    pub dst_e: Option<u8>,
    pub dst_m: Option<u8>,
    pub src_a: Option<u8>,
    pub src_b: Option<u8>,
}

impl ExecuteBank {
    pub fn clear(&mut self) {
        *self = Default::default();
    }

    /// The full opcode carried by this bank, when it is a known one.
    pub fn opcode(&self) -> Option<Opcode> {
        Opcode::from_parts(self.icode?, self.ifun?)
    }
}

/// Execute → memory bank. `val_e` is the ALU result or effective address,
/// `val_a` the store value, forwarded value or destination register index
/// depending on `ctl`.
#[derive(Clone, Copy, Default, Debug)]
pub struct MemoryBank {
    pub stat: u8,
    pub icode: Option<u8>,
    pub ctl: MemCtl,
    pub val_e: Option<i64>,
    pub val_a: Option<i64>,
    pub dst_e: Option<u8>,
    pub dst_m: Option<u8>,
}

impl MemoryBank {
    pub fn clear(&mut self) {
        *self = Default::default();
    }
}

/// Memory → write-back bank. When `dst_e` is set, write-back stores
/// `val_m` into that register.
#[derive(Clone, Copy, Default, Debug)]
pub struct WriteBackBank {
    pub stat: u8,
    pub icode: Option<u8>,
    pub val_e: Option<i64>,
    pub val_m: Option<i64>,
    pub dst_e: Option<u8>,
    pub dst_m: Option<u8>,
}

impl WriteBackBank {
    pub fn clear(&mut self) {
        *self = Default::default();
    }
}
