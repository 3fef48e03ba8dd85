//! Pipelined interpreter for a small x86-like 32-bit instruction set.
//!
//! The machine owns a flat byte-addressable memory, sixteen 32-bit
//! registers, a program counter and a flags word. Programs are executed by
//! walking a five-stage pipeline (fetch, decode, execute, memory,
//! write-back) one tick at a time, with stalls for read-after-write data
//! hazards and for conditional jumps whose flags are still in flight.
//!
//! The instruction encoding and the in-memory image format consumed here
//! are produced by the `seqasm` crate.

pub mod bits;
pub mod constants;
pub mod error;
pub mod flags;
pub mod instructions;
pub mod machine;
pub mod memory;
pub mod registers;
pub mod stages;

pub use crate::error::{StageCause, StageError};
pub use crate::flags::Flags;
pub use crate::instructions::*;
pub use crate::machine::{Machine, MachineView, NullObserver, Observer, State};
pub use crate::memory::{BadAddress, Memory, Storage};
pub use crate::registers::RegisterFile;
pub use crate::stages::{
    DecodeBank, ExecuteBank, MemCtl, MemoryBank, Stage, WriteBackBank,
};
pub use util::Endian;

/// Machine word: registers, memory cells and addresses are all 32 bits.
pub type Word = u32;
