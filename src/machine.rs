mod execute;
mod fetch;
mod pipeline;

use crate::error::{StageCause, StageError};
use crate::flags::Flags;
use crate::memory::Memory;
use crate::registers::RegisterFile;
use crate::stages::{DecodeBank, ExecuteBank, MemoryBank, Stage, WriteBackBank};
use crate::{constants, Word};

/// Lifecycle of a machine. `Halting` is entered when `halt` reaches the
/// execute stage and persists while the downstream stages drain; there are
/// no other terminal transitions.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum State {
    Running,
    Halting,
    Halted,
}

/// Read-only snapshot handed to observers between ticks.
pub struct MachineView<'a> {
    pub pc: Word,
    pub state: State,
    pub flags: Flags,
    pub registers: &'a RegisterFile,
    pub memory: &'a Memory,
}

/// Hooks for external tooling. Observers are read-only: they see which
/// stages retired during a tick (in program order) and a view of the
/// machine after it.
pub trait Observer {
    fn stage_retired(&mut self, _stage: Stage) {}
    fn tick_completed(&mut self, _view: &MachineView<'_>) {}
}

/// Observer that ignores everything.
pub struct NullObserver;

impl Observer for NullObserver {}

/// Whether the per-tick stage walk keeps going after a stage ran.
#[derive(PartialEq, Eq)]
pub(crate) enum StageFlow {
    Continue,
    Break,
}

/// The whole machine: memory, register file, flags, program counter and
/// the four stage banks, plus the latches the pipeline controller uses to
/// model stalls.
pub struct Machine {
    memory: Memory,
    registers: RegisterFile,
    flags: Flags,
    pc: Word,
    state: State,

    decode: DecodeBank,
    execute: ExecuteBank,
    memory_bank: MemoryBank,
    write_back: WriteBackBank,
    active: [bool; constants::STAGE_COUNT],

    /// Lowest stage the next tick will walk down to.
    walk_floor: Stage,
    /// Set when execute stalls on a pending write-back; cleared by the
    /// write-back stage, which then restores the full walk.
    finish_write_back: bool,
    /// Set when fetch defers a conditional jump to let flags settle.
    update_flag: bool,
    /// Remaining drain ticks once `Halting`.
    drain: u32,
    /// Structured cause recorded by the stage that originated a fault, to
    /// be attached to the `StageError` of whichever stage observes it.
    pending_cause: Option<StageCause>,
    fault: Option<StageError>,
}

impl Machine {
    /// Constructs a machine with a zeroed memory of `memory_size` bytes.
    pub fn new(memory_size: u32) -> Machine {
        Machine {
            memory: Memory::new(memory_size),
            registers: RegisterFile::default(),
            flags: Flags::default(),
            pc: 0,
            state: State::Running,
            decode: DecodeBank::default(),
            execute: ExecuteBank::default(),
            memory_bank: MemoryBank::default(),
            write_back: WriteBackBank::default(),
            active: [false; constants::STAGE_COUNT],
            walk_floor: Stage::Fetch,
            finish_write_back: false,
            update_flag: false,
            drain: 0,
            pending_cause: None,
            fault: None,
        }
    }

    pub fn pc(&self) -> Word {
        self.pc
    }

    /// Sets the entry point. Called by the assembler with the address of
    /// `main` before execution starts.
    pub fn set_pc(&mut self, pc: Word) {
        self.pc = pc;
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    pub fn set_stack_pointer(&mut self, value: Word) {
        self.registers.set_stack_pointer(value);
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Mutable memory access for the load phase; the assembler writes the
    /// program image through this.
    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    /// The error that halted the machine, if any.
    pub fn fault(&self) -> Option<&StageError> {
        self.fault.as_ref()
    }

    pub fn observe(&self) -> MachineView<'_> {
        MachineView {
            pc: self.pc,
            state: self.state,
            flags: self.flags,
            registers: &self.registers,
            memory: &self.memory,
        }
    }

    /// Runs until the machine halts or a stage faults.
    pub fn run(&mut self) -> Result<(), StageError> {
        self.run_with(&mut NullObserver)
    }

    pub fn run_with(&mut self, observer: &mut dyn Observer) -> Result<(), StageError> {
        while self.state != State::Halted {
            self.step_with(observer)?;
        }
        Ok(())
    }

    /// Advances the machine by one tick.
    pub fn step(&mut self) -> Result<State, StageError> {
        self.step_with(&mut NullObserver)
    }

    pub fn step_with(
        &mut self,
        observer: &mut dyn Observer,
    ) -> Result<State, StageError> {
        if self.state == State::Halted {
            return Ok(State::Halted);
        }
        match self.tick(observer) {
            Ok(()) => Ok(self.state),
            Err(error) => {
                self.state = State::Halted;
                self.fault = Some(error);
                Err(error)
            }
        }
    }
}
