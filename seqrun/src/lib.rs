//! Front end for the seqvm machine: assemble a source file, run it, and
//! optionally watch the pipeline work.


use std::io::Write;
use std::time::Duration;
use std::{error, fmt, io, thread};

use seqvm::instructions::REGISTER_IDS;
use seqvm::{Machine, MachineView, Observer, Stage, StageError, Word};

#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    Assemble(seqasm::Error),
    Exec(StageError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => fmt::Display::fmt(err, f),
            Error::Assemble(err) => fmt::Display::fmt(err, f),
            Error::Exec(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Assemble(err) => Some(err),
            Error::Exec(err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<seqasm::Error> for Error {
    fn from(err: seqasm::Error) -> Error {
        Error::Assemble(err)
    }
}

/// Process exit code for a finished run: 0 on a normal halt, 1 when the
/// program never assembled, 2 when a stage faulted at runtime.
pub fn exit_code(result: &Result<Machine, Error>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(Error::Exec(_)) => 2,
        Err(_) => 1,
    }
}

/// Assembles `input` into a fresh machine, points `esp` at
/// `stack_pointer`, and runs to completion.
pub fn run_source(
    input: &str,
    memory_size: u32,
    stack_pointer: Word,
    observer: &mut dyn Observer,
) -> Result<Machine, Error> {
    let mut machine = Machine::new(memory_size);
    seqasm::assemble_into(input, &mut machine)?;
    machine.set_stack_pointer(stack_pointer);
    machine.run_with(observer).map_err(Error::Exec)?;
    Ok(machine)
}

/// Writes the register file and the whole memory as hex rows, sixteen
/// bytes per row.
pub fn dump<W: Write>(machine: &Machine, writer: &mut W) -> io::Result<()> {
    for id in REGISTER_IDS.iter() {
        write!(writer, "{:<6}", format!("{}", id).to_lowercase())?;
        for byte in machine.registers().get(*id).to_le_bytes().iter() {
            write!(writer, "\t{:02x}", byte)?;
        }
        writeln!(writer)?;
    }
    for (row, bytes) in machine.memory().data().chunks(16).enumerate() {
        write!(writer, "{:#06x}", row * 16)?;
        for byte in bytes {
            write!(writer, "\t{:02x}", byte)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Observer that prints the letters of the stages completed each tick
/// (`F`, `D`, `E`, `M`, `W`) together with the program counter, and
/// optionally sleeps between ticks so the pipeline can be watched.
pub struct StageTrace {
    letters: String,
    delay: Duration,
}

impl StageTrace {
    pub fn new(delay_ms: u64) -> StageTrace {
        StageTrace {
            letters: String::new(),
            delay: Duration::from_millis(delay_ms),
        }
    }
}

impl Observer for StageTrace {
    fn stage_retired(&mut self, stage: Stage) {
        self.letters.push(stage.letter());
    }

    fn tick_completed(&mut self, view: &MachineView<'_>) {
        println!("{:<5}\tPC={:#06x}", self.letters, view.pc);
        self.letters.clear();
        if self.delay > Duration::from_millis(0) {
            thread::sleep(self.delay);
        }
    }
}
