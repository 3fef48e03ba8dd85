//! The fetch unit: instruction decoding and control-flow prediction.
//!
//! Fetch redirects the program counter without involving the rest of the
//! pipeline whenever it can: `call`, `ret` and `jp` resolve immediately,
//! and conditional jumps resolve against the current flags once no
//! arithmetic instruction is left in the execute bank. Everything else is
//! decoded into the decode bank and flows down the pipeline.

use super::{Machine, StageFlow};
use crate::bits::twoc;
use crate::constants;
use crate::error::{StageCause, StageError};
use crate::flags::Flags;
use crate::instructions::{decode, encoded_length, Opcode};
use crate::memory::{BadAddress, Storage};
use crate::stages::{DecodeBank, Stage};
use crate::Word;

/// One instruction as fetch sees it, after the immediate has been
/// normalized and substituted for the operand it stands in for.
struct Fetched {
    opcode: u8,
    ra: i64,
    rb: i64,
    new_pc: Word,
}

impl Machine {
    fn fetch_at(&self, address: Word) -> Result<Fetched, BadAddress> {
        let first = self.memory.read(address, constants::OP_ONLY_BYTES)? as u8;
        let length = encoded_length(first);
        let raw = self.memory.read(address, length)?;
        let parts = decode(raw);

        let immediate = twoc(i64::from(parts.imm));
        let mut ra = i64::from(parts.ra);
        let mut rb = i64::from(parts.rb);
        if let Some(opcode) = Opcode::from_code(parts.opcode) {
            if opcode.immediate_is_left() {
                ra = immediate;
            } else if opcode.immediate_is_right() {
                rb = immediate;
            }
        }

        Ok(Fetched {
            opcode: parts.opcode,
            ra,
            rb,
            new_pc: address.wrapping_add(length),
        })
    }

    pub(crate) fn fetch_stage(&mut self) -> Result<StageFlow, StageError> {
        let fetched = self
            .fetch_at(self.pc)
            .map_err(|error| fetch_error(0, error))?;
        let opcode = Opcode::from_code(fetched.opcode);

        match opcode {
            Some(Opcode::CALL) => {
                // push/pop also move esp; while one occupies execute the
                // call is not predicted and fetch retries next tick.
                if self.stack_op_in_execute() {
                    return Ok(StageFlow::Break);
                }
                let pointer = self.registers.stack_pointer();
                self.memory
                    .write_word(pointer, fetched.new_pc)
                    .map_err(|error| fetch_error(fetched.opcode, error))?;
                self.registers
                    .set_stack_pointer(pointer.wrapping_add(constants::STACK_STEP));
                self.pc = fetched.ra as Word;
                Ok(StageFlow::Break)
            }
            Some(Opcode::RET) => {
                let pointer = self
                    .registers
                    .stack_pointer()
                    .wrapping_sub(constants::STACK_STEP);
                let target = self
                    .memory
                    .read_word(pointer)
                    .map_err(|error| fetch_error(fetched.opcode, error))?;
                self.registers.set_stack_pointer(pointer);
                self.pc = target;
                Ok(StageFlow::Break)
            }
            Some(Opcode::JP) => {
                self.pc = fetched.ra as Word;
                Ok(StageFlow::Break)
            }
            Some(op) if op.is_conditional_jump() => {
                if !self.update_flag && self.arithmetic_in_execute() {
                    // Flags are not observable until the instruction in
                    // execute has run; re-fetch next tick.
                    self.update_flag = true;
                    return Ok(StageFlow::Break);
                }
                self.update_flag = false;
                self.pc = if branch_taken(op, self.flags) {
                    fetched.ra as Word
                } else {
                    fetched.new_pc
                };
                Ok(StageFlow::Break)
            }
            _ => {
                self.decode = DecodeBank {
                    stat: 0,
                    icode: Some(fetched.opcode >> constants::IFUN_WIDTH),
                    ifun: Some(fetched.opcode & constants::IFUN_MASK),
                    ra: Some(fetched.ra),
                    rb: Some(fetched.rb),
                };
                self.pc = fetched.new_pc;
                self.active[Stage::Decode.index()] = true;
                self.active[Stage::Fetch.index()] = false;
                Ok(StageFlow::Continue)
            }
        }
    }

    fn stack_op_in_execute(&self) -> bool {
        self.active[Stage::Execute.index()]
            && self
                .execute
                .opcode()
                .map_or(false, Opcode::is_stack)
    }

    fn arithmetic_in_execute(&self) -> bool {
        self.active[Stage::Execute.index()]
            && self
                .execute
                .opcode()
                .map_or(false, Opcode::is_arithmetic)
    }
}

fn fetch_error(opcode: u8, error: BadAddress) -> StageError {
    StageError {
        stage: Stage::Fetch,
        icode: opcode >> constants::IFUN_WIDTH,
        cause: StageCause::BadAddress(error),
    }
}

/// The branch predicate table; only ZF and SF are consulted.
fn branch_taken(opcode: Opcode, flags: Flags) -> bool {
    let zf = flags.contains(Flags::ZF);
    let sf = flags.contains(Flags::SF);
    match opcode {
        Opcode::JNZ | Opcode::JNE => !zf,
        Opcode::JE => zf,
        Opcode::JG => !zf && !sf,
        Opcode::JL => !zf && sf,
        Opcode::JGE => !sf || zf,
        Opcode::JLE => sf || zf,
        _ => false,
    }
}
