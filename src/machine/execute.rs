//! The execute stage: ALU, effective-address logic and the data-hazard
//! check.

use super::{Machine, StageFlow, State};
use crate::bits::twoc;
use crate::constants;
use crate::error::{StageCause, StageError};
use crate::instructions::Opcode;
use crate::memory::Storage;
use crate::stages::{MemCtl, MemoryBank, Stage};
use crate::Word;

impl Machine {
    pub(crate) fn execute_stage(&mut self) -> Result<StageFlow, StageError> {
        let bank = self.execute;
        if bank.stat != 0 {
            return Err(self.stage_fault(Stage::Execute, bank.icode, bank.stat));
        }

        let icode = bank.icode.unwrap_or(0);
        let ifun = bank.ifun.unwrap_or(0);
        let opcode = Opcode::from_parts(icode, ifun);
        let val_a = bank.val_a.unwrap_or(0);
        let val_b = bank.val_b.unwrap_or(0);

        // A register named as a source may still be sitting in write-back
        // as a destination. Stall until the pending write lands: the walk
        // shrinks to [write-back, memory] and this stage stays armed, so
        // it reruns with the register file up to date.
        let (src_a, src_b) = source_registers(opcode, val_a, val_b);
        self.execute.src_a = src_a;
        self.execute.src_b = src_b;
        if self.active[Stage::WriteBack.index()] {
            if let Some(dst) = self.write_back.dst_e {
                if src_a == Some(dst) || src_b == Some(dst) {
                    self.finish_write_back = true;
                    self.narrow_walk(Stage::Memory);
                    return Ok(StageFlow::Break);
                }
            }
        }

        let mut out = MemoryBank::default();
        match opcode {
            Some(Opcode::MOVRR) => {
                out.val_e = Some(val_a);
                out.val_a = Some(self.registers.read_signed(val_b as usize));
                out.ctl = MemCtl::Forward;
            }
            Some(Opcode::MOVRM) => {
                out.val_e = Some(val_b);
                out.val_a = Some(val_a);
                out.ctl = MemCtl::Load;
            }
            Some(Opcode::MOVMR) => {
                out.val_e = Some(val_a);
                out.val_a = Some(self.registers.read_signed(val_b as usize));
                out.ctl = MemCtl::Store;
            }
            Some(Opcode::MOVRI) => {
                out.val_e = Some(val_a);
                out.val_a = Some(val_b);
                out.ctl = MemCtl::Forward;
            }
            Some(op) if op.is_arithmetic() => {
                self.execute_arithmetic(op, val_a, val_b, &mut out);
            }
            Some(Opcode::PUSH) => {
                let pointer = self.registers.stack_pointer();
                out.val_e = Some(i64::from(pointer));
                out.val_a = Some(self.registers.read_signed(val_a as usize));
                out.ctl = MemCtl::Store;
                self.registers
                    .set_stack_pointer(pointer.wrapping_add(constants::STACK_STEP));
            }
            Some(Opcode::POP) => {
                let pointer = self
                    .registers
                    .stack_pointer()
                    .wrapping_sub(constants::STACK_STEP);
                self.registers.set_stack_pointer(pointer);
                out.val_e = Some(i64::from(pointer));
                out.val_a = Some(val_a);
                out.ctl = MemCtl::Load;
            }
            Some(Opcode::HALT) => {
                // Nothing new enters the pipeline; memory and write-back
                // get a bounded number of ticks to finish what is already
                // in flight.
                self.active[Stage::Fetch.index()] = false;
                self.active[Stage::Decode.index()] = false;
                self.active[Stage::Execute.index()] = false;
                self.execute.clear();
                self.state = State::Halting;
                self.drain = constants::DRAIN_TICKS;
                self.narrow_walk(Stage::Memory);
                return Ok(StageFlow::Break);
            }
            Some(Opcode::PASS) => {}
            _ => {
                out.stat = 1;
                self.pending_cause = Some(StageCause::UnknownOpcode { icode, ifun });
            }
        }

        out.icode = bank.icode;
        out.dst_e = bank.dst_e;
        out.dst_m = bank.dst_m;
        self.memory_bank = out;
        self.active[Stage::Memory.index()] = true;
        self.active[Stage::Execute.index()] = false;
        self.execute.clear();
        Ok(StageFlow::Continue)
    }

    /// Add/sub with any of the four operand patterns. Flags come from the
    /// unwrapped result; the value routed onward wraps to 32 bits.
    fn execute_arithmetic(
        &mut self,
        opcode: Opcode,
        val_a: i64,
        val_b: i64,
        out: &mut MemoryBank,
    ) {
        // Low two opcode bits: rr = 0, mr = 1, rm = 2, ri = 3.
        let pattern = opcode.code() & 0b11;

        let left = match pattern {
            0b01 => match self.memory.read_word(val_a as Word) {
                Ok(word) => twoc(i64::from(word)),
                Err(error) => return self.arithmetic_fault(out, error),
            },
            _ => self.registers.read_signed(val_a as usize),
        };
        let right = match pattern {
            0b00 | 0b01 => self.registers.read_signed(val_b as usize),
            0b10 => match self.memory.read_word(val_b as Word) {
                Ok(word) => twoc(i64::from(word)),
                Err(error) => return self.arithmetic_fault(out, error),
            },
            _ => val_b,
        };

        // Opcode bit 2 selects subtraction.
        let result = if opcode.code() & 0b100 != 0 {
            left - right
        } else {
            left + right
        };
        self.flags.update_arithmetic(result);

        out.val_e = Some(val_a);
        out.val_a = Some(i64::from(result as i32));
        out.ctl = if pattern == 0b01 {
            MemCtl::Store
        } else {
            MemCtl::Forward
        };
    }

    fn arithmetic_fault(&mut self, out: &mut MemoryBank, error: crate::memory::BadAddress) {
        out.stat = 1;
        self.pending_cause = Some(StageCause::BadAddress(error));
    }
}

/// The registers an instruction reads, per its operand pattern. Only these
/// participate in the hazard check; immediates and memory operands never
/// stall.
fn source_registers(
    opcode: Option<Opcode>,
    val_a: i64,
    val_b: i64,
) -> (Option<u8>, Option<u8>) {
    match opcode {
        Some(Opcode::MOVRR) | Some(Opcode::MOVMR) => (None, Some(val_b as u8)),
        Some(Opcode::ADDRR) | Some(Opcode::SUBRR) => {
            (Some(val_a as u8), Some(val_b as u8))
        }
        Some(Opcode::ADDMR) | Some(Opcode::SUBMR) => (None, Some(val_b as u8)),
        Some(Opcode::ADDRI)
        | Some(Opcode::SUBRI)
        | Some(Opcode::ADDRM)
        | Some(Opcode::SUBRM) => (Some(val_a as u8), None),
        Some(Opcode::PUSH) => (Some(val_a as u8), None),
        _ => (None, None),
    }
}
