//! The per-tick stage walk and the decode, memory and write-back stages.
//!
//! Stages run from write-back down to fetch so that a stage's consumer is
//! always drained before the stage refills it. Stalls narrow the walk: a
//! data hazard keeps the next tick to `[write-back, memory]` until the
//! pending register lands, and `halt` keeps it there while the tail of the
//! pipeline drains.

use num_traits::FromPrimitive;

use super::{Machine, Observer, StageFlow, State};
use crate::constants;
use crate::error::{StageCause, StageError};
use crate::memory::Storage;
use crate::stages::{ExecuteBank, MemCtl, Stage};
use crate::Word;

impl Machine {
    pub(crate) fn tick(&mut self, observer: &mut dyn Observer) -> Result<(), StageError> {
        // Fetch re-arms every tick while the machine is running; the other
        // stages are armed by their producers.
        self.active[Stage::Fetch.index()] = self.state == State::Running;

        // Snapshot the walk range: stages may re-widen it mid-tick and the
        // change must only apply from the next tick on.
        let floor = self.walk_floor.index();
        let mut retired = [None; constants::STAGE_COUNT];
        let mut retired_len = 0;

        for index in (floor..=Stage::WriteBack.index()).rev() {
            if !self.active[index] {
                continue;
            }
            let stage = Stage::from_usize(index).unwrap();
            let flow = match stage {
                Stage::WriteBack => self.write_back_stage()?,
                Stage::Memory => self.memory_stage()?,
                Stage::Execute => self.execute_stage()?,
                Stage::Decode => self.decode_stage(),
                Stage::Fetch => self.fetch_stage()?,
            };
            if !(stage == Stage::Fetch && flow == StageFlow::Break) {
                retired[retired_len] = Some(stage);
                retired_len += 1;
            }
            if flow == StageFlow::Break {
                break;
            }
        }

        if self.state == State::Halting {
            self.drain = self.drain.saturating_sub(1);
            let pending = self.active[Stage::Memory.index()]
                || self.active[Stage::WriteBack.index()];
            if self.drain == 0 || !pending {
                self.state = State::Halted;
            }
        }

        for stage in retired.iter().take(retired_len).rev() {
            if let Some(stage) = stage {
                observer.stage_retired(*stage);
            }
        }
        observer.tick_completed(&self.observe());

        Ok(())
    }

    /// Decode is a pass-through: register indices and substituted
    /// immediates move into the execute bank untouched; which they are is
    /// resolved by the executor.
    fn decode_stage(&mut self) -> StageFlow {
        let bank = self.decode;
        self.execute = ExecuteBank {
            stat: bank.stat,
            icode: bank.icode,
            ifun: bank.ifun,
            val_a: bank.ra,
            val_b: bank.rb,
            ..ExecuteBank::default()
        };
        self.active[Stage::Execute.index()] = true;
        self.active[Stage::Decode.index()] = false;
        self.decode.clear();
        StageFlow::Continue
    }

    fn memory_stage(&mut self) -> Result<StageFlow, StageError> {
        let bank = self.memory_bank;
        if bank.stat != 0 {
            return Err(self.stage_fault(Stage::Memory, bank.icode, bank.stat));
        }

        match bank.ctl {
            MemCtl::None => {}
            MemCtl::Store => {
                let address = bank.val_e.unwrap_or(0) as Word;
                let value = bank.val_a.unwrap_or(0) as Word;
                if let Err(error) = self.memory.write_word(address, value) {
                    self.write_back.stat = 1;
                    self.pending_cause = Some(StageCause::BadAddress(error));
                    self.active[Stage::WriteBack.index()] = true;
                }
            }
            MemCtl::Forward => {
                self.write_back.dst_e = bank.val_e.map(|v| v as u8);
                self.write_back.val_m = bank.val_a;
                self.active[Stage::WriteBack.index()] = true;
            }
            MemCtl::Load => {
                match self.memory.read_word(bank.val_e.unwrap_or(0) as Word) {
                    Ok(word) => {
                        self.write_back.dst_e = bank.val_a.map(|v| v as u8);
                        self.write_back.val_m =
                            Some(crate::bits::twoc(i64::from(word)));
                    }
                    Err(error) => {
                        self.write_back.stat = 1;
                        self.pending_cause = Some(StageCause::BadAddress(error));
                    }
                }
                self.active[Stage::WriteBack.index()] = true;
            }
        }

        self.write_back.icode = bank.icode;
        self.write_back.val_e = bank.val_e;
        self.write_back.dst_m = bank.dst_m;
        self.active[Stage::Memory.index()] = false;
        self.memory_bank.clear();
        Ok(StageFlow::Continue)
    }

    fn write_back_stage(&mut self) -> Result<StageFlow, StageError> {
        let bank = self.write_back;
        if bank.stat != 0 {
            return Err(self.stage_fault(Stage::WriteBack, bank.icode, bank.stat));
        }

        if let (Some(dst), Some(value)) = (bank.dst_e, bank.val_m) {
            self.registers.write(dst as usize, value as Word);
        }
        self.active[Stage::WriteBack.index()] = false;
        self.write_back.clear();

        if self.finish_write_back {
            // The register the stalled instruction was waiting for has
            // landed; widen the walk again so execute resumes next tick.
            self.finish_write_back = false;
            self.restore_walk();
        }
        Ok(StageFlow::Continue)
    }

    pub(crate) fn narrow_walk(&mut self, floor: Stage) {
        self.walk_floor = floor;
    }

    pub(crate) fn restore_walk(&mut self) {
        self.walk_floor = Stage::Fetch;
    }

    pub(crate) fn stage_fault(
        &mut self,
        stage: Stage,
        icode: Option<u8>,
        stat: u8,
    ) -> StageError {
        let cause = self
            .pending_cause
            .take()
            .unwrap_or(StageCause::Stat(stat));
        StageError {
            stage,
            icode: icode.unwrap_or(0),
            cause,
        }
    }
}
