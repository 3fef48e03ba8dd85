use super::*;

#[test]
fn loads_word_from_memory() {
    let mut machine = machine_with(&[instr_ri!(MOVRM, EBX, 0x100), instr_p!(HALT)]);
    machine.memory_mut().write_word(0x100, 7).unwrap();
    machine.run().unwrap();
    assert_regs!(machine, EBX == 7);
}

#[test]
fn load_outside_memory_faults() {
    let (machine, error) = run_fault(&[instr_ri!(MOVRM, EBX, 0xFFF0), instr_p!(HALT)]);
    // The failed load poisons the write-back bank, which is the stage
    // that observes the nonzero status.
    assert_eq!(error.stage, Stage::WriteBack);
    match error.cause {
        StageCause::BadAddress(_) => {}
        other => panic!("unexpected cause: {:?}", other),
    }
    assert_eq!(machine.state(), State::Halted);
    assert_eq!(machine.fault(), Some(&error));
    assert_regs!(machine, EBX == 0);
}
