use super::*;

#[test]
fn jumps_through_the_stack() {
    // Slot 3 holds the halt; its address is prepared on the stack as if a
    // call had pushed it.
    let mut machine = machine_with(&[
        instr_p!(RET),
        instr_ri!(MOVRI, EAX, 1),
        instr_ri!(MOVRI, EBX, 1),
        instr_p!(HALT),
    ]);
    machine
        .memory_mut()
        .write_word(STACK_BASE - 4, 0x52)
        .unwrap();
    machine.run().unwrap();

    assert_regs!(machine, EAX == 0, EBX == 0, ESP == STACK_BASE - 4);
}

#[test]
fn ret_with_unmapped_stack_faults() {
    let mut machine = machine_with(&[instr_p!(RET), instr_p!(HALT)]);
    machine.set_stack_pointer(2);
    let error = machine.run().unwrap_err();
    assert_eq!(error.stage, Stage::Fetch);
    match error.cause {
        StageCause::BadAddress(_) => {}
        other => panic!("unexpected cause: {:?}", other),
    }
}
