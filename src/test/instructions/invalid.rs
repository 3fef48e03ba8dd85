use super::*;

fn run_raw_opcode(opcode: u8) -> StageError {
    let mut machine = Machine::new(MEM_SIZE);
    machine
        .memory_mut()
        .write(0x40, 6, u64::from(opcode))
        .unwrap();
    machine.set_pc(0x40);
    machine.set_stack_pointer(STACK_BASE);
    machine.run().unwrap_err()
}

#[test]
fn unknown_opcode_faults_at_the_memory_stage() {
    let error = run_raw_opcode(0x05);
    assert_eq!(error.stage, Stage::Memory);
    assert_eq!(error.cause, StageCause::UnknownOpcode { icode: 0, ifun: 5 });
}

#[test]
fn unknown_high_opcode() {
    let error = run_raw_opcode(0x3F);
    assert_eq!(error.cause, StageCause::UnknownOpcode { icode: 7, ifun: 7 });
    assert_eq!(error.icode, 7);
}
