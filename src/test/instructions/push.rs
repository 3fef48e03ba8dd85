use super::*;

#[test]
fn stores_at_esp_then_bumps_it() {
    let machine = run_program(&[
        instr_ri!(MOVRI, EAX, 0x2A),
        instr_s!(PUSH, EAX),
        instr_p!(HALT),
    ]);
    assert_eq!(machine.memory().read_word(STACK_BASE), Ok(0x2A));
    assert_regs!(machine, ESP == STACK_BASE + 4);
}

#[test]
fn consecutive_pushes_grow_upward() {
    let machine = run_program(&[
        instr_ri!(MOVRI, EAX, 1),
        instr_ri!(MOVRI, EBX, 2),
        instr_s!(PUSH, EAX),
        instr_s!(PUSH, EBX),
        instr_p!(HALT),
    ]);
    assert_eq!(machine.memory().read_word(STACK_BASE), Ok(1));
    assert_eq!(machine.memory().read_word(STACK_BASE + 4), Ok(2));
    assert_regs!(machine, ESP == STACK_BASE + 8);
}
