use super::*;

#[test]
fn restores_the_pushed_value() {
    let machine = run_program(&[
        instr_ri!(MOVRI, EAX, 0x63),
        instr_s!(PUSH, EAX),
        instr_ri!(MOVRI, EAX, 0),
        instr_s!(POP, EBX),
        instr_p!(HALT),
    ]);
    assert_regs!(machine, EBX == 0x63, ESP == STACK_BASE);
    // The stack slot itself is left behind.
    assert_eq!(machine.memory().read_word(STACK_BASE), Ok(0x63));
}

#[test]
fn pairs_unwind_in_reverse_order() {
    let machine = run_program(&[
        instr_ri!(MOVRI, EAX, 1),
        instr_ri!(MOVRI, EBX, 2),
        instr_s!(PUSH, EAX),
        instr_s!(PUSH, EBX),
        instr_s!(POP, ECX),
        instr_s!(POP, EDX),
        instr_p!(HALT),
    ]);
    assert_regs!(machine, ECX == 2, EDX == 1, ESP == STACK_BASE);
}
