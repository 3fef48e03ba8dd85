use super::*;

#[test]
fn call_and_ret_balance() {
    let mut machine = machine_with(&[
        instr_ri!(MOVRI, EAX, 1),
        instr_j!(CALL, 0x80),
        instr_ri!(ADDRI, EAX, 5),
        instr_p!(HALT),
    ]);
    load_at(
        &mut machine,
        0x80,
        &[instr_ri!(MOVRI, EBX, 0x2A), instr_p!(RET)],
    );
    machine.run().unwrap();

    // PC came back to the instruction after the call and esp to its
    // pre-call value, with the return address still on the stack.
    assert_regs!(machine, EAX == 6, EBX == 0x2A, ESP == STACK_BASE);
    assert_eq!(machine.memory().read_word(STACK_BASE), Ok(0x4C));
}

#[test]
fn calls_nest() {
    let mut machine = machine_with(&[
        instr_j!(CALL, 0x80),
        instr_ri!(ADDRI, EAX, 1),
        instr_p!(HALT),
    ]);
    load_at(
        &mut machine,
        0x80,
        &[
            instr_ri!(MOVRI, EAX, 0x10),
            instr_j!(CALL, 0xA0),
            instr_ri!(ADDRI, EAX, 2),
            instr_p!(RET),
        ],
    );
    load_at(
        &mut machine,
        0xA0,
        &[instr_ri!(ADDRI, EAX, 4), instr_p!(RET)],
    );
    machine.run().unwrap();
    assert_regs!(machine, EAX == 0x17, ESP == STACK_BASE);
}

#[test]
fn push_stack_push_then_call_stay_ordered() {
    // The call prediction must wait for the push to leave execute, or it
    // would push the return address at a stale esp.
    let mut machine = machine_with(&[
        instr_ri!(MOVRI, EAX, 5),
        instr_s!(PUSH, EAX),
        instr_j!(CALL, 0x80),
        instr_p!(HALT),
    ]);
    load_at(
        &mut machine,
        0x80,
        &[instr_ri!(MOVRI, EBX, 9), instr_p!(RET)],
    );
    machine.run().unwrap();

    assert_eq!(machine.memory().read_word(STACK_BASE), Ok(5));
    assert_eq!(machine.memory().read_word(STACK_BASE + 4), Ok(0x52));
    assert_regs!(machine, EBX == 9, ESP == STACK_BASE + 4);
}
