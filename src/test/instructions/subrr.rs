use super::*;

#[test]
fn subtracts_registers() {
    let machine = run_program(&[
        instr_ri!(MOVRI, EAX, 0x10),
        instr_ri!(MOVRI, EBX, 0x6),
        instr_rr!(SUBRR, EAX, EBX),
        instr_p!(HALT),
    ]);
    assert_regs!(machine, EAX == 0xA, EBX == 0x6);
}

#[test]
fn equal_operands_set_zf() {
    let machine = run_program(&[
        instr_ri!(MOVRI, EAX, 9),
        instr_ri!(MOVRI, EBX, 9),
        instr_rr!(SUBRR, EAX, EBX),
        instr_p!(HALT),
    ]);
    assert_regs!(machine, EAX == 0);
    assert!(machine.flags().contains(Flags::ZF));
    assert!(!machine.flags().contains(Flags::SF));
}
