use super::*;

#[test]
fn loads_immediate() {
    let machine = run_program(&[instr_ri!(MOVRI, EAX, 0x2A), instr_p!(HALT)]);
    assert_regs!(machine, EAX == 0x2A);
}

#[test]
fn loads_negative_immediate() {
    let machine = run_program(&[instr_ri!(MOVRI, EBX, -5), instr_p!(HALT)]);
    assert_regs!(machine, EBX == 0xFFFF_FFFBu32);
}

#[test]
fn touches_only_the_destination() {
    let machine = run_program(&[instr_ri!(MOVRI, ECX, 9), instr_p!(HALT)]);
    assert_regs!(machine, ECX == 9);
    assert_untouched(&machine, &[RegisterId::ECX]);
}

#[test]
fn leaves_flags_alone() {
    let machine = run_program(&[instr_ri!(MOVRI, EAX, 0), instr_p!(HALT)]);
    assert_eq!(machine.flags(), Flags::default());
}
