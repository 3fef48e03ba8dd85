use super::*;

#[test]
fn adds_register_into_memory_word() {
    let mut machine = machine_with(&[
        instr_ri!(MOVRI, EBX, 2),
        instr_mr!(ADDMR, 0x200, EBX),
        instr_p!(HALT),
    ]);
    machine.memory_mut().write_word(0x200, 40).unwrap();
    machine.run().unwrap();
    assert_eq!(machine.memory().read_word(0x200), Ok(42));
    assert_regs!(machine, EBX == 2);
}

#[test]
fn updates_flags_from_the_sum() {
    let mut machine = machine_with(&[
        instr_ri!(MOVRI, EBX, 5),
        instr_mr!(ADDMR, 0x200, EBX),
        instr_p!(HALT),
    ]);
    machine.memory_mut().write_word(0x200, (-5i32) as Word).unwrap();
    machine.run().unwrap();
    assert_eq!(machine.memory().read_word(0x200), Ok(0));
    assert!(machine.flags().contains(Flags::ZF));
}
