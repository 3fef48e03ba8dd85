use super::*;

#[test]
fn subtracts_register_from_memory_word() {
    let mut machine = machine_with(&[
        instr_ri!(MOVRI, EBX, 8),
        instr_mr!(SUBMR, 0x200, EBX),
        instr_p!(HALT),
    ]);
    machine.memory_mut().write_word(0x200, 50).unwrap();
    machine.run().unwrap();
    assert_eq!(machine.memory().read_word(0x200), Ok(42));
}

#[test]
fn negative_difference_is_stored_wrapped() {
    let mut machine = machine_with(&[
        instr_ri!(MOVRI, EBX, 5),
        instr_mr!(SUBMR, 0x200, EBX),
        instr_p!(HALT),
    ]);
    machine.memory_mut().write_word(0x200, 3).unwrap();
    machine.run().unwrap();
    assert_eq!(machine.memory().read_word(0x200), Ok(0xFFFF_FFFE));
    assert!(machine.flags().contains(Flags::SF));
}
