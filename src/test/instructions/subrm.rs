use super::*;

#[test]
fn subtracts_memory_word_from_register() {
    let mut machine = machine_with(&[
        instr_ri!(MOVRI, EAX, 50),
        instr_ri!(SUBRM, EAX, 0x200),
        instr_p!(HALT),
    ]);
    machine.memory_mut().write_word(0x200, 8).unwrap();
    machine.run().unwrap();
    assert_regs!(machine, EAX == 42);
}
