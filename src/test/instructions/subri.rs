use super::*;

#[test]
fn subtracting_itself_zeroes() {
    let machine = run_program(&[
        instr_ri!(MOVRI, EAX, 5),
        instr_ri!(SUBRI, EAX, 5),
        instr_p!(HALT),
    ]);
    assert_regs!(machine, EAX == 0);
    assert!(machine.flags().contains(Flags::ZF));
    assert!(!machine.flags().contains(Flags::SF));
}

#[test]
fn wraps_below_zero() {
    let machine = run_program(&[
        instr_ri!(MOVRI, EAX, 1),
        instr_ri!(SUBRI, EAX, 2),
        instr_p!(HALT),
    ]);
    assert_regs!(machine, EAX == 0xFFFF_FFFFu32);
    assert!(!machine.flags().contains(Flags::ZF));
    assert!(machine.flags().contains(Flags::SF));
}

#[test]
fn underflow_sets_of() {
    let machine = run_program(&[
        instr_ri!(MOVRI, EAX, 0x8000_0000u32 as i64),
        instr_ri!(SUBRI, EAX, 1),
        instr_p!(HALT),
    ]);
    assert_regs!(machine, EAX == 0x7FFF_FFFF);
    assert!(machine.flags().contains(Flags::OF));
}
