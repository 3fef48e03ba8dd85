use super::*;

/// Address of slot 4 in the standard branch program below.
const SKIP: Word = 0x58;

/// Runs `movri eax, left; subri eax, right; <jump>; movri ebx, 1; halt`.
/// A taken branch skips the `ebx` write.
fn run_branch(jump: u64, left: i64, right: i64) -> Machine {
    run_program(&[
        instr_ri!(MOVRI, EAX, left),
        instr_ri!(SUBRI, EAX, right),
        jump,
        instr_ri!(MOVRI, EBX, 1),
        instr_p!(HALT),
    ])
}

fn taken(machine: &Machine) -> bool {
    machine.registers().get(RegisterId::EBX) == 0
}

#[test]
fn jp_is_unconditional() {
    // jp over the ebx write, no flags involved.
    let machine = run_program(&[
        instr_j!(JP, 0x4C),
        instr_ri!(MOVRI, EBX, 1),
        instr_p!(HALT),
    ]);
    assert_regs!(machine, EBX == 0);
}

#[test]
fn jnz_takes_on_nonzero() {
    assert!(taken(&run_branch(instr_j!(JNZ, SKIP), 5, 3)));
    assert!(taken(&run_branch(instr_j!(JNZ, SKIP), 3, 5)));
    assert!(!taken(&run_branch(instr_j!(JNZ, SKIP), 5, 5)));
}

#[test]
fn jne_matches_jnz() {
    assert!(taken(&run_branch(instr_j!(JNE, SKIP), 5, 3)));
    assert!(!taken(&run_branch(instr_j!(JNE, SKIP), 5, 5)));
}

#[test]
fn je_takes_on_zero() {
    assert!(taken(&run_branch(instr_j!(JE, SKIP), 5, 5)));
    assert!(!taken(&run_branch(instr_j!(JE, SKIP), 5, 3)));
}

#[test]
fn jg_takes_on_strictly_positive() {
    assert!(taken(&run_branch(instr_j!(JG, SKIP), 5, 3)));
    assert!(!taken(&run_branch(instr_j!(JG, SKIP), 5, 5)));
    assert!(!taken(&run_branch(instr_j!(JG, SKIP), 3, 5)));
}

#[test]
fn jl_takes_on_strictly_negative() {
    assert!(taken(&run_branch(instr_j!(JL, SKIP), 3, 5)));
    assert!(!taken(&run_branch(instr_j!(JL, SKIP), 5, 5)));
    assert!(!taken(&run_branch(instr_j!(JL, SKIP), 5, 3)));
}

#[test]
fn jge_takes_on_zero_or_positive() {
    assert!(taken(&run_branch(instr_j!(JGE, SKIP), 5, 3)));
    assert!(taken(&run_branch(instr_j!(JGE, SKIP), 5, 5)));
    assert!(!taken(&run_branch(instr_j!(JGE, SKIP), 3, 5)));
}

#[test]
fn jle_takes_on_zero_or_negative() {
    assert!(taken(&run_branch(instr_j!(JLE, SKIP), 3, 5)));
    assert!(taken(&run_branch(instr_j!(JLE, SKIP), 5, 5)));
    assert!(!taken(&run_branch(instr_j!(JLE, SKIP), 5, 3)));
}

#[test]
fn backward_jump_loops() {
    // movri eax, 0; .loop: addri eax, 1; movrr ebx, eax; subri ebx, 3;
    // jl .loop; halt -- counts eax up to 3.
    let machine = run_program(&[
        instr_ri!(MOVRI, EAX, 0),
        instr_ri!(ADDRI, EAX, 1),
        instr_rr!(MOVRR, EBX, EAX),
        instr_ri!(SUBRI, EBX, 3),
        instr_j!(JL, 0x46),
        instr_p!(HALT),
    ]);
    assert_regs!(machine, EAX == 3, EBX == 0);
    assert!(machine.flags().contains(Flags::ZF));
}
