use super::*;

#[test]
fn does_nothing() {
    // pass is a single byte; the next instruction follows immediately so
    // the fetch lengths line up.
    let mut machine = Machine::new(MEM_SIZE);
    machine.memory_mut().write(0x40, 1, instr_p!(PASS)).unwrap();
    machine.memory_mut().write(0x41, 1, instr_p!(HALT)).unwrap();
    machine.set_pc(0x40);
    machine.set_stack_pointer(STACK_BASE);
    machine.run().unwrap();

    assert_eq!(machine.state(), State::Halted);
    assert_eq!(machine.flags(), Flags::default());
    assert_untouched(&machine, &[]);
}

#[test]
fn pipeline_flows_around_it() {
    let mut machine = Machine::new(MEM_SIZE);
    let program = [
        instr_ri!(MOVRI, EAX, 5), // 6 bytes at 0x40
        instr_p!(PASS),           // 1 byte at 0x46
        instr_ri!(ADDRI, EAX, 2), // 6 bytes at 0x47
        instr_p!(HALT),           // 1 byte at 0x4D
    ];
    let mut address = 0x40;
    for &raw in program.iter() {
        let length = encoded_length((raw & constants::OPCODE_MASK) as u8);
        machine.memory_mut().write(address, length, raw).unwrap();
        address += length;
    }
    machine.set_pc(0x40);
    machine.set_stack_pointer(STACK_BASE);
    machine.run().unwrap();

    assert_regs!(machine, EAX == 7);
}
