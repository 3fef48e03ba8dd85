use bitflags::bitflags;

bitflags! {
    /// The status flags word, laid out at the x86 EFLAGS bit positions.
    ///
    /// Only `ZF`, `SF` and `OF` are ever written (by the add/sub families)
    /// or read (by the conditional jumps); the rest exist so the word
    /// round-trips faithfully through dumps and observers.
    #[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
    pub struct Flags: u16 {
        /// Carry flag.
        const CF = 1 << 0;
        /// Parity flag.
        const PF = 1 << 2;
        /// Adjust flag.
        const AF = 1 << 4;
        /// Zero flag.
        const ZF = 1 << 6;
        /// Sign flag.
        const SF = 1 << 7;
        /// Trap flag.
        const TF = 1 << 8;
        /// Interrupt enable flag.
        const IF = 1 << 9;
        /// Direction flag.
        const DF = 1 << 10;
        /// Overflow flag.
        const OF = 1 << 11;
    }
}

impl Flags {
    /// Updates ZF/SF/OF after an add or sub. `result` is the unwrapped
    /// sum or difference, so overflow is still observable here even though
    /// the stored value wraps to 32 bits.
    pub fn update_arithmetic(&mut self, result: i64) {
        self.set(Flags::ZF, result == 0);
        self.set(Flags::SF, result < 0);
        self.set(
            Flags::OF,
            result < -(1i64 << 31) || result >= (1i64 << 31),
        );
    }
}
