use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive as _;
use util::EnumFromStr;
use util_derive::EnumFromStr;

use crate::bits::twoc;
use crate::{constants, Word};

// Instruction Formats (little-endian, variable length)
//
//          +--------+------+------+-----------+
//          |0      7|8   11|12  15|16       47|
//          +--------+------+------+-----------+
// OP       | opcode |                          1 byte
//          +--------+------+------+
// REG PAIR | opcode |  rA  |  rB  |            2 bytes
//          +--------+------+------+-----------+
// LONG     | opcode |  rA  |  rB  | immediate |  6 bytes
//          +--------+------+------+-----------+
//
// The upper five bits of the opcode are the instruction code, the lower
// three the function code. The second letter of an arithmetic mnemonic
// names the destination kind, the third the source kind (r = register,
// m = memory, i = immediate).

#[derive(
    Clone, Copy, PartialEq, Eq, Debug, FromPrimitive, ToPrimitive, EnumFromStr,
)]
#[repr(u8)]
pub enum Opcode {
    //  Mnemonic     | Effect
    //---------------+--------------------------------------------------
    // Moves         |
    MOVRR = 0x00, // | regs[rA] = regs[rB]
    MOVRM = 0x01, // | regs[rA] = mem32[imm]
    MOVMR = 0x02, // | mem32[imm] = regs[rB]
    MOVRI = 0x03, // | regs[rA] = imm
    //---------------+--------------------------------------------------
    // Arithmetic    | (ZF/SF/OF updated from the unwrapped result)
    ADDRR = 0x08, // | regs[rA] += regs[rB]
    ADDMR = 0x09, // | mem32[imm] += regs[rB]
    ADDRM = 0x0A, // | regs[rA] += mem32[imm]
    ADDRI = 0x0B, // | regs[rA] += imm
    SUBRR = 0x0C, // | regs[rA] -= regs[rB]
    SUBMR = 0x0D, // | mem32[imm] -= regs[rB]
    SUBRM = 0x0E, // | regs[rA] -= mem32[imm]
    SUBRI = 0x0F, // | regs[rA] -= imm
    //---------------+--------------------------------------------------
    // Control flow  | (resolved at fetch, never enter the pipeline)
    RET = 0x10,   // | esp -= 4; PC = mem32[esp]
    HALT = 0x14,  // | stop fetching, drain the pipeline
    JP = 0x18,    // | PC = imm
    JNZ = 0x19,   // | PC = imm iff ZF = 0
    JNE = 0x1A,   // | PC = imm iff ZF = 0
    JE = 0x1B,    // | PC = imm iff ZF = 1
    JGE = 0x1C,   // | PC = imm iff SF = 0 or ZF = 1
    JLE = 0x1D,   // | PC = imm iff SF = 1 or ZF = 1
    JG = 0x1E,    // | PC = imm iff ZF = 0 and SF = 0
    JL = 0x1F,    // | PC = imm iff ZF = 0 and SF = 1
    //---------------+--------------------------------------------------
    // Misc          |
    PASS = 0x20,  // | no operation
    CALL = 0x30,  // | mem32[esp] = next PC; esp += 4; PC = imm
    PUSH = 0x38,  // | mem32[esp] = regs[rA]; esp += 4
    POP = 0x39,   // | esp -= 4; regs[rA] = mem32[esp]
}

/// Register names follow the 32-bit x86 convention; `esp` (index 7) is the
/// stack pointer manipulated by `call`/`ret`/`push`/`pop`.
#[derive(
    Clone, Copy, PartialEq, Eq, Debug, FromPrimitive, ToPrimitive, EnumFromStr,
)]
#[repr(u8)]
pub enum RegisterId {
    EAX,
    EBX,
    ECX,
    EDX,
    ESI,
    EDI,
    EBP,
    ESP,
    R8D,
    R9D,
    R10D,
    R11D,
    R12D,
    R13D,
    R14D,
    R15D,
}

/// All registers in index order; `REGISTER_IDS[i] as u8 == i`.
pub const REGISTER_IDS: [RegisterId; constants::REGISTER_COUNT] = [
    RegisterId::EAX,
    RegisterId::EBX,
    RegisterId::ECX,
    RegisterId::EDX,
    RegisterId::ESI,
    RegisterId::EDI,
    RegisterId::EBP,
    RegisterId::ESP,
    RegisterId::R8D,
    RegisterId::R9D,
    RegisterId::R10D,
    RegisterId::R11D,
    RegisterId::R12D,
    RegisterId::R13D,
    RegisterId::R14D,
    RegisterId::R15D,
];

macro_rules! impl_enum_display {
    ($e:ty) => {
        impl std::fmt::Display for $e {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                std::fmt::Debug::fmt(self, f)
            }
        }
    };
}

impl_enum_display!(Opcode);
impl_enum_display!(RegisterId);

#[inline]
pub fn register_index(id: RegisterId) -> usize {
    id as usize
}

impl Opcode {
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Upper five bits of the opcode.
    #[inline]
    pub fn icode(self) -> u8 {
        self.code() >> constants::IFUN_WIDTH
    }

    /// Lower three bits of the opcode.
    #[inline]
    pub fn ifun(self) -> u8 {
        self.code() & constants::IFUN_MASK
    }

    #[inline]
    pub fn from_code(code: u8) -> Option<Opcode> {
        Opcode::from_u8(code)
    }

    #[inline]
    pub fn from_parts(icode: u8, ifun: u8) -> Option<Opcode> {
        Opcode::from_code((icode << constants::IFUN_WIDTH) | ifun)
    }

    /// Mnemonics whose 32-bit immediate stands in for the left operand:
    /// memory-destination moves and arithmetic, all jumps and `call`.
    pub fn immediate_is_left(self) -> bool {
        match self {
            Opcode::MOVMR | Opcode::ADDMR | Opcode::SUBMR | Opcode::CALL => true,
            _ => self.is_jump(),
        }
    }

    /// Mnemonics whose 32-bit immediate stands in for the right operand:
    /// memory-source and immediate-source moves and arithmetic.
    pub fn immediate_is_right(self) -> bool {
        matches!(
            self,
            Opcode::MOVRM
                | Opcode::ADDRM
                | Opcode::SUBRM
                | Opcode::MOVRI
                | Opcode::ADDRI
                | Opcode::SUBRI
        )
    }

    /// Add/sub families; the only instructions that write flags.
    #[inline]
    pub fn is_arithmetic(self) -> bool {
        self.icode() == 0b00001
    }

    pub fn is_jump(self) -> bool {
        self == Opcode::JP || self.is_conditional_jump()
    }

    pub fn is_conditional_jump(self) -> bool {
        matches!(
            self,
            Opcode::JNZ
                | Opcode::JNE
                | Opcode::JE
                | Opcode::JGE
                | Opcode::JLE
                | Opcode::JG
                | Opcode::JL
        )
    }

    pub fn is_stack(self) -> bool {
        matches!(self, Opcode::PUSH | Opcode::POP)
    }
}

/// Length in bytes of the instruction starting with the given opcode byte.
///
/// Unrecognized opcodes decode at the long length, exactly as the fetch
/// unit treats them; the executor rejects them later.
pub fn encoded_length(opcode: u8) -> u32 {
    match Opcode::from_code(opcode) {
        Some(Opcode::RET) | Some(Opcode::HALT) | Some(Opcode::PASS) => {
            constants::OP_ONLY_BYTES
        }
        Some(Opcode::MOVRR) | Some(Opcode::ADDRR) | Some(Opcode::SUBRR) => {
            constants::REG_PAIR_BYTES
        }
        _ => constants::LONG_BYTES,
    }
}

/// Field view of a decoded instruction integer.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Decoded {
    pub opcode: u8,
    pub ra: u8,
    pub rb: u8,
    pub imm: Word,
}

/// Lays out the instruction fields in a single integer; the low
/// `encoded_length` bytes of the result are the wire encoding.
#[inline]
pub fn encode(opcode: Opcode, ra: u8, rb: u8, imm: Word) -> u64 {
    (u64::from(opcode.code()) & constants::OPCODE_MASK)
        | ((u64::from(ra) << constants::RA_OFFSET) & constants::RA_MASK)
        | ((u64::from(rb) << constants::RB_OFFSET) & constants::RB_MASK)
        | ((u64::from(imm) << constants::IMMEDIATE_OFFSET) & constants::IMMEDIATE_MASK)
}

#[inline]
pub fn decode(raw: u64) -> Decoded {
    Decoded {
        opcode: ((raw & constants::OPCODE_MASK) >> constants::OPCODE_OFFSET) as u8,
        ra: ((raw & constants::RA_MASK) >> constants::RA_OFFSET) as u8,
        rb: ((raw & constants::RB_MASK) >> constants::RB_OFFSET) as u8,
        imm: ((raw & constants::IMMEDIATE_MASK) >> constants::IMMEDIATE_OFFSET) as Word,
    }
}

/// Constructs a register-register instruction.
pub fn make_rr(opcode: Opcode, ra: RegisterId, rb: RegisterId) -> u64 {
    encode(opcode, ra as u8, rb as u8, 0)
}

/// Constructs a register-destination instruction with an immediate or
/// memory-address right operand. The value is normalized to its unsigned
/// bit pattern before encoding.
pub fn make_ri(opcode: Opcode, ra: RegisterId, value: i64) -> u64 {
    encode(opcode, ra as u8, 0, twoc_word(value))
}

/// Constructs a memory-destination instruction: the address travels in the
/// immediate, the source register in `rB`.
pub fn make_mr(opcode: Opcode, address: Word, rb: RegisterId) -> u64 {
    encode(opcode, 0, rb as u8, address)
}

/// Constructs a jump or `call` with an absolute target.
pub fn make_jump(opcode: Opcode, target: Word) -> u64 {
    encode(opcode, 0, 0, target)
}

/// Constructs a `push`/`pop` naming a single register.
pub fn make_stack(opcode: Opcode, ra: RegisterId) -> u64 {
    encode(opcode, ra as u8, 0, 0)
}

/// Constructs a bare-opcode instruction (`ret`/`halt`/`pass`).
pub fn make_plain(opcode: Opcode) -> u64 {
    encode(opcode, 0, 0, 0)
}

fn twoc_word(value: i64) -> Word {
    if value < 0 {
        twoc(value) as Word
    } else {
        value as Word
    }
}

/// Constructs a register-register instruction.
#[macro_export]
macro_rules! instr_rr {
    ($opcode:ident, $ra:ident, $rb:ident) => {
        $crate::instructions::make_rr(
            $crate::instructions::Opcode::$opcode,
            $crate::instructions::RegisterId::$ra,
            $crate::instructions::RegisterId::$rb,
        )
    };
}

/// Constructs a register-immediate (or register-memory) instruction.
#[macro_export]
macro_rules! instr_ri {
    ($opcode:ident, $ra:ident, $value:expr) => {
        $crate::instructions::make_ri(
            $crate::instructions::Opcode::$opcode,
            $crate::instructions::RegisterId::$ra,
            $value,
        )
    };
}

/// Constructs a memory-register instruction.
#[macro_export]
macro_rules! instr_mr {
    ($opcode:ident, $address:expr, $rb:ident) => {
        $crate::instructions::make_mr(
            $crate::instructions::Opcode::$opcode,
            $address,
            $crate::instructions::RegisterId::$rb,
        )
    };
}

/// Constructs a jump or `call` instruction.
#[macro_export]
macro_rules! instr_j {
    ($opcode:ident, $target:expr) => {
        $crate::instructions::make_jump($crate::instructions::Opcode::$opcode, $target)
    };
}

/// Constructs a `push`/`pop` instruction.
#[macro_export]
macro_rules! instr_s {
    ($opcode:ident, $ra:ident) => {
        $crate::instructions::make_stack(
            $crate::instructions::Opcode::$opcode,
            $crate::instructions::RegisterId::$ra,
        )
    };
}

/// Constructs a bare-opcode instruction.
#[macro_export]
macro_rules! instr_p {
    ($opcode:ident) => {
        $crate::instructions::make_plain($crate::instructions::Opcode::$opcode)
    };
}
