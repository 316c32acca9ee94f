use super::TypeKind;
use std::ops::RangeInclusive;

/// ## Addressing mode of a move operand

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// The operand itself.
    Value = 0,
    /// The symbol at the address held by the operand.
    Deref = 1,
    /// The address of the operand.
    Address = 2,
    /// The symbol at the operand's address plus the third operand.
    Index = 3,
}

impl Mode {
    fn from_bits(bits: u8) -> Mode {
        match bits & 3 {
            0 => Mode::Value,
            1 => Mode::Deref,
            2 => Mode::Address,
            _ => Mode::Index,
        }
    }

    fn letter(self) -> char {
        match self {
            Mode::Value => 'v',
            Mode::Deref => 'd',
            Mode::Address => 'a',
            Mode::Index => 'i',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Arithmetic,
    Integer,
    Cast,
    Move,
    Control,
}

/// ## Three-address instruction set
///
/// Every opcode has a one byte encoding whose top nibble selects the
/// execution family. Casts and moves keep their sub-modes decoded here;
/// the bits only matter to `code` and `from_code`.
///
/// The first operand is the target for every opcode below `0x50`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    // *** General arithmetic and logic
    Add,
    Sub,
    Mul,
    Div,
    And,
    Or,
    Minus,
    Not,
    Seq,
    Slt,
    Sleq,

    // *** Integer only
    Band,
    Bor,
    Bxor,
    Shl,
    Shr,
    Bnot,
    Mod,

    Cast { from: TypeKind, to: TypeKind },
    Move { target: Mode, source: Mode },

    // *** Writes a target
    Mema,
    Pop,
    Scanc,
    Scani,
    Scanf,
    Rand,

    // *** Control, stack and output
    Brz,
    Brnz,
    Jump,
    Param,
    Print,
    Println,
    Memf,
    Call,
    Return,
    Push,
}

impl Opcode {
    pub fn code(self) -> u8 {
        use Opcode::*;
        match self {
            Add => 0x00,
            Sub => 0x01,
            Mul => 0x02,
            Div => 0x03,
            And => 0x04,
            Or => 0x05,
            Minus => 0x06,
            Not => 0x07,
            Seq => 0x08,
            Slt => 0x09,
            Sleq => 0x0A,
            Band => 0x10,
            Bor => 0x11,
            Bxor => 0x12,
            Shl => 0x13,
            Shr => 0x14,
            Bnot => 0x15,
            Mod => 0x16,
            Cast { from, to } => 0x20 | from.bits() << 2 | to.bits(),
            Move { target, source } => 0x30 | (target as u8) << 2 | source as u8,
            Mema => 0x40,
            Pop => 0x41,
            Scanc => 0x42,
            Scani => 0x43,
            Scanf => 0x44,
            Rand => 0x45,
            Brz => 0x50,
            Brnz => 0x51,
            Jump => 0x52,
            Param => 0x53,
            Print => 0x54,
            Println => 0x55,
            Memf => 0x56,
            Call => 0x57,
            Return => 0x58,
            Push => 0x59,
        }
    }

    pub fn from_code(code: u8) -> Option<Opcode> {
        use Opcode::*;
        let op = match code {
            0x00 => Add,
            0x01 => Sub,
            0x02 => Mul,
            0x03 => Div,
            0x04 => And,
            0x05 => Or,
            0x06 => Minus,
            0x07 => Not,
            0x08 => Seq,
            0x09 => Slt,
            0x0A => Sleq,
            0x10 => Band,
            0x11 => Bor,
            0x12 => Bxor,
            0x13 => Shl,
            0x14 => Shr,
            0x15 => Bnot,
            0x16 => Mod,
            0x20..=0x2F => {
                let from = TypeKind::from_bits((code >> 2) & 3)?;
                let to = TypeKind::from_bits(code & 3)?;
                if from == to || from == TypeKind::Addr || to == TypeKind::Addr {
                    return None;
                }
                Cast { from, to }
            }
            0x30..=0x3F => {
                let target = Mode::from_bits(code >> 2);
                let source = Mode::from_bits(code);
                if target == Mode::Address || (target == Mode::Index && source == Mode::Index) {
                    return None;
                }
                Move { target, source }
            }
            0x40 => Mema,
            0x41 => Pop,
            0x42 => Scanc,
            0x43 => Scani,
            0x44 => Scanf,
            0x45 => Rand,
            0x50 => Brz,
            0x51 => Brnz,
            0x52 => Jump,
            0x53 => Param,
            0x54 => Print,
            0x55 => Println,
            0x56 => Memf,
            0x57 => Call,
            0x58 => Return,
            0x59 => Push,
            _ => return None,
        };
        Some(op)
    }

    pub fn from_mnemonic(s: &str) -> Option<Opcode> {
        if s == "mov" {
            return Some(Opcode::Move {
                target: Mode::Value,
                source: Mode::Value,
            });
        }
        (0..=u8::MAX)
            .filter_map(Opcode::from_code)
            .find(|op| op.to_string() == s)
    }

    pub fn family(self) -> Family {
        match self.code() >> 4 {
            0 => Family::Arithmetic,
            1 => Family::Integer,
            2 => Family::Cast,
            3 => Family::Move,
            _ => Family::Control,
        }
    }

    pub fn has_target(self) -> bool {
        self.code() < 0x50
    }

    pub fn arity(self) -> RangeInclusive<usize> {
        use Opcode::*;
        match self {
            Minus | Not | Bnot | Cast { .. } | Mema | Brz | Brnz => 2..=2,
            Move { target, source } => {
                if target == Mode::Index || source == Mode::Index {
                    3..=3
                } else {
                    2..=2
                }
            }
            Pop | Scanc | Scani | Scanf | Rand | Jump | Param | Memf | Push => 1..=1,
            Print | Println | Return => 0..=1,
            Call => 1..=2,
            _ => 3..=3,
        }
    }
}

fn cast_name(kind: TypeKind) -> &'static str {
    match kind {
        TypeKind::Char => "ch",
        TypeKind::Int => "int",
        TypeKind::Float => "fl",
        TypeKind::Addr => "addr",
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Opcode::*;
        match self {
            Add => write!(f, "add"),
            Sub => write!(f, "sub"),
            Mul => write!(f, "mul"),
            Div => write!(f, "div"),
            And => write!(f, "and"),
            Or => write!(f, "or"),
            Minus => write!(f, "minus"),
            Not => write!(f, "not"),
            Seq => write!(f, "seq"),
            Slt => write!(f, "slt"),
            Sleq => write!(f, "sleq"),

            Band => write!(f, "band"),
            Bor => write!(f, "bor"),
            Bxor => write!(f, "bxor"),
            Shl => write!(f, "shl"),
            Shr => write!(f, "shr"),
            Bnot => write!(f, "bnot"),
            Mod => write!(f, "mod"),

            Cast { from, to } => write!(f, "{}to{}", cast_name(*from), cast_name(*to)),
            Move { target, source } => write!(f, "mov{}{}", target.letter(), source.letter()),

            Mema => write!(f, "mema"),
            Pop => write!(f, "pop"),
            Scanc => write!(f, "scanc"),
            Scani => write!(f, "scani"),
            Scanf => write!(f, "scanf"),
            Rand => write!(f, "rand"),

            Brz => write!(f, "brz"),
            Brnz => write!(f, "brnz"),
            Jump => write!(f, "jump"),
            Param => write!(f, "param"),
            Print => write!(f, "print"),
            Println => write!(f, "println"),
            Memf => write!(f, "memf"),
            Call => write!(f, "call"),
            Return => write!(f, "return"),
            Push => write!(f, "push"),
        }
    }
}
