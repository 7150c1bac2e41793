
use crate::constants::{FLAG_NEG, FLAG_POS, FLAG_ZRO};

use std::fmt;

use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;


#[derive(Debug, Clone, Copy, FromPrimitive, ToPrimitive, PartialEq, Eq)]
pub enum Opcode {
    Br = 0,
    Add,
    Ld,
    St,
    Jsr,
    And,
    Ldr,
    Str,
    Rti,
    Not,
    Ldi,
    Sti,
    Jmp,
    Res,
    Lea,
    Trap,
}

impl Opcode {
    pub const NUM_BITS: u16 = 4;
    pub const SHIFT: u16 = (u16::BITS as u16) - Self::NUM_BITS;

    pub fn of(word: u16) -> Opcode {
        // All 16 encodings are named, so this can't miss.
        Opcode::from_u16(word >> Self::SHIFT).unwrap_or(Opcode::Res)
    }
}


////////////////////////////////////////////////////////////////////////////////


#[derive(Debug, Clone, Copy, FromPrimitive, ToPrimitive, PartialEq, Eq)]
pub enum TrapVector {
    Getc = 0x20,
    Out,
    Puts,
    In,
    Putsp,
    Halt,
    // Reserved by the monitor, no service routine.
    Rti,
    XGetc,
    XOut,
    XPuts,
}

impl TrapVector {
    pub const MASK: u16 = 0xff;
}


////////////////////////////////////////////////////////////////////////////////


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reg {
    R0 = 0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
}

pub const NUM_REGS: usize = 8;

impl Reg {
    pub const NUM_BITS: usize = 3;
    pub const MASK: u16 = (1u16 << Self::NUM_BITS) - 1;

    pub const ALL: [Reg; NUM_REGS] = [
        Reg::R0, Reg::R1, Reg::R2, Reg::R3, Reg::R4, Reg::R5, Reg::R6, Reg::R7,
    ];

    /// Register selected by the three bits at `shift`.
    pub fn at(word: u16, shift: u16) -> Reg {
        Self::ALL[((word >> shift) & Self::MASK) as usize]
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}


////////////////////////////////////////////////////////////////////////////////


// Second operand of ADD and AND.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluSrc {
    Reg(Reg),
    Imm(u16), // Already sign extended
}

impl fmt::Display for AluSrc {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AluSrc::Reg(r) => write!(f, "{r}"),
            AluSrc::Imm(imm) => write!(f, "#{}", *imm as i16),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsrTarget {
    Offset(u16), // JSR
    Reg(Reg),    // JSRR
}

/// A decoded instruction. Offsets and immediates are stored sign extended, so
/// they can be added to a word with `wrapping_add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ins {
    Br { mask: u16, offset: u16 },
    Add { dst: Reg, src1: Reg, src2: AluSrc },
    Ld { dst: Reg, offset: u16 },
    St { src: Reg, offset: u16 },
    Jsr { target: JsrTarget },
    And { dst: Reg, src1: Reg, src2: AluSrc },
    Ldr { dst: Reg, base: Reg, offset: u16 },
    Str { src: Reg, base: Reg, offset: u16 },
    Rti,
    Not { dst: Reg, src: Reg },
    Ldi { dst: Reg, offset: u16 },
    Sti { src: Reg, offset: u16 },
    Jmp { base: Reg },
    Res,
    Lea { dst: Reg, offset: u16 },
    Trap { vector: u8 },
}

impl Ins {
    pub fn opcode(&self) -> Opcode {
        match self {
            Ins::Br { .. } => Opcode::Br,
            Ins::Add { .. } => Opcode::Add,
            Ins::Ld { .. } => Opcode::Ld,
            Ins::St { .. } => Opcode::St,
            Ins::Jsr { .. } => Opcode::Jsr,
            Ins::And { .. } => Opcode::And,
            Ins::Ldr { .. } => Opcode::Ldr,
            Ins::Str { .. } => Opcode::Str,
            Ins::Rti => Opcode::Rti,
            Ins::Not { .. } => Opcode::Not,
            Ins::Ldi { .. } => Opcode::Ldi,
            Ins::Sti { .. } => Opcode::Sti,
            Ins::Jmp { .. } => Opcode::Jmp,
            Ins::Res => Opcode::Res,
            Ins::Lea { .. } => Opcode::Lea,
            Ins::Trap { .. } => Opcode::Trap,
        }
    }

    /// Display with PC-relative operands resolved against `pc`, the address
    /// following the instruction.
    pub fn display_with_pc(&self, pc: u16) -> InsWithPc<'_> {
        InsWithPc(self, pc)
    }

    fn fmt_with_pc(&self, f: &mut fmt::Formatter, pc: Option<u16>) -> fmt::Result {
        let target = |f: &mut fmt::Formatter, offset: u16| match pc {
            Some(pc) => write!(f, "x{:04X}", pc.wrapping_add(offset)),
            None => write!(f, "#{}", offset as i16),
        };

        match *self {
            Ins::Br { mask, offset } => {
                write!(f, "BR")?;
                if mask & FLAG_NEG != 0 { write!(f, "n")?; }
                if mask & FLAG_ZRO != 0 { write!(f, "z")?; }
                if mask & FLAG_POS != 0 { write!(f, "p")?; }
                write!(f, " ")?;
                target(f, offset)
            }
            Ins::Add { dst, src1, src2 } => write!(f, "ADD {dst}, {src1}, {src2}"),
            Ins::And { dst, src1, src2 } => write!(f, "AND {dst}, {src1}, {src2}"),
            Ins::Not { dst, src } => write!(f, "NOT {dst}, {src}"),
            Ins::Ld { dst, offset } => {
                write!(f, "LD {dst}, ")?;
                target(f, offset)
            }
            Ins::Ldi { dst, offset } => {
                write!(f, "LDI {dst}, ")?;
                target(f, offset)
            }
            Ins::Lea { dst, offset } => {
                write!(f, "LEA {dst}, ")?;
                target(f, offset)
            }
            Ins::St { src, offset } => {
                write!(f, "ST {src}, ")?;
                target(f, offset)
            }
            Ins::Sti { src, offset } => {
                write!(f, "STI {src}, ")?;
                target(f, offset)
            }
            Ins::Ldr { dst, base, offset } => write!(f, "LDR {dst}, {base}, #{}", offset as i16),
            Ins::Str { src, base, offset } => write!(f, "STR {src}, {base}, #{}", offset as i16),
            Ins::Jmp { base: Reg::R7 } => write!(f, "RET"),
            Ins::Jmp { base } => write!(f, "JMP {base}"),
            Ins::Jsr { target: JsrTarget::Offset(offset) } => {
                write!(f, "JSR ")?;
                target(f, offset)
            }
            Ins::Jsr { target: JsrTarget::Reg(base) } => write!(f, "JSRR {base}"),
            Ins::Trap { vector } => match TrapVector::from_u8(vector) {
                Some(trap) => write!(f, "{}", format!("{trap:?}").to_uppercase()),
                None => write!(f, "TRAP x{vector:02X}"),
            },
            Ins::Rti => write!(f, "RTI"),
            Ins::Res => write!(f, "RES"),
        }
    }
}

impl fmt::Display for Ins {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.fmt_with_pc(f, None)
    }
}

pub struct InsWithPc<'a>(&'a Ins, u16);

impl fmt::Display for InsWithPc<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt_with_pc(f, Some(self.1))
    }
}
