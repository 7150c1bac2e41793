
use super::asm::*;
use super::misc::SignExtend;

const DST_SHIFT: u16 = 9;
const SRC1_SHIFT: u16 = 6;
const IMM_FLAG: u16 = 0x1 << 5;
const JSR_LONG_FLAG: u16 = 0x1 << 11;
const BR_MASK: u16 = 0x7;

// Low `bits` bits of the instruction, sign extended.
fn field(input: u16, bits: u32) -> u16 {
    (input & ((1u16 << bits) - 1)).sign_extend(bits)
}

fn pc_offset9(input: u16) -> u16 {
    field(input, 9)
}

fn dst(input: u16) -> Reg {
    Reg::at(input, DST_SHIFT)
}

fn src1(input: u16) -> Reg {
    Reg::at(input, SRC1_SHIFT)
}

fn alu_src(input: u16) -> AluSrc {
    if input & IMM_FLAG != 0 {
        AluSrc::Imm(field(input, 5))
    } else {
        AluSrc::Reg(Reg::at(input, 0))
    }
}

fn decode_jsr(input: u16) -> Ins {
    let target = if input & JSR_LONG_FLAG != 0 {
        JsrTarget::Offset(field(input, 11))
    } else {
        JsrTarget::Reg(src1(input))
    };
    Ins::Jsr{target}
}

/// Decodes one instruction word. Every word decodes to something; RTI and the
/// reserved opcode come back as `Ins::Rti` and `Ins::Res` for the caller to reject.
pub fn decode(input: u16) -> Ins {
    match Opcode::of(input) {
        Opcode::Br => Ins::Br{mask: (input >> DST_SHIFT) & BR_MASK, offset: pc_offset9(input)},
        Opcode::Add => Ins::Add{dst: dst(input), src1: src1(input), src2: alu_src(input)},
        Opcode::Ld => Ins::Ld{dst: dst(input), offset: pc_offset9(input)},
        Opcode::St => Ins::St{src: dst(input), offset: pc_offset9(input)},
        Opcode::Jsr => decode_jsr(input),
        Opcode::And => Ins::And{dst: dst(input), src1: src1(input), src2: alu_src(input)},
        Opcode::Ldr => Ins::Ldr{dst: dst(input), base: src1(input), offset: field(input, 6)},
        Opcode::Str => Ins::Str{src: dst(input), base: src1(input), offset: field(input, 6)},
        Opcode::Rti => Ins::Rti,
        Opcode::Not => Ins::Not{dst: dst(input), src: src1(input)},
        Opcode::Ldi => Ins::Ldi{dst: dst(input), offset: pc_offset9(input)},
        Opcode::Sti => Ins::Sti{src: dst(input), offset: pc_offset9(input)},
        Opcode::Jmp => Ins::Jmp{base: src1(input)},
        Opcode::Res => Ins::Res,
        Opcode::Lea => Ins::Lea{dst: dst(input), offset: pc_offset9(input)},
        Opcode::Trap => Ins::Trap{vector: (input & TrapVector::MASK) as u8},
    }
}
